//! ASCII table renderer

use std::io::{self, Write};

use tabled::builder::Builder;
use tabled::settings::Style;
use tokio::sync::mpsc;

use crate::lint::outcome::{ClassifiedResult, Outcome, Severity};
use crate::report::text::message;
use crate::report::{Renderer, Summary};

const HEADER: [&str; 4] = ["Name", "Current Version", "Latest Version", "Status"];

/// Placeholder for cells without a value
const EMPTY_CELL: &str = "-";

type Row = [String; 4];

/// Collects the results and writes them as one aligned table once the
/// stream closes
#[derive(Debug, Clone)]
pub struct TableRenderer {
    verbose: bool,
}

impl TableRenderer {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

#[async_trait::async_trait]
impl Renderer for TableRenderer {
    async fn render(
        &mut self,
        mut results: mpsc::Receiver<ClassifiedResult>,
        out: &mut (dyn Write + Send),
    ) -> io::Result<Summary> {
        let mut summary = Summary::default();
        let mut builder = Builder::new();
        builder.push_record(HEADER);

        while let Some(result) = results.recv().await {
            let severity = result.severity();
            summary.record(severity);
            if severity == Severity::Info && !self.verbose {
                continue;
            }
            builder.push_record(row(&result));
        }

        let table = builder.build().with(Style::markdown()).to_string();
        writeln!(out, "{}", table)?;
        out.flush()?;
        Ok(summary)
    }
}

fn or_empty(value: &str) -> String {
    if value.is_empty() {
        EMPTY_CELL.to_string()
    } else {
        value.to_string()
    }
}

fn row(result: &ClassifiedResult) -> Row {
    let name = result.role.display_name().to_string();
    let (current, latest, status) = match &result.outcome {
        Outcome::AlreadyLatest { version } => (version.clone(), version.clone(), "Ok".to_string()),
        Outcome::Outdated { from, to } => (from.clone(), to.clone(), "Update".to_string()),
        Outcome::DeclaredVersionNotFound {
            declared,
            suggested,
            ..
        } => (or_empty(declared), suggested.clone(), "Update".to_string()),
        Outcome::UndetectableArchive => (
            or_empty(&result.role.version),
            EMPTY_CELL.to_string(),
            "Unsupported".to_string(),
        ),
        Outcome::UpstreamError {
            not_found: true, ..
        } => (
            EMPTY_CELL.to_string(),
            EMPTY_CELL.to_string(),
            "Role Not Found".to_string(),
        ),
        outcome => (
            EMPTY_CELL.to_string(),
            EMPTY_CELL.to_string(),
            format!("Error: {}", message(outcome)),
        ),
    };
    [name, current, latest, status]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::types::Role;

    fn result(name: &str, version: &str, outcome: Outcome) -> ClassifiedResult {
        ClassifiedResult::new(
            Role {
                source: format!("{}.role", name),
                version: version.to_string(),
                name: name.to_string(),
                ..Default::default()
            },
            outcome,
        )
    }

    async fn render(verbose: bool, results: Vec<ClassifiedResult>) -> (String, Summary) {
        let (tx, rx) = mpsc::channel(results.len().max(1));
        for result in results {
            tx.send(result).await.unwrap();
        }
        drop(tx);

        let mut out = Vec::new();
        let summary = TableRenderer::new(verbose)
            .render(rx, &mut out)
            .await
            .unwrap();
        (String::from_utf8(out).unwrap(), summary)
    }

    #[tokio::test]
    async fn render_aligns_columns() {
        let results = vec![
            result(
                "old",
                "v1.0.0",
                Outcome::Outdated {
                    from: "v1.0.0".into(),
                    to: "v1.10.0".into(),
                },
            ),
            result(
                "unpinned",
                "",
                Outcome::DeclaredVersionNotFound {
                    declared: "".into(),
                    available: vec!["1.0.0".into()],
                    suggested: "1.0.0".into(),
                },
            ),
        ];

        let (output, summary) = render(false, results).await;

        assert_eq!(
            output,
            "\
| Name     | Current Version | Latest Version | Status |
|----------|-----------------|----------------|--------|
| old      | v1.0.0          | v1.10.0        | Update |
| unpinned | -               | 1.0.0          | Update |
"
        );
        assert_eq!(summary.warning, 2);
    }

    #[tokio::test]
    async fn render_status_per_outcome() {
        let results = vec![
            result("latest", "1.0.0", Outcome::AlreadyLatest { version: "1.0.0".into() }),
            result("archive", "", Outcome::UndetectableArchive),
            result(
                "gone",
                "1.0.0",
                Outcome::UpstreamError {
                    detail: "role not found: gone.role".into(),
                    not_found: true,
                },
            ),
            result(
                "broken",
                "1.0.0",
                Outcome::UpstreamError {
                    detail: "network error: timeout".into(),
                    not_found: false,
                },
            ),
            result("hg", "1.0.0", Outcome::UnknownSourceType { scm: "hg".into() }),
        ];

        let (output, summary) = render(true, results).await;
        let statuses: Vec<_> = output
            .lines()
            .skip(2)
            .map(|line| line.trim_end_matches('|').rsplit('|').next().unwrap().trim())
            .collect();

        assert_eq!(
            statuses,
            vec![
                "Ok",
                "Unsupported",
                "Role Not Found",
                "Error: network error: timeout",
                "Error: unknown or unsupported scm hg",
            ]
        );
        assert_eq!(summary.info, 2);
        assert_eq!(summary.error, 3);
    }

    #[tokio::test]
    async fn render_header_only_when_nothing_to_report() {
        let results = vec![result(
            "latest",
            "1.0.0",
            Outcome::AlreadyLatest {
                version: "1.0.0".into(),
            },
        )];

        let (output, summary) = render(false, results).await;

        assert!(output.starts_with("| Name "));
        assert!(!output.contains("latest"));
        assert_eq!(summary.exit_code(), 0);
    }

    #[tokio::test]
    async fn render_role_not_found_from_outcome_kind_not_detail_text() {
        let results = vec![
            result(
                "missing",
                "1.0.0",
                Outcome::UpstreamError {
                    detail: "no match on the index".into(),
                    not_found: true,
                },
            ),
            result(
                "lookalike",
                "1.0.0",
                Outcome::UpstreamError {
                    detail: "role not found behind proxy".into(),
                    not_found: false,
                },
            ),
        ];

        let (output, _) = render(false, results).await;
        let statuses: Vec<_> = output
            .lines()
            .skip(2)
            .map(|line| line.trim_end_matches('|').rsplit('|').next().unwrap().trim())
            .collect();

        assert_eq!(
            statuses,
            vec!["Role Not Found", "Error: role not found behind proxy"]
        );
    }
}
