//! Plain text renderer

use std::io::{self, Write};

use console::style;
use tokio::sync::mpsc;

use crate::lint::outcome::{ClassifiedResult, Outcome, Severity};
use crate::report::{Renderer, Summary};

/// Writes one `LEVEL: role: message` line per result
#[derive(Debug, Clone)]
pub struct TextRenderer {
    verbose: bool,
    color: bool,
}

impl TextRenderer {
    pub fn new(verbose: bool, color: bool) -> Self {
        Self { verbose, color }
    }

    fn write_result(&self, out: &mut dyn Write, result: &ClassifiedResult) -> io::Result<()> {
        let severity = result.severity();
        let level = format!("{}:", severity.as_str());
        let level = match severity {
            Severity::Info => style(level).cyan(),
            Severity::Warning => style(level).yellow(),
            Severity::Error => style(level).red(),
        }
        .bold()
        .force_styling(self.color);

        writeln!(
            out,
            "{} {}: {}.",
            level,
            result.role.display_name(),
            message(&result.outcome)
        )
    }
}

#[async_trait::async_trait]
impl Renderer for TextRenderer {
    async fn render(
        &mut self,
        mut results: mpsc::Receiver<ClassifiedResult>,
        out: &mut (dyn Write + Send),
    ) -> io::Result<Summary> {
        let mut summary = Summary::default();

        while let Some(result) = results.recv().await {
            let severity = result.severity();
            summary.record(severity);
            if severity == Severity::Info && !self.verbose {
                continue;
            }
            self.write_result(out, &result)?;
        }

        out.flush()?;
        Ok(summary)
    }
}

/// Human readable description of an outcome
pub fn message(outcome: &Outcome) -> String {
    match outcome {
        Outcome::AlreadyLatest { version } => format!(
            "{} is the latest version for the role, no update needed",
            version
        ),
        Outcome::Outdated { from, to } => format!(
            "role not at the latest version, upgrade from {} to {}",
            from, to
        ),
        Outcome::DeclaredVersionNotFound {
            declared,
            suggested,
            ..
        } if declared.is_empty() => format!(
            "no version specified for the role, pin it to version {} to avoid not explicit dependencies",
            suggested
        ),
        Outcome::DeclaredVersionNotFound {
            declared,
            suggested,
            ..
        } => format!(
            "unable to find {} between the available versions for the role, tag a new release or use {}",
            declared, suggested
        ),
        Outcome::UndetectableArchive => {
            "unable to detect updates for roles distributed via custom webservers".to_string()
        }
        Outcome::UnknownSourceType { scm } => format!("unknown or unsupported scm {}", scm),
        Outcome::UpstreamError { detail, .. } => detail.clone(),
    }
}
