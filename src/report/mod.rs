//! Report layer: renders lint results for the user
//! - text.rs: one line per result
//! - table.rs: aligned ASCII table

pub mod table;
pub mod text;

use std::io::{self, Write};

use tokio::sync::mpsc;

use crate::config::{LintConfig, OutputFormat};
use crate::lint::outcome::{ClassifiedResult, Severity};

pub use table::TableRenderer;
pub use text::TextRenderer;

/// Consumes the result stream of a lint run
#[async_trait::async_trait]
pub trait Renderer: Send {
    /// Writes every result received until the channel closes
    ///
    /// Results are counted in the returned summary whether they were printed
    /// or filtered out.
    async fn render(
        &mut self,
        results: mpsc::Receiver<ClassifiedResult>,
        out: &mut (dyn Write + Send),
    ) -> io::Result<Summary>;
}

/// Renderer for the configured output format
pub fn renderer_for(config: &LintConfig) -> Box<dyn Renderer> {
    match config.format {
        OutputFormat::Text => Box::new(TextRenderer::new(config.verbose, config.color)),
        OutputFormat::Table => Box::new(TableRenderer::new(config.verbose)),
    }
}

/// Number of results per severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub info: usize,
    pub warning: usize,
    pub error: usize,
}

impl Summary {
    pub fn record(&mut self, severity: Severity) {
        match severity {
            Severity::Info => self.info += 1,
            Severity::Warning => self.warning += 1,
            Severity::Error => self.error += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.info + self.warning + self.error
    }

    /// Highest severity seen, `None` when nothing was reported
    pub fn max_severity(&self) -> Option<Severity> {
        if self.error > 0 {
            Some(Severity::Error)
        } else if self.warning > 0 {
            Some(Severity::Warning)
        } else if self.info > 0 {
            Some(Severity::Info)
        } else {
            None
        }
    }

    /// 0 when every result is informational, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        match self.max_severity() {
            Some(Severity::Warning) | Some(Severity::Error) => 1,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn summary(severities: &[Severity]) -> Summary {
        let mut summary = Summary::default();
        for severity in severities {
            summary.record(*severity);
        }
        summary
    }

    #[rstest]
    #[case(&[], 0)]
    #[case(&[Severity::Info, Severity::Info], 0)]
    #[case(&[Severity::Info, Severity::Warning], 1)]
    #[case(&[Severity::Error], 1)]
    #[case(&[Severity::Warning, Severity::Error, Severity::Info], 1)]
    fn exit_code_is_zero_only_for_informational_results(
        #[case] severities: &[Severity],
        #[case] expected: i32,
    ) {
        assert_eq!(summary(severities).exit_code(), expected);
    }

    #[test]
    fn summary_counts_per_severity() {
        let result = summary(&[
            Severity::Info,
            Severity::Warning,
            Severity::Warning,
            Severity::Error,
        ]);

        assert_eq!(
            result,
            Summary {
                info: 1,
                warning: 2,
                error: 1
            }
        );
        assert_eq!(result.total(), 4);
        assert_eq!(result.max_severity(), Some(Severity::Error));
    }
}
