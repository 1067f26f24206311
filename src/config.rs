use serde::Deserialize;

// =============================================================================
// Upstream-related constants
// =============================================================================

/// Base URL of the public Ansible Galaxy server
pub const DEFAULT_GALAXY_URL: &str = "https://galaxy.ansible.com";

/// Timeout for a single package-index request in milliseconds (10 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 10_000;

/// How long runtime shutdown waits for blocking upstream calls in milliseconds.
/// A Git listing stuck on a stalled remote is left behind after this.
pub const SHUTDOWN_GRACE_MS: u64 = 1_000;

/// Capacity of the declaration and result channels between pipeline stages
pub const CHANNEL_CAPACITY: usize = 16;

/// User agent sent with every upstream request
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Output format of the renderer
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Table,
}

/// Lint run configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct LintConfig {
    /// Base URL of the Galaxy API used for roles without a VCS source
    pub galaxy_url: String,
    pub format: OutputFormat,
    /// Also report roles that need no attention
    pub verbose: bool,
    pub color: bool,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            galaxy_url: DEFAULT_GALAXY_URL.to_string(),
            format: OutputFormat::default(),
            verbose: false,
            color: true,
        }
    }
}

impl LintConfig {
    /// Returns the Galaxy base URL, falling back to the public server when unset
    pub fn galaxy_url(&self) -> &str {
        let url = self.galaxy_url.trim();
        if url.is_empty() {
            DEFAULT_GALAXY_URL
        } else {
            url.trim_end_matches('/')
        }
    }
}
