use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("listing tags of {url}: {source}")]
    Git {
        url: String,
        #[source]
        source: git2::Error,
    },

    #[error("role not found: {0}")]
    NotFound(String),

    #[error("no versions published for {0}")]
    NoVersions(String),

    #[error("invalid url {0}")]
    InvalidUrl(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("cancelled")]
    Cancelled,
}

impl FetchError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled)
    }
}
