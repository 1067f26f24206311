//! Registry trait for fetching role versions from upstream sources

#[cfg(test)]
use mockall::automock;
use tokio_util::sync::CancellationToken;

use crate::parser::types::Role;
use crate::version::error::FetchError;
use crate::version::types::PackageVersions;

/// Trait for fetching the versions published for a role
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Registry: Send + Sync {
    /// Fetches every version tag known upstream for the role
    ///
    /// # Arguments
    /// * `role` - The declaration to look up
    /// * `cancel` - Aborts the fetch; the call then fails with `FetchError::Cancelled`
    ///
    /// # Returns
    /// * `Ok(PackageVersions)` - Tags in upstream order
    /// * `Err(FetchError)` - If the fetch fails
    async fn fetch_all_versions(
        &self,
        role: &Role,
        cancel: &CancellationToken,
    ) -> Result<PackageVersions, FetchError>;
}
