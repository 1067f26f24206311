//! Registry test utilities

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use requirements_lint::parser::types::Role;
use requirements_lint::version::error::FetchError;
use requirements_lint::version::registry::Registry;
use requirements_lint::version::types::PackageVersions;

/// In-memory registry keyed by role location
#[derive(Default)]
pub struct FakeRegistry {
    versions: HashMap<String, Vec<String>>,
    failures: HashMap<String, String>,
    cancel_on: Option<(String, CancellationToken)>,
    calls: AtomicUsize,
    fetched: Mutex<Vec<String>>,
}

impl FakeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_versions(mut self, location: &str, versions: Vec<&str>) -> Self {
        self.versions.insert(
            location.to_string(),
            versions.into_iter().map(|v| v.to_string()).collect(),
        );
        self
    }

    /// Fail fetches of `location` with an invalid response carrying `detail`
    pub fn with_failure(mut self, location: &str, detail: &str) -> Self {
        self.failures
            .insert(location.to_string(), detail.to_string());
        self
    }

    /// Fire `token` while fetching `location`, as if Ctrl-C arrived mid-fetch
    pub fn cancel_on(mut self, location: &str, token: CancellationToken) -> Self {
        self.cancel_on = Some((location.to_string(), token));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl Registry for FakeRegistry {
    async fn fetch_all_versions(
        &self,
        role: &Role,
        cancel: &CancellationToken,
    ) -> Result<PackageVersions, FetchError> {
        let location = role.location().to_string();
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.fetched.lock().unwrap().push(location.clone());

        if let Some((trigger, token)) = &self.cancel_on
            && *trigger == location
        {
            token.cancel();
        }
        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled);
        }

        if let Some(detail) = self.failures.get(&location) {
            return Err(FetchError::InvalidResponse(detail.clone()));
        }
        match self.versions.get(&location) {
            Some(versions) => Ok(PackageVersions::new(versions.clone())),
            None => Err(FetchError::NotFound(location)),
        }
    }
}
