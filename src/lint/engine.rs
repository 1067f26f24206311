//! Resolution engine: turns a stream of role declarations into lint results
//!
//! The engine owns the fetch cache and processes one declaration at a time,
//! so results leave in the order declarations arrived.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::LintConfig;
use crate::lint::outcome::{ClassifiedResult, Outcome};
use crate::lint::reconciler::reconcile;
use crate::lint::selector::{Selection, select};
use crate::parser::types::{RegistryType, Role};
use crate::version::cache::{Cache, CachedFetch, FetchFailure, Fingerprint};
use crate::version::error::FetchError;
use crate::version::registries::{GalaxyRegistry, GitRegistry};
use crate::version::registry::Registry;

/// Resolves role declarations against their upstream registries
pub struct Resolver {
    git: Arc<dyn Registry>,
    galaxy: Arc<dyn Registry>,
    cache: Cache,
}

impl Resolver {
    pub fn new(git: Arc<dyn Registry>, galaxy: Arc<dyn Registry>) -> Self {
        Self {
            git,
            galaxy,
            cache: Cache::new(),
        }
    }

    /// Resolver backed by the real Git and Galaxy registries
    pub fn from_config(config: &LintConfig) -> Self {
        Self::new(
            Arc::new(GitRegistry::new()),
            Arc::new(GalaxyRegistry::new(config.galaxy_url())),
        )
    }

    fn registry(&self, registry_type: RegistryType) -> &Arc<dyn Registry> {
        match registry_type {
            RegistryType::Git => &self.git,
            RegistryType::Galaxy => &self.galaxy,
        }
    }

    /// Decide the outcome for a single declaration.
    ///
    /// Upstream failures become [`Outcome::UpstreamError`]; the only error
    /// returned is [`FetchError::Cancelled`].
    pub async fn resolve(
        &mut self,
        role: &Role,
        cancel: &CancellationToken,
    ) -> Result<Outcome, FetchError> {
        let registry_type = match select(role) {
            Selection::Archive => {
                debug!("{}: archive, skipping", role.display_name());
                return Ok(Outcome::UndetectableArchive);
            }
            Selection::UnknownScm(scm) => {
                debug!("{}: unknown scm {}", role.display_name(), scm);
                return Ok(Outcome::UnknownSourceType { scm });
            }
            Selection::Registry(registry_type) => registry_type,
        };
        debug!(
            "{}: checking against {}",
            role.display_name(),
            registry_type.as_str()
        );

        let fingerprint = Fingerprint::of(registry_type, role);
        let fetched = match self.cache.get(fingerprint) {
            Some(fetched) => {
                debug!("Cache hit for {} ({})", role.location(), fingerprint);
                fetched.clone()
            }
            None => {
                let fetched = self.fetch(registry_type, role, cancel).await?;
                self.cache.insert(fingerprint, fetched.clone());
                fetched
            }
        };

        Ok(match fetched {
            Ok(available) => reconcile(&role.version, &available),
            Err(FetchFailure { detail, not_found }) => {
                Outcome::UpstreamError { detail, not_found }
            }
        })
    }

    async fn fetch(
        &self,
        registry_type: RegistryType,
        role: &Role,
        cancel: &CancellationToken,
    ) -> Result<CachedFetch, FetchError> {
        let fetched = match self
            .registry(registry_type)
            .fetch_all_versions(role, cancel)
            .await
        {
            Ok(versions) if versions.is_empty() => {
                Err(FetchError::NoVersions(role.location().to_string()))
            }
            Ok(versions) => Ok(versions),
            Err(e) if e.is_cancelled() => return Err(e),
            Err(e) => Err(e),
        };

        Ok(fetched.map_err(|e| {
            info!("Fetching versions of {} failed: {}", role.location(), e);
            FetchFailure::from(&e)
        }))
    }

    /// Pipeline worker: resolves every declaration received on `roles` and
    /// sends the results in the same order.
    ///
    /// Stops when `roles` is exhausted, when the result receiver goes away or
    /// when `cancel` fires; nothing is sent for a declaration interrupted by
    /// cancellation. `results` is closed on return.
    pub async fn run(
        mut self,
        mut roles: mpsc::Receiver<Role>,
        results: mpsc::Sender<ClassifiedResult>,
        cancel: CancellationToken,
    ) {
        loop {
            if cancel.is_cancelled() {
                break;
            }

            let role = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                role = roles.recv() => match role {
                    Some(role) => role,
                    None => break,
                },
            };

            let outcome = match self.resolve(&role, &cancel).await {
                Ok(outcome) => outcome,
                Err(_) => break,
            };
            if cancel.is_cancelled() {
                break;
            }

            if results
                .send(ClassifiedResult::new(role, outcome))
                .await
                .is_err()
            {
                debug!("Result receiver dropped, stopping");
                break;
            }
        }

        if cancel.is_cancelled() {
            info!("Resolution cancelled");
        }
        debug!("Resolved with {} cached fetches", self.cache.len());
    }
}

/// Pipeline producer: feeds declarations to the worker in manifest order
pub async fn feed(roles: Vec<Role>, tx: mpsc::Sender<Role>, cancel: CancellationToken) {
    for role in roles {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            sent = tx.send(role) => {
                if sent.is_err() {
                    return;
                }
            }
        }
    }
}
