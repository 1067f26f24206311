//! Remote Git repository registry implementation
//!
//! Tags are read from the remote's ref advertisement through a detached
//! remote, so nothing is written to disk and no objects are kept between calls.

use git2::{Cred, CredentialType, Direction, Remote, RemoteCallbacks};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::parser::types::Role;
use crate::version::error::FetchError;
use crate::version::registry::Registry;
use crate::version::types::PackageVersions;

const TAG_PREFIX: &str = "refs/tags/";

/// Suffix of the peeled entry the remote advertises for each annotated tag
const PEELED_SUFFIX: &str = "^{}";

/// Give up on authentication after this many credential requests
const MAX_CREDENTIAL_ATTEMPTS: usize = 3;

/// Registry implementation listing the tags of remote Git repositories
#[derive(Debug, Clone, Default)]
pub struct GitRegistry;

impl GitRegistry {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl Registry for GitRegistry {
    async fn fetch_all_versions(
        &self,
        role: &Role,
        cancel: &CancellationToken,
    ) -> Result<PackageVersions, FetchError> {
        let url = remote_url(&role.source).to_string();
        debug!("Listing tags of {}", url);

        let listing = {
            let url = url.clone();
            let cancel = cancel.clone();
            tokio::task::spawn_blocking(move || list_tags(&url, &cancel))
        };

        // The blocking listing cannot be interrupted, it is abandoned instead
        let tags = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(FetchError::Cancelled),
            joined = listing => joined.map_err(|e| {
                FetchError::InvalidResponse(format!("tag listing of {} failed: {}", url, e))
            })??,
        };

        info!("Found {} tags for {}", tags.len(), url);
        Ok(PackageVersions::new(tags))
    }
}

/// ansible-galaxy accepts `git+https://...` style sources
fn remote_url(source: &str) -> &str {
    source.strip_prefix("git+").unwrap_or(source)
}

/// Connect to the remote and return the short names of all advertised tags
fn list_tags(url: &str, cancel: &CancellationToken) -> Result<Vec<String>, FetchError> {
    let git_error = |source: git2::Error| FetchError::Git {
        url: url.to_string(),
        source,
    };

    let mut remote = Remote::create_detached(url).map_err(git_error)?;
    let connection = remote
        .connect_auth(Direction::Fetch, Some(credential_callbacks(cancel)), None)
        .map_err(git_error)?;

    let mut tags = Vec::new();
    for head in connection.list().map_err(git_error)? {
        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled);
        }

        let Some(tag) = head.name().strip_prefix(TAG_PREFIX) else {
            continue;
        };
        if tag.ends_with(PEELED_SUFFIX) {
            continue;
        }
        tags.push(tag.to_string());
    }

    Ok(tags)
}

/// Credentials for private repositories: the SSH agent, then git's defaults.
///
/// The credentials and sideband callbacks also check `cancel`, so a cancelled
/// listing aborts the next time libgit2 calls back.
fn credential_callbacks(cancel: &CancellationToken) -> RemoteCallbacks<'static> {
    let mut attempts = 0;
    let mut callbacks = RemoteCallbacks::new();

    let progress_cancel = cancel.clone();
    callbacks.sideband_progress(move |_| !progress_cancel.is_cancelled());

    let cancel = cancel.clone();
    callbacks.credentials(move |_url, username_from_url, allowed_types| {
        if cancel.is_cancelled() {
            return Err(git2::Error::from_str("cancelled"));
        }
        attempts += 1;
        if attempts > MAX_CREDENTIAL_ATTEMPTS {
            return Err(git2::Error::from_str("authentication failed"));
        }

        if allowed_types.contains(CredentialType::SSH_KEY) {
            return Cred::ssh_key_from_agent(username_from_url.unwrap_or("git"));
        }

        if allowed_types.contains(CredentialType::DEFAULT) {
            return Cred::default();
        }

        Err(git2::Error::from_str("no valid credentials found"))
    });

    callbacks
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::time::{Duration, Instant};

    use git2::{Repository, Signature};
    use rstest::rstest;
    use tempfile::TempDir;

    /// Create a repository with one lightweight and one annotated tag
    fn create_tagged_repository() -> TempDir {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let signature = Signature::now("test", "test@example.com").unwrap();

        let tree_id = repo.index().unwrap().write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let commit_id = repo
            .commit(Some("HEAD"), &signature, &signature, "initial", &tree, &[])
            .unwrap();
        let commit = repo.find_object(commit_id, None).unwrap();

        repo.tag_lightweight("v1.0.0", &commit, false).unwrap();
        repo.tag("v1.1.0", &commit, &signature, "release 1.1.0", false)
            .unwrap();

        dir
    }

    fn git_role(source: &str) -> Role {
        Role {
            source: source.to_string(),
            scm: "git".to_string(),
            ..Default::default()
        }
    }

    #[rstest]
    #[case("git+https://github.com/test/role.git", "https://github.com/test/role.git")]
    #[case("https://github.com/test/role", "https://github.com/test/role")]
    #[case("git@github.com:test/role.git", "git@github.com:test/role.git")]
    fn remote_url_strips_git_plus_prefix(#[case] source: &str, #[case] expected: &str) {
        assert_eq!(remote_url(source), expected);
    }

    #[tokio::test]
    async fn fetch_all_versions_lists_tag_short_names() {
        let repo_dir = create_tagged_repository();
        let source = repo_dir.path().to_str().unwrap();

        let registry = GitRegistry::new();
        let result = registry
            .fetch_all_versions(&git_role(source), &CancellationToken::new())
            .await
            .unwrap();

        let mut tags = result.to_vec();
        tags.sort();
        assert_eq!(tags, vec!["v1.0.0", "v1.1.0"]);
    }

    #[tokio::test]
    async fn fetch_all_versions_returns_git_error_for_missing_repository() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("missing");

        let registry = GitRegistry::new();
        let result = registry
            .fetch_all_versions(
                &git_role(source.to_str().unwrap()),
                &CancellationToken::new(),
            )
            .await;

        let err = result.unwrap_err();
        assert!(matches!(err, FetchError::Git { .. }));
        assert!(err.to_string().contains("missing"));
    }

    #[tokio::test]
    async fn fetch_all_versions_stops_when_cancelled() {
        let repo_dir = create_tagged_repository();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let registry = GitRegistry::new();
        let result = registry
            .fetch_all_versions(&git_role(repo_dir.path().to_str().unwrap()), &cancel)
            .await;

        assert!(matches!(result, Err(FetchError::Cancelled)));
    }

    #[test]
    fn list_tags_reports_cancellation_instead_of_partial_data() {
        let repo_dir = create_tagged_repository();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = list_tags(repo_dir.path().to_str().unwrap(), &cancel);

        assert!(matches!(result, Err(FetchError::Cancelled)));
    }

    /// Accepts connections and never answers them
    fn stalled_remote() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        std::thread::spawn(move || {
            let mut held = Vec::new();
            for stream in listener.incoming().flatten() {
                held.push(stream);
            }
        });
        format!("http://127.0.0.1:{}/role.git", port)
    }

    #[test]
    fn cancelled_listing_of_stalled_remote_does_not_block_shutdown() {
        let source = stalled_remote();
        let started = Instant::now();

        let result = crate::pipeline::block_on(async move {
            let cancel = CancellationToken::new();
            let trigger = cancel.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(300)).await;
                trigger.cancel();
            });
            GitRegistry::new()
                .fetch_all_versions(&git_role(&source), &cancel)
                .await
        })
        .unwrap();

        assert!(matches!(result, Err(FetchError::Cancelled)));
        assert!(started.elapsed() < Duration::from_secs(10));
    }
}
