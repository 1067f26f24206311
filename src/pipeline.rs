//! Three-stage lint pipeline
//!
//! ```text
//! manifest roles ──▶ feed ──▶ Resolver::run ──▶ Renderer
//!                  (roles)               (results)
//! ```
//!
//! Both channels are bounded; closing either end winds the pipeline down.

use std::future::Future;
use std::io::{self, Write};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::{CHANNEL_CAPACITY, SHUTDOWN_GRACE_MS};
use crate::lint::engine::{Resolver, feed};
use crate::parser::types::Role;
use crate::report::{Renderer, Summary};

/// Lint `roles` and render the results to `out` as they are resolved.
///
/// Returns the summary of everything rendered. On cancellation the summary
/// only covers the results emitted before the token fired.
pub async fn run(
    roles: Vec<Role>,
    resolver: Resolver,
    renderer: &mut dyn Renderer,
    out: &mut (dyn Write + Send),
    cancel: CancellationToken,
) -> io::Result<Summary> {
    debug!("Linting {} roles", roles.len());
    let (role_tx, role_rx) = mpsc::channel(CHANNEL_CAPACITY);
    let (result_tx, result_rx) = mpsc::channel(CHANNEL_CAPACITY);

    let producer = tokio::spawn(feed(roles, role_tx, cancel.clone()));
    let worker = tokio::spawn(resolver.run(role_rx, result_tx, cancel));

    let summary = renderer.render(result_rx, out).await?;

    producer.await.map_err(io::Error::other)?;
    worker.await.map_err(io::Error::other)?;
    Ok(summary)
}

/// Drive `future` to completion on a fresh multi-thread runtime.
///
/// Blocking tasks still running once `future` is done (a Git listing
/// abandoned on cancellation) get [`SHUTDOWN_GRACE_MS`] to finish before the
/// runtime is torn down without them.
pub fn block_on<F: Future>(future: F) -> io::Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let output = runtime.block_on(future);
    runtime.shutdown_timeout(Duration::from_millis(SHUTDOWN_GRACE_MS));
    Ok(output)
}
