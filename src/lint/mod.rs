//! Lint layer: classifies role declarations and decides their verdicts
//! - selector.rs: picks the registry a declaration is checked against
//! - reconciler.rs: compares the declared version with the published ones
//! - outcome.rs: verdict types and severities
//! - engine.rs: resolution engine and pipeline stages

pub mod engine;
pub mod outcome;
pub mod reconciler;
pub mod selector;

pub use engine::{Resolver, feed};
pub use outcome::{ClassifiedResult, Outcome, Severity};
