//! Version layer: fetching and comparing role versions
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐
//! │  Registry   │────▶│    Cache    │
//! │  (fetch)    │     │ (this run)  │
//! └─────────────┘     └─────────────┘
//!        │
//!        ▼
//! ┌─────────────┐     ┌─────────────┐
//! │ Registries  │     │   Semver    │
//! │(git,galaxy) │     │ (ordering)  │
//! └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`cache`]: In-memory fetch cache keyed by fingerprint
//! - [`registry`]: Registry trait for fetching versions from upstream sources
//! - [`registries`]: Concrete registry implementations (Git, Galaxy)
//! - [`error`]: Error type for upstream fetches
//! - [`semver`]: Lenient semver parsing and ordering
//! - [`types`]: Common types like `PackageVersions`

pub mod cache;
pub mod error;
pub mod registries;
pub mod registry;
pub mod semver;
pub mod types;
