//! Registry implementations for fetching role versions

pub mod galaxy;
pub mod git;

pub use galaxy::GalaxyRegistry;
pub use git::GitRegistry;
