//! Parser layer
//! - traits.rs: Parser trait definition
//! - types.rs: Common types (Role, Entry)
//! - requirements.rs: requirements.yml / meta/main.yml parser
//! - loader.rs: reads files from disk and follows includes

pub mod loader;
pub mod requirements;
pub mod traits;
pub mod types;

pub use loader::{LoadError, load_roles};
pub use requirements::RequirementsParser;
pub use traits::{ParseError, Parser};
pub use types::{Entry, RegistryType, Role};
