pub mod config;
pub mod lint;
pub mod parser;
pub mod pipeline;
pub mod report;
pub mod version;
