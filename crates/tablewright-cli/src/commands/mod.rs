//! CLI command implementations.

pub mod config;
pub mod cursor;
pub mod derive;
pub mod plan;
pub mod rewrite;
pub mod schema;
pub mod version;
