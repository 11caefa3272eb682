//! Configuration module for the dexsprite build
//!
//! Provides types and parsing for `dexsprite.toml` project configuration.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
