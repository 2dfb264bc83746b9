//! CLI command implementations.

pub mod cancel;
pub mod common;
pub mod resources;
pub mod result;
pub mod run;
pub mod status;
pub mod version;
