//! Input/output helpers.
//!
//! - feed parsing + row classification (`ingest`)
//! - derived panel exports (CSV/JSON) (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
