//! `search-dash` library crate.
//!
//! The binary (`sdash`) is a thin wrapper around this library, so parsing,
//! deriving and simulation logic are testable without spawning processes.

pub mod app;
pub mod cli;
pub mod data;
pub mod derive;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod plot;
pub mod report;
pub mod sim;
pub mod tui;
