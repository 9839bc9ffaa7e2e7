//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - input configuration enums (`DelimiterChoice`, `DateGrammar`, `EmptyCell`, `PanelKind`)
//! - normalized feed rows (`ObservationRecord`, `FeedDate`)
//! - the resolved run configuration (`DashConfig`)

pub mod types;

pub use types::*;
