// Public fallible APIs in this crate share one concrete error contract (`ZrankError`).
#![allow(
    clippy::missing_errors_doc,
    reason = "crate-wide fallible API uses one explicit error type; per-item boilerplate would duplicate contract"
)]

pub mod config;
pub mod error;
pub mod helper;
pub mod history;
pub mod index;
pub mod matching;
pub mod models;
pub mod rank;
pub mod sorter;
pub mod source;

pub use config::{BackendChoice, ZrankConfig};
pub use error::{Result, ZrankError};
pub use helper::{HelperCommand, HelperPolicy};
pub use index::{FrecencyIndex, QueryOutcome};
pub use models::{HistoryEntry, MatchSet, OrderKey, Query, RankedEntry, ResultRow};
pub use rank::Order;
pub use source::HistorySource;
