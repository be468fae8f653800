//! Domain-metrics engine for a restaurant back office: expiry and stock
//! classification, recipe costing, dish margin economics, and single-axis
//! menu-engineering categories, plus the repositories callers persist the
//! records through.
//!
//! The metrics themselves are pure functions over plain records; storage and
//! the clock stay at the edges.

pub mod analytics;
pub mod catalog;
pub mod error;
pub mod insights;
pub mod metrics;
pub mod model;
pub mod preview;
pub mod store;

pub use error::LedgerError;
pub use store::{Ledger, MemoryLedger, SqliteLedger};
