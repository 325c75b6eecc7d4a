//! Capture side of the oracle: records and the per-run results set.
//!
//! A harness creates one [`ResultsSet`] per (test case, back-end) pair,
//! pushes a [`ResultRecord`] for every computed vector and marks sync points
//! with [`ResultsSet::sync_archs`]. The finished set is handed read-only to
//! the comparator.

mod record;
mod set;

pub use record::{Policy, ResultRecord, SourceLocation};
pub use set::ResultsSet;
