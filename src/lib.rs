//! SIMD Oracle - differential testing of vector operations across back-ends.
//!
//! A vector library may implement the same operation on many instruction
//! sets, emulating missing instructions where needed. This crate records the
//! values each back-end computes and compares the records of two back-ends,
//! allowing for floating-point rounding and for back-ends that skip tests.
//!
//! # Architecture
//!
//! - [`element`] - Element type tags and ULP distance
//! - [`results`] - Result records and the per-run results set
//! - [`compare`] - Lockstep comparator and mismatch diagnostics
//! - [`suite`] - Pass/fail tally over many comparisons
//! - [`arch`] - All results of one back-end, compared case by case
//! - [`snapshot`] - JSON persistence of a back-end's results
//! - [`report`] - Human and machine readable mismatch reports
//! - [`error`] - Recoverable errors
//!
//! # Example
//!
//! ```
//! use simd_oracle::{results_equal, ResultsSet};
//!
//! let mut sse2 = ResultsSet::new("sqrt");
//! sse2.push_values(&[1.0f32, 2.0, 3.0, 4.0], file!(), line!());
//!
//! let mut neon = ResultsSet::new("sqrt");
//! neon.set_precision(2);
//! neon.push_values(&[1.0f32, 2.0, 3.0, 4.0000005], file!(), line!());
//!
//! let mut diagnostics = String::new();
//! assert!(results_equal(&sse2, "sse2", &neon, "neon", &mut diagnostics));
//! assert!(diagnostics.is_empty());
//! ```

// Mismatches are data and must never abort a run, so library code
// propagates instead of unwrapping.
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(missing_docs)]

pub mod arch;
pub mod compare;
pub mod element;
pub mod error;
pub mod report;
pub mod results;
pub mod snapshot;
pub mod suite;

// Re-export commonly used types
pub use arch::{compare_archs, ArchResults};
pub use compare::{
    results_equal, Category, CompareOptions, Comparator, Diagnostic, DiagnosticSink,
    ToleranceRule,
};
pub use element::{Element, ElementType};
pub use error::{OracleError, OracleResult};
pub use report::MismatchReport;
pub use results::{Policy, ResultRecord, ResultsSet, SourceLocation};
pub use suite::TestSuite;
