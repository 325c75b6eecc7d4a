//! Scalar element kinds carried by captured vectors.
//!
//! A captured vector is stored as raw bytes plus an [`ElementType`] tag. The
//! tag fixes the element width and selects the comparison rule: integers
//! compare bytewise, floats compare within a ULP budget.

mod types;
mod ulp;

pub use types::{Element, ElementType};
pub(crate) use types::ne_array;
pub use ulp::{ulp_distance_f32, ulp_distance_f64, UlpFloat};
