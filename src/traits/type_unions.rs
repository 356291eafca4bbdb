//! # Type Unions Module
//!
//! Element type bounds for the generic microkernel bodies.

use std::fmt::Debug;

use num_traits::Float as NumFloat;

/// Trait for types valid as float elements in the binary microkernels.
///
/// Useful when specifying `my_fn::<T: Float>() {}`.
///
/// Extends and constrains the *num-traits* `Float` implementation to fit the crate's type universe.
/// Only `f32` operators are exposed, the bound keeps kernel bodies independent of it.
pub trait Float: NumFloat + Copy + Default + Debug + Send + Sync + 'static {}
impl Float for f32 {}
impl Float for f64 {}
