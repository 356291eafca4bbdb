//! # Aliases Module
//!
//! Fixed-capacity array aliases shared by the compressor, planner and executor.
//!
//! Everything here is bounded by [`MAX_TENSOR_DIMS`], so no shape or stride
//! bookkeeping needs a heap allocation.

use crate::MAX_TENSOR_DIMS;
use crate::structs::output_params::OutputParams;

/// Compressed dimension sizes, innermost first.
///
/// Slot `0` is the contiguous run handed to the microkernel, slot `3` the
/// outermost loop. Unused slots hold `1`.
pub type CompressedDims = [usize; MAX_TENSOR_DIMS];

/// Byte strides per compressed dimension, innermost first.
///
/// A `0` entry means the buffer does not advance along that dimension.
pub type ByteStrides = [usize; MAX_TENSOR_DIMS];

/// Iteration ranges of the three outer loops, outermost first.
pub type OuterRange = [usize; 3];

/// Tile sizes of the two inner outer loops.
pub type OuterTile = [usize; 2];

/// Clamp parameters for the only element type the operators support.
pub type F32OutputParams = OutputParams<f32>;
