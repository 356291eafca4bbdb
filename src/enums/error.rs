//! # Error Module - Custom *ndbinary* Error Type
//!
//! Defines the unified error type for operator creation, setup and execution.
//!
//! ## Features
//! - Covers uninitialised contexts, operator type mismatches, unsupported ranks,
//! zero-sized dimensions, non-broadcastable shapes, undersized buffers and
//! shapes too large to address.
//! - Implements `Display` for readable output and `Error` for integration
//! with standard Rust error handling.
//!
//! Internal inconsistencies in the planner are not represented here. They
//! indicate a broken compression invariant and panic instead.

use std::error::Error;
use std::fmt;

use crate::enums::operator_type::OperatorType;

/// Catch all error type for `ndbinary`
#[derive(Debug, Clone, PartialEq)]
pub enum NdBinaryError {
    /// The [`Context`](crate::Context) backing the operator has been shut down.
    Uninitialized,
    OperatorTypeMismatch {
        expected: OperatorType,
        found: OperatorType,
    },
    UnsupportedRank {
        input1_dims: usize,
        input2_dims: usize,
        max_dims: usize,
    },
    /// `input` is 1-based, `dim` indexes the caller's shape.
    InvalidShape {
        input: usize,
        dim: usize,
    },
    /// Dimension indices refer to each caller shape, not the aligned position.
    ShapeMismatch {
        input1_dim: usize,
        input1_size: usize,
        input2_dim: usize,
        input2_size: usize,
    },
    InvalidParameter {
        message: String,
    },
    BufferLengthMismatch {
        buffer: &'static str,
        expected: usize,
        found: usize,
    },
    /// `value` cannot be represented as `target`.
    Overflow {
        value: String,
        target: &'static str,
    },
}

impl fmt::Display for NdBinaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NdBinaryError::Uninitialized => {
                write!(f, "Uninitialized: the operator context has not been initialised or was shut down.")
            }
            NdBinaryError::OperatorTypeMismatch { expected, found } => {
                write!(
                    f,
                    "Operator type mismatch: expected {} operator, found {}.",
                    expected, found
                )
            }
            NdBinaryError::UnsupportedRank {
                input1_dims,
                input2_dims,
                max_dims,
            } => {
                write!(
                    f,
                    "Unsupported rank: {} and {} dimensions in input shapes, the number of input dimensions must not exceed {}.",
                    input1_dims, input2_dims, max_dims
                )
            }
            NdBinaryError::InvalidShape { input, dim } => {
                write!(f, "Invalid shape: shape dimension #{} of input #{} is zero.", dim, input)
            }
            NdBinaryError::ShapeMismatch {
                input1_dim,
                input1_size,
                input2_dim,
                input2_size,
            } => {
                write!(
                    f,
                    "Shape mismatch: shape dimension #{} of input1 ({}) does not match shape dimension #{} of input2 ({}).",
                    input1_dim, input1_size, input2_dim, input2_size
                )
            }
            NdBinaryError::InvalidParameter { message } => {
                write!(f, "Invalid parameter: {}", message)
            }
            NdBinaryError::BufferLengthMismatch {
                buffer,
                expected,
                found,
            } => {
                write!(
                    f,
                    "Buffer length mismatch for {}: expected {} elements, found {}.",
                    buffer, expected, found
                )
            }
            NdBinaryError::Overflow { value, target } => {
                write!(f, "Overflow: {} cannot be represented as {}.", value, target)
            }
        }
    }
}

impl Error for NdBinaryError {}
