//! # Utilities - *Shape Validation Helpers*
//!
//! A small collection of helpers that validate caller shapes ahead of
//! compression and size buffers for them.

use crate::MAX_TENSOR_DIMS;
use crate::enums::error::NdBinaryError;

/// Rejects input pairs where either rank exceeds [`MAX_TENSOR_DIMS`].
#[inline]
pub fn validate_rank(input1_shape: &[usize], input2_shape: &[usize]) -> Result<(), NdBinaryError> {
    if input1_shape.len().max(input2_shape.len()) > MAX_TENSOR_DIMS {
        return Err(NdBinaryError::UnsupportedRank {
            input1_dims: input1_shape.len(),
            input2_dims: input2_shape.len(),
            max_dims: MAX_TENSOR_DIMS,
        });
    }
    Ok(())
}

/// Rejects shapes with a zero-sized dimension. `input` is the 1-based input number.
#[inline]
pub fn validate_shape_dims(input: usize, shape: &[usize]) -> Result<(), NdBinaryError> {
    match shape.iter().position(|&d| d == 0) {
        Some(dim) => Err(NdBinaryError::InvalidShape { input, dim }),
        None => Ok(()),
    }
}

/// Rejects a caller buffer whose length differs from the element count its shape implies.
#[inline]
pub fn validate_buffer_len(buffer: &'static str, expected: usize, found: usize) -> Result<(), NdBinaryError> {
    if expected != found {
        return Err(NdBinaryError::BufferLengthMismatch {
            buffer,
            expected,
            found,
        });
    }
    Ok(())
}

/// Number of elements described by `shape`, or `None` if it overflows `usize`.
/// An empty shape is a scalar.
#[inline]
pub fn num_elements(shape: &[usize]) -> Option<usize> {
    shape.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))
}

/// Computes the NumPy-style broadcast shape of two inputs.
///
/// Shapes are aligned from the trailing dimension and the shorter one is
/// padded with leading `1`s. Useful for sizing the output buffer before setup.
///
/// Rank and zero dimensions are checked first, as setup does.
///
/// ```text
/// broadcast_shape(&[2, 3, 4], &[3, 4])       -> [2, 3, 4]
/// broadcast_shape(&[8, 1, 6, 1], &[7, 1, 5]) -> [8, 7, 6, 5]
/// ```
pub fn broadcast_shape(input1_shape: &[usize], input2_shape: &[usize]) -> Result<Vec<usize>, NdBinaryError> {
    validate_rank(input1_shape, input2_shape)?;
    validate_shape_dims(1, input1_shape)?;
    validate_shape_dims(2, input2_shape)?;

    let rank = input1_shape.len().max(input2_shape.len());
    let pad1 = rank - input1_shape.len();
    let pad2 = rank - input2_shape.len();

    let mut out = Vec::with_capacity(rank);
    for i in 0..rank {
        let d1 = if i < pad1 { 1 } else { input1_shape[i - pad1] };
        let d2 = if i < pad2 { 1 } else { input2_shape[i - pad2] };
        let d = match (d1, d2) {
            (a, b) if a == b => a,
            (1, b) => b,
            (a, 1) => a,
            (a, b) => {
                return Err(NdBinaryError::ShapeMismatch {
                    input1_dim: i - pad1,
                    input1_size: a,
                    input2_dim: i - pad2,
                    input2_size: b,
                });
            }
        };
        out.push(d);
    }
    Ok(out)
}
