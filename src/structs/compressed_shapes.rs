//! # Compressed Shapes Module
//!
//! The result of collapsing two broadcast shapes: one fixed-length dimension
//! array per input plus the output, all innermost first.
//!
//! Produced by [`compress_broadcast_shapes`](crate::compress_broadcast_shapes).

use crate::MAX_TENSOR_DIMS;
use crate::aliases::CompressedDims;
use crate::enums::error::NdBinaryError;

/// # CompressedShapes
///
/// ## Description
/// Compressed dimension sizes for input #1, input #2 and the output.
///
/// ### Invariants
/// - `output[i] == max(input1[i], input2[i])` for every slot.
/// - At every slot each input is either `1` or equal to the output.
/// - Slots at or beyond `num_dims` hold `1` in all three arrays.
/// - `1 <= num_dims <= MAX_TENSOR_DIMS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressedShapes {
    pub input1: CompressedDims,
    pub input2: CompressedDims,
    pub output: CompressedDims,
    pub num_dims: usize,
}

impl Default for CompressedShapes {
    fn default() -> Self {
        Self {
            input1: [1; MAX_TENSOR_DIMS],
            input2: [1; MAX_TENSOR_DIMS],
            output: [1; MAX_TENSOR_DIMS],
            num_dims: 0,
        }
    }
}

impl CompressedShapes {
    /// Element count of input #1.
    #[inline]
    pub fn input1_len(&self) -> Result<usize, NdBinaryError> {
        checked_len(&self.input1)
    }

    /// Element count of input #2.
    #[inline]
    pub fn input2_len(&self) -> Result<usize, NdBinaryError> {
        checked_len(&self.input2)
    }

    /// Element count of the output.
    #[inline]
    pub fn output_len(&self) -> Result<usize, NdBinaryError> {
        checked_len(&self.output)
    }

    /// Same shapes with the two inputs exchanged.
    #[inline]
    pub fn swapped(&self) -> Self {
        Self {
            input1: self.input2,
            input2: self.input1,
            output: self.output,
            num_dims: self.num_dims,
        }
    }
}

fn checked_len(dims: &CompressedDims) -> Result<usize, NdBinaryError> {
    dims.iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .ok_or_else(|| NdBinaryError::Overflow {
            value: format!("{:?} elements", dims),
            target: "usize",
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lengths_multiply_all_slots() {
        let c = CompressedShapes {
            input1: [4, 1, 3, 1],
            input2: [4, 5, 1, 1],
            output: [4, 5, 3, 1],
            num_dims: 3,
        };
        assert_eq!(c.input1_len(), Ok(12));
        assert_eq!(c.input2_len(), Ok(20));
        assert_eq!(c.output_len(), Ok(60));
        assert_eq!(c.swapped().input1_len(), Ok(20));
    }

    #[test]
    fn test_length_overflow_is_an_error() {
        let c = CompressedShapes {
            input1: [4, 1 << 62, 1, 1],
            input2: [4, 1, 1, 1],
            output: [4, 1 << 62, 1, 1],
            num_dims: 2,
        };
        assert_eq!(c.input2_len(), Ok(4));
        assert!(matches!(c.input1_len(), Err(NdBinaryError::Overflow { target: "usize", .. })));
        assert!(matches!(c.output_len(), Err(NdBinaryError::Overflow { .. })));
    }
}
