// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # Broadcast Shape Compression
//!
//! Collapses two trailing-aligned broadcast shapes into at most
//! [`MAX_TENSOR_DIMS`] compressed dimensions.
//!
//! Neighbouring dimensions merge when they broadcast the same way: both inputs
//! advance (exact match), only input #2 advances (input #1 broadcast), or only
//! input #1 advances (input #2 broadcast). Size-1 pairs vanish. The result
//! bounds the executor to three outer loops around one contiguous run,
//! whatever the caller's rank.

use crate::MAX_TENSOR_DIMS;
use crate::enums::error::NdBinaryError;
use crate::structs::compressed_shapes::CompressedShapes;
use crate::utils::{validate_rank, validate_shape_dims};

/// How the compressed dimension currently being filled broadcasts.
///
/// A run is exactly one of these, so a single compressed dimension can never
/// broadcast both inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Run {
    /// No non-unit dimension seen yet.
    Start,
    Exact,
    BroadcastInput1,
    BroadcastInput2,
}

/// Compresses `input1_shape` and `input2_shape` under NumPy broadcasting rules.
///
/// Shapes are given outermost first, as callers write them. The returned
/// arrays are innermost first.
///
/// # Errors
/// - `UnsupportedRank` if either shape has more than [`MAX_TENSOR_DIMS`] dimensions.
/// - `InvalidShape` if either shape contains a zero dimension.
/// - `ShapeMismatch` if two aligned dimensions differ and neither is `1`.
/// - `Overflow` if the broadcast element count does not fit in `usize`.
///
/// The first three are raised before any compressed state is produced.
pub fn compress_broadcast_shapes(
    input1_shape: &[usize],
    input2_shape: &[usize],
) -> Result<CompressedShapes, NdBinaryError> {
    validate_rank(input1_shape, input2_shape)?;
    validate_shape_dims(1, input1_shape)?;
    validate_shape_dims(2, input2_shape)?;

    let n1 = input1_shape.len();
    let n2 = input2_shape.len();
    let overflow = || NdBinaryError::Overflow {
        value: format!("{:?} x {:?} elements", input1_shape, input2_shape),
        target: "usize",
    };

    let mut c = CompressedShapes::default();
    let mut run = Run::Start;

    for i in 1..=n1.min(n2) {
        let d1 = input1_shape[n1 - i];
        let d2 = input2_shape[n2 - i];
        if d1 == 1 && d2 == 1 {
            continue;
        }

        // Per-input growth of the current slot.
        let (next, f1, f2) = if d1 == 1 {
            (Run::BroadcastInput1, 1, d2)
        } else if d2 == 1 {
            (Run::BroadcastInput2, d1, 1)
        } else if d1 == d2 {
            (Run::Exact, d1, d2)
        } else {
            return Err(NdBinaryError::ShapeMismatch {
                input1_dim: n1 - i,
                input1_size: d1,
                input2_dim: n2 - i,
                input2_size: d2,
            });
        };

        if next != run {
            run = next;
            c.num_dims += 1;
        }
        let slot = c.num_dims - 1;
        c.input1[slot] = c.input1[slot].checked_mul(f1).ok_or_else(overflow)?;
        c.input2[slot] = c.input2[slot].checked_mul(f2).ok_or_else(overflow)?;
        c.output[slot] = c.output[slot].checked_mul(f1.max(f2)).ok_or_else(overflow)?;
    }

    // Leading dimensions only one input has. The other input is broadcast
    // along them, so they extend a run that already broadcasts it.
    if n1 > n2 {
        if run != Run::BroadcastInput2 {
            c.num_dims += 1;
        }
        let slot = c.num_dims - 1;
        for &d in &input1_shape[..n1 - n2] {
            c.input1[slot] = c.input1[slot].checked_mul(d).ok_or_else(overflow)?;
            c.output[slot] = c.output[slot].checked_mul(d).ok_or_else(overflow)?;
        }
    } else if n2 > n1 {
        if run != Run::BroadcastInput1 {
            c.num_dims += 1;
        }
        let slot = c.num_dims - 1;
        for &d in &input2_shape[..n2 - n1] {
            c.input2[slot] = c.input2[slot].checked_mul(d).ok_or_else(overflow)?;
            c.output[slot] = c.output[slot].checked_mul(d).ok_or_else(overflow)?;
        }
    }

    // Each slot fits on its own, the product across slots may not. Inputs
    // never exceed the output slotwise, so this bounds all three counts.
    c.output_len().map_err(|_| overflow())?;

    c.num_dims = c.num_dims.max(1);
    debug_assert!(c.num_dims <= MAX_TENSOR_DIMS);
    Ok(c)
}
