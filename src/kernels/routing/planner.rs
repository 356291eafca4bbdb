// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # Stride & Kernel Planner
//!
//! Turns [`CompressedShapes`] into an [`ElementwiseBinaryPlan`]: the microkernel
//! variant, the operand order it needs, byte strides for both kernel operands and
//! the output, and the 3D tiled iteration space.

use crate::MAX_TENSOR_DIMS;
use crate::aliases::ByteStrides;
use crate::enums::error::NdBinaryError;
use crate::enums::kernel_variant::KernelVariant;
use crate::structs::compressed_shapes::CompressedShapes;
use crate::structs::plan::{ComputeDescriptor, ElementwiseBinaryPlan};

/// Picks the microkernel variant from the innermost compressed dimension.
///
/// # Panics
/// If neither input is `1` and the two sizes differ. Compression never
/// produces that, so it is a defect rather than bad input.
#[inline]
pub fn select_kernel_variant(shapes: &CompressedShapes) -> KernelVariant {
    let (n1, n2) = (shapes.input1[0], shapes.input2[0]);
    if n1 == 1 && n2 != 1 {
        KernelVariant::BroadcastFirst
    } else if n2 == 1 {
        KernelVariant::BroadcastSecond
    } else if n1 == n2 {
        KernelVariant::NoBroadcast
    } else {
        panic!(
            "select_kernel_variant: inconsistent compressed shapes, innermost sizes {} and {} neither match nor broadcast",
            n1, n2
        )
    }
}

/// Builds the execution plan for `shapes` with elements of `element_size` bytes.
///
/// Strides use the running product of each buffer's own compressed sizes,
/// accumulated independently for the two kernel operands and the output.
/// A buffer whose size at a slot is `1` gets stride `0` there.
///
/// Shapes are not validated again here.
///
/// # Errors
/// `Overflow` if the output's byte size exceeds `isize::MAX`, the largest
/// offset a pointer may be moved by.
pub fn plan_elementwise_binary(
    shapes: &CompressedShapes,
    element_size: usize,
) -> Result<ElementwiseBinaryPlan, NdBinaryError> {
    let overflow = || NdBinaryError::Overflow {
        value: format!("{:?} elements of {} bytes", shapes.output, element_size),
        target: "an isize byte offset",
    };
    shapes
        .output_len()
        .ok()
        .and_then(|n| n.checked_mul(element_size))
        .filter(|&total| total <= isize::MAX as usize)
        .ok_or_else(overflow)?;
    let bytes = |n: usize| n.checked_mul(element_size).ok_or_else(overflow);

    let variant = select_kernel_variant(shapes);
    let operand_order = variant.operand_order();
    let (a_shape, b_shape) = operand_order.normalize(&shapes.input1, &shapes.input2);
    let y_shape = &shapes.output;

    let mut a_stride: ByteStrides = [0; MAX_TENSOR_DIMS];
    let mut b_stride: ByteStrides = [0; MAX_TENSOR_DIMS];
    let mut y_stride: ByteStrides = [0; MAX_TENSOR_DIMS];

    // Slot 0 is the contiguous run.
    if a_shape[0] != 1 {
        a_stride[0] = element_size;
    }
    if b_shape[0] != 1 {
        b_stride[0] = element_size;
    }
    y_stride[0] = element_size;

    let (mut a_run, mut b_run, mut y_run) = (a_shape[0], b_shape[0], y_shape[0]);
    for i in 1..shapes.num_dims {
        if a_shape[i] != 1 {
            a_stride[i] = bytes(a_run)?;
        }
        if b_shape[i] != 1 {
            b_stride[i] = bytes(b_run)?;
        }
        y_stride[i] = bytes(y_run)?;
        a_run = a_run.checked_mul(a_shape[i]).ok_or_else(overflow)?;
        b_run = b_run.checked_mul(b_shape[i]).ok_or_else(overflow)?;
        y_run = y_run.checked_mul(y_shape[i]).ok_or_else(overflow)?;
    }

    Ok(ElementwiseBinaryPlan {
        shapes: *shapes,
        variant,
        operand_order,
        a_stride,
        b_stride,
        y_stride,
        elements: bytes(y_shape[0])?,
        compute: ComputeDescriptor {
            range: [y_shape[3], y_shape[2], y_shape[1]],
            tile: [1, 1],
        },
    })
}
