// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # Compute Module
//!
//! The per-task body a scheduler invokes for every `(i, j, k)` of an
//! elementwise binary plan.

use crate::aliases::{ByteStrides, F32OutputParams};
use crate::kernels::vbinary::VBinaryUKernelFn;

/// Raw, byte-addressed view of one prepared elementwise binary execution.
///
/// Built by [`ElementwiseBinaryContext::run`](crate::ElementwiseBinaryContext::run)
/// from borrowed buffers that outlive the scheduler call.
#[derive(Clone, Copy)]
pub struct ElementwiseBinaryTask {
    pub a: *const u8,
    pub b: *const u8,
    pub y: *mut u8,
    pub a_stride: ByteStrides,
    pub b_stride: ByteStrides,
    pub y_stride: ByteStrides,
    pub elements: usize,
    pub params: F32OutputParams,
    pub ukernel: VBinaryUKernelFn,
}

// SAFETY: every task writes the output run at its own `(i, j, k)` offset and the
// output strides are the running products of the output shape, so runs written
// by different tasks never overlap. Inputs are only read.
unsafe impl Send for ElementwiseBinaryTask {}
unsafe impl Sync for ElementwiseBinaryTask {}

/// Runs the microkernel for outer coordinate `(i, j, k)`.
///
/// `i` walks compressed dimension 3, `j` dimension 2 and `k` dimension 1.
/// Binary plans tile `j` and `k` by one, so `j_range` and `k_range` are always `1`.
///
/// # Safety
/// The coordinate must lie inside the plan's compute range and the task's
/// pointers must address buffers at least as large as the plan describes.
#[inline]
pub unsafe fn compute_elementwise_binary_3d(
    task: &ElementwiseBinaryTask,
    i: usize,
    j: usize,
    k: usize,
    j_range: usize,
    k_range: usize,
) {
    debug_assert_eq!(j_range, 1);
    debug_assert_eq!(k_range, 1);

    let a_offset = i * task.a_stride[3] + j * task.a_stride[2] + k * task.a_stride[1];
    let b_offset = i * task.b_stride[3] + j * task.b_stride[2] + k * task.b_stride[1];
    let y_offset = i * task.y_stride[3] + j * task.y_stride[2] + k * task.y_stride[1];
    unsafe {
        let a = task.a.add(a_offset).cast::<f32>();
        let b = task.b.add(b_offset).cast::<f32>();
        let y = task.y.add(y_offset).cast::<f32>();
        (task.ukernel)(task.elements, a, b, y, &task.params);
    }
}
