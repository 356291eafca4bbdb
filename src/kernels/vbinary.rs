// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # Binary Microkernels
//!
//! Innermost-run kernels for elementwise binary operations with output clamping.
//!
//! Each operation comes in three variants:
//! - `op`:   `y[i] = clamp(a[i] ∘ b[i])`
//! - `opc`:  `y[i] = clamp(a[i] ∘ b[0])`
//! - `ropc`: `y[i] = clamp(b[0] ∘ a[i])`
//!
//! and two tiers, a plain scalar loop and an unrolled loop over fixed-width
//! chunks that the compiler lowers to SIMD on targets that have it. The tier is
//! picked once per [`Context`](crate::Context).
//!
//! Kernels take their run length in **bytes** and raw pointers, since the
//! executor addresses buffers by byte strides.

use std::mem::size_of;
use std::slice;

use crate::aliases::F32OutputParams;
use crate::enums::kernel_variant::KernelVariant;
use crate::structs::output_params::OutputParams;
use crate::traits::type_unions::Float;

/// Width of the unrolled tier.
pub const UNROLL_LANES: usize = 8;

/// Signature shared by every `f32` binary microkernel.
///
/// # Safety
/// `a` and `y` must be valid for `n` bytes, `b` for `n` bytes under `op` and for one
/// element under `opc`/`ropc`. `y` must not overlap `a` or `b`.
pub type VBinaryUKernelFn = unsafe fn(usize, *const f32, *const f32, *mut f32, &F32OutputParams);

/// Arithmetic of a binary operation.
pub trait BinaryOp: Copy + Send + Sync + 'static {
    fn apply<T: Float>(a: T, b: T) -> T;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Multiply;

impl BinaryOp for Multiply {
    #[inline(always)]
    fn apply<T: Float>(a: T, b: T) -> T {
        a * b
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Add;

impl BinaryOp for Add {
    #[inline(always)]
    fn apply<T: Float>(a: T, b: T) -> T {
        a + b
    }
}

/// The three variants of one binary operation, as selected for this machine.
#[derive(Clone, Copy)]
pub struct VBinaryKernels {
    pub op: VBinaryUKernelFn,
    pub opc: VBinaryUKernelFn,
    pub ropc: VBinaryUKernelFn,
}

impl VBinaryKernels {
    pub fn scalar<O: BinaryOp>() -> Self {
        Self {
            op: vop_scalar::<f32, O>,
            opc: vopc_scalar::<f32, O>,
            ropc: vropc_scalar::<f32, O>,
        }
    }

    pub fn unrolled<O: BinaryOp>() -> Self {
        Self {
            op: vop_unrolled::<f32, O>,
            opc: vopc_unrolled::<f32, O>,
            ropc: vropc_unrolled::<f32, O>,
        }
    }

    /// Kernel function for `variant`.
    #[inline]
    pub fn resolve(&self, variant: KernelVariant) -> VBinaryUKernelFn {
        match variant {
            KernelVariant::NoBroadcast => self.op,
            KernelVariant::BroadcastFirst => self.ropc,
            KernelVariant::BroadcastSecond => self.opc,
        }
    }
}

#[inline(always)]
fn run_len<T>(n: usize) -> usize {
    debug_assert!(n != 0);
    debug_assert_eq!(n % size_of::<T>(), 0);
    n / size_of::<T>()
}

/// `y[i] = clamp(a[i] ∘ b[i])`, one element at a time.
///
/// # Safety
/// See [`VBinaryUKernelFn`].
pub unsafe fn vop_scalar<T: Float, O: BinaryOp>(
    n: usize,
    a: *const T,
    b: *const T,
    y: *mut T,
    params: &OutputParams<T>,
) {
    let len = run_len::<T>(n);
    let (a, b, y) = unsafe {
        (
            slice::from_raw_parts(a, len),
            slice::from_raw_parts(b, len),
            slice::from_raw_parts_mut(y, len),
        )
    };
    for ((y, &a), &b) in y.iter_mut().zip(a).zip(b) {
        *y = params.clamp(O::apply(a, b));
    }
}

/// `y[i] = clamp(a[i] ∘ b[0])`, one element at a time.
///
/// # Safety
/// See [`VBinaryUKernelFn`].
pub unsafe fn vopc_scalar<T: Float, O: BinaryOp>(
    n: usize,
    a: *const T,
    b: *const T,
    y: *mut T,
    params: &OutputParams<T>,
) {
    let len = run_len::<T>(n);
    let (a, b, y) = unsafe { (slice::from_raw_parts(a, len), *b, slice::from_raw_parts_mut(y, len)) };
    for (y, &a) in y.iter_mut().zip(a) {
        *y = params.clamp(O::apply(a, b));
    }
}

/// `y[i] = clamp(b[0] ∘ a[i])`, one element at a time.
///
/// # Safety
/// See [`VBinaryUKernelFn`].
pub unsafe fn vropc_scalar<T: Float, O: BinaryOp>(
    n: usize,
    a: *const T,
    b: *const T,
    y: *mut T,
    params: &OutputParams<T>,
) {
    let len = run_len::<T>(n);
    let (a, b, y) = unsafe { (slice::from_raw_parts(a, len), *b, slice::from_raw_parts_mut(y, len)) };
    for (y, &a) in y.iter_mut().zip(a) {
        *y = params.clamp(O::apply(b, a));
    }
}

/// Unrolled `op`: full [`UNROLL_LANES`] chunks, then the tail.
///
/// # Safety
/// See [`VBinaryUKernelFn`].
pub unsafe fn vop_unrolled<T: Float, O: BinaryOp>(
    n: usize,
    a: *const T,
    b: *const T,
    y: *mut T,
    params: &OutputParams<T>,
) {
    let len = run_len::<T>(n);
    let (a, b, y) = unsafe {
        (
            slice::from_raw_parts(a, len),
            slice::from_raw_parts(b, len),
            slice::from_raw_parts_mut(y, len),
        )
    };

    let mut yc = y.chunks_exact_mut(UNROLL_LANES);
    let mut ac = a.chunks_exact(UNROLL_LANES);
    let mut bc = b.chunks_exact(UNROLL_LANES);
    for ((yv, av), bv) in (&mut yc).zip(&mut ac).zip(&mut bc) {
        for l in 0..UNROLL_LANES {
            yv[l] = params.clamp(O::apply(av[l], bv[l]));
        }
    }
    for ((y, &a), &b) in yc.into_remainder().iter_mut().zip(ac.remainder()).zip(bc.remainder()) {
        *y = params.clamp(O::apply(a, b));
    }
}

/// Unrolled `opc`.
///
/// # Safety
/// See [`VBinaryUKernelFn`].
pub unsafe fn vopc_unrolled<T: Float, O: BinaryOp>(
    n: usize,
    a: *const T,
    b: *const T,
    y: *mut T,
    params: &OutputParams<T>,
) {
    let len = run_len::<T>(n);
    let (a, b, y) = unsafe { (slice::from_raw_parts(a, len), *b, slice::from_raw_parts_mut(y, len)) };

    let mut yc = y.chunks_exact_mut(UNROLL_LANES);
    let mut ac = a.chunks_exact(UNROLL_LANES);
    for (yv, av) in (&mut yc).zip(&mut ac) {
        for l in 0..UNROLL_LANES {
            yv[l] = params.clamp(O::apply(av[l], b));
        }
    }
    for (y, &a) in yc.into_remainder().iter_mut().zip(ac.remainder()) {
        *y = params.clamp(O::apply(a, b));
    }
}

/// Unrolled `ropc`.
///
/// # Safety
/// See [`VBinaryUKernelFn`].
pub unsafe fn vropc_unrolled<T: Float, O: BinaryOp>(
    n: usize,
    a: *const T,
    b: *const T,
    y: *mut T,
    params: &OutputParams<T>,
) {
    let len = run_len::<T>(n);
    let (a, b, y) = unsafe { (slice::from_raw_parts(a, len), *b, slice::from_raw_parts_mut(y, len)) };

    let mut yc = y.chunks_exact_mut(UNROLL_LANES);
    let mut ac = a.chunks_exact(UNROLL_LANES);
    for (yv, av) in (&mut yc).zip(&mut ac) {
        for l in 0..UNROLL_LANES {
            yv[l] = params.clamp(O::apply(b, av[l]));
        }
    }
    for (y, &a) in yc.into_remainder().iter_mut().zip(ac.remainder()) {
        *y = params.clamp(O::apply(b, a));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const F32: usize = size_of::<f32>();

    fn run(kernel: VBinaryUKernelFn, a: &[f32], b: &[f32], params: &F32OutputParams) -> Vec<f32> {
        let mut y = vec![0.0f32; a.len()];
        unsafe { kernel(a.len() * F32, a.as_ptr(), b.as_ptr(), y.as_mut_ptr(), params) };
        y
    }

    fn tiers<O: BinaryOp>() -> [VBinaryKernels; 2] {
        [VBinaryKernels::scalar::<O>(), VBinaryKernels::unrolled::<O>()]
    }

    #[test]
    fn test_multiply_op_with_tail() {
        let a: Vec<f32> = (1..=11).map(|v| v as f32).collect();
        let b: Vec<f32> = (1..=11).map(|v| 0.5 * v as f32).collect();
        let expected: Vec<f32> = a.iter().zip(&b).map(|(x, y)| x * y).collect();
        for k in tiers::<Multiply>() {
            assert_eq!(run(k.op, &a, &b, &OutputParams::unbounded()), expected);
        }
    }

    #[test]
    fn test_multiply_opc_and_ropc() {
        let a: Vec<f32> = (0..9).map(|v| v as f32).collect();
        let b = [3.0f32];
        let expected: Vec<f32> = a.iter().map(|x| x * 3.0).collect();
        for k in tiers::<Multiply>() {
            assert_eq!(run(k.opc, &a, &b, &OutputParams::unbounded()), expected);
            assert_eq!(run(k.ropc, &a, &b, &OutputParams::unbounded()), expected);
        }
    }

    #[test]
    fn test_add_kernels() {
        let a = [1.0f32, 2.0, 3.0];
        let b = [10.0f32, 20.0, 30.0];
        for k in tiers::<Add>() {
            assert_eq!(run(k.op, &a, &b, &OutputParams::unbounded()), vec![11.0, 22.0, 33.0]);
            assert_eq!(run(k.opc, &a, &b, &OutputParams::unbounded()), vec![11.0, 12.0, 13.0]);
        }
    }

    #[test]
    fn test_output_is_clamped() {
        let params = OutputParams::new(-2.0f32, 5.0).unwrap();
        let a = [-4.0f32, -1.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, -9.0];
        let b = [2.0f32];
        let expected = vec![-2.0, -2.0, 2.0, 4.0, 5.0, 5.0, 5.0, 5.0, 5.0, -2.0];
        for k in tiers::<Multiply>() {
            assert_eq!(run(k.opc, &a, &b, &params), expected);
            assert_eq!(run(k.ropc, &a, &b, &params), expected);
        }
    }

    #[test]
    fn test_resolve_maps_variants() {
        let k = VBinaryKernels::scalar::<Multiply>();
        assert!(std::ptr::fn_addr_eq(k.resolve(KernelVariant::NoBroadcast), k.op));
        assert!(std::ptr::fn_addr_eq(k.resolve(KernelVariant::BroadcastFirst), k.ropc));
        assert!(std::ptr::fn_addr_eq(k.resolve(KernelVariant::BroadcastSecond), k.opc));
    }
}
