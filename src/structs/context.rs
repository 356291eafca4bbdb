//! # Context Module - *Initialised Kernel Registry*
//!
//! An explicit, shareable handle that stands in for library-wide initialisation.
//!
//! Creating a [`Context`] selects the microkernel tier for this machine once.
//! Operators hold an `Arc<Context>` and check it before any shape logic, so a
//! context that has been shut down fails fast with `Uninitialized`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::debug;

use crate::enums::operator_type::OperatorType;
use crate::kernels::vbinary::{Add, Multiply, VBinaryKernels};

/// Microkernel implementation family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelTier {
    /// One element per iteration.
    Scalar,
    /// Fixed-width unrolled chunks, compiler-vectorised.
    Unrolled,
}

impl KernelTier {
    /// Best tier enabled for this build.
    pub fn detect() -> Self {
        if cfg!(feature = "simd") {
            KernelTier::Unrolled
        } else {
            KernelTier::Scalar
        }
    }
}

/// # Context
///
/// ## Description
/// Holds the capability-selected kernel tables for every binary operation and
/// the initialisation flag operators check.
///
/// ### Tips:
/// - Share one `Arc<Context>` across all operators of a model.
/// - [`Context::shutdown`] is permanent for that handle. Create a new context
///   to resume.
pub struct Context {
    initialized: AtomicBool,
    tier: KernelTier,
    vmul: VBinaryKernels,
    vadd: VBinaryKernels,
}

impl Context {
    /// Initialises a context with the best tier available to this build.
    pub fn init() -> Arc<Self> {
        Self::with_tier(KernelTier::detect())
    }

    /// Initialises a context pinned to `tier`.
    pub fn with_tier(tier: KernelTier) -> Arc<Self> {
        let (vmul, vadd) = match tier {
            KernelTier::Scalar => (
                VBinaryKernels::scalar::<Multiply>(),
                VBinaryKernels::scalar::<Add>(),
            ),
            KernelTier::Unrolled => (
                VBinaryKernels::unrolled::<Multiply>(),
                VBinaryKernels::unrolled::<Add>(),
            ),
        };
        debug!("ndbinary context initialised with {:?} microkernels", tier);
        Arc::new(Self {
            initialized: AtomicBool::new(true),
            tier,
            vmul,
            vadd,
        })
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Marks the context uninitialised. Later create and setup calls on
    /// operators that share it fail with `Uninitialized`.
    pub fn shutdown(&self) {
        self.initialized.store(false, Ordering::Release);
        debug!("ndbinary context shut down");
    }

    #[inline]
    pub fn tier(&self) -> KernelTier {
        self.tier
    }

    /// Kernel table for the operation `op_type` performs.
    #[inline]
    pub fn kernels(&self, op_type: OperatorType) -> VBinaryKernels {
        match op_type {
            OperatorType::AddNdF32 => self.vadd,
            OperatorType::MultiplyNdF32 => self.vmul,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shutdown_flips_flag() {
        let ctx = Context::init();
        assert!(ctx.is_initialized());
        ctx.shutdown();
        assert!(!ctx.is_initialized());
    }

    #[test]
    fn test_tier_follows_build() {
        #[cfg(feature = "simd")]
        assert_eq!(Context::init().tier(), KernelTier::Unrolled);
        #[cfg(not(feature = "simd"))]
        assert_eq!(Context::init().tier(), KernelTier::Scalar);
        assert_eq!(Context::with_tier(KernelTier::Scalar).tier(), KernelTier::Scalar);
    }
}
