//! # Plan Module
//!
//! Owned output of the stride & kernel planner. An [`Operator`](crate::Operator)
//! keeps one plan from its latest successful setup.

use crate::aliases::{ByteStrides, OuterRange, OuterTile};
use crate::enums::kernel_variant::{KernelVariant, OperandOrder};
use crate::structs::compressed_shapes::CompressedShapes;

/// # ComputeDescriptor
///
/// 3D iteration space handed to a [`TaskScheduler`](crate::TaskScheduler).
///
/// `range` is `[output[3], output[2], output[1]]` of the compressed output
/// shape, outermost first. `tile` applies to the second and third ranges and
/// is always `[1, 1]` for the binary operators, so every task covers exactly
/// one innermost run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComputeDescriptor {
    pub range: OuterRange,
    pub tile: OuterTile,
}

impl ComputeDescriptor {
    /// Number of tasks the scheduler will issue.
    #[inline]
    pub fn num_tasks(&self) -> usize {
        self.range[0] * self.range[1].div_ceil(self.tile[0]) * self.range[2].div_ceil(self.tile[1])
    }
}

/// # ElementwiseBinaryPlan
///
/// ## Description
/// Everything the executor needs apart from the buffers themselves.
///
/// `a_stride`, `b_stride` and `y_stride` are byte strides per compressed
/// dimension, innermost first. `a` and `b` are the *kernel* operands, i.e. after
/// `operand_order` has been applied to the caller's inputs. A `0` stride means the
/// buffer stays put along that dimension.
///
/// `elements` is the innermost run length in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementwiseBinaryPlan {
    pub shapes: CompressedShapes,
    pub variant: KernelVariant,
    pub operand_order: OperandOrder,
    pub a_stride: ByteStrides,
    pub b_stride: ByteStrides,
    pub y_stride: ByteStrides,
    pub elements: usize,
    pub compute: ComputeDescriptor,
}
