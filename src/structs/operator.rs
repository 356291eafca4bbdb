//! # Operator Module - *N-d Elementwise Binary Operators*
//!
//! Lifecycle of the broadcasting multiply and add operators: create once with
//! clamp bounds, then set up per input shape pair and run.
//!
//! Setup validates and compresses the shapes, plans strides and the kernel
//! variant, stores the plan and returns an [`ElementwiseBinaryContext`] bound to
//! the caller's buffers. Any failure leaves the operator in
//! [`RunState::Invalid`] with no plan.

use std::mem::size_of;
use std::sync::Arc;

use log::{debug, error};

use crate::aliases::F32OutputParams;
use crate::enums::error::NdBinaryError;
use crate::enums::operator_type::OperatorType;
use crate::enums::run_state::RunState;
use crate::kernels::routing::broadcast::compress_broadcast_shapes;
use crate::kernels::routing::planner::plan_elementwise_binary;
use crate::kernels::vbinary::VBinaryKernels;
use crate::structs::context::Context;
use crate::structs::execution_context::ElementwiseBinaryContext;
use crate::structs::output_params::OutputParams;
use crate::structs::plan::ElementwiseBinaryPlan;
use crate::utils::validate_buffer_len;

/// # Operator
///
/// ## Description
/// A broadcasting elementwise binary operator over `f32` tensors of rank up to
/// [`MAX_TENSOR_DIMS`](crate::MAX_TENSOR_DIMS).
///
/// - Configuration (operation kind, clamp bounds, kernel table) is fixed at creation.
/// - The plan is recomputed on every setup and overwrites the previous one.
///
/// ### Tips:
/// - Size the output with [`broadcast_shape`](crate::broadcast_shape).
/// - Setup borrows the operator for as long as the returned context lives.
///   Drop the context before the next setup.
pub struct Operator {
    context: Arc<Context>,
    op_type: OperatorType,
    params: F32OutputParams,
    ukernels: VBinaryKernels,
    state: RunState,
    plan: Option<ElementwiseBinaryPlan>,
}

impl Operator {
    /// Creates an elementwise multiply operator with output clamped to `[output_min, output_max]`.
    pub fn create_multiply_nd_f32(
        context: &Arc<Context>,
        output_min: f32,
        output_max: f32,
    ) -> Result<Self, NdBinaryError> {
        Self::create_binary_elementwise_nd_f32(context, output_min, output_max, OperatorType::MultiplyNdF32)
    }

    /// Creates an elementwise add operator with output clamped to `[output_min, output_max]`.
    pub fn create_add_nd_f32(
        context: &Arc<Context>,
        output_min: f32,
        output_max: f32,
    ) -> Result<Self, NdBinaryError> {
        Self::create_binary_elementwise_nd_f32(context, output_min, output_max, OperatorType::AddNdF32)
    }

    fn create_binary_elementwise_nd_f32(
        context: &Arc<Context>,
        output_min: f32,
        output_max: f32,
        op_type: OperatorType,
    ) -> Result<Self, NdBinaryError> {
        let name = op_type.op_name();
        if !context.is_initialized() {
            error!("failed to create {} operator: context is not initialized", name);
            return Err(NdBinaryError::Uninitialized);
        }

        let params = OutputParams::new(output_min, output_max).map_err(|e| {
            error!(
                "failed to create {} operator with [{:.7}, {:.7}] output range: {}",
                name, output_min, output_max, e
            );
            e
        })?;

        Ok(Self {
            context: Arc::clone(context),
            op_type,
            params,
            ukernels: context.kernels(op_type),
            state: RunState::Invalid,
            plan: None,
        })
    }

    /// Prepares a multiply of `input1` (shape `input1_shape`) by `input2`
    /// (shape `input2_shape`) into `output`.
    ///
    /// # Errors
    /// In check order: `OperatorTypeMismatch`, `Uninitialized`, `UnsupportedRank`,
    /// `InvalidShape`, `ShapeMismatch`, `Overflow`, `BufferLengthMismatch`.
    pub fn setup_multiply_nd_f32<'a>(
        &'a mut self,
        input1_shape: &[usize],
        input2_shape: &[usize],
        input1: &'a [f32],
        input2: &'a [f32],
        output: &'a mut [f32],
    ) -> Result<ElementwiseBinaryContext<'a>, NdBinaryError> {
        self.setup_binary_elementwise_nd_f32(
            OperatorType::MultiplyNdF32,
            input1_shape,
            input2_shape,
            input1,
            input2,
            output,
        )
    }

    /// Prepares an add. Same contract as [`Operator::setup_multiply_nd_f32`].
    pub fn setup_add_nd_f32<'a>(
        &'a mut self,
        input1_shape: &[usize],
        input2_shape: &[usize],
        input1: &'a [f32],
        input2: &'a [f32],
        output: &'a mut [f32],
    ) -> Result<ElementwiseBinaryContext<'a>, NdBinaryError> {
        self.setup_binary_elementwise_nd_f32(
            OperatorType::AddNdF32,
            input1_shape,
            input2_shape,
            input1,
            input2,
            output,
        )
    }

    fn setup_binary_elementwise_nd_f32<'a>(
        &'a mut self,
        expected: OperatorType,
        input1_shape: &[usize],
        input2_shape: &[usize],
        input1: &'a [f32],
        input2: &'a [f32],
        output: &'a mut [f32],
    ) -> Result<ElementwiseBinaryContext<'a>, NdBinaryError> {
        if self.op_type != expected {
            error!("failed to setup {} operator: operator type mismatch", expected);
            return Err(NdBinaryError::OperatorTypeMismatch {
                expected,
                found: self.op_type,
            });
        }
        self.state = RunState::Invalid;
        self.plan = None;

        let name = self.op_type.op_name();
        if !self.context.is_initialized() {
            error!("failed to setup {} operator: context is not initialized", name);
            return Err(NdBinaryError::Uninitialized);
        }

        let shapes = compress_broadcast_shapes(input1_shape, input2_shape).map_err(|e| {
            error!(
                "failed to setup {} operator with {:?} and {:?} input shapes: {}",
                name, input1_shape, input2_shape, e
            );
            e
        })?;

        let plan = shapes
            .input1_len()
            .and_then(|n| validate_buffer_len("input1", n, input1.len()))
            .and_then(|_| shapes.input2_len())
            .and_then(|n| validate_buffer_len("input2", n, input2.len()))
            .and_then(|_| shapes.output_len())
            .and_then(|n| validate_buffer_len("output", n, output.len()))
            .and_then(|_| plan_elementwise_binary(&shapes, size_of::<f32>()))
            .map_err(|e| {
                error!("failed to setup {} operator: {}", name, e);
                e
            })?;
        debug!(
            "{} operator ready: {:?} x {:?} -> {} compressed dims {:?}, {} kernel, range {:?}",
            name,
            input1_shape,
            input2_shape,
            shapes.num_dims,
            shapes.output,
            plan.variant,
            plan.compute.range
        );

        self.plan = Some(plan);
        self.state = RunState::Ready;

        let (a, b) = plan.operand_order.normalize(input1, input2);
        let this: &'a Operator = self;
        Ok(ElementwiseBinaryContext::new(this, plan, a, b, output))
    }

    #[inline]
    pub fn op_type(&self) -> OperatorType {
        self.op_type
    }

    #[inline]
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Plan from the latest successful setup, if the operator is ready.
    #[inline]
    pub fn plan(&self) -> Option<&ElementwiseBinaryPlan> {
        self.plan.as_ref()
    }

    #[inline]
    pub fn output_params(&self) -> &F32OutputParams {
        &self.params
    }

    #[inline]
    pub(crate) fn ukernels(&self) -> &VBinaryKernels {
        &self.ukernels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::kernel_variant::{KernelVariant, OperandOrder};
    use crate::kernels::threading::SequentialScheduler;
    use crate::structs::context::KernelTier;

    fn multiply(ctx: &Arc<Context>) -> Operator {
        Operator::create_multiply_nd_f32(ctx, f32::NEG_INFINITY, f32::INFINITY).unwrap()
    }

    #[test]
    fn test_create_rejects_bad_ranges() {
        let ctx = Context::init();
        assert!(matches!(
            Operator::create_multiply_nd_f32(&ctx, f32::NAN, 1.0),
            Err(NdBinaryError::InvalidParameter { .. })
        ));
        assert!(matches!(
            Operator::create_multiply_nd_f32(&ctx, 0.0, f32::NAN),
            Err(NdBinaryError::InvalidParameter { .. })
        ));
        assert!(matches!(
            Operator::create_add_nd_f32(&ctx, 3.0, 3.0),
            Err(NdBinaryError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_create_requires_initialized_context() {
        let ctx = Context::init();
        ctx.shutdown();
        assert_eq!(
            Operator::create_multiply_nd_f32(&ctx, 0.0, 1.0).err(),
            Some(NdBinaryError::Uninitialized)
        );
    }

    #[test]
    fn test_new_operator_is_not_ready() {
        let op = multiply(&Context::init());
        assert_eq!(op.state(), RunState::Invalid);
        assert!(op.plan().is_none());
        assert_eq!(op.op_type(), OperatorType::MultiplyNdF32);
    }

    #[test]
    fn test_setup_rejects_wrong_operator_type() {
        let ctx = Context::init();
        let mut add = Operator::create_add_nd_f32(&ctx, -1.0, 1.0).unwrap();
        let (a, b, mut y) = ([1.0f32], [2.0f32], [0.0f32]);
        let err = add.setup_multiply_nd_f32(&[1], &[1], &a, &b, &mut y).err();
        assert_eq!(
            err,
            Some(NdBinaryError::OperatorTypeMismatch {
                expected: OperatorType::MultiplyNdF32,
                found: OperatorType::AddNdF32,
            })
        );
    }

    #[test]
    fn test_uninitialized_checked_before_shapes() {
        let ctx = Context::init();
        let mut op = multiply(&ctx);
        ctx.shutdown();
        let (a, b, mut y) = ([0.0f32; 1], [0.0f32; 1], [0.0f32; 1]);
        // The shapes are invalid too, the context is reported first.
        let err = op.setup_multiply_nd_f32(&[1, 1, 1, 1, 1], &[0], &a, &b, &mut y).err();
        assert_eq!(err, Some(NdBinaryError::Uninitialized));
    }

    #[test]
    fn test_failed_setup_invalidates_previous_plan() {
        let ctx = Context::init();
        let mut op = multiply(&ctx);
        let a = [1.0f32, 2.0, 3.0];
        let b = [2.0f32];
        let mut y = [0.0f32; 3];
        {
            let ctx = op.setup_multiply_nd_f32(&[3], &[1], &a, &b, &mut y).unwrap();
            assert_eq!(ctx.variant(), KernelVariant::BroadcastSecond);
        }
        assert_eq!(op.state(), RunState::Ready);

        let err = op.setup_multiply_nd_f32(&[2, 3], &[2, 4], &a, &b, &mut y).err();
        assert!(matches!(err, Some(NdBinaryError::ShapeMismatch { .. })));
        assert_eq!(op.state(), RunState::Invalid);
        assert!(op.plan().is_none());
    }

    #[test]
    fn test_setup_checks_buffer_lengths() {
        let mut op = multiply(&Context::init());
        let a = [1.0f32; 6];
        let b = [1.0f32; 3];
        let mut short = [0.0f32; 5];
        let err = op.setup_multiply_nd_f32(&[2, 3], &[3], &a, &b, &mut short).err();
        assert_eq!(
            err,
            Some(NdBinaryError::BufferLengthMismatch {
                buffer: "output",
                expected: 6,
                found: 5
            })
        );

        let mut y = [0.0f32; 6];
        let err = op.setup_multiply_nd_f32(&[2, 3], &[3], &a, &b[..2], &mut y).err();
        assert!(matches!(
            err,
            Some(NdBinaryError::BufferLengthMismatch { buffer: "input2", .. })
        ));
        assert_eq!(op.state(), RunState::Invalid);
    }

    #[test]
    fn test_oversized_shapes_rejected_before_buffers() {
        let mut op = multiply(&Context::init());
        let b = [1.0f32; 4];
        let mut y: [f32; 0] = [];
        // 2^64 elements wrap to 0 unless counted with overflow checks, which
        // would let the empty buffers pass.
        let err = op.setup_multiply_nd_f32(&[1 << 62, 4], &[4], &[], &b, &mut y).err();
        assert!(matches!(err, Some(NdBinaryError::Overflow { target: "usize", .. })));
        assert_eq!(op.state(), RunState::Invalid);
        assert!(op.plan().is_none());

        // Representable count, empty buffers.
        let err = op.setup_multiply_nd_f32(&[1 << 60, 4], &[4], &[], &b, &mut y).err();
        assert!(matches!(
            err,
            Some(NdBinaryError::BufferLengthMismatch { buffer: "input1", found: 0, .. })
        ));
    }

    #[test]
    fn test_scalar_first_swaps_operands_and_runs() {
        let mut op = multiply(&Context::with_tier(KernelTier::Scalar));
        let a = [3.0f32];
        let b = [1.0f32, 2.0, 3.0, 4.0];
        let mut y = [0.0f32; 4];
        let mut run = op.setup_multiply_nd_f32(&[], &[2, 2], &a, &b, &mut y).unwrap();
        assert_eq!(run.variant(), KernelVariant::BroadcastFirst);
        assert_eq!(run.operand_order(), OperandOrder::Swapped);
        run.run(&SequentialScheduler);
        drop(run);
        assert_eq!(y, [3.0, 6.0, 9.0, 12.0]);
    }

    #[test]
    fn test_clamped_multiply() {
        let ctx = Context::init();
        let mut op = Operator::create_multiply_nd_f32(&ctx, 0.0, 6.0).unwrap();
        let a = [-1.0f32, 1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [2.0f32, 2.0, 2.0];
        let mut y = [0.0f32; 6];
        op.setup_multiply_nd_f32(&[2, 3], &[3], &a, &b, &mut y)
            .unwrap()
            .run(&SequentialScheduler);
        assert_eq!(y, [0.0, 2.0, 4.0, 6.0, 6.0, 6.0]);
    }

    #[test]
    fn test_setup_is_repeatable() {
        let ctx = Context::init();
        let mut op = Operator::create_add_nd_f32(&ctx, f32::NEG_INFINITY, f32::INFINITY).unwrap();

        let a = [1.0f32, 2.0];
        let b = [10.0f32, 20.0, 30.0];
        let mut y = [0.0f32; 6];
        op.setup_add_nd_f32(&[2, 1], &[1, 3], &a, &b, &mut y)
            .unwrap()
            .run(&SequentialScheduler);
        assert_eq!(y, [11.0, 21.0, 31.0, 12.0, 22.0, 32.0]);

        let mut z = [0.0f32; 2];
        op.setup_add_nd_f32(&[2], &[2], &a, &b[..2], &mut z)
            .unwrap()
            .run(&SequentialScheduler);
        assert_eq!(z, [11.0, 22.0]);
        assert_eq!(op.plan().map(|p| p.shapes.num_dims), Some(1));
    }
}
