//! # Execution Context Module
//!
//! Binds a ready operator plan to the caller's buffers for one execution.

use log::trace;

use crate::enums::kernel_variant::{KernelVariant, OperandOrder};
use crate::enums::run_state::RunState;
use crate::kernels::compute::{ElementwiseBinaryTask, compute_elementwise_binary_3d};
use crate::structs::operator::Operator;
use crate::structs::plan::ElementwiseBinaryPlan;
use crate::traits::task_scheduler::TaskScheduler;

/// # ElementwiseBinaryContext
///
/// ## Description
/// Returned by a successful setup. Borrows the operator and all three buffers
/// for `'a`, so the operator cannot be set up again while a context built from
/// its previous plan is alive.
///
/// `a` and `b` are already in kernel operand order: when the plan swaps
/// operands, `a` is the caller's input #2.
pub struct ElementwiseBinaryContext<'a> {
    operator: &'a Operator,
    plan: ElementwiseBinaryPlan,
    a: &'a [f32],
    b: &'a [f32],
    y: &'a mut [f32],
}

impl<'a> ElementwiseBinaryContext<'a> {
    pub(crate) fn new(
        operator: &'a Operator,
        plan: ElementwiseBinaryPlan,
        a: &'a [f32],
        b: &'a [f32],
        y: &'a mut [f32],
    ) -> Self {
        Self {
            operator,
            plan,
            a,
            b,
            y,
        }
    }

    /// Plan this context executes.
    #[inline]
    pub fn plan(&self) -> &ElementwiseBinaryPlan {
        &self.plan
    }

    #[inline]
    pub fn variant(&self) -> KernelVariant {
        self.plan().variant
    }

    #[inline]
    pub fn operand_order(&self) -> OperandOrder {
        self.plan().operand_order
    }

    /// Executes the plan, handing every outer tile to `scheduler`.
    ///
    /// Returns once all tiles have been processed.
    pub fn run<S: TaskScheduler + ?Sized>(&mut self, scheduler: &S) {
        let op = self.operator;
        // Setup needs `&mut Operator`, so the plan cannot change under this borrow.
        debug_assert!(op.state() == RunState::Ready && op.plan() == Some(&self.plan));
        let plan = &self.plan;

        let task = ElementwiseBinaryTask {
            a: self.a.as_ptr().cast(),
            b: self.b.as_ptr().cast(),
            y: self.y.as_mut_ptr().cast(),
            a_stride: plan.a_stride,
            b_stride: plan.b_stride,
            y_stride: plan.y_stride,
            elements: plan.elements,
            params: *op.output_params(),
            ukernel: op.ukernels().resolve(plan.variant),
        };

        trace!(
            "running {} plan: {} kernel, {} tasks on {} threads",
            op.op_type(),
            plan.variant,
            plan.compute.num_tasks(),
            scheduler.threads_count()
        );

        // SAFETY: setup checked all three buffer lengths against the compressed
        // shapes, so every offset the plan produces stays in bounds.
        scheduler.parallelize_3d_tile_2d(plan.compute.range, plan.compute.tile, &|i, j, k, tj, tk| unsafe {
            compute_elementwise_binary_3d(&task, i, j, k, tj, tk)
        });
    }
}
