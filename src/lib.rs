//! Copyright © 2025 Peter Garfield Bower. All rights reserved.
//!
//! # ndbinary
//!
//! Broadcasting-aware N-dimensional elementwise binary operators for `f32` tensors.
//!
//! Setup collapses two NumPy-style broadcast shapes into at most
//! [`MAX_TENSOR_DIMS`] *compressed* dimensions, derives per-dimension byte strides
//! for both inputs and the output, selects one of three microkernel variants and
//! produces a 3D tiled plan that any [`TaskScheduler`] can execute.
//!
//! ```rust
//! use ndbinary::{Context, Operator, SequentialScheduler};
//!
//! let ctx = Context::init();
//! let mut op = Operator::create_multiply_nd_f32(&ctx, f32::NEG_INFINITY, f32::INFINITY).unwrap();
//!
//! let a = [1.0f32, 2.0, 3.0];
//! let b = [10.0f32, 20.0];
//! let mut y = [0.0f32; 6];
//! let mut run = op
//!     .setup_multiply_nd_f32(&[1, 3], &[2, 1], &a, &b, &mut y)
//!     .unwrap();
//! run.run(&SequentialScheduler);
//! drop(run);
//! assert_eq!(y, [10.0, 20.0, 30.0, 20.0, 40.0, 60.0]);
//! ```

pub mod enums {
    pub mod error;
    pub mod kernel_variant;
    pub mod operator_type;
    pub mod run_state;
}

pub mod structs {
    pub mod compressed_shapes;
    pub mod context;
    pub mod execution_context;
    pub mod operator;
    pub mod output_params;
    pub mod plan;
}

pub mod traits {
    pub mod task_scheduler;
    pub mod type_unions;
}

pub mod kernels {
    pub mod compute;
    pub mod threading;
    pub mod vbinary;
    pub mod routing {
        pub mod broadcast;
        pub mod planner;

        pub use broadcast::compress_broadcast_shapes;
        pub use planner::plan_elementwise_binary;
    }
}

pub mod aliases;
pub mod utils;

/// Maximum tensor rank accepted by the N-d binary operators.
pub const MAX_TENSOR_DIMS: usize = 4;

pub use aliases::{ByteStrides, CompressedDims, F32OutputParams, OuterRange, OuterTile};

pub use enums::error::NdBinaryError;
pub use enums::kernel_variant::{KernelVariant, OperandOrder};
pub use enums::operator_type::OperatorType;
pub use enums::run_state::RunState;

pub use structs::compressed_shapes::CompressedShapes;
pub use structs::context::{Context, KernelTier};
pub use structs::execution_context::ElementwiseBinaryContext;
pub use structs::operator::Operator;
pub use structs::output_params::OutputParams;
pub use structs::plan::{ComputeDescriptor, ElementwiseBinaryPlan};

pub use kernels::routing::{compress_broadcast_shapes, plan_elementwise_binary};
pub use kernels::threading::SequentialScheduler;
#[cfg(feature = "parallel_proc")]
pub use kernels::threading::RayonScheduler;
pub use kernels::vbinary::{Add, BinaryOp, Multiply, VBinaryKernels, VBinaryUKernelFn};

pub use traits::task_scheduler::TaskScheduler;
pub use traits::type_unions::Float;
pub use utils::{broadcast_shape, num_elements};
