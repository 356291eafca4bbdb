// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # Threading Module
//!
//! [`TaskScheduler`] implementations.
//!
//! - [`SequentialScheduler`] runs every task on the calling thread, in order.
//! - [`RayonScheduler`] (`parallel_proc` feature) flattens the tile space and
//!   spreads it over a Rayon pool, either the global one or a dedicated pool
//!   with a fixed thread count.

#[cfg(feature = "parallel_proc")]
use rayon::prelude::*;

use crate::aliases::{OuterRange, OuterTile};
#[cfg(feature = "parallel_proc")]
use crate::enums::error::NdBinaryError;
use crate::traits::task_scheduler::TaskScheduler;

/// Runs tasks on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialScheduler;

impl TaskScheduler for SequentialScheduler {
    fn threads_count(&self) -> usize {
        1
    }

    fn parallelize_3d_tile_2d(
        &self,
        range: OuterRange,
        tile: OuterTile,
        task: &(dyn Fn(usize, usize, usize, usize, usize) + Sync),
    ) {
        debug_assert!(tile[0] != 0 && tile[1] != 0);
        for i in 0..range[0] {
            for j in (0..range[1]).step_by(tile[0]) {
                for k in (0..range[2]).step_by(tile[1]) {
                    task(i, j, k, tile[0].min(range[1] - j), tile[1].min(range[2] - k));
                }
            }
        }
    }
}

/// Runs tasks on a Rayon thread pool.
#[cfg(feature = "parallel_proc")]
#[derive(Debug, Default)]
pub struct RayonScheduler {
    pool: Option<rayon::ThreadPool>,
}

#[cfg(feature = "parallel_proc")]
impl RayonScheduler {
    /// Uses Rayon's global pool.
    pub fn new() -> Self {
        Self { pool: None }
    }

    /// Builds a dedicated pool with `num_threads` workers.
    pub fn with_threads(num_threads: usize) -> Result<Self, NdBinaryError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build()
            .map_err(|e| NdBinaryError::InvalidParameter {
                message: format!("failed to build a {}-thread pool: {}", num_threads, e),
            })?;
        Ok(Self { pool: Some(pool) })
    }
}

#[cfg(feature = "parallel_proc")]
impl TaskScheduler for RayonScheduler {
    fn threads_count(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }

    fn parallelize_3d_tile_2d(
        &self,
        range: OuterRange,
        tile: OuterTile,
        task: &(dyn Fn(usize, usize, usize, usize, usize) + Sync),
    ) {
        debug_assert!(tile[0] != 0 && tile[1] != 0);
        let tiles_j = range[1].div_ceil(tile[0]);
        let tiles_k = range[2].div_ceil(tile[1]);
        let per_i = tiles_j * tiles_k;
        let total = range[0] * per_i;

        let body = || {
            (0..total).into_par_iter().for_each(|idx| {
                let i = idx / per_i;
                let rem = idx % per_i;
                let j = (rem / tiles_k) * tile[0];
                let k = (rem % tiles_k) * tile[1];
                task(i, j, k, tile[0].min(range[1] - j), tile[1].min(range[2] - k));
            })
        };
        match &self.pool {
            Some(pool) => pool.install(body),
            None => body(),
        }
    }
}
