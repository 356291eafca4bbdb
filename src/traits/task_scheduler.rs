//! # Task Scheduler Trait Module
//!
//! The seam between a prepared plan and whatever executes it.
//!
//! Planning never runs work itself. It describes a 3D iteration space with
//! tiles on the two inner dimensions, and a `TaskScheduler` decides how the
//! resulting tasks are spread over threads.

use crate::aliases::{OuterRange, OuterTile};

/// Executes 3D tiled task spaces.
///
/// Implementations must call `task(i, j, k, j_tile, k_tile)` exactly once for each
/// `i in 0..range[0]`, each `j` in `0..range[1]` stepping by `tile[0]` and each `k`
/// in `0..range[2]` stepping by `tile[1]`, where the tile arguments are the
/// tile size clipped at the range end. Tasks are independent and may run in
/// any order or concurrently. The call returns once every task has finished.
pub trait TaskScheduler {
    /// Worker threads the scheduler may use.
    fn threads_count(&self) -> usize;

    fn parallelize_3d_tile_2d(
        &self,
        range: OuterRange,
        tile: OuterTile,
        task: &(dyn Fn(usize, usize, usize, usize, usize) + Sync),
    );
}
