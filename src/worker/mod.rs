//! Parallel execution of search tasks.
//!
//! This module provides:
//! - CPU workers that pull tasks off a shared queue
//! - A fixed-size pool that dispatches, joins and merges in dispatch order
//! - Progress counters and cooperative cancellation

mod cpu;
mod pool;

pub use cpu::{CpuWorker, WorkerStats};
pub use pool::{Progress, WorkerPool};
