//! # smash
//!
//! Exhaustive recovery of short strings whose digest is in a known set.
//!
//! ## Architecture
//!
//! - `hashing`: Digest strategies and the target digest set
//! - `search`: Candidate enumeration, partitioning, filtering and merging
//! - `worker`: Parallel execution and worker pool management
//! - `config`: Runtime configuration

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod hashing;
pub mod search;
pub mod worker;

pub use config::Config;
pub use error::{Result, SmashError};
pub use hashing::{Algorithm, DigestSet, Digester};
pub use search::{partition, Alphabet, Candidates, SearchRequest, TaskDescriptor};
pub use worker::{Progress, WorkerPool};

/// Checks the whole space described by `request` on `request.cores`
/// workers and returns every match, shard by shard in dispatch order.
///
/// Invalid input is rejected before any worker is spawned.
pub fn smash(request: &SearchRequest, digester: Arc<dyn Digester>) -> Result<Vec<String>> {
    let tasks = partition(request)?;
    WorkerPool::new(request.cores, digester)?.run(tasks)
}
