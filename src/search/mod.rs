//! Candidate enumeration and search-space partitioning.
//!
//! Leaves first:
//! - `Candidates`: lazy odometer over fixed-length strings
//! - `crack`: the digest filter over one shard
//! - `partition`: disjoint shards for a whole request
//! - `Aggregator`: dispatch-ordered merge of shard results

mod aggregate;
mod alphabet;
mod candidates;
mod crack;
mod partition;
mod task;

pub use aggregate::{aggregate, Aggregator};
pub use alphabet::{Alphabet, DEFAULT_ALPHABET};
pub use candidates::Candidates;
pub use crack::{crack, crack_task, crack_with, BATCH_SIZE};
pub use partition::partition;
pub use task::{SearchRequest, TaskDescriptor};
