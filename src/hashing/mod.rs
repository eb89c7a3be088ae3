//! Digest functions and target digest sets.
//!
//! This module provides:
//! - The `Digester` strategy used by the filter step
//! - Built-in algorithms (MD5, SHA-1, SHA-2)
//! - `DigestSet`, the immutable lookup shared by every worker

mod algorithm;
mod set;

pub use algorithm::{Algorithm, Digester};
pub use set::DigestSet;
