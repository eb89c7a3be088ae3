//! The digest filter step: enumerate one shard and keep the hits.

use std::ops::ControlFlow;

use crate::error::Result;
use crate::hashing::{DigestSet, Digester};

use super::{Alphabet, Candidates, TaskDescriptor};

/// Candidates checked between progress callbacks.
pub const BATCH_SIZE: u64 = 1000;

/// Returns every `prefix + s`, for `s` over `length` positions of
/// `alphabet`, whose digest is in `targets`. Results are in enumeration
/// order. The whole space is always checked.
pub fn crack(
    targets: &DigestSet,
    length: usize,
    alphabet: &Alphabet,
    prefix: &str,
    digester: &dyn Digester,
) -> Result<Vec<String>> {
    crack_with(targets, length, alphabet, prefix, digester, |_| {
        ControlFlow::Continue(())
    })
    .map(Option::unwrap_or_default)
}

/// Runs [`crack`] over a task descriptor.
pub fn crack_task(task: &TaskDescriptor, digester: &dyn Digester) -> Result<Vec<String>> {
    crack(
        &task.targets,
        task.remaining,
        &task.alphabet,
        &task.prefix,
        digester,
    )
}

/// Like [`crack`], but reports the number of candidates checked to
/// `on_batch` every [`BATCH_SIZE`] candidates and once more at the end.
///
/// Returns `Ok(None)` if `on_batch` breaks, abandoning the shard.
pub fn crack_with<F>(
    targets: &DigestSet,
    length: usize,
    alphabet: &Alphabet,
    prefix: &str,
    digester: &dyn Digester,
    mut on_batch: F,
) -> Result<Option<Vec<String>>>
where
    F: FnMut(u64) -> ControlFlow<()>,
{
    let mut candidates = Candidates::new(length, alphabet)?;
    let mut matches = Vec::new();
    let mut buf = String::with_capacity(prefix.len() + length * 4);
    buf.push_str(prefix);

    let mut pending = 0u64;
    while candidates.next_into(&mut buf) {
        if targets.contains(&digester.hex_digest(buf.as_bytes())) {
            matches.push(buf.clone());
        }
        buf.truncate(prefix.len());

        pending += 1;
        if pending == BATCH_SIZE {
            if on_batch(pending).is_break() {
                return Ok(None);
            }
            pending = 0;
        }
    }

    if pending > 0 {
        // the shard is complete, so a late break changes nothing
        let _ = on_batch(pending);
    }
    Ok(Some(matches))
}
