//! Search requests and the task descriptors they are split into.

use std::fmt;
use std::sync::Arc;

use crate::error::{Result, SmashError};
use crate::hashing::DigestSet;

use super::{Alphabet, Candidates};

/// A top-level search: every string of `length` characters that starts
/// with `prefix` and continues over `alphabet`.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// Target digests
    pub targets: Arc<DigestSet>,
    /// Total candidate length, prefix included
    pub length: usize,
    /// Characters for the free positions
    pub alphabet: Arc<Alphabet>,
    /// Fixed leading characters
    pub prefix: String,
    /// Worker pool size
    pub cores: usize,
}

impl SearchRequest {
    /// Creates a sequential request with no prefix.
    pub fn new(targets: impl Into<Arc<DigestSet>>, length: usize, alphabet: Alphabet) -> Self {
        Self {
            targets: targets.into(),
            length,
            alphabet: Arc::new(alphabet),
            prefix: String::new(),
            cores: 1,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_cores(mut self, cores: usize) -> Self {
        self.cores = cores;
        self
    }

    /// Number of free positions after the prefix.
    ///
    /// Zero when the prefix already fills (or overflows) the length.
    pub fn remaining(&self) -> usize {
        self.length.saturating_sub(self.prefix.chars().count())
    }

    /// Rejects requests that cannot be dispatched.
    pub fn validate(&self) -> Result<()> {
        if self.cores == 0 {
            return Err(SmashError::invalid("worker count must be at least 1"));
        }
        let prefix_len = self.prefix.chars().count();
        if prefix_len > self.length {
            return Err(SmashError::invalid(format!(
                "prefix has {} characters but the total length is only {}",
                prefix_len, self.length
            )));
        }
        if self.alphabet.is_empty() && self.remaining() > 0 {
            return Err(SmashError::invalid(
                "alphabet is empty but there are positions to fill",
            ));
        }
        Ok(())
    }

    /// The whole request as a single, unsplit task.
    pub fn root_task(&self) -> TaskDescriptor {
        TaskDescriptor {
            targets: Arc::clone(&self.targets),
            remaining: self.remaining(),
            alphabet: Arc::clone(&self.alphabet),
            prefix: self.prefix.clone(),
        }
    }
}

/// The unit of work handed to one worker: every `prefix + s` where `s` is
/// one of the `remaining`-length strings over `alphabet`.
#[derive(Clone)]
pub struct TaskDescriptor {
    pub targets: Arc<DigestSet>,
    pub remaining: usize,
    pub alphabet: Arc<Alphabet>,
    pub prefix: String,
}

impl TaskDescriptor {
    /// Enumerator over this task's free positions.
    pub fn candidates(&self) -> Result<Candidates<'_>> {
        Candidates::new(self.remaining, &self.alphabet)
    }

    /// Fixes the first free position to each alphabet character in turn.
    ///
    /// The children cover exactly this task's space, in the same order.
    /// A task with no free positions is its own only child.
    pub fn split(&self) -> Vec<TaskDescriptor> {
        if self.remaining == 0 {
            return vec![self.clone()];
        }
        self.alphabet
            .chars()
            .iter()
            .map(|&c| {
                let mut prefix = String::with_capacity(self.prefix.len() + c.len_utf8());
                prefix.push_str(&self.prefix);
                prefix.push(c);
                TaskDescriptor {
                    targets: Arc::clone(&self.targets),
                    remaining: self.remaining - 1,
                    alphabet: Arc::clone(&self.alphabet),
                    prefix,
                }
            })
            .collect()
    }
}

impl fmt::Debug for TaskDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskDescriptor")
            .field("prefix", &self.prefix)
            .field("remaining", &self.remaining)
            .field("alphabet", &self.alphabet.to_string())
            .field("targets", &self.targets.len())
            .finish()
    }
}

impl fmt::Display for TaskDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "prefix={:?} remaining={} alphabet={} chars",
            self.prefix,
            self.remaining,
            self.alphabet.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(length: usize, alphabet: &str) -> SearchRequest {
        SearchRequest::new(DigestSet::new(), length, Alphabet::new(alphabet))
    }

    #[test]
    fn test_validate_zero_cores() {
        let err = request(2, "ab").with_cores(0).validate().unwrap_err();
        assert!(matches!(err, SmashError::InvalidInput(_)));
    }

    #[test]
    fn test_validate_empty_alphabet() {
        assert!(request(1, "").validate().is_err());
        assert!(request(0, "").validate().is_ok());
        // prefix fills the whole length
        assert!(request(2, "").with_prefix("ab").validate().is_ok());
    }

    #[test]
    fn test_validate_prefix_longer_than_length() {
        assert!(request(1, "ab").with_prefix("abc").validate().is_err());
    }

    #[test]
    fn test_split_children() {
        let task = request(3, "xy").with_prefix("p").root_task();
        assert_eq!(task.remaining, 2);
        let children = task.split();
        let prefixes: Vec<_> = children.iter().map(|t| t.prefix.as_str()).collect();
        assert_eq!(prefixes, vec!["px", "py"]);
        assert!(children.iter().all(|t| t.remaining == 1));
    }

    #[test]
    fn test_split_exhausted_task() {
        let task = request(1, "xy").with_prefix("p").root_task();
        let children = task.split();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].prefix, "p");
    }

    #[test]
    fn test_display() {
        let task = request(2, "abc").root_task();
        assert_eq!(task.to_string(), "prefix=\"\" remaining=2 alphabet=3 chars");
    }
}
