//! The set of target digests for a run.

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::error::{Result, SmashError};

/// Immutable set of lowercase hex digests.
///
/// Built once before a run and shared read-only (behind an `Arc`) by every
/// worker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DigestSet {
    digests: HashSet<String>,
}

impl DigestSet {
    /// Creates an empty set. Searching against it always yields no matches.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads one digest per line from `reader`.
    ///
    /// Lines are trimmed, blank lines skipped and hex lowercased.
    pub fn from_reader<R: BufRead>(reader: R) -> io::Result<Self> {
        let mut digests = HashSet::new();
        for line in reader.lines() {
            if let Some(digest) = normalize(&line?) {
                digests.insert(digest);
            }
        }
        Ok(Self { digests })
    }

    /// Loads a digest file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let read_err = |source| SmashError::ReadTargets {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(read_err)?;
        Self::from_reader(BufReader::new(file)).map_err(read_err)
    }

    /// Returns true if `digest` is one of the targets.
    #[inline]
    pub fn contains(&self, digest: &str) -> bool {
        self.digests.contains(digest)
    }

    pub fn len(&self) -> usize {
        self.digests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digests.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.digests.iter().map(String::as_str)
    }

    /// Counts entries that cannot be produced by a digest of `hex_len`
    /// characters.
    pub fn count_mismatched(&self, hex_len: usize) -> usize {
        self.digests
            .iter()
            .filter(|d| d.len() != hex_len || !d.bytes().all(|b| b.is_ascii_hexdigit()))
            .count()
    }
}

fn normalize(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_ascii_lowercase())
    }
}

impl<S: AsRef<str>> FromIterator<S> for DigestSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            digests: iter
                .into_iter()
                .filter_map(|s| normalize(s.as_ref()))
                .collect(),
        }
    }
}
