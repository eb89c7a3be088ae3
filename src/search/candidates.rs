//! Lazy enumeration of fixed-length strings over an alphabet.

use std::iter::FusedIterator;

use crate::error::{Result, SmashError};

use super::Alphabet;

/// Every string of exactly `length` characters over an alphabet, in
/// lexicographic order of the alphabet (counting in base `|alphabet|`,
/// most significant character first).
///
/// Implemented as an odometer over alphabet indices, so memory use is
/// `O(length)` and the same parameters always reproduce the same sequence.
#[derive(Debug, Clone)]
pub struct Candidates<'a> {
    alphabet: &'a [char],
    indices: Vec<usize>,
    done: bool,
}

impl<'a> Candidates<'a> {
    /// Creates the enumerator.
    ///
    /// A zero `length` yields the empty string once, even for an empty
    /// alphabet. An empty alphabet with a non-zero `length` is rejected.
    pub fn new(length: usize, alphabet: &'a Alphabet) -> Result<Self> {
        if alphabet.is_empty() && length > 0 {
            return Err(SmashError::invalid(format!(
                "cannot enumerate {} position(s) over an empty alphabet",
                length
            )));
        }
        Ok(Self {
            alphabet: alphabet.chars(),
            indices: vec![0; length],
            done: false,
        })
    }

    /// Appends the next candidate to `buf` without allocating.
    ///
    /// Returns false once the sequence is exhausted, leaving `buf` untouched.
    pub fn next_into(&mut self, buf: &mut String) -> bool {
        if self.done {
            return false;
        }
        buf.extend(self.indices.iter().map(|&i| self.alphabet[i]));
        self.advance();
        true
    }

    /// Number of candidates not yet produced, if it fits in a `u128`.
    pub fn remaining(&self) -> Option<u128> {
        if self.done {
            return Some(0);
        }
        let base = self.alphabet.len() as u128;
        let mut produced: u128 = 0;
        for &i in &self.indices {
            produced = produced.checked_mul(base)?.checked_add(i as u128)?;
        }
        let total = base.checked_pow(u32::try_from(self.indices.len()).ok()?)?;
        Some(total - produced)
    }

    fn advance(&mut self) {
        let base = self.alphabet.len();
        for slot in self.indices.iter_mut().rev() {
            *slot += 1;
            if *slot < base {
                return;
            }
            *slot = 0;
        }
        // carried out of the most significant position
        self.done = true;
    }
}

impl Iterator for Candidates<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let mut candidate = String::with_capacity(self.indices.len());
        self.next_into(&mut candidate).then_some(candidate)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.remaining().map(usize::try_from) {
            Some(Ok(n)) => (n, Some(n)),
            _ => (usize::MAX, None),
        }
    }
}

impl FusedIterator for Candidates<'_> {}
