//! Ordered character sets used to build candidates.

use std::fmt;

/// Lowercase ASCII letters followed by digits.
pub const DEFAULT_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz0123456789";

/// An ordered sequence of characters. Order defines enumeration order.
///
/// Uniqueness is not enforced: a repeated character simply produces
/// repeated candidates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Alphabet(Vec<char>);

impl Alphabet {
    pub fn new(chars: impl Into<String>) -> Self {
        Self(chars.into().chars().collect())
    }

    #[inline]
    pub fn chars(&self) -> &[char] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of strings of `length` characters over this alphabet, or
    /// `None` if it does not fit in a `u128`.
    pub fn space_size(&self, length: usize) -> Option<u128> {
        let length = u32::try_from(length).ok()?;
        (self.0.len() as u128).checked_pow(length)
    }

    /// Returns true if some character appears more than once.
    pub fn has_duplicates(&self) -> bool {
        let mut seen = std::collections::HashSet::with_capacity(self.0.len());
        !self.0.iter().all(|c| seen.insert(*c))
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHABET)
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|c| write!(f, "{}", c))
    }
}
