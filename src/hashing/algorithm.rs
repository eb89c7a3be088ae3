//! Pluggable one-way digest functions.

use std::fmt;
use std::str::FromStr;

use digest::Digest;
use md5::Md5;
use sha1::Sha1;
use sha2::{Sha256, Sha512};

/// A one-way hash rendered as lowercase hexadecimal.
///
/// The filter step only ever talks to this trait, so enumeration and
/// partitioning stay independent of the algorithm in use.
pub trait Digester: Send + Sync {
    /// Short lowercase name, e.g. `md5`.
    fn name(&self) -> &'static str;

    /// Number of hex characters in a rendered digest.
    fn hex_len(&self) -> usize;

    /// Digest `input` and render it as lowercase hex.
    fn hex_digest(&self, input: &[u8]) -> String;
}

/// Built-in digest algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    /// 128-bit MD5
    #[default]
    Md5,
    Sha1,
    Sha256,
    Sha512,
}

#[inline]
fn hex_of<D: Digest>(input: &[u8]) -> String {
    hex::encode(D::digest(input))
}

impl Digester for Algorithm {
    fn name(&self) -> &'static str {
        match self {
            Algorithm::Md5 => "md5",
            Algorithm::Sha1 => "sha1",
            Algorithm::Sha256 => "sha256",
            Algorithm::Sha512 => "sha512",
        }
    }

    fn hex_len(&self) -> usize {
        match self {
            Algorithm::Md5 => 32,
            Algorithm::Sha1 => 40,
            Algorithm::Sha256 => 64,
            Algorithm::Sha512 => 128,
        }
    }

    #[inline]
    fn hex_digest(&self, input: &[u8]) -> String {
        match self {
            Algorithm::Md5 => hex_of::<Md5>(input),
            Algorithm::Sha1 => hex_of::<Sha1>(input),
            Algorithm::Sha256 => hex_of::<Sha256>(input),
            Algorithm::Sha512 => hex_of::<Sha512>(input),
        }
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "").as_str() {
            "md5" => Ok(Algorithm::Md5),
            "sha1" => Ok(Algorithm::Sha1),
            "sha256" => Ok(Algorithm::Sha256),
            "sha512" => Ok(Algorithm::Sha512),
            _ => Err(format!("Unknown digest algorithm: {}", s)),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_md5_vectors() {
        assert_eq!(
            Algorithm::Md5.hex_digest(b""),
            "d41d8cd98f00b204e9800998ecf8427e"
        );
        assert_eq!(
            Algorithm::Md5.hex_digest(b"ab"),
            "187ef4436122d1cc2f40dc2b92f0eba0"
        );
    }

    #[test]
    fn test_sha_vectors() {
        assert_eq!(
            Algorithm::Sha1.hex_digest(b"abc"),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
        assert_eq!(
            Algorithm::Sha256.hex_digest(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_hex_len_matches_output() {
        for alg in [
            Algorithm::Md5,
            Algorithm::Sha1,
            Algorithm::Sha256,
            Algorithm::Sha512,
        ] {
            assert_eq!(alg.hex_digest(b"x").len(), alg.hex_len(), "{}", alg);
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!("MD5".parse::<Algorithm>(), Ok(Algorithm::Md5));
        assert_eq!("sha-256".parse::<Algorithm>(), Ok(Algorithm::Sha256));
        assert!("crc32".parse::<Algorithm>().is_err());
    }
}
