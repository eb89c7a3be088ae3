//! Runtime configuration for the search CLI.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use crate::hashing::{Algorithm, DigestSet};
use crate::search::{Alphabet, SearchRequest, DEFAULT_ALPHABET};

/// Brute-force strings whose digest appears in a hash list
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Alphabet to use in permutations
    #[arg(short, long, default_value = DEFAULT_ALPHABET)]
    pub alphabet: String,

    /// CPU cores (worker threads) to use
    #[arg(short, long, default_value = "1")]
    pub cores: usize,

    /// Use one worker per logical CPU, overriding --cores
    #[arg(long, default_value = "false")]
    pub all_cores: bool,

    /// Total length of permutations, prefix included
    #[arg(short, long, default_value = "1")]
    pub length: usize,

    /// Prefix for all permutations
    #[arg(short, long, default_value = "")]
    pub prefix: String,

    /// Path of hashes file, one digest per line
    #[arg(short = 's', long, default_value = "hashes.txt")]
    pub hashes: PathBuf,

    /// Digest algorithm: md5, sha1, sha256 or sha512
    #[arg(short, long, default_value = "md5")]
    pub digest: Algorithm,

    /// Progress report interval in seconds (0 = no reports)
    #[arg(short, long, default_value = "5")]
    pub report_interval: u64,

    /// Write matches to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,
}

impl Config {
    /// Returns the number of workers, honouring --all-cores
    pub fn worker_count(&self) -> usize {
        if self.all_cores {
            num_cpus::get()
        } else {
            self.cores
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_count() == 0 {
            return Err(ConfigError::InvalidCores(
                "At least one core is required".into(),
            ));
        }

        let prefix_len = self.prefix.chars().count();
        if prefix_len > self.length {
            return Err(ConfigError::InvalidLength(format!(
                "Length {} is shorter than the {}-character prefix",
                self.length, prefix_len
            )));
        }

        if self.alphabet.is_empty() && self.length > prefix_len {
            return Err(ConfigError::InvalidAlphabet(
                "Alphabet cannot be empty".into(),
            ));
        }

        Ok(())
    }

    pub fn alphabet(&self) -> Alphabet {
        Alphabet::new(self.alphabet.as_str())
    }

    /// Returns the progress interval, or `None` if reporting is disabled
    pub fn report_interval(&self) -> Option<Duration> {
        (self.report_interval > 0).then(|| Duration::from_secs(self.report_interval))
    }

    /// Default log filter when `RUST_LOG` is unset
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }

    /// Builds the search request for `targets`
    pub fn search_request(&self, targets: impl Into<Arc<DigestSet>>) -> SearchRequest {
        SearchRequest::new(targets, self.length, self.alphabet())
            .with_prefix(self.prefix.as_str())
            .with_cores(self.worker_count())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid alphabet: {0}")]
    InvalidAlphabet(String),
    #[error("Invalid cores: {0}")]
    InvalidCores(String),
    #[error("Invalid length: {0}")]
    InvalidLength(String),
}
