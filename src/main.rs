//! Brute-force digest recovery CLI
//!
//! Usage:
//!   smash -l 4 -s hashes.txt                # every 4-char string over a-z0-9
//!   smash -a 0123456789 -l 6 -p 12 -c 8     # 6 digits starting with "12", 8 workers
//!   smash -l 5 -d sha256 --all-cores -o found.txt

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use smash::hashing::{Algorithm, Digester};
use smash::{partition, Config, DigestSet, Progress, SmashError, WorkerPool};

fn main() {
    let config = Config::parse();
    init_tracing(config.log_filter());

    if let Err(e) = config.validate() {
        tracing::error!("Configuration error: {}", e);
        process::exit(1);
    }

    let code = match run(&config) {
        Ok(()) => 0,
        Err(SmashError::Cancelled) => {
            tracing::warn!("Stopped by user; partial results discarded");
            130
        }
        Err(e) => {
            tracing::error!("{}", e);
            1
        }
    };
    process::exit(code);
}

fn run(config: &Config) -> Result<(), SmashError> {
    let digest: Algorithm = config.digest;
    let targets = DigestSet::load(&config.hashes)?;
    tracing::info!(
        path = %config.hashes.display(),
        digests = targets.len(),
        "loaded targets"
    );

    let mismatched = targets.count_mismatched(digest.hex_len());
    if mismatched > 0 {
        tracing::warn!(
            count = mismatched,
            expected_len = digest.hex_len(),
            "some targets are not {} digests and can never match",
            digest
        );
    }

    let request = config.search_request(targets);
    if request.alphabet.has_duplicates() {
        tracing::warn!("alphabet contains repeated characters; matches may repeat");
    }
    let tasks = partition(&request)?;

    tracing::info!(
        length = request.length,
        prefix = %request.prefix,
        alphabet = request.alphabet.len(),
        space = %space_description(request.alphabet.space_size(request.remaining())),
        workers = request.cores,
        "starting search"
    );

    let pool = WorkerPool::new(request.cores, Arc::new(digest))?;
    ctrlc_handler(pool.stop_flag_clone());

    let matches = pool.run_with_progress(tasks, config.report_interval(), print_progress)?;

    write_matches(config, &matches).map_err(|source| SmashError::WriteMatches {
        path: config.output.clone().unwrap_or_else(|| "<stdout>".into()),
        source,
    })?;
    tracing::info!(matches = matches.len(), "search complete");
    Ok(())
}

fn write_matches(config: &Config, matches: &[String]) -> io::Result<()> {
    let mut out: Box<dyn Write> = match &config.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    for candidate in matches {
        writeln!(out, "{}", candidate)?;
    }
    out.flush()
}

fn print_progress(progress: &Progress) {
    tracing::info!(
        "[{:>4}s] Checked {} candidates ({}/s), {}/{} tasks, {} match(es)",
        progress.elapsed.as_secs(),
        format_number(progress.candidates_checked),
        format_number(progress.rate() as u64),
        progress.tasks_completed,
        progress.tasks_total,
        progress.matches_found
    );
}

fn space_description(size: Option<u128>) -> String {
    match size {
        Some(n) => match u64::try_from(n) {
            Ok(n) => format_number(n),
            Err(_) => n.to_string(),
        },
        None => "more than 2^128".into(),
    }
}

fn format_number(n: u64) -> String {
    if n >= 1_000_000_000 {
        format!("{:.2}B", n as f64 / 1_000_000_000.0)
    } else if n >= 1_000_000 {
        format!("{:.2}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.2}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false),
        )
        .init();
}

fn ctrlc_handler(stop_flag: Arc<AtomicBool>) {
    ctrlc::set_handler(move || {
        stop_flag.store(true, Ordering::Relaxed);
    })
    .expect("Error setting Ctrl-C handler");
}
