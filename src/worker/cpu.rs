//! CPU worker that runs filter steps off the shared task queue.

use std::any::Any;
use std::ops::ControlFlow;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};

use crate::error::Result;
use crate::hashing::Digester;
use crate::search::{crack_with, TaskDescriptor};

/// Shared counters for all workers in a pool.
#[derive(Debug, Default)]
pub struct WorkerStats {
    /// Candidates digested
    pub candidates_checked: AtomicU64,
    /// Matches found
    pub matches_found: AtomicU64,
    /// Tasks run to completion
    pub tasks_completed: AtomicU64,
}

impl WorkerStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_candidates(&self) -> u64 {
        self.candidates_checked.load(Ordering::Relaxed)
    }

    pub fn total_matches(&self) -> u64 {
        self.matches_found.load(Ordering::Relaxed)
    }

    pub fn total_tasks(&self) -> u64 {
        self.tasks_completed.load(Ordering::Relaxed)
    }
}

/// A task tagged with its dispatch position.
#[derive(Debug)]
pub(crate) struct Job {
    pub index: usize,
    pub task: TaskDescriptor,
}

/// What a worker reports back for one job.
#[derive(Debug)]
pub(crate) enum Outcome {
    Done {
        index: usize,
        matches: Vec<String>,
    },
    Failed {
        task: TaskDescriptor,
        reason: String,
    },
    /// Dropped because the stop flag was raised.
    Abandoned,
}

/// A CPU worker thread body.
pub struct CpuWorker {
    /// Worker ID
    id: usize,
    /// Digest function for every candidate
    digester: Arc<dyn Digester>,
    /// Shared task queue
    job_rx: Receiver<Job>,
    /// Channel to send outcomes
    result_tx: Sender<Outcome>,
    /// Shared stop flag
    stop_flag: Arc<AtomicBool>,
    /// Pool statistics
    stats: Arc<WorkerStats>,
}

impl CpuWorker {
    pub(crate) fn new(
        id: usize,
        digester: Arc<dyn Digester>,
        job_rx: Receiver<Job>,
        result_tx: Sender<Outcome>,
        stop_flag: Arc<AtomicBool>,
        stats: Arc<WorkerStats>,
    ) -> Self {
        Self {
            id,
            digester,
            job_rx,
            result_tx,
            stop_flag,
            stats,
        }
    }

    /// Runs queued jobs until:
    /// - The queue is closed and drained
    /// - Stop flag is set
    /// - The result channel is closed
    pub fn run(&self) {
        for job in self.job_rx.iter() {
            if self.stop_flag.load(Ordering::Relaxed) {
                let _ = self.result_tx.send(Outcome::Abandoned);
                break;
            }

            tracing::debug!(worker = self.id, task = %job.task, "task started");
            let outcome = match panic::catch_unwind(AssertUnwindSafe(|| self.execute(&job.task))) {
                Ok(Ok(Some(matches))) => {
                    self.stats.tasks_completed.fetch_add(1, Ordering::Relaxed);
                    self.stats
                        .matches_found
                        .fetch_add(matches.len() as u64, Ordering::Relaxed);
                    tracing::debug!(
                        worker = self.id,
                        task = %job.task,
                        matches = matches.len(),
                        "task finished"
                    );
                    Outcome::Done {
                        index: job.index,
                        matches,
                    }
                }
                Ok(Ok(None)) => Outcome::Abandoned,
                Ok(Err(e)) => Outcome::Failed {
                    task: job.task,
                    reason: e.to_string(),
                },
                Err(payload) => Outcome::Failed {
                    task: job.task,
                    reason: panic_message(payload.as_ref()),
                },
            };

            let stop = !matches!(outcome, Outcome::Done { .. });
            if self.result_tx.send(outcome).is_err() || stop {
                break;
            }
        }
    }

    fn execute(&self, task: &TaskDescriptor) -> Result<Option<Vec<String>>> {
        crack_with(
            &task.targets,
            task.remaining,
            &task.alphabet,
            &task.prefix,
            self.digester.as_ref(),
            |checked| {
                self.stats
                    .candidates_checked
                    .fetch_add(checked, Ordering::Relaxed);
                if self.stop_flag.load(Ordering::Relaxed) {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            },
        )
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {}", s)
    } else {
        "panicked".into()
    }
}
