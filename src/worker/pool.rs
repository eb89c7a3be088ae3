//! Worker pool management.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};

use crate::error::{Result, SmashError};
use crate::hashing::Digester;
use crate::search::{Aggregator, TaskDescriptor};

use super::cpu::{CpuWorker, Job, Outcome, WorkerStats};

/// Snapshot of a running search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub candidates_checked: u64,
    pub matches_found: u64,
    pub tasks_completed: u64,
    pub tasks_total: usize,
    pub elapsed: Duration,
}

impl Progress {
    /// Candidates per second since the pool started.
    pub fn rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.candidates_checked as f64 / secs
        } else {
            0.0
        }
    }
}

/// A fixed-size pool of worker threads fed from one task queue.
pub struct WorkerPool {
    /// Number of workers
    num_workers: usize,
    /// Digest function shared by every worker
    digester: Arc<dyn Digester>,
    /// Worker thread handles (Option to allow taking during drop)
    handles: Option<Vec<JoinHandle<()>>>,
    /// Task queue; dropped once every task is dispatched
    job_tx: Option<Sender<Job>>,
    /// Channel receiver for outcomes
    result_rx: Receiver<Outcome>,
    /// Shared stop flag
    stop_flag: Arc<AtomicBool>,
    /// Shared statistics
    stats: Arc<WorkerStats>,
    /// Start time
    start_time: Instant,
}

impl WorkerPool {
    /// Spawns `num_workers` idle workers.
    pub fn new(num_workers: usize, digester: Arc<dyn Digester>) -> Result<Self> {
        if num_workers == 0 {
            return Err(SmashError::invalid("worker count must be at least 1"));
        }

        let (job_tx, job_rx) = unbounded();
        let (result_tx, result_rx) = unbounded();
        let stop_flag = Arc::new(AtomicBool::new(false));
        let stats = Arc::new(WorkerStats::new());

        let handles = (0..num_workers)
            .map(|id| {
                let digester = digester.clone();
                let job_rx = job_rx.clone();
                let result_tx = result_tx.clone();
                let stop_flag = stop_flag.clone();
                let stats = stats.clone();

                thread::Builder::new()
                    .name(format!("smash-worker-{}", id))
                    .spawn(move || {
                        let worker =
                            CpuWorker::new(id, digester, job_rx, result_tx, stop_flag, stats);
                        worker.run();
                    })
                    .map_err(SmashError::Spawn)
            })
            .collect::<Result<Vec<_>>>()?;

        // the channel disconnects once every worker has exited
        drop(result_tx);

        Ok(Self {
            num_workers,
            digester,
            handles: Some(handles),
            job_tx: Some(job_tx),
            result_rx,
            stop_flag,
            stats,
            start_time: Instant::now(),
        })
    }

    /// Runs every task and returns their matches concatenated in dispatch
    /// order. Blocks until the whole space has been checked.
    pub fn run(self, tasks: Vec<TaskDescriptor>) -> Result<Vec<String>> {
        self.run_with_progress(tasks, None, |_| {})
    }

    /// Like [`run`](Self::run), calling `on_progress` every `interval` while
    /// waiting. `None` waits without reporting.
    pub fn run_with_progress<F>(
        mut self,
        tasks: Vec<TaskDescriptor>,
        interval: Option<Duration>,
        mut on_progress: F,
    ) -> Result<Vec<String>>
    where
        F: FnMut(&Progress),
    {
        let total = tasks.len();
        let mut aggregator = Aggregator::new(total);

        tracing::info!(
            tasks = total,
            workers = self.num_workers,
            digest = self.digester.name(),
            "dispatching search"
        );

        if let Some(job_tx) = self.job_tx.take() {
            for (index, task) in tasks.iter().cloned().enumerate() {
                if let Err(err) = job_tx.send(Job { index, task }) {
                    return Err(SmashError::WorkerFailure {
                        task: Box::new(err.into_inner().task),
                        reason: "worker pool shut down before dispatch".into(),
                    });
                }
            }
        }

        let mut next_report = interval.map(|interval| (interval, Instant::now() + interval));

        while !aggregator.is_complete() {
            if self.is_stopped() {
                return Err(SmashError::Cancelled);
            }

            let received = match next_report {
                Some((_, deadline)) => self.result_rx.recv_deadline(deadline),
                None => self
                    .result_rx
                    .recv()
                    .map_err(|_| RecvTimeoutError::Disconnected),
            };

            // report on schedule whether or not an outcome arrived
            if let Some((interval, deadline)) = next_report.as_mut() {
                let now = Instant::now();
                if now >= *deadline {
                    on_progress(&self.progress(total));
                    *deadline = now + *interval;
                }
            }

            let outcome = match received {
                Ok(outcome) => outcome,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => break,
            };

            match outcome {
                Outcome::Done { index, matches } => aggregator.insert(index, matches),
                Outcome::Failed { task, reason } => {
                    self.stop();
                    tracing::error!(task = %task, reason = %reason, "worker failed");
                    return Err(SmashError::WorkerFailure {
                        task: Box::new(task),
                        reason,
                    });
                }
                Outcome::Abandoned => return Err(SmashError::Cancelled),
            }
        }

        if self.is_stopped() {
            return Err(SmashError::Cancelled);
        }
        on_progress(&self.progress(total));

        match aggregator.first_outstanding() {
            None => Ok(aggregator.finish().unwrap_or_default()),
            Some(index) => Err(SmashError::WorkerFailure {
                task: Box::new(tasks[index].clone()),
                reason: "all workers exited before the task was run".into(),
            }),
        }
    }

    /// Current statistics for a run of `tasks_total` tasks.
    pub fn progress(&self, tasks_total: usize) -> Progress {
        Progress {
            candidates_checked: self.stats.total_candidates(),
            matches_found: self.stats.total_matches(),
            tasks_completed: self.stats.total_tasks(),
            tasks_total,
            elapsed: self.elapsed(),
        }
    }

    /// Signals all workers to stop.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::Relaxed);
    }

    /// Returns the elapsed time since the pool was created.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Returns a clone of the stop flag for external use (e.g., signal handlers).
    pub fn stop_flag_clone(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }

    /// Returns true if the pool has been signaled to stop.
    pub fn is_stopped(&self) -> bool {
        self.stop_flag.load(Ordering::Relaxed)
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.stop();
        // workers exit once the queue is closed and drained
        drop(self.job_tx.take());
        if let Some(handles) = self.handles.take() {
            for handle in handles {
                let _ = handle.join();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::{Algorithm, DigestSet};
    use crate::search::{partition, Alphabet, SearchRequest};

    /// MD5 that sleeps before every digest.
    struct Slow(Duration);

    impl Digester for Slow {
        fn name(&self) -> &'static str {
            "slow-md5"
        }
        fn hex_len(&self) -> usize {
            32
        }
        fn hex_digest(&self, input: &[u8]) -> String {
            thread::sleep(self.0);
            Algorithm::Md5.hex_digest(input)
        }
    }

    fn md5_set(plain: &[&str]) -> DigestSet {
        plain
            .iter()
            .map(|p| Algorithm::Md5.hex_digest(p.as_bytes()))
            .collect()
    }

    fn run(request: &SearchRequest) -> Result<Vec<String>> {
        let tasks = partition(request)?;
        WorkerPool::new(request.cores, Arc::new(Algorithm::Md5))?.run(tasks)
    }

    #[test]
    fn test_zero_workers_rejected() {
        let err = WorkerPool::new(0, Arc::new(Algorithm::Md5)).err().unwrap();
        assert!(matches!(err, SmashError::InvalidInput(_)));
    }

    #[test]
    fn test_dispatch_order_across_workers() {
        let targets = md5_set(&["dcb", "abc", "cab", "bbb"]);
        let request = SearchRequest::new(targets, 3, Alphabet::new("abcd"))
            .with_cores(4);
        assert_eq!(run(&request).unwrap(), vec!["abc", "bbb", "cab", "dcb"]);
    }

    #[test]
    fn test_empty_task_list() {
        let pool = WorkerPool::new(2, Arc::new(Algorithm::Md5)).unwrap();
        assert!(pool.run(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn test_stats_cover_whole_space() {
        let request = SearchRequest::new(md5_set(&["zz"]), 3, Alphabet::new("xyz"))
            .with_cores(2);
        let tasks = partition(&request).unwrap();
        let pool = WorkerPool::new(2, Arc::new(Algorithm::Md5)).unwrap();
        let mut last = None;
        let found = pool
            .run_with_progress(tasks, Some(Duration::from_millis(1)), |p| last = Some(*p))
            .unwrap();
        assert!(found.is_empty());
        let last = last.unwrap();
        assert_eq!(last.candidates_checked, 27);
        assert_eq!(last.tasks_completed, 3);
        assert_eq!(last.tasks_total, 3);
    }

    #[test]
    fn test_pre_stopped_pool_cancels() {
        let request = SearchRequest::new(DigestSet::new(), 2, Alphabet::new("ab"));
        let tasks = partition(&request).unwrap();
        let pool = WorkerPool::new(1, Arc::new(Algorithm::Md5)).unwrap();
        pool.stop();
        assert!(matches!(pool.run(tasks), Err(SmashError::Cancelled)));
    }

    #[test]
    fn test_progress_reported_while_tasks_keep_finishing() {
        // 20 one-candidate tasks of ~30ms each, so some task finishes well
        // inside every 50ms interval
        let alphabet = Alphabet::new("abcdefghijklmnopqrst");
        let request = SearchRequest::new(DigestSet::new(), 1, alphabet);
        let tasks = partition(&request).unwrap();
        assert_eq!(tasks.len(), 20);

        let pool = WorkerPool::new(1, Arc::new(Slow(Duration::from_millis(30)))).unwrap();
        let mut calls = 0;
        pool.run_with_progress(tasks, Some(Duration::from_millis(50)), |_| calls += 1)
            .unwrap();
        assert!(calls >= 5, "only {} progress report(s)", calls);
    }

    #[test]
    fn test_stop_during_run_cancels() {
        let request = SearchRequest::new(md5_set(&["00000"]), 5, Alphabet::new("0123456789"))
            .with_cores(2);
        let tasks = partition(&request).unwrap();
        let pool = WorkerPool::new(2, Arc::new(Slow(Duration::from_micros(100)))).unwrap();

        let stop_flag = pool.stop_flag_clone();
        let stopper = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            stop_flag.store(true, Ordering::Relaxed);
        });

        let started = Instant::now();
        let result = pool.run(tasks);
        stopper.join().unwrap();

        assert!(matches!(result, Err(SmashError::Cancelled)));
        // 10 tasks of 10k candidates at 100us each would take ~5s on two workers
        assert!(started.elapsed() < Duration::from_secs(3));
    }
}
