//! Bounded, cancellable execution of one unit of work.
//!
//! A worker thread runs the job and sends its result into a channel slot
//! it exclusively owns; the supervising thread polls that slot on a fixed
//! tick. When the wall-clock budget elapses, the supervisor sets the
//! job's cancellation token and abandons the worker — the worker observes
//! the token at its own iteration boundaries and winds down on its own.
//! Units own no shared resources, so an abandoned worker needs no cleanup.

use grapheq_symbolic::CancelToken;
use log::warn;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

/// Wall-clock budget and poll interval for one bounded unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundedConfig {
    pub budget: Duration,
    pub poll: Duration,
}

impl Default for BoundedConfig {
    fn default() -> Self {
        BoundedConfig {
            budget: Duration::from_secs(10),
            poll: Duration::from_millis(100),
        }
    }
}

/// Result of a bounded run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundedOutcome<T> {
    Completed(T),
    /// The budget elapsed; the worker was cancelled and abandoned.
    TimedOut,
    /// The worker died without producing a value (a panic in the job).
    Failed,
}

/// Run `job` on a worker thread under `config`.
pub fn run<T, F>(config: BoundedConfig, job: F) -> BoundedOutcome<T>
where
    T: Send + 'static,
    F: FnOnce(&CancelToken) -> T + Send + 'static,
{
    let token = CancelToken::new();
    let worker_token = token.clone();
    let (tx, rx) = mpsc::channel();

    let handle = thread::spawn(move || {
        // The receiver may be gone if the supervisor already gave up;
        // nothing to do about it, and nothing to clean up.
        let _ = tx.send(job(&worker_token));
    });

    let deadline = Instant::now() + config.budget;
    loop {
        match rx.try_recv() {
            Ok(value) => {
                let _ = handle.join();
                return BoundedOutcome::Completed(value);
            }
            Err(mpsc::TryRecvError::Disconnected) => {
                warn!("bounded worker died without a result");
                let _ = handle.join();
                return BoundedOutcome::Failed;
            }
            Err(mpsc::TryRecvError::Empty) => {
                if Instant::now() >= deadline {
                    token.cancel();
                    warn!("bounded worker exceeded its {:?} budget", config.budget);
                    return BoundedOutcome::TimedOut;
                }
                thread::sleep(config.poll);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_config() -> BoundedConfig {
        BoundedConfig {
            budget: Duration::from_millis(200),
            poll: Duration::from_millis(10),
        }
    }

    #[test]
    fn quick_jobs_complete() {
        let outcome = run(fast_config(), |_| 41 + 1);
        assert_eq!(outcome, BoundedOutcome::Completed(42));
    }

    #[test]
    fn overrunning_jobs_time_out_and_observe_cancellation() {
        let started = Instant::now();
        let outcome = run(fast_config(), |token: &CancelToken| {
            // A cooperative unit: spins until told to stop.
            while !token.is_cancelled() {
                thread::sleep(Duration::from_millis(5));
            }
        });
        assert_eq!(outcome, BoundedOutcome::TimedOut);
        assert!(started.elapsed() >= Duration::from_millis(200));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn panicking_jobs_are_reported_as_failed() {
        let outcome = run(fast_config(), |_| -> i32 { panic!("boom") });
        assert_eq!(outcome, BoundedOutcome::Failed);
    }
}
