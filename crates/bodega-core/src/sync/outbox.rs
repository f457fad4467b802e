//! Best-effort mirror queue
//!
//! A local mutation enqueues its remote mirror here instead of detaching an
//! unobserved task. One worker drains the queue in order, retries with
//! backoff, and reports jobs that stay failed through a caller-supplied
//! hook. Nothing is ever rolled back locally; a later sync repairs whatever
//! the mirror missed.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::Collection;

/// Remote operation a mirror job performs.
///
/// A job covers the whole mutation mirror: the entity write and the remote
/// clock write run inside one job, so a failed entity write never advances
/// the remote clock (which would mask the difference from the next sync).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorOp {
    /// Upsert one record on the remote store, then write the clock.
    SaveEntity,
    /// Delete one record on the remote store, then write the clock.
    DeleteEntity,
}

impl MirrorOp {
    /// Small integer code reported with failures (legacy error codes).
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::SaveEntity => 1,
            Self::DeleteEntity => 2,
        }
    }
}

impl fmt::Display for MirrorOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SaveEntity => f.write_str("save"),
            Self::DeleteEntity => f.write_str("delete"),
        }
    }
}

/// A mirror job that exhausted its retries.
#[derive(Debug, Clone)]
pub struct MirrorFailure {
    pub collection: Collection,
    pub op: MirrorOp,
    /// Display form of the last error
    pub message: String,
}

/// Retry discipline for mirror jobs.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts per job, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles on each retry after that.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(50),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `retry` (1-based).
    fn delay_before(self, retry: u32) -> Duration {
        self.base_delay * 2_u32.saturating_pow(retry.saturating_sub(1))
    }
}

type JobFuture = BoxFuture<'static, Result<()>>;
type JobFactory = Box<dyn Fn() -> JobFuture + Send>;
type ErrorHook = Arc<dyn Fn(MirrorFailure) + Send + Sync>;

struct Job {
    collection: Collection,
    op: MirrorOp,
    run: JobFactory,
}

enum Message {
    Job(Job),
    Flush(oneshot::Sender<()>),
}

/// Queue of pending remote mirrors with a single background worker.
///
/// The single worker processes jobs strictly in enqueue order, so two rapid
/// mutations of the same record mirror in the order they were issued.
pub struct Outbox {
    tx: mpsc::UnboundedSender<Message>,
    worker: JoinHandle<()>,
}

impl Outbox {
    /// Spawn the worker. `on_error` receives every job that stayed failed
    /// after retries; the job is then dropped.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn new(
        policy: RetryPolicy,
        on_error: impl Fn(MirrorFailure) + Send + Sync + 'static,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run_worker(rx, policy, Arc::new(on_error)));
        Self { tx, worker }
    }

    /// Queue one mirror job. The factory is invoked once per attempt, so the
    /// job can be re-run after a failure.
    pub fn enqueue(
        &self,
        collection: Collection,
        op: MirrorOp,
        run: impl Fn() -> JobFuture + Send + 'static,
    ) -> Result<()> {
        self.tx
            .send(Message::Job(Job {
                collection,
                op,
                run: Box::new(run),
            }))
            .map_err(|_| Error::Remote("mirror queue is closed".to_string()))
    }

    /// Wait until every job queued so far has been processed.
    pub async fn flush(&self) -> Result<()> {
        let (done_tx, done_rx) = oneshot::channel();
        self.tx
            .send(Message::Flush(done_tx))
            .map_err(|_| Error::Remote("mirror queue is closed".to_string()))?;
        done_rx
            .await
            .map_err(|_| Error::Remote("mirror worker stopped".to_string()))
    }

    /// Close the queue and wait for the worker to drain it.
    pub async fn close(self) -> Result<()> {
        drop(self.tx);
        self.worker
            .await
            .map_err(|_| Error::Remote("mirror worker panicked".to_string()))
    }
}

async fn run_worker(
    mut rx: mpsc::UnboundedReceiver<Message>,
    policy: RetryPolicy,
    on_error: ErrorHook,
) {
    while let Some(message) = rx.recv().await {
        match message {
            Message::Flush(done) => {
                let _ = done.send(());
            }
            Message::Job(job) => run_job(job, policy, &on_error).await,
        }
    }
}

async fn run_job(job: Job, policy: RetryPolicy, on_error: &ErrorHook) {
    let mut last_error = None;
    for attempt in 1..=policy.max_attempts.max(1) {
        if attempt > 1 {
            tokio::time::sleep(policy.delay_before(attempt - 1)).await;
        }
        match (job.run)().await {
            Ok(()) => {
                if attempt > 1 {
                    debug!(
                        collection = %job.collection,
                        op = %job.op,
                        attempt,
                        "mirror succeeded after retry"
                    );
                }
                return;
            }
            Err(error) => {
                debug!(
                    collection = %job.collection,
                    op = %job.op,
                    attempt,
                    %error,
                    "mirror attempt failed"
                );
                last_error = Some(error);
            }
        }
    }

    let message = last_error.map_or_else(String::new, |error| error.to_string());
    warn!(
        collection = %job.collection,
        op = %job.op,
        code = job.op.code(),
        %message,
        "mirror gave up; the next sync will repair the remote side"
    );
    on_error(MirrorFailure {
        collection: job.collection,
        op: job.op,
        message,
    });
}
