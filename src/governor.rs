//! Request governor for outgoing analysis calls
//!
//! Tasks are pushed onto an unbounded FIFO channel and executed one at a time
//! by a single worker loop, modelled on an actor. Before each start the
//! worker sleeps until both limits allow it:
//!
//! - at least `min_spacing` since the previous task started
//! - fewer than `max_per_window` starts within the trailing `window`
//!
//! Timing uses `tokio::time`, so tests can drive it with paused time.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

use crate::config::GovernorConfig;
use crate::error::{KeywordError, KeywordResult};

type Job = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Message types for the governor worker
enum GovernorMessage {
    Run(Job),
    /// Stop accepting work; already queued jobs still run
    Shutdown,
}

struct GovernorWorker {
    receiver: mpsc::UnboundedReceiver<GovernorMessage>,
    config: GovernorConfig,
    last_start: Option<Instant>,
    /// Start instants inside the trailing window, oldest first
    recent_starts: VecDeque<Instant>,
}

impl GovernorWorker {
    async fn run(mut self) {
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                GovernorMessage::Run(job) => {
                    self.wait_for_slot().await;
                    self.record_start();

                    // Run on its own task so a panicking job cannot take the worker down
                    if let Err(e) = tokio::spawn(job).await {
                        warn!("Governed task aborted: {}", e);
                    }
                }
                GovernorMessage::Shutdown => {
                    info!("Request governor shutting down, draining queued tasks");
                    self.receiver.close();
                }
            }
        }

        debug!("Request governor worker stopped");
    }

    async fn wait_for_slot(&mut self) {
        let max_per_window = self.config.max_per_window.max(1) as usize;

        loop {
            let now = Instant::now();
            while let Some(&oldest) = self.recent_starts.front() {
                if now.duration_since(oldest) >= self.config.window {
                    self.recent_starts.pop_front();
                } else {
                    break;
                }
            }

            if self.recent_starts.len() >= max_per_window {
                if let Some(&oldest) = self.recent_starts.front() {
                    let ready_at = oldest + self.config.window;
                    debug!(
                        wait_ms = ready_at.duration_since(now).as_millis() as u64,
                        "Per-window quota reached, waiting"
                    );
                    sleep_until(ready_at).await;
                    continue;
                }
            }

            if let Some(last) = self.last_start {
                let ready_at = last + self.config.min_spacing;
                if ready_at > now {
                    sleep_until(ready_at).await;
                    continue;
                }
            }

            return;
        }
    }

    fn record_start(&mut self) {
        let now = Instant::now();
        self.last_start = Some(now);
        self.recent_starts.push_back(now);
    }
}

/// Serializes governed tasks in submission order.
///
/// Requires a running tokio runtime at construction.
pub struct RequestGovernor {
    sender: mpsc::UnboundedSender<GovernorMessage>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl RequestGovernor {
    pub fn new(config: GovernorConfig) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();

        let worker = GovernorWorker {
            receiver,
            config,
            last_start: None,
            recent_starts: VecDeque::new(),
        };

        let handle = tokio::spawn(async move {
            worker.run().await;
        });

        Self {
            sender,
            worker: Mutex::new(Some(handle)),
        }
    }

    /// Queue `task` and wait for its output.
    ///
    /// The task's own result is returned unchanged; governor failures are
    /// reported separately (`GovernorClosed` when shut down, `TaskAborted`
    /// when the task panicked).
    pub async fn admit<Fut, T>(&self, task: Fut) -> KeywordResult<T>
    where
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let (result_tx, result_rx) = oneshot::channel();
        let job: Job = Box::pin(async move {
            let output = task.await;
            let _ = result_tx.send(output);
        });

        self.sender
            .send(GovernorMessage::Run(job))
            .map_err(|_| KeywordError::GovernorClosed)?;

        result_rx.await.map_err(|_| KeywordError::TaskAborted)
    }

    /// Stop intake, let queued tasks finish, and wait for the worker to exit
    pub async fn shutdown(&self) {
        let _ = self.sender.send(GovernorMessage::Shutdown);
        if let Some(handle) = self.worker.lock().await.take() {
            if let Err(e) = handle.await {
                warn!("Request governor worker failed: {}", e);
            }
        }
    }
}
