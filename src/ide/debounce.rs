//! Debounced analysis scheduling.
//!
//! [`Debouncer`] is the pure state machine; [`spawn_scheduler`] drives it on
//! a tokio task, running the analysis host when the quiet period expires and
//! publishing each finished pass as an [`AnalysisReport`].
//!
//! ```text
//!   edit            deadline           pass finished
//! Idle ──► Pending ─────────► Running ───────────────► Idle
//!            ▲  │ edit                 │ edit
//!            └──┘◄─────────────────────┘  (running pass cancelled)
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;
use tracing::trace;

use super::analysis::AnalysisHost;
use crate::metadata::MetadataSource;
use crate::semantic::Diagnostic;

/// Where the debouncer is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    Idle,
    /// Waiting for the quiet period after edit `generation` to pass.
    Pending { deadline: Instant, generation: u64 },
    /// The pass for `generation` is in flight.
    Running { generation: u64 },
}

/// Explicit debounce state machine. Every edit gets a new generation;
/// only the latest generation is ever analysed or reported.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    state: DebounceState,
    generation: u64,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            state: DebounceState::Idle,
            generation: 0,
        }
    }

    pub fn state(&self) -> DebounceState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Record an edit at `now`, replacing any pending or running pass.
    pub fn on_edit(&mut self, now: Instant) -> u64 {
        self.generation += 1;
        trace!(generation = self.generation, previous = ?self.state, "edit");
        self.state = DebounceState::Pending {
            deadline: now + self.window,
            generation: self.generation,
        };
        self.generation
    }

    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            DebounceState::Pending { deadline, .. } => Some(deadline),
            _ => None,
        }
    }

    /// Start the pending pass if its deadline has passed.
    pub fn on_deadline(&mut self, now: Instant) -> Option<u64> {
        match self.state {
            DebounceState::Pending {
                deadline,
                generation,
            } if now >= deadline => {
                trace!(generation, "quiet period over; running");
                self.state = DebounceState::Running { generation };
                Some(generation)
            }
            _ => None,
        }
    }

    /// Record that the pass for `generation` finished. Returns `false` for a
    /// stale pass whose result must be dropped.
    pub fn on_finished(&mut self, generation: u64) -> bool {
        match self.state {
            DebounceState::Running { generation: current } if current == generation => {
                self.state = DebounceState::Idle;
                true
            }
            _ => {
                trace!(generation, "dropping stale pass");
                false
            }
        }
    }
}

/// Diagnostics for one analysed snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisReport {
    pub generation: u64,
    pub diagnostics: Vec<Diagnostic>,
}

/// Feeds edits to a running scheduler. Dropping it stops the scheduler.
#[derive(Debug)]
pub struct SchedulerHandle {
    edits: mpsc::UnboundedSender<String>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Submit the full document text after an edit.
    pub fn edit(&self, text: impl Into<String>) {
        // The task only exits once this sender is gone.
        let _ = self.edits.send(text.into());
    }

    /// Stop the scheduler and wait for it to exit.
    pub async fn shutdown(self) {
        let SchedulerHandle { edits, task } = self;
        drop(edits);
        let _ = task.await;
    }
}

/// Run `host` on the latest text once edits pause for the host's
/// configured debounce window.
///
/// A new edit cancels the pending schedule and any running pass. Reports
/// arrive on the returned receiver in generation order.
pub fn spawn_scheduler<S>(
    host: Arc<AnalysisHost<S>>,
) -> (SchedulerHandle, mpsc::UnboundedReceiver<AnalysisReport>)
where
    S: MetadataSource + 'static,
{
    let window = host.config().debounce;
    let (edits_tx, edits_rx) = mpsc::unbounded_channel();
    let (reports_tx, reports_rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(run_scheduler(host, window, edits_rx, reports_tx));
    (
        SchedulerHandle {
            edits: edits_tx,
            task,
        },
        reports_rx,
    )
}

async fn run_scheduler<S>(
    host: Arc<AnalysisHost<S>>,
    window: Duration,
    mut edits: mpsc::UnboundedReceiver<String>,
    reports: mpsc::UnboundedSender<AnalysisReport>,
) where
    S: MetadataSource + 'static,
{
    let mut debouncer = Debouncer::new(window);
    let mut snapshot = String::new();
    let mut running: Option<CancellationToken> = None;
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<(u64, Option<Vec<Diagnostic>>)>();

    loop {
        let deadline = debouncer.deadline();
        tokio::select! {
            edit = edits.recv() => {
                let Some(text) = edit else {
                    break;
                };
                if let Some(token) = running.take() {
                    token.cancel();
                }
                snapshot = text;
                debouncer.on_edit(Instant::now());
            }
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                let Some(generation) = debouncer.on_deadline(Instant::now()) else {
                    continue;
                };
                let token = CancellationToken::new();
                running = Some(token.clone());
                let host = Arc::clone(&host);
                let text = snapshot.clone();
                let done = done_tx.clone();
                tokio::spawn(async move {
                    let diagnostics = host.diagnostics(&text, &token).await;
                    let _ = done.send((generation, diagnostics));
                });
            }
            Some((generation, diagnostics)) = done_rx.recv() => {
                if !debouncer.on_finished(generation) {
                    continue;
                }
                running = None;
                if let Some(diagnostics) = diagnostics
                    && reports.send(AnalysisReport { generation, diagnostics }).is_err()
                {
                    break;
                }
            }
        }
    }

    if let Some(token) = running {
        token.cancel();
    }
    trace!("scheduler stopped");
}
