//! Fire-and-forget side effects.
//!
//! Engine commands mutate state synchronously and hand persistence writes and
//! notification requests to an [`EffectDispatcher`]. Failures are logged here
//! and never reach the caller of the command.
//!
//! Two dispatch modes are picked at composition time:
//!
//! - **Inline**: the collaborator runs immediately on the caller's thread.
//! - **Background**: effects are queued on an unbounded channel drained by a
//!   single tokio task, so they run in the order they were issued (a cancel
//!   always lands before the schedule that follows it, and an older snapshot
//!   never overwrites a newer one).

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};

use crate::notify::NotificationScheduler;
use crate::storage::KeyValueStore;
use crate::timer::SessionKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Persist { key: String, blob: String },
    ScheduleNotification { after_secs: u64, kind: SessionKind },
    CancelNotifications,
}

struct Collaborators {
    store: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn NotificationScheduler>,
}

impl Collaborators {
    fn run(&self, effect: Effect) {
        match effect {
            Effect::Persist { key, blob } => {
                if let Err(e) = self.store.set(&key, &blob) {
                    tracing::warn!(%key, error = %e, "failed to persist engine state");
                }
            }
            Effect::ScheduleNotification { after_secs, kind } => {
                if let Err(e) = self.notifier.schedule(after_secs, kind) {
                    tracing::warn!(after_secs, %kind, error = %e, "failed to schedule notification");
                }
            }
            Effect::CancelNotifications => {
                if let Err(e) = self.notifier.cancel_all() {
                    tracing::warn!(error = %e, "failed to cancel notifications");
                }
            }
        }
    }
}

enum Job {
    Run(Effect),
    Flush(oneshot::Sender<()>),
}

enum Mode {
    Inline,
    Background(mpsc::UnboundedSender<Job>),
}

pub struct EffectDispatcher {
    collaborators: Arc<Collaborators>,
    mode: Mode,
}

impl EffectDispatcher {
    /// Run every effect immediately on the calling thread.
    pub fn inline(
        store: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn NotificationScheduler>,
    ) -> Self {
        Self {
            collaborators: Arc::new(Collaborators { store, notifier }),
            mode: Mode::Inline,
        }
    }

    /// Queue effects onto a worker task spawned on `runtime`.
    pub fn background(
        store: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn NotificationScheduler>,
        runtime: &Handle,
    ) -> Self {
        let collaborators = Arc::new(Collaborators { store, notifier });
        let (tx, mut rx) = mpsc::unbounded_channel::<Job>();

        let worker = Arc::clone(&collaborators);
        runtime.spawn(async move {
            while let Some(job) = rx.recv().await {
                match job {
                    Job::Run(effect) => {
                        let c = Arc::clone(&worker);
                        // One at a time, in send order.
                        if let Err(e) = tokio::task::spawn_blocking(move || c.run(effect)).await {
                            tracing::warn!(error = %e, "side effect task panicked");
                        }
                    }
                    Job::Flush(done) => {
                        let _ = done.send(());
                    }
                }
            }
            tracing::debug!("effect worker stopped");
        });

        Self {
            collaborators,
            mode: Mode::Background(tx),
        }
    }

    pub fn is_background(&self) -> bool {
        matches!(self.mode, Mode::Background(_))
    }

    /// The durable store effects are written to. Used for rehydration.
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.collaborators.store
    }

    pub fn dispatch(&self, effect: Effect) {
        match &self.mode {
            Mode::Inline => self.collaborators.run(effect),
            Mode::Background(tx) => {
                if let Err(mpsc::error::SendError(job)) = tx.send(Job::Run(effect)) {
                    tracing::warn!("effect worker is gone, running effect inline");
                    if let Job::Run(effect) = job {
                        self.collaborators.run(effect);
                    }
                }
            }
        }
    }

    /// Wait until every effect dispatched so far has run.
    pub async fn flush(&self) {
        if let Mode::Background(tx) = &self.mode {
            let (done_tx, done_rx) = oneshot::channel();
            if tx.send(Job::Flush(done_tx)).is_ok() {
                let _ = done_rx.await;
            }
        }
    }
}
