//! Paced Sessions
//!
//! Wraps a [`WizardEngine`] in [`Delivery::Deferred`](crate::engine::Delivery)
//! mode and plays its queued assistant lines back with their delays, the way a
//! chat front end shows a "typing" pause before each message.
//!
//! ```text
//!  visitor action ──► engine (Mutex) ──► pending prompts ──► delivery task
//!                         │                                     │ sleep(delay)
//!                         ▼                                     ▼
//!                   watch::Sender<SessionSnapshot> ◄──── engine.deliver()
//! ```
//!
//! One delivery task runs per session, so lines arrive in the order they were
//! produced. A reset aborts the task; any line it still held is also rejected
//! by the engine's session-id check.

use std::sync::Arc;

use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, trace};
use uuid::Uuid;

use crate::engine::{OptionItem, PendingPrompt, SessionSnapshot, WizardEngine};
use crate::error::WizardError;
use crate::handoff::{Handoff, HandoffTarget};
use crate::language::Language;

/// Receiver yielding a new snapshot after every change
pub type SessionWatcher = watch::Receiver<SessionSnapshot>;

struct Shared {
    engine: Mutex<WizardEngine>,
    snapshots: watch::Sender<SessionSnapshot>,
}

struct DeliveryTask {
    session_id: Uuid,
    queue: mpsc::UnboundedSender<PendingPrompt>,
    handle: JoinHandle<()>,
}

impl DeliveryTask {
    fn spawn(shared: Arc<Shared>, session_id: Uuid) -> Self {
        let (queue, mut rx) = mpsc::unbounded_channel::<PendingPrompt>();

        let handle = tokio::spawn(async move {
            while let Some(prompt) = rx.recv().await {
                tokio::time::sleep(prompt.delay).await;

                let mut engine = shared.engine.lock().await;
                if engine.deliver(prompt) {
                    shared.snapshots.send_replace(engine.snapshot());
                }
            }
            trace!(%session_id, "delivery task finished");
        });

        Self {
            session_id,
            queue,
            handle,
        }
    }
}

/// A wizard session that delivers assistant lines on a timer
///
/// Must be created inside a tokio runtime.
pub struct PacedSession {
    shared: Arc<Shared>,
    delivery: DeliveryTask,
}

impl PacedSession {
    pub fn new(mut engine: WizardEngine) -> Self {
        let pending = engine.take_pending();
        let session_id = engine.session_id();
        let (snapshots, _rx) = watch::channel(engine.snapshot());

        let shared = Arc::new(Shared {
            engine: Mutex::new(engine),
            snapshots,
        });

        let delivery = DeliveryTask::spawn(shared.clone(), session_id);
        let session = Self { shared, delivery };
        session.enqueue(pending);
        session
    }

    /// Subscribe to session changes
    ///
    /// ```ignore
    /// let mut rx = session.subscribe();
    /// while rx.changed().await.is_ok() {
    ///     render(&rx.borrow());
    /// }
    /// ```
    pub fn subscribe(&self) -> SessionWatcher {
        self.shared.snapshots.subscribe()
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> SessionSnapshot {
        self.shared.snapshots.borrow().clone()
    }

    /// Wait until every assistant line of the current session is delivered
    pub async fn wait_ready(&self) {
        let mut rx = self.subscribe();
        // The sender lives in `shared`, so the channel cannot close while we wait
        let _ = rx.wait_for(|snapshot| snapshot.ready).await;
    }

    /// Query the engine without mutating it
    pub async fn query<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&WizardEngine) -> T,
    {
        let engine = self.shared.engine.lock().await;
        f(&engine)
    }

    pub async fn options(&self) -> Vec<OptionItem> {
        self.query(|engine| engine.options()).await
    }

    pub async fn select(&mut self, id: &str) -> Result<(), WizardError> {
        self.update(|engine| engine.select(id)).await
    }

    pub async fn submit_text(&mut self, text: &str) -> Result<bool, WizardError> {
        self.update(|engine| engine.submit_text(text)).await
    }

    pub async fn set_language(&mut self, language: Language) -> bool {
        self.update(|engine| engine.set_language(language)).await
    }

    pub async fn restart(&mut self) {
        self.update(|engine| engine.restart()).await
    }

    pub async fn handoff(&self, target: &HandoffTarget) -> Result<Handoff, WizardError> {
        self.query(|engine| engine.handoff(target)).await
    }

    /// Apply a mutation, schedule what it queued and notify watchers
    async fn update<F, T>(&mut self, f: F) -> T
    where
        F: FnOnce(&mut WizardEngine) -> T,
    {
        let (result, pending, session_id) = {
            let mut engine = self.shared.engine.lock().await;
            let result = f(&mut engine);
            // Published under the lock so a delivery cannot be overwritten
            self.shared.snapshots.send_replace(engine.snapshot());
            (result, engine.take_pending(), engine.session_id())
        };

        if session_id != self.delivery.session_id {
            debug!(
                old = %self.delivery.session_id,
                new = %session_id,
                "session reset, cancelling pending prompts"
            );
            self.delivery.handle.abort();
            self.delivery = DeliveryTask::spawn(self.shared.clone(), session_id);
        }

        self.enqueue(pending);
        result
    }

    fn enqueue(&self, pending: Vec<PendingPrompt>) {
        for prompt in pending {
            // Fails only once the task is gone, i.e. after abort
            if self.delivery.queue.send(prompt).is_err() {
                debug!(session_id = %self.delivery.session_id, "delivery task closed, prompt dropped");
            }
        }
    }
}

impl Drop for PacedSession {
    fn drop(&mut self) {
        self.delivery.handle.abort();
    }
}
