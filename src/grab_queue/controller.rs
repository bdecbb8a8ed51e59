use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::{
    backend::{DispatchOutcome, RigBackend},
    events::{notify, NoticeLevel, PanelEvent, PanelEvents},
    models::GrabColor,
};

use super::queue::{GrabQueue, QueueView};

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

/// What `dispatch_all` did with the queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "camelCase")]
pub enum DispatchReport {
    /// Queue was empty; nothing was sent.
    Skipped,
    Accepted { message: String, dispatched: usize },
    Rejected { message: String },
}

#[derive(Clone)]
pub struct GrabQueueController {
    queue: Arc<Mutex<GrabQueue>>,
    backend: Arc<dyn RigBackend>,
    events: Arc<dyn PanelEvents>,
}

impl GrabQueueController {
    pub fn new(backend: Arc<dyn RigBackend>, events: Arc<dyn PanelEvents>) -> Self {
        Self {
            queue: Arc::new(Mutex::new(GrabQueue::new())),
            backend,
            events,
        }
    }

    pub async fn view(&self) -> QueueView {
        self.queue.lock().await.view()
    }

    pub async fn enqueue(&self, color: GrabColor) -> QueueView {
        let view = {
            let mut queue = self.queue.lock().await;
            queue.enqueue(color);
            queue.view()
        };
        self.render(view)
    }

    pub async fn remove(&self, index: usize) -> Result<QueueView> {
        let view = {
            let mut queue = self.queue.lock().await;
            queue.remove(index)?;
            queue.view()
        };
        Ok(self.render(view))
    }

    /// Local-only: nothing was dispatched, so the backend is not told.
    pub async fn clear(&self) -> QueueView {
        let view = {
            let mut queue = self.queue.lock().await;
            queue.clear();
            queue.view()
        };
        self.render(view)
    }

    /// Sends the whole queue as one sequence. Only an accepted dispatch
    /// removes entries; a rejection or transport failure leaves the queue
    /// as it was so the operator can edit or retry it.
    pub async fn dispatch_all(&self) -> Result<DispatchReport> {
        let Some(batch) = self.queue.lock().await.batch() else {
            return Ok(DispatchReport::Skipped);
        };

        log_info!("dispatching grab sequence of {} task(s)", batch.len());

        match self.backend.dispatch_grab_sequence(&batch.sequence).await {
            Ok(DispatchOutcome::Accepted { message }) => {
                let (dispatched, view) = {
                    let mut queue = self.queue.lock().await;
                    let dispatched = queue.complete(&batch);
                    (dispatched, queue.view())
                };
                self.render(view);
                notify(
                    &*self.events,
                    NoticeLevel::Info,
                    format!("Grab sequence started: {message}"),
                );
                Ok(DispatchReport::Accepted {
                    message,
                    dispatched,
                })
            }
            Ok(DispatchOutcome::Rejected { message }) => {
                log_warn!("grab sequence rejected: {}", message);
                notify(
                    &*self.events,
                    NoticeLevel::Warn,
                    format!("Grab sequence rejected: {message}"),
                );
                Ok(DispatchReport::Rejected { message })
            }
            Err(err) => {
                log_error!("grab sequence dispatch failed: {err:?}");
                notify(
                    &*self.events,
                    NoticeLevel::Error,
                    format!("Grab sequence could not be sent: {err}"),
                );
                Err(err)
            }
        }
    }

    fn render(&self, view: QueueView) -> QueueView {
        self.events.emit(PanelEvent::GrabQueueChanged(view.clone()));
        view
    }
}
