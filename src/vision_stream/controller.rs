use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::{
    backend::RigBackend,
    events::{notify, NoticeLevel, PanelEvent, PanelEvents},
    optimistic::{Confirmation, OnFailure, Pending, Resolution},
};

use super::guard::SwitchGuard;

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchView {
    pub id: String,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "camelCase")]
pub enum ToggleReport {
    /// The change came in while poller writes were settling.
    Ignored,
    Applied {
        message: String,
        /// Server value from the follow-up refetch, if it succeeded.
        is_active: Option<bool>,
    },
}

#[derive(Debug)]
struct SwitchBank {
    guard: SwitchGuard,
    switches: Vec<(String, bool)>,
    server_value: Option<bool>,
}

impl SwitchBank {
    fn slot_mut(&mut self, id: &str) -> Result<&mut bool> {
        self.switches
            .iter_mut()
            .find(|(switch_id, _)| switch_id == id)
            .map(|(_, checked)| checked)
            .ok_or_else(|| anyhow!("unknown vision stream switch '{id}'"))
    }

    fn views(&self) -> Vec<SwitchView> {
        self.switches
            .iter()
            .map(|(id, checked)| SwitchView {
                id: id.clone(),
                checked: *checked,
            })
            .collect()
    }
}

/// Keeps every bound switch in step with the backend's single
/// "stream vision data to the arm" flag.
#[derive(Clone)]
pub struct VisionStreamController {
    bank: Arc<Mutex<SwitchBank>>,
    settle: Duration,
    backend: Arc<dyn RigBackend>,
    events: Arc<dyn PanelEvents>,
}

impl VisionStreamController {
    pub fn new(
        switch_ids: Vec<String>,
        settle: Duration,
        backend: Arc<dyn RigBackend>,
        events: Arc<dyn PanelEvents>,
    ) -> Self {
        let switches = switch_ids.into_iter().map(|id| (id, false)).collect();
        Self {
            bank: Arc::new(Mutex::new(SwitchBank {
                guard: SwitchGuard::Idle,
                switches,
                server_value: None,
            })),
            settle,
            backend,
            events,
        }
    }

    pub async fn switches(&self) -> Vec<SwitchView> {
        self.bank.lock().await.views()
    }

    pub async fn server_value(&self) -> Option<bool> {
        self.bank.lock().await.server_value
    }

    pub async fn guard_state(&self, now: Instant) -> SwitchGuard {
        self.bank.lock().await.guard.state(now)
    }

    pub async fn refresh(&self) -> Result<bool> {
        let is_active = self
            .backend
            .fetch_vision_stream()
            .await
            .context("vision stream status poll failed")?;
        self.on_poll_result(is_active).await;
        Ok(is_active)
    }

    pub async fn on_poll_result(&self, is_active: bool) -> Vec<SwitchView> {
        self.on_poll_result_at(is_active, Instant::now()).await
    }

    /// Writes the server value into every switch that shows something
    /// else. The guard stays engaged from the first write until `settle`
    /// after the last one.
    pub async fn on_poll_result_at(&self, is_active: bool, now: Instant) -> Vec<SwitchView> {
        let written: Vec<SwitchView> = {
            let mut bank = self.bank.lock().await;
            bank.server_value = Some(is_active);
            bank.guard.begin_write();
            bank.switches
                .iter_mut()
                .filter(|(_, checked)| *checked != is_active)
                .map(|(id, checked)| {
                    *checked = is_active;
                    SwitchView {
                        id: id.clone(),
                        checked: is_active,
                    }
                })
                .collect()
        };

        for view in &written {
            self.events.emit(PanelEvent::VisionSwitchChanged(view.clone()));
        }

        let mut bank = self.bank.lock().await;
        let finished_at = now.max(Instant::now());
        bank.guard.finish_write(finished_at, self.settle);
        written
    }

    pub async fn on_user_toggle(&self, switch_id: &str, enabled: bool) -> Result<ToggleReport> {
        self.on_user_toggle_at(switch_id, enabled, Instant::now()).await
    }

    /// Operator flipped `switch_id`. Ignored while the guard is engaged;
    /// otherwise every bound switch follows it, the new value is sent, and
    /// the status is refetched at once.
    pub async fn on_user_toggle_at(
        &self,
        switch_id: &str,
        enabled: bool,
        now: Instant,
    ) -> Result<ToggleReport> {
        let (pending, followers) = {
            let mut bank = self.bank.lock().await;
            let engaged = bank.guard.is_engaged(now);
            let stored = *bank.slot_mut(switch_id)?;
            if engaged {
                drop(bank);
                // The webview already flipped its checkbox; snap it back.
                self.events.emit(PanelEvent::VisionSwitchChanged(SwitchView {
                    id: switch_id.to_string(),
                    checked: stored,
                }));
                return Ok(ToggleReport::Ignored);
            }
            let target = bank
                .switches
                .iter()
                .map(|(id, _)| (id.clone(), enabled))
                .collect();
            let pending = Pending::apply(&mut bank.switches, target);
            let followers = changed_views(pending.as_ref(), switch_id);
            (pending, followers)
        };

        for view in followers {
            self.events.emit(PanelEvent::VisionSwitchChanged(view));
        }

        log_info!(
            "vision stream {} requested from '{}'",
            if enabled { "start" } else { "stop" },
            switch_id
        );

        match self.backend.set_vision_stream(enabled).await {
            Ok(message) => {
                if let Some(pending) = pending {
                    let mut bank = self.bank.lock().await;
                    pending.confirm(&mut bank.switches, Confirmation::Confirmed, OnFailure::Revert);
                }
                notify(&*self.events, NoticeLevel::Info, message.clone());

                let is_active = match self.refresh().await {
                    Ok(is_active) => Some(is_active),
                    Err(err) => {
                        log_warn!("refetch after vision toggle failed: {err:?}");
                        None
                    }
                };
                Ok(ToggleReport::Applied { message, is_active })
            }
            Err(err) => {
                log_error!("vision stream toggle failed: {err:?}");
                let reverted = match pending {
                    Some(pending) => {
                        let mut bank = self.bank.lock().await;
                        let applied = pending.applied().clone();
                        let resolution = pending.confirm(
                            &mut bank.switches,
                            Confirmation::Failed,
                            OnFailure::Revert,
                        );
                        if resolution == Resolution::Reverted {
                            if let Some(server) = bank.server_value {
                                for (_, checked) in bank.switches.iter_mut() {
                                    *checked = server;
                                }
                            }
                            bank.switches
                                .iter()
                                .zip(applied.iter())
                                .filter(|((_, checked), (_, applied))| checked != applied)
                                .map(|((id, checked), _)| SwitchView {
                                    id: id.clone(),
                                    checked: *checked,
                                })
                                .collect()
                        } else {
                            Vec::new()
                        }
                    }
                    None => Vec::new(),
                };
                for view in reverted {
                    self.events.emit(PanelEvent::VisionSwitchChanged(view));
                }
                notify(
                    &*self.events,
                    NoticeLevel::Error,
                    format!("Vision stream toggle failed: {err}"),
                );
                Err(err)
            }
        }
    }
}

/// Switches a pending write changed, minus the one the operator flipped.
fn changed_views(pending: Option<&Pending<Vec<(String, bool)>>>, except: &str) -> Vec<SwitchView> {
    let Some(pending) = pending else {
        return Vec::new();
    };
    pending
        .applied()
        .iter()
        .zip(pending.previous().iter())
        .filter(|((id, checked), (_, was))| checked != was && id.as_str() != except)
        .map(|((id, checked), _)| SwitchView {
            id: id.clone(),
            checked: *checked,
        })
        .collect()
}
