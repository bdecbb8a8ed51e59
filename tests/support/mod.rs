//! Recording backend and event sink shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use rigpanel_lib::backend::{CellSync, DispatchOutcome, GrabSequence, PlaceCommand, RigBackend};
use rigpanel_lib::events::{NoticeLevel, PanelEvent, PanelEvents};
use rigpanel_lib::grab_queue::QueueView;
use rigpanel_lib::mode::UiLockPlan;
use rigpanel_lib::models::{OperatingMode, TaskKind};
use rigpanel_lib::settings::PanelSettings;
use rigpanel_lib::vision_stream::SwitchView;
use rigpanel_lib::PanelSession;
use serde_json::Value;

// ── Backend call record ───────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    FetchMode,
    FetchBoard,
    SyncCell(CellSync),
    Place(PlaceCommand),
    GrabSequence(GrabSequence),
    FetchVisionStream,
    SetVisionStream(bool),
    FinishTask,
    Simulate(TaskKind),
}

/// Scripted answer to a command endpoint.
#[derive(Debug, Clone)]
pub enum Reply {
    Accept(&'static str),
    Reject(&'static str),
    Unreachable,
}

impl Reply {
    fn outcome(&self) -> Result<DispatchOutcome> {
        match self {
            Reply::Accept(message) => Ok(DispatchOutcome::Accepted {
                message: message.to_string(),
            }),
            Reply::Reject(message) => Ok(DispatchOutcome::Rejected {
                message: message.to_string(),
            }),
            Reply::Unreachable => Err(anyhow!("connection refused")),
        }
    }
}

// ── MockBackend ───────────────────────────────────────────────

pub struct MockBackend {
    pub calls: Mutex<Vec<BackendCall>>,
    /// Modes handed out one per poll; once drained, polls fail.
    pub modes: Mutex<VecDeque<OperatingMode>>,
    /// When set, status fetches never resolve.
    pub stall_status: Mutex<bool>,
    pub board: Mutex<Option<Value>>,
    pub grab_reply: Mutex<Reply>,
    pub place_reply: Mutex<Reply>,
    pub simulate_reply: Mutex<Reply>,
    pub vision_active: Mutex<bool>,
    pub vision_reachable: Mutex<bool>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            modes: Mutex::new(VecDeque::new()),
            stall_status: Mutex::new(false),
            board: Mutex::new(None),
            grab_reply: Mutex::new(Reply::Accept("sequence started")),
            place_reply: Mutex::new(Reply::Accept("placing")),
            simulate_reply: Mutex::new(Reply::Accept("simulated")),
            vision_active: Mutex::new(false),
            vision_reachable: Mutex::new(true),
        }
    }

    pub fn script_modes(&self, modes: &[OperatingMode]) {
        self.modes.lock().unwrap().extend(modes.iter().copied());
    }

    pub fn set_grab_reply(&self, reply: Reply) {
        *self.grab_reply.lock().unwrap() = reply;
    }

    pub fn set_place_reply(&self, reply: Reply) {
        *self.place_reply.lock().unwrap() = reply;
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, matches: impl Fn(&BackendCall) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|call| matches(call)).count()
    }

    pub fn grab_sequences(&self) -> Vec<GrabSequence> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                BackendCall::GrabSequence(sequence) => Some(sequence),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: BackendCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl RigBackend for MockBackend {
    async fn fetch_mode(&self) -> Result<OperatingMode> {
        self.record(BackendCall::FetchMode);
        let stalled = *self.stall_status.lock().unwrap();
        if stalled {
            std::future::pending::<()>().await;
        }
        self.modes
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow!("/api/system_status returned 503 Service Unavailable"))
    }

    async fn fetch_board(&self) -> Result<Value> {
        self.record(BackendCall::FetchBoard);
        self.board
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| anyhow!("/api/pegboard returned 404 Not Found"))
    }

    async fn sync_cell(&self, sync: &CellSync) -> Result<()> {
        self.record(BackendCall::SyncCell(*sync));
        Ok(())
    }

    async fn place(&self, command: &PlaceCommand) -> Result<DispatchOutcome> {
        self.record(BackendCall::Place(*command));
        self.place_reply.lock().unwrap().outcome()
    }

    async fn dispatch_grab_sequence(&self, sequence: &GrabSequence) -> Result<DispatchOutcome> {
        self.record(BackendCall::GrabSequence(sequence.clone()));
        self.grab_reply.lock().unwrap().outcome()
    }

    async fn fetch_vision_stream(&self) -> Result<bool> {
        self.record(BackendCall::FetchVisionStream);
        Ok(*self.vision_active.lock().unwrap())
    }

    async fn set_vision_stream(&self, enabled: bool) -> Result<String> {
        self.record(BackendCall::SetVisionStream(enabled));
        if !*self.vision_reachable.lock().unwrap() {
            return Err(anyhow!("connection refused"));
        }
        *self.vision_active.lock().unwrap() = enabled;
        Ok(if enabled {
            "Vision stream started by user.".into()
        } else {
            "Vision stream stopped by user.".into()
        })
    }

    async fn finish_task(&self) -> Result<String> {
        self.record(BackendCall::FinishTask);
        Ok("task finished".into())
    }

    async fn simulate_task(&self, task: TaskKind) -> Result<DispatchOutcome> {
        self.record(BackendCall::Simulate(task));
        self.simulate_reply.lock().unwrap().outcome()
    }
}

// ── RecordingEvents ───────────────────────────────────────────

#[derive(Default)]
pub struct RecordingEvents {
    pub events: Mutex<Vec<PanelEvent>>,
}

impl RecordingEvents {
    pub fn all(&self) -> Vec<PanelEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    pub fn lock_plans(&self) -> Vec<UiLockPlan> {
        self.all()
            .into_iter()
            .filter_map(|event| match event {
                PanelEvent::UiLocksChanged(plan) => Some(plan),
                _ => None,
            })
            .collect()
    }

    pub fn last_queue(&self) -> Option<QueueView> {
        self.all().into_iter().rev().find_map(|event| match event {
            PanelEvent::GrabQueueChanged(view) => Some(view),
            _ => None,
        })
    }

    pub fn switch_writes(&self) -> Vec<SwitchView> {
        self.all()
            .into_iter()
            .filter_map(|event| match event {
                PanelEvent::VisionSwitchChanged(view) => Some(view),
                _ => None,
            })
            .collect()
    }

    pub fn notices(&self, level: NoticeLevel) -> Vec<String> {
        self.all()
            .into_iter()
            .filter_map(|event| match event {
                PanelEvent::Notice(notice) if notice.level == level => Some(notice.message),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, name: &str) -> usize {
        self.all().iter().filter(|event| event.name() == name).count()
    }
}

impl PanelEvents for RecordingEvents {
    fn emit(&self, event: PanelEvent) {
        self.events.lock().unwrap().push(event);
    }
}

// ── Harness ───────────────────────────────────────────────────

pub struct Harness {
    pub backend: Arc<MockBackend>,
    pub events: Arc<RecordingEvents>,
    pub session: PanelSession,
}

pub fn harness() -> Harness {
    harness_with(PanelSettings::default())
}

pub fn harness_with(settings: PanelSettings) -> Harness {
    let backend = Arc::new(MockBackend::new());
    let events = Arc::new(RecordingEvents::default());
    let session = PanelSession::new(backend.clone(), events.clone(), &settings);
    Harness {
        backend,
        events,
        session,
    }
}

/// Drives the coordinator into `mode` as if a poll had returned it.
pub async fn enter(harness: &Harness, mode: OperatingMode) {
    harness.session.mode().observe(mode).await;
}
