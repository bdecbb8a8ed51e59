//! Port to the rig's HTTP backend: mode, pegboard store, arm dispatch and
//! vision-stream endpoints.

pub mod http;
pub mod models;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::models::{OperatingMode, TaskKind};

pub use http::HttpRigBackend;
pub use models::{
    CellSync, CommandReply, DispatchOutcome, GrabSequence, GrabTask, PlaceCommand,
    StatusResponse, VisionStreamRequest, VisionStreamStatus,
};

#[async_trait]
pub trait RigBackend: Send + Sync {
    async fn fetch_mode(&self) -> Result<OperatingMode>;

    /// Raw persisted board; decoding and fallback are the caller's job.
    async fn fetch_board(&self) -> Result<Value>;

    async fn sync_cell(&self, sync: &CellSync) -> Result<()>;

    async fn place(&self, command: &PlaceCommand) -> Result<DispatchOutcome>;

    async fn dispatch_grab_sequence(&self, sequence: &GrabSequence) -> Result<DispatchOutcome>;

    async fn fetch_vision_stream(&self) -> Result<bool>;

    async fn set_vision_stream(&self, enabled: bool) -> Result<String>;

    async fn finish_task(&self) -> Result<String>;

    async fn simulate_task(&self, task: TaskKind) -> Result<DispatchOutcome>;
}
