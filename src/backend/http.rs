use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::models::{OperatingMode, TaskKind};

use super::{
    CellSync, CommandReply, DispatchOutcome, GrabSequence, PlaceCommand, RigBackend,
    StatusResponse, VisionStreamRequest, VisionStreamStatus,
};

const SYSTEM_STATUS: &str = "api/system_status";
const PEGBOARD: &str = "api/pegboard";
const EXECUTE_TASK2: &str = "api/execute_task2";
const EXECUTE_TASK1_SEQUENCE: &str = "api/execute_task1_sequence";
const VISION_STREAM_STATUS: &str = "api/arm_vision_stream_status";
const TOGGLE_VISION_STREAM: &str = "api/toggle_arm_vision_stream";
const FINISH_TASK: &str = "api/finish_task";
const SIMULATE_TASK1: &str = "api/simulate_task1_start";
const SIMULATE_TASK2: &str = "api/simulate_task2_start";

/// [`RigBackend`] over the rig's Flask-style JSON API.
#[derive(Clone)]
pub struct HttpRigBackend {
    client: Client,
    base_url: String,
}

impl HttpRigBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .with_context(|| format!("GET /{path} failed"))?;
        let response = ensure_success(path, response)?;
        response
            .json::<T>()
            .await
            .with_context(|| format!("GET /{path} returned an unexpected body"))
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(self.url(path))
    }

    async fn send(&self, path: &str, request: RequestBuilder) -> Result<Response> {
        request
            .send()
            .await
            .with_context(|| format!("POST /{path} failed"))
    }

    /// Backend replies `{status, message}` even on 4xx; only an undecodable
    /// reply counts as a transport failure.
    async fn command(&self, path: &str, request: RequestBuilder) -> Result<DispatchOutcome> {
        let response = self.send(path, request).await?;
        let status = response.status();
        let text = response
            .text()
            .await
            .with_context(|| format!("POST /{path} body could not be read"))?;
        match serde_json::from_str::<CommandReply>(&text) {
            Ok(reply) if status.is_success() => Ok(reply.into()),
            Ok(reply) => Ok(DispatchOutcome::Rejected {
                message: if reply.message.is_empty() {
                    format!("backend answered {status}")
                } else {
                    reply.message
                },
            }),
            Err(err) if status.is_success() => {
                Err(anyhow!("POST /{path} returned an unexpected body: {err}"))
            }
            Err(_) => bail!("POST /{path} returned {status}"),
        }
    }

    async fn message(&self, path: &str, request: RequestBuilder) -> Result<String> {
        let response = self.send(path, request).await?;
        let response = ensure_success(path, response)?;
        let reply: CommandReply = response
            .json()
            .await
            .with_context(|| format!("POST /{path} returned an unexpected body"))?;
        Ok(reply.message)
    }
}

fn ensure_success(path: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if !status.is_success() {
        bail!("/{path} returned {status}");
    }
    Ok(response)
}

#[async_trait]
impl RigBackend for HttpRigBackend {
    async fn fetch_mode(&self) -> Result<OperatingMode> {
        let response: StatusResponse = self.get_json(SYSTEM_STATUS).await?;
        Ok(response.status)
    }

    async fn fetch_board(&self) -> Result<Value> {
        self.get_json(PEGBOARD).await
    }

    async fn sync_cell(&self, sync: &CellSync) -> Result<()> {
        let response = self.send(PEGBOARD, self.post(PEGBOARD).json(sync)).await?;
        ensure_success(PEGBOARD, response)?;
        Ok(())
    }

    async fn place(&self, command: &PlaceCommand) -> Result<DispatchOutcome> {
        self.command(EXECUTE_TASK2, self.post(EXECUTE_TASK2).json(command))
            .await
    }

    async fn dispatch_grab_sequence(&self, sequence: &GrabSequence) -> Result<DispatchOutcome> {
        let request = self.post(EXECUTE_TASK1_SEQUENCE).json(sequence);
        self.command(EXECUTE_TASK1_SEQUENCE, request).await
    }

    async fn fetch_vision_stream(&self) -> Result<bool> {
        let status: VisionStreamStatus = self.get_json(VISION_STREAM_STATUS).await?;
        Ok(status.is_active)
    }

    async fn set_vision_stream(&self, enabled: bool) -> Result<String> {
        let body = VisionStreamRequest { enabled };
        let request = self.post(TOGGLE_VISION_STREAM).json(&body);
        self.message(TOGGLE_VISION_STREAM, request).await
    }

    async fn finish_task(&self) -> Result<String> {
        self.message(FINISH_TASK, self.post(FINISH_TASK)).await
    }

    async fn simulate_task(&self, task: TaskKind) -> Result<DispatchOutcome> {
        let path = match task {
            TaskKind::Task1 => SIMULATE_TASK1,
            TaskKind::Task2 => SIMULATE_TASK2,
        };
        self.command(path, self.post(path)).await
    }
}
