use anyhow::{bail, Context, Result};
use log::info;
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::{session::PanelSession, settings::PanelSettings};

use super::loop_worker::{default_poll_timeout, status_loop};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollCadence {
    pub status_interval: Duration,
    pub vision_interval: Duration,
    /// Upper bound on one fetch, on top of the HTTP client's own timeout.
    pub poll_timeout: Duration,
}

impl PollCadence {
    pub fn from_settings(settings: &PanelSettings) -> Self {
        let status_interval = settings.status_interval();
        Self {
            status_interval,
            vision_interval: settings.vision_interval(),
            poll_timeout: default_poll_timeout(status_interval).max(settings.request_timeout()),
        }
    }
}

impl Default for PollCadence {
    fn default() -> Self {
        Self::from_settings(&PanelSettings::default())
    }
}

pub struct StatusPoller {
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl Default for StatusPoller {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusPoller {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Must be called from within a tokio runtime.
    pub fn start(&mut self, session: PanelSession, cadence: PollCadence) -> Result<()> {
        if self.handle.is_some() {
            bail!("status poller already running");
        }

        info!(
            "starting status poller (status every {}ms, vision every {}ms)",
            cadence.status_interval.as_millis(),
            cadence.vision_interval.as_millis()
        );

        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(status_loop(session, cadence, cancel_token.clone()));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("status poller task failed to join")
                .map(|_| ())
        } else {
            Ok(())
        }
    }
}
