use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock, time::Duration};

const BACKEND_URL_ENV: &str = "RIGPANEL_BACKEND_URL";
const DEBUG_ENV: &str = "RIGPANEL_DEBUG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelSettings {
    /// Base URL of the rig's web backend.
    pub backend_url: String,
    pub status_interval_ms: u64,
    pub vision_interval_ms: u64,
    /// How long poller-written switch changes are ignored as user input.
    pub switch_settle_ms: u64,
    pub request_timeout_ms: u64,
    /// Ids of every switch bound to the vision-stream flag.
    pub vision_switches: Vec<String>,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:5000".into(),
            status_interval_ms: 500,
            vision_interval_ms: 1000,
            switch_settle_ms: 100,
            request_timeout_ms: 3000,
            vision_switches: vec!["arm-vision-stream".into(), "header-vision-stream".into()],
        }
    }
}

impl PanelSettings {
    pub fn status_interval(&self) -> Duration {
        Duration::from_millis(self.status_interval_ms.max(1))
    }

    pub fn vision_interval(&self) -> Duration {
        Duration::from_millis(self.vision_interval_ms.max(1))
    }

    pub fn switch_settle(&self) -> Duration {
        Duration::from_millis(self.switch_settle_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms.max(1))
    }

    /// `RIGPANEL_BACKEND_URL` replaces the stored URL; `RIGPANEL_DEBUG=1`
    /// polls faster for bench work.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
            if !url.trim().is_empty() {
                self.backend_url = url.trim().to_string();
            }
        }

        let debug_mode = std::env::var(DEBUG_ENV)
            .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        if debug_mode {
            self.status_interval_ms = self.status_interval_ms.min(200);
            self.vision_interval_ms = self.vision_interval_ms.min(200);
        }
        self
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<PanelSettings>,
}

impl SettingsStore {
    /// Missing or unreadable JSON falls back to defaults.
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            PanelSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn settings(&self) -> PanelSettings {
        self.data
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Persists new settings; the poller and backend pick them up on the
    /// next launch.
    pub fn update(&self, settings: PanelSettings) -> Result<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| anyhow!("settings lock poisoned"))?;
        *guard = settings;
        self.persist(&guard)
    }

    fn persist(&self, data: &PanelSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
