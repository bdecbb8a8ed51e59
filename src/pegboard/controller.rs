use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::{
    backend::{DispatchOutcome, RigBackend},
    events::{notify, NoticeLevel, PanelEvent, PanelEvents},
    models::{PegCell, PegTool},
};

use super::{
    decode::decode_board,
    grid::{BoardView, CellEdit, PegGrid},
};

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

/// Outcome of one click on a hole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "camelCase")]
pub enum CellReport {
    /// The hole already held the value; nothing was synced or dispatched.
    Unchanged,
    Updated {
        state: PegCell,
        placement: Option<DispatchOutcome>,
    },
}

#[derive(Clone)]
pub struct PegboardController {
    grid: Arc<Mutex<PegGrid>>,
    tool: Arc<Mutex<PegTool>>,
    backend: Arc<dyn RigBackend>,
    events: Arc<dyn PanelEvents>,
}

impl PegboardController {
    pub fn new(backend: Arc<dyn RigBackend>, events: Arc<dyn PanelEvents>) -> Self {
        Self {
            grid: Arc::new(Mutex::new(PegGrid::empty())),
            tool: Arc::new(Mutex::new(PegTool::default())),
            backend,
            events,
        }
    }

    /// Restores the persisted board. Any failure leaves an empty board so
    /// the first render never waits on backend health.
    pub async fn load(&self) -> BoardView {
        let grid = match self.backend.fetch_board().await {
            Ok(snapshot) => decode_board(&snapshot).unwrap_or_else(|| {
                log_warn!("persisted pegboard snapshot is malformed; starting empty");
                PegGrid::empty()
            }),
            Err(err) => {
                log_warn!("failed to load pegboard, starting empty: {err:?}");
                PegGrid::empty()
            }
        };

        log_info!("pegboard loaded with {} occupied hole(s)", grid.occupied());

        let view = {
            let mut guard = self.grid.lock().await;
            *guard = grid;
            guard.view()
        };
        self.events.emit(PanelEvent::PegboardLoaded(view.clone()));
        view
    }

    pub async fn view(&self) -> BoardView {
        self.grid.lock().await.view()
    }

    pub async fn tool(&self) -> PegTool {
        *self.tool.lock().await
    }

    pub async fn select_tool(&self, tool: PegTool) -> PegTool {
        *self.tool.lock().await = tool;
        self.events.emit(PanelEvent::PegToolChanged(tool));
        tool
    }

    /// Keyboard shortcut; unmapped keys leave the tool alone.
    pub async fn select_tool_by_key(&self, key: &str) -> Option<PegTool> {
        let tool = PegTool::from_shortcut(key)?;
        Some(self.select_tool(tool).await)
    }

    /// Left click: paint with the active tool, mirror the change, and ask
    /// the arm to place a hook when one was written.
    pub async fn click(&self, row: usize, col: usize) -> Result<CellReport> {
        let tool = self.tool().await;
        let edit = self.grid.lock().await.paint(row, col, tool)?;
        match edit {
            Some(edit) => Ok(self.commit(edit).await),
            None => Ok(CellReport::Unchanged),
        }
    }

    /// Right click: always empties the hole and never dispatches.
    pub async fn clear(&self, row: usize, col: usize) -> Result<CellReport> {
        let edit = self.grid.lock().await.erase(row, col)?;
        match edit {
            Some(edit) => Ok(self.commit(edit).await),
            None => Ok(CellReport::Unchanged),
        }
    }

    async fn commit(&self, edit: CellEdit) -> CellReport {
        self.events.emit(PanelEvent::PegCellChanged(edit.view()));

        let sync = edit.sync_payload();
        if let Err(err) = self.backend.sync_cell(&sync).await {
            log_error!("pegboard sync for ({}, {}) failed: {err:?}", sync.row, sync.col);
        }

        let Some(command) = edit.place_command() else {
            return CellReport::Updated {
                state: edit.current(),
                placement: None,
            };
        };

        // The cell stays as marked whatever the arm says.
        let state = edit.current();
        let placement = match self.backend.place(&command).await {
            Ok(outcome @ DispatchOutcome::Accepted { .. }) => Some(outcome),
            Ok(outcome @ DispatchOutcome::Rejected { .. }) => {
                log_warn!("place at ({}, {}) rejected: {}", command.row, command.col, outcome.message());
                notify(
                    &*self.events,
                    NoticeLevel::Warn,
                    format!("Place rejected: {}", outcome.message()),
                );
                Some(outcome)
            }
            Err(err) => {
                log_error!("place at ({}, {}) failed: {err:?}", command.row, command.col);
                notify(
                    &*self.events,
                    NoticeLevel::Error,
                    format!("Place command could not be sent: {err}"),
                );
                None
            }
        };

        CellReport::Updated { state, placement }
    }
}
