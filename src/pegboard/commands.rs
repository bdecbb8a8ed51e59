use tauri::State;

use crate::{
    models::PegTool,
    pegboard::{BoardView, CellReport},
    AppState,
};

#[tauri::command]
pub async fn get_pegboard(state: State<'_, AppState>) -> Result<BoardView, String> {
    Ok(state.session.pegboard().view().await)
}

#[tauri::command]
pub async fn select_peg_tool(state: State<'_, AppState>, tool: PegTool) -> Result<PegTool, String> {
    Ok(state.session.select_peg_tool(tool).await)
}

/// Returns `None` for keys that are not tool shortcuts.
#[tauri::command]
pub async fn peg_shortcut(state: State<'_, AppState>, key: String) -> Result<Option<PegTool>, String> {
    Ok(state.session.select_peg_tool_by_key(&key).await)
}

#[tauri::command]
pub async fn peg_click(
    state: State<'_, AppState>,
    row: usize,
    col: usize,
) -> Result<CellReport, String> {
    state
        .session
        .peg_click(row, col)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn peg_clear(
    state: State<'_, AppState>,
    row: usize,
    col: usize,
) -> Result<CellReport, String> {
    state
        .session
        .peg_clear(row, col)
        .await
        .map_err(|e| e.to_string())
}
