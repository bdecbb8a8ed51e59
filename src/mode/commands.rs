use tauri::State;

use crate::{
    backend::DispatchOutcome,
    mode::UiLockPlan,
    models::TaskKind,
    session::PanelSnapshot,
    AppState,
};

#[tauri::command]
pub async fn get_panel_snapshot(state: State<'_, AppState>) -> Result<PanelSnapshot, String> {
    Ok(state.session.snapshot().await)
}

#[tauri::command]
pub async fn get_ui_locks(state: State<'_, AppState>) -> Result<UiLockPlan, String> {
    Ok(state.session.mode().plan().await)
}

#[tauri::command]
pub async fn finish_task(state: State<'_, AppState>) -> Result<String, String> {
    state.session.finish_task().await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn simulate_task(
    state: State<'_, AppState>,
    task: TaskKind,
) -> Result<DispatchOutcome, String> {
    state
        .session
        .simulate_task(task)
        .await
        .map_err(|e| e.to_string())
}
