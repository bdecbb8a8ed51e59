use tauri::State;

use crate::{
    vision_stream::{SwitchView, ToggleReport},
    AppState,
};

#[tauri::command]
pub async fn get_vision_switches(state: State<'_, AppState>) -> Result<Vec<SwitchView>, String> {
    Ok(state.session.vision_stream().switches().await)
}

#[tauri::command]
pub async fn toggle_vision_stream(
    state: State<'_, AppState>,
    switch_id: String,
    enabled: bool,
) -> Result<ToggleReport, String> {
    state
        .session
        .toggle_vision_stream(&switch_id, enabled)
        .await
        .map_err(|e| e.to_string())
}
