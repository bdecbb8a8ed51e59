use tauri::State;

use crate::{
    grab_queue::{DispatchReport, QueueView},
    models::GrabColor,
    AppState,
};

#[tauri::command]
pub async fn get_grab_queue(state: State<'_, AppState>) -> Result<QueueView, String> {
    Ok(state.session.grab_queue().view().await)
}

#[tauri::command]
pub async fn enqueue_grab(
    state: State<'_, AppState>,
    color: GrabColor,
) -> Result<QueueView, String> {
    state
        .session
        .enqueue_grab(color)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn remove_grab(state: State<'_, AppState>, index: usize) -> Result<QueueView, String> {
    state
        .session
        .remove_grab(index)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn clear_grab_queue(state: State<'_, AppState>) -> Result<QueueView, String> {
    Ok(state.session.clear_grabs().await)
}

#[tauri::command]
pub async fn dispatch_grab_queue(state: State<'_, AppState>) -> Result<DispatchReport, String> {
    state
        .session
        .dispatch_grabs()
        .await
        .map_err(|e| e.to_string())
}
