pub mod backend;
pub mod events;
pub mod grab_queue;
pub mod mode;
pub mod models;
pub mod optimistic;
pub mod pegboard;
pub mod poller;
pub mod session;
pub mod settings;
pub mod vision_stream;
mod utils;

pub use session::{PanelSession, PanelSnapshot};

#[cfg(feature = "desktop")]
pub use desktop::run;

#[cfg(feature = "desktop")]
pub(crate) use desktop::AppState;

#[cfg(feature = "desktop")]
mod desktop {
    use std::sync::Arc;

    use tauri::{Manager, RunEvent, State};
    use tokio::sync::Mutex;

    use crate::{
        backend::HttpRigBackend,
        events::TauriEvents,
        grab_queue::commands::{
            clear_grab_queue, dispatch_grab_queue, enqueue_grab, get_grab_queue, remove_grab,
        },
        mode::commands::{finish_task, get_panel_snapshot, get_ui_locks, simulate_task},
        pegboard::commands::{get_pegboard, peg_clear, peg_click, peg_shortcut, select_peg_tool},
        poller::{PollCadence, StatusPoller},
        session::PanelSession,
        settings::{PanelSettings, SettingsStore},
        vision_stream::commands::{get_vision_switches, toggle_vision_stream},
    };

    pub(crate) struct AppState {
        pub(crate) session: PanelSession,
        pub(crate) settings: SettingsStore,
        pub(crate) poller: Mutex<StatusPoller>,
    }

    #[tauri::command]
    fn get_panel_settings(state: State<AppState>) -> Result<PanelSettings, String> {
        Ok(state.settings.settings())
    }

    /// Stored for the next launch; the running poller keeps its cadence.
    #[tauri::command]
    fn update_panel_settings(settings: PanelSettings, state: State<AppState>) -> Result<(), String> {
        state.settings.update(settings).map_err(|e| e.to_string())
    }

    #[cfg_attr(mobile, tauri::mobile_entry_point)]
    pub fn run() {
        // Initialize logging (reads RUST_LOG env var)
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();

        log::info!("Rig panel starting up...");

        tauri::Builder::default()
            .plugin(tauri_plugin_opener::init())
            .setup(|app| {
                let result = (|| -> anyhow::Result<()> {
                    let app_data_dir = app
                        .path()
                        .app_data_dir()
                        .map_err(|err| anyhow::anyhow!(err))?;
                    std::fs::create_dir_all(&app_data_dir)?;

                    let settings_store = SettingsStore::new(app_data_dir.join("settings.json"))?;
                    let settings = settings_store.settings().with_env_overrides();
                    log::info!("rig backend at {}", settings.backend_url);

                    let backend = HttpRigBackend::new(&settings.backend_url, settings.request_timeout())?;
                    let events = TauriEvents::new(app.handle().clone());
                    let session = PanelSession::new(Arc::new(backend), Arc::new(events), &settings);

                    // Restore the board before the first poll so the grid renders
                    // from the persisted snapshot (or empty) right away.
                    let mut poller = StatusPoller::new();
                    tauri::async_runtime::block_on({
                        let session = session.clone();
                        let cadence = PollCadence::from_settings(&settings);
                        let poller = &mut poller;
                        async move {
                            session.start().await;
                            poller.start(session, cadence)
                        }
                    })?;

                    app.manage(AppState {
                        session,
                        settings: settings_store,
                        poller: Mutex::new(poller),
                    });

                    Ok(())
                })();

                result.map_err(|err| err.into())
            })
            .invoke_handler(tauri::generate_handler![
                get_panel_snapshot,
                get_ui_locks,
                finish_task,
                simulate_task,
                get_grab_queue,
                enqueue_grab,
                remove_grab,
                clear_grab_queue,
                dispatch_grab_queue,
                get_pegboard,
                select_peg_tool,
                peg_shortcut,
                peg_click,
                peg_clear,
                get_vision_switches,
                toggle_vision_stream,
                get_panel_settings,
                update_panel_settings,
            ])
            .build(tauri::generate_context!())
            .expect("error while building tauri application")
            .run(|app_handle, event| {
                if let RunEvent::Exit = event {
                    let state = app_handle.state::<AppState>();
                    tauri::async_runtime::block_on(async {
                        if let Err(err) = state.poller.lock().await.stop().await {
                            log::warn!("status poller did not stop cleanly: {err:?}");
                        }
                    });
                }
            });
    }
}
