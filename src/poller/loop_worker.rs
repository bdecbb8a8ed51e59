use tokio::time::{Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::session::PanelSession;

use super::controller::PollCadence;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// Status and vision-stream polling for the lifetime of the panel.
///
/// Each tick awaits its one fetch before the ticker can fire again, so
/// fetches of the same kind never overlap; a slow backend only delays the
/// next update. An in-flight fetch is dropped as soon as the token fires.
pub async fn status_loop(session: PanelSession, cadence: PollCadence, cancel_token: CancellationToken) {
    let mut status_ticker = tokio::time::interval(cadence.status_interval);
    status_ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut vision_ticker = tokio::time::interval(cadence.vision_interval);
    vision_ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut consecutive_failures: u32 = 0;

    loop {
        tokio::select! {
            _ = status_ticker.tick() => {
                let fetch = tokio::time::timeout(cadence.poll_timeout, session.refresh_mode());
                let result = tokio::select! {
                    result = fetch => result,
                    _ = cancel_token.cancelled() => break,
                };
                match result {
                    Ok(Ok(_)) => {
                        if consecutive_failures > 0 {
                            log_info!("status poll recovered after {} failure(s)", consecutive_failures);
                        }
                        consecutive_failures = 0;
                    }
                    Ok(Err(err)) => {
                        consecutive_failures = consecutive_failures.saturating_add(1);
                        log_failure(consecutive_failures, &format!("{err:?}"));
                    }
                    Err(_) => {
                        consecutive_failures = consecutive_failures.saturating_add(1);
                        log_failure(
                            consecutive_failures,
                            &format!("timed out after {}ms", cadence.poll_timeout.as_millis()),
                        );
                    }
                }
            }
            _ = vision_ticker.tick() => {
                let fetch = tokio::time::timeout(cadence.poll_timeout, session.refresh_vision_stream());
                let result = tokio::select! {
                    result = fetch => result,
                    _ = cancel_token.cancelled() => break,
                };
                match result {
                    Ok(Ok(_)) => {}
                    Ok(Err(err)) => log_warn!("vision stream poll failed: {err:?}"),
                    Err(_) => log_warn!("vision stream poll timed out"),
                }
            }
            _ = cancel_token.cancelled() => {
                break;
            }
        }
    }

    log_info!("status poller shutting down");
}

/// The backend polls twice a second; only the first failure of a streak
/// and every twentieth after it are logged.
fn log_failure(streak: u32, detail: &str) {
    if streak == 1 || streak % 20 == 0 {
        log_warn!("status poll failed ({} in a row), keeping last mode: {}", streak, detail);
    }
}

pub(crate) fn default_poll_timeout(interval: Duration) -> Duration {
    (interval * 4).max(Duration::from_secs(2))
}
