//! Periodic refresh loop.
//!
//! [`display_refresh_task`] requests a sync at `config.update_frequency_hz`
//! and waits for each started frame to finish before the next tick.
//! Drawing happens elsewhere, through [`SharedDriver::with`].

use embassy_time::{Duration, Ticker};

use crate::bus::{Board, DisplayBus};
use crate::config::DisplayConfig;
use crate::driver::{SkipReason, SyncStart};
use crate::panel::PanelSize;
use crate::shared::SharedDriver;
use crate::transfer::TransferOutcome;

// ── Refresh task ─────────────────────────────────────────────────────────

/// Periodic display refresh loop.
///
/// This is a regular `async fn`, **not** an Embassy `#[task]`. Callers
/// create a thin, concrete task wrapper, since Embassy tasks cannot be
/// generic:
///
/// ```ignore
/// #[embassy_executor::task]
/// async fn oled_task(
///     oled: &'static SharedDriver<MyBus, MyBoard, Panel128x64>,
///     config: DisplayConfig,
/// ) {
///     display_refresh_task(oled, config).await;
/// }
/// ```
///
/// # Control flow
///
/// Every `1000 / update_frequency_hz` ms:
/// - request a sync; clean frames and a display that is off are skipped
/// - if a transfer was started, wait for its outcome
///
/// # Errors
///
/// * Driver not initialised: logs and **returns** (task exits).
/// * Failed frame: logs and continues. The frame stays dirty and is
///   resent on the next tick.
#[allow(clippy::needless_pass_by_value)] // config is small and consumed
pub async fn display_refresh_task<B, BD, P>(oled: &SharedDriver<B, BD, P>, config: DisplayConfig)
where
    B: DisplayBus,
    BD: Board,
    P: PanelSize,
{
    if !oled.with(|d| d.is_initialized()) {
        #[cfg(feature = "defmt")]
        defmt::error!("OLED refresh task started before init");
        return;
    }

    let mut ticker = Ticker::every(Duration::from_millis(config.update_period_ms()));

    loop {
        ticker.next().await;

        let outcome = match oled.request_sync() {
            Ok(SyncStart::Started) => oled.wait_frame().await,
            Ok(SyncStart::Completed(outcome)) => {
                // Also posted to the signal; consume it here.
                let _ = oled.take_frame();
                outcome
            }
            Ok(SyncStart::Skipped(SkipReason::InFlight)) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("OLED frame still in flight at next tick");
                continue;
            }
            Ok(SyncStart::Skipped(_)) => continue,
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::error!("OLED sync failed: {}", _e);
                continue;
            }
        };

        if let TransferOutcome::Failed { .. } = outcome {
            #[cfg(feature = "defmt")]
            defmt::error!("OLED frame failed: {}", outcome);
        }
    }
}
