//! Sharing one [`OledDriver`] between tasks and the bus interrupt.
//!
//! The driver sits in a critical-section mutex, so the interrupt handler
//! that advances chunks and the task that draws never hold it at the same
//! time. Finished transfers are posted to a [`Signal`] instead of calling
//! back into application code from the interrupt.
//!
//! ```ignore
//! static OLED: StaticCell<SharedDriver<MyBus, MyBoard, Panel128x64>> = StaticCell::new();
//!
//! #[interrupt]
//! fn DMA_IRQ_0() {
//!     // After acknowledging the DMA interrupt:
//!     oled().on_chunk_complete();
//! }
//! ```

use core::cell::RefCell;

use embassy_sync::blocking_mutex::{raw::CriticalSectionRawMutex, Mutex};
use embassy_sync::signal::Signal;

use crate::bus::{Board, DisplayBus};
use crate::driver::{OledDriver, SyncStart};
use crate::error::{OledError, TransferFault};
use crate::panel::PanelSize;
use crate::transfer::TransferOutcome;

pub struct SharedDriver<B, BD, P: PanelSize> {
    driver: Mutex<CriticalSectionRawMutex, RefCell<OledDriver<B, BD, P>>>,
    frames: Signal<CriticalSectionRawMutex, TransferOutcome>,
}

impl<B, BD, P> SharedDriver<B, BD, P>
where
    B: DisplayBus,
    BD: Board,
    P: PanelSize,
{
    pub fn new(driver: OledDriver<B, BD, P>) -> Self {
        Self {
            driver: Mutex::new(RefCell::new(driver)),
            frames: Signal::new(),
        }
    }

    /// Run `f` with exclusive access to the driver, interrupts masked.
    ///
    /// Keep `f` short: the bus interrupt is held off until it returns.
    pub fn with<R>(&self, f: impl FnOnce(&mut OledDriver<B, BD, P>) -> R) -> R {
        self.driver.lock(|cell| f(&mut cell.borrow_mut()))
    }

    /// Request a sync (see [`OledDriver::request_sync`]).
    ///
    /// A frame that completes synchronously is posted to the signal too,
    /// so [`wait_frame`](Self::wait_frame) works for both kinds of bus.
    pub fn request_sync(&self) -> Result<SyncStart, OledError> {
        let result = self.with(|d| {
            if !d.is_sync_in_flight() {
                // Drop a stale outcome from an earlier frame.
                self.frames.reset();
            }
            d.request_sync()
        });
        if let Ok(SyncStart::Completed(outcome)) = &result {
            self.frames.signal(outcome.clone());
        }
        result
    }

    /// Call from the bus completion interrupt.
    pub fn on_chunk_complete(&self) {
        if let Some(outcome) = self.with(|d| d.on_chunk_complete()) {
            self.frames.signal(outcome);
        }
    }

    /// Call from the bus error interrupt.
    pub fn on_chunk_error(&self, fault: TransferFault) {
        if let Some(outcome) = self.with(|d| d.on_chunk_error(fault)) {
            self.frames.signal(outcome);
        }
    }

    /// Wait for the frame started by the last successful
    /// [`request_sync`](Self::request_sync).
    pub async fn wait_frame(&self) -> TransferOutcome {
        self.frames.wait().await
    }

    /// Outcome of a finished frame not yet waited for, if any.
    pub fn take_frame(&self) -> Option<TransferOutcome> {
        self.frames.try_take()
    }
}
