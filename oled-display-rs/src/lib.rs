//! Double-buffered SSD1306 / SSD1309 OLED driver.
//!
//! This crate provides [`OledDriver`], a framebuffer plus drawing
//! primitives for page-organised monochrome panels, and a chunked transfer
//! engine that streams frames to the controller over I2C or SPI. The
//! engine is driven either synchronously (the `embedded-hal` adapters in
//! [`interface`]) or from a DMA completion interrupt.
//!
//! # Quick Start
//!
//! ```ignore
//! use oled_display_rs::{
//!     interface::{I2cAddress, I2cInterface, NoResetBoard},
//!     DisplayConfig, OledDriver, Panel128x64,
//! };
//! use embedded_graphics::{pixelcolor::BinaryColor, prelude::Point};
//!
//! let bus = I2cInterface::new(i2c, I2cAddress::DEFAULT);
//! let mut oled: OledDriver<_, _, Panel128x64> =
//!     OledDriver::new(bus, NoResetBoard::new(delay), DisplayConfig::default());
//!
//! oled.init()?;
//! oled.draw_circle(Point::new(64, 32), 20, BinaryColor::On);
//! oled.update_screen()?;
//! ```
//!
//! With the `task` feature, wrap the driver in a [`SharedDriver`] and run
//! [`display_refresh_task`] to sync at a fixed rate while other tasks draw.
//!
//! # Crate Features
//!
//! - **`defmt`**: structured logging via [`defmt`].
//! - **`task`**: [`SharedDriver`] and the Embassy refresh task.
//!
//! [`SharedDriver`]: shared::SharedDriver
//! [`display_refresh_task`]: display_task::display_refresh_task

#![no_std]

#[cfg(test)]
extern crate std;

pub mod buffers;
pub mod bus;
pub mod command;
pub mod config;
#[cfg(feature = "task")]
pub mod display_task;
pub mod driver;
pub mod error;
pub mod framebuffer;
pub mod graphics;
pub mod interface;
pub mod mapping;
pub mod panel;
#[cfg(feature = "task")]
pub mod shared;
pub mod text;
pub mod transfer;
pub mod trig;

#[cfg(test)]
mod mock;

// ── Re-exports for convenience ───────────────────────────────────────────

pub use buffers::BufferMode;
pub use bus::{Board, BusKind, ChunkFraming, ChunkStatus, DisplayBus};
pub use config::{Controller, DisplayConfig, Orientation};
#[cfg(feature = "task")]
pub use display_task::display_refresh_task;
pub use driver::{OledDriver, SessionState, SkipReason, SyncStart};
pub use error::{OledError, TransferError, TransferFault};
pub use framebuffer::Framebuffer;
pub use graphics::{ArcStyle, Canvas, Dash};
pub use mapping::RowMapping;
pub use panel::{Panel128x128, Panel128x32, Panel128x64, PanelSize};
#[cfg(feature = "task")]
pub use shared::SharedDriver;
pub use text::{Cursor, Font};
pub use transfer::{CompletionCallback, TransferOutcome};
