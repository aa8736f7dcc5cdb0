//! `embedded-hal` 1.0 adapters for [`DisplayBus`](crate::bus::DisplayBus)
//! and [`Board`](crate::bus::Board).
//!
//! These adapters complete every chunk before returning
//! ([`ChunkStatus::Done`](crate::bus::ChunkStatus::Done)). Boards with a DMA
//! capable peripheral implement `DisplayBus` directly and drive the engine
//! from their completion interrupt.

mod board;
mod i2c;
mod spi;

pub use board::{NoResetBoard, PinBoard};
pub use i2c::{I2cAddress, I2cInterface};
pub use spi::SpiInterface;
