//! Transport contract between the controller session and the wire.
//!
//! [`DisplayBus`] is what the [`TransferEngine`](crate::transfer::TransferEngine)
//! and the command path drive. Concrete adapters over `embedded-hal` live in
//! [`interface`](crate::interface); DMA / interrupt driven adapters implement
//! the same trait in board code.

use display_interface::DisplayError;

/// Which transport a bus speaks, and how it addresses the device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusKind {
    /// I2C with a 7-bit device address.
    I2c { address: u8 },
    /// SPI with a data/command select line.
    Spi,
}

impl BusKind {
    pub fn address(self) -> Option<u8> {
        match self {
            BusKind::I2c { address } => Some(address),
            BusKind::Spi => None,
        }
    }
}

/// How an I2C chunk opens on the bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChunkStart {
    /// Fresh START condition.
    Start,
    /// Continuation of the previous chunk (reload, no new START).
    Continue,
}

/// How an I2C chunk closes on the bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChunkEnd {
    /// More chunks follow; hold the bus (reload mode).
    Reload,
    /// Last chunk; generate STOP (auto-end).
    Stop,
}

/// Position of a chunk within its transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChunkFraming {
    /// Zero-based chunk number.
    pub index: usize,
    /// `true` when no bytes remain after this chunk.
    pub is_final: bool,
}

impl ChunkFraming {
    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn start(&self) -> ChunkStart {
        if self.is_first() {
            ChunkStart::Start
        } else {
            ChunkStart::Continue
        }
    }

    pub fn end(&self) -> ChunkEnd {
        if self.is_final {
            ChunkEnd::Stop
        } else {
            ChunkEnd::Reload
        }
    }
}

/// Result of handing a chunk to the bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChunkStatus {
    /// The chunk is on the wire. Completion arrives later through
    /// [`TransferEngine::on_chunk_complete`](crate::transfer::TransferEngine::on_chunk_complete)
    /// or [`on_chunk_error`](crate::transfer::TransferEngine::on_chunk_error).
    Pending,
    /// The chunk was written before `start_chunk` returned.
    Done,
}

/// Byte-stream transport to an SSD1306 / SSD1309 controller.
///
/// # DMA
///
/// Implementations returning [`ChunkStatus::Pending`] may keep reading the
/// chunk after `start_chunk` returns. The driver guarantees the chunk's
/// buffer is neither moved nor written until the engine reports the
/// transfer finished.
pub trait DisplayBus {
    fn kind(&self) -> BusKind;

    /// Send command bytes synchronously, outside the chunked data path.
    ///
    /// I2C frames them behind a `0x00` control byte; SPI holds D/C low.
    fn send_command(&mut self, bytes: &[u8]) -> Result<(), DisplayError>;

    /// Single command byte.
    fn write_byte(&mut self, byte: u8) -> Result<(), DisplayError> {
        self.send_command(&[byte])
    }

    /// Start writing one chunk of display RAM data (at most 255 bytes).
    fn start_chunk(&mut self, chunk: &[u8], framing: ChunkFraming) -> Result<ChunkStatus, DisplayError>;

    /// Abort the data transaction in progress after an error.
    fn abort(&mut self) {}
}

/// Board-level control lines consumed during bring-up.
pub trait Board {
    /// Drive the controller's reset line. `true` holds the controller in reset.
    fn set_reset(&mut self, asserted: bool) -> Result<(), DisplayError>;

    fn delay_ms(&mut self, ms: u32);
}
