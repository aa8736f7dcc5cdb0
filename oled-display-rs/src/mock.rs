//! Test doubles for the crate's own bus and board traits.
//!
//! `embedded-hal` peripherals are mocked with `embedded-hal-mock` where
//! they are used.

use display_interface::DisplayError;
use heapless::Vec;

use crate::bus::{Board, BusKind, ChunkFraming, ChunkStatus, DisplayBus};

// ── DisplayBus ───────────────────────────────────────────────────────────

/// Records every command and data chunk it is handed.
pub(crate) struct MockBus {
    pub kind: BusKind,
    pub status: ChunkStatus,
    /// Refuse the chunk with this index.
    pub fail_on_chunk: Option<usize>,
    pub fail_commands: bool,
    /// One entry per `send_command` call.
    pub commands: Vec<Vec<u8, 4>, 128>,
    pub chunks: Vec<(usize, ChunkFraming), 64>,
    pub data: Vec<u8, 4096>,
    pub aborts: usize,
}

impl MockBus {
    fn new(kind: BusKind, status: ChunkStatus) -> Self {
        Self {
            kind,
            status,
            fail_on_chunk: None,
            fail_commands: false,
            commands: Vec::new(),
            chunks: Vec::new(),
            data: Vec::new(),
            aborts: 0,
        }
    }

    pub fn i2c_blocking() -> Self {
        Self::new(BusKind::I2c { address: 0x3C }, ChunkStatus::Done)
    }

    pub fn i2c_pending() -> Self {
        Self::new(BusKind::I2c { address: 0x3C }, ChunkStatus::Pending)
    }

    pub fn spi_blocking() -> Self {
        Self::new(BusKind::Spi, ChunkStatus::Done)
    }

    pub fn chunk_lengths(&self) -> Vec<usize, 64> {
        self.chunks.iter().map(|c| c.0).collect()
    }

    /// Every command byte sent, flattened.
    pub fn command_bytes(&self) -> Vec<u8, 512> {
        self.commands.iter().flat_map(|c| c.iter().copied()).collect()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.chunks.clear();
        self.data.clear();
    }
}

impl DisplayBus for MockBus {
    fn kind(&self) -> BusKind {
        self.kind
    }

    fn send_command(&mut self, bytes: &[u8]) -> Result<(), DisplayError> {
        if self.fail_commands {
            return Err(DisplayError::BusWriteError);
        }
        let mut cmd = Vec::new();
        cmd.extend_from_slice(bytes).map_err(|_| DisplayError::BusWriteError)?;
        self.commands.push(cmd).map_err(|_| DisplayError::BusWriteError)
    }

    fn start_chunk(&mut self, chunk: &[u8], framing: ChunkFraming) -> Result<ChunkStatus, DisplayError> {
        if self.fail_on_chunk == Some(framing.index) {
            return Err(DisplayError::BusWriteError);
        }
        self.chunks
            .push((chunk.len(), framing))
            .map_err(|_| DisplayError::BusWriteError)?;
        self.data
            .extend_from_slice(chunk)
            .map_err(|_| DisplayError::BusWriteError)?;
        Ok(self.status)
    }

    fn abort(&mut self) {
        self.aborts += 1;
    }
}

// ── Board ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BoardEvent {
    Reset(bool),
    Delay(u32),
}

#[derive(Default)]
pub(crate) struct MockBoard {
    pub events: Vec<BoardEvent, 16>,
}

impl Board for MockBoard {
    fn set_reset(&mut self, asserted: bool) -> Result<(), DisplayError> {
        self.events
            .push(BoardEvent::Reset(asserted))
            .map_err(|_| DisplayError::RSError)
    }

    fn delay_ms(&mut self, ms: u32) {
        let _ = self.events.push(BoardEvent::Delay(ms));
    }
}
