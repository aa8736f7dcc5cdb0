//! Chunked, completion-driven frame transfer.
//!
//! The controller accepts at most 255 bytes per bus transaction, so a
//! frame is streamed as a sequence of chunks. [`TransferEngine::begin`]
//! issues the first chunk; every later chunk is issued from
//! [`TransferEngine::on_chunk_complete`], which an interrupt-driven bus
//! calls from its completion ISR. Blocking buses report
//! [`ChunkStatus::Done`] and the engine keeps going in the same call.
//!
//! ```text
//! begin ──► chunk 0 ──► complete ──► chunk 1 ──► ... ──► chunk n ──► callback(Complete)
//!              │                        │
//!              └──── error ─────────────┴──► abort ──► callback(Failed)
//! ```
//!
//! Continuation is a loop, never recursion, so a run of synchronous
//! completions uses constant stack.

use display_interface::DisplayError;

use crate::bus::{ChunkFraming, ChunkStatus, DisplayBus};
use crate::error::{TransferError, TransferFault};

/// Largest chunk the controller accepts in one transaction.
pub const MAX_CHUNK: usize = 255;

/// Progress of the transfer in flight (or the last one).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransferContext {
    /// 7-bit device address for I2C, `None` for SPI.
    pub address: Option<u8>,
    /// Total bytes to send.
    pub length: usize,
    /// Bytes acknowledged so far.
    pub transferred: usize,
    /// Size of the chunk currently on the bus.
    pub current: usize,
    /// Chunks issued so far.
    pub chunks: usize,
}

impl TransferContext {
    pub fn remaining(&self) -> usize {
        self.length - self.transferred
    }

    pub fn is_complete(&self) -> bool {
        self.transferred == self.length
    }
}

/// Final result of a transfer, handed to the completion callback.
#[derive(Debug, Clone)]
pub enum TransferOutcome {
    Complete { bytes: usize },
    Failed { fault: TransferFault, transferred: usize },
}

impl TransferOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TransferOutcome::Complete { .. })
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TransferOutcome {
    fn format(&self, f: defmt::Formatter) {
        match self {
            TransferOutcome::Complete { bytes } => defmt::write!(f, "Complete({} bytes)", bytes),
            TransferOutcome::Failed { fault, transferred } => {
                defmt::write!(f, "Failed({} after {} bytes)", fault, transferred)
            }
        }
    }
}

/// Completion hook. Runs in whatever context finished the transfer,
/// typically an interrupt handler, so it must not block.
pub type CompletionCallback = fn(&TransferOutcome);

/// Iterator over the chunk sizes used to send `len` bytes.
#[derive(Clone, Debug)]
pub struct ChunkLengths {
    remaining: usize,
    max: usize,
}

impl Iterator for ChunkLengths {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let n = self.remaining.min(self.max);
        self.remaining -= n;
        Some(n)
    }
}

/// Chunk plan for a `len`-byte transfer with chunks of at most `max` bytes.
///
/// `max` is clamped to `1..=MAX_CHUNK`.
pub fn chunk_lengths(len: usize, max: usize) -> ChunkLengths {
    ChunkLengths {
        remaining: len,
        max: max.clamp(1, MAX_CHUNK),
    }
}

/// Streams one byte slice at a time over a [`DisplayBus`].
///
/// The engine never owns the bytes it sends: the caller passes the same
/// source slice to [`begin`](Self::begin) and to every
/// [`on_chunk_complete`](Self::on_chunk_complete) and keeps it untouched
/// until the transfer finishes.
pub struct TransferEngine {
    context: TransferContext,
    in_flight: bool,
    max_chunk: usize,
    callback: Option<CompletionCallback>,
}

impl Default for TransferEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TransferEngine {
    pub const fn new() -> Self {
        Self {
            context: TransferContext {
                address: None,
                length: 0,
                transferred: 0,
                current: 0,
                chunks: 0,
            },
            in_flight: false,
            max_chunk: MAX_CHUNK,
            callback: None,
        }
    }

    /// Use chunks of at most `max` bytes (clamped to `1..=255`).
    pub fn with_max_chunk(mut self, max: usize) -> Self {
        self.max_chunk = max.clamp(1, MAX_CHUNK);
        self
    }

    pub fn max_chunk(&self) -> usize {
        self.max_chunk
    }

    pub fn set_completion_callback(&mut self, callback: Option<CompletionCallback>) {
        self.callback = callback;
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn context(&self) -> &TransferContext {
        &self.context
    }

    /// Start sending `source`.
    ///
    /// Returns `Ok(Some(outcome))` if the transfer finished before returning
    /// (empty source, blocking bus or an immediate bus error) and `Ok(None)`
    /// while chunks are still pending.
    ///
    /// # Errors
    ///
    /// [`TransferError::Busy`] if a transfer is already in flight. This is a
    /// caller bug and also trips a debug assertion; the running transfer is
    /// left alone.
    pub fn begin<B: DisplayBus + ?Sized>(
        &mut self,
        bus: &mut B,
        source: &[u8],
    ) -> Result<Option<TransferOutcome>, TransferError> {
        if self.in_flight {
            debug_assert!(false, "transfer already in flight");
            return Err(TransferError::Busy);
        }

        self.context = TransferContext {
            address: bus.kind().address(),
            length: source.len(),
            ..TransferContext::default()
        };
        self.in_flight = true;

        Ok(self.pump(bus, source))
    }

    /// The chunk on the bus finished. Issues the next one or completes.
    ///
    /// Returns `None` when more chunks are pending, or when no transfer was
    /// in flight (spurious event).
    pub fn on_chunk_complete<B: DisplayBus + ?Sized>(
        &mut self,
        bus: &mut B,
        source: &[u8],
    ) -> Option<TransferOutcome> {
        if !self.in_flight {
            return None;
        }
        self.context.transferred += self.context.current;
        self.context.current = 0;
        self.pump(bus, source)
    }

    /// The chunk on the bus failed. Aborts and reports the failure.
    ///
    /// Returns `None` if no transfer was in flight.
    pub fn on_chunk_error<B: DisplayBus + ?Sized>(
        &mut self,
        bus: &mut B,
        fault: TransferFault,
    ) -> Option<TransferOutcome> {
        if !self.in_flight {
            return None;
        }
        bus.abort();
        self.context.current = 0;
        Some(self.finish(TransferOutcome::Failed {
            fault,
            transferred: self.context.transferred,
        }))
    }

    fn pump<B: DisplayBus + ?Sized>(&mut self, bus: &mut B, source: &[u8]) -> Option<TransferOutcome> {
        loop {
            if self.context.is_complete() {
                return Some(self.finish(TransferOutcome::Complete {
                    bytes: self.context.length,
                }));
            }

            let start = self.context.transferred;
            let len = self.context.remaining().min(self.max_chunk);
            let Some(chunk) = source.get(start..start + len) else {
                // Source shrank since `begin`.
                bus.abort();
                return Some(self.finish(TransferOutcome::Failed {
                    fault: TransferFault::Bus(DisplayError::OutOfBoundsError),
                    transferred: start,
                }));
            };

            let framing = ChunkFraming {
                index: self.context.chunks,
                is_final: start + len == self.context.length,
            };
            self.context.current = len;
            self.context.chunks += 1;

            match bus.start_chunk(chunk, framing) {
                Ok(ChunkStatus::Pending) => return None,
                Ok(ChunkStatus::Done) => {
                    self.context.transferred += len;
                    self.context.current = 0;
                }
                Err(e) => {
                    bus.abort();
                    self.context.current = 0;
                    return Some(self.finish(TransferOutcome::Failed {
                        fault: TransferFault::Bus(e),
                        transferred: start,
                    }));
                }
            }
        }
    }

    fn finish(&mut self, outcome: TransferOutcome) -> TransferOutcome {
        self.in_flight = false;
        if let Some(callback) = self.callback {
            callback(&outcome);
        }
        outcome
    }
}
