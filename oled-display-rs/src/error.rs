//! Error types for the OLED display driver.

use core::fmt;

use display_interface::DisplayError;

/// Errors that can occur during OLED display operations.
///
/// Bus adapters report every transport failure as a [`DisplayError`], so
/// this enum is non-generic over the underlying I2C / SPI error type.
#[derive(Debug, Clone)]
pub enum OledError {
    /// Display interface error (wraps I2C, SPI and control-line failures).
    Display(DisplayError),
    /// An operation was attempted before [`OledDriver::init()`](crate::OledDriver::init)
    /// completed.
    NotInitialized,
    /// A frame transfer is already in flight; the engine does not queue.
    TransferInProgress,
    /// A region was given with its corners out of order (`x1 > x2` or `y1 > y2`).
    InvalidRegion,
    /// A region reaches outside the panel.
    OutOfBounds,
    /// An external frame is larger than the framebuffer.
    BufferTooLarge {
        /// Length of the rejected source slice.
        len: usize,
        /// Framebuffer capacity in bytes.
        capacity: usize,
    },
    /// A bitmap slice holds fewer bytes than its declared dimensions need.
    BitmapTooShort,
}

impl From<DisplayError> for OledError {
    fn from(e: DisplayError) -> Self {
        OledError::Display(e)
    }
}

impl fmt::Display for OledError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OledError::Display(e) => write!(f, "Display interface error: {:?}", e),
            OledError::NotInitialized => write!(f, "Not initialized"),
            OledError::TransferInProgress => write!(f, "Transfer already in progress"),
            OledError::InvalidRegion => write!(f, "Region corners out of order"),
            OledError::OutOfBounds => write!(f, "Region outside the panel"),
            OledError::BufferTooLarge { len, capacity } => {
                write!(f, "Frame of {} bytes exceeds buffer of {} bytes", len, capacity)
            }
            OledError::BitmapTooShort => write!(f, "Bitmap data shorter than its dimensions"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for OledError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            OledError::Display(_e) => defmt::write!(f, "Display interface error"),
            OledError::NotInitialized => defmt::write!(f, "Not initialized"),
            OledError::TransferInProgress => defmt::write!(f, "Transfer in progress"),
            OledError::InvalidRegion => defmt::write!(f, "Invalid region"),
            OledError::OutOfBounds => defmt::write!(f, "Out of bounds"),
            OledError::BufferTooLarge { len, capacity } => {
                defmt::write!(f, "Buffer too large: {} > {}", len, capacity)
            }
            OledError::BitmapTooShort => defmt::write!(f, "Bitmap too short"),
        }
    }
}

/// Misuse of the [`TransferEngine`](crate::transfer::TransferEngine).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransferError {
    /// `begin()` was called while a previous transfer had not completed.
    Busy,
}

impl From<TransferError> for OledError {
    fn from(e: TransferError) -> Self {
        match e {
            TransferError::Busy => OledError::TransferInProgress,
        }
    }
}

/// Why an in-flight transfer failed.
///
/// Delivered through [`TransferOutcome::Failed`](crate::transfer::TransferOutcome::Failed);
/// the engine never retries on its own.
#[derive(Debug, Clone)]
pub enum TransferFault {
    /// The device did not acknowledge a byte (I2C).
    Nack,
    /// The DMA controller raised its transfer-error flag.
    Dma,
    /// The bus adapter refused to start a chunk.
    Bus(DisplayError),
}

#[cfg(feature = "defmt")]
impl defmt::Format for TransferFault {
    fn format(&self, f: defmt::Formatter) {
        match self {
            TransferFault::Nack => defmt::write!(f, "NACK"),
            TransferFault::Dma => defmt::write!(f, "DMA transfer error"),
            TransferFault::Bus(_e) => defmt::write!(f, "Bus error"),
        }
    }
}
