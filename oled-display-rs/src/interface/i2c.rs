use display_interface::DisplayError;
use embedded_hal::i2c::{I2c, Operation};

use crate::bus::{BusKind, ChunkFraming, ChunkStatus, DisplayBus};

/// Control byte: the rest of the transaction is commands.
const CONTROL_COMMAND: u8 = 0x00;
/// Control byte: the rest of the transaction is display RAM data.
const CONTROL_DATA: u8 = 0x40;

/// 7-bit I2C address of the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cAddress(u8);

impl I2cAddress {
    /// SA0 low.
    pub const DEFAULT: Self = Self(0x3C);
    /// SA0 high.
    pub const ALTERNATE: Self = Self(0x3D);

    pub const fn new(address: u8) -> Self {
        Self(address & 0x7F)
    }

    /// From the shifted 8-bit form printed on many modules (`0x78` -> `0x3C`).
    pub const fn from_8bit(address: u8) -> Self {
        Self(address >> 1)
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl Default for I2cAddress {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Blocking I2C transport.
///
/// Each command and each data chunk is a single I2C write transaction,
/// opened by the matching control byte. The [`ChunkFraming`] passed to
/// [`start_chunk`](DisplayBus::start_chunk) is ignored: every chunk gets its
/// own START, `0x40` control byte and STOP, which the controller accepts in
/// horizontal addressing mode.
///
/// DMA-driven implementations of [`DisplayBus`] that keep one transaction
/// open across chunks must honour [`ChunkFraming::start`] (START vs
/// restart) and [`ChunkFraming::end`] (reload vs STOP) instead.
pub struct I2cInterface<I2C> {
    i2c: I2C,
    address: I2cAddress,
}

impl<I2C: I2c> I2cInterface<I2C> {
    pub fn new(i2c: I2C, address: I2cAddress) -> Self {
        Self { i2c, address }
    }

    /// Give back the bus peripheral.
    pub fn release(self) -> I2C {
        self.i2c
    }

    fn write_with_control(&mut self, control: u8, bytes: &[u8]) -> Result<(), DisplayError> {
        self.i2c
            .transaction(
                self.address.get(),
                &mut [Operation::Write(&[control]), Operation::Write(bytes)],
            )
            .map_err(|_| DisplayError::BusWriteError)
    }
}

impl<I2C: I2c> DisplayBus for I2cInterface<I2C> {
    fn kind(&self) -> BusKind {
        BusKind::I2c {
            address: self.address.get(),
        }
    }

    fn send_command(&mut self, bytes: &[u8]) -> Result<(), DisplayError> {
        self.write_with_control(CONTROL_COMMAND, bytes)
    }

    fn start_chunk(&mut self, chunk: &[u8], _framing: ChunkFraming) -> Result<ChunkStatus, DisplayError> {
        // The RAM pointer carries over between transactions in horizontal
        // addressing mode, so every chunk can stand alone.
        self.write_with_control(CONTROL_DATA, chunk)?;
        Ok(ChunkStatus::Done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};
    use std::vec;

    #[test]
    fn address_forms() {
        assert_eq!(I2cAddress::from_8bit(0x78), I2cAddress::DEFAULT);
        assert_eq!(I2cAddress::from_8bit(0x7A).get(), 0x3D);
        assert_eq!(I2cAddress::new(0xBC).get(), 0x3C);
        assert_eq!(I2cAddress::default().get(), 0x3C);
    }

    #[test]
    fn commands_and_data_use_control_bytes() {
        let expectations = [
            I2cTransaction::transaction_start(0x3C),
            I2cTransaction::write(0x3C, vec![0x00]),
            I2cTransaction::write(0x3C, vec![0x81, 0x6F]),
            I2cTransaction::transaction_end(0x3C),
            I2cTransaction::transaction_start(0x3C),
            I2cTransaction::write(0x3C, vec![0x00]),
            I2cTransaction::write(0x3C, vec![0xAF]),
            I2cTransaction::transaction_end(0x3C),
            I2cTransaction::transaction_start(0x3C),
            I2cTransaction::write(0x3C, vec![0x40]),
            I2cTransaction::write(0x3C, vec![1, 2, 3]),
            I2cTransaction::transaction_end(0x3C),
        ];
        let mut bus = I2cInterface::new(I2cMock::new(&expectations), I2cAddress::DEFAULT);

        assert_eq!(bus.kind(), BusKind::I2c { address: 0x3C });
        bus.send_command(&[0x81, 0x6F]).unwrap();
        bus.write_byte(0xAF).unwrap();
        let status = bus
            .start_chunk(&[1, 2, 3], ChunkFraming { index: 0, is_final: true })
            .unwrap();
        assert_eq!(status, ChunkStatus::Done);

        bus.release().done();
    }

    #[test]
    fn continuation_chunks_are_standalone_transactions() {
        let expectations = [
            I2cTransaction::transaction_start(0x3D),
            I2cTransaction::write(0x3D, vec![0x40]),
            I2cTransaction::write(0x3D, vec![0xAA; 4]),
            I2cTransaction::transaction_end(0x3D),
        ];
        let mut bus = I2cInterface::new(I2cMock::new(&expectations), I2cAddress::ALTERNATE);
        let middle = ChunkFraming { index: 3, is_final: false };
        assert_eq!(bus.start_chunk(&[0xAA; 4], middle), Ok(ChunkStatus::Done));
        bus.release().done();
    }
}
