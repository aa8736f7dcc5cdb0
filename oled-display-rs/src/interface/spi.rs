use display_interface::DisplayError;
use embedded_hal::{digital::OutputPin, spi::SpiDevice};

use crate::bus::{BusKind, ChunkFraming, ChunkStatus, DisplayBus};

/// Blocking 4-wire SPI transport.
///
/// The D/C line is driven low for commands and high for display data. Chip
/// select is handled by the [`SpiDevice`].
pub struct SpiInterface<SPI, DC> {
    spi: SPI,
    dc: DC,
}

impl<SPI: SpiDevice, DC: OutputPin> SpiInterface<SPI, DC> {
    pub fn new(spi: SPI, dc: DC) -> Self {
        Self { spi, dc }
    }

    pub fn release(self) -> (SPI, DC) {
        (self.spi, self.dc)
    }
}

impl<SPI: SpiDevice, DC: OutputPin> DisplayBus for SpiInterface<SPI, DC> {
    fn kind(&self) -> BusKind {
        BusKind::Spi
    }

    fn send_command(&mut self, bytes: &[u8]) -> Result<(), DisplayError> {
        self.dc.set_low().map_err(|_| DisplayError::DCError)?;
        self.spi.write(bytes).map_err(|_| DisplayError::BusWriteError)
    }

    fn start_chunk(&mut self, chunk: &[u8], _framing: ChunkFraming) -> Result<ChunkStatus, DisplayError> {
        self.dc.set_high().map_err(|_| DisplayError::DCError)?;
        self.spi.write(chunk).map_err(|_| DisplayError::BusWriteError)?;
        Ok(ChunkStatus::Done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };
    use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};
    use std::vec;

    /// One `SpiDevice::write` call.
    fn device_write(data: &[u8]) -> [SpiTransaction<u8>; 3] {
        [
            SpiTransaction::transaction_start(),
            SpiTransaction::write_vec(data.to_vec()),
            SpiTransaction::transaction_end(),
        ]
    }

    #[test]
    fn dc_line_selects_command_or_data() {
        let mut spi_expectations = vec![];
        spi_expectations.extend(device_write(&[0xAE]));
        spi_expectations.extend(device_write(&[0xFF, 0x00]));
        let dc = PinMock::new(&[
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ]);
        let mut bus = SpiInterface::new(SpiMock::new(&spi_expectations), dc);

        assert_eq!(bus.kind(), BusKind::Spi);
        bus.send_command(&[0xAE]).unwrap();
        let status = bus
            .start_chunk(&[0xFF, 0x00], ChunkFraming { index: 0, is_final: true })
            .unwrap();
        assert_eq!(status, ChunkStatus::Done);

        let (mut spi, mut dc) = bus.release();
        spi.done();
        dc.done();
    }
}
