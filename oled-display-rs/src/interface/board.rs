use display_interface::DisplayError;
use embedded_hal::{delay::DelayNs, digital::OutputPin};

use crate::bus::Board;

/// Board with an active-low reset pin wired to the controller.
pub struct PinBoard<RST, D> {
    reset: RST,
    delay: D,
}

impl<RST: OutputPin, D: DelayNs> PinBoard<RST, D> {
    pub fn new(reset: RST, delay: D) -> Self {
        Self { reset, delay }
    }

    pub fn release(self) -> (RST, D) {
        (self.reset, self.delay)
    }
}

impl<RST: OutputPin, D: DelayNs> Board for PinBoard<RST, D> {
    fn set_reset(&mut self, asserted: bool) -> Result<(), DisplayError> {
        let result = if asserted {
            self.reset.set_low()
        } else {
            self.reset.set_high()
        };
        result.map_err(|_| DisplayError::RSError)
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}

/// Board whose controller resets itself on power-up (most I2C modules).
pub struct NoResetBoard<D> {
    delay: D,
}

impl<D: DelayNs> NoResetBoard<D> {
    pub fn new(delay: D) -> Self {
        Self { delay }
    }
}

impl<D: DelayNs> Board for NoResetBoard<D> {
    fn set_reset(&mut self, _asserted: bool) -> Result<(), DisplayError> {
        Ok(())
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };

    #[test]
    fn reset_is_active_low() {
        let reset = PinMock::new(&[
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ]);
        let mut board = PinBoard::new(reset, NoopDelay);
        board.set_reset(true).unwrap();
        board.delay_ms(10);
        board.set_reset(false).unwrap();

        let (mut reset, _) = board.release();
        reset.done();
    }

    #[test]
    fn no_reset_board_never_fails() {
        let mut board = NoResetBoard::new(NoopDelay);
        assert_eq!(board.set_reset(true), Ok(()));
        board.delay_ms(5);
        assert_eq!(board.set_reset(false), Ok(()));
    }
}
