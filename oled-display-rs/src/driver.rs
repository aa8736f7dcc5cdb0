//! Display controller session.
//!
//! [`OledDriver`] owns the bus, the board control lines, the framebuffers
//! and the transfer engine. It sequences controller bring-up, exposes the
//! drawing API against the front buffer and decides when a frame is pushed.
//!
//! ```text
//! Uninitialized ─► Initializing ─► Idle ─► SyncPending ─► SyncInFlight ─┐
//!                                   ▲                                   │
//!                                   └──────────── completion ───────────┘
//! ```

use display_interface::DisplayError;
use embedded_graphics::{pixelcolor::BinaryColor, prelude::Point};

use crate::buffers::{BufferMode, FrameBuffers};
use crate::bus::{Board, DisplayBus};
use crate::command::{self, opcode, Command};
use crate::config::{DisplayConfig, Orientation};
use crate::error::{OledError, TransferFault};
use crate::framebuffer::Framebuffer;
use crate::graphics::{self, ArcStyle};
use crate::panel::PanelSize;
use crate::text::{self, Cursor, Font};
use crate::transfer::{CompletionCallback, TransferEngine, TransferOutcome};

// ── Session state ────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionState {
    Uninitialized,
    Initializing,
    /// Display configured, no transfer in flight.
    Idle,
    /// A sync was accepted and the address window is being set.
    SyncPending,
    SyncInFlight,
}

/// Why a sync request did not start a transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SkipReason {
    DisplayOff,
    InFlight,
    /// Nothing drawn since the last successful sync.
    Clean,
}

/// Result of a sync request.
#[derive(Debug, Clone)]
pub enum SyncStart {
    /// Chunks are pending; the outcome arrives through
    /// [`OledDriver::on_chunk_complete`] / [`OledDriver::on_chunk_error`].
    Started,
    /// The bus finished (or failed) the whole frame before returning.
    Completed(TransferOutcome),
    Skipped(SkipReason),
}

// ── OledDriver ───────────────────────────────────────────────────────────

/// SSD1306 / SSD1309 driver for panel `P`.
///
/// # Lifecycle
///
/// 1. [`OledDriver::new()`] builds the driver without touching the bus.
/// 2. [`OledDriver::init()`] pulses reset and sends the init sequence.
/// 3. Draw with the `draw_*` / `fill_*` / `write_*` methods, or through
///    [`framebuffer_mut()`](Self::framebuffer_mut) with `embedded-graphics`.
/// 4. [`request_sync()`](Self::request_sync) periodically, or
///    [`update_screen()`](Self::update_screen) to push right away.
///
/// With an interrupt-driven bus, forward its completion and error events to
/// [`on_chunk_complete()`](Self::on_chunk_complete) and
/// [`on_chunk_error()`](Self::on_chunk_error).
///
/// # Example
///
/// ```no_run
/// # fn example<I2C: embedded_hal::i2c::I2c, D: embedded_hal::delay::DelayNs>(i2c: I2C, delay: D) {
/// use embedded_graphics::{pixelcolor::BinaryColor, prelude::Point};
/// use oled_display_rs::{
///     interface::{I2cAddress, I2cInterface, NoResetBoard},
///     DisplayConfig, OledDriver, Panel128x64,
/// };
///
/// let bus = I2cInterface::new(i2c, I2cAddress::DEFAULT);
/// let mut oled: OledDriver<_, _, Panel128x64> =
///     OledDriver::new(bus, NoResetBoard::new(delay), DisplayConfig::default());
/// oled.init().unwrap();
/// oled.fill_rectangle(Point::new(10, 10), Point::new(20, 20), BinaryColor::On);
/// oled.update_screen().unwrap();
/// # }
/// ```
pub struct OledDriver<B, BD, P: PanelSize> {
    bus: B,
    board: BD,
    config: DisplayConfig,
    frames: FrameBuffers<P>,
    engine: TransferEngine,
    state: SessionState,
    display_on: bool,
    /// Front buffer differs from what the panel shows.
    dirty: bool,
    /// Front buffer was written while the previous frame was on the bus.
    drawn_during_flight: bool,
    cursor: Cursor,
    last_outcome: Option<TransferOutcome>,
}

impl<B, BD, P> OledDriver<B, BD, P>
where
    B: DisplayBus,
    BD: Board,
    P: PanelSize,
{
    /// Construct an uninitialised driver. No bus traffic is generated.
    pub fn new(bus: B, board: BD, config: DisplayConfig) -> Self {
        Self {
            bus,
            board,
            frames: FrameBuffers::new(config.buffer_mode, config.mapping),
            engine: TransferEngine::new().with_max_chunk(config.max_chunk),
            config,
            state: SessionState::Uninitialized,
            display_on: false,
            // Controller RAM holds garbage after reset.
            dirty: true,
            drawn_during_flight: false,
            cursor: Cursor::default(),
            last_outcome: None,
        }
    }

    /// Hook run for every finished transfer, from whichever context
    /// finished it.
    pub fn set_completion_callback(&mut self, callback: Option<CompletionCallback>) {
        self.engine.set_completion_callback(callback);
    }

    // ── Bring-up and commands ────────────────────────────────────────

    /// Reset the controller, send the init sequence and switch the display on.
    ///
    /// May be called again to re-initialise, as long as no transfer is in
    /// flight.
    ///
    /// # Errors
    ///
    /// [`OledError::TransferInProgress`] while a frame is on the bus, or
    /// [`OledError::Display`] if the bus or reset line fails. The driver is
    /// left uninitialised on error.
    pub fn init(&mut self) -> Result<(), OledError> {
        if self.engine.is_in_flight() {
            return Err(OledError::TransferInProgress);
        }
        self.state = SessionState::Initializing;
        self.display_on = false;

        match self.run_init() {
            Ok(()) => {
                self.display_on = true;
                self.dirty = true;
                self.state = SessionState::Idle;
                #[cfg(feature = "defmt")]
                defmt::info!("OLED initialised ({}x{})", P::WIDTH, P::HEIGHT);
                Ok(())
            }
            Err(e) => {
                let e = OledError::from(e);
                self.state = SessionState::Uninitialized;
                #[cfg(feature = "defmt")]
                defmt::error!("OLED init failed: {}", e);
                Err(e)
            }
        }
    }

    fn run_init(&mut self) -> Result<(), DisplayError> {
        self.board.set_reset(true)?;
        self.board.delay_ms(self.config.reset_pulse_ms);
        self.board.set_reset(false)?;
        self.board.delay_ms(self.config.reset_recovery_ms);

        for cmd in command::init_sequence::<P>(&self.config) {
            self.bus.send_command(&cmd.encode())?;
        }

        self.board.delay_ms(self.config.power_on_settle_ms);
        self.bus.write_byte(opcode::DISPLAY_ON)
    }

    /// Send commands outside the frame stream.
    fn send(&mut self, commands: &[Command]) -> Result<(), OledError> {
        if !self.is_initialized() {
            return Err(OledError::NotInitialized);
        }
        // Commands would interleave with the data chunks on the wire.
        if self.engine.is_in_flight() {
            return Err(OledError::TransferInProgress);
        }
        for cmd in commands {
            self.bus.send_command(&cmd.encode())?;
        }
        Ok(())
    }

    /// Switch the panel on (`AF`) or off (`AE`). RAM contents are kept.
    pub fn set_display_on(&mut self, on: bool) -> Result<(), OledError> {
        let op = if on {
            opcode::DISPLAY_ON
        } else {
            opcode::DISPLAY_OFF
        };
        self.send(&[Command::new(op)])?;
        self.display_on = on;
        Ok(())
    }

    pub fn is_display_on(&self) -> bool {
        self.display_on
    }

    pub fn set_contrast(&mut self, contrast: u8) -> Result<(), OledError> {
        self.send(&[Command::with_param(opcode::SET_CONTRAST, contrast)])?;
        self.config.contrast = contrast;
        Ok(())
    }

    /// Hardware pixel inversion (`A7` / `A6`). The framebuffer is unchanged.
    pub fn set_inverted(&mut self, inverted: bool) -> Result<(), OledError> {
        self.send(&[command::inversion_command(inverted)])?;
        self.config.inverted = inverted;
        Ok(())
    }

    pub fn set_orientation(&mut self, orientation: Orientation) -> Result<(), OledError> {
        self.send(&command::orientation_commands(orientation))?;
        self.config.orientation = orientation;
        Ok(())
    }

    // ── Drawing ──────────────────────────────────────────────────────

    fn mark_dirty(&mut self) {
        self.dirty = true;
        if self.engine.is_in_flight() {
            self.drawn_during_flight = true;
        }
    }

    /// Front buffer for drawing, marked dirty.
    fn canvas(&mut self) -> &mut Framebuffer<P> {
        self.mark_dirty();
        self.frames.front_mut()
    }

    /// The front buffer.
    pub fn framebuffer(&self) -> &Framebuffer<P> {
        self.frames.front()
    }

    /// The front buffer, for `embedded-graphics` drawing. Marks the frame
    /// dirty.
    pub fn framebuffer_mut(&mut self) -> &mut Framebuffer<P> {
        self.canvas()
    }

    pub fn draw_pixel(&mut self, at: Point, color: BinaryColor) {
        graphics::draw_pixel(self.canvas(), at, color);
    }

    pub fn draw_line(&mut self, from: Point, to: Point, color: BinaryColor) {
        graphics::draw_line(self.canvas(), from, to, color);
    }

    pub fn draw_polyline(&mut self, points: &[Point], color: BinaryColor) {
        graphics::draw_polyline(self.canvas(), points, color);
    }

    pub fn draw_rectangle(&mut self, a: Point, b: Point, color: BinaryColor) {
        graphics::draw_rectangle(self.canvas(), a, b, color);
    }

    pub fn fill_rectangle(&mut self, a: Point, b: Point, color: BinaryColor) {
        graphics::fill_rectangle(self.canvas(), a, b, color);
    }

    pub fn draw_circle(&mut self, center: Point, radius: u16, color: BinaryColor) {
        graphics::draw_circle(self.canvas(), center, radius, color);
    }

    pub fn fill_circle(&mut self, center: Point, radius: u16, color: BinaryColor) {
        graphics::fill_circle(self.canvas(), center, radius, color);
    }

    pub fn draw_arc(
        &mut self,
        center: Point,
        radius: u16,
        start_deg: u16,
        sweep_deg: u16,
        style: &ArcStyle,
        color: BinaryColor,
    ) {
        graphics::draw_arc(self.canvas(), center, radius, start_deg, sweep_deg, style, color);
    }

    /// Invert the inclusive rectangle between corners `a` (top-left) and `b`
    /// (bottom-right).
    ///
    /// # Errors
    ///
    /// [`OledError::InvalidRegion`] or [`OledError::OutOfBounds`]; the
    /// framebuffer is unchanged in both cases.
    pub fn invert_rectangle(&mut self, a: Point, b: Point) -> Result<(), OledError> {
        self.frames.front_mut().invert_region(a.x, a.y, b.x, b.y)?;
        self.mark_dirty();
        Ok(())
    }

    pub fn draw_bitmap(
        &mut self,
        origin: Point,
        bitmap: &[u8],
        width: u32,
        height: u32,
        color: BinaryColor,
    ) -> Result<(), OledError> {
        graphics::draw_bitmap(self.canvas(), origin, bitmap, width, height, color)
    }

    /// Set every pixel of the front buffer.
    pub fn fill(&mut self, color: BinaryColor) {
        self.canvas().fill(color);
    }

    pub fn clear(&mut self) {
        self.fill(BinaryColor::Off);
    }

    /// Copy a prepared frame (controller RAM order) into the front buffer.
    pub fn load_frame(&mut self, data: &[u8]) -> Result<(), OledError> {
        self.frames.front_mut().load(data)?;
        self.mark_dirty();
        Ok(())
    }

    // ── Text ─────────────────────────────────────────────────────────

    pub fn set_cursor(&mut self, x: u32, y: u32) {
        self.cursor = Cursor { x, y };
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Draw one character at the cursor. See [`text::write_char`].
    pub fn write_char(&mut self, ch: char, font: &Font, color: BinaryColor) -> Result<(), char> {
        text::write_char(self.frames.front_mut(), &mut self.cursor, ch, font, color)?;
        self.mark_dirty();
        Ok(())
    }

    /// Draw a string at the cursor, stopping at the first character that
    /// does not fit. See [`text::write_string`].
    pub fn write_string(&mut self, s: &str, font: &Font, color: BinaryColor) -> Result<(), char> {
        let start = self.cursor;
        let result = text::write_string(self.frames.front_mut(), &mut self.cursor, s, font, color);
        // Characters before a rejected one are drawn.
        if self.cursor != start {
            self.mark_dirty();
        }
        result
    }

    // ── Sync ─────────────────────────────────────────────────────────

    /// Push the front buffer if the display is on, no transfer is in flight
    /// and (with dirty tracking) something changed.
    ///
    /// Meant to be called from a periodic timer.
    ///
    /// # Errors
    ///
    /// [`OledError::NotInitialized`] before [`init()`](Self::init), or
    /// [`OledError::Display`] if setting the address window fails.
    pub fn request_sync(&mut self) -> Result<SyncStart, OledError> {
        if !self.is_initialized() {
            return Err(OledError::NotInitialized);
        }
        if self.engine.is_in_flight() {
            return Ok(SyncStart::Skipped(SkipReason::InFlight));
        }
        if !self.display_on {
            return Ok(SyncStart::Skipped(SkipReason::DisplayOff));
        }
        if self.config.dirty_tracking && !self.dirty {
            return Ok(SyncStart::Skipped(SkipReason::Clean));
        }
        self.start_sync()
    }

    /// Push the front buffer now, whether or not it changed.
    ///
    /// # Errors
    ///
    /// [`OledError::TransferInProgress`] while the previous frame is still
    /// on the bus, plus the errors of [`request_sync()`](Self::request_sync).
    pub fn update_screen(&mut self) -> Result<SyncStart, OledError> {
        if !self.is_initialized() {
            return Err(OledError::NotInitialized);
        }
        if self.engine.is_in_flight() {
            return Err(OledError::TransferInProgress);
        }
        if !self.display_on {
            return Ok(SyncStart::Skipped(SkipReason::DisplayOff));
        }
        self.start_sync()
    }

    fn start_sync(&mut self) -> Result<SyncStart, OledError> {
        self.state = SessionState::SyncPending;
        for window in command::full_window::<P>() {
            if let Err(e) = self.bus.send_command(&window) {
                self.state = SessionState::Idle;
                return Err(e.into());
            }
        }

        self.drawn_during_flight = false;
        let source = self.frames.lend();
        self.state = SessionState::SyncInFlight;

        match self.engine.begin(&mut self.bus, source) {
            Ok(None) => Ok(SyncStart::Started),
            Ok(Some(outcome)) => {
                self.finish_sync(&outcome);
                Ok(SyncStart::Completed(outcome))
            }
            Err(e) => {
                self.frames.release();
                self.state = SessionState::Idle;
                Err(e.into())
            }
        }
    }

    fn finish_sync(&mut self, outcome: &TransferOutcome) {
        self.frames.release();
        self.state = SessionState::Idle;
        if outcome.is_success() {
            self.dirty = self.drawn_during_flight;
        } else {
            // Resend on the next sync.
            self.dirty = true;
            #[cfg(feature = "defmt")]
            defmt::warn!("Frame transfer failed: {}", outcome);
        }
        self.drawn_during_flight = false;
        self.last_outcome = Some(outcome.clone());
    }

    /// Forward a chunk-complete event from the bus.
    ///
    /// Returns the outcome once the frame is finished, `None` while chunks
    /// remain or if no frame was in flight.
    pub fn on_chunk_complete(&mut self) -> Option<TransferOutcome> {
        if self.state != SessionState::SyncInFlight {
            return None;
        }
        let source = self.frames.lent_bytes();
        let outcome = self.engine.on_chunk_complete(&mut self.bus, source)?;
        self.finish_sync(&outcome);
        Some(outcome)
    }

    /// Forward a bus or DMA error. The frame is abandoned and stays dirty.
    pub fn on_chunk_error(&mut self, fault: TransferFault) -> Option<TransferOutcome> {
        if self.state != SessionState::SyncInFlight {
            return None;
        }
        let outcome = self.engine.on_chunk_error(&mut self.bus, fault)?;
        self.finish_sync(&outcome);
        Some(outcome)
    }

    // ── Introspection ────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// `true` once [`init()`](Self::init) has succeeded.
    pub fn is_initialized(&self) -> bool {
        !matches!(
            self.state,
            SessionState::Uninitialized | SessionState::Initializing
        )
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_sync_in_flight(&self) -> bool {
        self.engine.is_in_flight()
    }

    /// Outcome of the most recent finished transfer.
    pub fn last_outcome(&self) -> Option<&TransferOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    pub fn buffer_mode(&self) -> BufferMode {
        self.frames.mode()
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Mutable bus access, e.g. to read status registers in an ISR.
    /// Must not start or disturb a data transaction.
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Tear down and return the bus and board.
    pub fn release(self) -> (B, BD) {
        (self.bus, self.board)
    }
}
