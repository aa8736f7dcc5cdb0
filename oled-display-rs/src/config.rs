//! Driver configuration.
//!
//! Panel geometry is fixed at compile time by the [`PanelSize`](crate::panel::PanelSize)
//! type parameter; everything else lives in [`DisplayConfig`].

use crate::buffers::BufferMode;
use crate::mapping::RowMapping;
use crate::transfer::MAX_CHUNK;

// ── Controller ───────────────────────────────────────────────────────────

/// Controller family. Selects the analog setup commands of the init sequence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Controller {
    /// SSD1306: internal charge pump.
    Ssd1306,
    /// SSD1309: external VCC, master configuration command.
    #[default]
    Ssd1309,
}

// ── Orientation ──────────────────────────────────────────────────────────

/// Segment remap and COM scan direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Orientation {
    /// Column 127 mapped to SEG0, COM scan from COM[N-1] (`A1`, `C8`).
    /// The usual mounting of breakout modules.
    #[default]
    Standard,
    /// Both axes mirrored relative to [`Standard`](Self::Standard) (`A0`, `C0`).
    Rotated180,
}

// ── DisplayConfig ────────────────────────────────────────────────────────

/// Runtime configuration for [`OledDriver`](crate::OledDriver) and the
/// refresh task.
///
/// [`DisplayConfig::default()`] reproduces the reference SSD1309 firmware
/// setup (contrast `0x6F`, double buffering, 30 Hz).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayConfig {
    pub controller: Controller,
    /// Row-to-page mapping. Must match the COM pin wiring of the panel.
    pub mapping: RowMapping,
    pub orientation: Orientation,
    pub buffer_mode: BufferMode,
    /// Only send frames that changed since the last successful sync.
    /// Default: true.
    pub dirty_tracking: bool,
    /// Contrast sent during init. Default: `0x6F`.
    pub contrast: u8,
    /// Start with inverted pixels (`A7`). Default: false.
    pub inverted: bool,
    /// Largest data chunk per bus transaction, `1..=255`. Default: 255.
    pub max_chunk: usize,
    /// Refresh rate of the periodic sync task in Hz. Default: 30.
    pub update_frequency_hz: u32,

    // ── Bring-up timing ──────────────────────────────────────────────
    /// Time the reset line is held asserted. Default: 10 ms.
    pub reset_pulse_ms: u32,
    /// Wait after releasing reset. Default: 500 ms.
    pub reset_recovery_ms: u32,
    /// Wait between the init sequence and display-on. Default: 100 ms.
    pub power_on_settle_ms: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            controller: Controller::Ssd1309,
            mapping: RowMapping::Sequential,
            orientation: Orientation::Standard,
            buffer_mode: BufferMode::Double,
            dirty_tracking: true,
            contrast: 0x6F,
            inverted: false,
            max_chunk: MAX_CHUNK,
            update_frequency_hz: 30,
            reset_pulse_ms: 10,
            reset_recovery_ms: 500,
            power_on_settle_ms: 100,
        }
    }
}

impl DisplayConfig {
    /// Convert the configured frequency to a timer period in milliseconds.
    ///
    /// Formula: `1000 / update_frequency_hz`, with 0 Hz treated as 1 Hz.
    pub fn update_period_ms(&self) -> u64 {
        1000 / self.update_frequency_hz.max(1) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let c = DisplayConfig::default();
        assert_eq!(c.controller, Controller::Ssd1309);
        assert_eq!(c.buffer_mode, BufferMode::Double);
        assert!(c.dirty_tracking);
        assert_eq!(c.contrast, 0x6F);
        assert_eq!(c.max_chunk, 255);
        assert_eq!(c.update_frequency_hz, 30);
        assert_eq!(c.reset_pulse_ms, 10);
        assert_eq!(c.reset_recovery_ms, 500);
        assert_eq!(c.power_on_settle_ms, 100);
    }

    #[test]
    fn update_period_30hz() {
        let c = DisplayConfig::default();
        assert_eq!(c.update_period_ms(), 33);
    }

    #[test]
    fn update_period_60hz() {
        let c = DisplayConfig {
            update_frequency_hz: 60,
            ..DisplayConfig::default()
        };
        assert_eq!(c.update_period_ms(), 16);
    }

    #[test]
    fn update_period_zero_hz_does_not_divide_by_zero() {
        let c = DisplayConfig {
            update_frequency_hz: 0,
            ..DisplayConfig::default()
        };
        assert_eq!(c.update_period_ms(), 1000);
    }
}
