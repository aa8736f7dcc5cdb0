//! Controller command encoding and the bring-up sequence.

use heapless::Vec;

use crate::config::{Controller, DisplayConfig, Orientation};
use crate::panel::PanelSize;

/// SSD1306 / SSD1309 opcodes used by the driver.
pub mod opcode {
    pub const SET_CONTRAST: u8 = 0x81;
    pub const CHARGE_PUMP: u8 = 0x8D;
    pub const MASTER_CONFIG: u8 = 0xAD;
    pub const MEMORY_MODE: u8 = 0x20;
    pub const COLUMN_ADDRESS: u8 = 0x21;
    pub const PAGE_ADDRESS: u8 = 0x22;
    pub const DEACTIVATE_SCROLL: u8 = 0x2E;
    pub const START_LINE: u8 = 0x40;
    pub const SEG_REMAP_NORMAL: u8 = 0xA0;
    pub const SEG_REMAP_FLIP: u8 = 0xA1;
    pub const RESUME_TO_RAM: u8 = 0xA4;
    pub const NORMAL_DISPLAY: u8 = 0xA6;
    pub const INVERT_DISPLAY: u8 = 0xA7;
    pub const MULTIPLEX: u8 = 0xA8;
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const COM_SCAN_INC: u8 = 0xC0;
    pub const COM_SCAN_DEC: u8 = 0xC8;
    pub const DISPLAY_OFFSET: u8 = 0xD3;
    pub const CLOCK_DIV: u8 = 0xD5;
    pub const PRECHARGE: u8 = 0xD9;
    pub const COM_PINS: u8 = 0xDA;
    pub const VCOM_DESELECT: u8 = 0xDB;
}

/// One controller command: an opcode and an optional parameter byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Command {
    pub opcode: u8,
    pub parameter: Option<u8>,
}

impl Command {
    pub const fn new(opcode: u8) -> Self {
        Self {
            opcode,
            parameter: None,
        }
    }

    pub const fn with_param(opcode: u8, parameter: u8) -> Self {
        Self {
            opcode,
            parameter: Some(parameter),
        }
    }

    /// Wire bytes, without any bus framing.
    pub fn encode(&self) -> Vec<u8, 2> {
        let mut out = Vec::new();
        // Capacity 2 always fits opcode + parameter.
        let _ = out.push(self.opcode);
        if let Some(p) = self.parameter {
            let _ = out.push(p);
        }
        out
    }
}

/// Segment remap and COM scan commands for `orientation`.
pub fn orientation_commands(orientation: Orientation) -> [Command; 2] {
    match orientation {
        Orientation::Standard => [
            Command::new(opcode::SEG_REMAP_FLIP),
            Command::new(opcode::COM_SCAN_DEC),
        ],
        Orientation::Rotated180 => [
            Command::new(opcode::SEG_REMAP_NORMAL),
            Command::new(opcode::COM_SCAN_INC),
        ],
    }
}

pub fn inversion_command(inverted: bool) -> Command {
    if inverted {
        Command::new(opcode::INVERT_DISPLAY)
    } else {
        Command::new(opcode::NORMAL_DISPLAY)
    }
}

/// Column and page window covering the whole panel. Sent before each frame
/// so the RAM pointer starts at (0, 0) even after an aborted transfer.
pub fn full_window<P: PanelSize>() -> [[u8; 3]; 2] {
    [
        [opcode::COLUMN_ADDRESS, 0, (P::WIDTH - 1) as u8],
        [opcode::PAGE_ADDRESS, 0, (P::PAGES - 1) as u8],
    ]
}

/// Everything sent during bring-up before the settle delay and `AF`.
///
/// Display off, clock / multiplex / offset, power setup, horizontal
/// addressing, orientation, COM pins, contrast, precharge, VCOMH, scroll
/// off, resume from RAM, normal or inverted.
pub fn init_sequence<P: PanelSize>(config: &DisplayConfig) -> Vec<Command, 20> {
    let (clock, power, precharge, vcomh) = match config.controller {
        Controller::Ssd1309 => (
            0xA0,
            Command::with_param(opcode::MASTER_CONFIG, 0x8E),
            0xF1,
            0x30,
        ),
        Controller::Ssd1306 => (
            0xF0,
            Command::with_param(opcode::CHARGE_PUMP, 0x14),
            0x22,
            0x20,
        ),
    };
    // The multiplex ratio tops out at 64 rows.
    let multiplex = (P::HEIGHT.min(64) - 1) as u8;
    let [seg_remap, com_scan] = orientation_commands(config.orientation);

    let sequence = [
        Command::new(opcode::DISPLAY_OFF),
        Command::with_param(opcode::CLOCK_DIV, clock),
        Command::with_param(opcode::MULTIPLEX, multiplex),
        Command::with_param(opcode::DISPLAY_OFFSET, 0x00),
        Command::new(opcode::START_LINE),
        power,
        Command::with_param(opcode::MEMORY_MODE, 0x00),
        seg_remap,
        com_scan,
        Command::with_param(opcode::COM_PINS, P::COM_PINS),
        Command::with_param(opcode::SET_CONTRAST, config.contrast),
        Command::with_param(opcode::PRECHARGE, precharge),
        Command::with_param(opcode::VCOM_DESELECT, vcomh),
        Command::new(opcode::DEACTIVATE_SCROLL),
        Command::new(opcode::RESUME_TO_RAM),
        inversion_command(config.inverted),
    ];

    let mut out = Vec::new();
    for cmd in sequence {
        // 16 commands into a capacity of 20.
        let _ = out.push(cmd);
    }
    out
}
