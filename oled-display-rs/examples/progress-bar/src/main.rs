//! Progress bar demo
//!
//! Standalone hardware check for [`OledDriver`] on an SSD1309 128×64 I2C
//! module. Renders 4 horizontal progress bars and a value dial,
//! cycling the values so every drawing path and the sync gating run on
//! real hardware.
//!
//! # Wiring
//!
//! | Signal    | Pico 2 Pin | Notes           |
//! |-----------|------------|-----------------|
//! | I2C0 SDA  | GP20       |                 |
//! | I2C0 SCL  | GP21       |                 |
//! | OLED VCC  | 3V3        |                 |
//! | OLED GND  | GND        |                 |
//!
//! # Layout
//!
//! | Element      | Geometry                                         |
//! |--------------|--------------------------------------------------|
//! | Bars         | x 0..=95, row `i * 16`, 14 px high, outlined     |
//! | Bar fill     | `value * 94 / 127` px                            |
//! | Dial         | centre (112, 32), radius 14, 270° sweep          |

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp as hal;
use embassy_rp::block::ImageDef;
use embassy_rp::i2c::{self, I2c};
use embassy_time::{Delay, Duration, Ticker};
use {defmt_rtt as _, panic_probe as _};

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::Point;

use oled_display_rs::interface::{I2cAddress, I2cInterface, NoResetBoard};
use oled_display_rs::{ArcStyle, DisplayConfig, OledDriver, Panel128x64, SyncStart};

/// Tell the Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = hal::block::ImageDef::secure_exe();

const BAR_WIDTH: i32 = 96;
const DIAL_CENTER: Point = Point::new(112, 32);

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("Progress bar demo starting");

    // Blocking I2C: every chunk completes before `update_screen` returns.
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_21, p.PIN_20, i2c::Config::default());
    let bus = I2cInterface::new(i2c, I2cAddress::DEFAULT);

    let config = DisplayConfig::default();
    let mut oled: OledDriver<_, _, Panel128x64> =
        OledDriver::new(bus, NoResetBoard::new(Delay), config);

    oled.init().expect("OLED init failed");
    info!("OLED initialised");

    let dial = ArcStyle {
        thickness: 3,
        ..ArcStyle::default()
    };

    // Bar values 0–127, offset so bars are visually distinct.
    let mut values: [i32; 4] = [0, 32, 64, 96];
    let mut ticker = Ticker::every(Duration::from_millis(config.update_period_ms()));

    loop {
        oled.clear();

        for (i, &v) in values.iter().enumerate() {
            let top = i as i32 * 16;
            let fill = v * (BAR_WIDTH - 2) / 127;
            oled.draw_rectangle(
                Point::new(0, top),
                Point::new(BAR_WIDTH - 1, top + 13),
                BinaryColor::On,
            );
            if fill > 0 {
                oled.fill_rectangle(
                    Point::new(1, top + 1),
                    Point::new(fill, top + 12),
                    BinaryColor::On,
                );
            }
        }

        let sweep = (values[0] * 270 / 127) as u16;
        oled.draw_arc(DIAL_CENTER, 14, 225, sweep, &dial, BinaryColor::On);

        match oled.update_screen() {
            Ok(SyncStart::Completed(outcome)) if !outcome.is_success() => {
                warn!("frame failed: {}", outcome)
            }
            Ok(_) => {}
            Err(e) => error!("sync failed: {}", e),
        }

        // Increment all bars, wrapping at 127.
        for v in values.iter_mut() {
            *v = (*v + 1) % 128;
        }

        ticker.next().await;
    }
}
