//! Compile-time panel geometry.
//!
//! Each supported panel is a zero-sized marker type implementing the sealed
//! [`PanelSize`] trait. The framebuffer storage type is derived from it, so
//! a panel with an unsupported height cannot be named, let alone built.

mod sealed {
    pub trait Sealed {}
}

/// Geometry of an SSD1306/SSD1309 panel.
///
/// The controller RAM is organised in pages: horizontal strips eight rows
/// tall, one byte per column. A `W×H` panel therefore needs `W·H/8` bytes.
pub trait PanelSize: sealed::Sealed {
    /// Width in pixels (columns).
    const WIDTH: u32;
    /// Height in pixels (rows). One of 32, 64 or 128.
    const HEIGHT: u32;
    /// Number of 8-row pages.
    const PAGES: usize = (Self::HEIGHT / 8) as usize;
    /// Bytes per page (one per column).
    const PAGE_BYTES: usize = Self::WIDTH as usize;
    /// Total RAM bytes.
    const BUFFER_SIZE: usize = Self::PAGES * Self::PAGE_BYTES;
    /// Parameter for the COM pins hardware configuration command (`0xDA`).
    const COM_PINS: u8;

    /// Backing storage for one framebuffer.
    type Buffer: AsRef<[u8]> + AsMut<[u8]>;

    /// A buffer with every pixel off.
    fn zeroed() -> Self::Buffer;
}

macro_rules! panel {
    ($(#[$meta:meta])* $name:ident, $width:literal x $height:literal, com_pins = $com:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
        pub struct $name;

        const _: () = assert!(
            $height == 32 || $height == 64 || $height == 128,
            "only 32, 64 or 128 rows are supported"
        );

        impl sealed::Sealed for $name {}

        impl PanelSize for $name {
            const WIDTH: u32 = $width;
            const HEIGHT: u32 = $height;
            const COM_PINS: u8 = $com;

            type Buffer = [u8; $width * $height / 8];

            fn zeroed() -> Self::Buffer {
                [0; $width * $height / 8]
            }
        }
    };
}

panel!(
    /// 128×32 panel (4 pages, sequential COM pins).
    Panel128x32, 128 x 32, com_pins = 0x02
);
panel!(
    /// 128×64 panel (8 pages). The common SSD1306 / SSD1309 module.
    Panel128x64, 128 x 64, com_pins = 0x12
);
panel!(
    /// 128×128 panel (16 pages).
    Panel128x128, 128 x 128, com_pins = 0x12
);
