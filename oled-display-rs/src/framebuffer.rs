//! Bit-packed framebuffer matching the controller's GDDRAM layout.
//!
//! [`Framebuffer`] is a flat byte array of `W·H/8` bytes accessed through
//! index-computing helpers. Pixel translation goes through the
//! [`RowMapping`] chosen at construction; bulk fills bypass it.

use core::marker::PhantomData;

use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Size},
    pixelcolor::BinaryColor,
    Pixel,
};

use crate::error::OledError;
use crate::graphics::Canvas;
use crate::mapping::{PixelAddress, RowMapping};
use crate::panel::PanelSize;

/// One frame of 1-bit pixels for panel `P`.
pub struct Framebuffer<P: PanelSize> {
    buffer: P::Buffer,
    mapping: RowMapping,
    _panel: PhantomData<P>,
}

impl<P: PanelSize> Framebuffer<P> {
    /// Create a blank (all black) framebuffer using `mapping` for pixel
    /// translation.
    pub fn new(mapping: RowMapping) -> Self {
        Self {
            buffer: P::zeroed(),
            mapping,
            _panel: PhantomData,
        }
    }

    /// The row mapping selected at construction.
    pub fn mapping(&self) -> RowMapping {
        self.mapping
    }

    /// Raw buffer contents, in the order they are streamed to the controller.
    pub fn as_bytes(&self) -> &[u8] {
        self.buffer.as_ref()
    }

    /// Translate a coordinate, or `None` when it falls outside the panel.
    fn address(&self, x: i32, y: i32) -> Option<PixelAddress> {
        if x < 0 || y < 0 || x as u32 >= P::WIDTH || y as u32 >= P::HEIGHT {
            return None;
        }
        Some(
            self.mapping
                .locate(x as u32, y as u32, P::WIDTH, P::PAGES as u32),
        )
    }

    /// Set or clear one pixel. Coordinates outside the panel are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: BinaryColor) {
        let Some(addr) = self.address(x, y) else {
            // Never write outside the buffer.
            return;
        };
        let byte = &mut self.buffer.as_mut()[addr.index];
        match color {
            BinaryColor::On => *byte |= addr.mask,
            BinaryColor::Off => *byte &= !addr.mask,
        }
    }

    /// Read one pixel back. Returns `None` outside the panel.
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<BinaryColor> {
        let addr = self.address(x, y)?;
        if self.buffer.as_ref()[addr.index] & addr.mask != 0 {
            Some(BinaryColor::On)
        } else {
            Some(BinaryColor::Off)
        }
    }

    /// Set every pixel to `color`.
    pub fn fill(&mut self, color: BinaryColor) {
        let value = match color {
            BinaryColor::On => 0xFF,
            BinaryColor::Off => 0x00,
        };
        self.buffer.as_mut().fill(value);
    }

    /// Invert every pixel of the inclusive rectangle `(x1, y1)..=(x2, y2)`.
    ///
    /// # Errors
    ///
    /// * [`OledError::InvalidRegion`] if `x1 > x2` or `y1 > y2`.
    /// * [`OledError::OutOfBounds`] if any corner lies outside the panel.
    ///
    /// Nothing is written when an error is returned.
    pub fn invert_region(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) -> Result<(), OledError> {
        if x1 > x2 || y1 > y2 {
            return Err(OledError::InvalidRegion);
        }
        if x1 < 0 || y1 < 0 || x2 as u32 >= P::WIDTH || y2 as u32 >= P::HEIGHT {
            return Err(OledError::OutOfBounds);
        }

        if self.mapping != RowMapping::Sequential {
            // Interleaved rows do not share page masks; go pixel by pixel.
            for y in y1..=y2 {
                for x in x1..=x2 {
                    if let Some(addr) = self.address(x, y) {
                        self.buffer.as_mut()[addr.index] ^= addr.mask;
                    }
                }
            }
            return Ok(());
        }

        let (x1, y1, x2, y2) = (x1 as usize, y1 as usize, x2 as usize, y2 as usize);
        let width = P::PAGE_BYTES;
        let first_page = y1 / 8;
        let last_page = y2 / 8;
        let top_mask = 0xFFu8 << (y1 % 8);
        let bottom_mask = 0xFFu8 >> (7 - y2 % 8);
        let buf = self.buffer.as_mut();

        if first_page == last_page {
            let mask = top_mask & bottom_mask;
            for byte in &mut buf[first_page * width + x1..=first_page * width + x2] {
                *byte ^= mask;
            }
        } else {
            for x in x1..=x2 {
                buf[first_page * width + x] ^= top_mask;
                for page in first_page + 1..last_page {
                    buf[page * width + x] ^= 0xFF;
                }
                buf[last_page * width + x] ^= bottom_mask;
            }
        }

        Ok(())
    }

    /// Replace the start of the buffer with `data`.
    ///
    /// `data` is copied verbatim, in controller RAM order. Bytes beyond
    /// `data.len()` keep their previous contents.
    ///
    /// # Errors
    ///
    /// Returns [`OledError::BufferTooLarge`] (and copies nothing) if `data`
    /// is longer than the buffer.
    pub fn load(&mut self, data: &[u8]) -> Result<(), OledError> {
        let buf = self.buffer.as_mut();
        if data.len() > buf.len() {
            return Err(OledError::BufferTooLarge {
                len: data.len(),
                capacity: buf.len(),
            });
        }
        buf[..data.len()].copy_from_slice(data);
        Ok(())
    }

    /// Overwrite this buffer with the contents of `other`.
    pub(crate) fn copy_from(&mut self, other: &Self) {
        self.buffer.as_mut().copy_from_slice(other.buffer.as_ref());
    }
}

impl<P: PanelSize> Canvas for Framebuffer<P> {
    fn set_pixel(&mut self, x: i32, y: i32, color: BinaryColor) {
        Framebuffer::set_pixel(self, x, y, color);
    }

    fn bounds(&self) -> Size {
        Size::new(P::WIDTH, P::HEIGHT)
    }
}

impl<P: PanelSize> OriginDimensions for Framebuffer<P> {
    fn size(&self) -> Size {
        Size::new(P::WIDTH, P::HEIGHT)
    }
}

impl<P: PanelSize> DrawTarget for Framebuffer<P> {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point.x, point.y, color);
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::{Panel128x32, Panel128x64};
    use embedded_graphics::{
        prelude::*,
        primitives::{PrimitiveStyle, Rectangle},
    };

    type Fb = Framebuffer<Panel128x64>;

    #[test]
    fn pixel_round_trip_every_coordinate() {
        let mut fb = Fb::new(RowMapping::Sequential);
        for y in 0..64 {
            for x in 0..128 {
                fb.set_pixel(x, y, BinaryColor::On);
                assert_eq!(fb.get_pixel(x, y), Some(BinaryColor::On));
                fb.set_pixel(x, y, BinaryColor::Off);
                assert_eq!(fb.get_pixel(x, y), Some(BinaryColor::Off));
            }
        }
        assert!(fb.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn pixel_round_trip_interleaved() {
        let mut fb = Fb::new(RowMapping::InterleavedEvenFirst);
        fb.set_pixel(7, 33, BinaryColor::On);
        assert_eq!(fb.get_pixel(7, 33), Some(BinaryColor::On));
        assert_eq!(fb.get_pixel(7, 32), Some(BinaryColor::Off));
        // Row 33 is odd: second half of the pages, (33 / 2) = 16 -> page 4 + 2, bit 0.
        assert_eq!(fb.as_bytes()[6 * 128 + 7], 0x01);
    }

    #[test]
    fn out_of_bounds_pixels_are_ignored() {
        let mut fb = Fb::new(RowMapping::Sequential);
        fb.set_pixel(128, 0, BinaryColor::On);
        fb.set_pixel(0, 64, BinaryColor::On);
        fb.set_pixel(-1, 5, BinaryColor::On);
        fb.set_pixel(5, -1, BinaryColor::On);
        assert!(fb.as_bytes().iter().all(|&b| b == 0));
        assert_eq!(fb.get_pixel(128, 0), None);
        assert_eq!(fb.get_pixel(-1, 0), None);
    }

    #[test]
    fn fill_sets_every_byte() {
        let mut fb = Fb::new(RowMapping::Sequential);
        fb.fill(BinaryColor::On);
        assert!(fb.as_bytes().iter().all(|&b| b == 0xFF));
        fb.fill(BinaryColor::Off);
        assert!(fb.as_bytes().iter().all(|&b| b == 0x00));
    }

    #[test]
    fn invert_within_one_page_uses_combined_mask() {
        let mut fb = Fb::new(RowMapping::Sequential);
        fb.invert_region(2, 9, 4, 12).unwrap();
        // Rows 9..=12 are bits 1..=4 of page 1.
        for x in 2..=4 {
            assert_eq!(fb.as_bytes()[128 + x], 0b0001_1110);
        }
        assert_eq!(fb.as_bytes()[128 + 1], 0);
        assert_eq!(fb.as_bytes()[128 + 5], 0);
    }

    #[test]
    fn invert_across_pages_splits_masks() {
        let mut fb = Fb::new(RowMapping::Sequential);
        fb.invert_region(0, 5, 0, 26).unwrap();
        let b = fb.as_bytes();
        assert_eq!(b[0], 0b1110_0000); // rows 5..=7
        assert_eq!(b[128], 0xFF); // rows 8..=15
        assert_eq!(b[256], 0xFF); // rows 16..=23
        assert_eq!(b[384], 0b0000_0111); // rows 24..=26
        assert_eq!(b[512], 0);
        for y in 0..64 {
            let expected = if (5..=26).contains(&y) {
                BinaryColor::On
            } else {
                BinaryColor::Off
            };
            assert_eq!(fb.get_pixel(0, y), Some(expected));
        }
    }

    #[test]
    fn invert_twice_restores_buffer() {
        let mut fb = Fb::new(RowMapping::Sequential);
        for i in 0..64 {
            fb.set_pixel(i * 2, i, BinaryColor::On);
        }
        let mut before = [0u8; 1024];
        before.copy_from_slice(fb.as_bytes());

        for &(x1, y1, x2, y2) in &[(0, 0, 127, 63), (3, 3, 3, 3), (10, 7, 90, 8), (5, 1, 6, 60)] {
            fb.invert_region(x1, y1, x2, y2).unwrap();
            fb.invert_region(x1, y1, x2, y2).unwrap();
            assert_eq!(fb.as_bytes(), &before[..]);
        }
    }

    #[test]
    fn invert_twice_restores_interleaved_buffer() {
        let mut fb = Framebuffer::<Panel128x32>::new(RowMapping::InterleavedOddFirst);
        fb.set_pixel(1, 1, BinaryColor::On);
        let mut before = [0u8; 512];
        before.copy_from_slice(fb.as_bytes());

        fb.invert_region(0, 0, 9, 20).unwrap();
        assert_eq!(fb.get_pixel(1, 1), Some(BinaryColor::Off));
        assert_eq!(fb.get_pixel(9, 20), Some(BinaryColor::On));
        fb.invert_region(0, 0, 9, 20).unwrap();
        assert_eq!(fb.as_bytes(), &before[..]);
    }

    #[test]
    fn invert_rejects_bad_regions_without_writing() {
        let mut fb = Fb::new(RowMapping::Sequential);
        assert!(matches!(fb.invert_region(5, 0, 4, 0), Err(OledError::InvalidRegion)));
        assert!(matches!(fb.invert_region(0, 5, 0, 4), Err(OledError::InvalidRegion)));
        assert!(matches!(fb.invert_region(0, 0, 128, 10), Err(OledError::OutOfBounds)));
        assert!(matches!(fb.invert_region(0, 0, 10, 64), Err(OledError::OutOfBounds)));
        assert!(matches!(fb.invert_region(-1, 0, 10, 10), Err(OledError::OutOfBounds)));
        assert!(fb.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn load_copies_prefix_and_rejects_oversize() {
        let mut fb = Fb::new(RowMapping::Sequential);
        fb.load(&[0xAA, 0x55]).unwrap();
        assert_eq!(&fb.as_bytes()[..3], &[0xAA, 0x55, 0x00]);

        let big = [0u8; 1025];
        let err = fb.load(&big).unwrap_err();
        assert!(matches!(err, OledError::BufferTooLarge { len: 1025, capacity: 1024 }));
        assert_eq!(fb.as_bytes()[0], 0xAA);
    }

    #[test]
    fn draw_target_renders_embedded_graphics_primitives() {
        let mut fb = Fb::new(RowMapping::Sequential);
        Rectangle::new(Point::new(1, 1), Size::new(3, 2))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut fb)
            .unwrap();
        assert_eq!(fb.get_pixel(1, 1), Some(BinaryColor::On));
        assert_eq!(fb.get_pixel(3, 2), Some(BinaryColor::On));
        assert_eq!(fb.get_pixel(4, 2), Some(BinaryColor::Off));
        assert_eq!(fb.get_pixel(1, 3), Some(BinaryColor::Off));
        assert_eq!(fb.size(), Size::new(128, 64));
    }
}
