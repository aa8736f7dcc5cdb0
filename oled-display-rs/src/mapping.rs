//! Row-to-page mapping strategies.
//!
//! The controller's COM scan configuration decides which RAM page and bit a
//! panel row lands in. With sequential COM pins a row `y` lives in page
//! `y / 8`, bit `y % 8`. With the alternative COM pin configuration used by
//! some SSD1309 modules (datasheet modes 5 and 8) even and odd rows are
//! split across the two halves of the page range:
//!
//! ```text
//! InterleavedEvenFirst, 64 rows
//! page 0 (COM 0-7)   == rows  0  2  4 .. 14
//! page 1 (COM 8-15)  == rows 16 18 20 .. 30
//! page 2 (COM 16-23) == rows 32 34 36 .. 46
//! page 3 (COM 24-31) == rows 48 50 52 .. 62
//! page 4 (COM 32-39) == rows  1  3  5 .. 15
//! ...
//! page 7 (COM 56-63) == rows 49 51 53 .. 63
//! ```
//!
//! [`RowMapping::InterleavedOddFirst`] is the same layout with the halves
//! swapped. The strategy is picked once, when the framebuffer is created.

/// How a logical row maps onto a RAM page and bit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RowMapping {
    /// `page = y / 8`, `bit = y % 8`.
    #[default]
    Sequential,
    /// Even rows fill the first half of the pages, odd rows the second.
    InterleavedEvenFirst,
    /// Odd rows fill the first half of the pages, even rows the second.
    InterleavedOddFirst,
}

/// Location of one pixel inside a framebuffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelAddress {
    /// Byte offset into the flat buffer.
    pub index: usize,
    /// Single-bit mask within that byte.
    pub mask: u8,
}

impl RowMapping {
    /// Translate an in-bounds `(x, y)` into a byte index and bit mask.
    ///
    /// `width` is the bytes per page and `pages` the page count of the panel.
    /// Callers bounds-check before translating.
    pub fn locate(self, x: u32, y: u32, width: u32, pages: u32) -> PixelAddress {
        let (page, bit) = match self {
            RowMapping::Sequential => (y / 8, y % 8),
            RowMapping::InterleavedEvenFirst => {
                let half = if y % 2 == 0 { 0 } else { pages / 2 };
                (half + (y / 2) / 8, (y / 2) % 8)
            }
            RowMapping::InterleavedOddFirst => {
                let half = if y % 2 == 1 { 0 } else { pages / 2 };
                (half + (y / 2) / 8, (y / 2) % 8)
            }
        };

        PixelAddress {
            index: (page * width + x) as usize,
            mask: 1 << bit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_matches_page_layout() {
        let a = RowMapping::Sequential.locate(5, 0, 128, 8);
        assert_eq!(a, PixelAddress { index: 5, mask: 0x01 });

        let b = RowMapping::Sequential.locate(5, 13, 128, 8);
        assert_eq!(b, PixelAddress { index: 128 + 5, mask: 0x20 });

        let c = RowMapping::Sequential.locate(127, 63, 128, 8);
        assert_eq!(c, PixelAddress { index: 1023, mask: 0x80 });
    }

    #[test]
    fn interleaved_even_first_splits_rows() {
        let m = RowMapping::InterleavedEvenFirst;
        // Row 0 -> page 0 bit 0, row 1 -> page 4 bit 0.
        assert_eq!(m.locate(0, 0, 128, 8), PixelAddress { index: 0, mask: 0x01 });
        assert_eq!(m.locate(0, 1, 128, 8), PixelAddress { index: 512, mask: 0x01 });
        // Row 14 -> page 0 bit 7, row 16 -> page 1 bit 0.
        assert_eq!(m.locate(3, 14, 128, 8), PixelAddress { index: 3, mask: 0x80 });
        assert_eq!(m.locate(3, 16, 128, 8), PixelAddress { index: 128 + 3, mask: 0x01 });
        // Row 63 -> page 7 bit 7.
        assert_eq!(m.locate(0, 63, 128, 8), PixelAddress { index: 896, mask: 0x80 });
    }

    #[test]
    fn interleaved_odd_first_swaps_halves() {
        let m = RowMapping::InterleavedOddFirst;
        assert_eq!(m.locate(0, 1, 128, 8), PixelAddress { index: 0, mask: 0x01 });
        assert_eq!(m.locate(0, 0, 128, 8), PixelAddress { index: 512, mask: 0x01 });
    }

    #[test]
    fn every_mapping_is_a_bijection() {
        for mapping in [
            RowMapping::Sequential,
            RowMapping::InterleavedEvenFirst,
            RowMapping::InterleavedOddFirst,
        ] {
            let mut seen = [0u8; 4 * 128];
            for y in 0..32 {
                for x in 0..128 {
                    let a = mapping.locate(x, y, 128, 4);
                    assert_eq!(seen[a.index] & a.mask, 0, "{:?} collides at ({}, {})", mapping, x, y);
                    seen[a.index] |= a.mask;
                }
            }
            assert!(seen.iter().all(|&b| b == 0xFF));
        }
    }
}
