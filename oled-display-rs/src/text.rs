//! Bitmap font rendering with a text cursor.
//!
//! Glyphs cover printable ASCII (`' '..='~'`). Each glyph row is one `u16`
//! word, MSB first, so fonts up to 16 pixels wide are supported. Glyph
//! cells are opaque: clear bits are painted in the inverse color.

use embedded_graphics::pixelcolor::BinaryColor;

use crate::graphics::Canvas;

const FIRST_CHAR: char = ' ';
const LAST_CHAR: char = '~';

/// A fixed-height bitmap font.
#[derive(Clone, Copy, Debug)]
pub struct Font {
    /// Cell width in pixels (max 16).
    pub width: u8,
    /// Cell height in pixels.
    pub height: u8,
    /// `height` row words per glyph, glyphs in ASCII order from `' '`.
    pub data: &'static [u16],
    /// Optional per-glyph advance widths, same order as `data`.
    pub widths: Option<&'static [u8]>,
}

impl Font {
    pub const fn new(width: u8, height: u8, data: &'static [u16]) -> Self {
        Self {
            width,
            height,
            data,
            widths: None,
        }
    }

    /// Attach a proportional width table.
    pub const fn with_widths(mut self, widths: &'static [u8]) -> Self {
        self.widths = Some(widths);
        self
    }

    /// Row words of `ch`, or `None` if the glyph is missing from the table.
    fn glyph(&self, ch: char) -> Option<&'static [u16]> {
        let index = (ch as usize - FIRST_CHAR as usize) * self.height as usize;
        self.data.get(index..index + self.height as usize)
    }

    /// Horizontal advance for `ch`.
    fn advance(&self, ch: char) -> u8 {
        let index = ch as usize - FIRST_CHAR as usize;
        self.widths
            .and_then(|w| w.get(index).copied())
            .unwrap_or(self.width)
    }
}

/// Text insertion point, top-left corner of the next glyph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cursor {
    pub x: u32,
    pub y: u32,
}

/// Draw `ch` at the cursor and advance it.
///
/// # Errors
///
/// Returns `Err(ch)` without drawing or moving the cursor if `ch` is not
/// printable ASCII, is missing from the font, or would not fit on the canvas.
pub fn write_char<C: Canvas + ?Sized>(
    canvas: &mut C,
    cursor: &mut Cursor,
    ch: char,
    font: &Font,
    color: BinaryColor,
) -> Result<(), char> {
    if !(FIRST_CHAR..=LAST_CHAR).contains(&ch) {
        return Err(ch);
    }
    let rows = font.glyph(ch).ok_or(ch)?;
    let advance = font.advance(ch);

    let size = canvas.bounds();
    let fits = |start: u32, extent: u32, limit: u32| {
        start.checked_add(extent).is_some_and(|end| end <= limit)
    };
    if !fits(cursor.x, advance as u32, size.width) || !fits(cursor.y, font.height as u32, size.height)
    {
        return Err(ch);
    }

    let background = color.invert();
    for (i, &row) in rows.iter().enumerate() {
        for j in 0..advance.min(16) {
            let pixel = if (row << j) & 0x8000 != 0 {
                color
            } else {
                background
            };
            canvas.set_pixel(cursor.x as i32 + j as i32, cursor.y as i32 + i as i32, pixel);
        }
    }

    cursor.x += advance as u32;
    Ok(())
}

/// Draw `text` character by character.
///
/// # Errors
///
/// Stops at the first character [`write_char`] rejects and returns it.
/// Characters before it stay drawn.
pub fn write_string<C: Canvas + ?Sized>(
    canvas: &mut C,
    cursor: &mut Cursor,
    text: &str,
    font: &Font,
    color: BinaryColor,
) -> Result<(), char> {
    for ch in text.chars() {
        write_char(canvas, cursor, ch, font, color)?;
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::framebuffer::Framebuffer;
    use crate::mapping::RowMapping;
    use crate::panel::Panel128x64;

    /// 4×3 font covering `' '..='~'`: every glyph is blank except `'!'`
    /// (a left column bar) and `'#'` (a full block).
    pub(crate) static TINY_DATA: [u16; 95 * 3] = {
        let mut data = [0u16; 95 * 3];
        let bang = ('!' as usize - 32) * 3;
        data[bang] = 0x8000;
        data[bang + 1] = 0x8000;
        data[bang + 2] = 0x8000;
        let hash = ('#' as usize - 32) * 3;
        data[hash] = 0xF000;
        data[hash + 1] = 0xF000;
        data[hash + 2] = 0xF000;
        data
    };

    pub(crate) static TINY: Font = Font::new(4, 3, &TINY_DATA);

    static NARROW_WIDTHS: [u8; 95] = {
        let mut w = [4u8; 95];
        w[1] = 1; // '!'
        w
    };

    fn canvas() -> Framebuffer<Panel128x64> {
        Framebuffer::new(RowMapping::Sequential)
    }

    #[test]
    fn glyph_paints_foreground_and_background() {
        let mut fb = canvas();
        fb.fill(BinaryColor::On);
        let mut cursor = Cursor { x: 2, y: 1 };
        write_char(&mut fb, &mut cursor, '!', &TINY, BinaryColor::On).unwrap();

        for row in 1..4 {
            assert_eq!(fb.get_pixel(2, row), Some(BinaryColor::On));
            for col in 3..6 {
                assert_eq!(fb.get_pixel(col, row), Some(BinaryColor::Off));
            }
        }
        // Outside the cell is untouched.
        assert_eq!(fb.get_pixel(6, 1), Some(BinaryColor::On));
        assert_eq!(cursor, Cursor { x: 6, y: 1 });
    }

    #[test]
    fn rejects_non_printable_without_moving() {
        let mut fb = canvas();
        let mut cursor = Cursor::default();
        assert_eq!(write_char(&mut fb, &mut cursor, '\n', &TINY, BinaryColor::On), Err('\n'));
        assert_eq!(write_char(&mut fb, &mut cursor, '\u{7f}', &TINY, BinaryColor::On), Err('\u{7f}'));
        assert_eq!(write_char(&mut fb, &mut cursor, 'é', &TINY, BinaryColor::On), Err('é'));
        assert_eq!(cursor, Cursor::default());
    }

    #[test]
    fn rejects_glyph_that_would_overflow() {
        let mut fb = canvas();
        let mut cursor = Cursor { x: 125, y: 0 };
        assert_eq!(write_char(&mut fb, &mut cursor, '#', &TINY, BinaryColor::On), Err('#'));
        assert!(fb.as_bytes().iter().all(|&b| b == 0));

        // Exactly fits in the last four columns.
        let mut cursor = Cursor { x: 124, y: 61 };
        write_char(&mut fb, &mut cursor, '#', &TINY, BinaryColor::On).unwrap();
        assert_eq!(fb.get_pixel(127, 63), Some(BinaryColor::On));
    }

    #[test]
    fn rejects_cursor_far_off_canvas() {
        let mut fb = canvas();
        let mut cursor = Cursor { x: u32::MAX - 1, y: 0 };
        assert_eq!(write_char(&mut fb, &mut cursor, '#', &TINY, BinaryColor::On), Err('#'));
        let mut cursor = Cursor { x: 0, y: u32::MAX };
        assert_eq!(write_char(&mut fb, &mut cursor, '#', &TINY, BinaryColor::On), Err('#'));
        assert_eq!(cursor, Cursor { x: 0, y: u32::MAX });
        assert!(fb.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn string_stops_at_first_failure() {
        let mut fb = canvas();
        let mut cursor = Cursor::default();
        assert_eq!(write_string(&mut fb, &mut cursor, "##", &TINY, BinaryColor::On), Ok(()));
        assert_eq!(cursor.x, 8);

        let mut cursor = Cursor::default();
        assert_eq!(
            write_string(&mut fb, &mut cursor, "#\t#", &TINY, BinaryColor::On),
            Err('\t')
        );
        assert_eq!(cursor.x, 4);
    }

    #[test]
    fn proportional_widths_advance_cursor() {
        let font = Font::new(4, 3, &TINY_DATA).with_widths(&NARROW_WIDTHS);
        let mut fb = canvas();
        let mut cursor = Cursor::default();
        write_string(&mut fb, &mut cursor, "!#", &font, BinaryColor::On).unwrap();
        assert_eq!(cursor.x, 5);
        assert_eq!(fb.get_pixel(0, 0), Some(BinaryColor::On));
        assert_eq!(fb.get_pixel(1, 0), Some(BinaryColor::On));
        assert_eq!(fb.get_pixel(4, 0), Some(BinaryColor::On));
        assert_eq!(fb.get_pixel(5, 0), Some(BinaryColor::Off));
    }
}
