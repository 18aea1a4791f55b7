//! The value types that make up a single grid position (§3 `Cell`).

use std::rc::Rc;

use vaxis_style::{Hyperlink, Style};

/// A clip rectangle in cell coordinates, used by [`ImagePlacement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

/// Vertical alignment of a scaled glyph within the cells it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VerticalAlign {
    #[default]
    Bottom,
    Top,
    Middle,
}

/// Integer and fractional scaling for a cell's glyph (kitty text-sizing).
///
/// `factor = 1, numer = 1, denom = 1` is the default and means no scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Scale {
    pub factor: u8,
    pub numer: u8,
    pub denom: u8,
    pub valign: VerticalAlign,
}

impl Default for Scale {
    fn default() -> Self {
        Self { factor: 1, numer: 1, denom: 1, valign: VerticalAlign::default() }
    }
}

impl Scale {
    #[must_use]
    pub const fn is_unscaled(&self) -> bool {
        self.factor == 1 && self.numer == 1 && self.denom == 1
    }
}

/// A placed image (kitty graphics), attached to the cell that anchors it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImagePlacement {
    pub image_id: u32,
    pub pixel_offset: Option<(u16, u16)>,
    pub clip: Option<Rect>,
    pub size: Option<(u16, u16)>,
    pub z_index: Option<i32>,
}

/// A grapheme cluster and its precomputed display width.
///
/// `width == 0` means "measure at render time"; the default character is a
/// single space of width 1. Cheap to clone: the grapheme bytes are shared
/// via `Rc`, matching the library's single-threaded cooperative model.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Character {
    pub grapheme: Rc<str>,
    pub width: u8,
}

impl Default for Character {
    fn default() -> Self {
        Self { grapheme: Rc::from(" "), width: 1 }
    }
}

impl Character {
    #[must_use]
    pub fn new(grapheme: impl AsRef<str>) -> Self {
        Self { grapheme: Rc::from(grapheme.as_ref()), width: 0 }
    }

    #[must_use]
    pub fn with_width(grapheme: impl AsRef<str>, width: u8) -> Self {
        Self { grapheme: Rc::from(grapheme.as_ref()), width }
    }
}

/// A single grid position: grapheme, style, optional hyperlink and image,
/// scale, and the two renderer bookkeeping flags.
///
/// A default `Cell` is a space in default style; `default` starts `true`
/// and is cleared the first time the cell is written with non-default
/// content, letting [`crate::renderer`] distinguish "never touched" from
/// "explicitly set to a space".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cell {
    pub character: Character,
    pub style: Style,
    pub hyperlink: Hyperlink,
    pub image: Option<ImagePlacement>,
    pub scale: Scale,
    pub default: bool,
    pub wrapped: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            character: Character::default(),
            style: Style::default(),
            hyperlink: Hyperlink::default(),
            image: None,
            scale: Scale::default(),
            default: true,
            wrapped: false,
        }
    }
}

impl Cell {
    #[must_use]
    pub fn from_char(ch: char) -> Self {
        Self { character: Character::new(ch.to_string()), default: false, ..Self::default() }
    }

    #[must_use]
    pub fn from_grapheme(grapheme: impl AsRef<str>) -> Self {
        Self { character: Character::new(grapheme), default: false, ..Self::default() }
    }

    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cell_is_a_space() {
        let c = Cell::default();
        assert_eq!(&*c.character.grapheme, " ");
        assert!(c.default);
    }

    #[test]
    fn from_char_clears_default_flag() {
        let c = Cell::from_char('x');
        assert!(!c.default);
        assert_eq!(&*c.character.grapheme, "x");
    }

    #[test]
    fn scale_default_is_unscaled() {
        assert!(Scale::default().is_unscaled());
        assert!(!Scale { factor: 2, ..Scale::default() }.is_unscaled());
    }
}
