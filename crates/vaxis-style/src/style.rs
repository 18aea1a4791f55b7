//! Cell style: colors, underline shape, and boolean attribute flags (§3 `Style`).
//!
//! Unlike a cascading stylesheet where `None` means "inherit", every field
//! here is a concrete value: two `Style`s are equal iff every field
//! matches, and a default `Style` is plain, uncolored text.

use bitflags::bitflags;

use crate::color::Color;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StyleFlags: u8 {
        const BOLD          = 1 << 0;
        const DIM            = 1 << 1;
        const ITALIC         = 1 << 2;
        const BLINK          = 1 << 3;
        const REVERSE        = 1 << 4;
        const INVISIBLE      = 1 << 5;
        const STRIKETHROUGH  = 1 << 6;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Underline {
    #[default]
    Off,
    Single,
    Double,
    Curly,
    Dotted,
    Dashed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Style {
    pub fg: Color,
    pub bg: Color,
    pub underline_color: Color,
    pub underline: Underline,
    pub flags: StyleFlags,
}

impl Style {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn fg(mut self, color: Color) -> Self {
        self.fg = color;
        self
    }

    #[must_use]
    pub const fn bg(mut self, color: Color) -> Self {
        self.bg = color;
        self
    }

    #[must_use]
    pub const fn underline(mut self, shape: Underline) -> Self {
        self.underline = shape;
        self
    }

    #[must_use]
    pub const fn underline_color(mut self, color: Color) -> Self {
        self.underline_color = color;
        self
    }

    #[must_use]
    pub fn bold(mut self) -> Self {
        self.flags |= StyleFlags::BOLD;
        self
    }

    #[must_use]
    pub fn dim(mut self) -> Self {
        self.flags |= StyleFlags::DIM;
        self
    }

    #[must_use]
    pub fn italic(mut self) -> Self {
        self.flags |= StyleFlags::ITALIC;
        self
    }

    #[must_use]
    pub fn blink(mut self) -> Self {
        self.flags |= StyleFlags::BLINK;
        self
    }

    #[must_use]
    pub fn reverse(mut self) -> Self {
        self.flags |= StyleFlags::REVERSE;
        self
    }

    #[must_use]
    pub fn invisible(mut self) -> Self {
        self.flags |= StyleFlags::INVISIBLE;
        self
    }

    #[must_use]
    pub fn strikethrough(mut self) -> Self {
        self.flags |= StyleFlags::STRIKETHROUGH;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_style_is_plain() {
        let s = Style::default();
        assert_eq!(s.fg, Color::Default);
        assert_eq!(s.underline, Underline::Off);
        assert!(s.flags.is_empty());
    }

    #[test]
    fn builder_composes_fields() {
        let s = Style::new().fg(Color::rgb(255, 0, 0)).bold().underline(Underline::Curly);
        assert_eq!(s.fg, Color::rgb(255, 0, 0));
        assert!(s.flags.contains(StyleFlags::BOLD));
        assert_eq!(s.underline, Underline::Curly);
    }

    #[test]
    fn equality_requires_every_field_to_match() {
        let a = Style::new().bold();
        let b = Style::new().bold().italic();
        assert_ne!(a, b);
        assert_eq!(a, Style::new().bold());
    }
}
