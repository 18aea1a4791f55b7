//! The typed event model the input parser produces.

use crate::key::Modifiers;
use bitflags::bitflags;

/// A single key press or release.
///
/// `text` is borrowed from the parser's internal grapheme ring and is
/// only valid for the duration of the call that produced it; an
/// application that needs to retain it must copy the bytes out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Key<'a> {
    pub codepoint: u32,
    pub text: Option<&'a str>,
    pub shifted_codepoint: Option<u32>,
    pub base_layout_codepoint: Option<u32>,
    pub mods: Modifiers,
}

impl<'a> Key<'a> {
    #[must_use]
    pub const fn new(codepoint: u32) -> Self {
        Self { codepoint, text: None, shifted_codepoint: None, base_layout_codepoint: None, mods: Modifiers::empty() }
    }

    #[must_use]
    pub const fn with_mods(mut self, mods: Modifiers) -> Self {
        self.mods = mods;
        self
    }

    #[must_use]
    pub const fn with_text(mut self, text: &'a str) -> Self {
        self.text = Some(text);
        self
    }
}

bitflags! {
    /// Modifiers reported on a mouse event (a narrower set than [`Modifiers`]).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct MouseMods: u8 {
        const SHIFT = 1 << 0;
        const ALT   = 1 << 1;
        const CTRL  = 1 << 2;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    None,
    Left,
    Middle,
    Right,
    WheelUp,
    WheelDown,
    WheelLeft,
    WheelRight,
    Button8,
    Button9,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEventKind {
    Press,
    Release,
    Drag,
    Motion,
}

/// An SGR mouse report, decoded (§4.4 `M`/`m` with private `<`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mouse {
    pub col: u16,
    pub row: u16,
    pub pixel_offset: Option<(u16, u16)>,
    pub button: MouseButton,
    pub mods: MouseMods,
    pub kind: MouseEventKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScheme {
    Light,
    Dark,
}

/// Which color slot an OSC 4/10/11/12 report describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorWhich {
    Palette(u8),
    Foreground,
    Background,
    Cursor,
}

/// An RGB triple parsed out of an `rgb:RRRR/GGGG/BBBB`-style OSC body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// An in-band resize report (`XTWINOPS` parameter 48).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Winsize {
    pub rows: u16,
    pub cols: u16,
    pub x_pixel: u16,
    pub y_pixel: u16,
}

/// The tagged union of everything the parser can produce.
#[derive(Debug, Clone, PartialEq)]
pub enum Event<'a> {
    KeyPress(Key<'a>),
    KeyRelease(Key<'a>),
    Mouse(Mouse),
    FocusIn,
    FocusOut,
    PasteStart,
    PasteEnd,
    /// Bracketed-paste or OSC 52 payload bytes; allocator-provided, so
    /// this variant owns its buffer rather than borrowing it.
    Paste(Vec<u8>),
    ColorReport { which: ColorWhich, color: RgbColor },
    ColorSchemeReport(ColorScheme),
    Winsize(Winsize),
    CapabilityKittyKeyboard,
    CapabilityKittyGraphics,
    CapabilityRgb,
    CapabilitySgrPixels,
    CapabilityUnicode,
    CapabilityColorSchemeUpdates,
    CapabilityDa1,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_builder() {
        let k = Key::new('a' as u32).with_mods(Modifiers::ALT);
        assert_eq!(k.codepoint, 'a' as u32);
        assert!(k.mods.contains(Modifiers::ALT));
        assert!(k.text.is_none());
    }
}
