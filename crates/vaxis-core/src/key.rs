//! Key identity: modifier bit sets and the named-key codepoint space.
//!
//! `Key.codepoint` is a plain `u32` that is either a real Unicode scalar
//! value (a literal character the user typed) or one of the named-key
//! constants below. Two disjoint ranges of named codepoints exist:
//!
//! - The kitty protocol's own private-use-area assignments (`0xE000`
//!   upward, spilling into supplementary private-use planes), used
//!   verbatim when a terminal sends them via `CSI u`.
//! - A second "legacy" range starting one past the maximum valid Unicode
//!   scalar value (`0x11_0000`), used for keys this parser synthesizes
//!   itself from SS3 and legacy CSI sequences (arrows, `Home`/`End`,
//!   `F1`-`F12`) when the terminal is not using kitty protocol. Keeping
//!   these outside valid Unicode means they can never collide with a
//!   decoded UTF-8 character.

use bitflags::bitflags;

bitflags! {
    /// Modifier keys held during a key or mouse event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Modifiers: u16 {
        const SHIFT     = 1 << 0;
        const ALT       = 1 << 1;
        const CTRL      = 1 << 2;
        const SUPER     = 1 << 3;
        const HYPER     = 1 << 4;
        const META      = 1 << 5;
        const CAPS_LOCK = 1 << 6;
        const NUM_LOCK  = 1 << 7;
    }
}

/// Named-key codepoint constants.
pub mod keycode {
    /// One past the maximum valid Unicode scalar value; the base of the
    /// legacy named-key range.
    pub const LEGACY_BASE: u32 = 0x0011_0000;

    /// A grapheme cluster requiring more than one codepoint to represent;
    /// `Key.text` carries the cluster's bytes when this is the codepoint.
    pub const MULTICODEPOINT: u32 = LEGACY_BASE + 1;

    /// `ESC` pressed alone.
    pub const ESCAPE: u32 = LEGACY_BASE + 2;
    pub const ENTER: u32 = LEGACY_BASE + 3;
    pub const TAB: u32 = LEGACY_BASE + 4;
    pub const BACKSPACE: u32 = LEGACY_BASE + 5;
    pub const UP: u32 = LEGACY_BASE + 6;
    pub const DOWN: u32 = LEGACY_BASE + 7;
    pub const RIGHT: u32 = LEGACY_BASE + 8;
    pub const LEFT: u32 = LEGACY_BASE + 9;
    pub const HOME: u32 = LEGACY_BASE + 10;
    pub const END: u32 = LEGACY_BASE + 11;
    pub const INSERT: u32 = LEGACY_BASE + 12;
    pub const DELETE: u32 = LEGACY_BASE + 13;
    pub const PAGE_UP: u32 = LEGACY_BASE + 14;
    pub const PAGE_DOWN: u32 = LEGACY_BASE + 15;
    pub const KP_BEGIN: u32 = LEGACY_BASE + 16;
    pub const F1: u32 = LEGACY_BASE + 17;
    pub const F2: u32 = F1 + 1;
    pub const F3: u32 = F1 + 2;
    pub const F4: u32 = F1 + 3;
    pub const F5: u32 = F1 + 4;
    pub const F6: u32 = F1 + 5;
    pub const F7: u32 = F1 + 6;
    pub const F8: u32 = F1 + 7;
    pub const F9: u32 = F1 + 8;
    pub const F10: u32 = F1 + 9;
    pub const F11: u32 = F1 + 10;
    pub const F12: u32 = F1 + 11;

    /// `F(n)` for `1 <= n <= 12`; panics (debug) / saturates (release)
    /// outside that range, mirroring the bounded table the protocol
    /// actually defines.
    #[must_use]
    pub const fn function_key(n: u8) -> u32 {
        debug_assert!(n >= 1 && n <= 12);
        F1 + (n as u32 - 1)
    }
}

/// A convenience alias; `Key` itself (with borrowed `text`) lives in
/// [`crate::event`] alongside `Mouse` and `Event` so its lifetime
/// parameter is declared in one place.
pub type KeyCode = u32;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_range_is_outside_unicode() {
        assert!(keycode::LEGACY_BASE > char::MAX as u32);
    }

    #[test]
    fn function_keys_sequential() {
        assert_eq!(keycode::function_key(1), keycode::F1);
        assert_eq!(keycode::function_key(12), keycode::F12);
    }

    #[test]
    fn modifiers_bitor_compose() {
        let m = Modifiers::SHIFT | Modifiers::ALT;
        assert!(m.contains(Modifiers::SHIFT));
        assert!(m.contains(Modifiers::ALT));
        assert!(!m.contains(Modifiers::CTRL));
    }
}
