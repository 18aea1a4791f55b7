//! Control-sequence building blocks the renderer and capability probe
//! emit (§6 "Control-sequence alphabet").
//!
//! Sequences that must match a terminal's expectations byte-for-byte are
//! built here once rather than inlined at each call site in
//! [`crate::renderer`].

use std::fmt::Write as _;

pub const ESC: &str = "\x1b";
pub const CSI: &str = "\x1b[";
pub const OSC: &str = "\x1b]";
pub const ST: &str = "\x1b\\";
pub const APC: &str = "\x1b_";

pub const SMCUP: &str = "\x1b[?1049h";
pub const RMCUP: &str = "\x1b[?1049l";
pub const SYNC_SET: &str = "\x1b[?2026h";
pub const SYNC_RESET: &str = "\x1b[?2026l";
pub const SGR_RESET: &str = "\x1b[0m";
pub const HIDE_CURSOR: &str = "\x1b[?25l";
pub const SHOW_CURSOR: &str = "\x1b[?25h";
pub const KITTY_KEYBOARD_POP: &str = "\x1b[<u";
pub const DA1_QUERY: &str = "\x1b[c";
pub const XTVERSION_QUERY: &str = "\x1b[>q";
pub const KITTY_GRAPHICS_QUERY: &str = "\x1b_Gi=1,a=q\x1b\\";
pub const IN_BAND_RESIZE_SET: &str = "\x1b[?2048h";
pub const ERASE_BELOW: &str = "\x1b[0J";

#[must_use]
pub fn cup(row: u16, col: u16) -> String {
    format!("\x1b[{};{}H", row + 1, col + 1)
}

#[must_use]
pub fn cuf(n: u16) -> String {
    if n == 0 {
        String::new()
    } else {
        format!("\x1b[{n}C")
    }
}

#[must_use]
pub fn ri(n: u16) -> String {
    "\x1bM".repeat(n as usize)
}

#[must_use]
pub fn kitty_keyboard_push(flags: u8) -> String {
    format!("\x1b[>{flags}u")
}

#[must_use]
pub fn osc8(params: &str, uri: &str) -> String {
    if uri.is_empty() {
        "\x1b]8;;\x1b\\".to_string()
    } else {
        format!("\x1b]8;{params};{uri}\x1b\\")
    }
}

#[must_use]
pub fn osc52_clipboard(base64_payload: &str) -> String {
    format!("\x1b]52;c;{base64_payload}\x1b\\")
}

#[must_use]
pub fn decrqm(mode: u32) -> String {
    format!("\x1b[?{mode}$p")
}

#[must_use]
pub fn explicit_width_probe(width: u16) -> String {
    // Home, echo `width` spaces under an explicit-width wrapper, then
    // request a cursor-position report; the column the terminal reports
    // back discloses whether it honored the explicit width.
    let mut s = String::new();
    let _ = write!(s, "\x1b[1;1H\x1b[{width}X\x1b[6n");
    s
}

#[must_use]
pub fn scaled_text_probe() -> String {
    "\x1b[1;1H\x1b]66;s=2;X\x1b\\\x1b[6n".to_string()
}

#[must_use]
pub fn xtwinops_query() -> String {
    "\x1b[18t".to_string()
}

#[must_use]
pub fn kitty_graphics_clear() -> String {
    "\x1b_Ga=d\x1b\\".to_string()
}

/// Explicit-width wrapper (kitty extension) around an emitted grapheme.
#[must_use]
pub fn explicit_width_wrap(grapheme: &str, width: u16) -> String {
    format!("\x1b[{width}X{grapheme}")
}

/// Scaled-text wrapper (kitty text sizing, OSC 66) around an emitted grapheme.
#[must_use]
pub fn scaled_text_wrap(grapheme: &str, scale: u8, valign: u8) -> String {
    format!("\x1b]66;s={scale}:v={valign};{grapheme}\x1b\\")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cup_is_one_indexed() {
        assert_eq!(cup(0, 0), "\x1b[1;1H");
        assert_eq!(cup(4, 9), "\x1b[5;10H");
    }

    #[test]
    fn cuf_zero_emits_nothing() {
        assert_eq!(cuf(0), "");
        assert_eq!(cuf(3), "\x1b[3C");
    }

    #[test]
    fn osc8_empty_uri_is_the_clear_form() {
        assert_eq!(osc8("id=1", ""), "\x1b]8;;\x1b\\");
        assert_eq!(osc8("id=1", "https://example.com"), "\x1b]8;id=1;https://example.com\x1b\\");
    }
}
