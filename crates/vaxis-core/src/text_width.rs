//! Grapheme segmentation and display-width measurement.
//!
//! `gwidth` measures a grapheme cluster's on-screen width under a selected
//! [`Method`]. Zero-width combining marks and variation selectors
//! contribute 0 cells; wide East-Asian and emoji-presentation sequences
//! contribute 2. [`GraphemeRing`] interns ephemeral grapheme bytes for
//! event text that only needs to live for the duration of a single
//! `parse` call's handling turn.

use unicode_display_width::width as unicode_display_width;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

/// Width-measurement method.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    /// POSIX `wcwidth`-compatible widths.
    Wcwidth,
    /// Unicode-aware width table (the default; handles most emoji
    /// presentation sequences correctly).
    Unicode,
    /// Like `Unicode`, but zero-width joiners are stripped before
    /// measurement, so an unsupported ZWJ sequence measures as the sum of
    /// its parts rather than collapsing to the base glyph's width.
    NoZwj,
}

impl Default for Method {
    fn default() -> Self {
        Method::Unicode
    }
}

const ZWJ: char = '\u{200D}';

#[inline]
fn is_zero_width_codepoint(c: char) -> bool {
    let u = c as u32;
    matches!(u, 0x0000..=0x001F | 0x007F..=0x009F)
        || matches!(u, 0x0300..=0x036F | 0x1AB0..=0x1AFF | 0x1DC0..=0x1DFF | 0x20D0..=0x20FF)
        || matches!(u, 0xFE20..=0xFE2F)
        || matches!(u, 0xFE00..=0xFE0F | 0xE0100..=0xE01EF)
        || matches!(
            u,
            0x00AD | 0x034F | 0x180E | 0x200B | 0x200C | 0x200D | 0x200E | 0x200F | 0x2060 | 0xFEFF
        )
        || matches!(u, 0x202A..=0x202E | 0x2066..=0x2069 | 0x206A..=0x206F)
}

#[inline]
fn is_variation_selector(c: char) -> bool {
    matches!(c as u32, 0xFE00..=0xFE0F | 0xE0100..=0xE01EF)
}

#[inline]
fn ascii_display_width(text: &str) -> usize {
    let mut width = 0;
    for b in text.bytes() {
        match b {
            b'\t' | b'\n' | b'\r' => width += 1,
            0x20..=0x7E => width += 1,
            _ => {}
        }
    }
    width
}

/// Width of a single Unicode scalar under the given method.
#[inline]
#[must_use]
pub fn char_width(ch: char, method: Method) -> usize {
    if ch.is_ascii() {
        return match ch {
            '\t' | '\n' | '\r' => 1,
            ' '..='~' => 1,
            _ => 0,
        };
    }
    if is_zero_width_codepoint(ch) {
        return 0;
    }
    match method {
        Method::Wcwidth => ch.width().unwrap_or(0),
        Method::Unicode | Method::NoZwj => ch.width().unwrap_or(0),
    }
}

/// Width of a single grapheme cluster under the given method.
///
/// `gwidth(s, method)`: non-negative; a grapheme composed entirely of
/// zero-width codepoints measures 0; under [`Method::NoZwj`] any ZWJ bytes
/// are stripped from the measured text first so an unsupported
/// ZWJ-joined sequence reports the sum of its parts rather than the
/// joined glyph's width.
#[inline]
#[must_use]
pub fn gwidth(grapheme: &str, method: Method) -> usize {
    if grapheme.is_ascii() {
        return ascii_display_width(grapheme);
    }
    if grapheme.chars().all(is_zero_width_codepoint) {
        return 0;
    }
    match method {
        Method::NoZwj if grapheme.contains(ZWJ) => {
            grapheme.chars().filter(|&c| c != ZWJ).map(|c| char_width(c, method)).sum()
        }
        Method::Wcwidth => grapheme.chars().map(|c| char_width(c, Method::Wcwidth)).sum(),
        _ => unicode_display_width(grapheme) as usize,
    }
}

/// Width of an entire string (sum of its grapheme cluster widths).
#[inline]
#[must_use]
pub fn display_width(text: &str, method: Method) -> usize {
    if let Some(w) = ascii_width(text) {
        return w;
    }
    if text.is_ascii() {
        return ascii_display_width(text);
    }
    text.graphemes(true).map(|g| gwidth(g, method)).sum()
}

/// Fast-path width for pure printable ASCII; `None` if the string contains
/// anything outside `0x20..=0x7E`.
#[inline]
#[must_use]
pub fn ascii_width(text: &str) -> Option<usize> {
    if text.bytes().all(|b| (0x20..=0x7E).contains(&b)) {
        Some(text.len())
    } else {
        None
    }
}

/// Grapheme-cluster iterator over a byte slice, yielding `(start, length)`
/// pairs. Invalid UTF-8 is not handled here; callers validate before
/// segmenting (the parser does this as part of its ground-state decoding).
#[must_use]
pub fn graphemes(s: &str) -> impl Iterator<Item = (usize, usize)> + '_ {
    s.grapheme_indices(true).map(|(start, g)| (start, g.len()))
}

/// Length, in bytes, of the contiguous run of printable ASCII
/// (`0x20..=0x7E`) at the start of `s`.
///
/// If the byte immediately following the run begins a combining mark, a
/// variation selector, or an incomplete UTF-8 sequence, the run is
/// shortened by one byte so a caller splitting input at this boundary does
/// not break a grapheme cluster in two.
#[must_use]
pub fn ascii_run_len(s: &[u8]) -> usize {
    let mut n = 0;
    while n < s.len() && (0x20..=0x7E).contains(&s[n]) {
        n += 1;
    }
    if n == 0 || n == s.len() {
        return n;
    }
    let rest = &s[n..];
    match std::str::from_utf8(rest) {
        Ok(text) => {
            if let Some(c) = text.chars().next() {
                if is_zero_width_codepoint(c) && !c.is_ascii() || is_variation_selector(c) {
                    return n.saturating_sub(1);
                }
            }
            n
        }
        Err(e) => {
            // An incomplete trailing sequence at the very end of the
            // buffer: back off one byte so the caller doesn't split it.
            if e.valid_up_to() == 0 {
                n.saturating_sub(1)
            } else {
                n
            }
        }
    }
}

/// Capacity, in bytes, below which [`GraphemeRing::intern`] panics in
/// debug builds (construction-time invariant, not a runtime error path).
pub const MIN_RING_CAPACITY: usize = 8 * 1024;

/// Fixed-capacity ring buffer interning ephemeral grapheme bytes for event
/// text. Writes wrap: when the write cursor would overflow, it resets to
/// the start of the buffer before writing the new bytes. Callers must not
/// retain the returned slice past the next `intern` call, matching the
/// "valid only for the event's handling turn" contract on `Key.text`.
pub struct GraphemeRing {
    buf: Vec<u8>,
    cursor: usize,
}

impl GraphemeRing {
    /// Create a ring with at least `MIN_RING_CAPACITY` bytes of storage.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(MIN_RING_CAPACITY);
        Self { buf: vec![0u8; capacity], cursor: 0 }
    }

    /// Copy `bytes` into the ring and return the slice they now occupy.
    ///
    /// If `bytes` does not fit before the end of the buffer, the cursor
    /// wraps to the start first. A `bytes` slice longer than the ring's
    /// total capacity is truncated to fit (pathological input only;
    /// grapheme clusters and kitty text payloads are bounded well under
    /// this ring's minimum size in practice).
    pub fn intern(&mut self, bytes: &[u8]) -> &[u8] {
        let cap = self.buf.len();
        let bytes = if bytes.len() > cap { &bytes[..cap] } else { bytes };
        if self.cursor + bytes.len() > cap {
            self.cursor = 0;
        }
        let start = self.cursor;
        self.buf[start..start + bytes.len()].copy_from_slice(bytes);
        self.cursor = start + bytes.len();
        &self.buf[start..start + bytes.len()]
    }
}

impl Default for GraphemeRing {
    fn default() -> Self {
        Self::new(MIN_RING_CAPACITY)
    }
}
