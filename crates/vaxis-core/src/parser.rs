//! Byte-stream input parser: a pure function from bytes to typed events.
//!
//! [`Parser::parse`] consumes a prefix of its input and returns the event
//! (if any) that prefix decoded to, plus the number of bytes consumed. A
//! return of `n == 0` means no complete event is present yet; the caller
//! must retain its buffer and append more bytes before calling again.
//! `parse(b)` followed by `parse(&b[n..])` is equivalent to feeding the
//! whole of `b` through a streaming reader one chunk at a time.

use crate::event::{ColorScheme, ColorWhich, Event, Mouse, MouseButton, MouseEventKind, MouseMods, RgbColor, Winsize};
use crate::key::{keycode, Key, Modifiers};
use crate::text_width::GraphemeRing;
use unicode_segmentation::GraphemeCursor;

/// The only error the parser itself reports; everything else (unknown
/// sequences, integer overflow in parameters) degrades to a null event
/// rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    InvalidUtf8 { offset: usize },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::InvalidUtf8 { offset } => write!(f, "invalid utf-8 at offset {offset}"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Result of a single [`Parser::parse`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome<'a> {
    pub event: Option<Event<'a>>,
    pub n: usize,
}

impl<'a> ParseOutcome<'a> {
    const fn none(n: usize) -> Self {
        Self { event: None, n }
    }

    const fn needs_more() -> Self {
        Self { event: None, n: 0 }
    }
}

/// What was observed while [`Parser::begin_probing`] was active: the two
/// capabilities (§4.6) that are not reported through the ordinary
/// [`Event`] stream because their wire form is byte-for-byte identical to
/// a legacy F3 key press, disambiguated only by the fact that a
/// capability query is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProbeReport {
    pub explicit_width: bool,
    pub scaled_text: bool,
}

pub struct Parser {
    ring: GraphemeRing,
    probing: bool,
    probe_report: ProbeReport,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    #[must_use]
    pub fn new() -> Self {
        Self { ring: GraphemeRing::default(), probing: false, probe_report: ProbeReport::default() }
    }

    /// Start intercepting the explicit-width/scaled-text probe responses
    /// (§4.6) instead of decoding them as legacy F3 key presses.
    pub fn begin_probing(&mut self) {
        crate::debug!("capability probe: begin intercepting F3/probe-response ambiguity");
        self.probing = true;
        self.probe_report = ProbeReport::default();
    }

    /// Stop intercepting probe responses and return what was observed.
    pub fn end_probing(&mut self) -> ProbeReport {
        self.probing = false;
        let report = std::mem::take(&mut self.probe_report);
        crate::debug!(explicit_width = report.explicit_width, scaled_text = report.scaled_text, "capability probe: end");
        report
    }

    /// Decode the next event, if any, from the start of `input`.
    pub fn parse<'a>(&'a mut self, input: &[u8]) -> Result<ParseOutcome<'a>, ParseError> {
        if input.is_empty() {
            return Ok(ParseOutcome::needs_more());
        }
        match input[0] {
            0x1B => self.parse_escape(input),
            0x7F => Ok(ParseOutcome { event: Some(Event::KeyPress(Key::new(keycode::BACKSPACE))), n: 1 }),
            b if b < 0x20 => Ok(Self::parse_control(b)),
            _ => self.parse_ground_text(input),
        }
    }

    fn parse_control(b: u8) -> ParseOutcome<'static> {
        let key = match b {
            0x00 => Key::new('@' as u32).with_mods(Modifiers::CTRL),
            0x08 => Key::new(keycode::BACKSPACE),
            0x09 => Key::new(keycode::TAB),
            0x0A => Key::new('J' as u32).with_mods(Modifiers::CTRL),
            0x0D => Key::new(keycode::ENTER),
            0x01..=0x07 | 0x0B..=0x0C | 0x0E..=0x1A => {
                let letter = (b - 0x01) + b'A';
                Key::new(letter as u32).with_mods(Modifiers::CTRL)
            }
            _ => Key::new(b as u32),
        };
        ParseOutcome { event: Some(Event::KeyPress(key)), n: 1 }
    }

    fn parse_ground_text<'a>(&'a mut self, input: &[u8]) -> Result<ParseOutcome<'a>, ParseError> {
        let valid = match std::str::from_utf8(input) {
            Ok(s) => s,
            Err(e) => {
                let valid_up_to = e.valid_up_to();
                if valid_up_to == 0 {
                    return match e.error_len() {
                        None => Ok(ParseOutcome::needs_more()),
                        Some(_) => Err(ParseError::InvalidUtf8 { offset: 0 }),
                    };
                }
                std::str::from_utf8(&input[..valid_up_to]).expect("validated prefix is valid utf-8")
            }
        };
        if valid.is_empty() {
            return Ok(ParseOutcome::needs_more());
        }
        let cluster_len = next_grapheme_len(valid);
        let cluster = &valid[..cluster_len];
        let char_count = cluster.chars().count();
        let codepoint = if char_count == 1 { cluster.chars().next().unwrap() as u32 } else { keycode::MULTICODEPOINT };
        let text = self.ring.intern(cluster.as_bytes());
        let text = std::str::from_utf8(text).expect("ring stores only bytes we validated as utf-8");
        let key = Key::new(codepoint).with_text(text);
        Ok(ParseOutcome { event: Some(Event::KeyPress(key)), n: cluster_len })
    }

    fn parse_escape<'a>(&'a mut self, input: &[u8]) -> Result<ParseOutcome<'a>, ParseError> {
        if input.len() < 2 {
            // ESC is the entire available buffer: a lone Escape key press,
            // not an incomplete sequence (legitimate multi-byte sequences
            // arrive as one burst from the terminal).
            return Ok(ParseOutcome { event: Some(Event::KeyPress(Key::new(keycode::ESCAPE))), n: 1 });
        }
        match input[1] {
            b'O' => {
                crate::debug!("parser: ESC O -> SS3 sequence");
                self.parse_ss3(input)
            }
            b'[' => {
                crate::debug!("parser: ESC [ -> CSI sequence");
                self.parse_csi(input)
            }
            b']' => {
                crate::debug!("parser: ESC ] -> OSC sequence");
                self.parse_osc(input)
            }
            b'_' => {
                crate::debug!("parser: ESC _ -> APC sequence");
                self.parse_apc(input)
            }
            b'P' | b'X' | b'^' => Ok(Self::parse_skip_to_st(input, 2)),
            _ => {
                let inner = self.parse_ground_text(&input[1..])?;
                if inner.n == 0 {
                    return Ok(ParseOutcome::needs_more());
                }
                let event = inner.event.map(|e| match e {
                    Event::KeyPress(k) => Event::KeyPress(Key { mods: k.mods | Modifiers::ALT, ..k }),
                    other => other,
                });
                Ok(ParseOutcome { event, n: inner.n + 1 })
            }
        }
    }

    fn parse_ss3(&mut self, input: &[u8]) -> Result<ParseOutcome<'static>, ParseError> {
        if input.len() < 3 {
            return Ok(ParseOutcome::needs_more());
        }
        let codepoint = match input[2] {
            b'A' => Some(keycode::UP),
            b'B' => Some(keycode::DOWN),
            b'C' => Some(keycode::RIGHT),
            b'D' => Some(keycode::LEFT),
            b'H' => Some(keycode::HOME),
            b'F' => Some(keycode::END),
            b'P' => Some(keycode::F1),
            b'Q' => Some(keycode::F2),
            b'R' => Some(keycode::F3),
            b'S' => Some(keycode::F4),
            b'E' => Some(keycode::KP_BEGIN),
            _ => None,
        };
        let event = codepoint.map(|cp| Event::KeyPress(Key::new(cp)));
        Ok(ParseOutcome { event, n: 3 })
    }

    fn parse_csi<'a>(&'a mut self, input: &[u8]) -> Result<ParseOutcome<'a>, ParseError> {
        let body = &input[2..];
        let Some(seq) = scan_csi(body) else {
            return Ok(ParseOutcome::needs_more());
        };
        let n = 2 + seq.len;
        let params = match parse_params(seq.params) {
            Ok(p) => p,
            Err(()) => {
                crate::warn!(final_byte = seq.final_byte as char, "parser: malformed CSI parameter, discarding sequence");
                return Ok(ParseOutcome::none(n));
            }
        };
        let private = seq.private;
        let dollar = seq.intermediates.contains(&b'$');

        let outcome = match (private, seq.final_byte) {
            (None, b'A') => legacy_key(&params, keycode::UP, n),
            (None, b'B') => legacy_key(&params, keycode::DOWN, n),
            (None, b'C') => legacy_key(&params, keycode::RIGHT, n),
            (None, b'D') => legacy_key(&params, keycode::LEFT, n),
            (None, b'E') => legacy_key(&params, keycode::KP_BEGIN, n),
            (None, b'F') => legacy_key(&params, keycode::END, n),
            (None, b'H') => legacy_key(&params, keycode::HOME, n),
            (None, b'P') => legacy_key(&params, keycode::F1, n),
            (None, b'Q') => legacy_key(&params, keycode::F2, n),
            (None, b'R') => self.legacy_f3_or_probe(&params, n),
            (None, b'S') => legacy_key(&params, keycode::F4, n),
            (None, b'~') => tilde_key(&params, n),
            (None, b'u') => self.kitty_key(&params, n),
            (None, b'I') => ParseOutcome { event: Some(Event::FocusIn), n },
            (None, b'O') => ParseOutcome { event: Some(Event::FocusOut), n },
            (Some(b'<'), b'M') => sgr_mouse(&params, MouseEventKind::Press, n),
            (Some(b'<'), b'm') => sgr_mouse(&params, MouseEventKind::Release, n),
            (Some(b'?'), b'c') => {
                crate::debug!("capability probe: DA1 response received");
                ParseOutcome { event: Some(Event::CapabilityDa1), n }
            }
            (Some(b'?'), b'y') if dollar => {
                crate::debug!("capability probe: DECRPM response received");
                decrpm(&params, n)
            }
            (Some(b'?'), b'n') => dsr(&params, n),
            (None, b't') => xtwinops(&params, n),
            _ => {
                crate::warn!(private = ?private, final_byte = seq.final_byte as char, "parser: unrecognized CSI sequence, discarding");
                ParseOutcome::none(n)
            }
        };
        Ok(outcome)
    }

    fn legacy_f3_or_probe(&mut self, params: &[Vec<Option<u32>>], n: usize) -> ParseOutcome<'static> {
        if self.probing {
            let mask = field_u32(params, 1, 0, 1);
            match mask {
                2 => {
                    self.probe_report.explicit_width = true;
                    return ParseOutcome::none(n);
                }
                3 => {
                    self.probe_report.scaled_text = true;
                    return ParseOutcome::none(n);
                }
                _ => {}
            }
        }
        legacy_key(params, keycode::F3, n)
    }

    fn kitty_key<'a>(&'a mut self, params: &[Vec<Option<u32>>], n: usize) -> ParseOutcome<'a> {
        let Some(codepoint) = field_opt(params, 0, 0) else {
            return ParseOutcome::none(n);
        };
        let shifted_codepoint = field_opt(params, 0, 1);
        let base_layout_codepoint = field_opt(params, 0, 2);
        let mask = field_u32(params, 1, 0, 1);
        let event_type = field_opt(params, 1, 1).unwrap_or(1);
        let mods = mods_from_mask(mask);

        let mut text: Option<&str> = None;
        if let Some(field) = params.get(2) {
            let mut s = String::new();
            for sub in field {
                if let Some(cp) = sub {
                    if let Some(c) = char::from_u32(*cp) {
                        s.push(c);
                    }
                }
            }
            if !s.is_empty() {
                let bytes = self.ring.intern(s.as_bytes());
                text = Some(std::str::from_utf8(bytes).expect("interned utf-8"));
            }
        }
        if text.is_none() && mods == Modifiers::SHIFT {
            if let Some(c) = char::from_u32(codepoint) {
                if c.is_ascii_graphic() || c == ' ' {
                    let upper: String = c.to_uppercase().collect();
                    let bytes = self.ring.intern(upper.as_bytes());
                    text = Some(std::str::from_utf8(bytes).expect("interned utf-8"));
                }
            }
        }

        let key = Key { codepoint, text, shifted_codepoint, base_layout_codepoint, mods };
        let event = if event_type == 3 { Event::KeyRelease(key) } else { Event::KeyPress(key) };
        ParseOutcome { event: Some(event), n }
    }

    fn parse_osc<'a>(&'a mut self, input: &[u8]) -> Result<ParseOutcome<'a>, ParseError> {
        let body_start = 2;
        let Some((body, term_len)) = find_osc_terminator(&input[body_start..]) else {
            return Ok(ParseOutcome::needs_more());
        };
        let n = body_start + body.len() + term_len;
        let mut parts = body.splitn(3, |&b| b == b';');
        let Some(ps) = parts.next() else { return Ok(ParseOutcome::none(n)) };
        let Ok(ps_str) = std::str::from_utf8(ps) else { return Ok(ParseOutcome::none(n)) };
        let Ok(ps_num) = ps_str.parse::<u32>() else { return Ok(ParseOutcome::none(n)) };

        match ps_num {
            4 => {
                let Some(index_part) = parts.next() else { return Ok(ParseOutcome::none(n)) };
                let Ok(index_str) = std::str::from_utf8(index_part) else { return Ok(ParseOutcome::none(n)) };
                let Ok(index) = index_str.parse::<u8>() else { return Ok(ParseOutcome::none(n)) };
                let Some(rgb_part) = parts.next() else { return Ok(ParseOutcome::none(n)) };
                match parse_rgb_spec(rgb_part) {
                    Some(color) => Ok(ParseOutcome {
                        event: Some(Event::ColorReport { which: ColorWhich::Palette(index), color }),
                        n,
                    }),
                    None => Ok(ParseOutcome::none(n)),
                }
            }
            10 | 11 | 12 => {
                let Some(rgb_part) = parts.next() else { return Ok(ParseOutcome::none(n)) };
                let which = match ps_num {
                    10 => ColorWhich::Foreground,
                    11 => ColorWhich::Background,
                    _ => ColorWhich::Cursor,
                };
                match parse_rgb_spec(rgb_part) {
                    Some(color) => Ok(ParseOutcome { event: Some(Event::ColorReport { which, color }), n }),
                    None => Ok(ParseOutcome::none(n)),
                }
            }
            52 => {
                let Some(subtype) = parts.next() else { return Ok(ParseOutcome::none(n)) };
                if subtype != b"c" {
                    return Ok(ParseOutcome::none(n));
                }
                let Some(payload) = parts.next() else { return Ok(ParseOutcome::none(n)) };
                use base64::Engine;
                match base64::engine::general_purpose::STANDARD.decode(payload) {
                    Ok(bytes) => Ok(ParseOutcome { event: Some(Event::Paste(bytes)), n }),
                    Err(_) => Ok(ParseOutcome::none(n)),
                }
            }
            _ => {
                crate::warn!(ps = ps_num, "parser: unrecognized OSC subtype, discarding");
                Ok(ParseOutcome::none(n))
            }
        }
    }

    fn parse_apc(&mut self, input: &[u8]) -> Result<ParseOutcome<'static>, ParseError> {
        let body_start = 2;
        let Some((body, term_len)) = find_st(&input[body_start..]) else {
            return Ok(ParseOutcome::needs_more());
        };
        let n = body_start + body.len() + term_len;
        let event = if body.first() == Some(&b'G') { Some(Event::CapabilityKittyGraphics) } else { None };
        Ok(ParseOutcome { event, n })
    }

    fn parse_skip_to_st(input: &[u8], start: usize) -> ParseOutcome<'static> {
        match find_st(&input[start..]) {
            Some((body, term_len)) => ParseOutcome::none(start + body.len() + term_len),
            None => ParseOutcome::needs_more(),
        }
    }
}

fn next_grapheme_len(s: &str) -> usize {
    let mut cursor = GraphemeCursor::new(0, s.len(), true);
    match cursor.next_boundary(s, 0) {
        Ok(Some(n)) if n > 0 => n,
        _ => {
            // Either a definite end-of-text boundary or the segmenter
            // needs context we don't have (e.g. a flag-emoji pair split
            // across buffers); take the whole available prefix as one
            // cluster rather than blocking indefinitely.
            s.chars().next().map(char::len_utf8).unwrap_or(s.len())
        }
    }
}

struct CsiSeq<'a> {
    private: Option<u8>,
    params: &'a [u8],
    intermediates: &'a [u8],
    final_byte: u8,
    /// Bytes consumed starting right after `ESC [`.
    len: usize,
}

fn scan_csi(body: &[u8]) -> Option<CsiSeq<'_>> {
    let mut i = 0;
    let mut private = None;
    if i < body.len() && matches!(body[i], b'<' | b'=' | b'>' | b'?') {
        private = Some(body[i]);
        i += 1;
    }
    let params_start = i;
    while i < body.len() && (0x30..=0x3B).contains(&body[i]) {
        i += 1;
    }
    let params_end = i;
    let inter_start = i;
    while i < body.len() && (0x20..=0x2F).contains(&body[i]) {
        i += 1;
    }
    let inter_end = i;
    if i >= body.len() {
        return None;
    }
    let final_byte = body[i];
    Some(CsiSeq {
        private,
        params: &body[params_start..params_end],
        intermediates: &body[inter_start..inter_end],
        final_byte,
        len: i + 1,
    })
}

fn parse_params(bytes: &[u8]) -> Result<Vec<Vec<Option<u32>>>, ()> {
    if bytes.is_empty() {
        return Ok(Vec::new());
    }
    let mut fields = Vec::new();
    for field in bytes.split(|&b| b == b';') {
        let mut subs = Vec::new();
        for sub in field.split(|&b| b == b':') {
            if sub.is_empty() {
                subs.push(None);
            } else {
                let s = std::str::from_utf8(sub).map_err(|_| ())?;
                let v: u32 = s.parse().map_err(|_| ())?;
                subs.push(Some(v));
            }
        }
        fields.push(subs);
    }
    Ok(fields)
}

fn field_opt(fields: &[Vec<Option<u32>>], idx: usize, sub: usize) -> Option<u32> {
    fields.get(idx).and_then(|f| f.get(sub)).copied().flatten()
}

fn field_u32(fields: &[Vec<Option<u32>>], idx: usize, sub: usize, default: u32) -> u32 {
    field_opt(fields, idx, sub).unwrap_or(default)
}

fn mods_from_mask(mask: u32) -> Modifiers {
    let bits = mask.saturating_sub(1);
    let mut m = Modifiers::empty();
    if bits & 1 != 0 {
        m |= Modifiers::SHIFT;
    }
    if bits & 2 != 0 {
        m |= Modifiers::ALT;
    }
    if bits & 4 != 0 {
        m |= Modifiers::CTRL;
    }
    if bits & 8 != 0 {
        m |= Modifiers::SUPER;
    }
    if bits & 16 != 0 {
        m |= Modifiers::HYPER;
    }
    if bits & 32 != 0 {
        m |= Modifiers::META;
    }
    if bits & 64 != 0 {
        m |= Modifiers::CAPS_LOCK;
    }
    if bits & 128 != 0 {
        m |= Modifiers::NUM_LOCK;
    }
    m
}

fn legacy_key(params: &[Vec<Option<u32>>], codepoint: u32, n: usize) -> ParseOutcome<'static> {
    let mask = field_u32(params, 1, 0, 1);
    let event_type = field_opt(params, 1, 1).unwrap_or(1);
    let key = Key::new(codepoint).with_mods(mods_from_mask(mask));
    let event = if event_type == 3 { Event::KeyRelease(key) } else { Event::KeyPress(key) };
    ParseOutcome { event: Some(event), n }
}

fn tilde_key(params: &[Vec<Option<u32>>], n: usize) -> ParseOutcome<'static> {
    let Some(num) = field_opt(params, 0, 0) else {
        return ParseOutcome::none(n);
    };
    match num {
        200 => return ParseOutcome { event: Some(Event::PasteStart), n },
        201 => return ParseOutcome { event: Some(Event::PasteEnd), n },
        _ => {}
    }
    let codepoint = match num {
        2 => keycode::INSERT,
        3 => keycode::DELETE,
        5 => keycode::PAGE_UP,
        6 => keycode::PAGE_DOWN,
        7 => keycode::HOME,
        8 => keycode::END,
        11 => keycode::F1,
        12 => keycode::F2,
        13 => keycode::F3,
        14 => keycode::F4,
        15 => keycode::F5,
        17 => keycode::F6,
        18 => keycode::F7,
        19 => keycode::F8,
        20 => keycode::F9,
        21 => keycode::F10,
        23 => keycode::F11,
        24 => keycode::F12,
        57427 => keycode::KP_BEGIN,
        _ => return ParseOutcome::none(n),
    };
    let mask = field_u32(params, 1, 0, 1);
    let event_type = field_opt(params, 1, 1).unwrap_or(1);
    let key = Key::new(codepoint).with_mods(mods_from_mask(mask));
    let event = if event_type == 3 { Event::KeyRelease(key) } else { Event::KeyPress(key) };
    ParseOutcome { event: Some(event), n }
}

fn sgr_mouse(params: &[Vec<Option<u32>>], terminal_kind: MouseEventKind, n: usize) -> ParseOutcome<'static> {
    let Some(mask) = field_opt(params, 0, 0) else {
        return ParseOutcome::none(n);
    };
    let px = field_u32(params, 1, 0, 1);
    let py = field_u32(params, 2, 0, 1);
    let col = px.saturating_sub(1).min(u16::MAX as u32) as u16;
    let row = py.saturating_sub(1).min(u16::MAX as u32) as u16;

    let motion = mask & 0x20 != 0;
    let wheel = mask & 0x40 != 0;
    let extra = mask & 0x80 != 0;
    let low = mask & 0x03;

    let mut mods = MouseMods::empty();
    if mask & 0x04 != 0 {
        mods |= MouseMods::SHIFT;
    }
    if mask & 0x08 != 0 {
        mods |= MouseMods::ALT;
    }
    if mask & 0x10 != 0 {
        mods |= MouseMods::CTRL;
    }

    let button = if wheel {
        match low {
            0 => MouseButton::WheelUp,
            1 => MouseButton::WheelDown,
            2 => MouseButton::WheelLeft,
            3 => MouseButton::WheelRight,
            _ => MouseButton::None,
        }
    } else if extra {
        match low {
            0 => MouseButton::Button8,
            1 => MouseButton::Button9,
            _ => MouseButton::None,
        }
    } else {
        match low {
            0 => MouseButton::Left,
            1 => MouseButton::Middle,
            2 => MouseButton::Right,
            _ => MouseButton::None,
        }
    };

    let kind = if motion && button == MouseButton::None {
        MouseEventKind::Motion
    } else if motion {
        MouseEventKind::Drag
    } else {
        match terminal_kind {
            MouseEventKind::Release => MouseEventKind::Release,
            _ => MouseEventKind::Press,
        }
    };

    let mouse = Mouse { col, row, pixel_offset: None, button, mods, kind };
    ParseOutcome { event: Some(Event::Mouse(mouse)), n }
}

fn decrpm(params: &[Vec<Option<u32>>], n: usize) -> ParseOutcome<'static> {
    let Some(mode) = field_opt(params, 0, 0) else {
        return ParseOutcome::none(n);
    };
    let value = field_u32(params, 1, 0, 0);
    if value == 0 || value == 4 {
        return ParseOutcome::none(n);
    }
    let event = match mode {
        1016 => Some(Event::CapabilitySgrPixels),
        2027 => Some(Event::CapabilityUnicode),
        2031 => Some(Event::CapabilityColorSchemeUpdates),
        _ => None,
    };
    ParseOutcome { event, n }
}

fn dsr(params: &[Vec<Option<u32>>], n: usize) -> ParseOutcome<'static> {
    let Some(code) = field_opt(params, 0, 0) else {
        return ParseOutcome::none(n);
    };
    if code != 997 {
        return ParseOutcome::none(n);
    }
    let scheme = field_u32(params, 1, 0, 0);
    let event = match scheme {
        1 => Some(Event::ColorSchemeReport(ColorScheme::Dark)),
        2 => Some(Event::ColorSchemeReport(ColorScheme::Light)),
        _ => None,
    };
    ParseOutcome { event, n }
}

fn xtwinops(params: &[Vec<Option<u32>>], n: usize) -> ParseOutcome<'static> {
    let Some(48) = field_opt(params, 0, 0) else {
        return ParseOutcome::none(n);
    };
    let rows = field_u32(params, 1, 0, 0) as u16;
    let cols = field_u32(params, 2, 0, 0) as u16;
    let y_pixel = field_u32(params, 3, 0, 0) as u16;
    let x_pixel = field_u32(params, 4, 0, 0) as u16;
    ParseOutcome { event: Some(Event::Winsize(Winsize { rows, cols, x_pixel, y_pixel })), n }
}

fn parse_rgb_spec(body: &[u8]) -> Option<RgbColor> {
    let s = std::str::from_utf8(body).ok()?;
    let s = s.strip_prefix("rgb:")?;
    let mut parts = s.split('/');
    let r = parts.next()?;
    let g = parts.next()?;
    let b = parts.next()?;
    Some(RgbColor { r: hex_component(r)?, g: hex_component(g)?, b: hex_component(b)? })
}

fn hex_component(s: &str) -> Option<u8> {
    if s.is_empty() {
        return None;
    }
    let v = u32::from_str_radix(s, 16).ok()?;
    let bits = s.len() * 4;
    // Scale an N-bit component down to 8 bits by taking the high byte.
    let shifted = if bits > 8 { v >> (bits - 8) } else { v << (8 - bits) };
    Some(shifted as u8)
}

/// Find the OSC terminator (`BEL` or `ST`) in `body`, returning the bytes
/// before it and the terminator's own length.
fn find_osc_terminator(body: &[u8]) -> Option<(&[u8], usize)> {
    let mut pos = 0;
    while let Some(i) = memchr::memchr2(0x07, 0x1B, &body[pos..]) {
        let idx = pos + i;
        if body[idx] == 0x07 {
            return Some((&body[..idx], 1));
        }
        if body.get(idx + 1) == Some(&b'\\') {
            return Some((&body[..idx], 2));
        }
        pos = idx + 1;
    }
    None
}

/// Find a bare `ST` (`ESC \`) terminator, used by APC/DCS/SOS/PM.
fn find_st(body: &[u8]) -> Option<(&[u8], usize)> {
    let mut pos = 0;
    while let Some(i) = memchr::memchr(0x1B, &body[pos..]) {
        let idx = pos + i;
        if body.get(idx + 1) == Some(&b'\\') {
            return Some((&body[..idx], 2));
        }
        pos = idx + 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_1_ascii_a() {
        let mut p = Parser::new();
        let out = p.parse(&[0x61]).unwrap();
        assert_eq!(out.n, 1);
        match out.event {
            Some(Event::KeyPress(k)) => {
                assert_eq!(k.codepoint, 'a' as u32);
                assert_eq!(k.text, Some("a"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn scenario_2_escape_alone() {
        let mut p = Parser::new();
        let out = p.parse(&[0x1B]).unwrap();
        assert_eq!(out.n, 1);
        assert_eq!(out.event, Some(Event::KeyPress(Key::new(keycode::ESCAPE))));
    }

    #[test]
    fn scenario_3_alt_a() {
        let mut p = Parser::new();
        let out = p.parse(&[0x1B, 0x61]).unwrap();
        assert_eq!(out.n, 2);
        match out.event {
            Some(Event::KeyPress(k)) => {
                assert_eq!(k.codepoint, 'a' as u32);
                assert!(k.mods.contains(Modifiers::ALT));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn scenario_4_shift_up() {
        let mut p = Parser::new();
        let bytes = b"\x1b[1;2A";
        let out = p.parse(bytes).unwrap();
        assert_eq!(out.n, 6);
        match out.event {
            Some(Event::KeyPress(k)) => {
                assert_eq!(k.codepoint, keycode::UP);
                assert!(k.mods.contains(Modifiers::SHIFT));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn scenario_5_kitty_shifted_a() {
        let mut p = Parser::new();
        let bytes = b"\x1b[97:65;2u";
        let out = p.parse(bytes).unwrap();
        assert_eq!(out.n, 10);
        match out.event {
            Some(Event::KeyPress(k)) => {
                assert_eq!(k.codepoint, 'a' as u32);
                assert_eq!(k.shifted_codepoint, Some('A' as u32));
                assert!(k.mods.contains(Modifiers::SHIFT));
                assert_eq!(k.text, Some("A"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn scenario_6_sgr_motion_mouse() {
        let mut p = Parser::new();
        let bytes = b"\x1b[<35;1;1m";
        let out = p.parse(bytes).unwrap();
        assert_eq!(out.n, 10);
        match out.event {
            Some(Event::Mouse(m)) => {
                assert_eq!(m.col, 0);
                assert_eq!(m.row, 0);
                assert_eq!(m.button, MouseButton::None);
                assert_eq!(m.kind, MouseEventKind::Motion);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn scenario_7_osc52_paste() {
        let mut p = Parser::new();
        let mut bytes = b"\x1b]52;c;".to_vec();
        bytes.extend_from_slice(b"b3NjNTIgcGFzdGU=");
        bytes.extend_from_slice(b"\x1b\\");
        assert_eq!(bytes.len(), 25);
        let out = p.parse(&bytes).unwrap();
        assert_eq!(out.n, 25);
        match out.event {
            Some(Event::Paste(data)) => assert_eq!(data, b"osc52 paste"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn scenario_8_astronaut_zwj() {
        let mut p = Parser::new();
        // woman (U+1F469) + ZWJ (U+200D) + rocket (U+1F680)
        let grapheme = "\u{1F469}\u{200D}\u{1F680}";
        assert_eq!(grapheme.len(), 11);
        let out = p.parse(grapheme.as_bytes()).unwrap();
        assert_eq!(out.n, 11);
        match out.event {
            Some(Event::KeyPress(k)) => {
                assert_eq!(k.codepoint, keycode::MULTICODEPOINT);
                assert_eq!(k.text, Some(grapheme));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn incomplete_csi_returns_n_zero() {
        let mut p = Parser::new();
        let out = p.parse(b"\x1b[1;2").unwrap();
        assert_eq!(out.n, 0);
        assert!(out.event.is_none());
    }

    #[test]
    fn incomplete_utf8_returns_n_zero() {
        let mut p = Parser::new();
        let out = p.parse(&[0xE2, 0x82]).unwrap();
        assert_eq!(out.n, 0);
    }

    #[test]
    fn invalid_utf8_is_an_error() {
        let mut p = Parser::new();
        let err = p.parse(&[0xFF]).unwrap_err();
        assert_eq!(err, ParseError::InvalidUtf8 { offset: 0 });
    }

    #[test]
    fn focus_in_out() {
        let mut p = Parser::new();
        assert_eq!(p.parse(b"\x1b[I").unwrap().event, Some(Event::FocusIn));
        assert_eq!(p.parse(b"\x1b[O").unwrap().event, Some(Event::FocusOut));
    }

    #[test]
    fn da1_capability() {
        let mut p = Parser::new();
        let out = p.parse(b"\x1b[?c").unwrap();
        assert_eq!(out.event, Some(Event::CapabilityDa1));
    }

    #[test]
    fn decrpm_mode_2027_supported() {
        let mut p = Parser::new();
        let out = p.parse(b"\x1b[?2027;2$y").unwrap();
        assert_eq!(out.event, Some(Event::CapabilityUnicode));
    }

    #[test]
    fn decrpm_mode_suppressed_on_zero() {
        let mut p = Parser::new();
        let out = p.parse(b"\x1b[?2027;0$y").unwrap();
        assert_eq!(out.event, None);
    }

    #[test]
    fn dsr_color_scheme_dark() {
        let mut p = Parser::new();
        let out = p.parse(b"\x1b[?997;1n").unwrap();
        assert_eq!(out.event, Some(Event::ColorSchemeReport(ColorScheme::Dark)));
    }

    #[test]
    fn xtwinops_resize_report() {
        let mut p = Parser::new();
        let out = p.parse(b"\x1b[48;24;80;600;960t").unwrap();
        match out.event {
            Some(Event::Winsize(ws)) => {
                assert_eq!(ws.rows, 24);
                assert_eq!(ws.cols, 80);
                assert_eq!(ws.y_pixel, 600);
                assert_eq!(ws.x_pixel, 960);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unknown_sequence_consumes_and_emits_nothing() {
        let mut p = Parser::new();
        let out = p.parse(b"\x1b[5Z").unwrap();
        assert_eq!(out.n, 4);
        assert!(out.event.is_none());
    }

    #[test]
    fn overflow_param_yields_null_event() {
        let mut p = Parser::new();
        let out = p.parse(b"\x1b[99999999999999999999;2A").unwrap();
        assert!(out.n > 0);
        assert!(out.event.is_none());
    }

    #[test]
    fn probing_intercepts_explicit_width_response() {
        let mut p = Parser::new();
        p.begin_probing();
        let out = p.parse(b"\x1b[1;2R").unwrap();
        assert!(out.event.is_none());
        assert!(out.n > 0);
        let report = p.end_probing();
        assert!(report.explicit_width);
        assert!(!report.scaled_text);
    }

    #[test]
    fn non_probing_same_bytes_decode_as_f3_shift() {
        let mut p = Parser::new();
        let out = p.parse(b"\x1b[1;2R").unwrap();
        match out.event {
            Some(Event::KeyPress(k)) => {
                assert_eq!(k.codepoint, keycode::F3);
                assert!(k.mods.contains(Modifiers::SHIFT));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn dcs_skipped_to_terminator() {
        let mut p = Parser::new();
        let out = p.parse(b"\x1bPsomething\x1b\\").unwrap();
        assert!(out.event.is_none());
        assert_eq!(out.n, 13);
    }

    #[test]
    fn parsing_is_total_across_split_buffers() {
        let mut p1 = Parser::new();
        let whole = b"\x1b[1;2A";
        let out1 = p1.parse(whole).unwrap();
        assert_eq!(out1.n, whole.len());

        let mut p2 = Parser::new();
        let out2 = p2.parse(&whole[..out1.n]).unwrap();
        assert_eq!(out2.event, out1.event);
    }

    proptest::proptest! {
        #[test]
        fn parse_never_consumes_more_than_input(bytes in proptest::collection::vec(proptest::num::u8::ANY, 0..64)) {
            let mut p = Parser::new();
            if let Ok(out) = p.parse(&bytes) {
                prop_assert!(out.n <= bytes.len());
            }
        }
    }
}
