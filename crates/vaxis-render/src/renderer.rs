//! The differential renderer (§4.5): walks [`Screen`] against [`Shadow`]
//! and writes the minimal control-sequence stream that reconciles them.

use std::io::Write;

use vaxis_core::capability_override::Capabilities;
use vaxis_core::text_width::{self, Method};
use vaxis_style::{Hyperlink, Style, StyleFlags, Underline};

use crate::ansi;
use crate::cell::Cell;
use crate::error::RenderError;
use crate::screen::Screen;
use crate::shadow::Shadow;

/// Selects between the colon-subparameter SGR form (`38:2:r:g:b`) and the
/// legacy semicolon form (`38;2;r;g;b`); some terminals mis-parse one or
/// the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SgrPolicy {
    #[default]
    Standard,
    Legacy,
}

impl SgrPolicy {
    const fn sep(self) -> char {
        match self {
            SgrPolicy::Standard => ':',
            SgrPolicy::Legacy => ';',
        }
    }
}

fn color_code(color: vaxis_style::Color, is_bg: bool, policy: SgrPolicy) -> String {
    use vaxis_style::Color;
    match color {
        Color::Default => if is_bg { "49" } else { "39" }.to_string(),
        Color::Indexed(n) if n < 8 => format!("{}{n}", if is_bg { "4" } else { "3" }),
        Color::Indexed(n) if n < 16 => format!("{}{}", if is_bg { "10" } else { "9" }, n - 8),
        Color::Indexed(n) => {
            let sep = policy.sep();
            format!("{}{sep}5{sep}{n}", if is_bg { "48" } else { "38" })
        }
        Color::Rgb(r, g, b) => {
            let sep = policy.sep();
            format!("{}{sep}2{sep}{r}{sep}{g}{sep}{b}", if is_bg { "48" } else { "38" })
        }
    }
}

fn underline_color_code(color: vaxis_style::Color, policy: SgrPolicy) -> String {
    use vaxis_style::Color;
    match color {
        Color::Default => "59".to_string(),
        Color::Indexed(n) => {
            let sep = policy.sep();
            format!("58{sep}5{sep}{n}")
        }
        Color::Rgb(r, g, b) => {
            let sep = policy.sep();
            format!("58{sep}2{sep}{r}{sep}{g}{sep}{b}")
        }
    }
}

fn underline_shape_num(shape: Underline) -> u8 {
    match shape {
        Underline::Off | Underline::Single => 1,
        Underline::Double => 2,
        Underline::Curly => 3,
        Underline::Dotted => 4,
        Underline::Dashed => 5,
    }
}

fn underline_code(shape: Underline, policy: SgrPolicy) -> String {
    match shape {
        Underline::Off => "24".to_string(),
        Underline::Single => "4".to_string(),
        _ => match policy {
            SgrPolicy::Standard => format!("4:{}", underline_shape_num(shape)),
            SgrPolicy::Legacy => "4".to_string(),
        },
    }
}

fn push_flag_diff(codes: &mut Vec<String>, prev: StyleFlags, next: StyleFlags) {
    let prev_bd = prev.intersects(StyleFlags::BOLD | StyleFlags::DIM);
    let next_bd = next.intersects(StyleFlags::BOLD | StyleFlags::DIM);
    if prev.contains(StyleFlags::BOLD) != next.contains(StyleFlags::BOLD)
        || prev.contains(StyleFlags::DIM) != next.contains(StyleFlags::DIM)
    {
        if next_bd {
            if prev_bd {
                codes.push("22".to_string());
            }
            if next.contains(StyleFlags::BOLD) {
                codes.push("1".to_string());
            }
            if next.contains(StyleFlags::DIM) {
                codes.push("2".to_string());
            }
        } else {
            codes.push("22".to_string());
        }
    }
    macro_rules! flag {
        ($name:ident, $on:literal, $off:literal) => {
            if prev.contains(StyleFlags::$name) != next.contains(StyleFlags::$name) {
                codes.push(if next.contains(StyleFlags::$name) { $on } else { $off }.to_string());
            }
        };
    }
    flag!(ITALIC, "3", "23");
    flag!(BLINK, "5", "25");
    flag!(REVERSE, "7", "27");
    flag!(INVISIBLE, "8", "28");
    flag!(STRIKETHROUGH, "9", "29");
}

fn style_diff(prev: &Style, next: &Style, policy: SgrPolicy) -> Option<String> {
    let mut codes = Vec::new();
    if prev.fg != next.fg {
        codes.push(color_code(next.fg, false, policy));
    }
    if prev.bg != next.bg {
        codes.push(color_code(next.bg, true, policy));
    }
    if prev.underline_color != next.underline_color {
        codes.push(underline_color_code(next.underline_color, policy));
    }
    if prev.underline != next.underline {
        codes.push(underline_code(next.underline, policy));
    }
    push_flag_diff(&mut codes, prev.flags, next.flags);
    if codes.is_empty() {
        None
    } else {
        Some(format!("\x1b[{}m", codes.join(";")))
    }
}

pub struct Renderer {
    pub capabilities: Capabilities,
    pub sgr_policy: SgrPolicy,
    pub alt_screen: bool,
}

impl Renderer {
    /// `sgr_policy` defaults to [`SgrPolicy::Standard`] unless
    /// `VAXIS_FORCE_LEGACY_SGR` (§6) is set, in which case it starts as
    /// [`SgrPolicy::Legacy`] regardless of what capability discovery would
    /// otherwise have chosen.
    #[must_use]
    pub fn new(capabilities: Capabilities) -> Self {
        let sgr_policy = if vaxis_core::env::force_legacy_sgr() {
            crate::debug!("renderer: VAXIS_FORCE_LEGACY_SGR set, forcing legacy SGR policy");
            SgrPolicy::Legacy
        } else {
            SgrPolicy::default()
        };
        Self { capabilities, sgr_policy, alt_screen: false }
    }

    fn cell_width(&self, cell: &Cell, method: Method) -> u16 {
        let w = if cell.character.width != 0 {
            cell.character.width as u16
        } else {
            text_width::gwidth(&cell.character.grapheme, method).max(1) as u16
        };
        w.max(1)
    }

    /// Render `screen` as the delta against `shadow`, writing control
    /// sequences to `writer`. `refresh` forces every cell to be
    /// considered dirty regardless of the shadow comparison.
    pub fn render<W: Write>(&mut self, screen: &Screen, shadow: &mut Shadow, writer: &mut W, refresh: bool) -> Result<(), RenderError> {
        let width = screen.width();
        let height = screen.height();
        debug_assert_eq!(screen.cells().len(), width as usize * height as usize);
        debug_assert_eq!(shadow.cells().len(), screen.cells().len());
        crate::debug!(width, height, refresh, "renderer: begin frame");

        let mut out = String::new();
        out.push_str(ansi::SYNC_SET);
        out.push_str(ansi::HIDE_CURSOR);

        if self.alt_screen {
            out.push_str(&ansi::cup(0, 0));
        } else {
            out.push('\r');
            out.push_str(&ansi::ri(shadow.cursor_row));
        }
        out.push_str(ansi::SGR_RESET);
        if self.capabilities.kitty_graphics {
            out.push_str(&ansi::kitty_graphics_clear());
        }
        shadow.reset_skip_flags();

        let mut pen = Style::default();
        let mut pen_link = Hyperlink::default();
        let (mut term_row, mut term_col): (u16, u16) = (0, 0);
        let mut skip_tail: u16 = 0;
        let method = screen.width_method;

        let cells = screen.cells();
        let total = width as usize * height as usize;
        for i in 0..total {
            let row = (i / width as usize) as u16;
            let col = (i % width as usize) as u16;

            if col == 0 && row > 0 {
                let prev_idx = i - 1;
                if cells[prev_idx].wrapped {
                    term_row = row;
                    term_col = 0;
                }
            }

            if skip_tail > 0 {
                skip_tail -= 1;
                continue;
            }

            let cell = &cells[i];
            let w = self.cell_width(cell, method);
            for k in 1..w {
                if let Some(tail) = shadow.cells_mut().get_mut(i + k as usize) {
                    tail.skipped = true;
                }
            }
            skip_tail = w - 1;

            let dirty = {
                let shadow_cell = &shadow.cells()[i];
                refresh || !shadow_cell.eql(cell) || shadow_cell.skipped || shadow_cell.skip || cell.image.is_some()
            };
            if !dirty {
                if !pen_link.is_empty() {
                    out.push_str(&ansi::osc8("", ""));
                    pen_link = Hyperlink::default();
                }
                continue;
            }

            crate::trace!(row, col, grapheme = %cell.character.grapheme, "renderer: cell dirty, repainting");
            shadow.write_cell(col, row, cell);

            if self.capabilities.scaled_text && cell.scale.factor > 1 {
                let span_w = (cell.scale.factor as u32) * (w as u32);
                let span_h = cell.scale.factor as u32;
                for dy in 0..span_h {
                    for dx in 0..span_w {
                        if dx == 0 && dy == 0 {
                            continue;
                        }
                        let r = row as u32 + dy;
                        let c = col as u32 + dx;
                        if r < height as u32 && c < width as u32 {
                            let idx = r as usize * width as usize + c as usize;
                            if let Some(covered) = shadow.cells_mut().get_mut(idx) {
                                covered.skip = true;
                            }
                        }
                    }
                }
            }

            let needs_move = term_row != row || term_col != col;
            if needs_move {
                if self.alt_screen {
                    out.push_str(&ansi::cup(row, col));
                } else if term_row == row {
                    if col > term_col {
                        out.push_str(&ansi::cuf(col - term_col));
                    }
                } else {
                    let extra_rows = row.saturating_sub(term_row);
                    out.push('\n');
                    for _ in 1..extra_rows {
                        out.push('\n');
                    }
                    out.push('\r');
                    out.push_str(&ansi::cuf(col));
                }
                term_row = row;
                term_col = col;
            }

            if let Some(diff) = style_diff(&pen, &cell.style, self.sgr_policy) {
                out.push_str(&diff);
                pen = cell.style;
            }

            if cell.hyperlink.uri != pen_link.uri || cell.hyperlink.params != pen_link.params {
                out.push_str(&ansi::osc8(&cell.hyperlink.params, &cell.hyperlink.uri));
                pen_link = cell.hyperlink.clone();
            }

            let grapheme = cell.character.grapheme.as_ref();
            if self.capabilities.scaled_text && cell.scale.factor > 1 {
                out.push_str(&ansi::scaled_text_wrap(grapheme, cell.scale.factor, cell.scale.valign as u8));
            } else if self.capabilities.explicit_width && w > 1 {
                out.push_str(&ansi::explicit_width_wrap(grapheme, w));
            } else {
                out.push_str(grapheme);
            }

            term_col = col + w;
        }

        if screen.cursor_visible {
            out.push_str(&ansi::cup(screen.cursor_row, screen.cursor_col));
            out.push_str(ansi::SHOW_CURSOR);
        }
        shadow.cursor_row = screen.cursor_row;
        shadow.cursor_col = screen.cursor_col;
        shadow.cursor_visible = screen.cursor_visible;
        if screen.mouse_shape != shadow.mouse_shape {
            shadow.mouse_shape = screen.mouse_shape;
        }

        out.push_str(ansi::SYNC_RESET);
        writer.write_all(out.as_bytes())?;
        let _ = writer.flush();
        crate::debug!(bytes = out.len(), "renderer: end frame");
        Ok(())
    }

    /// Stream styled output to the primary screen without touching
    /// alternate-screen state or display tracking: skips every cell
    /// whose `default` flag is set and terminates with CRLF.
    pub fn pretty_print<W: Write>(&self, screen: &Screen, writer: &mut W) -> Result<(), RenderError> {
        let mut out = String::new();
        let mut pen = Style::default();
        let mut pen_link = Hyperlink::default();
        for cell in screen.cells() {
            if cell.default {
                continue;
            }
            if let Some(diff) = style_diff(&pen, &cell.style, self.sgr_policy) {
                out.push_str(&diff);
                pen = cell.style;
            }
            if cell.hyperlink.uri != pen_link.uri || cell.hyperlink.params != pen_link.params {
                out.push_str(&ansi::osc8(&cell.hyperlink.params, &cell.hyperlink.uri));
                pen_link = cell.hyperlink.clone();
            }
            out.push_str(&cell.character.grapheme);
        }
        out.push_str(ansi::SGR_RESET);
        out.push_str("\r\n");
        writer.write_all(out.as_bytes())?;
        let _ = writer.flush();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shadow::Shadow;

    #[test]
    fn unchanged_screen_emits_only_framing() {
        let screen = Screen::new(4, 2);
        let mut shadow = Shadow::new(4, 2);
        let mut renderer = Renderer::new(Capabilities::none());
        let mut buf = Vec::new();
        renderer.render(&screen, &mut shadow, &mut buf, false).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains(ansi::SYNC_SET));
        assert!(text.contains(ansi::SYNC_RESET));
        assert!(!text.contains("\x1b[1m"));
    }

    #[test]
    fn changed_cell_emits_grapheme() {
        let mut screen = Screen::new(4, 2);
        screen.write_cell(0, 0, Cell::from_char('x'));
        let mut shadow = Shadow::new(4, 2);
        let mut renderer = Renderer::new(Capabilities::none());
        let mut buf = Vec::new();
        renderer.render(&screen, &mut shadow, &mut buf, false).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains('x'));
    }

    #[test]
    fn rendering_twice_is_idempotent_after_first_pass() {
        let mut screen = Screen::new(4, 2);
        screen.write_cell(0, 0, Cell::from_char('x'));
        let mut shadow = Shadow::new(4, 2);
        let mut renderer = Renderer::new(Capabilities::none());
        let mut buf = Vec::new();
        renderer.render(&screen, &mut shadow, &mut buf, false).unwrap();
        let mut buf2 = Vec::new();
        renderer.render(&screen, &mut shadow, &mut buf2, false).unwrap();
        let text2 = String::from_utf8(buf2).unwrap();
        assert!(!text2.contains('x'));
    }

    #[test]
    fn indexed_color_zero_to_seven_uses_short_form() {
        use vaxis_style::Color;
        let prev = Style::default();
        let next = Style::new().fg(Color::indexed(3));
        let diff = style_diff(&prev, &next, SgrPolicy::Standard).unwrap();
        assert_eq!(diff, "\x1b[33m");
    }

    #[test]
    fn indexed_color_eight_to_fifteen_uses_bright_form() {
        use vaxis_style::Color;
        let prev = Style::default();
        let next = Style::new().fg(Color::indexed(9));
        let diff = style_diff(&prev, &next, SgrPolicy::Standard).unwrap();
        assert_eq!(diff, "\x1b[91m");
    }

    #[test]
    fn pretty_print_skips_default_cells() {
        let mut screen = Screen::new(3, 1);
        screen.write_cell(1, 0, Cell::from_char('m'));
        let renderer = Renderer::new(Capabilities::none());
        let mut buf = Vec::new();
        renderer.pretty_print(&screen, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "m\x1b[0m\r\n");
    }
}
