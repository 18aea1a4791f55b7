//! A value-type view onto [`Screen`] that applications draw into (§4.3).
//!
//! A `Window` never outlives the frame it was created for: it borrows
//! `Screen` mutably, carries no reference to its parent, and is unaware
//! of resizes that happen between frames. Child windows accumulate clip
//! offsets rather than nesting borrows.

use vaxis_core::event::Mouse;
use vaxis_core::text_width::{self, Method};
use vaxis_style::{Hyperlink, Style};

use crate::cell::Cell;
use crate::screen::{CursorShape, Screen};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderGlyphs {
    SingleRounded,
    SingleSquare,
    Custom([char; 6]),
}

impl BorderGlyphs {
    /// `{top_left, horizontal, top_right, vertical, bottom_right, bottom_left}`.
    const fn chars(self) -> [char; 6] {
        match self {
            Self::SingleRounded => ['╭', '─', '╮', '│', '╯', '╰'],
            Self::SingleSquare => ['┌', '─', '┐', '│', '┘', '└'],
            Self::Custom(chars) => chars,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ChildOpts {
    pub x: i32,
    pub y: i32,
    pub width: u16,
    pub height: u16,
    pub border: Option<BorderGlyphs>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapMode {
    Grapheme,
    Word,
    None,
}

#[derive(Debug, Clone, Copy)]
pub struct PrintOptions {
    pub wrap: WrapMode,
    pub commit: bool,
    pub start_col: u16,
    pub start_row: u16,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self { wrap: WrapMode::Grapheme, commit: true, start_col: 0, start_row: 0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintResult {
    pub col: u16,
    pub row: u16,
    pub overflow: bool,
}

/// A styled, optionally linked run of text, the unit `print` consumes.
#[derive(Debug, Clone)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub style: Style,
    pub hyperlink: Hyperlink,
}

impl<'a> Segment<'a> {
    #[must_use]
    pub fn plain(text: &'a str) -> Self {
        Self { text, style: Style::default(), hyperlink: Hyperlink::default() }
    }

    #[must_use]
    pub fn styled(text: &'a str, style: Style) -> Self {
        Self { text, style, hyperlink: Hyperlink::default() }
    }
}

pub struct Window<'s> {
    screen: &'s mut Screen,
    pub x_off: i32,
    pub y_off: i32,
    pub parent_x_off: i32,
    pub parent_y_off: i32,
    pub width: u16,
    pub height: u16,
}

impl<'s> Window<'s> {
    /// A window covering the whole of `screen`.
    pub fn root(screen: &'s mut Screen) -> Self {
        let (width, height) = (screen.width(), screen.height());
        Self { screen, x_off: 0, y_off: 0, parent_x_off: 0, parent_y_off: 0, width, height }
    }

    fn width_method(&self) -> Method {
        self.screen.width_method
    }

    #[inline]
    fn translate(&self, col: u16, row: u16) -> Option<(u16, u16)> {
        if col >= self.width || row >= self.height {
            return None;
        }
        let abs_col = self.x_off + col as i32;
        let abs_row = self.y_off + row as i32;
        let parent_col = self.parent_x_off + col as i32;
        let parent_row = self.parent_y_off + row as i32;
        if abs_col < 0 || abs_row < 0 || parent_col < 0 || parent_row < 0 {
            return None;
        }
        Some((abs_col as u16, abs_row as u16))
    }

    pub fn write_cell(&mut self, col: u16, row: u16, cell: Cell) {
        if let Some((abs_col, abs_row)) = self.translate(col, row) {
            self.screen.write_cell(abs_col, abs_row, cell);
        }
    }

    #[must_use]
    pub fn read_cell(&self, col: u16, row: u16) -> Option<&Cell> {
        let (abs_col, abs_row) = self.translate(col, row)?;
        self.screen.read_cell(abs_col, abs_row)
    }

    fn mark_wrapped(&mut self, col: u16, row: u16) {
        if let Some(cell) = self.read_cell(col, row) {
            let mut cell = cell.clone();
            cell.wrapped = true;
            self.write_cell(col, row, cell);
        }
    }

    /// Full-window fill. Uses a single contiguous slice write when the
    /// window spans the screen's entire row width; otherwise writes one
    /// row at a time.
    pub fn fill(&mut self, cell: Cell) {
        let full_width = self.x_off == 0 && self.parent_x_off == 0 && self.width == self.screen.width();
        if full_width {
            let w = self.screen.width() as usize;
            let buf = self.screen.cells_mut();
            for r in 0..self.height as i32 {
                let abs_row = self.y_off + r;
                if abs_row < 0 {
                    continue;
                }
                let start = abs_row as usize * w;
                let Some(slice) = buf.get_mut(start..start + w) else { break };
                for c in slice {
                    *c = cell.clone();
                }
            }
        } else {
            for row in 0..self.height {
                for col in 0..self.width {
                    self.write_cell(col, row, cell.clone());
                }
            }
        }
    }

    pub fn clear(&mut self) {
        self.fill(Cell::default());
    }

    /// Move rows `[n, height)` up by `n`, then clear the bottom `n` rows.
    /// `n > height` is a no-op.
    pub fn scroll(&mut self, n: u16) {
        if n == 0 || n > self.height {
            return;
        }
        crate::trace!(n, height = self.height, "window: scroll rows");
        for row in 0..(self.height - n) {
            for col in 0..self.width {
                if let Some(cell) = self.read_cell(col, row + n).cloned() {
                    self.write_cell(col, row, cell);
                }
            }
        }
        for row in (self.height - n)..self.height {
            for col in 0..self.width {
                self.write_cell(col, row, Cell::default());
            }
        }
    }

    pub fn show_cursor(&mut self, col: u16, row: u16) {
        if let Some((abs_col, abs_row)) = self.translate(col, row) {
            self.screen.cursor_col = abs_col;
            self.screen.cursor_row = abs_row;
            self.screen.cursor_visible = true;
        }
    }

    pub fn hide_cursor(&mut self) {
        self.screen.cursor_visible = false;
    }

    pub fn set_cursor_shape(&mut self, shape: CursorShape) {
        self.screen.cursor_shape = shape;
    }

    /// `Some(event)` iff its absolute coordinates fall inside this window.
    #[must_use]
    pub fn has_mouse(&self, event: Mouse) -> Option<Mouse> {
        let local_col = event.col as i32 - self.x_off;
        let local_row = event.row as i32 - self.y_off;
        if local_col >= 0 && local_row >= 0 && (local_col as u16) < self.width && (local_row as u16) < self.height {
            Some(event)
        } else {
            None
        }
    }

    fn draw_border(&mut self, glyphs: BorderGlyphs) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let [tl, h, tr, v, br, bl] = glyphs.chars();
        let last_col = self.width - 1;
        let last_row = self.height - 1;
        self.write_cell(0, 0, Cell::from_char(tl));
        self.write_cell(last_col, 0, Cell::from_char(tr));
        self.write_cell(0, last_row, Cell::from_char(bl));
        self.write_cell(last_col, last_row, Cell::from_char(br));
        for col in 1..last_col {
            self.write_cell(col, 0, Cell::from_char(h));
            self.write_cell(col, last_row, Cell::from_char(h));
        }
        for row in 1..last_row {
            self.write_cell(0, row, Cell::from_char(v));
            self.write_cell(last_col, row, Cell::from_char(v));
        }
    }

    fn inset(self, n: u16) -> Window<'s> {
        Window {
            screen: self.screen,
            x_off: self.x_off + n as i32,
            y_off: self.y_off + n as i32,
            parent_x_off: self.parent_x_off,
            parent_y_off: self.parent_y_off,
            width: self.width.saturating_sub(2 * n),
            height: self.height.saturating_sub(2 * n),
        }
    }

    /// Create a child window, clamped to this window's residual area.
    /// Positive offsets are absorbed directly; negative offsets (a child
    /// drawn above or left of this window) accumulate into the child's
    /// parent-clip offset so it stays correctly clipped.
    pub fn child(&mut self, opts: ChildOpts) -> Window<'_> {
        let residual_w = (self.width as i32 - opts.x.max(0)).max(0) as u16;
        let residual_h = (self.height as i32 - opts.y.max(0)).max(0) as u16;
        let mut child = Window {
            screen: self.screen,
            x_off: self.x_off + opts.x,
            y_off: self.y_off + opts.y,
            parent_x_off: self.parent_x_off + opts.x.min(0),
            parent_y_off: self.parent_y_off + opts.y.min(0),
            width: opts.width.min(residual_w),
            height: opts.height.min(residual_h),
        };
        if let Some(glyphs) = opts.border {
            child.draw_border(glyphs);
            child = child.inset(1);
        }
        child
    }

    pub fn print(&mut self, segments: &[Segment<'_>], opts: PrintOptions) -> PrintResult {
        crate::debug!(wrap = ?opts.wrap, start_col = opts.start_col, start_row = opts.start_row, "window: print dispatch");
        let result = match opts.wrap {
            WrapMode::Grapheme => self.print_grapheme(segments, opts),
            WrapMode::Word => self.print_word(segments, opts),
            WrapMode::None => self.print_none(segments, opts),
        };
        if result.overflow {
            crate::debug!(col = result.col, row = result.row, "window: print overflowed window bounds");
        }
        result
    }

    fn emit(&mut self, col: u16, row: u16, grapheme: &str, seg: &Segment<'_>, commit: bool) {
        if !commit {
            return;
        }
        crate::trace!(col, row, grapheme = %grapheme, "window: emit cell");
        let cell = Cell {
            character: crate::cell::Character::new(grapheme),
            style: seg.style,
            hyperlink: seg.hyperlink.clone(),
            image: None,
            scale: Default::default(),
            default: false,
            wrapped: false,
        };
        self.write_cell(col, row, cell);
    }

    fn print_grapheme(&mut self, segments: &[Segment<'_>], opts: PrintOptions) -> PrintResult {
        let method = self.width_method();
        let (mut col, mut row) = (opts.start_col, opts.start_row);
        let mut overflow = false;
        'outer: for seg in segments {
            for (start, len) in text_width::graphemes(seg.text) {
                let g = &seg.text[start..start + len];
                if g == "\n" {
                    row += 1;
                    col = 0;
                    if row >= self.height {
                        overflow = true;
                        break 'outer;
                    }
                    continue;
                }
                let gw = text_width::gwidth(g, method).max(0) as u16;
                if gw == 0 {
                    continue;
                }
                if col + gw > self.width {
                    if col > 0 {
                        self.mark_wrapped(col - 1, row);
                    }
                    row += 1;
                    col = 0;
                    if row >= self.height {
                        overflow = true;
                        break 'outer;
                    }
                }
                self.emit(col, row, g, seg, opts.commit);
                col += gw;
            }
        }
        PrintResult { col, row, overflow }
    }

    fn print_none(&mut self, segments: &[Segment<'_>], opts: PrintOptions) -> PrintResult {
        let method = self.width_method();
        let (mut col, row) = (opts.start_col, opts.start_row);
        let mut overflow = false;
        'outer: for seg in segments {
            for (start, len) in text_width::graphemes(seg.text) {
                let g = &seg.text[start..start + len];
                if g == "\n" {
                    overflow = true;
                    break 'outer;
                }
                let gw = text_width::gwidth(g, method).max(0) as u16;
                if gw == 0 {
                    continue;
                }
                if col + gw > self.width {
                    overflow = true;
                    break 'outer;
                }
                self.emit(col, row, g, seg, opts.commit);
                col += gw;
            }
        }
        PrintResult { col, row, overflow }
    }

    fn print_word(&mut self, segments: &[Segment<'_>], opts: PrintOptions) -> PrintResult {
        let method = self.width_method();
        let (mut col, mut row) = (opts.start_col, opts.start_row);
        let mut overflow = false;
        let mut at_soft_wrap = false;

        'outer: for seg in segments {
            let graphemes: Vec<(&str, u16)> = text_width::graphemes(seg.text)
                .map(|(start, len)| {
                    let g = &seg.text[start..start + len];
                    (g, text_width::gwidth(g, method).max(0) as u16)
                })
                .collect();
            let mut i = 0;
            while i < graphemes.len() {
                let (g, _) = graphemes[i];
                if g == "\n" || g == "\r" {
                    if g == "\r" && graphemes.get(i + 1).map(|(g, _)| *g) == Some("\n") {
                        i += 1;
                    }
                    row += 1;
                    col = 0;
                    at_soft_wrap = false;
                    i += 1;
                    if row >= self.height {
                        overflow = true;
                        break 'outer;
                    }
                    continue;
                }
                let is_space = g == " " || g == "\t";
                if is_space {
                    let run_start = i;
                    while i < graphemes.len() {
                        let (g, _) = graphemes[i];
                        if g == " " || g == "\t" {
                            i += 1;
                        } else {
                            break;
                        }
                    }
                    if at_soft_wrap && col == 0 {
                        // Collapse leading whitespace on a soft-wrapped row.
                        continue;
                    }
                    for &(g, _) in &graphemes[run_start..i] {
                        let gw = if g == "\t" { 8 } else { 1 };
                        if col + gw > self.width {
                            if col > 0 {
                                self.mark_wrapped(col - 1, row);
                            }
                            row += 1;
                            col = 0;
                            at_soft_wrap = true;
                            if row >= self.height {
                                overflow = true;
                                break 'outer;
                            }
                        }
                        self.emit(col, row, if g == "\t" { " " } else { g }, seg, opts.commit);
                        col += gw;
                    }
                    continue;
                }

                let word_start = i;
                let mut word_width: u32 = 0;
                while i < graphemes.len() {
                    let (g, gw) = graphemes[i];
                    if g == " " || g == "\t" || g == "\n" || g == "\r" {
                        break;
                    }
                    word_width += gw as u32;
                    i += 1;
                }
                let word = &graphemes[word_start..i];

                if word_width <= self.width as u32 && col as u32 + word_width > self.width as u32 {
                    row += 1;
                    col = 0;
                    at_soft_wrap = true;
                    if row >= self.height {
                        overflow = true;
                        break 'outer;
                    }
                }
                for &(g, gw) in word {
                    if col + gw > self.width {
                        if col > 0 {
                            self.mark_wrapped(col - 1, row);
                        }
                        row += 1;
                        col = 0;
                        if row >= self.height {
                            overflow = true;
                            break 'outer;
                        }
                    }
                    self.emit(col, row, g, seg, opts.commit);
                    col += gw;
                    at_soft_wrap = false;
                }
            }
        }
        PrintResult { col, row, overflow }
    }
}

// Kept for call sites that don't want to name the lifetime explicitly.
pub type RootWindow<'s> = Window<'s>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::Screen;

    #[test]
    fn write_through_window_lands_at_offset() {
        let mut screen = Screen::new(10, 10);
        let mut win = Window { screen: &mut screen, x_off: 2, y_off: 3, parent_x_off: 0, parent_y_off: 0, width: 4, height: 4 };
        win.write_cell(1, 1, Cell::from_char('z'));
        assert_eq!(screen.read_cell(3, 4).unwrap().character.grapheme.as_ref(), "z");
    }

    #[test]
    fn negative_parent_offset_clips_write() {
        let mut screen = Screen::new(10, 10);
        let mut win = Window { screen: &mut screen, x_off: 0, y_off: 0, parent_x_off: -2, parent_y_off: 0, width: 5, height: 5 };
        win.write_cell(0, 0, Cell::from_char('z'));
        assert!(screen.read_cell(0, 0).unwrap().default);
    }

    #[test]
    fn fill_covers_whole_window() {
        let mut screen = Screen::new(3, 3);
        let mut win = Window::root(&mut screen);
        win.fill(Cell::from_char('#'));
        for row in 0..3 {
            for col in 0..3 {
                assert_eq!(screen.read_cell(col, row).unwrap().character.grapheme.as_ref(), "#");
            }
        }
    }

    #[test]
    fn scroll_moves_rows_up_and_clears_tail() {
        let mut screen = Screen::new(2, 3);
        let mut win = Window::root(&mut screen);
        win.write_cell(0, 0, Cell::from_char('a'));
        win.write_cell(0, 1, Cell::from_char('b'));
        win.write_cell(0, 2, Cell::from_char('c'));
        win.scroll(1);
        assert_eq!(win.read_cell(0, 0).unwrap().character.grapheme.as_ref(), "b");
        assert_eq!(win.read_cell(0, 1).unwrap().character.grapheme.as_ref(), "c");
        assert!(win.read_cell(0, 2).unwrap().default);
    }

    #[test]
    fn has_mouse_inside_and_outside() {
        let mut screen = Screen::new(10, 10);
        let win = Window { screen: &mut screen, x_off: 2, y_off: 2, parent_x_off: 0, parent_y_off: 0, width: 3, height: 3 };
        let inside = Mouse { col: 3, row: 3, pixel_offset: None, button: vaxis_core::event::MouseButton::Left, mods: vaxis_core::event::MouseMods::empty(), kind: vaxis_core::event::MouseEventKind::Press };
        let outside = Mouse { col: 9, row: 9, ..inside };
        assert_eq!(win.has_mouse(inside), Some(inside));
        assert_eq!(win.has_mouse(outside), None);
    }

    #[test]
    fn child_with_border_insets_by_one() {
        let mut screen = Screen::new(10, 10);
        let mut root = Window::root(&mut screen);
        let inner = root.child(ChildOpts { x: 0, y: 0, width: 5, height: 5, border: Some(BorderGlyphs::SingleSquare) });
        assert_eq!(inner.width, 3);
        assert_eq!(inner.height, 3);
        assert_eq!(inner.x_off, 1);
        assert_eq!(inner.y_off, 1);
    }

    #[test]
    fn grapheme_wrap_overflows_as_in_spec_scenario() {
        let mut screen = Screen::new(4, 2);
        let mut win = Window::root(&mut screen);
        let seg = [Segment::plain("abcdefghi")];
        let result = win.print(&seg, PrintOptions { wrap: WrapMode::Grapheme, commit: false, ..Default::default() });
        assert_eq!(result, PrintResult { col: 0, row: 2, overflow: true });
    }

    #[test]
    fn word_wrap_hello_tim_overflows() {
        let mut screen = Screen::new(4, 2);
        let mut win = Window::root(&mut screen);
        let seg = [Segment::plain("hello tim")];
        let result = win.print(&seg, PrintOptions { wrap: WrapMode::Word, commit: false, ..Default::default() });
        assert_eq!(result, PrintResult { col: 0, row: 2, overflow: true });
    }

    #[test]
    fn word_wrap_hi_tim_fits() {
        let mut screen = Screen::new(4, 2);
        let mut win = Window::root(&mut screen);
        let seg = [Segment::plain("hi tim")];
        let result = win.print(&seg, PrintOptions { wrap: WrapMode::Word, commit: false, ..Default::default() });
        assert_eq!(result, PrintResult { col: 3, row: 1, overflow: false });
    }

    #[test]
    fn none_wrap_stops_at_first_overflowing_grapheme() {
        let mut screen = Screen::new(4, 2);
        let mut win = Window::root(&mut screen);
        let seg = [Segment::plain("abcdefghi")];
        let result = win.print(&seg, PrintOptions { wrap: WrapMode::None, commit: false, ..Default::default() });
        assert_eq!(result, PrintResult { col: 4, row: 0, overflow: true });
    }

    #[test]
    fn commit_false_does_not_mutate_screen() {
        let mut screen = Screen::new(4, 2);
        let mut win = Window::root(&mut screen);
        let seg = [Segment::plain("ab")];
        win.print(&seg, PrintOptions { wrap: WrapMode::Grapheme, commit: false, ..Default::default() });
        assert!(screen.read_cell(0, 0).unwrap().default);
    }
}
