//! Drawing the laid-out tree.
//!
//! Every container draws into its own canvas: the window into the root
//! canvas, each frame into the canvas attached to it. A frame's canvas is
//! flushed into its parent's through the frame's clip, so scrolled content
//! is a sub-rectangle copy.
//!
//! The active modal and the open dropdown are painted last, on top of
//! everything else; an opaque modal dims the window before it is drawn.

use super::canvas::{Canvas, RenderMode};
use super::color::Rgb;
use super::surface::Surface;
use crate::config::Options;
use crate::data::DataModel;
use crate::dom::{Element, ElementId, ElementTree, ModalKind, Tag, Visibility};
use crate::event::editing::scroll_start;
use crate::event::InteractionState;
use crate::geometry::{Offset, Region};
use crate::layout::measure::{button_label, display_text, explicit_size, menu_choice, menu_label};
use crate::layout::{LayoutResult, ZoneTarget};

pub const WINDOW_BG: Rgb = Rgb::new(0, 0, 246);
pub const WINDOW_FG: Rgb = Rgb::WHITE;
pub const TITLE_BG: Rgb = Rgb::new(227, 240, 236);
pub const CONTROL_BG: Rgb = Rgb::new(204, 204, 204);
pub const ACCENT_BG: Rgb = Rgb::new(100, 100, 100);
pub const BACKDROP_BG: Rgb = Rgb::new(51, 51, 51);
pub const BACKDROP_FG: Rgb = Rgb::new(128, 128, 128);

const EXIT_GLYPH: &str = "[X]";

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

/// Foreground and background in effect for an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub fg: Rgb,
    pub bg: Rgb,
}

impl Palette {
    pub const WINDOW: Palette = Palette { fg: WINDOW_FG, bg: WINDOW_BG };

    /// Apply an element's `foreground`/`background` attributes.
    pub fn with_element(self, el: &Element) -> Self {
        Self {
            fg: Rgb::parse_or(el.attr_any(&["foreground", "fg"]), self.fg),
            bg: Rgb::parse_or(el.attr_any(&["background", "bg"]), self.bg),
        }
    }

    /// The element's colors, falling back to fixed defaults instead of the
    /// inherited ones.
    fn own(el: &Element, fg: Rgb, bg: Rgb) -> Self {
        Palette { fg, bg }.with_element(el)
    }

    /// Bracket highlight for hovered or focused controls.
    const ACCENT: Palette = Palette { fg: Rgb::WHITE, bg: ACCENT_BG };
}

/// The palette in effect inside `id`, from the window down.
pub fn palette_of(tree: &ElementTree, id: ElementId) -> Palette {
    let mut chain = tree.ancestors(id);
    chain.reverse();
    chain.push(id);
    chain
        .into_iter()
        .filter_map(|a| tree.get(a))
        .fold(Palette::WINDOW, |p, el| p.with_element(el))
}

fn draw(canvas: &mut Canvas, x: i32, y: i32, s: &str, palette: Palette) {
    canvas.set_colors(palette.fg, palette.bg);
    canvas.text(x, y, s);
}

// ---------------------------------------------------------------------------
// Painter
// ---------------------------------------------------------------------------

/// One frame's drawing pass.
pub struct Painter<'a> {
    pub data: &'a DataModel,
    pub options: &'a Options,
    pub layout: &'a LayoutResult,
    pub state: &'a InteractionState,
}

impl Painter<'_> {
    /// Draw the whole window into `root`.
    pub fn paint(&self, tree: &mut ElementTree, root: &mut Canvas) {
        let window = palette_of(tree, tree.root());
        root.clear_with(window.fg, window.bg);
        if self.options.show_title_bar {
            self.title_bar(root);
        }

        let modal = self.layout.modal;
        let dropdown = self.layout.open_dropdown;
        let deferred: Vec<ElementId> = modal.map(|(id, _)| id).into_iter().chain(dropdown).collect();

        let window_id = tree.root();
        self.paint_children(tree, window_id, root, window, &deferred);

        if let Some((id, kind)) = modal {
            if kind == ModalKind::Opaque {
                root.recolor(self.layout.body, BACKDROP_FG, BACKDROP_BG);
            }
            self.paint_on_top(tree, id, root, &deferred);
        }
        if let Some(id) = dropdown {
            self.paint_on_top(tree, id, root, &deferred);
        }
    }

    /// Flush the root canvas to the surface, draw the window border on the
    /// surface and present.
    pub fn present(&self, tree: &ElementTree, root: &Canvas, surface: &mut dyn Surface) {
        root.flush_to_surface(surface, Offset::default(), None);

        let window = palette_of(tree, tree.root());
        let pair = surface.color_pair(window.fg, window.bg);
        let (w, h) = (self.layout.window.width, self.layout.window.height);
        let mut put = |x: i32, y: i32, ch: char| {
            if let Err(err) = surface.put(x, y, ch, pair) {
                tracing::trace!(x, y, %err, "terminal write failed, skipping cell");
            }
        };
        for y in self.layout.offset_y..h {
            put(0, y, '│');
            put(w - 1, y, '│');
        }
        for x in 0..w {
            put(x, h - 1, '─');
        }
        put(0, h - 1, '└');
        put(w - 1, h - 1, '┘');

        if let Err(err) = surface.present() {
            tracing::trace!(%err, "terminal present failed");
        }
    }

    fn title_bar(&self, root: &mut Canvas) {
        let bar = Palette { fg: Rgb::BLACK, bg: TITLE_BG };
        let w = self.layout.window.width;
        draw(root, 0, 0, &" ".repeat(w.max(0) as usize), bar);
        draw(root, 1, 0, &self.options.title, bar);
        if self.options.show_exit_button {
            let exit = if self.state.is_hovered(ZoneTarget::TitleExit) {
                Palette { fg: bar.bg, bg: bar.fg }
            } else {
                bar
            };
            draw(root, w - 4, 0, EXIT_GLYPH, exit);
        }
    }

    /// Draw an element that is painted after the rest, straight into the
    /// root canvas at its screen position.
    fn paint_on_top(&self, tree: &mut ElementTree, id: ElementId, root: &mut Canvas, deferred: &[ElementId]) {
        let Some(at) = self.layout.screen_region(id) else { return };
        let parent = tree.parent(id).map_or(Palette::WINDOW, |p| palette_of(tree, p));
        self.paint_frame(tree, id, root, at.offset(), parent, deferred);
    }

    fn paint_children(
        &self,
        tree: &mut ElementTree,
        container: ElementId,
        canvas: &mut Canvas,
        palette: Palette,
        deferred: &[ElementId],
    ) {
        let children = tree.children(container).to_vec();
        for child in children {
            if deferred.contains(&child) || tree.visibility(child) != Visibility::Visible {
                continue;
            }
            let Some(placement) = self.layout.placement(child) else { continue };
            let Some(tag) = tree.get(child).map(|el| el.tag) else { continue };
            if tag == Tag::Frame {
                self.paint_frame(tree, child, canvas, placement.local.offset(), palette, deferred);
                continue;
            }
            let Some(el) = tree.get(child) else { continue };
            if tag == Tag::Canvas {
                if let Some(own) = &el.canvas {
                    own.flush_into(canvas, placement.local.offset(), None);
                }
            } else {
                self.draw_control(child, el, canvas, placement.local, palette);
            }
        }
    }

    fn paint_frame(
        &self,
        tree: &mut ElementTree,
        id: ElementId,
        target: &mut Canvas,
        at: Offset,
        parent: Palette,
        deferred: &[ElementId],
    ) {
        let Some(frame) = self.layout.frame(id).copied() else { return };
        let Some(el) = tree.get(id) else { return };
        let palette = parent.with_element(el);
        let border = el.bool_attr("border");

        let mut canvas = match tree.take_canvas(id) {
            Some(c) if c.size() == frame.canvas_size => c,
            _ => Canvas::new(frame.canvas_size.width, frame.canvas_size.height, RenderMode::Cell),
        };
        canvas.clear_with(palette.fg, palette.bg);
        self.paint_children(tree, id, &mut canvas, palette, deferred);

        if border {
            let shown = frame.clip().unwrap_or_else(|| frame.frame_size.to_region());
            draw_border(&mut canvas, shown, palette);
        }
        canvas.flush_into(target, at, frame.clip());
        tree.restore_canvas(id, canvas);
    }

    // -- controls --------------------------------------------------------

    fn draw_control(&self, id: ElementId, el: &Element, canvas: &mut Canvas, at: Region, palette: Palette) {
        let highlighted = self.state.is_hovered(ZoneTarget::Element(id)) || self.state.focused() == Some(id);
        let (x, y) = (at.x, at.y);
        match el.tag {
            Tag::Label => {
                let colors = palette.with_element(el);
                for (i, line) in display_text(el, self.data).lines().enumerate() {
                    draw(canvas, x + 1, y + i as i32, line, colors);
                }
            }
            Tag::Entry => self.draw_entry(id, el, canvas, at),
            Tag::TextBox => self.draw_textbox(id, el, canvas, at),
            Tag::Button => {
                let label = button_label(el.text(), explicit_size(el).0);
                let colors = Palette::own(el, Rgb::BLACK, CONTROL_BG);
                draw_bracketed(canvas, x, y, &label, colors, highlighted, |i, len, _| i == 0 || i == len - 1);
            }
            Tag::CheckButton => {
                let checked = el.bind_key().and_then(|k| self.data.get(k)).is_some_and(|v| v.truthy());
                let label = format!("{} {}", if checked { "[x]" } else { "[ ]" }, el.text());
                let colors = palette.with_element(el);
                draw_bracketed(canvas, x, y, &label, colors, highlighted, |_, _, c| c == '[' || c == ']');
            }
            Tag::RadioButton => {
                let selected = match (el.bind_key(), el.attr("value")) {
                    (Some(key), Some(value)) => self.data.contains(key) && self.data.text(key) == value,
                    _ => false,
                };
                let label = format!("{} {}", if selected { "(o)" } else { "( )" }, el.text());
                let colors = palette.with_element(el);
                draw_bracketed(canvas, x, y, &label, colors, highlighted, |_, _, c| c == '(' || c == ')');
            }
            Tag::OptionMenu => {
                let label = menu_label(&menu_choice(el, self.data));
                let colors = Palette::own(el, Rgb::BLACK, CONTROL_BG);
                let inverted = Palette { fg: colors.bg, bg: colors.fg };
                for (i, ch) in label.chars().enumerate() {
                    let c = if highlighted && (ch == '[' || ch == ']') { inverted } else { colors };
                    canvas.set_colors(c.fg, c.bg);
                    canvas.draw_char(x + i as i32, y, ch);
                }
            }
            Tag::Window | Tag::Frame | Tag::Canvas => {}
        }
    }

    fn draw_entry(&self, id: ElementId, el: &Element, canvas: &mut Canvas, at: Region) {
        let colors = Palette::own(el, Rgb::BLACK, Rgb::WHITE);
        let text: Vec<char> = display_text(el, self.data).chars().collect();
        let width = at.width.max(0) as usize;
        let focused = self.state.focused() == Some(id);
        let cursor = if focused { self.state.cursor.min(text.len()) } else { text.len() };
        let start = scroll_start(text.len(), cursor, width);
        let show_cursor = focused && self.state.blink.is_visible();

        for i in 0..width {
            let ch = text.get(start + i).copied().unwrap_or(' ');
            let x = at.x + i as i32;
            if show_cursor && start + i == cursor {
                if self.state.overwrite {
                    canvas.set_colors(colors.bg, colors.fg);
                    canvas.draw_char(x, at.y, ch);
                } else {
                    canvas.set_colors(colors.fg, colors.bg);
                    canvas.draw_char(x, at.y, '_');
                }
            } else {
                canvas.set_colors(colors.fg, colors.bg);
                canvas.draw_char(x, at.y, ch);
            }
        }
    }

    fn draw_textbox(&self, id: ElementId, el: &Element, canvas: &mut Canvas, at: Region) {
        let colors = Palette::own(el, Rgb::BLACK, Rgb::WHITE);
        canvas.set_colors(colors.fg, colors.bg);
        canvas.fillbox(at.x, at.y, at.right() - 1, at.bottom() - 1);

        let text = display_text(el, self.data);
        let focused = self.state.focused() == Some(id);
        let cursor = if focused { self.state.cursor } else { text.chars().count() };
        let (row, col) = cursor_row_col(&text, cursor);
        let first_row = (row as i32 - at.height + 1).max(0) as usize;

        let lines: Vec<&str> = text.split('\n').collect();
        for (i, line) in lines.iter().skip(first_row).take(at.height.max(0) as usize).enumerate() {
            let visible: String = line.chars().take(at.width.max(0) as usize).collect();
            draw(canvas, at.x, at.y + i as i32, &visible, colors);
        }
        if focused && self.state.blink.is_visible() && (col as i32) < at.width {
            let y = at.y + (row - first_row) as i32;
            if self.state.overwrite {
                let under = lines.get(row).and_then(|l| l.chars().nth(col)).unwrap_or(' ');
                canvas.set_colors(colors.bg, colors.fg);
                canvas.draw_char(at.x + col as i32, y, under);
            } else {
                draw(canvas, at.x + col as i32, y, "_", colors);
            }
        }
    }
}

/// Draw `label` with the characters picked by `bracket` inverted when
/// highlighted.
fn draw_bracketed(
    canvas: &mut Canvas,
    x: i32,
    y: i32,
    label: &str,
    colors: Palette,
    highlighted: bool,
    bracket: impl Fn(usize, usize, char) -> bool,
) {
    let len = label.chars().count();
    for (i, ch) in label.chars().enumerate() {
        let c = if highlighted && bracket(i, len, ch) { Palette::ACCENT } else { colors };
        canvas.set_colors(c.fg, c.bg);
        canvas.draw_char(x + i as i32, y, ch);
    }
}

/// Box-drawing border along the edge of `area`.
fn draw_border(canvas: &mut Canvas, area: Region, palette: Palette) {
    let (x1, y1, x2, y2) = (area.x, area.y, area.right() - 1, area.bottom() - 1);
    if x2 <= x1 || y2 <= y1 {
        return;
    }
    canvas.set_colors(palette.fg, palette.bg);
    for x in x1 + 1..x2 {
        canvas.draw_char(x, y1, '─');
        canvas.draw_char(x, y2, '─');
    }
    for y in y1 + 1..y2 {
        canvas.draw_char(x1, y, '│');
        canvas.draw_char(x2, y, '│');
    }
    canvas.draw_char(x1, y1, '┌');
    canvas.draw_char(x2, y1, '┐');
    canvas.draw_char(x1, y2, '└');
    canvas.draw_char(x2, y2, '┘');
}

/// Line and column of a character index in multi-line text.
fn cursor_row_col(text: &str, cursor: usize) -> (usize, usize) {
    let mut row = 0;
    let mut col = 0;
    for ch in text.chars().take(cursor) {
        if ch == '\n' {
            row += 1;
            col = 0;
        } else {
            col += 1;
        }
    }
    (row, col)
}
