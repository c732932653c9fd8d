//! Dual-mode off-screen drawing buffer with compositing.
//!
//! A [`Canvas`] is either a grid of character cells (`(char, fg, bg)`) or a
//! grid of pixels (one color each, two pixel rows per character row on
//! output). Frames own a canvas each; drawing happens off-screen and is then
//! flushed into the parent canvas, optionally through a clip rectangle. Since
//! the destination offset is the translation minus the clip origin, moving
//! the clip rectangle is all it takes to scroll.
//!
//! Out-of-bounds writes are dropped silently.

use std::io;

use super::color::{IntoRgb, Rgb};
use super::surface::Surface;
use crate::error::Result;
use crate::geometry::{Offset, Region, Size};

// ---------------------------------------------------------------------------
// Cell / RenderMode
// ---------------------------------------------------------------------------

/// How a canvas stores its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// One glyph with colors per cell.
    Cell,
    /// One color per pixel; two pixel rows per character row on output.
    Pixel,
}

/// A character cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Rgb,
    pub bg: Rgb,
}

impl Cell {
    /// A space, white on black.
    pub const BLANK: Cell = Cell { ch: ' ', fg: Rgb::WHITE, bg: Rgb::BLACK };

    /// Create a cell.
    pub const fn new(ch: char, fg: Rgb, bg: Rgb) -> Self {
        Self { ch, fg, bg }
    }
}

/// Pixel color treated as empty by the half-block collapse.
pub const BACKGROUND: Rgb = Rgb::BLACK;

/// Collapse a vertical pixel pair into one character cell.
pub fn half_block(top: Rgb, bottom: Rgb) -> Cell {
    match (top != BACKGROUND, bottom != BACKGROUND) {
        (true, true) => Cell::new('█', top, bottom),
        (true, false) => Cell::new('▀', top, BACKGROUND),
        (false, true) => Cell::new('▄', bottom, BACKGROUND),
        (false, false) => Cell::new(' ', Rgb::WHITE, BACKGROUND),
    }
}

/// Expand a character cell into its `(top, bottom)` pixel pair. The unlit
/// half of a half block is always the background.
fn cell_pixels(cell: Cell) -> (Rgb, Rgb) {
    match cell.ch {
        '█' => (cell.fg, cell.fg),
        '▀' => (cell.fg, BACKGROUND),
        '▄' => (BACKGROUND, cell.fg),
        _ => (cell.bg, cell.bg),
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Buffer {
    Cells(Vec<Cell>),
    Pixels(Vec<Rgb>),
}

// ---------------------------------------------------------------------------
// Canvas
// ---------------------------------------------------------------------------

/// An off-screen buffer of cells or pixels with fixed dimensions.
///
/// Dimensions are in the canvas's own units: cells for [`RenderMode::Cell`],
/// pixels for [`RenderMode::Pixel`].
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    width: i32,
    height: i32,
    fg: Rgb,
    bg: Rgb,
    buffer: Buffer,
}

impl Canvas {
    /// Create a blank canvas. Negative dimensions are clamped to zero.
    pub fn new(width: i32, height: i32, mode: RenderMode) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        let len = (width * height) as usize;
        let buffer = match mode {
            RenderMode::Cell => Buffer::Cells(vec![Cell::BLANK; len]),
            RenderMode::Pixel => Buffer::Pixels(vec![BACKGROUND; len]),
        };
        Self { width, height, fg: Rgb::WHITE, bg: Rgb::BLACK, buffer }
    }

    /// Width in the canvas's units.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Height in the canvas's units.
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Dimensions as a [`Size`].
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// The storage mode.
    pub fn mode(&self) -> RenderMode {
        match self.buffer {
            Buffer::Cells(_) => RenderMode::Cell,
            Buffer::Pixels(_) => RenderMode::Pixel,
        }
    }

    /// Current foreground color.
    pub fn fg(&self) -> Rgb {
        self.fg
    }

    /// Current background color.
    pub fn bg(&self) -> Rgb {
        self.bg
    }

    /// Set the foreground color from a tuple or three channels.
    pub fn set_color_fg(&mut self, color: impl IntoRgb) -> Result<()> {
        self.fg = color.into_rgb()?;
        Ok(())
    }

    /// Set the background color from a tuple or three channels.
    pub fn set_color_bg(&mut self, color: impl IntoRgb) -> Result<()> {
        self.bg = color.into_rgb()?;
        Ok(())
    }

    /// Set both colors.
    pub fn set_colors(&mut self, fg: Rgb, bg: Rgb) {
        self.fg = fg;
        self.bg = bg;
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.size().contains(x, y).then(|| (y * self.width + x) as usize)
    }

    // -- reading ---------------------------------------------------------

    /// The cell at a position (cell mode only).
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        let i = self.index(x, y)?;
        match &self.buffer {
            Buffer::Cells(cells) => cells.get(i).copied(),
            Buffer::Pixels(_) => None,
        }
    }

    /// The pixel at a position (pixel mode only).
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb> {
        let i = self.index(x, y)?;
        match &self.buffer {
            Buffer::Pixels(pixels) => pixels.get(i).copied(),
            Buffer::Cells(_) => None,
        }
    }

    /// The glyph at a cell position, collapsing pixels when needed.
    ///
    /// In pixel mode `y` addresses a character row, i.e. two pixel rows.
    pub fn cell_at(&self, x: i32, y: i32) -> Option<Cell> {
        match &self.buffer {
            Buffer::Cells(_) => self.get(x, y),
            Buffer::Pixels(_) => {
                let top = self.pixel(x, y * 2)?;
                let bottom = self.pixel(x, y * 2 + 1).unwrap_or(BACKGROUND);
                Some(half_block(top, bottom))
            }
        }
    }

    // -- drawing ---------------------------------------------------------

    fn put_cell(&mut self, x: i32, y: i32, cell: Cell) {
        if let (Some(i), Buffer::Cells(cells)) = (self.index(x, y), &mut self.buffer) {
            cells[i] = cell;
        }
    }

    /// Set one pixel (pixel mode only).
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgb) {
        if let (Some(i), Buffer::Pixels(pixels)) = (self.index(x, y), &mut self.buffer) {
            pixels[i] = color;
        }
    }

    /// Draw one glyph with the current colors.
    ///
    /// In pixel mode the glyph is expanded into its two pixels at character
    /// row `y`; glyphs other than the block characters paint the background.
    pub fn draw_char(&mut self, x: i32, y: i32, ch: char) {
        let cell = Cell::new(ch, self.fg, self.bg);
        match self.buffer {
            Buffer::Cells(_) => self.put_cell(x, y, cell),
            Buffer::Pixels(_) => {
                let (top, bottom) = cell_pixels(cell);
                self.set_pixel(x, y * 2, top);
                self.set_pixel(x, y * 2 + 1, bottom);
            }
        }
    }

    /// Draw a string left to right starting at `(x, y)`.
    pub fn text(&mut self, x: i32, y: i32, s: &str) {
        for (i, ch) in s.chars().enumerate() {
            self.draw_char(x + i as i32, y, ch);
        }
    }

    /// Paint the inclusive rectangle `(x1, y1)..=(x2, y2)` with the
    /// background color.
    pub fn fillbox(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        let area = Region::from_corners(x1, y1, x2, y2).intersection(self.size().to_region());
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                match self.buffer {
                    Buffer::Cells(_) => self.put_cell(x, y, Cell::new(' ', self.fg, self.bg)),
                    Buffer::Pixels(_) => self.set_pixel(x, y, self.bg),
                }
            }
        }
    }

    /// Plot one point in the foreground color: a pixel, or a full block cell.
    fn plot(&mut self, x: i32, y: i32) {
        match self.buffer {
            Buffer::Cells(_) => self.put_cell(x, y, Cell::new('█', self.fg, self.bg)),
            Buffer::Pixels(_) => self.set_pixel(x, y, self.fg),
        }
    }

    /// Draw a straight line between two points (Bresenham).
    pub fn line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        let dx = (x2 - x1).abs();
        let dy = -(y2 - y1).abs();
        let sx = if x1 < x2 { 1 } else { -1 };
        let sy = if y1 < y2 { 1 } else { -1 };
        let (mut x, mut y) = (x1, y1);
        let mut err = dx + dy;
        loop {
            self.plot(x, y);
            if x == x2 && y == y2 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Horizontal line of `len` points starting at `(x, y)`.
    pub fn hline(&mut self, x: i32, y: i32, len: i32) {
        for i in 0..len.max(0) {
            self.plot(x + i, y);
        }
    }

    /// Vertical line of `len` points starting at `(x, y)`.
    pub fn vline(&mut self, x: i32, y: i32, len: i32) {
        for i in 0..len.max(0) {
            self.plot(x, y + i);
        }
    }

    /// Outline of the inclusive rectangle `(x1, y1)..=(x2, y2)`.
    pub fn rect(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        let w = x2 - x1 + 1;
        let h = y2 - y1 + 1;
        self.hline(x1, y1, w);
        self.hline(x1, y2, w);
        self.vline(x1, y1, h);
        self.vline(x2, y1, h);
    }

    /// Reset every cell to a blank in the default colors.
    ///
    /// The buffer is reused, not reallocated.
    pub fn clear(&mut self) {
        self.clear_with(Rgb::WHITE, Rgb::BLACK);
    }

    /// Repaint the colors of every cell in `area`, keeping the glyphs
    /// (pixels take `bg`).
    pub fn recolor(&mut self, area: Region, fg: Rgb, bg: Rgb) {
        let area = area.intersection(self.size().to_region());
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                match self.get(x, y) {
                    Some(cell) => self.put_cell(x, y, Cell::new(cell.ch, fg, bg)),
                    None => self.set_pixel(x, y, bg),
                }
            }
        }
    }

    /// Reset every cell to a blank in the given colors (pixels take `bg`).
    pub fn clear_with(&mut self, fg: Rgb, bg: Rgb) {
        match &mut self.buffer {
            Buffer::Cells(cells) => cells.fill(Cell::new(' ', fg, bg)),
            Buffer::Pixels(pixels) => pixels.fill(bg),
        }
    }

    // -- compositing -----------------------------------------------------

    /// The part of this canvas a flush reads: the clip rectangle, if any,
    /// restricted to the canvas bounds.
    fn source_area(&self, clip: Option<Region>) -> (Region, Offset) {
        let bounds = self.size().to_region();
        match clip {
            Some(c) => (c.intersection(bounds), c.offset()),
            None => (bounds, Offset::default()),
        }
    }

    /// Composite this canvas into `target`.
    ///
    /// Source cells inside `clip` (the whole canvas when `None`) land at
    /// `start + (src - clip origin)`, in the target's units. Pixel sources
    /// collapse two rows per character row when the target is cell mode;
    /// cell sources expand into two pixel rows when the target is pixel mode.
    pub fn flush_into(&self, target: &mut Canvas, start: Offset, clip: Option<Region>) {
        let (area, origin) = self.source_area(clip);
        match (&self.buffer, target.mode()) {
            (Buffer::Cells(_), RenderMode::Cell) | (Buffer::Pixels(_), RenderMode::Pixel) => {
                for y in area.y..area.bottom() {
                    for x in area.x..area.right() {
                        let dx = start.x + x - origin.x;
                        let dy = start.y + y - origin.y;
                        match &self.buffer {
                            Buffer::Cells(_) => {
                                if let Some(cell) = self.get(x, y) {
                                    target.put_cell(dx, dy, cell);
                                }
                            }
                            Buffer::Pixels(_) => {
                                if let Some(color) = self.pixel(x, y) {
                                    target.set_pixel(dx, dy, color);
                                }
                            }
                        }
                    }
                }
            }
            (Buffer::Pixels(_), RenderMode::Cell) => {
                for y in (area.y..area.bottom()).step_by(2) {
                    for x in area.x..area.right() {
                        let top = self.pixel(x, y).unwrap_or(BACKGROUND);
                        let bottom = if y + 1 < area.bottom() {
                            self.pixel(x, y + 1).unwrap_or(BACKGROUND)
                        } else {
                            BACKGROUND
                        };
                        let dx = start.x + x - origin.x;
                        let dy = start.y + (y - area.y) / 2 + (area.y - origin.y) / 2;
                        target.put_cell(dx, dy, half_block(top, bottom));
                    }
                }
            }
            (Buffer::Cells(_), RenderMode::Pixel) => {
                for y in area.y..area.bottom() {
                    for x in area.x..area.right() {
                        let Some(cell) = self.get(x, y) else { continue };
                        let (top, bottom) = cell_pixels(cell);
                        let dx = start.x + x - origin.x;
                        let dy = start.y + (y - origin.y) * 2;
                        target.set_pixel(dx, dy, top);
                        target.set_pixel(dx, dy + 1, bottom);
                    }
                }
            }
        }
    }

    /// Composite this canvas onto a terminal surface.
    ///
    /// Each cell's colors go through the surface's pair table. A failed
    /// write skips that cell and the flush carries on.
    pub fn flush_to_surface(&self, surface: &mut dyn Surface, start: Offset, clip: Option<Region>) {
        let (area, origin) = self.source_area(clip);
        let put = |surface: &mut dyn Surface, x: i32, y: i32, cell: Cell| {
            let pair = surface.color_pair(cell.fg, cell.bg);
            if let Err(err) = surface.put(x, y, cell.ch, pair) {
                skip_cell(x, y, &err);
            }
        };
        match &self.buffer {
            Buffer::Cells(_) => {
                for y in area.y..area.bottom() {
                    for x in area.x..area.right() {
                        if let Some(cell) = self.get(x, y) {
                            put(surface, start.x + x - origin.x, start.y + y - origin.y, cell);
                        }
                    }
                }
            }
            Buffer::Pixels(_) => {
                for y in (area.y..area.bottom()).step_by(2) {
                    for x in area.x..area.right() {
                        let top = self.pixel(x, y).unwrap_or(BACKGROUND);
                        let bottom = if y + 1 < area.bottom() {
                            self.pixel(x, y + 1).unwrap_or(BACKGROUND)
                        } else {
                            BACKGROUND
                        };
                        let dy = start.y + (y - area.y) / 2 + (area.y - origin.y) / 2;
                        put(surface, start.x + x - origin.x, dy, half_block(top, bottom));
                    }
                }
            }
        }
    }
}

fn skip_cell(x: i32, y: i32, err: &io::Error) {
    tracing::trace!(x, y, %err, "terminal write failed, skipping cell");
}

// ===========================================================================
// Tests
// ===========================================================================
