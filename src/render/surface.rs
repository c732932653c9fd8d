//! Terminal surfaces: the color-pair table and the `Surface` abstraction.
//!
//! A surface is a grid of terminal cells, each holding a glyph and a
//! color-pair id. Pair ids are resolved through [`ColorPairs`], a cache keyed
//! by the exact `(fg, bg)` tuple that hands out ids from a counter and falls
//! back to the default pair once the terminal's limit is reached.

use std::collections::HashMap;
use std::io;

use super::color::Rgb;
use crate::geometry::Size;

/// Identifier of a foreground/background color pair.
pub type PairId = u16;

/// The pair used when nothing better is available: white on black.
pub const DEFAULT_PAIR: PairId = 1;

// ---------------------------------------------------------------------------
// ColorPairs
// ---------------------------------------------------------------------------

/// Cache from `(fg, bg)` to pair ids. Never evicts.
#[derive(Debug, Clone)]
pub struct ColorPairs {
    cache: HashMap<(Rgb, Rgb), PairId>,
    /// Colors for each allocated id, indexed by `id - DEFAULT_PAIR`.
    pairs: Vec<(Rgb, Rgb)>,
    next: PairId,
    max: PairId,
    exhausted: bool,
}

impl ColorPairs {
    /// Create a table that allocates ids up to and including `max`.
    pub fn new(max: PairId) -> Self {
        Self {
            cache: HashMap::new(),
            pairs: vec![(Rgb::WHITE, Rgb::BLACK)],
            next: DEFAULT_PAIR + 1,
            max,
            exhausted: false,
        }
    }

    /// Resolve a pair id, allocating one if this combination is new.
    pub fn resolve(&mut self, fg: Rgb, bg: Rgb) -> PairId {
        if let Some(&id) = self.cache.get(&(fg, bg)) {
            return id;
        }
        if self.next > self.max {
            if !self.exhausted {
                tracing::warn!(max = self.max, "color-pair table exhausted, using default pair");
                self.exhausted = true;
            }
            return DEFAULT_PAIR;
        }
        let id = self.next;
        self.next += 1;
        self.cache.insert((fg, bg), id);
        self.pairs.push((fg, bg));
        id
    }

    /// The colors behind a pair id.
    pub fn colors(&self, id: PairId) -> Option<(Rgb, Rgb)> {
        let index = usize::from(id.checked_sub(DEFAULT_PAIR)?);
        self.pairs.get(index).copied()
    }

    /// Number of pairs allocated beyond the default.
    pub fn allocated(&self) -> usize {
        self.cache.len()
    }

    /// Whether an allocation has been refused.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}

// ---------------------------------------------------------------------------
// Surface
// ---------------------------------------------------------------------------

/// A cell grid that canvases are flushed onto.
pub trait Surface {
    /// Dimensions in cells.
    fn size(&self) -> Size;

    /// Resolve `(fg, bg)` to a pair id.
    fn color_pair(&mut self, fg: Rgb, bg: Rgb) -> PairId;

    /// Draw one glyph. Fails for positions the terminal rejects.
    fn put(&mut self, x: i32, y: i32, ch: char, pair: PairId) -> io::Result<()>;

    /// Make everything drawn since the last call visible.
    fn present(&mut self) -> io::Result<()>;
}

// ---------------------------------------------------------------------------
// HeadlessSurface
// ---------------------------------------------------------------------------

/// An in-memory surface for tests and offscreen rendering.
///
/// Writes outside the grid fail like a terminal racing a resize would.
#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    size: Size,
    cells: Vec<(char, PairId)>,
    pairs: ColorPairs,
    presented: usize,
}

impl HeadlessSurface {
    /// Create a blank surface.
    pub fn new(width: i32, height: i32) -> Self {
        Self::with_max_pairs(width, height, 256)
    }

    /// Create a blank surface with a custom color-pair cap.
    pub fn with_max_pairs(width: i32, height: i32, max_pairs: PairId) -> Self {
        let size = Size::new(width.max(0), height.max(0));
        Self {
            size,
            cells: vec![(' ', DEFAULT_PAIR); (size.width * size.height) as usize],
            pairs: ColorPairs::new(max_pairs),
            presented: 0,
        }
    }

    /// Glyph and colors at a position.
    pub fn cell(&self, x: i32, y: i32) -> Option<(char, Rgb, Rgb)> {
        if !self.size.contains(x, y) {
            return None;
        }
        let (ch, pair) = self.cells[(y * self.size.width + x) as usize];
        let (fg, bg) = self.pairs.colors(pair)?;
        Some((ch, fg, bg))
    }

    /// One row as a string, trailing spaces included.
    pub fn row(&self, y: i32) -> String {
        (0..self.size.width)
            .filter_map(|x| self.cell(x, y).map(|(ch, _, _)| ch))
            .collect()
    }

    /// The color-pair table.
    pub fn pairs(&self) -> &ColorPairs {
        &self.pairs
    }

    /// How many times [`Surface::present`] has been called.
    pub fn frames_presented(&self) -> usize {
        self.presented
    }
}

impl Surface for HeadlessSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn color_pair(&mut self, fg: Rgb, bg: Rgb) -> PairId {
        self.pairs.resolve(fg, bg)
    }

    fn put(&mut self, x: i32, y: i32, ch: char, pair: PairId) -> io::Result<()> {
        if !self.size.contains(x, y) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("cell ({x}, {y}) outside surface"),
            ));
        }
        self.cells[(y * self.size.width + x) as usize] = (ch, pair);
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        self.presented += 1;
        Ok(())
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    // ── ColorPairs ───────────────────────────────────────────────────

    #[test]
    fn ids_start_after_default() {
        let mut pairs = ColorPairs::new(10);
        assert_eq!(pairs.resolve(Rgb::WHITE, Rgb::new(0, 0, 246)), 2);
        assert_eq!(pairs.resolve(Rgb::BLACK, Rgb::WHITE), 3);
        assert_eq!(pairs.allocated(), 2);
    }

    #[test]
    fn exact_tuple_is_cached() {
        let mut pairs = ColorPairs::new(10);
        let a = pairs.resolve(Rgb::WHITE, Rgb::BLACK);
        let b = pairs.resolve(Rgb::WHITE, Rgb::BLACK);
        assert_eq!(a, b);
        assert_ne!(pairs.resolve(Rgb::BLACK, Rgb::WHITE), a);
    }

    #[test]
    fn colors_round_trip() {
        let mut pairs = ColorPairs::new(10);
        let id = pairs.resolve(Rgb::new(1, 2, 3), Rgb::new(4, 5, 6));
        assert_eq!(pairs.colors(id), Some((Rgb::new(1, 2, 3), Rgb::new(4, 5, 6))));
        assert_eq!(pairs.colors(DEFAULT_PAIR), Some((Rgb::WHITE, Rgb::BLACK)));
        assert_eq!(pairs.colors(0), None);
        assert_eq!(pairs.colors(99), None);
    }

    #[test]
    #[traced_test]
    fn exhaustion_falls_back_to_default() {
        let mut pairs = ColorPairs::new(3);
        assert_eq!(pairs.resolve(Rgb::new(1, 0, 0), Rgb::BLACK), 2);
        assert_eq!(pairs.resolve(Rgb::new(2, 0, 0), Rgb::BLACK), 3);
        assert_eq!(pairs.resolve(Rgb::new(3, 0, 0), Rgb::BLACK), DEFAULT_PAIR);
        assert_eq!(pairs.resolve(Rgb::new(4, 0, 0), Rgb::BLACK), DEFAULT_PAIR);
        assert!(pairs.is_exhausted());
        // Previously allocated pairs still resolve.
        assert_eq!(pairs.resolve(Rgb::new(2, 0, 0), Rgb::BLACK), 3);
        assert!(logs_contain("color-pair table exhausted"));
    }

    // ── HeadlessSurface ──────────────────────────────────────────────

    #[test]
    fn put_and_read_back() {
        let mut surface = HeadlessSurface::new(4, 2);
        let pair = surface.color_pair(Rgb::BLACK, Rgb::WHITE);
        surface.put(1, 1, 'x', pair).unwrap();
        assert_eq!(surface.cell(1, 1), Some(('x', Rgb::BLACK, Rgb::WHITE)));
        assert_eq!(surface.row(1), " x  ");
    }

    #[test]
    fn out_of_bounds_put_fails() {
        let mut surface = HeadlessSurface::new(4, 2);
        assert!(surface.put(4, 0, 'x', DEFAULT_PAIR).is_err());
        assert!(surface.put(0, -1, 'x', DEFAULT_PAIR).is_err());
        assert_eq!(surface.cell(4, 0), None);
    }

    #[test]
    fn present_counts_frames() {
        let mut surface = HeadlessSurface::new(1, 1);
        surface.present().unwrap();
        surface.present().unwrap();
        assert_eq!(surface.frames_presented(), 2);
    }
}
