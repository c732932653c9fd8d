//! Snapshot rendering helpers.
//!
//! Functions for converting canvases and surfaces into plain-text strings
//! suitable for snapshot testing and assertions. Each row becomes one line
//! with trailing spaces trimmed; trailing blank lines are dropped.

use crate::geometry::Region;
use crate::render::canvas::Canvas;
use crate::render::surface::HeadlessSurface;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// The glyphs of a cell canvas as text.
///
/// Pixel canvases read as blank, since a pixel carries no glyph.
///
/// # Examples
///
/// ```
/// use ezui::render::canvas::{Canvas, RenderMode};
/// use ezui::testing::snapshot::canvas_to_string;
///
/// let mut canvas = Canvas::new(8, 2, RenderMode::Cell);
/// canvas.text(1, 0, "Hello");
/// assert_eq!(canvas_to_string(&canvas), " Hello");
/// ```
pub fn canvas_to_string(canvas: &Canvas) -> String {
    rows_to_string((0..canvas.height()).map(|y| {
        (0..canvas.width())
            .map(|x| canvas.get(x, y).map_or(' ', |c| c.ch))
            .collect()
    }))
}

/// The glyphs on a headless surface as text.
pub fn surface_to_string(surface: &HeadlessSurface) -> String {
    use crate::render::surface::Surface;
    rows_to_string((0..surface.size().height).map(|y| surface.row(y)))
}

/// The glyphs inside `region` of a headless surface, one line per row.
///
/// Cells outside the surface read as spaces.
pub fn surface_region_to_string(surface: &HeadlessSurface, region: Region) -> String {
    rows_to_string((region.y..region.bottom()).map(|y| {
        (region.x..region.right())
            .map(|x| surface.cell(x, y).map_or(' ', |(ch, _, _)| ch))
            .collect()
    }))
}

// ---------------------------------------------------------------------------
// Internal
// ---------------------------------------------------------------------------

fn rows_to_string(rows: impl Iterator<Item = String>) -> String {
    let lines: Vec<String> = rows.map(|row| row.trim_end().to_string()).collect();
    let end = lines.iter().rposition(|l| !l.is_empty()).map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

// ===========================================================================
// Tests
// ===========================================================================
