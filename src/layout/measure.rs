//! Size estimation and the attribute readers layout depends on.
//!
//! Sizes resolve in priority order: explicit `width`/`height` attribute
//! (cells), then the tag-specific estimate, then [`DEFAULT_SIZE`]. Attributes
//! that fail to parse count as absent.

use crate::data::{Choice, DataModel};
use crate::dom::{Element, Tag};
use crate::geometry::{Offset, Size, CELL_HEIGHT, CELL_WIDTH};

/// Size used when a tag has no estimate.
pub const DEFAULT_SIZE: Size = Size::new(12, 1);

/// Size of a frame that declares none.
pub const FRAME_SIZE: Size = Size::new(10, 5);

/// Target width a button pads its label to when none is declared.
pub const BUTTON_WIDTH: i32 = 10;

/// Width of an entry that declares none.
pub const ENTRY_WIDTH: i32 = 12;

/// Width of the `[x] ` / `(o) ` marker and of the ` [V]` menu glyph.
pub const MARKER_WIDTH: i32 = 4;

// ---------------------------------------------------------------------------
// Side
// ---------------------------------------------------------------------------

/// The `pack` attribute: which edge of the container an element grows from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Side {
    #[default]
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    /// Parse the `pack` attribute. Unknown values pack to the top.
    pub fn parse(s: Option<&str>) -> Self {
        match s.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("bottom") => Side::Bottom,
            Some("left") => Side::Left,
            Some("right") => Side::Right,
            _ => Side::Top,
        }
    }
}

// ---------------------------------------------------------------------------
// Content
// ---------------------------------------------------------------------------

/// The text an element shows: its bound value when bound, else `text`.
pub fn display_text(el: &Element, data: &DataModel) -> String {
    match (el.tag, el.bind_key()) {
        (Tag::Label | Tag::Entry | Tag::TextBox, Some(key)) if data.contains(key) => data.text(key),
        _ => el.text().to_owned(),
    }
}

/// The choice bound to an option menu (empty when unbound).
pub fn menu_choice(el: &Element, data: &DataModel) -> Choice {
    el.bind_key()
        .and_then(|key| data.get(key))
        .and_then(|v| v.as_choice())
        .cloned()
        .unwrap_or_default()
}

/// A button's bracketed label, padded so the text sits centered.
///
/// With a declared width the padding fills it exactly (left side gets the
/// smaller half). Without one the label is padded toward [`BUTTON_WIDTH`]
/// with equal padding on both sides.
pub fn button_label(text: &str, width: Option<i32>) -> String {
    let len = text.chars().count() as i32;
    let (left, right) = match width {
        Some(w) => {
            let pad = (w - MARKER_WIDTH - len).max(0);
            (pad / 2, pad - pad / 2)
        }
        None => {
            let mut pad = (BUTTON_WIDTH - MARKER_WIDTH - len).max(0);
            if pad % 2 == 1 {
                pad += 1;
            }
            (pad / 2, pad / 2)
        }
    };
    format!(
        "[ {}{}{} ]",
        " ".repeat(left as usize),
        text,
        " ".repeat(right as usize)
    )
}

/// An option menu's face: the selected label, padded, then ` [V]`.
pub fn menu_label(choice: &Choice) -> String {
    let longest = choice.longest_label();
    let label = choice.selected_label().unwrap_or("");
    format!("{label:<longest$} [V]")
}

// ---------------------------------------------------------------------------
// Sizes
// ---------------------------------------------------------------------------

/// The tag-specific size estimate, if the tag has one.
pub fn estimate(el: &Element, data: &DataModel) -> Option<Size> {
    let text_len = |s: &str| s.chars().count() as i32;
    match el.tag {
        Tag::Label => {
            let text = display_text(el, data);
            let longest = text.lines().map(text_len).max().unwrap_or(0);
            let lines = text.lines().count().max(1) as i32;
            Some(Size::new(longest + 2, lines))
        }
        Tag::Button => Some(Size::new(text_len(&button_label(el.text(), None)), 1)),
        Tag::CheckButton | Tag::RadioButton => Some(Size::new(text_len(el.text()) + MARKER_WIDTH, 1)),
        Tag::OptionMenu => {
            let longest = menu_choice(el, data).longest_label() as i32;
            Some(Size::new(longest + MARKER_WIDTH, 1))
        }
        Tag::Entry => Some(Size::new(ENTRY_WIDTH, 1)),
        Tag::TextBox => Some(Size::new(40, 5)),
        Tag::Canvas => Some(Size::new(20, 5)),
        Tag::Window | Tag::Frame => None,
    }
}

/// Explicit size attributes, each `None` when absent, non-positive or
/// unparsable.
pub fn explicit_size(el: &Element) -> (Option<i32>, Option<i32>) {
    let positive = |key| el.int_attr(key).filter(|&n| n > 0);
    (positive("width"), positive("height"))
}

/// Resolve a leaf's size: explicit > estimate > default.
pub fn resolve_size(el: &Element, data: &DataModel) -> Size {
    let est = estimate(el, data).unwrap_or(DEFAULT_SIZE);
    let (w, h) = explicit_size(el);
    Size::new(w.unwrap_or(est.width), h.unwrap_or(est.height))
}

/// A frame's declared size, each missing dimension taken from [`FRAME_SIZE`].
pub fn frame_size(el: &Element) -> Size {
    let (w, h) = explicit_size(el);
    Size::new(w.unwrap_or(FRAME_SIZE.width), h.unwrap_or(FRAME_SIZE.height))
}

/// `padx`/`pady` in cells.
pub fn padding(el: &Element) -> Offset {
    Offset::new(
        el.int_attr("padx").unwrap_or(0) / CELL_WIDTH,
        el.int_attr("pady").unwrap_or(0) / CELL_HEIGHT,
    )
}

/// Explicit `x`/`y` in cells, when either is present.
pub fn explicit_position(el: &Element) -> Option<Offset> {
    let x = el.int_attr("x");
    let y = el.int_attr("y");
    if x.is_none() && y.is_none() {
        return None;
    }
    Some(Offset::new(
        x.unwrap_or(0) / CELL_WIDTH,
        y.unwrap_or(0) / CELL_HEIGHT,
    ))
}

// ===========================================================================
// Tests
// ===========================================================================
