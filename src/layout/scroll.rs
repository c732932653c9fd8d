//! Scroll state for frames whose content overflows.
//!
//! A frame with `overflow: hidden` gets a canvas as large as its content and
//! shows the part selected by [`ScrollState::visible_region`]; that region is
//! the clip rectangle passed to the flush.

use crate::geometry::{Offset, Region, Size};

/// Tracks the scroll position of a frame.
///
/// The scroll offset is always clamped to `[0, max_scroll]` where
/// `max_scroll = content_size - viewport_size` (clamped to zero).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollState {
    /// Current scroll offset (always >= 0, clamped to max).
    pub offset: Offset,
    /// Total size of the scrollable content.
    pub content_size: Size,
    /// Size of the visible viewport.
    pub viewport_size: Size,
}

impl ScrollState {
    /// Create a new scroll state with zero offset.
    pub fn new(content_size: Size, viewport_size: Size) -> Self {
        Self {
            offset: Offset::new(0, 0),
            content_size,
            viewport_size,
        }
    }

    /// The maximum scroll offset for each axis.
    pub fn max_scroll(&self) -> Offset {
        Offset::new(
            (self.content_size.width - self.viewport_size.width).max(0),
            (self.content_size.height - self.viewport_size.height).max(0),
        )
    }

    /// Scroll to an absolute position, clamping to valid range.
    pub fn scroll_to(&mut self, x: i32, y: i32) {
        let max = self.max_scroll();
        self.offset = Offset::new(x.clamp(0, max.x), y.clamp(0, max.y));
    }

    /// The currently visible region within the content.
    pub fn visible_region(&self) -> Region {
        Region::new(
            self.offset.x,
            self.offset.y,
            self.viewport_size.width,
            self.viewport_size.height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_scroll_never_negative() {
        let s = ScrollState::new(Size::new(5, 5), Size::new(10, 10));
        assert_eq!(s.max_scroll(), Offset::new(0, 0));
        let s = ScrollState::new(Size::new(30, 12), Size::new(10, 5));
        assert_eq!(s.max_scroll(), Offset::new(20, 7));
    }

    #[test]
    fn scroll_to_clamps() {
        let mut s = ScrollState::new(Size::new(30, 12), Size::new(10, 5));
        s.scroll_to(99, -4);
        assert_eq!(s.offset, Offset::new(20, 0));
        s.scroll_to(3, 4);
        assert_eq!(s.visible_region(), Region::new(3, 4, 10, 5));
    }
}
