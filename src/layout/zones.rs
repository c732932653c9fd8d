//! Flattened interaction zones, rebuilt by every layout pass.
//!
//! Zones are stored in registration order, which follows the depth-first
//! walk. Later entries are considered in front of earlier ones, so lookups
//! search from the back.

use std::fmt;

use crate::data::Handler;
use crate::dom::ElementId;
use crate::geometry::Region;

// ---------------------------------------------------------------------------
// Zone types
// ---------------------------------------------------------------------------

/// What a confirmed click does.
#[derive(Clone)]
pub enum ClickAction {
    /// Call a host handler registered under the element's `ezClick` name.
    Handler(Handler),
    /// Flip the boolean stored under `key`.
    ToggleCheck { key: String },
    /// Store `value` under `key`.
    SelectRadio { key: String, value: String },
    /// Open (or close) the dropdown that belongs to `menu`.
    OpenDropdown { menu: ElementId },
    /// Select option `index` of `menu` and close its dropdown.
    SelectOption { menu: ElementId, dropdown: ElementId, index: usize },
    /// Request exit.
    Exit,
    /// Takes focus on click but has no effect.
    None,
}

impl fmt::Debug for ClickAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClickAction::Handler(_) => f.write_str("Handler(..)"),
            ClickAction::ToggleCheck { key } => f.debug_struct("ToggleCheck").field("key", key).finish(),
            ClickAction::SelectRadio { key, value } => f
                .debug_struct("SelectRadio")
                .field("key", key)
                .field("value", value)
                .finish(),
            ClickAction::OpenDropdown { menu } => f.debug_struct("OpenDropdown").field("menu", menu).finish(),
            ClickAction::SelectOption { menu, dropdown, index } => f
                .debug_struct("SelectOption")
                .field("menu", menu)
                .field("dropdown", dropdown)
                .field("index", index)
                .finish(),
            ClickAction::Exit => f.write_str("Exit"),
            ClickAction::None => f.write_str("None"),
        }
    }
}

/// Whose zone it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneTarget {
    Element(ElementId),
    /// The `[X]` glyph in the title bar.
    TitleExit,
}

impl ZoneTarget {
    /// The element behind the zone, if any.
    pub fn element(self) -> Option<ElementId> {
        match self {
            ZoneTarget::Element(id) => Some(id),
            ZoneTarget::TitleExit => None,
        }
    }
}

/// A focusable element's screen rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitZone {
    pub region: Region,
    pub element: ElementId,
}

/// A clickable rectangle paired with its action.
///
/// Click zones span a single row: the element's first row, clipped to its
/// container's viewport.
#[derive(Debug, Clone)]
pub struct ClickZone {
    pub region: Region,
    pub action: ClickAction,
    pub target: ZoneTarget,
    pub name: Option<String>,
}

// ---------------------------------------------------------------------------
// ZoneTable
// ---------------------------------------------------------------------------

/// Hit and click zones for one frame.
#[derive(Debug, Clone, Default)]
pub struct ZoneTable {
    hits: Vec<HitZone>,
    clicks: Vec<ClickZone>,
}

impl ZoneTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hit zone. Empty regions are ignored.
    pub fn push_hit(&mut self, zone: HitZone) {
        if !zone.region.is_empty() {
            self.hits.push(zone);
        }
    }

    /// Register a click zone. Empty regions are ignored.
    pub fn push_click(&mut self, zone: ClickZone) {
        if !zone.region.is_empty() {
            self.clicks.push(zone);
        }
    }

    /// All hit zones, back to front.
    pub fn hits(&self) -> &[HitZone] {
        &self.hits
    }

    /// All click zones, back to front.
    pub fn clicks(&self) -> &[ClickZone] {
        &self.clicks
    }

    /// The frontmost click zone containing the point.
    pub fn click_at(&self, x: i32, y: i32) -> Option<&ClickZone> {
        self.clicks.iter().rev().find(|z| z.region.contains(x, y))
    }

    /// The frontmost click zone containing the point among those accepted
    /// by `filter`.
    pub fn click_at_where(
        &self,
        x: i32,
        y: i32,
        filter: impl Fn(&ClickZone) -> bool,
    ) -> Option<&ClickZone> {
        self.clicks
            .iter()
            .rev()
            .find(|z| z.region.contains(x, y) && filter(z))
    }

    /// The frontmost hit zone containing the point.
    pub fn hit_at(&self, x: i32, y: i32) -> Option<&HitZone> {
        self.hits.iter().rev().find(|z| z.region.contains(x, y))
    }

    /// The click zone under the mouse, for hover feedback. Like
    /// [`click_at`](Self::click_at) the frontmost zone wins, so the hovered
    /// control is always the one a press would hit.
    pub fn hover_at(&self, x: i32, y: i32) -> Option<ZoneTarget> {
        self.click_at(x, y).map(|z| z.target)
    }

    /// The click zone registered for an element.
    pub fn click_for(&self, element: ElementId) -> Option<&ClickZone> {
        self.clicks
            .iter()
            .find(|z| z.target == ZoneTarget::Element(element))
    }

    /// Keep only zones for which `keep` returns true.
    ///
    /// Title-bar zones have no element and are passed `None`.
    pub fn retain(&mut self, keep: impl Fn(Option<ElementId>) -> bool) {
        self.hits.retain(|z| keep(Some(z.element)));
        self.clicks.retain(|z| keep(z.target.element()));
    }

    /// Number of click zones.
    pub fn len(&self) -> usize {
        self.clicks.len()
    }

    /// Whether there are no zones at all.
    pub fn is_empty(&self) -> bool {
        self.clicks.is_empty() && self.hits.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn ids(n: usize) -> Vec<ElementId> {
        let mut map: SlotMap<ElementId, ()> = SlotMap::with_key();
        (0..n).map(|_| map.insert(())).collect()
    }

    fn click(region: Region, id: ElementId) -> ClickZone {
        ClickZone {
            region,
            action: ClickAction::None,
            target: ZoneTarget::Element(id),
            name: None,
        }
    }

    #[test]
    fn frontmost_wins() {
        let ids = ids(2);
        let mut table = ZoneTable::new();
        table.push_click(click(Region::new(0, 0, 10, 1), ids[0]));
        table.push_click(click(Region::new(5, 0, 10, 1), ids[1]));
        assert_eq!(table.click_at(7, 0).map(|z| z.target), Some(ZoneTarget::Element(ids[1])));
        assert_eq!(table.click_at(2, 0).map(|z| z.target), Some(ZoneTarget::Element(ids[0])));
        assert!(table.click_at(2, 1).is_none());
        assert_eq!(table.hover_at(7, 0), Some(ZoneTarget::Element(ids[1])));
        assert_eq!(table.hover_at(2, 0), Some(ZoneTarget::Element(ids[0])));
    }

    #[test]
    fn empty_regions_are_not_registered() {
        let ids = ids(1);
        let mut table = ZoneTable::new();
        table.push_click(click(Region::EMPTY, ids[0]));
        table.push_hit(HitZone { region: Region::new(3, 3, 0, 4), element: ids[0] });
        assert!(table.is_empty());
    }

    #[test]
    fn filtered_lookup_skips_rejected_zones() {
        let ids = ids(2);
        let mut table = ZoneTable::new();
        table.push_click(click(Region::new(0, 0, 10, 1), ids[0]));
        table.push_click(click(Region::new(0, 0, 10, 1), ids[1]));
        let found = table.click_at_where(1, 0, |z| z.target == ZoneTarget::Element(ids[0]));
        assert_eq!(found.map(|z| z.target), Some(ZoneTarget::Element(ids[0])));
    }

    #[test]
    fn retain_prunes_both_lists() {
        let ids = ids(3);
        let mut table = ZoneTable::new();
        for (i, &id) in ids.iter().enumerate() {
            table.push_hit(HitZone { region: Region::new(0, i as i32, 5, 1), element: id });
            table.push_click(click(Region::new(0, i as i32, 5, 1), id));
        }
        table.push_click(ClickZone {
            region: Region::new(20, 0, 3, 1),
            action: ClickAction::Exit,
            target: ZoneTarget::TitleExit,
            name: None,
        });
        table.retain(|el| el == Some(ids[1]));
        assert_eq!(table.hits().len(), 1);
        assert_eq!(table.len(), 1);
        assert!(table.click_for(ids[1]).is_some());
        assert!(table.hover_at(21, 0).is_none());
    }
}
