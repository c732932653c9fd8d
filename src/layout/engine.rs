//! The layout pass: element tree + data store in, positions and zones out.
//!
//! [`compute_layout`] is a pure function. It runs in two steps:
//!
//! 1. **Place.** Every container packs its children inside its inner box,
//!    in the container canvas's own coordinates. Frames record the size of
//!    the canvas they need and their scroll state.
//! 2. **Register.** A depth-first walk turns local positions into screen
//!    rectangles (container origin minus scroll), clips them to the
//!    container viewport and registers hit zones, click zones, the focus
//!    order and the visible-node list.
//!
//! Dropdown frames are placed during the register walk, since their
//! position depends on where their option menu ended up on screen.
//!
//! Attaching canvases to frames is left to the caller
//! ([`LayoutResult::frame`] carries the sizes); the layout never mutates
//! the tree.

use std::collections::HashMap;

use slotmap::SecondaryMap;

use super::measure::{self, Side};
use super::scroll::ScrollState;
use super::zones::{ClickAction, ClickZone, HitZone, ZoneTable, ZoneTarget};
use crate::config::Options;
use crate::data::DataModel;
use crate::dom::{Element, ElementId, ElementTree, ModalKind, Role, Tag, Visibility};
use crate::geometry::{Offset, Region, Size};

/// Width of the `[X]` exit glyph, placed at `window width - 4`.
const EXIT_GLYPH_WIDTH: i32 = 3;

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Where an element ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Rectangle inside the container's canvas.
    pub local: Region,
    /// Rectangle on screen, after scrolling, before clipping.
    pub screen: Region,
    /// The container whose canvas the element draws into.
    pub container: ElementId,
    /// The part of the screen the container shows.
    pub viewport: Region,
}

/// What a frame needs from its canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLayout {
    /// Canvas dimensions. At least the frame size; grows to the content
    /// extent when overflow is hidden.
    pub canvas_size: Size,
    /// The frame's own size on screen.
    pub frame_size: Size,
    /// Scroll state when overflow is hidden.
    pub scroll: Option<ScrollState>,
    /// Box children are packed into, in canvas coordinates.
    pub inner: Region,
}

impl FrameLayout {
    /// The clip rectangle used when flushing the frame into its parent.
    pub fn clip(&self) -> Option<Region> {
        self.scroll.map(|s| s.visible_region())
    }

    /// The scroll offset (zero when not scrolling).
    pub fn scroll_offset(&self) -> Offset {
        self.scroll.map_or(Offset::default(), |s| s.offset)
    }
}

/// Everything one layout pass produces. Rebuilt from scratch every frame.
#[derive(Debug, Clone)]
pub struct LayoutResult {
    /// Window size in cells.
    pub window: Size,
    /// Rows taken by the title bar (0 or 1).
    pub offset_y: i32,
    /// The window's inner box: inside the border, below the title bar.
    pub body: Region,
    /// Per-element placement.
    pub placements: SecondaryMap<ElementId, Placement>,
    /// Per-frame canvas requirements.
    pub frames: SecondaryMap<ElementId, FrameLayout>,
    /// Rendered elements in depth-first order (root excluded).
    pub visible: Vec<ElementId>,
    /// Focusable elements in tab order.
    pub focus_order: Vec<ElementId>,
    /// Hit and click zones.
    pub zones: ZoneTable,
    /// The active modal frame.
    pub modal: Option<(ElementId, ModalKind)>,
    /// The dropdown frame currently shown.
    pub open_dropdown: Option<ElementId>,
}

impl LayoutResult {
    fn new(window: Size, offset_y: i32) -> Self {
        Self {
            window,
            offset_y,
            body: Region::new(1, offset_y, window.width - 2, window.height - offset_y - 1),
            placements: SecondaryMap::new(),
            frames: SecondaryMap::new(),
            visible: Vec::new(),
            focus_order: Vec::new(),
            zones: ZoneTable::new(),
            modal: None,
            open_dropdown: None,
        }
    }

    /// Placement of an element, if it was laid out.
    pub fn placement(&self, id: ElementId) -> Option<&Placement> {
        self.placements.get(id)
    }

    /// Screen rectangle of an element.
    pub fn screen_region(&self, id: ElementId) -> Option<Region> {
        self.placements.get(id).map(|p| p.screen)
    }

    /// Canvas requirements of a frame.
    pub fn frame(&self, id: ElementId) -> Option<&FrameLayout> {
        self.frames.get(id)
    }

    /// Whether an element is in the visible list.
    pub fn is_visible(&self, id: ElementId) -> bool {
        self.visible.contains(&id)
    }
}

/// The window size for a screen: the whole screen in full-screen mode,
/// otherwise the configured size capped to the screen.
pub fn window_size(options: &Options, screen: Size) -> Size {
    if options.full_screen {
        return screen;
    }
    let wanted = options.window_cells();
    Size::new(wanted.width.min(screen.width), wanted.height.min(screen.height))
}

/// The first rendered modal frame in depth-first order.
///
/// Dropdown frames are never modal.
pub fn find_modal(tree: &ElementTree) -> Option<(ElementId, ModalKind)> {
    tree.walk_depth_first(tree.root()).into_iter().find_map(|id| {
        let el = tree.get(id)?;
        if el.tag != Tag::Frame || matches!(el.role, Role::Dropdown { .. }) {
            return None;
        }
        let kind = el.modal_kind()?;
        tree.is_rendered(id).then_some((id, kind))
    })
}

// ---------------------------------------------------------------------------
// compute_layout
// ---------------------------------------------------------------------------

/// Lay out the whole tree for a screen of `screen` cells.
pub fn compute_layout(
    tree: &ElementTree,
    data: &DataModel,
    options: &Options,
    screen: Size,
) -> LayoutResult {
    let window = window_size(options, screen);
    let offset_y = i32::from(options.show_title_bar);
    let mut pass = Pass {
        tree,
        data,
        local: SecondaryMap::new(),
        dropdowns: HashMap::new(),
        result: LayoutResult::new(window, offset_y),
    };

    for &child in tree.children(tree.root()) {
        if let Some(Role::Dropdown { menu }) = tree.get(child).map(|el| el.role) {
            pass.dropdowns.insert(menu, child);
        }
    }

    if options.show_title_bar && options.show_exit_button {
        pass.result.zones.push_click(ClickZone {
            region: Region::new(window.width - 4, 0, EXIT_GLYPH_WIDTH, 1),
            action: ClickAction::Exit,
            target: ZoneTarget::TitleExit,
            name: None,
        });
    }

    let root = tree.root();
    let window_region = window.to_region();
    pass.result.placements.insert(
        root,
        Placement { local: window_region, screen: window_region, container: root, viewport: window_region },
    );

    let body = pass.result.body;
    pass.place_children(root, body, true);
    pass.register_children(root, Offset::default(), window_region, tree.is_rendered(root));

    let mut result = pass.result;
    result.modal = find_modal(tree);
    if let Some((modal, _)) = result.modal {
        restrict_to_modal(tree, &mut result, modal);
    }

    tracing::debug!(
        visible = result.visible.len(),
        zones = result.zones.len(),
        modal = result.modal.is_some(),
        "layout pass"
    );
    result
}

/// Prune zones and focus order to the modal subtree, plus the open dropdown
/// when its menu lives inside the modal.
fn restrict_to_modal(tree: &ElementTree, result: &mut LayoutResult, modal: ElementId) {
    let dropdown = result.open_dropdown.filter(|&d| match tree.get(d).map(|el| el.role) {
        Some(Role::Dropdown { menu }) => tree.is_descendant(menu, modal),
        _ => false,
    });
    let allowed = |id: ElementId| {
        tree.is_descendant(id, modal) || dropdown.is_some_and(|d| tree.is_descendant(id, d))
    };
    result.zones.retain(|el| el.is_some_and(allowed));
    result.focus_order.retain(|&id| allowed(id));
}

// ---------------------------------------------------------------------------
// Pass
// ---------------------------------------------------------------------------

struct Pass<'a> {
    tree: &'a ElementTree,
    data: &'a DataModel,
    /// Rectangles in container-canvas coordinates.
    local: SecondaryMap<ElementId, Region>,
    /// Option menu → its dropdown frame.
    dropdowns: HashMap<ElementId, ElementId>,
    result: LayoutResult,
}

/// Packing cursor over a container's inner box.
struct Cursor {
    inner: Region,
    top: i32,
    bottom: i32,
    left: i32,
    right: i32,
}

impl Cursor {
    fn new(inner: Region) -> Self {
        Self {
            inner,
            top: inner.y,
            bottom: inner.bottom(),
            left: inner.x,
            right: inner.right(),
        }
    }

    /// Take `size` from the `side` edge. Controls without `padx` are
    /// centered horizontally when packed top or bottom.
    fn pack(&mut self, side: Side, size: Size, pad: Offset, center: bool) -> Offset {
        let across = if center {
            self.inner.x + ((self.inner.width - size.width) / 2).max(0)
        } else {
            self.inner.x + pad.x
        };
        let middle = self.inner.y + (self.inner.height - size.height) / 2;
        match side {
            Side::Top => {
                let y = self.top + pad.y;
                self.top = y + size.height + pad.y;
                Offset::new(across, y)
            }
            Side::Bottom => {
                self.bottom -= size.height + 2 * pad.y;
                Offset::new(across, self.bottom + pad.y)
            }
            Side::Left => {
                let x = self.left + pad.x;
                self.left = x + size.width;
                Offset::new(x, middle)
            }
            Side::Right => {
                self.right -= size.width + pad.x;
                Offset::new(self.right, middle)
            }
        }
    }
}

impl Pass<'_> {
    // -- place -----------------------------------------------------------

    /// Pack the children of `container` into `inner`. Returns the content
    /// extent (furthest right/bottom edge) in canvas coordinates.
    fn place_children(&mut self, container: ElementId, inner: Region, window_level: bool) -> Size {
        let tree = self.tree;
        let mut cursor = Cursor::new(inner);
        let mut extent = Size::ZERO;

        for &child in tree.children(container) {
            let Some(el) = tree.get(child) else { continue };
            if el.visibility == Visibility::Collapsed || matches!(el.role, Role::Dropdown { .. }) {
                continue;
            }
            let region = match el.tag {
                Tag::Frame => self.place_frame(child, el, &mut cursor, window_level),
                _ => {
                    let size = measure::resolve_size(el, self.data);
                    let pos = match measure::explicit_position(el) {
                        Some(pos) => pos,
                        None => {
                            let center = !el.tag.is_container() && el.attr("padx").is_none();
                            let side = Side::parse(el.attr("pack"));
                            cursor.pack(side, size, measure::padding(el), center)
                        }
                    };
                    Region::new(pos.x, pos.y, size.width, size.height)
                }
            };
            self.local.insert(child, region);
            extent = extent.max(Size::new(region.right(), region.bottom()));
        }
        extent
    }

    fn place_frame(
        &mut self,
        id: ElementId,
        el: &Element,
        cursor: &mut Cursor,
        window_level: bool,
    ) -> Region {
        let (w, h) = measure::explicit_size(el);
        let explicit = measure::explicit_position(el);
        let region = if window_level && (w.is_none() || h.is_none()) {
            let body = cursor.inner;
            let size = Size::new(w.unwrap_or(body.width), h.unwrap_or(body.height));
            let pos = explicit
                .unwrap_or_else(|| Offset::new(body.x + (body.width - size.width) / 2, body.y));
            Region::new(pos.x, pos.y, size.width, size.height)
        } else {
            let size = measure::frame_size(el);
            let pos = explicit.unwrap_or_else(|| {
                cursor.pack(Side::parse(el.attr("pack")), size, measure::padding(el), false)
            });
            Region::new(pos.x, pos.y, size.width, size.height)
        };
        self.place_frame_contents(id, el, region.size());
        region
    }

    /// Lay out a frame's children and record its canvas requirements.
    fn place_frame_contents(&mut self, id: ElementId, el: &Element, frame_size: Size) {
        let border = i32::from(el.bool_attr("border"));
        let inner = frame_size.to_region().shrink(border);
        let extent = self.place_children(id, inner, false);

        let overflow_hidden = el
            .attr("overflow")
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("hidden"));
        let layout = if overflow_hidden {
            let content = frame_size.max(Size::new(extent.width + border, extent.height + border));
            let mut scroll = ScrollState::new(content, frame_size);
            scroll.scroll_to(
                el.int_attr("scrollLeft").unwrap_or(0),
                el.int_attr("scrollTop").unwrap_or(0),
            );
            FrameLayout { canvas_size: content, frame_size, scroll: Some(scroll), inner }
        } else {
            FrameLayout { canvas_size: frame_size, frame_size, scroll: None, inner }
        };
        self.result.frames.insert(id, layout);
    }

    /// Position a dropdown just below its menu, clamped to the window body.
    fn place_dropdown(&mut self, dropdown: ElementId, menu: ElementId) -> Option<Region> {
        let tree = self.tree;
        let menu_screen = self.result.placements.get(menu)?.screen;
        let el = tree.get(dropdown)?;
        let size = measure::frame_size(el);
        let body = self.result.body;
        let mut y = menu_screen.y + 1;
        if y + size.height > body.bottom() {
            y = (body.bottom() - size.height).max(self.result.offset_y);
        }
        let region = Region::new(menu_screen.x, y, size.width, size.height);
        self.local.insert(dropdown, region);
        self.place_frame_contents(dropdown, el, size);
        Some(region)
    }

    // -- register --------------------------------------------------------

    /// Walk the children of `container`, whose canvas origin sits at
    /// `origin` on screen and which shows `viewport`.
    fn register_children(&mut self, container: ElementId, origin: Offset, viewport: Region, rendered: bool) {
        let tree = self.tree;
        for &child in tree.children(container) {
            let Some(el) = tree.get(child) else { continue };
            if el.visibility == Visibility::Collapsed {
                continue;
            }
            let local = match el.role {
                Role::Dropdown { menu } => match self.place_dropdown(child, menu) {
                    Some(region) => region,
                    None => continue,
                },
                _ => match self.local.get(child) {
                    Some(&region) => region,
                    None => continue,
                },
            };
            let screen = local.translate(origin);
            self.result
                .placements
                .insert(child, Placement { local, screen, container, viewport });

            let shown = rendered && el.visibility == Visibility::Visible;
            if shown {
                self.result.visible.push(child);
                if matches!(el.role, Role::Dropdown { .. }) {
                    self.result.open_dropdown = Some(child);
                }
                self.register_zones(child, el, screen, viewport);
            }

            if el.tag == Tag::Frame {
                if let Some(frame) = self.result.frames.get(child).copied() {
                    let inner_origin = screen.offset() - frame.scroll_offset();
                    let inner_viewport = screen.intersection(viewport);
                    self.register_children(child, inner_origin, inner_viewport, shown);
                }
            }
        }
    }

    fn register_zones(&mut self, id: ElementId, el: &Element, screen: Region, viewport: Region) {
        if !el.tag.hit_testable() {
            return;
        }
        if let Role::DropdownOption { enabled: false, .. } = el.role {
            return;
        }
        self.result.focus_order.push(id);
        self.result.zones.push_hit(HitZone { region: screen.intersection(viewport), element: id });

        if let Some(action) = self.click_action(id, el) {
            let row = Region::new(screen.x, screen.y, screen.width, 1);
            self.result.zones.push_click(ClickZone {
                region: row.intersection(viewport),
                action,
                target: ZoneTarget::Element(id),
                name: el.name().map(str::to_owned),
            });
        }
    }

    /// The action a click on `el` performs, or `None` for elements that
    /// only take focus.
    fn click_action(&self, id: ElementId, el: &Element) -> Option<ClickAction> {
        if let Role::DropdownOption { menu, index, .. } = el.role {
            let dropdown = self.tree.parent(id)?;
            return Some(ClickAction::SelectOption { menu, dropdown, index });
        }
        if !el.tag.click_activatable() {
            return None;
        }
        if el.tag == Tag::OptionMenu {
            return self
                .dropdowns
                .contains_key(&id)
                .then_some(ClickAction::OpenDropdown { menu: id });
        }
        if let Some(handler) = el.attr("ezClick").and_then(|name| self.data.handler(name)) {
            return Some(ClickAction::Handler(handler));
        }
        Some(default_action(el))
    }
}

/// The built-in action of a control without a registered handler.
pub fn default_action(el: &Element) -> ClickAction {
    let key = el.bind_key().map(str::to_owned);
    match (el.tag, key, el.attr("value")) {
        (Tag::CheckButton, Some(key), _) => ClickAction::ToggleCheck { key },
        (Tag::RadioButton, Some(key), Some(value)) if !value.is_empty() => {
            ClickAction::SelectRadio { key, value: value.to_owned() }
        }
        _ => ClickAction::None,
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Choice, Value};
    use pretty_assertions::assert_eq;

    fn options() -> Options {
        Options::new().with_full_screen(true)
    }

    fn window() -> ElementTree {
        ElementTree::new(Element::new(Tag::Window))
    }

    fn layout(tree: &ElementTree, data: &DataModel) -> LayoutResult {
        compute_layout(tree, data, &options(), Size::new(40, 12))
    }

    #[test]
    fn window_size_caps_to_screen() {
        let opts = Options::new().with_window_size(800, 600);
        assert_eq!(window_size(&opts, Size::new(200, 100)), Size::new(100, 37));
        assert_eq!(window_size(&opts, Size::new(80, 24)), Size::new(80, 24));
        assert_eq!(window_size(&options(), Size::new(200, 100)), Size::new(200, 100));
    }

    #[test]
    fn body_accounts_for_title_bar() {
        let tree = window();
        let data = DataModel::new();
        assert_eq!(layout(&tree, &data).body, Region::new(1, 1, 38, 10));
        let plain = compute_layout(&tree, &data, &options().with_title_bar(false), Size::new(40, 12));
        assert_eq!(plain.body, Region::new(1, 0, 38, 11));
    }

    #[test]
    fn top_pack_centers_and_stacks() {
        let mut tree = window();
        let root = tree.root();
        let a = tree.add_child(root, Element::new(Tag::Label).with_attr("text", "Hello"));
        let b = tree.add_child(root, Element::new(Tag::Entry));
        let data = DataModel::new();
        let result = layout(&tree, &data);
        assert_eq!(result.screen_region(a), Some(Region::new(16, 1, 7, 1)));
        assert_eq!(result.screen_region(b), Some(Region::new(14, 2, 12, 1)));
    }

    #[test]
    fn bottom_left_right_and_padding() {
        let mut tree = window();
        let root = tree.root();
        let bottom = tree.add_child(
            root,
            Element::new(Tag::Button).with_attr("text", "OK").with_attr("pack", "bottom").with_attr("pady", "16"),
        );
        let left = tree.add_child(root, Element::new(Tag::Entry).with_attr("pack", "left").with_attr("padx", "16"));
        let right = tree.add_child(root, Element::new(Tag::Entry).with_attr("pack", "right"));
        let data = DataModel::new();
        let result = layout(&tree, &data);
        assert_eq!(result.screen_region(bottom), Some(Region::new(15, 9, 10, 1)));
        assert_eq!(result.screen_region(left), Some(Region::new(3, 5, 12, 1)));
        assert_eq!(result.screen_region(right), Some(Region::new(27, 5, 12, 1)));
    }

    #[test]
    fn bottom_padding_is_reserved_on_both_sides() {
        let mut tree = window();
        let root = tree.root();
        let padded = tree.add_child(
            root,
            Element::new(Tag::Button).with_attr("text", "OK").with_attr("pack", "bottom").with_attr("pady", "16"),
        );
        let above = tree.add_child(root, Element::new(Tag::Button).with_attr("text", "Back").with_attr("pack", "bottom"));
        let data = DataModel::new();
        let result = layout(&tree, &data);
        assert_eq!(result.screen_region(padded).map(|r| r.y), Some(9));
        assert_eq!(result.screen_region(above).map(|r| r.y), Some(7));
    }

    #[test]
    fn explicit_position_skips_the_cursor() {
        let mut tree = window();
        let root = tree.root();
        let pinned = tree.add_child(root, Element::new(Tag::Entry).with_attr("x", "16").with_attr("y", "64"));
        let flowing = tree.add_child(root, Element::new(Tag::Entry));
        let data = DataModel::new();
        let result = layout(&tree, &data);
        assert_eq!(result.screen_region(pinned), Some(Region::new(2, 4, 12, 1)));
        assert_eq!(result.screen_region(flowing).map(|r| r.y), Some(1));
    }

    #[test]
    fn collapsed_subtree_is_excluded() {
        let mut tree = window();
        let root = tree.root();
        let frame = tree.add_child(
            root,
            Element::new(Tag::Frame).with_attr("width", "20").with_attr("height", "5").with_attr("visibility", "collapsed"),
        );
        let inside = tree.add_child(frame, Element::new(Tag::Button).with_attr("text", "x"));
        let outside = tree.add_child(root, Element::new(Tag::Button).with_attr("text", "y"));
        let data = DataModel::new();
        let result = layout(&tree, &data);
        assert!(result.placement(frame).is_none());
        assert!(result.placement(inside).is_none());
        assert!(!result.focus_order.contains(&inside));
        assert!(result.zones.hits().iter().all(|z| z.element != inside));
        assert_eq!(result.focus_order, vec![outside]);
    }

    #[test]
    fn hidden_occupies_space_but_is_not_focusable() {
        let mut tree = window();
        let root = tree.root();
        let hidden = tree.add_child(root, Element::new(Tag::Entry).with_attr("visibility", "hidden"));
        let next = tree.add_child(root, Element::new(Tag::Entry));
        let data = DataModel::new();
        let result = layout(&tree, &data);
        assert!(result.placement(hidden).is_some());
        assert!(!result.is_visible(hidden));
        assert_eq!(result.screen_region(next).map(|r| r.y), Some(2));
        assert_eq!(result.focus_order, vec![next]);
    }

    #[test]
    fn window_level_frame_fills_the_body() {
        let mut tree = window();
        let root = tree.root();
        let frame = tree.add_child(root, Element::new(Tag::Frame).with_attr("border", "true"));
        let label = tree.add_child(frame, Element::new(Tag::Label).with_attr("text", "Hello"));
        let button = tree.add_child(
            frame,
            Element::new(Tag::Button).with_attr("text", "OK").with_attr("pack", "bottom"),
        );
        let data = DataModel::new();
        let result = layout(&tree, &data);
        assert_eq!(result.screen_region(frame), Some(Region::new(1, 1, 38, 10)));
        let fl = result.frame(frame).copied().unwrap();
        assert_eq!(fl.inner, Region::new(1, 1, 36, 8));
        assert_eq!(result.placement(label).map(|p| p.local), Some(Region::new(15, 1, 7, 1)));
        assert_eq!(result.screen_region(label), Some(Region::new(16, 2, 7, 1)));
        assert_eq!(result.screen_region(button), Some(Region::new(15, 9, 10, 1)));
    }

    #[test]
    fn nested_frame_defaults_and_packs() {
        let mut tree = window();
        let root = tree.root();
        let outer = tree.add_child(root, Element::new(Tag::Frame));
        let a = tree.add_child(outer, Element::new(Tag::Frame));
        let b = tree.add_child(outer, Element::new(Tag::Frame).with_attr("width", "4"));
        let data = DataModel::new();
        let result = layout(&tree, &data);
        assert_eq!(result.placement(a).map(|p| p.local), Some(Region::new(0, 0, 10, 5)));
        assert_eq!(result.placement(b).map(|p| p.local), Some(Region::new(0, 5, 4, 5)));
    }

    #[test]
    fn overflow_hidden_scrolls_and_clips() {
        let mut tree = window();
        let root = tree.root();
        let frame = tree.add_child(
            root,
            Element::new(Tag::Frame)
                .with_attr("width", "14")
                .with_attr("height", "2")
                .with_attr("overflow", "hidden")
                .with_attr("scrollTop", "1"),
        );
        let first = tree.add_child(frame, Element::new(Tag::Button).with_attr("text", "one"));
        let second = tree.add_child(frame, Element::new(Tag::Button).with_attr("text", "two"));
        let third = tree.add_child(frame, Element::new(Tag::Button).with_attr("text", "three"));
        let data = DataModel::new();
        let result = layout(&tree, &data);

        let fl = result.frame(frame).copied().unwrap();
        assert_eq!(fl.canvas_size, Size::new(14, 3));
        assert_eq!(fl.clip(), Some(Region::new(0, 1, 14, 2)));

        let frame_screen = result.screen_region(frame).unwrap();
        // The first button scrolled above the viewport: no zones.
        assert_eq!(result.screen_region(first).map(|r| r.y), Some(frame_screen.y - 1));
        assert!(result.zones.click_for(first).is_none());
        assert_eq!(result.zones.click_for(second).map(|z| z.region.y), Some(frame_screen.y));
        assert_eq!(result.zones.click_for(third).map(|z| z.region.y), Some(frame_screen.y + 1));
    }

    #[test]
    fn default_actions_and_handlers() {
        let mut tree = window();
        let root = tree.root();
        let check = tree.add_child(root, Element::new(Tag::CheckButton).with_attr("ezBind", "(c)"));
        let radio = tree.add_child(
            root,
            Element::new(Tag::RadioButton).with_attr("ezBind", "(r)").with_attr("value", "a"),
        );
        let button = tree.add_child(root, Element::new(Tag::Button).with_attr("ezClick", "go"));
        let missing = tree.add_child(root, Element::new(Tag::Button).with_attr("ezClick", "nope"));
        let mut data = DataModel::new();
        data.on("go", |_, _, _| {});
        let result = layout(&tree, &data);
        let action = |id| format!("{:?}", result.zones.click_for(id).map(|z| &z.action));
        assert_eq!(action(check), r#"Some(ToggleCheck { key: "c" })"#);
        assert_eq!(action(radio), r#"Some(SelectRadio { key: "r", value: "a" })"#);
        assert_eq!(action(button), "Some(Handler(..))");
        assert_eq!(action(missing), "Some(None)");
    }

    #[test]
    fn exit_zone_in_title_bar() {
        let tree = window();
        let data = DataModel::new();
        let result = layout(&tree, &data);
        assert_eq!(result.zones.hover_at(37, 0), Some(ZoneTarget::TitleExit));
        let none = compute_layout(&tree, &data, &options().with_exit_button(false), Size::new(40, 12));
        assert_eq!(none.zones.hover_at(37, 0), None);
    }

    #[test]
    fn modal_prunes_zones_and_focus() {
        let mut tree = window();
        let root = tree.root();
        let outside = tree.add_child(root, Element::new(Tag::Button).with_attr("text", "out"));
        let modal = tree.add_child(
            root,
            Element::new(Tag::Frame).with_attr("ezModal", "clear").with_attr("width", "20").with_attr("height", "4"),
        );
        let inside = tree.add_child(modal, Element::new(Tag::Button).with_attr("text", "in"));
        let data = DataModel::new();
        let result = layout(&tree, &data);
        assert_eq!(result.modal, Some((modal, ModalKind::Clear)));
        assert_eq!(result.focus_order, vec![inside]);
        assert!(result.zones.click_for(outside).is_none());
        assert!(result.zones.click_for(inside).is_some());
        assert_eq!(result.zones.hover_at(37, 0), None);
        assert!(result.is_visible(outside));
    }

    #[test]
    fn hidden_modal_is_inactive() {
        let mut tree = window();
        let root = tree.root();
        tree.add_child(
            root,
            Element::new(Tag::Frame).with_attr("ezModal", "opaque").with_attr("visibility", "hidden"),
        );
        assert_eq!(find_modal(&tree), None);
    }

    #[test]
    fn dropdown_sits_below_menu_and_clamps() {
        let mut tree = window();
        let root = tree.root();
        let menu = tree.add_child(
            root,
            Element::new(Tag::OptionMenu)
                .with_attr("name", "m")
                .with_attr("ezBind", "(m)")
                .with_attr("pack", "bottom"),
        );
        let dropdown = tree.add_child(
            root,
            Element::new(Tag::Frame)
                .with_attr("width", "5")
                .with_attr("height", "3")
                .with_visibility(Visibility::Visible)
                .with_role(Role::Dropdown { menu }),
        );
        let mut data = DataModel::new();
        data.bind("m", Value::from(Choice::new([("A", true), ("B", true), ("C", true)])));
        let result = layout(&tree, &data);
        let menu_at = result.screen_region(menu).unwrap();
        assert_eq!(menu_at.y, 10);
        // Would overflow the body, so it is pushed up to end at the body's bottom.
        assert_eq!(result.screen_region(dropdown), Some(Region::new(menu_at.x, 8, 5, 3)));
        assert_eq!(result.open_dropdown, Some(dropdown));
        assert!(matches!(
            result.zones.click_for(menu).map(|z| &z.action),
            Some(ClickAction::OpenDropdown { .. })
        ));
    }
}
