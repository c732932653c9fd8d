//! Tree operations: insert, walk, visibility checks.

use slotmap::{SecondaryMap, SlotMap};

use super::node::{Element, ElementId, Visibility};
use crate::render::canvas::Canvas;

/// Empty slice constant for returning when an element has no children.
const EMPTY_CHILDREN: &[ElementId] = &[];

/// The declared UI tree, backed by a slotmap arena.
///
/// All elements live in a single `SlotMap`. Parent/child relationships are
/// stored in secondary maps; the parent link is a plain handle used for
/// ancestor checks. The shape only grows: elements are destroyed together
/// with the tree.
#[derive(Debug)]
pub struct ElementTree {
    pub(crate) nodes: SlotMap<ElementId, Element>,
    children: SecondaryMap<ElementId, Vec<ElementId>>,
    parent: SecondaryMap<ElementId, ElementId>,
    root: ElementId,
}

impl ElementTree {
    /// Create a tree whose root is `root` (normally a `window`).
    pub fn new(root: Element) -> Self {
        let mut nodes = SlotMap::with_key();
        let root_id = nodes.insert(root);
        let mut children = SecondaryMap::new();
        children.insert(root_id, Vec::new());
        Self {
            nodes,
            children,
            parent: SecondaryMap::new(),
            root: root_id,
        }
    }

    /// Append `element` as the last child of `parent`.
    pub fn add_child(&mut self, parent: ElementId, element: Element) -> ElementId {
        debug_assert!(self.nodes.contains_key(parent), "parent element does not exist");
        let id = self.nodes.insert(element);
        self.children.insert(id, Vec::new());
        if let Some(siblings) = self.children.get_mut(parent) {
            siblings.push(id);
            self.parent.insert(id, parent);
        }
        id
    }

    /// The root element.
    pub fn root(&self) -> ElementId {
        self.root
    }

    /// Get the parent of an element, if it has one.
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.parent.get(id).copied()
    }

    /// Get the children of an element. Returns an empty slice if the element
    /// has no children or does not exist.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.children
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// Walk from `id` up to the root, collecting ancestor ids.
    ///
    /// The returned vec does **not** include `id` itself; it starts with the
    /// immediate parent and ends at the root.
    pub fn ancestors(&self, id: ElementId) -> Vec<ElementId> {
        let mut result = Vec::new();
        let mut current = id;
        while let Some(p) = self.parent.get(current).copied() {
            result.push(p);
            current = p;
        }
        result
    }

    /// Whether `id` is `ancestor` or lies somewhere below it.
    pub fn is_descendant(&self, id: ElementId, ancestor: ElementId) -> bool {
        id == ancestor || self.ancestors(id).contains(&ancestor)
    }

    /// Immutable access to an element.
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.nodes.get(id)
    }

    /// Mutable access to an element.
    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.nodes.get_mut(id)
    }

    /// Number of elements in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds only its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Whether the tree contains an element with the given id.
    pub fn contains(&self, id: ElementId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Pre-order depth-first traversal starting from `start`.
    pub fn walk_depth_first(&self, start: ElementId) -> Vec<ElementId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            // Push children in reverse so the first child is visited first.
            for &child in self.children(current).iter().rev() {
                stack.push(child);
            }
        }
        result
    }

    /// Current visibility of an element (`Collapsed` for unknown ids).
    pub fn visibility(&self, id: ElementId) -> Visibility {
        self.get(id).map_or(Visibility::Collapsed, |el| el.visibility)
    }

    /// Change an element's visibility. Returns `false` for unknown ids.
    pub fn set_visibility(&mut self, id: ElementId, visibility: Visibility) -> bool {
        match self.get_mut(id) {
            Some(el) => {
                el.visibility = visibility;
                true
            }
            None => false,
        }
    }

    /// Whether neither the element nor any ancestor is collapsed.
    pub fn is_effectively_visible(&self, id: ElementId) -> bool {
        self.visibility(id) != Visibility::Collapsed
            && self
                .ancestors(id)
                .into_iter()
                .all(|a| self.visibility(a) != Visibility::Collapsed)
    }

    /// Whether the element and all its ancestors are fully visible.
    pub fn is_rendered(&self, id: ElementId) -> bool {
        self.visibility(id) == Visibility::Visible
            && self
                .ancestors(id)
                .into_iter()
                .all(|a| self.visibility(a) == Visibility::Visible)
    }

    /// Take an element's canvas out, leaving `None` in its place.
    pub(crate) fn take_canvas(&mut self, id: ElementId) -> Option<Canvas> {
        self.get_mut(id).and_then(|el| el.canvas.take())
    }

    /// Put a canvas back onto an element.
    pub(crate) fn restore_canvas(&mut self, id: ElementId, canvas: Canvas) {
        if let Some(el) = self.get_mut(id) {
            el.canvas = Some(canvas);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::node::Tag;

    /// Build a small test tree:
    /// ```text
    ///       root
    ///      /    \
    ///    a        b
    ///   / \
    ///  c   d
    /// ```
    fn build_tree() -> (ElementTree, ElementId, ElementId, ElementId, ElementId, ElementId) {
        let mut tree = ElementTree::new(Element::new(Tag::Window).with_attr("name", "root"));
        let root = tree.root();
        let a = tree.add_child(root, Element::new(Tag::Frame).with_attr("name", "a"));
        let b = tree.add_child(root, Element::new(Tag::Frame).with_attr("name", "b"));
        let c = tree.add_child(a, Element::new(Tag::Button).with_attr("name", "c"));
        let d = tree.add_child(a, Element::new(Tag::Label).with_attr("name", "d"));
        (tree, root, a, b, c, d)
    }

    #[test]
    fn new_tree_has_root_only() {
        let tree = ElementTree::new(Element::new(Tag::Window));
        assert_eq!(tree.len(), 1);
        assert!(tree.is_empty());
        assert!(tree.parent(tree.root()).is_none());
        assert!(tree.children(tree.root()).is_empty());
    }

    #[test]
    fn add_child_preserves_order() {
        let (tree, root, a, b, c, d) = build_tree();
        assert_eq!(tree.children(root), &[a, b]);
        assert_eq!(tree.children(a), &[c, d]);
        assert_eq!(tree.parent(c), Some(a));
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn ancestors_walk_to_root() {
        let (tree, root, a, _b, c, _d) = build_tree();
        assert_eq!(tree.ancestors(c), vec![a, root]);
        assert!(tree.ancestors(root).is_empty());
    }

    #[test]
    fn is_descendant_includes_self() {
        let (tree, root, a, b, c, _d) = build_tree();
        assert!(tree.is_descendant(c, a));
        assert!(tree.is_descendant(c, root));
        assert!(tree.is_descendant(a, a));
        assert!(!tree.is_descendant(c, b));
    }

    #[test]
    fn walk_depth_first_order() {
        let (tree, root, a, b, c, d) = build_tree();
        assert_eq!(tree.walk_depth_first(root), vec![root, a, c, d, b]);
    }

    #[test]
    fn collapsed_ancestor_hides_subtree() {
        let (mut tree, _root, a, b, c, _d) = build_tree();
        assert!(tree.is_effectively_visible(c));
        tree.set_visibility(a, Visibility::Collapsed);
        assert!(!tree.is_effectively_visible(c));
        assert!(!tree.is_effectively_visible(a));
        assert!(tree.is_effectively_visible(b));
    }

    #[test]
    fn hidden_ancestor_is_laid_out_but_not_rendered() {
        let (mut tree, _root, a, _b, c, _d) = build_tree();
        tree.set_visibility(a, Visibility::Hidden);
        assert!(tree.is_effectively_visible(c));
        assert!(!tree.is_rendered(c));
    }

    #[test]
    fn set_visibility_unknown_id() {
        let (mut tree, _root, _a, _b, c, _d) = build_tree();
        assert!(!tree.set_visibility(ElementId::default(), Visibility::Hidden));
        assert_eq!(tree.visibility(ElementId::default()), Visibility::Collapsed);
        assert!(tree.set_visibility(c, Visibility::Hidden));
        assert_eq!(tree.visibility(c), Visibility::Hidden);
    }
}
