//! Element queries: by name, by tag, generic predicate matching.

use super::node::{Element, ElementId, Tag};
use super::tree::ElementTree;

impl ElementTree {
    /// Find the first element, in tree order, whose `name` attribute matches.
    pub fn find_by_name(&self, name: &str) -> Option<ElementId> {
        self.walk_depth_first(self.root())
            .into_iter()
            .find(|&id| self.get(id).and_then(Element::name) == Some(name))
    }

    /// Find all elements with the given tag, in tree order.
    pub fn query_by_tag(&self, tag: Tag) -> Vec<ElementId> {
        self.query_all(|el| el.tag == tag)
    }

    /// Find all elements matching an arbitrary predicate, in tree order.
    pub fn query_all(&self, predicate: impl Fn(&Element) -> bool) -> Vec<ElementId> {
        self.walk_depth_first(self.root())
            .into_iter()
            .filter(|&id| self.get(id).is_some_and(&predicate))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::dom::node::{Element, Tag};
    use crate::dom::tree::ElementTree;

    /// Build a test tree for queries:
    /// ```text
    ///        root (window)
    ///       /     \
    ///   form       ok (button)
    ///  (frame)
    ///   /   \
    /// name   ok (button, shadowed)
    /// (entry)
    /// ```
    fn build_query_tree() -> ElementTree {
        let mut tree = ElementTree::new(Element::new(Tag::Window));
        let root = tree.root();
        let form = tree.add_child(root, Element::new(Tag::Frame).with_attr("name", "form"));
        tree.add_child(form, Element::new(Tag::Entry).with_attr("name", "name"));
        tree.add_child(
            form,
            Element::new(Tag::Button).with_attr("name", "ok").with_attr("text", "inner"),
        );
        tree.add_child(
            root,
            Element::new(Tag::Button).with_attr("name", "ok").with_attr("text", "outer"),
        );
        tree
    }

    #[test]
    fn find_by_name_returns_first_in_tree_order() {
        let tree = build_query_tree();
        let ok = tree.find_by_name("ok").unwrap();
        assert_eq!(tree.get(ok).unwrap().text(), "inner");
        assert!(tree.find_by_name("missing").is_none());
    }

    #[test]
    fn query_by_tag_collects_all() {
        let tree = build_query_tree();
        assert_eq!(tree.query_by_tag(Tag::Button).len(), 2);
        assert_eq!(tree.query_by_tag(Tag::Entry).len(), 1);
        assert_eq!(tree.query_by_tag(Tag::OptionMenu).len(), 0);
    }

    #[test]
    fn query_all_with_predicate() {
        let tree = build_query_tree();
        let named = tree.query_all(|el| el.name().is_some());
        assert_eq!(named.len(), 4);
    }
}
