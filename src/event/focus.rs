//! Tab-order focus tracking.

use crate::dom::ElementId;

/// Maintains the ordered list of focusable elements and which one is focused.
///
/// The chain is rebuilt from every layout's focus order. Focus cycles through
/// the chain in forward (Tab) or backward (Shift+Tab) order.
#[derive(Debug, Clone, Default)]
pub struct FocusChain {
    nodes: Vec<ElementId>,
    current: Option<usize>,
}

impl FocusChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the chain with `order`.
    ///
    /// Focus is preserved when the focused element is still in the chain
    /// and cleared otherwise.
    pub fn rebuild(&mut self, order: &[ElementId]) {
        let old = self.current_node();
        self.nodes.clear();
        self.nodes.extend_from_slice(order);
        self.current = old.and_then(|id| self.nodes.iter().position(|&n| n == id));
    }

    /// The focused element, if any.
    pub fn current_node(&self) -> Option<ElementId> {
        self.current.and_then(|idx| self.nodes.get(idx).copied())
    }

    /// Move focus to the next element, wrapping around.
    pub fn focus_next(&mut self) -> Option<ElementId> {
        if self.nodes.is_empty() {
            return None;
        }
        let next = match self.current {
            Some(idx) => (idx + 1) % self.nodes.len(),
            None => 0,
        };
        self.current = Some(next);
        self.nodes.get(next).copied()
    }

    /// Move focus to the previous element, wrapping around.
    pub fn focus_previous(&mut self) -> Option<ElementId> {
        if self.nodes.is_empty() {
            return None;
        }
        let prev = match self.current {
            Some(0) | None => self.nodes.len() - 1,
            Some(idx) => idx - 1,
        };
        self.current = Some(prev);
        self.nodes.get(prev).copied()
    }

    /// Focus a specific element. Returns `false` when it is not in the chain.
    pub fn focus_node(&mut self, id: ElementId) -> bool {
        match self.nodes.iter().position(|&n| n == id) {
            Some(pos) => {
                self.current = Some(pos);
                true
            }
            None => false,
        }
    }

    /// Drop focus.
    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
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

    #[test]
    fn next_and_previous_wrap() {
        let ids = ids(3);
        let mut chain = FocusChain::new();
        chain.rebuild(&ids);
        assert_eq!(chain.current_node(), None);
        assert_eq!(chain.focus_next(), Some(ids[0]));
        assert_eq!(chain.focus_next(), Some(ids[1]));
        assert_eq!(chain.focus_next(), Some(ids[2]));
        assert_eq!(chain.focus_next(), Some(ids[0]));
        assert_eq!(chain.focus_previous(), Some(ids[2]));
    }

    #[test]
    fn previous_from_nothing_goes_to_last() {
        let ids = ids(2);
        let mut chain = FocusChain::new();
        chain.rebuild(&ids);
        assert_eq!(chain.focus_previous(), Some(ids[1]));
    }

    #[test]
    fn empty_chain_never_focuses() {
        let mut chain = FocusChain::new();
        assert!(chain.is_empty());
        assert_eq!(chain.focus_next(), None);
        assert_eq!(chain.focus_previous(), None);
    }

    #[test]
    fn rebuild_preserves_or_clears_focus() {
        let ids = ids(3);
        let mut chain = FocusChain::new();
        chain.rebuild(&ids);
        assert!(chain.focus_node(ids[1]));

        chain.rebuild(&[ids[2], ids[1]]);
        assert_eq!(chain.current_node(), Some(ids[1]));
        assert_eq!(chain.len(), 2);

        chain.rebuild(&[ids[0]]);
        assert_eq!(chain.current_node(), None);
        assert!(!chain.focus_node(ids[2]));
    }
}
