//! Key binding registry and resolution.
//!
//! [`KeyBindingRegistry`] maps key+modifier combinations to [`BindingAction`]s.
//! Bindings are resolved before a key reaches the focused control, so a bound
//! key never types into an entry.

use std::collections::HashMap;

use super::input::{Key, KeyEvent, Modifiers};

// ---------------------------------------------------------------------------
// BindingAction
// ---------------------------------------------------------------------------

/// Action to take when a key binding is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingAction {
    /// Leave the run loop.
    Exit,
    /// Move focus to the next element in the focus order.
    FocusNext,
    /// Move focus to the previous element in the focus order.
    FocusPrevious,
    /// Close the open dropdown.
    Dismiss,
}

// ---------------------------------------------------------------------------
// KeyBindingRegistry
// ---------------------------------------------------------------------------

/// Registry of key bindings, mapping (Key, Modifiers) -> BindingAction.
#[derive(Debug, Clone, Default)]
pub struct KeyBindingRegistry {
    bindings: HashMap<(Key, Modifiers), BindingAction>,
}

impl KeyBindingRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the standard bindings.
    ///
    /// Defaults:
    /// - `Ctrl+C` -> Exit
    /// - `Tab` -> FocusNext
    /// - `BackTab` (Shift+Tab, with or without the reported Shift) -> FocusPrevious
    /// - `Escape` -> Dismiss
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.bind(Key::Char('c'), Modifiers::CTRL, BindingAction::Exit);
        registry.bind(Key::Tab, Modifiers::NONE, BindingAction::FocusNext);
        registry.bind(Key::BackTab, Modifiers::NONE, BindingAction::FocusPrevious);
        registry.bind(Key::BackTab, Modifiers::SHIFT, BindingAction::FocusPrevious);
        registry.bind(Key::Escape, Modifiers::NONE, BindingAction::Dismiss);
        registry
    }

    /// Register a key binding, replacing any existing one for the combination.
    pub fn bind(&mut self, key: Key, modifiers: Modifiers, action: BindingAction) {
        self.bindings.insert((key, modifiers), action);
    }

    /// Remove a key binding. Returns the removed action, if any.
    pub fn unbind(&mut self, key: Key, modifiers: Modifiers) -> Option<BindingAction> {
        self.bindings.remove(&(key, modifiers))
    }

    /// Look up the action for a key event (exact key + modifiers match).
    pub fn resolve(&self, event: &KeyEvent) -> Option<BindingAction> {
        self.bindings.get(&(event.code, event.modifiers)).copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
