//! The facade handed to click handlers and host hooks.

use crate::config::{OptionValue, Options};
use crate::dom::{Element, ElementId, ElementTree, Visibility};
use crate::render::canvas::Canvas;

/// Access to the running engine from inside a handler.
///
/// Borrows the element tree and options for the duration of one call.
/// Structural changes are limited to attributes and visibility; the next
/// layout pass picks them up.
pub struct System<'a> {
    tree: &'a mut ElementTree,
    options: &'a mut Options,
    exit: &'a mut bool,
}

impl<'a> System<'a> {
    pub(crate) fn new(tree: &'a mut ElementTree, options: &'a mut Options, exit: &'a mut bool) -> Self {
        Self { tree, options, exit }
    }

    /// The element named `name`.
    pub fn find(&self, name: &str) -> Option<ElementId> {
        self.tree.find_by_name(name)
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.tree.get(id)
    }

    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.tree.get_mut(id)
    }

    /// The element named `name`, mutably.
    pub fn element_by_name(&mut self, name: &str) -> Option<&mut Element> {
        let id = self.find(name)?;
        self.tree.get_mut(id)
    }

    /// The whole tree, read-only.
    pub fn tree(&self) -> &ElementTree {
        self.tree
    }

    /// Change the visibility of the element named `name`. Returns `false`
    /// when there is no such element.
    pub fn set_visibility(&mut self, name: &str, visibility: Visibility) -> bool {
        match self.find(name) {
            Some(id) => self.tree.set_visibility(id, visibility),
            None => false,
        }
    }

    /// The drawing canvas of the `canvas` element named `name`.
    ///
    /// Attached by the first layout pass; `None` before that.
    pub fn canvas(&mut self, name: &str) -> Option<&mut Canvas> {
        self.element_by_name(name)?.canvas.as_mut()
    }

    pub fn option(&self, key: &str) -> Option<OptionValue> {
        self.options.get(key)
    }

    pub fn set_option(&mut self, key: &str, value: impl Into<OptionValue>) {
        self.options.set(key, value);
    }

    /// The engine version.
    pub fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    /// Stop the engine after the current frame. Cleanup callbacks run and
    /// the terminal is restored before `App::run` returns.
    pub fn exit(&mut self) {
        tracing::info!("exit requested by handler");
        *self.exit = true;
    }

    pub fn is_exiting(&self) -> bool {
        *self.exit
    }
}
