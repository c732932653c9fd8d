//! Engine interaction state: focus, cursor, pending click, dropdown and
//! modal markers, hover, blink.
//!
//! All of it lives on one [`InteractionState`] owned by the app and passed
//! explicitly to the input handlers and the painter.

use super::focus::FocusChain;
use super::input::MouseButton;
use crate::dom::ElementId;
use crate::geometry::Region;
use crate::layout::{ClickAction, ZoneTarget};

/// Top-level input mode, derived from the dropdown and modal markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionMode {
    Idle,
    ModalOpen,
    DropdownOpen,
}

/// A click whose mouse-down has been seen and that fires on release.
#[derive(Debug, Clone)]
pub struct PendingActivation {
    /// The zone the press landed in. The release must land in it too.
    pub zone: Region,
    /// The button that pressed. Only a left press activates on release.
    pub button: MouseButton,
    pub action: ClickAction,
    pub target: ZoneTarget,
    pub name: Option<String>,
}

/// Cursor blink timer: flips every `period` frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blink {
    counter: u32,
    period: u32,
    visible: bool,
}

impl Blink {
    pub fn new(period: u32) -> Self {
        Self { counter: 0, period: period.max(1), visible: true }
    }

    /// Advance one frame.
    pub fn tick(&mut self) {
        self.counter += 1;
        if self.counter >= self.period {
            self.counter = 0;
            self.visible = !self.visible;
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

/// Mutable per-session interaction state.
#[derive(Debug, Clone)]
pub struct InteractionState {
    pub focus: FocusChain,
    /// Cursor of the focused text input, in characters.
    pub cursor: usize,
    /// Typing replaces the character under the cursor.
    pub overwrite: bool,
    pub pending: Option<PendingActivation>,
    /// The click zone under the mouse this frame.
    pub hover: Option<ZoneTarget>,
    /// Last known mouse position.
    pub mouse: Option<(i32, i32)>,
    /// Swallows the next mouse sample after a dropdown opens.
    pub dropdown_guard: bool,
    /// Close the open dropdown once the current frame has rendered.
    pub close_dropdown_next_frame: bool,
    /// The dropdown frame currently open.
    pub active_dropdown: Option<ElementId>,
    /// The modal frame currently restricting input.
    pub active_modal: Option<ElementId>,
    pub blink: Blink,
}

impl InteractionState {
    pub fn new(blink_frames: u32) -> Self {
        Self {
            focus: FocusChain::new(),
            cursor: 0,
            overwrite: false,
            pending: None,
            hover: None,
            mouse: None,
            dropdown_guard: false,
            close_dropdown_next_frame: false,
            active_dropdown: None,
            active_modal: None,
            blink: Blink::new(blink_frames),
        }
    }

    /// The current input mode. An open dropdown takes priority.
    pub fn mode(&self) -> InteractionMode {
        if self.active_dropdown.is_some() {
            InteractionMode::DropdownOpen
        } else if self.active_modal.is_some() {
            InteractionMode::ModalOpen
        } else {
            InteractionMode::Idle
        }
    }

    pub fn focused(&self) -> Option<ElementId> {
        self.focus.current_node()
    }

    /// Whether the mouse is over `target`.
    pub fn is_hovered(&self, target: ZoneTarget) -> bool {
        self.hover == Some(target)
    }
}
