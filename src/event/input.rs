//! Input types, decoupled from crossterm.
//!
//! The engine consumes at most one mouse sample and one key per frame, see
//! [`FrameInput`]. Crossterm events are converted through
//! [`InputEvent::from`] so the state machine never sees crossterm types.

use std::ops::BitOr;

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// Keyboard key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Tab,
    BackTab,
    Backspace,
    Delete,
    Insert,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
}

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

/// Modifier key bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(pub u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const SHIFT: Modifiers = Modifiers(1);
    pub const CTRL: Modifiers = Modifiers(2);
    pub const ALT: Modifiers = Modifiers(4);

    /// Check whether `self` contains all the bits in `other`.
    pub fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;
    fn bitor(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 | rhs.0)
    }
}

// ---------------------------------------------------------------------------
// KeyEvent
// ---------------------------------------------------------------------------

/// A key press with modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(code: Key, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// A key press without modifiers.
    pub fn plain(code: Key) -> Self {
        Self::new(code, Modifiers::NONE)
    }

    /// The printable ASCII character this key types, if any.
    ///
    /// Control and Alt chords type nothing.
    pub fn printable(&self) -> Option<char> {
        match self.code {
            Key::Char(c)
                if (' '..='~').contains(&c)
                    && !self.modifiers.contains(Modifiers::CTRL)
                    && !self.modifiers.contains(Modifiers::ALT) =>
            {
                Some(c)
            }
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Mouse
// ---------------------------------------------------------------------------

/// A mouse button the engine distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
}

/// One mouse sample: where the pointer is and which buttons are held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseSample {
    pub x: i32,
    pub y: i32,
    pub left: bool,
    pub right: bool,
}

impl MouseSample {
    /// Pointer at `(x, y)` with no button held.
    pub fn moved(x: i32, y: i32) -> Self {
        Self { x, y, left: false, right: false }
    }

    /// Left button held at `(x, y)`.
    pub fn left_down(x: i32, y: i32) -> Self {
        Self { x, y, left: true, right: false }
    }

    /// Right button held at `(x, y)`.
    pub fn right_down(x: i32, y: i32) -> Self {
        Self { x, y, left: false, right: true }
    }

    /// Whether any button is held.
    pub fn is_click(&self) -> bool {
        self.left || self.right
    }

    /// The held button, left taking priority.
    pub fn button(&self) -> Option<MouseButton> {
        if self.left {
            Some(MouseButton::Left)
        } else if self.right {
            Some(MouseButton::Right)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// FrameInput
// ---------------------------------------------------------------------------

/// Everything one frame consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameInput {
    pub mouse: Option<MouseSample>,
    pub key: Option<KeyEvent>,
}

impl FrameInput {
    /// A frame with no input.
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn mouse(sample: MouseSample) -> Self {
        Self { mouse: Some(sample), key: None }
    }

    pub fn key(key: KeyEvent) -> Self {
        Self { mouse: None, key: Some(key) }
    }
}

// ---------------------------------------------------------------------------
// InputEvent
// ---------------------------------------------------------------------------

/// A terminal event, as the run loop sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    Mouse(MouseSample),
    Resize { width: u16, height: u16 },
    /// Events the engine has no use for (drags, scrolling, key releases,
    /// focus changes, pastes).
    Ignored,
}

impl InputEvent {
    /// The per-frame input this event contributes.
    pub fn frame_input(self) -> FrameInput {
        match self {
            InputEvent::Key(key) => FrameInput::key(key),
            InputEvent::Mouse(sample) => FrameInput::mouse(sample),
            InputEvent::Resize { .. } | InputEvent::Ignored => FrameInput::idle(),
        }
    }
}

// ---------------------------------------------------------------------------
// From<crossterm> conversions
// ---------------------------------------------------------------------------

fn convert_modifiers(m: crossterm::event::KeyModifiers) -> Modifiers {
    use crossterm::event::KeyModifiers;
    let mut out = Modifiers::NONE;
    if m.contains(KeyModifiers::SHIFT) {
        out = out | Modifiers::SHIFT;
    }
    if m.contains(KeyModifiers::CONTROL) {
        out = out | Modifiers::CTRL;
    }
    if m.contains(KeyModifiers::ALT) {
        out = out | Modifiers::ALT;
    }
    out
}

fn convert_key(code: crossterm::event::KeyCode) -> Option<Key> {
    use crossterm::event::KeyCode;
    Some(match code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Escape,
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => Key::BackTab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Insert => Key::Insert,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        _ => return None,
    })
}

impl From<crossterm::event::Event> for InputEvent {
    fn from(ct: crossterm::event::Event) -> Self {
        use crossterm::event::{Event, KeyEventKind, MouseButton as Button, MouseEventKind};
        match ct {
            Event::Key(ke) if ke.kind != KeyEventKind::Release => match convert_key(ke.code) {
                Some(code) => InputEvent::Key(KeyEvent::new(code, convert_modifiers(ke.modifiers))),
                None => InputEvent::Ignored,
            },
            Event::Mouse(me) => {
                let (x, y) = (i32::from(me.column), i32::from(me.row));
                match me.kind {
                    MouseEventKind::Down(Button::Left) => InputEvent::Mouse(MouseSample::left_down(x, y)),
                    MouseEventKind::Down(Button::Right) => InputEvent::Mouse(MouseSample::right_down(x, y)),
                    MouseEventKind::Up(_) | MouseEventKind::Moved => InputEvent::Mouse(MouseSample::moved(x, y)),
                    _ => InputEvent::Ignored,
                }
            }
            Event::Resize(width, height) => InputEvent::Resize { width, height },
            _ => InputEvent::Ignored,
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
