//! Node types: ElementId, Tag, Visibility, Element.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use slotmap::new_key_type;

use crate::error::Error;
use crate::render::canvas::Canvas;

new_key_type! {
    /// Unique identifier for an element. Copy, lightweight (u64).
    pub struct ElementId;
}

// ---------------------------------------------------------------------------
// Tag
// ---------------------------------------------------------------------------

/// The semantic role of an element.
///
/// This is the closed set of node kinds the engine understands. Size
/// estimation and drawing are exhaustive matches over it; the capability
/// queries below decide how a tag takes part in layout and input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Window,
    Frame,
    Label,
    Entry,
    Button,
    CheckButton,
    RadioButton,
    OptionMenu,
    TextBox,
    Canvas,
}

impl Tag {
    /// Tags that lay out children inside their own coordinate origin.
    pub const fn is_container(self) -> bool {
        matches!(self, Tag::Window | Tag::Frame)
    }

    /// Tags that register a hit-test zone and can hold focus.
    pub const fn hit_testable(self) -> bool {
        matches!(
            self,
            Tag::Entry
                | Tag::TextBox
                | Tag::Button
                | Tag::CheckButton
                | Tag::RadioButton
                | Tag::OptionMenu
        )
    }

    /// Tags whose zone carries a click action.
    pub const fn click_activatable(self) -> bool {
        matches!(
            self,
            Tag::Button | Tag::CheckButton | Tag::RadioButton | Tag::OptionMenu
        )
    }

    /// Tags that accept typed text.
    pub const fn is_text_input(self) -> bool {
        matches!(self, Tag::Entry | Tag::TextBox)
    }

    /// The tag's name in the element vocabulary.
    pub const fn as_str(self) -> &'static str {
        match self {
            Tag::Window => "window",
            Tag::Frame => "frame",
            Tag::Label => "label",
            Tag::Entry => "entry",
            Tag::Button => "button",
            Tag::CheckButton => "checkbutton",
            Tag::RadioButton => "radiobutton",
            Tag::OptionMenu => "optionmenu",
            Tag::TextBox => "textbox",
            Tag::Canvas => "canvas",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "window" => Ok(Tag::Window),
            "frame" => Ok(Tag::Frame),
            "label" => Ok(Tag::Label),
            "entry" => Ok(Tag::Entry),
            "button" => Ok(Tag::Button),
            "checkbutton" => Ok(Tag::CheckButton),
            "radiobutton" => Ok(Tag::RadioButton),
            "optionmenu" => Ok(Tag::OptionMenu),
            "textbox" => Ok(Tag::TextBox),
            "canvas" => Ok(Tag::Canvas),
            other => Err(Error::UnknownTag(other.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// Visibility / ModalKind / Role
// ---------------------------------------------------------------------------

/// Visibility state of an element.
///
/// `Hidden` elements keep their layout space but are neither drawn nor
/// focusable. `Collapsed` elements and their subtrees are skipped by layout,
/// hit-testing and focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
    Collapsed,
}

impl Visibility {
    /// Parse the `visibility` attribute. Unknown values read as visible.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "hidden" => Visibility::Hidden,
            "collapsed" => Visibility::Collapsed,
            _ => Visibility::Visible,
        }
    }
}

/// How a modal frame reacts to clicks outside its rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    /// Dismissed by an outside click.
    Clear,
    /// Dims the rest of the window and swallows outside clicks.
    Opaque,
}

impl ModalKind {
    /// Parse the `ezModal` attribute.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clear" => Some(ModalKind::Clear),
            "opaque" => Some(ModalKind::Opaque),
            _ => None,
        }
    }

    /// Whether an outside click collapses the modal.
    pub const fn dismiss_on_outside_click(self) -> bool {
        matches!(self, ModalKind::Clear)
    }
}

/// Where an element came from.
///
/// Dropdown frames and their option buttons are synthesized by the engine
/// and point back at the option menu that owns them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    #[default]
    Declared,
    Dropdown { menu: ElementId },
    DropdownOption { menu: ElementId, index: usize, enabled: bool },
}

// ---------------------------------------------------------------------------
// Element
// ---------------------------------------------------------------------------

/// A node of the declared UI tree.
#[derive(Debug, Clone)]
pub struct Element {
    /// Semantic role.
    pub tag: Tag,
    /// String attributes (`text`, `ezBind`, `pack`, ...).
    pub attributes: HashMap<String, String>,
    /// Current visibility.
    pub visibility: Visibility,
    /// Declared by the host or synthesized by the engine.
    pub role: Role,
    /// Off-screen canvas, attached once the element has been laid out.
    pub canvas: Option<Canvas>,
}

impl Element {
    /// Create an element with no attributes.
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            attributes: HashMap::new(),
            visibility: Visibility::Visible,
            role: Role::Declared,
            canvas: None,
        }
    }

    /// Set an attribute (builder).
    ///
    /// The `visibility` attribute also seeds the visibility state.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Set the visibility (builder).
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub(crate) fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Set an attribute.
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if key == "visibility" {
            self.visibility = Visibility::parse(&value);
        }
        self.attributes.insert(key, value);
    }

    /// Read an attribute.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Read the first present attribute among `keys`.
    pub fn attr_any(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|k| self.attr(k))
    }

    /// The `name` attribute.
    pub fn name(&self) -> Option<&str> {
        self.attr("name")
    }

    /// The `text` attribute, or an empty string.
    pub fn text(&self) -> &str {
        self.attr("text").unwrap_or("")
    }

    /// The data key from `ezBind`, with surrounding parentheses removed.
    pub fn bind_key(&self) -> Option<&str> {
        let raw = self.attr("ezBind")?.trim();
        let key = raw
            .strip_prefix('(')
            .and_then(|s| s.strip_suffix(')'))
            .unwrap_or(raw)
            .trim();
        (!key.is_empty()).then_some(key)
    }

    /// Parse an integer attribute.
    ///
    /// Absent attributes and values that do not parse both yield `None`; the
    /// latter is logged and the caller falls back to its default.
    pub fn int_attr(&self, key: &str) -> Option<i32> {
        let raw = self.attr(key)?;
        match raw.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Some(n as i32),
            _ => {
                tracing::debug!(tag = %self.tag, key, value = raw, "attribute parse fallback");
                None
            }
        }
    }

    /// Parse a boolean attribute (`true`, `yes`, `on`, `1`).
    pub fn bool_attr(&self, key: &str) -> bool {
        self.attr(key).is_some_and(|v| {
            matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "yes" | "on" | "1")
        })
    }

    /// The modal kind from `ezModal`, if any.
    pub fn modal_kind(&self) -> Option<ModalKind> {
        self.attr("ezModal").and_then(ModalKind::parse)
    }
}
