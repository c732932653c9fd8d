//! Dynamically typed values held by the data store.

use std::fmt;

/// An option menu's choices plus the current selection.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Choice {
    /// Ordered `(label, enabled)` pairs.
    pub options: Vec<(String, bool)>,
    /// Index into `options`.
    pub selected_index: usize,
}

impl Choice {
    /// Build a choice from `(label, enabled)` pairs with the first selected.
    pub fn new<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = (S, bool)>,
        S: Into<String>,
    {
        Self {
            options: options.into_iter().map(|(l, e)| (l.into(), e)).collect(),
            selected_index: 0,
        }
    }

    /// Set the selection (builder).
    pub fn with_selected(mut self, index: usize) -> Self {
        self.selected_index = index;
        self
    }

    /// Label of the current selection, if the index is in range.
    pub fn selected_label(&self) -> Option<&str> {
        self.options.get(self.selected_index).map(|(l, _)| l.as_str())
    }

    /// Length of the longest label, in characters.
    pub fn longest_label(&self) -> usize {
        self.options
            .iter()
            .map(|(l, _)| l.chars().count())
            .max()
            .unwrap_or(0)
    }
}

/// A value stored under a data key.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Choice(Choice),
}

impl Value {
    /// Truthiness: empty text, zero and null are false.
    pub fn truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(f) => *f != 0.0,
            Value::Text(s) => !s.is_empty(),
            Value::Choice(c) => !c.options.is_empty(),
        }
    }

    /// Borrow as a choice, if it is one.
    pub fn as_choice(&self) -> Option<&Choice> {
        match self {
            Value::Choice(c) => Some(c),
            _ => None,
        }
    }

    /// Borrow as text, if it is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => f.write_str(s),
            Value::Choice(c) => f.write_str(c.selected_label().unwrap_or("")),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Choice> for Value {
    fn from(c: Choice) -> Self {
        Value::Choice(c)
    }
}
