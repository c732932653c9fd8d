//! Engine options: a flat configuration with typed fields and key/value access.
//!
//! Handlers reach options through [`System`](crate::app::System) by key, so
//! besides the builder API every recognized field is addressable by name
//! through [`Options::get`] and [`Options::set`].

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use crate::geometry::{downscale, Size};

// ---------------------------------------------------------------------------
// OptionValue
// ---------------------------------------------------------------------------

/// A dynamically typed option value.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl OptionValue {
    /// Interpret as a boolean. Integers are truthy when non-zero, text when
    /// it reads `true`, `yes`, `on` or `1`.
    pub fn as_bool(&self) -> bool {
        match self {
            OptionValue::Bool(b) => *b,
            OptionValue::Int(n) => *n != 0,
            OptionValue::Text(s) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "yes" | "on" | "1"),
        }
    }

    /// Interpret as an integer, if possible.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            OptionValue::Bool(b) => Some(i64::from(*b)),
            OptionValue::Int(n) => Some(*n),
            OptionValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(b) => write!(f, "{b}"),
            OptionValue::Int(n) => write!(f, "{n}"),
            OptionValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        OptionValue::Bool(b)
    }
}

impl From<i64> for OptionValue {
    fn from(n: i64) -> Self {
        OptionValue::Int(n)
    }
}

impl From<i32> for OptionValue {
    fn from(n: i32) -> Self {
        OptionValue::Int(i64::from(n))
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::Text(s.to_owned())
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        OptionValue::Text(s)
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Configuration for the engine.
#[derive(Debug, Clone)]
pub struct Options {
    /// Draw the title bar on the first row.
    pub show_title_bar: bool,
    /// Draw the `[X]` exit glyph in the title bar.
    pub show_exit_button: bool,
    /// Title bar text.
    pub title: String,
    /// Use the whole terminal instead of `window_width` x `window_height`.
    pub full_screen: bool,
    /// Window width in pixels.
    pub window_width: i32,
    /// Window height in pixels.
    pub window_height: i32,
    /// Sleep between frames.
    pub frame_delay: Duration,
    /// Frames between cursor blink toggles.
    pub blink_frames: u32,
    /// Largest color-pair id the terminal surface will allocate.
    pub max_color_pairs: u16,
    extra: HashMap<String, OptionValue>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            show_title_bar: true,
            show_exit_button: true,
            title: "ezUI App".to_owned(),
            full_screen: false,
            window_width: 800,
            window_height: 600,
            frame_delay: Duration::from_millis(10),
            blink_frames: 20,
            max_color_pairs: 256,
            extra: HashMap::new(),
        }
    }
}

impl Options {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title (builder).
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Show or hide the title bar (builder).
    pub fn with_title_bar(mut self, show: bool) -> Self {
        self.show_title_bar = show;
        self
    }

    /// Show or hide the exit glyph (builder).
    pub fn with_exit_button(mut self, show: bool) -> Self {
        self.show_exit_button = show;
        self
    }

    /// Fill the terminal (builder).
    pub fn with_full_screen(mut self, full: bool) -> Self {
        self.full_screen = full;
        self
    }

    /// Set the window size in pixels (builder).
    pub fn with_window_size(mut self, width: i32, height: i32) -> Self {
        self.window_width = width;
        self.window_height = height;
        self
    }

    /// Set the sleep between frames (builder).
    pub fn with_frame_delay(mut self, delay: Duration) -> Self {
        self.frame_delay = delay;
        self
    }

    /// Set the frames between cursor blink toggles (builder).
    pub fn with_blink_frames(mut self, frames: u32) -> Self {
        self.blink_frames = frames;
        self
    }

    /// Set the color-pair cap (builder).
    pub fn with_max_color_pairs(mut self, max: u16) -> Self {
        self.max_color_pairs = max;
        self
    }

    /// Window size in cells, when not running full screen.
    pub fn window_cells(&self) -> Size {
        downscale(self.window_width, self.window_height)
    }

    /// Read an option by key.
    pub fn get(&self, key: &str) -> Option<OptionValue> {
        match key {
            "show_title_bar" => Some(self.show_title_bar.into()),
            "show_exit_button" => Some(self.show_exit_button.into()),
            "title" => Some(self.title.clone().into()),
            "full_screen" => Some(self.full_screen.into()),
            "window_width" => Some(self.window_width.into()),
            "window_height" => Some(self.window_height.into()),
            _ => self.extra.get(key).cloned(),
        }
    }

    /// Write an option by key.
    ///
    /// Recognized keys are coerced to their field type; a value that cannot
    /// be coerced leaves the field unchanged. Unknown keys are stored as-is.
    pub fn set(&mut self, key: &str, value: impl Into<OptionValue>) {
        let value = value.into();
        match key {
            "show_title_bar" => self.show_title_bar = value.as_bool(),
            "show_exit_button" => self.show_exit_button = value.as_bool(),
            "title" => self.title = value.to_string(),
            "full_screen" => self.full_screen = value.as_bool(),
            "window_width" | "window_height" => {
                let Some(n) = value.as_int().and_then(|n| i32::try_from(n).ok()) else {
                    tracing::debug!(key, %value, "ignoring non-numeric option");
                    return;
                };
                if key == "window_width" {
                    self.window_width = n;
                } else {
                    self.window_height = n;
                }
            }
            _ => {
                self.extra.insert(key.to_owned(), value);
            }
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
