//! Pilot: programmatic interaction with a headless App.
//!
//! The `Pilot` wraps an [`App`] and a [`HeadlessSurface`] and provides
//! methods to simulate user input (clicks, hovering, key presses, resize).
//! Every call runs exactly one frame per input sample, so what a test sees
//! on the surface afterwards is what a terminal would show.

use crate::app::App;
use crate::event::input::{FrameInput, Key, KeyEvent, Modifiers, MouseSample};
use crate::geometry::Region;
use crate::render::surface::HeadlessSurface;
use crate::testing::snapshot::surface_to_string;

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless app driver for testing.
///
/// # Examples
///
/// ```
/// use ezui::app::App;
/// use ezui::config::Options;
/// use ezui::data::DataModel;
/// use ezui::dom::{Element, ElementTree, Tag};
/// use ezui::testing::Pilot;
///
/// let mut tree = ElementTree::new(Element::new(Tag::Window));
/// let root = tree.root();
/// tree.add_child(root, Element::new(Tag::Label).with_attr("text", "Hello"));
/// let app = App::new(tree, DataModel::new(), Options::new().with_full_screen(true));
///
/// let pilot = Pilot::new(app, 40, 10);
/// assert!(pilot.screen_text().contains("Hello"));
/// ```
pub struct Pilot {
    app: App,
    surface: HeadlessSurface,
}

impl Pilot {
    /// Size the app's screen to `width` x `height` and render a first frame.
    pub fn new(mut app: App, width: i32, height: i32) -> Self {
        app.resize(width, height);
        let mut pilot = Self { app, surface: HeadlessSurface::new(width, height) };
        pilot.idle();
        pilot
    }

    // ── Input simulation ─────────────────────────────────────────────

    /// Run one frame with no input.
    pub fn idle(&mut self) {
        self.frame(FrameInput::idle());
    }

    /// Run `n` frames with no input.
    pub fn idle_frames(&mut self, n: usize) {
        for _ in 0..n {
            self.idle();
        }
    }

    /// Press the left button at (x, y).
    pub fn mouse_down(&mut self, x: i32, y: i32) {
        self.frame(FrameInput::mouse(MouseSample::left_down(x, y)));
    }

    /// Release the button at (x, y).
    pub fn mouse_up(&mut self, x: i32, y: i32) {
        self.frame(FrameInput::mouse(MouseSample::moved(x, y)));
    }

    /// Press and release at (x, y): two frames.
    pub fn click(&mut self, x: i32, y: i32) {
        self.mouse_down(x, y);
        self.mouse_up(x, y);
    }

    /// Move to the first cell of the element named `name` and click it:
    /// three frames. Returns `false` when it has no screen rectangle.
    pub fn click_on(&mut self, name: &str) -> bool {
        match self.region_of(name) {
            Some(r) => {
                self.hover(r.x, r.y);
                self.click(r.x, r.y);
                true
            }
            None => false,
        }
    }

    /// Press and release the right button at (x, y): two frames.
    pub fn right_click(&mut self, x: i32, y: i32) {
        self.frame(FrameInput::mouse(MouseSample::right_down(x, y)));
        self.mouse_up(x, y);
    }

    /// Move the mouse to (x, y) without pressing.
    pub fn hover(&mut self, x: i32, y: i32) {
        self.frame(FrameInput::mouse(MouseSample::moved(x, y)));
    }

    /// Press a key with no modifiers.
    pub fn press(&mut self, key: Key) {
        self.press_with(key, Modifiers::NONE);
    }

    /// Press a key with the given modifiers.
    pub fn press_with(&mut self, key: Key, modifiers: Modifiers) {
        self.frame(FrameInput::key(KeyEvent::new(key, modifiers)));
    }

    /// Type each character of `text` as its own key press.
    pub fn type_text(&mut self, text: &str) {
        for ch in text.chars() {
            self.press(Key::Char(ch));
        }
    }

    /// Simulate a terminal resize and render a frame at the new size.
    pub fn resize(&mut self, width: i32, height: i32) {
        self.surface = HeadlessSurface::new(width, height);
        self.app.resize(width, height);
        self.idle();
    }

    fn frame(&mut self, input: FrameInput) {
        self.app.step(input, &mut self.surface);
    }

    // ── Query ────────────────────────────────────────────────────────

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    pub fn surface(&self) -> &HeadlessSurface {
        &self.surface
    }

    /// The last presented frame as text.
    pub fn screen_text(&self) -> String {
        surface_to_string(&self.surface)
    }

    /// Screen rectangle of the element named `name`.
    pub fn region_of(&self, name: &str) -> Option<Region> {
        let id = self.app.find(name)?;
        self.app.layout().screen_region(id)
    }

    /// Whether the app is still running.
    pub fn is_running(&self) -> bool {
        self.app.is_running()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
