//! App struct: lifecycle, frame step, run loop.
//!
//! [`App`] is the single engine context. It owns the element tree, the data
//! store, the options, the interaction state and the latest layout, and
//! passes them explicitly to the layout, input and paint passes. The frame
//! step is surface-agnostic, so the same code drives a real terminal in
//! [`App::run`] and a [`HeadlessSurface`](crate::render::surface::HeadlessSurface)
//! in tests.

mod dropdown;
mod input;
mod system;

pub use system::System;

use std::thread;
use std::time::Duration;

use crossterm::event;

use crate::config::Options;
use crate::data::DataModel;
use crate::dom::{ElementId, ElementTree, Tag};
use crate::error::Result;
use crate::event::binding::KeyBindingRegistry;
use crate::event::input::{FrameInput, InputEvent};
use crate::event::state::InteractionState;
use crate::geometry::Size;
use crate::layout::{compute_layout, LayoutResult};
use crate::render::canvas::{Canvas, RenderMode};
use crate::render::driver::{install_panic_hook, Driver};
use crate::render::paint::Painter;
use crate::render::surface::Surface;

/// A host hook run with the system facade and the data store.
pub type Hook = Box<dyn FnMut(&mut System<'_>, &mut DataModel)>;

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// The engine.
pub struct App {
    tree: ElementTree,
    data: DataModel,
    options: Options,
    state: InteractionState,
    bindings: KeyBindingRegistry,
    /// Screen size in cells.
    screen: Size,
    layout: LayoutResult,
    root_canvas: Canvas,
    exit_requested: bool,
    started: bool,
    cleaned_up: bool,
    on_start: Option<Hook>,
    on_frame: Option<Hook>,
    cleanup: Vec<Box<dyn FnMut()>>,
}

impl App {
    /// Create an engine for a declared tree.
    ///
    /// Synthesizes the option-menu dropdowns and runs a first layout pass
    /// against a screen of the configured window size; call
    /// [`resize`](Self::resize) to lay out for a real screen.
    pub fn new(mut tree: ElementTree, data: DataModel, options: Options) -> Self {
        dropdown::synthesize_dropdowns(&mut tree, &data);
        let screen = options.window_cells();
        let state = InteractionState::new(options.blink_frames);
        let layout = compute_layout(&tree, &data, &options, screen);
        let mut app = Self {
            tree,
            data,
            options,
            state,
            bindings: KeyBindingRegistry::with_defaults(),
            screen,
            layout,
            root_canvas: Canvas::new(0, 0, RenderMode::Cell),
            exit_requested: false,
            started: false,
            cleaned_up: false,
            on_start: None,
            on_frame: None,
            cleanup: Vec::new(),
        };
        app.relayout();
        app
    }

    /// Register the hook run once before the first frame.
    pub fn on_start(&mut self, hook: impl FnMut(&mut System<'_>, &mut DataModel) + 'static) {
        self.on_start = Some(Box::new(hook));
    }

    /// Register the hook run every frame, before drawing.
    pub fn on_frame(&mut self, hook: impl FnMut(&mut System<'_>, &mut DataModel) + 'static) {
        self.on_frame = Some(Box::new(hook));
    }

    /// Register a callback run once when the engine stops.
    pub fn on_cleanup(&mut self, callback: impl FnMut() + 'static) {
        self.cleanup.push(Box::new(callback));
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn tree(&self) -> &ElementTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut ElementTree {
        &mut self.tree
    }

    pub fn data(&self) -> &DataModel {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut DataModel {
        &mut self.data
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    /// The latest layout.
    pub fn layout(&self) -> &LayoutResult {
        &self.layout
    }

    pub fn bindings_mut(&mut self) -> &mut KeyBindingRegistry {
        &mut self.bindings
    }

    /// The element named `name`.
    pub fn find(&self, name: &str) -> Option<ElementId> {
        self.tree.find_by_name(name)
    }

    /// The most recently composited frame.
    pub fn root_canvas(&self) -> &Canvas {
        &self.root_canvas
    }

    pub fn is_running(&self) -> bool {
        !self.exit_requested
    }

    /// Stop after the current frame.
    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    /// Change the screen size and lay out again.
    pub fn resize(&mut self, width: i32, height: i32) {
        self.screen = Size::new(width.max(0), height.max(0));
        self.relayout();
    }

    // ── Frame ────────────────────────────────────────────────────────

    /// Run one frame: input, host hook, layout, drawing, presentation.
    ///
    /// Everything a frame's input causes is visible in that frame's output.
    pub fn step(&mut self, input: FrameInput, surface: &mut dyn Surface) {
        if !self.started {
            self.started = true;
            if let Some(mut hook) = self.on_start.take() {
                self.run_hook(&mut hook);
            }
            self.relayout();
        }

        self.state.blink.tick();
        if let Some(sample) = input.mouse {
            self.state.mouse = Some((sample.x, sample.y));
            self.state.hover = self.layout.zones.hover_at(sample.x, sample.y);
            self.handle_mouse(sample);
        }
        if let Some(key) = input.key {
            self.handle_key(key);
        }
        if let Some(mut hook) = self.on_frame.take() {
            self.run_hook(&mut hook);
            self.on_frame = Some(hook);
        }

        self.render(surface);

        if self.state.close_dropdown_next_frame {
            self.state.close_dropdown_next_frame = false;
            if let Some(dropdown) = self.state.active_dropdown {
                self.close_dropdown(dropdown);
            }
            self.relayout();
        }

        if self.exit_requested {
            self.finish();
        }
    }

    /// Recompute the layout and everything derived from it.
    pub fn relayout(&mut self) {
        self.layout = compute_layout(&self.tree, &self.data, &self.options, self.screen);
        self.state.focus.rebuild(&self.layout.focus_order);
        self.state.active_modal = self.layout.modal.map(|(id, _)| id);
        self.state.active_dropdown = self.layout.open_dropdown;
        self.state.hover = self.state.mouse.and_then(|(x, y)| self.layout.zones.hover_at(x, y));
        self.attach_canvases();
    }

    /// Give every laid-out `canvas` element a pixel canvas of its size.
    fn attach_canvases(&mut self) {
        let ids: Vec<ElementId> = self.layout.placements.keys().collect();
        for id in ids {
            let Some(size) = self.layout.placement(id).map(|p| p.local.size()) else { continue };
            let Some(el) = self.tree.get_mut(id) else { continue };
            if el.tag != Tag::Canvas {
                continue;
            }
            let wanted = Size::new(size.width, size.height * 2);
            if el.canvas.as_ref().map(Canvas::size) != Some(wanted) {
                el.canvas = Some(Canvas::new(wanted.width, wanted.height, RenderMode::Pixel));
            }
        }
    }

    fn render(&mut self, surface: &mut dyn Surface) {
        self.relayout();
        let window = self.layout.window;
        if self.root_canvas.size() != window {
            self.root_canvas = Canvas::new(window.width, window.height, RenderMode::Cell);
        }
        let painter = Painter {
            data: &self.data,
            options: &self.options,
            layout: &self.layout,
            state: &self.state,
        };
        painter.paint(&mut self.tree, &mut self.root_canvas);
        painter.present(&self.tree, &self.root_canvas, surface);
    }

    fn run_hook(&mut self, hook: &mut Hook) {
        let mut system = System::new(&mut self.tree, &mut self.options, &mut self.exit_requested);
        hook(&mut system, &mut self.data);
    }

    /// Run the cleanup callbacks, once.
    fn finish(&mut self) {
        if self.cleaned_up {
            return;
        }
        self.cleaned_up = true;
        for callback in &mut self.cleanup {
            callback();
        }
    }

    // ── Terminal ─────────────────────────────────────────────────────

    /// Take over the terminal and run until exit is requested.
    ///
    /// Terminal modes are restored on return, on drop of the driver, and
    /// from the panic hook.
    pub fn run(mut self) -> Result<()> {
        install_panic_hook();
        let mut driver = Driver::new(self.options.max_color_pairs)?;
        driver.enter()?;
        let size = driver.size();
        self.resize(size.width, size.height);
        tracing::info!(width = size.width, height = size.height, "ezui run loop started");

        while self.is_running() {
            let input = self.poll_input(&mut driver);
            self.step(input, &mut driver);
            thread::sleep(self.options.frame_delay);
        }

        self.finish();
        driver.restore()?;
        tracing::info!("ezui run loop exited");
        Ok(())
    }

    /// Read pending terminal events until one carries a mouse sample or a
    /// key. Never blocks.
    fn poll_input(&mut self, driver: &mut Driver) -> FrameInput {
        loop {
            match event::poll(Duration::ZERO) {
                Ok(true) => {}
                Ok(false) => return FrameInput::idle(),
                Err(err) => {
                    tracing::trace!(%err, "input poll failed");
                    return FrameInput::idle();
                }
            }
            let event = match event::read() {
                Ok(event) => InputEvent::from(event),
                Err(err) => {
                    tracing::trace!(%err, "input read failed");
                    return FrameInput::idle();
                }
            };
            match event {
                InputEvent::Resize { width, height } => {
                    driver.resize(width, height);
                    self.resize(i32::from(width), i32::from(height));
                }
                InputEvent::Ignored => {}
                other => return other.frame_input(),
            }
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Element, Visibility};
    use crate::event::input::{Key, KeyEvent, MouseSample};
    use crate::render::surface::HeadlessSurface;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;
    use std::rc::Rc;

    fn headless_app(tree: ElementTree) -> (App, HeadlessSurface) {
        let mut app = App::new(tree, DataModel::new(), Options::new().with_full_screen(true));
        app.resize(30, 10);
        (app, HeadlessSurface::new(30, 10))
    }

    fn window() -> ElementTree {
        ElementTree::new(Element::new(Tag::Window))
    }

    // ── Construction ─────────────────────────────────────────────────

    #[test]
    fn new_app_is_laid_out_and_running() {
        let mut tree = window();
        let root = tree.root();
        let entry = tree.add_child(root, Element::new(Tag::Entry));
        let (app, _) = headless_app(tree);
        assert!(app.is_running());
        assert_eq!(app.layout().focus_order, vec![entry]);
        assert_eq!(app.layout().window, Size::new(30, 10));
    }

    #[test]
    fn windowed_mode_uses_configured_size() {
        let app = App::new(window(), DataModel::new(), Options::new().with_window_size(160, 96));
        assert_eq!(app.layout().window, Size::new(20, 6));
    }

    // ── Hooks ────────────────────────────────────────────────────────

    #[test]
    fn start_hook_runs_once_and_frame_hook_every_frame() {
        let (mut app, mut surface) = headless_app(window());
        let starts = Rc::new(Cell::new(0));
        let frames = Rc::new(Cell::new(0));
        let (s, f) = (starts.clone(), frames.clone());
        app.on_start(move |_, _| s.set(s.get() + 1));
        app.on_frame(move |_, data| {
            f.set(f.get() + 1);
            data.update("frames", i64::from(f.get()));
        });
        for _ in 0..3 {
            app.step(FrameInput::idle(), &mut surface);
        }
        assert_eq!(starts.get(), 1);
        assert_eq!(frames.get(), 3);
        assert_eq!(app.data().text("frames"), "3");
        assert_eq!(surface.frames_presented(), 3);
    }

    #[test]
    fn exit_from_hook_runs_cleanup_once() {
        let (mut app, mut surface) = headless_app(window());
        let cleaned = Rc::new(Cell::new(0));
        let c = cleaned.clone();
        app.on_cleanup(move || c.set(c.get() + 1));
        app.on_frame(|system, _| system.exit());
        app.step(FrameInput::idle(), &mut surface);
        assert!(!app.is_running());
        app.step(FrameInput::idle(), &mut surface);
        assert_eq!(cleaned.get(), 1);
    }

    #[test]
    fn hook_visibility_change_shows_in_same_frame() {
        let mut tree = window();
        let root = tree.root();
        let label = tree.add_child(
            root,
            Element::new(Tag::Label).with_attr("name", "msg").with_attr("text", "hi").with_visibility(Visibility::Collapsed),
        );
        let (mut app, mut surface) = headless_app(tree);
        app.on_start(|system, _| {
            system.set_visibility("msg", Visibility::Visible);
        });
        app.step(FrameInput::idle(), &mut surface);
        assert!(app.layout().is_visible(label));
        assert!((0..10).any(|y| surface.row(y).contains("hi")));
    }

    // ── Frame flow ───────────────────────────────────────────────────

    #[test]
    fn title_exit_glyph_stops_the_app() {
        let (mut app, mut surface) = headless_app(window());
        app.step(FrameInput::mouse(MouseSample::left_down(27, 0)), &mut surface);
        assert!(app.is_running());
        app.step(FrameInput::mouse(MouseSample::moved(27, 0)), &mut surface);
        assert!(!app.is_running());
    }

    #[test]
    fn hover_follows_the_mouse() {
        let mut tree = window();
        let root = tree.root();
        let button = tree.add_child(root, Element::new(Tag::Button).with_attr("text", "b"));
        let (mut app, mut surface) = headless_app(tree);
        let r = app.layout().screen_region(button).unwrap();
        app.step(FrameInput::mouse(MouseSample::moved(r.x, r.y)), &mut surface);
        assert!(app.state().is_hovered(crate::layout::ZoneTarget::Element(button)));
        app.step(FrameInput::mouse(MouseSample::moved(0, 9)), &mut surface);
        assert_eq!(app.state().hover, None);
    }

    #[test]
    fn canvas_elements_get_pixel_canvases() {
        let mut tree = window();
        let root = tree.root();
        let canvas = tree.add_child(
            root,
            Element::new(Tag::Canvas).with_attr("name", "plot").with_attr("width", "6").with_attr("height", "2"),
        );
        let (mut app, mut surface) = headless_app(tree);
        app.on_frame(|system, _| {
            if let Some(c) = system.canvas("plot") {
                c.set_colors(crate::render::color::Rgb::WHITE, crate::render::color::Rgb::BLACK);
                c.hline(0, 0, 6);
            }
        });
        app.step(FrameInput::idle(), &mut surface);
        let attached = app.tree().get(canvas).and_then(|el| el.canvas.as_ref()).map(|c| (c.size(), c.mode()));
        assert_eq!(attached, Some((Size::new(6, 4), RenderMode::Pixel)));
        let r = app.layout().screen_region(canvas).unwrap();
        assert_eq!(surface.cell(r.x, r.y).map(|c| c.0), Some('▀'));
    }

    #[test]
    fn escape_closes_dropdown() {
        let mut tree = window();
        let root = tree.root();
        let menu = tree.add_child(root, Element::new(Tag::OptionMenu).with_attr("name", "m").with_attr("ezBind", "(m)"));
        let mut data = DataModel::new();
        data.bind("m", crate::data::Choice::new([("a", true), ("b", true)]));
        let mut app = App::new(tree, data, Options::new().with_full_screen(true));
        app.resize(30, 10);
        let mut surface = HeadlessSurface::new(30, 10);
        app.open_dropdown(menu);
        app.step(FrameInput::idle(), &mut surface);
        assert!(app.state().active_dropdown.is_some());
        app.step(FrameInput::key(KeyEvent::plain(Key::Escape)), &mut surface);
        assert_eq!(app.state().active_dropdown, None);
    }
}
