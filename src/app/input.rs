//! The per-frame input state machine: mouse presses and releases, keys,
//! activation.

use super::{App, System};
use crate::dom::{ElementId, Tag, Visibility};
use crate::event::binding::BindingAction;
use crate::event::editing::{scroll_start, TextCursor};
use crate::event::input::{Key, KeyEvent, MouseButton, MouseSample};
use crate::event::state::{InteractionMode, PendingActivation};
use crate::layout::measure::display_text;
use crate::layout::{ClickAction, ClickZone};

impl App {
    // -- mouse -----------------------------------------------------------

    /// Feed one mouse sample. A held button is a press; a sample with no
    /// button held is a release (or plain movement). Only a left press
    /// activates its zone on release.
    ///
    /// The first sample after a dropdown opens is swallowed.
    pub(crate) fn handle_mouse(&mut self, sample: MouseSample) {
        if self.state.dropdown_guard {
            self.state.dropdown_guard = false;
            return;
        }
        if let Some(button) = sample.button() {
            self.mouse_down(sample.x, sample.y, button);
        } else if let Some(pending) = self.state.pending.take() {
            if pending.button == MouseButton::Left && pending.zone.contains(sample.x, sample.y) {
                self.activate(pending);
            }
        }
    }

    fn mouse_down(&mut self, x: i32, y: i32, button: MouseButton) {
        self.state.pending = None;
        match self.state.mode() {
            InteractionMode::DropdownOpen => self.press_in_dropdown(x, y, button),
            InteractionMode::ModalOpen if !self.inside_modal(x, y) => self.press_outside_modal(),
            _ => self.press(x, y, button),
        }
    }

    /// Only the open dropdown's options are reachable. A miss closes it.
    fn press_in_dropdown(&mut self, x: i32, y: i32, button: MouseButton) {
        let Some(dropdown) = self.state.active_dropdown else { return };
        let tree = &self.tree;
        let zone = self
            .layout
            .zones
            .click_at_where(x, y, |z| z.target.element().is_some_and(|id| tree.is_descendant(id, dropdown)))
            .cloned();
        match zone {
            Some(zone) => {
                self.state.pending = Some(pending_from(zone, button));
                self.state.close_dropdown_next_frame = true;
            }
            None => {
                self.close_dropdown(dropdown);
                self.relayout();
            }
        }
    }

    fn inside_modal(&self, x: i32, y: i32) -> bool {
        self.layout
            .modal
            .and_then(|(modal, _)| self.layout.screen_region(modal))
            .is_some_and(|r| r.contains(x, y))
    }

    /// A press outside the active modal: dismiss `clear` modals, swallow it
    /// either way.
    fn press_outside_modal(&mut self) {
        let Some((modal, kind)) = self.layout.modal else { return };
        if !kind.dismiss_on_outside_click() {
            return;
        }
        if let Some(dropdown) = self.state.active_dropdown {
            self.close_dropdown(dropdown);
        }
        self.tree.set_visibility(modal, Visibility::Collapsed);
        self.state.active_modal = None;
        tracing::debug!(?modal, "modal dismissed by outside click");
        self.relayout();
    }

    fn press(&mut self, x: i32, y: i32, button: MouseButton) {
        let hit = self.layout.zones.hit_at(x, y).filter(|_| button == MouseButton::Left);
        if let Some(hit) = hit {
            let element = hit.element;
            let shown = self.shown_cursor(element);
            self.focus(element);
            self.cursor_to_column(element, shown, x);
        }
        if let Some(zone) = self.layout.zones.click_at(x, y).cloned() {
            self.state.pending = Some(pending_from(zone, button));
        }
    }

    // -- focus -----------------------------------------------------------

    /// Focus `id`, putting the text cursor at the end of its text.
    pub(crate) fn focus(&mut self, id: ElementId) {
        if self.state.focused() == Some(id) {
            return;
        }
        if self.state.focus.focus_node(id) {
            self.cursor_to_end();
        }
    }

    /// The cursor position an element is drawn with right now.
    fn shown_cursor(&self, id: ElementId) -> usize {
        let len = self.tree.get(id).map_or(0, |el| display_text(el, &self.data).chars().count());
        if self.state.focused() == Some(id) {
            self.state.cursor.min(len)
        } else {
            len
        }
    }

    /// Put the cursor of a clicked entry under the clicked column, taking
    /// the field's horizontal scroll into account.
    fn cursor_to_column(&mut self, id: ElementId, shown: usize, x: i32) {
        let Some(el) = self.tree.get(id).filter(|el| el.tag == Tag::Entry) else { return };
        let Some(region) = self.layout.screen_region(id) else { return };
        let len = display_text(el, &self.data).chars().count();
        let width = region.width.max(1);
        let start = scroll_start(len, shown, width as usize);
        let offset = (x - region.x).clamp(0, width - 1) as usize;
        self.state.cursor = (start + offset).min(len);
    }

    fn cursor_to_end(&mut self) {
        self.state.cursor = self
            .state
            .focused()
            .and_then(|id| self.tree.get(id))
            .map_or(0, |el| display_text(el, &self.data).chars().count());
    }

    // -- activation ------------------------------------------------------

    /// Run a confirmed click.
    pub(crate) fn activate(&mut self, pending: PendingActivation) {
        let element = pending.target.element();
        if !matches!(pending.action, ClickAction::Handler(_)) {
            let missing = element
                .and_then(|id| self.tree.get(id))
                .and_then(|el| el.attr("ezClick"))
                .filter(|name| !name.is_empty());
            if let Some(name) = missing {
                tracing::warn!(handler = name, "no handler registered for ezClick");
            }
        }

        match pending.action {
            ClickAction::Handler(handler) => {
                let Some(id) = element else { return };
                let mut system = System::new(&mut self.tree, &mut self.options, &mut self.exit_requested);
                handler(id, &mut system, &mut self.data);
            }
            ClickAction::ToggleCheck { key } => {
                let checked = self.data.get(&key).is_some_and(|v| v.truthy());
                self.data.update(&key, !checked);
            }
            ClickAction::SelectRadio { key, value } => self.data.update(&key, value),
            ClickAction::OpenDropdown { menu } => self.open_dropdown(menu),
            ClickAction::SelectOption { menu, dropdown, index } => self.select_option(menu, dropdown, index),
            ClickAction::Exit => self.request_exit(),
            ClickAction::None => {}
        }
        self.relayout();
    }

    // -- keys ------------------------------------------------------------

    /// Feed one key press.
    pub(crate) fn handle_key(&mut self, key: KeyEvent) {
        if let Some(action) = self.bindings.resolve(&key) {
            match action {
                BindingAction::Exit => self.request_exit(),
                BindingAction::FocusNext => {
                    self.state.focus.focus_next();
                    self.cursor_to_end();
                }
                BindingAction::FocusPrevious => {
                    self.state.focus.focus_previous();
                    self.cursor_to_end();
                }
                BindingAction::Dismiss => {
                    if let Some(dropdown) = self.state.active_dropdown {
                        self.close_dropdown(dropdown);
                        self.relayout();
                    }
                }
            }
            return;
        }

        let Some(focused) = self.state.focused() else { return };
        let Some(tag) = self.tree.get(focused).map(|el| el.tag) else { return };
        if tag.is_text_input() {
            self.edit_text(focused, tag, key);
        } else if key.code == Key::Enter {
            if let Some(zone) = self.layout.zones.click_for(focused).cloned() {
                self.activate(pending_from(zone, MouseButton::Left));
            }
        }
    }

    /// Apply an editing key to a focused entry or text box.
    fn edit_text(&mut self, id: ElementId, tag: Tag, key: KeyEvent) {
        let Some(el) = self.tree.get(id) else { return };
        let mut text = TextCursor::new(display_text(el, &self.data), self.state.cursor);
        let before = text.value().to_owned();

        match key.code {
            Key::Left => text.move_left(),
            Key::Right => text.move_right(),
            Key::Up | Key::Home => text.move_home(),
            Key::Down | Key::End => text.move_end(),
            Key::Insert => self.state.overwrite = !self.state.overwrite,
            Key::Backspace => {
                text.backspace();
            }
            Key::Delete => {
                text.delete_forward();
            }
            Key::Enter if tag == Tag::TextBox => text.append("\n"),
            _ => {
                if let Some(ch) = key.printable() {
                    text.insert_char(ch, self.state.overwrite);
                }
            }
        }

        self.state.cursor = text.cursor();
        if text.value() != before {
            self.store_text(id, text.into_value());
        }
    }

    /// Write edited text to the bound key, or to the element's own `text`
    /// when it is unbound.
    fn store_text(&mut self, id: ElementId, value: String) {
        let key = self.tree.get(id).and_then(|el| el.bind_key()).map(str::to_owned);
        match key {
            Some(key) => self.data.update(&key, value),
            None => {
                if let Some(el) = self.tree.get_mut(id) {
                    el.set_attr("text", value);
                }
            }
        }
    }
}

fn pending_from(zone: ClickZone, button: MouseButton) -> PendingActivation {
    PendingActivation {
        zone: zone.region,
        button,
        action: zone.action,
        target: zone.target,
        name: zone.name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Options;
    use crate::data::DataModel;
    use crate::dom::{Element, ElementTree};
    use crate::event::input::Modifiers;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;
    use std::rc::Rc;
    use tracing_test::traced_test;

    fn app_with(build: impl FnOnce(&mut ElementTree) -> Vec<ElementId>) -> (App, Vec<ElementId>) {
        let mut tree = ElementTree::new(Element::new(Tag::Window));
        let ids = build(&mut tree);
        let app = App::new(tree, DataModel::new(), Options::new().with_full_screen(true).with_title_bar(false));
        (app, ids)
    }

    fn center(app: &App, id: ElementId) -> (i32, i32) {
        let r = app.layout().screen_region(id).unwrap();
        (r.x + r.width / 2, r.y)
    }

    #[test]
    fn press_then_release_in_zone_activates_once() {
        let (mut app, ids) = app_with(|t| {
            let root = t.root();
            vec![t.add_child(root, Element::new(Tag::Button).with_attr("text", "Go").with_attr("ezClick", "go"))]
        });
        let count = Rc::new(Cell::new(0));
        let seen = count.clone();
        app.data_mut().on("go", move |_, _, _| seen.set(seen.get() + 1));
        app.relayout();

        let (x, y) = center(&app, ids[0]);
        app.handle_mouse(MouseSample::left_down(x, y));
        assert_eq!(count.get(), 0);
        assert_eq!(app.state().focused(), Some(ids[0]));
        app.handle_mouse(MouseSample::moved(x, y));
        assert_eq!(count.get(), 1);
        app.handle_mouse(MouseSample::moved(x, y));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn release_elsewhere_discards() {
        let (mut app, ids) = app_with(|t| {
            let root = t.root();
            vec![t.add_child(root, Element::new(Tag::CheckButton).with_attr("text", "c").with_attr("ezBind", "(c)"))]
        });
        let (x, y) = center(&app, ids[0]);
        app.handle_mouse(MouseSample::left_down(x, y));
        app.handle_mouse(MouseSample::moved(x, y + 3));
        assert!(app.state().pending.is_none());
        assert!(!app.data().get("c").is_some_and(|v| v.truthy()));

        app.handle_mouse(MouseSample::left_down(x, y));
        app.handle_mouse(MouseSample::moved(x, y));
        assert!(app.data().get("c").is_some_and(|v| v.truthy()));
    }

    #[test]
    fn right_press_neither_focuses_nor_activates() {
        let (mut app, ids) = app_with(|t| {
            let root = t.root();
            vec![t.add_child(root, Element::new(Tag::CheckButton).with_attr("text", "c").with_attr("ezBind", "(c)"))]
        });
        let (x, y) = center(&app, ids[0]);
        app.handle_mouse(MouseSample::right_down(x, y));
        assert_eq!(app.state().pending.as_ref().map(|p| p.button), Some(MouseButton::Right));
        app.handle_mouse(MouseSample::moved(x, y));
        assert!(app.state().pending.is_none());
        assert_eq!(app.state().focused(), None);
        assert!(!app.data().get("c").is_some_and(|v| v.truthy()));
    }

    #[test]
    fn entry_click_places_cursor_under_column() {
        let (mut app, ids) = app_with(|t| {
            let root = t.root();
            vec![t.add_child(root, Element::new(Tag::Entry).with_attr("ezBind", "(v)"))]
        });
        app.data_mut().bind("v", "abcdefghijklmnop");
        app.relayout();
        let r = app.layout().screen_region(ids[0]).unwrap();

        // Unfocused, the field shows its tail: characters 4.. are visible.
        app.handle_mouse(MouseSample::left_down(r.x + 3, r.y));
        assert_eq!(app.state().focused(), Some(ids[0]));
        assert_eq!(app.state().cursor, 7);

        app.handle_mouse(MouseSample::moved(r.x + 3, r.y));
        app.handle_mouse(MouseSample::left_down(r.x + 11, r.y));
        assert_eq!(app.state().cursor, 11);
    }

    #[test]
    #[traced_test]
    fn missing_handler_warns_at_activation() {
        let (mut app, ids) = app_with(|t| {
            let root = t.root();
            vec![t.add_child(root, Element::new(Tag::Button).with_attr("text", "x").with_attr("ezClick", "nope"))]
        });
        let (x, y) = center(&app, ids[0]);
        app.handle_mouse(MouseSample::left_down(x, y));
        app.handle_mouse(MouseSample::moved(x, y));
        assert!(logs_contain("no handler registered for ezClick"));
    }

    #[test]
    fn typing_into_entry() {
        let (mut app, ids) = app_with(|t| {
            let root = t.root();
            vec![t.add_child(root, Element::new(Tag::Entry).with_attr("ezBind", "(name)"))]
        });
        app.data_mut().bind("name", "Al");
        app.relayout();
        app.focus(ids[0]);
        assert_eq!(app.state().cursor, 2);
        for c in "ice".chars() {
            app.handle_key(KeyEvent::plain(Key::Char(c)));
        }
        assert_eq!(app.data().text("name"), "Alice");
        assert_eq!(app.state().cursor, 5);

        app.handle_key(KeyEvent::plain(Key::Up));
        app.handle_key(KeyEvent::plain(Key::Delete));
        app.handle_key(KeyEvent::plain(Key::Insert));
        app.handle_key(KeyEvent::plain(Key::Char('E')));
        assert_eq!(app.data().text("name"), "Eice");
        assert_eq!(app.state().cursor, 1);

        app.handle_key(KeyEvent::plain(Key::Down));
        app.handle_key(KeyEvent::plain(Key::Backspace));
        assert_eq!(app.data().text("name"), "Eic");
        assert_eq!(app.state().cursor, 3);
        app.handle_key(KeyEvent::new(Key::Char('x'), Modifiers::ALT));
        assert_eq!(app.data().text("name"), "Eic");
    }

    #[test]
    fn unbound_textbox_stores_in_text_attribute() {
        let (mut app, ids) = app_with(|t| {
            let root = t.root();
            vec![t.add_child(root, Element::new(Tag::TextBox))]
        });
        app.focus(ids[0]);
        app.handle_key(KeyEvent::plain(Key::Char('a')));
        app.handle_key(KeyEvent::plain(Key::Enter));
        app.handle_key(KeyEvent::plain(Key::Char('b')));
        assert_eq!(app.tree().get(ids[0]).map(|el| el.text().to_owned()), Some("a\nb".to_owned()));
        assert_eq!(app.state().cursor, 3);
    }

    #[test]
    fn enter_activates_focused_control() {
        let (mut app, ids) = app_with(|t| {
            let root = t.root();
            vec![t.add_child(root, Element::new(Tag::CheckButton).with_attr("text", "c").with_attr("ezBind", "(c)"))]
        });
        app.focus(ids[0]);
        app.handle_key(KeyEvent::plain(Key::Enter));
        assert!(app.data().get("c").is_some_and(|v| v.truthy()));
    }

    #[test]
    fn tab_cycles_focus() {
        let (mut app, ids) = app_with(|t| {
            let root = t.root();
            vec![
                t.add_child(root, Element::new(Tag::Entry)),
                t.add_child(root, Element::new(Tag::Button).with_attr("text", "b")),
            ]
        });
        app.handle_key(KeyEvent::plain(Key::Tab));
        assert_eq!(app.state().focused(), Some(ids[0]));
        app.handle_key(KeyEvent::plain(Key::Tab));
        assert_eq!(app.state().focused(), Some(ids[1]));
        app.handle_key(KeyEvent::plain(Key::BackTab));
        assert_eq!(app.state().focused(), Some(ids[0]));
    }

    #[test]
    fn ctrl_c_requests_exit() {
        let (mut app, _) = app_with(|_| Vec::new());
        app.handle_key(KeyEvent::new(Key::Char('c'), Modifiers::CTRL));
        assert!(!app.is_running());
    }

    #[test]
    fn outside_click_dismisses_clear_modal_only() {
        let (mut app, ids) = app_with(|t| {
            let root = t.root();
            let clear = t.add_child(
                root,
                Element::new(Tag::Frame)
                    .with_attr("ezModal", "clear")
                    .with_attr("width", "10")
                    .with_attr("height", "4")
                    .with_attr("x", "80")
                    .with_attr("y", "64"),
            );
            vec![clear]
        });
        assert_eq!(app.state().active_modal, Some(ids[0]));
        app.handle_mouse(MouseSample::left_down(1, 1));
        assert_eq!(app.tree().visibility(ids[0]), Visibility::Collapsed);
        assert_eq!(app.state().active_modal, None);
        assert_eq!(app.state().mode(), InteractionMode::Idle);

        let (mut app, ids) = app_with(|t| {
            let root = t.root();
            vec![t.add_child(
                root,
                Element::new(Tag::Frame).with_attr("ezModal", "opaque").with_attr("width", "10").with_attr("height", "4"),
            )]
        });
        let r = app.layout().screen_region(ids[0]).unwrap();
        app.handle_mouse(MouseSample::left_down(r.right() + 1, r.bottom() + 1));
        assert_eq!(app.tree().visibility(ids[0]), Visibility::Visible);
        assert_eq!(app.state().active_modal, Some(ids[0]));
    }
}
