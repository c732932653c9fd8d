//! Option-menu dropdowns: synthesis, opening, selection.
//!
//! Every named option menu gets a collapsed frame appended to the window,
//! holding one button per option. The frame and its buttons carry a
//! [`Role`] pointing back at the menu, which is how layout and input find
//! them. At most one dropdown is visible at a time.

use super::App;
use crate::data::{DataModel, Value};
use crate::dom::{Element, ElementId, ElementTree, Role, Tag, Visibility};
use crate::layout::measure::{menu_choice, MARKER_WIDTH};

/// Background of dropdown frames.
const DROPDOWN_BG: &str = "#cccccc";

/// Build the dropdown frames for every named option menu. Returns how many
/// were created.
pub(crate) fn synthesize_dropdowns(tree: &mut ElementTree, data: &DataModel) -> usize {
    let menus = tree.query_all(|el| el.tag == Tag::OptionMenu && el.name().is_some());
    let root = tree.root();
    let mut created = 0;
    for menu in menus {
        let Some(el) = tree.get(menu) else { continue };
        let Some(name) = el.name().map(str::to_owned) else { continue };
        let choice = menu_choice(el, data);
        let width = (choice.longest_label() as i32 + MARKER_WIDTH).to_string();

        let frame = Element::new(Tag::Frame)
            .with_attr("name", format!("{name}_dropdown"))
            .with_attr("width", width.as_str())
            .with_attr("height", choice.options.len().max(1).to_string())
            .with_attr("background", DROPDOWN_BG)
            .with_visibility(Visibility::Collapsed)
            .with_role(Role::Dropdown { menu });
        let dropdown = tree.add_child(root, frame);

        for (index, (label, enabled)) in choice.options.iter().enumerate() {
            let button = Element::new(Tag::Button)
                .with_attr("name", format!("{name}_option_{index}"))
                .with_attr("text", label.as_str())
                .with_attr("width", width.as_str())
                .with_role(Role::DropdownOption { menu, index, enabled: *enabled });
            tree.add_child(dropdown, button);
        }
        created += 1;
    }
    if created > 0 {
        tracing::debug!(count = created, "dropdowns synthesized");
    }
    created
}

/// The dropdown frame that belongs to `menu`.
pub(crate) fn dropdown_of(tree: &ElementTree, menu: ElementId) -> Option<ElementId> {
    tree.children(tree.root())
        .iter()
        .copied()
        .find(|&id| tree.get(id).is_some_and(|el| el.role == Role::Dropdown { menu }))
}

impl App {
    /// Toggle the dropdown of `menu`, closing any other open dropdown first.
    pub(crate) fn open_dropdown(&mut self, menu: ElementId) {
        let Some(dropdown) = dropdown_of(&self.tree, menu) else { return };
        if let Some(other) = self.state.active_dropdown.filter(|&d| d != dropdown) {
            self.close_dropdown(other);
        }
        if self.tree.visibility(dropdown) == Visibility::Visible {
            self.close_dropdown(dropdown);
            return;
        }
        self.tree.set_visibility(dropdown, Visibility::Visible);
        self.state.active_dropdown = Some(dropdown);
        self.state.dropdown_guard = true;
        tracing::debug!(?dropdown, "dropdown opened");
    }

    /// Collapse a dropdown and clear the open marker if it pointed there.
    pub(crate) fn close_dropdown(&mut self, dropdown: ElementId) {
        self.tree.set_visibility(dropdown, Visibility::Collapsed);
        if self.state.active_dropdown == Some(dropdown) {
            self.state.active_dropdown = None;
            self.state.dropdown_guard = false;
        }
        tracing::debug!(?dropdown, "dropdown closed");
    }

    /// Store option `index` as the menu's selection and close the dropdown.
    pub(crate) fn select_option(&mut self, menu: ElementId, dropdown: ElementId, index: usize) {
        let key = self.tree.get(menu).and_then(|el| el.bind_key()).map(str::to_owned);
        if let Some(key) = key {
            let choice = self.data.get(&key).and_then(Value::as_choice).cloned();
            if let Some(choice) = choice.filter(|c| index < c.options.len()) {
                self.data.update(&key, choice.with_selected(index));
            }
        }
        self.close_dropdown(dropdown);
        self.state.close_dropdown_next_frame = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Options;
    use crate::data::Choice;
    use crate::event::input::{FrameInput, MouseSample};
    use crate::render::surface::HeadlessSurface;
    use pretty_assertions::assert_eq;

    fn menu_tree() -> (ElementTree, DataModel, ElementId) {
        let mut tree = ElementTree::new(Element::new(Tag::Window));
        let root = tree.root();
        let menu = tree.add_child(
            root,
            Element::new(Tag::OptionMenu).with_attr("name", "pick").with_attr("ezBind", "(choice)"),
        );
        tree.add_child(root, Element::new(Tag::OptionMenu).with_attr("ezBind", "(choice)"));
        let mut data = DataModel::new();
        data.bind("choice", Choice::new([("Apple", true), ("Kiwi", false), ("Fig", true)]));
        (tree, data, menu)
    }

    #[test]
    fn synthesizes_frame_and_buttons() {
        let (mut tree, data, menu) = menu_tree();
        assert_eq!(synthesize_dropdowns(&mut tree, &data), 1);

        let dropdown = dropdown_of(&tree, menu).unwrap();
        let frame = tree.get(dropdown).unwrap();
        assert_eq!(frame.name(), Some("pick_dropdown"));
        assert_eq!(frame.attr("width"), Some("9"));
        assert_eq!(frame.attr("height"), Some("3"));
        assert_eq!(frame.visibility, Visibility::Collapsed);

        let buttons: Vec<_> = tree
            .children(dropdown)
            .iter()
            .map(|&id| {
                let el = tree.get(id).unwrap();
                (el.name().unwrap().to_owned(), el.text().to_owned(), el.role)
            })
            .collect();
        assert_eq!(
            buttons,
            vec![
                ("pick_option_0".into(), "Apple".into(), Role::DropdownOption { menu, index: 0, enabled: true }),
                ("pick_option_1".into(), "Kiwi".into(), Role::DropdownOption { menu, index: 1, enabled: false }),
                ("pick_option_2".into(), "Fig".into(), Role::DropdownOption { menu, index: 2, enabled: true }),
            ]
        );
    }

    #[test]
    fn unnamed_menus_get_nothing() {
        let mut tree = ElementTree::new(Element::new(Tag::Window));
        let root = tree.root();
        tree.add_child(root, Element::new(Tag::OptionMenu));
        assert_eq!(synthesize_dropdowns(&mut tree, &DataModel::new()), 0);
        assert_eq!(tree.children(root).len(), 1);
    }

    #[test]
    fn toggle_and_select() {
        let (tree, data, menu) = menu_tree();
        let mut app = App::new(tree, data, Options::new().with_full_screen(true));
        let dropdown = dropdown_of(app.tree(), menu).unwrap();

        app.open_dropdown(menu);
        assert_eq!(app.tree().visibility(dropdown), Visibility::Visible);
        assert_eq!(app.state().active_dropdown, Some(dropdown));
        assert!(app.state().dropdown_guard);

        app.open_dropdown(menu);
        assert_eq!(app.tree().visibility(dropdown), Visibility::Collapsed);
        assert_eq!(app.state().active_dropdown, None);
        assert!(!app.state().dropdown_guard);

        app.open_dropdown(menu);
        app.select_option(menu, dropdown, 2);
        assert_eq!(app.tree().visibility(dropdown), Visibility::Collapsed);
        let selected = app.data().get("choice").and_then(Value::as_choice).map(|c| c.selected_index);
        assert_eq!(selected, Some(2));

        app.select_option(menu, dropdown, 9);
        let selected = app.data().get("choice").and_then(Value::as_choice).map(|c| c.selected_index);
        assert_eq!(selected, Some(2));
    }

    #[test]
    fn guard_swallows_one_sample_after_opening() {
        let (tree, data, menu) = menu_tree();
        let mut app = App::new(tree, data, Options::new().with_full_screen(true).with_title_bar(false));
        app.resize(30, 10);
        let mut surface = HeadlessSurface::new(30, 10);
        let dropdown = dropdown_of(app.tree(), menu).unwrap();
        let r = app.layout().screen_region(menu).unwrap();

        app.step(FrameInput::mouse(MouseSample::left_down(r.x, r.y)), &mut surface);
        app.step(FrameInput::mouse(MouseSample::moved(r.x, r.y)), &mut surface);
        assert_eq!(app.state().active_dropdown, Some(dropdown));
        assert!(app.state().dropdown_guard);

        let fig = app.find("pick_option_2").and_then(|id| app.layout().screen_region(id)).unwrap();
        app.step(FrameInput::mouse(MouseSample::left_down(fig.x, fig.y)), &mut surface);
        assert!(app.state().pending.is_none());
        assert!(!app.state().dropdown_guard);
        assert_eq!(app.state().active_dropdown, Some(dropdown));

        app.step(FrameInput::mouse(MouseSample::left_down(fig.x, fig.y)), &mut surface);
        app.step(FrameInput::mouse(MouseSample::moved(fig.x, fig.y)), &mut surface);
        let selected = app.data().get("choice").and_then(Value::as_choice).map(|c| c.selected_index);
        assert_eq!(selected, Some(2));
        assert_eq!(app.tree().visibility(dropdown), Visibility::Collapsed);
    }
}
