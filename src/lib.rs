//! # ezui
//!
//! A retained-mode terminal UI engine. The host declares an element tree
//! once, binds it to a key/value data store, and the engine lays it out,
//! draws it and routes mouse and keyboard input to it every frame.
//!
//! ## Core Systems
//!
//! - **[`dom`]**: Slotmap-backed element arena: tags, attributes, visibility
//! - **[`data`]**: Data store with bindings and named click handlers
//! - **[`layout`]**: Pack layout, frame scrolling, hit-test zones, modal pruning
//! - **[`render`]**: Dual-mode canvas, painter, color pairs and the crossterm driver
//! - **[`event`]**: Input types, key bindings, focus chain, text editing, interaction state
//! - **[`app`]**: The engine context: frame step, input state machine, run loop
//! - **[`testing`]**: Headless [`Pilot`](testing::Pilot) and snapshot helpers
//! - **[`geometry`]**: Offset, Size, Region primitives
//!
//! ## Example
//!
//! ```no_run
//! use ezui::app::App;
//! use ezui::config::Options;
//! use ezui::data::DataModel;
//! use ezui::dom::{Element, ElementTree, Tag};
//!
//! let mut tree = ElementTree::new(Element::new(Tag::Window));
//! let root = tree.root();
//! tree.add_child(root, Element::new(Tag::Label).with_attr("text", "Hello"));
//! tree.add_child(
//!     root,
//!     Element::new(Tag::Button)
//!         .with_attr("text", "Quit")
//!         .with_attr("pack", "bottom")
//!         .with_attr("ezClick", "quit"),
//! );
//!
//! let mut data = DataModel::new();
//! data.on("quit", |_, system, _| system.exit());
//!
//! App::new(tree, data, Options::new().with_title("Hello")).run()?;
//! # Ok::<(), ezui::error::Error>(())
//! ```

// Foundation
pub mod config;
pub mod error;
pub mod geometry;

// Core systems
pub mod data;
pub mod dom;
pub mod layout;

// Events
pub mod event;

// Rendering
pub mod render;

// Application
pub mod app;

// Test support
pub mod testing;

pub use app::{App, System};
pub use error::{Error, Result};
