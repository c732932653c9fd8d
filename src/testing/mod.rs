//! Headless testing framework: Pilot, snapshot helpers.
//!
//! Use the [`Pilot`] to programmatically drive an [`App`](crate::app::App) without
//! a real terminal. Use [`canvas_to_string`] and [`surface_to_string`] to
//! capture output as plain text for snapshot-style assertions.

pub mod pilot;
pub mod snapshot;

pub use pilot::Pilot;
pub use snapshot::{canvas_to_string, surface_to_string};
