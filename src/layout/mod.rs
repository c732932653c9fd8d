//! Layout: size estimates, packing, scroll regions and interaction zones.

pub mod engine;
pub mod measure;
pub mod scroll;
pub mod zones;

pub use engine::{compute_layout, FrameLayout, LayoutResult, Placement};
pub use measure::Side;
pub use scroll::ScrollState;
pub use zones::{ClickAction, ClickZone, HitZone, ZoneTable, ZoneTarget};
