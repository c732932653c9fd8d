//! Rendering pipeline: canvases, colors, painting, terminal surfaces.

pub mod canvas;
pub mod color;
pub mod driver;
pub mod paint;
pub mod surface;

pub use canvas::{Canvas, Cell, RenderMode};
pub use color::Rgb;
pub use driver::Driver;
pub use paint::{Painter, Palette};
pub use surface::{ColorPairs, HeadlessSurface, PairId, Surface};
