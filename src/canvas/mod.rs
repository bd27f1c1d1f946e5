mod brush;
mod stroke_surface;

pub use brush::{BrushState, BrushTarget};
pub use stroke_surface::{StrokeState, StrokeSurface};

pub(crate) use brush::to_skia_color;
