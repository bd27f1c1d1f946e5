use tiny_skia::{Color, LineCap, LineJoin, Paint, Stroke};

/// Color and width applied to the live preview and to every commit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushState {
    /// Straight (non-premultiplied) RGBA, each component in `0.0..=1.0`.
    pub color: [f32; 4],
    /// Stroke width in pixels. Zero draws a one-pixel hairline.
    pub width: f32,
}

impl Default for BrushState {
    fn default() -> Self {
        Self {
            color: [0.0, 0.0, 0.0, 1.0],
            width: 10.0,
        }
    }
}

impl BrushState {
    pub fn new(color: [f32; 4], width: f32) -> Self {
        let mut brush = Self::default();
        brush.color = sanitize_color(color);
        if is_valid_width(width) {
            brush.width = width;
        }
        brush
    }

    pub(crate) fn paint(&self) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color(to_skia_color(self.color));
        paint.anti_alias = true;
        paint
    }

    pub(crate) fn stroke(&self) -> Stroke {
        Stroke {
            width: self.width,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        }
    }
}

/// Receiver of brush changes coming from the controls.
///
/// The stroke surface is the only implementor in the app; the control panel
/// and color picker hold it by `&mut dyn BrushTarget` for the duration of a
/// single event.
pub trait BrushTarget {
    fn brush(&self) -> BrushState;
    fn set_color(&mut self, color: [f32; 4]);
    fn set_width(&mut self, width: f32);
    fn clear(&mut self);
}

pub(crate) fn is_valid_width(width: f32) -> bool {
    width.is_finite() && width >= 0.0
}

pub(crate) fn sanitize_color(color: [f32; 4]) -> [f32; 4] {
    color.map(|c| if c.is_finite() { c.clamp(0.0, 1.0) } else { 0.0 })
}

pub(crate) fn to_skia_color(color: [f32; 4]) -> Color {
    let [r, g, b, a] = sanitize_color(color);
    Color::from_rgba(r, g, b, a).unwrap_or(Color::BLACK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_color_components() {
        let brush = BrushState::new([1.5, -0.2, f32::NAN, 0.5], 3.0);
        assert_eq!(brush.color, [1.0, 0.0, 0.0, 0.5]);
        assert_eq!(brush.width, 3.0);
    }

    #[test]
    fn test_new_rejects_negative_width() {
        let brush = BrushState::new([0.0, 0.0, 0.0, 1.0], -4.0);
        assert_eq!(brush.width, BrushState::default().width);
    }

    #[test]
    fn test_stroke_uses_round_joins_and_caps() {
        let stroke = BrushState::new([0.0, 0.0, 0.0, 1.0], 7.0).stroke();
        assert_eq!(stroke.width, 7.0);
        assert_eq!(stroke.line_cap, LineCap::Round);
        assert_eq!(stroke.line_join, LineJoin::Round);
    }

    #[test]
    fn test_paint_is_anti_aliased() {
        assert!(BrushState::default().paint().anti_alias);
    }
}
