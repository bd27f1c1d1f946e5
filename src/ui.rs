use tiny_skia::{FillRule, Paint, PathBuilder, PixmapMut, Rect, Stroke, Transform};

use crate::canvas::{BrushState, BrushTarget, to_skia_color};
use crate::config::PanelSettings;
use crate::input::{PointerEvent, PointerKind};

const PANEL_BG: [f32; 4] = [0.95, 0.95, 0.95, 1.0];
const WIDGET_BG: [f32; 4] = [0.8, 0.8, 0.8, 1.0];
const PRESSED_BG: [f32; 4] = [0.5, 0.7, 1.0, 1.0];
const ICON_COLOR: [f32; 4] = [0.2, 0.2, 0.2, 1.0];
const PADDING: f32 = 12.0;

/// Axis-aligned screen rectangle; edges count as inside.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub position: [f32; 2],
    pub size: [f32; 2],
}

impl Bounds {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            position: [x, y],
            size: [w.max(0.0), h.max(0.0)],
        }
    }

    pub fn contains(&self, pos: [f32; 2]) -> bool {
        pos[0] >= self.position[0]
            && pos[0] <= self.position[0] + self.size[0]
            && pos[1] >= self.position[1]
            && pos[1] <= self.position[1] + self.size[1]
    }

    pub fn center(&self) -> [f32; 2] {
        [
            self.position[0] + self.size[0] / 2.0,
            self.position[1] + self.size[1] / 2.0,
        ]
    }

    pub fn inset(&self, by: f32) -> Self {
        Self::new(
            self.position[0] + by,
            self.position[1] + by,
            self.size[0] - 2.0 * by,
            self.size[1] - 2.0 * by,
        )
    }

    pub(crate) fn to_rect(self) -> Option<Rect> {
        Rect::from_xywh(self.position[0], self.position[1], self.size[0], self.size[1])
    }
}

/// What the panel asks its owner to do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelCommand {
    OpenColorPicker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Widget {
    Slider,
    ColorButton,
    ClearButton,
}

/// Integer slider driving the brush width.
#[derive(Debug, Clone)]
pub struct Slider {
    min: u32,
    max: u32,
    value: u32,
    pub(crate) track: Bounds,
}

impl Slider {
    fn new(min: u32, max: u32, value: u32) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            min,
            max,
            value: value.clamp(min, max),
            track: Bounds::default(),
        }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    fn value_at(&self, x: f32) -> u32 {
        if self.track.size[0] <= 0.0 || self.max == self.min {
            return self.min;
        }
        let t = ((x - self.track.position[0]) / self.track.size[0]).clamp(0.0, 1.0);
        self.min + (t * (self.max - self.min) as f32).round() as u32
    }

    fn fraction(&self) -> f32 {
        if self.max == self.min {
            return 0.0;
        }
        (self.value - self.min) as f32 / (self.max - self.min) as f32
    }

    /// Returns true when the value changed.
    fn drag_to(&mut self, x: f32) -> bool {
        let value = self.value_at(x);
        let changed = value != self.value;
        self.value = value;
        changed
    }
}

/// Bottom strip holding the width slider, the color button and the clear
/// button.
pub struct ControlPanel {
    height: f32,
    scale: f32,
    bounds: Bounds,
    slider: Slider,
    color_button: Bounds,
    clear_button: Bounds,
    pressed: Option<Widget>,
}

impl ControlPanel {
    pub fn new(settings: &PanelSettings) -> Self {
        Self {
            height: settings.height,
            scale: 1.0,
            bounds: Bounds::default(),
            slider: Slider::new(
                settings.slider_min,
                settings.slider_max,
                settings.slider_initial,
            ),
            color_button: Bounds::default(),
            clear_button: Bounds::default(),
            pressed: None,
        }
    }

    /// Strip height in physical pixels at the current scale factor.
    pub fn height(&self) -> f32 {
        self.height * self.scale
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn slider(&self) -> &Slider {
        &self.slider
    }

    pub fn color_button(&self) -> Bounds {
        self.color_button
    }

    pub fn clear_button(&self) -> Bounds {
        self.clear_button
    }

    pub fn contains(&self, pos: [f32; 2]) -> bool {
        self.bounds.contains(pos)
    }

    /// Pushes the slider's current value into the brush, as done at startup.
    pub fn apply_width(&self, target: &mut dyn BrushTarget) {
        target.set_width(self.slider.value as f32);
    }

    pub fn layout(&mut self, window_width: f32, window_height: f32, scale: f32) {
        self.scale = scale;
        let height = self.height().min(window_height);
        let pad = PADDING * scale;
        self.bounds = Bounds::new(0.0, window_height - height, window_width, height);

        let button = (height - 2.0 * pad).max(0.0);
        let top = self.bounds.position[1] + pad;
        self.clear_button = Bounds::new(window_width - pad - button, top, button, button);
        self.color_button = Bounds::new(
            self.clear_button.position[0] - pad - button,
            top,
            button,
            button,
        );

        let track_height = 6.0 * scale;
        let track_left = pad + button / 2.0;
        let track_right = self.color_button.position[0] - pad - button / 2.0;
        self.slider.track = Bounds::new(
            track_left,
            self.bounds.center()[1] - track_height / 2.0,
            track_right - track_left,
            track_height,
        );
    }

    fn widget_at(&self, pos: [f32; 2]) -> Option<Widget> {
        if self.color_button.contains(pos) {
            Some(Widget::ColorButton)
        } else if self.clear_button.contains(pos) {
            Some(Widget::ClearButton)
        } else if self.contains(pos) && pos[0] < self.color_button.position[0] {
            Some(Widget::Slider)
        } else {
            None
        }
    }

    /// Handles a pointer captured by the panel. Buttons fire on release,
    /// and only if the release is still over the button that was pressed.
    pub fn handle_pointer(
        &mut self,
        event: PointerEvent,
        target: &mut dyn BrushTarget,
    ) -> Option<PanelCommand> {
        let pos = event.position();
        match event.kind {
            PointerKind::Down => {
                self.pressed = self.widget_at(pos);
                if self.pressed == Some(Widget::Slider) && self.slider.drag_to(event.x) {
                    self.apply_width(target);
                }
                None
            }
            PointerKind::Move => {
                if self.pressed == Some(Widget::Slider) && self.slider.drag_to(event.x) {
                    self.apply_width(target);
                }
                None
            }
            PointerKind::Up => match self.pressed.take() {
                Some(Widget::Slider) => {
                    if self.slider.drag_to(event.x) {
                        self.apply_width(target);
                    }
                    None
                }
                Some(Widget::ColorButton) if self.color_button.contains(pos) => {
                    Some(PanelCommand::OpenColorPicker)
                }
                Some(Widget::ClearButton) if self.clear_button.contains(pos) => {
                    target.clear();
                    None
                }
                _ => None,
            },
            PointerKind::Cancel => {
                self.pressed = None;
                None
            }
        }
    }

    pub fn draw(&self, frame: &mut PixmapMut, brush: &BrushState) {
        fill_bounds(frame, self.bounds, PANEL_BG);

        let track = self.slider.track;
        fill_bounds(frame, track, WIDGET_BG);
        let filled = Bounds::new(
            track.position[0],
            track.position[1],
            track.size[0] * self.slider.fraction(),
            track.size[1],
        );
        fill_bounds(frame, filled, PRESSED_BG);

        let knob_x = track.position[0] + track.size[0] * self.slider.fraction();
        let knob_radius = (self.color_button.size[1] / 4.0).max(1.0);
        fill_circle(frame, [knob_x, track.center()[1]], knob_radius, ICON_COLOR);

        self.draw_button_bg(frame, self.color_button, Widget::ColorButton);
        let swatch = self.color_button.inset(self.color_button.size[0] * 0.2);
        fill_bounds(frame, swatch, [1.0, 1.0, 1.0, 1.0]);
        fill_bounds(frame, swatch, brush.color);

        self.draw_button_bg(frame, self.clear_button, Widget::ClearButton);
        let icon = self.clear_button.inset(self.clear_button.size[0] * 0.3);
        let [x0, y0] = icon.position;
        let [x1, y1] = [x0 + icon.size[0], y0 + icon.size[1]];
        let line_width = 2.0 * self.scale;
        draw_line(frame, [x0, y0], [x1, y1], line_width, ICON_COLOR);
        draw_line(frame, [x1, y0], [x0, y1], line_width, ICON_COLOR);
    }

    fn draw_button_bg(&self, frame: &mut PixmapMut, bounds: Bounds, widget: Widget) {
        let color = if self.pressed == Some(widget) {
            PRESSED_BG
        } else {
            WIDGET_BG
        };
        fill_bounds(frame, bounds, color);
    }
}

pub(crate) fn solid_paint(color: [f32; 4]) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(to_skia_color(color));
    paint.anti_alias = true;
    paint
}

pub(crate) fn fill_bounds(frame: &mut PixmapMut, bounds: Bounds, color: [f32; 4]) {
    if let Some(rect) = bounds.to_rect() {
        frame.fill_rect(rect, &solid_paint(color), Transform::identity(), None);
    }
}

pub(crate) fn fill_circle(frame: &mut PixmapMut, center: [f32; 2], radius: f32, color: [f32; 4]) {
    if let Some(path) = PathBuilder::from_circle(center[0], center[1], radius) {
        frame.fill_path(
            &path,
            &solid_paint(color),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
    }
}

pub(crate) fn stroke_circle(
    frame: &mut PixmapMut,
    center: [f32; 2],
    radius: f32,
    width: f32,
    color: [f32; 4],
) {
    if let Some(path) = PathBuilder::from_circle(center[0], center[1], radius) {
        let stroke = Stroke {
            width,
            ..Stroke::default()
        };
        frame.stroke_path(&path, &solid_paint(color), &stroke, Transform::identity(), None);
    }
}

pub(crate) fn draw_line(
    frame: &mut PixmapMut,
    start: [f32; 2],
    end: [f32; 2],
    width: f32,
    color: [f32; 4],
) {
    let mut pb = PathBuilder::new();
    pb.move_to(start[0], start[1]);
    pb.line_to(end[0], end[1]);
    if let Some(path) = pb.finish() {
        let stroke = Stroke {
            width,
            ..Stroke::default()
        };
        frame.stroke_path(&path, &solid_paint(color), &stroke, Transform::identity(), None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingTarget {
        brush: BrushState,
        widths: Vec<f32>,
        clears: usize,
    }

    impl BrushTarget for RecordingTarget {
        fn brush(&self) -> BrushState {
            self.brush
        }

        fn set_color(&mut self, color: [f32; 4]) {
            self.brush.color = color;
        }

        fn set_width(&mut self, width: f32) {
            self.brush.width = width;
            self.widths.push(width);
        }

        fn clear(&mut self) {
            self.clears += 1;
        }
    }

    fn panel() -> ControlPanel {
        let mut panel = ControlPanel::new(&PanelSettings::default());
        panel.layout(400.0, 600.0, 1.0);
        panel
    }

    fn event(kind: PointerKind, pos: [f32; 2]) -> PointerEvent {
        PointerEvent::new(kind, pos[0], pos[1])
    }

    #[test]
    fn test_layout_places_strip_at_bottom() {
        let panel = panel();
        assert_eq!(panel.bounds(), Bounds::new(0.0, 528.0, 400.0, 72.0));
        assert!(panel.contains([10.0, 590.0]));
        assert!(!panel.contains([10.0, 500.0]));
        assert!(panel.clear_button().position[0] > panel.color_button().position[0]);
    }

    #[test]
    fn test_layout_scales_with_display() {
        let mut panel = ControlPanel::new(&PanelSettings::default());
        panel.layout(800.0, 1200.0, 2.0);
        assert_eq!(panel.height(), 144.0);
        assert_eq!(panel.bounds().position[1], 1056.0);
    }

    #[test]
    fn test_slider_drag_forwards_width() {
        let mut panel = panel();
        let mut target = RecordingTarget::default();
        let track = panel.slider().track;
        let y = track.center()[1];

        panel.handle_pointer(event(PointerKind::Down, [track.position[0], y]), &mut target);
        assert_eq!(panel.slider().value(), 0);

        let right = track.position[0] + track.size[0];
        panel.handle_pointer(event(PointerKind::Move, [right + 50.0, y]), &mut target);
        assert_eq!(panel.slider().value(), 100);
        panel.handle_pointer(event(PointerKind::Up, [right + 50.0, y]), &mut target);

        assert_eq!(target.widths, vec![0.0, 100.0]);
    }

    #[test]
    fn test_slider_midpoint_rounds_to_integer() {
        let mut panel = panel();
        let mut target = RecordingTarget::default();
        let track = panel.slider().track;
        let center = track.center();

        panel.handle_pointer(event(PointerKind::Down, center), &mut target);
        assert_eq!(panel.slider().value(), 50);
        assert_eq!(target.brush.width, 50.0);
    }

    #[test]
    fn test_reversed_slider_range_is_swapped() {
        let settings = PanelSettings {
            slider_min: 50,
            slider_max: 5,
            slider_initial: 80,
            ..PanelSettings::default()
        };
        let mut panel = ControlPanel::new(&settings);
        panel.layout(400.0, 600.0, 1.0);
        assert_eq!(panel.slider().value(), 50);

        let mut target = RecordingTarget::default();
        let track = panel.slider().track;
        let y = track.center()[1];
        panel.handle_pointer(event(PointerKind::Down, [track.position[0], y]), &mut target);
        assert_eq!(panel.slider().value(), 5);
        assert_eq!(target.widths, vec![5.0]);
    }

    #[test]
    fn test_apply_width_sends_initial_value() {
        let panel = panel();
        let mut target = RecordingTarget::default();
        panel.apply_width(&mut target);
        assert_eq!(target.widths, vec![10.0]);
    }

    #[test]
    fn test_clear_fires_on_release_inside() {
        let mut panel = panel();
        let mut target = RecordingTarget::default();
        let center = panel.clear_button().center();

        panel.handle_pointer(event(PointerKind::Down, center), &mut target);
        assert_eq!(target.clears, 0);
        panel.handle_pointer(event(PointerKind::Up, center), &mut target);
        assert_eq!(target.clears, 1);
    }

    #[test]
    fn test_clear_skipped_when_released_elsewhere() {
        let mut panel = panel();
        let mut target = RecordingTarget::default();

        panel.handle_pointer(event(PointerKind::Down, panel.clear_button().center()), &mut target);
        panel.handle_pointer(event(PointerKind::Up, [5.0, 5.0]), &mut target);
        assert_eq!(target.clears, 0);
    }

    #[test]
    fn test_color_button_requests_picker() {
        let mut panel = panel();
        let mut target = RecordingTarget::default();
        let center = panel.color_button().center();

        assert_eq!(panel.handle_pointer(event(PointerKind::Down, center), &mut target), None);
        assert_eq!(
            panel.handle_pointer(event(PointerKind::Up, center), &mut target),
            Some(PanelCommand::OpenColorPicker)
        );
    }

    #[test]
    fn test_cancel_drops_pressed_button() {
        let mut panel = panel();
        let mut target = RecordingTarget::default();
        let center = panel.clear_button().center();

        panel.handle_pointer(event(PointerKind::Down, center), &mut target);
        panel.handle_pointer(event(PointerKind::Cancel, center), &mut target);
        panel.handle_pointer(event(PointerKind::Up, center), &mut target);
        assert_eq!(target.clears, 0);
    }

    #[test]
    fn test_draw_shows_brush_color_in_swatch() {
        let panel = panel();
        let mut frame = tiny_skia::Pixmap::new(400, 600).unwrap();
        let brush = BrushState::new([1.0, 0.0, 0.0, 1.0], 10.0);
        panel.draw(&mut frame.as_mut(), &brush);

        let [cx, cy] = panel.color_button().center();
        let pixel = frame.pixel(cx as u32, cy as u32).unwrap();
        assert_eq!((pixel.red(), pixel.green(), pixel.blue()), (255, 0, 0));
    }
}
