//! Modal HSV color dialog opened from the control panel's color button.

use palette::{Hsv, IntoColor, Srgb};
use tiny_skia::{GradientStop, LinearGradient, Paint, Point, PixmapMut, SpreadMode, Transform};

use crate::canvas::{BrushTarget, to_skia_color};
use crate::input::{PointerEvent, PointerKind};
use crate::ui::{Bounds, draw_line, fill_bounds, stroke_circle};

const SCRIM: [f32; 4] = [0.0, 0.0, 0.0, 0.4];
const DIALOG_BG: [f32; 4] = [0.95, 0.95, 0.95, 1.0];
const BUTTON_BG: [f32; 4] = [0.8, 0.8, 0.8, 1.0];
const PRESSED_BG: [f32; 4] = [0.5, 0.7, 1.0, 1.0];
const ICON_COLOR: [f32; 4] = [0.2, 0.2, 0.2, 1.0];
const PADDING: f32 = 16.0;
const HUE_BAR_WIDTH: f32 = 32.0;
const SWATCH_HEIGHT: f32 = 32.0;
const BUTTON_HEIGHT: f32 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Part {
    SvSquare,
    HueBar,
    Ok,
    Cancel,
    Body,
    Outside,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PickerLayout {
    pub dialog: Bounds,
    pub sv_square: Bounds,
    pub hue_bar: Bounds,
    pub old_swatch: Bounds,
    pub new_swatch: Bounds,
    pub ok_button: Bounds,
    pub cancel_button: Bounds,
}

pub struct ColorPicker {
    open: bool,
    size: f32,
    scale: f32,
    /// Degrees in `0.0..=360.0`.
    hue: f32,
    saturation: f32,
    value: f32,
    alpha: f32,
    initial: [f32; 4],
    layout: PickerLayout,
    pressed: Option<Part>,
}

impl ColorPicker {
    pub fn new(size: f32) -> Self {
        Self {
            open: false,
            size,
            scale: 1.0,
            hue: 0.0,
            saturation: 0.0,
            value: 0.0,
            alpha: 1.0,
            initial: [0.0, 0.0, 0.0, 1.0],
            layout: PickerLayout::default(),
            pressed: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn layout_bounds(&self) -> &PickerLayout {
        &self.layout
    }

    pub fn open(&mut self, color: [f32; 4]) {
        let (hue, saturation, value) = rgb_to_hsv([color[0], color[1], color[2]]);
        self.hue = hue;
        self.saturation = saturation;
        self.value = value;
        self.alpha = color[3];
        self.initial = color;
        self.pressed = None;
        self.open = true;
        log::debug!("Color picker opened with {:?}", color);
    }

    pub fn cancel(&mut self) {
        self.open = false;
        self.pressed = None;
    }

    pub fn selected_color(&self) -> [f32; 4] {
        let [r, g, b] = hsv_to_rgb(self.hue, self.saturation, self.value);
        [r, g, b, self.alpha]
    }

    pub fn layout(&mut self, window_width: f32, window_height: f32, scale: f32) {
        self.scale = scale;
        let pad = PADDING * scale;
        let hue_width = HUE_BAR_WIDTH * scale;
        let swatch_height = SWATCH_HEIGHT * scale;
        let button_height = BUTTON_HEIGHT * scale;

        let width = (self.size * scale).min(window_width * 0.9);
        let sv = (width - 3.0 * pad - hue_width).max(0.0);
        let height = (4.0 * pad + sv + swatch_height + button_height).min(window_height * 0.9);
        let sv = sv.min((height - 4.0 * pad - swatch_height - button_height).max(0.0));

        let dialog = Bounds::new(
            (window_width - width) / 2.0,
            (window_height - height) / 2.0,
            width,
            height,
        );
        let [x, y] = dialog.position;
        let sv_square = Bounds::new(x + pad, y + pad, sv, sv);
        let hue_bar = Bounds::new(x + 2.0 * pad + sv, y + pad, hue_width, sv);

        let row_width = (width - 3.0 * pad) / 2.0;
        let swatch_y = y + 2.0 * pad + sv;
        let old_swatch = Bounds::new(x + pad, swatch_y, row_width, swatch_height);
        let new_swatch = Bounds::new(x + 2.0 * pad + row_width, swatch_y, row_width, swatch_height);

        let button_y = swatch_y + swatch_height + pad;
        let cancel_button = Bounds::new(x + pad, button_y, row_width, button_height);
        let ok_button = Bounds::new(x + 2.0 * pad + row_width, button_y, row_width, button_height);

        self.layout = PickerLayout {
            dialog,
            sv_square,
            hue_bar,
            old_swatch,
            new_swatch,
            ok_button,
            cancel_button,
        };
    }

    fn part_at(&self, pos: [f32; 2]) -> Part {
        let l = &self.layout;
        if l.sv_square.contains(pos) {
            Part::SvSquare
        } else if l.hue_bar.contains(pos) {
            Part::HueBar
        } else if l.ok_button.contains(pos) {
            Part::Ok
        } else if l.cancel_button.contains(pos) {
            Part::Cancel
        } else if l.dialog.contains(pos) {
            Part::Body
        } else {
            Part::Outside
        }
    }

    fn drag(&mut self, part: Part, pos: [f32; 2]) {
        match part {
            Part::SvSquare => {
                let [fx, fy] = fraction_in(&self.layout.sv_square, pos);
                self.saturation = fx;
                self.value = 1.0 - fy;
            }
            Part::HueBar => {
                let [_, fy] = fraction_in(&self.layout.hue_bar, pos);
                self.hue = fy * 360.0;
            }
            _ => {}
        }
    }

    /// Consumes every pointer event while open. OK pushes the selection into
    /// `target`; Cancel and taps outside the dialog leave it untouched.
    pub fn handle_pointer(&mut self, event: PointerEvent, target: &mut dyn BrushTarget) -> bool {
        if !self.open {
            return false;
        }
        let pos = event.position();
        match event.kind {
            PointerKind::Down => {
                let part = self.part_at(pos);
                self.pressed = Some(part);
                self.drag(part, pos);
            }
            PointerKind::Move => {
                if let Some(part) = self.pressed {
                    self.drag(part, pos);
                }
            }
            PointerKind::Up => match self.pressed.take() {
                Some(Part::Ok) if self.layout.ok_button.contains(pos) => {
                    let color = self.selected_color();
                    target.set_color(color);
                    self.open = false;
                    log::debug!("Brush color set to {:?}", color);
                }
                Some(Part::Cancel) if self.layout.cancel_button.contains(pos) => self.cancel(),
                Some(Part::Outside) if self.part_at(pos) == Part::Outside => self.cancel(),
                Some(part) => self.drag(part, pos),
                None => {}
            },
            PointerKind::Cancel => self.pressed = None,
        }
        true
    }

    pub fn draw(&self, frame: &mut PixmapMut) {
        if !self.open {
            return;
        }
        let whole = Bounds::new(0.0, 0.0, frame.width() as f32, frame.height() as f32);
        fill_bounds(frame, whole, SCRIM);

        let l = &self.layout;
        fill_bounds(frame, l.dialog, DIALOG_BG);

        self.draw_sv_square(frame);
        self.draw_hue_bar(frame);

        fill_bounds(frame, l.old_swatch, [1.0, 1.0, 1.0, 1.0]);
        fill_bounds(frame, l.old_swatch, self.initial);
        fill_bounds(frame, l.new_swatch, [1.0, 1.0, 1.0, 1.0]);
        fill_bounds(frame, l.new_swatch, self.selected_color());

        self.draw_button(frame, l.cancel_button, Part::Cancel);
        let icon = square_icon(l.cancel_button);
        let [x0, y0] = icon.position;
        let [x1, y1] = [x0 + icon.size[0], y0 + icon.size[1]];
        let line_width = 2.0 * self.scale;
        draw_line(frame, [x0, y0], [x1, y1], line_width, ICON_COLOR);
        draw_line(frame, [x1, y0], [x0, y1], line_width, ICON_COLOR);

        self.draw_button(frame, l.ok_button, Part::Ok);
        let icon = square_icon(l.ok_button);
        let [x0, y0] = icon.position;
        let [w, h] = icon.size;
        draw_line(frame, [x0, y0 + h * 0.55], [x0 + w * 0.4, y0 + h], line_width, ICON_COLOR);
        draw_line(frame, [x0 + w * 0.4, y0 + h], [x0 + w, y0], line_width, ICON_COLOR);
    }

    fn draw_button(&self, frame: &mut PixmapMut, bounds: Bounds, part: Part) {
        let color = if self.pressed == Some(part) {
            PRESSED_BG
        } else {
            BUTTON_BG
        };
        fill_bounds(frame, bounds, color);
    }

    fn draw_sv_square(&self, frame: &mut PixmapMut) {
        let sq = self.layout.sv_square;
        let Some(rect) = sq.to_rect() else {
            return;
        };
        let [r, g, b] = hsv_to_rgb(self.hue, 1.0, 1.0);
        fill_bounds(frame, sq, [r, g, b, 1.0]);

        let [x, y] = sq.position;
        let [w, h] = sq.size;
        let white = gradient(
            [x, y],
            [x + w, y],
            vec![(0.0, [1.0, 1.0, 1.0, 1.0]), (1.0, [1.0, 1.0, 1.0, 0.0])],
        );
        let black = gradient(
            [x, y],
            [x, y + h],
            vec![(0.0, [0.0, 0.0, 0.0, 0.0]), (1.0, [0.0, 0.0, 0.0, 1.0])],
        );
        for paint in [white, black].into_iter().flatten() {
            frame.fill_rect(rect, &paint, Transform::identity(), None);
        }

        let cursor = [x + self.saturation * w, y + (1.0 - self.value) * h];
        let radius = 6.0 * self.scale;
        stroke_circle(frame, cursor, radius, 3.0 * self.scale, [0.0, 0.0, 0.0, 1.0]);
        stroke_circle(frame, cursor, radius, 1.5 * self.scale, [1.0, 1.0, 1.0, 1.0]);
    }

    fn draw_hue_bar(&self, frame: &mut PixmapMut) {
        let bar = self.layout.hue_bar;
        let Some(rect) = bar.to_rect() else {
            return;
        };
        let [x, y] = bar.position;
        let [w, h] = bar.size;
        let stops = (0..=6)
            .map(|i| {
                let [r, g, b] = hsv_to_rgb(i as f32 * 60.0, 1.0, 1.0);
                (i as f32 / 6.0, [r, g, b, 1.0])
            })
            .collect();
        if let Some(paint) = gradient([x, y], [x, y + h], stops) {
            frame.fill_rect(rect, &paint, Transform::identity(), None);
        }

        let marker_y = y + self.hue / 360.0 * h;
        let overhang = 2.0 * self.scale;
        draw_line(
            frame,
            [x - overhang, marker_y],
            [x + w + overhang, marker_y],
            3.0 * self.scale,
            ICON_COLOR,
        );
    }
}

fn square_icon(button: Bounds) -> Bounds {
    let side = button.size[0].min(button.size[1]) * 0.5;
    let [cx, cy] = button.center();
    Bounds::new(cx - side / 2.0, cy - side / 2.0, side, side)
}

fn fraction_in(bounds: &Bounds, pos: [f32; 2]) -> [f32; 2] {
    let f = |v: f32, start: f32, len: f32| {
        if len > 0.0 {
            ((v - start) / len).clamp(0.0, 1.0)
        } else {
            0.0
        }
    };
    [
        f(pos[0], bounds.position[0], bounds.size[0]),
        f(pos[1], bounds.position[1], bounds.size[1]),
    ]
}

fn gradient(start: [f32; 2], end: [f32; 2], stops: Vec<(f32, [f32; 4])>) -> Option<Paint<'static>> {
    let stops = stops
        .into_iter()
        .map(|(pos, color)| GradientStop::new(pos, to_skia_color(color)))
        .collect();
    let shader = LinearGradient::new(
        Point::from_xy(start[0], start[1]),
        Point::from_xy(end[0], end[1]),
        stops,
        SpreadMode::Pad,
        Transform::identity(),
    )?;
    let mut paint = Paint::default();
    paint.shader = shader;
    paint.anti_alias = false;
    Some(paint)
}

pub(crate) fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> [f32; 3] {
    let hsv: Hsv = Hsv::new(hue, saturation, value);
    let rgb: Srgb = hsv.into_color();
    [
        rgb.red.clamp(0.0, 1.0),
        rgb.green.clamp(0.0, 1.0),
        rgb.blue.clamp(0.0, 1.0),
    ]
}

pub(crate) fn rgb_to_hsv(rgb: [f32; 3]) -> (f32, f32, f32) {
    let hsv: Hsv = Srgb::new(rgb[0], rgb[1], rgb[2]).into_color();
    (hsv.hue.into_positive_degrees(), hsv.saturation, hsv.value)
}
