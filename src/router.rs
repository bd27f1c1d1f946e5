//! Decides which part of the screen receives each pointer sample.

use crate::canvas::{BrushTarget, StrokeSurface};
use crate::color_picker::ColorPicker;
use crate::input::{PointerEvent, PointerKind};
use crate::ui::{ControlPanel, PanelCommand};

/// Which part of the screen owns the pointer between down and up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerCapture {
    Idle,
    Surface,
    Panel,
    Picker,
}

/// Hands a whole gesture to whoever was hit by its down event: the color
/// picker while open, else the control strip or the canvas.
#[derive(Debug)]
pub struct PointerRouter {
    capture: PointerCapture,
}

impl Default for PointerRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerRouter {
    pub fn new() -> Self {
        Self {
            capture: PointerCapture::Idle,
        }
    }

    pub fn capture(&self) -> PointerCapture {
        self.capture
    }

    /// Returns true when the event changed what is on screen.
    pub fn route(
        &mut self,
        event: PointerEvent,
        surface: &mut StrokeSurface,
        panel: &mut ControlPanel,
        picker: &mut ColorPicker,
    ) -> bool {
        if event.kind == PointerKind::Down {
            self.capture = if picker.is_open() {
                PointerCapture::Picker
            } else if panel.contains(event.position()) {
                PointerCapture::Panel
            } else {
                PointerCapture::Surface
            };
        }

        let changed = match self.capture {
            PointerCapture::Idle => false,
            PointerCapture::Surface => surface.handle_pointer(event),
            PointerCapture::Panel => {
                if panel.handle_pointer(event, surface) == Some(PanelCommand::OpenColorPicker) {
                    picker.open(surface.brush().color);
                }
                true
            }
            PointerCapture::Picker => picker.handle_pointer(event, surface),
        };

        if matches!(event.kind, PointerKind::Up | PointerKind::Cancel) {
            self.capture = PointerCapture::Idle;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::BrushState;
    use crate::config::PanelSettings;

    const WIDTH: u32 = 400;
    const HEIGHT: u32 = 600;

    struct Screen {
        router: PointerRouter,
        surface: StrokeSurface,
        panel: ControlPanel,
        picker: ColorPicker,
    }

    impl Screen {
        fn new() -> Self {
            let mut panel = ControlPanel::new(&PanelSettings::default());
            panel.layout(WIDTH as f32, HEIGHT as f32, 1.0);
            let mut picker = ColorPicker::new(320.0);
            picker.layout(WIDTH as f32, HEIGHT as f32, 1.0);
            let rows = HEIGHT - panel.height() as u32;
            let surface =
                StrokeSurface::new(WIDTH, rows, BrushState::new([0.0, 0.0, 0.0, 1.0], 10.0))
                    .unwrap();
            Self {
                router: PointerRouter::new(),
                surface,
                panel,
                picker,
            }
        }

        fn send(&mut self, kind: PointerKind, pos: [f32; 2]) -> bool {
            self.router.route(
                PointerEvent::new(kind, pos[0], pos[1]),
                &mut self.surface,
                &mut self.panel,
                &mut self.picker,
            )
        }

        fn committed_alpha(&self, x: u32, y: u32) -> u8 {
            self.surface.committed().pixel(x, y).unwrap().alpha()
        }
    }

    #[test]
    fn test_down_on_canvas_captures_surface() {
        let mut screen = Screen::new();
        assert!(screen.send(PointerKind::Down, [20.0, 100.0]));
        assert_eq!(screen.router.capture(), PointerCapture::Surface);
        assert!(screen.surface.is_stroking());

        screen.send(PointerKind::Move, [200.0, 100.0]);
        screen.send(PointerKind::Up, [200.0, 100.0]);
        assert_eq!(screen.router.capture(), PointerCapture::Idle);
        assert_eq!(screen.committed_alpha(100, 100), 255);
    }

    #[test]
    fn test_stroke_dragged_over_panel_stays_with_surface() {
        let mut screen = Screen::new();
        let clear = screen.panel.clear_button().center();

        screen.send(PointerKind::Down, [clear[0], 400.0]);
        screen.send(PointerKind::Move, [clear[0], 500.0]);
        screen.send(PointerKind::Move, clear);
        assert_eq!(screen.router.capture(), PointerCapture::Surface);
        assert_eq!(screen.surface.live_path().len(), 3);

        screen.send(PointerKind::Up, clear);
        // The release over the clear button did not clear.
        assert_eq!(screen.committed_alpha(clear[0] as u32, 450), 255);
    }

    #[test]
    fn test_down_in_panel_keeps_capture_until_up() {
        let mut screen = Screen::new();
        let track = screen.panel.slider().track;
        let y = track.center()[1];

        screen.send(PointerKind::Down, [track.position[0], y]);
        assert_eq!(screen.router.capture(), PointerCapture::Panel);
        assert_eq!(screen.surface.brush().width, 0.0);

        // Dragging up into the canvas keeps moving the slider, not drawing.
        let right = track.position[0] + track.size[0];
        screen.send(PointerKind::Move, [right, 100.0]);
        assert_eq!(screen.surface.brush().width, 100.0);
        assert!(!screen.surface.is_stroking());

        screen.send(PointerKind::Up, [right, 100.0]);
        assert_eq!(screen.router.capture(), PointerCapture::Idle);
        assert!(screen.surface.live_path().is_empty());
    }

    #[test]
    fn test_cancel_releases_capture() {
        let mut screen = Screen::new();
        screen.send(PointerKind::Down, screen.panel.clear_button().center());
        assert_eq!(screen.router.capture(), PointerCapture::Panel);
        screen.send(PointerKind::Cancel, [0.0, 0.0]);
        assert_eq!(screen.router.capture(), PointerCapture::Idle);

        assert!(!screen.send(PointerKind::Move, [50.0, 50.0]));
        assert!(!screen.surface.is_stroking());
    }

    #[test]
    fn test_color_button_opens_picker_with_brush_color() {
        let mut screen = Screen::new();
        screen.surface.set_color([0.0, 0.0, 1.0, 1.0]);
        let button = screen.panel.color_button().center();

        screen.send(PointerKind::Down, button);
        assert!(!screen.picker.is_open());
        screen.send(PointerKind::Up, button);
        assert!(screen.picker.is_open());

        let selected = screen.picker.selected_color();
        assert!((selected[2] - 1.0).abs() < 1e-4);
        assert!(selected[0].abs() < 1e-4);
    }

    #[test]
    fn test_open_picker_takes_every_event() {
        let mut screen = Screen::new();
        screen.picker.open([0.0, 0.0, 0.0, 1.0]);
        let dialog = screen.picker.layout_bounds().dialog;

        // A drag on the canvas area inside the dialog does not draw.
        let start = dialog.center();
        screen.send(PointerKind::Down, start);
        assert_eq!(screen.router.capture(), PointerCapture::Picker);
        screen.send(PointerKind::Move, [start[0] + 10.0, start[1]]);
        screen.send(PointerKind::Up, [start[0] + 10.0, start[1]]);
        assert!(!screen.surface.is_stroking());
        assert!(screen.surface.committed().data().iter().all(|&b| b == 0));

        // Nor does a tap on the clear button reach the panel; it dismisses.
        screen.surface.pointer_down(10.0, 10.0);
        screen.surface.pointer_move(100.0, 10.0);
        screen.surface.pointer_up(100.0, 10.0);
        let clear = screen.panel.clear_button().center();
        screen.send(PointerKind::Down, clear);
        screen.send(PointerKind::Up, clear);
        assert!(!screen.picker.is_open());
        assert_eq!(screen.committed_alpha(50, 10), 255);
    }

    #[test]
    fn test_ok_in_picker_sets_surface_color() {
        let mut screen = Screen::new();
        screen.picker.open([1.0, 0.0, 0.0, 1.0]);
        let ok = screen.picker.layout_bounds().ok_button.center();

        screen.send(PointerKind::Down, ok);
        screen.send(PointerKind::Up, ok);
        assert!(!screen.picker.is_open());
        let color = screen.surface.brush().color;
        assert!((color[0] - 1.0).abs() < 1e-4 && color[1].abs() < 1e-4);
    }
}
