use crate::app_state::{State, canvas_height, create_frame_texture, fit_surface};
use crate::input::PointerEvent;
use tiny_skia::Pixmap;
use winit::event::*;
use winit::keyboard::{KeyCode, PhysicalKey};

impl State {
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            log::warn!(
                "Ignoring resize to {}x{}",
                new_size.width,
                new_size.height
            );
            return;
        }

        let Some(frame) = Pixmap::new(new_size.width, new_size.height) else {
            log::warn!(
                "Cannot allocate a {}x{} frame, keeping {}x{}",
                new_size.width,
                new_size.height,
                self.size.width,
                self.size.height
            );
            return;
        };

        self.size = new_size;
        self.frame = frame;
        self.gpu.config.width = new_size.width;
        self.gpu.config.height = new_size.height;
        self.reconfigure_surface();
        self.frame_texture = create_frame_texture(&self.gpu, new_size.width, new_size.height);

        let scale = self.window.scale_factor() as f32;
        let (width, height) = (new_size.width as f32, new_size.height as f32);
        self.panel.layout(width, height, scale);
        self.picker.layout(width, height, scale);

        let rows = canvas_height(new_size.height, self.panel.height());
        if let Err(e) = fit_surface(&mut self.surface, new_size.width, rows) {
            log::warn!("Stroke surface kept at {:?}: {e}", self.surface.size());
        }
    }

    /// Reapplies the current configuration to the swapchain. The drawing is
    /// left alone.
    pub fn reconfigure_surface(&mut self) {
        self.gpu
            .surface
            .configure(&self.gpu.device, &self.gpu.config);
    }

    /// Returns true when the event changed what is on screen.
    pub fn input(&mut self, event: &WindowEvent) -> bool {
        let pointer = match event {
            WindowEvent::CursorMoved { position, .. } => self
                .input
                .tracker
                .cursor_moved(position.x as f32, position.y as f32),
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => self
                .input
                .tracker
                .mouse_button(*state == ElementState::Pressed),
            WindowEvent::Touch(touch) => self.input.tracker.touch(
                touch.id,
                touch.phase,
                touch.location.x as f32,
                touch.location.y as f32,
            ),
            WindowEvent::Focused(false) => self.input.tracker.focus_lost(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } if self.picker.is_open() => {
                self.picker.cancel();
                return true;
            }
            _ => return false,
        };

        match pointer {
            Some(event) => self.route_pointer(event),
            None => false,
        }
    }

    pub fn route_pointer(&mut self, event: PointerEvent) -> bool {
        self.input.router.route(
            event,
            &mut self.surface,
            &mut self.panel,
            &mut self.picker,
        )
    }
}
