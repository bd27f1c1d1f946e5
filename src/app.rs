use crate::app_state::State;
use crate::config::Settings;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

struct App {
    settings: Settings,
    state: Option<State>,
}

impl App {
    fn new(settings: Settings) -> Self {
        Self {
            settings,
            state: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(state) = &mut self.state {
            if let Err(e) = state.recreate_surface() {
                log::error!("{e:#}");
                event_loop.exit();
                return;
            }
            state.window().request_redraw();
            return;
        }

        let window_attributes =
            Window::default_attributes().with_title(self.settings.window.title.clone());
        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        match pollster::block_on(State::new(window, self.settings.clone())) {
            Ok(state) => {
                state.window().request_redraw();
                self.state = Some(state);
            }
            Err(e) => {
                log::error!("Failed to set up drawing surface: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        log::info!("Suspended");
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(state) = &mut self.state else {
            return;
        };
        if window_id != state.window().id() {
            return;
        }

        if state.input(&event) {
            state.window().request_redraw();
            return;
        }

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(physical_size) => {
                log::info!("WindowEvent::Resized: {}x{}", physical_size.width, physical_size.height);
                state.resize(physical_size);
                state.window().request_redraw();
            }
            WindowEvent::RedrawRequested => {
                state.update();
                match state.render() {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        state.reconfigure_surface();
                        state.window().request_redraw();
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of GPU memory");
                        event_loop.exit();
                    }
                    Err(e) => log::warn!("Dropped frame: {e:?}"),
                }
            }
            _ => {}
        }
    }
}

fn init_logging() {
    cfg_if::cfg_if! {
        if #[cfg(target_os = "android")] {
            android_logger::init_once(
                android_logger::Config::default()
                    .with_max_level(log::LevelFilter::Info)
                    .with_tag("fingerpaint"),
            );
        } else {
            env_logger::init();
        }
    }
}

fn run_event_loop(event_loop: EventLoop<()>) {
    let mut app = App::new(Settings::load());
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop terminated: {e}");
    }
}

pub fn run() {
    init_logging();

    match EventLoop::new() {
        Ok(event_loop) => run_event_loop(event_loop),
        Err(e) => log::error!("Failed to create event loop: {e}"),
    }
}

#[cfg(target_os = "android")]
pub fn run_android(android_app: winit::platform::android::activity::AndroidApp) {
    use winit::platform::android::EventLoopBuilderExtAndroid;

    init_logging();
    log::info!("Starting fingerpaint on Android");

    match EventLoop::builder().with_android_app(android_app).build() {
        Ok(event_loop) => run_event_loop(event_loop),
        Err(e) => log::error!("Failed to create event loop: {e}"),
    }
}
