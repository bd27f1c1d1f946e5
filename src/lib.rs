mod app;
mod app_state;
mod event_handler;
mod renderer;
mod state;
mod update_logic;

pub mod canvas;
pub mod color_picker;
pub mod config;
pub mod input;
pub mod router;
pub mod ui;

// Re-export the main public interface
pub use app::run;
pub use canvas::{BrushState, BrushTarget, StrokeState, StrokeSurface};
pub use input::{PointerEvent, PointerKind};

#[cfg(target_os = "android")]
#[unsafe(no_mangle)]
fn android_main(app: winit::platform::android::activity::AndroidApp) {
    app::run_android(app);
}
