use crate::app_state::State;
use crate::canvas::{BrushTarget, to_skia_color};

impl State {
    /// Composes background, drawing, controls and (when open) the color
    /// picker into the CPU frame, then uploads it.
    pub fn update(&mut self) {
        self.frame
            .fill(to_skia_color(self.settings.window.opaque_background()));

        let brush = self.surface.brush();
        {
            let mut frame = self.frame.as_mut();
            self.surface.composite_onto(&mut frame, 0, 0);
            self.panel.draw(&mut frame, &brush);
            self.picker.draw(&mut frame);
        }

        self.upload_frame();
    }

    fn upload_frame(&mut self) {
        let (width, height) = (self.frame_texture.width, self.frame_texture.height);
        if self.frame.width() != width || self.frame.height() != height {
            log::warn!(
                "Frame is {}x{} but texture is {}x{}, skipping upload",
                self.frame.width(),
                self.frame.height(),
                width,
                height
            );
            return;
        }

        // Opaque background: premultiplied and straight RGBA coincide.
        self.gpu.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.frame_texture.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            self.frame.data(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
    }
}
