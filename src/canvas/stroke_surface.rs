use anyhow::{Result, anyhow};
use tiny_skia::{Color, Path, PathBuilder, Pixmap, PixmapMut, PixmapPaint, Transform};

use crate::canvas::brush::{BrushState, BrushTarget, is_valid_width, sanitize_color};
use crate::input::{PointerEvent, PointerKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeState {
    Idle,
    Stroking,
}

/// Freehand drawing target: a committed raster layer plus the stroke the
/// pointer is currently dragging.
///
/// The live stroke is kept as points and re-stroked from scratch on every
/// render, so brush changes made mid-stroke restyle the whole preview. It is
/// rasterized into the committed layer only on pointer-up.
pub struct StrokeSurface {
    committed: Pixmap,
    live_path: Vec<[f32; 2]>,
    state: StrokeState,
    brush: BrushState,
}

impl StrokeSurface {
    pub fn new(width: u32, height: u32, brush: BrushState) -> Result<Self> {
        Ok(Self {
            committed: allocate_layer(width, height)?,
            live_path: Vec::new(),
            state: StrokeState::Idle,
            brush,
        })
    }

    /// Replaces the committed layer with a blank one of the new size.
    /// Existing content is dropped, not rescaled.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.committed = allocate_layer(width, height)?;
        log::info!("Stroke surface resized to {}x{}", width, height);
        Ok(())
    }

    pub fn size(&self) -> (u32, u32) {
        (self.committed.width(), self.committed.height())
    }

    pub fn committed(&self) -> &Pixmap {
        &self.committed
    }

    pub fn live_path(&self) -> &[[f32; 2]] {
        &self.live_path
    }

    pub fn state(&self) -> StrokeState {
        self.state
    }

    pub fn is_stroking(&self) -> bool {
        self.state == StrokeState::Stroking
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        if self.is_stroking() {
            log::debug!(
                "Discarding unfinished stroke of {} points",
                self.live_path.len()
            );
        }
        self.live_path.clear();
        self.live_path.push([x, y]);
        self.state = StrokeState::Stroking;
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        if !self.is_stroking() {
            return;
        }
        self.live_path.push([x, y]);
    }

    /// Commits the stroke accrued so far. The release position itself is not
    /// appended: only points delivered by moves end up in the layer.
    pub fn pointer_up(&mut self, x: f32, y: f32) {
        if !self.is_stroking() {
            return;
        }
        let points = std::mem::take(&mut self.live_path);
        log::debug!(
            "Committing stroke of {} points, released at ({}, {})",
            points.len(),
            x,
            y
        );
        if let Some(path) = build_path(&points) {
            self.committed.stroke_path(
                &path,
                &self.brush.paint(),
                &self.brush.stroke(),
                Transform::identity(),
                None,
            );
        }
        self.state = StrokeState::Idle;
    }

    pub fn pointer_cancel(&mut self) {
        if self.is_stroking() {
            log::debug!("Stroke cancelled");
        }
        self.live_path.clear();
        self.state = StrokeState::Idle;
    }

    /// Dispatches a pointer sample. Returns whether it changed what `render`
    /// would show.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        match event.kind {
            PointerKind::Down => {
                self.pointer_down(event.x, event.y);
                true
            }
            PointerKind::Move => {
                let stroking = self.is_stroking();
                self.pointer_move(event.x, event.y);
                stroking
            }
            PointerKind::Up => {
                let stroking = self.is_stroking();
                self.pointer_up(event.x, event.y);
                stroking
            }
            PointerKind::Cancel => {
                let stroking = self.is_stroking();
                self.pointer_cancel();
                stroking
            }
        }
    }

    /// Committed layer with the live stroke drawn over it.
    pub fn render(&self) -> Pixmap {
        let mut image = self.committed.clone();
        self.stroke_live(&mut image.as_mut(), Transform::identity());
        image
    }

    /// Same composition as `render`, drawn into `frame` with the surface's
    /// top-left corner at (`x`, `y`).
    pub fn composite_onto(&self, frame: &mut PixmapMut, x: i32, y: i32) {
        frame.draw_pixmap(
            x,
            y,
            self.committed.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
        self.stroke_live(frame, Transform::from_translate(x as f32, y as f32));
    }

    fn stroke_live(&self, target: &mut PixmapMut, transform: Transform) {
        if let Some(path) = build_path(&self.live_path) {
            target.stroke_path(
                &path,
                &self.brush.paint(),
                &self.brush.stroke(),
                transform,
                None,
            );
        }
    }
}

impl BrushTarget for StrokeSurface {
    fn brush(&self) -> BrushState {
        self.brush
    }

    fn set_color(&mut self, color: [f32; 4]) {
        self.brush.color = sanitize_color(color);
    }

    fn set_width(&mut self, width: f32) {
        if !is_valid_width(width) {
            log::warn!("Ignoring brush width {}", width);
            return;
        }
        self.brush.width = width;
    }

    fn clear(&mut self) {
        self.committed.fill(Color::TRANSPARENT);
        log::debug!("Committed layer cleared");
    }
}

fn allocate_layer(width: u32, height: u32) -> Result<Pixmap> {
    Pixmap::new(width, height)
        .ok_or_else(|| anyhow!("cannot allocate a {}x{} drawing layer", width, height))
}

/// A lone down point has no segment and strokes to nothing.
fn build_path(points: &[[f32; 2]]) -> Option<Path> {
    let (first, rest) = points.split_first()?;
    if rest.is_empty() {
        return None;
    }
    let mut pb = PathBuilder::new();
    pb.move_to(first[0], first[1]);
    for point in rest {
        pb.line_to(point[0], point[1]);
    }
    pb.finish()
}
