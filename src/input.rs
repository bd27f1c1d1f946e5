//! Folds mouse and touch input into a single pointer stream.

use winit::event::TouchPhase;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
    Cancel,
}

/// One pointer sample in window coordinates (physical pixels).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub x: f32,
    pub y: f32,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, x: f32, y: f32) -> Self {
        Self { kind, x, y }
    }

    pub fn position(&self) -> [f32; 2] {
        [self.x, self.y]
    }
}

/// Tracks which physical pointer currently owns the stroke.
///
/// Only one pointer is followed at a time: the left mouse button, or the
/// first finger to touch down. Extra fingers are ignored until it lifts.
#[derive(Debug, Default)]
pub struct PointerTracker {
    mouse_pos: [f32; 2],
    mouse_down: bool,
    active_touch: Option<u64>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.mouse_down || self.active_touch.is_some()
    }

    pub fn cursor_moved(&mut self, x: f32, y: f32) -> Option<PointerEvent> {
        self.mouse_pos = [x, y];
        self.mouse_down.then(|| PointerEvent::new(PointerKind::Move, x, y))
    }

    pub fn mouse_button(&mut self, pressed: bool) -> Option<PointerEvent> {
        if self.active_touch.is_some() || pressed == self.mouse_down {
            return None;
        }
        self.mouse_down = pressed;
        let kind = if pressed { PointerKind::Down } else { PointerKind::Up };
        Some(PointerEvent::new(kind, self.mouse_pos[0], self.mouse_pos[1]))
    }

    pub fn touch(&mut self, id: u64, phase: TouchPhase, x: f32, y: f32) -> Option<PointerEvent> {
        match phase {
            TouchPhase::Started => {
                if self.is_active() {
                    return None;
                }
                self.active_touch = Some(id);
                Some(PointerEvent::new(PointerKind::Down, x, y))
            }
            TouchPhase::Moved => (self.active_touch == Some(id))
                .then(|| PointerEvent::new(PointerKind::Move, x, y)),
            TouchPhase::Ended | TouchPhase::Cancelled => {
                if self.active_touch != Some(id) {
                    return None;
                }
                self.active_touch = None;
                let kind = if phase == TouchPhase::Ended {
                    PointerKind::Up
                } else {
                    PointerKind::Cancel
                };
                Some(PointerEvent::new(kind, x, y))
            }
        }
    }

    /// The window lost focus mid-gesture; we will not see the release.
    pub fn focus_lost(&mut self) -> Option<PointerEvent> {
        if !self.is_active() {
            return None;
        }
        self.mouse_down = false;
        self.active_touch = None;
        Some(PointerEvent::new(
            PointerKind::Cancel,
            self.mouse_pos[0],
            self.mouse_pos[1],
        ))
    }
}
