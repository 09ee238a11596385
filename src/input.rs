//! Input collection
//!
//! Browser events arrive whenever they like; the frame loop polls
//! [`InputState::snapshot`] once per tick to get a [`TickInput`].

use std::collections::HashSet;

use glam::Vec2;

use crate::sim::TickInput;

/// A movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::Left, Self::Right, Self::Up, Self::Down];

    /// Map a `KeyboardEvent.key` value (arrows or WASD, any case)
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_lowercase().as_str() {
            "arrowleft" | "a" => Some(Self::Left),
            "arrowright" | "d" => Some(Self::Right),
            "arrowup" | "w" => Some(Self::Up),
            "arrowdown" | "s" => Some(Self::Down),
            _ => None,
        }
    }

    /// Element id of the on-screen button for this direction
    pub fn button_id(&self) -> &'static str {
        match self {
            Self::Left => "btn-left",
            Self::Right => "btn-right",
            Self::Up => "btn-up",
            Self::Down => "btn-down",
        }
    }
}

/// Keys whose browser default (scrolling) is suppressed
pub fn should_prevent_default(key: &str) -> bool {
    matches!(
        key,
        "ArrowUp" | "ArrowDown" | "ArrowLeft" | "ArrowRight" | "w" | "a" | "s" | "d"
    )
}

/// Whether a keydown should start a run while idle
pub fn is_start_key(key: &str) -> bool {
    key.starts_with("Arrow") || Direction::from_key(key).is_some()
}

/// Map a client-space point into canvas pixels
///
/// `rect_origin`/`rect_size` are the canvas' bounding client rect; the
/// canvas may be CSS-scaled so the logical size can differ.
pub fn client_to_canvas(client: Vec2, rect_origin: Vec2, rect_size: Vec2, canvas_size: Vec2) -> Vec2 {
    let local = client - rect_origin;
    if rect_size.x <= 0.0 || rect_size.y <= 0.0 {
        return local;
    }
    local / rect_size * canvas_size
}

/// Accumulated input between ticks
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Keyboard keys currently down (lowercased `KeyboardEvent.key`)
    keys: HashSet<String>,
    /// On-screen buttons currently pressed
    buttons: HashSet<Direction>,
    dragging: bool,
    last_drag_pos: Option<Vec2>,
    /// Drag movement not yet consumed by a tick
    pending_drag: Vec2,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: &str) {
        self.keys.insert(key.to_lowercase());
    }

    pub fn key_up(&mut self, key: &str) {
        self.keys.remove(&key.to_lowercase());
    }

    pub fn button_down(&mut self, dir: Direction) {
        self.buttons.insert(dir);
    }

    pub fn button_up(&mut self, dir: Direction) {
        self.buttons.remove(&dir);
    }

    /// Pointer/touch pressed at a canvas-space position
    pub fn drag_start(&mut self, pos: Vec2) {
        self.dragging = true;
        self.last_drag_pos = Some(pos);
    }

    /// Pointer/touch moved; only counts while a drag is active
    pub fn drag_move(&mut self, pos: Vec2) {
        if !self.dragging {
            return;
        }
        if let Some(last) = self.last_drag_pos {
            let delta = pos - last;
            if delta.is_finite() {
                self.pending_drag += delta;
            }
        }
        self.last_drag_pos = Some(pos);
    }

    pub fn drag_end(&mut self) {
        self.dragging = false;
        self.last_drag_pos = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Release everything (e.g. window lost focus)
    pub fn clear(&mut self) {
        self.keys.clear();
        self.buttons.clear();
        self.drag_end();
        self.pending_drag = Vec2::ZERO;
    }

    /// Whether a direction is held by key or button
    pub fn is_held(&self, dir: Direction) -> bool {
        self.buttons.contains(&dir)
            || self
                .keys
                .iter()
                .any(|k| Direction::from_key(k) == Some(dir))
    }

    /// Current movement intent; consumes the pending drag
    pub fn snapshot(&mut self) -> TickInput {
        let input = TickInput {
            left: self.is_held(Direction::Left),
            right: self.is_held(Direction::Right),
            up: self.is_held(Direction::Up),
            down: self.is_held(Direction::Down),
            drag: self.pending_drag,
        };
        self.pending_drag = Vec2::ZERO;
        input
    }
}
