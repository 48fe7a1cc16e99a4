//! Per-tick input snapshot
//!
//! Drivers fill a `TickInput` from keyboard/pointer events. Held keys stay set until
//! released; one-shot inputs are cleared by the driver after each tick.

use glam::Vec2;

use crate::physics::Aabb;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Left arrow held
    pub left: bool,
    /// Right arrow held
    pub right: bool,
    /// Jump (space) held
    pub jump: bool,
    /// Pause requested (Escape / P)
    pub pause: bool,
    /// Pointer button released this tick
    pub pointer_released: bool,
    /// Where the pointer was released, in playfield units, when the driver knows
    pub pointer_pos: Option<Vec2>,
    /// Menu confirm (Enter, or the Play / Back to Menu buttons)
    pub confirm: bool,
    /// Mute toggle (M, or the sound icon)
    pub toggle_mute: bool,
}

impl TickInput {
    /// Apply a key press/release by `KeyboardEvent.code`. Returns false for unmapped keys.
    pub fn apply_key(&mut self, code: &str, pressed: bool) -> bool {
        match code {
            "ArrowLeft" => self.left = pressed,
            "ArrowRight" => self.right = pressed,
            "Space" | "ArrowUp" => self.jump = pressed,
            // One-shot keys fire on press only
            "Escape" | "KeyP" => self.pause |= pressed,
            "Enter" => self.confirm |= pressed,
            "KeyM" => self.toggle_mute |= pressed,
            _ => return false,
        }
        true
    }

    /// Record a pointer release at `pos` (playfield units)
    pub fn release_pointer_at(&mut self, pos: Vec2) {
        self.pointer_released = true;
        self.pointer_pos = Some(pos);
    }

    /// Pointer released inside `rect` this tick
    pub fn released_in(&self, rect: &Aabb) -> bool {
        self.pointer_released && self.pointer_pos.is_some_and(|p| rect.contains_point(p))
    }

    /// Forget held keys whose release will never arrive (focus lost)
    pub fn release_held(&mut self) {
        self.left = false;
        self.right = false;
        self.jump = false;
    }

    /// Clear one-shot inputs after they have been processed
    pub fn clear_one_shots(&mut self) {
        self.pause = false;
        self.pointer_released = false;
        self.pointer_pos = None;
        self.confirm = false;
        self.toggle_mute = false;
    }

    /// Any discrete user action this tick (used by overlays that resume on input)
    pub fn any_action(&self) -> bool {
        self.pointer_released || self.confirm || self.pause
    }
}
