//! Input sampling with per-source edge-triggered jump.
//!
//! Keyboard and touch are tracked as independent sources and OR-merged at
//! sample time. Jump is edge-triggered per source: holding the key yields
//! one jump intent, and a held keyboard jump does not mask a fresh touch
//! press (or vice versa).

use crate::sim::TickInput;

#[derive(Debug, Clone, Copy, Default)]
struct SourceState {
    left: bool,
    right: bool,
    jump_held: bool,
    /// The current hold has already produced a jump intent
    jump_consumed: bool,
}

impl SourceState {
    fn sample_jump(&mut self) -> bool {
        if self.jump_held && !self.jump_consumed {
            self.jump_consumed = true;
            true
        } else {
            false
        }
    }

    fn set_jump(&mut self, held: bool) {
        self.jump_held = held;
        if !held {
            self.jump_consumed = false;
        }
    }
}

/// Merged input state across keyboard and touch controls.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputState {
    keyboard: SourceState,
    touch: SourceState,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route a keyboard event by its `code` value. Returns false for keys
    /// the game does not bind, so the caller can leave them to the browser.
    pub fn set_key(&mut self, code: &str, pressed: bool) -> bool {
        match code {
            "ArrowLeft" | "KeyA" => self.keyboard.left = pressed,
            "ArrowRight" | "KeyD" => self.keyboard.right = pressed,
            "Space" | "ArrowUp" | "KeyW" => self.keyboard.set_jump(pressed),
            _ => return false,
        }
        true
    }

    pub fn set_touch_left(&mut self, pressed: bool) {
        self.touch.left = pressed;
    }

    pub fn set_touch_right(&mut self, pressed: bool) {
        self.touch.right = pressed;
    }

    pub fn set_touch_jump(&mut self, pressed: bool) {
        self.touch.set_jump(pressed);
    }

    /// Drop all held state, used when the game loses focus or a level ends.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Snapshot the intent for one tick. Jump edges are consumed here, so
    /// this must be called exactly once per simulation tick.
    pub fn sample(&mut self) -> TickInput {
        TickInput {
            left: self.keyboard.left || self.touch.left,
            right: self.keyboard.right || self.touch.right,
            jump: {
                // Sample both so a press on either source consumes its edge
                let kb = self.keyboard.sample_jump();
                let touch = self.touch.sample_jump();
                kb || touch
            },
        }
    }
}
