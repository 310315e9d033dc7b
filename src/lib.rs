//! Runway Runner - a side-scrolling startup platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (level generation, physics, collisions)
//! - `session`: Game-status state machine, lives and score bookkeeping
//! - `input`: Keyboard/touch sampling with edge-triggered jump
//! - `render`: Canvas-2D rasterizer (browser only)
//! - `audio`: Procedural Web Audio sound effects (browser only)
//! - `settings`, `highscores`: LocalStorage-backed preferences and leaderboard

pub mod highscores;
pub mod input;
pub mod session;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod audio;
#[cfg(target_arch = "wasm32")]
pub mod render;

pub use highscores::HighScores;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// World viewport in pixels
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// One simulation tick per 60 Hz display frame
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Maximum catch-up ticks per animation frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Physics tuning, in per-frame units. The level generator depends on
    /// these exact values for jump reachability, so they are shared here.
    pub const GRAVITY: f32 = 0.5;
    pub const JUMP_FORCE: f32 = -14.0;
    pub const MOVE_SPEED: f32 = 6.0;
    pub const FRICTION: f32 = 0.85;

    pub const MAX_HEALTH: i32 = 3;
    pub const STARTING_LIVES: u32 = 3;
    /// Reaching the goal on this level ends the run in victory
    pub const FINAL_LEVEL: u32 = 5;

    /// Terrain/platform grid unit
    pub const TILE_SIZE: f32 = 40.0;

    /// Player hitbox and spawn point
    pub const PLAYER_WIDTH: f32 = 30.0;
    pub const PLAYER_HEIGHT: f32 = 45.0;
    pub const SPAWN_X: f32 = 50.0;
    pub const SPAWN_Y: f32 = 100.0;

    /// Frames of post-damage mercy invulnerability
    pub const DAMAGE_INVINCIBLE_FRAMES: u32 = 60;
    /// Frames granted by the efficiency powerup
    pub const POWERUP_INVINCIBLE_FRAMES: u32 = 300;

    /// Score for defeating an enemy with a stomp
    pub const STOMP_REWARD: u64 = 100;

    /// Patrolling enemy walk speed, pixels per frame
    pub const ENEMY_SPEED: f32 = 2.0;
}

/// Maximum horizontal distance coverable by one full jump arc at the
/// configured gravity, jump impulse and move speed. Level gaps must stay
/// strictly below this or a level can become untraversable.
pub fn max_jump_span() -> f32 {
    let airborne_frames = 2.0 * (-consts::JUMP_FORCE) / consts::GRAVITY;
    airborne_frames * consts::MOVE_SPEED
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jump_span_exceeds_widest_gap() {
        // Generator draws gaps from [60, 180)
        assert!(max_jump_span() > 180.0);
    }
}
