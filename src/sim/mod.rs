//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed tick per display frame
//! - Seeded RNG only, no wall-clock reads
//! - Interaction outcomes surface as collected events, never callbacks
//! - No rendering or platform dependencies

pub mod collision;
pub mod level;
pub mod rng;
pub mod state;
pub mod tick;

pub use collision::check_collision;
pub use level::{LevelData, Theme, generate_level, terrain_height_at, theme_for};
pub use rng::SeededRng;
pub use state::{
    CollectibleKind, EnemyKind, Entity, EntityKind, GameEvent, Player, PowerupKind, World,
};
pub use tick::{TickInput, tick};
