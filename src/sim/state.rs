//! World model and core simulation types
//!
//! The `World` aggregate replaces scattered per-frame mutable state: player,
//! live entities, camera and the death guard all live here and are advanced
//! by `tick`.

use glam::Vec2;

use super::level::{self, LevelData};
use super::rng::SeededRng;
use crate::consts::*;

/// The five enemy species, one per level theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyKind {
    RedTape,
    Inflation,
    ShadowIt,
    Audit,
    Churn,
}

/// The five lesson collectibles, one per level theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectibleKind {
    Funding,
    Distribution,
    Tech,
    Finance,
    Retention,
}

impl CollectibleKind {
    /// Score awarded on pickup.
    pub fn reward(self) -> u64 {
        match self {
            CollectibleKind::Funding => 1000,
            CollectibleKind::Distribution => 800,
            CollectibleKind::Tech => 500,
            CollectibleKind::Finance => 1200,
            CollectibleKind::Retention => 1500,
        }
    }

    /// Transient HUD message shown on pickup.
    pub fn message(self) -> &'static str {
        match self {
            CollectibleKind::Funding => "Seed Funding Secured! 💵",
            CollectibleKind::Distribution => "New Market Reached! 📣",
            CollectibleKind::Tech => "Systems Optimized! 💾",
            CollectibleKind::Finance => "Books Balanced! 📒",
            CollectibleKind::Retention => "Customer Saved! 💖",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerupKind {
    /// Extended invincibility window
    Efficiency,
    /// Heals one health point
    Rest,
}

/// Closed set of world object kinds. Interaction resolution matches on this
/// exhaustively, so adding a kind will not compile until its collision
/// behavior is defined. The player is not an entity; exactly one `Player`
/// exists per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Platform,
    Enemy(EnemyKind),
    Collectible(CollectibleKind),
    Powerup(PowerupKind),
    Goal,
    Decoration,
}

/// A world object: platform, enemy, collectible, powerup, goal or decoration.
///
/// `color` and `label` are rendering hints passed through opaquely; `label`
/// doubles as the glyph drawn for the entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    /// Top-left corner of the bounding box
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    pub color: &'static str,
    pub label: &'static str,
    /// X-bounds a patrolling enemy bounces between
    pub patrol: Option<(f32, f32)>,
    /// Marked for removal; inert until purged at end of frame
    pub dead: bool,
    /// Decoration-only depth hints, no gameplay effect
    pub opacity: f32,
    pub scale: f32,
}

impl Entity {
    fn base(id: u32, kind: EntityKind, pos: Vec2, size: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            size,
            vel: Vec2::ZERO,
            color: "transparent",
            label: "",
            patrol: None,
            dead: false,
            opacity: 1.0,
            scale: 1.0,
        }
    }

    pub fn platform(id: u32, x: f32, y: f32, width: f32, color: &'static str) -> Self {
        let mut e = Self::base(
            id,
            EntityKind::Platform,
            Vec2::new(x, y),
            Vec2::new(width, TILE_SIZE),
        );
        e.color = color;
        e
    }

    pub fn decoration(id: u32, x: f32, y: f32, label: &'static str, scale: f32, opacity: f32) -> Self {
        let mut e = Self::base(id, EntityKind::Decoration, Vec2::new(x, y), Vec2::ZERO);
        e.label = label;
        e.scale = scale;
        e.opacity = opacity;
        e
    }

    /// Patrolling enemy; the patrol span is the platform it stands on.
    pub fn enemy(id: u32, kind: EnemyKind, x: f32, y: f32, label: &'static str, patrol: (f32, f32)) -> Self {
        let mut e = Self::base(
            id,
            EntityKind::Enemy(kind),
            Vec2::new(x, y),
            Vec2::new(TILE_SIZE, TILE_SIZE),
        );
        e.vel.x = ENEMY_SPEED;
        e.color = level::palette::DANGER_RED;
        e.label = label;
        e.patrol = Some(patrol);
        e
    }

    pub fn collectible(id: u32, kind: CollectibleKind, x: f32, y: f32, label: &'static str) -> Self {
        let mut e = Self::base(
            id,
            EntityKind::Collectible(kind),
            Vec2::new(x, y),
            Vec2::splat(TILE_SIZE * 0.8),
        );
        e.color = level::palette::GOLD;
        e.label = label;
        e
    }

    pub fn powerup(id: u32, kind: PowerupKind, x: f32, y: f32) -> Self {
        let mut e = Self::base(
            id,
            EntityKind::Powerup(kind),
            Vec2::new(x, y),
            Vec2::splat(TILE_SIZE * 0.8),
        );
        e.color = level::palette::GOLD;
        e.label = match kind {
            PowerupKind::Efficiency => "🚀",
            PowerupKind::Rest => "☕",
        };
        e
    }

    pub fn goal(id: u32, x: f32, y: f32) -> Self {
        let goal_size = TILE_SIZE * 2.5;
        let mut e = Self::base(
            id,
            EntityKind::Goal,
            Vec2::new(x, y - goal_size),
            Vec2::splat(goal_size),
        );
        e.color = level::palette::PROFIT_GREEN;
        e.label = "💰";
        e
    }
}

/// The singleton player. Reset per level attempt; `capital` persists across
/// levels within a run.
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    /// True only on frames where a downward collision resolved onto a
    /// platform top this frame
    pub grounded: bool,
    /// Remaining invulnerability frames; zero means vulnerable
    pub invincible_frames: u32,
    pub health: i32,
    /// Cumulative score for the run
    pub capital: u64,
    /// Last nonzero horizontal intent, ±1, drives sprite mirroring
    pub direction: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(SPAWN_X, SPAWN_Y),
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            vel: Vec2::ZERO,
            grounded: false,
            invincible_frames: 0,
            health: MAX_HEALTH,
            capital: 0,
            direction: 1.0,
        }
    }
}

impl Player {
    pub fn is_invincible(&self) -> bool {
        self.invincible_frames > 0
    }
}

/// Interaction outcomes collected during a tick and dispatched after the
/// physics step completes. The simulation never calls outward mid-frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    Jumped,
    ScoreChanged(u64),
    HealthChanged(i32),
    /// Transient HUD text; the consumer auto-clears it after a fixed duration
    Message(&'static str),
    /// Enemy defeated, either by stomp or while invincible
    Defeated { entity_id: u32, stomped: bool },
    Collected { kind: CollectibleKind, reward: u64 },
    PowerupTaken(PowerupKind),
    Damaged { amount: i32 },
    /// Exactly once per level attempt; the session owns lives and routing
    Died,
    /// Level completion; the session routes to LevelComplete or Victory
    GoalReached,
}

/// Per-level simulation aggregate. One `World` exists per level attempt; a
/// restart-in-place rebuilds it from the (deterministic) generator.
#[derive(Debug, Clone)]
pub struct World {
    /// Level metadata; its entity list has been moved into `entities`
    pub level: LevelData,
    pub player: Player,
    pub entities: Vec<Entity>,
    pub camera_x: f32,
    pub frame: u64,
    /// Set once the death path has run this attempt; physics halts after
    pub death_handled: bool,
    /// Runtime jitter stream for idiosyncratic enemy motion only; level
    /// layout never draws from this
    pub rng: SeededRng,
}

impl World {
    pub fn new(level_index: u32) -> Self {
        let mut level = level::generate_level(level_index);
        let entities = std::mem::take(&mut level.entities);
        Self {
            level,
            player: Player::default(),
            entities,
            camera_x: 0.0,
            frame: 0,
            death_handled: false,
            rng: SeededRng::new(level_index as u64 * 31 + 7),
        }
    }
}
