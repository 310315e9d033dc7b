//! Procedural level generation.
//!
//! `generate_level` is a pure function of the level index. It seeds two
//! independent LCG streams, one for the playable foreground layout and one
//! for background dressing, so tuning background density can never shift the
//! platforms a player has already learned.

use glam::Vec2;

use super::rng::SeededRng;
use super::state::{CollectibleKind, EnemyKind, Entity, PowerupKind};
use crate::consts::*;

/// Foreground layout stream seed multiplier
const FG_SEED: u64 = 999;
/// Background terrain/decoration stream seed multiplier
const BG_SEED: u64 = 12345;

/// Shared render colors
pub mod palette {
    pub const DANGER_RED: &str = "#ff4d4d";
    pub const PROFIT_GREEN: &str = "#00cc66";
    pub const GOLD: &str = "#ffd700";
    pub const PLAYER_SUIT: &str = "#2563EB";
    pub const PLAYER_SKIN: &str = "#FFDCB1";

    pub const PLATFORM_DIRT: &str = "#8B4513";
    pub const PLATFORM_CONCRETE: &str = "#708090";
    pub const PLATFORM_OFFICE: &str = "#2F4F4F";
    pub const PLATFORM_MARBLE: &str = "#EDEADE";
    pub const PLATFORM_VOLCANIC: &str = "#3e2723";
}

/// Vertical silhouette profile of the parallax terrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerrainProfile {
    /// Smoothly varying hills, clamped to a band
    Organic,
    /// Flat runs with abrupt building-like steps
    Blocky,
    /// Sharp peaks dropping back near the floor
    Spiky,
}

/// Per-level look and cast: colors, sprites, descriptive strings and which
/// enemy/collectible species the level spawns.
#[derive(Debug)]
pub struct Theme {
    pub name: &'static str,
    pub description: &'static str,
    pub boss: &'static str,
    pub death_message: &'static str,
    pub ground_color: &'static str,
    pub platform_top_color: &'static str,
    /// Sky gradient, top to bottom
    pub sky: (&'static str, &'static str),
    pub terrain_color: &'static str,
    pub enemy: EnemyKind,
    pub enemy_sprite: &'static str,
    pub collectible: CollectibleKind,
    pub collectible_sprite: &'static str,
    pub decor_sprites: &'static [&'static str],
    pub background_sprites: &'static [&'static str],
    pub terrain: TerrainProfile,
}

pub static THEMES: [Theme; 5] = [
    Theme {
        name: "Market Jungle",
        description: "Market Jungle: Validate your idea & Dodge Red Tape!",
        boss: "Red Tape",
        death_message: "Ran out of Runway!",
        ground_color: palette::PLATFORM_DIRT,
        platform_top_color: "#4CAF50",
        sky: ("#87CEEB", "#E0F7FA"),
        terrain_color: "rgba(34, 139, 34, 0.6)",
        enemy: EnemyKind::RedTape,
        enemy_sprite: "🐛",
        collectible: CollectibleKind::Funding,
        collectible_sprite: "💵",
        decor_sprites: &["🌳", "🌻", "🌲"],
        background_sprites: &["🏡", "🌳", "🌲"],
        terrain: TerrainProfile::Organic,
    },
    Theme {
        name: "Distribution Desert",
        description: "Distribution Desert: Make noise & Find Product-Market Fit!",
        boss: "Algorithm Change",
        death_message: "Nobody heard you!",
        ground_color: palette::PLATFORM_CONCRETE,
        platform_top_color: "#aaa",
        sky: ("#FFD700", "#FF8C00"),
        terrain_color: "rgba(255, 140, 0, 0.3)",
        enemy: EnemyKind::Inflation,
        enemy_sprite: "👻",
        collectible: CollectibleKind::Distribution,
        collectible_sprite: "📣",
        decor_sprites: &["🪴", "🪨"],
        background_sprites: &["🏢", "🏗️", "🌆"],
        terrain: TerrainProfile::Organic,
    },
    Theme {
        name: "Tech Swamp",
        description: "Tech Swamp: Automate Operations & Squash Shadow IT!",
        boss: "Tech Debt",
        death_message: "System Failure!",
        ground_color: palette::PLATFORM_OFFICE,
        platform_top_color: "#003300",
        sky: ("#001100", "#000000"),
        terrain_color: "rgba(0, 50, 0, 0.8)",
        enemy: EnemyKind::ShadowIt,
        enemy_sprite: "👾",
        collectible: CollectibleKind::Tech,
        collectible_sprite: "💾",
        decor_sprites: &["🗄️", "⚡"],
        background_sprites: &["🗄️", "💻", "10"],
        terrain: TerrainProfile::Organic,
    },
    Theme {
        name: "Audit Office",
        description: "Audit Office: Manage Cashflow & Survive Tax Season!",
        boss: "Tax Man",
        death_message: "Audit Failed!",
        ground_color: palette::PLATFORM_MARBLE,
        platform_top_color: "#fff",
        sky: ("#708090", "#2F4F4F"),
        terrain_color: "rgba(100, 110, 120, 0.8)",
        enemy: EnemyKind::Audit,
        enemy_sprite: "🤖",
        collectible: CollectibleKind::Finance,
        collectible_sprite: "📒",
        decor_sprites: &["🧮", "🪴"],
        background_sprites: &["📉", "📊", "🧮"],
        terrain: TerrainProfile::Blocky,
    },
    Theme {
        name: "Churn Peak",
        description: "Churn Peak: Fight Attrition & Build Loyalty!",
        boss: "The Vortex",
        death_message: "Zero Retention!",
        ground_color: palette::PLATFORM_VOLCANIC,
        platform_top_color: "#800000",
        sky: ("#4B0082", "#000000"),
        terrain_color: "rgba(50, 0, 0, 0.8)",
        enemy: EnemyKind::Churn,
        enemy_sprite: "🌪️",
        collectible: CollectibleKind::Retention,
        collectible_sprite: "💖",
        decor_sprites: &["⚡", "🔥", "🪨"],
        background_sprites: &["🪨", "⚡", "💔"],
        terrain: TerrainProfile::Spiky,
    },
];

/// Theme for a 1-based level index. Indexes past the defined themes fall
/// back to the first theme rather than erroring.
pub fn theme_for(level_index: u32) -> &'static Theme {
    THEMES
        .get(level_index.saturating_sub(1) as usize)
        .unwrap_or(&THEMES[0])
}

/// Generated level artifact. `entities` excludes the player.
#[derive(Debug, Clone)]
pub struct LevelData {
    pub id: u32,
    pub name: &'static str,
    pub description: &'static str,
    pub boss_theme: &'static str,
    /// Playable extent in world-space pixels, always >= the viewport width
    pub width: f32,
    pub entities: Vec<Entity>,
    /// Closed silhouette polygon for parallax rendering; first and last
    /// points pinned to the bottom corners
    pub background_terrain: Vec<Vec2>,
}

/// Terrain surface height at `x`, interpolated linearly between the two
/// bracketing polyline points. The pinned bottom corners are skipped.
pub fn terrain_height_at(terrain: &[Vec2], x: f32) -> f32 {
    for pair in terrain[1..terrain.len() - 1].windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if x >= a.x && x <= b.x {
            if b.x == a.x {
                return a.y;
            }
            let t = (x - a.x) / (b.x - a.x);
            return a.y + t * (b.y - a.y);
        }
    }
    terrain[terrain.len() - 2].y
}

fn generate_terrain(rng: &mut SeededRng, profile: TerrainProfile, width: f32) -> Vec<Vec2> {
    let h = CANVAS_HEIGHT;
    let mut points = vec![Vec2::new(0.0, h), Vec2::new(0.0, h - 100.0)];
    let mut x = 0.0;
    let mut y = h - 100.0;

    while x < width {
        let segment = 40.0 + rng.next() * 60.0;
        match profile {
            TerrainProfile::Blocky => {
                y = if rng.next() > 0.7 { h - 300.0 } else { h - 100.0 };
                points.push(Vec2::new(x, y));
                points.push(Vec2::new(x + segment, y));
            }
            TerrainProfile::Spiky => {
                y = h - 100.0 - rng.next() * 300.0;
                points.push(Vec2::new(x + segment / 2.0, y));
                points.push(Vec2::new(x + segment, h - 50.0));
            }
            TerrainProfile::Organic => {
                y += rng.next() * 60.0 - 30.0;
                y = y.clamp(h - 250.0, h - 50.0);
                points.push(Vec2::new(x + segment, y));
            }
        }
        x += segment;
    }

    points.push(Vec2::new(width, h));
    points
}

/// Scatter background decorations along the terrain. Placement is
/// rejection-sampled against a minimum spacing; an object that finds no spot
/// within the retry budget is skipped rather than clumped.
fn scatter_background(
    rng: &mut SeededRng,
    theme: &Theme,
    terrain: &[Vec2],
    width: f32,
    entities: &mut Vec<Entity>,
    next_id: &mut u32,
) {
    let count = (width / 180.0) as usize;
    let min_spacing = 180.0;
    let mut placed: Vec<f32> = Vec::with_capacity(count);

    for _ in 0..count {
        let mut spot = None;
        for _ in 0..10 {
            let candidate = rng.next() * width;
            if placed.iter().all(|&p| (candidate - p).abs() >= min_spacing) {
                placed.push(candidate);
                spot = Some(candidate);
                break;
            }
        }
        let Some(x) = spot else { continue };

        let y = terrain_height_at(terrain, x);
        let sprite = *rng.pick(theme.background_sprites);

        // Depth heuristic: lower on screen means closer, so bigger and more
        // opaque. Pure randomness here washes the background out.
        let depth = ((y - (CANVAS_HEIGHT - 250.0)) / 200.0).clamp(0.0, 1.0);
        let scale = 0.8 + depth * 2.0;
        let opacity = 0.15 + depth * 0.25;

        entities.push(Entity::decoration(take_id(next_id), x, y, sprite, scale, opacity));
    }
}

fn take_id(next_id: &mut u32) -> u32 {
    let id = *next_id;
    *next_id += 1;
    id
}

/// Left-to-right foreground scan: ground platforms with optional floaters,
/// collectibles, powerups, decor, enemies, elevation steps, and fall-hazard
/// gaps. Returns the ground height the scan ended at (the goal rests there).
fn generate_path(
    rng: &mut SeededRng,
    theme: &Theme,
    width: f32,
    entities: &mut Vec<Entity>,
    next_id: &mut u32,
) -> f32 {
    let mut x = 0.0;
    let mut ground_y = CANVAS_HEIGHT - TILE_SIZE;
    // Never emit two gaps back to back: a single gap is always jumpable, a
    // merged pair may not be.
    let mut last_was_gap = false;

    while x < width {
        let gap = rng.range(60.0, 180.0);
        let platform_width = rng.range(150.0, 400.0);

        if !last_was_gap && x > 300.0 && x < width - 300.0 && rng.next() > 0.65 {
            x += gap;
            last_was_gap = true;
            continue;
        }
        last_was_gap = false;

        entities.push(Entity::platform(
            take_id(next_id),
            x,
            ground_y,
            platform_width,
            theme.ground_color,
        ));

        // Floating platform above, usually carrying a pickup
        if rng.next() > 0.4 {
            let float_y = ground_y - rng.range(120.0, 180.0);
            let float_width = platform_width * 0.6;
            entities.push(Entity::platform(
                take_id(next_id),
                x + platform_width * 0.2,
                float_y,
                float_width,
                theme.ground_color,
            ));

            let pickup_x = x + platform_width * 0.5;
            let pickup_y = float_y - TILE_SIZE;
            if rng.next() > 0.2 {
                entities.push(Entity::collectible(
                    take_id(next_id),
                    theme.collectible,
                    pickup_x,
                    pickup_y,
                    theme.collectible_sprite,
                ));
            } else if rng.next() > 0.6 {
                let kind = if rng.next() > 0.5 {
                    PowerupKind::Efficiency
                } else {
                    PowerupKind::Rest
                };
                entities.push(Entity::powerup(take_id(next_id), kind, pickup_x, pickup_y));
            }
        }

        // Ground decor
        if rng.next() > 0.3 {
            let sprite = *rng.pick(theme.decor_sprites);
            let decor_x = x + rng.next() * platform_width;
            entities.push(Entity::decoration(
                take_id(next_id),
                decor_x,
                ground_y - 20.0,
                sprite,
                1.0,
                1.0,
            ));
        }

        // Enemies only past the spawn lead-in, patrolling their platform span
        if x > 500.0 && rng.next() > 0.35 {
            entities.push(Entity::enemy(
                take_id(next_id),
                theme.enemy,
                x + platform_width / 2.0,
                ground_y - TILE_SIZE,
                theme.enemy_sprite,
                (x, x + platform_width - TILE_SIZE),
            ));
        }

        // Elevation step, clamped to the playable band
        if rng.next() > 0.5 {
            let step = if rng.next() > 0.5 { -80.0 } else { 80.0 };
            ground_y = (ground_y + step).clamp(300.0, CANVAS_HEIGHT - TILE_SIZE);
        }

        x += platform_width;
    }

    ground_y
}

/// Generate the complete level for a 1-based index. Pure: the same index
/// always yields an identical level.
pub fn generate_level(level_index: u32) -> LevelData {
    let theme = theme_for(level_index);
    let width = 2000.0 + level_index as f32 * 400.0;

    let mut foreground_rng = SeededRng::new(level_index as u64 * FG_SEED);
    let mut background_rng = SeededRng::new(level_index as u64 * BG_SEED);

    let mut entities = Vec::new();
    let mut next_id = 1u32;

    let background_terrain = generate_terrain(&mut background_rng, theme.terrain, width);
    scatter_background(
        &mut background_rng,
        theme,
        &background_terrain,
        width,
        &mut entities,
        &mut next_id,
    );

    let final_ground_y = generate_path(&mut foreground_rng, theme, width, &mut entities, &mut next_id);

    entities.push(Entity::goal(take_id(&mut next_id), width - 100.0, final_ground_y));

    LevelData {
        id: level_index,
        name: theme.name,
        description: theme.description,
        boss_theme: theme.boss,
        width,
        entities,
        background_terrain,
    }
}
