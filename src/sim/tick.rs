//! Fixed-timestep simulation step.
//!
//! `tick` advances the world exactly one frame. All tuning values are in
//! per-frame units, so one tick is one 60 Hz frame regardless of wall time.
//! The driver owns the accumulator; this module never reads the clock.
//!
//! Step order matters and is load-bearing:
//! 1. gravity, then input and jump impulse
//! 2. horizontal integration and resolution
//! 3. fall-death check
//! 4. vertical integration and resolution (grounded is re-derived here)
//! 5. entity motion and player interactions
//! 6. purge, timers, camera

use super::collision::check_collision;
use super::state::{EnemyKind, EntityKind, GameEvent, Player, PowerupKind, World};
use crate::consts::*;

/// Player intent for one tick, already merged and edge-triggered by the
/// input layer. `jump` is true only on the tick a press started.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

/// Advance the world one frame and return the interactions that occurred,
/// in the order they resolved. After the death path has run, further ticks
/// are no-ops until the session rebuilds the world.
pub fn tick(world: &mut World, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if world.death_handled {
        return events;
    }

    let World {
        ref level,
        ref mut player,
        ref mut entities,
        ref mut camera_x,
        ref mut frame,
        ref mut death_handled,
        ref mut rng,
    } = *world;

    *frame += 1;

    player.vel.y += GRAVITY;

    // Horizontal intent overrides momentum; friction only applies idle
    if input.left {
        player.vel.x = -MOVE_SPEED;
        player.direction = -1.0;
    } else if input.right {
        player.vel.x = MOVE_SPEED;
        player.direction = 1.0;
    } else {
        player.vel.x *= FRICTION;
    }

    if input.jump && player.grounded {
        player.vel.y = JUMP_FORCE;
        player.grounded = false;
        events.push(GameEvent::Jumped);
    }

    // X axis: integrate, clamp to level bounds, push out of platforms
    player.pos.x += player.vel.x;
    player.pos.x = player.pos.x.clamp(0.0, level.width - player.size.x);
    for entity in entities.iter() {
        if entity.kind != EntityKind::Platform {
            continue;
        }
        if check_collision(player.pos, player.size, entity.pos, entity.size) {
            if player.vel.x > 0.0 {
                player.pos.x = entity.pos.x - player.size.x;
            } else if player.vel.x < 0.0 {
                player.pos.x = entity.pos.x + entity.size.x;
            }
            player.vel.x = 0.0;
        }
    }

    // Fell below the viewport: the attempt is over before Y resolution
    if player.pos.y > CANVAS_HEIGHT {
        *death_handled = true;
        events.push(GameEvent::Died);
        return events;
    }

    // Y axis: integrate and resolve. Grounded holds only if a downward
    // collision resolves this very frame, so walking off a ledge clears it.
    player.pos.y += player.vel.y;
    player.grounded = false;
    for entity in entities.iter() {
        if entity.kind != EntityKind::Platform {
            continue;
        }
        if check_collision(player.pos, player.size, entity.pos, entity.size) {
            if player.vel.y > 0.0 && player.pos.y < entity.pos.y {
                player.pos.y = entity.pos.y - player.size.y;
                player.vel.y = 0.0;
                player.grounded = true;
            } else if player.vel.y < 0.0 {
                player.pos.y = entity.pos.y + entity.size.y;
                player.vel.y = 0.0;
            }
        }
    }

    // Entity motion and player interactions
    for entity in entities.iter_mut() {
        if entity.dead {
            continue;
        }
        match entity.kind {
            EntityKind::Enemy(kind) => {
                entity.pos.x += entity.vel.x;
                if let Some((min_x, max_x)) = entity.patrol {
                    if entity.pos.x <= min_x || entity.pos.x >= max_x {
                        entity.pos.x = entity.pos.x.clamp(min_x, max_x);
                        entity.vel.x = -entity.vel.x;
                    }
                }
                match kind {
                    EnemyKind::ShadowIt => {
                        entity.pos.y += (*frame as f32 * 0.1).sin() * 1.5;
                    }
                    EnemyKind::Churn => {
                        entity.pos.x += rng.next() * 2.0 - 1.0;
                    }
                    _ => {}
                }

                if check_collision(player.pos, player.size, entity.pos, entity.size) {
                    if player.is_invincible() {
                        // Plowing through while invincible defeats the enemy
                        // but pays nothing; only a stomp earns capital
                        entity.dead = true;
                        events.push(GameEvent::Defeated {
                            entity_id: entity.id,
                            stomped: false,
                        });
                    } else if player.vel.y > 0.0 && player.pos.y < entity.pos.y {
                        // Stomp: falling onto the enemy from above
                        entity.dead = true;
                        player.vel.y = JUMP_FORCE / 1.5;
                        player.capital += STOMP_REWARD;
                        events.push(GameEvent::Defeated {
                            entity_id: entity.id,
                            stomped: true,
                        });
                        events.push(GameEvent::ScoreChanged(player.capital));
                    } else {
                        handle_damage(player, death_handled, 1, &mut events);
                    }
                }
            }
            EntityKind::Collectible(kind) => {
                if check_collision(player.pos, player.size, entity.pos, entity.size) {
                    entity.dead = true;
                    let reward = kind.reward();
                    player.capital += reward;
                    events.push(GameEvent::Collected { kind, reward });
                    events.push(GameEvent::ScoreChanged(player.capital));
                    events.push(GameEvent::Message(kind.message()));
                }
            }
            EntityKind::Powerup(kind) => {
                if check_collision(player.pos, player.size, entity.pos, entity.size) {
                    entity.dead = true;
                    match kind {
                        PowerupKind::Efficiency => {
                            player.invincible_frames = POWERUP_INVINCIBLE_FRAMES;
                            events.push(GameEvent::Message("Efficiency Boost! 🚀"));
                        }
                        PowerupKind::Rest => {
                            player.health = (player.health + 1).min(MAX_HEALTH);
                            events.push(GameEvent::HealthChanged(player.health));
                            events.push(GameEvent::Message("Well Rested! ☕"));
                        }
                    }
                    events.push(GameEvent::PowerupTaken(kind));
                }
            }
            EntityKind::Goal => {
                // The goal stays in the world; the level transition supersedes it
                if check_collision(player.pos, player.size, entity.pos, entity.size) {
                    events.push(GameEvent::GoalReached);
                }
            }
            EntityKind::Platform | EntityKind::Decoration => {}
        }
        if *death_handled {
            break;
        }
    }

    entities.retain(|e| !e.dead);
    player.invincible_frames = player.invincible_frames.saturating_sub(1);

    // Camera leads the player by a third of the viewport, clamped to level
    *camera_x = (player.pos.x - CANVAS_WIDTH / 3.0).clamp(0.0, level.width - CANVAS_WIDTH);

    events
}

/// Apply contact damage unless a mercy window is active. Reaching zero
/// health runs the death path exactly once.
fn handle_damage(
    player: &mut Player,
    death_handled: &mut bool,
    amount: i32,
    events: &mut Vec<GameEvent>,
) {
    if player.is_invincible() {
        return;
    }
    player.health -= amount;
    player.invincible_frames = DAMAGE_INVINCIBLE_FRAMES;
    // Knockback up and away
    player.vel.y = JUMP_FORCE / 2.0;
    player.vel.x = -10.0;
    events.push(GameEvent::Damaged { amount });
    events.push(GameEvent::HealthChanged(player.health));
    if player.health <= 0 {
        *death_handled = true;
        events.push(GameEvent::Died);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{CollectibleKind, Entity};
    use glam::Vec2;

    /// World with a single wide floor platform and nothing else.
    fn test_world() -> World {
        let mut world = World::new(1);
        world.entities.clear();
        world
            .entities
            .push(Entity::platform(1, 0.0, 500.0, 2000.0, "#000"));
        world.player.pos = Vec2::new(100.0, 500.0 - PLAYER_HEIGHT);
        world.player.grounded = true;
        world
    }

    fn idle() -> TickInput {
        TickInput::default()
    }

    fn settle(world: &mut World, frames: u32) {
        for _ in 0..frames {
            tick(world, &idle());
        }
    }

    #[test]
    fn friction_decays_idle_velocity_toward_zero() {
        let mut world = test_world();
        world.player.vel.x = MOVE_SPEED;
        let mut previous = world.player.vel.x.abs();
        for _ in 0..60 {
            tick(&mut world, &idle());
            let current = world.player.vel.x.abs();
            assert!(current <= previous);
            previous = current;
        }
        assert!(world.player.vel.x.abs() < 0.01);
    }

    #[test]
    fn jump_only_fires_when_grounded() {
        let mut world = test_world();
        let events = tick(&mut world, &TickInput { jump: true, ..idle() });
        assert!(events.contains(&GameEvent::Jumped));
        assert!(!world.player.grounded);

        // Airborne now: a second jump press does nothing
        let events = tick(&mut world, &TickInput { jump: true, ..idle() });
        assert!(!events.contains(&GameEvent::Jumped));
    }

    #[test]
    fn walking_off_a_ledge_clears_grounded() {
        let mut world = test_world();
        world.entities.clear();
        world.entities.push(Entity::platform(1, 0.0, 500.0, 200.0, "#000"));
        world.player.pos = Vec2::new(180.0, 500.0 - PLAYER_HEIGHT);
        world.player.grounded = true;

        for _ in 0..20 {
            tick(&mut world, &TickInput { right: true, ..idle() });
        }
        assert!(!world.player.grounded);
        assert!(world.player.vel.y > 0.0);
    }

    #[test]
    fn landing_restores_grounded() {
        let mut world = test_world();
        tick(&mut world, &TickInput { jump: true, ..idle() });
        assert!(!world.player.grounded);
        settle(&mut world, 120);
        assert!(world.player.grounded);
        assert_eq!(world.player.vel.y, 0.0);
    }

    #[test]
    fn head_bump_zeroes_upward_velocity() {
        let mut world = test_world();
        // Ceiling directly above the player
        world
            .entities
            .push(Entity::platform(2, 50.0, 380.0, 200.0, "#000"));
        tick(&mut world, &TickInput { jump: true, ..idle() });
        let mut bumped = false;
        for _ in 0..10 {
            tick(&mut world, &idle());
            if world.player.vel.y == 0.0 && !world.player.grounded {
                bumped = true;
                break;
            }
        }
        assert!(bumped);
        // Pushed back below the ceiling, not inside it
        assert!(world.player.pos.y >= 380.0 + TILE_SIZE);
    }

    #[test]
    fn stomp_defeats_enemy_and_bounces() {
        let mut world = test_world();
        world
            .entities
            .push(Entity::enemy(2, EnemyKind::RedTape, 100.0, 500.0 - TILE_SIZE, "🐛", (90.0, 110.0)));
        // Falling onto the enemy from above
        world.player.pos = Vec2::new(100.0, 500.0 - TILE_SIZE - PLAYER_HEIGHT - 5.0);
        world.player.vel.y = 5.0;
        world.player.grounded = false;

        let events = tick(&mut world, &idle());
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::Defeated { stomped: true, .. }
        )));
        assert_eq!(world.player.vel.y, JUMP_FORCE / 1.5);
        assert_eq!(world.player.capital, STOMP_REWARD);
        assert_eq!(world.player.health, MAX_HEALTH);
        // Enemy purged the same frame
        assert!(!world.entities.iter().any(|e| matches!(e.kind, EntityKind::Enemy(_))));
    }

    #[test]
    fn side_contact_damages_once_per_mercy_window() {
        let mut world = test_world();
        world
            .entities
            .push(Entity::enemy(2, EnemyKind::RedTape, 110.0, 500.0 - TILE_SIZE, "🐛", (110.0, 110.0)));

        let events = tick(&mut world, &idle());
        assert!(events.contains(&GameEvent::Damaged { amount: 1 }));
        assert_eq!(world.player.health, MAX_HEALTH - 1);

        // Keep forcing overlap; the mercy window must absorb all of it
        for _ in 0..(DAMAGE_INVINCIBLE_FRAMES - 2) {
            world.player.pos = Vec2::new(110.0, 500.0 - PLAYER_HEIGHT);
            world.player.vel = Vec2::ZERO;
            let events = tick(&mut world, &idle());
            assert!(!events.iter().any(|e| matches!(e, GameEvent::Damaged { .. })));
        }
        assert_eq!(world.player.health, MAX_HEALTH - 1);
    }

    #[test]
    fn invincible_contact_defeats_enemy_without_damage() {
        let mut world = test_world();
        world
            .entities
            .push(Entity::enemy(2, EnemyKind::RedTape, 110.0, 500.0 - TILE_SIZE, "🐛", (110.0, 110.0)));
        world.player.invincible_frames = POWERUP_INVINCIBLE_FRAMES;

        let events = tick(&mut world, &idle());
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::Defeated { stomped: false, .. }
        )));
        assert_eq!(world.player.health, MAX_HEALTH);
        // Not a stomp, so no capital and no score event
        assert_eq!(world.player.capital, 0);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::ScoreChanged(_))));
    }

    #[test]
    fn side_hit_at_one_health_dies_exactly_once() {
        let mut world = test_world();
        world
            .entities
            .push(Entity::enemy(2, EnemyKind::RedTape, 110.0, 500.0 - TILE_SIZE, "🐛", (110.0, 110.0)));
        world.player.health = 1;

        let events = tick(&mut world, &idle());
        let deaths = events.iter().filter(|e| **e == GameEvent::Died).count();
        assert_eq!(deaths, 1);
        assert!(world.death_handled);

        // Dead world is inert
        let events = tick(&mut world, &idle());
        assert!(events.is_empty());
    }

    #[test]
    fn falling_below_viewport_dies_exactly_once() {
        let mut world = test_world();
        world.entities.clear();
        world.player.pos = Vec2::new(100.0, CANVAS_HEIGHT - 1.0);
        world.player.vel.y = 10.0;
        world.player.grounded = false;

        let mut deaths = 0;
        for _ in 0..10 {
            deaths += tick(&mut world, &idle())
                .iter()
                .filter(|e| **e == GameEvent::Died)
                .count();
        }
        assert_eq!(deaths, 1);
    }

    #[test]
    fn collecting_all_five_kinds_sums_rewards() {
        let mut world = test_world();
        let kinds = [
            CollectibleKind::Funding,
            CollectibleKind::Distribution,
            CollectibleKind::Tech,
            CollectibleKind::Finance,
            CollectibleKind::Retention,
        ];
        for (i, kind) in kinds.iter().enumerate() {
            world.entities.push(Entity::collectible(
                10 + i as u32,
                *kind,
                90.0,
                500.0 - PLAYER_HEIGHT,
                "x",
            ));
        }
        settle(&mut world, 3);
        let expected: u64 = kinds.iter().map(|k| k.reward()).sum();
        assert_eq!(world.player.capital, expected);
        assert!(!world.entities.iter().any(|e| matches!(e.kind, EntityKind::Collectible(_))));
    }

    #[test]
    fn rest_powerup_heals_capped_at_max() {
        let mut world = test_world();
        world.player.health = 1;
        world
            .entities
            .push(Entity::powerup(2, PowerupKind::Rest, 100.0, 500.0 - PLAYER_HEIGHT));
        tick(&mut world, &idle());
        assert_eq!(world.player.health, 2);

        world
            .entities
            .push(Entity::powerup(3, PowerupKind::Rest, 100.0, 500.0 - PLAYER_HEIGHT));
        world.player.health = MAX_HEALTH;
        tick(&mut world, &idle());
        assert_eq!(world.player.health, MAX_HEALTH);
    }

    #[test]
    fn efficiency_powerup_grants_long_mercy_window() {
        let mut world = test_world();
        world
            .entities
            .push(Entity::powerup(2, PowerupKind::Efficiency, 100.0, 500.0 - PLAYER_HEIGHT));
        let events = tick(&mut world, &idle());
        assert!(events.contains(&GameEvent::PowerupTaken(PowerupKind::Efficiency)));
        assert_eq!(world.player.invincible_frames, POWERUP_INVINCIBLE_FRAMES - 1);
    }

    #[test]
    fn fall_and_enemy_contact_same_frame_dies_once() {
        let mut world = test_world();
        world.entities.clear();
        // Past the fall threshold while overlapping an enemy at 1 HP
        world.player.pos = Vec2::new(100.0, CANVAS_HEIGHT + 10.0);
        world.player.health = 1;
        world.player.grounded = false;
        world
            .entities
            .push(Entity::enemy(2, EnemyKind::RedTape, 100.0, CANVAS_HEIGHT + 10.0, "🐛", (100.0, 100.0)));

        let events = tick(&mut world, &idle());
        let deaths = events.iter().filter(|e| **e == GameEvent::Died).count();
        assert_eq!(deaths, 1);
    }

    #[test]
    fn held_right_converges_to_move_speed_without_overshoot() {
        let mut world = test_world();
        for _ in 0..60 {
            tick(&mut world, &TickInput { right: true, ..idle() });
            assert!(world.player.vel.x <= MOVE_SPEED);
        }
        assert_eq!(world.player.vel.x, MOVE_SPEED);
    }

    #[test]
    fn goal_contact_emits_goal_reached_while_alive() {
        let mut world = test_world();
        world.entities.push(Entity::goal(2, 100.0, 500.0));
        let events = tick(&mut world, &idle());
        assert!(events.contains(&GameEvent::GoalReached));
        assert!(!world.death_handled);
    }

    #[test]
    fn camera_follows_and_clamps() {
        let mut world = test_world();
        // Left edge
        world.player.pos.x = 10.0;
        tick(&mut world, &idle());
        assert_eq!(world.camera_x, 0.0);

        // Mid-level: leads by a third of the viewport
        world.player.pos.x = 1000.0;
        world.player.vel = Vec2::ZERO;
        tick(&mut world, &idle());
        assert!((world.camera_x - (world.player.pos.x - CANVAS_WIDTH / 3.0)).abs() < 1e-3);

        // Right edge
        world.player.pos.x = world.level.width - PLAYER_WIDTH;
        tick(&mut world, &idle());
        assert_eq!(world.camera_x, world.level.width - CANVAS_WIDTH);
    }

    #[test]
    fn patrolling_enemy_reverses_at_bounds() {
        let mut world = test_world();
        world
            .entities
            .push(Entity::enemy(2, EnemyKind::RedTape, 1000.0, 460.0, "🐛", (990.0, 1010.0)));
        let mut saw_left = false;
        let mut saw_right = false;
        for _ in 0..60 {
            tick(&mut world, &idle());
            let enemy = world
                .entities
                .iter()
                .find(|e| matches!(e.kind, EntityKind::Enemy(_)))
                .unwrap();
            assert!(enemy.pos.x >= 990.0 && enemy.pos.x <= 1010.0);
            if enemy.vel.x < 0.0 {
                saw_left = true;
            } else {
                saw_right = true;
            }
        }
        assert!(saw_left && saw_right);
    }
}
