//! Run bookkeeping and the game-status state machine.
//!
//! The simulation knows nothing about lives, menus or level progression;
//! a `Session` wraps one run of the game and routes simulation events into
//! status transitions. Lives, score carry-over and resume snapshots all
//! live here.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::{GameEvent, TickInput, World, tick};

/// Top-level game status. Transitions:
/// Menu -> Playing -> LevelComplete -> Playing ... -> Victory
///                \-> GameOver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Menu,
    Playing,
    LevelComplete,
    GameOver,
    Victory,
}

/// Persistable mid-run snapshot. The world itself is never saved; levels
/// regenerate deterministically from the level index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResumeState {
    pub level: u32,
    pub score: u64,
    pub lives: u32,
    pub health: i32,
    /// Player position at save time
    pub x: f32,
    pub y: f32,
}

/// One run of the game, from menu to game over or victory.
#[derive(Debug)]
pub struct Session {
    pub status: GameStatus,
    pub level: u32,
    pub lives: u32,
    pub score: u64,
    /// Score at level entry; a death restart rolls back to this
    level_start_score: u64,
    pub world: Option<World>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            status: GameStatus::Menu,
            level: 1,
            lives: STARTING_LIVES,
            score: 0,
            level_start_score: 0,
            world: None,
        }
    }

    /// Begin a fresh run from the menu or an end screen.
    pub fn start(&mut self) {
        self.level = 1;
        self.lives = STARTING_LIVES;
        self.score = 0;
        self.level_start_score = 0;
        self.enter_level(self.level);
    }

    /// Rebuild the world for `level_index` and start playing it. Score is
    /// seeded from the level-entry snapshot so a retry never keeps points
    /// earned during the failed attempt.
    fn enter_level(&mut self, level_index: u32) {
        self.level = level_index;
        self.score = self.level_start_score;
        let mut world = World::new(level_index);
        world.player.capital = self.score;
        self.world = Some(world);
        self.status = GameStatus::Playing;
        log::info!(
            "entering level {} ({}), lives={}, score={}",
            level_index,
            world_name(&self.world),
            self.lives,
            self.score
        );
    }

    /// Advance from the level-complete screen to the next level.
    pub fn next_level(&mut self) {
        if self.status != GameStatus::LevelComplete {
            return;
        }
        self.level_start_score = self.score;
        self.enter_level(self.level + 1);
    }

    /// Restart the whole run from an end screen.
    pub fn restart(&mut self) {
        if matches!(self.status, GameStatus::GameOver | GameStatus::Victory) {
            self.start();
        }
    }

    /// Tick the world one frame and apply the resulting events to the
    /// session. Returns the events for the driver (audio, HUD messages).
    pub fn advance(&mut self, input: &TickInput) -> Vec<GameEvent> {
        if self.status != GameStatus::Playing {
            return Vec::new();
        }
        let Some(world) = self.world.as_mut() else {
            return Vec::new();
        };
        let events = tick(world, input);
        for event in &events {
            self.apply(event);
        }
        events
    }

    fn apply(&mut self, event: &GameEvent) {
        match event {
            GameEvent::ScoreChanged(score) => self.score = *score,
            GameEvent::Died => self.on_death(),
            GameEvent::GoalReached => {
                self.status = if self.level >= FINAL_LEVEL {
                    GameStatus::Victory
                } else {
                    GameStatus::LevelComplete
                };
            }
            _ => {}
        }
    }

    fn on_death(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            log::info!("game over on level {} with score {}", self.level, self.score);
            self.status = GameStatus::GameOver;
            self.world = None;
        } else {
            self.enter_level(self.level);
        }
    }

    /// Snapshot for persistence. Only a live run mid-level is resumable.
    pub fn snapshot(&self) -> Option<ResumeState> {
        if self.status != GameStatus::Playing {
            return None;
        }
        let world = self.world.as_ref()?;
        Some(ResumeState {
            level: self.level,
            score: self.level_start_score,
            lives: self.lives,
            health: world.player.health,
            x: world.player.pos.x,
            y: world.player.pos.y,
        })
    }

    /// Resume a saved run. The level regenerates deterministically; only the
    /// player's health and position carry over from the snapshot.
    pub fn resume(&mut self, saved: ResumeState) {
        self.lives = saved.lives.clamp(1, STARTING_LIVES);
        self.level_start_score = saved.score;
        self.enter_level(saved.level.clamp(1, FINAL_LEVEL));
        if let Some(world) = self.world.as_mut() {
            world.player.health = saved.health.clamp(1, MAX_HEALTH);
            if saved.x.is_finite() && saved.y.is_finite() {
                world.player.pos.x = saved.x.clamp(0.0, world.level.width);
                world.player.pos.y = saved.y.clamp(0.0, CANVAS_HEIGHT);
            }
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

fn world_name(world: &Option<World>) -> &'static str {
    world.as_ref().map(|w| w.level.name).unwrap_or("?")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing_session() -> Session {
        let mut session = Session::new();
        session.start();
        session
    }

    #[test]
    fn starts_in_menu_without_world() {
        let session = Session::new();
        assert_eq!(session.status, GameStatus::Menu);
        assert!(session.world.is_none());
    }

    #[test]
    fn start_enters_level_one_playing() {
        let session = playing_session();
        assert_eq!(session.status, GameStatus::Playing);
        assert_eq!(session.level, 1);
        assert_eq!(session.lives, STARTING_LIVES);
        assert!(session.world.is_some());
    }

    #[test]
    fn death_with_lives_left_restarts_level_and_rolls_back_score() {
        let mut session = playing_session();
        {
            let world = session.world.as_mut().unwrap();
            world.player.capital = 500;
        }
        session.apply(&GameEvent::ScoreChanged(500));
        assert_eq!(session.score, 500);

        session.apply(&GameEvent::Died);
        assert_eq!(session.status, GameStatus::Playing);
        assert_eq!(session.lives, STARTING_LIVES - 1);
        assert_eq!(session.score, 0);
        assert_eq!(session.world.as_ref().unwrap().player.capital, 0);
    }

    #[test]
    fn death_on_last_life_is_game_over() {
        let mut session = playing_session();
        session.lives = 1;
        session.apply(&GameEvent::Died);
        assert_eq!(session.status, GameStatus::GameOver);
        assert!(session.world.is_none());
    }

    #[test]
    fn goal_mid_run_completes_level() {
        let mut session = playing_session();
        session.apply(&GameEvent::GoalReached);
        assert_eq!(session.status, GameStatus::LevelComplete);
    }

    #[test]
    fn goal_on_final_level_wins_the_run() {
        let mut session = playing_session();
        session.level_start_score = 0;
        session.enter_level(FINAL_LEVEL);
        session.apply(&GameEvent::GoalReached);
        assert_eq!(session.status, GameStatus::Victory);
    }

    #[test]
    fn next_level_advances_and_carries_score() {
        let mut session = playing_session();
        session.apply(&GameEvent::ScoreChanged(1200));
        session.apply(&GameEvent::GoalReached);
        session.next_level();
        assert_eq!(session.status, GameStatus::Playing);
        assert_eq!(session.level, 2);
        assert_eq!(session.score, 1200);
        assert_eq!(session.world.as_ref().unwrap().player.capital, 1200);
    }

    #[test]
    fn next_level_is_a_no_op_while_playing() {
        let mut session = playing_session();
        session.next_level();
        assert_eq!(session.level, 1);
    }

    #[test]
    fn restart_from_game_over_resets_the_run() {
        let mut session = playing_session();
        session.lives = 1;
        session.score = 900;
        session.apply(&GameEvent::Died);
        session.restart();
        assert_eq!(session.status, GameStatus::Playing);
        assert_eq!(session.lives, STARTING_LIVES);
        assert_eq!(session.score, 0);
        assert_eq!(session.level, 1);
    }

    #[test]
    fn snapshot_resume_round_trip() {
        let mut session = playing_session();
        session.level_start_score = 800;
        session.enter_level(3);
        session.lives = 2;
        session.world.as_mut().unwrap().player.health = 2;

        let saved = session.snapshot().unwrap();
        assert_eq!(saved.level, 3);
        assert_eq!(saved.score, 800);

        let mut restored = Session::new();
        restored.resume(saved);
        assert_eq!(restored.status, GameStatus::Playing);
        assert_eq!(restored.level, 3);
        assert_eq!(restored.score, 800);
        assert_eq!(restored.lives, 2);
        assert_eq!(restored.world.as_ref().unwrap().player.health, 2);
    }

    #[test]
    fn snapshot_unavailable_outside_play() {
        let mut session = Session::new();
        assert!(session.snapshot().is_none());
        session.start();
        session.apply(&GameEvent::GoalReached);
        assert!(session.snapshot().is_none());
    }

    #[test]
    fn advance_is_inert_outside_play() {
        let mut session = Session::new();
        let events = session.advance(&TickInput::default());
        assert!(events.is_empty());
    }

    #[test]
    fn advance_ticks_the_world() {
        let mut session = playing_session();
        let before = session.world.as_ref().unwrap().frame;
        session.advance(&TickInput::default());
        assert_eq!(session.world.as_ref().unwrap().frame, before + 1);
    }
}
