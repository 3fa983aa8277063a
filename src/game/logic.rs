//! Race session: input routing, state machine and per-frame update.
//!
//! Everything here is terminal-agnostic. The binary feeds each frame's
//! discrete inputs, the held-key snapshot and the elapsed time into
//! `RaceSession::frame` and renders the session afterwards.

use super::cars::{NpcCar, NpcStatus, PlayerCar};
use super::high_score::HighScoreStore;
use super::road::Road;
use super::scoring::{find_collision, ScoreState};
use super::spawn::{SpawnController, SpawnRefusal, SpawnTimer};
use super::types::{GameState, NpcId};
use crate::config::GameConfig;
use rand::Rng;
use std::time::Duration;

/// Discrete key presses, already mapped from terminal key codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameKey {
    Restart, // R
    Quit,    // Esc or Q
    Other,   // anything else (dismisses the instructions)
}

/// UI-agnostic discrete input for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameInput {
    Key(GameKey),
    /// Window-close equivalent. Honoured in every state.
    Close,
}

/// Snapshot of the continuous driving keys, taken once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeldKeys {
    pub accelerate: bool,
    pub brake: bool,
    pub left: bool,
    pub right: bool,
}

/// Everything that happened during one frame.
#[derive(Debug, Clone, Default)]
pub struct FrameReport {
    /// The loop must stop; nothing else ran after the quit was seen.
    pub quit: bool,
    /// State changes in the order they happened.
    pub transitions: Vec<(GameState, GameState)>,
    pub spawned: Option<NpcId>,
    pub spawn_refused: Option<SpawnRefusal>,
    pub despawned: Vec<NpcId>,
    pub points_awarded: u32,
    pub collided_with: Option<NpcId>,
    /// A new high score was written this frame.
    pub high_score_saved: bool,
}

/// All mutable game state, owned by the frame loop.
#[derive(Debug, Clone)]
pub struct RaceSession {
    pub config: GameConfig,
    pub state: GameState,
    pub road: Road,
    pub player: PlayerCar,
    pub npcs: Vec<NpcCar>,
    pub score: ScoreState,
    /// Current scroll speed in pixels/frame, in `[0, max_road_speed]`.
    pub road_speed: f64,
    pub spawn_timer: SpawnTimer,
    pub spawner: SpawnController,
    /// Frames simulated while Playing, across resets.
    pub frames_played: u64,
}

impl RaceSession {
    /// New session on the instructions screen. `config` must be validated.
    pub fn new(config: GameConfig, high_score: i64) -> Self {
        let road = Road::new(config.screen_height, config.road_tile_height);
        let player = PlayerCar::new(
            config.player_start_x,
            config.player_y,
            config.car_width,
            config.car_height,
            config.horizontal_acceleration,
            config.max_horizontal_speed,
        );
        let spawn_timer = SpawnTimer::new(config.spawn_interval());
        let spawner = SpawnController::from_config(&config);

        Self {
            config,
            state: GameState::ShowingInstructions,
            road,
            player,
            npcs: Vec::new(),
            score: ScoreState::new(high_score),
            road_speed: 0.0,
            spawn_timer,
            spawner,
            frames_played: 0,
        }
    }

    /// Run one frame: route `inputs`, then (if Playing) apply held keys and
    /// update road, player, NPCs, collisions and score in that order.
    pub fn frame<R: Rng, S: HighScoreStore>(
        &mut self,
        inputs: &[GameInput],
        held: HeldKeys,
        dt: Duration,
        rng: &mut R,
        store: &mut S,
    ) -> FrameReport {
        let mut report = FrameReport::default();

        for &input in inputs {
            self.process_input(input, store, &mut report);
            if report.quit {
                return report;
            }
        }

        if self.state == GameState::Playing {
            self.apply_held_keys(held);
            self.update(dt, rng, store, &mut report);
        }

        report
    }

    /// Route one discrete input through the active state's handler.
    pub fn process_input<S: HighScoreStore>(
        &mut self,
        input: GameInput,
        store: &mut S,
        report: &mut FrameReport,
    ) {
        let key = match input {
            GameInput::Close => {
                report.quit = true;
                return;
            }
            GameInput::Key(key) => key,
        };

        match self.state {
            GameState::ShowingInstructions => {
                self.transition(GameState::Playing, report);
            }
            GameState::GameOver => match key {
                GameKey::Restart => self.reset(store, report),
                GameKey::Quit => report.quit = true,
                GameKey::Other => {}
            },
            // Driving uses the held-key snapshot only
            GameState::Playing => {}
        }
    }

    /// Accelerate/brake the road and steer the player from held keys.
    pub fn apply_held_keys(&mut self, held: HeldKeys) {
        if held.accelerate {
            self.road_speed += self.config.road_acceleration;
        } else if held.brake {
            self.road_speed -= self.config.road_braking;
        }
        self.road_speed = self.road_speed.clamp(0.0, self.config.max_road_speed);

        self.player.steer(held.left, held.right);
    }

    fn update<R: Rng, S: HighScoreStore>(
        &mut self,
        dt: Duration,
        rng: &mut R,
        store: &mut S,
        report: &mut FrameReport,
    ) {
        self.frames_played += 1;

        // 1. Spawn timer
        if self.spawn_timer.tick(dt) {
            match self.spawner.try_spawn(&self.npcs, rng) {
                Ok(npc) => {
                    tracing::debug!(
                        id = npc.id.0,
                        lane = npc.lane,
                        speed = npc.speed,
                        "spawned npc"
                    );
                    report.spawned = Some(npc.id);
                    self.npcs.push(npc);
                }
                Err(refusal) => {
                    tracing::trace!(?refusal, "spawn skipped");
                    report.spawn_refused = Some(refusal);
                }
            }
        }

        // 2. Road
        self.road.update(self.road_speed);

        // 3. Player
        self.player.update(self.config.screen_width);

        // 4. NPCs (despawned cars leave the collection)
        let road_speed = self.road_speed;
        let screen_height = self.config.screen_height;
        let despawned = &mut report.despawned;
        self.npcs
            .retain_mut(|npc| match npc.update(road_speed, screen_height) {
                NpcStatus::Alive => true,
                NpcStatus::Despawned => {
                    despawned.push(npc.id);
                    false
                }
            });

        // 5. Collisions
        if self.check_collisions(store, report) {
            return;
        }

        // 6. Score
        report.points_awarded = self.score.update_score(
            self.player.rect(),
            &self.npcs,
            &report.despawned,
            self.config.points_per_pass,
        );
    }

    /// End the game on the first NPC overlapping the player and try once to
    /// persist a beaten high score. Returns true if a collision happened.
    pub fn check_collisions<S: HighScoreStore>(
        &mut self,
        store: &mut S,
        report: &mut FrameReport,
    ) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        let Some(id) = find_collision(self.player.rect(), &self.npcs) else {
            return false;
        };

        tracing::info!(npc = id.0, score = self.score.score, "collision");
        report.collided_with = Some(id);
        self.transition(GameState::GameOver, report);
        report.high_score_saved = self.save_high_score(store);
        true
    }

    /// Write the session score if it beats the stored one. A failed write is
    /// logged; the in-memory high score is updated either way.
    fn save_high_score<S: HighScoreStore>(&mut self, store: &mut S) -> bool {
        if !self.score.beats_high_score() {
            return false;
        }
        self.score.high_score = self.score.score as i64;
        match store.save(self.score.high_score) {
            Ok(()) => {
                tracing::info!(high_score = self.score.high_score, "new high score saved");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not save high score");
                false
            }
        }
    }

    /// Full reset back to the instructions screen.
    pub fn reset<S: HighScoreStore>(&mut self, store: &mut S, report: &mut FrameReport) {
        self.score.reset(store.load());
        self.player.reset_position();
        self.road_speed = 0.0;
        self.npcs.clear();
        self.road = Road::new(self.config.screen_height, self.config.road_tile_height);
        self.spawn_timer.reset();
        self.transition(GameState::ShowingInstructions, report);
    }

    fn transition(&mut self, to: GameState, report: &mut FrameReport) {
        let from = self.state;
        self.state = to;
        report.transitions.push((from, to));
        tracing::info!(from = from.name(), to = to.name(), "state change");
    }
}
