//! NPC spawn controller: interval timer plus constrained random placement.

use super::cars::{CarBody, NpcCar};
use super::types::{NpcId, Position};
use crate::config::GameConfig;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How a spawn lane is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum LanePolicy {
    /// Any lane, uniformly at random.
    Uniform,
    /// Uniformly among lanes with no NPC still in the top half of the screen.
    /// If every lane is occupied the spawn is skipped.
    AvoidStacking,
}

impl LanePolicy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Uniform => "Uniform",
            Self::AvoidStacking => "Avoid stacking",
        }
    }
}

/// Elapsed-time accumulator that fires once per interval.
#[derive(Debug, Clone)]
pub struct SpawnTimer {
    pub interval: Duration,
    pub accumulated: Duration,
}

impl SpawnTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            accumulated: Duration::ZERO,
        }
    }

    /// Add `dt` and report whether an interval elapsed. Fires at most once
    /// per call; backlog beyond one interval is dropped.
    pub fn tick(&mut self, dt: Duration) -> bool {
        self.accumulated += dt;
        if self.accumulated < self.interval {
            return false;
        }
        self.accumulated -= self.interval;
        if self.accumulated >= self.interval {
            self.accumulated = Duration::ZERO;
        }
        true
    }

    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
    }
}

/// Why a spawn attempt produced no car.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnRefusal {
    AtCapacity,
    AllLanesOccupied,
}

/// Places new NPCs in lanes just above the visible screen.
#[derive(Debug, Clone)]
pub struct SpawnController {
    pub lanes: Vec<f64>,
    pub max_npcs: usize,
    pub min_speed: f64,
    pub max_speed: f64,
    pub policy: LanePolicy,
    pub car_width: f64,
    pub car_height: f64,
    pub screen_height: f64,
    next_id: u64,
}

impl SpawnController {
    /// Build from a validated config (non-empty lanes, ordered speed range).
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            lanes: config.lane_positions.clone(),
            max_npcs: config.max_npcs,
            min_speed: config.npc_min_speed,
            max_speed: config.npc_max_speed,
            policy: config.lane_policy,
            car_width: config.car_width,
            car_height: config.car_height,
            screen_height: config.screen_height,
            next_id: 0,
        }
    }

    /// Top edge used for every spawn: the car's bottom touches the screen top.
    pub fn spawn_y(&self) -> f64 {
        -self.car_height
    }

    /// Lanes a new car may use given the live traffic.
    pub fn eligible_lanes(&self, npcs: &[NpcCar]) -> Vec<usize> {
        match self.policy {
            LanePolicy::Uniform => (0..self.lanes.len()).collect(),
            LanePolicy::AvoidStacking => {
                let half = self.screen_height / 2.0;
                (0..self.lanes.len())
                    .filter(|&lane| {
                        !npcs
                            .iter()
                            .any(|npc| npc.lane == lane && (npc.rect().top() as f64) < half)
                    })
                    .collect()
            }
        }
    }

    /// Try to create one NPC. Refused when the traffic cap is reached or,
    /// under `AvoidStacking`, when no lane is free.
    pub fn try_spawn<R: Rng>(
        &mut self,
        npcs: &[NpcCar],
        rng: &mut R,
    ) -> Result<NpcCar, SpawnRefusal> {
        if npcs.len() >= self.max_npcs {
            return Err(SpawnRefusal::AtCapacity);
        }

        let lanes = self.eligible_lanes(npcs);
        if lanes.is_empty() {
            return Err(SpawnRefusal::AllLanesOccupied);
        }
        let lane = lanes[rng.gen_range(0..lanes.len())];

        let speed = if self.min_speed < self.max_speed {
            rng.gen_range(self.min_speed..=self.max_speed)
        } else {
            self.min_speed
        };

        let x = self.lanes[lane] - self.car_width / 2.0;
        let body = CarBody::at(Position::new(x, self.spawn_y()), self.car_width, self.car_height);

        let id = NpcId(self.next_id);
        self.next_id += 1;

        Ok(NpcCar::new(id, body, speed, lane))
    }
}
