//! Game configuration: built-in defaults, optional JSON file, startup validation.
//!
//! Configuration problems are programmer/contract errors, so `validate` is
//! run once at startup and any violation stops the game before the terminal
//! is touched.

use crate::constants::*;
use crate::game::spawn::LanePolicy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// All tunables of a racing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub screen_width: f64,
    pub screen_height: f64,
    pub target_fps: u32,
    /// Height of one road tile, the scroll wrap period.
    pub road_tile_height: f64,

    pub road_acceleration: f64,
    pub road_braking: f64,
    pub max_road_speed: f64,

    /// Player car centre at construction (and after every reset).
    pub player_start_x: f64,
    pub player_y: f64,
    pub horizontal_acceleration: f64,
    /// Bound used both when accelerating and when clamping velocity.
    pub max_horizontal_speed: f64,

    pub car_width: f64,
    pub car_height: f64,

    /// Lane centre x-coordinates for NPC spawns.
    pub lane_positions: Vec<f64>,
    pub max_npcs: usize,
    pub npc_min_speed: f64,
    pub npc_max_speed: f64,
    pub spawn_interval_ms: u64,
    pub lane_policy: LanePolicy,

    pub points_per_pass: u32,

    pub player_sprite: PathBuf,
    pub npc_sprite: PathBuf,
    pub road_sprite: PathBuf,
    /// `None` means `~/.racer/highscore.txt`.
    pub high_score_path: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            target_fps: TARGET_FPS,
            road_tile_height: SCREEN_HEIGHT,

            road_acceleration: ROAD_ACCELERATION,
            road_braking: ROAD_BRAKING,
            max_road_speed: MAX_ROAD_SPEED,

            player_start_x: PLAYER_START_X,
            player_y: PLAYER_Y,
            horizontal_acceleration: HORIZONTAL_ACCELERATION,
            max_horizontal_speed: MAX_HORIZONTAL_SPEED,

            car_width: CAR_WIDTH,
            car_height: CAR_HEIGHT,

            lane_positions: LANE_POSITIONS.to_vec(),
            max_npcs: MAX_NPCS,
            npc_min_speed: NPC_MIN_SPEED,
            npc_max_speed: NPC_MAX_SPEED,
            spawn_interval_ms: NPC_SPAWN_INTERVAL_MS,
            lane_policy: LanePolicy::Uniform,

            points_per_pass: POINTS_PER_PASS,

            player_sprite: PathBuf::from(PLAYER_SPRITE_PATH),
            npc_sprite: PathBuf::from(NPC_SPRITE_PATH),
            road_sprite: PathBuf::from(ROAD_SPRITE_PATH),
            high_score_path: None,
        }
    }
}

/// Startup configuration failure. Always fatal.
#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
    EmptyLanes,
    LaneOffScreen { lane: usize, x: f64 },
    NotPositive { field: &'static str },
    Negative { field: &'static str },
    SpeedRange { min: f64, max: f64 },
    ZeroMaxNpcs,
    TileTooShort { tile: f64, screen: f64 },
    RoadTooFast { max_speed: f64, tile: f64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "could not read config {}: {}", path.display(), source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "invalid config {}: {}", path.display(), source)
            }
            ConfigError::EmptyLanes => write!(f, "lane_positions must not be empty"),
            ConfigError::LaneOffScreen { lane, x } => {
                write!(f, "lane {} at x={} puts cars off screen", lane, x)
            }
            ConfigError::NotPositive { field } => write!(f, "{} must be greater than 0", field),
            ConfigError::Negative { field } => write!(f, "{} must not be negative", field),
            ConfigError::SpeedRange { min, max } => {
                write!(f, "npc_min_speed ({}) exceeds npc_max_speed ({})", min, max)
            }
            ConfigError::ZeroMaxNpcs => write!(f, "max_npcs must be at least 1"),
            ConfigError::TileTooShort { tile, screen } => write!(
                f,
                "road_tile_height ({}) is shorter than the screen ({})",
                tile, screen
            ),
            ConfigError::RoadTooFast { max_speed, tile } => write!(
                f,
                "max_road_speed ({}) must be smaller than one road tile ({})",
                max_speed, tile
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl GameConfig {
    /// Load a config file. A missing file yields the defaults; an unreadable
    /// or malformed one is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Check every invariant the game relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("screen_width", self.screen_width),
            ("screen_height", self.screen_height),
            ("road_tile_height", self.road_tile_height),
            ("car_width", self.car_width),
            ("car_height", self.car_height),
            ("horizontal_acceleration", self.horizontal_acceleration),
            ("max_horizontal_speed", self.max_horizontal_speed),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::NotPositive { field });
            }
        }
        if self.target_fps == 0 {
            return Err(ConfigError::NotPositive {
                field: "target_fps",
            });
        }
        if self.spawn_interval_ms == 0 {
            return Err(ConfigError::NotPositive {
                field: "spawn_interval_ms",
            });
        }

        for (field, value) in [
            ("road_acceleration", self.road_acceleration),
            ("road_braking", self.road_braking),
            ("max_road_speed", self.max_road_speed),
            ("npc_min_speed", self.npc_min_speed),
        ] {
            if value < 0.0 {
                return Err(ConfigError::Negative { field });
            }
        }

        if self.lane_positions.is_empty() {
            return Err(ConfigError::EmptyLanes);
        }
        let half_width = self.car_width / 2.0;
        for (lane, &x) in self.lane_positions.iter().enumerate() {
            if x - half_width < 0.0 || x + half_width > self.screen_width {
                return Err(ConfigError::LaneOffScreen { lane, x });
            }
        }

        if self.npc_min_speed > self.npc_max_speed {
            return Err(ConfigError::SpeedRange {
                min: self.npc_min_speed,
                max: self.npc_max_speed,
            });
        }
        if self.max_npcs == 0 {
            return Err(ConfigError::ZeroMaxNpcs);
        }

        if self.road_tile_height < self.screen_height {
            return Err(ConfigError::TileTooShort {
                tile: self.road_tile_height,
                screen: self.screen_height,
            });
        }
        if self.max_road_speed >= self.road_tile_height {
            return Err(ConfigError::RoadTooFast {
                max_speed: self.max_road_speed,
                tile: self.road_tile_height,
            });
        }

        Ok(())
    }

    pub fn spawn_interval(&self) -> Duration {
        Duration::from_millis(self.spawn_interval_ms)
    }

    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.target_fps.max(1) as f64)
    }
}
