// Screen constants (logical pixels)
pub const SCREEN_WIDTH: f64 = 840.0;
pub const SCREEN_HEIGHT: f64 = 650.0;

// Frame timing
pub const TARGET_FPS: u32 = 60;

// Road speed (pixels/frame), driven by the accelerate/brake keys
pub const ROAD_ACCELERATION: f64 = 0.1;
pub const ROAD_BRAKING: f64 = 0.7;
pub const MAX_ROAD_SPEED: f64 = 30.0;

// Player car
pub const PLAYER_START_X: f64 = SCREEN_WIDTH / 2.0;
pub const PLAYER_Y: f64 = 400.0;
pub const HORIZONTAL_ACCELERATION: f64 = 0.5;
pub const MAX_HORIZONTAL_SPEED: f64 = 10.0;

// Car rectangle size, shared by sprites and placeholders
pub const CAR_WIDTH: f64 = 50.0;
pub const CAR_HEIGHT: f64 = 100.0;

// Traffic
pub const LANE_POSITIONS: [f64; 4] = [270.0, 370.0, 470.0, 570.0];
pub const MAX_NPCS: usize = 10;
pub const NPC_MIN_SPEED: f64 = 5.0;
pub const NPC_MAX_SPEED: f64 = 15.0;
pub const NPC_SPAWN_INTERVAL_MS: u64 = 1000;

// Scoring
pub const POINTS_PER_PASS: u32 = 10;

// Play field raster (terminal cells)
pub const FIELD_COLS: u16 = 84;
pub const FIELD_ROWS: u16 = 32;

// Input: how long a key counts as held without a release event
pub const KEY_HOLD_WINDOW_MS: u64 = 150;
// Longer window after a fresh press, covering the terminal auto-repeat delay
pub const KEY_REPEAT_DELAY_MS: u64 = 500;

// Files under ~/.racer/
pub const HIGH_SCORE_FILE: &str = "highscore.txt";
pub const CONFIG_FILE: &str = "config.json";
pub const LOG_FILE: &str = "racer.log";

// Asset paths (relative to the working directory)
pub const PLAYER_SPRITE_PATH: &str = "assets/player.txt";
pub const NPC_SPRITE_PATH: &str = "assets/npc.txt";
pub const ROAD_SPRITE_PATH: &str = "assets/road.txt";
