//! Racing game core: road, cars, traffic, scoring and the frame state machine.

pub mod cars;
pub mod high_score;
pub mod logic;
pub mod road;
pub mod scoring;
pub mod spawn;
pub mod types;

pub use logic::{FrameReport, GameInput, GameKey, HeldKeys, RaceSession};
pub use types::GameState;
