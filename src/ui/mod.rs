//! Terminal rendering.

pub mod game_common;
pub mod race_scene;

pub use race_scene::render_race_scene;
