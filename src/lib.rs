//! Racer - a top-down lane racing game for the terminal.
//!
//! The library holds all game logic and rendering so it can be tested
//! without a terminal; `main.rs` owns terminal setup and the frame loop.

pub mod assets;
pub mod build_info;
pub mod config;
pub mod constants;
pub mod game;
pub mod input;
pub mod ui;
pub mod utils;
