//! Shared racing data structures: positions, rectangles, game state.

use serde::{Deserialize, Serialize};

/// Continuous world position (top-left corner, logical pixels).
///
/// Kept separate from the integer `Rect` so slow scroll speeds accumulate
/// instead of being rounded away every frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Integer axis-aligned rectangle used for collision and drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle of the given size whose top-left corner is `pos` (floored).
    pub fn at(pos: Position, width: i32, height: i32) -> Self {
        Self::new(pos.x.floor() as i32, pos.y.floor() as i32, width, height)
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// True if the interiors overlap. Rectangles that only share an edge do not.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

/// Identity of a spawned NPC, unique for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NpcId(pub u64);

/// Which screen the game is on. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    ShowingInstructions,
    Playing,
    GameOver,
}

impl GameState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ShowingInstructions => "Instructions",
            Self::Playing => "Playing",
            Self::GameOver => "Game Over",
        }
    }
}

/// Horizontal steering input for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Steer {
    Left,
    Straight,
    Right,
}

impl Steer {
    pub fn sign(&self) -> f64 {
        match self {
            Self::Left => -1.0,
            Self::Straight => 0.0,
            Self::Right => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let r = Rect::new(10, 20, 50, 100);
        assert_eq!(r.left(), 10);
        assert_eq!(r.right(), 60);
        assert_eq!(r.top(), 20);
        assert_eq!(r.bottom(), 120);
    }

    #[test]
    fn test_rect_floors_position() {
        let r = Rect::at(Position::new(10.9, -0.5), 50, 100);
        assert_eq!(r.x, 10);
        assert_eq!(r.y, -1);
    }

    #[test]
    fn test_overlap() {
        let a = Rect::new(0, 0, 50, 100);
        assert!(a.overlaps(&Rect::new(49, 99, 10, 10)));
        assert!(a.overlaps(&Rect::new(-10, -10, 100, 200)));
        // Touching edges only
        assert!(!a.overlaps(&Rect::new(50, 0, 10, 10)));
        assert!(!a.overlaps(&Rect::new(0, 100, 10, 10)));
        assert!(!a.overlaps(&Rect::new(200, 200, 10, 10)));
    }

    #[test]
    fn test_steer_sign() {
        assert_eq!(Steer::Left.sign(), -1.0);
        assert_eq!(Steer::Straight.sign(), 0.0);
        assert_eq!(Steer::Right.sign(), 1.0);
    }
}
