//! ASCII sprite loading.
//!
//! Sprites are plain-text files, one row per line. Any file that is missing,
//! unreadable or empty is replaced by a solid placeholder so the game always
//! has something to draw. Sprites only affect rendering; car and road sizes
//! come from the config.

use crate::config::GameConfig;
use ratatui::style::Color;
use std::fs;
use std::io;
use std::path::Path;

const SOLID: char = '\u{2588}'; // █

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteKind {
    Player,
    Npc,
    Road,
}

impl SpriteKind {
    pub fn name(self) -> &'static str {
        match self {
            SpriteKind::Player => "player",
            SpriteKind::Npc => "npc",
            SpriteKind::Road => "road",
        }
    }

    /// Colours for art loaded from disk.
    fn art_colors(self) -> (Color, Color) {
        match self {
            SpriteKind::Player => (Color::LightRed, Color::Reset),
            SpriteKind::Npc => (Color::LightBlue, Color::Reset),
            SpriteKind::Road => (Color::Gray, Color::Black),
        }
    }
}

/// A grid of characters drawn scaled onto a target rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    rows: Vec<Vec<char>>,
    width: usize,
    pub fg: Color,
    pub bg: Color,
    pub placeholder: bool,
}

impl Sprite {
    /// Solid stand-in: red player, blue NPC, black road.
    pub fn placeholder(kind: SpriteKind) -> Self {
        let (ch, fg, bg) = match kind {
            SpriteKind::Player => (SOLID, Color::Red, Color::Reset),
            SpriteKind::Npc => (SOLID, Color::Blue, Color::Reset),
            SpriteKind::Road => (' ', Color::Black, Color::Black),
        };
        Self {
            rows: vec![vec![ch]],
            width: 1,
            fg,
            bg,
            placeholder: true,
        }
    }

    /// Parse sprite text. Trailing blank lines are dropped; short rows are
    /// padded with spaces. Returns `None` when nothing visible remains.
    pub fn parse(text: &str, kind: SpriteKind) -> Option<Self> {
        let mut rows: Vec<Vec<char>> = text
            .lines()
            .map(|line| line.trim_end().chars().collect())
            .collect();
        while rows.last().is_some_and(|row| row.is_empty()) {
            rows.pop();
        }
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        if width == 0 {
            return None;
        }
        for row in &mut rows {
            row.resize(width, ' ');
        }

        let (fg, bg) = kind.art_colors();
        Some(Self {
            rows,
            width,
            fg,
            bg,
            placeholder: false,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Character at fractional coordinates in `[0, 1)`; values outside the
    /// range are clamped to the edge.
    pub fn sample(&self, fx: f64, fy: f64) -> char {
        let col = scale_index(fx, self.width);
        let row = scale_index(fy, self.rows.len());
        self.rows[row][col]
    }
}

fn scale_index(fraction: f64, len: usize) -> usize {
    let idx = (fraction * len as f64).floor();
    if idx.is_nan() || idx < 0.0 {
        0
    } else {
        (idx as usize).min(len - 1)
    }
}

fn read_sprite(path: &Path, kind: SpriteKind) -> io::Result<Sprite> {
    let text = fs::read_to_string(path)?;
    Sprite::parse(&text, kind)
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "sprite file is empty"))
}

/// Load a sprite, substituting the placeholder on any failure.
pub fn load_sprite(path: &Path, kind: SpriteKind) -> Sprite {
    match read_sprite(path, kind) {
        Ok(sprite) => {
            tracing::debug!(
                kind = kind.name(),
                path = %path.display(),
                width = sprite.width(),
                height = sprite.height(),
                "loaded sprite"
            );
            sprite
        }
        Err(e) => {
            tracing::warn!(
                kind = kind.name(),
                path = %path.display(),
                error = %e,
                "using placeholder sprite"
            );
            Sprite::placeholder(kind)
        }
    }
}

/// The three sprites the renderer needs.
#[derive(Debug, Clone)]
pub struct Assets {
    pub player: Sprite,
    pub npc: Sprite,
    pub road: Sprite,
}

impl Assets {
    pub fn load(config: &GameConfig) -> Self {
        Self {
            player: load_sprite(&config.player_sprite, SpriteKind::Player),
            npc: load_sprite(&config.npc_sprite, SpriteKind::Npc),
            road: load_sprite(&config.road_sprite, SpriteKind::Road),
        }
    }

    /// All placeholders, for tests and headless use.
    pub fn placeholders() -> Self {
        Self {
            player: Sprite::placeholder(SpriteKind::Player),
            npc: Sprite::placeholder(SpriteKind::Npc),
            road: Sprite::placeholder(SpriteKind::Road),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_placeholder_colors() {
        assert_eq!(Sprite::placeholder(SpriteKind::Player).fg, Color::Red);
        assert_eq!(Sprite::placeholder(SpriteKind::Npc).fg, Color::Blue);
        let road = Sprite::placeholder(SpriteKind::Road);
        assert_eq!(road.bg, Color::Black);
        assert!(road.placeholder);
    }

    #[test]
    fn test_parse_pads_rows() {
        let sprite = Sprite::parse("/-\\\n|\n\n\n", SpriteKind::Npc).unwrap();
        assert_eq!(sprite.width(), 3);
        assert_eq!(sprite.height(), 2);
        assert_eq!(sprite.sample(0.9, 0.9), ' ');
        assert_eq!(sprite.sample(0.0, 0.0), '/');
        assert!(!sprite.placeholder);
    }

    #[test]
    fn test_parse_blank_is_none() {
        assert!(Sprite::parse("", SpriteKind::Player).is_none());
        assert!(Sprite::parse("   \n\n", SpriteKind::Player).is_none());
    }

    #[test]
    fn test_sample_clamps() {
        let sprite = Sprite::parse("ab\ncd", SpriteKind::Road).unwrap();
        assert_eq!(sprite.sample(-1.0, -1.0), 'a');
        assert_eq!(sprite.sample(1.0, 1.0), 'd');
        assert_eq!(sprite.sample(0.5, 0.0), 'b');
        assert_eq!(sprite.sample(f64::NAN, 0.6), 'c');
    }

    #[test]
    fn test_load_missing_falls_back() {
        let sprite = load_sprite(&PathBuf::from("/nonexistent/racer/npc.txt"), SpriteKind::Npc);
        assert!(sprite.placeholder);
        assert_eq!(sprite.fg, Color::Blue);
    }

    #[test]
    fn test_load_empty_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("player.txt");
        fs::write(&path, "\n\n").unwrap();
        let sprite = load_sprite(&path, SpriteKind::Player);
        assert!(sprite.placeholder);
        assert_eq!(sprite.fg, Color::Red);
    }

    #[test]
    fn test_load_real_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("road.txt");
        fs::write(&path, "|  :  |\n|     |\n").unwrap();
        let sprite = load_sprite(&path, SpriteKind::Road);
        assert!(!sprite.placeholder);
        assert_eq!(sprite.height(), 2);
        assert_eq!(sprite.width(), 7);
    }
}
