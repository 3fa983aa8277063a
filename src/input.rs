//! Terminal key handling: discrete presses plus the held-key snapshot.
//!
//! Terminals that support the keyboard enhancement protocol report key
//! releases, so a key is held from press to release. Everywhere else a key
//! counts as held for a short window after its last press or auto-repeat.

use crate::constants::{KEY_HOLD_WINDOW_MS, KEY_REPEAT_DELAY_MS};
use crate::game::{GameInput, GameKey, HeldKeys};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::{Duration, Instant};

/// Continuous driving keys (arrows and WASD map to the same action).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveKey {
    Accelerate,
    Brake,
    Left,
    Right,
}

impl DriveKey {
    const ALL: [DriveKey; 4] = [
        DriveKey::Accelerate,
        DriveKey::Brake,
        DriveKey::Left,
        DriveKey::Right,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Map a key code to a driving key, if it is one.
pub fn drive_key(code: KeyCode) -> Option<DriveKey> {
    match code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(DriveKey::Accelerate),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(DriveKey::Brake),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(DriveKey::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(DriveKey::Right),
        _ => None,
    }
}

/// Map a key code to a discrete game key.
pub fn game_key(code: KeyCode) -> GameKey {
    match code {
        KeyCode::Char('r') | KeyCode::Char('R') => GameKey::Restart,
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => GameKey::Quit,
        _ => GameKey::Other,
    }
}

fn is_close(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c'))
}

#[derive(Debug, Clone, Copy)]
struct Hold {
    last_seen: Instant,
    repeating: bool,
}

/// Tracks which driving keys are down.
#[derive(Debug, Clone)]
pub struct KeyTracker {
    release_events: bool,
    hold_window: Duration,
    repeat_delay: Duration,
    holds: [Option<Hold>; 4],
}

impl KeyTracker {
    /// `release_events` is true when the terminal reports key releases.
    pub fn new(release_events: bool) -> Self {
        Self {
            release_events,
            hold_window: Duration::from_millis(KEY_HOLD_WINDOW_MS),
            repeat_delay: Duration::from_millis(KEY_REPEAT_DELAY_MS),
            holds: [None; 4],
        }
    }

    /// Feed one key event. Returns the discrete input for fresh presses;
    /// repeats and releases only update the held set.
    ///
    /// Without release events the terminal reports auto-repeat as another
    /// press, so a press of a driving key that is still held is a repeat.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Option<GameInput> {
        if key.kind == KeyEventKind::Press && is_close(&key) {
            return Some(GameInput::Close);
        }

        let mut repeat = key.kind == KeyEventKind::Repeat;
        if let Some(drive) = drive_key(key.code) {
            let repeating = self.is_held(drive, now);
            let slot = &mut self.holds[drive.index()];
            match key.kind {
                KeyEventKind::Release => *slot = None,
                KeyEventKind::Press | KeyEventKind::Repeat => {
                    *slot = Some(Hold {
                        last_seen: now,
                        repeating,
                    });
                    repeat |= repeating && !self.release_events;
                }
            }
        }

        match key.kind {
            KeyEventKind::Press if !repeat => Some(GameInput::Key(game_key(key.code))),
            _ => None,
        }
    }

    fn is_held(&self, drive: DriveKey, now: Instant) -> bool {
        let Some(hold) = self.holds[drive.index()] else {
            return false;
        };
        if self.release_events {
            return true;
        }
        let window = if hold.repeating {
            self.hold_window
        } else {
            self.repeat_delay
        };
        now.saturating_duration_since(hold.last_seen) <= window
    }

    /// Drop holds whose window has run out. Without release events a key
    /// that times out starts over as a fresh press.
    pub fn expire(&mut self, now: Instant) {
        for drive in DriveKey::ALL {
            if !self.is_held(drive, now) {
                self.holds[drive.index()] = None;
            }
        }
    }

    /// Held driving keys at `now`, taken once per frame.
    pub fn snapshot(&mut self, now: Instant) -> HeldKeys {
        self.expire(now);
        HeldKeys {
            accelerate: self.is_held(DriveKey::Accelerate, now),
            brake: self.is_held(DriveKey::Brake, now),
            left: self.is_held(DriveKey::Left, now),
            right: self.is_held(DriveKey::Right, now),
        }
    }

    pub fn clear(&mut self) {
        self.holds = [None; 4];
    }
}
