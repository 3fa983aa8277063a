//! Collision test and pass scoring.

use super::cars::NpcCar;
use super::types::{NpcId, Rect};
use std::collections::HashSet;

/// Score bookkeeping for one play session.
#[derive(Debug, Clone, Default)]
pub struct ScoreState {
    /// Never decreases during a session.
    pub score: u32,
    /// Best score on record, as loaded from the high-score file.
    pub high_score: i64,
    /// NPCs already credited, so each pass counts once.
    scored: HashSet<NpcId>,
}

impl ScoreState {
    pub fn new(high_score: i64) -> Self {
        Self {
            score: 0,
            high_score,
            scored: HashSet::new(),
        }
    }

    pub fn is_scored(&self, id: NpcId) -> bool {
        self.scored.contains(&id)
    }

    pub fn scored_count(&self) -> usize {
        self.scored.len()
    }

    /// True if the session score beats the stored high score.
    pub fn beats_high_score(&self) -> bool {
        self.score as i64 > self.high_score
    }

    /// Start a new session: score and scored-set cleared, high score replaced.
    pub fn reset(&mut self, high_score: i64) {
        self.score = 0;
        self.high_score = high_score;
        self.scored.clear();
    }

    /// Award `points` for every live NPC whose top edge is strictly below the
    /// player's bottom edge and that has not been credited yet, then forget
    /// credited NPCs that have despawned. Returns the points awarded.
    pub fn update_score(
        &mut self,
        player: Rect,
        npcs: &[NpcCar],
        despawned: &[NpcId],
        points: u32,
    ) -> u32 {
        let mut awarded = 0;
        for npc in npcs {
            if npc.rect().top() > player.bottom() && self.scored.insert(npc.id) {
                awarded += points;
            }
        }
        self.score += awarded;

        for id in despawned {
            self.scored.remove(id);
        }

        awarded
    }
}

/// First NPC overlapping the player, if any. Only one collision matters, so
/// iteration order is irrelevant.
pub fn find_collision(player: Rect, npcs: &[NpcCar]) -> Option<NpcId> {
    npcs.iter()
        .find(|npc| npc.rect().overlaps(&player))
        .map(|npc| npc.id)
}
