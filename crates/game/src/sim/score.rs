use super::events::GameEvent;

pub const COIN_POINTS: u32 = 100;

/// x-coordinates at which the progress readout unlocks its next message.
pub const MILESTONE_THRESHOLDS: [f32; 4] = [500.0, 1000.0, 1500.0, 1700.0];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scoreboard {
    coins: u32,
    score: u32,
}

impl Scoreboard {
    pub fn apply(&mut self, event: &GameEvent) {
        match event {
            GameEvent::CoinCollected => {
                self.coins = self.coins.saturating_add(1);
                self.score = self.score.saturating_add(COIN_POINTS);
            }
            GameEvent::EnemyStomped { points } => {
                self.score = self.score.saturating_add(*points);
            }
            GameEvent::RunReset => *self = Self::default(),
            _ => {}
        }
    }

    pub fn coins(&self) -> u32 {
        self.coins
    }

    pub fn score(&self) -> u32 {
        self.score
    }
}

/// Index into `MILESTONE_THRESHOLDS` of the furthest milestone reached.
pub fn unlocked_milestone(x: f32) -> Option<usize> {
    MILESTONE_THRESHOLDS
        .iter()
        .rposition(|threshold| x >= *threshold)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HudSnapshot {
    pub x_readout: i32,
    pub coins: u32,
    pub score: u32,
    pub milestone: Option<usize>,
}
