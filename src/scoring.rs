use log::info;

pub const SCORE_PER_ROW: u32 = 100;
pub const SCORE_PER_LEVEL: u32 = 300;

// Timing (in milliseconds)
const BASE_INTERVAL_MS: u64 = 700;
const INTERVAL_STEP_MS: u64 = 100;
const MIN_INTERVAL_MS: u64 = 100;

/// Milliseconds between automatic drops at `level`.
pub fn speed_interval(level: u32) -> u64 {
    let reduction = level.saturating_sub(1) as u64 * INTERVAL_STEP_MS;
    BASE_INTERVAL_MS.saturating_sub(reduction).max(MIN_INTERVAL_MS)
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Scoring {
    score: u32,
    level: u32,
}

impl Scoring {
    pub fn new() -> Self {
        Self { score: 0, level: 1 }
    }

    pub fn with_score(score: u32, level: u32) -> Self {
        Self { score, level }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Credits each row on its own; the level goes up whenever the running
    /// score lands exactly on a multiple of `SCORE_PER_LEVEL`. Returns the
    /// number of levels gained.
    ///
    /// The exact-multiple test only works while `SCORE_PER_ROW` divides
    /// `SCORE_PER_LEVEL`.
    pub fn on_rows_cleared(&mut self, rows: u32) -> u32 {
        let mut levels_gained = 0;
        for _ in 0..rows {
            self.score += SCORE_PER_ROW;
            if self.score % SCORE_PER_LEVEL == 0 {
                self.level += 1;
                levels_gained += 1;
                info!("level up: {} at score {}", self.level, self.score);
            }
        }
        levels_gained
    }

    pub fn speed_interval(&self) -> u64 {
        speed_interval(self.level)
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for Scoring {
    fn default() -> Self {
        Self::new()
    }
}
