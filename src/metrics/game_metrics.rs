use std::time::{Duration, Instant};

use crate::game::StepOutcome;

/// Statistics across the games of one play session
pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub high_score: u32,
    pub games_played: u32,
    pub games_won: u32,
    /// Set once the current game has been counted
    finished: bool,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            high_score: 0,
            games_played: 0,
            games_won: 0,
            finished: false,
        }
    }

    /// Refresh the elapsed time of a running game; frozen once it ends
    pub fn update(&mut self) {
        if !self.finished {
            self.elapsed_time = self.start_time.elapsed();
        }
    }

    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
        self.finished = false;
    }

    /// Fold the result of one tick into the session
    pub fn observe(&mut self, outcome: StepOutcome, score: u32) {
        self.high_score = self.high_score.max(score);

        match outcome {
            StepOutcome::Collision(_) => self.on_game_over(false),
            StepOutcome::Won => self.on_game_over(true),
            StepOutcome::Moved | StepOutcome::Ate | StepOutcome::Finished => {}
        }
    }

    fn on_game_over(&mut self, won: bool) {
        if self.finished {
            return;
        }
        self.update();
        self.finished = true;
        self.games_played += 1;
        if won {
            self.games_won += 1;
        }
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
