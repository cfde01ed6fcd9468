use std::time::{Duration, Instant};

use crate::game::TerminalCause;

/// Session-level bookkeeping for the interactive watch mode HUD
pub struct SessionMetrics {
    episode_start: Instant,
    pub elapsed: Duration,
    pub episodes_completed: u32,
    pub best_score: u32,
    /// How the most recent episode ended; cleared when the next one starts
    pub last_cause: Option<TerminalCause>,
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self {
            episode_start: Instant::now(),
            elapsed: Duration::ZERO,
            episodes_completed: 0,
            best_score: 0,
            last_cause: None,
        }
    }

    /// Refresh the elapsed clock; called once per rendered frame
    pub fn update(&mut self) {
        self.elapsed = self.episode_start.elapsed();
    }

    pub fn on_episode_start(&mut self) {
        self.episode_start = Instant::now();
        self.elapsed = Duration::ZERO;
        self.last_cause = None;
    }

    pub fn on_episode_end(&mut self, final_score: u32, cause: Option<TerminalCause>) {
        self.episodes_completed += 1;
        self.last_cause = cause;
        if final_score > self.best_score {
            self.best_score = final_score;
        }
    }

    /// Current episode time as mm:ss
    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed.as_secs();
        format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
    }
}

impl Default for SessionMetrics {
    fn default() -> Self {
        Self::new()
    }
}
