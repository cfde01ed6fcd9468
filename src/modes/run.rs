//! Headless batch mode
//!
//! Plays a fixed number of episodes with the selected policy, printing
//! progress lines and a final summary, optionally writing a JSON report.
//! This is the environment exercised exactly the way an external agent
//! harness would: reset, step until done, repeat.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::game::{GameConfig, GameEngine, TerminalCause};
use crate::metrics::EpisodeStats;
use crate::policy::Policy;

/// Configuration for a headless run
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub game_config: GameConfig,
    /// Number of episodes to play
    pub episodes: usize,
    /// Episodes between progress lines
    pub log_frequency: usize,
    /// Optional path for a JSON report of the run
    pub report_path: Option<PathBuf>,
}

/// Machine-readable summary written at the end of a run
#[derive(Debug, Serialize)]
struct RunReport {
    policy: &'static str,
    episodes: usize,
    total_steps: usize,
    mean_score: f64,
    mean_reward: f64,
    mean_length: f64,
    best_score: u32,
}

pub struct RunMode {
    engine: GameEngine,
    policy: Box<dyn Policy>,
    stats: EpisodeStats,
    config: RunConfig,
}

impl RunMode {
    pub fn new(config: RunConfig, policy: Box<dyn Policy>) -> Result<Self> {
        let engine =
            GameEngine::new(config.game_config.clone()).context("Invalid game configuration")?;

        Ok(Self {
            engine,
            policy,
            // Rolling averages over the last 100 episodes
            stats: EpisodeStats::new(100),
            config,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        self.print_header();

        for episode in 0..self.config.episodes {
            let (reward, steps, score, _cause) = self.run_episode();
            self.stats.record_episode(reward, steps, score);

            if (episode + 1) % self.config.log_frequency == 0 {
                self.print_progress(episode + 1);
            }
        }

        println!("\nRun complete!");
        println!("{}", self.stats.format_summary());

        if let Some(path) = self.config.report_path.clone() {
            self.write_report(&path)?;
            println!("Report written to: {:?}", path);
        }

        Ok(())
    }

    /// Play a single episode to its terminal step.
    ///
    /// The starvation cutoff guarantees this loop ends even for a policy
    /// that never eats.
    fn run_episode(&mut self) -> (i32, u32, u32, Option<TerminalCause>) {
        self.engine.reset();
        let mut total_reward = 0;

        loop {
            let action = self.policy.choose_action(&self.engine);
            let outcome = self.engine.step(action);
            total_reward += outcome.reward;

            if outcome.done {
                return (
                    total_reward,
                    self.engine.steps(),
                    outcome.score,
                    outcome.info.cause,
                );
            }
        }
    }

    fn print_header(&self) {
        println!("{}", "=".repeat(60));
        println!("Snake environment - headless run");
        println!("{}", "=".repeat(60));
        println!("Policy: {}", self.policy.name());
        println!(
            "Board: {}x{} px, cell {} ({}x{} cells)",
            self.config.game_config.board_width,
            self.config.game_config.board_height,
            self.config.game_config.cell_size,
            self.config.game_config.cols(),
            self.config.game_config.rows(),
        );
        println!("Episodes: {}", self.config.episodes);
        println!("{}", "=".repeat(60));
    }

    fn print_progress(&self, episode: usize) {
        println!(
            "Episode {:>6}/{} | mean score {:.2} | best {} | mean length {:.1}",
            episode,
            self.config.episodes,
            self.stats.mean_score(),
            self.stats.best_score(),
            self.stats.mean_length(),
        );
    }

    fn write_report(&self, path: &Path) -> Result<()> {
        let report = RunReport {
            policy: self.policy.name(),
            episodes: self.stats.total_episodes(),
            total_steps: self.stats.total_steps(),
            mean_score: self.stats.mean_score(),
            mean_reward: self.stats.mean_reward(),
            mean_length: self.stats.mean_length(),
            best_score: self.stats.best_score(),
        };

        let json =
            serde_json::to_string_pretty(&report).context("Failed to serialize run report")?;
        fs::write(path, json).with_context(|| format!("Failed to write report to {:?}", path))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{GreedyPolicy, RandomPolicy};

    fn run_config(episodes: usize) -> RunConfig {
        RunConfig {
            game_config: GameConfig::small(),
            episodes,
            log_frequency: 10,
            report_path: None,
        }
    }

    #[test]
    fn test_episode_runs_to_termination() {
        let mut mode =
            RunMode::new(run_config(1), Box::new(RandomPolicy::new())).expect("config is valid");

        let (reward, steps, score, cause) = mode.run_episode();
        assert!(steps > 0);
        assert!(cause.is_some());
        // Total reward is food eaten times ten, minus the death penalty
        if cause != Some(TerminalCause::BoardFilled) {
            assert_eq!(reward, score as i32 * 10 - 10);
        }
    }

    #[test]
    fn test_run_accumulates_stats() {
        let mut mode =
            RunMode::new(run_config(3), Box::new(GreedyPolicy::new())).expect("config is valid");

        mode.run().expect("run completes");
        assert_eq!(mode.stats.total_episodes(), 3);
        assert!(mode.stats.total_steps() > 0);
    }

    #[test]
    fn test_report_round_trips_through_json() {
        let mut mode =
            RunMode::new(run_config(2), Box::new(GreedyPolicy::new())).expect("config is valid");
        for _ in 0..2 {
            let (reward, steps, score, _) = mode.run_episode();
            mode.stats.record_episode(reward, steps, score);
        }

        let dir = std::env::temp_dir().join("snake_env_report_test");
        fs::create_dir_all(&dir).expect("temp dir");
        let path = dir.join("report.json");
        mode.write_report(&path).expect("report written");

        let text = fs::read_to_string(&path).expect("report readable");
        let value: serde_json::Value = serde_json::from_str(&text).expect("valid json");
        assert_eq!(value["episodes"], 2);
        assert_eq!(value["policy"], "greedy");
    }
}
