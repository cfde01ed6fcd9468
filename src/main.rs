use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use snake_env::game::GameConfig;
use snake_env::modes::{RunConfig, RunMode, WatchMode};
use snake_env::policy::{GreedyPolicy, Policy, RandomPolicy};

#[derive(Parser)]
#[command(name = "snake_env")]
#[command(version, about = "Agent-driven Snake environment")]
struct Cli {
    /// Execution mode
    #[arg(long, default_value = "watch")]
    mode: Mode,

    /// Board width in pixels
    #[arg(long, default_value = "960")]
    width: i32,

    /// Board height in pixels
    #[arg(long, default_value = "720")]
    height: i32,

    /// Cell size in pixels
    #[arg(long, default_value = "40")]
    cell_size: i32,

    /// Policy driving the snake
    #[arg(long, default_value = "greedy")]
    policy: PolicyKind,

    /// Episodes to play in run mode
    #[arg(long, default_value = "100")]
    episodes: usize,

    /// Episodes between progress lines in run mode
    #[arg(long, default_value = "10")]
    log_frequency: usize,

    /// Optional JSON report path for run mode
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Watch a policy play in the terminal
    Watch,
    /// Play episodes headless and print statistics
    Run,
}

#[derive(Clone, ValueEnum)]
enum PolicyKind {
    /// Uniformly random turns
    Random,
    /// One-step lookahead chasing the food
    Greedy,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = GameConfig {
        board_width: cli.width,
        board_height: cli.height,
        cell_size: cli.cell_size,
        ..GameConfig::default()
    };

    let policy: Box<dyn Policy> = match cli.policy {
        PolicyKind::Random => Box::new(RandomPolicy::new()),
        PolicyKind::Greedy => Box::new(GreedyPolicy::new()),
    };

    match cli.mode {
        Mode::Watch => {
            let mut watch_mode = WatchMode::new(config, policy)?;
            watch_mode.run().await?;
        }
        Mode::Run => {
            let run_config = RunConfig {
                game_config: config,
                episodes: cli.episodes,
                log_frequency: cli.log_frequency,
                report_path: cli.report,
            };
            let mut run_mode = RunMode::new(run_config, policy)?;
            run_mode.run()?;
        }
    }

    Ok(())
}
