//! Interactive mode for watching a policy drive the environment
//!
//! A TUI loop where the selected policy plays episode after episode. Pacing
//! lives entirely here: the engine is stepped from a tokio interval and the
//! renderer draws from snapshots at its own cadence.
//!
//! # Controls
//!
//! - Space: pause/unpause
//! - R: reset the episode
//! - 1-4: playback speed
//! - Q/Esc: quit

use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{Interval, interval};

use crate::game::{GameConfig, GameEngine, TerminalCause};
use crate::metrics::SessionMetrics;
use crate::policy::Policy;
use crate::render::Renderer;

/// Playback speed presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackSpeed {
    /// 2 Hz
    Slow,
    /// 8 Hz
    Normal,
    /// 20 Hz
    Fast,
    /// 60 Hz
    VeryFast,
}

impl PlaybackSpeed {
    fn tick_interval(&self) -> Duration {
        match self {
            Self::Slow => Duration::from_millis(500),
            Self::Normal => Duration::from_millis(125),
            Self::Fast => Duration::from_millis(50),
            Self::VeryFast => Duration::from_millis(16),
        }
    }
}

/// Watch mode: policy in, frames out
pub struct WatchMode {
    engine: GameEngine,
    policy: Box<dyn Policy>,
    renderer: Renderer,
    metrics: SessionMetrics,
    should_quit: bool,
    paused: bool,
    speed: PlaybackSpeed,
    /// Set while the episode-over panel is showing; cleared on restart
    done_cause: Option<TerminalCause>,
}

impl WatchMode {
    pub fn new(config: GameConfig, policy: Box<dyn Policy>) -> Result<Self> {
        let engine = GameEngine::new(config).context("Invalid game configuration")?;

        Ok(Self {
            engine,
            policy,
            renderer: Renderer::new(),
            metrics: SessionMetrics::new(),
            should_quit: false,
            paused: false,
            speed: PlaybackSpeed::Normal,
            done_cause: None,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let result = self.run_watch_loop(&mut terminal).await;

        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_watch_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut tick_timer = interval(self.speed.tick_interval());

        // Render at 30 FPS regardless of game speed
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event, &mut tick_timer);
                    }
                }

                _ = tick_timer.tick() => {
                    if !self.paused {
                        self.advance();
                    }
                }

                _ = render_timer.tick() => {
                    self.metrics.update();
                    // Hand the renderer a snapshot, never the live state
                    let snapshot = self.engine.snapshot();
                    terminal.draw(|frame| {
                        self.renderer.render(
                            frame,
                            self.engine.config(),
                            &snapshot,
                            &self.metrics,
                            self.done_cause,
                        );
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// One game tick: restart after a terminal step, otherwise let the
    /// policy drive
    fn advance(&mut self) {
        if self.done_cause.is_some() {
            self.restart_episode();
            return;
        }

        let action = self.policy.choose_action(&self.engine);
        let outcome = self.engine.step(action);
        if outcome.done {
            self.metrics.on_episode_end(outcome.score, outcome.info.cause);
            self.done_cause = outcome.info.cause;
        }
    }

    fn restart_episode(&mut self) {
        self.engine.reset();
        self.metrics.on_episode_start();
        self.done_cause = None;
    }

    fn handle_event(&mut self, event: Event, tick_timer: &mut Interval) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.should_quit = true;
                }
                KeyCode::Char(' ') => {
                    self.paused = !self.paused;
                }
                KeyCode::Char('r') => {
                    self.restart_episode();
                }
                KeyCode::Char('1') => {
                    self.change_speed(PlaybackSpeed::Slow, tick_timer);
                }
                KeyCode::Char('2') => {
                    self.change_speed(PlaybackSpeed::Normal, tick_timer);
                }
                KeyCode::Char('3') => {
                    self.change_speed(PlaybackSpeed::Fast, tick_timer);
                }
                KeyCode::Char('4') => {
                    self.change_speed(PlaybackSpeed::VeryFast, tick_timer);
                }
                _ => {}
            }
        }
    }

    fn change_speed(&mut self, new_speed: PlaybackSpeed, tick_timer: &mut Interval) {
        self.speed = new_speed;
        tick_timer.reset_after(self.speed.tick_interval());
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
