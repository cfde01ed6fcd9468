use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{EpisodeState, GameConfig, Heading, Position, TerminalCause};
use crate::metrics::SessionMetrics;

/// TUI sink for the environment.
///
/// Reads an immutable episode snapshot each frame and maps it mechanically
/// to glyphs; it never touches the engine.
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        config: &GameConfig,
        state: &EpisodeState,
        metrics: &SessionMetrics,
        last_cause: Option<TerminalCause>,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Board
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(state, metrics);
        frame.render_widget(stats, chunks[0]);

        let board_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        if let Some(cause) = last_cause {
            let panel = self.render_episode_over(state, cause);
            frame.render_widget(panel, board_area);
        } else {
            let board = self.render_board(board_area, config, state);
            frame.render_widget(board, board_area);
        }

        let controls = self.render_controls();
        frame.render_widget(controls, chunks[2]);
    }

    fn render_board(
        &self,
        _area: Rect,
        config: &GameConfig,
        state: &EpisodeState,
    ) -> Paragraph<'_> {
        let cell = config.cell_size;
        let tail = state.snake.tail();
        let mut lines = Vec::new();

        for row in 0..config.rows() {
            let mut spans = Vec::new();

            for col in 0..config.cols() {
                let pos = Position::new(col * cell, row * cell);

                let glyph = if pos == state.snake.head() {
                    Span::styled(
                        format!("{} ", head_glyph(state.snake.heading)),
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if state.snake.len() > 1 && pos == tail {
                    Span::styled(
                        format!("{} ", tail_glyph(state, cell)),
                        Style::default().fg(Color::Green),
                    )
                } else if state.snake.contains(pos) {
                    Span::styled("□ ", Style::default().fg(Color::Green))
                } else if pos == state.food {
                    Span::styled(
                        "O ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(glyph);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Snake "),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, state: &EpisodeState, metrics: &SessionMetrics) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                state.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Best: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                metrics.best_score.to_string(),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Steps: ", Style::default().fg(Color::Yellow)),
            Span::styled(state.steps.to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Episodes: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                metrics.episodes_completed.to_string(),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_episode_over(&self, state: &EpisodeState, cause: TerminalCause) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "EPISODE OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![Span::styled(
                format!("The snake {}", cause),
                Style::default().fg(Color::Gray),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("Space", Style::default().fg(Color::Cyan)),
            Span::raw(" pause | "),
            Span::styled("R", Style::default().fg(Color::Cyan)),
            Span::raw(" reset | "),
            Span::styled("1-4", Style::default().fg(Color::Cyan)),
            Span::raw(" speed | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Head glyph chosen from the heading
fn head_glyph(heading: Heading) -> char {
    match heading {
        Heading::Up => '▲',
        Heading::Down => '▼',
        Heading::Left => '◀',
        Heading::Right => '▶',
    }
}

/// Tail glyph chosen from where the next segment sits relative to the tail
fn tail_glyph(state: &EpisodeState, cell_size: i32) -> char {
    let body = &state.snake.body;
    let tail = body[body.len() - 1];
    let prev = body[body.len() - 2];

    // The tail points away from its neighbor
    if prev.x - tail.x == cell_size {
        '╶'
    } else if prev.x - tail.x == -cell_size {
        '╴'
    } else if prev.y - tail.y == cell_size {
        '╷'
    } else {
        '╵'
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Snake;

    #[test]
    fn test_head_glyph_tracks_heading() {
        assert_eq!(head_glyph(Heading::Up), '▲');
        assert_eq!(head_glyph(Heading::Down), '▼');
        assert_eq!(head_glyph(Heading::Left), '◀');
        assert_eq!(head_glyph(Heading::Right), '▶');
    }

    #[test]
    fn test_tail_glyph_points_away_from_neighbor() {
        // Rightward snake: the neighbor is to the tail's right
        let state = EpisodeState {
            snake: Snake::new(Position::new(200, 200), Heading::Right, 3, 40),
            food: Position::new(0, 0),
            score: 0,
            steps: 0,
        };
        assert_eq!(tail_glyph(&state, 40), '╶');

        let state = EpisodeState {
            snake: Snake::new(Position::new(200, 200), Heading::Down, 3, 40),
            food: Position::new(0, 0),
            score: 0,
            steps: 0,
        };
        assert_eq!(tail_glyph(&state, 40), '╷');
    }
}
