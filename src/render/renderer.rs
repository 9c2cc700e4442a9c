use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::game::{GameConfig, GameState, Position};
use crate::metrics::GameMetrics;

/// Pixels of configured cell size per terminal column
pub const PIXELS_PER_COLUMN: u32 = 10;

/// Terminal columns one board cell takes for a cell size given in pixels
pub fn cell_columns(cell_size: u32) -> usize {
    (cell_size / PIXELS_PER_COLUMN).max(1) as usize
}

pub struct Renderer {
    cell_columns: usize,
}

impl Renderer {
    pub fn new(cell_size: u32) -> Self {
        Self {
            cell_columns: cell_columns(cell_size),
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.cell_size)
    }

    pub fn cell_columns(&self) -> usize {
        self.cell_columns
    }

    pub fn render(&self, frame: &mut Frame, state: &GameState, metrics: &GameMetrics) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(state, metrics), chunks[0]);

        let board_width = state
            .width()
            .saturating_mul(self.cell_columns)
            .saturating_add(2);
        let board_area = centered_rect(
            u16::try_from(board_width).unwrap_or(u16::MAX),
            u16::try_from(state.height().saturating_add(2)).unwrap_or(u16::MAX),
            chunks[1],
        );
        frame.render_widget(self.render_board(state), board_area);

        if state.is_game_over() {
            let popup = centered_rect(36, 7, chunks[1]);
            frame.render_widget(Clear, popup);
            frame.render_widget(self.render_game_over(state), popup);
        }

        frame.render_widget(self.render_controls(), chunks[2]);
    }

    /// One styled line per board row
    pub fn board_lines(&self, state: &GameState) -> Vec<Line<'static>> {
        let mut lines = Vec::with_capacity(state.height());

        for row in 0..state.height() {
            let mut spans = Vec::with_capacity(state.width());

            for col in 0..state.width() {
                let pos = Position::new(row as i32, col as i32);

                let (glyph, style) = if pos == state.head() {
                    (
                        "■",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if state.is_occupied_by_snake(pos) {
                    ("□", Style::default().fg(Color::Green))
                } else if state.food() == Some(pos) {
                    (
                        "O",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else {
                    (".", Style::default().fg(Color::DarkGray))
                };

                spans.push(Span::styled(
                    format!("{:<width$}", glyph, width = self.cell_columns),
                    style,
                ));
            }

            lines.push(Line::from(spans));
        }

        lines
    }

    fn render_board(&self, state: &GameState) -> Paragraph<'static> {
        Paragraph::new(self.board_lines(state)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::White))
                .title(" Snake "),
        )
    }

    fn render_stats(&self, state: &GameState, metrics: &GameMetrics) -> Paragraph<'static> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let text = vec![Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(state.score().to_string(), value.add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("Steps: ", label),
            Span::styled(state.steps().to_string(), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), value),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(metrics.high_score.to_string(), value),
            Span::raw("    "),
            Span::styled("Won: ", label),
            Span::styled(
                format!("{}/{}", metrics.games_won, metrics.games_played),
                value,
            ),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_game_over(&self, state: &GameState) -> Paragraph<'static> {
        let (title, color) = if state.has_won() {
            ("YOU WIN", Color::Green)
        } else {
            ("GAME OVER", Color::Red)
        };

        let text = vec![
            Line::from(vec![Span::styled(
                title,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.score().to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("R", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
                Span::styled(" restart  ", Style::default().fg(Color::Gray)),
                Span::styled("Q", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
                Span::styled(" quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        )
    }

    fn render_controls(&self) -> Paragraph<'static> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" to restart | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}

/// A `width` x `height` rect centred in `area`, clipped to it
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
