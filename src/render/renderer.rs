use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{Cell, Paint, Scene, SpecialKind};
use crate::metrics::GameMetrics;

/// Paints a [`Scene`] into a ratatui frame
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, scene: &Scene, metrics: &GameMetrics) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Playfield
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(scene, metrics), chunks[0]);
        frame.render_widget(self.render_grid(scene), chunks[1]);

        let footer = if scene.is_game_over() {
            self.render_game_over(scene)
        } else {
            self.render_controls()
        };
        frame.render_widget(footer, chunks[2]);
    }

    /// One line per row, top row first
    ///
    /// The playfield is framed by a ring of wall cells on the exclusive
    /// bounds, so a crash into the wall is still visible.
    pub fn grid_lines(&self, scene: &Scene) -> Vec<Line<'static>> {
        let (low, high) = scene.bounds;
        let columns: Vec<i32> = (low..=high).step_by(scene.cell_size as usize).collect();
        let is_wall = |v: i32| v <= low || v >= high;

        columns
            .iter()
            .rev()
            .map(|&y| {
                let spans: Vec<Span<'static>> = columns
                    .iter()
                    .map(|&x| {
                        let cell = Cell::new(x, y);
                        match scene.paint_at(cell) {
                            None if is_wall(x) || is_wall(y) => Self::wall_span(),
                            paint => Self::cell_span(paint),
                        }
                    })
                    .collect();
                Line::from(spans)
            })
            .collect()
    }

    fn wall_span() -> Span<'static> {
        Span::styled("░ ", Style::default().fg(Color::DarkGray))
    }

    fn render_grid(&self, scene: &Scene) -> Paragraph<'static> {
        let border = if scene.is_game_over() {
            Color::Red
        } else {
            Color::White
        };

        Paragraph::new(self.grid_lines(scene))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(border))
                    .title(" Snake "),
            )
            .alignment(Alignment::Center)
    }

    fn cell_span(paint: Option<Paint>) -> Span<'static> {
        let Some(paint) = paint else {
            return Span::styled(". ", Style::default().fg(Color::DarkGray));
        };

        match paint {
            Paint::SnakeHead => Span::styled(
                "■ ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Paint::SnakeBody => Span::styled("□ ", Style::default().fg(Color::Cyan)),
            Paint::Food => Span::styled(
                "● ",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Paint::SpecialFood(kind) => Span::styled(
                "◆ ",
                Style::default()
                    .fg(Self::special_color(kind))
                    .add_modifier(Modifier::BOLD),
            ),
            Paint::Obstacle => Span::styled("█ ", Style::default().fg(Color::Gray)),
            Paint::Crash => Span::styled(
                "✖ ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
        }
    }

    pub fn special_color(kind: SpecialKind) -> Color {
        match kind {
            SpecialKind::SpeedBoost => Color::Yellow,
            SpecialKind::SlowDown => Color::Blue,
            SpecialKind::DoublePoints => Color::Magenta,
            SpecialKind::Invincible => Color::LightRed,
        }
    }

    fn render_stats(&self, scene: &Scene, metrics: &GameMetrics) -> Paragraph<'static> {
        let status = &scene.status;
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let mut spans = vec![
            Span::styled("Score: ", label),
            Span::styled(
                status.score.to_string(),
                value.add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Length: ", label),
            Span::styled(status.length.to_string(), value),
            Span::raw("    "),
            Span::styled("Speed: ", label),
            Span::styled(format!("{}ms", status.interval.as_millis()), value),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(metrics.high_score.to_string(), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), value),
        ];

        if let Some(effect) = status.effect {
            spans.push(Span::raw("    "));
            spans.push(Span::styled("Effect: ", label));
            spans.push(Span::styled(
                effect,
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }

    fn render_game_over(&self, scene: &Scene) -> Paragraph<'static> {
        let text = Line::from(vec![
            Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled("  Final Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                scene.status.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  Press ", Style::default().fg(Color::Gray)),
            Span::styled(
                "R",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
            Span::styled(
                "Q",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to quit", Style::default().fg(Color::Gray)),
        ]);

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_controls(&self) -> Paragraph<'static> {
        let text = Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" to restart | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ]);

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Action, Direction as Heading, GameConfig, GameEngine, Snake};
    use ratatui::{Terminal, backend::TestBackend};

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn test_grid_covers_playfield_and_walls() {
        let mut engine = GameEngine::new(GameConfig::seeded(3));
        let state = engine.reset();
        let lines = Renderer::new().grid_lines(&engine.scene(&state));

        // Cells -190..=180 on each axis plus the wall ring at -200 and 190
        assert_eq!(lines.len(), 40);
        assert!(lines.iter().all(|line| line.spans.len() == 40));
        assert!(line_text(&lines[0]).chars().step_by(2).all(|c| c == '░'));
        assert_eq!(line_text(&lines[20]).chars().next(), Some('░'));
    }

    #[test]
    fn test_grid_flips_y_axis() {
        let mut engine = GameEngine::new(GameConfig::seeded(3));
        let state = engine.reset();
        let lines = Renderer::new().grid_lines(&engine.scene(&state));

        // Head at (10, 0): row for y = 0 is 19 rows below y = 190, column 21 from x = -200
        let head_row = line_text(&lines[19]);
        assert_eq!(head_row.chars().nth(42), Some('■'));
        // Food at origin, one column to the left
        assert_eq!(head_row.chars().nth(40), Some('●'));
    }

    #[test]
    fn test_wall_crash_marker_drawn() {
        let mut engine = GameEngine::new(GameConfig::seeded(3));
        let mut state = engine.reset();
        state.obstacles.clear();
        state.snake = Snake::new(Cell::new(180, 180), Heading::Up);
        engine.step(&mut state, Action::Continue);

        let scene = engine.scene(&state);
        assert_eq!(scene.crash, Some(Cell::new(180, 190)));

        // Crash sits in the top wall row, one column in from the right wall
        let lines = Renderer::new().grid_lines(&scene);
        assert_eq!(line_text(&lines[0]).chars().nth(76), Some('✖'));

        let backend = TestBackend::new(100, 48);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| Renderer::new().render(frame, &scene, &GameMetrics::new()))
            .unwrap();
    }

    #[test]
    fn test_special_colors_are_distinct() {
        let colors: Vec<Color> = SpecialKind::ALL
            .iter()
            .map(|&kind| Renderer::special_color(kind))
            .collect();
        for (i, color) in colors.iter().enumerate() {
            assert!(!colors[i + 1..].contains(color));
        }
    }
}
