//! Redraw request handed to whatever front-end paints the playfield.

use std::time::Duration;

use super::state::{Cell, SpecialKind};

/// What to paint on a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    SnakeHead,
    SnakeBody,
    Food,
    SpecialFood(SpecialKind),
    Obstacle,
    /// Where the head crashed on game over
    Crash,
}

/// Informational status text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub length: usize,
    pub score: u32,
    pub effect: Option<&'static str>,
    pub interval: Duration,
}

/// Full list of cells to paint, in paint order (later entries on top)
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// Exclusive playfield bounds, shared by both axes
    pub bounds: (i32, i32),
    pub cell_size: i32,
    pub cells: Vec<(Cell, Paint)>,
    pub crash: Option<Cell>,
    pub status: StatusLine,
}

impl Scene {
    /// Topmost paint at a cell, if any
    pub fn paint_at(&self, cell: Cell) -> Option<Paint> {
        if self.crash == Some(cell) {
            return Some(Paint::Crash);
        }
        self.cells
            .iter()
            .rev()
            .find(|(c, _)| *c == cell)
            .map(|(_, paint)| *paint)
    }

    pub fn is_game_over(&self) -> bool {
        self.crash.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> Scene {
        Scene {
            bounds: (-200, 190),
            cell_size: 10,
            cells: vec![
                (Cell::new(0, 0), Paint::Food),
                (Cell::new(0, 0), Paint::SnakeBody),
                (Cell::new(10, 0), Paint::SnakeHead),
            ],
            crash: None,
            status: StatusLine {
                length: 2,
                score: 0,
                effect: None,
                interval: Duration::from_millis(100),
            },
        }
    }

    #[test]
    fn test_later_paint_wins() {
        let scene = scene();
        assert_eq!(scene.paint_at(Cell::new(0, 0)), Some(Paint::SnakeBody));
        assert_eq!(scene.paint_at(Cell::new(10, 0)), Some(Paint::SnakeHead));
        assert_eq!(scene.paint_at(Cell::new(50, 50)), None);
    }

    #[test]
    fn test_crash_marker_on_top() {
        let mut scene = scene();
        scene.crash = Some(Cell::new(10, 0));
        assert!(scene.is_game_over());
        assert_eq!(scene.paint_at(Cell::new(10, 0)), Some(Paint::Crash));
    }
}
