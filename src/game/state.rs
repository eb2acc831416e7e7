use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

use super::action::Direction;

/// A cell on the playfield, in playfield units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move cell by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move one grid step of `step` units in a direction
    pub fn stepped(&self, direction: Direction, step: i32) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx * step, dy * step)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, oldest first, head at the back
    pub body: VecDeque<Cell>,
    /// Current heading
    pub direction: Direction,
}

impl Snake {
    /// Create a one-cell snake
    pub fn new(head: Cell, direction: Direction) -> Self {
        Self {
            body: VecDeque::from([head]),
            direction,
        }
    }

    /// Create a snake from segments listed oldest first
    ///
    /// # Panics
    ///
    /// Panics if `cells` is empty; a snake always has a head.
    pub fn from_cells(cells: impl IntoIterator<Item = Cell>, direction: Direction) -> Self {
        let body: VecDeque<Cell> = cells.into_iter().collect();
        assert!(!body.is_empty(), "a snake needs at least one cell");
        Self { body, direction }
    }

    pub fn head(&self) -> Cell {
        // Every tick pushes a head before popping the tail, so the body is never empty
        *self.body.back().expect("snake has no segments")
    }

    /// Cell the head moves into on the next tick
    pub fn next_head(&self, step: i32) -> Cell {
        self.head().stepped(self.direction, step)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Append a new head
    pub fn push_head(&mut self, cell: Cell) {
        self.body.push_back(cell);
    }

    /// Drop the oldest segment
    pub fn pop_tail(&mut self) -> Option<Cell> {
        self.body.pop_front()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// The four timed power-up foods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialKind {
    SpeedBoost,
    SlowDown,
    DoublePoints,
    Invincible,
}

impl SpecialKind {
    pub const ALL: [SpecialKind; 4] = [
        SpecialKind::SpeedBoost,
        SpecialKind::SlowDown,
        SpecialKind::DoublePoints,
        SpecialKind::Invincible,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SpecialKind::SpeedBoost => "speed_boost",
            SpecialKind::SlowDown => "slow_down",
            SpecialKind::DoublePoints => "double_points",
            SpecialKind::Invincible => "invincible",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoodKind {
    Normal,
    /// Special food reverting to normal after `ticks_left` ticks
    Special { kind: SpecialKind, ticks_left: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Food {
    pub cell: Cell,
    pub kind: FoodKind,
}

impl Food {
    pub fn normal(cell: Cell) -> Self {
        Self {
            cell,
            kind: FoodKind::Normal,
        }
    }

    pub fn special_kind(&self) -> Option<SpecialKind> {
        match self.kind {
            FoodKind::Special { kind, .. } => Some(kind),
            FoodKind::Normal => None,
        }
    }

    pub fn is_special(&self) -> bool {
        self.special_kind().is_some()
    }
}

/// The active power-up effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerUp {
    pub kind: SpecialKind,
    pub ticks_left: u32,
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Head left the playfield
    Wall,
    /// Head hit an obstacle
    Obstacle,
    /// Head hit the snake's own body
    SelfCollision,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    /// Terminal; `crash` is the cell the head tried to enter
    GameOver { crash: Cell, collision: CollisionType },
}

/// Complete game state for one session
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Food,
    pub obstacles: Vec<Cell>,
    pub score: u32,
    /// Interval without power-up adjustments; only ever decreases
    pub base_interval: Duration,
    pub power_up: Option<PowerUp>,
    pub ticks: u64,
    pub phase: Phase,
}

impl GameState {
    /// Create a new running state
    pub fn new(snake: Snake, food: Food, obstacles: Vec<Cell>, base_interval: Duration) -> Self {
        Self {
            snake,
            food,
            obstacles,
            score: 0,
            base_interval,
            power_up: None,
            ticks: 0,
            phase: Phase::Running,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn is_obstacle(&self, cell: Cell) -> bool {
        self.obstacles.contains(&cell)
    }

    pub fn active_effect(&self) -> Option<SpecialKind> {
        self.power_up.map(|p| p.kind)
    }

    pub fn is_invincible(&self) -> bool {
        self.active_effect() == Some(SpecialKind::Invincible)
    }

    /// Multiplier applied to food points
    pub fn score_multiplier(&self) -> u32 {
        if self.active_effect() == Some(SpecialKind::DoublePoints) {
            2
        } else {
            1
        }
    }

    pub fn crash(&self) -> Option<Cell> {
        match self.phase {
            Phase::GameOver { crash, .. } => Some(crash),
            Phase::Running => None,
        }
    }
}
