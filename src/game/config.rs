use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use super::action::Direction;
use super::state::{Cell, SpecialKind};

/// Configuration for the game
///
/// Coordinates are in playfield units; a cell is `cell_size` units wide.
/// Every field has a default, so a JSON config file only needs the fields it
/// wants to change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Size of one grid step
    pub cell_size: i32,
    /// Lower playfield bound (exclusive)
    pub bound_min: i32,
    /// Upper playfield bound (exclusive)
    pub bound_max: i32,
    /// Food and obstacles spawn on `-spawn_extent..spawn_extent` cells per axis
    pub spawn_extent: i32,
    /// Where the one-cell snake starts
    pub start_cell: Cell,
    /// Heading at session start
    pub start_direction: Direction,

    // Speed
    /// Tick interval at session start
    pub initial_interval_ms: u64,
    /// The base interval never drops below this
    pub min_interval_ms: u64,
    /// Interval reduction per speed-up
    pub speed_step_ms: u64,
    /// A speed-up happens each time the score crosses a multiple of this
    pub speed_up_every: u32,

    // Obstacles
    pub obstacle_count_min: usize,
    pub obstacle_count_max: usize,

    // Special food
    /// Chance of arming a special food after eating is 1 in `special_food_odds`
    pub special_food_odds: u32,
    /// Ticks an armed special food stays before reverting to normal food
    pub special_food_ticks_min: u32,
    pub special_food_ticks_max: u32,

    // Power-up effects
    /// Interval reduction while a speed boost is active
    pub speed_boost_ms: u64,
    /// Interval increase while a slow down is active
    pub slow_down_ms: u64,
    pub speed_boost_ticks: u32,
    pub slow_down_ticks: u32,
    pub double_points_ticks: u32,
    pub invincible_ticks: u32,
    /// Points for eating an invincibility food
    pub invincible_bonus: u32,

    // Rules
    /// Reject an exact 180-degree turn instead of applying it
    pub block_reversal: bool,
    /// Re-roll food placement that lands on an obstacle
    pub food_avoids_obstacles: bool,
    /// Seed for a reproducible session
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            cell_size: 10,
            bound_min: -200,
            bound_max: 190,
            spawn_extent: 15,
            start_cell: Cell::new(10, 0),
            start_direction: Direction::Down,
            initial_interval_ms: 100,
            min_interval_ms: 40,
            speed_step_ms: 5,
            speed_up_every: 3,
            obstacle_count_min: 4,
            obstacle_count_max: 7,
            special_food_odds: 5,
            special_food_ticks_min: 50,
            special_food_ticks_max: 100,
            speed_boost_ms: 30,
            slow_down_ms: 40,
            speed_boost_ticks: 60,
            slow_down_ticks: 60,
            double_points_ticks: 80,
            invincible_ticks: 40,
            invincible_bonus: 3,
            block_reversal: false,
            food_avoids_obstacles: false,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Default configuration with a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Default::default()
        }
    }

    /// Load a configuration from a JSON file
    ///
    /// Missing fields fall back to their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: GameConfig = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        Ok(config)
    }

    /// How long a power-up of this kind lasts, in ticks
    pub fn effect_ticks(&self, kind: SpecialKind) -> u32 {
        match kind {
            SpecialKind::SpeedBoost => self.speed_boost_ticks,
            SpecialKind::SlowDown => self.slow_down_ticks,
            SpecialKind::DoublePoints => self.double_points_ticks,
            SpecialKind::Invincible => self.invincible_ticks,
        }
    }

    pub fn initial_interval(&self) -> Duration {
        Duration::from_millis(self.initial_interval_ms)
    }

    /// Whether a coordinate lies strictly inside the playfield
    pub fn in_bounds(&self, v: i32) -> bool {
        self.bound_min < v && v < self.bound_max
    }

    /// Validate configuration parameters
    ///
    /// Returns `Err` with a message naming the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.cell_size <= 0 {
            return Err(format!("cell_size must be positive, got {}", self.cell_size));
        }

        if self.bound_min >= self.bound_max {
            return Err(format!(
                "bound_min ({}) must be below bound_max ({})",
                self.bound_min, self.bound_max
            ));
        }

        if self.spawn_extent <= 0 {
            return Err(format!(
                "spawn_extent must be positive, got {}",
                self.spawn_extent
            ));
        }

        let spawn_span = (-self.spawn_extent)
            .checked_mul(self.cell_size)
            .zip((self.spawn_extent - 1).checked_mul(self.cell_size));
        let Some((low, high)) = spawn_span else {
            return Err(format!(
                "spawn_extent ({}) times cell_size ({}) overflows",
                self.spawn_extent, self.cell_size
            ));
        };
        if !self.in_bounds(low) || !self.in_bounds(high) {
            return Err(format!(
                "spawn area [{}, {}] must lie inside the playfield ({}, {})",
                low, high, self.bound_min, self.bound_max
            ));
        }

        if !self.in_bounds(self.start_cell.x) || !self.in_bounds(self.start_cell.y) {
            return Err(format!(
                "start_cell ({}, {}) is outside the playfield",
                self.start_cell.x, self.start_cell.y
            ));
        }

        if self.min_interval_ms == 0 {
            return Err("min_interval_ms must be at least 1".to_string());
        }

        if self.min_interval_ms > self.initial_interval_ms {
            return Err(format!(
                "min_interval_ms ({}) cannot exceed initial_interval_ms ({})",
                self.min_interval_ms, self.initial_interval_ms
            ));
        }

        if self.speed_up_every == 0 {
            return Err("speed_up_every must be at least 1".to_string());
        }

        if self.obstacle_count_min > self.obstacle_count_max {
            return Err(format!(
                "obstacle_count_min ({}) cannot exceed obstacle_count_max ({})",
                self.obstacle_count_min, self.obstacle_count_max
            ));
        }

        // Spawn cells minus origin, start and food must leave room for every obstacle
        let spawn_cells = (2 * self.spawn_extent as usize).pow(2);
        if self.obstacle_count_max + 3 > spawn_cells {
            return Err(format!(
                "obstacle_count_max ({}) does not fit in the spawn area",
                self.obstacle_count_max
            ));
        }

        if self.special_food_odds == 0 {
            return Err("special_food_odds must be at least 1".to_string());
        }

        if self.special_food_ticks_min == 0
            || self.special_food_ticks_min > self.special_food_ticks_max
        {
            return Err(format!(
                "special food ticks must satisfy 1 <= min <= max, got {}..={}",
                self.special_food_ticks_min, self.special_food_ticks_max
            ));
        }

        for kind in SpecialKind::ALL {
            if self.effect_ticks(kind) == 0 {
                return Err(format!("{} duration must be at least 1 tick", kind.name()));
            }
        }

        Ok(())
    }
}
