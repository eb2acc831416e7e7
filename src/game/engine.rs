use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::time::Duration;

use super::{
    action::Action,
    config::GameConfig,
    scene::{Paint, Scene, StatusLine},
    state::{Cell, CollisionType, Food, FoodKind, GameState, Phase, PowerUp, Snake, SpecialKind},
};

/// What the driver should do after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Run the next tick after this delay
    After(Duration),
    /// The session is over; stop ticking
    Stop,
}

/// Information about a step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Points awarded this step
    pub points: u32,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
    /// Power-up started by the food eaten this step
    pub effect_started: Option<SpecialKind>,
    /// Power-up that ran out this step
    pub effect_ended: Option<SpecialKind>,
    /// Special food armed this step
    pub special_armed: Option<SpecialKind>,
    /// An uneaten special food reverted to normal food this step
    pub special_expired: bool,
    /// Number of speed-ups applied this step
    pub speed_ups: u32,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Whether the game has terminated
    pub terminated: bool,
    /// When to run the next tick
    pub schedule: Schedule,
    /// Additional information about the step
    pub info: StepInfo,
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { config, rng }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Start a fresh session
    pub fn reset(&mut self) -> GameState {
        let start = self.config.start_cell;
        let food = Food::normal(Cell::new(0, 0));
        let snake = Snake::new(start, self.config.start_direction);
        let obstacles = self.generate_obstacles(start, food.cell);

        debug!(
            "new session: start {:?}, {} obstacles",
            start,
            obstacles.len()
        );

        GameState::new(snake, food, obstacles, self.config.initial_interval())
    }

    /// Apply a heading change without advancing the game
    pub fn turn(&self, state: &mut GameState, action: Action) {
        if let Action::Move(direction) = action {
            if self.config.block_reversal && state.snake.direction.is_opposite(direction) {
                return;
            }
            state.snake.direction = direction;
        }
    }

    /// Execute one tick of the game
    pub fn step(&mut self, state: &mut GameState, action: Action) -> StepResult {
        if !state.is_running() {
            return StepResult {
                terminated: true,
                schedule: Schedule::Stop,
                info: StepInfo::default(),
            };
        }

        self.turn(state, action);

        let new_head = state.snake.next_head(self.config.cell_size);

        if !state.is_invincible() {
            if let Some(collision_type) = self.check_collision(state, new_head) {
                info!(
                    "game over: {:?} at {:?}, score {}, length {}",
                    collision_type,
                    new_head,
                    state.score,
                    state.snake.len()
                );
                state.phase = Phase::GameOver {
                    crash: new_head,
                    collision: collision_type,
                };
                state.ticks += 1;

                return StepResult {
                    terminated: true,
                    schedule: Schedule::Stop,
                    info: StepInfo {
                        collision_type: Some(collision_type),
                        ..Default::default()
                    },
                };
            }
        }

        state.snake.push_head(new_head);

        let mut info = StepInfo::default();

        if new_head == state.food.cell {
            self.eat(state, &mut info);
        } else {
            state.snake.pop_tail();
            // Food left under the body when the spawn area was full
            if state.snake.contains(state.food.cell) {
                self.relocate_food(state);
            }
        }

        // Timers do not advance on the tick that set them
        if info.special_armed.is_none() {
            self.advance_special_food(state, &mut info);
        }
        if info.effect_started.is_none() {
            Self::advance_power_up(state, &mut info);
        }

        state.ticks += 1;

        StepResult {
            terminated: false,
            schedule: Schedule::After(self.interval(state)),
            info,
        }
    }

    /// Current tick interval, including any power-up adjustment
    pub fn interval(&self, state: &GameState) -> Duration {
        let base = state.base_interval;
        match state.active_effect() {
            Some(SpecialKind::SpeedBoost) => base
                .saturating_sub(Duration::from_millis(self.config.speed_boost_ms))
                .max(Duration::from_millis(self.config.min_interval_ms)),
            Some(SpecialKind::SlowDown) => {
                base + Duration::from_millis(self.config.slow_down_ms)
            }
            _ => base,
        }
    }

    /// Build the redraw request for the current state
    pub fn scene(&self, state: &GameState) -> Scene {
        let mut cells = Vec::with_capacity(state.obstacles.len() + state.snake.len() + 1);

        cells.extend(state.obstacles.iter().map(|&cell| (cell, Paint::Obstacle)));

        let food_paint = match state.food.special_kind() {
            Some(kind) => Paint::SpecialFood(kind),
            None => Paint::Food,
        };
        cells.push((state.food.cell, food_paint));

        let head = state.snake.head();
        let body_len = state.snake.len() - 1;
        cells.extend(
            state
                .snake
                .body
                .iter()
                .take(body_len)
                .map(|&cell| (cell, Paint::SnakeBody)),
        );
        cells.push((head, Paint::SnakeHead));

        Scene {
            bounds: (self.config.bound_min, self.config.bound_max),
            cell_size: self.config.cell_size,
            cells,
            crash: state.crash(),
            status: StatusLine {
                length: state.snake.len(),
                score: state.score,
                effect: state.active_effect().map(|kind| kind.name()),
                interval: self.interval(state),
            },
        }
    }

    /// Check if the new head position causes a collision
    fn check_collision(&self, state: &GameState, cell: Cell) -> Option<CollisionType> {
        if !self.config.in_bounds(cell.x) || !self.config.in_bounds(cell.y) {
            return Some(CollisionType::Wall);
        }

        if state.is_obstacle(cell) {
            return Some(CollisionType::Obstacle);
        }

        if state.snake.contains(cell) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    fn eat(&mut self, state: &mut GameState, info: &mut StepInfo) {
        info.ate_food = true;

        let eaten = state.food.special_kind();
        let mut points = match eaten {
            Some(SpecialKind::Invincible) => self.config.invincible_bonus,
            _ => 1,
        };

        if let Some(kind) = eaten {
            self.start_power_up(state, kind);
            info.effect_started = Some(kind);
        }

        points *= state.score_multiplier();
        let previous = state.score;
        state.score += points;
        info.points = points;

        info!("Snake: {} (score {})", state.snake.len(), state.score);

        state.food.kind = FoodKind::Normal;
        self.relocate_food(state);

        // The eaten food was the only special that could be armed
        if self.rng.gen_ratio(1, self.config.special_food_odds) {
            let kind = SpecialKind::ALL[self.rng.gen_range(0..SpecialKind::ALL.len())];
            let ticks_left = self
                .rng
                .gen_range(self.config.special_food_ticks_min..=self.config.special_food_ticks_max);
            state.food.kind = FoodKind::Special { kind, ticks_left };
            info.special_armed = Some(kind);
            debug!(
                "special food {} at {:?} for {} ticks",
                kind.name(),
                state.food.cell,
                ticks_left
            );
        }

        info.speed_ups = self.speed_up(state, previous);
    }

    /// Lower the base interval once per multiple of `speed_up_every` crossed
    fn speed_up(&self, state: &mut GameState, previous_score: u32) -> u32 {
        let every = self.config.speed_up_every;
        let crossed = state.score / every - previous_score / every;
        let floor = Duration::from_millis(self.config.min_interval_ms);
        let step = Duration::from_millis(self.config.speed_step_ms);

        for _ in 0..crossed {
            state.base_interval = state.base_interval.saturating_sub(step).max(floor);
        }

        if crossed > 0 {
            info!(
                "Speed increased! Current interval: {}ms",
                state.base_interval.as_millis()
            );
        }
        crossed
    }

    fn start_power_up(&self, state: &mut GameState, kind: SpecialKind) {
        if let Some(previous) = state.power_up {
            debug!("{} replaced by {}", previous.kind.name(), kind.name());
        }
        let ticks_left = self.config.effect_ticks(kind);
        info!("power-up {} for {} ticks", kind.name(), ticks_left);
        state.power_up = Some(PowerUp { kind, ticks_left });
    }

    fn advance_special_food(&mut self, state: &mut GameState, info: &mut StepInfo) {
        let expired = match &mut state.food.kind {
            FoodKind::Special { ticks_left, .. } => {
                *ticks_left = ticks_left.saturating_sub(1);
                *ticks_left == 0
            }
            FoodKind::Normal => false,
        };

        if expired {
            state.food.kind = FoodKind::Normal;
            self.relocate_food(state);
            info.special_expired = true;
            debug!("special food expired, food moved to {:?}", state.food.cell);
        }
    }

    fn advance_power_up(state: &mut GameState, info: &mut StepInfo) {
        let Some(power_up) = state.power_up.as_mut() else {
            return;
        };

        power_up.ticks_left = power_up.ticks_left.saturating_sub(1);
        if power_up.ticks_left == 0 {
            let kind = power_up.kind;
            state.power_up = None;
            info.effect_ended = Some(kind);
            info!("power-up {} ended", kind.name());
        }
    }

    /// Generate the session's obstacles away from the start and food cells
    fn generate_obstacles(&mut self, start: Cell, food: Cell) -> Vec<Cell> {
        let count = self
            .rng
            .gen_range(self.config.obstacle_count_min..=self.config.obstacle_count_max);
        let mut obstacles = Vec::with_capacity(count);

        while obstacles.len() < count {
            let cell = self.random_spawn_cell();
            if cell == Cell::new(0, 0) || cell == start || cell == food || obstacles.contains(&cell)
            {
                continue;
            }
            obstacles.push(cell);
        }

        obstacles
    }

    /// Move the food to a free spawn cell
    ///
    /// With no free cell the food stays where it is and the move is retried
    /// on a later tick. Returns whether the food moved.
    fn relocate_food(&mut self, state: &mut GameState) -> bool {
        match self.random_food_cell(state) {
            Some(cell) => {
                state.food.cell = cell;
                true
            }
            None => {
                debug!("no free spawn cell, food stays at {:?}", state.food.cell);
                false
            }
        }
    }

    /// Pick a spawn cell for food that is not on the snake
    fn random_food_cell(&mut self, state: &GameState) -> Option<Cell> {
        let extent = self.config.spawn_extent;
        let size = self.config.cell_size;
        let free: Vec<Cell> = (-extent..extent)
            .flat_map(|x| (-extent..extent).map(move |y| Cell::new(x * size, y * size)))
            .filter(|&cell| !state.snake.contains(cell))
            .filter(|&cell| !(self.config.food_avoids_obstacles && state.is_obstacle(cell)))
            .collect();

        free.choose(&mut self.rng).copied()
    }

    fn random_spawn_cell(&mut self) -> Cell {
        let extent = self.config.spawn_extent;
        let x = self.rng.gen_range(-extent..extent) * self.config.cell_size;
        let y = self.rng.gen_range(-extent..extent) * self.config.cell_size;
        Cell::new(x, y)
    }
}
