//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! Each tick returns a [`Schedule`] telling the driver when to tick again, and
//! [`GameEngine::scene`] produces the redraw request for any front-end.

pub mod action;
pub mod config;
pub mod engine;
pub mod scene;
pub mod state;

// Re-export commonly used types
pub use action::{Action, Direction};
pub use config::GameConfig;
pub use engine::{GameEngine, Schedule, StepInfo, StepResult};
pub use scene::{Paint, Scene, StatusLine};
pub use state::{Cell, CollisionType, Food, FoodKind, GameState, Phase, PowerUp, Snake, SpecialKind};
