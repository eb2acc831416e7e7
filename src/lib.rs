//! Power Snake - Snake with speed-up, obstacles and timed power-up food
//!
//! This library provides:
//! - Core game logic (game module), free of I/O and timers
//! - Keyboard mapping (input module)
//! - TUI rendering of redraw requests (render module)
//! - Session metrics (metrics module)
//! - The terminal play driver (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
