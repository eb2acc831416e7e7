use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use log::info;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{Instant, interval, sleep};

use crate::game::{Action, Direction, GameConfig, GameEngine, GameState, Schedule};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// Keyboard play in the terminal
///
/// The engine decides when the next tick happens; this driver only waits.
pub struct HumanMode {
    engine: GameEngine,
    state: GameState,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    pending_direction: Option<Direction>,
    /// Cleared when the engine asks to stop
    ticking: bool,
    /// Set by a restart so the loop re-arms the tick timer
    rearm: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Self {
        let mut engine = GameEngine::new(config);
        let state = engine.reset();

        Self {
            engine,
            state,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
            pending_direction: None,
            ticking: true,
            rearm: false,
        }
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

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let tick = sleep(self.engine.interval(&self.state));
        tokio::pin!(tick);

        // Render at 30 FPS (33ms per frame)
        let mut render_timer = interval(Duration::from_millis(33));

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                // Game logic tick, re-armed with whatever delay the engine asks for
                _ = &mut tick, if self.ticking => {
                    match self.update_game() {
                        Schedule::After(delay) => tick.as_mut().reset(Instant::now() + delay),
                        Schedule::Stop => self.ticking = false,
                    }
                }

                _ = render_timer.tick() => {
                    self.metrics.update();
                    let scene = self.engine.scene(&self.state);
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &scene, &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.rearm {
                self.rearm = false;
                tick.as_mut()
                    .reset(Instant::now() + self.engine.interval(&self.state));
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };

        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return;
        }

        match self.input_handler.handle_key_event(key) {
            KeyAction::GameAction(Action::Move(dir)) => {
                self.pending_direction = Some(dir);
            }
            KeyAction::GameAction(Action::Continue) | KeyAction::None => {}
            KeyAction::Restart => self.reset_game(),
            KeyAction::Quit => self.should_quit = true,
        }
    }

    /// Run one tick with the latest pending direction
    fn update_game(&mut self) -> Schedule {
        let action = self
            .pending_direction
            .take()
            .map(Action::Move)
            .unwrap_or(Action::Continue);

        let result = self.engine.step(&mut self.state, action);

        if result.terminated {
            self.metrics
                .on_game_over(self.state.score, self.state.snake.len());
        }

        result.schedule
    }

    fn reset_game(&mut self) {
        info!(
            "restart after {} ticks with score {}",
            self.state.ticks, self.state.score
        );
        self.state = self.engine.reset();
        self.metrics.on_game_start();
        self.pending_direction = None;
        self.ticking = true;
        self.rearm = true;
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
