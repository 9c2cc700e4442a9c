use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

use crate::game::{Direction, GameConfig, GameState};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// Keyboard-driven play at a fixed tick rate: one update and one frame per tick
pub struct HumanMode {
    state: GameState,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    pending_direction: Option<Direction>,
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Result<Self> {
        let renderer = Renderer::from_config(&config);
        let state = GameState::new(config).context("Failed to start game")?;

        Ok(Self {
            state,
            metrics: GameMetrics::new(),
            renderer,
            input_handler: InputHandler::new(),
            should_quit: false,
            pending_direction: None,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let session = TerminalSession::enter()?;

        let result = self.run_in_terminal().await;
        let restored = session.restore();

        info!(
            games = self.metrics.games_played,
            high_score = self.metrics.high_score,
            "session ended"
        );
        session_result(result, restored)
    }

    async fn run_in_terminal(&mut self) -> Result<()> {
        let backend = CrosstermBackend::new(stderr());
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        self.run_game_loop(&mut terminal).await
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut tick_timer = interval(self.state.config().tick_interval());
        tick_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                // One game tick, then one frame
                _ = tick_timer.tick() => {
                    self.tick();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.state, &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
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

        match self
            .input_handler
            .handle_key_event(key, self.state.direction())
        {
            KeyAction::Turn(direction) => {
                self.pending_direction = Some(direction);
            }
            KeyAction::Restart => {
                self.reset_game();
            }
            KeyAction::Quit => {
                self.should_quit = true;
            }
            KeyAction::None => {}
        }
    }

    fn tick(&mut self) {
        if !self.state.is_game_over() {
            let requested = self.pending_direction.take();
            let outcome = self.state.update(requested);
            self.metrics.observe(outcome, self.state.score());
        }
        self.metrics.update();
    }

    fn reset_game(&mut self) {
        debug!(score = self.state.score(), "restart requested");
        self.state.reset();
        self.metrics.on_game_start();
        self.pending_direction = None;
    }
}

/// Raw mode and the alternate screen for the length of a play session.
///
/// Dropping the guard restores the terminal on every exit path, unwinding
/// included. [`TerminalSession::restore`] does the same and reports failures.
struct TerminalSession {
    active: bool,
}

impl TerminalSession {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let session = Self { active: true };
        execute!(stderr(), EnterAlternateScreen).context("Failed to enter alternate screen")?;
        Ok(session)
    }

    fn restore(mut self) -> Result<()> {
        self.active = false;
        restore_terminal()
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if self.active {
            if let Err(err) = restore_terminal() {
                warn!(error = %err, "failed to restore terminal");
            }
        }
    }
}

/// Undo every terminal change; each step runs even if an earlier one failed
fn restore_terminal() -> Result<()> {
    let raw = disable_raw_mode().context("Failed to disable raw mode");
    let screen = execute!(stderr(), LeaveAlternateScreen, cursor::Show)
        .context("Failed to leave alternate screen");
    raw.and(screen)
}

/// The game loop's error takes precedence over a failed terminal restore
fn session_result(outcome: Result<()>, restored: Result<()>) -> Result<()> {
    match (outcome, restored) {
        (Err(err), Err(restore_err)) => {
            warn!(error = %restore_err, "failed to restore terminal");
            Err(err)
        }
        (outcome, restored) => outcome.and(restored),
    }
}
