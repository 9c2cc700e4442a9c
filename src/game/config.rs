use std::time::Duration;

use anyhow::{Result, bail, ensure};
use serde::{Deserialize, Serialize};

use crate::rl::observation::GRID_CHANNELS;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Width of the game grid, in cells
    pub grid_width: usize,
    /// Height of the game grid, in cells
    pub grid_height: usize,
    /// Edge length of one cell in pixels
    pub cell_size: u32,
    /// Ticks per second of the play loop
    pub fps: u32,
    /// Seed for food placement; `None` draws one from the OS
    pub seed: Option<u64>,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Episode cap for headless drivers
    pub max_steps: Option<u32>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 20,
            grid_height: 20,
            cell_size: 20,
            fps: 10,
            seed: None,
            initial_snake_length: 3,
            max_steps: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    pub fn with_cell_size(mut self, cell_size: u32) -> Self {
        self.cell_size = cell_size;
        self
    }

    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    /// Reject boards the engine cannot start a game on.
    ///
    /// The snake is laid out leftwards from the centre column, so the
    /// initial length is bounded by `width / 2 + 1`, and at least one cell
    /// must stay free for food.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.grid_width > 0 && self.grid_height > 0,
            "grid must be at least 1x1, got {}x{}",
            self.grid_width,
            self.grid_height
        );
        ensure!(self.fps > 0, "fps must be positive");
        ensure!(self.cell_size > 0, "cell size must be positive");
        ensure!(
            self.initial_snake_length > 0,
            "initial snake length must be positive"
        );
        ensure!(
            self.initial_snake_length <= self.grid_width / 2 + 1,
            "initial snake length {} does not fit left of the centre column of a {}-wide grid",
            self.initial_snake_length,
            self.grid_width
        );
        ensure!(
            i32::try_from(self.grid_width).is_ok() && i32::try_from(self.grid_height).is_ok(),
            "grid dimensions {}x{} exceed the addressable range",
            self.grid_width,
            self.grid_height
        );
        let cells = self
            .grid_width
            .checked_mul(self.grid_height)
            .filter(|cells| cells.checked_mul(GRID_CHANNELS).is_some());
        let Some(cells) = cells else {
            bail!(
                "a {}x{} grid is too large to encode",
                self.grid_width,
                self.grid_height
            );
        };
        ensure!(
            cells > self.initial_snake_length,
            "a {}x{} grid leaves no room for food next to a snake of length {}",
            self.grid_width,
            self.grid_height,
            self.initial_snake_length
        );
        Ok(())
    }

    /// Time between two ticks of the play loop
    pub fn tick_interval(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / u64::from(self.fps.max(1)))
    }
}
