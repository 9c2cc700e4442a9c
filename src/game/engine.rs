use std::collections::HashSet;

use anyhow::{Result, ensure};
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
use tracing::{debug, info};

use super::{
    action::Direction,
    config::GameConfig,
    state::{CollisionType, Position, Snake},
};
use crate::rl::observation::{DangerFeatures, GridObservation};

/// What a single tick did to the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The snake moved one cell without eating
    Moved,
    /// The snake ate the food and grew by one cell
    Ate,
    /// The snake ate the last food there was room for and now fills the board
    Won,
    /// The snake hit a wall or itself; the game is over
    Collision(CollisionType),
    /// The game was already over, nothing changed
    Finished,
}

impl StepOutcome {
    /// Returns true if the game is over after this tick
    pub fn is_terminal(&self) -> bool {
        !matches!(self, StepOutcome::Moved | StepOutcome::Ate)
    }

    pub fn ate_food(&self) -> bool {
        matches!(self, StepOutcome::Ate | StepOutcome::Won)
    }
}

/// The game engine: owns the board, the snake, the food and the RNG used to
/// place it. All mutation goes through [`GameState::reset`] and
/// [`GameState::update`].
#[derive(Debug, Clone)]
pub struct GameState {
    config: GameConfig,
    snake: Snake,
    food: Option<Position>,
    score: u32,
    steps: u32,
    game_over: bool,
    won: bool,
    rng: StdRng,
}

impl GameState {
    /// Create a new game from a validated configuration and start it
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let snake = Self::initial_snake(&config);

        let mut state = Self {
            config,
            snake,
            food: None,
            score: 0,
            steps: 0,
            game_over: false,
            won: false,
            rng,
        };
        state.reset();
        Ok(state)
    }

    /// Create a game from an explicit layout instead of the centred start.
    ///
    /// `body` lists the snake from head to tail. The layout must be on the
    /// board, self-avoiding and connected, and the food must be on a free cell.
    pub fn with_snake(
        config: GameConfig,
        body: Vec<Position>,
        direction: Direction,
        food: Position,
    ) -> Result<Self> {
        ensure!(!body.is_empty(), "snake needs at least one cell");

        let mut state = Self::new(config)?;
        for pos in &body {
            ensure!(state.is_in_bounds(*pos), "snake cell {pos:?} is off the board");
        }
        let distinct: HashSet<Position> = body.iter().copied().collect();
        ensure!(distinct.len() == body.len(), "snake cells must be distinct");
        ensure!(
            body.windows(2).all(|pair| pair[0].is_adjacent(pair[1])),
            "consecutive snake cells must share an edge"
        );
        ensure!(state.is_in_bounds(food), "food {food:?} is off the board");
        ensure!(!distinct.contains(&food), "food {food:?} is on the snake");

        state.snake = Snake { body, direction };
        state.food = Some(food);
        Ok(state)
    }

    fn initial_snake(config: &GameConfig) -> Snake {
        let center_row = (config.grid_height / 2) as i32;
        let center_col = (config.grid_width / 2) as i32;

        Snake::new(
            Position::new(center_row, center_col),
            Direction::Right,
            config.initial_snake_length,
        )
    }

    /// Start a new game: centred snake heading right, fresh food, zeroed
    /// counters. Returns the grid encoding of the new state.
    pub fn reset(&mut self) -> GridObservation {
        self.snake = Self::initial_snake(&self.config);
        self.score = 0;
        self.steps = 0;
        self.game_over = false;
        self.won = false;
        self.place_food();

        info!(
            width = self.config.grid_width,
            height = self.config.grid_height,
            head = ?self.snake.head(),
            food = ?self.food,
            "game reset"
        );
        self.get_state()
    }

    /// Put the food on a uniformly random cell the snake does not cover.
    ///
    /// A board with no free cell left is a win: the food is cleared and the
    /// game ends.
    pub fn place_food(&mut self) {
        let occupied: HashSet<Position> = self.snake.body.iter().copied().collect();
        let free: Vec<Position> = (0..self.config.grid_height as i32)
            .flat_map(|row| (0..self.config.grid_width as i32).map(move |col| Position::new(row, col)))
            .filter(|pos| !occupied.contains(pos))
            .collect();

        match free.choose(&mut self.rng) {
            Some(&pos) => {
                debug!(food = ?pos, free_cells = free.len(), "food placed");
                self.food = Some(pos);
            }
            None => {
                info!(score = self.score, length = self.snake.len(), "board filled");
                self.food = None;
                self.won = true;
                self.game_over = true;
            }
        }
    }

    /// Advance the game by one tick.
    ///
    /// A requested direction is adopted unless it reverses the current one.
    /// Once the game is over this is a no-op returning
    /// [`StepOutcome::Finished`].
    pub fn update(&mut self, requested: Option<Direction>) -> StepOutcome {
        if self.game_over {
            return StepOutcome::Finished;
        }

        if let Some(direction) = requested {
            if self.is_valid_direction(direction) {
                self.snake.direction = direction;
            }
        }

        let new_head = self.snake.head().moved_in_direction(self.snake.direction);

        if let Some(collision) = self.check_collision(new_head) {
            self.game_over = true;
            info!(
                ?collision,
                at = ?new_head,
                score = self.score,
                steps = self.steps,
                "game over"
            );
            return StepOutcome::Collision(collision);
        }

        let ate_food = self.food == Some(new_head);
        self.snake.advance_to(new_head, ate_food);

        let outcome = if ate_food {
            self.score += 1;
            self.place_food();
            if self.won {
                StepOutcome::Won
            } else {
                StepOutcome::Ate
            }
        } else {
            StepOutcome::Moved
        };

        self.steps += 1;
        outcome
    }

    /// Returns true unless `candidate` is the exact reverse of the heading
    pub fn is_valid_direction(&self, candidate: Direction) -> bool {
        !self.snake.direction.is_opposite(candidate)
    }

    fn check_collision(&self, pos: Position) -> Option<CollisionType> {
        if !self.is_in_bounds(pos) {
            return Some(CollisionType::Wall);
        }

        if self.snake.occupies(pos) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    /// One-step lookahead: would moving `direction` from the head hit a wall
    /// or any snake cell?
    ///
    /// The tail counts as an obstacle even though it would move away on a
    /// step without food. Agents trained on these features expect that.
    pub fn check_danger(&self, direction: Direction) -> bool {
        let next = self.snake.head().moved_in_direction(direction);
        self.check_collision(next).is_some()
    }

    /// Heading after a clockwise quarter turn
    pub fn get_right_direction(&self) -> Direction {
        self.snake.direction.turn_right()
    }

    /// Heading after a counter-clockwise quarter turn
    pub fn get_left_direction(&self) -> Direction {
        self.snake.direction.turn_left()
    }

    /// 3-channel (body, head, food) grid encoding of the board
    pub fn get_state(&self) -> GridObservation {
        GridObservation::from_state(self)
    }

    /// 11-element danger / heading / food-direction feature vector
    pub fn get_danger_state(&self) -> DangerFeatures {
        DangerFeatures::from_state(self)
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.row >= 0
            && pos.row < self.config.grid_height as i32
            && pos.col >= 0
            && pos.col < self.config.grid_width as i32
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.occupies(pos)
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn head(&self) -> Position {
        self.snake.head()
    }

    pub fn direction(&self) -> Direction {
        self.snake.direction
    }

    /// Current food cell; `None` only after the snake filled the board
    pub fn food(&self) -> Option<Position> {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn has_won(&self) -> bool {
        self.won
    }

    pub fn width(&self) -> usize {
        self.config.grid_width
    }

    pub fn height(&self) -> usize {
        self.config.grid_height
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}
