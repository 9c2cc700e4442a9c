use crate::game::{Direction, GameState, Position};

/// Number of channels in the grid encoding
pub const GRID_CHANNELS: usize = 3;

/// Channel marking snake cells other than the head
pub const BODY_CHANNEL: usize = 0;
/// Channel marking the head cell
pub const HEAD_CHANNEL: usize = 1;
/// Channel marking the food cell
pub const FOOD_CHANNEL: usize = 2;

/// Grid encoding of the board with shape `[height, width, 3]`
///
/// Channels:
/// - 0: Snake body (1.0 at every segment except the head)
/// - 1: Snake head (1.0 at head position)
/// - 2: Food location (1.0 at food position)
///
/// Values are stored row-major, channel last.
#[derive(Debug, Clone, PartialEq)]
pub struct GridObservation {
    height: usize,
    width: usize,
    data: Vec<f32>,
}

impl GridObservation {
    pub fn from_state(state: &GameState) -> Self {
        let mut obs = Self {
            height: state.height(),
            width: state.width(),
            data: vec![0.0; state.height() * state.width() * GRID_CHANNELS],
        };

        for &pos in state.snake().body_segments() {
            obs.mark(pos, BODY_CHANNEL);
        }
        obs.mark(state.head(), HEAD_CHANNEL);
        if let Some(food) = state.food() {
            obs.mark(food, FOOD_CHANNEL);
        }

        obs
    }

    fn mark(&mut self, pos: Position, channel: usize) {
        debug_assert!(pos.row >= 0 && pos.col >= 0);
        let idx = self.index(pos.row as usize, pos.col as usize, channel);
        self.data[idx] = 1.0;
    }

    fn index(&self, row: usize, col: usize, channel: usize) -> usize {
        (row * self.width + col) * GRID_CHANNELS + channel
    }

    /// `[height, width, channels]`
    pub fn shape(&self) -> [usize; 3] {
        [self.height, self.width, GRID_CHANNELS]
    }

    pub fn get(&self, row: usize, col: usize, channel: usize) -> f32 {
        self.data[self.index(row, col, channel)]
    }

    /// Sum of one channel over the whole board
    pub fn channel_sum(&self, channel: usize) -> f32 {
        self.data
            .iter()
            .skip(channel)
            .step_by(GRID_CHANNELS)
            .sum()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }
}

/// Length of the danger feature vector
pub const DANGER_FEATURES: usize = 11;

/// Compact feature vector of danger, heading and food direction
///
/// Layout (1.0 = true):
/// `[danger_straight, danger_right, danger_left,
///   dir_right, dir_down, dir_left, dir_up,
///   food_up, food_right, food_down, food_left]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DangerFeatures(pub [f32; DANGER_FEATURES]);

impl DangerFeatures {
    pub const DANGER_STRAIGHT: usize = 0;
    pub const DANGER_RIGHT: usize = 1;
    pub const DANGER_LEFT: usize = 2;
    pub const DIR_RIGHT: usize = 3;
    pub const DIR_DOWN: usize = 4;
    pub const DIR_LEFT: usize = 5;
    pub const DIR_UP: usize = 6;
    pub const FOOD_UP: usize = 7;
    pub const FOOD_RIGHT: usize = 8;
    pub const FOOD_DOWN: usize = 9;
    pub const FOOD_LEFT: usize = 10;

    pub fn from_state(state: &GameState) -> Self {
        let heading = state.direction();
        let head = state.head();

        // No food only happens once the board is full; all food flags stay off
        let (food_up, food_right, food_down, food_left) = match state.food() {
            Some(food) => (
                food.row < head.row,
                food.col > head.col,
                food.row > head.row,
                food.col < head.col,
            ),
            None => (false, false, false, false),
        };

        let flags = [
            state.check_danger(heading),
            state.check_danger(state.get_right_direction()),
            state.check_danger(state.get_left_direction()),
            heading == Direction::Right,
            heading == Direction::Down,
            heading == Direction::Left,
            heading == Direction::Up,
            food_up,
            food_right,
            food_down,
            food_left,
        ];

        Self(flags.map(|flag| if flag { 1.0 } else { 0.0 }))
    }

    pub fn is_set(&self, index: usize) -> bool {
        self.0[index] != 0.0
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<f32> {
        self.0.to_vec()
    }
}
