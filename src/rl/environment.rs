use anyhow::Result;
use tracing::debug;

use super::observation::DangerFeatures;
use crate::game::{Direction, GameConfig, GameState, StepOutcome};

/// Action relative to the current heading, as used by feature-vector agents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeAction {
    Straight,
    TurnRight,
    TurnLeft,
}

impl RelativeAction {
    pub const COUNT: usize = 3;

    /// Convert a discrete action index to a relative action
    ///
    /// - 0 → Straight
    /// - 1 → TurnRight
    /// - 2 → TurnLeft
    pub fn from_index(idx: usize) -> Option<Self> {
        match idx {
            0 => Some(RelativeAction::Straight),
            1 => Some(RelativeAction::TurnRight),
            2 => Some(RelativeAction::TurnLeft),
            _ => None,
        }
    }

    /// Absolute direction this action leads to from `heading`
    pub fn resolve(&self, heading: Direction) -> Direction {
        match self {
            RelativeAction::Straight => heading,
            RelativeAction::TurnRight => heading.turn_right(),
            RelativeAction::TurnLeft => heading.turn_left(),
        }
    }
}

/// Result of one environment step
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// Feature vector after the step
    pub features: DangerFeatures,
    pub outcome: StepOutcome,
    /// True on game over or when the step cap is reached
    pub done: bool,
    pub score: u32,
}

/// Headless wrapper for driving a game from an external decision loop
///
/// Every call to [`SnakeEnvironment::step`] advances the game by exactly one
/// tick. Reward shaping is left to the caller.
pub struct SnakeEnvironment {
    state: GameState,
    max_steps: Option<u32>,
}

impl SnakeEnvironment {
    pub fn new(config: GameConfig) -> Result<Self> {
        let max_steps = config.max_steps;
        Ok(Self {
            state: GameState::new(config)?,
            max_steps,
        })
    }

    /// Wrap an existing game, e.g. one built from an explicit layout
    pub fn from_state(state: GameState) -> Self {
        let max_steps = state.config().max_steps;
        Self { state, max_steps }
    }

    /// Start a new episode and return its first feature vector
    pub fn reset(&mut self) -> DangerFeatures {
        self.state.reset();
        self.state.get_danger_state()
    }

    /// Step with an action relative to the current heading
    pub fn step(&mut self, action: RelativeAction) -> Transition {
        let direction = action.resolve(self.state.direction());
        self.step_absolute(Some(direction))
    }

    /// Step with an absolute direction request (or none to keep going)
    pub fn step_absolute(&mut self, requested: Option<Direction>) -> Transition {
        let outcome = self.state.update(requested);
        let truncated = self
            .max_steps
            .is_some_and(|cap| self.state.steps() >= cap);
        if truncated && !outcome.is_terminal() {
            debug!(steps = self.state.steps(), "episode truncated");
        }

        Transition {
            features: self.state.get_danger_state(),
            outcome,
            done: outcome.is_terminal() || truncated,
            score: self.state.score(),
        }
    }

    /// Current feature vector without stepping
    pub fn observation(&self) -> DangerFeatures {
        self.state.get_danger_state()
    }

    /// Get reference to current game state
    pub fn state(&self) -> &GameState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Position;

    #[test]
    fn test_environment_creation() {
        let env = SnakeEnvironment::new(GameConfig::default().with_seed(1)).unwrap();

        assert!(!env.state().is_game_over());
        assert_eq!(env.state().score(), 0);
        assert_eq!(env.state().steps(), 0);
    }

    #[test]
    fn test_action_from_index() {
        assert_eq!(RelativeAction::from_index(0), Some(RelativeAction::Straight));
        assert_eq!(RelativeAction::from_index(1), Some(RelativeAction::TurnRight));
        assert_eq!(RelativeAction::from_index(2), Some(RelativeAction::TurnLeft));
        assert_eq!(RelativeAction::from_index(RelativeAction::COUNT), None);
    }

    #[test]
    fn test_relative_actions_resolve() {
        assert_eq!(RelativeAction::Straight.resolve(Direction::Up), Direction::Up);
        assert_eq!(RelativeAction::TurnRight.resolve(Direction::Up), Direction::Right);
        assert_eq!(RelativeAction::TurnLeft.resolve(Direction::Up), Direction::Left);
    }

    #[test]
    fn test_step_turns_relative_to_heading() {
        let mut env = SnakeEnvironment::new(GameConfig::default().with_seed(2)).unwrap();
        env.reset();

        env.step(RelativeAction::TurnRight);
        assert_eq!(env.state().direction(), Direction::Down);
        assert_eq!(env.state().steps(), 1);

        env.step(RelativeAction::TurnLeft);
        assert_eq!(env.state().direction(), Direction::Right);
        assert_eq!(env.state().steps(), 2);
    }

    #[test]
    fn test_terminal_state_handling() {
        let state = GameState::with_snake(
            GameConfig::small(),
            vec![Position::new(0, 5), Position::new(1, 5)],
            Direction::Up,
            Position::new(9, 9),
        )
        .unwrap();
        let mut env = SnakeEnvironment::from_state(state);

        let transition = env.step(RelativeAction::Straight);

        assert!(transition.done);
        assert!(transition.outcome.is_terminal());
        assert!(env.state().is_game_over());
        assert!(transition.features.is_set(DangerFeatures::DANGER_STRAIGHT));
    }

    #[test]
    fn test_step_cap_truncates() {
        let config = GameConfig::small().with_seed(4).with_max_steps(2);
        let state = GameState::with_snake(
            config,
            vec![Position::new(5, 0)],
            Direction::Right,
            Position::new(0, 0),
        )
        .unwrap();
        let mut env = SnakeEnvironment::from_state(state);

        assert!(!env.step(RelativeAction::Straight).done);
        let last = env.step(RelativeAction::Straight);
        assert!(last.done);
        assert_eq!(last.outcome, StepOutcome::Moved);
        assert!(!env.state().is_game_over());
    }

    #[test]
    fn test_observation_changes_after_step() {
        let state = GameState::with_snake(
            GameConfig::small(),
            vec![Position::new(5, 7), Position::new(5, 6)],
            Direction::Right,
            Position::new(0, 0),
        )
        .unwrap();
        let mut env = SnakeEnvironment::from_state(state);

        let before = env.observation();
        let transition = env.step(RelativeAction::Straight);

        // head at col 7 of 10: the wall is ahead only after two moves
        assert!(!before.is_set(DangerFeatures::DANGER_STRAIGHT));
        assert!(!transition.features.is_set(DangerFeatures::DANGER_STRAIGHT));
        env.step(RelativeAction::Straight);
        assert!(env.observation().is_set(DangerFeatures::DANGER_STRAIGHT));
    }
}
