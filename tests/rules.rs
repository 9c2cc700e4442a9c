use snake_env::game::{CollisionType, Direction, GameConfig, GameState, Position, StepOutcome};
use snake_env::rl::{DangerFeatures, RelativeAction, SnakeEnvironment};

fn cells(coords: &[(i32, i32)]) -> Vec<Position> {
    coords.iter().map(|&(row, col)| Position::new(row, col)).collect()
}

#[test]
fn eating_food_grows_snake_and_moves_food() {
    let mut game = GameState::with_snake(
        GameConfig::default().with_seed(1),
        cells(&[(10, 10), (10, 9), (10, 8)]),
        Direction::Right,
        Position::new(10, 11),
    )
    .unwrap();

    assert_eq!(game.update(None), StepOutcome::Ate);
    assert_eq!(game.head(), Position::new(10, 11));
    assert_eq!(game.score(), 1);
    assert_eq!(game.snake().len(), 4);

    let food = game.food().expect("board is far from full");
    assert_ne!(food, Position::new(10, 11));
    assert!(!game.is_occupied_by_snake(food));
}

#[test]
fn wall_collision_ends_game_without_moving() {
    let body = cells(&[(0, 5), (1, 5), (2, 5)]);
    let mut game = GameState::with_snake(
        GameConfig::default(),
        body.clone(),
        Direction::Up,
        Position::new(15, 15),
    )
    .unwrap();

    assert_eq!(game.update(None), StepOutcome::Collision(CollisionType::Wall));
    assert!(game.is_game_over());
    assert_eq!(game.snake().body, body);
}

#[test]
fn self_collision_ends_game() {
    let mut game = GameState::with_snake(
        GameConfig::default(),
        cells(&[(4, 4), (4, 5), (5, 5), (5, 4), (5, 3)]),
        Direction::Left,
        Position::new(15, 15),
    )
    .unwrap();

    // turning down from (4,4) lands on (5,4)
    assert_eq!(
        game.update(Some(Direction::Down)),
        StepOutcome::Collision(CollisionType::SelfCollision)
    );
    assert!(game.is_game_over());
}

#[test]
fn reverse_request_keeps_heading() {
    let mut game = GameState::new(GameConfig::default().with_seed(5)).unwrap();
    game.update(Some(Direction::Left));
    assert_eq!(game.direction(), Direction::Right);
    assert_eq!(game.head(), Position::new(10, 11));
}

#[test]
fn rotation_tables_cover_every_heading() {
    let expectations = [
        (Direction::Up, Direction::Right, Direction::Left),
        (Direction::Right, Direction::Down, Direction::Up),
        (Direction::Down, Direction::Left, Direction::Right),
        (Direction::Left, Direction::Up, Direction::Down),
    ];

    for (heading, right, left) in expectations {
        let game = GameState::with_snake(
            GameConfig::default(),
            cells(&[(10, 10)]),
            heading,
            Position::new(0, 0),
        )
        .unwrap();
        assert_eq!(game.get_right_direction(), right, "right of {heading:?}");
        assert_eq!(game.get_left_direction(), left, "left of {heading:?}");
    }
}

#[test]
fn encodings_are_pure() {
    let game = GameState::new(GameConfig::default().with_seed(9)).unwrap();

    assert_eq!(game.get_danger_state(), game.get_danger_state());
    assert_eq!(game.get_state(), game.get_state());
}

#[test]
fn reset_returns_grid_of_fresh_game() {
    let mut game = GameState::new(GameConfig::new(12, 8).with_seed(3)).unwrap();
    let grid = game.reset();

    assert_eq!(grid.shape(), [8, 12, 3]);
    assert_eq!(grid.get(4, 6, 1), 1.0);
    assert_eq!(grid.get(4, 5, 0), 1.0);
    assert_eq!(grid.get(4, 4, 0), 1.0);
}

#[test]
fn seeded_games_are_reproducible() {
    let play = |seed| {
        let mut env = SnakeEnvironment::new(GameConfig::small().with_seed(seed)).unwrap();
        let mut trace = Vec::new();
        for i in 0..200 {
            let action = RelativeAction::from_index(i % RelativeAction::COUNT).unwrap();
            let transition = env.step(action);
            trace.push((env.state().food(), transition.score));
            if transition.done {
                env.reset();
            }
        }
        trace
    };

    assert_eq!(play(77), play(77));
}

#[test]
fn headless_agent_avoids_walls_with_features() {
    // greedy policy on the danger flags: go straight unless danger, then turn
    let mut env = SnakeEnvironment::new(GameConfig::default().with_seed(12)).unwrap();
    let mut features = env.reset();

    for _ in 0..60 {
        let action = if !features.is_set(DangerFeatures::DANGER_STRAIGHT) {
            RelativeAction::Straight
        } else if !features.is_set(DangerFeatures::DANGER_RIGHT) {
            RelativeAction::TurnRight
        } else {
            RelativeAction::TurnLeft
        };
        let transition = env.step(action);
        assert!(
            !matches!(transition.outcome, StepOutcome::Collision(CollisionType::Wall)),
            "walked into a wall with features {:?}",
            features
        );
        if transition.done {
            break;
        }
        features = transition.features;
    }
}
