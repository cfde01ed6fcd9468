use rand::Rng;

use super::{
    action::{Action, ActionError, Heading},
    config::{ConfigError, GameConfig},
    state::{EpisodeState, Position, Snake, TerminalCause},
};

/// Additional information about a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Why the episode ended, when it did
    pub cause: Option<TerminalCause>,
}

/// Outcome of a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    /// Reward signal for the driver
    pub reward: i32,
    /// Whether the episode has terminated
    pub done: bool,
    /// Current score; on a terminal step this is the score from before the
    /// step
    pub score: u32,
    pub info: StepInfo,
}

/// Rejection-sampling attempts before falling back to enumerating free cells
const FOOD_PLACEMENT_TRIES: usize = 32;

/// The game state machine.
///
/// Owns the episode state and advances it one tick per `step` call. All
/// randomness is confined to food placement.
pub struct GameEngine {
    config: GameConfig,
    state: EpisodeState,
    rng: rand::rngs::ThreadRng,
}

impl GameEngine {
    /// Create an engine, validating the configuration first
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = rand::thread_rng();
        let state = Self::initial_state(&config, &mut rng);
        Ok(Self { config, state, rng })
    }

    /// Start a new episode, discarding the previous one
    pub fn reset(&mut self) {
        self.state = Self::initial_state(&self.config, &mut self.rng);
    }

    fn initial_state(config: &GameConfig, rng: &mut impl Rng) -> EpisodeState {
        let head = Position::new(
            config.cols() / 2 * config.cell_size,
            config.rows() / 2 * config.cell_size,
        );
        let snake = Snake::new(
            head,
            Heading::Right,
            config.initial_snake_length,
            config.cell_size,
        );
        let food = Self::sample_food(config, &snake, rng)
            .expect("a validated board always has a free cell for food");

        EpisodeState {
            snake,
            food,
            score: 0,
            steps: 0,
        }
    }

    /// Advance the game by one tick.
    ///
    /// The new head is prepended before any terminal check, so a terminal
    /// outcome leaves the stale tail in place and the state shows the losing
    /// position.
    pub fn step(&mut self, action: Action) -> StepOutcome {
        self.state.steps += 1;

        let heading = self.state.snake.heading.turned(action);
        self.state.snake.heading = heading;

        let new_head = self
            .state
            .snake
            .head()
            .stepped(heading, self.config.cell_size);
        self.state.snake.push_head(new_head);

        if let Some(cause) = self.terminal_cause(new_head) {
            return StepOutcome {
                reward: self.config.death_penalty,
                done: true,
                score: self.state.score,
                info: StepInfo {
                    ate_food: false,
                    cause: Some(cause),
                },
            };
        }

        if new_head == self.state.food {
            self.state.score += 1;
            match self.place_food() {
                Some(food) => self.state.food = food,
                None => {
                    // Snake now covers the whole board; nothing left to eat
                    return StepOutcome {
                        reward: self.config.food_reward,
                        done: true,
                        score: self.state.score,
                        info: StepInfo {
                            ate_food: true,
                            cause: Some(TerminalCause::BoardFilled),
                        },
                    };
                }
            }
            StepOutcome {
                reward: self.config.food_reward,
                done: false,
                score: self.state.score,
                info: StepInfo {
                    ate_food: true,
                    cause: None,
                },
            }
        } else {
            self.state.snake.trim_tail();
            StepOutcome {
                reward: 0,
                done: false,
                score: self.state.score,
                info: StepInfo {
                    ate_food: false,
                    cause: None,
                },
            }
        }
    }

    /// Decode and apply a one-hot action vector `[keep, right, left]`.
    ///
    /// Malformed vectors are rejected; the episode state is untouched on
    /// error.
    pub fn step_one_hot(&mut self, one_hot: &[f32]) -> Result<StepOutcome, ActionError> {
        let action = Action::from_one_hot(one_hot)?;
        Ok(self.step(action))
    }

    fn terminal_cause(&self, head: Position) -> Option<TerminalCause> {
        if !self.in_bounds(head) {
            return Some(TerminalCause::WallHit);
        }
        if self.state.snake.hits_body(head) {
            return Some(TerminalCause::SelfHit);
        }
        let budget = self.config.starvation_factor * self.state.snake.len() as u32;
        if self.state.steps > budget {
            return Some(TerminalCause::Starvation);
        }
        None
    }

    /// Whether a point is off the board or on a body segment (head
    /// excluded). `None` checks the current head; agents can pass candidate
    /// positions to probe a move before committing to it.
    pub fn is_collision(&self, point: Option<Position>) -> bool {
        let point = point.unwrap_or_else(|| self.state.snake.head());
        !self.in_bounds(point) || self.state.snake.hits_body(point)
    }

    fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.x <= self.config.board_width - self.config.cell_size
            && pos.y >= 0
            && pos.y <= self.config.board_height - self.config.cell_size
    }

    fn place_food(&mut self) -> Option<Position> {
        Self::sample_food(&self.config, &self.state.snake, &mut self.rng)
    }

    /// Pick a random free cell: bounded rejection sampling first, then a
    /// uniform draw over the enumerated free cells when the board is crowded.
    /// Returns `None` only when the snake covers every cell.
    fn sample_food(config: &GameConfig, snake: &Snake, rng: &mut impl Rng) -> Option<Position> {
        for _ in 0..FOOD_PLACEMENT_TRIES {
            let pos = Position::new(
                rng.gen_range(0..config.cols()) * config.cell_size,
                rng.gen_range(0..config.rows()) * config.cell_size,
            );
            if !snake.contains(pos) {
                return Some(pos);
            }
        }

        let free: Vec<Position> = (0..config.rows())
            .flat_map(|row| {
                (0..config.cols())
                    .map(move |col| Position::new(col * config.cell_size, row * config.cell_size))
            })
            .filter(|pos| !snake.contains(*pos))
            .collect();

        if free.is_empty() {
            None
        } else {
            Some(free[rng.gen_range(0..free.len())])
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Borrow the live episode state
    pub fn state(&self) -> &EpisodeState {
        &self.state
    }

    /// Clone out an immutable snapshot for renderers and other observers
    pub fn snapshot(&self) -> EpisodeState {
        self.state.clone()
    }

    pub fn head(&self) -> Position {
        self.state.snake.head()
    }

    pub fn body(&self) -> &[Position] {
        &self.state.snake.body
    }

    pub fn food(&self) -> Position {
        self.state.food
    }

    pub fn heading(&self) -> Heading {
        self.state.snake.heading
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn steps(&self) -> u32 {
        self.state.steps
    }

    /// Replace the snake with an exact body layout, for posing board
    /// situations in tests and probes
    pub fn debug_set_snake(&mut self, body: &[Position], heading: Heading) {
        self.state.snake = Snake {
            body: body.to_vec(),
            heading,
        };
    }

    /// Move the food to an exact cell
    pub fn debug_set_food(&mut self, food: Position) {
        self.state.food = food;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> GameEngine {
        GameEngine::new(GameConfig::small()).expect("small config is valid")
    }

    #[test]
    fn test_reset_produces_canonical_layout() {
        let mut engine = engine();
        engine.debug_set_food(Position::new(0, 0));
        engine.step(Action::KeepHeading);
        engine.reset();

        assert_eq!(engine.score(), 0);
        assert_eq!(engine.steps(), 0);
        assert_eq!(engine.heading(), Heading::Right);
        assert_eq!(
            engine.body(),
            &[
                Position::new(200, 200),
                Position::new(160, 200),
                Position::new(120, 200),
            ]
        );
        assert!(!engine.body().contains(&engine.food()));
    }

    #[test]
    fn test_keep_heading_moves_one_cell() {
        let mut engine = engine();
        engine.debug_set_food(Position::new(0, 0));

        let outcome = engine.step(Action::KeepHeading);

        assert_eq!(engine.head(), Position::new(240, 200));
        assert_eq!(engine.body().len(), 3);
        assert_eq!(outcome.reward, 0);
        assert!(!outcome.done);
        assert_eq!(outcome.score, 0);
        assert_eq!(engine.steps(), 1);
    }

    #[test]
    fn test_turns_update_heading_and_head() {
        let mut engine = engine();
        engine.debug_set_food(Position::new(0, 0));

        engine.step(Action::TurnRight);
        assert_eq!(engine.heading(), Heading::Down);
        assert_eq!(engine.head(), Position::new(200, 240));

        engine.step(Action::TurnLeft);
        assert_eq!(engine.heading(), Heading::Right);
        assert_eq!(engine.head(), Position::new(240, 240));
    }

    #[test]
    fn test_eating_food_grows_and_scores() {
        let mut engine = engine();
        engine.debug_set_food(Position::new(240, 200));

        let outcome = engine.step(Action::KeepHeading);

        assert_eq!(outcome.reward, 10);
        assert!(!outcome.done);
        assert_eq!(outcome.score, 1);
        assert!(outcome.info.ate_food);
        assert_eq!(engine.body().len(), 4);
        assert_ne!(engine.food(), Position::new(240, 200));
        assert!(!engine.body().contains(&engine.food()));
    }

    #[test]
    fn test_wall_hit_terminates_without_trimming() {
        let mut engine = engine();
        engine.debug_set_snake(
            &[
                Position::new(0, 200),
                Position::new(40, 200),
                Position::new(80, 200),
            ],
            Heading::Left,
        );
        engine.debug_set_food(Position::new(360, 360));

        let outcome = engine.step(Action::KeepHeading);

        assert_eq!(outcome.reward, -10);
        assert!(outcome.done);
        assert_eq!(outcome.score, 0);
        assert_eq!(outcome.info.cause, Some(TerminalCause::WallHit));
        // Head was prepended, tail left in place
        assert_eq!(engine.body().len(), 4);
        assert_eq!(engine.head(), Position::new(-40, 200));
    }

    #[test]
    fn test_self_hit_terminates() {
        let mut engine = engine();
        // C-shaped body; turning right from Up runs the head into the far arm
        engine.debug_set_snake(
            &[
                Position::new(120, 160),
                Position::new(120, 200),
                Position::new(160, 200),
                Position::new(200, 200),
                Position::new(200, 160),
                Position::new(160, 160),
            ],
            Heading::Up,
        );
        engine.debug_set_food(Position::new(360, 360));

        let outcome = engine.step(Action::TurnRight);

        assert!(outcome.done);
        assert_eq!(outcome.reward, -10);
        assert_eq!(outcome.info.cause, Some(TerminalCause::SelfHit));
    }

    #[test]
    fn test_starvation_cutoff() {
        let mut engine = GameEngine::new(GameConfig {
            starvation_factor: 1,
            ..GameConfig::small()
        })
        .expect("config is valid");
        engine.debug_set_food(Position::new(360, 0));

        // Circle in place; the budget is 1 x 4 (length after the head is
        // prepended), so step 5 starves
        let mut last = None;
        for _ in 0..8 {
            let outcome = engine.step(Action::TurnRight);
            if outcome.done {
                last = Some(outcome);
                break;
            }
        }

        let outcome = last.expect("starvation must terminate the episode");
        assert_eq!(outcome.reward, -10);
        assert_eq!(outcome.info.cause, Some(TerminalCause::Starvation));
        assert_eq!(outcome.score, 0);
        assert_eq!(engine.steps(), 5);
    }

    #[test]
    fn test_head_is_valid_after_every_non_terminal_step() {
        let mut engine = engine();
        engine.debug_set_food(Position::new(0, 0));

        for _ in 0..200 {
            let outcome = engine.step(Action::TurnRight);
            if outcome.done {
                break;
            }
            assert!(!engine.is_collision(None));
        }
    }

    #[test]
    fn test_is_collision_probes_candidate_points() {
        let engine = engine();
        assert!(!engine.is_collision(None));
        assert!(engine.is_collision(Some(Position::new(-40, 200))));
        assert!(engine.is_collision(Some(Position::new(400, 200))));
        assert!(engine.is_collision(Some(Position::new(160, 200))));
        assert!(!engine.is_collision(Some(Position::new(240, 200))));
    }

    #[test]
    fn test_one_hot_boundary_rejects_malformed_input() {
        let mut engine = engine();
        engine.debug_set_food(Position::new(0, 0));

        assert!(engine.step_one_hot(&[1.0, 1.0, 0.0]).is_err());
        assert!(engine.step_one_hot(&[0.0, 0.0]).is_err());
        assert_eq!(engine.steps(), 0);

        let outcome = engine
            .step_one_hot(&[0.0, 1.0, 0.0])
            .expect("well-formed one-hot");
        assert!(!outcome.done);
        assert_eq!(engine.heading(), Heading::Down);
    }

    #[test]
    fn test_food_fallback_on_nearly_full_board() {
        // 4x1 board with the snake on three of the four cells: rejection
        // sampling may exhaust its tries, the enumeration fallback must
        // still find the single free cell
        let mut engine = GameEngine::new(GameConfig::new(160, 40, 40)).expect("config is valid");
        for _ in 0..20 {
            engine.reset();
            assert_eq!(engine.food(), Position::new(120, 0));
        }
    }

    #[test]
    fn test_filling_the_board_ends_the_episode() {
        let mut engine = GameEngine::new(GameConfig::new(160, 40, 40)).expect("config is valid");
        // Head one cell short of the right edge, food on the last free cell
        let outcome = engine.step(Action::KeepHeading);

        assert!(outcome.done);
        assert_eq!(outcome.reward, 10);
        assert_eq!(outcome.score, 1);
        assert_eq!(outcome.info.cause, Some(TerminalCause::BoardFilled));
        assert_eq!(engine.body().len(), 4);
    }
}
