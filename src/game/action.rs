use thiserror::Error;

/// Direction the snake's head moves in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Heading {
    Up,
    Down,
    Left,
    Right,
}

/// Headings in clockwise order; stepping through this array by one is a
/// 90-degree right turn
const CLOCKWISE: [Heading; 4] = [Heading::Right, Heading::Down, Heading::Left, Heading::Up];

impl Heading {
    /// Returns the unit-cell delta (dx, dy) for moving in this heading
    pub fn delta(self) -> (i32, i32) {
        match self {
            Heading::Up => (0, -1),
            Heading::Down => (0, 1),
            Heading::Left => (-1, 0),
            Heading::Right => (1, 0),
        }
    }

    /// Heading pointing the opposite way (used to lay out the initial tail)
    pub fn opposite(self) -> Heading {
        match self {
            Heading::Up => Heading::Down,
            Heading::Down => Heading::Up,
            Heading::Left => Heading::Right,
            Heading::Right => Heading::Left,
        }
    }

    fn clockwise_index(self) -> usize {
        match self {
            Heading::Right => 0,
            Heading::Down => 1,
            Heading::Left => 2,
            Heading::Up => 3,
        }
    }

    /// Resolve the heading that results from applying a relative turn
    pub fn turned(self, action: Action) -> Heading {
        let idx = self.clockwise_index();
        match action {
            Action::KeepHeading => self,
            Action::TurnRight => CLOCKWISE[(idx + 1) % 4],
            // +3 instead of -1 so the index stays non-negative
            Action::TurnLeft => CLOCKWISE[(idx + 3) % 4],
        }
    }
}

/// Relative turn command supplied by the driver each step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Keep moving in the current heading
    KeepHeading,
    /// Turn 90 degrees clockwise
    TurnRight,
    /// Turn 90 degrees counter-clockwise
    TurnLeft,
}

/// Rejected action input from the driver
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ActionError {
    #[error("action vector has {0} entries, expected 3")]
    WrongLength(usize),
    #[error("action vector must be one-hot over [keep, right, left], found {0} active entries")]
    NotOneHot(usize),
    #[error("action index {0} out of range 0..3")]
    IndexOutOfRange(usize),
}

impl Action {
    /// All actions, in one-hot order `[keep, right, left]`
    pub const ALL: [Action; 3] = [Action::KeepHeading, Action::TurnRight, Action::TurnLeft];

    /// Index of this action in one-hot order
    pub fn index(self) -> usize {
        match self {
            Action::KeepHeading => 0,
            Action::TurnRight => 1,
            Action::TurnLeft => 2,
        }
    }

    /// Decode an action from its index in one-hot order
    pub fn from_index(idx: usize) -> Result<Action, ActionError> {
        Action::ALL
            .get(idx)
            .copied()
            .ok_or(ActionError::IndexOutOfRange(idx))
    }

    /// Decode a one-hot action vector `[keep, right, left]`.
    ///
    /// The vector must have exactly three entries, each exactly 0.0 or 1.0,
    /// with a single 1.0. Anything else is rejected rather than defaulted.
    pub fn from_one_hot(one_hot: &[f32]) -> Result<Action, ActionError> {
        if one_hot.len() != Action::ALL.len() {
            return Err(ActionError::WrongLength(one_hot.len()));
        }

        let active = one_hot.iter().filter(|&&v| v != 0.0).count();
        let binary = one_hot.iter().all(|&v| v == 0.0 || v == 1.0);
        if !binary || active != 1 {
            return Err(ActionError::NotOneHot(active));
        }

        let idx = one_hot
            .iter()
            .position(|&v| v == 1.0)
            .expect("one-hot vector has exactly one active entry");
        Action::from_index(idx)
    }
}
