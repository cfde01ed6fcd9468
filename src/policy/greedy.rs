use super::base::Policy;
use crate::game::{Action, GameEngine};

/// One-step lookahead driver: probe each of the three turns with
/// `is_collision`, discard the fatal ones, and chase the food by Manhattan
/// distance among the survivors.
///
/// Deliberately myopic; it will happily trap itself in its own coils on a
/// crowded board.
pub struct GreedyPolicy;

impl GreedyPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GreedyPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl Policy for GreedyPolicy {
    fn choose_action(&mut self, engine: &GameEngine) -> Action {
        let head = engine.head();
        let food = engine.food();
        let cell_size = engine.config().cell_size;

        let mut best: Option<(i32, Action)> = None;
        for action in Action::ALL {
            let heading = engine.heading().turned(action);
            let target = head.stepped(heading, cell_size);
            if engine.is_collision(Some(target)) {
                continue;
            }
            let distance = target.manhattan_distance(food);
            if best.is_none_or(|(best_distance, _)| distance < best_distance) {
                best = Some((distance, action));
            }
        }

        // Every move is fatal: keep heading and let the episode end
        best.map(|(_, action)| action).unwrap_or(Action::KeepHeading)
    }

    fn name(&self) -> &'static str {
        "greedy"
    }
}
