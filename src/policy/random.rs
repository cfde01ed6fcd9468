use rand::Rng;

use super::base::Policy;
use crate::game::{Action, GameEngine};

/// Uniformly random driver; useful as a smoke-test agent and as a floor for
/// comparing smarter policies against
pub struct RandomPolicy {
    rng: rand::rngs::ThreadRng,
}

impl RandomPolicy {
    pub fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }
}

impl Default for RandomPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl Policy for RandomPolicy {
    fn choose_action(&mut self, _engine: &GameEngine) -> Action {
        Action::ALL[self.rng.gen_range(0..Action::ALL.len())]
    }

    fn name(&self) -> &'static str {
        "random"
    }
}
