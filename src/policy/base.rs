use crate::game::{Action, GameEngine};

/// Selects the next relative turn for the snake.
///
/// A policy is the driver side of the step interface: it reads the engine
/// through the public accessors and returns the action to play. Object-safe
/// so modes can hold a `Box<dyn Policy>`.
pub trait Policy {
    fn choose_action(&mut self, engine: &GameEngine) -> Action;

    /// Short name for headers and HUDs
    fn name(&self) -> &'static str;
}
