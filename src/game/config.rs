use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Board geometry and reward schedule, fixed at engine construction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Board width in pixels
    pub board_width: i32,
    /// Board height in pixels
    pub board_height: i32,
    /// Grid quantization unit; every position is a multiple of this
    pub cell_size: i32,
    /// Snake length at the start of an episode
    pub initial_snake_length: usize,
    /// Reward returned when the head lands on food
    pub food_reward: i32,
    /// Reward returned on wall hit, self hit, or starvation
    pub death_penalty: i32,
    /// Episode ends once the step counter exceeds this factor times the
    /// snake length
    pub starvation_factor: u32,
}

/// Invalid configuration detected at engine construction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("cell size must be positive, got {0}")]
    NonPositiveCellSize(i32),
    #[error("{axis} of {size} px is not a multiple of cell size {cell_size}")]
    NotCellAligned {
        axis: &'static str,
        size: i32,
        cell_size: i32,
    },
    #[error("initial snake length must be at least 3, got {0}")]
    SnakeTooShort(usize),
    #[error("{cols}x{rows} grid cannot fit a snake of length {snake_length} plus food")]
    BoardTooSmall {
        cols: i32,
        rows: i32,
        snake_length: usize,
    },
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_width: 960,
            board_height: 720,
            cell_size: 40,
            initial_snake_length: 3,
            food_reward: 10,
            death_penalty: -10,
            starvation_factor: 100,
        }
    }
}

impl GameConfig {
    /// Create a configuration with custom board dimensions
    pub fn new(board_width: i32, board_height: i32, cell_size: i32) -> Self {
        Self {
            board_width,
            board_height,
            cell_size,
            ..Default::default()
        }
    }

    /// A 10x10 grid, handy for tests
    pub fn small() -> Self {
        Self::new(400, 400, 40)
    }

    /// Board width in cells
    pub fn cols(&self) -> i32 {
        self.board_width / self.cell_size
    }

    /// Board height in cells
    pub fn rows(&self) -> i32 {
        self.board_height / self.cell_size
    }

    /// Check that the board can host an episode.
    ///
    /// Both dimensions must be multiples of the cell size, and the grid must
    /// leave room for the centered initial snake plus at least one free cell
    /// for food.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cell_size <= 0 {
            return Err(ConfigError::NonPositiveCellSize(self.cell_size));
        }
        if self.board_width % self.cell_size != 0 {
            return Err(ConfigError::NotCellAligned {
                axis: "board width",
                size: self.board_width,
                cell_size: self.cell_size,
            });
        }
        if self.board_height % self.cell_size != 0 {
            return Err(ConfigError::NotCellAligned {
                axis: "board height",
                size: self.board_height,
                cell_size: self.cell_size,
            });
        }
        if self.initial_snake_length < 3 {
            return Err(ConfigError::SnakeTooShort(self.initial_snake_length));
        }

        let cols = self.cols();
        let rows = self.rows();
        let length = self.initial_snake_length as i32;
        // The head sits at column cols/2 with the body trailing leftward, so
        // the tail must not run off the left edge; one cell must stay free
        // for food.
        if rows < 1 || cols / 2 < length - 1 || cols * rows <= length {
            return Err(ConfigError::BoardTooSmall {
                cols,
                rows,
                snake_length: self.initial_snake_length,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GameConfig::default();
        assert_eq!(config.cols(), 24);
        assert_eq!(config.rows(), 18);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_small_config_grid() {
        let config = GameConfig::small();
        assert_eq!(config.cols(), 10);
        assert_eq!(config.rows(), 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_misaligned_board_is_rejected() {
        let config = GameConfig::new(410, 400, 40);
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotCellAligned {
                axis: "board width",
                size: 410,
                cell_size: 40,
            })
        );

        let config = GameConfig::new(400, 410, 40);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotCellAligned { axis: "board height", .. })
        ));
    }

    #[test]
    fn test_nonpositive_cell_size_is_rejected() {
        let config = GameConfig::new(400, 400, 0);
        assert_eq!(config.validate(), Err(ConfigError::NonPositiveCellSize(0)));
    }

    #[test]
    fn test_short_snake_is_rejected() {
        let config = GameConfig {
            initial_snake_length: 2,
            ..GameConfig::small()
        };
        assert_eq!(config.validate(), Err(ConfigError::SnakeTooShort(2)));
    }

    #[test]
    fn test_tiny_board_is_rejected() {
        // 2x2 grid: the centered snake's tail would leave the board
        let config = GameConfig::new(80, 80, 40);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BoardTooSmall { .. })
        ));
    }

    #[test]
    fn test_minimal_viable_board() {
        // 4x1 grid fits head at column 2 with two segments behind it and one
        // free cell for food
        let config = GameConfig::new(160, 40, 40);
        assert!(config.validate().is_ok());
    }
}
