pub mod board;
pub mod error;
pub mod grid;
pub mod loader;
pub mod player;
pub mod render;
pub mod waiters;

pub use board::{Board, BoardRules, FLIP_WAIT_DEFAULT, WATCH_WAIT_DEFAULT};
pub use error::FlipError;
pub use grid::{Card, Coord, Grid};
pub use loader::{BoardSetup, ParseBoardError};
pub use player::{CurrentMove, PlayerState};
pub use render::render_board;
