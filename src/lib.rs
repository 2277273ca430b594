//! Falling-block puzzle engine.
//!
//! The library holds the whole simulation: the piece catalog, the grid of
//! settled blocks, the falling piece, scoring and the game state machine.
//! Rendering, input capture and the timer live in the binary.

pub mod controller;
pub mod game;
pub mod grid;
pub mod scoring;
pub mod shape;

pub use controller::{PieceController, PieceProvider, RandomPieceProvider, SequencePieceProvider};
pub use game::{Game, GameEvent, GameState};
pub use grid::{CellState, Grid, COLS, ROWS};
pub use scoring::{speed_interval, Scoring};
pub use shape::{all_shapes, Color, Piece, Position, Shape, ShapeKind};
