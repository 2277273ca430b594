use log::info;

use crate::controller::{PieceController, PieceProvider, RandomPieceProvider};
use crate::grid::{CellState, Grid, COLS, ROWS};
use crate::scoring::Scoring;
use crate::shape::Piece;

// ============================================================================
// Types
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameState {
    Playing,
    GameOver,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum GameEvent {
    GameStarted,
    PieceMoved,
    PieceRotated,
    PieceLocked,
    RowsCleared(u32),
    LevelUp(u32),
    GameOver { final_score: u32 },
}

// ============================================================================
// Game
// ============================================================================

/// One game session. Every simulation step goes through `&mut self`, so a
/// session has exactly one driver at a time.
pub struct Game {
    grid: Grid,
    controller: PieceController,
    scoring: Scoring,
    state: GameState,
    events: Vec<GameEvent>,
}

impl Game {
    pub fn new() -> Self {
        Self::with_provider(Box::new(RandomPieceProvider::new()))
    }

    /// Same seed, same pieces.
    pub fn seeded(seed: u64) -> Self {
        Self::with_provider(Box::new(RandomPieceProvider::seeded(seed)))
    }

    pub fn with_provider(provider: Box<dyn PieceProvider>) -> Self {
        Self {
            grid: Grid::new(),
            controller: PieceController::new(provider),
            scoring: Scoring::new(),
            state: GameState::Playing,
            events: vec![GameEvent::GameStarted],
        }
    }

    /// Starts from a prepared grid and live piece; later pieces are random.
    pub fn with_grid(grid: Grid, current_piece: Piece) -> Self {
        Self::with_grid_and_provider(grid, current_piece, Box::new(RandomPieceProvider::new()))
    }

    pub fn with_grid_and_provider(
        grid: Grid,
        current_piece: Piece,
        provider: Box<dyn PieceProvider>,
    ) -> Self {
        Self {
            grid,
            controller: PieceController::with_piece(current_piece, provider),
            scoring: Scoring::new(),
            state: GameState::Playing,
            events: Vec::new(),
        }
    }

    pub fn with_scoring(mut self, scoring: Scoring) -> Self {
        self.scoring = scoring;
        self
    }

    // ------------------------------------------------------------------------
    // Read-only view
    // ------------------------------------------------------------------------

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn current_piece(&self) -> &Piece {
        self.controller.piece()
    }

    pub fn score(&self) -> u32 {
        self.scoring.score()
    }

    pub fn level(&self) -> u32 {
        self.scoring.level()
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_game_over(&self) -> bool {
        self.state == GameState::GameOver
    }

    /// Milliseconds the driver should wait between ticks at the current level.
    pub fn speed_interval(&self) -> u64 {
        self.scoring.speed_interval()
    }

    /// The grid with the live piece drawn over it.
    pub fn visible_cells(&self) -> Vec<Vec<CellState>> {
        let mut visual_grid = self.grid.cells().to_vec();
        let piece = self.controller.piece();

        for block in piece.blocks() {
            if block.y >= 0 && block.y < ROWS as i16 && block.x >= 0 && block.x < COLS as i16 {
                visual_grid[block.y as usize][block.x as usize] = CellState::Filled(piece.color);
            }
        }

        visual_grid
    }

    /// Takes and clears all pending events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    /// Resets the whole session to a fresh game: empty grid, new piece, score
    /// 0, level 1, playing.
    pub fn start(&mut self) {
        self.grid.reset();
        self.scoring.reset();
        self.state = GameState::Playing;
        self.events.clear();
        self.controller.spawn();
        self.events.push(GameEvent::GameStarted);
        info!("game started");
    }

    pub fn restart(&mut self) {
        self.start();
    }

    // ------------------------------------------------------------------------
    // Simulation
    // ------------------------------------------------------------------------

    /// One gravity step: fall a row, or lock and bring in the next piece.
    pub fn tick(&mut self) {
        if self.state != GameState::Playing {
            return;
        }

        if self.controller.try_move(&self.grid, 0, 1) {
            self.events.push(GameEvent::PieceMoved);
        } else {
            self.lock_and_spawn();
        }
    }

    pub fn soft_drop(&mut self) {
        self.tick();
    }

    pub fn move_left(&mut self) -> bool {
        self.shift(-1)
    }

    pub fn move_right(&mut self) -> bool {
        self.shift(1)
    }

    fn shift(&mut self, dx: i16) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        let moved = self.controller.try_move(&self.grid, dx, 0);
        if moved {
            self.events.push(GameEvent::PieceMoved);
        }
        moved
    }

    pub fn rotate(&mut self) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        let rotated = self.controller.try_rotate(&self.grid);
        if rotated {
            self.events.push(GameEvent::PieceRotated);
        }
        rotated
    }

    fn lock_and_spawn(&mut self) {
        self.grid.lock(self.controller.piece());
        self.events.push(GameEvent::PieceLocked);

        let rows = self.grid.clear_full_rows();
        if rows > 0 {
            self.events.push(GameEvent::RowsCleared(rows));
            let levels_gained = self.scoring.on_rows_cleared(rows);
            let level = self.scoring.level();
            for reached in (level - levels_gained + 1)..=level {
                self.events.push(GameEvent::LevelUp(reached));
            }
        }

        let next = self.controller.spawn();
        if self.grid.collides(next.position.x, next.position.y, &next.shape) {
            self.state = GameState::GameOver;
            let final_score = self.scoring.score();
            self.events.push(GameEvent::GameOver { final_score });
            info!("game over, final score {final_score}");
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

pub mod test_helpers {
    use super::*;
    use crate::shape::Color;

    pub fn empty_grid() -> Grid {
        Grid::new()
    }

    pub fn fill_row(grid: &mut Grid, y: usize) {
        for x in 0..COLS {
            grid.set(y, x, CellState::Filled(Color::Purple));
        }
    }

    pub fn fill_row_with_gap(grid: &mut Grid, y: usize, gap_x: usize) {
        for x in 0..COLS {
            if x != gap_x {
                grid.set(y, x, CellState::Filled(Color::Purple));
            }
        }
    }
}
