use log::{debug, trace};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::grid::Grid;
use crate::shape::{Color, Piece, Position, ShapeKind};

// ============================================================================
// Piece Provider Trait
// ============================================================================

/// Source of the shape and color for each newly spawned piece.
pub trait PieceProvider {
    fn next_piece(&mut self) -> (ShapeKind, Color);
}

/// Uniform, independent shape and color draws.
pub struct RandomPieceProvider<R = StdRng> {
    rng: R,
}

impl RandomPieceProvider<StdRng> {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPieceProvider<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RandomPieceProvider<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> PieceProvider for RandomPieceProvider<R> {
    fn next_piece(&mut self) -> (ShapeKind, Color) {
        let shape = ShapeKind::random(&mut self.rng);
        let color = Color::random(&mut self.rng);
        (shape, color)
    }
}

/// Replays a fixed list of pieces, wrapping around at the end.
pub struct SequencePieceProvider {
    pieces: Vec<(ShapeKind, Color)>,
    index: usize,
}

impl SequencePieceProvider {
    pub fn new(pieces: Vec<(ShapeKind, Color)>) -> Self {
        assert!(!pieces.is_empty(), "sequence needs at least one piece");
        Self { pieces, index: 0 }
    }

    /// Every piece in one color.
    pub fn of_shapes(shapes: &[ShapeKind], color: Color) -> Self {
        Self::new(shapes.iter().map(|&shape| (shape, color)).collect())
    }
}

impl PieceProvider for SequencePieceProvider {
    fn next_piece(&mut self) -> (ShapeKind, Color) {
        let piece = self.pieces[self.index % self.pieces.len()];
        self.index += 1;
        piece
    }
}

// ============================================================================
// Piece Controller
// ============================================================================

/// Owns the live piece and gates every move on the grid's collision test.
pub struct PieceController {
    piece: Piece,
    provider: Box<dyn PieceProvider>,
}

impl PieceController {
    pub fn new(mut provider: Box<dyn PieceProvider>) -> Self {
        let piece = Self::draw(provider.as_mut());
        Self { piece, provider }
    }

    pub fn with_piece(piece: Piece, provider: Box<dyn PieceProvider>) -> Self {
        Self { piece, provider }
    }

    fn draw(provider: &mut dyn PieceProvider) -> Piece {
        let (shape, color) = provider.next_piece();
        Piece::spawn(shape, color)
    }

    pub fn piece(&self) -> &Piece {
        &self.piece
    }

    /// Replaces the live piece with a fresh one at the top. The caller checks
    /// the spawn position for collision.
    pub fn spawn(&mut self) -> &Piece {
        self.piece = Self::draw(self.provider.as_mut());
        debug!(
            "spawned {:?} ({:?}) at x={}",
            self.piece.kind, self.piece.color, self.piece.position.x
        );
        &self.piece
    }

    pub fn try_move(&mut self, grid: &Grid, dx: i16, dy: i16) -> bool {
        let target = self.piece.moved(dx, dy);
        if grid.collides(target.x, target.y, &self.piece.shape) {
            trace!("move ({dx}, {dy}) blocked");
            return false;
        }
        self.piece.position = target;
        true
    }

    /// Rotates in place. There are no wall kicks: a blocked rotation is
    /// rejected.
    pub fn try_rotate(&mut self, grid: &Grid) -> bool {
        let rotated = self.piece.shape.rotated();
        let Position { x, y } = self.piece.position;
        if grid.collides(x, y, &rotated) {
            trace!("rotation blocked at ({x}, {y})");
            return false;
        }
        self.piece.shape = rotated;
        true
    }
}
