/*
  Vantage, a classical alpha-beta chess engine core.
  Copyright (C) 2024 The Vantage Authors (see AUTHORS.md file)

  Vantage is free software: you can redistribute it and/or modify
  it under the terms of the GNU General Public License as published by
  the Free Software Foundation, either version 3 of the License, or
  (at your option) any later version.

  Vantage is distributed in the hope that it will be useful,
  but WITHOUT ANY WARRANTY; without even the implied warranty of
  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
  GNU General Public License for more details.

  You should have received a copy of the GNU General Public License
  along with this program.  If not, see <http://www.gnu.org/licenses/>.
*/

//! `GamePosition`: a `Board` plus the undo/repetition history needed to back
//! the engine's `Position` capability (make/unmake, twofold repetition,
//! fifty-move rule).

use nohash_hasher::IntMap;

use crate::{
    board::{Board, BoardError, NullUndo, Undo},
    castling::CastleRights,
    movegen::{self, GenKind},
    Bitboard, Color, Move, Piece, Square,
};

enum HistoryEntry {
    Move { m: Move, undo: Undo },
    Null { undo: NullUndo },
}

/// A chess game in progress: current board plus enough history to undo moves
/// and to detect repetition and the fifty-move rule.
#[derive(Clone)]
pub struct GamePosition {
    board: Board,
    history: Vec<HistoryEntry>,
    /// Count of occurrences of each hash seen so far (including the current
    /// position), used for twofold-repetition detection.
    hash_counts: IntMap<u64, u32>,
}

// `HistoryEntry` holds `Undo`/`NullUndo`, which are plain Copy data; `Clone`
// is implemented by hand since deriving it would require `Move`/`Board` to
// satisfy bounds the derive macro cannot see through the enum.
impl Clone for HistoryEntry {
    fn clone(&self) -> HistoryEntry {
        match self {
            HistoryEntry::Move { m, undo } => HistoryEntry::Move { m: *m, undo: *undo },
            HistoryEntry::Null { undo } => HistoryEntry::Null { undo: *undo },
        }
    }
}

impl GamePosition {
    #[must_use]
    pub fn new() -> GamePosition {
        GamePosition::from_board(Board::starting_position())
    }

    pub fn from_fen(fen: &str) -> Result<GamePosition, BoardError> {
        Ok(GamePosition::from_board(Board::from_fen(fen)?))
    }

    fn from_board(board: Board) -> GamePosition {
        let mut hash_counts = IntMap::default();
        hash_counts.insert(board.hash, 1);
        GamePosition {
            board,
            history: Vec::with_capacity(64),
            hash_counts,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn legal_moves(&self) -> Vec<Move> {
        movegen::legal_moves(&self.board, GenKind::All)
    }

    #[must_use]
    pub fn capture_and_promotion_moves(&self) -> Vec<Move> {
        movegen::legal_moves(&self.board, GenKind::CapturesAndPromotions)
    }

    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    #[must_use]
    pub fn is_check(&self) -> bool {
        self.board.is_in_check(self.board.side_to_move())
    }

    #[must_use]
    pub fn is_checkmate(&self) -> bool {
        self.is_check() && self.legal_moves().is_empty()
    }

    #[must_use]
    pub fn is_stalemate(&self) -> bool {
        !self.is_check() && self.legal_moves().is_empty()
    }

    #[must_use]
    pub fn is_insufficient_material(&self) -> bool {
        self.board.is_insufficient_material()
    }

    #[must_use]
    pub fn is_fifty_moves(&self) -> bool {
        self.board.halfmove_clock() >= 100
    }

    #[must_use]
    /// Treats any repeat of a prior position (a *two*-fold occurrence total)
    /// as a draw, not the formal three-fold rule: a search horizon rarely
    /// reaches a true third occurrence, so waiting for one would make the
    /// engine blind to repetitions it should actively be steering toward or
    /// away from.
    pub fn is_twofold_repetition(&self) -> bool {
        self.hash_counts.get(&self.board.hash).copied().unwrap_or(0) >= 2
    }

    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Option<(Piece, Color)> {
        self.board.piece_at(sq)
    }

    #[must_use]
    pub fn king_square(&self, color: Color) -> Square {
        self.board.king_square(color)
    }

    #[must_use]
    pub fn pieces(&self, piece: Piece, color: Color) -> Bitboard {
        self.board.pieces_of(piece, color)
    }

    #[must_use]
    pub fn attackers(&self, color: Color, sq: Square) -> Bitboard {
        self.board.attackers(color, sq)
    }

    #[must_use]
    pub fn attacks(&self, sq: Square) -> Bitboard {
        self.board.attacks_from(sq)
    }

    #[must_use]
    pub fn is_capture(&self, m: Move) -> bool {
        m.is_en_passant() || self.board.piece_at(m.to_square()).is_some()
    }

    #[must_use]
    pub fn gives_check(&self, m: Move) -> bool {
        let mut scratch = self.board.clone();
        scratch.make(m);
        scratch.is_in_check(scratch.side_to_move())
    }

    #[must_use]
    pub fn castling_rights(&self, color: Color) -> CastleRights {
        self.board.castle_rights(color)
    }

    #[must_use]
    /// True once a color's king has moved to a castled square via a castling
    /// move recorded in this game's history. Used only by the evaluator's
    /// development term, not by legality, so it is not retroactively
    /// computable from the current board alone.
    pub fn has_castled(&self, color: Color) -> bool {
        self.history.iter().any(|entry| match entry {
            HistoryEntry::Move { m, .. } => m.is_castle() && self.move_color_matches(*m, color),
            HistoryEntry::Null { .. } => false,
        })
    }

    fn move_color_matches(&self, m: Move, color: Color) -> bool {
        // A castling king always ends on its own back rank; that is enough
        // to attribute the move to a color without replaying history.
        m.to_square().rank() == color.back_rank()
    }

    #[must_use]
    pub fn position_key(&self) -> u64 {
        self.board.hash
    }

    pub fn make(&mut self, m: Move) {
        let undo = self.board.make(m);
        self.history.push(HistoryEntry::Move { m, undo });
        *self.hash_counts.entry(self.board.hash).or_insert(0) += 1;
    }

    pub fn unmake(&mut self) {
        let Some(HistoryEntry::Move { m, undo }) = self.history.pop() else {
            panic!("unmake() called with no matching make()");
        };
        let count = self.hash_counts.get_mut(&self.board.hash).expect("hash count underflow");
        *count -= 1;
        if *count == 0 {
            self.hash_counts.remove(&self.board.hash);
        }
        self.board.unmake(m, undo);
    }

    pub fn make_null(&mut self) {
        let undo = self.board.make_null();
        self.history.push(HistoryEntry::Null { undo });
    }

    pub fn unmake_null(&mut self) {
        let Some(HistoryEntry::Null { undo }) = self.history.pop() else {
            panic!("unmake_null() called with no matching make_null()");
        };
        self.board.unmake_null(undo);
    }
}

impl Default for GamePosition {
    fn default() -> GamePosition {
        GamePosition::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_unmake_round_trip_restores_key() {
        let mut pos = GamePosition::new();
        let key_before = pos.position_key();
        pos.make(Move::normal(Square::E2, Square::E4));
        assert_ne!(pos.position_key(), key_before);
        pos.unmake();
        assert_eq!(pos.position_key(), key_before);
    }

    #[test]
    fn twofold_repetition_is_detected() {
        let mut pos = GamePosition::new();
        assert!(!pos.is_twofold_repetition());
        // Shuffle knights back and forth to repeat the starting position.
        pos.make(Move::normal(Square::G1, Square::F3));
        pos.make(Move::normal(Square::G8, Square::F6));
        pos.make(Move::normal(Square::F3, Square::G1));
        pos.make(Move::normal(Square::F6, Square::G8));
        assert!(pos.is_twofold_repetition());
    }

    #[test]
    fn checkmate_detection() {
        let pos = GamePosition::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").unwrap();
        assert!(pos.is_checkmate());
        assert!(!pos.is_stalemate());
    }

    #[test]
    fn stalemate_detection() {
        let pos = GamePosition::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(pos.is_stalemate());
        assert!(!pos.is_checkmate());
    }

    #[test]
    fn null_move_round_trip() {
        let mut pos = GamePosition::new();
        let key_before = pos.position_key();
        let side_before = pos.side_to_move();
        pos.make_null();
        assert_ne!(pos.side_to_move(), side_before);
        pos.unmake_null();
        assert_eq!(pos.position_key(), key_before);
        assert_eq!(pos.side_to_move(), side_before);
    }
}
