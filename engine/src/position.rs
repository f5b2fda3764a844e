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

//! The capability a rules engine must provide for search, evaluation and
//! move ordering to operate over it. `vantage_position::GamePosition` is the
//! only implementation this workspace ships, but every other module in this
//! crate is written against this trait rather than against `GamePosition`
//! directly.

use vantage_position::{Bitboard, CastleRights, Color, GamePosition, Move, Piece, Square};

pub trait Position {
    fn legal_moves(&self) -> Vec<Move>;
    fn capture_and_promotion_moves(&self) -> Vec<Move>;

    fn side_to_move(&self) -> Color;
    fn is_check(&self) -> bool;
    fn is_checkmate(&self) -> bool;
    fn is_stalemate(&self) -> bool;
    fn is_insufficient_material(&self) -> bool;
    fn is_fifty_moves(&self) -> bool;
    fn is_twofold_repetition(&self) -> bool;

    fn piece_at(&self, sq: Square) -> Option<(Piece, Color)>;
    fn king_square(&self, color: Color) -> Square;
    fn pieces(&self, piece: Piece, color: Color) -> Bitboard;
    fn attackers(&self, color: Color, sq: Square) -> Bitboard;
    fn attacks(&self, sq: Square) -> Bitboard;

    fn is_capture(&self, m: Move) -> bool;
    fn gives_check(&self, m: Move) -> bool;

    fn castling_rights(&self, color: Color) -> CastleRights;
    fn has_castled(&self, color: Color) -> bool;

    fn position_key(&self) -> u64;

    fn make(&mut self, m: Move);
    fn unmake(&mut self);
    fn make_null(&mut self);
    fn unmake_null(&mut self);

    #[must_use]
    /// Whether the position is drawn for a reason that does not depend on
    /// whose move it is: insufficient material or the fifty-move rule.
    /// Repetition is excluded since the search treats it as a standalone,
    /// cheaper check (it needs no board inspection).
    fn is_unconditional_draw(&self) -> bool {
        self.is_insufficient_material() || self.is_fifty_moves()
    }
}

impl Position for GamePosition {
    fn legal_moves(&self) -> Vec<Move> {
        GamePosition::legal_moves(self)
    }

    fn capture_and_promotion_moves(&self) -> Vec<Move> {
        GamePosition::capture_and_promotion_moves(self)
    }

    fn side_to_move(&self) -> Color {
        GamePosition::side_to_move(self)
    }

    fn is_check(&self) -> bool {
        GamePosition::is_check(self)
    }

    fn is_checkmate(&self) -> bool {
        GamePosition::is_checkmate(self)
    }

    fn is_stalemate(&self) -> bool {
        GamePosition::is_stalemate(self)
    }

    fn is_insufficient_material(&self) -> bool {
        GamePosition::is_insufficient_material(self)
    }

    fn is_fifty_moves(&self) -> bool {
        GamePosition::is_fifty_moves(self)
    }

    fn is_twofold_repetition(&self) -> bool {
        GamePosition::is_twofold_repetition(self)
    }

    fn piece_at(&self, sq: Square) -> Option<(Piece, Color)> {
        GamePosition::piece_at(self, sq)
    }

    fn king_square(&self, color: Color) -> Square {
        GamePosition::king_square(self, color)
    }

    fn pieces(&self, piece: Piece, color: Color) -> Bitboard {
        GamePosition::pieces(self, piece, color)
    }

    fn attackers(&self, color: Color, sq: Square) -> Bitboard {
        GamePosition::attackers(self, color, sq)
    }

    fn attacks(&self, sq: Square) -> Bitboard {
        GamePosition::attacks(self, sq)
    }

    fn is_capture(&self, m: Move) -> bool {
        GamePosition::is_capture(self, m)
    }

    fn gives_check(&self, m: Move) -> bool {
        GamePosition::gives_check(self, m)
    }

    fn castling_rights(&self, color: Color) -> CastleRights {
        GamePosition::castling_rights(self, color)
    }

    fn has_castled(&self, color: Color) -> bool {
        GamePosition::has_castled(self, color)
    }

    fn position_key(&self) -> u64 {
        GamePosition::position_key(self)
    }

    fn make(&mut self, m: Move) {
        GamePosition::make(self, m);
    }

    fn unmake(&mut self) {
        GamePosition::unmake(self);
    }

    fn make_null(&mut self) {
        GamePosition::make_null(self);
    }

    fn unmake_null(&mut self) {
        GamePosition::unmake_null(self);
    }
}
