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

//! Piece-square tables, indexed as White would see them (`Square::A1` is
//! index 0). A Black piece's value is read from the White-side table at its
//! vertically mirrored square, rather than keeping a second copy of every
//! table.

use vantage_position::{Color, Piece, Square};

#[rustfmt::skip]
const PAWN_MG: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10,  0,-15,-15,  0, 10,  5,
     3,  5,  5, 15, 15,  5,  5,  3,
     5,  8, 15, 28, 28, 15,  8,  5,
    10, 12, 22, 35, 35, 22, 12, 10,
    20, 25, 35, 45, 45, 35, 25, 20,
    60, 60, 60, 65, 65, 60, 60, 60,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const PAWN_EG: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     0,  0,  0,  0,  0,  0,  0,  0,
     5,  5,  5,  5,  5,  5,  5,  5,
    15, 15, 15, 15, 15, 15, 15, 15,
    30, 30, 30, 30, 30, 30, 30, 30,
    50, 50, 50, 50, 50, 50, 50, 50,
    80, 80, 80, 80, 80, 80, 80, 80,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const KNIGHT: [i32; 64] = [
    -50,-40,-30,-30,-30,-30,-40,-50,
    -40,-20,  0,  5,  5,  0,-20,-40,
    -30,  5, 15, 20, 20, 15,  5,-30,
    -30, 10, 20, 25, 25, 20, 10,-30,
    -30, 10, 20, 25, 25, 20, 10,-30,
    -30,  5, 15, 20, 20, 15,  5,-30,
    -40,-20,  0,  5,  5,  0,-20,-40,
    -50,-40,-30,-30,-30,-30,-40,-50,
];

#[rustfmt::skip]
const BISHOP: [i32; 64] = [
    -20,-10,-10,-10,-10,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0, 10, 15, 15, 10,  0,-10,
    -10,  5, 15, 15, 15, 15,  5,-10,
    -10,  0, 15, 15, 15, 15,  0,-10,
    -10, 10, 10, 10, 10, 10, 10,-10,
    -10,  5,  0,  0,  0,  0,  5,-10,
    -20,-10,-10,-10,-10,-10,-10,-20,
];

#[rustfmt::skip]
const ROOK: [i32; 64] = [
     0,  0,  5, 10, 10,  5,  0,  0,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    15, 20, 20, 20, 20, 20, 20, 15,
    10, 10, 10, 10, 10, 10, 10, 10,
];

#[rustfmt::skip]
const QUEEN: [i32; 64] = [
    -20,-10,-10, -5, -5,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5,  5,  5,  5,  0,-10,
     -5,  0,  5,  5,  5,  5,  0, -5,
     -5,  0,  5,  5,  5,  5,  0, -5,
    -10,  0,  5,  5,  5,  5,  0,-10,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -20,-10,-10, -5, -5,-10,-10,-20,
];

#[rustfmt::skip]
const KING_MG: [i32; 64] = [
    20, 35, 15,  0,  0, 15, 35, 20,
    15, 15,  0, -5, -5,  0, 15, 15,
     0,  0, -5,-10,-10, -5,  0,  0,
   -10,-15,-15,-20,-20,-15,-15,-10,
   -10,-20,-20,-30,-30,-20,-20,-10,
   -20,-30,-30,-40,-40,-30,-30,-20,
   -30,-40,-40,-50,-50,-40,-40,-30,
   -40,-40,-40,-50,-50,-40,-40,-40,
];

#[rustfmt::skip]
const KING_EG: [i32; 64] = [
    -50,-30,-20,-10,-10,-20,-30,-50,
    -30,-10,  0, 10, 10,  0,-10,-30,
    -20,  0, 20, 30, 30, 20,  0,-20,
    -10, 10, 30, 40, 40, 30, 10,-10,
    -10, 10, 30, 40, 40, 30, 10,-10,
    -20,  0, 20, 30, 30, 20,  0,-20,
    -30,-10,  0, 10, 10,  0,-10,-30,
    -50,-30,-20,-10,-10,-20,-30,-50,
];

#[must_use]
/// The piece-square value of `piece` for `color` on `sq`, interpolated
/// between the midgame and endgame table by `tau` (0 = full midgame weight,
/// 1 = full endgame weight). Non-taper tables (knight/bishop/rook/queen) are
/// used as-is at every phase.
///
/// White reads the table directly; Black reads it mirrored vertically, so
/// that e.g. Black's e7 pawn gets the bonus White's e2 pawn would.
pub fn value(piece: Piece, color: Color, sq: Square, tau: f64) -> i32 {
    let idx = match color {
        Color::White => sq as usize,
        Color::Black => sq.mirror() as usize,
    };
    let blend = |mg: i32, eg: i32| -> i32 { (mg as f64 * (1.0 - tau) + eg as f64 * tau).round() as i32 };
    match piece {
        Piece::Pawn => blend(PAWN_MG[idx], PAWN_EG[idx]),
        Piece::King => blend(KING_MG[idx], KING_EG[idx]),
        Piece::Knight => KNIGHT[idx],
        Piece::Bishop => BISHOP[idx],
        Piece::Rook => ROOK[idx],
        Piece::Queen => QUEEN[idx],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn white_and_black_pawns_mirror() {
        let white = value(Piece::Pawn, Color::White, Square::E2, 0.0);
        let black = value(Piece::Pawn, Color::Black, Square::E7, 0.0);
        assert_eq!(white, black);
    }

    #[test]
    fn pawn_pst_interpolates_toward_endgame_table() {
        let midgame = value(Piece::Pawn, Color::White, Square::E7, 0.0);
        let endgame = value(Piece::Pawn, Color::White, Square::E7, 1.0);
        assert_eq!(midgame, PAWN_MG[Square::E7 as usize]);
        assert_eq!(endgame, PAWN_EG[Square::E7 as usize]);
    }

    #[test]
    fn knight_table_rewards_the_center_over_the_corner() {
        let corner = value(Piece::Knight, Color::White, Square::A1, 0.5);
        let center = value(Piece::Knight, Color::White, Square::E4, 0.5);
        assert!(center > corner);
    }
}
