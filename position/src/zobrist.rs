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

//! Zobrist hashing: an incrementally-updatable key for transposition
//! detection, seeded once at process startup.

use once_cell::sync::Lazy;

use crate::{Color, Piece, Square};

struct Keys {
    /// Indexed `[square][piece][color]`.
    piece_square: [[[u64; 2]; Piece::NUM_TYPES]; 64],
    castle: [u64; 4],
    en_passant_file: [u64; 8],
    black_to_move: u64,
}

static KEYS: Lazy<Keys> = Lazy::new(|| {
    // A fixed seed keeps the keys (and therefore any serialized TT or
    // reproduced test run) stable across process runs.
    let rng = fastrand::Rng::with_seed(0x5EED_C0FF_EE15_B00B);
    let mut piece_square = [[[0u64; 2]; Piece::NUM_TYPES]; 64];
    for sq in piece_square.iter_mut() {
        for piece in sq.iter_mut() {
            for color_key in piece.iter_mut() {
                *color_key = rng.u64(..);
            }
        }
    }
    let mut castle = [0u64; 4];
    for k in castle.iter_mut() {
        *k = rng.u64(..);
    }
    let mut en_passant_file = [0u64; 8];
    for k in en_passant_file.iter_mut() {
        *k = rng.u64(..);
    }
    Keys {
        piece_square,
        castle,
        en_passant_file,
        black_to_move: rng.u64(..),
    }
});

#[inline]
#[must_use]
/// The key contribution of `piece`/`color` sitting on `sq`.
pub fn piece_key(sq: Square, piece: Piece, color: Color) -> u64 {
    KEYS.piece_square[sq as usize][piece as usize][color as usize]
}

#[inline]
#[must_use]
/// The key contribution of a single castle-right bit, `right` in `0..4`
/// matching `CastleRights`'s bit layout (white king, white queen, black
/// king, black queen).
pub fn castle_key(right: u8) -> u64 {
    KEYS.castle[right as usize]
}

#[inline]
#[must_use]
/// The key contribution of an en-passant target on file `file` (0..8).
pub fn en_passant_key(file: u8) -> u64 {
    KEYS.en_passant_file[file as usize]
}

#[inline]
#[must_use]
/// The key contribution of it being Black's turn to move.
pub fn black_to_move_key() -> u64 {
    KEYS.black_to_move
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_stable_across_calls() {
        assert_eq!(
            piece_key(Square::E4, Piece::Pawn, Color::White),
            piece_key(Square::E4, Piece::Pawn, Color::White)
        );
    }

    #[test]
    fn distinct_inputs_give_distinct_keys() {
        let a = piece_key(Square::E4, Piece::Pawn, Color::White);
        let b = piece_key(Square::E4, Piece::Pawn, Color::Black);
        let c = piece_key(Square::D4, Piece::Pawn, Color::White);
        assert_ne!(a, b);
        assert_ne!(a, c);
    }
}
