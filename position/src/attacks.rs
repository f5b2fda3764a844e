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

//! Attack-square lookup. Knight and king steps are precomputed tables; sliding
//! pieces (bishop, rook, queen) are computed by scanning rays outward from the
//! source square and stopping at the first occupant. This trades the donor's
//! magic-bitboard multiply-and-index trick for a simpler, directly-verifiable
//! loop; see DESIGN.md for the rationale.

use once_cell::sync::Lazy;

use crate::{Bitboard, Direction, Square};

static KNIGHT_ATTACKS: Lazy<[Bitboard; 64]> = Lazy::new(|| {
    let mut table = [Bitboard::EMPTY; 64];
    for sq in Square::ALL {
        table[sq as usize] = step_attacks(sq, &Direction::KNIGHT_STEPS);
    }
    table
});

static KING_ATTACKS: Lazy<[Bitboard; 64]> = Lazy::new(|| {
    let mut table = [Bitboard::EMPTY; 64];
    for sq in Square::ALL {
        table[sq as usize] = step_attacks(sq, &Direction::KING_STEPS);
    }
    table
});

/// Attacks reachable by single (non-sliding) steps from `sq`, discarding any
/// step that would wrap around a board edge.
fn step_attacks(sq: Square, steps: &[Direction]) -> Bitboard {
    let mut bb = Bitboard::EMPTY;
    for &step in steps {
        if let Some(to) = try_step(sq, step) {
            bb.insert(to);
        }
    }
    bb
}

/// A single step from `sq` in direction `dir`, or `None` if it would leave
/// the board. Checked by rank/file delta rather than raw index arithmetic so
/// wraparound (e.g. H-file knight jumps landing on the A-file) is rejected.
fn try_step(sq: Square, dir: Direction) -> Option<Square> {
    let to = sq + dir;
    let dr = (to.rank() as i8 - sq.rank() as i8).abs();
    let df = (to.file() as i8 - sq.file() as i8).abs();
    // A legal single step never moves more than 2 in either axis; reject
    // anything larger, which indicates the raw add wrapped around an edge.
    if dr > 2 || df > 2 {
        return None;
    }
    Some(to)
}

#[must_use]
pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_ATTACKS[sq as usize]
}

#[must_use]
pub fn king_attacks(sq: Square) -> Bitboard {
    KING_ATTACKS[sq as usize]
}

/// Attacks of a sliding piece moving along `directions` from `sq`, blocked by
/// (and including) the first occupied square in `occupancy` along each ray.
#[must_use]
pub fn slide_attacks(sq: Square, occupancy: Bitboard, directions: &[Direction]) -> Bitboard {
    let mut bb = Bitboard::EMPTY;
    for &dir in directions {
        let mut cur = sq;
        loop {
            let Some(next) = try_step(cur, dir) else {
                break;
            };
            bb.insert(next);
            cur = next;
            if occupancy.contains(next) {
                break;
            }
        }
    }
    bb
}

#[must_use]
pub fn bishop_attacks(sq: Square, occupancy: Bitboard) -> Bitboard {
    slide_attacks(sq, occupancy, &Direction::BISHOP_DIRECTIONS)
}

#[must_use]
pub fn rook_attacks(sq: Square, occupancy: Bitboard) -> Bitboard {
    slide_attacks(sq, occupancy, &Direction::ROOK_DIRECTIONS)
}

#[must_use]
pub fn queen_attacks(sq: Square, occupancy: Bitboard) -> Bitboard {
    bishop_attacks(sq, occupancy) | rook_attacks(sq, occupancy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knight_from_corner() {
        let attacks = knight_attacks(Square::A1);
        assert_eq!(attacks.len(), 2);
        assert!(attacks.contains(Square::B3));
        assert!(attacks.contains(Square::C2));
    }

    #[test]
    fn king_from_corner() {
        assert_eq!(king_attacks(Square::A1).len(), 3);
    }

    #[test]
    fn rook_blocked_by_occupant() {
        let occ = Bitboard::from(Square::D4);
        let attacks = rook_attacks(Square::D1, occ);
        // Stops at and includes D4, nothing beyond.
        assert!(attacks.contains(Square::D4));
        assert!(!attacks.contains(Square::D5));
        assert!(attacks.contains(Square::D2));
    }

    #[test]
    fn bishop_open_diagonal() {
        let attacks = bishop_attacks(Square::D4, Bitboard::EMPTY);
        assert!(attacks.contains(Square::A1));
        assert!(attacks.contains(Square::H8));
        assert!(attacks.contains(Square::G1));
    }
}
