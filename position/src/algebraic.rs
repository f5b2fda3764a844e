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

//! Conversion between a [`Move`] and the short algebraic notation (SAN) a
//! human would write for it, e.g. `Nf3`, `exd5`, `O-O`, `e8=Q#`.

use crate::{GamePosition, Move, Piece};

/// Render `m` in short algebraic notation as played from `pos`. Assumes `m`
/// is legal in `pos`; the disambiguation and check/mate suffix logic below
/// both depend on that being true.
#[must_use]
pub fn to_algebraic(m: Move, pos: &GamePosition) -> String {
    let mut s = String::with_capacity(7);

    if m.is_castle() {
        if m.to_square().file() > m.from_square().file() {
            s += "O-O";
        } else {
            s += "O-O-O";
        }
    } else {
        let (mover_type, _) = pos.piece_at(m.from_square()).expect("move has no piece at its origin");
        let is_capture = pos.is_capture(m);
        let from_sq = m.from_square();

        let mut unclear = false;
        let mut unclear_rank_shared = false;
        let mut unclear_file_shared = false;

        if mover_type != Piece::Pawn {
            s += mover_type.code();
        } else if is_capture {
            s += from_sq.file_name();
        }

        if mover_type != Piece::Pawn {
            for other in pos.legal_moves() {
                if other == m || other.to_square() != m.to_square() || other.from_square() == from_sq {
                    continue;
                }
                if pos.piece_at(other.from_square()).map(|(p, _)| p) != Some(mover_type) {
                    continue;
                }
                unclear = true;
                if other.from_square().rank() == from_sq.rank() {
                    unclear_rank_shared = true;
                }
                if other.from_square().file() == from_sq.file() {
                    unclear_file_shared = true;
                }
            }
            if unclear {
                if !unclear_file_shared {
                    s += from_sq.file_name();
                } else if !unclear_rank_shared {
                    s += &(from_sq.rank() + 1).to_string();
                } else {
                    s += &from_sq.to_string();
                }
            }
        }

        if is_capture {
            s += "x";
        }
        s += &m.to_square().to_string();

        if let Some(p) = m.promote_type() {
            s += "=";
            s += p.code();
        }
    }

    let mut after = pos.clone();
    after.make(m);
    if after.is_check() {
        s += if after.is_checkmate() { "#" } else { "+" };
    }

    s
}

/// Parse `s` as a move legal in `pos`, by generating every legal move and
/// matching its rendered algebraic form. `O(legal moves)` rather than a
/// dedicated grammar, but algebraic parsing only ever happens off the
/// search's hot path (reading a human's input, not engine self-play).
///
/// # Errors
///
/// Returns an error if `s` does not match any legal move in `pos`.
pub fn from_algebraic(s: &str, pos: &GamePosition) -> Result<Move, &'static str> {
    pos.legal_moves()
        .into_iter()
        .find(|&m| to_algebraic(m, pos) == s)
        .ok_or("not a legal algebraic move in this position")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Square;

    #[test]
    fn pawn_push_has_no_disambiguation() {
        let pos = GamePosition::new();
        let m = Move::normal(Square::E2, Square::E4);
        assert_eq!(to_algebraic(m, &pos), "e4");
    }

    #[test]
    fn pawn_capture_is_prefixed_by_its_file() {
        let pos = GamePosition::from_fen("rnbqkbnr/ppp2ppp/8/3pp3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 3").unwrap();
        let m = Move::normal(Square::E4, Square::D5);
        assert_eq!(to_algebraic(m, &pos), "exd5");
    }

    #[test]
    fn back_rank_mate_gets_a_hash_suffix() {
        let pos = GamePosition::from_fen("6k1/5ppp/8/8/8/8/8/R6K w - - 0 1").unwrap();
        let m = Move::normal(Square::A1, Square::A8);
        assert_eq!(to_algebraic(m, &pos), "Ra8#");
    }

    #[test]
    fn queenside_castle_is_rendered_with_two_hyphens() {
        let pos = GamePosition::from_fen("r3k3/8/8/8/8/8/8/R3K3 b Qq - 0 1").unwrap();
        let m = Move::castling(Square::E8, Square::C8);
        assert_eq!(to_algebraic(m, &pos), "O-O-O");
    }

    #[test]
    fn from_algebraic_round_trips_through_to_algebraic() {
        let pos = GamePosition::new();
        let m = Move::normal(Square::G1, Square::F3);
        let s = to_algebraic(m, &pos);
        assert_eq!(from_algebraic(&s, &pos), Ok(m));
    }

    #[test]
    fn ambiguous_knight_move_is_disambiguated_by_file() {
        let pos = GamePosition::from_fen("4k3/8/8/8/N1N5/8/8/4K3 w - - 0 1").unwrap();
        let m = Move::normal(Square::A4, Square::B2);
        assert_eq!(to_algebraic(m, &pos), "Nab2");
    }
}
