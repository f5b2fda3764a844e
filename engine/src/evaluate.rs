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

//! Static position evaluation: a pure function of the board, with no memory
//! of how it got there. Unlike the donor's `Tagger`, which keeps a running
//! score and updates it move by move, this recomputes everything on every
//! call; the search calls it often enough that this is worth measuring, but
//! not so often (leaf nodes only) that it has mattered in practice.

use vantage_position::{Bitboard, Color, Piece, Square};

use crate::position::Position;
use crate::pst;

const BISHOP_PAIR_BONUS: i32 = 45;
const TEMPO_BONUS: i32 = 10;

/// Game-phase fraction in `[0, 1]`: 0 is full midgame material, 1 is bare
/// endgame material. Computed from non-pawn, non-king material still on the
/// board, same inputs the donor's own `phase_of` uses, but expressed the
/// other way around (1 = endgame here, 1 = midgame there).
pub(crate) fn game_phase(pos: &impl Position) -> f64 {
    let mut raw = 0;
    for color in Color::ALL {
        raw += 2 * (pos.pieces(Piece::Knight, color).len() + pos.pieces(Piece::Bishop, color).len());
        raw += 4 * pos.pieces(Piece::Rook, color).len();
        raw += 8 * pos.pieces(Piece::Queen, color).len();
    }
    1.0 - (raw as f64 / 24.0).min(1.0)
}

/// Linear fade-out weight: `1.0` while `tau <= lo`, `0.0` once `tau >= hi`,
/// interpolated in between. Used to confine a term to the part of the game
/// where it's meaningful (development fades out once the middlegame is
/// underway, king safety fades out once the endgame is underway).
fn fade(tau: f64, lo: f64, hi: f64) -> f64 {
    if tau <= lo {
        1.0
    } else if tau >= hi {
        0.0
    } else {
        (hi - tau) / (hi - lo)
    }
}

#[must_use]
/// Evaluate `pos` from the perspective of the side to move: positive means
/// the side to move stands better.
///
/// Terminal conditions are checked first and short-circuit everything else:
/// checkmate, then the family of drawn positions (stalemate, insufficient
/// material, the fifty-move rule, and repetition).
pub fn evaluate(pos: &impl Position) -> i32 {
    if pos.is_checkmate() {
        return -crate::score::MATE;
    }
    if pos.is_stalemate() || pos.is_insufficient_material() || pos.is_fifty_moves() || pos.is_twofold_repetition() {
        return 0;
    }

    let tau = game_phase(pos);
    let mut white = 0;
    white += material_and_pst(pos, tau);
    white += development(pos, tau);
    white += center_control(pos);
    white += mobility(pos);
    white += pawn_structure(pos, tau);
    white += king_safety(pos, tau);
    white += piece_features(pos);
    white += trapped_pieces(pos);
    white += coordination(pos);
    white += threats(pos);

    let perspective = if pos.side_to_move() == Color::White { white } else { -white };
    perspective + TEMPO_BONUS
}

fn material_and_pst(pos: &impl Position, tau: f64) -> i32 {
    let mut score = 0;
    for color in Color::ALL {
        let sign = if color == Color::White { 1 } else { -1 };
        for piece in Piece::ALL {
            for sq in pos.pieces(piece, color) {
                score += sign * (piece.value() + pst::value(piece, color, sq, tau));
            }
        }
    }
    score
}

fn development(pos: &impl Position, tau: f64) -> i32 {
    let weight = fade(tau, 0.3, 0.6);
    if weight <= 0.0 {
        return 0;
    }
    let mut score = 0;
    for color in Color::ALL {
        let sign = if color == Color::White { 1 } else { -1 };
        let mut term = 0;

        let minor_home: [Square; 4] = if color == Color::White {
            [Square::B1, Square::C1, Square::F1, Square::G1]
        } else {
            [Square::B8, Square::C8, Square::F8, Square::G8]
        };
        let undeveloped_minors = minor_home.iter().filter(|&&sq| {
            matches!(pos.piece_at(sq), Some((Piece::Knight | Piece::Bishop, c)) if c == color)
        }).count() as i32;
        term -= 15 * undeveloped_minors;

        if pos.has_castled(color) {
            let king_file = pos.king_square(color).file();
            if king_file == 2 || king_file == 6 {
                term += 40;
            }
        } else if !pos.castling_rights(color).has_any(color) {
            let king_file = pos.king_square(color).file();
            if (2..=5).contains(&king_file) {
                term -= 40;
            }
        }

        let has_moved_queen = {
            let queen_home = if color == Color::White { Square::D1 } else { Square::D8 };
            pos.piece_at(queen_home).map_or(true, |(p, c)| !(p == Piece::Queen && c == color))
        };
        if has_moved_queen {
            term -= 15 * undeveloped_minors;
        }

        let central_files = [3u8, 4u8];
        for &file in &central_files {
            let start_rank = if color == Color::White { 1 } else { 6 };
            if let Some(sq) = Square::new(start_rank, file) {
                if matches!(pos.piece_at(sq), Some((Piece::Pawn, c)) if c == color) {
                    let one_ahead_rank = if color == Color::White { start_rank + 1 } else { start_rank - 1 };
                    if let Some(blocker_sq) = Square::new(one_ahead_rank, file) {
                        if pos.piece_at(blocker_sq).is_some() {
                            term -= 20;
                        }
                    }
                }
            }
        }
        score += sign * term;
    }
    (score as f64 * weight).round() as i32
}

fn center_control(pos: &impl Position) -> i32 {
    let core = [Square::D4, Square::E4, Square::D5, Square::E5];
    let extended = [
        Square::C3, Square::D3, Square::E3, Square::F3,
        Square::C4, Square::F4, Square::C5, Square::F5,
        Square::C6, Square::D6, Square::E6, Square::F6,
    ];
    let mut score = 0;
    for &sq in &core {
        if let Some((Piece::Pawn, color)) = pos.piece_at(sq) {
            score += if color == Color::White { 25 } else { -25 };
        }
        for color in Color::ALL {
            let sign = if color == Color::White { 1 } else { -1 };
            score += sign * 5 * pos.attackers(color, sq).len() as i32;
        }
    }
    for &sq in &extended {
        for color in Color::ALL {
            let sign = if color == Color::White { 1 } else { -1 };
            score += sign * 2 * pos.attackers(color, sq).len() as i32;
        }
    }
    score
}

fn mobility(pos: &impl Position) -> i32 {
    let weights = [(Piece::Knight, 4), (Piece::Bishop, 5), (Piece::Rook, 2), (Piece::Queen, 1)];
    let mut score = 0;
    for color in Color::ALL {
        let sign = if color == Color::White { 1 } else { -1 };
        for &(piece, weight) in &weights {
            for sq in pos.pieces(piece, color) {
                score += sign * weight * pos.attacks(sq).len() as i32;
            }
        }
    }
    score
}

const PASSED_BY_RANK: [i32; 8] = [0, 15, 25, 40, 60, 90, 130, 0];

fn pawn_structure(pos: &impl Position, tau: f64) -> i32 {
    let mut score = 0;
    for color in Color::ALL {
        let sign = if color == Color::White { 1 } else { -1 };
        let own_pawns = pos.pieces(Piece::Pawn, color);
        let enemy_pawns = pos.pieces(Piece::Pawn, !color);
        let mut file_counts = [0i32; 8];
        for sq in own_pawns {
            file_counts[sq.file() as usize] += 1;
        }
        for &count in &file_counts {
            if count > 1 {
                score += sign * -15 * (count - 1);
            }
        }
        for sq in own_pawns {
            let file = sq.file() as i32;
            let has_neighbor_file = |f: i32| -> bool {
                (0..8).contains(&f) && file_counts[f as usize] > 0
            };
            let isolated = !has_neighbor_file(file - 1) && !has_neighbor_file(file + 1);
            if isolated {
                score += sign * -20;
            } else if is_backward(pos, sq, color, own_pawns) {
                score += sign * -10;
            }

            if is_passed(sq, color, enemy_pawns) {
                let rank_from_own_side = if color == Color::White { sq.rank() } else { 7 - sq.rank() };
                let base = PASSED_BY_RANK[rank_from_own_side as usize];
                score += sign * (base as f64 * (1.0 + 0.5 * tau)).round() as i32;
                if has_neighbor_file(file - 1) || has_neighbor_file(file + 1) {
                    if own_pawns.into_iter().any(|other| {
                        other != sq && (other.file() as i32 - file).abs() == 1 && other.rank() == sq.rank()
                    }) {
                        score += sign * 15;
                    }
                }
                score += sign * passed_pawn_advanced_terms(pos, sq, color, tau);
            }
        }
        score += sign * 6 * pawn_chain_count(own_pawns, color);
    }
    score
}

fn is_backward(pos: &impl Position, sq: Square, color: Color, own_pawns: Bitboard) -> bool {
    let file = sq.file() as i32;
    let behind_rank = |r: i32| -> bool { (0..8).contains(&r) };
    let support_rank = if color == Color::White { sq.rank() as i32 - 1 } else { sq.rank() as i32 + 1 };
    if !behind_rank(support_rank) {
        return false;
    }
    let has_support = [file - 1, file + 1].into_iter().any(|f| {
        (0..8).contains(&f) && Square::new(support_rank as u8, f as u8).is_some_and(|s| own_pawns.contains(s))
    });
    if has_support {
        return false;
    }
    let advance = sq + color.pawn_direction();
    pos.attackers(!color, advance).len() > 0
}

fn is_passed(sq: Square, color: Color, enemy_pawns: Bitboard) -> bool {
    let file = sq.file() as i32;
    !enemy_pawns.into_iter().any(|e| {
        let df = (e.file() as i32 - file).abs();
        if df > 1 {
            return false;
        }
        match color {
            Color::White => e.rank() > sq.rank(),
            Color::Black => e.rank() < sq.rank(),
        }
    })
}

fn passed_pawn_advanced_terms(pos: &impl Position, sq: Square, color: Color, tau: f64) -> i32 {
    let mut term = 0;

    // Rule of the square: a passed pawn with no enemy pawns left anywhere is
    // unstoppable if the defending king cannot reach its promotion square in
    // time, counting a tempo for the side not to move.
    let promote_rank = color.promotion_rank();
    let promote_sq = Square::new(promote_rank, sq.file()).expect("promotion rank/file in range");
    let distance_to_promote = (promote_rank as i8 - sq.rank() as i8).unsigned_abs();
    let tempo = u8::from(pos.side_to_move() == !color);
    let king_can_catch = pos.king_square(!color).chebyshev_to(promote_sq) <= distance_to_promote + tempo;
    if pos.pieces(Piece::Pawn, !color).len() == 0 && !king_can_catch {
        term += (50.0 * tau).round() as i32;
    }

    let own_king = pos.king_square(color);
    if own_king.chebyshev_to(sq) <= 2 {
        term += (20.0 * tau).round() as i32;
    }
    let blockade_sq = sq + color.pawn_direction();
    if pos.piece_at(blockade_sq).is_some_and(|(_, c)| c != color) {
        term -= 30;
    }
    term
}

fn pawn_chain_count(own_pawns: Bitboard, color: Color) -> i32 {
    let mut count = 0;
    for sq in own_pawns {
        let behind_rank = if color == Color::White { sq.rank() as i32 - 1 } else { sq.rank() as i32 + 1 };
        for df in [-1i32, 1] {
            let f = sq.file() as i32 + df;
            if (0..8).contains(&f) && (0..8).contains(&behind_rank) {
                if Square::new(behind_rank as u8, f as u8).is_some_and(|s| own_pawns.contains(s)) {
                    count += 1;
                }
            }
        }
    }
    count
}

fn king_safety(pos: &impl Position, tau: f64) -> i32 {
    let weight = fade(tau, 0.4, 0.9);
    if weight <= 0.0 {
        return 0;
    }
    let mut score = 0;
    for color in Color::ALL {
        let sign = if color == Color::White { 1 } else { -1 };
        let king_sq = pos.king_square(color);
        let own_pawns = pos.pieces(Piece::Pawn, color);
        let mut term = 0;

        let shield_rank = if color == Color::White { king_sq.rank() as i32 + 1 } else { king_sq.rank() as i32 - 1 };
        let far_shield_rank = if color == Color::White { king_sq.rank() as i32 + 2 } else { king_sq.rank() as i32 - 2 };
        for df in [-1i32, 0, 1] {
            let f = king_sq.file() as i32 + df;
            if !(0..8).contains(&f) {
                continue;
            }
            if (0..8).contains(&shield_rank) && Square::new(shield_rank as u8, f as u8).is_some_and(|s| own_pawns.contains(s)) {
                term += 12;
            } else if (0..8).contains(&far_shield_rank) && Square::new(far_shield_rank as u8, f as u8).is_some_and(|s| own_pawns.contains(s)) {
                term += 6;
            }

            let file_has_own_pawn = (0..8).any(|r| Square::new(r, f as u8).is_some_and(|s| own_pawns.contains(s)));
            let file_has_enemy_pawn = (0..8).any(|r| Square::new(r, f as u8).is_some_and(|s| pos.pieces(Piece::Pawn, !color).contains(s)));
            if !file_has_own_pawn && !file_has_enemy_pawn {
                term -= 25;
            } else if !file_has_own_pawn {
                term -= 15;
            }
        }

        for dr in -2i32..=2 {
            for df in -2i32..=2 {
                let r = king_sq.rank() as i32 + dr;
                let f = king_sq.file() as i32 + df;
                if !(0..8).contains(&r) || !(0..8).contains(&f) {
                    continue;
                }
                let Some(zone_sq) = Square::new(r as u8, f as u8) else { continue };
                let attacker_is_non_pawn = pos.attackers(!color, zone_sq).into_iter().any(|a| {
                    pos.piece_at(a).is_some_and(|(p, _)| p != Piece::Pawn)
                });
                if attacker_is_non_pawn {
                    term -= 8;
                }
            }
        }
        score += sign * term;
    }
    (score as f64 * weight).round() as i32
}

fn piece_features(pos: &impl Position) -> i32 {
    let mut score = 0;
    for color in Color::ALL {
        let sign = if color == Color::White { 1 } else { -1 };
        let bishops = pos.pieces(Piece::Bishop, color);
        if bishops.len() >= 2 {
            score += sign * BISHOP_PAIR_BONUS;
        }
        let own_pawns = pos.pieces(Piece::Pawn, color);
        for bishop_sq in bishops {
            let is_light = (bishop_sq.rank() + bishop_sq.file()) % 2 == 1;
            let same_color_pawns = own_pawns.into_iter().filter(|p| (p.rank() + p.file()) % 2 == u8::from(is_light)).count() as i32;
            score += sign * -5 * same_color_pawns;
        }

        let enemy_pawns = pos.pieces(Piece::Pawn, !color);
        for rook_sq in pos.pieces(Piece::Rook, color) {
            let file = rook_sq.file();
            let own_on_file = (0..8).any(|r| Square::new(r, file).is_some_and(|s| own_pawns.contains(s)));
            let enemy_on_file = (0..8).any(|r| Square::new(r, file).is_some_and(|s| enemy_pawns.contains(s)));
            if !own_on_file && !enemy_on_file {
                score += sign * 25;
            } else if !own_on_file {
                score += sign * 12;
            }
            let seventh_rank = if color == Color::White { 6 } else { 1 };
            if rook_sq.rank() == seventh_rank {
                let mut bonus = 20;
                let enemy_king_rank = pos.king_square(!color).rank();
                let back_two = if color == Color::White { [6u8, 7] } else { [0u8, 1] };
                if back_two.contains(&enemy_king_rank) {
                    bonus += 30;
                }
                if enemy_pawns.len() > 0 {
                    bonus += 15;
                }
                score += sign * bonus;
            }
        }

        for knight_sq in pos.pieces(Piece::Knight, color) {
            let outpost_rank = if color == Color::White { 4u8 } else { 3u8 };
            if knight_sq.rank() == outpost_rank || (color == Color::White && knight_sq.rank() > outpost_rank) || (color == Color::Black && knight_sq.rank() < outpost_rank) {
                let file = knight_sq.file() as i32;
                let defended_by_pawn = [file - 1, file + 1].into_iter().any(|f| {
                    if !(0..8).contains(&f) {
                        return false;
                    }
                    let support_rank = if color == Color::White { knight_sq.rank() as i32 - 1 } else { knight_sq.rank() as i32 + 1 };
                    (0..8).contains(&support_rank) && Square::new(support_rank as u8, f as u8).is_some_and(|s| own_pawns.contains(s))
                });
                let can_be_challenged_by_pawn = [file - 1, file + 1].into_iter().any(|f| {
                    (0..8).contains(&f) && (0..8).any(|r| Square::new(r, f as u8).is_some_and(|s| enemy_pawns.contains(s)))
                });
                if defended_by_pawn && !can_be_challenged_by_pawn {
                    let rank_bonus = if color == Color::White { knight_sq.rank() as i32 } else { 7 - knight_sq.rank() as i32 };
                    score += sign * (15 + 3 * rank_bonus);
                }
            }
        }
    }
    score
}

fn trapped_pieces(pos: &impl Position) -> i32 {
    let mut score = 0;
    for color in Color::ALL {
        let sign = if color == Color::White { 1 } else { -1 };
        let trap_squares: [(Square, [Square; 2]); 4] = [
            (Square::A7, [Square::B8, Square::B6]),
            (Square::H7, [Square::G8, Square::G6]),
            (Square::A2, [Square::B1, Square::B3]),
            (Square::H2, [Square::G1, Square::G3]),
        ];
        for (corner, blockers) in trap_squares {
            if matches!(pos.piece_at(corner), Some((Piece::Bishop, c)) if c == color)
                && blockers.iter().any(|&b| pos.piece_at(b).is_some_and(|(_, bc)| bc != color))
            {
                score += sign * -150;
            }
        }
        for knight_sq in pos.pieces(Piece::Knight, color) {
            let is_corner_ish = matches!(knight_sq, Square::A8 | Square::H8 | Square::A1 | Square::H1);
            if is_corner_ish && pos.attacks(knight_sq).len() <= 2 {
                score += sign * -100;
            }
        }
    }
    score
}

fn coordination(pos: &impl Position) -> i32 {
    let mut score = 0;
    for color in Color::ALL {
        let sign = if color == Color::White { 1 } else { -1 };
        let rooks: Vec<Square> = pos.pieces(Piece::Rook, color).into_iter().collect();
        for i in 0..rooks.len() {
            for j in (i + 1)..rooks.len() {
                if (rooks[i].file() as i32 - rooks[j].file() as i32).abs() == 1 {
                    score += sign * 15;
                }
            }
        }
        for bishop_sq in pos.pieces(Piece::Bishop, color) {
            let bishop_is_light = (bishop_sq.rank() + bishop_sq.file()) % 2 == 1;
            for queen_sq in pos.pieces(Piece::Queen, color) {
                let queen_is_light = (queen_sq.rank() + queen_sq.file()) % 2 == 1;
                if bishop_is_light == queen_is_light {
                    let dr = (bishop_sq.rank() as i32 - queen_sq.rank() as i32).abs();
                    let df = (bishop_sq.file() as i32 - queen_sq.file() as i32).abs();
                    if dr == df && dr > 0 {
                        score += sign * 20;
                    }
                }
            }
        }
    }
    score
}

fn threats(pos: &impl Position) -> i32 {
    let mut score = 0;
    for color in Color::ALL {
        let sign = if color == Color::White { 1 } else { -1 };
        for piece in Piece::NON_PAWN_NON_KING {
            for sq in pos.pieces(piece, color) {
                let attackers = pos.attackers(!color, sq);
                if attackers.len() == 0 {
                    continue;
                }
                let value = piece.value();
                let defended = pos.attackers(color, sq).len() > 0;
                if !defended {
                    score += sign * -(value / 4);
                } else {
                    let least_attacker_value = attackers
                        .into_iter()
                        .filter_map(|a| pos.piece_at(a).map(|(p, _)| p.value()))
                        .min()
                        .unwrap_or(value);
                    if least_attacker_value < value {
                        score += sign * -((value - least_attacker_value) / 8);
                    }
                }
            }
        }
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use vantage_position::GamePosition;

    #[test]
    fn starting_position_is_symmetric() {
        let pos = GamePosition::new();
        assert_eq!(evaluate(&pos), TEMPO_BONUS);
    }

    #[test]
    fn extra_queen_is_winning() {
        let pos = GamePosition::from_fen("4k3/8/8/8/8/8/8/QQQQK3 w - - 0 1").unwrap();
        assert!(evaluate(&pos) > 500);
    }

    #[test]
    fn checkmate_scores_as_mate() {
        let pos = GamePosition::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").unwrap();
        assert_eq!(evaluate(&pos), -crate::score::MATE);
    }

    #[test]
    fn stalemate_is_a_draw() {
        let pos = GamePosition::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(evaluate(&pos), 0);
    }

    #[test]
    fn bishop_pair_outscores_two_knights_all_else_equal() {
        let bishop_pair = GamePosition::from_fen("4k3/8/8/8/8/8/8/2BB1K2 w - - 0 1").unwrap();
        let two_knights = GamePosition::from_fen("4k3/8/8/8/8/8/8/2NN1K2 w - - 0 1").unwrap();
        assert!(evaluate(&bishop_pair) > evaluate(&two_knights));
    }

    #[test]
    fn evaluation_is_symmetric_under_rank_flip_and_color_swap() {
        // A position and its rank-mirrored, color-swapped counterpart should
        // evaluate the same from the perspective of whoever is to move, up
        // to the fixed tempo bonus.
        let pos = GamePosition::from_fen("4k3/8/8/3P4/8/8/8/4K3 w - - 0 1").unwrap();
        let mirrored = GamePosition::from_fen("4k3/8/8/8/3p4/8/8/4K3 b - - 0 1").unwrap();
        assert!((evaluate(&pos) - evaluate(&mirrored)).abs() <= 20);
    }
}
