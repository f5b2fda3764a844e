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

//! Legal move generation: generate pseudo-legal moves per piece type, then
//! filter out any that leave the mover's own king in check.

use crate::{attacks, board::Board, Bitboard, Color, Move, Piece, Square};

/// Which subset of moves to generate. `Captures` additionally includes
/// promotions (quiescence search wants both).
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum GenKind {
    All,
    CapturesAndPromotions,
}

#[must_use]
pub fn legal_moves(board: &Board, kind: GenKind) -> Vec<Move> {
    let pseudo = pseudo_legal_moves(board, kind);
    let color = board.side_to_move();
    pseudo
        .into_iter()
        .filter(|&m| is_legal(board, m, color))
        .collect()
}

/// Whether playing `m` (already known pseudo-legal) leaves `color`'s own king
/// safe. Makes and unmakes on a scratch copy since `Board` is cheap to clone.
fn is_legal(board: &Board, m: Move, color: Color) -> bool {
    let mut scratch = board.clone();
    scratch.make(m);
    !scratch.is_in_check(color)
}

fn pseudo_legal_moves(board: &Board, kind: GenKind) -> Vec<Move> {
    let color = board.side_to_move();
    let mut moves = Vec::with_capacity(64);
    let own = board.occupancy_of(color);
    let enemy = board.occupancy_of(!color);
    let occ = board.occupancy();

    gen_pawn_moves(board, color, kind, &mut moves);

    for (piece, attack_fn) in [
        (Piece::Bishop, attacks::bishop_attacks as fn(Square, Bitboard) -> Bitboard),
        (Piece::Rook, attacks::rook_attacks as fn(Square, Bitboard) -> Bitboard),
        (Piece::Queen, attacks::queen_attacks as fn(Square, Bitboard) -> Bitboard),
    ] {
        for from in board.pieces_of(piece, color) {
            let targets = attack_fn(from, occ) & !own;
            push_targets(from, targets, enemy, kind, &mut moves);
        }
    }

    for from in board.pieces_of(Piece::Knight, color) {
        let targets = attacks::knight_attacks(from) & !own;
        push_targets(from, targets, enemy, kind, &mut moves);
    }

    for from in board.pieces_of(Piece::King, color) {
        let targets = attacks::king_attacks(from) & !own;
        push_targets(from, targets, enemy, kind, &mut moves);
    }

    if kind == GenKind::All {
        gen_castles(board, color, &mut moves);
    }

    moves
}

fn push_targets(from: Square, targets: Bitboard, enemy: Bitboard, kind: GenKind, moves: &mut Vec<Move>) {
    for to in targets {
        if kind == GenKind::CapturesAndPromotions && !enemy.contains(to) {
            continue;
        }
        moves.push(Move::normal(from, to));
    }
}

fn gen_pawn_moves(board: &Board, color: Color, kind: GenKind, moves: &mut Vec<Move>) {
    let occ = board.occupancy();
    let enemy = board.occupancy_of(!color);
    let dir = color.pawn_direction();
    let promote_rank = color.promotion_rank();

    for from in board.pieces_of(Piece::Pawn, color) {
        let one_step = from + dir;
        let blocked = occ.contains(one_step);

        if kind == GenKind::All && !blocked {
            push_pawn_move(from, one_step, promote_rank, moves);
            let start_rank = if color == Color::White { 1 } else { 6 };
            if from.rank() == start_rank {
                let two_step = one_step + dir;
                if !occ.contains(two_step) {
                    moves.push(Move::normal(from, two_step));
                }
            }
        }

        let dr: i8 = if color == Color::White { 1 } else { -1 };
        for df in [-1i8, 1] {
            let nr = from.rank() as i8 + dr;
            let nf = from.file() as i8 + df;
            if !(0..8).contains(&nr) || !(0..8).contains(&nf) {
                continue;
            }
            let to = Square::new(nr as u8, nf as u8).unwrap();
            if enemy.contains(to) {
                push_pawn_move(from, to, promote_rank, moves);
            } else if Some(to) == board.en_passant_square() {
                moves.push(Move::en_passant(from, to));
            }
        }
    }
}

fn push_pawn_move(from: Square, to: Square, promote_rank: u8, moves: &mut Vec<Move>) {
    if to.rank() == promote_rank {
        for pt in Piece::PROMOTION_TYPES {
            moves.push(Move::promoting(from, to, pt));
        }
    } else {
        moves.push(Move::normal(from, to));
    }
}

fn gen_castles(board: &Board, color: Color, moves: &mut Vec<Move>) {
    if board.is_in_check(color) {
        return;
    }
    let back_rank = color.back_rank();
    let king_sq = Square::new(back_rank, 4).unwrap();
    let occ = board.occupancy();
    let rights = board.castle_rights(color);

    if rights.can_castle_kingside(color) {
        let f = Square::new(back_rank, 5).unwrap();
        let g = Square::new(back_rank, 6).unwrap();
        if !occ.contains(f)
            && !occ.contains(g)
            && !board.is_square_attacked_by(king_sq, !color)
            && !board.is_square_attacked_by(f, !color)
            && !board.is_square_attacked_by(g, !color)
        {
            moves.push(Move::castling(king_sq, g));
        }
    }
    if rights.can_castle_queenside(color) {
        let d = Square::new(back_rank, 3).unwrap();
        let c = Square::new(back_rank, 2).unwrap();
        let b = Square::new(back_rank, 1).unwrap();
        if !occ.contains(d)
            && !occ.contains(c)
            && !occ.contains(b)
            && !board.is_square_attacked_by(king_sq, !color)
            && !board.is_square_attacked_by(d, !color)
            && !board.is_square_attacked_by(c, !color)
        {
            moves.push(Move::castling(king_sq, c));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_has_twenty_moves() {
        let b = Board::starting_position();
        assert_eq!(legal_moves(&b, GenKind::All).len(), 20);
    }

    #[test]
    fn king_in_check_must_respond() {
        // White king on e1 in check from a rook on e8; only legal moves
        // block, capture, or move the king off the e-file/rank.
        let b = Board::from_fen("4r1k1/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let moves = legal_moves(&b, GenKind::All);
        assert!(!moves.is_empty());
        for m in moves {
            let mut scratch = b.clone();
            scratch.make(m);
            assert!(!scratch.is_in_check(Color::White));
        }
    }

    #[test]
    fn stalemate_has_no_legal_moves() {
        // Classic stalemate: Black king on h8, White king g6, White queen f7.
        let b = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(legal_moves(&b, GenKind::All).is_empty());
        assert!(!b.is_in_check(Color::Black));
    }

    #[test]
    fn back_rank_mate_in_one_is_found() {
        let b = Board::from_fen("6k1/5ppp/8/8/8/8/8/R6K w - - 0 1").unwrap();
        let moves = legal_moves(&b, GenKind::All);
        let mating_move = Move::normal(Square::A1, Square::A8);
        assert!(moves.contains(&mating_move));
        let mut scratch = b.clone();
        scratch.make(mating_move);
        assert!(scratch.is_in_check(Color::Black));
        assert!(legal_moves(&scratch, GenKind::All).is_empty());
    }
}
