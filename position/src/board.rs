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

//! `Board`: piece placement, castling rights, en passant, and an incrementally
//! maintained Zobrist hash. Carries no move history; that is `GamePosition`'s
//! job (see `position.rs`).

use std::fmt::{Display, Formatter};

use crate::{attacks, castling::CastleRights, zobrist, Bitboard, Color, Move, Piece, Square};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardError(pub &'static str);

impl Display for BoardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for BoardError {}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Piece placement plus the state needed to generate moves and detect
/// repetitions: castling rights, en-passant target, halfmove clock, and the
/// running Zobrist hash.
pub struct Board {
    /// Indexed `[color][piece]`.
    pieces: [[Bitboard; Piece::NUM_TYPES]; 2],
    occupancy: [Bitboard; 2],
    side_to_move: Color,
    castle_rights: CastleRights,
    en_passant_square: Option<Square>,
    halfmove_clock: u16,
    pub hash: u64,
}

impl Board {
    #[must_use]
    pub fn starting_position() -> Board {
        Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap()
    }

    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[must_use]
    pub fn castle_rights(&self, color: Color) -> CastleRights {
        self.castle_rights & CastleRights::for_color(color)
    }

    #[must_use]
    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_square
    }

    #[must_use]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    #[must_use]
    pub fn occupancy(&self) -> Bitboard {
        self.occupancy[Color::White as usize] | self.occupancy[Color::Black as usize]
    }

    #[must_use]
    pub fn occupancy_of(&self, color: Color) -> Bitboard {
        self.occupancy[color as usize]
    }

    #[must_use]
    pub fn pieces_of(&self, piece: Piece, color: Color) -> Bitboard {
        self.pieces[color as usize][piece as usize]
    }

    #[must_use]
    pub fn king_square(&self, color: Color) -> Square {
        self.pieces_of(Piece::King, color)
            .first_square()
            .expect("every legal position has exactly one king per side")
    }

    #[must_use]
    /// The piece and color occupying `sq`, if any.
    pub fn piece_at(&self, sq: Square) -> Option<(Piece, Color)> {
        for color in Color::ALL {
            for piece in Piece::ALL {
                if self.pieces[color as usize][piece as usize].contains(sq) {
                    return Some((piece, color));
                }
            }
        }
        None
    }

    #[must_use]
    /// Squares attacked by the piece sitting on `sq` (empty if none sits
    /// there).
    pub fn attacks_from(&self, sq: Square) -> Bitboard {
        match self.piece_at(sq) {
            None => Bitboard::EMPTY,
            Some((Piece::Pawn, color)) => pawn_attack_targets(sq, color),
            Some((Piece::Knight, _)) => attacks::knight_attacks(sq),
            Some((Piece::Bishop, _)) => attacks::bishop_attacks(sq, self.occupancy()),
            Some((Piece::Rook, _)) => attacks::rook_attacks(sq, self.occupancy()),
            Some((Piece::Queen, _)) => attacks::queen_attacks(sq, self.occupancy()),
            Some((Piece::King, _)) => attacks::king_attacks(sq),
        }
    }

    #[must_use]
    /// Squares from which a piece of `color` attacks `sq`.
    pub fn attackers(&self, color: Color, sq: Square) -> Bitboard {
        let occ = self.occupancy();
        let mut attackers = Bitboard::EMPTY;
        attackers |= self.pieces_of(Piece::Knight, color) & attacks::knight_attacks(sq);
        attackers |= self.pieces_of(Piece::King, color) & attacks::king_attacks(sq);
        let diag = attacks::bishop_attacks(sq, occ);
        attackers |= diag & (self.pieces_of(Piece::Bishop, color) | self.pieces_of(Piece::Queen, color));
        let orth = attacks::rook_attacks(sq, occ);
        attackers |= orth & (self.pieces_of(Piece::Rook, color) | self.pieces_of(Piece::Queen, color));
        // A pawn of `color` attacks `sq` iff `sq` is one of the squares that
        // pawn's own attack set would contain, i.e. the reverse pawn-capture
        // direction from `sq`.
        attackers |= self.pieces_of(Piece::Pawn, color) & pawn_attackers_of(sq, color);
        attackers
    }

    #[must_use]
    pub fn is_square_attacked_by(&self, sq: Square, color: Color) -> bool {
        !self.attackers(color, sq).is_empty()
    }

    #[must_use]
    pub fn is_in_check(&self, color: Color) -> bool {
        self.is_square_attacked_by(self.king_square(color), !color)
    }

    fn place(&mut self, sq: Square, piece: Piece, color: Color) {
        self.pieces[color as usize][piece as usize].insert(sq);
        self.occupancy[color as usize].insert(sq);
        self.hash ^= zobrist::piece_key(sq, piece, color);
    }

    fn remove(&mut self, sq: Square, piece: Piece, color: Color) {
        self.pieces[color as usize][piece as usize].remove(sq);
        self.occupancy[color as usize].remove(sq);
        self.hash ^= zobrist::piece_key(sq, piece, color);
    }

    /// Snapshot of everything a `make` needs to later undo that `make` cannot
    /// reconstruct from the mover's own from/to squares: the captured piece
    /// (if any), the prior castling rights, en-passant square, and halfmove
    /// clock.
    pub(crate) fn make(&mut self, m: Move) -> Undo {
        let mover_color = self.side_to_move;
        let (mover_piece, _) = self
            .piece_at(m.from_square())
            .expect("make() requires a piece on the from-square");

        let captured = if m.is_en_passant() {
            let captured_sq = Square::new(m.from_square().rank(), m.to_square().file()).unwrap();
            Some((captured_sq, Piece::Pawn, !mover_color))
        } else {
            self.piece_at(m.to_square())
                .map(|(p, c)| (m.to_square(), p, c))
        };

        let undo = Undo {
            captured,
            castle_rights: self.castle_rights,
            en_passant_square: self.en_passant_square,
            halfmove_clock: self.halfmove_clock,
            hash_before: self.hash,
        };

        if let Some((sq, piece, color)) = captured {
            self.remove(sq, piece, color);
        }

        self.remove(m.from_square(), mover_piece, mover_color);
        let placed_piece = m.promote_type().unwrap_or(mover_piece);
        self.place(m.to_square(), placed_piece, mover_color);

        if m.is_castle() {
            let back_rank = mover_color.back_rank();
            let kingside = m.to_square().file() == 6;
            let (rook_from_file, rook_to_file) = if kingside { (7, 5) } else { (0, 3) };
            let rook_from = Square::new(back_rank, rook_from_file).unwrap();
            let rook_to = Square::new(back_rank, rook_to_file).unwrap();
            self.remove(rook_from, Piece::Rook, mover_color);
            self.place(rook_to, Piece::Rook, mover_color);
        }

        if self.en_passant_square.is_some() {
            self.hash ^= zobrist::en_passant_key(self.en_passant_square.unwrap().file());
        }
        self.en_passant_square = if mover_piece == Piece::Pawn
            && m.from_square().rank().abs_diff(m.to_square().rank()) == 2
        {
            let ep_sq = Square::new((m.from_square().rank() + m.to_square().rank()) / 2, m.from_square().file()).unwrap();
            self.hash ^= zobrist::en_passant_key(ep_sq.file());
            Some(ep_sq)
        } else {
            None
        };

        self.update_castle_rights(m, mover_piece, mover_color);

        self.halfmove_clock = if mover_piece == Piece::Pawn || captured.is_some() {
            0
        } else {
            self.halfmove_clock + 1
        };

        self.side_to_move = !self.side_to_move;
        self.hash ^= zobrist::black_to_move_key();

        undo
    }

    fn update_castle_rights(&mut self, m: Move, mover_piece: Piece, mover_color: Color) {
        let old = self.castle_rights;
        if mover_piece == Piece::King {
            self.castle_rights &= !CastleRights::for_color(mover_color);
        }
        for (sq, right) in [
            (Square::A1, CastleRights::queenside(Color::White)),
            (Square::H1, CastleRights::kingside(Color::White)),
            (Square::A8, CastleRights::queenside(Color::Black)),
            (Square::H8, CastleRights::kingside(Color::Black)),
        ] {
            if m.from_square() == sq || m.to_square() == sq {
                self.castle_rights &= !right;
            }
        }
        if old != self.castle_rights {
            for bit in 0..4 {
                let right = CastleRights(1 << bit);
                let had = old & right != CastleRights::NONE;
                let has = self.castle_rights & right != CastleRights::NONE;
                if had != has {
                    self.hash ^= zobrist::castle_key(bit);
                }
            }
        }
    }

    pub(crate) fn unmake(&mut self, m: Move, undo: Undo) {
        self.side_to_move = !self.side_to_move;
        let mover_color = self.side_to_move;
        let placed_piece = m.promote_type().unwrap_or_else(|| {
            self.piece_at(m.to_square())
                .expect("to-square must be occupied before unmake")
                .0
        });
        let original_piece = if m.is_promotion() { Piece::Pawn } else { placed_piece };

        self.remove(m.to_square(), placed_piece, mover_color);
        self.place(m.from_square(), original_piece, mover_color);

        if m.is_castle() {
            let back_rank = mover_color.back_rank();
            let kingside = m.to_square().file() == 6;
            let (rook_from_file, rook_to_file) = if kingside { (7, 5) } else { (0, 3) };
            let rook_from = Square::new(back_rank, rook_from_file).unwrap();
            let rook_to = Square::new(back_rank, rook_to_file).unwrap();
            self.remove(rook_to, Piece::Rook, mover_color);
            self.place(rook_from, Piece::Rook, mover_color);
        }

        if let Some((sq, piece, color)) = undo.captured {
            self.place(sq, piece, color);
        }

        self.castle_rights = undo.castle_rights;
        self.en_passant_square = undo.en_passant_square;
        self.halfmove_clock = undo.halfmove_clock;
        self.hash = undo.hash_before;
    }

    pub(crate) fn make_null(&mut self) -> NullUndo {
        let undo = NullUndo {
            en_passant_square: self.en_passant_square,
            hash_before: self.hash,
        };
        if let Some(ep) = self.en_passant_square {
            self.hash ^= zobrist::en_passant_key(ep.file());
        }
        self.en_passant_square = None;
        self.side_to_move = !self.side_to_move;
        self.hash ^= zobrist::black_to_move_key();
        undo
    }

    pub(crate) fn unmake_null(&mut self, undo: NullUndo) {
        self.side_to_move = !self.side_to_move;
        self.en_passant_square = undo.en_passant_square;
        self.hash = undo.hash_before;
    }

    #[must_use]
    /// True if `color` has no pawns and no way to deliver checkmate with the
    /// material remaining (K vs K, K+N vs K, K+B vs K).
    pub fn is_insufficient_material(&self) -> bool {
        let total_minors = |c: Color| {
            self.pieces_of(Piece::Knight, c).len() + self.pieces_of(Piece::Bishop, c).len()
        };
        let has_major_or_pawn = |c: Color| {
            !self.pieces_of(Piece::Pawn, c).is_empty()
                || !self.pieces_of(Piece::Rook, c).is_empty()
                || !self.pieces_of(Piece::Queen, c).is_empty()
        };
        if has_major_or_pawn(Color::White) || has_major_or_pawn(Color::Black) {
            return false;
        }
        total_minors(Color::White) <= 1 && total_minors(Color::Black) <= 1
    }

    pub fn from_fen(fen: &str) -> Result<Board, BoardError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() < 4 {
            return Err(BoardError("FEN must have at least 4 fields"));
        }
        let mut board = Board {
            pieces: [[Bitboard::EMPTY; Piece::NUM_TYPES]; 2],
            occupancy: [Bitboard::EMPTY; 2],
            side_to_move: Color::White,
            castle_rights: CastleRights::NONE,
            en_passant_square: None,
            halfmove_clock: 0,
            hash: 0,
        };

        let mut rank = 7i8;
        let mut file = 0i8;
        for c in fields[0].chars() {
            match c {
                '/' => {
                    rank -= 1;
                    file = 0;
                }
                '1'..='8' => file += c.to_digit(10).unwrap() as i8,
                c => {
                    let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
                    let piece = Piece::from_code(c.to_ascii_uppercase())
                        .ok_or(BoardError("invalid piece character in FEN"))?;
                    let sq = Square::new(rank as u8, file as u8).ok_or(BoardError("FEN rank/file out of range"))?;
                    board.place(sq, piece, color);
                    file += 1;
                }
            }
        }

        board.side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            _ => return Err(BoardError("invalid side-to-move field")),
        };
        if board.side_to_move == Color::Black {
            board.hash ^= zobrist::black_to_move_key();
        }

        for c in fields[2].chars() {
            board.castle_rights |= match c {
                'K' => CastleRights::kingside(Color::White),
                'Q' => CastleRights::queenside(Color::White),
                'k' => CastleRights::kingside(Color::Black),
                'q' => CastleRights::queenside(Color::Black),
                '-' => CastleRights::NONE,
                _ => return Err(BoardError("invalid castling field")),
            };
        }
        for bit in 0..4 {
            if board.castle_rights & CastleRights(1 << bit) != CastleRights::NONE {
                board.hash ^= zobrist::castle_key(bit);
            }
        }

        if fields[3] != "-" {
            let sq = Square::from_algebraic(fields[3]).map_err(|_| BoardError("invalid en-passant field"))?;
            board.en_passant_square = Some(sq);
            board.hash ^= zobrist::en_passant_key(sq.file());
        }

        if let Some(hm) = fields.get(4) {
            board.halfmove_clock = hm.parse().map_err(|_| BoardError("invalid halfmove clock"))?;
        }

        Ok(board)
    }
}

/// Everything `make` changes that `unmake` cannot derive from the move alone.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Undo {
    captured: Option<(Square, Piece, Color)>,
    castle_rights: CastleRights,
    en_passant_square: Option<Square>,
    halfmove_clock: u16,
    hash_before: u64,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct NullUndo {
    en_passant_square: Option<Square>,
    hash_before: u64,
}

/// Squares a pawn of `color` on `sq` attacks (diagonal captures only).
fn pawn_attack_targets(sq: Square, color: Color) -> Bitboard {
    let mut bb = Bitboard::EMPTY;
    let rank = sq.rank() as i8;
    let file = sq.file() as i8;
    let dr: i8 = if color == Color::White { 1 } else { -1 };
    for df in [-1i8, 1] {
        let nr = rank + dr;
        let nf = file + df;
        if (0..8).contains(&nr) && (0..8).contains(&nf) {
            bb.insert(Square::new(nr as u8, nf as u8).unwrap());
        }
    }
    bb
}

/// Squares from which a pawn of `color` would attack `sq` (the reverse of
/// `pawn_attack_targets`), used by `attackers()`.
fn pawn_attackers_of(sq: Square, color: Color) -> Bitboard {
    let mut bb = Bitboard::EMPTY;
    let rank = sq.rank() as i8;
    let file = sq.file() as i8;
    // A pawn of `color` attacks forward from its own perspective, so to find
    // the squares it could have come from we step backward.
    let dr: i8 = if color == Color::White { -1 } else { 1 };
    for df in [-1i8, 1] {
        let nr = rank + dr;
        let nf = file + df;
        if (0..8).contains(&nr) && (0..8).contains(&nf) {
            bb.insert(Square::new(nr as u8, nf as u8).unwrap());
        }
    }
    bb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_piece_counts() {
        let b = Board::starting_position();
        assert_eq!(b.pieces_of(Piece::Pawn, Color::White).len(), 8);
        assert_eq!(b.pieces_of(Piece::King, Color::White).len(), 1);
        assert_eq!(b.occupancy().len(), 32);
    }

    #[test]
    fn make_and_unmake_restores_hash() {
        let mut b = Board::starting_position();
        let hash_before = b.hash;
        let m = Move::normal(Square::E2, Square::E4);
        let undo = b.make(m);
        assert_ne!(b.hash, hash_before);
        b.unmake(m, undo);
        assert_eq!(b.hash, hash_before);
        assert_eq!(b, Board::starting_position());
    }

    #[test]
    fn en_passant_capture_removes_pawn() {
        let mut b = Board::from_fen("rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1").unwrap();
        let m = Move::en_passant(Square::D4, Square::E3);
        let undo = b.make(m);
        assert!(b.piece_at(Square::E4).is_none());
        assert_eq!(b.piece_at(Square::E3), Some((Piece::Pawn, Color::Black)));
        b.unmake(m, undo);
        assert_eq!(b.piece_at(Square::E4), Some((Piece::Pawn, Color::White)));
    }

    #[test]
    fn castling_moves_the_rook_too() {
        let mut b = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let m = Move::castling(Square::E1, Square::G1);
        b.make(m);
        assert_eq!(b.piece_at(Square::F1), Some((Piece::Rook, Color::White)));
        assert_eq!(b.piece_at(Square::G1), Some((Piece::King, Color::White)));
        assert!(b.piece_at(Square::H1).is_none());
    }

    #[test]
    fn insufficient_material_king_vs_king() {
        let b = Board::from_fen("8/8/8/4k3/8/8/8/4K3 w - - 0 1").unwrap();
        assert!(b.is_insufficient_material());
    }
}
