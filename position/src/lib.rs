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

//! A chess rules engine: board representation, legal move generation, and
//! the game-history bookkeeping (`GamePosition`) that a search needs for
//! make/unmake and repetition detection.
//!
//! This crate knows nothing about evaluation, search, or move ordering; it
//! only answers "what are the legal moves here" and "what does the board
//! look like after this one."

mod algebraic;
mod attacks;
mod bitboard;
mod board;
mod castling;
mod color;
mod direction;
mod movegen;
mod moves;
mod piece;
mod position;
mod square;
mod zobrist;

pub use algebraic::{from_algebraic, to_algebraic};
pub use bitboard::Bitboard;
pub use board::{Board, BoardError};
pub use castling::CastleRights;
pub use color::Color;
pub use direction::Direction;
pub use movegen::GenKind;
pub use moves::Move;
pub use piece::Piece;
pub use position::GamePosition;
pub use square::Square;
