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

//! Search scores, expressed in centipawns from the perspective of the side to
//! move. Mates are encoded as a large constant minus the number of plies to
//! deliver them, so that shorter mates always outscore longer ones.

/// A score so large no real evaluation can reach it; used as the initial
/// alpha/beta window bound.
pub const INF: i32 = 999_999;

/// The score of delivering mate on the current move. Mates further away are
/// this value minus their ply distance, so `MATE - 1` is mate-in-1 and so on.
pub const MATE: i32 = 100_000;

/// Plies beyond which a "mate score" can no longer be distinguished from a
/// merely very good score; also the fixed size of the killer-move table.
pub const MAX_PLY: usize = 64;

#[must_use]
/// The score for delivering mate in `ply` plies (`ply` = 0 means mate has
/// just been delivered on the board).
pub fn mate_in(ply: u32) -> i32 {
    MATE - ply as i32
}

#[must_use]
/// Whether `score` represents a forced mate for either side, as opposed to a
/// material/positional evaluation that merely happens to be large.
pub fn is_mate_score(score: i32) -> bool {
    score.abs() > MATE - MAX_PLY as i32
}

#[must_use]
/// Adjust a mate score found `ply_from_root` plies into the tree into one
/// relative to the root, for storage in the transposition table. A mate
/// score found deep in the tree is "further away" once viewed from the root,
/// since the plies already spent recursing must be added back on.
///
/// Mirrors the usual engine convention (Stockfish calls this
/// `value_to_tt`/`value_from_tt`) of storing mate distances relative to the
/// node they were found in, not the root, so that a single TT entry remains
/// valid no matter how deep in the tree it is probed from.
pub fn to_tt(score: i32, ply_from_root: u32) -> i32 {
    if score > MATE - MAX_PLY as i32 {
        score + ply_from_root as i32
    } else if score < -(MATE - MAX_PLY as i32) {
        score - ply_from_root as i32
    } else {
        score
    }
}

#[must_use]
/// The inverse of [`to_tt`]: convert a mate score stored relative to the root
/// back into one relative to the probing node.
pub fn from_tt(score: i32, ply_from_root: u32) -> i32 {
    if score > MATE - MAX_PLY as i32 {
        score - ply_from_root as i32
    } else if score < -(MATE - MAX_PLY as i32) {
        score + ply_from_root as i32
    } else {
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mate_in_one_outscores_mate_in_three() {
        assert!(mate_in(1) > mate_in(3));
    }

    #[test]
    fn mate_scores_are_recognized() {
        assert!(is_mate_score(mate_in(5)));
        assert!(is_mate_score(-mate_in(5)));
        assert!(!is_mate_score(300));
    }

    #[test]
    fn tt_round_trip_preserves_plain_scores() {
        assert_eq!(from_tt(to_tt(250, 7), 7), 250);
    }

    #[test]
    fn tt_round_trip_preserves_mate_scores() {
        let found_at_depth = mate_in(2);
        let stored = to_tt(found_at_depth, 5);
        // Stored relative to the root, so it grows by the depth at which it
        // was found...
        assert_eq!(stored, MATE - 2 + 5);
        // ...and converts back to the original distance when re-probed at
        // the same depth.
        assert_eq!(from_tt(stored, 5), found_at_depth);
    }
}
