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

//! Move ordering.
//!
//! A good move ordering puts the moves likely to be best first, so that
//! alpha-beta gets its cutoffs early. `MoveOrderer` generates moves lazily,
//! phase by phase, so a transposition-table hit can end a node without the
//! rest of the position's moves ever being generated at all.

use std::mem::swap;

use vantage_position::{Move, Piece};

use crate::position::Position;
use crate::tables::{CountermoveTable, HistoryTable, KillerTable};

const HASH_MOVE_SCORE: i32 = 10_000_000;
const PROMOTION_BASE_SCORE: i32 = 900_000;
const KILLER_PRIMARY_SCORE: i32 = 800_000;
const KILLER_SECONDARY_SCORE: i32 = 700_000;
const COUNTERMOVE_SCORE: i32 = 650_000;

#[must_use]
/// Score a move for ordering purposes: higher is tried earlier. The buckets
/// are spaced far enough apart that they never interleave (even the largest
/// plausible history count cannot reach a countermove's score, and so on up
/// the chain to the hash move).
pub fn candidacy(
    pos: &impl Position,
    m: Move,
    ply: usize,
    killers: &KillerTable,
    history: &HistoryTable,
    countermoves: &CountermoveTable,
    previous_move: Option<Move>,
) -> i32 {
    if pos.is_capture(m) {
        let victim_value = if m.is_en_passant() {
            Piece::Pawn.value()
        } else {
            pos.piece_at(m.to_square()).map_or(0, |(p, _)| p.value())
        };
        let attacker_value = pos.piece_at(m.from_square()).map_or(0, |(p, _)| p.value());
        return 1_000_000 + 10 * victim_value - attacker_value;
    }
    if let Some(promoted) = m.promote_type() {
        return PROMOTION_BASE_SCORE + promoted.value();
    }
    let [killer1, killer2] = killers.get(ply);
    if killer1 == Some(m) {
        return KILLER_PRIMARY_SCORE;
    }
    if killer2 == Some(m) {
        return KILLER_SECONDARY_SCORE;
    }
    if previous_move.and_then(|prev| countermoves.get(prev)) == Some(m) {
        return COUNTERMOVE_SCORE;
    }
    history.get(m.from_square(), m.to_square())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Phase {
    Transposition,
    PreMain,
    Main,
}

pub struct MoveOrderer {
    buffer: Vec<(Move, i32)>,
    index: usize,
    phase: Phase,
    tt_move: Option<Move>,
}

impl MoveOrderer {
    #[must_use]
    /// Build an orderer for `pos`. `tt_move` must already be known-legal in
    /// `pos` (the search is expected to have checked this when it probed the
    /// transposition table); moves are otherwise generated lazily once the
    /// hash move phase is exhausted.
    pub fn new(
        pos: &impl Position,
        tt_move: Option<Move>,
        ply: usize,
        killers: &KillerTable,
        history: &HistoryTable,
        countermoves: &CountermoveTable,
        previous_move: Option<Move>,
    ) -> MoveOrderer {
        let buffer = pos
            .legal_moves()
            .into_iter()
            .filter(|&m| Some(m) != tt_move)
            .map(|m| (m, candidacy(pos, m, ply, killers, history, countermoves, previous_move)))
            .collect();
        MoveOrderer { buffer, index: 0, phase: Phase::Transposition, tt_move }
    }
}

/// In-place insertion sort to the front: after this call, `moves[idx]` holds
/// the best-scoring move from `idx` onward. Cheaper than a full sort when
/// (as is common) a beta cutoff ends the loop after only a few moves.
fn select_best(moves: &mut [(Move, i32)], idx: usize) -> (Move, i32) {
    let mut best = moves[idx];
    for entry in moves.iter_mut().skip(idx + 1) {
        if entry.1 > best.1 {
            swap(entry, &mut best);
        }
    }
    best
}

impl Iterator for MoveOrderer {
    type Item = Move;

    fn next(&mut self) -> Option<Move> {
        match self.phase {
            Phase::Transposition => {
                self.phase = Phase::PreMain;
                match self.tt_move {
                    Some(m) => Some(m),
                    None => self.next(),
                }
            }
            Phase::PreMain => {
                self.phase = Phase::Main;
                self.next()
            }
            Phase::Main => {
                if self.index >= self.buffer.len() {
                    return None;
                }
                let (m, _) = select_best(&mut self.buffer, self.index);
                self.index += 1;
                Some(m)
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.buffer.len().saturating_sub(self.index) + usize::from(self.phase == Phase::Transposition);
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vantage_position::GamePosition;

    #[test]
    fn hash_move_comes_first() {
        let pos = GamePosition::new();
        let killers = KillerTable::new();
        let history = HistoryTable::new();
        let countermoves = CountermoveTable::new();
        let moves = pos.legal_moves();
        let hash_move = moves[10];
        let mut orderer = MoveOrderer::new(&pos, Some(hash_move), 0, &killers, &history, &countermoves, None);
        assert_eq!(orderer.next(), Some(hash_move));
    }

    #[test]
    fn orderer_visits_every_legal_move_exactly_once() {
        let pos = GamePosition::new();
        let killers = KillerTable::new();
        let history = HistoryTable::new();
        let countermoves = CountermoveTable::new();
        let orderer = MoveOrderer::new(&pos, None, 0, &killers, &history, &countermoves, None);
        let mut seen: Vec<Move> = orderer.collect();
        seen.sort_by_key(|m| m.to_uci());
        let mut expected = pos.legal_moves();
        expected.sort_by_key(|m| m.to_uci());
        assert_eq!(seen, expected);
    }

    #[test]
    fn a_winning_capture_outranks_a_quiet_move() {
        let pos = GamePosition::from_fen("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1").unwrap();
        let killers = KillerTable::new();
        let history = HistoryTable::new();
        let countermoves = CountermoveTable::new();
        let orderer = MoveOrderer::new(&pos, None, 0, &killers, &history, &countermoves, None);
        let first = orderer.into_iter().next().unwrap();
        assert!(pos.is_capture(first));
    }
}
