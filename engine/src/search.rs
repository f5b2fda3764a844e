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

//! The node-level search: principal variation search with null-move
//! pruning, futility pruning, late-move reductions, check extensions, and a
//! capture-only quiescence search at the horizon.
//!
//! Polymorphism over depth-dependent search behavior (are we on the
//! principal variation? the root? allowed to reduce?) uses const generics
//! rather than a trait-object hierarchy, following the donor's own solution
//! exactly: `pvs::<P, const PV, const ROOT, const REDUCE>`.

use std::time::{Duration, Instant};

use vantage_position::{Move, Piece};

use crate::config::TIME_CHECK_INTERVAL;
use crate::error::SearchError;
use crate::evaluate::{evaluate, game_phase};
use crate::pick::MoveOrderer;
use crate::position::Position;
use crate::score::{self, INF, MATE, MAX_PLY};
use crate::tables::{CountermoveTable, HistoryTable, KillerTable};
use crate::transposition::{TTFlag, TTable};

const NULL_MOVE_MIN_DEPTH: i32 = 3;
const NULL_MOVE_PHASE_THRESHOLD: f64 = 0.8;
const REVERSE_FUTILITY_MARGIN: [i32; 4] = [0, 120, 250, 400];
const FUTILITY_MARGIN: [i32; 4] = [0, 200, 350, 500];
pub(crate) const LMR_MIN_DEPTH: i32 = 3;
pub(crate) const LMR_MIN_MOVE_INDEX: usize = 3;

/// Node-level search state threaded through one call to the driver's
/// iterative-deepening loop. Plain fields, no atomics or mutexes: the core
/// is single-threaded end to end.
pub struct PVSearch<'a> {
    pub tt: &'a mut TTable,
    pub killers: &'a mut KillerTable,
    pub history: &'a mut HistoryTable,
    pub countermoves: &'a mut CountermoveTable,
    pub nodes: u64,
    nodes_since_check: u64,
    start: Instant,
    time_limit: Option<Duration>,
    pub time_exceeded: bool,
}

impl<'a> PVSearch<'a> {
    #[must_use]
    pub fn new(
        tt: &'a mut TTable,
        killers: &'a mut KillerTable,
        history: &'a mut HistoryTable,
        countermoves: &'a mut CountermoveTable,
        time_limit: Option<Duration>,
    ) -> PVSearch<'a> {
        PVSearch {
            tt,
            killers,
            history,
            countermoves,
            nodes: 0,
            nodes_since_check: 0,
            start: Instant::now(),
            time_limit,
            time_exceeded: false,
        }
    }

    /// Amortized time check: the system clock is only read once every
    /// [`TIME_CHECK_INTERVAL`] nodes, and sets [`PVSearch::time_exceeded`]
    /// rather than returning a `Result`, so a time-out mid-recursion can be
    /// checked for and propagated up without an early `?` at every call site.
    fn poll_time(&mut self) {
        self.nodes += 1;
        self.nodes_since_check += 1;
        if self.nodes_since_check < TIME_CHECK_INTERVAL {
            return;
        }
        self.nodes_since_check = 0;
        if let Some(limit) = self.time_limit {
            if self.start.elapsed() >= limit {
                self.time_exceeded = true;
            }
        }
    }

    /// Principal variation search over `pos`, returning a score relative to
    /// the side to move, or [`SearchError::Timeout`] if the time budget ran
    /// out mid-search. `line` accumulates the principal variation found at
    /// this node and below.
    #[allow(clippy::too_many_arguments)]
    pub fn pvs<P: Position, const PV: bool, const ROOT: bool, const REDUCE: bool>(
        &mut self,
        pos: &mut P,
        mut depth_to_go: i32,
        depth_so_far: u32,
        mut alpha: i32,
        beta: i32,
        line: &mut Vec<Move>,
        previous_move: Option<Move>,
    ) -> Result<i32, SearchError> {
        self.poll_time();
        if self.time_exceeded {
            return Err(SearchError::Timeout);
        }

        if !ROOT && (pos.is_twofold_repetition() || pos.is_fifty_moves()) {
            return Ok(0);
        }

        let key = pos.position_key();
        let in_check = pos.is_check();

        let mut tt_move = None;
        if let Some(entry) = self.tt.probe(key) {
            tt_move = entry.best_move;
        }
        if !ROOT && !PV {
            if let Some(score) = self.tt.probe_cutoff(key, depth_to_go, depth_so_far, alpha, beta) {
                return Ok(score);
            }
        }

        if depth_to_go <= 0 {
            return self.quiesce::<P, PV>(pos, alpha, beta, depth_so_far);
        }

        if in_check && depth_so_far < MAX_PLY as u32 - 1 {
            depth_to_go += 1;
        }

        let static_eval = evaluate(pos);

        if !in_check && depth_to_go >= NULL_MOVE_MIN_DEPTH && game_phase(pos) < NULL_MOVE_PHASE_THRESHOLD && has_non_pawn_material(pos) {
            let reduction = if depth_to_go >= 6 { 3 } else { 2 };
            pos.make_null();
            let mut null_line = Vec::new();
            let result = self.pvs::<P, false, false, true>(
                pos,
                depth_to_go - 1 - reduction,
                depth_so_far + 1,
                -beta,
                -beta + 1,
                &mut null_line,
                None,
            );
            pos.unmake_null();
            match result {
                Ok(score) if -score >= beta => return Ok(beta),
                Err(e) => return Err(e),
                _ => {}
            }
        }

        if !in_check && (depth_to_go as usize) < REVERSE_FUTILITY_MARGIN.len() {
            let margin = REVERSE_FUTILITY_MARGIN[depth_to_go as usize];
            if static_eval - margin >= beta {
                return Ok(static_eval);
            }
        }

        let futility_armed = !in_check
            && (depth_to_go as usize) < FUTILITY_MARGIN.len()
            && static_eval + FUTILITY_MARGIN[depth_to_go as usize] <= alpha;

        let orderer = MoveOrderer::new(
            pos,
            tt_move,
            depth_so_far as usize,
            self.killers,
            self.history,
            self.countermoves,
            previous_move,
        );
        let moves: Vec<Move> = orderer.collect();

        if moves.is_empty() {
            return Ok(if in_check { -MATE + depth_so_far as i32 } else { 0 });
        }

        let mut best_score = -INF;
        let mut best_move = moves[0];
        let mut flag = TTFlag::UpperBound;

        for (i, &m) in moves.iter().enumerate() {
            let is_capture = pos.is_capture(m);
            let gives_check = pos.gives_check(m);
            let is_quiet = !is_capture && m.promote_type().is_none();

            if futility_armed && is_quiet {
                continue;
            }

            let do_lmr = REDUCE
                && depth_to_go >= LMR_MIN_DEPTH
                && i >= LMR_MIN_MOVE_INDEX
                && is_quiet
                && !in_check
                && !gives_check;

            pos.make(m);
            let mut child_line = Vec::new();
            let score = if i == 0 {
                -self.pvs::<P, PV, false, true>(pos, depth_to_go - 1, depth_so_far + 1, -beta, -alpha, &mut child_line, Some(m))?
            } else {
                let reduction = if do_lmr {
                    let mut r = 1;
                    if i >= 6 {
                        r += 1;
                    }
                    if i >= 12 {
                        r += 1;
                    }
                    if PV {
                        r -= 1;
                    }
                    if depth_to_go >= 6 {
                        r += 1;
                    }
                    r.clamp(1, depth_to_go - 1)
                } else {
                    0
                };
                let scout = -self.pvs::<P, false, false, true>(
                    pos,
                    depth_to_go - 1 - reduction,
                    depth_so_far + 1,
                    -alpha - 1,
                    -alpha,
                    &mut child_line,
                    Some(m),
                )?;
                if scout > alpha && (reduction > 0 || scout < beta) {
                    child_line.clear();
                    -self.pvs::<P, PV, false, true>(pos, depth_to_go - 1, depth_so_far + 1, -beta, -alpha, &mut child_line, Some(m))?
                } else {
                    scout
                }
            };
            pos.unmake();

            if self.time_exceeded {
                return Err(SearchError::Timeout);
            }

            if score > best_score {
                best_score = score;
                best_move = m;
            }
            if score > alpha {
                alpha = score;
                flag = TTFlag::Exact;
                write_line(line, m, &child_line);
                if !is_capture {
                    self.history.record(m.from_square(), m.to_square(), depth_to_go);
                }
            }
            if alpha >= beta {
                flag = TTFlag::LowerBound;
                if !is_capture {
                    self.killers.record(depth_so_far as usize, m);
                    if let Some(prev) = previous_move {
                        self.countermoves.record(prev, m);
                    }
                }
                break;
            }
        }

        let stored_score = score::to_tt(best_score, depth_so_far);
        self.tt.store(key, depth_to_go, stored_score, flag, Some(best_move));

        Ok(best_score)
    }

    /// Capture-and-promotion-only search at the horizon, so the static
    /// evaluation is never trusted in a position where an obvious capture is
    /// still on the board. Termination is guaranteed: every recursive call
    /// plays a capture, and material strictly decreases each time.
    fn quiesce<P: Position, const PV: bool>(&mut self, pos: &mut P, mut alpha: i32, beta: i32, depth_so_far: u32) -> Result<i32, SearchError> {
        self.poll_time();
        if self.time_exceeded {
            return Err(SearchError::Timeout);
        }

        let stand_pat = evaluate(pos);
        if stand_pat >= beta {
            return Ok(beta);
        }
        if stand_pat + Piece::Queen.value() < alpha {
            return Ok(alpha);
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }

        let captures = pos.capture_and_promotion_moves();
        let mut moves: Vec<(Move, i32)> = Vec::with_capacity(captures.len());
        for m in captures {
            moves.push((m, mvv_lva(pos, m)));
        }
        moves.sort_by_key(|&(_, score)| -score);

        for (m, _) in moves {
            let victim_value = if m.is_en_passant() {
                Piece::Pawn.value()
            } else {
                pos.piece_at(m.to_square()).map_or(0, |(p, _)| p.value())
            };
            if stand_pat + victim_value + 200 < alpha {
                continue;
            }

            pos.make(m);
            let score = -self.quiesce::<P, PV>(pos, -beta, -alpha, depth_so_far + 1)?;
            pos.unmake();

            if self.time_exceeded {
                return Err(SearchError::Timeout);
            }
            if score >= beta {
                return Ok(beta);
            }
            if score > alpha {
                alpha = score;
            }
        }

        Ok(alpha)
    }
}

fn mvv_lva(pos: &impl Position, m: Move) -> i32 {
    let victim = if m.is_en_passant() {
        Piece::Pawn.value()
    } else {
        pos.piece_at(m.to_square()).map_or(0, |(p, _)| p.value())
    };
    let attacker = pos.piece_at(m.from_square()).map_or(0, |(p, _)| p.value());
    10 * victim - attacker
}

fn has_non_pawn_material(pos: &impl Position) -> bool {
    let side = pos.side_to_move();
    Piece::NON_PAWN_NON_KING.iter().any(|&p| pos.pieces(p, side).len() > 0)
}

/// Splice `m` onto the front of the child's principal variation to build the
/// parent's.
fn write_line(parent_line: &mut Vec<Move>, m: Move, child_line: &[Move]) {
    parent_line.clear();
    parent_line.push(m);
    parent_line.extend_from_slice(child_line);
}

#[cfg(test)]
mod tests {
    use super::*;
    use vantage_position::GamePosition;

    fn search_to_depth(fen: &str, depth: i32) -> (i32, Vec<Move>) {
        let mut pos = GamePosition::from_fen(fen).unwrap();
        let mut tt = TTable::new(1 << 12);
        let mut killers = KillerTable::new();
        let mut history = HistoryTable::new();
        let mut countermoves = CountermoveTable::new();
        let mut search = PVSearch::new(&mut tt, &mut killers, &mut history, &mut countermoves, None);
        let mut line = Vec::new();
        let score = search.pvs::<GamePosition, true, true, true>(&mut pos, depth, 0, -INF, INF, &mut line, None).unwrap();
        (score, line)
    }

    #[test]
    fn finds_back_rank_mate_in_one() {
        let (score, line) = search_to_depth("6k1/5ppp/8/8/8/8/8/R6K w - - 0 1", 2);
        assert!(score >= MATE - 2);
        assert_eq!(line[0], Move::normal(vantage_position::Square::A1, vantage_position::Square::A8));
    }

    #[test]
    fn stalemate_is_scored_as_a_draw() {
        let mut pos = GamePosition::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        let mut tt = TTable::new(1 << 10);
        let mut killers = KillerTable::new();
        let mut history = HistoryTable::new();
        let mut countermoves = CountermoveTable::new();
        let mut search = PVSearch::new(&mut tt, &mut killers, &mut history, &mut countermoves, None);
        let mut line = Vec::new();
        let score = search.pvs::<GamePosition, true, true, true>(&mut pos, 2, 0, -INF, INF, &mut line, None).unwrap();
        assert_eq!(score, 0);
    }

    #[test]
    fn quiet_endgame_pawn_is_close_to_even_at_shallow_depth() {
        let (score, _) = search_to_depth("8/8/8/4k3/8/8/4P3/4K3 w - - 0 1", 3);
        assert!(score.abs() < 300);
    }

    #[test]
    fn king_and_pawn_endgame_favors_the_side_with_the_extra_pawn_at_depth() {
        let (score, _) = search_to_depth("8/8/8/4k3/8/8/4P3/4K3 w - - 0 1", 6);
        assert!(score >= 80);
    }

    #[test]
    fn roughly_balanced_opening_stays_near_zero() {
        let (score, _) = search_to_depth("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3", 5);
        assert!(score.abs() <= 50);
    }

    #[test]
    fn repeated_position_scores_as_a_draw_without_searching_further() {
        let mut pos = GamePosition::new();
        for _ in 0..2 {
            pos.make(Move::normal(vantage_position::Square::G1, vantage_position::Square::F3));
            pos.make(Move::normal(vantage_position::Square::G8, vantage_position::Square::F6));
            pos.make(Move::normal(vantage_position::Square::F3, vantage_position::Square::G1));
            pos.make(Move::normal(vantage_position::Square::F6, vantage_position::Square::G8));
        }
        assert!(pos.is_twofold_repetition());

        let mut tt = TTable::new(1 << 10);
        let mut killers = KillerTable::new();
        let mut history = HistoryTable::new();
        let mut countermoves = CountermoveTable::new();
        let mut search = PVSearch::new(&mut tt, &mut killers, &mut history, &mut countermoves, None);
        let mut line = Vec::new();
        // Not ROOT: a repeated position reached one ply into a search should
        // be recognized before any recursion into its children.
        let score = search
            .pvs::<GamePosition, false, false, true>(&mut pos, 4, 1, -INF, INF, &mut line, None)
            .unwrap();
        assert_eq!(score, 0);
        assert_eq!(search.nodes, 1);
    }
}
