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

//! Iterative deepening: search depth 1, then 2, then 3 and so on, stopping
//! when the time budget expires or `max_depth` completes. Later iterations
//! reuse the transposition table and history heuristics the earlier ones
//! built up, so they are far cheaper than searching that depth cold would
//! be, and the principal variation found at depth `d - 1` seeds move
//! ordering at depth `d` through the transposition table.

use std::time::{Duration, Instant};

use vantage_position::Move;

use crate::config::EngineConfig;
use crate::error::SearchError;
use crate::pick::MoveOrderer;
use crate::position::Position;
use crate::score::{self, INF, MATE};
use crate::search::{PVSearch, LMR_MIN_DEPTH, LMR_MIN_MOVE_INDEX};
use crate::tables::{CountermoveTable, HistoryTable, KillerTable};
use crate::transposition::{TTFlag, TTable};

const ASPIRATION_MIN_DEPTH: u32 = 5;
const ASPIRATION_WINDOW: i32 = 50;

/// The outcome of one call to [`drive`]: the best move found, its score, and
/// how deep the search actually got before time or `max_depth` ran out.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub best_move: Move,
    pub score: i32,
    pub depth: u32,
    pub nodes_searched: u64,
    pub time_spent: f64,
}

/// Run iterative deepening over `pos` using `tt` (persistent across calls)
/// and `config`. Returns `None` only if `pos` has no legal moves at all.
pub fn drive<P: Position>(pos: &mut P, tt: &mut TTable, config: &EngineConfig) -> Option<SearchResult> {
    let mut best_move = *pos.legal_moves().first()?;

    let start = Instant::now();
    tt.new_search();
    let mut killers = KillerTable::new();
    let mut history = HistoryTable::new();
    let mut countermoves = CountermoveTable::new();
    let time_limit = config.time_limit.map(Duration::from_secs_f64);

    let mut best_score = -INF;
    let mut final_depth = 0;
    let mut nodes = 0;

    for depth in 1..=config.max_depth {
        let mut search = PVSearch::new(tt, &mut killers, &mut history, &mut countermoves, time_limit);
        search.nodes = nodes;

        match search_root(&mut search, pos, depth as i32, best_score) {
            Ok((m, score)) => {
                best_move = m;
                best_score = score;
                final_depth = depth;
                nodes = search.nodes;
            }
            Err(SearchError::Timeout) => {
                nodes = search.nodes;
                break;
            }
        }
    }

    Some(SearchResult {
        best_move,
        score: best_score,
        depth: final_depth,
        nodes_searched: nodes,
        time_spent: start.elapsed().as_secs_f64(),
    })
}

/// Search every root move to `depth`, starting from a narrow window around
/// `previous_score` once the search is deep enough for that window to be
/// worth the risk of a re-search. A move whose score falls outside that
/// window is re-searched once at the full `[-INF, INF]` width; moves
/// already accepted before the failure are not re-searched.
fn search_root<P: Position>(
    search: &mut PVSearch,
    pos: &mut P,
    depth: i32,
    previous_score: i32,
) -> Result<(Move, i32), SearchError> {
    let use_window = depth as u32 >= ASPIRATION_MIN_DEPTH && previous_score.abs() < MATE - 100;
    let (alpha_init, beta_init) =
        if use_window { (previous_score - ASPIRATION_WINDOW, previous_score + ASPIRATION_WINDOW) } else { (-INF, INF) };

    let key = pos.position_key();
    let in_check = pos.is_check();
    let mut depth_to_go = depth;
    if in_check {
        depth_to_go += 1;
    }

    let tt_move = search.tt.probe(key).and_then(|entry| entry.best_move);
    let orderer = MoveOrderer::new(pos, tt_move, 0, search.killers, search.history, search.countermoves, None);
    let moves: Vec<Move> = orderer.collect();

    let mut alpha = alpha_init;
    let mut beta = beta_init;
    let mut widened = false;
    let mut best_score = -INF;
    let mut best_move = moves[0];

    let mut i = 0;
    while i < moves.len() {
        let m = moves[i];
        let is_capture = pos.is_capture(m);
        let gives_check = pos.gives_check(m);
        let is_quiet = !is_capture && m.promote_type().is_none();

        let do_lmr = depth_to_go >= LMR_MIN_DEPTH && i >= LMR_MIN_MOVE_INDEX && is_quiet && !in_check && !gives_check;

        pos.make(m);
        let mut line = Vec::new();
        let score = if i == 0 {
            -search.pvs::<P, true, false, true>(pos, depth_to_go - 1, 1, -beta, -alpha, &mut line, Some(m))?
        } else {
            let reduction = if do_lmr {
                let mut r = 1;
                if i >= 6 {
                    r += 1;
                }
                if i >= 12 {
                    r += 1;
                }
                r -= 1;
                if depth_to_go >= 6 {
                    r += 1;
                }
                r.clamp(1, depth_to_go - 1)
            } else {
                0
            };
            let scout = -search.pvs::<P, false, false, true>(pos, depth_to_go - 1 - reduction, 1, -alpha - 1, -alpha, &mut line, Some(m))?;
            if scout > alpha && (reduction > 0 || scout < beta) {
                line.clear();
                -search.pvs::<P, true, false, true>(pos, depth_to_go - 1, 1, -beta, -alpha, &mut line, Some(m))?
            } else {
                scout
            }
        };
        pos.unmake();

        if search.time_exceeded {
            return Err(SearchError::Timeout);
        }

        if !widened && use_window && (score <= alpha_init || score >= beta_init) {
            widened = true;
            alpha = -INF;
            beta = INF;
            continue;
        }

        if score > best_score {
            best_score = score;
            best_move = m;
        }
        if score > alpha {
            alpha = score;
        }
        i += 1;
    }

    let stored_score = score::to_tt(best_score, 0);
    search.tt.store(key, depth_to_go, stored_score, TTFlag::Exact, Some(best_move));

    Ok((best_move, best_score))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vantage_position::GamePosition;

    #[test]
    fn deeper_iteration_still_returns_a_legal_move() {
        let mut pos = GamePosition::new();
        let mut tt = TTable::new(1 << 12);
        let config = EngineConfig { max_depth: 4, ..EngineConfig::default() };
        let result = drive(&mut pos, &mut tt, &config).unwrap();
        assert_eq!(result.depth, 4);
        assert!(pos.legal_moves().contains(&result.best_move));
    }

    #[test]
    fn search_returns_promptly_within_a_short_time_budget() {
        let mut pos = GamePosition::new();
        let mut tt = TTable::new(1 << 12);
        let config = EngineConfig { max_depth: 64, time_limit: Some(0.2), ..EngineConfig::default() };
        let start = Instant::now();
        let result = drive(&mut pos, &mut tt, &config).unwrap();
        assert!(start.elapsed() < Duration::from_secs(1));
        assert!(pos.legal_moves().contains(&result.best_move));
    }

    #[test]
    fn same_position_searched_twice_agrees_on_the_best_move() {
        let mut pos = GamePosition::new();
        let mut tt = TTable::new(1 << 16);
        let config = EngineConfig { max_depth: 5, ..EngineConfig::default() };
        let first = drive(&mut pos, &mut tt, &config).unwrap();
        let second = drive(&mut pos, &mut tt, &config).unwrap();
        assert_eq!(first.best_move, second.best_move);
    }

    #[test]
    fn a_narrow_aspiration_window_that_fails_still_finds_the_true_score() {
        // A stale previous score of 0 is wildly off for a forced mate; the
        // root search must widen to the full window and still find it,
        // rather than getting stuck re-searching inside the narrow window.
        let mut pos = GamePosition::from_fen("6k1/5ppp/8/8/8/8/8/R6K w - - 0 1").unwrap();
        let mut tt = TTable::new(1 << 12);
        let mut killers = KillerTable::new();
        let mut history = HistoryTable::new();
        let mut countermoves = CountermoveTable::new();
        let mut search = PVSearch::new(&mut tt, &mut killers, &mut history, &mut countermoves, None);
        let (best_move, score) = search_root(&mut search, &mut pos, 6, 0).unwrap();
        assert!(score >= MATE - 10);
        assert!(pos.legal_moves().contains(&best_move));
    }
}
