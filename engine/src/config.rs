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

//! Engine-wide tunables. There is no multi-threaded limit machinery here
//! (no atomics, no mutexes): the search runs on one thread, and the driver
//! checks elapsed time directly against plain fields.

/// Default transposition table capacity: `2^20` entries, a direct-mapped
/// power of two so a probe is a single mask-and-index.
pub const DEFAULT_TT_CAPACITY: usize = 1 << 20;

/// Default search depth when neither a depth nor a time limit is given.
pub const DEFAULT_MAX_DEPTH: u32 = 6;

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Deepest ply the iterative-deepening driver will attempt.
    pub max_depth: u32,
    /// Wall-clock budget for a single `search()` call, in seconds. `None`
    /// means search until `max_depth` completes with no time pressure.
    pub time_limit: Option<f64>,
    /// Number of slots in the transposition table. Must be a power of two;
    /// rounded down to one internally if it isn't.
    pub tt_capacity: usize,
}

impl EngineConfig {
    #[must_use]
    pub fn new() -> EngineConfig {
        EngineConfig {
            max_depth: DEFAULT_MAX_DEPTH,
            time_limit: None,
            tt_capacity: DEFAULT_TT_CAPACITY,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> EngineConfig {
        EngineConfig::new()
    }
}

/// Node-count interval between time-budget checks. Checking every node would
/// make the system clock call dominate search time; checking too rarely
/// risks a visibly late stop. 4096 amortizes the clock read across enough
/// nodes to be cheap while staying responsive at typical search speeds.
pub const TIME_CHECK_INTERVAL: u64 = 4096;
