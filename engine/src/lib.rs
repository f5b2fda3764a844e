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

//! The search and evaluation core: an [`Engine`] owns a transposition table
//! and a [`config::EngineConfig`], and turns a position into a best move by
//! iterative deepening over a principal variation search.

mod config;
pub mod driver;
mod error;
pub mod evaluate;
mod pick;
pub mod position;
mod pst;
pub mod score;
mod search;
mod tables;
pub mod transposition;

pub use config::EngineConfig;
pub use driver::SearchResult;
pub use error::SearchError;
pub use position::Position;

use vantage_position::Move;

use transposition::TTable;

/// Owns the state that should persist across searches: the transposition
/// table and the configured limits. History, killer and countermove tables
/// are rebuilt fresh inside every call to [`Engine::search`], since they are
/// only useful within the single iterative-deepening run that built them.
pub struct Engine {
    tt: TTable,
    config: EngineConfig,
}

impl Engine {
    #[must_use]
    pub fn new(config: EngineConfig) -> Engine {
        Engine { tt: TTable::new(config.tt_capacity), config }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Replace the engine's configuration. Takes effect on the next call to
    /// [`Engine::search`]; does not resize or clear the transposition table
    /// even if `tt_capacity` changed (call [`Engine::clear`] for that).
    pub fn set_config(&mut self, config: EngineConfig) {
        self.config = config;
    }

    /// Discard everything the engine has learned so far and rebuild the
    /// transposition table at the configured capacity. Useful between
    /// unrelated games; unnecessary (and wasteful) between moves of the same
    /// game, where the table's contents are still relevant.
    pub fn clear(&mut self) {
        self.tt = TTable::new(self.config.tt_capacity);
    }

    /// Run iterative deepening over `pos` up to the configured depth and
    /// time limit, returning `None` only if `pos` has no legal moves.
    pub fn search<P: Position>(&mut self, pos: &mut P) -> Option<SearchResult> {
        driver::drive(pos, &mut self.tt, &self.config)
    }

    /// Convenience wrapper over [`Engine::search`] for callers who only want
    /// the move. Panics if `pos` has no legal moves; callers that cannot
    /// guarantee this (an arbitrary position from outside the engine) should
    /// call [`Engine::search`] directly and handle `None`.
    pub fn get_best_move<P: Position>(&mut self, pos: &mut P) -> Move {
        self.search(pos).expect("position has no legal moves").best_move
    }
}

impl Default for Engine {
    fn default() -> Engine {
        Engine::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vantage_position::GamePosition;

    #[test]
    fn engine_finds_a_legal_move_from_the_start_position() {
        let mut engine = Engine::new(EngineConfig { max_depth: 3, ..EngineConfig::default() });
        let mut pos = GamePosition::new();
        let result = engine.search(&mut pos).unwrap();
        assert!(pos.legal_moves().contains(&result.best_move));
    }

    #[test]
    fn engine_finds_mate_in_one() {
        let mut engine = Engine::new(EngineConfig { max_depth: 3, ..EngineConfig::default() });
        let mut pos = GamePosition::from_fen("6k1/5ppp/8/8/8/8/8/R6K w - - 0 1").unwrap();
        let m = engine.get_best_move(&mut pos);
        assert_eq!(m, vantage_position::Move::normal(vantage_position::Square::A1, vantage_position::Square::A8));
    }

    #[test]
    fn repeated_searches_reuse_the_transposition_table_without_panicking() {
        let mut engine = Engine::new(EngineConfig { max_depth: 2, ..EngineConfig::default() });
        let mut pos = GamePosition::new();
        engine.search(&mut pos).unwrap();
        engine.search(&mut pos).unwrap();
    }

    #[test]
    fn clear_resets_the_transposition_table() {
        let mut engine = Engine::new(EngineConfig { max_depth: 2, ..EngineConfig::default() });
        let mut pos = GamePosition::new();
        engine.search(&mut pos).unwrap();
        engine.clear();
        assert_eq!(engine.tt.capacity(), engine.config.tt_capacity);
    }
}
