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

//! A small command-line front end: given a FEN, print the move the engine
//! would play. No UCI protocol here, just enough to drive
//! `vantage_engine::Engine` from a terminal.

use std::env;
use std::process::ExitCode;

use vantage_engine::{Engine, EngineConfig};
use vantage_position::{to_algebraic, GamePosition};

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        println!("usage: vantage <fen> [--depth N] [--time SECONDS]");
        return ExitCode::FAILURE;
    }

    let fen = &args[1];
    let mut config = EngineConfig::new();
    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--depth" => {
                i += 1;
                config.max_depth = match args.get(i).and_then(|s| s.parse().ok()) {
                    Some(d) => d,
                    None => {
                        println!("--depth requires a positive integer");
                        return ExitCode::FAILURE;
                    }
                };
            }
            "--time" => {
                i += 1;
                config.time_limit = match args.get(i).and_then(|s| s.parse().ok()) {
                    Some(t) => Some(t),
                    None => {
                        println!("--time requires a number of seconds");
                        return ExitCode::FAILURE;
                    }
                };
            }
            other => {
                println!("unrecognized flag {other:?}");
                return ExitCode::FAILURE;
            }
        }
        i += 1;
    }

    let mut pos = match GamePosition::from_fen(fen) {
        Ok(pos) => pos,
        Err(e) => {
            println!("invalid FEN: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut engine = Engine::new(config);
    let Some(result) = engine.search(&mut pos) else {
        println!("no legal moves in this position");
        return ExitCode::FAILURE;
    };

    println!(
        "{} ({}) depth {} score {} nodes {} in {:.2}s",
        to_algebraic(result.best_move, &pos),
        result.best_move,
        result.depth,
        result.score,
        result.nodes_searched,
        result.time_spent,
    );
    ExitCode::SUCCESS
}
