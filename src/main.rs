//! Headless match-3 runner (default binary).
//!
//! Plays a full level with a greedy scripted bot: probe cells left to right,
//! bottom to top, take the first legal swap, run the cascade out, repeat
//! until the score goal is reached or the moves are spent. With `serve` the
//! same board is handed to the TCP adapter instead so an external driver can
//! play it.

use anyhow::{anyhow, Result};

use match_board::adapter::{run_server_blocking, ServerConfig};
use match_board::core::{BoardEvent, GameState, Level};
use match_board::types::Coord;

#[derive(Debug, Clone)]
struct RunConfig {
    width: u8,
    height: u8,
    seed: u32,
    moves: u32,
    goal: u32,
    serve: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            width: 8,
            height: 8,
            seed: 1,
            moves: match_board::types::DEFAULT_MOVES,
            goal: match_board::types::DEFAULT_SCORE_GOAL,
            serve: false,
        }
    }
}

fn parse_args(args: &[String]) -> Result<RunConfig> {
    let mut config = RunConfig::default();
    let mut i = 0usize;

    while i < args.len() {
        match args[i].as_str() {
            "serve" => config.serve = true,
            "--width" => {
                i += 1;
                config.width = parse_value(args, i, "--width")?;
            }
            "--height" => {
                i += 1;
                config.height = parse_value(args, i, "--height")?;
            }
            "--seed" => {
                i += 1;
                config.seed = parse_value(args, i, "--seed")?;
            }
            "--moves" => {
                i += 1;
                config.moves = parse_value(args, i, "--moves")?;
            }
            "--goal" => {
                i += 1;
                config.goal = parse_value(args, i, "--goal")?;
            }
            other => return Err(anyhow!("unknown argument: {}", other)),
        }
        i += 1;
    }

    Ok(config)
}

fn parse_value<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> Result<T> {
    let raw = args
        .get(i)
        .ok_or_else(|| anyhow!("missing value for {}", flag))?;
    raw.parse::<T>()
        .map_err(|_| anyhow!("invalid value for {}: {}", flag, raw))
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = parse_args(&args)?;

    let mut level = Level::standard(config.width, config.height);
    level.moves = config.moves;
    level.score_goal = config.goal;

    let game = GameState::new(&level, config.seed)
        .map_err(|e| anyhow!("board setup failed: {}", e))?;

    if config.serve {
        return run_server_blocking(ServerConfig::from_env(), game);
    }

    run_bot(game)
}

/// Probe adjacent pairs until one swap is accepted
///
/// Acceptance already starts the cascade; the caller runs it to completion.
/// Rejected probes cost nothing.
fn try_any_swap(game: &mut GameState) -> Option<(Coord, Coord)> {
    let width = game.grid().width() as i8;
    let height = game.grid().height() as i8;

    for y in 0..height {
        for x in 0..width {
            let a = Coord::new(x, y);
            for b in [Coord::new(x + 1, y), Coord::new(x, y + 1)] {
                if game.request_swap(a, b).is_ok() {
                    return Some((a, b));
                }
            }
        }
    }
    None
}

fn run_bot(mut game: GameState) -> Result<()> {
    println!(
        "board {}x{}  goal {}  moves {}",
        game.grid().width(),
        game.grid().height(),
        game.score_goal(),
        game.moves_left()
    );

    let mut move_no = 0u32;
    while game.moves_left() > 0 && game.score() < game.score_goal() {
        let Some((a, b)) = try_any_swap(&mut game) else {
            println!("no playable swap left");
            break;
        };
        game.run_until_stable();
        move_no += 1;

        let events = game.take_events();
        let cleared = events
            .iter()
            .filter(|e| matches!(e, BoardEvent::Score { .. }))
            .count();
        let chain = events
            .iter()
            .filter_map(|e| match e {
                BoardEvent::CascadeLevel { level } => Some(*level),
                _ => None,
            })
            .max()
            .unwrap_or(1);
        let bombs = events
            .iter()
            .filter(|e| matches!(e, BoardEvent::BombSpawned { .. }))
            .count();

        println!(
            "move {:>2}: swap ({},{})->({},{})  cleared {:>2}  chain x{}  bombs {}  score {}",
            move_no, a.x, a.y, b.x, b.y, cleared, chain, bombs,
            game.score()
        );
    }

    println!();
    for row in game.grid().as_rows() {
        println!("  {}", row);
    }
    println!();

    if game.score() >= game.score_goal() {
        println!(
            "YOU WIN! score {} in {} moves",
            game.score(),
            move_no
        );
    } else {
        println!(
            "YOU LOSE! score {} of {} after {} moves",
            game.score(),
            game.score_goal(),
            move_no
        );
    }

    Ok(())
}
