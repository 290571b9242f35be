//! Observation client: connect to a running adapter and print the board.
//!
//! Plain synchronous TCP - this is a diagnostic tool, not a bot. Start the
//! game side with `match-board serve`, then run `watch` in another terminal.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;

use anyhow::{anyhow, Result};

use match_board::adapter::{create_hello, ObservationBody, Role, ServerMessage};

fn parse_args(args: &[String]) -> Result<(String, u16)> {
    let mut host = String::from("127.0.0.1");
    let mut port: u16 = 7878;
    let mut i = 0usize;

    while i < args.len() {
        match args[i].as_str() {
            "--host" => {
                i += 1;
                host = args
                    .get(i)
                    .ok_or_else(|| anyhow!("watch: missing value for --host"))?
                    .clone();
            }
            "--port" => {
                i += 1;
                let raw = args
                    .get(i)
                    .ok_or_else(|| anyhow!("watch: missing value for --port"))?;
                port = raw
                    .parse::<u16>()
                    .map_err(|_| anyhow!("watch: invalid --port value: {}", raw))?;
            }
            other => return Err(anyhow!("watch: unknown argument: {}", other)),
        }
        i += 1;
    }

    Ok((host, port))
}

fn cell_char(color: u8, bomb: u8, tile: u8) -> char {
    if bomb != 0 {
        return '*';
    }
    match color {
        1 => 'Y',
        2 => 'B',
        3 => 'G',
        4 => 'R',
        5 => 'P',
        _ => {
            if tile == 1 {
                '#'
            } else {
                '.'
            }
        }
    }
}

fn print_observation(body: &ObservationBody) {
    let width = body.width as usize;
    for y in (0..body.height as usize).rev() {
        let mut row = String::with_capacity(width);
        for x in 0..width {
            let idx = y * width + x;
            row.push(cell_char(body.colors[idx], body.bombs[idx], body.tiles[idx]));
        }
        println!("  {}", row);
    }
    println!(
        "  score {}  moves {}  phase {}  cascade x{}",
        body.score, body.moves_left, body.phase, body.cascade_level
    );
    for event in &body.events {
        println!("  event: {:?}", event);
    }
    println!();
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (host, port) = parse_args(&args)?;

    let mut stream = TcpStream::connect((host.as_str(), port))
        .map_err(|e| anyhow!("watch: connect {}:{} failed: {}", host, port, e))?;
    stream
        .set_nodelay(true)
        .map_err(|e| anyhow!("watch: set_nodelay failed: {}", e))?;

    let hello = create_hello(1, "match-board-watch", env!("CARGO_PKG_VERSION"));
    let line = serde_json::to_string(&hello)?;
    stream.write_all(line.as_bytes())?;
    stream.write_all(b"\n")?;
    stream.flush()?;

    let reader = BufReader::new(stream);
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<ServerMessage>(&line) {
            Ok(ServerMessage::Welcome { role, board, .. }) => {
                let role = match role {
                    Role::Controller => "controller",
                    Role::Observer => "observer",
                };
                println!(
                    "connected as {} to a {}x{} board",
                    role, board.width, board.height
                );
            }
            Ok(ServerMessage::Observation { body, .. }) => print_observation(&body),
            Ok(ServerMessage::Ack {
                status,
                reason,
                moves_left,
                score,
                ..
            }) => {
                println!(
                    "ack: {:?} {} (moves {}, score {})",
                    status,
                    reason.unwrap_or_default(),
                    moves_left,
                    score
                );
            }
            Ok(ServerMessage::Error { code, message, .. }) => {
                println!("server error [{}]: {}", code, message);
            }
            Err(e) => println!("watch: unparsable line: {}", e),
        }
    }

    println!("watch: connection closed");
    Ok(())
}
