//! TCP server for the AI adapter
//!
//! Handles incoming connections and manages client lifecycle. One engine
//! task owns the [`GameState`]; every client message funnels through it, so
//! the board keeps its strict single-writer discipline even with several
//! observers connected. The first client to hello becomes the controller;
//! later clients observe. When the controller disconnects, the oldest
//! remaining client is promoted.

use std::net::SocketAddr;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot};

use match_board_core::GameState;
use match_board_types::Coord;

use crate::protocol::{
    now_ms, AckStatus, BoardDims, ClientMessage, ObservationBody, Role, ServerMessage,
    PROTOCOL_VERSION,
};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7878,
        }
    }
}

impl ServerConfig {
    /// Create from environment variables
    ///
    /// - `MATCH_AI_HOST`: bind address (default "127.0.0.1")
    /// - `MATCH_AI_PORT`: port number (default 7878)
    pub fn from_env() -> Self {
        let host = std::env::var("MATCH_AI_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("MATCH_AI_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(7878);
        Self { host, port }
    }

    /// True when `MATCH_AI_DISABLED` switches the adapter off entirely
    pub fn is_disabled() -> bool {
        std::env::var("MATCH_AI_DISABLED")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }
}

/// Everything a connection task can ask the engine to do
#[derive(Debug)]
enum EngineCommand {
    Attach {
        client_id: u64,
        tx: mpsc::UnboundedSender<String>,
    },
    Hello {
        client_id: u64,
    },
    Swap {
        client_id: u64,
        command_seq: u64,
        from: Coord,
        to: Coord,
    },
    BadMessage {
        client_id: u64,
        detail: String,
    },
    Detach {
        client_id: u64,
    },
}

struct ClientSlot {
    id: u64,
    tx: mpsc::UnboundedSender<String>,
    role: Option<Role>,
}

fn send_line(slot: &ClientSlot, msg: &ServerMessage) {
    if let Ok(line) = serde_json::to_string(msg) {
        let _ = slot.tx.send(line);
    }
}

/// The single owner of the game state
async fn engine_task(mut game: GameState, mut rx: mpsc::Receiver<EngineCommand>) {
    let mut clients: Vec<ClientSlot> = Vec::new();
    let mut seq: u64 = 0;
    let mut next_seq = move || {
        seq += 1;
        seq
    };

    while let Some(command) = rx.recv().await {
        match command {
            EngineCommand::Attach { client_id, tx } => {
                clients.push(ClientSlot {
                    id: client_id,
                    tx,
                    role: None,
                });
            }

            EngineCommand::Hello { client_id } => {
                let has_controller = clients
                    .iter()
                    .any(|c| c.role == Some(Role::Controller));
                let role = if has_controller {
                    Role::Observer
                } else {
                    Role::Controller
                };

                let welcome = ServerMessage::Welcome {
                    seq: next_seq(),
                    ts: now_ms(),
                    protocol_version: PROTOCOL_VERSION.to_string(),
                    role,
                    board: BoardDims {
                        width: game.grid().width(),
                        height: game.grid().height(),
                    },
                };
                let observation = ServerMessage::Observation {
                    seq: next_seq(),
                    ts: now_ms(),
                    body: ObservationBody::from_snapshot(&game.snapshot(), &[]),
                };

                if let Some(slot) = clients.iter_mut().find(|c| c.id == client_id) {
                    slot.role = Some(role);
                    send_line(slot, &welcome);
                    send_line(slot, &observation);
                }
            }

            EngineCommand::Swap {
                client_id,
                command_seq,
                from,
                to,
            } => {
                let Some(slot) = clients.iter().find(|c| c.id == client_id) else {
                    continue;
                };
                if slot.role != Some(Role::Controller) {
                    let error = ServerMessage::Error {
                        seq: next_seq(),
                        ts: now_ms(),
                        code: "notController".to_string(),
                        message: "only the controller may send commands".to_string(),
                    };
                    send_line(slot, &error);
                    continue;
                }

                match game.request_swap(from, to) {
                    Ok(()) => {
                        game.run_until_stable();
                        let events = game.take_events();

                        let ack = ServerMessage::Ack {
                            seq: next_seq(),
                            ts: now_ms(),
                            command_seq,
                            status: AckStatus::Accepted,
                            reason: None,
                            moves_left: game.moves_left(),
                            score: game.score(),
                        };
                        send_line(slot, &ack);

                        let observation = ServerMessage::Observation {
                            seq: next_seq(),
                            ts: now_ms(),
                            body: ObservationBody::from_snapshot(&game.snapshot(), &events),
                        };
                        for client in clients.iter().filter(|c| c.role.is_some()) {
                            send_line(client, &observation);
                        }
                    }
                    Err(reason) => {
                        let ack = ServerMessage::Ack {
                            seq: next_seq(),
                            ts: now_ms(),
                            command_seq,
                            status: AckStatus::Rejected,
                            reason: Some(reason.as_str().to_string()),
                            moves_left: game.moves_left(),
                            score: game.score(),
                        };
                        send_line(slot, &ack);
                    }
                }
            }

            EngineCommand::BadMessage { client_id, detail } => {
                if let Some(slot) = clients.iter().find(|c| c.id == client_id) {
                    let error = ServerMessage::Error {
                        seq: next_seq(),
                        ts: now_ms(),
                        code: "badMessage".to_string(),
                        message: detail,
                    };
                    send_line(slot, &error);
                }
            }

            EngineCommand::Detach { client_id } => {
                let was_controller = clients
                    .iter()
                    .any(|c| c.id == client_id && c.role == Some(Role::Controller));
                clients.retain(|c| c.id != client_id);

                // Promote the oldest remaining client so the board stays
                // drivable.
                if was_controller {
                    if let Some(slot) = clients.iter_mut().find(|c| c.role.is_some()) {
                        slot.role = Some(Role::Controller);
                        let welcome = ServerMessage::Welcome {
                            seq: next_seq(),
                            ts: now_ms(),
                            protocol_version: PROTOCOL_VERSION.to_string(),
                            role: Role::Controller,
                            board: BoardDims {
                                width: game.grid().width(),
                                height: game.grid().height(),
                            },
                        };
                        send_line(slot, &welcome);
                    }
                }
            }
        }
    }
}

/// Per-connection task: parse lines, forward to the engine, pump replies
async fn handle_client(
    stream: TcpStream,
    client_id: u64,
    engine_tx: mpsc::Sender<EngineCommand>,
) -> anyhow::Result<()> {
    stream.set_nodelay(true)?;
    let (read_half, mut write_half) = stream.into_split();

    let (tx, mut out_rx) = mpsc::unbounded_channel::<String>();
    engine_tx
        .send(EngineCommand::Attach { client_id, tx })
        .await?;

    let writer = tokio::spawn(async move {
        while let Some(line) = out_rx.recv().await {
            if write_half.write_all(line.as_bytes()).await.is_err() {
                break;
            }
            if write_half.write_all(b"\n").await.is_err() {
                break;
            }
        }
    });

    let mut lines = BufReader::new(read_half).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match serde_json::from_str::<ClientMessage>(&line) {
            Ok(ClientMessage::Hello { .. }) => EngineCommand::Hello { client_id },
            Ok(ClientMessage::Command { seq, swap, .. }) => EngineCommand::Swap {
                client_id,
                command_seq: seq,
                from: swap.from.into(),
                to: swap.to.into(),
            },
            Err(err) => EngineCommand::BadMessage {
                client_id,
                detail: err.to_string(),
            },
        };
        engine_tx.send(command).await?;
    }

    engine_tx.send(EngineCommand::Detach { client_id }).await?;
    writer.abort();
    Ok(())
}

/// Run the server on a runtime of its own, for synchronous hosts
pub fn run_server_blocking(config: ServerConfig, game: GameState) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run_server(config, game, None))
}

/// Start the TCP server and hand the board to its engine task
///
/// `ready_tx` (if given) receives the bound address once the listener is
/// up - tests bind port 0 and read the real port from it.
pub async fn run_server(
    config: ServerConfig,
    game: GameState,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    if ServerConfig::is_disabled() {
        println!("[Adapter] AI control disabled via MATCH_AI_DISABLED");
        return Ok(());
    }

    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    let bound = listener.local_addr()?;
    println!("[Adapter] TCP server listening on {}", bound);
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let (engine_tx, engine_rx) = mpsc::channel::<EngineCommand>(64);
    tokio::spawn(engine_task(game, engine_rx));

    let mut next_client_id: u64 = 0;
    loop {
        let (stream, peer) = listener.accept().await?;
        next_client_id += 1;
        let client_id = next_client_id;
        println!("[Adapter] client {} connected from {}", client_id, peer);

        let engine_tx = engine_tx.clone();
        tokio::spawn(async move {
            if let Err(err) = handle_client(stream, client_id, engine_tx).await {
                println!("[Adapter] client {} closed: {}", client_id, err);
            }
        });
    }
}
