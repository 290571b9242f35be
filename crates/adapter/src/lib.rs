//! Adapter module - AI control via TCP socket with JSON protocol
//!
//! This module lets external drivers (bots, recorders, dashboards) observe
//! and play the board over a TCP socket with line-delimited JSON. The
//! simulation core stays wire-format-free; everything protocol-shaped lives
//! here.
//!
//! # Protocol Overview
//!
//! 1. **Connection**: client connects to the TCP socket (default
//!    127.0.0.1:7878)
//! 2. **Handshake**: client sends `hello`, server responds with `welcome`
//!    and an initial `observation`
//! 3. **Controller assignment**: the first client to hello controls the
//!    board; later clients observe
//! 4. **Commanding**: the controller sends `command` messages carrying a
//!    swap; the server acks (accepted/rejected) and, on acceptance, runs the
//!    cascade to completion and broadcasts a fresh `observation` with the
//!    event batch to every client
//!
//! # Environment Variables
//!
//! - `MATCH_AI_HOST`: bind address (default "127.0.0.1")
//! - `MATCH_AI_PORT`: port number (default 7878)
//! - `MATCH_AI_DISABLED`: set to "1" or "true" to disable the adapter
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Server: {"type":"hello","seq":1,"ts":1234567890,"client":{"name":"my-bot","version":"1.0.0"},"protocol_version":"1.0.0"}
//! Server -> Client: {"type":"welcome","seq":1,"ts":1234567890,"protocol_version":"1.0.0","role":"controller","board":{"width":8,"height":8}}
//! Server -> Client: {"type":"observation","seq":2,"ts":1234567890,...}
//! Client -> Server: {"type":"command","seq":2,"ts":1234567891,"swap":{"from":[2,3],"to":[3,3]}}
//! Server -> Client: {"type":"ack","seq":3,"ts":1234567891,"command_seq":2,"status":"accepted","moves_left":29,"score":60}
//! ```
//!
//! # Testing
//!
//! Connect with netcat for manual poking:
//!
//! ```bash
//! nc 127.0.0.1 7878
//! {"type":"hello","seq":1,"ts":0,"client":{"name":"nc","version":"0"},"protocol_version":"1.0.0"}
//! ```

pub mod protocol;
pub mod server;

pub use match_board_core as core;
pub use match_board_types as types;

pub use protocol::*;
pub use server::{run_server, run_server_blocking, ServerConfig};
