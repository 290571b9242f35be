//! Protocol module - JSON message types for the AI adapter
//!
//! Line-delimited JSON over TCP. Every message carries `type`, `seq` (a
//! per-sender sequence number) and `ts` (milliseconds since the epoch).
//! Clients send `hello` once, then `command` messages; the server answers
//! with `welcome`, `ack`/`error`, and streams `observation` snapshots after
//! every resolved command.

use serde::{Deserialize, Serialize};

use match_board_core::{BoardEvent, BoardSnapshot};
use match_board_types::Coord;

/// Protocol version spoken by this adapter
pub const PROTOCOL_VERSION: &str = "1.0.0";

/// A board cell on the wire, encoded as a two-element `[x, y]` array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef {
    pub x: i8,
    pub y: i8,
}

impl From<CellRef> for Coord {
    fn from(cell: CellRef) -> Self {
        Coord::new(cell.x, cell.y)
    }
}

impl Serialize for CellRef {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut seq = serializer.serialize_seq(Some(2))?;
        seq.serialize_element(&self.x)?;
        seq.serialize_element(&self.y)?;
        seq.end()
    }
}

impl<'de> Deserialize<'de> for CellRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct V;
        impl<'de> serde::de::Visitor<'de> for V {
            type Value = CellRef;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "a [x, y] pair")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let x = seq
                    .next_element::<i8>()?
                    .ok_or_else(|| serde::de::Error::custom("missing x"))?;
                let y = seq
                    .next_element::<i8>()?
                    .ok_or_else(|| serde::de::Error::custom("missing y"))?;
                if seq.next_element::<i8>()?.is_some() {
                    return Err(serde::de::Error::custom("expected exactly two elements"));
                }
                Ok(CellRef { x, y })
            }
        }
        deserializer.deserialize_seq(V)
    }
}

/// Client identification sent with hello
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
}

/// The swap a controller wants executed
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SwapCommand {
    pub from: CellRef,
    pub to: CellRef,
}

/// Messages from client to server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientMessage {
    Hello {
        seq: u64,
        ts: u64,
        client: ClientInfo,
        protocol_version: String,
    },
    Command {
        seq: u64,
        ts: u64,
        swap: SwapCommand,
    },
}

/// Role the server assigned at hello time
///
/// The first client to hello controls the board; everyone after observes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Controller,
    Observer,
}

/// Ack status for a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AckStatus {
    Accepted,
    Rejected,
}

/// Board dimensions advertised in welcome
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BoardDims {
    pub width: u8,
    pub height: u8,
}

/// A board event on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum WireEvent {
    Score {
        x: i8,
        y: i8,
        value: u32,
        multiplier: u32,
        bonus: u32,
    },
    TileBreak {
        x: i8,
        y: i8,
        remaining: u8,
    },
    BombSpawned {
        x: i8,
        y: i8,
        kind: String,
    },
    BombDetonated {
        x: i8,
        y: i8,
        kind: String,
    },
    CascadeLevel {
        level: u32,
    },
    RefillExhausted {
        x: i8,
        y: i8,
    },
    BoardStable,
}

impl From<&BoardEvent> for WireEvent {
    fn from(event: &BoardEvent) -> Self {
        match *event {
            BoardEvent::Score {
                x,
                y,
                value,
                multiplier,
                bonus,
            } => WireEvent::Score {
                x,
                y,
                value,
                multiplier,
                bonus,
            },
            BoardEvent::TileBreak { x, y, remaining } => WireEvent::TileBreak { x, y, remaining },
            BoardEvent::BombSpawned { x, y, kind } => WireEvent::BombSpawned {
                x,
                y,
                kind: kind.as_str().to_string(),
            },
            BoardEvent::BombDetonated { x, y, kind } => WireEvent::BombDetonated {
                x,
                y,
                kind: kind.as_str().to_string(),
            },
            BoardEvent::CascadeLevel { level } => WireEvent::CascadeLevel { level },
            BoardEvent::RefillExhausted { x, y } => WireEvent::RefillExhausted { x, y },
            BoardEvent::BoardStable => WireEvent::BoardStable,
        }
    }
}

/// Observation payload: the flat snapshot plus the events since the last one
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationBody {
    pub width: u8,
    pub height: u8,
    pub tiles: Vec<u8>,
    pub break_values: Vec<u8>,
    pub colors: Vec<u8>,
    pub bombs: Vec<u8>,
    pub phase: String,
    pub stable: bool,
    pub score: u32,
    pub moves_left: u32,
    pub cascade_level: u32,
    pub seed: u32,
    pub events: Vec<WireEvent>,
}

impl ObservationBody {
    /// Build from an engine snapshot and the drained event batch
    pub fn from_snapshot(snap: &BoardSnapshot, events: &[BoardEvent]) -> Self {
        Self {
            width: snap.width,
            height: snap.height,
            tiles: snap.tiles.clone(),
            break_values: snap.break_values.clone(),
            colors: snap.colors.clone(),
            bombs: snap.bombs.clone(),
            phase: snap.phase.as_str().to_string(),
            stable: snap.stable,
            score: snap.score,
            moves_left: snap.moves_left,
            cascade_level: snap.cascade_level,
            seed: snap.seed,
            events: events.iter().map(WireEvent::from).collect(),
        }
    }
}

/// Messages from server to client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerMessage {
    Welcome {
        seq: u64,
        ts: u64,
        protocol_version: String,
        role: Role,
        board: BoardDims,
    },
    Ack {
        seq: u64,
        ts: u64,
        command_seq: u64,
        status: AckStatus,
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
        moves_left: u32,
        score: u32,
    },
    Error {
        seq: u64,
        ts: u64,
        code: String,
        message: String,
    },
    Observation {
        seq: u64,
        ts: u64,
        #[serde(flatten)]
        body: ObservationBody,
    },
}

/// Build a hello message (used by clients and tests)
pub fn create_hello(seq: u64, name: &str, version: &str) -> ClientMessage {
    ClientMessage::Hello {
        seq,
        ts: now_ms(),
        client: ClientInfo {
            name: name.to_string(),
            version: version.to_string(),
        },
        protocol_version: PROTOCOL_VERSION.to_string(),
    }
}

/// Build a swap command message
pub fn create_swap_command(seq: u64, from: (i8, i8), to: (i8, i8)) -> ClientMessage {
    ClientMessage::Command {
        seq,
        ts: now_ms(),
        swap: SwapCommand {
            from: CellRef {
                x: from.0,
                y: from.1,
            },
            to: CellRef { x: to.0, y: to.1 },
        },
    }
}

/// Milliseconds since the Unix epoch
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
