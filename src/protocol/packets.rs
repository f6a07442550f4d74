//! Packet catalog.
//!
//! Direction labels follow the wire protocol: *clientbound* packets are produced by clients
//! and read by the server, *serverbound* packets are produced by the server. Every packet
//! has a type identifier that both ends share; identifiers are never reused or renumbered.

use serde::{Deserialize, Serialize};

use super::types::{Choice, FinishState, GameId, PlayerId};
use crate::timer::Stage;

/// Stable one-byte packet identifiers, in registration order.
pub mod type_ids {
    pub const CLIENT_CONNECTION: u8 = 1;
    pub const CLIENT_GAME_START: u8 = 2;
    pub const CLIENT_PLAYER_TURN_ACTION: u8 = 3;
    pub const SERVER_CONNECTION: u8 = 4;
    pub const SERVER_GAME_END: u8 = 5;
    pub const SERVER_GAME_START: u8 = 6;
    pub const SERVER_REMAINING_TIME: u8 = 7;
    pub const SERVER_CHOICE: u8 = 8;
}

/// Client hello, carrying the name shown to opponents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionRequest {
    pub name: String,
}

/// Client is ready to be placed in a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStartRequest;

/// Client's move for the current round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerTurnAction {
    pub choice: Choice,
}

/// Server acknowledgement of a connection, with the id assigned to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionAccepted {
    pub player_id: PlayerId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEnd {
    pub state: FinishState,
}

/// A round opened: the player's countdown starts right after this packet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStart {
    pub game_id: GameId,
    pub opponent: String,
    pub round: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemainingTime {
    pub stage: Stage,
}

/// The opponent's move, relayed once both players chose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerChoice {
    pub choice: Choice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientboundPacket {
    Connection(ConnectionRequest),
    GameStart(GameStartRequest),
    PlayerTurnAction(PlayerTurnAction),
}

impl ClientboundPacket {
    pub fn type_id(&self) -> u8 {
        match self {
            Self::Connection(_) => type_ids::CLIENT_CONNECTION,
            Self::GameStart(_) => type_ids::CLIENT_GAME_START,
            Self::PlayerTurnAction(_) => type_ids::CLIENT_PLAYER_TURN_ACTION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerboundPacket {
    Connection(ConnectionAccepted),
    GameEnd(GameEnd),
    GameStart(GameStart),
    RemainingTime(RemainingTime),
    ServerChoice(ServerChoice),
}

impl ServerboundPacket {
    pub fn type_id(&self) -> u8 {
        match self {
            Self::Connection(_) => type_ids::SERVER_CONNECTION,
            Self::GameEnd(_) => type_ids::SERVER_GAME_END,
            Self::GameStart(_) => type_ids::SERVER_GAME_START,
            Self::RemainingTime(_) => type_ids::SERVER_REMAINING_TIME,
            Self::ServerChoice(_) => type_ids::SERVER_CHOICE,
        }
    }

    pub fn remaining_time(stage: Stage) -> Self {
        Self::RemainingTime(RemainingTime { stage })
    }

    pub fn game_end(state: FinishState) -> Self {
        Self::GameEnd(GameEnd { state })
    }
}
