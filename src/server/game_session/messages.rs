use actix::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::protocol::{Choice, ClientboundPacket, GameId, PlayerId};
use crate::timer::ConnectionRef;

/// A socket opened; the manager assigns the player's id.
#[derive(Message)]
#[rtype(result = "PlayerId")]
pub struct Connect {
    pub connection: ConnectionRef,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct Disconnect {
    pub player: PlayerId,
}

/// A decoded packet read off a player's socket.
#[derive(Message)]
#[rtype(result = "()")]
pub struct ClientPacket {
    pub player: PlayerId,
    pub packet: ClientboundPacket,
}

/// Issued by the match assigner: seat two ready players in a new game.
#[derive(Message, Debug, Clone, Copy)]
#[rtype(result = "Result<GameId, GameError>")]
pub struct CreateGame {
    pub players: [PlayerId; 2],
}

/// Raised by the deadline scheduler when a player's countdown ran out.
#[derive(Message)]
#[rtype(result = "()")]
pub struct DeadlineExpired {
    pub player: PlayerId,
    pub connection: ConnectionRef,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundOutcome {
    Winner(PlayerId),
    Draw,
}

/// The external referee's ruling on a completed round.
#[derive(Message, Debug, Clone, Copy)]
#[rtype(result = "Result<(), VerdictError>")]
pub struct RoundVerdict {
    pub game_id: GameId,
    pub round: u32,
    pub outcome: RoundOutcome,
}

#[derive(Message)]
#[rtype(result = "Option<GameSnapshot>")]
pub struct GameStatus {
    pub game_id: GameId,
}

/// A running game as the referee sees it. Choices stay hidden until both are in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub game_id: GameId,
    pub round: u32,
    pub players: [PlayerId; 2],
    pub choices: Option<[(PlayerId, Choice); 2]>,
}

#[derive(Message)]
#[rtype(result = "Option<PlayerSnapshot>")]
pub struct PlayerStatus {
    pub player: PlayerId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerSnapshot {
    pub name: String,
    pub ready: bool,
    pub game: Option<GameId>,
    pub countdown_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("a game needs two distinct players")]
    SamePlayer,
    #[error("player {0} is not connected")]
    UnknownPlayer(PlayerId),
    #[error("player {0} has not asked to start a game")]
    NotReady(PlayerId),
    #[error("player {0} is already in a game")]
    AlreadyInGame(PlayerId),
}

impl GameError {
    /// Stable error code for HTTP bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::SamePlayer => "SAME_PLAYER",
            Self::UnknownPlayer(_) => "UNKNOWN_PLAYER",
            Self::NotReady(_) => "PLAYER_NOT_READY",
            Self::AlreadyInGame(_) => "PLAYER_IN_GAME",
        }
    }

    pub fn player(&self) -> Option<PlayerId> {
        match self {
            Self::SamePlayer => None,
            Self::UnknownPlayer(p) | Self::NotReady(p) | Self::AlreadyInGame(p) => Some(*p),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VerdictError {
    #[error("game {0} is not running")]
    UnknownGame(GameId),
    #[error("verdict for round {requested} but the game is in round {current}")]
    StaleRound { requested: u32, current: u32 },
    #[error("round {0} is still waiting for a choice")]
    RoundOpen(u32),
    #[error("player {0} is not seated in this game")]
    NotSeated(PlayerId),
}

impl VerdictError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownGame(_) => "UNKNOWN_GAME",
            Self::StaleRound { .. } => "STALE_ROUND",
            Self::RoundOpen(_) => "ROUND_OPEN",
            Self::NotSeated(_) => "NOT_SEATED",
        }
    }
}
