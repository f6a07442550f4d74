//! Binary frame codec.
//!
//! # Wire Format
//!
//! ```text
//! [type id: u8][payload: bincode-encoded packet body]
//! ```
//!
//! One frame carries exactly one packet. The body uses bincode's standard configuration
//! with fixed-size integers, so both ends agree on sizes regardless of value.

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use super::packets::{ClientboundPacket, ServerboundPacket, type_ids};

fn config() -> impl bincode::config::Config {
    bincode::config::standard().with_fixed_int_encoding()
}

/// Errors that can occur while encoding or decoding a frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("Empty frame")]
    EmptyFrame,

    #[error("Unknown packet type id: {0}")]
    UnknownType(u8),

    #[error("Packet type id {0} does not travel in this direction")]
    WrongDirection(u8),

    #[error("Trailing bytes after packet {type_id}: {extra}")]
    TrailingBytes { type_id: u8, extra: usize },

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Decode error for packet {type_id}: {message}")]
    Decode { type_id: u8, message: String },
}

pub type CodecResult<T> = Result<T, CodecError>;

fn frame<T: Serialize>(type_id: u8, body: &T) -> CodecResult<Vec<u8>> {
    let mut bytes = vec![type_id];
    bincode::serde::encode_into_std_write(body, &mut bytes, config())
        .map_err(|e| CodecError::Encode(e.to_string()))?;
    Ok(bytes)
}

fn body<T: DeserializeOwned>(type_id: u8, bytes: &[u8]) -> CodecResult<T> {
    let (value, read) = bincode::serde::decode_from_slice(bytes, config()).map_err(|e| {
        CodecError::Decode {
            type_id,
            message: e.to_string(),
        }
    })?;
    if read != bytes.len() {
        return Err(CodecError::TrailingBytes {
            type_id,
            extra: bytes.len() - read,
        });
    }
    Ok(value)
}

fn split(bytes: &[u8]) -> CodecResult<(u8, &[u8])> {
    bytes.split_first().map(|(id, rest)| (*id, rest)).ok_or(CodecError::EmptyFrame)
}

/// Client-side encoder, used to build frames in tests.
#[cfg(test)]
pub fn encode_clientbound(packet: &ClientboundPacket) -> CodecResult<Vec<u8>> {
    let id = packet.type_id();
    match packet {
        ClientboundPacket::Connection(p) => frame(id, p),
        ClientboundPacket::GameStart(p) => frame(id, p),
        ClientboundPacket::PlayerTurnAction(p) => frame(id, p),
    }
}

pub fn encode_serverbound(packet: &ServerboundPacket) -> CodecResult<Vec<u8>> {
    let id = packet.type_id();
    match packet {
        ServerboundPacket::Connection(p) => frame(id, p),
        ServerboundPacket::GameEnd(p) => frame(id, p),
        ServerboundPacket::GameStart(p) => frame(id, p),
        ServerboundPacket::RemainingTime(p) => frame(id, p),
        ServerboundPacket::ServerChoice(p) => frame(id, p),
    }
}

/// Decode a frame read off a client connection.
pub fn decode_clientbound(bytes: &[u8]) -> CodecResult<ClientboundPacket> {
    let (id, rest) = split(bytes)?;
    match id {
        type_ids::CLIENT_CONNECTION => body(id, rest).map(ClientboundPacket::Connection),
        type_ids::CLIENT_GAME_START => body(id, rest).map(ClientboundPacket::GameStart),
        type_ids::CLIENT_PLAYER_TURN_ACTION => {
            body(id, rest).map(ClientboundPacket::PlayerTurnAction)
        }
        type_ids::SERVER_CONNECTION..=type_ids::SERVER_CHOICE => Err(CodecError::WrongDirection(id)),
        other => Err(CodecError::UnknownType(other)),
    }
}

/// Client-side decoder, used to read frames in tests.
#[cfg(test)]
pub fn decode_serverbound(bytes: &[u8]) -> CodecResult<ServerboundPacket> {
    let (id, rest) = split(bytes)?;
    match id {
        type_ids::SERVER_CONNECTION => body(id, rest).map(ServerboundPacket::Connection),
        type_ids::SERVER_GAME_END => body(id, rest).map(ServerboundPacket::GameEnd),
        type_ids::SERVER_GAME_START => body(id, rest).map(ServerboundPacket::GameStart),
        type_ids::SERVER_REMAINING_TIME => body(id, rest).map(ServerboundPacket::RemainingTime),
        type_ids::SERVER_CHOICE => body(id, rest).map(ServerboundPacket::ServerChoice),
        type_ids::CLIENT_CONNECTION..=type_ids::CLIENT_PLAYER_TURN_ACTION => {
            Err(CodecError::WrongDirection(id))
        }
        other => Err(CodecError::UnknownType(other)),
    }
}
