//! Wire protocol shared with clients: packet catalog, identifiers and the binary codec.

pub mod codec;
pub mod packets;
pub mod types;

pub use packets::{ClientboundPacket, ServerboundPacket};
pub use types::{Choice, FinishState, GameId, PlayerId};
