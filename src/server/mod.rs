//! Network-facing side of the server: routes, player sockets and the game session actor.

pub mod connection;
pub mod game_session;
pub mod games;
pub mod router;
pub mod state;
pub mod ws_error;
