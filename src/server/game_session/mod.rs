//! Game session layer: players, games and their turn countdowns.

pub mod game;
pub mod messages;
pub mod server;

pub use server::GameSessionManager;
