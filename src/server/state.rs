//! Shared state injected into HTTP and WebSocket handlers.

use actix::Addr;

use crate::server::game_session::GameSessionManager;

pub struct AppState {
    pub game_session_manager: Addr<GameSessionManager>,
}

impl AppState {
    pub fn new(game_session_manager: Addr<GameSessionManager>) -> Self {
        AppState { game_session_manager }
    }
}
