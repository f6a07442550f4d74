//! HTTP surface for the match assigner and the referee.
//!
//! `POST /games` seats two ready players in a new game. `GET /games/{id}` shows the current
//! round, with both choices once they are in, and `POST /games/{id}/verdict` rules on it.
//! `GET /players/{id}` reports what the session manager knows about one player.

use actix_web::{HttpResponse, http::StatusCode, web};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};

use crate::config::game::PLAYERS_PER_GAME;
use crate::protocol::{GameId, PlayerId};
use crate::server::game_session::messages::{
    CreateGame, GameError, GameStatus, PlayerStatus, RoundOutcome, RoundVerdict, VerdictError,
};
use crate::server::state::AppState;
use crate::server::ws_error::http_error_response;

#[derive(Debug, Deserialize)]
pub struct CreateGameRequest {
    pub players: Vec<PlayerId>,
}

#[derive(Debug, Serialize)]
struct CreateGameResponse {
    game_id: GameId,
}

#[derive(Debug, Deserialize)]
pub struct VerdictRequest {
    pub round: u32,
    pub outcome: RoundOutcome,
}

fn verdict_error_status(err: &VerdictError) -> StatusCode {
    match err {
        VerdictError::UnknownGame(_) => StatusCode::NOT_FOUND,
        VerdictError::StaleRound { .. } | VerdictError::RoundOpen(_) => StatusCode::CONFLICT,
        VerdictError::NotSeated(_) => StatusCode::BAD_REQUEST,
    }
}

fn game_error_status(err: &GameError) -> StatusCode {
    match err {
        GameError::SamePlayer => StatusCode::BAD_REQUEST,
        GameError::UnknownPlayer(_) => StatusCode::NOT_FOUND,
        GameError::NotReady(_) | GameError::AlreadyInGame(_) => StatusCode::CONFLICT,
    }
}

fn mailbox_error() -> HttpResponse {
    http_error_response(
        "SESSION_MANAGER_UNAVAILABLE",
        "The game session manager did not answer.",
        None,
        StatusCode::INTERNAL_SERVER_ERROR,
    )
}

pub async fn create_game(body: web::Json<CreateGameRequest>, data: web::Data<AppState>) -> HttpResponse {
    let players: [PlayerId; PLAYERS_PER_GAME] = match body.into_inner().players.try_into() {
        Ok(players) => players,
        Err(given) => {
            return http_error_response(
                "INVALID_PLAYER_COUNT",
                &format!("A game needs exactly {} players, got {}.", PLAYERS_PER_GAME, given.len()),
                None,
                StatusCode::BAD_REQUEST,
            );
        }
    };

    match data.game_session_manager.send(CreateGame { players }).await {
        Ok(Ok(game_id)) => {
            info!("[Games] Created game {} for {} and {}", game_id, players[0], players[1]);
            HttpResponse::Created().json(CreateGameResponse { game_id })
        }
        Ok(Err(e)) => {
            let context = e.player().map(|p| p.to_string());
            http_error_response(e.code(), &e.to_string(), context.as_deref(), game_error_status(&e))
        }
        Err(e) => {
            error!("[Games] CreateGame mailbox error: {}", e);
            mailbox_error()
        }
    }
}

pub async fn player_status(path: web::Path<PlayerId>, data: web::Data<AppState>) -> HttpResponse {
    let player = path.into_inner();
    match data.game_session_manager.send(PlayerStatus { player }).await {
        Ok(Some(snapshot)) => HttpResponse::Ok().json(snapshot),
        Ok(None) => http_error_response(
            "UNKNOWN_PLAYER",
            "No such player is connected.",
            Some(&player.to_string()),
            StatusCode::NOT_FOUND,
        ),
        Err(e) => {
            error!("[Games] PlayerStatus mailbox error: {}", e);
            mailbox_error()
        }
    }
}

pub async fn game_status(path: web::Path<GameId>, data: web::Data<AppState>) -> HttpResponse {
    let game_id = path.into_inner();
    match data.game_session_manager.send(GameStatus { game_id }).await {
        Ok(Some(snapshot)) => HttpResponse::Ok().json(snapshot),
        Ok(None) => http_error_response(
            "UNKNOWN_GAME",
            "No such game is running.",
            Some(&game_id.to_string()),
            StatusCode::NOT_FOUND,
        ),
        Err(e) => {
            error!("[Games] GameStatus mailbox error: {}", e);
            mailbox_error()
        }
    }
}

pub async fn submit_verdict(
    path: web::Path<GameId>,
    body: web::Json<VerdictRequest>,
    data: web::Data<AppState>,
) -> HttpResponse {
    let game_id = path.into_inner();
    let VerdictRequest { round, outcome } = body.into_inner();
    let verdict = RoundVerdict {
        game_id,
        round,
        outcome,
    };
    match data.game_session_manager.send(verdict).await {
        Ok(Ok(())) => {
            info!("[Games] Verdict {:?} applied to game {} round {}", outcome, game_id, round);
            HttpResponse::NoContent().finish()
        }
        Ok(Err(e)) => {
            warn!("[Games] Verdict for game {} rejected: {}", game_id, e);
            http_error_response(e.code(), &e.to_string(), Some(&game_id.to_string()), verdict_error_status(&e))
        }
        Err(e) => {
            error!("[Games] RoundVerdict mailbox error: {}", e);
            mailbox_error()
        }
    }
}
