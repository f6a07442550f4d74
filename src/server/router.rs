//! HTTP and WebSocket routes.

use actix_web::web;

use crate::server::connection::ws_connect;
use crate::server::games::{create_game, game_status, player_status, submit_verdict};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/ws").to(ws_connect))
        .service(web::resource("/games").route(web::post().to(create_game)))
        .service(web::resource("/games/{game_id}").route(web::get().to(game_status)))
        .service(web::resource("/games/{game_id}/verdict").route(web::post().to(submit_verdict)))
        .service(web::resource("/players/{player_id}").route(web::get().to(player_status)));
}
