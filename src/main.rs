//! Main entry point for the rock-paper-scissors server.
//!
//! Reads the environment, starts the countdown runtime and the game session actor, then
//! serves the player WebSocket and the match assigner's HTTP endpoints. Failing to bind the
//! listen port ends the process.

use std::io;
use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use log::{error, info};

use config::server::ServerConfig;
use server::game_session::GameSessionManager;
use timer::scheduler::timer_runtime;
use timer::{Scheduler, StageSequencer, TimerRegistry, TokioScheduler};

pub mod config;
mod protocol;
mod server;
mod timer;

#[cfg(test)]
mod testing;

fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from_env().map_err(|e| {
        error!("[Server] Invalid configuration: {}", e);
        io::Error::other(e)
    })?;

    // Countdown callbacks run on a dedicated runtime, outside the actor system.
    let timers = timer_runtime(config.timer_workers)?;
    let scheduler: Arc<dyn Scheduler> = Arc::new(TokioScheduler::new(timers.handle().clone()));

    actix_web::rt::System::new().block_on(serve(config, scheduler))
}

async fn serve(config: ServerConfig, scheduler: Arc<dyn Scheduler>) -> io::Result<()> {
    let game_session_manager = GameSessionManager::launch(
        Arc::new(TimerRegistry::new()),
        scheduler,
        StageSequencer::new(config.pacing),
    );
    let state = web::Data::new(server::state::AppState::new(game_session_manager));

    let server = HttpServer::new(move || {
        App::new()
            .wrap(
                actix_web::middleware::DefaultHeaders::new()
                    .add(("Access-Control-Allow-Origin", "*"))
                    .add(("Access-Control-Allow-Headers", "*")),
            )
            .app_data(state.clone())
            .configure(crate::server::router::config)
    })
    .bind((config.bind_addr.as_str(), config.port))
    .map_err(|e| {
        error!(
            "[Server] Cannot bind {}:{}: {}",
            config.bind_addr, config.port, e
        );
        e
    })?;

    info!(
        "[Server] Listening on {}:{} (countdown pacing {:?})",
        config.bind_addr, config.port, config.pacing
    );
    server.run().await
}
