/// WebSocket session handler for one player.
///
/// Each binary frame carries one packet (see [`crate::protocol::codec`]). Decoded packets are
/// relayed to the game session manager; serverbound packets come back as [`Outbound`]
/// messages and leave as binary frames.
use actix::prelude::*;
use actix_web::web::Bytes;
use actix_web::{Error, HttpRequest, HttpResponse, web};
use actix_web_actors::ws;
use log::{debug, error, warn};
use std::sync::Arc;

use crate::protocol::codec::{decode_clientbound, encode_serverbound};
use crate::protocol::{ClientboundPacket, PlayerId, ServerboundPacket};
use crate::server::game_session::GameSessionManager;
use crate::server::game_session::messages::{ClientPacket, Connect, Disconnect};
use crate::server::state::AppState;
use crate::server::ws_error::ws_error_message;
use crate::timer::{Connection, SendError};

/// A packet to write to this socket.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Outbound(pub ServerboundPacket);

impl Connection for Addr<PlayerConnection> {
    fn send(&self, packet: ServerboundPacket) -> Result<(), SendError> {
        if !self.connected() {
            return Err(SendError::Closed);
        }
        self.do_send(Outbound(packet));
        Ok(())
    }
}

pub struct PlayerConnection {
    player_id: Option<PlayerId>,
    manager: Addr<GameSessionManager>,
}

impl PlayerConnection {
    pub fn new(manager: Addr<GameSessionManager>) -> Self {
        Self {
            player_id: None,
            manager,
        }
    }
}

impl Actor for PlayerConnection {
    type Context = ws::WebsocketContext<Self>;

    /// Registers the socket with the manager; no frame is processed before the id arrives.
    fn started(&mut self, ctx: &mut Self::Context) {
        self.manager
            .send(Connect {
                connection: Arc::new(ctx.address()),
            })
            .into_actor(self)
            .then(|res, act, ctx| {
                match res {
                    Ok(player_id) => act.player_id = Some(player_id),
                    Err(e) => {
                        error!("[Connection] Session manager unavailable: {}", e);
                        ctx.stop();
                    }
                }
                fut::ready(())
            })
            .wait(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        if let Some(player) = self.player_id {
            self.manager.do_send(Disconnect { player });
        }
    }
}

/// What to do with one inbound frame.
#[derive(Debug)]
enum FrameAction {
    Forward(ClientboundPacket),
    Reply(String),
    Pong(Bytes),
    Close(Option<ws::CloseReason>),
    Ignore,
}

fn read_frame(player: PlayerId, msg: ws::Message) -> FrameAction {
    match msg {
        ws::Message::Binary(bytes) => match decode_clientbound(&bytes) {
            Ok(packet) => {
                debug!("[Connection] player={} sent packet type {}", player, packet.type_id());
                FrameAction::Forward(packet)
            }
            Err(e) => {
                warn!("[Connection] Bad frame from player={}: {}", player, e);
                FrameAction::Reply(ws_error_message("INVALID_PACKET", &e.to_string(), Some(&player.to_string())))
            }
        },
        ws::Message::Text(_) => FrameAction::Reply(ws_error_message(
            "BINARY_ONLY",
            "Packets must be sent as binary frames.",
            Some(&player.to_string()),
        )),
        ws::Message::Ping(msg) => FrameAction::Pong(msg),
        ws::Message::Close(reason) => FrameAction::Close(reason),
        _ => FrameAction::Ignore,
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for PlayerConnection {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        let Some(player) = self.player_id else {
            return;
        };
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                warn!("[Connection] Protocol error from player={}: {}", player, e);
                ctx.stop();
                return;
            }
        };
        match read_frame(player, msg) {
            FrameAction::Forward(packet) => self.manager.do_send(ClientPacket { player, packet }),
            FrameAction::Reply(text) => ctx.text(text),
            FrameAction::Pong(msg) => ctx.pong(&msg),
            FrameAction::Close(reason) => {
                ctx.close(reason);
                ctx.stop();
            }
            FrameAction::Ignore => (),
        }
    }
}

impl Handler<Outbound> for PlayerConnection {
    type Result = ();

    fn handle(&mut self, msg: Outbound, ctx: &mut Self::Context) {
        match encode_serverbound(&msg.0) {
            Ok(bytes) => ctx.binary(bytes),
            Err(e) => error!("[Connection] Failed to encode packet type {}: {}", msg.0.type_id(), e),
        }
    }
}

/// WebSocket endpoint for players.
pub async fn ws_connect(
    req: HttpRequest,
    stream: web::Payload,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    ws::start(PlayerConnection::new(data.game_session_manager.clone()), &req, stream)
}
