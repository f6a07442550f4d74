//! Game session manager actor.
//!
//! Owns every connected player and running game, opens and closes turn countdowns through
//! the [`DeadlineScheduler`], and turns deadline expiries into forfeits. Rule evaluation is
//! left to an external referee that reads [`GameStatus`] and answers with [`RoundVerdict`].

use std::collections::HashMap;
use std::ptr;
use std::sync::Arc;

use actix::prelude::*;
use log::{debug, info, warn};
use uuid::Uuid;

use super::game::{ChoiceOutcome, ExpiryOutcome, Game};
use super::messages::{
    ClientPacket, Connect, CreateGame, DeadlineExpired, Disconnect, GameError, GameSnapshot,
    GameStatus, PlayerSnapshot, PlayerStatus, RoundOutcome, RoundVerdict, VerdictError,
};
use crate::config::game::{ANONYMOUS_PLAYER_NAME, MAX_PLAYER_NAME_LEN};
use crate::protocol::packets::{ConnectionAccepted, GameStart, ServerChoice};
use crate::protocol::{Choice, ClientboundPacket, FinishState, GameId, PlayerId, ServerboundPacket};
use crate::timer::{
    ConnectionRef, DeadlineScheduler, ExpiryPublisher, Scheduler, StageSequencer, TimerRegistry,
};

impl ExpiryPublisher for Recipient<DeadlineExpired> {
    fn publish(&self, player: PlayerId, connection: ConnectionRef) {
        self.do_send(DeadlineExpired { player, connection });
    }
}

/// A player with an open socket.
struct ConnectedPlayer {
    name: String,
    connection: ConnectionRef,
    ready: bool,
    game: Option<GameId>,
}

#[derive(Debug, Clone, Copy)]
enum GameResult {
    Winner(PlayerId),
    Draw,
}

pub struct GameSessionManager {
    players: HashMap<PlayerId, ConnectedPlayer>,
    games: HashMap<GameId, Game>,
    deadlines: DeadlineScheduler,
}

impl Actor for GameSessionManager {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        info!("[GameSession] Manager started");
    }
}

impl GameSessionManager {
    pub fn new(deadlines: DeadlineScheduler) -> Self {
        Self {
            players: HashMap::new(),
            games: HashMap::new(),
            deadlines,
        }
    }

    /// Start the manager with a deadline scheduler that reports expiries back to it.
    pub fn launch(
        registry: Arc<TimerRegistry>,
        scheduler: Arc<dyn Scheduler>,
        sequencer: StageSequencer,
    ) -> Addr<Self> {
        Self::create(move |ctx| {
            let publisher: Arc<dyn ExpiryPublisher> =
                Arc::new(ctx.address().recipient::<DeadlineExpired>());
            Self::new(DeadlineScheduler::new(registry, scheduler, publisher, sequencer))
        })
    }

    fn send_to(&self, player: PlayerId, packet: ServerboundPacket) {
        let Some(entry) = self.players.get(&player) else {
            debug!("[GameSession] Dropping packet for disconnected player={}", player);
            return;
        };
        if let Err(e) = entry.connection.send(packet) {
            warn!("[GameSession] Send to player={} failed: {}", player, e);
        }
    }

    fn name_of(&self, player: PlayerId) -> String {
        self.players
            .get(&player)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| ANONYMOUS_PLAYER_NAME.to_string())
    }

    /// Tell both players a round opened and (re)start their countdowns.
    fn open_round(&self, game_id: GameId, round: u32, players: [PlayerId; 2]) {
        for (player, opponent) in [(players[0], players[1]), (players[1], players[0])] {
            self.send_to(
                player,
                ServerboundPacket::GameStart(GameStart {
                    game_id,
                    opponent: self.name_of(opponent),
                    round,
                }),
            );
            let Some(entry) = self.players.get(&player) else {
                continue;
            };
            if round == 1 {
                self.deadlines.start_turn_timer(player, entry.connection.clone());
            } else {
                self.deadlines.reset(player, entry.connection.clone());
            }
        }
    }

    fn create_game(&mut self, players: [PlayerId; 2]) -> Result<GameId, GameError> {
        let [a, b] = players;
        if a == b {
            return Err(GameError::SamePlayer);
        }
        for player in players {
            let entry = self.players.get(&player).ok_or(GameError::UnknownPlayer(player))?;
            if entry.game.is_some() {
                return Err(GameError::AlreadyInGame(player));
            }
            if !entry.ready {
                return Err(GameError::NotReady(player));
            }
        }

        let game_id = Uuid::new_v4();
        for player in players {
            if let Some(entry) = self.players.get_mut(&player) {
                entry.ready = false;
                entry.game = Some(game_id);
            }
        }
        self.games.insert(game_id, Game::new(game_id, players));
        info!("[GameSession] Game created game_id={} players={} vs {}", game_id, a, b);

        self.open_round(game_id, 1, players);
        Ok(game_id)
    }

    fn finish_game(&mut self, game_id: GameId, result: GameResult) {
        let Some(game) = self.games.remove(&game_id) else {
            return;
        };
        for player in game.players() {
            self.deadlines.cancel(player);
            if let Some(entry) = self.players.get_mut(&player) {
                entry.game = None;
            }
            let state = match result {
                GameResult::Draw => FinishState::Draw,
                GameResult::Winner(winner) if winner == player => FinishState::Win,
                GameResult::Winner(_) => FinishState::Lose,
            };
            self.send_to(player, ServerboundPacket::game_end(state));
        }
        match result {
            GameResult::Winner(winner) => info!("[GameSession] Game over game_id={} winner={}", game_id, winner),
            GameResult::Draw => info!("[GameSession] Game over game_id={} draw", game_id),
        }
    }

    fn handle_turn_action(&mut self, player: PlayerId, choice: Choice) {
        let Some(game_id) = self.players.get(&player).and_then(|p| p.game) else {
            warn!("[GameSession] Turn action from player={} outside a game", player);
            return;
        };
        let Some(game) = self.games.get_mut(&game_id) else {
            return;
        };
        if let Err(reason) = game.check_choice(player) {
            warn!("[GameSession] Turn action from player={} rejected: {}", player, reason);
            return;
        }
        // The countdown decides whether the action was in time.
        let Some(stage) = self.deadlines.cancel(player) else {
            warn!("[GameSession] Turn action from player={} arrived after the deadline", player);
            return;
        };
        debug!("[GameSession] player={} chose {:?} at stage {}", player, choice, stage);

        let round = game.round;
        let outcome = match game.record_choice(player, choice) {
            Ok(outcome) => outcome,
            Err(reason) => {
                warn!("[GameSession] Turn action from player={} rejected: {}", player, reason);
                return;
            }
        };
        match outcome {
            ChoiceOutcome::Waiting => {}
            ChoiceOutcome::OpponentForfeited { winner, .. } => {
                self.finish_game(game_id, GameResult::Winner(winner));
            }
            ChoiceOutcome::RoundComplete(choices) => {
                for ((receiver, _), (_, theirs)) in [(choices[0], choices[1]), (choices[1], choices[0])] {
                    self.send_to(receiver, ServerboundPacket::ServerChoice(ServerChoice { choice: theirs }));
                }
                info!("[GameSession] Round {} of game_id={} complete, awaiting verdict", round, game_id);
            }
        }
    }
}

impl Handler<Connect> for GameSessionManager {
    type Result = MessageResult<Connect>;

    fn handle(&mut self, msg: Connect, _: &mut Context<Self>) -> Self::Result {
        let player = PlayerId::random();
        self.players.insert(
            player,
            ConnectedPlayer {
                name: ANONYMOUS_PLAYER_NAME.to_string(),
                connection: msg.connection,
                ready: false,
                game: None,
            },
        );
        debug!("[GameSession] Socket opened for player={}", player);
        MessageResult(player)
    }
}

impl Handler<Disconnect> for GameSessionManager {
    type Result = ();

    fn handle(&mut self, msg: Disconnect, _: &mut Context<Self>) -> Self::Result {
        self.deadlines.cancel(msg.player);
        let Some(entry) = self.players.remove(&msg.player) else {
            return;
        };
        info!("[GameSession] Player {} ({}) disconnected", entry.name, msg.player);
        let Some(game_id) = entry.game else {
            return;
        };
        match self.games.get(&game_id).and_then(|g| g.opponent_of(msg.player)) {
            Some(opponent) => self.finish_game(game_id, GameResult::Winner(opponent)),
            None => {
                self.games.remove(&game_id);
            }
        }
    }
}

impl Handler<ClientPacket> for GameSessionManager {
    type Result = ();

    fn handle(&mut self, msg: ClientPacket, _: &mut Context<Self>) -> Self::Result {
        let player = msg.player;
        match msg.packet {
            ClientboundPacket::Connection(hello) => {
                let Some(entry) = self.players.get_mut(&player) else {
                    return;
                };
                let name: String = hello.name.trim().chars().take(MAX_PLAYER_NAME_LEN).collect();
                if !name.is_empty() {
                    entry.name = name;
                }
                info!("[GameSession] Player {} connected as {}", player, entry.name);
                self.send_to(
                    player,
                    ServerboundPacket::Connection(ConnectionAccepted { player_id: player }),
                );
            }
            ClientboundPacket::GameStart(_) => {
                let Some(entry) = self.players.get_mut(&player) else {
                    return;
                };
                if entry.game.is_some() {
                    warn!("[GameSession] player={} asked for a game while in one", player);
                    return;
                }
                entry.ready = true;
                debug!("[GameSession] player={} ready for a game", player);
            }
            ClientboundPacket::PlayerTurnAction(action) => self.handle_turn_action(player, action.choice),
        }
    }
}

impl Handler<CreateGame> for GameSessionManager {
    type Result = Result<GameId, GameError>;

    fn handle(&mut self, msg: CreateGame, _: &mut Context<Self>) -> Self::Result {
        self.create_game(msg.players)
    }
}

impl Handler<DeadlineExpired> for GameSessionManager {
    type Result = ();

    fn handle(&mut self, msg: DeadlineExpired, _: &mut Context<Self>) -> Self::Result {
        let player = msg.player;
        let registered = self
            .players
            .get(&player)
            .is_some_and(|p| ptr::addr_eq(Arc::as_ptr(&p.connection), Arc::as_ptr(&msg.connection)));
        if !registered {
            debug!("[GameSession] Expiry for a closed session of player={} ignored", player);
            return;
        }
        let Some(game_id) = self.players.get(&player).and_then(|p| p.game) else {
            debug!("[GameSession] Expiry for player={} outside a game ignored", player);
            return;
        };
        let Some(game) = self.games.get_mut(&game_id) else {
            return;
        };
        match game.record_expiry(player) {
            ExpiryOutcome::Stale => debug!("[GameSession] Stale expiry for player={}", player),
            ExpiryOutcome::WaitingForOpponent => {
                info!("[GameSession] player={} ran out of time, waiting on opponent", player);
            }
            ExpiryOutcome::Forfeit { winner, loser } => {
                info!("[GameSession] player={} forfeits game_id={} on time", loser, game_id);
                self.finish_game(game_id, GameResult::Winner(winner));
            }
            ExpiryOutcome::BothExpired => self.finish_game(game_id, GameResult::Draw),
        }
    }
}

impl Handler<RoundVerdict> for GameSessionManager {
    type Result = Result<(), VerdictError>;

    fn handle(&mut self, msg: RoundVerdict, _: &mut Context<Self>) -> Self::Result {
        let game = self
            .games
            .get_mut(&msg.game_id)
            .ok_or(VerdictError::UnknownGame(msg.game_id))?;
        if game.round != msg.round {
            return Err(VerdictError::StaleRound {
                requested: msg.round,
                current: game.round,
            });
        }
        if !game.round_complete() {
            return Err(VerdictError::RoundOpen(game.round));
        }
        match msg.outcome {
            RoundOutcome::Winner(winner) => {
                if game.seat(winner).is_none() {
                    return Err(VerdictError::NotSeated(winner));
                }
                self.finish_game(msg.game_id, GameResult::Winner(winner));
            }
            RoundOutcome::Draw => {
                game.next_round();
                let (round, players) = (game.round, game.players());
                info!("[GameSession] Round drawn, game_id={} moves to round {}", msg.game_id, round);
                self.open_round(msg.game_id, round, players);
            }
        }
        Ok(())
    }
}

impl Handler<GameStatus> for GameSessionManager {
    type Result = Option<GameSnapshot>;

    fn handle(&mut self, msg: GameStatus, _: &mut Context<Self>) -> Self::Result {
        self.games.get(&msg.game_id).map(|g| g.snapshot())
    }
}

impl Handler<PlayerStatus> for GameSessionManager {
    type Result = Option<PlayerSnapshot>;

    fn handle(&mut self, msg: PlayerStatus, _: &mut Context<Self>) -> Self::Result {
        self.players.get(&msg.player).map(|p| PlayerSnapshot {
            name: p.name.clone(),
            ready: p.ready,
            game: p.game,
            countdown_active: self.deadlines.is_active(msg.player),
        })
    }
}
