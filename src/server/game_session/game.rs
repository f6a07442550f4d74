//! Round bookkeeping for one duel.
//!
//! Tracks each seat's choice and whether its countdown ran out. The session manager drives
//! countdowns and messaging; this type only answers "what does this event mean for the game".

use thiserror::Error;

use super::messages::GameSnapshot;
use crate::protocol::{Choice, GameId, PlayerId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seat {
    pub player: PlayerId,
    pub choice: Option<Choice>,
    pub expired: bool,
}

impl Seat {
    fn new(player: PlayerId) -> Self {
        Self {
            player,
            choice: None,
            expired: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActionRejected {
    #[error("player is not seated in this game")]
    NotSeated,
    #[error("player already chose this round")]
    AlreadyChose,
    #[error("player's deadline already expired")]
    DeadlineExpired,
}

/// Effect of a valid choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceOutcome {
    /// The opponent has not acted yet.
    Waiting,
    /// Both players chose; the round goes to the referee.
    RoundComplete([(PlayerId, Choice); 2]),
    /// The opponent's deadline already ran out: the chooser wins.
    OpponentForfeited { winner: PlayerId, loser: PlayerId },
}

/// Effect of a deadline expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryOutcome {
    /// Not seated, already chose or already expired.
    Stale,
    /// The opponent has neither chosen nor expired yet.
    WaitingForOpponent,
    /// The opponent chose in time: the expired player loses.
    Forfeit { winner: PlayerId, loser: PlayerId },
    /// Neither player acted.
    BothExpired,
}

#[derive(Debug, Clone)]
pub struct Game {
    pub id: GameId,
    pub round: u32,
    seats: [Seat; 2],
}

impl Game {
    pub fn new(id: GameId, players: [PlayerId; 2]) -> Self {
        Self {
            id,
            round: 1,
            seats: players.map(Seat::new),
        }
    }

    pub fn players(&self) -> [PlayerId; 2] {
        [self.seats[0].player, self.seats[1].player]
    }

    pub fn seat(&self, player: PlayerId) -> Option<&Seat> {
        self.seats.iter().find(|s| s.player == player)
    }

    pub fn opponent_of(&self, player: PlayerId) -> Option<PlayerId> {
        let idx = self.index_of(player)?;
        Some(self.seats[1 - idx].player)
    }

    /// Both seats hold a choice for the current round.
    pub fn round_complete(&self) -> bool {
        self.seats.iter().all(|s| s.choice.is_some())
    }

    /// Validate a choice without recording it.
    pub fn check_choice(&self, player: PlayerId) -> Result<(), ActionRejected> {
        let seat = self.seat(player).ok_or(ActionRejected::NotSeated)?;
        if seat.choice.is_some() {
            return Err(ActionRejected::AlreadyChose);
        }
        if seat.expired {
            return Err(ActionRejected::DeadlineExpired);
        }
        Ok(())
    }

    pub fn record_choice(&mut self, player: PlayerId, choice: Choice) -> Result<ChoiceOutcome, ActionRejected> {
        self.check_choice(player)?;
        let idx = self.index_of(player).ok_or(ActionRejected::NotSeated)?;
        self.seats[idx].choice = Some(choice);

        let opponent = &self.seats[1 - idx];
        if opponent.expired {
            return Ok(ChoiceOutcome::OpponentForfeited {
                winner: player,
                loser: opponent.player,
            });
        }
        match opponent.choice {
            Some(theirs) => Ok(ChoiceOutcome::RoundComplete([
                (player, choice),
                (opponent.player, theirs),
            ])),
            None => Ok(ChoiceOutcome::Waiting),
        }
    }

    pub fn record_expiry(&mut self, player: PlayerId) -> ExpiryOutcome {
        let Some(idx) = self.index_of(player) else {
            return ExpiryOutcome::Stale;
        };
        let seat = &mut self.seats[idx];
        if seat.choice.is_some() || seat.expired {
            return ExpiryOutcome::Stale;
        }
        seat.expired = true;

        let opponent = &self.seats[1 - idx];
        if opponent.choice.is_some() {
            ExpiryOutcome::Forfeit {
                winner: opponent.player,
                loser: player,
            }
        } else if opponent.expired {
            ExpiryOutcome::BothExpired
        } else {
            ExpiryOutcome::WaitingForOpponent
        }
    }

    /// Choices are only revealed once the round is complete.
    pub fn snapshot(&self) -> GameSnapshot {
        let choices = match (self.seats[0].choice, self.seats[1].choice) {
            (Some(first), Some(second)) => Some([
                (self.seats[0].player, first),
                (self.seats[1].player, second),
            ]),
            _ => None,
        };
        GameSnapshot {
            game_id: self.id,
            round: self.round,
            players: self.players(),
            choices,
        }
    }

    /// Clear both seats and move to the next round.
    pub fn next_round(&mut self) {
        self.round += 1;
        for seat in &mut self.seats {
            seat.choice = None;
            seat.expired = false;
        }
    }

    fn index_of(&self, player: PlayerId) -> Option<usize> {
        self.seats.iter().position(|s| s.player == player)
    }
}
