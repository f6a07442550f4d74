/// Game configuration constants.
///
/// This module defines the fixed gameplay parameters: seats per game and player naming.
pub const PLAYERS_PER_GAME: usize = 2; // Every game is a duel.

/// Longest player name kept from a connection packet; longer names are truncated.
pub const MAX_PLAYER_NAME_LEN: usize = 32;

/// Name used for players who have not sent a connection packet yet.
pub const ANONYMOUS_PLAYER_NAME: &str = "Player";
