//! Read-only view over the server's game state document.

use serde::Deserialize;
use serde_json::Value;

/// Role string the server assigns to the liar.
pub const LIAR_ROLE: &str = "LIAR";

/// Phase in which players vote on executing the accused.
pub const FINAL_VOTING_PHASE: &str = "VOTING_FOR_SURVIVAL";

/// One entry of the `players` array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerEntry {
    /// Player id within the game.
    pub id: Option<i64>,
    /// Account id.
    pub user_id: Option<i64>,
    /// Nickname.
    pub nickname: Option<String>,
}

/// A full game state as returned by the server.
///
/// Each fetch replaces the previous snapshot wholesale. Phase names are
/// passed through as the server wrote them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameSnapshot(Value);

impl GameSnapshot {
    /// Wraps a decoded response body.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Wraps `body` if it parses as a JSON object.
    pub fn from_object_body(body: &str) -> Option<Self> {
        serde_json::from_str::<Value>(body)
            .ok()
            .filter(Value::is_object)
            .map(Self)
    }

    /// Underlying document.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// `currentPhase`.
    pub fn phase(&self) -> Option<&str> {
        self.str_field("currentPhase")
    }

    /// `gameState`.
    pub fn game_state(&self) -> Option<&str> {
        self.str_field("gameState")
    }

    /// `winner`.
    pub fn winner(&self) -> Option<&str> {
        self.str_field("winner")
    }

    /// `citizenSubject`.
    pub fn citizen_subject(&self) -> Option<&str> {
        self.str_field("citizenSubject")
    }

    /// `yourRole`, only present on personalised fetches.
    pub fn your_role(&self) -> Option<&str> {
        self.str_field("yourRole")
    }

    /// `yourWord`, only present on personalised fetches.
    pub fn your_word(&self) -> Option<&str> {
        self.str_field("yourWord")
    }

    /// `accusedPlayer.nickname`.
    pub fn accused_nickname(&self) -> Option<&str> {
        self.0
            .get("accusedPlayer")
            .and_then(|p| p.get("nickname"))
            .and_then(Value::as_str)
    }

    /// Entries of `players`; malformed entries are skipped.
    pub fn players(&self) -> Vec<PlayerEntry> {
        self.0
            .get("players")
            .and_then(Value::as_array)
            .map(|players| {
                players
                    .iter()
                    .filter_map(|p| PlayerEntry::deserialize(p).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Nicknames in `players`, in server order.
    pub fn player_nicknames(&self) -> Vec<String> {
        self.players().into_iter().filter_map(|p| p.nickname).collect()
    }

    /// `turnOrder` nicknames.
    pub fn turn_order(&self) -> Vec<String> {
        self.0
            .get("turnOrder")
            .and_then(Value::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Renders an optional field for the transcript.
pub(crate) fn shown(value: Option<&str>) -> &str {
    value.unwrap_or("none")
}
