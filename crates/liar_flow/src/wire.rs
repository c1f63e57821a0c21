//! Request and response bodies for the game API.

use serde::{Deserialize, Serialize};

/// `POST auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Nickname to log in as.
    pub nickname: String,
    /// Always empty; the server accepts passwordless logins.
    pub password: String,
}

/// Response to `POST auth/login`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoginResponse {
    /// Whether the server accepted the login.
    pub success: bool,
    /// Account id.
    pub user_id: Option<i64>,
}

/// An approved subject from `GET subjects/listsubj`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Subject id.
    pub id: i64,
    /// Subject name.
    #[serde(default)]
    pub name: Option<String>,
}

/// `POST subjects/applysubj`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSubjectRequest {
    /// Subject name.
    pub name: String,
}

/// `POST words/applyw`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWordRequest {
    /// Subject the word belongs to.
    pub subject_id: i64,
    /// The word.
    pub word: String,
}

/// `POST game/create`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameRequest {
    /// Host nickname.
    pub nickname: String,
    /// Room name.
    pub game_name: String,
    /// Seats in the room.
    pub game_participants: u32,
    /// Rounds to play.
    pub game_total_rounds: u32,
    /// Liars per round.
    pub game_liar_count: u32,
    /// Server-defined mode name.
    pub game_mode: String,
    /// Subjects to draw from.
    pub subject_ids: Vec<i64>,
    /// Ignore `subject_ids` and pick at random.
    pub use_random_subjects: bool,
    /// Score that ends the game.
    pub target_points: u32,
}

impl CreateGameRequest {
    /// The fixed three-player, one-round room the driver plays.
    pub fn integration_room(nickname: &str, suffix: &str, subject_ids: Vec<i64>) -> Self {
        Self {
            nickname: nickname.to_string(),
            game_name: format!("MCP Integration Test Room {}", suffix),
            game_participants: 3,
            game_total_rounds: 1,
            game_liar_count: 1,
            game_mode: "LIARS_KNOW".to_string(),
            subject_ids,
            use_random_subjects: false,
            target_points: 10,
        }
    }
}

/// `POST game/join`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    /// Game to join.
    pub game_number: i64,
    /// Joining nickname.
    pub nickname: String,
}

/// `POST game/hint`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HintRequest {
    /// Game number.
    pub game_number: i64,
    /// Hint text.
    pub hint: String,
}

/// `POST game/vote`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    /// Game number.
    pub game_number: i64,
    /// Accused account id.
    pub target_user_id: Option<i64>,
}

/// `POST game/vote/final`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalVoteRequest {
    /// Game number.
    pub game_number: i64,
    /// Vote to execute the accused.
    pub vote_for_execution: bool,
}

/// `POST game/submit-defense`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefenseRequest {
    /// Game number.
    pub game_number: i64,
    /// Defense text.
    pub defense_text: String,
}

/// Body carrying only the game number (`POST game/defense/end`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameNumberRequest {
    /// Game number.
    pub game_number: i64,
}

/// `POST game/guess-word`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuessRequest {
    /// Game number.
    pub game_number: i64,
    /// Guessed word.
    pub guess: String,
}
