//! Thin REST client for the liar game API.
//!
//! Every call goes through the calling player's own session so the server
//! sees three independent users. Any non-2xx status is returned as
//! [`FlowErrorKind::HttpStatus`] without retrying.

use crate::client::PlayerClient;
use crate::error::{FlowError, FlowErrorKind};
use crate::snapshot::GameSnapshot;
use crate::wire::{
    CreateGameRequest, CreateSubjectRequest, CreateWordRequest, DefenseRequest, FinalVoteRequest,
    GameNumberRequest, GuessRequest, HintRequest, JoinRequest, LoginRequest, LoginResponse,
    Subject, VoteRequest,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, warn};

/// REST endpoints of the game server.
#[derive(Debug, Clone)]
pub struct GameApi {
    base_url: String,
}

impl GameApi {
    /// Creates an API rooted at `base_url` (e.g. `http://host:port/api/v1`).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    /// Base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    async fn send(
        &self,
        endpoint: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<String, FlowError> {
        let transport = |e: reqwest::Error| {
            FlowError::new(FlowErrorKind::Transport {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            })
        };

        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        let body = response.text().await.map_err(transport)?;
        debug!(endpoint, status = %status, body = %body, "Response received");

        if !status.is_success() {
            warn!(endpoint, status = %status, "Request rejected");
            return Err(FlowError::new(FlowErrorKind::HttpStatus {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            }));
        }
        Ok(body)
    }

    async fn get_text(&self, client: &PlayerClient, endpoint: &str) -> Result<String, FlowError> {
        let request = client.http().get(self.url(endpoint));
        self.send(endpoint, request).await
    }

    async fn post_text<B: Serialize + ?Sized>(
        &self,
        client: &PlayerClient,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<String, FlowError> {
        let mut request = client.http().post(self.url(endpoint));
        if let Some(body) = body {
            request = request.json(body);
        }
        self.send(endpoint, request).await
    }

    fn decode<T: DeserializeOwned>(endpoint: &str, body: &str) -> Result<T, FlowError> {
        serde_json::from_str(body).map_err(|e| {
            FlowError::new(FlowErrorKind::Decode {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            })
        })
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        client: &PlayerClient,
        endpoint: &str,
        body: &B,
    ) -> Result<T, FlowError> {
        let text = self.post_text(client, endpoint, Some(body)).await?;
        Self::decode(endpoint, &text)
    }

    /// Logs `client` in; a 2xx body without `success: true` is an error.
    #[instrument(skip(self, client), fields(nickname = %client.nickname()))]
    pub async fn login(&self, client: &PlayerClient) -> Result<LoginResponse, FlowError> {
        let endpoint = "auth/login";
        let request = LoginRequest {
            nickname: client.nickname().to_string(),
            password: String::new(),
        };
        let text = self.post_text(client, endpoint, Some(&request)).await?;
        let response: LoginResponse = Self::decode(endpoint, &text)?;
        if !response.success {
            return Err(FlowError::new(FlowErrorKind::LoginFailed {
                nickname: client.nickname().to_string(),
                body: text,
            }));
        }
        Ok(response)
    }

    /// Approved subjects.
    #[instrument(skip(self, client))]
    pub async fn list_subjects(&self, client: &PlayerClient) -> Result<Vec<Subject>, FlowError> {
        let endpoint = "subjects/listsubj";
        let text = self.get_text(client, endpoint).await?;
        Self::decode(endpoint, &text)
    }

    /// Creates a subject and returns its id.
    #[instrument(skip(self, client))]
    pub async fn create_subject(&self, client: &PlayerClient, name: &str) -> Result<i64, FlowError> {
        let request = CreateSubjectRequest {
            name: name.to_string(),
        };
        let created: Subject = self
            .post_json(client, "subjects/applysubj", &request)
            .await?;
        Ok(created.id)
    }

    /// Adds `word` to a subject. The response body is ignored.
    #[instrument(skip(self, client))]
    pub async fn create_word(
        &self,
        client: &PlayerClient,
        subject_id: i64,
        word: &str,
    ) -> Result<(), FlowError> {
        let request = CreateWordRequest {
            subject_id,
            word: word.to_string(),
        };
        self.post_text(client, "words/applyw", Some(&request))
            .await
            .map(|_| ())
    }

    /// Creates a room and returns its game number.
    #[instrument(skip(self, client, request), fields(subject_ids = ?request.subject_ids))]
    pub async fn create_game(
        &self,
        client: &PlayerClient,
        request: &CreateGameRequest,
    ) -> Result<i64, FlowError> {
        self.post_json(client, "game/create", request).await
    }

    /// State of game `game_number` as seen by `client`.
    #[instrument(skip(self, client), fields(nickname = %client.nickname()))]
    pub async fn game_state(
        &self,
        client: &PlayerClient,
        game_number: i64,
    ) -> Result<GameSnapshot, FlowError> {
        let endpoint = format!("game/{}", game_number);
        let text = self.get_text(client, &endpoint).await?;
        Self::decode::<Value>(&endpoint, &text).map(GameSnapshot::new)
    }

    /// Joins a room by nickname.
    #[instrument(skip(self, client), fields(nickname = %client.nickname()))]
    pub async fn join(
        &self,
        client: &PlayerClient,
        game_number: i64,
    ) -> Result<GameSnapshot, FlowError> {
        let request = JoinRequest {
            game_number,
            nickname: client.nickname().to_string(),
        };
        self.post_json(client, "game/join", &request)
            .await
            .map(GameSnapshot::new)
    }

    /// Starts the host's game.
    #[instrument(skip(self, client))]
    pub async fn start(&self, client: &PlayerClient) -> Result<GameSnapshot, FlowError> {
        let endpoint = "game/start";
        let text = self.post_text::<Value>(client, endpoint, None).await?;
        Self::decode::<Value>(endpoint, &text).map(GameSnapshot::new)
    }

    /// Submits a hint.
    #[instrument(skip(self, client), fields(nickname = %client.nickname()))]
    pub async fn submit_hint(
        &self,
        client: &PlayerClient,
        game_number: i64,
        hint: &str,
    ) -> Result<GameSnapshot, FlowError> {
        let request = HintRequest {
            game_number,
            hint: hint.to_string(),
        };
        self.post_json(client, "game/hint", &request)
            .await
            .map(GameSnapshot::new)
    }

    /// Casts an accusation vote. Returns `None` when the body is not a JSON object.
    #[instrument(skip(self, client), fields(nickname = %client.nickname()))]
    pub async fn cast_vote(
        &self,
        client: &PlayerClient,
        game_number: i64,
        target_user_id: Option<i64>,
    ) -> Result<Option<GameSnapshot>, FlowError> {
        let request = VoteRequest {
            game_number,
            target_user_id,
        };
        let text = self.post_text(client, "game/vote", Some(&request)).await?;
        Ok(GameSnapshot::from_object_body(&text))
    }

    /// Submits the liar's defense and returns the raw response.
    #[instrument(skip(self, client, text), fields(nickname = %client.nickname()))]
    pub async fn submit_defense(
        &self,
        client: &PlayerClient,
        game_number: i64,
        text: &str,
    ) -> Result<Value, FlowError> {
        let request = DefenseRequest {
            game_number,
            defense_text: text.to_string(),
        };
        self.post_json(client, "game/submit-defense", &request).await
    }

    /// Ends the defense phase.
    #[instrument(skip(self, client), fields(nickname = %client.nickname()))]
    pub async fn end_defense(
        &self,
        client: &PlayerClient,
        game_number: i64,
    ) -> Result<GameSnapshot, FlowError> {
        self.post_json(client, "game/defense/end", &GameNumberRequest { game_number })
            .await
            .map(GameSnapshot::new)
    }

    /// Casts a final execution vote. Returns `None` when the body is not a JSON object.
    #[instrument(skip(self, client), fields(nickname = %client.nickname()))]
    pub async fn cast_final_vote(
        &self,
        client: &PlayerClient,
        game_number: i64,
    ) -> Result<Option<GameSnapshot>, FlowError> {
        let request = FinalVoteRequest {
            game_number,
            vote_for_execution: true,
        };
        let text = self
            .post_text(client, "game/vote/final", Some(&request))
            .await?;
        Ok(GameSnapshot::from_object_body(&text))
    }

    /// Submits the liar's guess and returns the raw response.
    #[instrument(skip(self, client), fields(nickname = %client.nickname()))]
    pub async fn guess_word(
        &self,
        client: &PlayerClient,
        game_number: i64,
        guess: &str,
    ) -> Result<Value, FlowError> {
        let request = GuessRequest {
            game_number,
            guess: guess.to_string(),
        };
        self.post_json(client, "game/guess-word", &request).await
    }
}
