//! Canned liar game server for end-to-end driver tests.
//!
//! Serves every endpoint the driver uses with just enough state to walk one
//! game through its phases. Players are told apart by a `stub_user` cookie
//! set at login, which also exercises each client's cookie store.

#![allow(dead_code)]

use axum::extract::{Path, Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

/// Game number every created room gets.
pub const GAME_NUMBER: i64 = 42;

/// Subject revealed to citizens once the game starts.
pub const CITIZEN_SUBJECT: &str = "과일";

/// Turn-order entry that matches no logged-in player.
pub const STRANGER: &str = "MCP_Stranger_ZZZZZ";

/// Knobs for one stub instance.
#[derive(Debug, Clone)]
pub struct StubOptions {
    /// Ids of approved subjects present at startup.
    pub subjects: Vec<i64>,
    /// Seat (join order, host = 0) that becomes the liar; `None` means nobody.
    pub liar_seat: Option<usize>,
    /// State fetches after the defense ends before final voting opens.
    pub polls_before_final: Option<u32>,
    /// Answer votes with plain text instead of a state document.
    pub text_votes: bool,
    /// Request path that always answers 500.
    pub fail_path: Option<String>,
    /// Logins whose nickname contains this are refused.
    pub reject_login: Option<String>,
    /// Reveal an empty `citizenSubject` once the game starts.
    pub blank_subject: bool,
    /// Put a nickname nobody logged in with at the head of `turnOrder`.
    pub stranger_in_turn_order: bool,
}

impl Default for StubOptions {
    fn default() -> Self {
        Self {
            subjects: vec![1],
            liar_seat: Some(1),
            polls_before_final: Some(2),
            text_votes: false,
            fail_path: None,
            reject_login: None,
            blank_subject: false,
            stranger_in_turn_order: false,
        }
    }
}

#[derive(Debug)]
struct StubState {
    options: StubOptions,
    users: Vec<String>,
    seats: Vec<usize>,
    subjects: Vec<Value>,
    words: Vec<(i64, String)>,
    requests: Vec<(String, Value)>,
    started: bool,
    phase: String,
    game_state: String,
    accused: Option<usize>,
    hints: usize,
    votes: usize,
    final_votes: usize,
    defense_ended: bool,
    polls_after_defense: u32,
    winner: Option<String>,
}

type Shared = Arc<Mutex<StubState>>;

impl StubState {
    fn new(options: StubOptions) -> Self {
        let subjects = options
            .subjects
            .iter()
            .map(|id| json!({"id": id, "name": format!("subject {}", id)}))
            .collect();
        Self {
            options,
            users: Vec::new(),
            seats: Vec::new(),
            subjects,
            words: Vec::new(),
            requests: Vec::new(),
            started: false,
            phase: "NONE".to_string(),
            game_state: "NONE".to_string(),
            accused: None,
            hints: 0,
            votes: 0,
            final_votes: 0,
            defense_ended: false,
            polls_after_defense: 0,
            winner: None,
        }
    }

    fn record(&mut self, path: &str, body: &Value) {
        self.requests.push((path.to_string(), body.clone()));
    }

    fn seat_of(&self, user: usize) -> Option<usize> {
        self.seats.iter().position(|u| *u == user)
    }

    fn snapshot(&self, viewer: Option<usize>) -> Value {
        let players: Vec<Value> = self
            .seats
            .iter()
            .enumerate()
            .map(|(seat, user)| {
                json!({
                    "id": 100 + seat,
                    "userId": user + 1,
                    "nickname": self.users[*user],
                })
            })
            .collect();
        let mut turn_order: Vec<&str> = Vec::new();
        if self.started {
            if self.options.stranger_in_turn_order {
                turn_order.push(STRANGER);
            }
            turn_order.extend(self.seats.iter().map(|u| self.users[*u].as_str()));
        }

        let subject = if self.options.blank_subject {
            ""
        } else {
            CITIZEN_SUBJECT
        };
        let citizen_subject = self.started.then_some(subject);
        let accused = self
            .accused
            .map(|u| json!({"nickname": self.users[u]}));

        let mut state = json!({
            "gameNumber": GAME_NUMBER,
            "gameState": self.game_state,
            "currentPhase": self.phase,
            "players": players,
            "turnOrder": turn_order,
            "citizenSubject": citizen_subject,
            "accusedPlayer": accused,
            "winner": self.winner,
        });

        if self.started {
            if let Some(seat) = viewer.and_then(|v| self.seat_of(v)) {
                let is_liar = self.options.liar_seat == Some(seat);
                state["yourRole"] = json!(if is_liar { "LIAR" } else { "CITIZEN" });
                state["yourWord"] = if is_liar { Value::Null } else { json!("사과") };
            }
        }
        state
    }
}

fn viewer(headers: &HeaderMap) -> Option<usize> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .find_map(|pair| pair.trim().strip_prefix("stub_user="))
        .and_then(|id| id.parse().ok())
}

async fn fail_injector(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let failing = state.lock().unwrap().options.fail_path.clone();
    if failing.as_deref() == Some(request.uri().path()) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "injected failure").into_response();
    }
    next.run(request).await
}

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut s = state.lock().unwrap();
    s.record("auth/login", &body);
    let nickname = body["nickname"].as_str().unwrap_or_default().to_string();
    if let Some(refused) = &s.options.reject_login {
        if nickname.contains(refused.as_str()) {
            return Json(json!({"success": false, "message": "nickname refused"})).into_response();
        }
    }
    s.users.push(nickname);
    let user = s.users.len() - 1;
    (
        [(header::SET_COOKIE, format!("stub_user={}; Path=/", user))],
        Json(json!({"success": true, "userId": user + 1})),
    )
        .into_response()
}

async fn list_subjects(State(state): State<Shared>) -> Json<Value> {
    let s = state.lock().unwrap();
    Json(Value::Array(s.subjects.clone()))
}

async fn apply_subject(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let mut s = state.lock().unwrap();
    s.record("subjects/applysubj", &body);
    let id = 500 + s.subjects.len() as i64;
    let subject = json!({"id": id, "name": body["name"]});
    s.subjects.push(subject.clone());
    Json(subject)
}

async fn apply_word(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let mut s = state.lock().unwrap();
    s.record("words/applyw", &body);
    let subject_id = body["subjectId"].as_i64().unwrap_or_default();
    let word = body["word"].as_str().unwrap_or_default().to_string();
    s.words.push((subject_id, word));
    Json(json!({"success": true}))
}

async fn create_game(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    let mut s = state.lock().unwrap();
    s.record("game/create", &body);
    let host = viewer(&headers).expect("host cookie");
    s.seats.push(host);
    s.phase = "WAITING_FOR_PLAYERS".to_string();
    s.game_state = "WAITING".to_string();
    Json(json!(GAME_NUMBER))
}

async fn game_state(
    State(state): State<Shared>,
    Path(number): Path<i64>,
    headers: HeaderMap,
) -> Response {
    let mut s = state.lock().unwrap();
    if number != GAME_NUMBER {
        return (StatusCode::NOT_FOUND, "no such game").into_response();
    }
    if s.defense_ended && s.phase != "VOTING_FOR_SURVIVAL" && s.final_votes == 0 {
        s.polls_after_defense += 1;
        if s
            .options
            .polls_before_final
            .is_some_and(|n| s.polls_after_defense >= n)
        {
            s.phase = "VOTING_FOR_SURVIVAL".to_string();
        }
    }
    Json(s.snapshot(viewer(&headers))).into_response()
}

async fn join(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    let mut s = state.lock().unwrap();
    s.record("game/join", &body);
    let user = viewer(&headers).expect("joiner cookie");
    s.seats.push(user);
    Json(s.snapshot(Some(user)))
}

async fn start(State(state): State<Shared>) -> Json<Value> {
    let mut s = state.lock().unwrap();
    s.record("game/start", &Value::Null);
    s.started = true;
    s.phase = "SPEECH".to_string();
    s.game_state = "IN_PROGRESS".to_string();
    Json(s.snapshot(None))
}

async fn hint(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    let mut s = state.lock().unwrap();
    s.record("game/hint", &body);
    s.hints += 1;
    if s.hints >= s.seats.len() {
        s.phase = "VOTING_FOR_LIAR".to_string();
    }
    Json(s.snapshot(viewer(&headers)))
}

async fn vote(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let mut s = state.lock().unwrap();
    s.record("game/vote", &body);
    let target = body["targetUserId"].as_u64().map(|id| id as usize - 1);
    s.accused = target;
    s.votes += 1;
    if s.votes >= 2 {
        s.phase = "DEFENDING".to_string();
    }
    if s.options.text_votes {
        return "vote accepted".into_response();
    }
    Json(s.snapshot(viewer(&headers))).into_response()
}

async fn submit_defense(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let mut s = state.lock().unwrap();
    s.record("game/submit-defense", &body);
    Json(json!({"success": true, "message": "defense recorded"}))
}

async fn end_defense(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    let mut s = state.lock().unwrap();
    s.record("game/defense/end", &body);
    s.defense_ended = true;
    s.phase = "DEFENSE_ENDED".to_string();
    Json(s.snapshot(viewer(&headers)))
}

async fn final_vote(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut s = state.lock().unwrap();
    s.record("game/vote/final", &body);
    s.final_votes += 1;
    if s.final_votes >= s.seats.len() {
        s.phase = "GUESSING_WORD".to_string();
    }
    if s.options.text_votes {
        return "final vote accepted".into_response();
    }
    Json(s.snapshot(viewer(&headers))).into_response()
}

async fn guess_word(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let mut s = state.lock().unwrap();
    s.record("game/guess-word", &body);
    let correct = body["guess"].as_str() == Some(CITIZEN_SUBJECT);
    s.phase = "GAME_OVER".to_string();
    s.game_state = "ENDED".to_string();
    s.winner = Some(if correct { "LIAR" } else { "CITIZENS" }.to_string());
    Json(json!({"correct": correct}))
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/subjects/listsubj", get(list_subjects))
        .route("/api/v1/subjects/applysubj", post(apply_subject))
        .route("/api/v1/words/applyw", post(apply_word))
        .route("/api/v1/game/create", post(create_game))
        .route("/api/v1/game/join", post(join))
        .route("/api/v1/game/start", post(start))
        .route("/api/v1/game/hint", post(hint))
        .route("/api/v1/game/vote", post(vote))
        .route("/api/v1/game/vote/final", post(final_vote))
        .route("/api/v1/game/submit-defense", post(submit_defense))
        .route("/api/v1/game/defense/end", post(end_defense))
        .route("/api/v1/game/guess-word", post(guess_word))
        .route("/api/v1/game/{number}", get(game_state))
        .layer(middleware::from_fn_with_state(state.clone(), fail_injector))
        .with_state(state)
}

/// A running stub bound to an ephemeral local port.
pub struct StubServer {
    /// Base URL including `/api/v1`.
    pub base_url: String,
    state: Shared,
}

impl StubServer {
    /// Binds and serves in a background task.
    pub async fn start(options: StubOptions) -> Self {
        let state = Arc::new(Mutex::new(StubState::new(options)));
        let app = router(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub server");
        let addr = listener.local_addr().expect("No local address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Stub server failed");
        });
        Self {
            base_url: format!("http://{}/api/v1", addr),
            state,
        }
    }

    /// Bodies received on `path` (relative to `/api/v1`), in order.
    pub fn requests_to(&self, path: &str) -> Vec<Value> {
        self.state
            .lock()
            .unwrap()
            .requests
            .iter()
            .filter(|(p, _)| p == path)
            .map(|(_, body)| body.clone())
            .collect()
    }

    /// Words created through `words/applyw`.
    pub fn words(&self) -> Vec<(i64, String)> {
        self.state.lock().unwrap().words.clone()
    }
}
