//! Three-client game-flow driver.
//!
//! Plays one complete liar game against a live server by impersonating a
//! host and two citizens, one request at a time. Every step is a plain
//! sequence of calls; phase strings coming back are logged, not validated.

use crate::api::GameApi;
use crate::client::{ClientLabel, random_suffix};
use crate::config::FlowConfig;
use crate::error::{FlowError, FlowErrorKind};
use crate::poll::wait_for_phase;
use crate::roster::Roster;
use crate::snapshot::{FINAL_VOTING_PHASE, GameSnapshot, shown};
use crate::transcript::Transcript;
use crate::wire::CreateGameRequest;
use derive_getters::Getters;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, instrument};

/// Most subjects handed to the room.
pub const MAX_SUBJECTS: usize = 2;

/// What a completed run observed.
#[derive(Debug, Clone, Getters)]
pub struct FlowReport {
    /// Nickname suffix.
    suffix: String,
    /// Nicknames in registry order.
    nicknames: Vec<String>,
    /// Game number returned by room creation.
    game_number: i64,
    /// Subject ids the room was created with.
    subject_ids: Vec<i64>,
    /// Nickname of the liar.
    liar: String,
    /// Word the citizens were given, or the citizen subject.
    citizen_word: Option<String>,
    /// Phase after each hint, paired with the hinting nickname.
    hint_phases: Vec<(String, Option<String>)>,
    /// Whether the final voting phase was seen while polling.
    final_voting_observed: bool,
    /// Final `gameState`.
    game_state: Option<String>,
    /// Final `currentPhase`.
    phase: Option<String>,
    /// Final `winner`.
    winner: Option<String>,
    /// Every progress line.
    transcript: Transcript,
}

/// Drives one game through its full lifecycle.
#[derive(Debug, Clone)]
pub struct GameFlowDriver {
    api: GameApi,
    config: FlowConfig,
    seed: Option<u64>,
}

/// State threaded through the steps of a single run.
struct Run {
    suffix: String,
    roster: Roster,
    transcript: Transcript,
}

impl GameFlowDriver {
    /// Creates a driver for the server at `config.base_url()`.
    pub fn new(config: FlowConfig) -> Self {
        Self {
            api: GameApi::new(config.base_url().clone()),
            config,
            seed: None,
        }
    }

    /// Makes the nickname suffix deterministic.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Runs the whole script. Any failed step aborts the run.
    #[instrument(skip(self), fields(base_url = %self.api.base_url()))]
    pub async fn run(&self) -> Result<FlowReport, FlowError> {
        let mut run = self.init()?;

        self.login_all(&mut run).await?;
        let subject_ids = self.select_subjects(&mut run).await?;
        let game_number = self.create_room(&mut run, subject_ids.clone()).await?;
        self.join_citizens(&mut run, game_number).await?;
        let started = self.start_game(&mut run).await?;
        let citizen_subject = started
            .citizen_subject()
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        self.sync_perspectives(&mut run, game_number).await?;

        let liar = run
            .roster
            .liar()
            .ok_or_else(|| FlowError::new(FlowErrorKind::FailedToIdentifyLiar))?;
        let citizen_word = run
            .roster
            .citizen_word(liar)
            .map(str::to_string)
            .or_else(|| citizen_subject.clone());
        let liar_client = run.roster.get(liar);
        run.transcript.record(format!(
            "  - Identified liar: {} (userId={})",
            liar_client.nickname(),
            show_id(liar_client.user_id)
        ));
        let liar_nickname = liar_client.nickname().to_string();

        let hint_phases = self
            .run_hints(&mut run, game_number, &started.turn_order())
            .await?;
        self.accuse(&mut run, game_number, liar).await?;
        self.defend(&mut run, game_number, liar).await?;
        let final_voting_observed = self.await_final_voting(&mut run, game_number).await?;
        self.final_votes(&mut run, game_number).await?;
        self.guess(&mut run, game_number, liar, citizen_subject.as_deref())
            .await?;

        let final_state = self.fetch_state(&mut run, ClientLabel::Host, game_number).await?;
        run.transcript.record(format!(
            "[RESULT] Final state: state={} phase={} winner={}",
            shown(final_state.game_state()),
            shown(final_state.phase()),
            shown(final_state.winner())
        ));
        run.transcript
            .record("[SUCCESS] Three-client game flow completed successfully.");

        Ok(FlowReport {
            nicknames: run.roster.iter().map(|c| c.nickname().to_string()).collect(),
            suffix: run.suffix,
            game_number,
            subject_ids,
            liar: liar_nickname,
            citizen_word,
            hint_phases,
            final_voting_observed,
            game_state: final_state.game_state().map(str::to_string),
            phase: final_state.phase().map(str::to_string),
            winner: final_state.winner().map(str::to_string),
            transcript: run.transcript,
        })
    }

    #[instrument(skip(self))]
    fn init(&self) -> Result<Run, FlowError> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let suffix = random_suffix(&mut rng);
        let roster = Roster::new(&suffix, self.config.request_timeout())?;
        let mut transcript = Transcript::new();
        transcript.record(format!("[INIT] Using suffix {} for player nicknames", suffix));
        Ok(Run {
            suffix,
            roster,
            transcript,
        })
    }

    /// Fetches `label`'s view of the game and folds it into the roster.
    #[instrument(skip(self, run))]
    async fn fetch_state(
        &self,
        run: &mut Run,
        label: ClientLabel,
        game_number: i64,
    ) -> Result<GameSnapshot, FlowError> {
        let snapshot = self
            .api
            .game_state(run.roster.get(label), game_number)
            .await?;
        run.roster.apply_personal_state(label, &snapshot);
        Ok(snapshot)
    }

    #[instrument(skip(self, run))]
    async fn login_all(&self, run: &mut Run) -> Result<(), FlowError> {
        run.transcript.record("[STEP] Logging in clients…");
        for label in ClientLabel::ALL {
            let client = run.roster.get(label);
            let response = self.api.login(client).await?;
            run.transcript.record(format!(
                "  - {} logged in (userId={})",
                client.nickname(),
                show_id(response.user_id)
            ));
        }
        Ok(())
    }

    /// Lists approved subjects, bootstrapping one if the server has none,
    /// and keeps at most [`MAX_SUBJECTS`] of them.
    #[instrument(skip(self, run))]
    async fn select_subjects(&self, run: &mut Run) -> Result<Vec<i64>, FlowError> {
        run.transcript.record("[STEP] Fetching approved subjects…");
        let host = run.roster.host();
        let mut subjects = self.api.list_subjects(host).await?;

        if subjects.is_empty() {
            run.transcript
                .record("  - No approved subjects found; creating a default subject set");
            let subject_id = self
                .api
                .create_subject(host, self.config.default_subject_name())
                .await?;
            for word in self.config.default_words() {
                self.api.create_word(host, subject_id, word).await?;
            }
            subjects = self.api.list_subjects(host).await?;
        }

        let ids: Vec<i64> = subjects.iter().take(MAX_SUBJECTS).map(|s| s.id).collect();
        if ids.is_empty() {
            return Err(FlowError::new(FlowErrorKind::NoApprovedSubjects));
        }
        run.transcript
            .record(format!("  - Selected subject IDs: {:?}", ids));
        Ok(ids)
    }

    #[instrument(skip(self, run, subject_ids), fields(subjects = subject_ids.len()))]
    async fn create_room(&self, run: &mut Run, subject_ids: Vec<i64>) -> Result<i64, FlowError> {
        run.transcript.record("[STEP] Creating game room as host…");
        let request =
            CreateGameRequest::integration_room(run.roster.host().nickname(), &run.suffix, subject_ids);
        let game_number = self.api.create_game(run.roster.host(), &request).await?;
        run.transcript
            .record(format!("  - Game room created with number: {}", game_number));

        let waiting = self.fetch_state(run, ClientLabel::Host, game_number).await?;
        run.transcript.record(format!(
            "  - Waiting room players: {:?}",
            waiting.player_nicknames()
        ));
        Ok(game_number)
    }

    #[instrument(skip(self, run))]
    async fn join_citizens(&self, run: &mut Run, game_number: i64) -> Result<(), FlowError> {
        run.transcript.record("[STEP] Citizens joining the room…");
        for label in [ClientLabel::CitizenA, ClientLabel::CitizenB] {
            let state = self.api.join(run.roster.get(label), game_number).await?;
            run.roster.update_players(&state);
            run.transcript.record(format!(
                "  - {} joined; players now {:?}",
                run.roster.get(label).nickname(),
                state.player_nicknames()
            ));
        }
        Ok(())
    }

    #[instrument(skip(self, run))]
    async fn start_game(&self, run: &mut Run) -> Result<GameSnapshot, FlowError> {
        run.transcript.record("[STEP] Host starting the game…");
        let state = self.api.start(run.roster.host()).await?;
        run.roster.update_players(&state);
        run.transcript.record(format!(
            "  - Game started; phase={}, turn_order={:?}, citizen_subject='{}'",
            shown(state.phase()),
            state.turn_order(),
            shown(state.citizen_subject())
        ));
        Ok(state)
    }

    #[instrument(skip(self, run))]
    async fn sync_perspectives(&self, run: &mut Run, game_number: i64) -> Result<(), FlowError> {
        run.transcript
            .record("[STEP] Syncing individual player perspectives…");
        for label in ClientLabel::ALL {
            let personal = self.fetch_state(run, label, game_number).await?;
            run.transcript.record(format!(
                "    > {} role={} word={}",
                run.roster.get(label).nickname(),
                shown(personal.your_role()),
                shown(personal.your_word())
            ));
        }
        Ok(())
    }

    #[instrument(skip(self, run, turn_order), fields(turns = turn_order.len()))]
    async fn run_hints(
        &self,
        run: &mut Run,
        game_number: i64,
        turn_order: &[String],
    ) -> Result<Vec<(String, Option<String>)>, FlowError> {
        run.transcript.record("[STEP] Running hint submissions…");
        let mut phases = Vec::with_capacity(turn_order.len());
        for nickname in turn_order {
            let label = run
                .roster
                .label_of(nickname)
                .ok_or_else(|| FlowError::new(FlowErrorKind::UnknownPlayer(nickname.clone())))?;
            let hint = format!("힌트 from {}", nickname);
            let state = self
                .api
                .submit_hint(run.roster.get(label), game_number, &hint)
                .await?;
            run.transcript.record(format!(
                "    > {} submitted hint; phase -> {}",
                nickname,
                shown(state.phase())
            ));
            phases.push((nickname.clone(), state.phase().map(str::to_string)));
        }
        Ok(phases)
    }

    #[instrument(skip(self, run))]
    async fn accuse(
        &self,
        run: &mut Run,
        game_number: i64,
        liar: ClientLabel,
    ) -> Result<(), FlowError> {
        run.transcript.record("[STEP] Conducting first voting phase…");
        let target = run.roster.get(liar).user_id;
        for label in run.roster.citizens(liar) {
            let voted = self
                .api
                .cast_vote(run.roster.get(label), game_number, target)
                .await?;
            let state = match voted {
                Some(state) => state,
                None => self.fetch_state(run, label, game_number).await?,
            };
            run.transcript.record(format!(
                "    > {} voted; phase -> {} accused={}",
                run.roster.get(label).nickname(),
                shown(state.phase()),
                shown(state.accused_nickname())
            ));
        }
        Ok(())
    }

    #[instrument(skip(self, run))]
    async fn defend(
        &self,
        run: &mut Run,
        game_number: i64,
        liar: ClientLabel,
    ) -> Result<(), FlowError> {
        run.transcript.record("[STEP] Liar defense flow…");
        let response = self
            .api
            .submit_defense(run.roster.get(liar), game_number, self.config.defense_text())
            .await?;
        run.transcript
            .record(format!("    > Defense response: {}", response));

        let ended = self
            .api
            .end_defense(run.roster.get(liar), game_number)
            .await?;
        run.transcript.record(format!(
            "    > Defense ended; phase -> {}",
            shown(ended.phase())
        ));
        Ok(())
    }

    #[instrument(skip(self, run))]
    async fn await_final_voting(&self, run: &mut Run, game_number: i64) -> Result<bool, FlowError> {
        run.transcript.record("[STEP] Waiting for final voting phase…");
        let api = &self.api;
        let host = run.roster.host();
        let outcome = wait_for_phase(
            move || api.game_state(host, game_number),
            FINAL_VOTING_PHASE,
            *self.config.poll_attempts(),
            self.config.poll_interval(),
        )
        .await?;

        if let Some(last) = &outcome.last {
            run.roster.apply_personal_state(ClientLabel::Host, last);
        }
        if outcome.observed {
            run.transcript
                .record(format!("    > Transition confirmed: {}", FINAL_VOTING_PHASE));
        } else {
            info!(attempts = outcome.attempts, "Final voting phase not observed");
            run.transcript
                .record("    > Final voting phase not observed; proceeding with manual confirmation");
        }
        Ok(outcome.observed)
    }

    #[instrument(skip(self, run))]
    async fn final_votes(&self, run: &mut Run, game_number: i64) -> Result<(), FlowError> {
        run.transcript.record("[STEP] Final voting phase…");
        for label in ClientLabel::ALL {
            let voted = self
                .api
                .cast_final_vote(run.roster.get(label), game_number)
                .await?;
            let state = match voted {
                Some(state) => state,
                None => self.fetch_state(run, label, game_number).await?,
            };
            run.transcript.record(format!(
                "    > {} final vote; phase -> {}",
                run.roster.get(label).nickname(),
                shown(state.phase())
            ));
        }
        Ok(())
    }

    #[instrument(skip(self, run))]
    async fn guess(
        &self,
        run: &mut Run,
        game_number: i64,
        liar: ClientLabel,
        citizen_subject: Option<&str>,
    ) -> Result<(), FlowError> {
        run.transcript.record("[STEP] Liar guessing the subject…");
        let guess = citizen_subject
            .filter(|s| !s.is_empty())
            .unwrap_or(self.config.default_subject_name().as_str());
        let result = self
            .api
            .guess_word(run.roster.get(liar), game_number, guess)
            .await?;
        run.transcript
            .record(format!("    > Guess result: {}", result));
        Ok(())
    }
}

fn show_id(id: Option<i64>) -> String {
    id.map_or_else(|| "none".to_string(), |id| id.to_string())
}
