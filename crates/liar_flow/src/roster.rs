//! The three simulated players of one run.

use crate::client::{ClientLabel, PlayerClient};
use crate::error::FlowError;
use crate::snapshot::GameSnapshot;
use std::time::Duration;
use tracing::{debug, instrument};

/// Host, citizen A and citizen B, in that order.
///
/// Owned by the driver and handed to each step; nothing else holds clients.
#[derive(Debug, Clone)]
pub struct Roster {
    clients: [PlayerClient; 3],
}

impl Roster {
    /// Creates the three clients with nicknames built from `suffix`.
    #[instrument(skip(timeout))]
    pub fn new(suffix: &str, timeout: Duration) -> Result<Self, FlowError> {
        let [host, citizen_a, citizen_b] =
            ClientLabel::ALL.map(|label| PlayerClient::new(label, suffix, timeout));
        Ok(Self {
            clients: [host?, citizen_a?, citizen_b?],
        })
    }

    /// Client for `label`.
    pub fn get(&self, label: ClientLabel) -> &PlayerClient {
        &self.clients[label.index()]
    }

    /// Mutable client for `label`.
    pub fn get_mut(&mut self, label: ClientLabel) -> &mut PlayerClient {
        &mut self.clients[label.index()]
    }

    /// Shortcut for the host.
    pub fn host(&self) -> &PlayerClient {
        self.get(ClientLabel::Host)
    }

    /// Clients in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &PlayerClient> {
        self.clients.iter()
    }

    /// Label of the client using `nickname`.
    pub fn label_of(&self, nickname: &str) -> Option<ClientLabel> {
        self.iter()
            .find(|c| c.nickname() == nickname)
            .map(PlayerClient::label)
    }

    /// Copies player and user ids for every listed player we own.
    #[instrument(skip_all)]
    pub fn update_players(&mut self, snapshot: &GameSnapshot) {
        for entry in snapshot.players() {
            let Some(nickname) = entry.nickname.as_deref() else {
                continue;
            };
            if let Some(client) = self.clients.iter_mut().find(|c| c.nickname() == nickname) {
                debug!(nickname, player_id = ?entry.id, user_id = ?entry.user_id, "Player ids updated");
                client.player_id = entry.id;
                client.user_id = entry.user_id;
            }
        }
    }

    /// Applies a state fetched by `label`: player ids plus that client's role and word.
    #[instrument(skip(self, snapshot))]
    pub fn apply_personal_state(&mut self, label: ClientLabel, snapshot: &GameSnapshot) {
        self.update_players(snapshot);
        let client = self.get_mut(label);
        client.role = snapshot.your_role().map(str::to_string);
        client.word = snapshot.your_word().map(str::to_string);
    }

    /// First client holding the liar role.
    #[instrument(skip(self))]
    pub fn liar(&self) -> Option<ClientLabel> {
        self.iter().find(|c| c.is_liar()).map(PlayerClient::label)
    }

    /// Every client except `liar`, in registry order.
    pub fn citizens(&self, liar: ClientLabel) -> Vec<ClientLabel> {
        ClientLabel::ALL
            .into_iter()
            .filter(|label| *label != liar)
            .collect()
    }

    /// First non-empty word among the citizens.
    pub fn citizen_word(&self, liar: ClientLabel) -> Option<&str> {
        self.citizens(liar)
            .into_iter()
            .filter_map(|label| self.get(label).word.as_deref())
            .find(|word| !word.is_empty())
    }
}
