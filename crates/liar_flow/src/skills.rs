//! Character skill lookup against a game-data API.

use crate::error::{FlowError, FlowErrorKind};
use crate::search::{SearchMatch, search_json};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

/// Placeholder replaced by the character name in the URL template.
///
/// It must fill a whole path segment, e.g. `/characters/{character}/skills`.
pub const CHARACTER_PLACEHOLDER: &str = "{character}";

// How the URL parser stores the placeholder.
const ENCODED_PLACEHOLDER: &str = "%7Bcharacter%7D";

/// Fetches a character's skill list and searches it.
#[derive(Debug, Clone)]
pub struct SkillClient {
    http: reqwest::Client,
    url_template: String,
}

impl SkillClient {
    /// Creates a client for `url_template`, which should contain `{character}`.
    pub fn new(url_template: impl Into<String>, timeout: Duration) -> Result<Self, FlowError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                FlowError::new(FlowErrorKind::Transport {
                    endpoint: "<client>".to_string(),
                    message: e.to_string(),
                })
            })?;
        Ok(Self {
            http,
            url_template: url_template.into(),
        })
    }

    /// URL for `character`, encoded as a single path segment.
    pub fn skill_url(&self, character: &str) -> Result<Url, FlowError> {
        let invalid = || FlowError::new(FlowErrorKind::InvalidSkillUrl(self.url_template.clone()));

        let mut url = Url::parse(&self.url_template).map_err(|_| invalid())?;
        let segments: Vec<String> = url
            .path_segments()
            .ok_or_else(invalid)?
            .map(str::to_string)
            .collect();
        let slot = segments
            .iter()
            .position(|s| s == ENCODED_PLACEHOLDER || s == CHARACTER_PLACEHOLDER)
            .ok_or_else(invalid)?;

        // Segments around the slot are already encoded, so they go back in
        // through set_path; only the character goes through the encoder.
        url.set_path(&segments[..slot].join("/"));
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .push(character);
        let mut path = url.path().to_string();
        for rest in &segments[slot + 1..] {
            path.push('/');
            path.push_str(rest);
        }
        url.set_path(&path);
        Ok(url)
    }

    /// Raw skill document for `character`.
    ///
    /// A 404, `null`, or an empty array/object means the character does not exist.
    #[instrument(skip(self))]
    pub async fn fetch_skills(&self, character: &str) -> Result<Value, FlowError> {
        let url = self.skill_url(character)?.to_string();
        let transport = |e: reqwest::Error| {
            FlowError::new(FlowErrorKind::Transport {
                endpoint: url.clone(),
                message: e.to_string(),
            })
        };

        let response = self.http.get(&url).send().await.map_err(transport)?;
        let status = response.status();
        let body = response.text().await.map_err(transport)?;
        debug!(status = %status, "Skill response received");

        if status == StatusCode::NOT_FOUND {
            return Err(FlowError::new(FlowErrorKind::CharacterNotFound(
                character.to_string(),
            )));
        }
        if !status.is_success() {
            return Err(FlowError::new(FlowErrorKind::HttpStatus {
                endpoint: url.clone(),
                status: status.as_u16(),
                body,
            }));
        }

        let document: Value = serde_json::from_str(&body).map_err(|e| {
            FlowError::new(FlowErrorKind::Decode {
                endpoint: url.clone(),
                message: e.to_string(),
            })
        })?;
        if is_empty(&document) {
            return Err(FlowError::new(FlowErrorKind::CharacterNotFound(
                character.to_string(),
            )));
        }
        Ok(document)
    }

    /// Every key or value in `character`'s skills that contains `needle`.
    #[instrument(skip(self))]
    pub async fn find(
        &self,
        character: &str,
        needle: &str,
        case_insensitive: bool,
    ) -> Result<Vec<SearchMatch>, FlowError> {
        let document = self.fetch_skills(character).await?;
        let matches = search_json(&document, needle, case_insensitive);
        if matches.is_empty() {
            return Err(FlowError::new(FlowErrorKind::NoMatches(needle.to_string())));
        }
        info!(count = matches.len(), "Skill matches found");
        Ok(matches)
    }
}

fn is_empty(document: &Value) -> bool {
    match document {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
