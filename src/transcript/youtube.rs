//! YouTube transcript client.
//!
//! Resolves the caption tracks of a video through the innertube player
//! endpoint and downloads the selected track as timed-text XML.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::TranscriptSource;
use super::captions::parse_caption_xml;
use crate::core::config::AppConfig;
use crate::core::models::TranscriptFragment;
use crate::errors::TranscriptError;

const INNERTUBE_CLIENT_NAME: &str = "ANDROID";
const INNERTUBE_CLIENT_VERSION: &str = "20.10.38";

static API_KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""INNERTUBE_API_KEY"\s*:\s*"([a-zA-Z0-9_-]+)""#).expect("static regex compile")
});

/// A caption track advertised by the player response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionTrack {
    pub base_url: String,
    pub language_code: String,
    pub generated: bool,
}

pub struct YouTubeTranscripts {
    client: Client,
    base_url: String,
}

impl YouTubeTranscripts {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TranscriptError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                TranscriptError::TransientNetwork(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, TranscriptError> {
        Self::new(
            &config.youtube_base_url,
            Duration::from_secs(config.http_timeout_secs),
        )
    }

    async fn fetch_watch_page(&self, video_id: &str) -> Result<String, TranscriptError> {
        let response = self
            .client
            .get(format!("{}/watch", self.base_url))
            .query(&[("v", video_id)])
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US")
            .send()
            .await?;

        check_status(response.status(), video_id, "watch page")?;
        let html = response.text().await?;

        if html.contains("class=\"g-recaptcha\"") {
            return Err(TranscriptError::TransientNetwork(
                "YouTube is rate limiting requests from this address".to_string(),
            ));
        }
        if html.contains("action=\"https://consent.youtube.com/s\"") {
            return Err(TranscriptError::UnexpectedResponse(
                "YouTube answered with a cookie consent page".to_string(),
            ));
        }

        Ok(html)
    }

    async fn fetch_player(&self, video_id: &str, api_key: &str) -> Result<Value, TranscriptError> {
        let body = json!({
            "context": {
                "client": {
                    "clientName": INNERTUBE_CLIENT_NAME,
                    "clientVersion": INNERTUBE_CLIENT_VERSION
                }
            },
            "videoId": video_id
        });

        let response = self
            .client
            .post(format!("{}/youtubei/v1/player", self.base_url))
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?;

        check_status(response.status(), video_id, "player")?;
        response.json::<Value>().await.map_err(|e| {
            TranscriptError::UnexpectedResponse(format!("Failed to parse player response: {e}"))
        })
    }

    async fn fetch_caption_xml(
        &self,
        video_id: &str,
        track: &CaptionTrack,
    ) -> Result<String, TranscriptError> {
        let url = track.base_url.replace("&fmt=srv3", "");
        let response = self.client.get(url).send().await?;
        check_status(response.status(), video_id, "caption track")?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl TranscriptSource for YouTubeTranscripts {
    #[tracing::instrument(level = "info", skip(self))]
    async fn fetch(
        &self,
        video_id: &str,
        language: &str,
    ) -> Result<Vec<TranscriptFragment>, TranscriptError> {
        if video_id.trim().is_empty() {
            return Err(TranscriptError::NotFound("empty video id".to_string()));
        }

        let html = self.fetch_watch_page(video_id).await?;
        let Some(api_key) = extract_api_key(&html) else {
            warn!("Watch page did not contain an innertube API key");
            return Err(TranscriptError::NotFound(format!(
                "video '{video_id}' is unavailable"
            )));
        };

        let player = self.fetch_player(video_id, &api_key).await?;
        check_playability(&player, video_id)?;

        let tracks = caption_tracks(&player);
        debug!(
            tracks = ?tracks.iter().map(|t| t.language_code.as_str()).collect::<Vec<_>>(),
            "Caption tracks available"
        );
        let track = select_track(&tracks, language)?;

        let xml = self.fetch_caption_xml(video_id, track).await?;
        let fragments = parse_caption_xml(&xml)?;

        info!(
            fragments = fragments.len(),
            generated = track.generated,
            "Fetched transcript"
        );
        Ok(fragments)
    }
}

fn check_status(status: StatusCode, video_id: &str, what: &str) -> Result<(), TranscriptError> {
    if status.is_success() {
        return Ok(());
    }
    if status == StatusCode::NOT_FOUND {
        return Err(TranscriptError::NotFound(format!(
            "video '{video_id}' ({what} returned {status})"
        )));
    }
    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        return Err(TranscriptError::TransientNetwork(format!(
            "{what} request failed with status {status}"
        )));
    }
    Err(TranscriptError::UnexpectedResponse(format!(
        "{what} request failed with status {status}"
    )))
}

#[must_use]
pub fn extract_api_key(html: &str) -> Option<String> {
    API_KEY_RE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

fn check_playability(player: &Value, video_id: &str) -> Result<(), TranscriptError> {
    let status_obj = player.get("playabilityStatus");
    let status = status_obj
        .and_then(|s| s.get("status"))
        .and_then(|s| s.as_str())
        .unwrap_or("OK");
    if status == "OK" {
        return Ok(());
    }

    let reason = status_obj
        .and_then(|s| s.get("reason"))
        .and_then(|r| r.as_str())
        .unwrap_or("no reason given");

    if status == "LOGIN_REQUIRED" && reason.to_ascii_lowercase().contains("not a bot") {
        return Err(TranscriptError::TransientNetwork(format!(
            "YouTube blocked the request: {reason}"
        )));
    }

    Err(TranscriptError::NotFound(format!(
        "video '{video_id}' is not playable ({status}): {reason}"
    )))
}

/// Caption tracks listed in a player response, in the order given.
#[must_use]
pub fn caption_tracks(player: &Value) -> Vec<CaptionTrack> {
    player
        .get("captions")
        .and_then(|c| c.get("playerCaptionsTracklistRenderer"))
        .and_then(|r| r.get("captionTracks"))
        .and_then(|t| t.as_array())
        .map(|tracks| {
            tracks
                .iter()
                .filter_map(|t| {
                    Some(CaptionTrack {
                        base_url: t.get("baseUrl")?.as_str()?.to_string(),
                        language_code: t.get("languageCode")?.as_str()?.to_string(),
                        generated: t.get("kind").and_then(|k| k.as_str()) == Some("asr"),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Pick the track for `language`, preferring manually created captions
/// over generated ones.
///
/// # Errors
///
/// Returns [`TranscriptError::LanguageUnavailable`] listing what exists.
pub fn select_track<'a>(
    tracks: &'a [CaptionTrack],
    language: &str,
) -> Result<&'a CaptionTrack, TranscriptError> {
    let matching = |generated: bool| {
        tracks
            .iter()
            .find(|t| t.generated == generated && t.language_code == language)
    };

    matching(false).or_else(|| matching(true)).ok_or_else(|| {
        let mut available: Vec<String> = Vec::new();
        for t in tracks {
            if !available.contains(&t.language_code) {
                available.push(t.language_code.clone());
            }
        }
        TranscriptError::LanguageUnavailable {
            language: language.to_string(),
            available,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(code: &str, generated: bool) -> CaptionTrack {
        CaptionTrack {
            base_url: format!("https://example.com/{code}/{generated}"),
            language_code: code.to_string(),
            generated,
        }
    }

    #[test]
    fn test_extract_api_key() {
        let html = r#"<script>ytcfg.set({"INNERTUBE_API_KEY":"AIza_key-123","OTHER":1})</script>"#;
        assert_eq!(extract_api_key(html).as_deref(), Some("AIza_key-123"));
        assert_eq!(extract_api_key("<html></html>"), None);
    }

    #[test]
    fn test_select_track_prefers_manual() {
        let tracks = vec![track("en", true), track("de", false), track("en", false)];
        let chosen = select_track(&tracks, "en").unwrap();
        assert!(!chosen.generated);
        assert_eq!(chosen.language_code, "en");
    }

    #[test]
    fn test_select_track_falls_back_to_generated() {
        let tracks = vec![track("en", true)];
        assert!(select_track(&tracks, "en").unwrap().generated);
    }

    #[test]
    fn test_select_track_reports_available_languages() {
        let tracks = vec![track("de", false), track("fr", true), track("de", true)];
        match select_track(&tracks, "en").unwrap_err() {
            TranscriptError::LanguageUnavailable {
                language,
                available,
            } => {
                assert_eq!(language, "en");
                assert_eq!(available, vec!["de".to_string(), "fr".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_caption_tracks_missing_captions() {
        let player = json!({ "playabilityStatus": { "status": "OK" } });
        assert!(caption_tracks(&player).is_empty());
    }

    #[test]
    fn test_check_playability() {
        let ok = json!({ "playabilityStatus": { "status": "OK" } });
        assert!(check_playability(&ok, "abc").is_ok());

        let missing = json!({ "playabilityStatus": { "status": "ERROR", "reason": "Video unavailable" } });
        assert!(matches!(
            check_playability(&missing, "abc"),
            Err(TranscriptError::NotFound(_))
        ));

        let blocked = json!({ "playabilityStatus": { "status": "LOGIN_REQUIRED", "reason": "Sign in to confirm you're not a bot" } });
        assert!(matches!(
            check_playability(&blocked, "abc"),
            Err(TranscriptError::TransientNetwork(_))
        ));
    }
}
