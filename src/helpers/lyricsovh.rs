/// Lyrics.ovh client, the primary lyrics source
///
/// Lyrics.ovh is a free lyrics-by-artist-and-title API without
/// authentication. A missing song and a non-success status are both treated
/// as "not found" rather than errors; the resolution pipeline decides what
/// to do next.
use log::debug;
use serde::Deserialize;

use crate::config::get_service_config;
use crate::helpers::http_client::{self, HttpClient, HttpClientError};
use crate::helpers::lyrics::{
    FetchedLyrics, LyricsError, LyricsLookup, LyricsProvider, LyricsResult,
};

const DEFAULT_BASE_URL: &str = "https://api.lyrics.ovh/v1";

/// Response body of the lyrics.ovh API
#[derive(Debug, Deserialize)]
struct LyricsOvhResponse {
    lyrics: Option<String>,
}

/// Lyrics provider backed by the lyrics.ovh API
pub struct LyricsOvhProvider {
    base_url: String,
    enabled: bool,
    client: Box<dyn HttpClient>,
}

impl LyricsOvhProvider {
    /// Create a provider against the public lyrics.ovh endpoint
    ///
    /// No explicit timeout is set; the transport default applies.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            enabled: true,
            client: http_client::new_http_client_default_timeout(),
        }
    }

    /// Create a provider from the `lyricsovh` service configuration
    ///
    /// Supported keys: `enable` (default true) and `base_url`.
    pub fn from_service_config(config: &serde_json::Value) -> Self {
        let mut provider = Self::new();
        if let Some(service) = get_service_config(config, "lyricsovh") {
            provider.enabled = service
                .get("enable")
                .and_then(|v| v.as_bool())
                .unwrap_or(true);
            if let Some(base_url) = service.get("base_url").and_then(|v| v.as_str()) {
                provider.base_url = base_url.trim_end_matches('/').to_string();
            }
        }
        provider
    }

    /// Replace the HTTP client, mainly for tests
    pub fn with_client(mut self, client: Box<dyn HttpClient>) -> Self {
        self.client = client;
        self
    }

    /// Build the request URL for a lookup
    fn lyrics_url(&self, lookup: &LyricsLookup) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            urlencoding::encode(&lookup.artist),
            urlencoding::encode(&lookup.title)
        )
    }

    /// Parse a response body into lyrics text
    fn parse_response(body: &str) -> LyricsResult<String> {
        let response: LyricsOvhResponse = serde_json::from_str(body)
            .map_err(|e| LyricsError::ParseError(format!("Invalid lyrics.ovh response: {}", e)))?;

        match response.lyrics {
            Some(lyrics) if !lyrics.trim().is_empty() => Ok(lyrics),
            _ => Err(LyricsError::NotFound),
        }
    }
}

impl Default for LyricsOvhProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl LyricsProvider for LyricsOvhProvider {
    fn get_lyrics(&self, lookup: &LyricsLookup) -> LyricsResult<FetchedLyrics> {
        if !self.enabled {
            debug!("lyrics.ovh lookups are disabled");
            return Err(LyricsError::NotFound);
        }

        let url = self.lyrics_url(lookup);
        debug!("Fetching lyrics from {}", url);

        let body = match self.client.get(&url) {
            Ok(body) => body,
            // Any non-success status means the song is unknown to lyrics.ovh
            Err(HttpClientError::Status { status }) => {
                debug!("lyrics.ovh returned status {} for {}", status, url);
                return Err(LyricsError::NotFound);
            }
            Err(e) => return Err(LyricsError::NetworkError(e.to_string())),
        };

        let text = Self::parse_response(&body)?;
        Ok(FetchedLyrics {
            text,
            source_url: None,
        })
    }

    fn provider_name(&self) -> &'static str {
        "lyricsovh"
    }
}
