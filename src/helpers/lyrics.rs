/// Lyrics provider trait and the resolution pipeline
///
/// Resolution tries the primary lyrics API first and falls back to the
/// scraper when the primary result is missing or too short to trust. The
/// pipeline always produces a result; when both sources fail the caller gets
/// the fixed placeholder text.
use std::fmt;

use lazy_static::lazy_static;
use log::{debug, warn};
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

/// Placeholder text shown when no lyrics source succeeds
pub const LYRICS_UNAVAILABLE: &str = "Lirik tidak tersedia untuk lagu ini.";

/// Primary responses at or below this many characters are not trusted and
/// trigger the fallback scraper. Stricter than the scraper's own floor.
const PRIMARY_MIN_CHARS: usize = 100;

/// Result type for lyrics operations
pub type LyricsResult<T> = Result<T, LyricsError>;

/// Error type for lyrics operations
#[derive(Debug, Error)]
pub enum LyricsError {
    /// Song not found at the source
    #[error("Lyrics not found")]
    NotFound,
    /// Network error
    #[error("Network error: {0}")]
    NetworkError(String),
    /// Parsing error
    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Lookup parameters for finding lyrics by song metadata
#[derive(Debug, Clone)]
pub struct LyricsLookup {
    /// Artist name
    pub artist: String,
    /// Song title
    pub title: String,
}

impl LyricsLookup {
    /// Create a new lookup from free-text artist and title
    ///
    /// Both values are trimmed; returns None if either is empty afterwards.
    pub fn new(artist: &str, title: &str) -> Option<Self> {
        let artist = artist.trim();
        let title = title.trim();
        if artist.is_empty() || title.is_empty() {
            return None;
        }
        Some(Self {
            artist: artist.to_string(),
            title: title.to_string(),
        })
    }
}

/// Raw lyrics returned by a single provider
#[derive(Debug, Clone)]
pub struct FetchedLyrics {
    /// The lyrics text
    pub text: String,
    /// Page the lyrics were taken from, if the provider has one
    pub source_url: Option<String>,
}

/// Trait for providing lyrics from a single source
pub trait LyricsProvider: Send + Sync {
    /// Get lyrics by artist and song title
    fn get_lyrics(&self, lookup: &LyricsLookup) -> LyricsResult<FetchedLyrics>;

    /// Get the name/identifier of this lyrics provider
    fn provider_name(&self) -> &'static str;
}

/// Which source produced the resolved lyrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LyricsSource {
    Primary,
    Fallback,
    None,
}

impl fmt::Display for LyricsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LyricsSource::Primary => write!(f, "primary"),
            LyricsSource::Fallback => write!(f, "fallback"),
            LyricsSource::None => write!(f, "none"),
        }
    }
}

/// Final output of the resolution pipeline
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedLyrics {
    /// Lyrics text, or the placeholder when no source succeeded
    pub text: String,
    /// Source that produced the text
    pub source: LyricsSource,
    /// Page the lyrics were scraped from, when the fallback produced them
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

/// Resolves lyrics by trying a primary provider and then a fallback
pub struct LyricsResolver {
    primary: Box<dyn LyricsProvider>,
    fallback: Box<dyn LyricsProvider>,
}

impl LyricsResolver {
    /// Create a resolver from a primary and a fallback provider
    pub fn new(primary: Box<dyn LyricsProvider>, fallback: Box<dyn LyricsProvider>) -> Self {
        Self { primary, fallback }
    }

    /// The primary provider, for callers that want a single-source lookup
    pub fn primary(&self) -> &dyn LyricsProvider {
        self.primary.as_ref()
    }

    /// The fallback provider, for callers that want a single-source lookup
    pub fn fallback(&self) -> &dyn LyricsProvider {
        self.fallback.as_ref()
    }

    /// Resolve lyrics for a song
    ///
    /// Tries the primary provider first. The primary text is accepted only
    /// if it is not the placeholder and is longer than 100 characters;
    /// otherwise the fallback provider gets one attempt. Provider errors
    /// never escape: when both sources fail the result carries the
    /// placeholder with source `none`.
    pub fn resolve(&self, lookup: &LyricsLookup) -> ResolvedLyrics {
        // Any primary failure leaves the placeholder as the candidate text
        let primary_text = match self.primary.get_lyrics(lookup) {
            Ok(fetched) => fetched.text,
            Err(LyricsError::NotFound) => {
                debug!(
                    "No lyrics on {} for {} - {}",
                    self.primary.provider_name(),
                    lookup.artist,
                    lookup.title
                );
                LYRICS_UNAVAILABLE.to_string()
            }
            Err(e) => {
                warn!("Provider {} failed: {}", self.primary.provider_name(), e);
                LYRICS_UNAVAILABLE.to_string()
            }
        };

        let primary_valid = primary_text != LYRICS_UNAVAILABLE
            && primary_text.chars().count() > PRIMARY_MIN_CHARS;

        if primary_valid {
            return ResolvedLyrics {
                text: clean_lyrics(&primary_text),
                source: LyricsSource::Primary,
                source_url: None,
            };
        }

        debug!(
            "Primary lyrics missing or too short for {} - {}, trying {}",
            lookup.artist,
            lookup.title,
            self.fallback.provider_name()
        );

        match self.fallback.get_lyrics(lookup) {
            Ok(fetched) if !fetched.text.is_empty() => ResolvedLyrics {
                text: clean_lyrics(&fetched.text),
                source: LyricsSource::Fallback,
                source_url: fetched.source_url,
            },
            Ok(_) => self.unresolved(primary_text),
            Err(LyricsError::NotFound) => {
                debug!(
                    "No lyrics on {} for {} - {}",
                    self.fallback.provider_name(),
                    lookup.artist,
                    lookup.title
                );
                self.unresolved(primary_text)
            }
            Err(e) => {
                warn!("Provider {} failed: {}", self.fallback.provider_name(), e);
                self.unresolved(primary_text)
            }
        }
    }

    /// Result when the fallback produced nothing: keep whatever the primary
    /// attempt left behind (the placeholder, or a short uncleaned response)
    fn unresolved(&self, primary_text: String) -> ResolvedLyrics {
        let text = if primary_text == LYRICS_UNAVAILABLE {
            primary_text
        } else {
            clean_lyrics(&primary_text)
        };
        ResolvedLyrics {
            text,
            source: LyricsSource::None,
            source_url: None,
        }
    }
}

/// Clean lyrics text for display
///
/// Normalizes CRLF line breaks, limits consecutive blank lines and trims.
/// Empty input and the placeholder pass through unchanged. Idempotent.
pub fn clean_lyrics(text: &str) -> String {
    if text.is_empty() || text == LYRICS_UNAVAILABLE {
        return text.to_string();
    }

    lazy_static! {
        static ref EXCESS_NEWLINES: Regex = Regex::new(r"\n{3,}").unwrap();
    }

    let normalized = text.replace("\r\n", "\n");
    EXCESS_NEWLINES
        .replace_all(&normalized, "\n\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    enum MockResponse {
        Text(&'static str),
        TextWithUrl(&'static str, &'static str),
        NotFound,
        NetworkError,
    }

    struct MockLyricsProvider {
        name: &'static str,
        response: MockResponse,
        calls: Arc<AtomicUsize>,
    }

    impl MockLyricsProvider {
        fn new(name: &'static str, response: MockResponse) -> Self {
            Self {
                name,
                response,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn call_counter(&self) -> Arc<AtomicUsize> {
            self.calls.clone()
        }
    }

    impl LyricsProvider for MockLyricsProvider {
        fn get_lyrics(&self, _lookup: &LyricsLookup) -> LyricsResult<FetchedLyrics> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.response {
                MockResponse::Text(text) => Ok(FetchedLyrics {
                    text: text.to_string(),
                    source_url: None,
                }),
                MockResponse::TextWithUrl(text, url) => Ok(FetchedLyrics {
                    text: text.to_string(),
                    source_url: Some(url.to_string()),
                }),
                MockResponse::NotFound => Err(LyricsError::NotFound),
                MockResponse::NetworkError => {
                    Err(LyricsError::NetworkError("connection reset".to_string()))
                }
            }
        }

        fn provider_name(&self) -> &'static str {
            self.name
        }
    }

    fn lookup() -> LyricsLookup {
        LyricsLookup::new("Dewa 19", "Aku Milikmu").unwrap()
    }

    const LONG_LYRICS: &str = "Aku bukanlah untukmu dan kamu bukanlah untukku\n\
                               Namun apa daya cinta ini telah memilihmu\n\
                               Biar semua berlalu biar semua tak menentu";

    #[test]
    fn test_lookup_requires_nonempty_fields() {
        assert!(LyricsLookup::new("", "Aku Milikmu").is_none());
        assert!(LyricsLookup::new("Dewa 19", "   ").is_none());
        let lookup = LyricsLookup::new("  Dewa 19 ", " Aku Milikmu ").unwrap();
        assert_eq!(lookup.artist, "Dewa 19");
        assert_eq!(lookup.title, "Aku Milikmu");
    }

    #[test]
    fn test_valid_primary_is_used_directly() {
        let primary = MockLyricsProvider::new("primary", MockResponse::Text(LONG_LYRICS));
        let fallback = MockLyricsProvider::new("fallback", MockResponse::Text("never used"));
        let fallback_calls = fallback.call_counter();

        let resolver = LyricsResolver::new(Box::new(primary), Box::new(fallback));
        let resolved = resolver.resolve(&lookup());

        assert_eq!(resolved.source, LyricsSource::Primary);
        assert_eq!(resolved.text, clean_lyrics(LONG_LYRICS));
        assert!(resolved.source_url.is_none());
        assert_eq!(fallback_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_short_primary_triggers_fallback() {
        // 100 characters or fewer is not trusted
        let short = "la la la";
        let primary = MockLyricsProvider::new("primary", MockResponse::Text(short));
        let fallback = MockLyricsProvider::new(
            "fallback",
            MockResponse::TextWithUrl(LONG_LYRICS, "https://lirik.example/artis/dewa-19/aku-milikmu/"),
        );
        let fallback_calls = fallback.call_counter();

        let resolver = LyricsResolver::new(Box::new(primary), Box::new(fallback));
        let resolved = resolver.resolve(&lookup());

        assert_eq!(fallback_calls.load(Ordering::SeqCst), 1);
        assert_eq!(resolved.source, LyricsSource::Fallback);
        assert_eq!(resolved.text, clean_lyrics(LONG_LYRICS));
        assert_eq!(
            resolved.source_url.as_deref(),
            Some("https://lirik.example/artis/dewa-19/aku-milikmu/")
        );
    }

    #[test]
    fn test_boundary_length_is_not_trusted() {
        // Exactly 100 characters: still invalid, threshold is strictly greater
        let exactly_100 = "x".repeat(100);
        let primary = MockLyricsProvider::new(
            "primary",
            MockResponse::Text(Box::leak(exactly_100.into_boxed_str())),
        );
        let fallback = MockLyricsProvider::new("fallback", MockResponse::NotFound);
        let fallback_calls = fallback.call_counter();

        let resolver = LyricsResolver::new(Box::new(primary), Box::new(fallback));
        resolver.resolve(&lookup());

        assert_eq!(fallback_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_placeholder_primary_triggers_fallback() {
        let primary = MockLyricsProvider::new("primary", MockResponse::Text(LYRICS_UNAVAILABLE));
        let fallback = MockLyricsProvider::new("fallback", MockResponse::TextWithUrl(LONG_LYRICS, "https://x/"));
        let fallback_calls = fallback.call_counter();

        let resolver = LyricsResolver::new(Box::new(primary), Box::new(fallback));
        let resolved = resolver.resolve(&lookup());

        assert_eq!(fallback_calls.load(Ordering::SeqCst), 1);
        assert_eq!(resolved.source, LyricsSource::Fallback);
    }

    #[test]
    fn test_both_sources_fail_yields_placeholder() {
        let primary = MockLyricsProvider::new("primary", MockResponse::NotFound);
        let fallback = MockLyricsProvider::new("fallback", MockResponse::NotFound);

        let resolver = LyricsResolver::new(Box::new(primary), Box::new(fallback));
        let resolved = resolver.resolve(&lookup());

        assert_eq!(resolved.text, LYRICS_UNAVAILABLE);
        assert_eq!(resolved.source, LyricsSource::None);
        assert!(resolved.source_url.is_none());
    }

    #[test]
    fn test_fallback_errors_never_escape() {
        let primary = MockLyricsProvider::new("primary", MockResponse::NetworkError);
        let fallback = MockLyricsProvider::new("fallback", MockResponse::NetworkError);

        let resolver = LyricsResolver::new(Box::new(primary), Box::new(fallback));
        let resolved = resolver.resolve(&lookup());

        assert_eq!(resolved.text, LYRICS_UNAVAILABLE);
        assert_eq!(resolved.source, LyricsSource::None);
    }

    #[test]
    fn test_short_primary_kept_when_fallback_fails() {
        let short = "Aku milikmu, malam ini";
        let primary = MockLyricsProvider::new("primary", MockResponse::Text(short));
        let fallback = MockLyricsProvider::new("fallback", MockResponse::NotFound);

        let resolver = LyricsResolver::new(Box::new(primary), Box::new(fallback));
        let resolved = resolver.resolve(&lookup());

        assert_eq!(resolved.text, short);
        assert_eq!(resolved.source, LyricsSource::None);
    }

    #[test]
    fn test_source_serialization() {
        assert_eq!(serde_json::to_string(&LyricsSource::Primary).unwrap(), "\"primary\"");
        assert_eq!(serde_json::to_string(&LyricsSource::Fallback).unwrap(), "\"fallback\"");
        assert_eq!(serde_json::to_string(&LyricsSource::None).unwrap(), "\"none\"");
    }

    #[test]
    fn test_clean_lyrics_normalizes_line_breaks() {
        assert_eq!(clean_lyrics("baris satu\r\nbaris dua"), "baris satu\nbaris dua");
        assert_eq!(clean_lyrics("a\n\n\n\nb"), "a\n\nb");
        assert_eq!(clean_lyrics("  \n a \n "), "a");
    }

    #[test]
    fn test_clean_lyrics_passes_placeholder_through() {
        assert_eq!(clean_lyrics(LYRICS_UNAVAILABLE), LYRICS_UNAVAILABLE);
        assert_eq!(clean_lyrics(""), "");
    }

    #[test]
    fn test_clean_lyrics_idempotent() {
        let inputs = [
            "a\r\n\r\n\r\nb",
            "  leading and trailing  ",
            "one\n\ntwo\n\n\nthree",
            LONG_LYRICS,
        ];
        for input in inputs {
            let once = clean_lyrics(input);
            assert_eq!(clean_lyrics(&once), once, "not idempotent for {:?}", input);
        }
    }
}
