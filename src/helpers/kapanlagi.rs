/// KapanLagi lyrics scraper, the fallback lyrics source
///
/// Builds the song page URL directly from artist/title slugs (no search
/// step) and extracts the lyrics from the page markup. The site serves a
/// fixed structure: one `span.lirik_line` element per lyric line, with the
/// lines wrapped in a container that also carries ads and "related" boxes.
///
/// The selectors and boilerplate phrases below are coupled to the site's
/// markup; the captured-page fixtures under `tests/fixtures/` exist to catch
/// drift when the site changes.
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};

use crate::config::get_service_config;
use crate::helpers::http_client::{self, HttpClient, HttpClientError};
use crate::helpers::lyrics::{
    FetchedLyrics, LyricsError, LyricsLookup, LyricsProvider, LyricsResult,
};
use crate::helpers::slug::slugify;

const DEFAULT_BASE_URL: &str = "https://lirik.kapanlagi.com";

/// The site blocks default library user agents
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

const SCRAPE_TIMEOUT_SECS: u64 = 10;

/// Extracted text below this many characters counts as a failed scrape
const MIN_LYRICS_CHARS: usize = 50;

/// Elements whose subtrees never contain lyrics
const NOISE_TAGS: [&str; 2] = ["script", "style"];
const NOISE_CLASSES: [&str; 3] = ["baca-juga", "iklan", "in-read-ad"];

lazy_static! {
    /// Site boilerplate phrases, removed case-insensitively wherever they
    /// appear in the extracted text
    static ref BOILERPLATE: Vec<Regex> = vec![
        Regex::new(r"(?i)KapanLagi\.com").unwrap(),
        Regex::new(r"(?i)Simak lirik lagu").unwrap(),
        Regex::new(r"(?i)Lirik Lagu").unwrap(),
        Regex::new(r"(?i)Oleh").unwrap(),
    ];
}

/// Lyrics provider that scrapes lirik.kapanlagi.com song pages
pub struct KapanLagiProvider {
    base_url: String,
    enabled: bool,
    client: Box<dyn HttpClient>,
}

impl KapanLagiProvider {
    /// Create a provider against the public site with the standard timeout
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            enabled: true,
            client: http_client::new_http_client(SCRAPE_TIMEOUT_SECS),
        }
    }

    /// Create a provider from the `kapanlagi` service configuration
    ///
    /// Supported keys: `enable` (default true) and `base_url`.
    pub fn from_service_config(config: &serde_json::Value) -> Self {
        let mut provider = Self::new();
        if let Some(service) = get_service_config(config, "kapanlagi") {
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

    /// Build the direct song page URL for a lookup
    ///
    /// Pattern: `{base}/artis/{artist-slug}/{title-slug}/`
    pub fn lyrics_url(&self, lookup: &LyricsLookup) -> String {
        format!(
            "{}/artis/{}/{}/",
            self.base_url,
            slugify(&lookup.artist),
            slugify(&lookup.title)
        )
    }
}

impl Default for KapanLagiProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl LyricsProvider for KapanLagiProvider {
    fn get_lyrics(&self, lookup: &LyricsLookup) -> LyricsResult<FetchedLyrics> {
        if !self.enabled {
            debug!("KapanLagi lookups are disabled");
            return Err(LyricsError::NotFound);
        }

        let url = self.lyrics_url(lookup);
        debug!("Direct lyrics URL: {}", url);

        let referer = format!("{}/", self.base_url);
        let html = match self.client.get_with_headers(
            &url,
            &[("User-Agent", USER_AGENT), ("Referer", &referer)],
        ) {
            Ok(html) => html,
            Err(e) if e.is_status(404) => {
                // Direct-URL misses usually mean the slug doesn't match the
                // site's spelling of the artist or title
                debug!("Lyrics page not found: {}", url);
                return Err(LyricsError::NotFound);
            }
            Err(HttpClientError::Status { status }) => {
                return Err(LyricsError::NetworkError(format!(
                    "Unexpected status {} from {}",
                    status, url
                )));
            }
            Err(e) => return Err(LyricsError::NetworkError(e.to_string())),
        };

        let raw = extract_lyrics(&html)?;
        let text = strip_boilerplate(&raw);

        if text.chars().count() < MIN_LYRICS_CHARS {
            debug!(
                "Extracted lyrics too short ({} chars) from {}",
                text.chars().count(),
                url
            );
            return Err(LyricsError::ParseError(
                "Extracted lyrics empty or too short".to_string(),
            ));
        }

        Ok(FetchedLyrics {
            text,
            source_url: Some(url),
        })
    }

    fn provider_name(&self) -> &'static str {
        "kapanlagi"
    }
}

/// Extract raw lyrics text from a song page
///
/// Primary extraction collects every `span.lirik_line` element in document
/// order, one line each. When the page carries no such spans, the secondary
/// extraction takes the text of the parent of the `.lirik_line` marker
/// region, skipping noise subtrees.
pub fn extract_lyrics(html: &str) -> LyricsResult<String> {
    let document = Html::parse_document(html);

    let line_selector = Selector::parse("span.lirik_line")
        .map_err(|e| LyricsError::ParseError(format!("Invalid selector: {:?}", e)))?;

    let line_elements: Vec<ElementRef> = document.select(&line_selector).collect();
    if !line_elements.is_empty() {
        let mut lines = Vec::new();
        for element in &line_elements {
            let text = element.text().collect::<String>();
            let text = text.trim();
            if !text.is_empty() {
                lines.push(text.to_string());
            }
        }
        return Ok(lines.join("\n"));
    }

    // No line spans: take the text of the marker region's parent instead
    let marker_selector = Selector::parse(".lirik_line")
        .map_err(|e| LyricsError::ParseError(format!("Invalid selector: {:?}", e)))?;

    let marker = document
        .select(&marker_selector)
        .next()
        .ok_or_else(|| LyricsError::ParseError("No lyric markers in page".to_string()))?;

    let parent = marker
        .parent()
        .and_then(ElementRef::wrap)
        .ok_or_else(|| LyricsError::ParseError("Lyric marker has no parent element".to_string()))?;

    let mut raw = String::new();
    collect_text_skipping_noise(parent, &mut raw);
    Ok(raw)
}

/// Remove known site boilerplate substrings and trim the result
pub fn strip_boilerplate(text: &str) -> String {
    let mut cleaned = text.to_string();
    for pattern in BOILERPLATE.iter() {
        cleaned = pattern.replace_all(&cleaned, "").to_string();
    }
    cleaned.trim().to_string()
}

fn is_noise(element: &scraper::node::Element) -> bool {
    if NOISE_TAGS.contains(&element.name()) {
        return true;
    }
    element
        .attr("class")
        .map(|classes| {
            classes
                .split_whitespace()
                .any(|class| NOISE_CLASSES.contains(&class))
        })
        .unwrap_or(false)
}

fn collect_text_skipping_noise(element: ElementRef, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                if el.name() == "br" {
                    out.push('\n');
                    continue;
                }
                if is_noise(el) {
                    continue;
                }
                if let Some(child_ref) = ElementRef::wrap(child) {
                    collect_text_skipping_noise(child_ref, out);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Debug, Default)]
    struct MockHttpClient {
        body: Option<&'static str>,
        status: Option<u16>,
        seen_headers: Arc<Mutex<Vec<(String, String)>>>,
    }

    impl MockHttpClient {
        fn with_body(body: &'static str) -> Self {
            Self {
                body: Some(body),
                ..Default::default()
            }
        }

        fn with_status(status: u16) -> Self {
            Self {
                status: Some(status),
                ..Default::default()
            }
        }
    }

    impl HttpClient for MockHttpClient {
        fn get(&self, url: &str) -> Result<String, HttpClientError> {
            self.get_with_headers(url, &[])
        }

        fn get_with_headers(
            &self,
            _url: &str,
            headers: &[(&str, &str)],
        ) -> Result<String, HttpClientError> {
            let mut seen = self.seen_headers.lock().unwrap();
            for (name, value) in headers {
                seen.push((name.to_string(), value.to_string()));
            }
            if let Some(status) = self.status {
                return Err(HttpClientError::Status { status });
            }
            Ok(self.body.unwrap_or("").to_string())
        }

        fn clone_box(&self) -> Box<dyn HttpClient> {
            Box::new(self.clone())
        }
    }

    fn lookup() -> LyricsLookup {
        LyricsLookup::new("Dewa 19", "Aku Milikmu").unwrap()
    }

    const SONG_PAGE: &str = r#"<html><body>
        <div class="col-md-12">
            <span class="lirik_line">Aku bukanlah untukmu dan kamu bukanlah untukku</span>
            <span class="lirik_line">Namun apa daya cinta ini telah memilihmu</span>
            <span class="lirik_line">   </span>
            <span class="lirik_line">Biar semua berlalu biar semua tak menentu</span>
        </div>
    </body></html>"#;

    #[test]
    fn test_lyrics_url_uses_slugs() {
        let provider = KapanLagiProvider::new();
        assert_eq!(
            provider.lyrics_url(&lookup()),
            "https://lirik.kapanlagi.com/artis/dewa-19/aku-milikmu/"
        );

        let punctuated = LyricsLookup::new("Dewa 19", "Hati-Hati di Jalan!").unwrap();
        assert_eq!(
            provider.lyrics_url(&punctuated),
            "https://lirik.kapanlagi.com/artis/dewa-19/hati-hati-di-jalan/"
        );
    }

    #[test]
    fn test_extract_lyrics_from_line_spans() {
        let text = extract_lyrics(SONG_PAGE).unwrap();
        assert_eq!(
            text,
            "Aku bukanlah untukmu dan kamu bukanlah untukku\n\
             Namun apa daya cinta ini telah memilihmu\n\
             Biar semua berlalu biar semua tak menentu"
        );
    }

    #[test]
    fn test_extract_lyrics_without_markers_fails() {
        let page = "<html><body><p>Halaman tidak ditemukan</p></body></html>";
        assert!(matches!(
            extract_lyrics(page),
            Err(LyricsError::ParseError(_))
        ));
    }

    #[test]
    fn test_extract_lyrics_secondary_path_skips_noise() {
        let page = r#"<html><body>
            <div class="col-md-12">
                <div class="lirik_line"></div>
                Aku bukanlah untukmu<br>dan kamu bukanlah untukku
                <div class="baca-juga">Baca juga: artikel lain</div>
                <script>var ads = true;</script>
                <div class="iklan">IKLAN</div>
            </div>
        </body></html>"#;
        let text = extract_lyrics(page).unwrap();
        assert!(text.contains("Aku bukanlah untukmu"));
        assert!(text.contains("dan kamu bukanlah untukku"));
        assert!(!text.contains("Baca juga"));
        assert!(!text.contains("IKLAN"));
        assert!(!text.contains("var ads"));
    }

    #[test]
    fn test_strip_boilerplate_is_case_insensitive() {
        let text = "KAPANLAGI.COM Simak lirik lagu berikut\nAku bukanlah untukmu";
        let cleaned = strip_boilerplate(text);
        assert!(!cleaned.to_lowercase().contains("kapanlagi.com"));
        assert!(!cleaned.to_lowercase().contains("simak lirik lagu"));
        assert!(cleaned.contains("Aku bukanlah untukmu"));
    }

    #[test]
    fn test_provider_sends_browser_headers() {
        let client = MockHttpClient::with_body(SONG_PAGE);
        let seen = client.seen_headers.clone();
        let provider = KapanLagiProvider::new().with_client(Box::new(client));

        provider.get_lyrics(&lookup()).unwrap();

        let headers = seen.lock().unwrap();
        assert!(headers.iter().any(|(name, value)| name == "User-Agent"
            && value.contains("Mozilla/5.0")));
        assert!(headers
            .iter()
            .any(|(name, value)| name == "Referer" && value == "https://lirik.kapanlagi.com/"));
    }

    #[test]
    fn test_provider_returns_lyrics_and_source_url() {
        let provider =
            KapanLagiProvider::new().with_client(Box::new(MockHttpClient::with_body(SONG_PAGE)));
        let fetched = provider.get_lyrics(&lookup()).unwrap();
        assert!(fetched.text.starts_with("Aku bukanlah untukmu"));
        assert_eq!(
            fetched.source_url.as_deref(),
            Some("https://lirik.kapanlagi.com/artis/dewa-19/aku-milikmu/")
        );
    }

    #[test]
    fn test_provider_maps_404_to_not_found() {
        let provider =
            KapanLagiProvider::new().with_client(Box::new(MockHttpClient::with_status(404)));
        assert!(matches!(
            provider.get_lyrics(&lookup()),
            Err(LyricsError::NotFound)
        ));
    }

    #[test]
    fn test_provider_maps_server_error_to_network_error() {
        let provider =
            KapanLagiProvider::new().with_client(Box::new(MockHttpClient::with_status(503)));
        assert!(matches!(
            provider.get_lyrics(&lookup()),
            Err(LyricsError::NetworkError(_))
        ));
    }

    #[test]
    fn test_short_extraction_is_rejected() {
        let page = r#"<html><body>
            <span class="lirik_line">tiga puluh karakter saja</span>
        </body></html>"#;
        let provider =
            KapanLagiProvider::new().with_client(Box::new(MockHttpClient::with_body(page)));
        assert!(matches!(
            provider.get_lyrics(&lookup()),
            Err(LyricsError::ParseError(_))
        ));
    }
}
