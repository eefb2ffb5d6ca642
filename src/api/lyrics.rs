use std::sync::Arc;

use log::warn;
use rocket::get;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use rocket::State;
use serde::Serialize;

use crate::helpers::lyrics::{LyricsError, LyricsLookup, LyricsResolver, LyricsSource};

/// Error body returned by all lyrics endpoints
#[derive(Serialize)]
pub struct ErrorResponse {
    error: String,
}

/// Response of the resolve endpoint
#[derive(Serialize)]
pub struct ResolveResponse {
    lyrics: String,
    source: LyricsSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_url: Option<String>,
}

/// Response of the primary-only endpoint
#[derive(Serialize)]
pub struct LyricsResponse {
    lyrics: String,
}

/// Response of the fallback-only endpoint
#[derive(Serialize)]
pub struct FallbackResponse {
    source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    lyrics: String,
}

fn error(status: Status, message: &str) -> Custom<Json<ErrorResponse>> {
    Custom(
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

/// Validate the artist/title query parameters
fn parse_lookup(
    artist: Option<String>,
    title: Option<String>,
) -> Result<LyricsLookup, Custom<Json<ErrorResponse>>> {
    match (artist, title) {
        (Some(artist), Some(title)) => LyricsLookup::new(&artist, &title)
            .ok_or_else(|| error(Status::BadRequest, "Artist and title required")),
        _ => Err(error(Status::BadRequest, "Artist and title required")),
    }
}

/// API endpoint to resolve lyrics for a song
///
/// Tries the primary source and the fallback scraper in order. Resolution
/// cannot fail: when no source produces lyrics the response carries the
/// placeholder text with `source: "none"`.
///
/// # Query Parameters
/// * `artist` - Artist name (required)
/// * `title` - Song title (required)
///
/// # Returns
/// * 200 OK with `{ lyrics, source, source_url? }`
/// * 400 Bad Request when artist or title is missing or blank
#[get("/resolve?<artist>&<title>")]
pub fn resolve_lyrics(
    artist: Option<String>,
    title: Option<String>,
    resolver: &State<Arc<LyricsResolver>>,
) -> Result<Json<ResolveResponse>, Custom<Json<ErrorResponse>>> {
    let lookup = parse_lookup(artist, title)?;
    let resolved = resolver.resolve(&lookup);

    Ok(Json(ResolveResponse {
        lyrics: resolved.text,
        source: resolved.source,
        source_url: resolved.source_url,
    }))
}

/// API endpoint to query only the primary lyrics source
///
/// # Returns
/// * 200 OK with `{ lyrics }` if found
/// * 400 Bad Request when artist or title is missing
/// * 404 Not Found when the source has no lyrics for the song
/// * 500 Internal Server Error for transport or parsing failures
#[get("/primary?<artist>&<title>")]
pub fn get_primary_lyrics(
    artist: Option<String>,
    title: Option<String>,
    resolver: &State<Arc<LyricsResolver>>,
) -> Result<Json<LyricsResponse>, Custom<Json<ErrorResponse>>> {
    let lookup = parse_lookup(artist, title)?;

    match resolver.primary().get_lyrics(&lookup) {
        Ok(fetched) => Ok(Json(LyricsResponse {
            lyrics: fetched.text,
        })),
        Err(LyricsError::NotFound) => Err(error(Status::NotFound, "Lyrics not found")),
        Err(e) => {
            warn!("Primary lyrics lookup failed: {}", e);
            Err(error(Status::InternalServerError, "Failed to fetch lyrics"))
        }
    }
}

/// API endpoint to query only the fallback scraper
///
/// # Returns
/// * 200 OK with `{ source, url, lyrics }` if the scrape succeeded
/// * 400 Bad Request when artist or title is missing
/// * 404 Not Found when the song page does not exist (usually an
///   artist/title spelling mismatch) or the page yielded no usable lyrics
/// * 500 Internal Server Error for transport failures
#[get("/fallback?<artist>&<title>")]
pub fn get_fallback_lyrics(
    artist: Option<String>,
    title: Option<String>,
    resolver: &State<Arc<LyricsResolver>>,
) -> Result<Json<FallbackResponse>, Custom<Json<ErrorResponse>>> {
    let lookup = parse_lookup(artist, title)?;

    match resolver.fallback().get_lyrics(&lookup) {
        Ok(fetched) => Ok(Json(FallbackResponse {
            source: "KapanLagi (Direct)".to_string(),
            url: fetched.source_url,
            lyrics: fetched.text,
        })),
        Err(LyricsError::NotFound) => Err(error(
            Status::NotFound,
            "Lagu tidak ditemukan di KapanLagi. Coba perbaiki ejaan artis/judul.",
        )),
        Err(LyricsError::ParseError(_)) => {
            Err(error(Status::NotFound, "Lirik kosong atau gagal diparsing"))
        }
        Err(e) => {
            warn!("Fallback lyrics lookup failed: {}", e);
            Err(error(Status::InternalServerError, "Internal Server Error"))
        }
    }
}
