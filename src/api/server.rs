use std::sync::Arc;

use log::info;
use rocket::config::Config;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::Header;
use rocket::serde::json::Json;
use rocket::{get, routes, Build, Request, Response, Rocket};

use crate::api::lyrics;
use crate::config::get_service_config;
use crate::constants::{API_PREFIX, DEFAULT_HOST, DEFAULT_PORT};
use crate::helpers::lyrics::LyricsResolver;

// Define the version response struct
#[derive(serde::Serialize)]
struct VersionResponse {
    version: String,
}

// API endpoint to get the version
#[get("/version")]
fn get_version() -> Json<VersionResponse> {
    Json(VersionResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Fairing that attaches permissive CORS headers to every response
///
/// The web app is served from a different origin than this API.
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "CORS allow-all headers",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new("Access-Control-Allow-Methods", "GET, OPTIONS"));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
    }
}

/// Build a Rocket instance with all API routes mounted
///
/// Kept separate from `start_rocket_server` so tests can build an instance
/// against mock providers without binding a port.
pub fn rocket_instance(
    config: rocket::figment::Figment,
    resolver: Arc<LyricsResolver>,
) -> Rocket<Build> {
    let api_routes = routes![get_version];

    // Lyrics routes
    let lyrics_routes = routes![
        lyrics::resolve_lyrics,
        lyrics::get_primary_lyrics,
        lyrics::get_fallback_lyrics,
    ];

    rocket::custom(config)
        .attach(Cors)
        .mount(API_PREFIX, api_routes)
        .mount(format!("{}/lyrics", API_PREFIX), lyrics_routes) // Mount lyrics routes
        .manage(resolver)
}

// Start the Rocket server
pub async fn start_rocket_server(
    config_json: &serde_json::Value,
    resolver: Arc<LyricsResolver>,
) -> Result<(), rocket::Error> {
    // Check if webserver is enabled (default to true if not specified)
    let webserver_enabled = get_service_config(config_json, "webserver")
        .and_then(|ws| ws.get("enable"))
        .and_then(|e| e.as_bool())
        .unwrap_or(true);

    if !webserver_enabled {
        info!("Webserver is disabled in configuration");
        return Ok(());
    }

    // Get webserver config or use defaults
    let host = get_service_config(config_json, "webserver")
        .and_then(|ws| ws.get("host"))
        .and_then(|h| h.as_str())
        .unwrap_or(DEFAULT_HOST);

    let port = get_service_config(config_json, "webserver")
        .and_then(|ws| ws.get("port"))
        .and_then(|p| p.as_u64())
        .unwrap_or(DEFAULT_PORT);

    info!("Starting webserver on {}:{}", host, port);

    let config = Config::figment()
        .merge(("port", port))
        .merge(("address", host));

    let _rocket = rocket_instance(config, resolver).launch().await?;

    Ok(())
}
