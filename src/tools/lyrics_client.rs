use clap::Parser;
use serde_json::Value;
use std::error::Error;

/// Client for querying a running interpretone server
///
/// Example: interpretone_lyrics_client "Dewa 19" "Aku Milikmu"
#[derive(Parser, Debug)]
#[clap(author, version, about = "Resolve lyrics through a running interpretone server", long_about = None)]
struct Args {
    /// Artist name
    artist: String,

    /// Song title
    title: String,

    #[clap(long, default_value = "http://localhost:1180/api")]
    baseurl: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let url = format!(
        "{}/lyrics/resolve?artist={}&title={}",
        args.baseurl,
        urlencoding::encode(&args.artist),
        urlencoding::encode(&args.title)
    );

    let response = ureq::get(&url).call()?;
    let body: Value = response.into_json()?;

    let source = body
        .get("source")
        .and_then(|s| s.as_str())
        .unwrap_or("unknown");
    println!("Source: {}", source);

    if let Some(source_url) = body.get("source_url").and_then(|u| u.as_str()) {
        println!("Page:   {}", source_url);
    }

    match body.get("lyrics").and_then(|l| l.as_str()) {
        Some(lyrics) => println!("\n{}", lyrics),
        None => println!("\nNo lyrics field in response: {}", body),
    }

    Ok(())
}
