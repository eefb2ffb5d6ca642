use std::sync::Arc;

use clap::Parser;
use log::{error, info};

use interpretone::api::server::start_rocket_server;
use interpretone::config::{get_service_config, load_config_or_default};
use interpretone::helpers::kapanlagi::KapanLagiProvider;
use interpretone::helpers::lyrics::LyricsResolver;
use interpretone::helpers::lyricsovh::LyricsOvhProvider;
use interpretone::logging::{init_default_logger, LoggingConfig};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Interpretone lyrics resolution server", long_about = None)]
struct Args {
    /// Path to the configuration file
    #[clap(long, default_value = "interpretone.json")]
    config: String,

    /// Enable debug logging (ignored when the config file has a logging section)
    #[clap(short, long)]
    verbose: bool,
}

#[rocket::main]
async fn main() {
    let args = Args::parse();

    let config_json = load_config_or_default(&args.config);

    // Logging comes from the config file when present, CLI flags otherwise
    if get_service_config(&config_json, "logging").is_some() {
        let logging_config = LoggingConfig::from_service_config(&config_json);
        if let Err(e) = logging_config.initialize_logger() {
            eprintln!("Failed to initialize logger: {}", e);
            init_default_logger(args.verbose);
        }
    } else {
        init_default_logger(args.verbose);
    }

    info!("Interpretone lyrics server {} starting", env!("CARGO_PKG_VERSION"));

    let primary = LyricsOvhProvider::from_service_config(&config_json);
    let fallback = KapanLagiProvider::from_service_config(&config_json);
    let resolver = Arc::new(LyricsResolver::new(Box::new(primary), Box::new(fallback)));

    if let Err(e) = start_rocket_server(&config_json, resolver).await {
        error!("Webserver failed: {}", e);
        std::process::exit(1);
    }

    info!("Interpretone lyrics server shut down");
}
