use std::collections::HashMap;
use std::fs;
use std::path::Path;

use env_logger::{Builder, Env, Target, WriteStyle};
use log::LevelFilter;
use serde::{Deserialize, Serialize};

/// Available logging subsystems in interpretone
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LoggingSubsystem {
    /// Main application logging
    #[serde(rename = "main")]
    Main,
    /// API server logging
    #[serde(rename = "api")]
    Api,
    /// Lyrics providers and the resolution pipeline
    #[serde(rename = "lyrics")]
    Lyrics,
    /// HTTP client operations
    #[serde(rename = "http")]
    Http,
    /// Configuration loading and parsing
    #[serde(rename = "config")]
    Config,
    /// Third-party dependencies
    #[serde(rename = "deps")]
    Dependencies,
}

impl LoggingSubsystem {
    /// Get the module prefix for this subsystem
    pub fn module_prefix(&self) -> &'static str {
        match self {
            LoggingSubsystem::Main => "interpretone",
            LoggingSubsystem::Api => "interpretone::api",
            LoggingSubsystem::Lyrics => {
                "interpretone::helpers::lyrics,interpretone::helpers::lyricsovh,interpretone::helpers::kapanlagi"
            }
            LoggingSubsystem::Http => "interpretone::helpers::http_client,ureq",
            LoggingSubsystem::Config => "interpretone::config",
            LoggingSubsystem::Dependencies => "rocket,serde",
        }
    }
}

/// Logging configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Global log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Target for log output (stdout, stderr)
    #[serde(default = "default_target")]
    pub target: String,

    /// Whether to include timestamps
    #[serde(default = "default_timestamps")]
    pub timestamps: bool,

    /// Whether to use colored output
    #[serde(default = "default_colors")]
    pub colors: bool,

    /// Subsystem-specific log levels
    #[serde(default)]
    pub subsystems: HashMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_target() -> String {
    "stdout".to_string()
}

fn default_timestamps() -> bool {
    true
}

fn default_colors() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
            target: default_target(),
            timestamps: default_timestamps(),
            colors: default_colors(),
            subsystems: HashMap::new(),
        }
    }
}

impl LoggingConfig {
    /// Load logging configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read logging config file: {}", e))?;

        serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse logging config: {}", e))
    }

    /// Load logging configuration from the `logging` service section of the
    /// main configuration, or defaults when the section is absent
    pub fn from_service_config(config: &serde_json::Value) -> Self {
        match crate::config::get_service_config(config, "logging") {
            Some(section) => serde_json::from_value(section.clone()).unwrap_or_else(|e| {
                eprintln!("Warning: invalid logging configuration ({}), using defaults", e);
                LoggingConfig::default()
            }),
            None => LoggingConfig::default(),
        }
    }

    /// Convert string log level to LevelFilter
    fn parse_log_level(level: &str) -> LevelFilter {
        match level.to_lowercase().as_str() {
            "off" => LevelFilter::Off,
            "error" => LevelFilter::Error,
            "warn" => LevelFilter::Warn,
            "info" => LevelFilter::Info,
            "debug" => LevelFilter::Debug,
            "trace" => LevelFilter::Trace,
            _ => {
                eprintln!("Warning: Unknown log level '{}', defaulting to 'info'", level);
                LevelFilter::Info
            }
        }
    }

    /// Parse subsystem name to enum
    fn parse_subsystem(name: &str) -> Option<LoggingSubsystem> {
        match name.to_lowercase().as_str() {
            "main" => Some(LoggingSubsystem::Main),
            "api" => Some(LoggingSubsystem::Api),
            "lyrics" => Some(LoggingSubsystem::Lyrics),
            "http" => Some(LoggingSubsystem::Http),
            "config" => Some(LoggingSubsystem::Config),
            "deps" | "dependencies" => Some(LoggingSubsystem::Dependencies),
            _ => None,
        }
    }

    /// Build the environment filter string for env_logger
    pub fn build_filter_string(&self) -> String {
        let mut filter_parts = vec![self.level.clone()];

        for (subsystem_name, level) in &self.subsystems {
            if let Some(subsystem) = Self::parse_subsystem(subsystem_name) {
                for prefix in subsystem.module_prefix().split(',') {
                    filter_parts.push(format!("{}={}", prefix.trim(), level));
                }
            } else {
                // Allow custom module specifications
                filter_parts.push(format!("{}={}", subsystem_name, level));
            }
        }

        filter_parts.join(",")
    }

    /// Initialize the logger with this configuration
    pub fn initialize_logger(&self) -> Result<(), String> {
        let mut builder = Builder::new();

        builder.parse_env("RUST_LOG");
        builder.filter(None, Self::parse_log_level(&self.level));

        for (subsystem_name, level) in &self.subsystems {
            let level_filter = Self::parse_log_level(level);
            if let Some(subsystem) = Self::parse_subsystem(subsystem_name) {
                for prefix in subsystem.module_prefix().split(',') {
                    builder.filter(Some(prefix.trim()), level_filter);
                }
            } else {
                builder.filter(Some(subsystem_name), level_filter);
            }
        }

        if self.timestamps {
            builder.format_timestamp_secs();
        } else {
            builder.format_timestamp(None);
        }

        let write_style = if self.colors {
            WriteStyle::Auto
        } else {
            WriteStyle::Never
        };
        builder.write_style(write_style);

        match self.target.to_lowercase().as_str() {
            "stdout" => {
                builder.target(Target::Stdout);
            }
            "stderr" => {
                builder.target(Target::Stderr);
            }
            _ => {
                return Err(format!("Unknown logging target: {}", self.target));
            }
        }

        builder
            .try_init()
            .map_err(|e| format!("Failed to initialize logger: {}", e))
    }
}

/// Initialize the logger with default configuration
///
/// Used when the configuration file has no logging section and for the
/// auxiliary command line tools.
pub fn init_default_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let _ = Builder::from_env(Env::default().default_filter_or(default_level))
        .format_timestamp_secs()
        .try_init();
}
