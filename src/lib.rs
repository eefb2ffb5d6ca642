/// Configuration file access
pub mod config;

/// Shared constants
pub mod constants;

/// Logging configuration
pub mod logging;

/// Helper utilities and lyrics providers
pub mod helpers;

/// HTTP API
pub mod api;

// Re-export the resolution pipeline types for easier access
pub use helpers::lyrics::{LyricsLookup, LyricsResolver, LyricsSource, ResolvedLyrics};
