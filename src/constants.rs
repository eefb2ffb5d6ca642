/// Prefix for all API routes
pub const API_PREFIX: &str = "/api";

/// Default port for the webserver
pub const DEFAULT_PORT: u64 = 1180;

/// Default host for the webserver
pub const DEFAULT_HOST: &str = "0.0.0.0";
