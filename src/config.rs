// Configuration utilities for interpretone
//
// The server reads a single JSON configuration file with a "services"
// subtree (webserver, lyricsovh, kapanlagi, logging). Older deployments
// kept service sections at the top level; that layout is still accepted.

use std::fs;
use std::path::Path;

use log::{debug, warn};
use serde_json::Value;

/// Load the configuration file
///
/// # Arguments
/// * `path` - Path to the JSON configuration file
///
/// # Returns
/// The parsed configuration, or an error message
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Value, String> {
    let content = fs::read_to_string(path.as_ref())
        .map_err(|e| format!("Failed to read config file: {}", e))?;

    serde_json::from_str(&content).map_err(|e| format!("Failed to parse config file: {}", e))
}

/// Load the configuration file, falling back to an empty configuration
///
/// A missing or unreadable file is not fatal; every service has usable
/// defaults. The failure is logged so misconfigured deployments are visible.
pub fn load_config_or_default<P: AsRef<Path>>(path: P) -> Value {
    match load_config(path.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            warn!(
                "Could not load configuration from {}: {}. Using defaults.",
                path.as_ref().display(),
                e
            );
            Value::Object(serde_json::Map::new())
        }
    }
}

/// Helper function to get service configuration with backward compatibility
///
/// This function first tries to find the service in the "services"
/// structure, then falls back to the old top-level structure.
///
/// # Arguments
/// * `config` - The configuration JSON object
/// * `service_name` - The name of the service to look up (e.g. "webserver",
///   "lyricsovh", "kapanlagi")
///
/// # Returns
/// * `Option<&serde_json::Value>` - The service configuration if found
///
/// # Example
/// ```rust
/// use serde_json::json;
/// use interpretone::config::get_service_config;
///
/// let config = json!({
///   "services": {
///     "kapanlagi": { "enable": true }
///   }
/// });
///
/// if let Some(kapanlagi_config) = get_service_config(&config, "kapanlagi") {
///     assert_eq!(kapanlagi_config["enable"], true);
/// }
/// ```
pub fn get_service_config<'a>(config: &'a Value, service_name: &str) -> Option<&'a Value> {
    if let Some(services) = config.get("services") {
        if let Some(service_config) = services.get(service_name) {
            debug!("Found {} configuration in services section", service_name);
            return Some(service_config);
        }
    }

    // Fall back to the old top-level structure for backward compatibility
    if let Some(service_config) = config.get(service_name) {
        debug!(
            "Found {} configuration at top level (legacy structure)",
            service_name
        );
        return Some(service_config);
    }

    debug!(
        "No {} configuration found in either services section or top level",
        service_name
    );
    None
}
