//! Settings loading: defaults ← file deep-merge ← env overrides.

use std::env;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::warn;

use crate::errors::Result;
use crate::types::HotlineSettings;

/// Path of the user settings file: `~/.hotline/settings.json`.
pub fn settings_path() -> PathBuf {
    let home = env::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".hotline").join("settings.json")
}

/// Deep-merge `overlay` into `base`. Objects merge recursively; any other
/// value in `overlay` (including `null`) replaces the base value.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_val) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_val) => deep_merge(base_val, overlay_val),
                    None => overlay_val,
                };
                let _ = base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }
        (_, overlay) => overlay,
    }
}

/// Load settings from the default path with env overrides applied.
///
/// A missing file is not an error — defaults are used. A malformed file is.
pub fn load_settings() -> Result<HotlineSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific file path.
///
/// Layers, lowest priority first: compiled defaults, the file (deep-merged),
/// `HOTLINE_*` environment variables. The result is validated before return.
pub fn load_settings_from_path(path: &Path) -> Result<HotlineSettings> {
    let defaults = serde_json::to_value(HotlineSettings::default())?;

    let merged = if path.exists() {
        let text = std::fs::read_to_string(path)?;
        let file_value: Value = serde_json::from_str(&text)?;
        deep_merge(defaults, file_value)
    } else {
        defaults
    };

    let mut settings: HotlineSettings = serde_json::from_value(merged)?;
    apply_env_overrides(&mut settings);
    settings.validate();
    Ok(settings)
}

/// Apply `HOTLINE_*` environment variable overrides (highest priority).
///
/// Unparseable values are ignored with a warning rather than failing
/// startup.
fn apply_env_overrides(settings: &mut HotlineSettings) {
    if let Ok(port) = env::var("HOTLINE_HTTP_PORT") {
        match port.parse() {
            Ok(p) => settings.server.http_port = p,
            Err(_) => warn!(value = %port, "ignoring unparseable HOTLINE_HTTP_PORT"),
        }
    }
    if let Ok(url) = env::var("HOTLINE_GAME_SERVER_URL") {
        settings.relay.game_server_url = url;
    }
    if let Ok(ms) = env::var("HOTLINE_CONNECT_TIMEOUT_MS") {
        match ms.parse() {
            Ok(v) => settings.relay.connect_timeout_ms = v,
            Err(_) => warn!(value = %ms, "ignoring unparseable HOTLINE_CONNECT_TIMEOUT_MS"),
        }
    }
    if let Ok(secs) = env::var("HOTLINE_SESSION_MAX_IDLE_SECS") {
        match secs.parse() {
            Ok(v) => settings.session.max_idle_secs = Some(v),
            Err(_) => warn!(value = %secs, "ignoring unparseable HOTLINE_SESSION_MAX_IDLE_SECS"),
        }
    }
    if let Ok(level) = env::var("HOTLINE_LOG_LEVEL") {
        settings.logging.level = level;
    }
}
