//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase", default)]` so a partial
//! JSON file is valid — missing fields get their compiled default.

use serde::{Deserialize, Serialize};

/// Root settings type for the hotline bridge.
///
/// Loaded from `~/.hotline/settings.json` with defaults applied for missing
/// fields; `HOTLINE_*` environment variables override specific values.
///
/// # JSON Format
///
/// ```json
/// {
///   "server": { "httpPort": 8080 },
///   "relay": { "gameServerUrl": "ws://localhost:8081" }
/// }
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HotlineSettings {
    /// Settings schema version.
    pub version: String,
    /// Application name.
    pub name: String,
    /// Inbound HTTP gateway settings.
    pub server: ServerSettings,
    /// Outbound game-server relay settings.
    pub relay: RelaySettings,
    /// Session registry settings.
    pub session: SessionSettings,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

impl Default for HotlineSettings {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            name: "hotline".to_string(),
            server: ServerSettings::default(),
            relay: RelaySettings::default(),
            session: SessionSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl HotlineSettings {
    /// Correct invalid values in place rather than rejecting the file, so
    /// users get working behavior instead of a confusing startup error.
    pub fn validate(&mut self) {
        if self.relay.connect_timeout_ms == 0 {
            tracing::warn!("relay.connectTimeoutMs of 0 is invalid, using 5000");
            self.relay.connect_timeout_ms = 5_000;
        }
        if self.session.sweep_interval_secs == 0 {
            tracing::warn!("session.sweepIntervalSecs of 0 is invalid, using 60");
            self.session.sweep_interval_secs = 60;
        }
    }
}

/// Inbound HTTP gateway settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSettings {
    /// Port the provider-callback HTTP server listens on.
    pub http_port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { http_port: 8080 }
    }
}

/// Outbound game-server relay settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RelaySettings {
    /// Base WebSocket URL of the game server. The per-caller path
    /// `/ws/{caller_id}` is appended per connection.
    pub game_server_url: String,
    /// Bound on how long a connection attempt may take before it surfaces
    /// as a relay failure.
    pub connect_timeout_ms: u64,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            game_server_url: "ws://localhost:8081".to_string(),
            connect_timeout_ms: 5_000,
        }
    }
}

/// Session registry settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionSettings {
    /// Evict sessions idle longer than this. `None` (the default) disables
    /// eviction entirely: sessions live until the caller removes them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_idle_secs: Option<u64>,
    /// How often the reaper wakes when eviction is enabled.
    pub sweep_interval_secs: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            max_idle_secs: None,
            sweep_interval_secs: 60,
        }
    }
}

/// Logging configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Default log filter when `HOTLINE_LOG`/`RUST_LOG` are unset.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_observed_deployment() {
        let s = HotlineSettings::default();
        assert_eq!(s.server.http_port, 8080);
        assert_eq!(s.relay.game_server_url, "ws://localhost:8081");
        assert_eq!(s.relay.connect_timeout_ms, 5_000);
        assert_eq!(s.session.max_idle_secs, None);
        assert_eq!(s.logging.level, "info");
    }

    #[test]
    fn partial_json_fills_defaults() {
        let s: HotlineSettings =
            serde_json::from_str(r#"{"server": {"httpPort": 9090}}"#).unwrap();
        assert_eq!(s.server.http_port, 9090);
        assert_eq!(s.relay.game_server_url, "ws://localhost:8081");
    }

    #[test]
    fn validate_corrects_zero_timeout() {
        let mut s = HotlineSettings::default();
        s.relay.connect_timeout_ms = 0;
        s.session.sweep_interval_secs = 0;
        s.validate();
        assert_eq!(s.relay.connect_timeout_ms, 5_000);
        assert_eq!(s.session.sweep_interval_secs, 60);
    }

    #[test]
    fn camel_case_field_names_on_the_wire() {
        let json = serde_json::to_value(HotlineSettings::default()).unwrap();
        assert!(json["server"]["httpPort"].is_number());
        assert!(json["relay"]["gameServerUrl"].is_string());
        assert!(json["relay"]["connectTimeoutMs"].is_number());
    }
}
