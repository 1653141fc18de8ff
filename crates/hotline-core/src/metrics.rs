//! Metric name constants, shared so emit sites and dashboards can't drift.

/// Inbound voice turns total (counter).
pub const TURNS_TOTAL: &str = "turns_total";
/// Game-server connections dialed total (counter).
pub const RELAY_CONNECTS_TOTAL: &str = "relay_connects_total";
/// Relay delivery failures total (counter).
pub const RELAY_ERRORS_TOTAL: &str = "relay_errors_total";
/// Sessions removed at caller request total (counter).
pub const SESSIONS_REMOVED_TOTAL: &str = "sessions_removed_total";
/// Live caller sessions (gauge).
pub const SESSIONS_ACTIVE: &str = "sessions_active";
