//! # hotline-server
//!
//! The inbound gateway: an axum HTTP server receiving the telephony
//! provider's per-keypress callbacks.
//!
//! Routes:
//! - `GET /voice` — one callback per gathered keypress; the response is
//!   voice markup (TwiML) telling the provider what to say and whether to
//!   gather another keypress.
//! - `GET /check` — liveness probe.
//! - `GET /metrics` — Prometheus text exposition.

#![deny(unsafe_code)]

pub mod metrics;
pub mod server;
pub mod twiml;

pub use server::{AppState, HotlineServer};
