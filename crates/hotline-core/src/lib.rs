//! # hotline-core
//!
//! Foundation types for the hotline DTMF-to-game bridge.
//!
//! This crate provides the shared vocabulary that all other hotline crates
//! depend on:
//!
//! - **Branded IDs**: [`ids::CallerId`], [`ids::GameCode`] as newtypes
//! - **Keypad**: [`keypad::Direction`] and the fixed digit→direction table
//! - **Wire protocol**: [`protocol::GameMessage`] tagged envelopes sent to
//!   the game server
//! - **Turn I/O**: [`turn::Turn`] (one inbound keypress cycle) and
//!   [`directive::Directive`] (what to say/do next in the call)
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by all other hotline crates.

#![deny(unsafe_code)]

pub mod directive;
pub mod ids;
pub mod keypad;
pub mod metrics;
pub mod protocol;
pub mod turn;

pub use directive::{Directive, Prompt};
pub use ids::{CallerId, GameCode};
pub use keypad::{CANCEL_MARKER, Direction};
pub use protocol::GameMessage;
pub use turn::Turn;
