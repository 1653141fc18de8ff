//! # hotline-session
//!
//! Per-caller session state and the call-session state machine.
//!
//! - [`SessionRegistry`]: process-wide caller→session map. Constructed at
//!   service start and passed by `Arc` into the turn processor (no global
//!   statics); safe for concurrent access across distinct callers.
//! - [`TurnProcessor`]: given one inbound [`Turn`](hotline_core::Turn),
//!   determines the caller's state, applies the transition, drives the
//!   relay as needed, and produces the next [`Directive`]
//!   (hotline_core::Directive).

#![deny(unsafe_code)]

pub mod processor;
pub mod registry;

pub use processor::TurnProcessor;
pub use registry::{Session, SessionRegistry};
