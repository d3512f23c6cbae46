#![forbid(unsafe_code)]

//! Newline-delimited JSON action layer over the roster store: one request
//! object per line in, one response envelope per line out.

pub mod advisor;
pub mod config;
mod dispatch;
mod server;
mod support;

pub use dispatch::{action_definitions, dispatch_action};
pub use server::RosterServer;
pub use support::envelope::{envelope_error, envelope_ok};
