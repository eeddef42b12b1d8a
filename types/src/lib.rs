//! Shared data types for the arcade games.
//!
//! Everything in this crate is plain data: configuration, per-round outcomes and the
//! records persisted between sessions. The sampling logic that produces outcomes lives in
//! `arcade-execution`.

pub mod games;

pub use games::*;
