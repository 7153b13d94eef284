//! # Application Module
//!
//! The lookup service and its tree head follower.

pub mod follower;
pub mod service;

pub use service::{LogLookup, RefreshOutcome};
