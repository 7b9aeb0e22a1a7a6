//! Grow automation: stage-based care calendars, device on/off decisions
//! and grow-light placement.

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod logic;
pub mod models;

pub use error::{GrowOpsError, Result};
