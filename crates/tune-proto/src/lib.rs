//! Shared data model, configuration and favorites storage for tunescout.

pub mod config;
pub mod favorites;
pub mod model;
pub mod platform;
