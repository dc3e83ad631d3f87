//! tune-front — search-and-preview coordination for the tunescout front-end.
//!
//! Everything mutable lives in [`core::SearchCore`]; the other modules are the
//! synchronous pieces it drives.

pub mod action;
pub mod bridge;
pub mod catalog;
pub mod core;
pub mod debounce;
pub mod favorites;
pub mod focus;
pub mod panel;
pub mod preview;
pub mod search;
pub mod snapshot;
