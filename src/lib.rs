//! Offline-first core of a verse-of-the-day application.
//!
//! `daily-verse-core` provides the deterministic daily selector (a calendar
//! day always maps to the same item of a fixed list) and the offline cache
//! manager (cache-first request handling, versioned cache generations,
//! install/activate lifecycle). Presentation is left to the caller.

pub mod app;
pub mod cache;
pub mod config;
pub mod content;
pub mod logging;
pub mod schedule;
pub mod selection;
pub mod types;
pub mod worker;
