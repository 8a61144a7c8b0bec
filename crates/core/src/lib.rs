//! Domain types and pure logic for the Argus inspection platform.
//!
//! Everything in this crate is side-effect free: lifecycle transition rules,
//! capture configuration validation, streaming statistics, and report
//! building. Runtime concerns (timers, persistence, HTTP) live in the
//! `argus-session`, `argus-db`, and `argus-api` crates.

pub mod capture;
pub mod error;
pub mod event_names;
pub mod lifecycle;
pub mod numeric;
pub mod report;
pub mod severity;
pub mod stats;
pub mod types;
