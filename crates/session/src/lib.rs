//! Real-time inspection session engine (PRD-41).
//!
//! Owns the life of a session from device acquisition to final report
//! input: the lifecycle controller ([`runtime`]), the periodic capture
//! loop ([`scheduler`]), the one-in-flight submission pipeline
//! ([`pipeline`]), the streaming statistics aggregator ([`aggregator`])
//! and the top-level [`manager`] that the API layer talks to.
//!
//! Persistence and analysis are collaborators behind traits
//! ([`store::SessionStore`], `argus_analyzer::DefectAnalyzer`,
//! [`source::CameraGateway`]) so the engine can run against fakes in
//! tests and against Postgres + the analysis service in production.

pub mod aggregator;
pub mod error;
pub mod manager;
pub mod pipeline;
pub mod runtime;
pub mod scheduler;
pub mod source;
pub mod store;

pub use error::{EngineError, StoreError};
pub use manager::SessionManager;
