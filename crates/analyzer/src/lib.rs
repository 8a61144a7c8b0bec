//! Defect analysis client library (PRD-42).
//!
//! Wraps the external defect-detection service behind the
//! [`DefectAnalyzer`] trait: one call per frame, bounded timeout, typed
//! verdict parsing with range validation at the boundary. Malformed
//! responses surface as [`AnalyzerError::InvalidPayload`] instead of
//! leaking unchecked values into aggregation.

pub mod client;
pub mod error;
pub mod verdict;

pub use client::{DefectAnalyzer, HttpAnalyzer};
pub use error::AnalyzerError;
pub use verdict::AnalysisVerdict;
