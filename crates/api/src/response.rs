//! Response envelope shared by every JSON handler.
//!
//! Success bodies are always `{ "data": ... }`, mirroring the
//! `{ "error", "code" }` shape that [`AppError`](crate::error::AppError)
//! produces on failure, so clients can branch on the top-level key.

use serde::Serialize;

/// Serializes as `{ "data": <payload> }`.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
