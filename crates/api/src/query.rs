//! Query parameter types shared across handler modules.

use serde::Deserialize;

/// `?limit=&offset=` pagination, accepted by every list endpoint.
///
/// Both values pass through to the repository, which clamps them to its
/// own defaults and caps; handlers never interpret them.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
