//! Input parameters for the various functions within Vouch.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

mod certificate;
pub use certificate::*;

/// Parameters for paginating through a list of records. This is used by the
/// various list endpoints to allow clients to paginate through large sets of
/// records.
#[derive(Debug, Clone, Default, Deserialize, Serialize, IntoParams, ToSchema)]
pub struct PaginationParams {
    /// The next page token, if any. This is acquired by requesting a paginated
    /// set of records and looking at the `next_token` field of the response.
    pub next_token: Option<String>,

    /// The maximum number of results to return.
    pub limit: Option<u64>,
}

impl PaginationParams {
    /// Upper bound on a single page, matching what the certificate listing
    /// has always returned at most.
    pub const MAX_LIMIT: u64 = 1000;

    pub fn limit(&self) -> u64 {
        self.limit
            .unwrap_or(Self::MAX_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }

    /// Number of records to skip, decoded from `next_token`. Unparseable
    /// tokens restart from the beginning.
    pub fn offset(&self) -> u64 {
        self.next_token
            .as_deref()
            .and_then(|t| t.parse().ok())
            .unwrap_or(0)
    }

    /// The token a client should send to fetch the page after one that
    /// returned `returned` records.
    pub fn next_token_after(&self, returned: usize) -> Option<String> {
        if (returned as u64) < self.limit() {
            return None;
        }
        Some((self.offset() + returned as u64).to_string())
    }
}
