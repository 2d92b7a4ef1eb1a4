//! Output views for the various functions within Vouch.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

mod certificate;
pub use certificate::*;

mod qr;
pub use qr::*;

mod verification;
pub use verification::*;

/// A page of records returned by a list endpoint.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct PaginatedList<T> {
    pub items: Vec<T>,

    /// The next page token, if any. Pass it back as `next_token` to fetch the
    /// following page.
    pub next_token: Option<String>,

    /// The maximum number of results that were requested.
    pub limit: Option<u64>,
}

/// An error response for an API endpoint. This is used to return errors to the
/// client in a consistent format.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ApiErrorResponse {
    /// An optional error code that can be used to identify the type of error
    /// that occurred.
    pub code: Option<String>,

    /// A human-readable message describing the error that occurred.
    pub message: String,

    /// Per-field problems, present when a request failed validation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldIssue>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// One problem with one field of a request body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct FieldIssue {
    pub field: String,
    pub reason: String,
}

/// Banner returned from the API root.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ServiceInfo {
    pub message: String,
    pub version: String,
}
