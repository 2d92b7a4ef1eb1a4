use axum::{
    Json,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use vouch_common::views::VerificationResult;

use crate::context::ApiContext;

/// A valid certificate never changes and an id is never reissued, so a
/// positive answer can be cached for good. Anything else might change.
const CACHE_VALID: &str = "public, max-age=31536000, immutable";
const CACHE_OTHER: &str = "no-store";

#[utoipa::path(
    get,
    path = "/api/verify/{verification_id}",
    tags = ["verification"],
    params(("verification_id" = String, Path, description = "Identifier printed on the certificate")),
    responses((status = 200, description = "Verification outcome, including for unknown or malformed ids", body = VerificationResult))
)]
pub async fn verify_certificate(
    State(ctx): State<ApiContext>,
    Path(verification_id): Path<String>,
) -> impl IntoResponse {
    let result = ctx.verification.verify(&verification_id).await;
    let cache_control = if result.is_valid {
        CACHE_VALID
    } else {
        CACHE_OTHER
    };

    ([(header::CACHE_CONTROL, cache_control)], Json(result))
}
