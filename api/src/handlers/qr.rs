use axum::{
    Json,
    extract::{Path, State},
};
use tracing::info;
use vouch_common::{VerificationId, views::QrCodeResponse};
use vouch_db::storage::CertificateStore;

use crate::{context::ApiContext, error::ApiError};

/// Codes are produced on demand and never stored, so this can be called any
/// number of times for the same certificate.
#[utoipa::path(
    post,
    path = "/api/generate-qr/{verification_id}",
    tags = ["certificates"],
    params(("verification_id" = String, Path, description = "Verification id of an issued certificate")),
    responses(
        (status = 200, description = "Freshly encoded QR code", body = QrCodeResponse),
        (status = 404, description = "No certificate carries this verification id", body = vouch_common::views::ApiErrorResponse),
    )
)]
pub async fn generate_qr(
    State(ctx): State<ApiContext>,
    Path(verification_id): Path<String>,
) -> Result<Json<QrCodeResponse>, ApiError> {
    let verification_id =
        VerificationId::parse(&verification_id).map_err(|_| ApiError::not_found())?;

    if CertificateStore::get_by_verification_id(&*ctx.db, verification_id)
        .await?
        .is_none()
    {
        return Err(ApiError::not_found());
    }

    let code = ctx.encoder.encode(verification_id)?;
    info!(%verification_id, "Generated verification code");

    Ok(Json(QrCodeResponse {
        qr_code: code.to_data_url(),
        verification_url: code.verification_url,
    }))
}
