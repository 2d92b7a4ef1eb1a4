use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use vouch_common::{
    params::{CreateCertificateParams, PaginationParams},
    views::{Certificate, PaginatedList},
};
use vouch_db::{
    models::CertificateKey,
    storage::{CertificateFilter, CertificateStore},
};

use crate::{context::ApiContext, error::ApiError};

#[utoipa::path(
    post,
    path = "/api/certificates",
    tags = ["certificates"],
    request_body(content = CreateCertificateParams, content_type = "application/json"),
    responses(
        (status = 201, description = "Issued certificate", body = Certificate),
        (status = 400, description = "Request failed validation", body = vouch_common::views::ApiErrorResponse),
    )
)]
pub async fn create_certificate(
    State(ctx): State<ApiContext>,
    Json(body): Json<CreateCertificateParams>,
) -> Result<(StatusCode, Json<Certificate>), ApiError> {
    let cert = ctx.issuance.issue(body).await?;
    Ok((StatusCode::CREATED, Json(cert)))
}

#[utoipa::path(
    get,
    path = "/api/certificates",
    tags = ["certificates"],
    params(PaginationParams),
    responses((status = 200, description = "Certificates in issuance order", body = PaginatedList<Certificate>))
)]
pub async fn list_certificates(
    State(ctx): State<ApiContext>,
    Query(query): Query<PaginationParams>,
) -> Result<Json<PaginatedList<Certificate>>, ApiError> {
    let certs =
        CertificateStore::list(&*ctx.db, CertificateFilter::default(), query.clone()).await?;

    Ok(Json(PaginatedList {
        next_token: query.next_token_after(certs.len()),
        limit: Some(query.limit()),
        items: certs.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/certificates/{id}",
    tags = ["certificates"],
    params(("id" = String, Path, description = "Internal certificate id (ULID)")),
    responses(
        (status = 200, description = "Resolved certificate", body = Certificate),
        (status = 404, description = "No such certificate", body = vouch_common::views::ApiErrorResponse),
    )
)]
pub async fn get_certificate(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<Certificate>, ApiError> {
    let id = CertificateKey::parse(&id).ok_or_else(ApiError::not_found)?;

    match CertificateStore::get(&*ctx.db, id).await? {
        Some(cert) => Ok(Json(cert.into())),
        None => Err(ApiError::not_found()),
    }
}
