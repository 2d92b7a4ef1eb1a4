use axum::{Json, extract::State};
use vouch_common::views::ServiceInfo;

use crate::{context::ApiContext, error::ApiError};

pub mod certificates;
pub mod qr;
pub mod verify;

#[utoipa::path(
    get,
    path = "/api",
    tags = ["meta"],
    responses((status = 200, description = "Service banner", body = ServiceInfo))
)]
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "Certificate Verification API".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

#[utoipa::path(
    get,
    path = "/api/health",
    tags = ["meta"],
    responses((status = 200, description = "Storage is reachable", body = String))
)]
pub async fn health_check(State(ctx): State<ApiContext>) -> Result<&'static str, ApiError> {
    ctx.db.ping().await?;
    Ok("Healthy")
}

#[utoipa::path(
    get,
    path = "/api/roles",
    tags = ["certificates"],
    responses((status = 200, description = "Roles a certificate can be issued for", body = Vec<String>))
)]
pub async fn list_roles(State(ctx): State<ApiContext>) -> Json<Vec<String>> {
    Json(ctx.issuance.roles().iter().map(String::from).collect())
}
