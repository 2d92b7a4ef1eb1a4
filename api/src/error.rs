use axum::{Json, http::StatusCode, response::IntoResponse};
use thiserror::Error;
use vouch_common::views::ApiErrorResponse;
use vouch_db::storage::StoreError;
use vouch_render::RenderError;

use crate::services::{IdGenerationError, IssuanceError, ValidationError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found")]
    NotFound,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StoreError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    IdGeneration(#[from] IdGenerationError),

    #[error(transparent)]
    InternalAnyhow(#[from] anyhow::Error),
}

impl ApiError {
    pub fn not_found() -> Self {
        Self::NotFound
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Storage(se) => match se {
                // Only reachable once issuance has given up redrawing.
                StoreError::DuplicateVerificationId(_) => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::SERVICE_UNAVAILABLE,
            },
            Self::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IdGeneration(_) | Self::InternalAnyhow(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<IssuanceError> for ApiError {
    fn from(err: IssuanceError) -> Self {
        match err {
            IssuanceError::Validation(e) => Self::Validation(e),
            IssuanceError::IdGeneration(e) => Self::IdGeneration(e),
            IssuanceError::Storage(e) => Self::Storage(e),
        }
    }
}

impl From<ApiError> for ApiErrorResponse {
    fn from(err: ApiError) -> Self {
        let (code, message) = match &err {
            ApiError::NotFound => ("NotFound", "The requested resource was not found."),
            ApiError::Validation(_) => (
                "ValidationFailed",
                "The request is invalid. See `fields` for details.",
            ),
            ApiError::Storage(StoreError::DuplicateVerificationId(_))
            | ApiError::IdGeneration(_)
            | ApiError::InternalAnyhow(_) => (
                "InternalError",
                "Something went wrong on our end. Please try again later.",
            ),
            ApiError::Storage(_) => (
                "ServiceUnavailable",
                "The service is temporarily unavailable. Please try again later.",
            ),
            ApiError::Render(_) => (
                "RenderFailed",
                "The certificate could not be rendered. Please try again later.",
            ),
        };

        let fields = match &err {
            ApiError::Validation(e) => e.issues.clone(),
            _ => Vec::new(),
        };

        ApiErrorResponse {
            code: Some(code.into()),
            message: message.into(),
            fields,

            #[cfg(debug_assertions)]
            details: Some(err.to_string()),

            #[cfg(not(debug_assertions))]
            details: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status_code = self.status_code();
        if status_code.is_server_error() {
            tracing::error!("Error returned by handler: {self}");
        } else {
            tracing::debug!("Request rejected: {self}");
        }

        (status_code, Json(Into::<ApiErrorResponse>::into(self))).into_response()
    }
}
