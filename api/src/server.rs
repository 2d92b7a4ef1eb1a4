use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    extract::MatchedPath,
    http::{HeaderName, HeaderValue, Request},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info_span;
use utoipa::{
    PartialSchema, ToSchema,
    openapi::{Contact, Info, License, OpenApi, RefOr, path::Operation},
};
use utoipa_axum::{router::OpenApiRouter, routes};
use vouch_common::views::ApiErrorResponse;
use vouch_db::storage::Storage;

use crate::{config::VouchApiConfig, context::ApiContext, handlers};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Build the API router and its OpenAPI document.
///
/// # Errors
///
/// Fails if the role catalog can't be loaded or the public URL is not a valid
/// CORS origin.
pub fn make(cfg: VouchApiConfig, db: Arc<dyn Storage>) -> anyhow::Result<(Router, OpenApi)> {
    let allowed_origin = cfg
        .public_url
        .parse::<HeaderValue>()
        .with_context(|| format!("Public URL {:?} is not a valid origin", cfg.public_url))?;

    let context = ApiContext::new(cfg, db)?;

    let x_request_id = HeaderName::from_static(REQUEST_ID_HEADER);
    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(
            x_request_id.clone(),
            MakeRequestUuid,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &Request<_>| {
                    // Log the request ID as generated
                    let request_id = req
                        .headers()
                        .get(REQUEST_ID_HEADER)
                        .and_then(|v| v.to_str().ok());
                    let span = info_span!(
                        "http_request",
                        method = req.method().to_string(),
                        request_id = Option::<&str>::None,
                        path = Option::<&str>::None,
                    );

                    if let Some(request_id) = request_id {
                        span.record("request_id", request_id);
                    };

                    if let Some(path) = req.extensions().get::<MatchedPath>() {
                        span.record("path", path.as_str())
                    } else {
                        span.record("path", req.uri().path())
                    };

                    span
                }),
        )
        .layer(
            CorsLayer::new()
                .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
                .allow_headers([axum::http::header::CONTENT_TYPE])
                .allow_origin(allowed_origin),
        )
        .layer(PropagateRequestIdLayer::new(x_request_id));

    let openapi = OpenApi::builder()
        .info(
            Info::builder()
                .title("Vouch API Reference")
                .description(Some(
                    "Issue internship completion certificates and verify them by their public id.",
                ))
                .version(env!("CARGO_PKG_VERSION"))
                .license(Some(
                    License::builder()
                        .name("Apache 2.0 License")
                        .identifier(Some(env!("CARGO_PKG_LICENSE")))
                        .build(),
                ))
                .contact(Some(Contact::builder().name(Some("Vouch maintainers")).build())),
        )
        .build();

    let (r, mut a) = OpenApiRouter::with_openapi(openapi)
        .routes(routes!(handlers::root))
        .routes(routes!(handlers::health_check))
        .routes(routes!(handlers::list_roles))
        .routes(routes!(
            handlers::certificates::create_certificate,
            handlers::certificates::list_certificates
        ))
        .routes(routes!(handlers::certificates::get_certificate))
        .routes(routes!(handlers::qr::generate_qr))
        .routes(routes!(handlers::verify::verify_certificate))
        .layer(middleware)
        .with_state(context)
        .split_for_parts();

    register_error_schemas(&mut a);

    a.paths.paths.iter_mut().for_each(|(_path, item)| {
        apply_default_errors(&mut item.get);
        apply_default_errors(&mut item.post);
        apply_default_errors(&mut item.patch);
        apply_default_errors(&mut item.put);
        apply_default_errors(&mut item.delete);
        apply_default_errors(&mut item.trace);
        apply_default_errors(&mut item.head);
        apply_default_errors(&mut item.options);
    });

    Ok((r, a))
}

/// The default error responses reference [`ApiErrorResponse`] by name, so it
/// must be present in the components even when no handler names it directly.
fn register_error_schemas(api: &mut OpenApi) {
    let mut schemas = Vec::new();
    ApiErrorResponse::schemas(&mut schemas);
    schemas.push((
        ApiErrorResponse::name().into_owned(),
        ApiErrorResponse::schema(),
    ));

    let components = api.components.get_or_insert_with(Default::default);
    for (name, schema) in schemas {
        components.schemas.entry(name).or_insert(schema);
    }
}

fn apply_default_errors(item: &mut Option<Operation>) {
    if let Some(item) = item {
        item.responses.responses.entry("500".into()).or_insert_with(|| {
            RefOr::Ref(
                utoipa::openapi::Ref::builder()
                    .summary("Internal server error")
                    .ref_location_from_schema_name(ApiErrorResponse::name())
                    .build(),
            )
        });

        item.responses.responses.entry("503".into()).or_insert_with(|| {
            RefOr::Ref(
                utoipa::openapi::Ref::builder()
                    .summary("Storage unavailable, try again later")
                    .ref_location_from_schema_name(ApiErrorResponse::name())
                    .build(),
            )
        });
    }
}
