use axum::{
    Json, Router,
    extract::State,
    http::{
        HeaderValue, Method,
        header::{CONTENT_TYPE, ORIGIN},
    },
    routing::get,
};
use sea_orm::DatabaseConnection;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::errors::ApiError;
use crate::item::Item;
use crate::openapi::api_doc;
use crate::response::MessageResponse;
use crate::routes;

/// Mount point of the items controller.
pub const ITEMS_PATH: &str = "/api/items";

/// Full application router: the items controller plus health, API docs and
/// a JSON 404 for anything else.
pub fn build_app(db: &DatabaseConnection, config: &ServerConfig) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .with_state(db.clone())
        .nest(ITEMS_PATH, routes::router::<Item>(db))
        .fallback(route_not_found)
        .layer(cors_layer(&config.cors_origins))
        .layer(TraceLayer::new_for_http())
}

async fn health(State(db): State<DatabaseConnection>) -> Result<Json<MessageResponse>, ApiError> {
    db.ping().await?;
    Ok(Json(MessageResponse::success("ok")))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(api_doc())
}

async fn route_not_found() -> ApiError {
    ApiError::not_found("route", None)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([CONTENT_TYPE, ORIGIN])
}
