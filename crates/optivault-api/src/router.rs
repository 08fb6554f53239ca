use axum::Router;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;

use utoipa::OpenApi as OpenApiT;
use utoipa_swagger_ui::SwaggerUi;

use crate::{AppState, errors::ApiError, handlers};

/// Every route of the API. Swagger UI is served under `/v1/docs`.
pub fn api_router<T: OpenApiT>() -> Router<AppState> {
    let open_api = T::openapi();

    let users_router = Router::new()
        .route("/{address}/metrics", get(handlers::get_user_metrics))
        .route(
            "/{address}/metrics/latest",
            get(handlers::get_latest_user_metrics),
        )
        .route("/{address}/options", get(handlers::get_user_options))
        .route(
            "/{address}/transactions",
            get(handlers::get_user_transaction_history),
        );

    Router::new()
        .route("/health", get(health))
        .nest("/v1/users", users_router)
        .merge(SwaggerUi::new("/v1/docs").url("/v1/docs/openapi.json", open_api))
        .fallback(handler_404)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn handler_404() -> impl IntoResponse {
    ApiError::NotFound("The requested resource was not found".to_string())
}
