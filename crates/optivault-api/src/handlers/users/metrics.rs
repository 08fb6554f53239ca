use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use chrono::Utc;

use optivault_stats::MetricsState;

use crate::{
    AppState,
    dto::{ApiResponse, LatestMetricsQuery, MetricsQuery, VaultMetricsResponse},
    errors::ApiError,
    helpers::{parse_session, parse_wallet},
};

#[utoipa::path(
    get,
    path = "/users/{address}/metrics",
    tag = "User",
    params(
        ("address" = String, Path, description = "User wallet address"),
        MetricsQuery
    ),
    responses(
        (status = 200, description = "Vault metrics published for the wallet", body = ApiResponse<VaultMetricsResponse>),
        (status = 400, description = "Invalid wallet address or session id"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_user_metrics(
    State(state): State<AppState>,
    Path(address): Path<String>,
    Query(query): Query<MetricsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let wallet = parse_wallet(&address)?;
    let as_of = Utc::now();

    // Unknown wallets and failed reads yield zeroed metrics, never an error.
    let Some(session) = query.session.as_deref() else {
        let metrics = state.aggregator.compute(wallet.as_str(), as_of).await;
        let fresh = MetricsState {
            trigger: query.trigger.unwrap_or_default(),
            metrics,
            loading: false,
            as_of: Some(as_of),
        };
        return Ok(ApiResponse::ok(VaultMetricsResponse::from_state(
            wallet.to_string(),
            fresh,
        )));
    };

    let session = parse_session(session)?;
    let board = state.boards.board(&wallet, &session).await;
    let trigger = query
        .trigger
        .unwrap_or_else(|| board.latest().trigger.saturating_add(1));
    let published = board
        .refresh(&state.aggregator, &wallet, trigger, as_of)
        .await;

    Ok(ApiResponse::ok(VaultMetricsResponse::from_state(
        wallet.to_string(),
        published,
    )))
}

#[utoipa::path(
    get,
    path = "/users/{address}/metrics/latest",
    tag = "User",
    params(
        ("address" = String, Path, description = "User wallet address"),
        LatestMetricsQuery
    ),
    responses(
        (status = 200, description = "Last metrics published for the session, zeroed if never computed", body = ApiResponse<VaultMetricsResponse>),
        (status = 400, description = "Invalid wallet address, missing or invalid session id")
    )
)]
pub async fn get_latest_user_metrics(
    State(state): State<AppState>,
    Path(address): Path<String>,
    Query(query): Query<LatestMetricsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let wallet = parse_wallet(&address)?;
    let session = query
        .session
        .as_deref()
        .ok_or_else(|| ApiError::BadRequest("A session id is required".to_string()))
        .and_then(parse_session)?;

    let published = match state.boards.get(&wallet, &session).await {
        Some(board) => board.latest(),
        None => MetricsState::default(),
    };

    Ok(ApiResponse::ok(VaultMetricsResponse::from_state(
        wallet.to_string(),
        published,
    )))
}
