use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};

use optivault_stats::OptionsFilter;

use crate::{
    AppState,
    dto::{ApiResponse, OptionsQuery, UserOption, UserOptionsResponse},
    errors::ApiError,
    helpers::{parse_statuses, parse_wallet, resolve_user},
};

#[utoipa::path(
    get,
    path = "/users/{address}/options",
    tag = "User",
    params(
        ("address" = String, Path, description = "User wallet address"),
        OptionsQuery
    ),
    responses(
        (status = 200, description = "Options of the user, newest first", body = ApiResponse<UserOptionsResponse>),
        (status = 400, description = "Invalid wallet address or status"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_user_options(
    State(state): State<AppState>,
    Path(address): Path<String>,
    Query(query): Query<OptionsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let wallet = parse_wallet(&address)?;
    let statuses = parse_statuses(query.status.as_deref())?;
    let user_id = resolve_user(&state.aggregator, &wallet).await?;

    let filter = OptionsFilter {
        user_id: Some(user_id),
        statuses,
        created_after: None,
    };
    let options = state.aggregator.sources().options.query(&filter).await?;

    let items: Vec<UserOption> = options.into_iter().map(UserOption::from).collect();

    Ok(ApiResponse::ok(UserOptionsResponse {
        address: wallet.to_string(),
        items,
    }))
}
