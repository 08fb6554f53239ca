use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};

use crate::{
    AppState,
    dto::{ApiResponse, TransactionsQuery, UserTransaction, UserTransactionHistory},
    errors::ApiError,
    helpers::{clamp_limit, parse_wallet, resolve_user},
};

#[utoipa::path(
    get,
    path = "/users/{address}/transactions",
    tag = "User",
    params(
        ("address" = String, Path, description = "User wallet address"),
        TransactionsQuery
    ),
    responses(
        (status = 200, description = "User deposits and withdrawals, newest first", body = ApiResponse<UserTransactionHistory>),
        (status = 400, description = "Invalid wallet address"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_user_transaction_history(
    State(state): State<AppState>,
    Path(address): Path<String>,
    Query(query): Query<TransactionsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let wallet = parse_wallet(&address)?;
    let limit = clamp_limit(query.limit);
    let user_id = resolve_user(&state.aggregator, &wallet).await?;

    let entries = state
        .aggregator
        .sources()
        .ledger
        .history(user_id, limit)
        .await?;

    let items: Vec<UserTransaction> = entries.into_iter().map(UserTransaction::from).collect();

    Ok(ApiResponse::ok(UserTransactionHistory {
        address: wallet.to_string(),
        items,
    }))
}
