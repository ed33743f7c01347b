//! Account endpoint handlers
//!
//! Every handler is a thin boundary: it parses the request, looks up
//! the operation's transaction profile and runs the matching unit of
//! work through the retry coordinator, which starts outside any
//! transaction.

use std::str::FromStr;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use rust_decimal::Decimal;

use super::state::{AppState, ops};
use super::types::{ApiError, ApiResult, PageParams, TransferRequest, ok};
use crate::bank::{Account, AccountType, BankService};
use crate::txn::{TxnContext, retry};

/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> ApiResult<&'static str> {
    state
        .db
        .health_check()
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;
    ok("ok")
}

/// GET /account — paged listing, name-ascending.
pub async fn list_accounts(
    State(state): State<Arc<AppState>>,
    Query(page): Query<PageParams>,
) -> ApiResult<Vec<Account>> {
    if page.page < 0 || page.size <= 0 {
        return Err(ApiError::bad_request("page must be >= 0 and size > 0"));
    }

    let profile = state.hints.lookup(ops::LIST);
    let accounts = retry::execute(TxnContext::new(), ops::LIST, profile.boundary, || {
        BankService::list_accounts(
            state.db.pool(),
            &state.application_name,
            &profile.hints,
            page.page * page.size,
            page.size,
        )
    })
    .await?;

    ok(accounts)
}

/// GET /account/{id}
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Account> {
    let profile = state.hints.lookup(ops::GET);
    let account = retry::execute(TxnContext::new(), ops::GET, profile.boundary, || {
        BankService::get_account(state.db.pool(), &state.application_name, &profile.hints, id)
    })
    .await?;

    ok(account)
}

/// GET /account/{id}/balance — the path parameter is the account name;
/// returns the aggregate balance as plain decimal text.
pub async fn get_balance(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<String, ApiError> {
    let profile = state.hints.lookup(ops::BALANCE);
    let balance = retry::execute(TxnContext::new(), ops::BALANCE, profile.boundary, || {
        BankService::get_balance(
            state.db.pool(),
            &state.application_name,
            &profile.hints,
            &name,
        )
    })
    .await?;

    Ok(balance.to_string())
}

/// POST /account/transfer
pub async fn transfer(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TransferRequest>,
) -> ApiResult<()> {
    let account_type =
        AccountType::from_str(&req.account_type).map_err(ApiError::bad_request)?;
    let amount = Decimal::from_str(&req.amount)
        .map_err(|_| ApiError::bad_request(format!("invalid amount: {}", req.amount)))?;

    let profile = state.hints.lookup(ops::TRANSFER);
    retry::execute(TxnContext::new(), ops::TRANSFER, profile.boundary, || {
        BankService::transfer(
            state.db.pool(),
            &state.application_name,
            &profile.hints,
            &state.chaos,
            &req.name,
            account_type,
            amount,
        )
    })
    .await?;

    ok(())
}

/// POST /account/reset — reset all balances to the starting value.
pub async fn reset(State(state): State<Arc<AppState>>) -> ApiResult<()> {
    let profile = state.hints.lookup(ops::RESET);
    retry::execute(TxnContext::new(), ops::RESET, profile.boundary, || {
        BankService::reset(state.db.pool(), &state.application_name, &profile.hints)
    })
    .await?;

    ok(())
}
