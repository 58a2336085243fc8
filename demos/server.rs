//! REST API server example for the banking ledger.
//!
//! Run with: `cargo run --example server`
//!
//! The identity service sits in front of this surface in a real deployment:
//! it verifies the session token and forwards the `(user id, role)` pair.
//! Here that pair arrives as plain `x-user-id` / `x-user-role` headers so
//! the boundary can be exercised directly.
//!
//! ## Endpoints
//!
//! - `POST /api/transactions/deposit` - Deposit into an account (customer)
//! - `POST /api/transactions/withdraw` - Withdraw from an owned account (customer)
//! - `POST /api/transactions/transfer` - Transfer from an owned account (customer)
//! - `GET /api/accounts/{number}/transactions` - List own transactions (customer)
//! - `GET /api/transactions` - List all transactions (admin)
//! - `PUT /api/accounts/{number}/status` - Activate/deactivate an account (admin)
//!
//! ## Example Usage
//!
//! ```bash
//! # Deposit
//! curl -X POST http://localhost:3000/api/transactions/deposit \
//!   -H "Content-Type: application/json" \
//!   -H "x-user-id: 1" -H "x-user-role: customer" \
//!   -d '{"account_number": 1111111111, "amount": 500}'
//!
//! # Transfer
//! curl -X POST http://localhost:3000/api/transactions/transfer \
//!   -H "Content-Type: application/json" \
//!   -H "x-user-id: 1" -H "x-user-role: customer" \
//!   -d '{"account_number": 1111111111, "dest_account_number": 2222222222, "amount": 300000}'
//!
//! # Audit (admin only)
//! curl http://localhost:3000/api/transactions \
//!   -H "x-user-id: 9" -H "x-user-role: admin"
//! ```

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use bank_ledger_rs::{
    Account, AccountNumber, DepositRequest, LedgerEngine, LedgerError, LedgerService,
    ListTransactionsRequest, Role, Session, SetAccountStatusRequest, Transaction,
    TransferRequest, UserId, WithdrawRequest,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;

// === Request/Response DTOs ===

/// Body for the account status endpoint; the account number rides in the path.
#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub active: bool,
}

/// Response body for errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

// === Application State ===

/// Shared application state containing the ledger service.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<LedgerService>,
}

// === Session Extraction ===

/// Reads the verified identity pair forwarded by the identity service.
fn session_from_headers(headers: &HeaderMap) -> Result<Session, AppError> {
    let user_id = headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .ok_or(AppError::MissingSession)?;

    let role = match headers.get("x-user-role").and_then(|v| v.to_str().ok()) {
        Some("admin") => Role::Admin,
        Some("customer") => Role::Customer,
        _ => return Err(AppError::MissingSession),
    };

    Ok(Session::new(UserId(user_id), role))
}

// === Error Handling ===

/// Wrapper for converting ledger errors into HTTP responses.
pub enum AppError {
    MissingSession,
    Ledger(LedgerError),
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        AppError::Ledger(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::MissingSession => (
                StatusCode::UNAUTHORIZED,
                "MISSING_SESSION",
                "missing or malformed session headers".to_string(),
            ),
            AppError::Ledger(err) => {
                let (status, code) = match err {
                    LedgerError::InvalidAmount => (StatusCode::BAD_REQUEST, "INVALID_AMOUNT"),
                    LedgerError::SameAccount => (StatusCode::BAD_REQUEST, "SAME_ACCOUNT"),
                    LedgerError::AccountNotFound(_) => {
                        (StatusCode::NOT_FOUND, "ACCOUNT_NOT_FOUND")
                    }
                    LedgerError::AccountInactive(_) => {
                        (StatusCode::FORBIDDEN, "ACCOUNT_INACTIVE")
                    }
                    LedgerError::InsufficientFunds => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "INSUFFICIENT_FUNDS")
                    }
                    LedgerError::Unauthorized { .. } => (StatusCode::FORBIDDEN, "UNAUTHORIZED"),
                    LedgerError::NotAccountOwner(_) => {
                        (StatusCode::FORBIDDEN, "NOT_ACCOUNT_OWNER")
                    }
                    LedgerError::AccountExists(_) => (StatusCode::CONFLICT, "ACCOUNT_EXISTS"),
                    LedgerError::BalanceOverflow => {
                        // Internal class: logged at the engine, surfaced
                        // without detail.
                        return (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            Json(ErrorResponse {
                                error: "internal ledger failure".to_string(),
                                code: "INTERNAL".to_string(),
                            }),
                        )
                            .into_response();
                    }
                };
                (status, code, err.to_string())
            }
        };

        (
            status,
            Json(ErrorResponse {
                error: message,
                code: code.to_string(),
            }),
        )
            .into_response()
    }
}

// === Handlers ===

/// POST /api/transactions/deposit
async fn deposit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<DepositRequest>,
) -> Result<Json<Account>, AppError> {
    let session = session_from_headers(&headers)?;
    let account = state.service.deposit(&session, request)?;
    Ok(Json(account))
}

/// POST /api/transactions/withdraw
async fn withdraw(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<WithdrawRequest>,
) -> Result<Json<Account>, AppError> {
    let session = session_from_headers(&headers)?;
    let account = state.service.withdraw(&session, request)?;
    Ok(Json(account))
}

/// POST /api/transactions/transfer
async fn transfer(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<TransferRequest>,
) -> Result<(StatusCode, Json<Transaction>), AppError> {
    let session = session_from_headers(&headers)?;
    let transaction = state.service.transfer(&session, request)?;
    Ok((StatusCode::CREATED, Json(transaction.as_ref().clone())))
}

/// GET /api/accounts/{number}/transactions
async fn list_own_transactions(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(number): Path<u64>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let session = session_from_headers(&headers)?;
    let transactions = state.service.list_own_transactions(
        &session,
        ListTransactionsRequest {
            account_number: AccountNumber(number),
        },
    )?;
    Ok(Json(
        transactions.iter().map(|tx| tx.as_ref().clone()).collect(),
    ))
}

/// GET /api/transactions
async fn list_all_transactions(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let session = session_from_headers(&headers)?;
    let transactions = state.service.list_all_transactions(&session)?;
    Ok(Json(
        transactions.iter().map(|tx| tx.as_ref().clone()).collect(),
    ))
}

/// PUT /api/accounts/{number}/status
async fn set_account_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(number): Path<u64>,
    Json(body): Json<StatusBody>,
) -> Result<Json<Account>, AppError> {
    let session = session_from_headers(&headers)?;
    let account = state.service.set_account_status(
        &session,
        SetAccountStatusRequest {
            account_number: AccountNumber(number),
            active: body.active,
        },
    )?;
    Ok(Json(account))
}

// === Router ===

fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/transactions/deposit", post(deposit))
        .route("/api/transactions/withdraw", post(withdraw))
        .route("/api/transactions/transfer", post(transfer))
        .route("/api/transactions", get(list_all_transactions))
        .route(
            "/api/accounts/{number}/transactions",
            get(list_own_transactions),
        )
        .route("/api/accounts/{number}/status", put(set_account_status))
        .with_state(state)
}

// === Main ===

#[tokio::main]
async fn main() {
    let engine = LedgerEngine::in_memory();

    // Demo accounts; real provisioning happens in the account-opening flow.
    engine
        .store()
        .register(Account::new(AccountNumber(1111111111), UserId(1), 1_000_000))
        .unwrap();
    engine
        .store()
        .register(Account::new(AccountNumber(2222222222), UserId(2), 500_000))
        .unwrap();

    let state = AppState {
        service: Arc::new(LedgerService::new(engine)),
    };

    let app = create_router(state);

    let listener = TcpListener::bind("127.0.0.1:3000").await.unwrap();
    println!("Bank ledger API server running on http://127.0.0.1:3000");
    println!();
    println!("Endpoints:");
    println!("  POST /api/transactions/deposit              - Deposit (customer)");
    println!("  POST /api/transactions/withdraw             - Withdraw (customer)");
    println!("  POST /api/transactions/transfer             - Transfer (customer)");
    println!("  GET  /api/accounts/:number/transactions     - Own transactions (customer)");
    println!("  GET  /api/transactions                      - All transactions (admin)");
    println!("  PUT  /api/accounts/:number/status           - Account status (admin)");

    axum::serve(listener, app).await.unwrap();
}
