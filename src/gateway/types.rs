//! API response types and error codes
//!
//! - `ApiResponse<T>`: unified response wrapper (code 0 = success)
//! - `error_codes`: standard error code constants
//! - `ApiError`: handler error mapped to an HTTP status + wrapped body

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::bank::BankError;
use crate::txn::RetryError;

/// Unified API response wrapper
///
/// - code: 0 = success, non-zero = error code
/// - msg: short message description
/// - data: actual data (success) or absent (error)
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: 0,
            msg: "ok".to_string(),
            data: Some(data),
        }
    }

    pub fn error(code: i32, msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            code,
            msg: msg.into(),
            data: None,
        }
    }
}

/// Standard API error codes
pub mod error_codes {
    pub const SUCCESS: i32 = 0;

    // Client errors (1xxx)
    pub const INVALID_PARAMETER: i32 = 1001;
    pub const INSUFFICIENT_BALANCE: i32 = 1002;

    // Resource errors (4xxx)
    pub const ACCOUNT_NOT_FOUND: i32 = 4001;
    pub const RETRY_EXHAUSTED: i32 = 4091;

    // Server errors (5xxx)
    pub const INTERNAL_ERROR: i32 = 5000;
}

/// Handler result: success wraps data in [`ApiResponse`], failure maps
/// to a status code plus error body.
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::success(data)))
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: i32,
    pub msg: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: i32, msg: impl Into<String>) -> Self {
        Self {
            status,
            code,
            msg: msg.into(),
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error_codes::INVALID_PARAMETER, msg)
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, error_codes::ACCOUNT_NOT_FOUND, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            error_codes::INTERNAL_ERROR,
            msg,
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ApiResponse::<()>::error(self.code, self.msg));
        (self.status, body).into_response()
    }
}

impl From<RetryError<BankError>> for ApiError {
    fn from(err: RetryError<BankError>) -> Self {
        match err {
            RetryError::Exhausted { .. } => Self::new(
                StatusCode::CONFLICT,
                error_codes::RETRY_EXHAUSTED,
                err.to_string(),
            ),
            RetryError::NestedTransaction(_) => Self::internal(err.to_string()),
            RetryError::Fatal(inner) => Self::from(inner),
        }
    }
}

impl From<BankError> for ApiError {
    fn from(err: BankError) -> Self {
        match &err {
            // Domain rejection, distinct from infrastructure failures.
            BankError::NegativeBalance { .. } => Self::new(
                StatusCode::EXPECTATION_FAILED,
                error_codes::INSUFFICIENT_BALANCE,
                err.to_string(),
            ),
            BankError::UnknownAccount(_) | BankError::AccountNotFound(_) => {
                Self::not_found(err.to_string())
            }
            BankError::Database(_) | BankError::Hint(_) => Self::internal(err.to_string()),
        }
    }
}

// ============================================================================
// Request DTOs
// ============================================================================

/// Body of `POST /account/transfer`. The amount crosses the wire as a
/// string to avoid JSON float precision issues.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub name: String,
    pub account_type: String,
    pub amount: String,
}

/// Paging query for `GET /account`.
#[derive(Debug, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub size: i64,
}

fn default_page_size() -> i64 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_request_field_names() {
        let req: TransferRequest = serde_json::from_str(
            r#"{"name": "alice", "accountType": "expense", "amount": "-42.50"}"#,
        )
        .unwrap();
        assert_eq!(req.name, "alice");
        assert_eq!(req.account_type, "expense");
        assert_eq!(req.amount, "-42.50");
    }

    #[test]
    fn test_page_params_defaults() {
        let params: PageParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.page, 0);
        assert_eq!(params.size, 5);
    }

    #[test]
    fn test_negative_balance_maps_to_417() {
        let err = ApiError::from(BankError::NegativeBalance {
            name: "alice".to_string(),
            amount: rust_decimal::Decimal::new(-100, 2),
        });
        assert_eq!(err.status, StatusCode::EXPECTATION_FAILED);
        assert_eq!(err.code, error_codes::INSUFFICIENT_BALANCE);
    }

    #[test]
    fn test_exhaustion_maps_to_409() {
        let err = ApiError::from(RetryError::<BankError>::Exhausted {
            attempts: 3,
            operation: "account.transfer".to_string(),
            source: BankError::Database(sqlx::Error::PoolTimedOut),
        });
        assert_eq!(err.status, StatusCode::CONFLICT);
        assert_eq!(err.code, error_codes::RETRY_EXHAUSTED);
    }
}
