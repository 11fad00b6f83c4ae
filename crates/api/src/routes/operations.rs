//! The operation endpoint: one POST route dispatching ledger operations.
//!
//! The request is a form with a `method` discriminator, mirroring the wire
//! contract of the reference client. Request-level problems (missing or
//! unparsable fields, unknown method) are answered with a flat `error`
//! object and 400 before any ledger call; ledger rejections keep the
//! per-method response shape and map to their own status codes.

use axum::{
    Form, Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::debug;

use kasse_core::ledger::LedgerError;
use kasse_shared::types::money::{Currency, Money};

use crate::AppState;

/// Creates the operation routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/", post(handle_operation))
}

/// Form body of an operation request.
///
/// Every field is optional at the extraction layer; per-method requirements
/// are enforced in the handler so a missing field gets a uniform response
/// instead of an extractor rejection.
#[derive(Debug, Deserialize)]
pub struct OperationRequest {
    /// Operation name: `deposit`, `withdrawal`, `transfer`, `get_balances`.
    pub method: Option<String>,
    /// Account name for single-account operations.
    pub account: Option<String>,
    /// Source account for transfers.
    pub from_account: Option<String>,
    /// Destination account for transfers.
    pub to_account: Option<String>,
    /// Decimal amount, as sent on the wire.
    pub amount: Option<String>,
    /// Operation date, `YYYY-MM-DD`.
    pub date: Option<String>,
    /// Currency code of the amount.
    pub ccy: Option<String>,
}

/// POST `/` - dispatches one ledger operation.
async fn handle_operation(
    State(state): State<AppState>,
    Form(req): Form<OperationRequest>,
) -> Response {
    let (Some(method), Some(date)) = (req.method.as_deref(), req.date.as_deref()) else {
        return request_error("date and method are required");
    };
    let Ok(date) = NaiveDate::parse_from_str(date, "%Y-%m-%d") else {
        return request_error("invalid date, expected YYYY-MM-DD");
    };
    debug!(method, %date, "operation received");

    match method {
        "deposit" | "withdrawal" => {
            let Some(account) = req.account.as_deref() else {
                return request_error("account is required");
            };
            let money = match parse_money(req.amount.as_deref(), req.ccy.as_deref()) {
                Ok(money) => money,
                Err(response) => return response,
            };
            let result = if method == "deposit" {
                state.ledger.deposit(account, money, date).await
            } else {
                state.ledger.withdraw(account, money, date).await
            };
            operation_response(method, date, result)
        }
        "transfer" => {
            let (Some(from), Some(to)) = (req.from_account.as_deref(), req.to_account.as_deref())
            else {
                return request_error("from_account and to_account are required");
            };
            let money = match parse_money(req.amount.as_deref(), req.ccy.as_deref()) {
                Ok(money) => money,
                Err(response) => return response,
            };
            let result = state.ledger.transfer(from, to, money, date).await;
            operation_response(method, date, result)
        }
        "get_balances" => {
            let Some(account) = req.account.as_deref() else {
                return request_error("account is required");
            };
            operation_response(method, date, state.ledger.balance(account, date))
        }
        _ => request_error("unknown method"),
    }
}

/// Builds a `Money` from the raw amount and currency fields.
///
/// Both fields are required; the amount must be a decimal number and the
/// currency a valid three-letter code. Sign and zero checks are left to the
/// ledger so they map to its error taxonomy.
fn parse_money(amount: Option<&str>, ccy: Option<&str>) -> Result<Money, Response> {
    let (Some(amount), Some(ccy)) = (amount, ccy) else {
        return Err(request_error("amount and ccy are required"));
    };
    let amount: Decimal = amount
        .parse()
        .map_err(|_| request_error("invalid amount"))?;
    let currency: Currency = ccy
        .parse()
        .map_err(|_| request_error("invalid currency code"))?;
    Ok(Money::new(amount, currency))
}

/// Serializes a ledger outcome into the per-method response shape.
fn operation_response(
    method: &str,
    date: NaiveDate,
    result: Result<Decimal, LedgerError>,
) -> Response {
    match result {
        Ok(amount) => {
            let mut body = Map::new();
            body.insert(method.to_string(), Value::from("OK"));
            body.insert("amount".to_string(), Value::from(amount.to_string()));
            body.insert("date".to_string(), Value::from(date.to_string()));
            (StatusCode::OK, Json(Value::Object(body))).into_response()
        }
        Err(e) => {
            let mut body = Map::new();
            body.insert(method.to_string(), Value::from("Error"));
            body.insert("error_code".to_string(), Value::from(e.error_code()));
            body.insert("message".to_string(), Value::from(e.to_string()));
            let status = StatusCode::from_u16(e.http_status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(Value::Object(body))).into_response()
        }
    }
}

/// Builds the flat 400 response for request-level validation failures.
fn request_error(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2018, 12, 9).expect("valid date")
    }

    #[test]
    fn test_parse_money_requires_both_fields() {
        assert!(parse_money(Some("100"), None).is_err());
        assert!(parse_money(None, Some("EUR")).is_err());
        assert!(parse_money(None, None).is_err());
    }

    #[test]
    fn test_parse_money_accepts_decimal_and_code() {
        let money = parse_money(Some("99.50"), Some("USD")).expect("parses");
        assert_eq!(money.amount, dec!(99.50));
        assert_eq!(money.currency.code(), "USD");
    }

    #[test]
    fn test_parse_money_rejects_garbage() {
        assert!(parse_money(Some("ten"), Some("EUR")).is_err());
        assert!(parse_money(Some("10"), Some("euros")).is_err());
    }

    #[test]
    fn test_success_body_shape() {
        let response = operation_response("deposit", date(), Ok(dec!(2000)));
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_error_status_follows_taxonomy() {
        let response = operation_response(
            "withdrawal",
            date(),
            Err(LedgerError::InsufficientFunds {
                requested: dec!(2000),
                available: dec!(1000),
            }),
        );
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let response = operation_response(
            "get_balances",
            date(),
            Err(LedgerError::AccountNotFound("carol".to_string())),
        );
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
