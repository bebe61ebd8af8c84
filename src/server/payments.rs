//! Payment route handlers
//!
//! The ledger surface: list payments for a cost, record a payment, delete a
//! payment. Every mutation triggers reconciliation before the response is
//! returned, so the cost read back afterwards always reflects the ledger.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Money, Payment, PaymentId};
use crate::services::{AddPaymentInput, LedgerService};

use super::costs::parse_cost_id;
use super::error::HttpError;
use super::{AppState, SuccessBody};

/// Payment representation returned by the API; amounts are integer cents
#[derive(Debug, Serialize)]
pub struct PaymentBody {
    pub id: String,
    pub cost_id: String,
    pub amount: i64,
    pub payment_date: DateTime<Utc>,
    pub note: String,
    pub created_at: DateTime<Utc>,
}

impl From<Payment> for PaymentBody {
    fn from(payment: Payment) -> Self {
        Self {
            id: payment.id.as_uuid().to_string(),
            cost_id: payment.cost_id.as_uuid().to_string(),
            amount: payment.amount.cents(),
            payment_date: payment.payment_date,
            note: payment.note,
            created_at: payment.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListPaymentsQuery {
    pub cost_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreatePaymentRequest {
    pub cost_id: String,
    pub amount: i64,
    pub note: Option<String>,
}

fn parse_payment_id(s: &str) -> Result<PaymentId, HttpError> {
    s.parse::<PaymentId>()
        .map_err(|_| HttpError::bad_request(format!("Invalid payment id: {}", s)))
}

pub async fn list_payments(
    State(state): State<AppState>,
    Query(query): Query<ListPaymentsQuery>,
) -> Result<Json<Vec<PaymentBody>>, HttpError> {
    let cost_id = query
        .cost_id
        .ok_or_else(|| HttpError::bad_request("Missing required query parameter: cost_id"))?;
    let cost_id = parse_cost_id(&cost_id)?;

    let payments = LedgerService::new(&state.storage).list_payments(cost_id)?;
    Ok(Json(payments.into_iter().map(PaymentBody::from).collect()))
}

pub async fn create_payment(
    State(state): State<AppState>,
    Json(request): Json<CreatePaymentRequest>,
) -> Result<(StatusCode, Json<PaymentBody>), HttpError> {
    let cost_id = parse_cost_id(&request.cost_id)?;

    let payment = LedgerService::new(&state.storage).add_payment(AddPaymentInput {
        cost_id,
        amount: Money::from_cents(request.amount),
        note: request.note,
    })?;

    Ok((StatusCode::CREATED, Json(payment.into())))
}

pub async fn delete_payment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessBody>, HttpError> {
    let id = parse_payment_id(&id)?;
    LedgerService::new(&state.storage).delete_payment(id)?;
    Ok(Json(SuccessBody { success: true }))
}
