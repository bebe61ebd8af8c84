//! Cost route handlers
//!
//! CRUD over cost records. The derived fields (`amount_paid`,
//! `payment_status`) appear only in responses; request bodies carrying them
//! are rejected outright rather than silently ignored.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{CategoryId, Cost, CostId, Money, PaymentStatus};
use crate::services::{CostService, CreateCostInput, UpdateCostInput};

use super::error::HttpError;
use super::{AppState, SuccessBody};

/// Cost representation returned by the API; amounts are integer cents
#[derive(Debug, Serialize)]
pub struct CostBody {
    pub id: String,
    pub name: String,
    pub value: i64,
    pub total_amount: Option<i64>,
    pub category_id: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub paid_date: Option<NaiveDate>,
    pub amount_paid: i64,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Cost> for CostBody {
    fn from(cost: Cost) -> Self {
        Self {
            id: cost.id.as_uuid().to_string(),
            name: cost.name.clone(),
            value: cost.value.cents(),
            total_amount: cost.total_amount.map(|m| m.cents()),
            category_id: cost.category_id.map(|id| id.as_uuid().to_string()),
            due_date: cost.due_date,
            paid_date: cost.paid_date,
            amount_paid: cost.amount_paid().cents(),
            payment_status: cost.payment_status(),
            created_at: cost.created_at,
            updated_at: cost.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateCostRequest {
    pub name: String,
    pub value: i64,
    pub total_amount: Option<i64>,
    pub category_id: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub paid_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateCostRequest {
    pub name: Option<String>,
    pub value: Option<i64>,
    pub total_amount: Option<i64>,
    #[serde(default)]
    pub clear_total_amount: bool,
    pub category_id: Option<String>,
    #[serde(default)]
    pub clear_category: bool,
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub clear_due_date: bool,
    pub paid_date: Option<NaiveDate>,
    #[serde(default)]
    pub clear_paid_date: bool,
}

pub(super) fn parse_cost_id(s: &str) -> Result<CostId, HttpError> {
    s.parse::<CostId>()
        .map_err(|_| HttpError::bad_request(format!("Invalid cost id: {}", s)))
}

pub(super) fn parse_category_id(s: &str) -> Result<CategoryId, HttpError> {
    s.parse::<CategoryId>()
        .map_err(|_| HttpError::bad_request(format!("Invalid category id: {}", s)))
}

pub async fn list_costs(State(state): State<AppState>) -> Result<Json<Vec<CostBody>>, HttpError> {
    let costs = CostService::new(&state.storage).list()?;
    Ok(Json(costs.into_iter().map(CostBody::from).collect()))
}

pub async fn get_cost(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CostBody>, HttpError> {
    let id = parse_cost_id(&id)?;
    let cost = CostService::new(&state.storage)
        .get(id)?
        .ok_or_else(|| crate::error::KnotbookError::cost_not_found(id.to_string()))?;
    Ok(Json(cost.into()))
}

pub async fn create_cost(
    State(state): State<AppState>,
    Json(request): Json<CreateCostRequest>,
) -> Result<(StatusCode, Json<CostBody>), HttpError> {
    let category_id = request
        .category_id
        .as_deref()
        .map(parse_category_id)
        .transpose()?;

    let cost = CostService::new(&state.storage).create(CreateCostInput {
        name: request.name,
        value: Money::from_cents(request.value),
        total_amount: request.total_amount.map(Money::from_cents),
        category_id,
        due_date: request.due_date,
        paid_date: request.paid_date,
    })?;

    Ok((StatusCode::CREATED, Json(cost.into())))
}

pub async fn update_cost(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateCostRequest>,
) -> Result<Json<CostBody>, HttpError> {
    let id = parse_cost_id(&id)?;
    let category_id = request
        .category_id
        .as_deref()
        .map(parse_category_id)
        .transpose()?;

    let cost = CostService::new(&state.storage).update(
        id,
        UpdateCostInput {
            name: request.name,
            value: request.value.map(Money::from_cents),
            total_amount: request.total_amount.map(Money::from_cents),
            clear_total_amount: request.clear_total_amount,
            category_id,
            clear_category: request.clear_category,
            due_date: request.due_date,
            clear_due_date: request.clear_due_date,
            paid_date: request.paid_date,
            clear_paid_date: request.clear_paid_date,
        },
    )?;

    Ok(Json(cost.into()))
}

pub async fn delete_cost(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessBody>, HttpError> {
    let id = parse_cost_id(&id)?;
    CostService::new(&state.storage).delete(id)?;
    Ok(Json(SuccessBody { success: true }))
}
