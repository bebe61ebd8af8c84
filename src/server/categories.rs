//! Category route handlers
//!
//! The category collaborator interface: list, create, delete. Deletion is
//! refused with 409 while any cost still references the category; the error
//! message carries the referencing-record count.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Category;
use crate::services::CategoryService;

use super::costs::parse_category_id;
use super::error::HttpError;
use super::{AppState, SuccessBody};

/// Category representation returned by the API
#[derive(Debug, Serialize)]
pub struct CategoryBody {
    pub id: String,
    pub name: String,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Category> for CategoryBody {
    fn from(category: Category) -> Self {
        Self {
            id: category.id.as_uuid().to_string(),
            name: category.name,
            sort_order: category.sort_order,
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateCategoryRequest {
    pub name: String,
}

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryBody>>, HttpError> {
    let categories = CategoryService::new(&state.storage).list()?;
    Ok(Json(
        categories.into_iter().map(CategoryBody::from).collect(),
    ))
}

pub async fn create_category(
    State(state): State<AppState>,
    Json(request): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<CategoryBody>), HttpError> {
    let category = CategoryService::new(&state.storage).create(&request.name)?;
    Ok((StatusCode::CREATED, Json(category.into())))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessBody>, HttpError> {
    let id = parse_category_id(&id)?;
    CategoryService::new(&state.storage).delete(id)?;
    Ok(Json(SuccessBody { success: true }))
}
