//! HTTP API server for knotbook
//!
//! Exposes the cost, payment, and category operations as a JSON REST surface
//! over axum. The handlers are a thin layer over the same services the CLI
//! uses; all invariants live below this boundary.

pub mod categories;
pub mod costs;
pub mod error;
pub mod payments;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{delete, get};
use axum::Router;
use serde::Serialize;
use tokio::net::TcpListener;

use crate::storage::Storage;

pub use error::ServerError;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<Storage>,
}

/// Body returned by successful delete operations
#[derive(Debug, Serialize)]
pub struct SuccessBody {
    pub success: bool,
}

/// Build the API router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/costs", get(costs::list_costs).post(costs::create_cost))
        .route(
            "/costs/:id",
            get(costs::get_cost)
                .put(costs::update_cost)
                .delete(costs::delete_cost),
        )
        .route(
            "/payments",
            get(payments::list_payments).post(payments::create_payment),
        )
        .route("/payments/:id", delete(payments::delete_payment))
        .route(
            "/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route("/categories/:id", delete(categories::delete_category))
        .with_state(state)
}

/// Bind and serve the API until the process is stopped
pub async fn serve(addr: SocketAddr, storage: Arc<Storage>) -> Result<(), ServerError> {
    let app = router(AppState { storage });

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::config::paths::KnotbookPaths;

    fn test_router() -> (TempDir, Router) {
        let temp_dir = TempDir::new().unwrap();
        let paths = KnotbookPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        let router = router(AppState {
            storage: Arc::new(storage),
        });
        (temp_dir, router)
    }

    async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = match body {
            Some(json_body) => Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(json_body.to_string()))
                .unwrap(),
            None => Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        };

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_cost_crud_lifecycle() {
        let (_temp_dir, router) = test_router();

        // Create
        let (status, created) = send(
            &router,
            "POST",
            "/costs",
            Some(json!({"name": "Venue", "value": 100000})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["name"], "Venue");
        assert_eq!(created["amount_paid"], 0);
        assert_eq!(created["payment_status"], "unpaid");
        let id = created["id"].as_str().unwrap().to_string();

        // Get
        let (status, fetched) = send(&router, "GET", &format!("/costs/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["id"], id.as_str());

        // List
        let (status, list) = send(&router, "GET", "/costs", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().unwrap().len(), 1);

        // Update
        let (status, updated) = send(
            &router,
            "PUT",
            &format!("/costs/{}", id),
            Some(json!({"name": "Reception venue"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["name"], "Reception venue");

        // Delete
        let (status, deleted) = send(&router, "DELETE", &format!("/costs/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(deleted["success"], true);

        let (status, _) = send(&router, "GET", &format!("/costs/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_cost_validation_failure() {
        let (_temp_dir, router) = test_router();

        let (status, body) = send(
            &router,
            "POST",
            "/costs",
            Some(json!({"name": "", "value": 1000})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "validation_error");

        let (status, _) = send(
            &router,
            "POST",
            "/costs",
            Some(json!({"name": "Zero", "value": 0})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_derived_fields_are_not_settable() {
        let (_temp_dir, router) = test_router();

        // Requests carrying the derived fields are rejected outright
        let (status, _) = send(
            &router,
            "POST",
            "/costs",
            Some(json!({"name": "Venue", "value": 1000, "amount_paid": 999})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (_, created) = send(
            &router,
            "POST",
            "/costs",
            Some(json!({"name": "Venue", "value": 1000})),
        )
        .await;
        let id = created["id"].as_str().unwrap();

        let (status, _) = send(
            &router,
            "PUT",
            &format!("/costs/{}", id),
            Some(json!({"payment_status": "paid"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_installment_payments_over_http() {
        let (_temp_dir, router) = test_router();

        let (_, cost) = send(
            &router,
            "POST",
            "/costs",
            Some(json!({"name": "Venue", "value": 1000, "total_amount": 10000})),
        )
        .await;
        let cost_id = cost["id"].as_str().unwrap().to_string();

        // First installment
        let (status, payment) = send(
            &router,
            "POST",
            "/payments",
            Some(json!({"cost_id": cost_id, "amount": 3000, "note": "deposit"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(payment["amount"], 3000);
        assert_eq!(payment["note"], "deposit");

        let (_, fetched) = send(&router, "GET", &format!("/costs/{}", cost_id), None).await;
        assert_eq!(fetched["amount_paid"], 3000);
        assert_eq!(fetched["payment_status"], "partial");

        // Second installment settles the balance
        let (status, _) = send(
            &router,
            "POST",
            "/payments",
            Some(json!({"cost_id": cost_id, "amount": 7000})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (_, fetched) = send(&router, "GET", &format!("/costs/{}", cost_id), None).await;
        assert_eq!(fetched["amount_paid"], 10000);
        assert_eq!(fetched["payment_status"], "paid");

        // One cent more is rejected and the ledger is unchanged
        let (status, body) = send(
            &router,
            "POST",
            "/payments",
            Some(json!({"cost_id": cost_id, "amount": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "validation_error");

        let (_, payments) = send(
            &router,
            "GET",
            &format!("/payments?cost_id={}", cost_id),
            None,
        )
        .await;
        assert_eq!(payments.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_payment_reverts_status() {
        let (_temp_dir, router) = test_router();

        let (_, cost) = send(
            &router,
            "POST",
            "/costs",
            Some(json!({"name": "Favors", "value": 500})),
        )
        .await;
        let cost_id = cost["id"].as_str().unwrap().to_string();

        let (_, payment) = send(
            &router,
            "POST",
            "/payments",
            Some(json!({"cost_id": cost_id, "amount": 500})),
        )
        .await;
        let payment_id = payment["id"].as_str().unwrap().to_string();

        let (_, fetched) = send(&router, "GET", &format!("/costs/{}", cost_id), None).await;
        assert_eq!(fetched["payment_status"], "paid");

        let (status, body) =
            send(&router, "DELETE", &format!("/payments/{}", payment_id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let (_, fetched) = send(&router, "GET", &format!("/costs/{}", cost_id), None).await;
        assert_eq!(fetched["amount_paid"], 0);
        assert_eq!(fetched["payment_status"], "unpaid");
    }

    #[tokio::test]
    async fn test_list_payments_requires_cost_id() {
        let (_temp_dir, router) = test_router();

        let (status, body) = send(&router, "GET", "/payments", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "validation_error");
    }

    #[tokio::test]
    async fn test_payments_for_unknown_cost() {
        let (_temp_dir, router) = test_router();

        let unknown = uuid::Uuid::new_v4();
        let (status, _) = send(
            &router,
            "GET",
            &format!("/payments?cost_id={}", unknown),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &router,
            "POST",
            "/payments",
            Some(json!({"cost_id": unknown.to_string(), "amount": 100})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_unknown_payment() {
        let (_temp_dir, router) = test_router();

        let unknown = uuid::Uuid::new_v4();
        let (status, _) = send(&router, "DELETE", &format!("/payments/{}", unknown), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_ids_are_bad_requests() {
        let (_temp_dir, router) = test_router();

        let (status, _) = send(&router, "GET", "/costs/not-a-uuid", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&router, "DELETE", "/payments/not-a-uuid", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_category_deletion_refused_while_referenced() {
        let (_temp_dir, router) = test_router();

        let (status, category) = send(
            &router,
            "POST",
            "/categories",
            Some(json!({"name": "Venue"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let category_id = category["id"].as_str().unwrap().to_string();

        let (_, cost) = send(
            &router,
            "POST",
            "/costs",
            Some(json!({"name": "Reception hall", "value": 100000, "category_id": category_id})),
        )
        .await;
        let cost_id = cost["id"].as_str().unwrap().to_string();

        // Refused with a count of referencing records
        let (status, body) = send(
            &router,
            "DELETE",
            &format!("/categories/{}", category_id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "conflict");
        assert!(body["message"].as_str().unwrap().contains("1 cost record"));

        // Once the referencing cost is gone, deletion goes through
        send(&router, "DELETE", &format!("/costs/{}", cost_id), None).await;
        let (status, _) = send(
            &router,
            "DELETE",
            &format!("/categories/{}", category_id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_duplicate_category_conflict() {
        let (_temp_dir, router) = test_router();

        send(&router, "POST", "/categories", Some(json!({"name": "Music"}))).await;
        let (status, body) = send(
            &router,
            "POST",
            "/categories",
            Some(json!({"name": "music"})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "conflict");
    }
}
