//! Supplier CRUD handlers, mounted under `/api/suppliers`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::info;

use crate::domain::aggregates::Supplier;
use crate::suppliers::SupplierRepository;
use crate::{Result, StorefrontError};

pub fn router() -> Router<SupplierRepository> {
    Router::new()
        .route("/", get(list_suppliers).post(create_supplier))
        .route("/name/:name", get(find_suppliers_by_name))
        .route("/:id", get(get_supplier).put(update_supplier).delete(delete_supplier))
}

/// Non-numeric ids cannot match any supplier.
fn parse_id(raw: &str) -> Result<u64> {
    raw.parse().map_err(|_| StorefrontError::SupplierNotFound)
}

async fn list_suppliers(State(repo): State<SupplierRepository>) -> Json<Vec<Supplier>> {
    Json(repo.list().await)
}

async fn find_suppliers_by_name(State(repo): State<SupplierRepository>, Path(name): Path<String>) -> Json<Vec<Supplier>> {
    Json(repo.find_by_name(&name).await)
}

async fn get_supplier(State(repo): State<SupplierRepository>, Path(id): Path<String>) -> Result<Json<Supplier>> {
    repo.get(parse_id(&id)?).await.map(Json).ok_or(StorefrontError::SupplierNotFound)
}

async fn create_supplier(State(repo): State<SupplierRepository>, Json(supplier): Json<Supplier>) -> (StatusCode, Json<Supplier>) {
    info!(supplier_id = supplier.supplier_id, "creating supplier");
    (StatusCode::CREATED, Json(repo.create(supplier).await))
}

async fn update_supplier(
    State(repo): State<SupplierRepository>,
    Path(id): Path<String>,
    Json(supplier): Json<Supplier>,
) -> Result<Json<Supplier>> {
    repo.update(parse_id(&id)?, supplier).await.map(Json).ok_or(StorefrontError::SupplierNotFound)
}

async fn delete_supplier(State(repo): State<SupplierRepository>, Path(id): Path<String>) -> Result<StatusCode> {
    if repo.delete(parse_id(&id)?).await {
        info!(supplier_id = %id, "deleted supplier");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(StorefrontError::SupplierNotFound)
    }
}
