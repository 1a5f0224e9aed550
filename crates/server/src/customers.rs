use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use ronja_core::domain::customer::Customer;
use ronja_core::domain::EntityId;
use ronja_core::dto::CustomerDto;
use ronja_db::CustomerService;
use serde::Deserialize;

use crate::error::ApiError;

pub type CustomersState = Arc<CustomerService>;

#[derive(Debug, Default, Deserialize)]
pub struct CustomerSearch {
    #[serde(rename = "customerName", default)]
    pub customer_name: Option<String>,
}

pub fn router(service: CustomersState) -> Router {
    Router::new()
        .route("/customers/list", get(list))
        .route("/customers/search", get(search))
        .route("/customers/save", post(save))
        .route("/customers/update", post(update))
        .route("/customers/delete/{id}", delete(remove))
        .route("/customers/{id}", get(find))
        .with_state(service)
}

fn created(customer: Customer) -> Response {
    let location = format!("/customers/{}", customer.id);
    (StatusCode::CREATED, [(header::LOCATION, location)], Json(customer)).into_response()
}

pub async fn list(State(service): State<CustomersState>) -> Result<Json<Vec<Customer>>, ApiError> {
    Ok(Json(service.find_all().await?))
}

pub async fn search(
    State(service): State<CustomersState>,
    query: Result<Query<CustomerSearch>, QueryRejection>,
) -> Result<Json<Vec<Customer>>, ApiError> {
    let Query(query) = query?;
    let name = query.customer_name.unwrap_or_default();
    Ok(Json(service.search_by(&name).await?))
}

pub async fn find(
    State(service): State<CustomersState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Customer>, ApiError> {
    let Path(id) = id?;
    Ok(Json(service.find_by_id(EntityId(id)).await?))
}

pub async fn save(
    State(service): State<CustomersState>,
    payload: Result<Json<CustomerDto>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(dto) = payload?;
    let customer = service.save(dto).await?;
    Ok(created(customer))
}

/// Answers 201 with a `Location` header, like `save`.
pub async fn update(
    State(service): State<CustomersState>,
    payload: Result<Json<CustomerDto>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(dto) = payload?;
    let customer = service.update(dto).await?;
    Ok(created(customer))
}

pub async fn remove(
    State(service): State<CustomersState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    service.delete_by_id(EntityId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
