use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use ronja_core::domain::representative::Representative;
use ronja_core::domain::EntityId;
use ronja_core::dto::RepresentativeDto;
use ronja_core::errors::{ApplicationError, DomainError};
use ronja_core::mapper::RepresentativeMapper;
use ronja_db::RepresentativeService;
use serde::Deserialize;

use crate::error::ApiError;

pub type RepresentativesState = Arc<RepresentativeService>;

#[derive(Debug, Default, Deserialize)]
pub struct RepresentativeSearch {
    #[serde(rename = "representativeName", default)]
    pub representative_name: Option<String>,
}

pub fn router(service: RepresentativesState) -> Router {
    Router::new()
        .route("/representatives/list", get(list))
        .route("/representatives/search", get(search))
        .route("/representatives/add", post(add))
        .route("/representatives/update", put(update))
        .route("/representatives/delete/{id}", delete(remove))
        .route("/representatives/{id}", get(find))
        .with_state(service)
}

pub async fn list(
    State(service): State<RepresentativesState>,
) -> Result<Json<Vec<Representative>>, ApiError> {
    Ok(Json(service.find_all().await?))
}

pub async fn search(
    State(service): State<RepresentativesState>,
    query: Result<Query<RepresentativeSearch>, QueryRejection>,
) -> Result<Json<Vec<Representative>>, ApiError> {
    let Query(query) = query?;
    let name = query.representative_name.unwrap_or_default();
    Ok(Json(service.search_by(&name).await?))
}

pub async fn find(
    State(service): State<RepresentativesState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Representative>, ApiError> {
    let Path(id) = id?;
    Ok(Json(service.find_by_id(EntityId(id)).await?))
}

pub async fn add(
    State(service): State<RepresentativesState>,
    payload: Result<Json<RepresentativeDto>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(dto) = payload?;
    let representative = service.save(dto).await?;
    let location = format!("/representatives/{}", representative.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(RepresentativeMapper::to_dto(&representative)),
    )
        .into_response())
}

/// 404 with an empty body when the target does not exist; nothing is written.
pub async fn update(
    State(service): State<RepresentativesState>,
    payload: Result<Json<RepresentativeDto>, JsonRejection>,
) -> Result<Json<RepresentativeDto>, ApiError> {
    let Json(dto) = payload?;
    let id = dto.id.map(EntityId).ok_or_else(|| {
        DomainError::Validation("representative update requires an id".to_string())
    })?;
    if !service.exists_by_id(id).await? {
        return Err(ApplicationError::not_found("representative", id).into());
    }

    let representative = service.update(dto).await?;
    Ok(Json(RepresentativeMapper::to_dto(&representative)))
}

pub async fn remove(
    State(service): State<RepresentativesState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    service.delete_by_id(EntityId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
