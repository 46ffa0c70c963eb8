// src/handlers/catalog.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::catalog::{CreateServiceTypePayload, CreateStorePayload, ServiceType, Store},
};

// GET /api/stores
#[utoipa::path(
    get,
    path = "/api/stores",
    tag = "Catálogo",
    responses(
        (status = 200, description = "Lojas ativas", body = Vec<Store>),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_stores(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let stores = app_state.catalog_repo.list_stores().await?;
    Ok((StatusCode::OK, Json(stores)))
}

// POST /api/stores (admin)
#[utoipa::path(
    post,
    path = "/api/stores",
    tag = "Catálogo",
    request_body = CreateStorePayload,
    responses(
        (status = 201, description = "Loja criada", body = Store),
        (status = 403, description = "Restrito a administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_store(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateStorePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let store = app_state
        .catalog_repo
        .create_store(&payload.name, payload.city.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(store)))
}

// GET /api/service-types
#[utoipa::path(
    get,
    path = "/api/service-types",
    tag = "Catálogo",
    responses(
        (status = 200, description = "Catálogo de tipos de serviço", body = Vec<ServiceType>),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_service_types(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let types = app_state.catalog_repo.list_service_types().await?;
    Ok((StatusCode::OK, Json(types)))
}

// POST /api/service-types (admin)
#[utoipa::path(
    post,
    path = "/api/service-types",
    tag = "Catálogo",
    request_body = CreateServiceTypePayload,
    responses(
        (status = 201, description = "Tipo de serviço criado", body = ServiceType),
        (status = 403, description = "Restrito a administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_service_type(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateServiceTypePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let service_type = app_state
        .catalog_repo
        .create_service_type(
            &payload.code,
            &payload.name,
            payload.default_price_cents,
            payload.counts_in_gross,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(service_type)))
}
