// src/handlers/cash_boxes.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::cash_box::{CashBoxDetail, CashBoxWithItems, CreateCashBoxPayload},
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListCashBoxesQuery {
    pub store_id: Option<Uuid>,

    #[param(value_type = Option<String>, example = "2024-03-01")]
    pub from: Option<NaiveDate>,

    #[param(value_type = Option<String>, example = "2024-03-31")]
    pub to: Option<NaiveDate>,
}

// POST /api/cash-boxes
#[utoipa::path(
    post,
    path = "/api/cash-boxes",
    tag = "Caixas",
    request_body = CreateCashBoxPayload,
    responses(
        (status = 201, description = "Caixa criado com filhos e totais", body = CashBoxDetail),
        (status = 400, description = "Campos inválidos"),
        (status = 403, description = "Sem acesso à loja")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_cash_box(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateCashBoxPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let detail = app_state
        .cash_box_service
        .create_daily_cash_box(&user, &payload)
        .await?;

    Ok((StatusCode::CREATED, Json(detail)))
}

// GET /api/cash-boxes
#[utoipa::path(
    get,
    path = "/api/cash-boxes",
    tag = "Caixas",
    params(ListCashBoxesQuery),
    responses(
        (status = 200, description = "Caixas do período com filhos carregados", body = Vec<CashBoxWithItems>),
        (status = 403, description = "Sem acesso à loja")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_cash_boxes(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<ListCashBoxesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let boxes = app_state
        .cash_box_service
        .list_with_items(&user, query.store_id, query.from, query.to)
        .await?;

    Ok((StatusCode::OK, Json(boxes)))
}

// GET /api/cash-boxes/{id}
#[utoipa::path(
    get,
    path = "/api/cash-boxes/{id}",
    tag = "Caixas",
    params(("id" = Uuid, Path, description = "ID do caixa")),
    responses(
        (status = 200, description = "Caixa com totais calculados", body = CashBoxDetail),
        (status = 404, description = "Caixa não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_cash_box(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let detail = app_state.cash_box_service.get_with_totals(&user, id).await?;
    Ok((StatusCode::OK, Json(detail)))
}

// DELETE /api/cash-boxes/{id}
#[utoipa::path(
    delete,
    path = "/api/cash-boxes/{id}",
    tag = "Caixas",
    params(("id" = Uuid, Path, description = "ID do caixa")),
    responses(
        (status = 204, description = "Caixa removido (filhos em cascata)"),
        (status = 404, description = "Caixa não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_cash_box(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.cash_box_service.delete(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
