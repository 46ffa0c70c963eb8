// src/handlers/closures.rs
//
// Fechamento mensal manual (caixa sintético) — área administrativa.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::reports::{MonthlyClosureView, UpsertClosurePayload},
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ClosureQuery {
    pub store_id: Uuid,

    #[param(example = "2024-03")]
    pub month: String,
}

// GET /api/admin/closures
#[utoipa::path(
    get,
    path = "/api/admin/closures",
    tag = "Fechamento Mensal",
    params(ClosureQuery),
    responses(
        (status = 200, description = "Estado do fechamento do mês (com prefill de fixas se não salvo)", body = MonthlyClosureView),
        (status = 400, description = "Mês inválido"),
        (status = 403, description = "Restrito a administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn fetch_closure(
    State(app_state): State<AppState>,
    Query(query): Query<ClosureQuery>,
) -> Result<impl IntoResponse, AppError> {
    let view = app_state
        .closure_service
        .fetch_monthly_closure(query.store_id, &query.month)
        .await?;

    Ok((StatusCode::OK, Json(view)))
}

// PUT /api/admin/closures
#[utoipa::path(
    put,
    path = "/api/admin/closures",
    tag = "Fechamento Mensal",
    request_body = UpsertClosurePayload,
    responses(
        (status = 200, description = "Fechamento salvo; filhos substituídos por completo", body = MonthlyClosureView),
        (status = 400, description = "Mês inválido"),
        (status = 403, description = "Restrito a administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn upsert_closure(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<UpsertClosurePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    app_state
        .closure_service
        .upsert_monthly_closure(
            payload.store_id,
            &payload.month,
            user.id,
            &payload.services,
            &payload.expenses,
        )
        .await?;

    // Devolve o estado persistido, como a tela de conferência espera
    let view = app_state
        .closure_service
        .fetch_monthly_closure(payload.store_id, &payload.month)
        .await?;

    Ok((StatusCode::OK, Json(view)))
}

// DELETE /api/admin/closures/{cashBoxId}
#[utoipa::path(
    delete,
    path = "/api/admin/closures/{cash_box_id}",
    tag = "Fechamento Mensal",
    params(("cash_box_id" = Uuid, Path, description = "ID do caixa sintético")),
    responses(
        (status = 204, description = "Fechamento removido; mês reaberto para digitação"),
        (status = 404, description = "Fechamento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_closure(
    State(app_state): State<AppState>,
    Path(cash_box_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.closure_service.delete_monthly_closure(cash_box_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
