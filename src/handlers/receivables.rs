// src/handlers/receivables.rs

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
    models::receivable::{
        CreateReceivablePayload, Receivable, ReceivablePayment, ReceivableStatus,
        RegisterPaymentPayload,
    },
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListReceivablesQuery {
    pub store_id: Option<Uuid>,
    pub status: Option<ReceivableStatus>,
}

// POST /api/receivables
#[utoipa::path(
    post,
    path = "/api/receivables",
    tag = "Recebíveis",
    request_body = CreateReceivablePayload,
    responses(
        (status = 201, description = "Recebível criado em aberto", body = Receivable),
        (status = 403, description = "Sem acesso à loja")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_receivable(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateReceivablePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let receivable = app_state
        .receivable_service
        .create(&user, &payload)
        .await?;

    Ok((StatusCode::CREATED, Json(receivable)))
}

// GET /api/receivables
#[utoipa::path(
    get,
    path = "/api/receivables",
    tag = "Recebíveis",
    params(ListReceivablesQuery),
    responses(
        (status = 200, description = "Recebíveis filtrados por loja/status", body = Vec<Receivable>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_receivables(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<ListReceivablesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let receivables = app_state
        .receivable_service
        .list(&user, query.store_id, query.status)
        .await?;

    Ok((StatusCode::OK, Json(receivables)))
}

// GET /api/receivables/{id}/payments
#[utoipa::path(
    get,
    path = "/api/receivables/{id}/payments",
    tag = "Recebíveis",
    params(("id" = Uuid, Path, description = "ID do recebível")),
    responses(
        (status = 200, description = "Histórico de pagamentos", body = Vec<ReceivablePayment>),
        (status = 404, description = "Recebível não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_payments(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let payments = app_state.receivable_service.list_payments(&user, id).await?;
    Ok((StatusCode::OK, Json(payments)))
}

// POST /api/receivables/{id}/payments
#[utoipa::path(
    post,
    path = "/api/receivables/{id}/payments",
    tag = "Recebíveis",
    params(("id" = Uuid, Path, description = "ID do recebível")),
    request_body = RegisterPaymentPayload,
    responses(
        (status = 201, description = "Pagamento registrado, status vira pago_pendente_baixa", body = ReceivablePayment),
        (status = 409, description = "Recebível não está em aberto")
    ),
    security(("api_jwt" = []))
)]
pub async fn register_payment(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RegisterPaymentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let payment = app_state
        .receivable_service
        .register_payment(&user, id, &payload)
        .await?;

    Ok((StatusCode::CREATED, Json(payment)))
}

// POST /api/receivables/{id}/settle (admin)
#[utoipa::path(
    post,
    path = "/api/receivables/{id}/settle",
    tag = "Recebíveis",
    params(("id" = Uuid, Path, description = "ID do recebível")),
    responses(
        (status = 200, description = "Recebível baixado", body = Receivable),
        (status = 403, description = "Restrito a administradores"),
        (status = 409, description = "Recebível não está pendente de baixa")
    ),
    security(("api_jwt" = []))
)]
pub async fn settle_receivable(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let receivable = app_state.receivable_service.settle(&user, id).await?;
    Ok((StatusCode::OK, Json(receivable)))
}
