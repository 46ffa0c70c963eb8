// src/handlers/expenses.rs
//
// Despesas fixas mensais (aluguel, energia...), independentes dos caixas.

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
    models::cash_box::{CreateFixedExpensePayload, FixedExpense},
    services::summary::parse_month_key,
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListFixedExpensesQuery {
    pub store_id: Option<Uuid>,

    #[param(example = "2024-01")]
    pub from_month: Option<String>,

    #[param(example = "2024-12")]
    pub to_month: Option<String>,
}

// GET /api/fixed-expenses
#[utoipa::path(
    get,
    path = "/api/fixed-expenses",
    tag = "Despesas Fixas",
    params(ListFixedExpensesQuery),
    responses(
        (status = 200, description = "Despesas fixas do período", body = Vec<FixedExpense>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_fixed_expenses(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<ListFixedExpensesQuery>,
) -> Result<impl IntoResponse, AppError> {
    if let Some(store_id) = query.store_id
        && !user.can_access_store(store_id)
    {
        return Err(AppError::StoreAccessDenied);
    }

    // Vistoriador sem filtro de loja cai na própria
    let effective_store = query.store_id.or(user.store_id);

    let expenses = app_state
        .cash_box_repo
        .list_fixed_expenses(
            effective_store,
            query.from_month.as_deref(),
            query.to_month.as_deref(),
        )
        .await?;

    Ok((StatusCode::OK, Json(expenses)))
}

// POST /api/fixed-expenses (admin)
#[utoipa::path(
    post,
    path = "/api/fixed-expenses",
    tag = "Despesas Fixas",
    request_body = CreateFixedExpensePayload,
    responses(
        (status = 201, description = "Despesa fixa criada", body = FixedExpense),
        (status = 400, description = "Campos inválidos"),
        (status = 403, description = "Restrito a administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_fixed_expense(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateFixedExpensePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    if parse_month_key(&payload.month_year).is_none() {
        return Err(AppError::InvalidMonth(payload.month_year.clone()));
    }

    let expense = app_state
        .cash_box_repo
        .create_fixed_expense(
            payload.store_id,
            &payload.month_year,
            payload.title.trim(),
            payload.amount_cents,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(expense)))
}

// DELETE /api/fixed-expenses/{id} (admin)
#[utoipa::path(
    delete,
    path = "/api/fixed-expenses/{id}",
    tag = "Despesas Fixas",
    params(("id" = Uuid, Path, description = "ID da despesa fixa")),
    responses(
        (status = 204, description = "Despesa fixa removida"),
        (status = 404, description = "Despesa fixa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_fixed_expense(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = app_state.cash_box_repo.delete_fixed_expense(id).await?;
    if deleted == 0 {
        return Err(AppError::NotFound);
    }

    Ok(StatusCode::NO_CONTENT)
}
