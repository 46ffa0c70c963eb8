// src/handlers/reports.rs

use axum::{
    Json,
    extract::{Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{
        auth::User,
        cash_box::{CashBoxWithItems, FixedExpense},
        reports::{AdminMetrics, MonthlySummary},
    },
    services::{metrics::aggregate_metrics, report_pdf::build_monthly_summary_pdf, summary},
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    pub store_id: Option<Uuid>,

    #[param(value_type = Option<String>, example = "2024-01-01")]
    pub from: Option<NaiveDate>,

    #[param(value_type = Option<String>, example = "2024-12-31")]
    pub to: Option<NaiveDate>,
}

// Carrega caixas e despesas fixas do mesmo período/loja.
async fn load_period(
    app_state: &AppState,
    user: &User,
    query: &ReportQuery,
) -> Result<(Vec<CashBoxWithItems>, Vec<FixedExpense>), AppError> {
    let boxes = app_state
        .cash_box_service
        .list_with_items(user, query.store_id, query.from, query.to)
        .await?;

    let from_month = query.from.map(|d| d.format("%Y-%m").to_string());
    let to_month = query.to.map(|d| d.format("%Y-%m").to_string());
    let fixed = app_state
        .cash_box_repo
        .list_fixed_expenses(
            query.store_id.or(user.store_id),
            from_month.as_deref(),
            to_month.as_deref(),
        )
        .await?;

    Ok((boxes, fixed))
}

// GET /api/reports/monthly-summary
#[utoipa::path(
    get,
    path = "/api/reports/monthly-summary",
    tag = "Relatórios",
    params(ReportQuery),
    responses(
        (status = 200, description = "Uma linha por mês do período, mais recente primeiro", body = Vec<MonthlySummary>),
        (status = 403, description = "Sem acesso à loja")
    ),
    security(("api_jwt" = []))
)]
pub async fn monthly_summary(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (boxes, fixed) = load_period(&app_state, &user, &query).await?;
    let catalog = app_state.catalog_repo.list_service_types().await?;

    let summaries = summary::summarize_cash_boxes(&boxes, &fixed, &catalog);

    Ok((StatusCode::OK, Json(summaries)))
}

// GET /api/reports/monthly-summary/pdf
#[utoipa::path(
    get,
    path = "/api/reports/monthly-summary/pdf",
    tag = "Relatórios",
    params(ReportQuery),
    responses(
        (status = 200, description = "Resumo mensal em PDF", content_type = "application/pdf"),
        (status = 403, description = "Sem acesso à loja")
    ),
    security(("api_jwt" = []))
)]
pub async fn monthly_summary_pdf(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (boxes, fixed) = load_period(&app_state, &user, &query).await?;
    let catalog = app_state.catalog_repo.list_service_types().await?;

    let summaries = summary::summarize_cash_boxes(&boxes, &fixed, &catalog);

    let store_label = match query.store_id.or(user.store_id) {
        Some(store_id) => app_state
            .catalog_repo
            .find_store(store_id)
            .await?
            .map(|s| s.name)
            .unwrap_or_else(|| "Loja".to_string()),
        None => "Todas as lojas".to_string(),
    };

    let pdf = build_monthly_summary_pdf(&summaries, &store_label)?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"resumo-mensal.pdf\"".to_string(),
            ),
        ],
        pdf,
    ))
}

// GET /api/admin/metrics
#[utoipa::path(
    get,
    path = "/api/admin/metrics",
    tag = "Relatórios",
    params(ReportQuery),
    responses(
        (status = 200, description = "Rankings, desempenho mensal e maiores despesas", body = AdminMetrics),
        (status = 403, description = "Restrito a administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn admin_metrics(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, AppError> {
    let (boxes, fixed) = load_period(&app_state, &user, &query).await?;
    let catalog = app_state.catalog_repo.list_service_types().await?;
    let stores = app_state.catalog_repo.list_stores().await?;

    let metrics = aggregate_metrics(&boxes, &fixed, &catalog, &stores);

    Ok((StatusCode::OK, Json(metrics)))
}
