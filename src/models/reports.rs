// src/models/reports.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::cash_box::{ExpenseLine, FixedExpense, ServiceLine};

// 1. Resumo mensal consolidado (uma linha por mês do período filtrado)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    #[schema(example = "2024-03")]
    pub month_key: String,

    #[schema(example = "Março de 2024")]
    pub month_label: String,

    pub gross: i64,
    pub pix: i64,
    pub cartao: i64,
    pub electronic_total: i64,
    pub expenses_total: i64,
    pub net: i64,
    pub fixed_expenses: i64,
    pub net_after_fixed: i64,
    pub return_quantity: i64,
    pub cash_box_count: i64,
}

// 2. Métricas administrativas (rankings e desempenho)

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceTypeMetric {
    pub service_type_id: Uuid,
    pub code: String,
    pub name: String,
    pub quantity: i64,
    pub total_cents: i64,
    // Valor total / quantidade (0 quando a quantidade é 0)
    pub average_ticket_cents: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoreMetric {
    pub store_id: Uuid,
    pub store_name: String,
    pub quantity: i64,
    pub total_cents: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthPerformance {
    #[schema(example = "2024-03")]
    pub month_key: String,

    #[schema(example = "Março de 2024")]
    pub month_label: String,

    pub service_revenue_cents: i64,
    pub variable_expenses_cents: i64,
    pub fixed_expenses_cents: i64,
    pub net_cents: i64,
}

// Agrupamento de despesas variáveis pelo título (não pelo id): despesas com
// o mesmo título em caixas diferentes caem no mesmo balde.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseBucket {
    #[schema(example = "Gasolina")]
    pub title: String,

    pub total_cents: i64,
    pub occurrences: i64,

    // "Diversas lojas" quando o balde atravessa mais de uma loja
    #[schema(example = "Diversas lojas")]
    pub store_name: String,

    // "Múltiplos períodos" quando o balde atravessa mais de um mês
    #[schema(example = "Março de 2024")]
    pub month_label: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminMetrics {
    pub service_ranking: Vec<ServiceTypeMetric>,
    pub store_ranking: Vec<StoreMetric>,
    pub monthly_performance: Vec<MonthPerformance>,
    pub best_months: Vec<MonthPerformance>,
    pub worst_months: Vec<MonthPerformance>,
    pub top_expenses: Vec<ExpenseBucket>,
    pub total_revenue_cents: i64,
    pub total_expenses_cents: i64,
    pub total_return_quantity: i64,
}

// 3. Fechamento mensal (caixa sintético)

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyClosureView {
    // null quando o mês ainda não foi salvo
    pub cash_box_id: Option<Uuid>,

    #[schema(example = "2024-03")]
    pub month: String,

    pub store_id: Uuid,
    pub services: Vec<ServiceLine>,
    pub expenses: Vec<ExpenseLine>,

    // Prefill de despesas fixas: só relevante quando cash_box_id é null
    pub default_expenses: Vec<FixedExpense>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClosureServiceInput {
    pub service_type_id: Uuid,

    #[validate(range(min = 0, message = "A quantidade não pode ser negativa."))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClosureExpenseInput {
    pub title: String,

    #[validate(range(min = 0, message = "O valor não pode ser negativo."))]
    pub amount_cents: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertClosurePayload {
    pub store_id: Uuid,

    #[schema(example = "2024-03")]
    pub month: String,

    #[validate(nested)]
    #[serde(default)]
    pub services: Vec<ClosureServiceInput>,

    #[validate(nested)]
    #[serde(default)]
    pub expenses: Vec<ClosureExpenseInput>,
}
