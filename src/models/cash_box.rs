// src/models/cash_box.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_method", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Pix,
    Cartao,
}

// --- Structs ---

// Um caixa diário. Fechamentos mensais sintéticos são distinguidos pela
// nota "Fechamento manual yyyy-MM".
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CashBox {
    pub id: Uuid,
    pub store_id: Uuid,

    #[schema(value_type = String, format = Date, example = "2024-03-15")]
    pub date: NaiveDate,

    pub vistoriador_id: Uuid,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

// Linha de serviço do caixa. `total_cents` é denormalizado
// (quantity * unit_price_cents) e precisa se manter consistente.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceLine {
    pub id: Uuid,
    pub cash_box_id: Uuid,
    pub service_type_id: Uuid,

    #[schema(example = 12000)]
    pub unit_price_cents: i64,

    #[schema(example = 3)]
    pub quantity: i32,

    #[schema(example = 36000)]
    pub total_cents: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ElectronicEntry {
    pub id: Uuid,
    pub cash_box_id: Uuid,
    pub method: PaymentMethod,
    pub amount_cents: i64,
}

// Despesa variável lançada dentro de um caixa.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseLine {
    pub id: Uuid,
    pub cash_box_id: Uuid,

    #[schema(example = "Gasolina")]
    pub title: String,

    pub amount_cents: i64,
}

// Despesa fixa mensal, independente de qualquer caixa.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FixedExpense {
    pub id: Uuid,
    pub store_id: Uuid,

    #[schema(example = "2024-03")]
    pub month_year: String,

    #[schema(example = "Aluguel")]
    pub title: String,

    pub amount_cents: i64,
    pub source: String,
    pub created_at: DateTime<Utc>,
}

// Um caixa com todos os filhos já carregados.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CashBoxWithItems {
    pub cash_box: CashBox,
    pub services: Vec<ServiceLine>,
    pub electronic_entries: Vec<ElectronicEntry>,
    pub expenses: Vec<ExpenseLine>,
}

// Um caixa com filhos e totais calculados, como vai para a API.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CashBoxDetail {
    pub cash_box: CashBox,
    pub services: Vec<ServiceLine>,
    pub electronic_entries: Vec<ElectronicEntry>,
    pub expenses: Vec<ExpenseLine>,
    pub totals: CashBoxTotals,
}

// Totais derivados de um caixa. Nunca persistidos.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CashBoxTotals {
    pub gross: i64,
    pub electronic_total: i64,
    pub net: i64,
    // Dinheiro físico esperado na gaveta; pode ser negativo.
    pub cash: i64,
    pub expenses_total: i64,
    pub receivables_total: i64,
    pub pix: i64,
    pub cartao: i64,
    pub return_quantity: i64,
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceLinePayload {
    pub service_type_id: Uuid,

    #[validate(range(min = 0, message = "A quantidade não pode ser negativa."))]
    pub quantity: i32,

    // Quando omitido, usa o preço padrão do catálogo
    pub unit_price_cents: Option<i64>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ElectronicEntryPayload {
    pub method: PaymentMethod,

    #[validate(range(min = 0, message = "O valor não pode ser negativo."))]
    pub amount_cents: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseLinePayload {
    pub title: String,

    #[validate(range(min = 0, message = "O valor não pode ser negativo."))]
    pub amount_cents: i64,
}

// Recebível criado junto com o fechamento do caixa (cliente saiu devendo).
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionReceivablePayload {
    #[validate(length(min = 1, message = "O nome do cliente é obrigatório."))]
    pub customer_name: String,

    pub plate: Option<String>,
    pub service_type_id: Option<Uuid>,

    #[validate(range(min = 1, message = "O valor deve ser maior que zero."))]
    pub original_amount_cents: i64,

    #[schema(value_type = Option<String>, format = Date)]
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCashBoxPayload {
    pub store_id: Uuid,

    #[schema(value_type = String, format = Date, example = "2024-03-15")]
    pub date: NaiveDate,

    pub note: Option<String>,

    #[validate(nested)]
    pub services: Vec<ServiceLinePayload>,

    #[validate(nested)]
    #[serde(default)]
    pub electronic_entries: Vec<ElectronicEntryPayload>,

    #[validate(nested)]
    #[serde(default)]
    pub expenses: Vec<ExpenseLinePayload>,

    #[validate(nested)]
    #[serde(default)]
    pub receivables: Vec<SessionReceivablePayload>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFixedExpensePayload {
    pub store_id: Uuid,

    #[schema(example = "2024-03")]
    pub month_year: String,

    #[validate(length(min = 1, message = "O título é obrigatório."))]
    pub title: String,

    #[validate(range(min = 1, message = "O valor deve ser maior que zero."))]
    pub amount_cents: i64,
}
