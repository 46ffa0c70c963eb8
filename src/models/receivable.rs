// src/models/receivable.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::cash_box::PaymentMethod;

// Ciclo de vida em 3 estados; nenhuma transição é reversível.
// aberto -> pago_pendente_baixa (registro de pagamento)
// pago_pendente_baixa -> baixado (confirmação do admin)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "receivable_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReceivableStatus {
    Aberto,
    PagoPendenteBaixa,
    Baixado,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Receivable {
    pub id: Uuid,
    pub store_id: Uuid,

    #[schema(example = "João da Silva")]
    pub customer_name: String,

    #[schema(example = "ABC1D23")]
    pub plate: Option<String>,

    pub service_type_id: Option<Uuid>,

    #[schema(example = 12000)]
    pub original_amount_cents: i64,

    #[schema(value_type = Option<String>, format = Date)]
    pub due_date: Option<NaiveDate>,

    pub status: ReceivableStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Pagamento registrado contra um recebível. Apenas inserção.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReceivablePayment {
    pub id: Uuid,
    pub receivable_id: Uuid,

    #[schema(value_type = String, format = Date)]
    pub paid_on: NaiveDate,

    pub amount_cents: i64,
    pub method: PaymentMethod,
    pub created_at: DateTime<Utc>,
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReceivablePayload {
    pub store_id: Uuid,

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
pub struct RegisterPaymentPayload {
    #[schema(value_type = String, format = Date)]
    pub paid_on: NaiveDate,

    #[validate(range(min = 1, message = "O valor deve ser maior que zero."))]
    pub amount_cents: i64,

    pub method: PaymentMethod,
}
