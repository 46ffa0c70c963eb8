// src/models/catalog.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: Uuid,

    #[schema(example = "TOP Vistorias - Centro")]
    pub name: String,

    #[schema(example = "Uberlândia")]
    pub city: Option<String>,

    pub is_active: bool,

    pub created_at: DateTime<Utc>,
}

// Tipo de serviço do catálogo. `counts_in_gross = false` marca os serviços
// de retorno (revistoria gratuita): contam quantidade, nunca faturamento.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceType {
    pub id: Uuid,

    #[schema(example = "vistoria")]
    pub code: String,

    #[schema(example = "Vistoria Veicular")]
    pub name: String,

    #[schema(example = 12000)]
    pub default_price_cents: i64,

    pub counts_in_gross: bool,

    pub is_active: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStorePayload {
    #[validate(length(min = 1, message = "O nome da loja é obrigatório."))]
    pub name: String,
    pub city: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceTypePayload {
    #[validate(length(min = 1, message = "O código é obrigatório."))]
    pub code: String,

    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    #[validate(range(min = 0, message = "O preço não pode ser negativo."))]
    pub default_price_cents: i64,

    // Padrão: serviço que fatura
    #[serde(default = "default_counts_in_gross")]
    pub counts_in_gross: bool,
}

fn default_counts_in_gross() -> bool {
    true
}
