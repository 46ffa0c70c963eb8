// src/db/catalog_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::catalog::{ServiceType, Store},
};

// Lojas e catálogo de tipos de serviço.
#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  LOJAS
    // =========================================================================

    pub async fn list_stores(&self) -> Result<Vec<Store>, AppError> {
        let stores = sqlx::query_as::<_, Store>(
            "SELECT * FROM stores WHERE is_active = TRUE ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(stores)
    }

    pub async fn find_store(&self, id: Uuid) -> Result<Option<Store>, AppError> {
        let store = sqlx::query_as::<_, Store>("SELECT * FROM stores WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(store)
    }

    pub async fn create_store(
        &self,
        name: &str,
        city: Option<&str>,
    ) -> Result<Store, AppError> {
        let store = sqlx::query_as::<_, Store>(
            "INSERT INTO stores (name, city) VALUES ($1, $2) RETURNING *",
        )
        .bind(name)
        .bind(city)
        .fetch_one(&self.pool)
        .await?;

        Ok(store)
    }

    // =========================================================================
    //  TIPOS DE SERVIÇO
    // =========================================================================

    pub async fn list_service_types(&self) -> Result<Vec<ServiceType>, AppError> {
        let types = sqlx::query_as::<_, ServiceType>(
            "SELECT * FROM service_types WHERE is_active = TRUE ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(types)
    }

    pub async fn create_service_type(
        &self,
        code: &str,
        name: &str,
        default_price_cents: i64,
        counts_in_gross: bool,
    ) -> Result<ServiceType, AppError> {
        let service_type = sqlx::query_as::<_, ServiceType>(
            r#"
            INSERT INTO service_types (code, name, default_price_cents, counts_in_gross)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(code)
        .bind(name)
        .bind(default_price_cents)
        .bind(counts_in_gross)
        .fetch_one(&self.pool)
        .await?;

        Ok(service_type)
    }
}
