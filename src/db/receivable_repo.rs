// src/db/receivable_repo.rs

use chrono::NaiveDate;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        cash_box::PaymentMethod,
        receivable::{Receivable, ReceivablePayment, ReceivableStatus},
    },
};

#[derive(Clone)]
pub struct ReceivableRepository {
    pool: PgPool,
}

impl ReceivableRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        conn: &mut PgConnection,
        store_id: Uuid,
        customer_name: &str,
        plate: Option<&str>,
        service_type_id: Option<Uuid>,
        original_amount_cents: i64,
        due_date: Option<NaiveDate>,
    ) -> Result<Receivable, AppError> {
        let receivable = sqlx::query_as::<_, Receivable>(
            r#"
            INSERT INTO receivables
                (store_id, customer_name, plate, service_type_id, original_amount_cents, due_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(store_id)
        .bind(customer_name)
        .bind(plate)
        .bind(service_type_id)
        .bind(original_amount_cents)
        .bind(due_date)
        .fetch_one(conn)
        .await?;

        Ok(receivable)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Receivable>, AppError> {
        let receivable = sqlx::query_as::<_, Receivable>("SELECT * FROM receivables WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(receivable)
    }

    pub async fn list(
        &self,
        store_id: Option<Uuid>,
        status: Option<ReceivableStatus>,
    ) -> Result<Vec<Receivable>, AppError> {
        let receivables = sqlx::query_as::<_, Receivable>(
            r#"
            SELECT * FROM receivables
            WHERE ($1::uuid IS NULL OR store_id = $1)
              AND ($2::receivable_status IS NULL OR status = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(store_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(receivables)
    }

    pub async fn update_status(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        status: ReceivableStatus,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE receivables SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(conn)
            .await?;

        Ok(())
    }

    // Histórico de pagamentos: apenas inserção, nunca edição.
    pub async fn insert_payment(
        &self,
        conn: &mut PgConnection,
        receivable_id: Uuid,
        paid_on: NaiveDate,
        amount_cents: i64,
        method: PaymentMethod,
    ) -> Result<ReceivablePayment, AppError> {
        let payment = sqlx::query_as::<_, ReceivablePayment>(
            r#"
            INSERT INTO receivable_payments (receivable_id, paid_on, amount_cents, method)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(receivable_id)
        .bind(paid_on)
        .bind(amount_cents)
        .bind(method)
        .fetch_one(conn)
        .await?;

        Ok(payment)
    }

    pub async fn list_payments(
        &self,
        receivable_id: Uuid,
    ) -> Result<Vec<ReceivablePayment>, AppError> {
        let payments = sqlx::query_as::<_, ReceivablePayment>(
            "SELECT * FROM receivable_payments WHERE receivable_id = $1 ORDER BY paid_on ASC",
        )
        .bind(receivable_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }
}
