// src/db/cash_box_repo.rs

use chrono::NaiveDate;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::cash_box::{
        CashBox, ElectronicEntry, ExpenseLine, FixedExpense, PaymentMethod, ServiceLine,
    },
};

// Linhas prontas para inserção (já resolvidas e filtradas pelo serviço).
#[derive(Debug, Clone)]
pub struct NewServiceLine {
    pub service_type_id: Uuid,
    pub unit_price_cents: i64,
    pub quantity: i32,
    pub total_cents: i64,
}

#[derive(Debug, Clone)]
pub struct NewExpenseLine {
    pub title: String,
    pub amount_cents: i64,
}

#[derive(Clone)]
pub struct CashBoxRepository {
    pool: PgPool,
}

impl CashBoxRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  CAIXAS
    // =========================================================================

    pub async fn create_cash_box(
        &self,
        conn: &mut PgConnection,
        store_id: Uuid,
        date: NaiveDate,
        vistoriador_id: Uuid,
        note: Option<&str>,
    ) -> Result<CashBox, AppError> {
        let cash_box = sqlx::query_as::<_, CashBox>(
            r#"
            INSERT INTO cash_boxes (store_id, date, vistoriador_id, note)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(store_id)
        .bind(date)
        .bind(vistoriador_id)
        .bind(note)
        .fetch_one(conn)
        .await?;

        Ok(cash_box)
    }

    pub async fn update_cash_box(
        &self,
        conn: &mut PgConnection,
        id: Uuid,
        date: NaiveDate,
        vistoriador_id: Uuid,
        note: Option<&str>,
    ) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE cash_boxes SET date = $2, vistoriador_id = $3, note = $4 WHERE id = $1",
        )
        .bind(id)
        .bind(date)
        .bind(vistoriador_id)
        .bind(note)
        .execute(conn)
        .await?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<CashBox>, AppError> {
        let cash_box = sqlx::query_as::<_, CashBox>("SELECT * FROM cash_boxes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(cash_box)
    }

    // Localiza o caixa sintético de fechamento do mês (pela nota + intervalo).
    pub async fn find_closure_box(
        &self,
        conn: &mut PgConnection,
        store_id: Uuid,
        note: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Option<CashBox>, AppError> {
        let cash_box = sqlx::query_as::<_, CashBox>(
            r#"
            SELECT * FROM cash_boxes
            WHERE store_id = $1 AND note = $2 AND date >= $3 AND date < $4
            LIMIT 1
            "#,
        )
        .bind(store_id)
        .bind(note)
        .bind(from)
        .bind(to)
        .fetch_optional(conn)
        .await?;

        Ok(cash_box)
    }

    // Filtros opcionais: loja e intervalo de datas.
    pub async fn list_cash_boxes(
        &self,
        store_id: Option<Uuid>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<CashBox>, AppError> {
        let boxes = sqlx::query_as::<_, CashBox>(
            r#"
            SELECT * FROM cash_boxes
            WHERE ($1::uuid IS NULL OR store_id = $1)
              AND ($2::date IS NULL OR date >= $2)
              AND ($3::date IS NULL OR date <= $3)
            ORDER BY date DESC, created_at DESC
            "#,
        )
        .bind(store_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(boxes)
    }

    pub async fn delete_cash_box(&self, id: Uuid) -> Result<u64, AppError> {
        // Os filhos caem junto via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM cash_boxes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    // =========================================================================
    //  FILHOS DO CAIXA
    // =========================================================================

    pub async fn load_services(
        &self,
        cash_box_ids: &[Uuid],
    ) -> Result<Vec<ServiceLine>, AppError> {
        let lines = sqlx::query_as::<_, ServiceLine>(
            "SELECT * FROM cash_box_services WHERE cash_box_id = ANY($1)",
        )
        .bind(cash_box_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    pub async fn load_electronic_entries(
        &self,
        cash_box_ids: &[Uuid],
    ) -> Result<Vec<ElectronicEntry>, AppError> {
        let entries = sqlx::query_as::<_, ElectronicEntry>(
            "SELECT * FROM cash_box_electronic_entries WHERE cash_box_id = ANY($1)",
        )
        .bind(cash_box_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    pub async fn load_expenses(
        &self,
        cash_box_ids: &[Uuid],
    ) -> Result<Vec<ExpenseLine>, AppError> {
        let expenses = sqlx::query_as::<_, ExpenseLine>(
            "SELECT * FROM cash_box_expenses WHERE cash_box_id = ANY($1)",
        )
        .bind(cash_box_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(expenses)
    }

    pub async fn insert_services(
        &self,
        conn: &mut PgConnection,
        cash_box_id: Uuid,
        lines: &[NewServiceLine],
    ) -> Result<(), AppError> {
        for line in lines {
            sqlx::query(
                r#"
                INSERT INTO cash_box_services
                    (cash_box_id, service_type_id, unit_price_cents, quantity, total_cents)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(cash_box_id)
            .bind(line.service_type_id)
            .bind(line.unit_price_cents)
            .bind(line.quantity)
            .bind(line.total_cents)
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }

    pub async fn insert_electronic_entry(
        &self,
        conn: &mut PgConnection,
        cash_box_id: Uuid,
        method: PaymentMethod,
        amount_cents: i64,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO cash_box_electronic_entries (cash_box_id, method, amount_cents)
            VALUES ($1, $2, $3)
            ON CONFLICT (cash_box_id, method)
            DO UPDATE SET amount_cents = EXCLUDED.amount_cents
            "#,
        )
        .bind(cash_box_id)
        .bind(method)
        .bind(amount_cents)
        .execute(conn)
        .await?;

        Ok(())
    }

    pub async fn insert_expenses(
        &self,
        conn: &mut PgConnection,
        cash_box_id: Uuid,
        expenses: &[NewExpenseLine],
    ) -> Result<(), AppError> {
        for expense in expenses {
            sqlx::query(
                "INSERT INTO cash_box_expenses (cash_box_id, title, amount_cents) VALUES ($1, $2, $3)",
            )
            .bind(cash_box_id)
            .bind(&expense.title)
            .bind(expense.amount_cents)
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }

    // Substituição total dos filhos do fechamento (serviços e despesas).
    pub async fn delete_children(
        &self,
        conn: &mut PgConnection,
        cash_box_id: Uuid,
    ) -> Result<(), AppError> {
        sqlx::query("DELETE FROM cash_box_services WHERE cash_box_id = $1")
            .bind(cash_box_id)
            .execute(&mut *conn)
            .await?;

        sqlx::query("DELETE FROM cash_box_expenses WHERE cash_box_id = $1")
            .bind(cash_box_id)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    // =========================================================================
    //  DESPESAS FIXAS (monthly_expenses)
    // =========================================================================

    pub async fn list_fixed_expenses(
        &self,
        store_id: Option<Uuid>,
        from_month: Option<&str>,
        to_month: Option<&str>,
    ) -> Result<Vec<FixedExpense>, AppError> {
        let expenses = sqlx::query_as::<_, FixedExpense>(
            r#"
            SELECT * FROM monthly_expenses
            WHERE ($1::uuid IS NULL OR store_id = $1)
              AND ($2::text IS NULL OR month_year >= $2)
              AND ($3::text IS NULL OR month_year <= $3)
            ORDER BY month_year DESC, title ASC
            "#,
        )
        .bind(store_id)
        .bind(from_month)
        .bind(to_month)
        .fetch_all(&self.pool)
        .await?;

        Ok(expenses)
    }

    pub async fn list_fixed_expenses_for_month(
        &self,
        conn: &mut PgConnection,
        store_id: Uuid,
        month_year: &str,
    ) -> Result<Vec<FixedExpense>, AppError> {
        let expenses = sqlx::query_as::<_, FixedExpense>(
            "SELECT * FROM monthly_expenses WHERE store_id = $1 AND month_year = $2 ORDER BY title ASC",
        )
        .bind(store_id)
        .bind(month_year)
        .fetch_all(conn)
        .await?;

        Ok(expenses)
    }

    pub async fn create_fixed_expense(
        &self,
        store_id: Uuid,
        month_year: &str,
        title: &str,
        amount_cents: i64,
    ) -> Result<FixedExpense, AppError> {
        let expense = sqlx::query_as::<_, FixedExpense>(
            r#"
            INSERT INTO monthly_expenses (store_id, month_year, title, amount_cents)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(store_id)
        .bind(month_year)
        .bind(title)
        .bind(amount_cents)
        .fetch_one(&self.pool)
        .await?;

        Ok(expense)
    }

    pub async fn delete_fixed_expense(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM monthly_expenses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
