// src/services/cash_box.rs
//
// Ciclo de vida do caixa diário: criação atômica (caixa + filhos +
// recebíveis da sessão em uma transação), listagem com filhos carregados,
// consulta com totais e remoção em cascata.

use std::collections::HashMap;

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        CashBoxRepository, CatalogRepository, ReceivableRepository,
        cash_box_repo::{NewExpenseLine, NewServiceLine},
    },
    models::{
        auth::{User, UserRole},
        cash_box::{CashBoxDetail, CashBoxWithItems, CreateCashBoxPayload},
    },
    services::totals::calculate_cash_box_totals,
};

#[derive(Clone)]
pub struct CashBoxService {
    pool: PgPool,
    cash_box_repo: CashBoxRepository,
    catalog_repo: CatalogRepository,
    receivable_repo: ReceivableRepository,
}

impl CashBoxService {
    pub fn new(
        pool: PgPool,
        cash_box_repo: CashBoxRepository,
        catalog_repo: CatalogRepository,
        receivable_repo: ReceivableRepository,
    ) -> Self {
        Self {
            pool,
            cash_box_repo,
            catalog_repo,
            receivable_repo,
        }
    }

    /// Fecha o caixa do dia: caixa, serviços, entradas eletrônicas,
    /// despesas e recebíveis da sessão entram juntos ou nada entra.
    pub async fn create_daily_cash_box(
        &self,
        user: &User,
        payload: &CreateCashBoxPayload,
    ) -> Result<CashBoxDetail, AppError> {
        if !user.can_access_store(payload.store_id) {
            return Err(AppError::StoreAccessDenied);
        }

        let catalog = self.catalog_repo.list_service_types().await?;

        // Normalização de entrada: quantidade negativa vira zero e linha
        // zerada não é persistida; id fora do catálogo é descartado com
        // aviso, nunca derruba o fechamento.
        let mut service_lines = Vec::with_capacity(payload.services.len());
        for line in &payload.services {
            let quantity = line.quantity.max(0);
            if quantity == 0 {
                continue;
            }
            let Some(service_type) = catalog.iter().find(|st| st.id == line.service_type_id) else {
                tracing::warn!(
                    "Caixa diário: tipo de serviço {} não existe no catálogo, linha descartada",
                    line.service_type_id
                );
                continue;
            };
            let unit_price_cents = line.unit_price_cents.unwrap_or(service_type.default_price_cents);
            service_lines.push(NewServiceLine {
                service_type_id: service_type.id,
                unit_price_cents,
                quantity,
                total_cents: i64::from(quantity) * unit_price_cents,
            });
        }

        let expense_lines: Vec<NewExpenseLine> = payload
            .expenses
            .iter()
            .filter(|e| !e.title.trim().is_empty() && e.amount_cents > 0)
            .map(|e| NewExpenseLine {
                title: e.title.trim().to_string(),
                amount_cents: e.amount_cents,
            })
            .collect();

        let mut tx = self.pool.begin().await?;

        let cash_box = self
            .cash_box_repo
            .create_cash_box(
                &mut tx,
                payload.store_id,
                payload.date,
                user.id,
                payload.note.as_deref(),
            )
            .await?;

        self.cash_box_repo
            .insert_services(&mut tx, cash_box.id, &service_lines)
            .await?;

        for entry in &payload.electronic_entries {
            self.cash_box_repo
                .insert_electronic_entry(&mut tx, cash_box.id, entry.method, entry.amount_cents)
                .await?;
        }

        self.cash_box_repo
            .insert_expenses(&mut tx, cash_box.id, &expense_lines)
            .await?;

        for receivable in &payload.receivables {
            self.receivable_repo
                .create(
                    &mut tx,
                    payload.store_id,
                    &receivable.customer_name,
                    receivable.plate.as_deref(),
                    receivable.service_type_id,
                    receivable.original_amount_cents,
                    receivable.due_date,
                )
                .await?;
        }

        tx.commit().await?;

        tracing::info!(
            "Caixa diário criado: loja {} data {} por {}",
            payload.store_id,
            payload.date,
            user.email
        );

        let mut detail = self.get_with_totals(user, cash_box.id).await?;

        // Os recebíveis da sessão só entram no cálculo no momento do
        // fechamento; depois vivem de forma independente do caixa.
        let session_amounts: Vec<i64> = payload
            .receivables
            .iter()
            .map(|r| r.original_amount_cents)
            .collect();
        detail.totals = calculate_cash_box_totals(
            &detail.services,
            &detail.electronic_entries,
            &detail.expenses,
            &session_amounts,
            &catalog,
        );

        Ok(detail)
    }

    pub async fn list_with_items(
        &self,
        user: &User,
        store_id: Option<Uuid>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<CashBoxWithItems>, AppError> {
        // Vistoriador enxerga apenas a própria loja
        let effective_store = match user.role {
            UserRole::Admin => store_id,
            UserRole::Vistoriador => {
                let own = user.store_id.ok_or(AppError::StoreAccessDenied)?;
                if store_id.is_some_and(|requested| requested != own) {
                    return Err(AppError::StoreAccessDenied);
                }
                Some(own)
            }
        };

        let boxes = self
            .cash_box_repo
            .list_cash_boxes(effective_store, from, to)
            .await?;

        self.assemble(boxes).await
    }

    pub async fn get_with_totals(&self, user: &User, id: Uuid) -> Result<CashBoxDetail, AppError> {
        let cash_box = self
            .cash_box_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)?;

        if !user.can_access_store(cash_box.store_id) {
            return Err(AppError::StoreAccessDenied);
        }

        let ids = [cash_box.id];
        let services = self.cash_box_repo.load_services(&ids).await?;
        let electronic_entries = self.cash_box_repo.load_electronic_entries(&ids).await?;
        let expenses = self.cash_box_repo.load_expenses(&ids).await?;

        let catalog = self.catalog_repo.list_service_types().await?;
        let totals =
            calculate_cash_box_totals(&services, &electronic_entries, &expenses, &[], &catalog);

        Ok(CashBoxDetail {
            cash_box,
            services,
            electronic_entries,
            expenses,
            totals,
        })
    }

    pub async fn delete(&self, user: &User, id: Uuid) -> Result<(), AppError> {
        let cash_box = self
            .cash_box_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)?;

        if !user.can_access_store(cash_box.store_id) {
            return Err(AppError::StoreAccessDenied);
        }

        self.cash_box_repo.delete_cash_box(id).await?;
        Ok(())
    }

    // Monta os agregados em lote: uma query por tabela filha, não por caixa.
    async fn assemble(
        &self,
        boxes: Vec<crate::models::cash_box::CashBox>,
    ) -> Result<Vec<CashBoxWithItems>, AppError> {
        if boxes.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = boxes.iter().map(|b| b.id).collect();

        let mut services_by_box: HashMap<Uuid, Vec<_>> = HashMap::new();
        for line in self.cash_box_repo.load_services(&ids).await? {
            services_by_box.entry(line.cash_box_id).or_default().push(line);
        }

        let mut entries_by_box: HashMap<Uuid, Vec<_>> = HashMap::new();
        for entry in self.cash_box_repo.load_electronic_entries(&ids).await? {
            entries_by_box.entry(entry.cash_box_id).or_default().push(entry);
        }

        let mut expenses_by_box: HashMap<Uuid, Vec<_>> = HashMap::new();
        for expense in self.cash_box_repo.load_expenses(&ids).await? {
            expenses_by_box.entry(expense.cash_box_id).or_default().push(expense);
        }

        Ok(boxes
            .into_iter()
            .map(|cash_box| CashBoxWithItems {
                services: services_by_box.remove(&cash_box.id).unwrap_or_default(),
                electronic_entries: entries_by_box.remove(&cash_box.id).unwrap_or_default(),
                expenses: expenses_by_box.remove(&cash_box.id).unwrap_or_default(),
                cash_box,
            })
            .collect())
    }
}
