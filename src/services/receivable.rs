// src/services/receivable.rs
//
// Contas a receber. Ciclo de vida em mão única:
// aberto -> pago_pendente_baixa (registro de pagamento)
// pago_pendente_baixa -> baixado (confirmação do admin)

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ReceivableRepository,
    models::{
        auth::{User, UserRole},
        receivable::{
            CreateReceivablePayload, Receivable, ReceivablePayment, ReceivableStatus,
            RegisterPaymentPayload,
        },
    },
};

#[derive(Clone)]
pub struct ReceivableService {
    pool: PgPool,
    repo: ReceivableRepository,
}

impl ReceivableService {
    pub fn new(pool: PgPool, repo: ReceivableRepository) -> Self {
        Self { pool, repo }
    }

    pub async fn create(
        &self,
        user: &User,
        payload: &CreateReceivablePayload,
    ) -> Result<Receivable, AppError> {
        if !user.can_access_store(payload.store_id) {
            return Err(AppError::StoreAccessDenied);
        }

        let mut conn = self.pool.acquire().await?;
        self.repo
            .create(
                &mut conn,
                payload.store_id,
                &payload.customer_name,
                payload.plate.as_deref(),
                payload.service_type_id,
                payload.original_amount_cents,
                payload.due_date,
            )
            .await
    }

    pub async fn list(
        &self,
        user: &User,
        store_id: Option<Uuid>,
        status: Option<ReceivableStatus>,
    ) -> Result<Vec<Receivable>, AppError> {
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

        self.repo.list(effective_store, status).await
    }

    pub async fn list_payments(
        &self,
        user: &User,
        receivable_id: Uuid,
    ) -> Result<Vec<ReceivablePayment>, AppError> {
        let receivable = self
            .repo
            .find_by_id(receivable_id)
            .await?
            .ok_or(AppError::NotFound)?;

        if !user.can_access_store(receivable.store_id) {
            return Err(AppError::StoreAccessDenied);
        }

        self.repo.list_payments(receivable_id).await
    }

    /// Registra um pagamento e move o recebível para pago_pendente_baixa.
    /// Inserção do pagamento e troca de status são atômicas.
    pub async fn register_payment(
        &self,
        user: &User,
        receivable_id: Uuid,
        payload: &RegisterPaymentPayload,
    ) -> Result<ReceivablePayment, AppError> {
        let receivable = self
            .repo
            .find_by_id(receivable_id)
            .await?
            .ok_or(AppError::NotFound)?;

        if !user.can_access_store(receivable.store_id) {
            return Err(AppError::StoreAccessDenied);
        }

        // Pagamento só sobre recebível em aberto; nada é reversível
        if receivable.status != ReceivableStatus::Aberto {
            return Err(AppError::InvalidStatusTransition);
        }

        let mut tx = self.pool.begin().await?;

        let payment = self
            .repo
            .insert_payment(
                &mut tx,
                receivable_id,
                payload.paid_on,
                payload.amount_cents,
                payload.method,
            )
            .await?;

        self.repo
            .update_status(&mut tx, receivable_id, ReceivableStatus::PagoPendenteBaixa)
            .await?;

        tx.commit().await?;

        Ok(payment)
    }

    /// Baixa (concilia) um recebível pago. Só o admin confirma.
    pub async fn settle(&self, user: &User, receivable_id: Uuid) -> Result<Receivable, AppError> {
        if user.role != UserRole::Admin {
            return Err(AppError::AdminOnly);
        }

        let receivable = self
            .repo
            .find_by_id(receivable_id)
            .await?
            .ok_or(AppError::NotFound)?;

        if receivable.status != ReceivableStatus::PagoPendenteBaixa {
            return Err(AppError::InvalidStatusTransition);
        }

        let mut conn = self.pool.acquire().await?;
        self.repo
            .update_status(&mut conn, receivable_id, ReceivableStatus::Baixado)
            .await?;

        self.repo
            .find_by_id(receivable_id)
            .await?
            .ok_or(AppError::NotFound)
    }
}
