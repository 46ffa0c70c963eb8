// src/services/closure.rs
//
// Fechamento mensal: um caixa sintético que representa os totais agregados
// de um mês inteiro, usado pelos admins para meses históricos sem dados
// diários. Identificado pela nota "Fechamento manual yyyy-MM"; existe no
// máximo um por (loja, mês).

use chrono::{Datelike, NaiveDate, Weekday};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        CashBoxRepository, CatalogRepository,
        cash_box_repo::{NewExpenseLine, NewServiceLine},
    },
    models::{
        catalog::ServiceType,
        reports::{ClosureExpenseInput, ClosureServiceInput, MonthlyClosureView},
    },
};

pub const CLOSURE_NOTE_PREFIX: &str = "Fechamento manual ";

// Piso de preço por código de serviço: vale quando o preço padrão do
// catálogo está zerado por má configuração.
const FLOOR_PRICES: &[(&str, i64)] = &[("revistoria", 6000)];

/// Nota que identifica o caixa sintético do mês.
pub fn closure_note(month: &str) -> String {
    format!("{}{}", CLOSURE_NOTE_PREFIX, month)
}

/// Primeiro dia do mês e primeiro dia do mês seguinte (intervalo semiaberto).
pub fn month_date_range(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((first, next))
}

/// Escolhe deterministicamente um domingo do mês para datar o caixa
/// sintético. O mesmo (ano, mês) sempre cai no mesmo domingo, e caixas
/// reais raramente são datados em domingo, o que minimiza colisões.
pub fn closure_sunday(year: i32, month: u32) -> Option<NaiveDate> {
    let (first, next) = month_date_range(year, month)?;

    let sundays: Vec<NaiveDate> = first
        .iter_days()
        .take_while(|d| *d < next)
        .filter(|d| d.weekday() == Weekday::Sun)
        .collect();

    // Todo mês tem pelo menos quatro domingos
    let index = ((year as i64 * 31 + i64::from(month) * 17) as usize) % sundays.len();
    Some(sundays[index])
}

/// Resolve as linhas de serviço do fechamento contra o catálogo.
/// Id desconhecido é descartado com aviso (nunca derruba a operação);
/// quantidade zero ou negativa também fica de fora.
pub fn resolve_closure_services(
    inputs: &[ClosureServiceInput],
    catalog: &[ServiceType],
) -> Vec<NewServiceLine> {
    let mut lines = Vec::with_capacity(inputs.len());

    for input in inputs {
        if input.quantity <= 0 {
            continue;
        }

        let Some(service_type) = catalog.iter().find(|st| st.id == input.service_type_id) else {
            tracing::warn!(
                "Fechamento mensal: tipo de serviço {} não existe no catálogo, linha descartada",
                input.service_type_id
            );
            continue;
        };

        let unit_price_cents = if service_type.default_price_cents > 0 {
            service_type.default_price_cents
        } else {
            FLOOR_PRICES
                .iter()
                .find(|(code, _)| *code == service_type.code)
                .map(|(_, floor)| *floor)
                .unwrap_or(0)
        };

        lines.push(NewServiceLine {
            service_type_id: service_type.id,
            unit_price_cents,
            quantity: input.quantity,
            total_cents: i64::from(input.quantity) * unit_price_cents,
        });
    }

    lines
}

/// Despesas do fechamento: título em branco ou valor não positivo são
/// descartados em silêncio, nunca persistidos como linhas vazias.
pub fn filter_closure_expenses(inputs: &[ClosureExpenseInput]) -> Vec<NewExpenseLine> {
    inputs
        .iter()
        .filter(|e| !e.title.trim().is_empty() && e.amount_cents > 0)
        .map(|e| NewExpenseLine {
            title: e.title.trim().to_string(),
            amount_cents: e.amount_cents,
        })
        .collect()
}

#[derive(Clone)]
pub struct ClosureService {
    pool: sqlx::PgPool,
    cash_box_repo: CashBoxRepository,
    catalog_repo: CatalogRepository,
}

impl ClosureService {
    pub fn new(
        pool: sqlx::PgPool,
        cash_box_repo: CashBoxRepository,
        catalog_repo: CatalogRepository,
    ) -> Self {
        Self {
            pool,
            cash_box_repo,
            catalog_repo,
        }
    }

    fn parse_month(month: &str) -> Result<(i32, u32), AppError> {
        crate::services::summary::parse_month_key(month)
            .ok_or_else(|| AppError::InvalidMonth(month.to_string()))
    }

    /// Estado atual do fechamento de (loja, mês). Quando o mês ainda não
    /// foi salvo, `cash_box_id` vem nulo e as despesas fixas do mês são
    /// devolvidas como prefill (`default_expenses`).
    pub async fn fetch_monthly_closure(
        &self,
        store_id: Uuid,
        month: &str,
    ) -> Result<MonthlyClosureView, AppError> {
        let (year, month_number) = Self::parse_month(month)?;
        let (from, to) = month_date_range(year, month_number)
            .ok_or_else(|| AppError::InvalidMonth(month.to_string()))?;

        let mut conn = self.pool.acquire().await?;

        let closure_box = self
            .cash_box_repo
            .find_closure_box(&mut conn, store_id, &closure_note(month), from, to)
            .await?;

        let default_expenses = self
            .cash_box_repo
            .list_fixed_expenses_for_month(&mut conn, store_id, month)
            .await?;

        match closure_box {
            Some(cash_box) => {
                let ids = [cash_box.id];
                let services = self.cash_box_repo.load_services(&ids).await?;
                let expenses = self.cash_box_repo.load_expenses(&ids).await?;

                Ok(MonthlyClosureView {
                    cash_box_id: Some(cash_box.id),
                    month: month.to_string(),
                    store_id,
                    services,
                    expenses,
                    default_expenses,
                })
            }
            None => Ok(MonthlyClosureView {
                cash_box_id: None,
                month: month.to_string(),
                store_id,
                services: Vec::new(),
                expenses: Vec::new(),
                default_expenses,
            }),
        }
    }

    /// Cria ou atualiza o fechamento do mês. Os filhos são substituídos por
    /// completo (delete + insert) dentro de uma única transação: linha que
    /// não veio no payload deixa de existir. Salvar de novo com o mesmo
    /// payload é idempotente.
    pub async fn upsert_monthly_closure(
        &self,
        store_id: Uuid,
        month: &str,
        user_id: Uuid,
        services: &[ClosureServiceInput],
        expenses: &[ClosureExpenseInput],
    ) -> Result<Uuid, AppError> {
        let (year, month_number) = Self::parse_month(month)?;
        let (from, to) = month_date_range(year, month_number)
            .ok_or_else(|| AppError::InvalidMonth(month.to_string()))?;

        let catalog = self.catalog_repo.list_service_types().await?;
        let service_lines = resolve_closure_services(services, &catalog);
        let expense_lines = filter_closure_expenses(expenses);

        let note = closure_note(month);
        let date = closure_sunday(year, month_number)
            .ok_or_else(|| AppError::InvalidMonth(month.to_string()))?;

        // Localizar/criar o caixa e substituir os filhos é atômico: se
        // qualquer passo falhar, o rollback desfaz tudo e nenhum caixa
        // órfão fica para trás.
        let mut tx = self.pool.begin().await?;

        let cash_box_id = match self
            .cash_box_repo
            .find_closure_box(&mut tx, store_id, &note, from, to)
            .await?
        {
            Some(existing) => {
                self.cash_box_repo
                    .update_cash_box(&mut tx, existing.id, date, user_id, Some(&note))
                    .await?;
                existing.id
            }
            None => {
                self.cash_box_repo
                    .create_cash_box(&mut tx, store_id, date, user_id, Some(&note))
                    .await?
                    .id
            }
        };

        self.cash_box_repo.delete_children(&mut tx, cash_box_id).await?;
        self.cash_box_repo
            .insert_services(&mut tx, cash_box_id, &service_lines)
            .await?;
        self.cash_box_repo
            .insert_expenses(&mut tx, cash_box_id, &expense_lines)
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Fechamento mensal salvo: loja {} mês {} ({} serviços, {} despesas)",
            store_id,
            month,
            service_lines.len(),
            expense_lines.len()
        );

        Ok(cash_box_id)
    }

    /// Remove o fechamento, "reabrindo" o mês para nova digitação.
    /// Os filhos caem em cascata no banco.
    pub async fn delete_monthly_closure(&self, cash_box_id: Uuid) -> Result<(), AppError> {
        let cash_box = self
            .cash_box_repo
            .find_by_id(cash_box_id)
            .await?
            .ok_or(AppError::NotFound)?;

        // Só caixas sintéticos passam por aqui; um caixa diário de verdade
        // tem seu próprio endpoint de remoção.
        let is_closure = cash_box
            .note
            .as_deref()
            .is_some_and(|n| n.starts_with(CLOSURE_NOTE_PREFIX));
        if !is_closure {
            return Err(AppError::NotFound);
        }

        self.cash_box_repo.delete_cash_box(cash_box_id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service_type(code: &str, price: i64) -> ServiceType {
        ServiceType {
            id: Uuid::new_v4(),
            code: code.to_string(),
            name: code.to_string(),
            default_price_cents: price,
            counts_in_gross: true,
            is_active: true,
        }
    }

    #[test]
    fn domingo_deterministico_e_estavel() {
        for month in 1..=12 {
            let a = closure_sunday(2024, month).unwrap();
            let b = closure_sunday(2024, month).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn todo_mes_cai_num_domingo_do_proprio_mes() {
        // Ano não bissexto inteiro
        for month in 1..=12 {
            let date = closure_sunday(2023, month).unwrap();
            assert_eq!(date.weekday(), Weekday::Sun, "mês {}", month);
            assert_eq!(date.month(), month);
            assert_eq!(date.year(), 2023);
        }
    }

    #[test]
    fn intervalo_do_mes_cobre_dezembro() {
        let (from, to) = month_date_range(2024, 12).unwrap();
        assert_eq!(from, NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());
        assert_eq!(to, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    }

    #[test]
    fn nota_do_fechamento() {
        assert_eq!(closure_note("2024-03"), "Fechamento manual 2024-03");
    }

    #[test]
    fn resolve_servicos_filtra_e_precifica() {
        let vistoria = service_type("vistoria", 12000);
        let retorno = service_type("retorno", 0);
        let catalog = vec![vistoria.clone(), retorno.clone()];

        let inputs = vec![
            ClosureServiceInput {
                service_type_id: vistoria.id,
                quantity: 10,
            },
            // Quantidade zero: descartada
            ClosureServiceInput {
                service_type_id: retorno.id,
                quantity: 0,
            },
            // Id fora do catálogo: descartado com aviso
            ClosureServiceInput {
                service_type_id: Uuid::new_v4(),
                quantity: 5,
            },
        ];

        let lines = resolve_closure_services(&inputs, &catalog);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].service_type_id, vistoria.id);
        assert_eq!(lines[0].unit_price_cents, 12000);
        assert_eq!(lines[0].total_cents, 120000);
    }

    #[test]
    fn preco_piso_cobre_catalogo_zerado() {
        // Revistoria mal configurada com preço 0 no catálogo
        let revistoria = service_type("revistoria", 0);
        let catalog = vec![revistoria.clone()];

        let lines = resolve_closure_services(
            &[ClosureServiceInput {
                service_type_id: revistoria.id,
                quantity: 2,
            }],
            &catalog,
        );

        assert_eq!(lines[0].unit_price_cents, 6000);
        assert_eq!(lines[0].total_cents, 12000);
    }

    #[test]
    fn despesas_em_branco_ou_zeradas_sao_descartadas() {
        let inputs = vec![
            ClosureExpenseInput {
                title: "  Aluguel  ".to_string(),
                amount_cents: 80000,
            },
            ClosureExpenseInput {
                title: "   ".to_string(),
                amount_cents: 500,
            },
            ClosureExpenseInput {
                title: "Energia".to_string(),
                amount_cents: 0,
            },
        ];

        let expenses = filter_closure_expenses(&inputs);
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].title, "Aluguel");
        assert_eq!(expenses[0].amount_cents, 80000);
    }
}
