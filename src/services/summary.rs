// src/services/summary.rs
//
// Consolidação mensal: dobra muitos caixas (com filhos carregados) e
// despesas fixas em uma linha por mês. Função pura, sem I/O.

use std::collections::BTreeMap;

use crate::{
    models::{
        cash_box::{CashBoxWithItems, FixedExpense},
        catalog::ServiceType,
        reports::MonthlySummary,
    },
    services::totals::calculate_cash_box_totals,
};

const MONTH_NAMES_PT: [&str; 12] = [
    "Janeiro", "Fevereiro", "Março", "Abril", "Maio", "Junho", "Julho", "Agosto", "Setembro",
    "Outubro", "Novembro", "Dezembro",
];

/// "2024-03" -> "Março de 2024". Chave fora do formato volta como veio.
pub fn month_label(month_key: &str) -> String {
    if let Some((year, month)) = parse_month_key(month_key) {
        format!("{} de {}", MONTH_NAMES_PT[(month - 1) as usize], year)
    } else {
        month_key.to_string()
    }
}

/// Valida e decompõe uma chave "yyyy-MM".
pub fn parse_month_key(month_key: &str) -> Option<(i32, u32)> {
    let (year_str, month_str) = month_key.split_once('-')?;
    if year_str.len() != 4 || month_str.len() != 2 {
        return None;
    }
    let year: i32 = year_str.parse().ok()?;
    let month: u32 = month_str.parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }
    Some((year, month))
}

/// Consolida caixas e despesas fixas em uma linha por mês, do mais recente
/// para o mais antigo. O conjunto de meses é a UNIÃO dos dois lados: mês só
/// com despesa fixa (ou só com caixas) também vira linha, com o lado ausente
/// zerado. Recebíveis ficam de fora da consolidação mensal.
pub fn summarize_cash_boxes(
    cash_boxes: &[CashBoxWithItems],
    fixed_expenses: &[FixedExpense],
    catalog: &[ServiceType],
) -> Vec<MonthlySummary> {
    let mut boxes_by_month: BTreeMap<String, Vec<&CashBoxWithItems>> = BTreeMap::new();
    for cb in cash_boxes {
        let key = cb.cash_box.date.format("%Y-%m").to_string();
        boxes_by_month.entry(key).or_default().push(cb);
    }

    let mut fixed_by_month: BTreeMap<String, i64> = BTreeMap::new();
    for fe in fixed_expenses {
        // month_year já chega como yyyy-MM; o corte protege contra lixo antigo
        let key: String = fe.month_year.chars().take(7).collect();
        *fixed_by_month.entry(key).or_default() += fe.amount_cents;
    }

    let mut month_keys: Vec<String> = boxes_by_month.keys().cloned().collect();
    for key in fixed_by_month.keys() {
        if !boxes_by_month.contains_key(key) {
            month_keys.push(key.clone());
        }
    }
    month_keys.sort();
    month_keys.reverse(); // mais recente primeiro

    month_keys
        .into_iter()
        .map(|month_key| {
            let empty = Vec::new();
            let month_boxes = boxes_by_month.get(&month_key).unwrap_or(&empty);

            let mut gross = 0i64;
            let mut pix = 0i64;
            let mut cartao = 0i64;
            let mut expenses_total = 0i64;
            let mut return_quantity = 0i64;

            for cb in month_boxes {
                let totals = calculate_cash_box_totals(
                    &cb.services,
                    &cb.electronic_entries,
                    &cb.expenses,
                    &[],
                    catalog,
                );
                gross += totals.gross;
                pix += totals.pix;
                cartao += totals.cartao;
                expenses_total += totals.expenses_total;
                return_quantity += totals.return_quantity;
            }

            let fixed = fixed_by_month.get(&month_key).copied().unwrap_or(0);
            let net = gross - expenses_total;

            MonthlySummary {
                month_label: month_label(&month_key),
                month_key,
                gross,
                pix,
                cartao,
                electronic_total: pix + cartao,
                expenses_total,
                net,
                fixed_expenses: fixed,
                net_after_fixed: net - fixed,
                return_quantity,
                cash_box_count: month_boxes.len() as i64,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    use crate::models::cash_box::{CashBox, ElectronicEntry, ExpenseLine, PaymentMethod, ServiceLine};

    fn catalog() -> (Uuid, Vec<ServiceType>) {
        let vistoria = Uuid::new_v4();
        (
            vistoria,
            vec![ServiceType {
                id: vistoria,
                code: "vistoria".to_string(),
                name: "Vistoria Veicular".to_string(),
                default_price_cents: 12000,
                counts_in_gross: true,
                is_active: true,
            }],
        )
    }

    fn cash_box_on(date: &str, vistoria: Uuid, quantity: i32) -> CashBoxWithItems {
        let id = Uuid::new_v4();
        CashBoxWithItems {
            cash_box: CashBox {
                id,
                store_id: Uuid::new_v4(),
                date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
                vistoriador_id: Uuid::new_v4(),
                note: None,
                created_at: Utc::now(),
            },
            services: vec![ServiceLine {
                id: Uuid::new_v4(),
                cash_box_id: id,
                service_type_id: vistoria,
                unit_price_cents: 12000,
                quantity,
                total_cents: i64::from(quantity) * 12000,
            }],
            electronic_entries: vec![ElectronicEntry {
                id: Uuid::new_v4(),
                cash_box_id: id,
                method: PaymentMethod::Pix,
                amount_cents: 5000,
            }],
            expenses: vec![ExpenseLine {
                id: Uuid::new_v4(),
                cash_box_id: id,
                title: "Água".to_string(),
                amount_cents: 1000,
            }],
        }
    }

    fn fixed(month_year: &str, amount_cents: i64) -> FixedExpense {
        FixedExpense {
            id: Uuid::new_v4(),
            store_id: Uuid::new_v4(),
            month_year: month_year.to_string(),
            title: "Aluguel".to_string(),
            amount_cents,
            source: "fixa".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn agrupa_por_mes_e_soma() {
        let (vistoria, catalog) = catalog();
        let boxes = vec![
            cash_box_on("2024-01-10", vistoria, 2),
            cash_box_on("2024-01-20", vistoria, 3),
        ];
        let summaries = summarize_cash_boxes(&boxes, &[fixed("2024-01", 80000)], &catalog);

        assert_eq!(summaries.len(), 1);
        let s = &summaries[0];
        assert_eq!(s.month_key, "2024-01");
        assert_eq!(s.month_label, "Janeiro de 2024");
        assert_eq!(s.gross, 60000);
        assert_eq!(s.pix, 10000);
        assert_eq!(s.expenses_total, 2000);
        assert_eq!(s.net, 58000);
        assert_eq!(s.fixed_expenses, 80000);
        assert_eq!(s.net_after_fixed, -22000);
        assert_eq!(s.cash_box_count, 2);
    }

    #[test]
    fn uniao_de_meses_dos_dois_lados() {
        let (vistoria, catalog) = catalog();
        // Caixas só em janeiro; despesa fixa só em fevereiro
        let boxes = vec![cash_box_on("2024-01-10", vistoria, 1)];
        let summaries = summarize_cash_boxes(&boxes, &[fixed("2024-02", 50000)], &catalog);

        assert_eq!(summaries.len(), 2);
        // Mais recente primeiro
        assert_eq!(summaries[0].month_key, "2024-02");
        assert_eq!(summaries[0].gross, 0);
        assert_eq!(summaries[0].fixed_expenses, 50000);
        assert_eq!(summaries[1].month_key, "2024-01");
        assert_eq!(summaries[1].fixed_expenses, 0);
        assert_eq!(summaries[1].gross, 12000);
    }

    #[test]
    fn entradas_vazias_produzem_lista_vazia() {
        let (_, catalog) = catalog();
        assert!(summarize_cash_boxes(&[], &[], &catalog).is_empty());
    }

    #[test]
    fn rotulo_e_chave_de_mes() {
        assert_eq!(month_label("2024-03"), "Março de 2024");
        assert_eq!(month_label("2023-12"), "Dezembro de 2023");
        assert_eq!(month_label("bogus"), "bogus");
        assert_eq!(parse_month_key("2024-03"), Some((2024, 3)));
        assert_eq!(parse_month_key("2024-13"), None);
        assert_eq!(parse_month_key("24-03"), None);
    }
}
