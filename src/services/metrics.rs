// src/services/metrics.rs
//
// Agregador de métricas administrativas: rankings por tipo de serviço e
// por loja, desempenho líquido mensal e maiores despesas recorrentes.
// Redutor puro de leitura; entrada vazia produz métricas zeradas.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use uuid::Uuid;

use crate::{
    models::{
        cash_box::{CashBoxWithItems, FixedExpense},
        catalog::{ServiceType, Store},
        reports::{AdminMetrics, ExpenseBucket, MonthPerformance, ServiceTypeMetric, StoreMetric},
    },
    services::{summary::month_label, totals::calculate_cash_box_totals},
};

// Quantas entradas entram na lista de maiores despesas
const TOP_EXPENSES_LIMIT: usize = 10;

// Top/bottom de meses por resultado líquido
const BEST_WORST_LIMIT: usize = 3;

pub fn aggregate_metrics(
    cash_boxes: &[CashBoxWithItems],
    fixed_expenses: &[FixedExpense],
    catalog: &[ServiceType],
    stores: &[Store],
) -> AdminMetrics {
    let catalog_by_id: HashMap<Uuid, &ServiceType> = catalog.iter().map(|st| (st.id, st)).collect();
    let store_names: HashMap<Uuid, &str> =
        stores.iter().map(|s| (s.id, s.name.as_str())).collect();

    // --- Ranking por tipo de serviço ---
    let mut by_service: HashMap<Uuid, (i64, i64)> = HashMap::new(); // (quantidade, valor)
    for cb in cash_boxes {
        for line in &cb.services {
            if !catalog_by_id.contains_key(&line.service_type_id) {
                // Mesma postura da calculadora: deriva de catálogo não derruba
                continue;
            }
            let entry = by_service.entry(line.service_type_id).or_default();
            entry.0 += i64::from(line.quantity);
            entry.1 += line.total_cents;
        }
    }

    let mut service_ranking: Vec<ServiceTypeMetric> = by_service
        .into_iter()
        .map(|(id, (quantity, total_cents))| {
            let st = catalog_by_id[&id];
            ServiceTypeMetric {
                service_type_id: id,
                code: st.code.clone(),
                name: st.name.clone(),
                quantity,
                total_cents,
                average_ticket_cents: if quantity > 0 { total_cents / quantity } else { 0 },
            }
        })
        .collect();
    service_ranking.sort_by(|a, b| b.total_cents.cmp(&a.total_cents));

    // --- Ranking por loja e desempenho mensal ---
    let mut by_store: HashMap<Uuid, (i64, i64)> = HashMap::new();
    let mut month_revenue: BTreeMap<String, (i64, i64)> = BTreeMap::new(); // (receita, variáveis)
    let mut total_revenue = 0i64;
    let mut total_variable = 0i64;
    let mut total_return_quantity = 0i64;

    for cb in cash_boxes {
        let totals =
            calculate_cash_box_totals(&cb.services, &cb.electronic_entries, &cb.expenses, &[], catalog);

        let store_entry = by_store.entry(cb.cash_box.store_id).or_default();
        store_entry.1 += totals.gross;
        for line in &cb.services {
            let billable = catalog_by_id
                .get(&line.service_type_id)
                .map(|st| st.counts_in_gross)
                .unwrap_or(false);
            if billable {
                store_entry.0 += i64::from(line.quantity);
            }
        }

        let month_key = cb.cash_box.date.format("%Y-%m").to_string();
        let month_entry = month_revenue.entry(month_key).or_default();
        month_entry.0 += totals.gross;
        month_entry.1 += totals.expenses_total;

        total_revenue += totals.gross;
        total_variable += totals.expenses_total;
        total_return_quantity += totals.return_quantity;
    }

    let mut store_ranking: Vec<StoreMetric> = by_store
        .into_iter()
        .map(|(store_id, (quantity, total_cents))| StoreMetric {
            store_id,
            store_name: store_names
                .get(&store_id)
                .map(|n| n.to_string())
                .unwrap_or_else(|| store_id.to_string()),
            quantity,
            total_cents,
        })
        .collect();
    store_ranking.sort_by(|a, b| b.total_cents.cmp(&a.total_cents));

    // --- Meses: união entre caixas e despesas fixas ---
    let mut fixed_by_month: BTreeMap<String, i64> = BTreeMap::new();
    let mut total_fixed = 0i64;
    for fe in fixed_expenses {
        let key: String = fe.month_year.chars().take(7).collect();
        *fixed_by_month.entry(key).or_default() += fe.amount_cents;
        total_fixed += fe.amount_cents;
    }

    let mut month_keys: BTreeSet<String> = month_revenue.keys().cloned().collect();
    month_keys.extend(fixed_by_month.keys().cloned());

    let mut monthly_performance: Vec<MonthPerformance> = month_keys
        .into_iter()
        .map(|month_key| {
            let (revenue, variable) = month_revenue.get(&month_key).copied().unwrap_or((0, 0));
            let fixed = fixed_by_month.get(&month_key).copied().unwrap_or(0);
            MonthPerformance {
                month_label: month_label(&month_key),
                month_key,
                service_revenue_cents: revenue,
                variable_expenses_cents: variable,
                fixed_expenses_cents: fixed,
                net_cents: revenue - variable - fixed,
            }
        })
        .collect();
    monthly_performance.reverse(); // mais recente primeiro

    let mut by_net = monthly_performance.clone();
    by_net.sort_by(|a, b| b.net_cents.cmp(&a.net_cents));
    let best_months: Vec<MonthPerformance> = by_net.iter().take(BEST_WORST_LIMIT).cloned().collect();
    let worst_months: Vec<MonthPerformance> =
        by_net.iter().rev().take(BEST_WORST_LIMIT).cloned().collect();

    // --- Baldes de despesas por título ---
    // A chave é o título aparado, de propósito: "Gasolina" lançada em caixas
    // e lojas diferentes cai no mesmo balde. É assim que o relatório de
    // "maiores despesas recorrentes" funciona; não trocar por id.
    struct Bucket {
        total_cents: i64,
        occurrences: i64,
        store_ids: BTreeSet<Uuid>,
        month_keys: BTreeSet<String>,
    }

    let mut buckets: BTreeMap<String, Bucket> = BTreeMap::new();
    for cb in cash_boxes {
        let month_key = cb.cash_box.date.format("%Y-%m").to_string();
        for expense in &cb.expenses {
            let title = expense.title.trim();
            if title.is_empty() {
                continue;
            }
            let bucket = buckets.entry(title.to_string()).or_insert_with(|| Bucket {
                total_cents: 0,
                occurrences: 0,
                store_ids: BTreeSet::new(),
                month_keys: BTreeSet::new(),
            });
            bucket.total_cents += expense.amount_cents;
            bucket.occurrences += 1;
            bucket.store_ids.insert(cb.cash_box.store_id);
            bucket.month_keys.insert(month_key.clone());
        }
    }

    let mut top_expenses: Vec<ExpenseBucket> = buckets
        .into_iter()
        .map(|(title, bucket)| {
            let store_name = if bucket.store_ids.len() > 1 {
                "Diversas lojas".to_string()
            } else {
                bucket
                    .store_ids
                    .iter()
                    .next()
                    .and_then(|id| store_names.get(id))
                    .map(|n| n.to_string())
                    .unwrap_or_default()
            };
            let bucket_month_label = if bucket.month_keys.len() > 1 {
                "Múltiplos períodos".to_string()
            } else {
                bucket
                    .month_keys
                    .iter()
                    .next()
                    .map(|k| month_label(k))
                    .unwrap_or_default()
            };
            ExpenseBucket {
                title,
                total_cents: bucket.total_cents,
                occurrences: bucket.occurrences,
                store_name,
                month_label: bucket_month_label,
            }
        })
        .collect();
    top_expenses.sort_by(|a, b| b.total_cents.cmp(&a.total_cents));
    top_expenses.truncate(TOP_EXPENSES_LIMIT);

    AdminMetrics {
        service_ranking,
        store_ranking,
        monthly_performance,
        best_months,
        worst_months,
        top_expenses,
        total_revenue_cents: total_revenue,
        total_expenses_cents: total_variable + total_fixed,
        total_return_quantity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    use crate::models::cash_box::{CashBox, ExpenseLine, ServiceLine};

    fn store(name: &str) -> Store {
        Store {
            id: Uuid::new_v4(),
            name: name.to_string(),
            city: None,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn catalog() -> Vec<ServiceType> {
        vec![
            ServiceType {
                id: Uuid::new_v4(),
                code: "vistoria".to_string(),
                name: "Vistoria Veicular".to_string(),
                default_price_cents: 12000,
                counts_in_gross: true,
                is_active: true,
            },
            ServiceType {
                id: Uuid::new_v4(),
                code: "cautelar".to_string(),
                name: "Cautelar".to_string(),
                default_price_cents: 25000,
                counts_in_gross: true,
                is_active: true,
            },
        ]
    }

    fn box_with(
        store_id: Uuid,
        date: &str,
        services: Vec<(Uuid, i32, i64)>,
        expenses: Vec<(&str, i64)>,
    ) -> CashBoxWithItems {
        let id = Uuid::new_v4();
        CashBoxWithItems {
            cash_box: CashBox {
                id,
                store_id,
                date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
                vistoriador_id: Uuid::new_v4(),
                note: None,
                created_at: Utc::now(),
            },
            services: services
                .into_iter()
                .map(|(service_type_id, quantity, price)| ServiceLine {
                    id: Uuid::new_v4(),
                    cash_box_id: id,
                    service_type_id,
                    unit_price_cents: price,
                    quantity,
                    total_cents: i64::from(quantity) * price,
                })
                .collect(),
            electronic_entries: Vec::new(),
            expenses: expenses
                .into_iter()
                .map(|(title, amount_cents)| ExpenseLine {
                    id: Uuid::new_v4(),
                    cash_box_id: id,
                    title: title.to_string(),
                    amount_cents,
                })
                .collect(),
        }
    }

    #[test]
    fn entrada_vazia_produz_metricas_zeradas() {
        let metrics = aggregate_metrics(&[], &[], &[], &[]);

        assert!(metrics.service_ranking.is_empty());
        assert!(metrics.store_ranking.is_empty());
        assert!(metrics.monthly_performance.is_empty());
        assert!(metrics.best_months.is_empty());
        assert!(metrics.worst_months.is_empty());
        assert!(metrics.top_expenses.is_empty());
        assert_eq!(metrics.total_revenue_cents, 0);
        assert_eq!(metrics.total_expenses_cents, 0);
        assert_eq!(metrics.total_return_quantity, 0);
    }

    #[test]
    fn ranking_por_servico_ordena_por_valor() {
        let catalog = catalog();
        let (vistoria, cautelar) = (catalog[0].id, catalog[1].id);
        let loja = store("Centro");

        let boxes = vec![box_with(
            loja.id,
            "2024-03-10",
            vec![(vistoria, 10, 12000), (cautelar, 2, 25000)],
            vec![],
        )];

        let metrics = aggregate_metrics(&boxes, &[], &catalog, &[loja]);

        // vistoria: 120000 > cautelar: 50000
        assert_eq!(metrics.service_ranking.len(), 2);
        assert_eq!(metrics.service_ranking[0].code, "vistoria");
        assert_eq!(metrics.service_ranking[0].quantity, 10);
        assert_eq!(metrics.service_ranking[0].total_cents, 120000);
        assert_eq!(metrics.service_ranking[0].average_ticket_cents, 12000);
        assert_eq!(metrics.service_ranking[1].code, "cautelar");
    }

    #[test]
    fn despesas_com_mesmo_titulo_caem_no_mesmo_balde() {
        let catalog = catalog();
        let loja_a = store("Centro");
        let loja_b = store("Bairro");

        let boxes = vec![
            box_with(loja_a.id, "2024-03-10", vec![], vec![("Gasolina", 5000)]),
            box_with(loja_b.id, "2024-04-12", vec![], vec![("  Gasolina ", 7000)]),
        ];

        let metrics = aggregate_metrics(&boxes, &[], &catalog, &[loja_a, loja_b]);

        assert_eq!(metrics.top_expenses.len(), 1);
        let bucket = &metrics.top_expenses[0];
        assert_eq!(bucket.title, "Gasolina");
        assert_eq!(bucket.occurrences, 2);
        assert_eq!(bucket.total_cents, 12000);
        assert_eq!(bucket.store_name, "Diversas lojas");
        assert_eq!(bucket.month_label, "Múltiplos períodos");
    }

    #[test]
    fn balde_de_uma_loja_mostra_o_nome_dela() {
        let catalog = catalog();
        let loja = store("Centro");

        let boxes = vec![
            box_with(loja.id, "2024-03-10", vec![], vec![("Água", 2000)]),
            box_with(loja.id, "2024-03-20", vec![], vec![("Água", 3000)]),
        ];

        let metrics = aggregate_metrics(&boxes, &[], &catalog, &[loja]);

        let bucket = &metrics.top_expenses[0];
        assert_eq!(bucket.store_name, "Centro");
        assert_eq!(bucket.month_label, "Março de 2024");
    }

    #[test]
    fn desempenho_mensal_une_caixas_e_fixas() {
        let catalog = catalog();
        let vistoria = catalog[0].id;
        let loja = store("Centro");

        let boxes = vec![box_with(
            loja.id,
            "2024-01-10",
            vec![(vistoria, 5, 12000)],
            vec![("Gasolina", 10000)],
        )];
        let fixed = vec![FixedExpense {
            id: Uuid::new_v4(),
            store_id: loja.id,
            month_year: "2024-02".to_string(),
            title: "Aluguel".to_string(),
            amount_cents: 80000,
            source: "fixa".to_string(),
            created_at: Utc::now(),
        }];

        let metrics = aggregate_metrics(&boxes, &fixed, &catalog, &[loja]);

        assert_eq!(metrics.monthly_performance.len(), 2);
        // Mais recente primeiro: fevereiro só tem fixa
        assert_eq!(metrics.monthly_performance[0].month_key, "2024-02");
        assert_eq!(metrics.monthly_performance[0].net_cents, -80000);
        assert_eq!(metrics.monthly_performance[1].month_key, "2024-01");
        assert_eq!(metrics.monthly_performance[1].net_cents, 50000);

        // Melhor e pior mês
        assert_eq!(metrics.best_months[0].month_key, "2024-01");
        assert_eq!(metrics.worst_months[0].month_key, "2024-02");

        assert_eq!(metrics.total_revenue_cents, 60000);
        assert_eq!(metrics.total_expenses_cents, 90000);
    }
}
