// src/services/totals.rs
//
// Calculadora de totais de um caixa. Função pura: recebe as linhas do caixa
// e o catálogo, devolve o resumo. Nunca falha; linha com tipo de serviço
// desconhecido é pulada (deriva de catálogo não pode derrubar o cálculo).

use std::collections::HashMap;

use uuid::Uuid;

use crate::models::{
    cash_box::{CashBoxTotals, ElectronicEntry, ExpenseLine, PaymentMethod, ServiceLine},
    catalog::ServiceType,
};

/// Calcula os totais de um caixa a partir das suas linhas.
///
/// `session_receivable_cents` são os valores dos recebíveis criados junto
/// com este fechamento (só relevante na criação; um caixa já persistido
/// passa uma lista vazia, pois os recebíveis vivem de forma independente).
pub fn calculate_cash_box_totals(
    services: &[ServiceLine],
    electronic_entries: &[ElectronicEntry],
    expenses: &[ExpenseLine],
    session_receivable_cents: &[i64],
    catalog: &[ServiceType],
) -> CashBoxTotals {
    let by_id: HashMap<Uuid, &ServiceType> = catalog.iter().map(|st| (st.id, st)).collect();

    let mut gross: i64 = 0;
    let mut return_quantity: i64 = 0;

    for line in services {
        let Some(service_type) = by_id.get(&line.service_type_id) else {
            tracing::warn!(
                "Tipo de serviço desconhecido no caixa {}: {} (linha ignorada)",
                line.cash_box_id,
                line.service_type_id
            );
            continue;
        };

        if service_type.counts_in_gross {
            gross += i64::from(line.quantity) * line.unit_price_cents;
        } else if line.quantity > 0 {
            return_quantity += i64::from(line.quantity);
        }
    }

    let pix: i64 = electronic_entries
        .iter()
        .filter(|e| e.method == PaymentMethod::Pix)
        .map(|e| e.amount_cents)
        .sum();

    let cartao: i64 = electronic_entries
        .iter()
        .filter(|e| e.method == PaymentMethod::Cartao)
        .map(|e| e.amount_cents)
        .sum();

    let electronic_total = pix + cartao;
    let expenses_total: i64 = expenses.iter().map(|e| e.amount_cents).sum();
    let receivables_total: i64 = session_receivable_cents.iter().sum();

    let net = gross - expenses_total;

    // Conferência de gaveta: dinheiro físico = bruto menos tudo que saiu como
    // despesa, ficou a receber ou entrou por meio eletrônico. Pode ser
    // negativo e não é truncado.
    let cash = gross - expenses_total - receivables_total - electronic_total;

    CashBoxTotals {
        gross,
        electronic_total,
        net,
        cash,
        expenses_total,
        receivables_total,
        pix,
        cartao,
        return_quantity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service_type(id: Uuid, code: &str, counts_in_gross: bool) -> ServiceType {
        ServiceType {
            id,
            code: code.to_string(),
            name: code.to_string(),
            default_price_cents: 12000,
            counts_in_gross,
            is_active: true,
        }
    }

    fn service_line(cash_box_id: Uuid, service_type_id: Uuid, quantity: i32, price: i64) -> ServiceLine {
        ServiceLine {
            id: Uuid::new_v4(),
            cash_box_id,
            service_type_id,
            unit_price_cents: price,
            quantity,
            total_cents: i64::from(quantity) * price,
        }
    }

    fn entry(cash_box_id: Uuid, method: PaymentMethod, amount_cents: i64) -> ElectronicEntry {
        ElectronicEntry {
            id: Uuid::new_v4(),
            cash_box_id,
            method,
            amount_cents,
        }
    }

    fn expense(cash_box_id: Uuid, title: &str, amount_cents: i64) -> ExpenseLine {
        ExpenseLine {
            id: Uuid::new_v4(),
            cash_box_id,
            title: title.to_string(),
            amount_cents,
        }
    }

    fn fixture() -> (Vec<ServiceType>, Vec<ServiceLine>, Vec<ElectronicEntry>, Vec<ExpenseLine>) {
        let vistoria = Uuid::new_v4();
        let retorno = Uuid::new_v4();
        let caixa = Uuid::new_v4();

        let catalog = vec![
            service_type(vistoria, "vistoria", true),
            service_type(retorno, "retorno", false),
        ];
        let services = vec![
            service_line(caixa, vistoria, 3, 12000), // 36000 brutos
            service_line(caixa, retorno, 2, 0),      // só conta retorno
        ];
        let entries = vec![
            entry(caixa, PaymentMethod::Pix, 10000),
            entry(caixa, PaymentMethod::Cartao, 5000),
        ];
        let expenses = vec![expense(caixa, "Gasolina", 4000)];

        (catalog, services, entries, expenses)
    }

    #[test]
    fn calcula_totais_basicos() {
        let (catalog, services, entries, expenses) = fixture();
        let totals = calculate_cash_box_totals(&services, &entries, &expenses, &[6000], &catalog);

        assert_eq!(totals.gross, 36000);
        assert_eq!(totals.return_quantity, 2);
        assert_eq!(totals.pix, 10000);
        assert_eq!(totals.cartao, 5000);
        assert_eq!(totals.electronic_total, 15000);
        assert_eq!(totals.expenses_total, 4000);
        assert_eq!(totals.receivables_total, 6000);
        assert_eq!(totals.net, 32000);
        // 36000 - 4000 - 6000 - 15000
        assert_eq!(totals.cash, 11000);
    }

    #[test]
    fn identidade_do_caixa_vale_mesmo_negativo() {
        let (catalog, services, entries, mut expenses) = fixture();
        // Estoura as despesas para forçar caixa físico negativo
        expenses.push(expense(services[0].cash_box_id, "Conserto do elevador", 50000));

        let totals = calculate_cash_box_totals(&services, &entries, &expenses, &[6000], &catalog);

        assert!(totals.cash < 0);
        // cash + eletrônico + despesas + recebíveis == bruto, sempre
        assert_eq!(
            totals.cash + totals.electronic_total + totals.expenses_total + totals.receivables_total,
            totals.gross
        );
        assert_eq!(totals.net, totals.gross - totals.expenses_total);
    }

    #[test]
    fn linha_com_tipo_desconhecido_e_ignorada() {
        let (catalog, mut services, entries, expenses) = fixture();
        services.push(service_line(services[0].cash_box_id, Uuid::new_v4(), 5, 99999));

        let totals = calculate_cash_box_totals(&services, &entries, &expenses, &[], &catalog);

        // A linha fantasma não entra em nada
        assert_eq!(totals.gross, 36000);
        assert_eq!(totals.return_quantity, 2);
    }

    #[test]
    fn ordem_das_linhas_nao_importa() {
        let (catalog, mut services, mut entries, mut expenses) = fixture();
        let base = calculate_cash_box_totals(&services, &entries, &expenses, &[6000], &catalog);

        services.reverse();
        entries.reverse();
        expenses.reverse();
        let shuffled = calculate_cash_box_totals(&services, &entries, &expenses, &[6000], &catalog);

        assert_eq!(base, shuffled);
    }

    #[test]
    fn listas_vazias_produzem_zeros() {
        let totals = calculate_cash_box_totals(&[], &[], &[], &[], &[]);
        assert_eq!(totals, CashBoxTotals::default());
    }
}
