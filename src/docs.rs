// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Catálogo ---
        handlers::catalog::list_stores,
        handlers::catalog::create_store,
        handlers::catalog::list_service_types,
        handlers::catalog::create_service_type,

        // --- Caixas ---
        handlers::cash_boxes::create_cash_box,
        handlers::cash_boxes::list_cash_boxes,
        handlers::cash_boxes::get_cash_box,
        handlers::cash_boxes::delete_cash_box,

        // --- Despesas Fixas ---
        handlers::expenses::list_fixed_expenses,
        handlers::expenses::create_fixed_expense,
        handlers::expenses::delete_fixed_expense,

        // --- Recebíveis ---
        handlers::receivables::create_receivable,
        handlers::receivables::list_receivables,
        handlers::receivables::list_payments,
        handlers::receivables::register_payment,
        handlers::receivables::settle_receivable,

        // --- Fechamento Mensal ---
        handlers::closures::fetch_closure,
        handlers::closures::upsert_closure,
        handlers::closures::delete_closure,

        // --- Relatórios ---
        handlers::reports::monthly_summary,
        handlers::reports::monthly_summary_pdf,
        handlers::reports::admin_metrics,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::UserRole,
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Catálogo ---
            models::catalog::Store,
            models::catalog::ServiceType,
            models::catalog::CreateStorePayload,
            models::catalog::CreateServiceTypePayload,

            // --- Caixas ---
            models::cash_box::PaymentMethod,
            models::cash_box::CashBox,
            models::cash_box::ServiceLine,
            models::cash_box::ElectronicEntry,
            models::cash_box::ExpenseLine,
            models::cash_box::FixedExpense,
            models::cash_box::CashBoxWithItems,
            models::cash_box::CashBoxDetail,
            models::cash_box::CashBoxTotals,
            models::cash_box::ServiceLinePayload,
            models::cash_box::ElectronicEntryPayload,
            models::cash_box::ExpenseLinePayload,
            models::cash_box::SessionReceivablePayload,
            models::cash_box::CreateCashBoxPayload,
            models::cash_box::CreateFixedExpensePayload,

            // --- Recebíveis ---
            models::receivable::ReceivableStatus,
            models::receivable::Receivable,
            models::receivable::ReceivablePayment,
            models::receivable::CreateReceivablePayload,
            models::receivable::RegisterPaymentPayload,

            // --- Relatórios ---
            models::reports::MonthlySummary,
            models::reports::ServiceTypeMetric,
            models::reports::StoreMetric,
            models::reports::MonthPerformance,
            models::reports::ExpenseBucket,
            models::reports::AdminMetrics,
            models::reports::MonthlyClosureView,
            models::reports::ClosureServiceInput,
            models::reports::ClosureExpenseInput,
            models::reports::UpsertClosurePayload,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Catálogo", description = "Lojas e Tipos de Serviço"),
        (name = "Caixas", description = "Fechamento de caixa diário"),
        (name = "Despesas Fixas", description = "Custos mensais recorrentes"),
        (name = "Recebíveis", description = "Contas a Receber e baixas"),
        (name = "Fechamento Mensal", description = "Caixa sintético do mês (admin)"),
        (name = "Relatórios", description = "Consolidação mensal e métricas")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
