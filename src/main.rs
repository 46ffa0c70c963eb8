//src/main.rs

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{delete, get, post},
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::docs::ApiDoc;
use crate::middleware::auth::{admin_guard, auth_guard};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização.
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas públicas de autenticação.
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Rotas acessíveis a qualquer usuário autenticado (admin ou vistoriador).
    let protected_routes = Router::new()
        .route("/auth/me", get(handlers::auth::get_me))
        .route("/stores", get(handlers::catalog::list_stores))
        .route("/service-types", get(handlers::catalog::list_service_types))
        .route(
            "/cash-boxes",
            post(handlers::cash_boxes::create_cash_box)
                .get(handlers::cash_boxes::list_cash_boxes),
        )
        .route(
            "/cash-boxes/{id}",
            get(handlers::cash_boxes::get_cash_box)
                .delete(handlers::cash_boxes::delete_cash_box),
        )
        .route("/fixed-expenses", get(handlers::expenses::list_fixed_expenses))
        .route(
            "/receivables",
            post(handlers::receivables::create_receivable)
                .get(handlers::receivables::list_receivables),
        )
        .route(
            "/receivables/{id}/payments",
            post(handlers::receivables::register_payment)
                .get(handlers::receivables::list_payments),
        )
        .route(
            "/receivables/{id}/settle",
            post(handlers::receivables::settle_receivable),
        )
        .route("/reports/monthly-summary", get(handlers::reports::monthly_summary))
        .route(
            "/reports/monthly-summary/pdf",
            get(handlers::reports::monthly_summary_pdf),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Rotas restritas ao administrador (auth_guard + admin_guard).
    let admin_routes = Router::new()
        .route("/stores", post(handlers::catalog::create_store))
        .route("/service-types", post(handlers::catalog::create_service_type))
        .route(
            "/fixed-expenses",
            post(handlers::expenses::create_fixed_expense),
        )
        .route(
            "/fixed-expenses/{id}",
            delete(handlers::expenses::delete_fixed_expense),
        )
        .route(
            "/admin/closures",
            get(handlers::closures::fetch_closure).put(handlers::closures::upsert_closure),
        )
        .route(
            "/admin/closures/{cash_box_id}",
            delete(handlers::closures::delete_closure),
        )
        .route("/admin/metrics", get(handlers::reports::admin_metrics))
        .layer(axum_middleware::from_fn(admin_guard))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api", admin_routes)
        .nest("/api", protected_routes)
        .with_state(app_state);

    let addr = std::env::var("PORT")
        .map(|p| format!("0.0.0.0:{}", p))
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
