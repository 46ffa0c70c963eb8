// src/config.rs

use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{env, time::Duration};

use crate::{
    db::{CashBoxRepository, CatalogRepository, ReceivableRepository, UserRepository},
    services::{
        auth::AuthService, cash_box::CashBoxService, closure::ClosureService,
        receivable::ReceivableService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub cash_box_service: CashBoxService,
    pub closure_service: ClosureService,
    pub receivable_service: ReceivableService,
    pub catalog_repo: CatalogRepository,
    pub cash_box_repo: CashBoxRepository,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let catalog_repo = CatalogRepository::new(db_pool.clone());
        let cash_box_repo = CashBoxRepository::new(db_pool.clone());
        let receivable_repo = ReceivableRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo, jwt_secret);
        let cash_box_service = CashBoxService::new(
            db_pool.clone(),
            cash_box_repo.clone(),
            catalog_repo.clone(),
            receivable_repo.clone(),
        );
        let closure_service = ClosureService::new(
            db_pool.clone(),
            cash_box_repo.clone(),
            catalog_repo.clone(),
        );
        let receivable_service = ReceivableService::new(db_pool.clone(), receivable_repo);

        Ok(Self {
            db_pool,
            auth_service,
            cash_box_service,
            closure_service,
            receivable_service,
            catalog_repo,
            cash_box_repo,
        })
    }
}
