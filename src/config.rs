// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{
        BureauRepository, BureauStore, HierarchyRepository, HierarchyStore, MeetingRepository,
        MeetingStore, MemberRepository, MemberStore, UserRepository,
    },
    services::{
        access_service::AccessService, auth::AuthService, bureau_service::BureauService,
        hierarchy_service::HierarchyService, meeting_service::MeetingService,
        member_service::MemberService, stats_service::StatsService,
    },
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub bind_addr: String,
    pub auth_service: AuthService,
    pub access_service: AccessService,
    pub hierarchy_service: HierarchyService,
    pub member_service: MemberService,
    pub meeting_service: MeetingService,
    pub bureau_service: BureauService,
    pub stats_service: StatsService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let max_connections = match env::var("DB_MAX_CONNECTIONS") {
            Ok(raw) => raw
                .parse::<u32>()
                .with_context(|| format!("DB_MAX_CONNECTIONS inválido: '{}'", raw))?,
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };

        let db_pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let hierarchy_repo = HierarchyRepository::new(db_pool.clone());
        let member_repo: Arc<dyn MemberStore> = Arc::new(MemberRepository::new(db_pool.clone()));
        let meeting_repo: Arc<dyn MeetingStore> = Arc::new(MeetingRepository::new(db_pool.clone()));
        let bureau_repo: Arc<dyn BureauStore> = Arc::new(BureauRepository::new(db_pool.clone()));

        let store: Arc<dyn HierarchyStore> = Arc::new(hierarchy_repo.clone());
        let access_service = AccessService::new(store);

        let auth_service = AuthService::new(user_repo.clone(), jwt_secret);
        let hierarchy_service = HierarchyService::new(
            hierarchy_repo,
            user_repo,
            access_service.clone(),
            db_pool.clone(),
        );
        let member_service = MemberService::new(member_repo.clone(), access_service.clone());
        let meeting_service = MeetingService::new(meeting_repo, access_service.clone());
        let bureau_service =
            BureauService::new(bureau_repo, member_repo.clone(), access_service.clone());
        let stats_service = StatsService::new(member_repo);

        Ok(Self {
            db_pool,
            bind_addr,
            auth_service,
            access_service,
            hierarchy_service,
            member_service,
            meeting_service,
            bureau_service,
            stats_service,
        })
    }
}
