//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod access;
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
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new().await?;

    sqlx::migrate!().run(&app_state.db_pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas públicas
    let auth_routes = Router::new().route("/login", post(handlers::auth::login));

    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .route("/", get(handlers::users::list_users));

    let hierarchy_routes = Router::new()
        .route(
            "/localites",
            post(handlers::hierarchy::create_localite).get(handlers::hierarchy::list_localites),
        )
        .route(
            "/sous-localites",
            post(handlers::hierarchy::create_sous_localite)
                .get(handlers::hierarchy::list_sous_localites),
        )
        .route(
            "/sections",
            post(handlers::hierarchy::create_section).get(handlers::hierarchy::list_sections),
        );

    let member_routes = Router::new()
        .route(
            "/",
            post(handlers::members::create_member).get(handlers::members::list_members),
        )
        .route(
            "/{id}",
            get(handlers::members::get_member)
                .put(handlers::members::update_member)
                .delete(handlers::members::delete_member),
        );

    let meeting_routes = Router::new()
        .route(
            "/",
            post(handlers::meetings::create_meeting).get(handlers::meetings::list_meetings),
        )
        .route(
            "/{id}",
            get(handlers::meetings::get_meeting)
                .put(handlers::meetings::update_meeting)
                .delete(handlers::meetings::delete_meeting),
        );

    let meeting_type_routes = Router::new()
        .route(
            "/",
            post(handlers::meetings::create_meeting_type)
                .get(handlers::meetings::list_meeting_types),
        )
        .route("/{id}", delete(handlers::meetings::delete_meeting_type));

    let bureau_routes = Router::new()
        .route(
            "/posts",
            post(handlers::bureau::create_post).get(handlers::bureau::list_posts),
        )
        .route("/posts/{id}", delete(handlers::bureau::delete_post))
        .route(
            "/posts/{id}/assignments",
            post(handlers::bureau::assign_member).get(handlers::bureau::list_assignments),
        )
        .route("/assignments/{id}", delete(handlers::bureau::delete_assignment));

    let stats_routes = Router::new().route("/members", get(handlers::stats::member_stats));

    // Tudo abaixo exige um Bearer token válido
    let protected = Router::new()
        .nest("/api/users", user_routes)
        .nest("/api/hierarchy", hierarchy_routes)
        .nest("/api/members", member_routes)
        .nest("/api/meetings", meeting_routes)
        .nest("/api/meeting-types", meeting_type_routes)
        .nest("/api/bureau", bureau_routes)
        .nest("/api/stats", stats_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .merge(protected)
        .with_state(app_state.clone());

    let listener = TcpListener::bind(&app_state.bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
