// src/handlers/stats.rs

use axum::{extract::State, Json};

use crate::{
    common::error::AppError,
    config::AppState,
    models::{scope::RequestScope, stats::MemberStats},
};

// GET /api/stats/members
#[utoipa::path(
    get,
    path = "/api/stats/members",
    tag = "Stats",
    responses(
        (status = 200, description = "Contagens por faixa etária e gênero", body = MemberStats),
        (status = 403, description = "Acesso negado")
    ),
    params(
        ("x-scope-type" = Option<String>, Header, description = "LOCALITE | SOUS_LOCALITE | SECTION (só LOCALITE/OWNER)"),
        ("x-scope-id" = Option<Uuid>, Header, description = "ID do nó pedido")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn member_stats(
    State(app_state): State<AppState>,
    scope: RequestScope,
) -> Result<Json<MemberStats>, AppError> {
    Ok(Json(app_state.stats_service.member_stats(&scope).await?))
}
