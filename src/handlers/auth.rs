// src/handlers/auth.rs

use axum::{extract::State, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{
        auth::{AuthResponse, LoginUserPayload, MeResponse, Principal},
        scope::RequestScope,
    },
};

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Login bem-sucedido", body = AuthResponse),
        (status = 400, description = "Dados inválidos"),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginUserPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate()?;

    let token = app_state
        .auth_service
        .login_user(&payload.email, &payload.password)
        .await?;

    Ok(Json(AuthResponse { token }))
}

// GET /api/users/me
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Usuário, escopo resolvido e localité de topo", body = MeResponse),
        (status = 401, description = "Não autorizado"),
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
pub async fn get_me(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    scope: RequestScope,
) -> Result<Json<MeResponse>, AppError> {
    let top_level_id = app_state
        .access_service
        .top_level_id(&Principal::from(&user))
        .await?;

    Ok(Json(MeResponse { user, scope, top_level_id }))
}
