// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::scope::{RequestScope, ScopeType};

// Mapeia o CREATE TYPE user_role do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Localite,
    SousLocaliteAdmin,
    SectionUser,
    Owner,
    ComitePedagogique,
    OrgUnitResp,
}

impl Role {
    /// Papéis sem restrição fixa de escopo (podem pedir um override).
    pub fn is_tenant_wide(self) -> bool {
        matches!(self, Role::Localite | Role::Owner)
    }

    /// O único nível de recurso que este papel pode criar/alterar.
    /// OWNER não tem nível (contorna a regra); os papéis "de apoio" não alteram nada.
    pub fn mutation_level(self) -> Option<ScopeType> {
        match self {
            Role::Localite => Some(ScopeType::Localite),
            Role::SousLocaliteAdmin => Some(ScopeType::SousLocalite),
            Role::SectionUser => Some(ScopeType::Section),
            Role::Owner | Role::ComitePedagogique | Role::OrgUnitResp => None,
        }
    }
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    pub password_hash: String,

    pub role: Role,

    // No máximo um é significativo; o papel decide qual.
    pub localite_id: Option<Uuid>,
    pub sous_localite_id: Option<Uuid>,
    pub section_id: Option<Uuid>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---
// O principal verificado que a camada de autenticação anexa à requisição.
// ---
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub user_id: Uuid,
    pub role: Role,
    pub localite_id: Option<Uuid>,
    pub sous_localite_id: Option<Uuid>,
    pub section_id: Option<Uuid>,
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            role: user.role,
            localite_id: user.localite_id,
            sous_localite_id: user.sous_localite_id,
            section_id: user.section_id,
        }
    }
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário)
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}

// GET /api/users/me
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub user: User,
    pub scope: RequestScope,
    /// A localité de topo a que o usuário pertence (None = todas).
    pub top_level_id: Option<Uuid>,
}

// Credenciais do primeiro usuário criado junto com um nó (Section / Sous-Localité)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InitialUserPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}
