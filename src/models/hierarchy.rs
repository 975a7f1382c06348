// src/models/hierarchy.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::auth::{InitialUserPayload, User};

// ---
// 1. Localité (A raiz)
// ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Localite {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---
// 2. SousLocalité (localite_id nunca muda depois de criada)
// ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SousLocalite {
    pub id: Uuid,
    pub localite_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---
// 3. Section (sous_localite_id nunca muda depois de criada)
// ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: Uuid,
    pub sous_localite_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- PAYLOADS ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLocalitePayload {
    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres"))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSousLocalitePayload {
    pub localite_id: Uuid,

    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres"))]
    pub name: String,

    /// Administrador criado na mesma transação (opcional).
    #[validate(nested)]
    pub admin: Option<InitialUserPayload>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSectionPayload {
    pub sous_localite_id: Uuid,

    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres"))]
    pub name: String,

    /// Primeiro SECTION_USER, criado na mesma transação (opcional).
    #[validate(nested)]
    pub first_user: Option<InitialUserPayload>,
}

// --- RESPOSTAS ---

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SousLocaliteCreated {
    pub sous_localite: SousLocalite,
    pub admin: Option<User>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SectionCreated {
    pub section: Section,
    pub first_user: Option<User>,
}
