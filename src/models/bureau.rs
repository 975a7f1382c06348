// src/models/bureau.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    member::AgeBracket,
    scope::{ScopeDescriptor, ScopeType, TargetScope},
};

// Mapeia o CREATE TYPE age_group do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "age_group")]
pub enum AgeGroup {
    #[sqlx(rename = "S1S2")]
    S1S2,
    #[sqlx(rename = "S3")]
    S3,
}

impl AgeGroup {
    pub fn admits(self, bracket: AgeBracket) -> bool {
        match self {
            AgeGroup::S1S2 => matches!(bracket, AgeBracket::S1 | AgeBracket::S2),
            AgeGroup::S3 => bracket == AgeBracket::S3,
        }
    }
}

// ---
// 1. BureauPost (um cargo dentro de um escopo e de um grupo etário)
// ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BureauPost {
    pub id: Uuid,
    pub title: String,
    pub age_group: AgeGroup,
    pub scope_type: ScopeType,
    pub scope_id: Uuid,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BureauPost {
    pub fn target(&self) -> TargetScope {
        TargetScope::tagged(self.scope_type, self.scope_id)
    }

    pub fn group(&self) -> GroupDescriptor {
        GroupDescriptor {
            age_group: self.age_group,
            scope: ScopeDescriptor::from_parts(self.scope_type, self.scope_id),
        }
    }
}

// O grupo alvo de uma atribuição: faixa etária × escopo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupDescriptor {
    pub age_group: AgeGroup,
    pub scope: ScopeDescriptor,
}

// ---
// 2. BureauAssignment (um membro num cargo)
// ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BureauAssignment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub membre_id: Uuid,
    pub assigned_by: Uuid,
    pub created_at: DateTime<Utc>,
}

// --- PAYLOADS ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBureauPostPayload {
    #[validate(length(min = 2, message = "O título deve ter no mínimo 2 caracteres"))]
    pub title: String,
    pub age_group: AgeGroup,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignMembrePayload {
    pub membre_id: Uuid,
}
