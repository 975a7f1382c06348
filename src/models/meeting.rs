// src/models/meeting.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    models::scope::{ScopeType, TargetScope},
};

// ---
// 1. MeetingType (scope_type NULL = global)
// ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeetingType {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub scope_type: Option<ScopeType>,
    pub scope_id: Option<Uuid>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MeetingType {
    pub fn target(&self) -> Result<TargetScope, AppError> {
        TargetScope::from_columns(self.scope_type, self.scope_id)
    }
}

// ---
// 2. Meeting (a etiqueta vem do criador e nunca muda)
// ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub scheduled_at: DateTime<Utc>,
    pub meeting_type_id: Option<Uuid>,
    pub scope_type: ScopeType,
    pub scope_id: Uuid,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Meeting {
    pub fn target(&self) -> TargetScope {
        TargetScope::tagged(self.scope_type, self.scope_id)
    }
}

// --- PAYLOADS ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMeetingTypePayload {
    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres"))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeetingPayload {
    #[validate(length(min = 2, message = "O título deve ter no mínimo 2 caracteres"))]
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub scheduled_at: DateTime<Utc>,
    pub meeting_type_id: Option<Uuid>,
}
