// src/models/stats.rs

use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::scope::ScopeDescriptor;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BracketCounts {
    pub s1: i64,
    pub s2: i64,
    pub s3: i64,
    // Sem etiqueta válida nem data de nascimento utilizável
    pub unknown: i64,
}

// GET /api/stats/members
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemberStats {
    #[schema(value_type = Object)]
    pub scope: ScopeDescriptor,
    pub total: i64,
    pub by_bracket: BracketCounts,
    pub by_gender: BTreeMap<String, i64>,
}
