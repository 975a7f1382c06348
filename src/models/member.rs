// src/models/member.rs

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// ---
// Faixa etária: S1 (< 12), S2 (12..18), S3 (>= 18)
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
pub enum AgeBracket {
    S1,
    S2,
    S3,
}

impl AgeBracket {
    pub fn from_age(age: u32) -> Self {
        match age {
            0..=11 => AgeBracket::S1,
            12..=17 => AgeBracket::S2,
            _ => AgeBracket::S3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AgeBracket::S1 => "S1",
            AgeBracket::S2 => "S2",
            AgeBracket::S3 => "S3",
        }
    }
}

impl FromStr for AgeBracket {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "S1" => Ok(AgeBracket::S1),
            "S2" => Ok(AgeBracket::S2),
            "S3" => Ok(AgeBracket::S3),
            _ => Err(()),
        }
    }
}

// ---
// Membre (pertence a uma Section para sempre)
// ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Membre {
    pub id: Uuid,
    pub section_id: Uuid,

    pub first_name: String,
    pub last_name: String,
    pub gender: String,

    pub birth_date: Option<NaiveDate>,
    // Texto cru do banco. Dados legados podem ter valores fora de S1/S2/S3.
    pub age_bracket: Option<String>,

    pub voter_card_number: Option<String>,
    pub voter_card_place: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Membre {
    /// A etiqueta explícita, se for válida.
    pub fn explicit_bracket(&self) -> Option<AgeBracket> {
        self.age_bracket.as_deref().and_then(|tag| tag.parse().ok())
    }
}

// --- PAYLOADS ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMembrePayload {
    pub section_id: Uuid,

    #[validate(length(min = 1, message = "required"))]
    pub first_name: String,

    #[validate(length(min = 1, message = "required"))]
    pub last_name: String,

    #[validate(length(min = 1, max = 16, message = "required"))]
    pub gender: String,

    pub birth_date: Option<NaiveDate>,
    pub age_bracket: Option<AgeBracket>,

    pub voter_card_number: Option<String>,
    pub voter_card_place: Option<String>,
}

// A section não aparece aqui: membros não mudam de section.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMembrePayload {
    #[validate(length(min = 1, message = "required"))]
    pub first_name: String,

    #[validate(length(min = 1, message = "required"))]
    pub last_name: String,

    #[validate(length(min = 1, max = 16, message = "required"))]
    pub gender: String,

    pub birth_date: Option<NaiveDate>,
    pub age_bracket: Option<AgeBracket>,

    pub voter_card_number: Option<String>,
    pub voter_card_place: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bracket_boundaries() {
        assert_eq!(AgeBracket::from_age(0), AgeBracket::S1);
        assert_eq!(AgeBracket::from_age(11), AgeBracket::S1);
        assert_eq!(AgeBracket::from_age(12), AgeBracket::S2);
        assert_eq!(AgeBracket::from_age(17), AgeBracket::S2);
        assert_eq!(AgeBracket::from_age(18), AgeBracket::S3);
    }

    #[test]
    fn legacy_tag_parsing() {
        assert_eq!(" s2 ".parse::<AgeBracket>(), Ok(AgeBracket::S2));
        assert!("S4".parse::<AgeBracket>().is_err());
        assert!("".parse::<AgeBracket>().is_err());
    }
}
