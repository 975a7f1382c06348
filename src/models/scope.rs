// src/models/scope.rs

use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{common::error::AppError, models::auth::Role};

// ---
// 1. ScopeType (Os três níveis da árvore)
// ---
// Mapeia o CREATE TYPE scope_type do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "scope_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScopeType {
    Localite,
    SousLocalite,
    Section,
}

impl ScopeType {
    /// Profundidade na árvore: Localité = 0, Section = 2.
    pub fn depth(self) -> u8 {
        match self {
            ScopeType::Localite => 0,
            ScopeType::SousLocalite => 1,
            ScopeType::Section => 2,
        }
    }
}

impl FromStr for ScopeType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOCALITE" => Ok(ScopeType::Localite),
            "SOUS_LOCALITE" => Ok(ScopeType::SousLocalite),
            "SECTION" => Ok(ScopeType::Section),
            other => Err(AppError::InvalidInput(format!(
                "Tipo de escopo desconhecido: '{}'.",
                other
            ))),
        }
    }
}

// ---
// 2. ScopeDescriptor (Onde o principal está ancorado)
// ---
// Derivado a cada requisição, nunca persistido.
// `AllLocalites` é a sentinela "todas as localités" (LOCALITE/OWNER sem âncora).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeDescriptor {
    AllLocalites,
    Localite(Uuid),
    SousLocalite(Uuid),
    Section(Uuid),
}

impl ScopeDescriptor {
    pub fn from_parts(scope_type: ScopeType, scope_id: Uuid) -> Self {
        match scope_type {
            ScopeType::Localite => ScopeDescriptor::Localite(scope_id),
            ScopeType::SousLocalite => ScopeDescriptor::SousLocalite(scope_id),
            ScopeType::Section => ScopeDescriptor::Section(scope_id),
        }
    }

    pub fn scope_type(&self) -> ScopeType {
        match self {
            ScopeDescriptor::AllLocalites | ScopeDescriptor::Localite(_) => ScopeType::Localite,
            ScopeDescriptor::SousLocalite(_) => ScopeType::SousLocalite,
            ScopeDescriptor::Section(_) => ScopeType::Section,
        }
    }

    /// `None` apenas para a sentinela.
    pub fn scope_id(&self) -> Option<Uuid> {
        match self {
            ScopeDescriptor::AllLocalites => None,
            ScopeDescriptor::Localite(id)
            | ScopeDescriptor::SousLocalite(id)
            | ScopeDescriptor::Section(id) => Some(*id),
        }
    }

    /// A relação de contenção LOCALITE ⊇ SOUS_LOCALITE ⊇ SECTION.
    ///
    /// Função pura: todas as consultas à hierarquia já foram feitas
    /// quando o `ScopePath` do alvo foi montado.
    pub fn contains(&self, path: &ScopePath) -> bool {
        match (self, path) {
            (ScopeDescriptor::AllLocalites, _) => true,
            (_, ScopePath::Global) => false,
            (ScopeDescriptor::Localite(id), p) => p.localite_id() == Some(*id),
            (ScopeDescriptor::SousLocalite(id), p) => p.sous_localite_id() == Some(*id),
            (ScopeDescriptor::Section(id), p) => p.section_id() == Some(*id),
        }
    }

    /// A etiqueta que um recurso criado neste escopo recebe.
    pub fn as_target(&self) -> TargetScope {
        match self {
            ScopeDescriptor::AllLocalites => TargetScope::Global,
            ScopeDescriptor::Localite(id) => TargetScope::Localite(*id),
            ScopeDescriptor::SousLocalite(id) => TargetScope::SousLocalite(*id),
            ScopeDescriptor::Section(id) => TargetScope::Section(*id),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScopeDescriptorBody {
    scope_type: ScopeType,
    scope_id: Option<Uuid>,
}

impl Serialize for ScopeDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ScopeDescriptorBody {
            scope_type: self.scope_type(),
            scope_id: self.scope_id(),
        }
        .serialize(serializer)
    }
}

// ---
// 3. TargetScope (A etiqueta de um recurso)
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetScope {
    /// Sem etiqueta (só tipos de reunião podem ser globais).
    Global,
    Localite(Uuid),
    SousLocalite(Uuid),
    Section(Uuid),
}

impl TargetScope {
    pub fn tagged(scope_type: ScopeType, scope_id: Uuid) -> Self {
        match scope_type {
            ScopeType::Localite => TargetScope::Localite(scope_id),
            ScopeType::SousLocalite => TargetScope::SousLocalite(scope_id),
            ScopeType::Section => TargetScope::Section(scope_id),
        }
    }

    /// Reconstrói a etiqueta a partir das colunas (scope_type, scope_id).
    pub fn from_columns(
        scope_type: Option<ScopeType>,
        scope_id: Option<Uuid>,
    ) -> Result<Self, AppError> {
        match (scope_type, scope_id) {
            (None, None) => Ok(TargetScope::Global),
            (Some(t), Some(id)) => Ok(TargetScope::tagged(t, id)),
            _ => Err(AppError::InternalServerError(anyhow::anyhow!(
                "Etiqueta de escopo incompleta: ({:?}, {:?})",
                scope_type,
                scope_id
            ))),
        }
    }

    pub fn columns(&self) -> (Option<ScopeType>, Option<Uuid>) {
        match self {
            TargetScope::Global => (None, None),
            TargetScope::Localite(id) => (Some(ScopeType::Localite), Some(*id)),
            TargetScope::SousLocalite(id) => (Some(ScopeType::SousLocalite), Some(*id)),
            TargetScope::Section(id) => (Some(ScopeType::Section), Some(*id)),
        }
    }
}

// ---
// 4. ScopePath (O alvo localizado na árvore, com todos os ancestrais)
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopePath {
    Global,
    Localite {
        localite_id: Uuid,
    },
    SousLocalite {
        localite_id: Uuid,
        sous_localite_id: Uuid,
    },
    Section {
        localite_id: Uuid,
        sous_localite_id: Uuid,
        section_id: Uuid,
    },
}

impl ScopePath {
    pub fn scope_type(&self) -> Option<ScopeType> {
        match self {
            ScopePath::Global => None,
            ScopePath::Localite { .. } => Some(ScopeType::Localite),
            ScopePath::SousLocalite { .. } => Some(ScopeType::SousLocalite),
            ScopePath::Section { .. } => Some(ScopeType::Section),
        }
    }

    pub fn localite_id(&self) -> Option<Uuid> {
        match self {
            ScopePath::Global => None,
            ScopePath::Localite { localite_id }
            | ScopePath::SousLocalite { localite_id, .. }
            | ScopePath::Section { localite_id, .. } => Some(*localite_id),
        }
    }

    pub fn sous_localite_id(&self) -> Option<Uuid> {
        match self {
            ScopePath::SousLocalite {
                sous_localite_id, ..
            }
            | ScopePath::Section {
                sous_localite_id, ..
            } => Some(*sous_localite_id),
            _ => None,
        }
    }

    pub fn section_id(&self) -> Option<Uuid> {
        match self {
            ScopePath::Section { section_id, .. } => Some(*section_id),
            _ => None,
        }
    }
}

// ---
// 5. RequestScope (O resultado do ScopeResolver para esta requisição)
// ---
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestScope {
    pub user_id: Uuid,
    pub role: Role,
    // Serializado como {scopeType, scopeId}
    #[schema(value_type = Object)]
    pub descriptor: ScopeDescriptor,
    /// `true` quando um LOCALITE/OWNER pediu explicitamente um nó mais estreito.
    pub overridden: bool,
}

// Pedido explícito de escopo (cabeçalhos x-scope-type / x-scope-id)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeOverride {
    pub scope_type: ScopeType,
    pub scope_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section_path(l: Uuid, sl: Uuid, s: Uuid) -> ScopePath {
        ScopePath::Section {
            localite_id: l,
            sous_localite_id: sl,
            section_id: s,
        }
    }

    #[test]
    fn contains_follows_the_tree() {
        let (l, sl, s) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let path = section_path(l, sl, s);

        assert!(ScopeDescriptor::AllLocalites.contains(&path));
        assert!(ScopeDescriptor::Localite(l).contains(&path));
        assert!(ScopeDescriptor::SousLocalite(sl).contains(&path));
        assert!(ScopeDescriptor::Section(s).contains(&path));

        assert!(!ScopeDescriptor::Localite(Uuid::new_v4()).contains(&path));
        assert!(!ScopeDescriptor::SousLocalite(Uuid::new_v4()).contains(&path));
        assert!(!ScopeDescriptor::Section(Uuid::new_v4()).contains(&path));
    }

    #[test]
    fn narrower_scope_never_contains_its_ancestor() {
        let (l, sl, s) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let parent = ScopePath::SousLocalite {
            localite_id: l,
            sous_localite_id: sl,
        };

        assert!(!ScopeDescriptor::Section(s).contains(&parent));
        assert!(!ScopeDescriptor::SousLocalite(sl).contains(&ScopePath::Localite { localite_id: l }));
    }

    #[test]
    fn global_is_only_inside_the_sentinel() {
        assert!(ScopeDescriptor::AllLocalites.contains(&ScopePath::Global));
        assert!(!ScopeDescriptor::Localite(Uuid::new_v4()).contains(&ScopePath::Global));
    }

    #[test]
    fn descriptor_serializes_as_type_and_id() {
        let id = Uuid::new_v4();
        let json = serde_json::to_value(ScopeDescriptor::Section(id)).unwrap();
        assert_eq!(json["scopeType"], "SECTION");
        assert_eq!(json["scopeId"], id.to_string());

        let all = serde_json::to_value(ScopeDescriptor::AllLocalites).unwrap();
        assert_eq!(all["scopeType"], "LOCALITE");
        assert!(all["scopeId"].is_null());
    }

    #[test]
    fn incomplete_tag_is_rejected() {
        assert!(TargetScope::from_columns(Some(ScopeType::Section), None).is_err());
        assert_eq!(
            TargetScope::from_columns(None, None).unwrap(),
            TargetScope::Global
        );
    }

    #[test]
    fn scope_type_parses_header_values() {
        assert_eq!("sous_localite".parse::<ScopeType>().unwrap(), ScopeType::SousLocalite);
        assert!("REGION".parse::<ScopeType>().is_err());
    }
}
