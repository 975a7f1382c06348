// src/access/query.rs

//! Traduz o escopo da requisição em predicados SQL para as listagens.
//!
//! Cada listagem (membros, reuniões, tipos, cargos, usuários, nós da árvore)
//! passa pelo mesmo `ScopeFilter`, assim a regra de contenção existe num
//! lugar só. `matches` dá a mesma decisão em memória.

use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::{
    auth::Role,
    scope::{RequestScope, ScopeDescriptor, ScopePath, ScopeType},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeFilter {
    Everything,
    Nothing,
    Localite(Uuid),
    SousLocalite(Uuid),
    Section(Uuid),
}

/// Como a tabela listada se liga à hierarquia.
#[derive(Debug, Clone, Copy)]
pub enum ScopedTable<'a> {
    /// Recursos etiquetados com `scope_type` / `scope_id` (reuniões, cargos).
    Tagged { alias: &'a str },
    /// Tipos de reunião: etiquetados, e `scope_type IS NULL` é global.
    MeetingTypes { alias: &'a str },
    /// Linhas presas a uma section (membros).
    SectionAnchored { column: &'a str },
    /// Usuários: o papel decide qual coluna de ligação vale.
    Users { alias: &'a str },
    /// Os próprios nós da árvore.
    Node { level: ScopeType, alias: &'a str },
}

const SECTIONS_OF_SOUS_LOCALITE: &str = "SELECT id FROM sections WHERE sous_localite_id = ";
const SOUS_LOCALITES_OF_LOCALITE: &str = "SELECT id FROM sous_localites WHERE localite_id = ";
const SECTIONS_OF_LOCALITE: &str = "SELECT s.id FROM sections s \
     JOIN sous_localites sl ON sl.id = s.sous_localite_id WHERE sl.localite_id = ";

impl ScopeFilter {
    /// O ScopedQueryBuilder: escopo resolvido -> filtro de listagem.
    pub fn for_scope(scope: &RequestScope) -> Self {
        match scope.role {
            Role::Owner if !scope.overridden => ScopeFilter::Everything,
            Role::Owner | Role::Localite | Role::SousLocaliteAdmin | Role::SectionUser => {
                ScopeFilter::from_descriptor(&scope.descriptor)
            }
            Role::ComitePedagogique | Role::OrgUnitResp => ScopeFilter::Nothing,
        }
    }

    fn from_descriptor(descriptor: &ScopeDescriptor) -> Self {
        match descriptor {
            ScopeDescriptor::AllLocalites => ScopeFilter::Everything,
            ScopeDescriptor::Localite(id) => ScopeFilter::Localite(*id),
            ScopeDescriptor::SousLocalite(id) => ScopeFilter::SousLocalite(*id),
            ScopeDescriptor::Section(id) => ScopeFilter::Section(*id),
        }
    }

    /// Mesma decisão que o SQL, para um alvo já localizado.
    pub fn matches(&self, path: &ScopePath) -> bool {
        match (self, path) {
            (ScopeFilter::Everything, _) => true,
            (ScopeFilter::Nothing, _) | (_, ScopePath::Global) => false,
            (ScopeFilter::Localite(id), p) => p.localite_id() == Some(*id),
            (ScopeFilter::SousLocalite(id), p) => p.sous_localite_id() == Some(*id),
            (ScopeFilter::Section(id), p) => p.section_id() == Some(*id),
        }
    }

    /// Regra de união dos tipos de reunião: globais sempre aparecem.
    pub fn matches_meeting_type(&self, path: &ScopePath) -> bool {
        matches!(path, ScopePath::Global) || self.matches(path)
    }

    fn anchor(&self) -> Option<Anchor> {
        match *self {
            ScopeFilter::Localite(id) => Some(Anchor::Localite(id)),
            ScopeFilter::SousLocalite(id) => Some(Anchor::SousLocalite(id)),
            ScopeFilter::Section(id) => Some(Anchor::Section(id)),
            ScopeFilter::Everything | ScopeFilter::Nothing => None,
        }
    }

    /// Acrescenta o predicado (entre parênteses) ao `QueryBuilder`.
    pub fn push_predicate(&self, qb: &mut QueryBuilder<'_, Postgres>, table: ScopedTable<'_>) {
        let Some(anchor) = self.anchor() else {
            match (self, table) {
                (ScopeFilter::Everything, _) => qb.push("TRUE"),
                (_, ScopedTable::MeetingTypes { alias }) => {
                    qb.push(format!("({alias}.scope_type IS NULL)"))
                }
                _ => qb.push("FALSE"),
            };
            return;
        };

        match table {
            ScopedTable::Tagged { alias } => push_tagged(qb, anchor, alias),
            ScopedTable::MeetingTypes { alias } => {
                qb.push(format!("({alias}.scope_type IS NULL OR "));
                push_tagged(qb, anchor, alias);
                qb.push(")");
            }
            ScopedTable::SectionAnchored { column } => push_section_anchored(qb, anchor, column),
            ScopedTable::Users { alias } => push_users(qb, anchor, alias),
            ScopedTable::Node { level, alias } => push_node(qb, anchor, level, alias),
        }
    }
}

// O nó concreto de um filtro que não é Everything/Nothing.
#[derive(Debug, Clone, Copy)]
enum Anchor {
    Localite(Uuid),
    SousLocalite(Uuid),
    Section(Uuid),
}

fn push_tagged(qb: &mut QueryBuilder<'_, Postgres>, anchor: Anchor, a: &str) {
    match anchor {
        Anchor::Section(id) => {
            qb.push(format!("({a}.scope_type = 'SECTION' AND {a}.scope_id = "));
            qb.push_bind(id);
            qb.push(")");
        }
        Anchor::SousLocalite(id) => {
            qb.push(format!("(({a}.scope_type = 'SOUS_LOCALITE' AND {a}.scope_id = "));
            qb.push_bind(id);
            qb.push(format!(") OR ({a}.scope_type = 'SECTION' AND {a}.scope_id IN ("));
            qb.push(SECTIONS_OF_SOUS_LOCALITE);
            qb.push_bind(id);
            qb.push(")))");
        }
        Anchor::Localite(id) => {
            qb.push(format!("(({a}.scope_type = 'LOCALITE' AND {a}.scope_id = "));
            qb.push_bind(id);
            qb.push(format!(") OR ({a}.scope_type = 'SOUS_LOCALITE' AND {a}.scope_id IN ("));
            qb.push(SOUS_LOCALITES_OF_LOCALITE);
            qb.push_bind(id);
            qb.push(format!(")) OR ({a}.scope_type = 'SECTION' AND {a}.scope_id IN ("));
            qb.push(SECTIONS_OF_LOCALITE);
            qb.push_bind(id);
            qb.push(")))");
        }
    }
}

fn push_section_anchored(qb: &mut QueryBuilder<'_, Postgres>, anchor: Anchor, column: &str) {
    match anchor {
        Anchor::Section(id) => {
            qb.push(format!("({column} = "));
            qb.push_bind(id);
            qb.push(")");
        }
        Anchor::SousLocalite(id) => {
            qb.push(format!("({column} IN ("));
            qb.push(SECTIONS_OF_SOUS_LOCALITE);
            qb.push_bind(id);
            qb.push("))");
        }
        Anchor::Localite(id) => {
            qb.push(format!("({column} IN ("));
            qb.push(SECTIONS_OF_LOCALITE);
            qb.push_bind(id);
            qb.push("))");
        }
    }
}

fn push_users(qb: &mut QueryBuilder<'_, Postgres>, anchor: Anchor, u: &str) {
    match anchor {
        Anchor::Section(id) => {
            qb.push(format!("({u}.role = 'SECTION_USER' AND {u}.section_id = "));
            qb.push_bind(id);
            qb.push(")");
        }
        Anchor::SousLocalite(id) => {
            qb.push(format!("(({u}.role = 'SOUS_LOCALITE_ADMIN' AND {u}.sous_localite_id = "));
            qb.push_bind(id);
            qb.push(format!(") OR ({u}.role = 'SECTION_USER' AND {u}.section_id IN ("));
            qb.push(SECTIONS_OF_SOUS_LOCALITE);
            qb.push_bind(id);
            qb.push(")))");
        }
        Anchor::Localite(id) => {
            qb.push(format!("(({u}.role = 'LOCALITE' AND {u}.localite_id = "));
            qb.push_bind(id);
            qb.push(format!(
                ") OR ({u}.role IN ('COMITE_PEDAGOGIQUE', 'ORG_UNIT_RESP') AND {} = ",
                home_localite_sql(u)
            ));
            qb.push_bind(id);
            qb.push(format!(") OR ({u}.role = 'SOUS_LOCALITE_ADMIN' AND {u}.sous_localite_id IN ("));
            qb.push(SOUS_LOCALITES_OF_LOCALITE);
            qb.push_bind(id);
            qb.push(format!(")) OR ({u}.role = 'SECTION_USER' AND {u}.section_id IN ("));
            qb.push(SECTIONS_OF_LOCALITE);
            qb.push_bind(id);
            qb.push(")))");
        }
    }
}

// Mesma ordem de `resolver::home_localite`: própria, sous-localité, section.
fn home_localite_sql(u: &str) -> String {
    format!(
        "COALESCE({u}.localite_id, \
         (SELECT hsl.localite_id FROM sous_localites hsl WHERE hsl.id = {u}.sous_localite_id), \
         (SELECT hsl.localite_id FROM sections hs \
          JOIN sous_localites hsl ON hsl.id = hs.sous_localite_id WHERE hs.id = {u}.section_id))"
    )
}

fn push_node(qb: &mut QueryBuilder<'_, Postgres>, anchor: Anchor, level: ScopeType, n: &str) {
    match (level, anchor) {
        (ScopeType::Localite, Anchor::Localite(id))
        | (ScopeType::SousLocalite, Anchor::SousLocalite(id))
        | (ScopeType::Section, Anchor::Section(id)) => {
            qb.push(format!("({n}.id = "));
            qb.push_bind(id);
            qb.push(")");
        }
        (ScopeType::SousLocalite, Anchor::Localite(id)) => {
            qb.push(format!("({n}.localite_id = "));
            qb.push_bind(id);
            qb.push(")");
        }
        (ScopeType::Section, Anchor::SousLocalite(id)) => {
            qb.push(format!("({n}.sous_localite_id = "));
            qb.push_bind(id);
            qb.push(")");
        }
        (ScopeType::Section, Anchor::Localite(id)) => {
            qb.push(format!("({n}.sous_localite_id IN ("));
            qb.push(SOUS_LOCALITES_OF_LOCALITE);
            qb.push_bind(id);
            qb.push("))");
        }
        // Nós acima do escopo nunca aparecem.
        _ => {
            qb.push("FALSE");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::{testing::Fixture, visibility::can_view};
    use pretty_assertions::assert_eq;

    fn render(filter: ScopeFilter, table: ScopedTable<'_>) -> String {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM t WHERE ");
        filter.push_predicate(&mut qb, table);
        qb.sql().to_string()
    }

    #[test]
    fn section_user_filter_is_exact_match() {
        let id = Uuid::new_v4();
        assert_eq!(
            render(ScopeFilter::Section(id), ScopedTable::Tagged { alias: "m" }),
            "SELECT * FROM t WHERE (m.scope_type = 'SECTION' AND m.scope_id = $1)"
        );
    }

    #[test]
    fn sous_localite_filter_reaches_one_hop_down() {
        let sql = render(
            ScopeFilter::SousLocalite(Uuid::new_v4()),
            ScopedTable::Tagged { alias: "m" },
        );
        assert!(sql.contains("m.scope_type = 'SOUS_LOCALITE' AND m.scope_id = $1"));
        assert!(sql.contains("sous_localite_id = $2"));
        assert!(!sql.contains("'LOCALITE'"));
    }

    #[test]
    fn meeting_types_always_include_global() {
        let sql = render(
            ScopeFilter::Section(Uuid::new_v4()),
            ScopedTable::MeetingTypes { alias: "mt" },
        );
        assert!(sql.starts_with("SELECT * FROM t WHERE (mt.scope_type IS NULL OR "));

        let nothing = render(ScopeFilter::Nothing, ScopedTable::MeetingTypes { alias: "mt" });
        assert_eq!(nothing, "SELECT * FROM t WHERE (mt.scope_type IS NULL)");

        let other = render(ScopeFilter::Nothing, ScopedTable::Tagged { alias: "m" });
        assert_eq!(other, "SELECT * FROM t WHERE FALSE");
    }

    #[test]
    fn members_filter_uses_section_column() {
        let sql = render(
            ScopeFilter::Localite(Uuid::new_v4()),
            ScopedTable::SectionAnchored { column: "mb.section_id" },
        );
        assert!(sql.starts_with("SELECT * FROM t WHERE (mb.section_id IN (SELECT s.id FROM sections s"));
    }

    #[test]
    fn support_users_follow_the_home_localite_chain() {
        let sql = render(ScopeFilter::Localite(Uuid::new_v4()), ScopedTable::Users { alias: "u" });

        assert!(sql.contains("(u.role = 'LOCALITE' AND u.localite_id = $1)"));
        assert!(sql.contains(
            "(u.role IN ('COMITE_PEDAGOGIQUE', 'ORG_UNIT_RESP') AND COALESCE(u.localite_id, \
             (SELECT hsl.localite_id FROM sous_localites hsl WHERE hsl.id = u.sous_localite_id), \
             (SELECT hsl.localite_id FROM sections hs \
             JOIN sous_localites hsl ON hsl.id = hs.sous_localite_id WHERE hs.id = u.section_id)) = $2)"
        ));
        assert!(sql.contains("u.sous_localite_id IN (SELECT id FROM sous_localites WHERE localite_id = $3)"));
    }

    #[test]
    fn ancestor_nodes_are_never_listed() {
        let sql = render(
            ScopeFilter::Section(Uuid::new_v4()),
            ScopedTable::Node { level: ScopeType::SousLocalite, alias: "n" },
        );
        assert_eq!(sql, "SELECT * FROM t WHERE FALSE");
    }

    #[test]
    fn filter_agrees_with_visibility() {
        let fx = Fixture::new();

        for scope in fx.all_scopes() {
            let filter = ScopeFilter::for_scope(&scope);
            for path in fx.all_paths() {
                if path == ScopePath::Global {
                    assert!(filter.matches_meeting_type(&path));
                    continue;
                }
                assert_eq!(
                    filter.matches(&path),
                    can_view(&scope, &path),
                    "escopo {:?}, alvo {:?}",
                    scope,
                    path
                );
            }
        }
    }

    #[test]
    fn anchored_localite_lists_only_its_localite() {
        let fx = Fixture::new();
        let scope = fx.scope(Role::Localite, ScopeDescriptor::Localite(fx.l1));
        let filter = ScopeFilter::for_scope(&scope);

        assert_eq!(filter, ScopeFilter::Localite(fx.l1));
        assert!(filter.matches(&fx.path_sec3()));
        assert!(!filter.matches(&fx.path_l2()));
        assert!(!filter.matches(&fx.path_sec4()));

        let unanchored = fx.scope(Role::Localite, ScopeDescriptor::AllLocalites);
        assert_eq!(ScopeFilter::for_scope(&unanchored), ScopeFilter::Everything);
    }

    #[test]
    fn support_roles_see_only_global_types() {
        let fx = Fixture::new();
        let scope = fx.scope(Role::ComitePedagogique, ScopeDescriptor::Localite(fx.l1));
        let filter = ScopeFilter::for_scope(&scope);

        assert_eq!(filter, ScopeFilter::Nothing);
        assert!(filter.matches_meeting_type(&ScopePath::Global));
        assert!(!filter.matches_meeting_type(&fx.path_sec1()));
    }
}
