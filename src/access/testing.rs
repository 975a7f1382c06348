// src/access/testing.rs

//! Árvore de teste e um HierarchyStore em memória.
//!
//! ```text
//! l1 ── sl1 ── sec1, sec2
//!    └─ sl2 ── sec3
//! l2 ── sl3 ── sec4
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::HierarchyStore,
    models::{
        auth::{Principal, Role},
        hierarchy::{Localite, Section, SousLocalite},
        member::Membre,
        scope::{RequestScope, ScopeDescriptor, ScopePath},
    },
};

pub const ROLES: [Role; 6] = [
    Role::Localite,
    Role::SousLocaliteAdmin,
    Role::SectionUser,
    Role::Owner,
    Role::ComitePedagogique,
    Role::OrgUnitResp,
];

pub struct Fixture {
    pub l1: Uuid,
    pub l2: Uuid,
    pub sl1: Uuid,
    pub sl2: Uuid,
    pub sl3: Uuid,
    pub sec1: Uuid,
    pub sec2: Uuid,
    pub sec3: Uuid,
    pub sec4: Uuid,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            l1: Uuid::new_v4(),
            l2: Uuid::new_v4(),
            sl1: Uuid::new_v4(),
            sl2: Uuid::new_v4(),
            sl3: Uuid::new_v4(),
            sec1: Uuid::new_v4(),
            sec2: Uuid::new_v4(),
            sec3: Uuid::new_v4(),
            sec4: Uuid::new_v4(),
        }
    }

    pub fn store(&self) -> InMemoryHierarchy {
        let mut store = InMemoryHierarchy::default();
        store.add_localite(self.l1);
        store.add_localite(self.l2);
        store.add_sous_localite(self.sl1, self.l1);
        store.add_sous_localite(self.sl2, self.l1);
        store.add_sous_localite(self.sl3, self.l2);
        store.add_section(self.sec1, self.sl1);
        store.add_section(self.sec2, self.sl1);
        store.add_section(self.sec3, self.sl2);
        store.add_section(self.sec4, self.sl3);
        store
    }

    pub fn scope(&self, role: Role, descriptor: ScopeDescriptor) -> RequestScope {
        RequestScope {
            user_id: Uuid::new_v4(),
            role,
            descriptor,
            overridden: false,
        }
    }

    pub fn path_l1(&self) -> ScopePath {
        ScopePath::Localite { localite_id: self.l1 }
    }

    pub fn path_l2(&self) -> ScopePath {
        ScopePath::Localite { localite_id: self.l2 }
    }

    pub fn path_sl1(&self) -> ScopePath {
        self.sl(self.l1, self.sl1)
    }

    pub fn path_sl2(&self) -> ScopePath {
        self.sl(self.l1, self.sl2)
    }

    pub fn path_sl3(&self) -> ScopePath {
        self.sl(self.l2, self.sl3)
    }

    pub fn path_sec1(&self) -> ScopePath {
        self.sec(self.l1, self.sl1, self.sec1)
    }

    pub fn path_sec2(&self) -> ScopePath {
        self.sec(self.l1, self.sl1, self.sec2)
    }

    pub fn path_sec3(&self) -> ScopePath {
        self.sec(self.l1, self.sl2, self.sec3)
    }

    pub fn path_sec4(&self) -> ScopePath {
        self.sec(self.l2, self.sl3, self.sec4)
    }

    fn sl(&self, l: Uuid, sl: Uuid) -> ScopePath {
        ScopePath::SousLocalite {
            localite_id: l,
            sous_localite_id: sl,
        }
    }

    fn sec(&self, l: Uuid, sl: Uuid, s: Uuid) -> ScopePath {
        ScopePath::Section {
            localite_id: l,
            sous_localite_id: sl,
            section_id: s,
        }
    }

    pub fn all_paths(&self) -> Vec<ScopePath> {
        vec![
            ScopePath::Global,
            self.path_l1(),
            self.path_l2(),
            self.path_sl1(),
            self.path_sl2(),
            self.path_sl3(),
            self.path_sec1(),
            self.path_sec2(),
            self.path_sec3(),
            self.path_sec4(),
        ]
    }

    /// Todas as combinações papel × âncora, com e sem override.
    pub fn all_scopes(&self) -> Vec<RequestScope> {
        let descriptors = [
            ScopeDescriptor::AllLocalites,
            ScopeDescriptor::Localite(self.l1),
            ScopeDescriptor::Localite(self.l2),
            ScopeDescriptor::SousLocalite(self.sl1),
            ScopeDescriptor::SousLocalite(self.sl3),
            ScopeDescriptor::Section(self.sec1),
            ScopeDescriptor::Section(self.sec4),
        ];

        let mut scopes = Vec::new();
        for role in ROLES {
            for descriptor in descriptors {
                let scope = self.scope(role, descriptor);
                if role.is_tenant_wide() && descriptor != ScopeDescriptor::AllLocalites {
                    scopes.push(RequestScope {
                        overridden: true,
                        ..scope.clone()
                    });
                }
                scopes.push(scope);
            }
        }
        scopes
    }
}

#[derive(Default)]
pub struct InMemoryHierarchy {
    localites: HashMap<Uuid, Localite>,
    sous_localites: HashMap<Uuid, SousLocalite>,
    sections: HashMap<Uuid, Section>,
}

impl InMemoryHierarchy {
    pub fn add_localite(&mut self, id: Uuid) {
        self.localites.insert(
            id,
            Localite {
                id,
                name: format!("L-{}", id),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
        );
    }

    pub fn add_sous_localite(&mut self, id: Uuid, localite_id: Uuid) {
        self.sous_localites.insert(
            id,
            SousLocalite {
                id,
                localite_id,
                name: format!("SL-{}", id),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
        );
    }

    pub fn add_section(&mut self, id: Uuid, sous_localite_id: Uuid) {
        self.sections.insert(
            id,
            Section {
                id,
                sous_localite_id,
                name: format!("S-{}", id),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
        );
    }
}

#[async_trait]
impl HierarchyStore for InMemoryHierarchy {
    async fn find_localite(&self, id: Uuid) -> Result<Option<Localite>, AppError> {
        Ok(self.localites.get(&id).cloned())
    }

    async fn find_sous_localite(&self, id: Uuid) -> Result<Option<SousLocalite>, AppError> {
        Ok(self.sous_localites.get(&id).cloned())
    }

    async fn find_section(&self, id: Uuid) -> Result<Option<Section>, AppError> {
        Ok(self.sections.get(&id).cloned())
    }
}

pub fn principal(role: Role) -> Principal {
    Principal {
        user_id: Uuid::new_v4(),
        role,
        localite_id: None,
        sous_localite_id: None,
        section_id: None,
    }
}

pub fn membre(section_id: Uuid, birth_date: Option<NaiveDate>, tag: Option<&str>) -> Membre {
    Membre {
        id: Uuid::new_v4(),
        section_id,
        first_name: "Awa".into(),
        last_name: "Traoré".into(),
        gender: "F".into(),
        birth_date,
        age_bracket: tag.map(str::to_string),
        voter_card_number: None,
        voter_card_place: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}
