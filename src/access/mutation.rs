// src/access/mutation.rs

use crate::{
    access::visibility::can_view,
    models::{
        auth::Role,
        scope::{RequestScope, ScopePath, ScopeType},
    },
};

/// Escrita (criar, alterar, apagar) permitida?
///
/// Exige leitura e, além disso, que o nível do recurso seja exatamente o nível
/// do papel. OWNER não tem nível e só fica limitado pelo próprio override.
/// Recursos globais só o OWNER altera.
pub fn can_mutate(scope: &RequestScope, target: &ScopePath) -> bool {
    if !can_view(scope, target) {
        return false;
    }

    match scope.role {
        Role::Owner => true,
        role => match role.mutation_level() {
            Some(level) => target.scope_type() == Some(level),
            None => false,
        },
    }
}

/// Criar um nó filho (`child_level`) debaixo de `parent`.
///
/// O papel precisa estar estritamente acima do nível do filho e enxergar o pai.
/// Localités (sem pai) só o OWNER cria.
pub fn can_create_child(scope: &RequestScope, parent: &ScopePath, child_level: ScopeType) -> bool {
    if child_level == ScopeType::Localite {
        return scope.role == Role::Owner;
    }

    let parent_ok = parent
        .scope_type()
        .is_some_and(|parent_level| parent_level.depth() + 1 == child_level.depth());
    if !parent_ok || !can_view(scope, parent) {
        return false;
    }

    match scope.role {
        Role::Owner => true,
        role => role
            .mutation_level()
            .is_some_and(|level| level.depth() < child_level.depth()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::testing::Fixture;
    use crate::models::scope::ScopeDescriptor;

    #[test]
    fn mutation_implies_visibility() {
        let fx = Fixture::new();
        for scope in fx.all_scopes() {
            for path in fx.all_paths() {
                if can_mutate(&scope, &path) {
                    assert!(can_view(&scope, &path), "{:?} -> {:?}", scope, path);
                }
            }
        }
    }

    #[test]
    fn section_user_mutates_only_its_section() {
        let fx = Fixture::new();
        let u1 = fx.scope(Role::SectionUser, ScopeDescriptor::Section(fx.sec1));

        assert!(can_mutate(&u1, &fx.path_sec1()));
        assert!(!can_mutate(&u1, &fx.path_sec2()));
        assert!(!can_mutate(&u1, &fx.path_sl1()));
    }

    #[test]
    fn sous_localite_admin_reads_sections_but_writes_only_its_level() {
        let fx = Fixture::new();
        let admin = fx.scope(Role::SousLocaliteAdmin, ScopeDescriptor::SousLocalite(fx.sl1));

        assert!(can_view(&admin, &fx.path_sec1()));
        assert!(!can_mutate(&admin, &fx.path_sec1()));
        assert!(can_mutate(&admin, &fx.path_sl1()));
        assert!(!can_mutate(&admin, &fx.path_sl2()));
    }

    #[test]
    fn localite_writes_localite_tagged_only() {
        let fx = Fixture::new();
        let localite = fx.scope(Role::Localite, ScopeDescriptor::Localite(fx.l1));

        assert!(can_mutate(&localite, &fx.path_l1()));
        assert!(!can_mutate(&localite, &fx.path_sl1()));
        assert!(!can_mutate(&localite, &fx.path_sec1()));
        assert!(!can_mutate(&localite, &ScopePath::Global));
        assert!(!can_mutate(&localite, &fx.path_l2()));
    }

    #[test]
    fn localite_cannot_grow_another_localite() {
        let fx = Fixture::new();
        let localite = fx.scope(Role::Localite, ScopeDescriptor::Localite(fx.l1));

        assert!(!can_create_child(&localite, &fx.path_l2(), ScopeType::SousLocalite));
        assert!(!can_create_child(&localite, &fx.path_sl3(), ScopeType::Section));
    }

    #[test]
    fn owner_bypasses_the_level_rule() {
        let fx = Fixture::new();
        let owner = fx.scope(Role::Owner, ScopeDescriptor::AllLocalites);

        for path in fx.all_paths() {
            assert!(can_mutate(&owner, &path));
        }
    }

    #[test]
    fn support_roles_never_mutate() {
        let fx = Fixture::new();
        let comite = fx.scope(Role::ComitePedagogique, ScopeDescriptor::Localite(fx.l1));
        for path in fx.all_paths() {
            assert!(!can_mutate(&comite, &path));
        }
    }

    #[test]
    fn child_creation_needs_a_strictly_higher_role() {
        let fx = Fixture::new();
        let owner = fx.scope(Role::Owner, ScopeDescriptor::AllLocalites);
        let localite = fx.scope(Role::Localite, ScopeDescriptor::Localite(fx.l1));
        let admin = fx.scope(Role::SousLocaliteAdmin, ScopeDescriptor::SousLocalite(fx.sl1));
        let u1 = fx.scope(Role::SectionUser, ScopeDescriptor::Section(fx.sec1));

        assert!(can_create_child(&owner, &ScopePath::Global, ScopeType::Localite));
        assert!(!can_create_child(&localite, &ScopePath::Global, ScopeType::Localite));

        assert!(can_create_child(&localite, &fx.path_l1(), ScopeType::SousLocalite));
        assert!(can_create_child(&localite, &fx.path_sl1(), ScopeType::Section));
        assert!(can_create_child(&admin, &fx.path_sl1(), ScopeType::Section));
        assert!(!can_create_child(&admin, &fx.path_sl2(), ScopeType::Section));
        assert!(!can_create_child(&admin, &fx.path_l1(), ScopeType::SousLocalite));
        assert!(!can_create_child(&u1, &fx.path_sl1(), ScopeType::Section));
    }

    #[test]
    fn child_must_sit_one_level_below_parent() {
        let fx = Fixture::new();
        let localite = fx.scope(Role::Localite, ScopeDescriptor::Localite(fx.l1));

        assert!(!can_create_child(&localite, &fx.path_l1(), ScopeType::Section));
    }
}
