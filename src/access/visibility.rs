// src/access/visibility.rs

use crate::models::{
    auth::Role,
    scope::{RequestScope, ScopePath},
};

/// Leitura permitida?
///
/// - Globais (tipos de reunião sem etiqueta): todo mundo.
/// - OWNER: tudo, a não ser que tenha pedido um escopo mais estreito.
/// - LOCALITE: a própria localité inteira (ou tudo, com a sentinela); com
///   override, só o escopo pedido.
/// - SOUS_LOCALITE_ADMIN: a própria sous-localité e as sections dela.
/// - SECTION_USER: só a própria section.
/// - Qualquer outro caso: não.
pub fn can_view(scope: &RequestScope, target: &ScopePath) -> bool {
    if matches!(target, ScopePath::Global) {
        return true;
    }

    match scope.role {
        Role::Owner => !scope.overridden || scope.descriptor.contains(target),
        Role::Localite | Role::SousLocaliteAdmin | Role::SectionUser => {
            scope.descriptor.contains(target)
        }
        Role::ComitePedagogique | Role::OrgUnitResp => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::testing::Fixture;
    use crate::models::scope::ScopeDescriptor;

    #[test]
    fn section_user_sees_only_its_own_section() {
        let fx = Fixture::new();
        let u1 = fx.scope(Role::SectionUser, ScopeDescriptor::Section(fx.sec1));

        assert!(can_view(&u1, &fx.path_sec1()));
        assert!(!can_view(&u1, &fx.path_sec2()));
        assert!(!can_view(&u1, &fx.path_sl1()));
        assert!(!can_view(&u1, &fx.path_l1()));
        assert!(!can_view(&u1, &fx.path_sec3()));
    }

    #[test]
    fn sous_localite_admin_sees_its_subtree() {
        let fx = Fixture::new();
        let admin = fx.scope(Role::SousLocaliteAdmin, ScopeDescriptor::SousLocalite(fx.sl1));

        assert!(can_view(&admin, &fx.path_sl1()));
        assert!(can_view(&admin, &fx.path_sec1()));
        assert!(can_view(&admin, &fx.path_sec2()));

        assert!(!can_view(&admin, &fx.path_l1()));
        assert!(!can_view(&admin, &fx.path_sl2()));
        assert!(!can_view(&admin, &fx.path_sec3()));
        assert!(!can_view(&admin, &fx.path_l2()));
    }

    #[test]
    fn localite_sees_its_whole_localite_and_nothing_else() {
        let fx = Fixture::new();
        let localite = fx.scope(Role::Localite, ScopeDescriptor::Localite(fx.l1));

        for path in [fx.path_l1(), fx.path_sl1(), fx.path_sl2(), fx.path_sec1(), fx.path_sec3()] {
            assert!(can_view(&localite, &path), "{:?}", path);
        }
        for path in [fx.path_l2(), fx.path_sl3(), fx.path_sec4()] {
            assert!(!can_view(&localite, &path), "{:?}", path);
        }
    }

    #[test]
    fn owner_and_unanchored_localite_see_every_localite() {
        let fx = Fixture::new();
        let owner = fx.scope(Role::Owner, ScopeDescriptor::AllLocalites);
        let anchored_owner = fx.scope(Role::Owner, ScopeDescriptor::Localite(fx.l1));
        let localite = fx.scope(Role::Localite, ScopeDescriptor::AllLocalites);

        for path in fx.all_paths() {
            assert!(can_view(&owner, &path), "{:?}", path);
            assert!(can_view(&anchored_owner, &path), "{:?}", path);
            assert!(can_view(&localite, &path), "{:?}", path);
        }
    }

    #[test]
    fn override_narrows_localite_visibility() {
        let fx = Fixture::new();
        let mut scope = fx.scope(Role::Localite, ScopeDescriptor::SousLocalite(fx.sl1));
        scope.overridden = true;

        assert!(can_view(&scope, &fx.path_sec1()));
        assert!(can_view(&scope, &fx.path_sl1()));
        assert!(!can_view(&scope, &fx.path_sl2()));
        assert!(!can_view(&scope, &fx.path_l1()));
    }

    #[test]
    fn global_types_are_visible_to_every_role() {
        let fx = Fixture::new();
        for scope in fx.all_scopes() {
            assert!(can_view(&scope, &ScopePath::Global), "{:?}", scope.role);
        }
    }

    #[test]
    fn support_roles_see_no_scoped_resource() {
        let fx = Fixture::new();
        let comite = fx.scope(Role::ComitePedagogique, ScopeDescriptor::Localite(fx.l1));
        let resp = fx.scope(Role::OrgUnitResp, ScopeDescriptor::Localite(fx.l1));

        for path in fx.all_paths().into_iter().filter(|p| *p != ScopePath::Global) {
            assert!(!can_view(&comite, &path));
            assert!(!can_view(&resp, &path));
        }
    }
}
