// src/access/resolver.rs

//! ScopeResolver: principal -> escopo canônico da requisição.
//!
//! Recalculado a cada requisição a partir do estado atual do banco; nada
//! aqui é guardado entre requisições.

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::HierarchyStore,
    models::{
        auth::{Principal, Role},
        scope::{RequestScope, ScopeDescriptor, ScopeOverride, ScopePath, TargetScope},
    },
};

/// Resolve o escopo do principal e aplica o override pedido, se houver.
///
/// Nunca cai num padrão: sem posição resolvível na árvore é `ScopeMissing`.
pub async fn resolve_scope(
    store: &dyn HierarchyStore,
    principal: &Principal,
    requested: Option<ScopeOverride>,
) -> Result<RequestScope, AppError> {
    let descriptor = match principal.role {
        Role::SectionUser => {
            let id = principal.section_id.ok_or_else(|| {
                AppError::ScopeMissing(format!("SECTION_USER {} sem sectionId", principal.user_id))
            })?;
            if store.find_section(id).await?.is_none() {
                return Err(AppError::ScopeMissing(format!(
                    "section {} do usuário {} não existe",
                    id, principal.user_id
                )));
            }
            ScopeDescriptor::Section(id)
        }
        Role::SousLocaliteAdmin => {
            let id = principal.sous_localite_id.ok_or_else(|| {
                AppError::ScopeMissing(format!(
                    "SOUS_LOCALITE_ADMIN {} sem sousLocaliteId",
                    principal.user_id
                ))
            })?;
            if store.find_sous_localite(id).await?.is_none() {
                return Err(AppError::ScopeMissing(format!(
                    "sous-localité {} do usuário {} não existe",
                    id, principal.user_id
                )));
            }
            ScopeDescriptor::SousLocalite(id)
        }
        Role::Localite | Role::Owner => match principal.localite_id {
            Some(id) => {
                if store.find_localite(id).await?.is_none() {
                    return Err(AppError::ScopeMissing(format!(
                        "localité {} do usuário {} não existe",
                        id, principal.user_id
                    )));
                }
                ScopeDescriptor::Localite(id)
            }
            None => ScopeDescriptor::AllLocalites,
        },
        Role::ComitePedagogique | Role::OrgUnitResp => {
            ScopeDescriptor::Localite(home_localite(store, principal).await?)
        }
    };

    let mut scope = RequestScope {
        user_id: principal.user_id,
        role: principal.role,
        descriptor,
        overridden: false,
    };

    if let Some(requested) = requested {
        apply_override(store, &mut scope, requested).await?;
    }

    tracing::debug!(
        user_id = %scope.user_id,
        role = ?scope.role,
        scope = ?scope.descriptor,
        overridden = scope.overridden,
        "Escopo resolvido"
    );

    Ok(scope)
}

async fn apply_override(
    store: &dyn HierarchyStore,
    scope: &mut RequestScope,
    requested: ScopeOverride,
) -> Result<(), AppError> {
    if !scope.role.is_tenant_wide() {
        return Err(AppError::Forbidden(format!(
            "papel {:?} não pode escolher outro escopo",
            scope.role
        )));
    }

    // O nó pedido precisa existir e (salvo OWNER) estar dentro da âncora atual.
    let path = locate(store, TargetScope::tagged(requested.scope_type, requested.scope_id)).await?;
    if scope.role != Role::Owner && !scope.descriptor.contains(&path) {
        return Err(AppError::Forbidden(format!(
            "override {:?} fora de {:?}",
            requested, scope.descriptor
        )));
    }

    scope.descriptor = ScopeDescriptor::from_parts(requested.scope_type, requested.scope_id);
    scope.overridden = true;
    Ok(())
}

/// A localité "de casa" dos papéis de apoio (COMITE_PEDAGOGIQUE, ORG_UNIT_RESP).
///
/// Ordem fixa, para no primeiro valor não nulo:
/// 1. `localite_id` do próprio usuário;
/// 2. `localite_id` da sous-localité ligada;
/// 3. `localite_id` da sous-localité da section ligada.
///
/// Referências penduradas contam como nulas.
pub async fn home_localite(store: &dyn HierarchyStore, principal: &Principal) -> Result<Uuid, AppError> {
    if let Some(id) = principal.localite_id {
        return Ok(id);
    }

    if let Some(sl_id) = principal.sous_localite_id {
        if let Some(sous_localite) = store.find_sous_localite(sl_id).await? {
            return Ok(sous_localite.localite_id);
        }
    }

    if let Some(section_id) = principal.section_id {
        if let Some(section) = store.find_section(section_id).await? {
            if let Some(sous_localite) = store.find_sous_localite(section.sous_localite_id).await? {
                return Ok(sous_localite.localite_id);
            }
        }
    }

    Err(AppError::ScopeMissing(format!(
        "usuário {} ({:?}) sem localité derivável",
        principal.user_id, principal.role
    )))
}

/// A localité de topo do principal, por melhor esforço (`None` = todas).
pub async fn top_level_id(
    store: &dyn HierarchyStore,
    principal: &Principal,
) -> Result<Option<Uuid>, AppError> {
    match principal.role {
        Role::Localite | Role::Owner => Ok(principal.localite_id),
        Role::SectionUser => {
            let path = match principal.section_id {
                Some(id) => try_locate(store, TargetScope::Section(id)).await?,
                None => None,
            };
            path.and_then(|p| p.localite_id()).map(Some).ok_or_else(|| {
                AppError::ScopeMissing(format!("SECTION_USER {} sem section", principal.user_id))
            })
        }
        Role::SousLocaliteAdmin => {
            let path = match principal.sous_localite_id {
                Some(id) => try_locate(store, TargetScope::SousLocalite(id)).await?,
                None => None,
            };
            path.and_then(|p| p.localite_id()).map(Some).ok_or_else(|| {
                AppError::ScopeMissing(format!(
                    "SOUS_LOCALITE_ADMIN {} sem sous-localité",
                    principal.user_id
                ))
            })
        }
        Role::ComitePedagogique | Role::OrgUnitResp => {
            home_localite(store, principal).await.map(Some)
        }
    }
}

/// Localiza a etiqueta de um recurso na árvore. Nó inexistente é `NotFound`.
///
/// As consultas não ficam numa transação: o resultado pode envelhecer entre a
/// consulta e a decisão.
pub async fn locate(store: &dyn HierarchyStore, target: TargetScope) -> Result<ScopePath, AppError> {
    try_locate(store, target)
        .await?
        .ok_or_else(|| AppError::NotFound("Nó da hierarquia".into()))
}

async fn try_locate(
    store: &dyn HierarchyStore,
    target: TargetScope,
) -> Result<Option<ScopePath>, AppError> {
    let path = match target {
        TargetScope::Global => Some(ScopePath::Global),
        TargetScope::Localite(id) => store
            .find_localite(id)
            .await?
            .map(|l| ScopePath::Localite { localite_id: l.id }),
        TargetScope::SousLocalite(id) => {
            store
                .find_sous_localite(id)
                .await?
                .map(|sl| ScopePath::SousLocalite {
                    localite_id: sl.localite_id,
                    sous_localite_id: sl.id,
                })
        }
        TargetScope::Section(id) => match store.find_section(id).await? {
            Some(section) => store
                .find_sous_localite(section.sous_localite_id)
                .await?
                .map(|sl| ScopePath::Section {
                    localite_id: sl.localite_id,
                    sous_localite_id: sl.id,
                    section_id: section.id,
                }),
            None => None,
        },
    };

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::testing::{principal, Fixture};
    use crate::db::MockHierarchyStore;
    use crate::models::{hierarchy::SousLocalite, scope::ScopeType};
    use chrono::Utc;
    use mockall::predicate::eq;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn section_user_resolves_to_its_section() {
        let fx = Fixture::new();
        let store = fx.store();
        let mut p = principal(Role::SectionUser);
        p.section_id = Some(fx.sec1);
        // Lixo legado nas outras colunas é ignorado.
        p.localite_id = Some(fx.l2);

        let scope = resolve_scope(&store, &p, None).await.unwrap();
        assert_eq!(scope.descriptor, ScopeDescriptor::Section(fx.sec1));
        assert!(!scope.overridden);
    }

    #[tokio::test]
    async fn missing_attachment_is_scope_missing() {
        let fx = Fixture::new();
        let store = fx.store();

        for role in [Role::SectionUser, Role::SousLocaliteAdmin] {
            let p = principal(role);
            let err = resolve_scope(&store, &p, None).await.unwrap_err();
            assert!(matches!(err, AppError::ScopeMissing(_)), "{:?}", role);
        }
    }

    #[tokio::test]
    async fn dangling_section_is_scope_missing() {
        let fx = Fixture::new();
        let store = fx.store();
        let mut p = principal(Role::SectionUser);
        p.section_id = Some(Uuid::new_v4());

        let err = resolve_scope(&store, &p, None).await.unwrap_err();
        assert!(matches!(err, AppError::ScopeMissing(_)));
    }

    #[tokio::test]
    async fn owner_without_localite_gets_the_sentinel() {
        let fx = Fixture::new();
        let store = fx.store();
        let scope = resolve_scope(&store, &principal(Role::Owner), None).await.unwrap();
        assert_eq!(scope.descriptor, ScopeDescriptor::AllLocalites);
    }

    #[tokio::test]
    async fn override_is_validated_against_the_tree() {
        let fx = Fixture::new();
        let store = fx.store();
        let mut p = principal(Role::Localite);
        p.localite_id = Some(fx.l1);

        let inside = ScopeOverride { scope_type: ScopeType::Section, scope_id: fx.sec2 };
        let scope = resolve_scope(&store, &p, Some(inside)).await.unwrap();
        assert_eq!(scope.descriptor, ScopeDescriptor::Section(fx.sec2));
        assert!(scope.overridden);

        let outside = ScopeOverride { scope_type: ScopeType::SousLocalite, scope_id: fx.sl3 };
        let err = resolve_scope(&store, &p, Some(outside)).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let ghost = ScopeOverride { scope_type: ScopeType::Section, scope_id: Uuid::new_v4() };
        let err = resolve_scope(&store, &p, Some(ghost)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn only_tenant_wide_roles_may_override() {
        let fx = Fixture::new();
        let store = fx.store();
        let mut p = principal(Role::SousLocaliteAdmin);
        p.sous_localite_id = Some(fx.sl1);

        let req = ScopeOverride { scope_type: ScopeType::Section, scope_id: fx.sec1 };
        let err = resolve_scope(&store, &p, Some(req)).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn own_localite_wins_without_touching_the_store() {
        let own = Uuid::new_v4();
        let mut mock = MockHierarchyStore::new();
        mock.expect_find_sous_localite().times(0);
        mock.expect_find_section().times(0);

        let mut p = principal(Role::ComitePedagogique);
        p.localite_id = Some(own);
        p.sous_localite_id = Some(Uuid::new_v4());

        assert_eq!(home_localite(&mock, &p).await.unwrap(), own);
    }

    #[tokio::test]
    async fn sous_localite_beats_section_in_the_fallback() {
        let fx = Fixture::new();
        let store = fx.store();
        let mut p = principal(Role::OrgUnitResp);
        p.sous_localite_id = Some(fx.sl3); // em l2
        p.section_id = Some(fx.sec1); // em l1

        assert_eq!(home_localite(&store, &p).await.unwrap(), fx.l2);
    }

    #[tokio::test]
    async fn section_chain_is_the_last_resort() {
        let fx = Fixture::new();
        let store = fx.store();
        let mut p = principal(Role::ComitePedagogique);
        p.sous_localite_id = Some(Uuid::new_v4()); // pendurada
        p.section_id = Some(fx.sec3);

        assert_eq!(home_localite(&store, &p).await.unwrap(), fx.l1);

        let scope = resolve_scope(&store, &p, None).await.unwrap();
        assert_eq!(scope.descriptor, ScopeDescriptor::Localite(fx.l1));
    }

    #[tokio::test]
    async fn empty_fallback_chain_is_scope_missing() {
        let fx = Fixture::new();
        let store = fx.store();
        let err = home_localite(&store, &principal(Role::ComitePedagogique))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ScopeMissing(_)));
    }

    #[tokio::test]
    async fn sous_localite_lookup_is_used_once() {
        let l = Uuid::new_v4();
        let sl = Uuid::new_v4();
        let mut mock = MockHierarchyStore::new();
        mock.expect_find_sous_localite()
            .with(eq(sl))
            .times(1)
            .returning(move |id| {
                Ok(Some(SousLocalite {
                    id,
                    localite_id: l,
                    name: "SL".into(),
                    created_at: Utc::now(),
                    updated_at: Utc::now(),
                }))
            });
        mock.expect_find_section().times(0);

        let mut p = principal(Role::ComitePedagogique);
        p.sous_localite_id = Some(sl);
        p.section_id = Some(Uuid::new_v4());

        assert_eq!(home_localite(&mock, &p).await.unwrap(), l);
    }

    #[tokio::test]
    async fn top_level_id_walks_up_the_tree() {
        let fx = Fixture::new();
        let store = fx.store();

        let mut section_user = principal(Role::SectionUser);
        section_user.section_id = Some(fx.sec4);
        assert_eq!(top_level_id(&store, &section_user).await.unwrap(), Some(fx.l2));

        let mut admin = principal(Role::SousLocaliteAdmin);
        admin.sous_localite_id = Some(fx.sl2);
        assert_eq!(top_level_id(&store, &admin).await.unwrap(), Some(fx.l1));

        assert_eq!(top_level_id(&store, &principal(Role::Owner)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn locate_builds_the_full_path() {
        let fx = Fixture::new();
        let store = fx.store();

        assert_eq!(locate(&store, TargetScope::Section(fx.sec1)).await.unwrap(), fx.path_sec1());
        assert_eq!(locate(&store, TargetScope::Global).await.unwrap(), ScopePath::Global);
        assert!(matches!(
            locate(&store, TargetScope::Localite(Uuid::new_v4())).await,
            Err(AppError::NotFound(_))
        ));
    }
}
