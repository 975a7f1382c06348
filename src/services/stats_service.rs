// src/services/stats_service.rs

use std::{collections::BTreeMap, sync::Arc};

use chrono::NaiveDate;

use crate::{
    access::{eligibility::effective_bracket, query::ScopeFilter},
    common::error::AppError,
    db::MemberStore,
    models::{
        member::{AgeBracket, Membre},
        scope::{RequestScope, ScopeDescriptor},
        stats::{BracketCounts, MemberStats},
    },
    services::member_service::today,
};

#[derive(Clone)]
pub struct StatsService {
    member_repo: Arc<dyn MemberStore>,
}

impl StatsService {
    pub fn new(member_repo: Arc<dyn MemberStore>) -> Self {
        Self { member_repo }
    }

    /// Contagens sobre exatamente os membros que a listagem devolveria.
    pub async fn member_stats(&self, scope: &RequestScope) -> Result<MemberStats, AppError> {
        let membres = self.member_repo.list(&ScopeFilter::for_scope(scope)).await?;
        Ok(summarize(scope.descriptor, &membres, today()))
    }
}

pub fn summarize(scope: ScopeDescriptor, membres: &[Membre], today: NaiveDate) -> MemberStats {
    let mut by_bracket = BracketCounts::default();
    let mut by_gender: BTreeMap<String, i64> = BTreeMap::new();

    for membre in membres {
        // Um nascimento inválido no banco conta como desconhecido, não derruba o relatório
        match effective_bracket(membre, today).ok().flatten() {
            Some(AgeBracket::S1) => by_bracket.s1 += 1,
            Some(AgeBracket::S2) => by_bracket.s2 += 1,
            Some(AgeBracket::S3) => by_bracket.s3 += 1,
            None => by_bracket.unknown += 1,
        }
        *by_gender.entry(membre.gender.clone()).or_default() += 1;
    }

    MemberStats {
        scope,
        total: membres.len() as i64,
        by_bracket,
        by_gender,
    }
}
