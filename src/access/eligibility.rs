// src/access/eligibility.rs

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::{
    common::error::AppError,
    models::{
        bureau::GroupDescriptor,
        member::{AgeBracket, Membre},
        scope::ScopePath,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Eligibility {
    Eligible,
    IneligibleMember,
    OutOfScope,
}

impl Eligibility {
    /// Converte a recusa no erro tipado que o handler devolve.
    pub fn into_result(self) -> Result<(), AppError> {
        match self {
            Eligibility::Eligible => Ok(()),
            Eligibility::IneligibleMember => Err(AppError::IneligibleMember(
                "A faixa etária do membro não corresponde ao grupo do cargo.".into(),
            )),
            Eligibility::OutOfScope => Err(AppError::OutOfScope(
                "A section do membro não pertence ao escopo do cargo.".into(),
            )),
        }
    }
}

/// Idade em anos completos em `today`.
///
/// Se o mês/dia de hoje ainda não chegou ao do aniversário, desconta um ano.
/// Data de nascimento no futuro é entrada inválida (não vira zero).
pub fn age_on(birth_date: NaiveDate, today: NaiveDate) -> Result<u32, AppError> {
    let mut years = today.year() - birth_date.year();
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        years -= 1;
    }

    u32::try_from(years).map_err(|_| {
        AppError::InvalidInput(format!(
            "Data de nascimento {} posterior a {}.",
            birth_date, today
        ))
    })
}

/// A faixa efetiva: etiqueta explícita válida, senão a calculada pela data.
/// `None` quando não há nenhuma das duas.
pub fn effective_bracket(member: &Membre, today: NaiveDate) -> Result<Option<AgeBracket>, AppError> {
    if let Some(tag) = member.explicit_bracket() {
        return Ok(Some(tag));
    }

    match member.birth_date {
        Some(birth_date) => Ok(Some(AgeBracket::from_age(age_on(birth_date, today)?))),
        None => Ok(None),
    }
}

/// Decide se o membro pode ocupar um cargo do grupo.
///
/// A faixa é verificada primeiro; depois a section do membro precisa estar
/// contida no escopo do grupo (mesma relação usada na visibilidade).
pub fn classify(
    bracket: Option<AgeBracket>,
    member_path: &ScopePath,
    group: &GroupDescriptor,
) -> Eligibility {
    match bracket {
        Some(b) if group.age_group.admits(b) => {}
        _ => return Eligibility::IneligibleMember,
    }

    if !group.scope.contains(member_path) {
        return Eligibility::OutOfScope;
    }

    Eligibility::Eligible
}
