//! Eligibility rule engine.
//!
//! `evaluate` maps an accumulated [`AnswerRecord`] to a classification plus
//! an ordered list of human-readable exclusion reasons. It is deterministic:
//! identical answers always produce identical results. Its only side effect
//! is writing the derived `age`, `age_calculated`, and `bmi` fields back into
//! the record.
//!
//! Derivation failures never abort an evaluation: a missing or unusable
//! birth date or weight/height pair simply skips the dependent predicate and
//! the remaining rules still run.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::model::{AnswerRecord, Excipient, YesNo};

/// Patients with a BMI below this need relevant comorbidities to qualify.
pub const BMI_THRESHOLD: f64 = 27.0;

/// Minimum age for the treatment program.
pub const MINIMUM_AGE: i32 = 18;

/// How the excipient-allergy multi-select is turned into an exclusion.
///
/// The two observed questionnaire variants disagree on whether an explicit
/// "no allergy" sentinel option is offered, so the trigger is an explicit
/// configuration choice rather than an implicit one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExcipientPolicy {
    /// The sentinel is offered: exclude iff the selection is non-empty and
    /// is not exactly the sentinel alone.
    #[default]
    SentinelAware,
    /// No sentinel offered: any non-empty selection excludes.
    AnyReported,
}

/// Tunable rule-engine settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    #[serde(default)]
    pub excipient_policy: ExcipientPolicy,
}

/// Outcome classification of a screening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityStatus {
    PotentiallyEligible,
    Excluded,
}

/// One disqualifying predicate that held for the record.
///
/// The `Display` form is the fixed patient-facing message; serialization
/// uses the same string so exported documents read naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusionReason {
    UnderMinimumAge,
    Pregnancy,
    Breastfeeding,
    ActiveCancerTreatment,
    PriorPancreatitis,
    MtcMen2History,
    Glp1Hypersensitivity,
    ExcipientAllergy,
    SevereGiDisease,
    Gastroparesis,
    RecentCholecystitis,
    RenalImpairment,
    HepaticImpairment,
    EatingDisorder,
    ChronicCorticosteroid,
    AntipsychoticUse,
    LowBmiWithoutComorbidities,
}

impl ExclusionReason {
    /// The fixed patient-facing message for this reason.
    pub fn message(self) -> &'static str {
        match self {
            ExclusionReason::UnderMinimumAge => "Menor de 18 anos.",
            ExclusionReason::Pregnancy => "Gestação em curso.",
            ExclusionReason::Breastfeeding => "Amamentação em curso.",
            ExclusionReason::ActiveCancerTreatment => "Tratamento oncológico ativo.",
            ExclusionReason::PriorPancreatitis => "História de pancreatite prévia.",
            ExclusionReason::MtcMen2History => {
                "História pessoal/familiar de carcinoma medular de tireoide (MTC) ou MEN2."
            }
            ExclusionReason::Glp1Hypersensitivity => {
                "Hipersensibilidade conhecida a análogos de GLP-1."
            }
            ExclusionReason::ExcipientAllergy => {
                "Alergia relatada a excipientes comuns de formulações injetáveis (ver detalhes)."
            }
            ExclusionReason::SevereGiDisease => "Doença gastrointestinal grave ativa.",
            ExclusionReason::Gastroparesis => "Gastroparesia diagnosticada.",
            ExclusionReason::RecentCholecystitis => {
                "Colecistite/colelitíase sintomática nos últimos 12 meses."
            }
            ExclusionReason::RenalImpairment => {
                "Insuficiência renal moderada/grave (necessita avaliação médica)."
            }
            ExclusionReason::HepaticImpairment => {
                "Insuficiência hepática moderada/grave (necessita avaliação médica)."
            }
            ExclusionReason::EatingDisorder => "Transtorno alimentar ativo.",
            ExclusionReason::ChronicCorticosteroid => "Uso crônico de corticoide (requer avaliação).",
            ExclusionReason::AntipsychoticUse => "Uso de antipsicóticos (requer avaliação).",
            ExclusionReason::LowBmiWithoutComorbidities => "IMC < 27 sem comorbidades relevantes.",
        }
    }

    const ALL: [ExclusionReason; 17] = [
        ExclusionReason::UnderMinimumAge,
        ExclusionReason::Pregnancy,
        ExclusionReason::Breastfeeding,
        ExclusionReason::ActiveCancerTreatment,
        ExclusionReason::PriorPancreatitis,
        ExclusionReason::MtcMen2History,
        ExclusionReason::Glp1Hypersensitivity,
        ExclusionReason::ExcipientAllergy,
        ExclusionReason::SevereGiDisease,
        ExclusionReason::Gastroparesis,
        ExclusionReason::RecentCholecystitis,
        ExclusionReason::RenalImpairment,
        ExclusionReason::HepaticImpairment,
        ExclusionReason::EatingDisorder,
        ExclusionReason::ChronicCorticosteroid,
        ExclusionReason::AntipsychoticUse,
        ExclusionReason::LowBmiWithoutComorbidities,
    ];
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl FromStr for ExclusionReason {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExclusionReason::ALL
            .into_iter()
            .find(|r| r.message() == s)
            .ok_or_else(|| format!("motivo de exclusão desconhecido: {s}"))
    }
}

impl Serialize for ExclusionReason {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ExclusionReason {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// The result of evaluating a record: classification plus the reasons that
/// led to it, in rule order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityResult {
    pub status: EligibilityStatus,
    #[serde(default)]
    pub reasons: Vec<ExclusionReason>,
}

impl EligibilityResult {
    pub fn is_excluded(&self) -> bool {
        self.status == EligibilityStatus::Excluded
    }

    /// The patient-facing messages, in rule order.
    pub fn messages(&self) -> Vec<&'static str> {
        self.reasons.iter().map(|r| r.message()).collect()
    }
}

/// Completed age at `reference`, by calendar convention: one less than the
/// year difference when the birthday has not yet occurred that year.
pub fn age_on(birth: NaiveDate, reference: NaiveDate) -> i32 {
    let before_birthday = (reference.month(), reference.day()) < (birth.month(), birth.day());
    reference.year() - birth.year() - i32::from(before_birthday)
}

/// BMI from weight (kg) and height (m), when computable.
pub fn body_mass_index(weight_kg: f64, height_m: f64) -> Option<f64> {
    if height_m <= 0.0 {
        return None;
    }
    let bmi = weight_kg / (height_m * height_m);
    bmi.is_finite().then_some(bmi)
}

/// Evaluate the eligibility rules over an answer record.
///
/// Writes the derived `age`, `age_calculated`, and `bmi` fields into the
/// record, then walks the
/// exclusion predicates in their fixed order. `reference_date` is normally
/// today; it is a parameter so evaluations are reproducible in tests and
/// batch runs.
pub fn evaluate(
    answers: &mut AnswerRecord,
    reference_date: NaiveDate,
    config: &RuleConfig,
) -> EligibilityResult {
    if let Some(birth) = answers.birth_date {
        let age = age_on(birth, reference_date);
        answers.age = Some(age);
        answers.age_calculated = Some(age);
    }

    let mut reasons = Vec::new();
    let yes = |field: Option<YesNo>| field.is_some_and(YesNo::is_yes);

    if answers.age.is_some_and(|age| age < MINIMUM_AGE) {
        reasons.push(ExclusionReason::UnderMinimumAge);
    }
    if yes(answers.pregnancy) {
        reasons.push(ExclusionReason::Pregnancy);
    }
    if yes(answers.breastfeeding) {
        reasons.push(ExclusionReason::Breastfeeding);
    }
    if yes(answers.cancer_treatment) {
        reasons.push(ExclusionReason::ActiveCancerTreatment);
    }
    if yes(answers.prior_pancreatitis) {
        reasons.push(ExclusionReason::PriorPancreatitis);
    }
    if yes(answers.mtc_men2_history) {
        reasons.push(ExclusionReason::MtcMen2History);
    }
    if yes(answers.glp1_allergy) {
        reasons.push(ExclusionReason::Glp1Hypersensitivity);
    }
    if excipient_allergy_reported(&answers.excipient_allergies, config.excipient_policy) {
        reasons.push(ExclusionReason::ExcipientAllergy);
    }
    if yes(answers.severe_gi_disease) {
        reasons.push(ExclusionReason::SevereGiDisease);
    }
    if yes(answers.gastroparesis) {
        reasons.push(ExclusionReason::Gastroparesis);
    }
    if yes(answers.cholecystitis_12m) {
        reasons.push(ExclusionReason::RecentCholecystitis);
    }
    if answers
        .renal_function
        .is_some_and(|f| f.needs_medical_review())
    {
        reasons.push(ExclusionReason::RenalImpairment);
    }
    if answers
        .hepatic_function
        .is_some_and(|f| f.needs_medical_review())
    {
        reasons.push(ExclusionReason::HepaticImpairment);
    }
    if yes(answers.eating_disorder) {
        reasons.push(ExclusionReason::EatingDisorder);
    }
    if yes(answers.chronic_corticosteroid) {
        reasons.push(ExclusionReason::ChronicCorticosteroid);
    }
    if yes(answers.antipsychotic_use) {
        reasons.push(ExclusionReason::AntipsychoticUse);
    }

    // The threshold compares the exact value; only the stored copy is
    // rounded for display.
    let bmi = match (answers.weight_kg, answers.height_m) {
        (Some(weight), Some(height)) => body_mass_index(weight, height),
        _ => None,
    };
    if let Some(bmi) = bmi {
        answers.bmi = Some((bmi * 10.0).round() / 10.0);
        if bmi < BMI_THRESHOLD && answers.has_comorbidities == Some(YesNo::No) {
            reasons.push(ExclusionReason::LowBmiWithoutComorbidities);
        }
    }

    let status = if reasons.is_empty() {
        EligibilityStatus::PotentiallyEligible
    } else {
        EligibilityStatus::Excluded
    };

    tracing::debug!(
        ?status,
        reason_count = reasons.len(),
        age = ?answers.age,
        bmi = ?answers.bmi,
        "eligibility evaluated"
    );

    EligibilityResult { status, reasons }
}

fn excipient_allergy_reported(selection: &[Excipient], policy: ExcipientPolicy) -> bool {
    match policy {
        ExcipientPolicy::SentinelAware => {
            !selection.is_empty() && selection != [Excipient::NoKnownAllergy]
        }
        ExcipientPolicy::AnyReported => !selection.is_empty(),
    }
}
