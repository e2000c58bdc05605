//! Core data model types for vialeve.
//!
//! These are the fundamental types the whole screening system uses to
//! represent patient-reported answers accumulated across the wizard steps.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A yes/no answer as reported by the patient.
///
/// Serialized with the PT-BR tokens the exported document uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum YesNo {
    #[serde(rename = "sim")]
    Yes,
    #[serde(rename = "nao")]
    No,
}

impl YesNo {
    /// Returns `true` for an affirmative answer.
    pub fn is_yes(self) -> bool {
        self == YesNo::Yes
    }
}

impl fmt::Display for YesNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YesNo::Yes => write!(f, "sim"),
            YesNo::No => write!(f, "nao"),
        }
    }
}

impl FromStr for YesNo {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sim" | "s" | "yes" | "y" => Ok(YesNo::Yes),
            "nao" | "não" | "n" | "no" => Ok(YesNo::No),
            other => Err(format!("resposta sim/não inválida: {other}")),
        }
    }
}

/// Optional gender identity, collected but never evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Identity {
    Feminine,
    Masculine,
    Undisclosed,
}

/// Self-reported organ function severity (kidneys, liver).
///
/// Serialized with the PT-BR tokens the exported document uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrganFunction {
    #[serde(rename = "normal")]
    Normal,
    #[serde(rename = "leve")]
    Mild,
    #[serde(rename = "moderada")]
    Moderate,
    #[serde(rename = "grave")]
    Severe,
    #[serde(rename = "desconhecido")]
    Unknown,
}

impl OrganFunction {
    /// Moderate and severe impairment require medical evaluation before
    /// treatment.
    pub fn needs_medical_review(self) -> bool {
        matches!(self, OrganFunction::Moderate | OrganFunction::Severe)
    }
}

impl FromStr for OrganFunction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" | "está normal" | "esta normal" => Ok(OrganFunction::Normal),
            "leve" => Ok(OrganFunction::Mild),
            "moderada" => Ok(OrganFunction::Moderate),
            "grave" => Ok(OrganFunction::Severe),
            "desconhecido" | "não sei informar" | "nao sei informar" => Ok(OrganFunction::Unknown),
            other => Err(format!("grau de função orgânica inválido: {other}")),
        }
    }
}

/// Common excipients of injectable formulations offered as allergy choices.
///
/// `NoKnownAllergy` is the explicit "no allergy" sentinel; how it interacts
/// with concrete selections is governed by `rules::ExcipientPolicy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Excipient {
    PolyethyleneGlycol,
    MetacresolPhenol,
    Phosphates,
    Latex,
    Carboxymethylcellulose,
    Tromethamine,
    NoKnownAllergy,
}

impl fmt::Display for Excipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Excipient::PolyethyleneGlycol => "Polietilenoglicol (PEG)",
            Excipient::MetacresolPhenol => "Metacresol / Fenol",
            Excipient::Phosphates => "Fosfatos (fosfato dissódico etc.)",
            Excipient::Latex => "Látex (agulhas/rolhas)",
            Excipient::Carboxymethylcellulose => "Carboximetilcelulose",
            Excipient::Tromethamine => "Trometamina (TRIS)",
            Excipient::NoKnownAllergy => "Não tenho alergia a esses componentes",
        };
        write!(f, "{label}")
    }
}

/// Weight-loss medications the patient may have used before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorMedication {
    Semaglutide,
    Tirzepatide,
    Liraglutide,
    Orlistat,
    BupropionNaltrexone,
    Other,
}

/// The patient's primary treatment goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    WeightLoss,
    ComorbidityControl,
    WeightMaintenance,
}

/// Patient-reported data accumulated incrementally across all wizard steps.
///
/// Every field is optional: a step that was never submitted leaves its
/// fields unset. Once written, a field keeps its last-written value until
/// the wizard is reset. Free-text fields are collected for clinician review
/// and are never evaluated programmatically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    // Step 1: identification
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub identity: Option<Identity>,

    // Step 2: measurements
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub height_m: Option<f64>,
    #[serde(default)]
    pub has_comorbidities: Option<YesNo>,
    #[serde(default)]
    pub comorbidities: Option<String>,

    // Step 3: conditions
    #[serde(default)]
    pub pregnancy: Option<YesNo>,
    #[serde(default)]
    pub breastfeeding: Option<YesNo>,
    #[serde(default)]
    pub cancer_treatment: Option<YesNo>,
    #[serde(default)]
    pub severe_gi_disease: Option<YesNo>,
    #[serde(default)]
    pub gastroparesis: Option<YesNo>,
    #[serde(default)]
    pub prior_pancreatitis: Option<YesNo>,
    #[serde(default)]
    pub mtc_men2_history: Option<YesNo>,
    #[serde(default)]
    pub cholecystitis_12m: Option<YesNo>,
    #[serde(default)]
    pub other_conditions: Option<String>,

    // Step 4: medications & allergies
    #[serde(default)]
    pub renal_function: Option<OrganFunction>,
    #[serde(default)]
    pub hepatic_function: Option<OrganFunction>,
    #[serde(default)]
    pub eating_disorder: Option<YesNo>,
    #[serde(default)]
    pub chronic_corticosteroid: Option<YesNo>,
    #[serde(default)]
    pub antipsychotic_use: Option<YesNo>,
    #[serde(default)]
    pub excipient_allergies: Vec<Excipient>,
    #[serde(default)]
    pub other_allergies: Option<String>,
    #[serde(default)]
    pub glp1_allergy: Option<YesNo>,

    // Step 5: history & goal
    #[serde(default)]
    pub used_weight_loss_medication: Option<YesNo>,
    #[serde(default)]
    pub prior_medications: Vec<PriorMedication>,
    #[serde(default)]
    pub side_effects: Option<String>,
    #[serde(default)]
    pub goal: Option<Goal>,
    #[serde(default)]
    pub readiness: Option<u8>,

    // Derived by the evaluator. `age_calculated` duplicates `age` so the
    // exported document carries the field under both names.
    #[serde(default)]
    pub age: Option<i32>,
    #[serde(default)]
    pub age_calculated: Option<i32>,
    #[serde(default)]
    pub bmi: Option<f64>,
}

/// The four consent acknowledgments collected on the review step.
///
/// Export of the answers is gated on all four being granted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consent {
    /// "Li e aceito o Termo de Consentimento."
    #[serde(default)]
    pub terms_accepted: bool,
    /// "Autorizo a consulta on-line (telemedicina)."
    #[serde(default)]
    pub telehealth_authorized: bool,
    /// "Autorizo o uso dos meus dados (LGPD)."
    #[serde(default)]
    pub data_use_authorized: bool,
    /// "Confirmo que as informações são verdadeiras."
    #[serde(default)]
    pub truthfulness_confirmed: bool,
}

impl Consent {
    /// All four acknowledgments granted.
    pub fn granted(&self) -> bool {
        self.terms_accepted
            && self.telehealth_authorized
            && self.data_use_authorized
            && self.truthfulness_confirmed
    }
}
