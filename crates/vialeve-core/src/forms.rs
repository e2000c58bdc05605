//! Per-step forms and their validation.
//!
//! Each wizard step collects its fields into a form struct; `apply` merges
//! the submitted values into the [`AnswerRecord`] only when validation
//! passes. Only the identification step has hard requirements; the other
//! steps merge whatever was answered.
//!
//! Measurements arrive as raw text and are parsed leniently: a value that
//! does not parse (or falls outside the plausible range the questionnaire
//! offers) is simply not written, leaving any previously stored value
//! intact. That mirrors the fail-open handling of derived fields.

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::model::{
    AnswerRecord, Consent, Excipient, Goal, Identity, OrganFunction, PriorMedication, YesNo,
};

/// Plausible weight range offered by the questionnaire, in kg.
const WEIGHT_RANGE_KG: std::ops::RangeInclusive<f64> = 30.0..=400.0;
/// Plausible height range offered by the questionnaire, in meters.
const HEIGHT_RANGE_M: std::ops::RangeInclusive<f64> = 1.30..=2.20;

/// Step 1: who the patient is.
#[derive(Debug, Clone, Default)]
pub struct IdentificationForm {
    pub full_name: String,
    pub email: String,
    /// Birth date as entered, ISO `YYYY-MM-DD`.
    pub birth_date: String,
    pub identity: Option<Identity>,
}

impl IdentificationForm {
    /// Validate the required fields and merge into the record.
    ///
    /// `reference_date` (normally today) bounds the birth date: a date in
    /// the future is rejected.
    pub fn apply(
        &self,
        answers: &mut AnswerRecord,
        reference_date: NaiveDate,
    ) -> Result<(), ValidationError> {
        let full_name = self.full_name.trim();
        if full_name.is_empty() {
            return Err(ValidationError::MissingField("nome completo"));
        }
        let email = self.email.trim();
        if email.is_empty() {
            return Err(ValidationError::MissingField("e-mail"));
        }
        if !email.contains('@') {
            return Err(ValidationError::InvalidEmail);
        }
        let birth = NaiveDate::parse_from_str(self.birth_date.trim(), "%Y-%m-%d")
            .map_err(|_| ValidationError::InvalidDate)?;
        if birth > reference_date {
            return Err(ValidationError::FutureBirthDate);
        }

        answers.full_name = Some(full_name.to_string());
        answers.email = Some(email.to_string());
        answers.birth_date = Some(birth);
        if self.identity.is_some() {
            answers.identity = self.identity;
        }
        Ok(())
    }
}

/// Step 2: measurements and current health.
#[derive(Debug, Clone, Default)]
pub struct MeasurementsForm {
    /// Weight in kg as entered ("90", "92.5", "92,5").
    pub weight_kg: String,
    /// Height in meters as entered ("1.70", "1,70").
    pub height_m: String,
    pub has_comorbidities: Option<YesNo>,
    pub comorbidities: Option<String>,
}

impl MeasurementsForm {
    pub fn apply(&self, answers: &mut AnswerRecord) {
        if let Some(weight) = parse_measurement(&self.weight_kg, WEIGHT_RANGE_KG) {
            answers.weight_kg = Some(weight);
        }
        if let Some(height) = parse_measurement(&self.height_m, HEIGHT_RANGE_M) {
            answers.height_m = Some(height);
        }
        if self.has_comorbidities.is_some() {
            answers.has_comorbidities = self.has_comorbidities;
        }
        merge_text(&mut answers.comorbidities, &self.comorbidities);
    }
}

/// Step 3: disqualifying clinical conditions.
#[derive(Debug, Clone, Default)]
pub struct ConditionsForm {
    pub pregnancy: Option<YesNo>,
    pub breastfeeding: Option<YesNo>,
    pub cancer_treatment: Option<YesNo>,
    pub severe_gi_disease: Option<YesNo>,
    pub gastroparesis: Option<YesNo>,
    pub prior_pancreatitis: Option<YesNo>,
    pub mtc_men2_history: Option<YesNo>,
    pub cholecystitis_12m: Option<YesNo>,
    pub other_conditions: Option<String>,
}

impl ConditionsForm {
    pub fn apply(&self, answers: &mut AnswerRecord) {
        merge_flag(&mut answers.pregnancy, self.pregnancy);
        merge_flag(&mut answers.breastfeeding, self.breastfeeding);
        merge_flag(&mut answers.cancer_treatment, self.cancer_treatment);
        merge_flag(&mut answers.severe_gi_disease, self.severe_gi_disease);
        merge_flag(&mut answers.gastroparesis, self.gastroparesis);
        merge_flag(&mut answers.prior_pancreatitis, self.prior_pancreatitis);
        merge_flag(&mut answers.mtc_men2_history, self.mtc_men2_history);
        merge_flag(&mut answers.cholecystitis_12m, self.cholecystitis_12m);
        merge_text(&mut answers.other_conditions, &self.other_conditions);
    }
}

/// Step 4: medications and allergies.
#[derive(Debug, Clone, Default)]
pub struct MedicationsForm {
    pub renal_function: Option<OrganFunction>,
    pub hepatic_function: Option<OrganFunction>,
    pub eating_disorder: Option<YesNo>,
    pub chronic_corticosteroid: Option<YesNo>,
    pub antipsychotic_use: Option<YesNo>,
    /// Multi-select; `None` leaves the stored selection untouched.
    pub excipient_allergies: Option<Vec<Excipient>>,
    pub other_allergies: Option<String>,
    pub glp1_allergy: Option<YesNo>,
}

impl MedicationsForm {
    pub fn apply(&self, answers: &mut AnswerRecord) {
        if self.renal_function.is_some() {
            answers.renal_function = self.renal_function;
        }
        if self.hepatic_function.is_some() {
            answers.hepatic_function = self.hepatic_function;
        }
        merge_flag(&mut answers.eating_disorder, self.eating_disorder);
        merge_flag(
            &mut answers.chronic_corticosteroid,
            self.chronic_corticosteroid,
        );
        merge_flag(&mut answers.antipsychotic_use, self.antipsychotic_use);
        if let Some(selection) = &self.excipient_allergies {
            answers.excipient_allergies = normalize_excipients(selection);
        }
        merge_text(&mut answers.other_allergies, &self.other_allergies);
        merge_flag(&mut answers.glp1_allergy, self.glp1_allergy);
    }
}

/// Step 5: treatment history and goal.
#[derive(Debug, Clone, Default)]
pub struct HistoryGoalForm {
    pub used_weight_loss_medication: Option<YesNo>,
    pub prior_medications: Option<Vec<PriorMedication>>,
    pub side_effects: Option<String>,
    pub goal: Option<Goal>,
    /// Readiness for lifestyle change on a 0–10 scale; clamped.
    pub readiness: Option<u8>,
}

impl HistoryGoalForm {
    pub fn apply(&self, answers: &mut AnswerRecord) {
        merge_flag(
            &mut answers.used_weight_loss_medication,
            self.used_weight_loss_medication,
        );
        if let Some(medications) = &self.prior_medications {
            answers.prior_medications = medications.clone();
        }
        merge_text(&mut answers.side_effects, &self.side_effects);
        if self.goal.is_some() {
            answers.goal = self.goal;
        }
        if let Some(readiness) = self.readiness {
            answers.readiness = Some(readiness.min(10));
        }
    }
}

/// Step 6: the four consent acknowledgments.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsentForm {
    pub terms_accepted: bool,
    pub telehealth_authorized: bool,
    pub data_use_authorized: bool,
    pub truthfulness_confirmed: bool,
}

impl ConsentForm {
    pub fn apply(&self, consent: &mut Consent) {
        consent.terms_accepted = self.terms_accepted;
        consent.telehealth_authorized = self.telehealth_authorized;
        consent.data_use_authorized = self.data_use_authorized;
        consent.truthfulness_confirmed = self.truthfulness_confirmed;
    }
}

/// Lenient numeric parse accepting both decimal separators; out-of-range or
/// unparseable input yields `None`.
fn parse_measurement(raw: &str, range: std::ops::RangeInclusive<f64>) -> Option<f64> {
    let value: f64 = raw.trim().replace(',', ".").parse().ok()?;
    range.contains(&value).then_some(value)
}

fn merge_flag(slot: &mut Option<YesNo>, submitted: Option<YesNo>) {
    if submitted.is_some() {
        *slot = submitted;
    }
}

/// Free text is stored only when non-blank; an untouched field never erases
/// a previously written answer.
fn merge_text(slot: &mut Option<String>, submitted: &Option<String>) {
    if let Some(text) = submitted {
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            *slot = Some(trimmed.to_string());
        }
    }
}

/// "No allergy" contradicts any concrete selection; when both are picked
/// the sentinel wins and the selection collapses to it alone.
fn normalize_excipients(selection: &[Excipient]) -> Vec<Excipient> {
    if selection.len() > 1 && selection.contains(&Excipient::NoKnownAllergy) {
        vec![Excipient::NoKnownAllergy]
    } else {
        selection.to_vec()
    }
}
