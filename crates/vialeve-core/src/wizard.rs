//! Wizard state machine.
//!
//! Six ordered steps with linear forward/back navigation. State is owned by
//! the single active session and mutated only through the explicit
//! transition functions here; the rendering layer redraws from the state it
//! gets back, never from side effects.

use chrono::NaiveDate;
use thiserror::Error;

use crate::error::ValidationError;
use crate::forms::{
    ConditionsForm, ConsentForm, HistoryGoalForm, IdentificationForm, MeasurementsForm,
    MedicationsForm,
};
use crate::model::{AnswerRecord, Consent};
use crate::rules::{evaluate, EligibilityResult, RuleConfig};

/// The six wizard steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Step {
    Identification,
    Measurements,
    Conditions,
    MedicationsAllergies,
    HistoryGoal,
    Review,
}

impl Step {
    pub const ALL: [Step; 6] = [
        Step::Identification,
        Step::Measurements,
        Step::Conditions,
        Step::MedicationsAllergies,
        Step::HistoryGoal,
        Step::Review,
    ];

    /// Zero-based position, 0–5.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Breadcrumb title shown to the patient.
    pub fn title(self) -> &'static str {
        match self {
            Step::Identification => "Sobre você",
            Step::Measurements => "Sua saúde",
            Step::Conditions => "Condições importantes",
            Step::MedicationsAllergies => "Medicações & alergias",
            Step::HistoryGoal => "Histórico & objetivo",
            Step::Review => "Revisar & confirmar",
        }
    }

    fn next(self) -> Step {
        Step::ALL[(self.index() + 1).min(Step::ALL.len() - 1)]
    }

    fn prev(self) -> Step {
        Step::ALL[self.index().saturating_sub(1)]
    }
}

/// Errors surfaced by a step submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The submitted form does not belong to the current step.
    #[error("formulário da etapa '{submitted}' enviado na etapa '{current}'")]
    StepMismatch {
        current: &'static str,
        submitted: &'static str,
    },
}

/// A submission for whichever step the wizard is on.
#[derive(Debug, Clone)]
pub enum StepForm {
    Identification(IdentificationForm),
    Measurements(MeasurementsForm),
    Conditions(ConditionsForm),
    Medications(MedicationsForm),
    HistoryGoal(HistoryGoalForm),
    Consent(ConsentForm),
}

impl StepForm {
    fn step(&self) -> Step {
        match self {
            StepForm::Identification(_) => Step::Identification,
            StepForm::Measurements(_) => Step::Measurements,
            StepForm::Conditions(_) => Step::Conditions,
            StepForm::Medications(_) => Step::MedicationsAllergies,
            StepForm::HistoryGoal(_) => Step::HistoryGoal,
            StepForm::Consent(_) => Step::Review,
        }
    }
}

/// The whole session state: current step, accumulated answers, the stored
/// eligibility result, and consent flags.
#[derive(Debug, Clone)]
pub struct WizardState {
    step: Step,
    pub answers: AnswerRecord,
    pub eligibility: Option<EligibilityResult>,
    pub consent: Consent,
    rule_config: RuleConfig,
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new(RuleConfig::default())
    }
}

impl WizardState {
    /// Fresh session at the first step with empty answers.
    pub fn new(rule_config: RuleConfig) -> Self {
        Self {
            step: Step::Identification,
            answers: AnswerRecord::default(),
            eligibility: None,
            consent: Consent::default(),
            rule_config,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    /// Move forward one step, clamped at the review step. Navigation alone
    /// never validates or merges anything.
    pub fn advance(&mut self) {
        self.step = self.step.next();
    }

    /// Move back one step, clamped at the first.
    pub fn retreat(&mut self) {
        self.step = self.step.prev();
    }

    /// Wipe the session: back to the first step, empty answers, no stored
    /// result, consent cleared. Available from any step.
    pub fn reset(&mut self) {
        tracing::debug!(from = self.step.title(), "wizard reset");
        *self = Self::new(self.rule_config.clone());
    }

    /// Submit the current step's form.
    ///
    /// Merges into the answers only when validation passes; on failure the
    /// wizard stays on the current step and the error is returned for
    /// inline display. Submitting the history step evaluates the rules and
    /// stores the result before the state enters review, so review always
    /// renders a stored result. The consent form updates the flags without
    /// navigating.
    pub fn submit(
        &mut self,
        form: &StepForm,
        reference_date: NaiveDate,
    ) -> Result<(), WizardError> {
        if form.step() != self.step {
            return Err(WizardError::StepMismatch {
                current: self.step.title(),
                submitted: form.step().title(),
            });
        }

        match form {
            StepForm::Identification(form) => {
                form.apply(&mut self.answers, reference_date)?;
                self.advance();
            }
            StepForm::Measurements(form) => {
                form.apply(&mut self.answers);
                self.advance();
            }
            StepForm::Conditions(form) => {
                form.apply(&mut self.answers);
                self.advance();
            }
            StepForm::Medications(form) => {
                form.apply(&mut self.answers);
                self.advance();
            }
            StepForm::HistoryGoal(form) => {
                form.apply(&mut self.answers);
                self.eligibility =
                    Some(evaluate(&mut self.answers, reference_date, &self.rule_config));
                self.advance();
            }
            StepForm::Consent(form) => {
                form.apply(&mut self.consent);
            }
        }

        tracing::debug!(step = self.step.title(), "step submitted");
        Ok(())
    }

    /// Whether the answers document may be exported: all four consent
    /// acknowledgments granted.
    pub fn export_available(&self) -> bool {
        self.consent.granted()
    }
}
