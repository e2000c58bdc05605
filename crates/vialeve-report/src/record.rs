//! Screening record envelope with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use vialeve_core::model::{AnswerRecord, Consent};
use vialeve_core::rules::EligibilityResult;
use vialeve_core::wizard::WizardState;

/// One complete screening session: the accumulated answers, the stored
/// eligibility result, and the consent flags, stamped for traceability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningRecord {
    /// Unique record identifier.
    pub id: Uuid,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// The patient's answers.
    pub answers: AnswerRecord,
    /// Stored result, present once the data-entry steps were completed.
    #[serde(default)]
    pub eligibility: Option<EligibilityResult>,
    /// The four consent acknowledgments.
    #[serde(default)]
    pub consent: Consent,
}

impl ScreeningRecord {
    /// Snapshot a wizard session into a persistable record.
    pub fn from_state(state: &WizardState) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            answers: state.answers.clone(),
            eligibility: state.eligibility.clone(),
            consent: state.consent,
        }
    }

    /// Save the record as pretty JSON.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize record")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write record to {}", path.display()))?;
        Ok(())
    }

    /// Load a record from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read record from {}", path.display()))?;
        let record: ScreeningRecord =
            serde_json::from_str(&content).context("failed to parse record JSON")?;
        Ok(record)
    }
}

/// Write the answers document the patient may download.
///
/// Gated on consent: refuses unless all four acknowledgments are granted.
/// The artifact is the answers alone, not the envelope.
pub fn export_answers(record: &ScreeningRecord, path: &Path) -> Result<()> {
    anyhow::ensure!(
        record.consent.granted(),
        "exportação requer as quatro autorizações de consentimento"
    );
    let json =
        serde_json::to_string_pretty(&record.answers).context("failed to serialize answers")?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, json)
        .with_context(|| format!("failed to write answers to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vialeve_core::model::YesNo;

    fn record_with_consent(granted: bool) -> ScreeningRecord {
        ScreeningRecord {
            id: Uuid::nil(),
            created_at: Utc::now(),
            answers: AnswerRecord {
                full_name: Some("Maria da Silva".into()),
                pregnancy: Some(YesNo::No),
                ..Default::default()
            },
            eligibility: None,
            consent: Consent {
                terms_accepted: granted,
                telehealth_authorized: granted,
                data_use_authorized: granted,
                truthfulness_confirmed: granted,
            },
        }
    }

    #[test]
    fn json_roundtrip() {
        let record = record_with_consent(false);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("record.json");

        record.save_json(&path).unwrap();
        let loaded = ScreeningRecord::load_json(&path).unwrap();

        assert_eq!(loaded.id, record.id);
        assert_eq!(loaded.answers, record.answers);
    }

    #[test]
    fn export_refused_without_full_consent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answers.json");

        let record = record_with_consent(false);
        assert!(export_answers(&record, &path).is_err());
        assert!(!path.exists());

        let mut partial = record_with_consent(true);
        partial.consent.truthfulness_confirmed = false;
        assert!(export_answers(&partial, &path).is_err());
    }

    #[test]
    fn export_writes_answers_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answers.json");

        let record = record_with_consent(true);
        export_answers(&record, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let answers: AnswerRecord = serde_json::from_str(&content).unwrap();
        assert_eq!(answers.full_name.as_deref(), Some("Maria da Silva"));
    }

    #[test]
    fn from_state_snapshots_the_session() {
        let state = WizardState::default();
        let record = ScreeningRecord::from_state(&state);
        assert_eq!(record.answers, AnswerRecord::default());
        assert!(record.eligibility.is_none());
        assert!(!record.consent.granted());
    }
}
