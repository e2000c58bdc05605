//! The `vialeve init` command.

use anyhow::Result;
use chrono::Utc;
use uuid::Uuid;

use vialeve_core::model::{AnswerRecord, YesNo};
use vialeve_report::ScreeningRecord;

pub fn execute() -> Result<()> {
    // Create vialeve.toml
    if std::path::Path::new("vialeve.toml").exists() {
        println!("vialeve.toml already exists, skipping.");
    } else {
        std::fs::write("vialeve.toml", SAMPLE_CONFIG)?;
        println!("Created vialeve.toml");
    }

    // Create a screening record template
    let template_path = std::path::Path::new("vialeve-triagem.json");
    if template_path.exists() {
        println!("vialeve-triagem.json already exists, skipping.");
    } else {
        let record = ScreeningRecord {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            answers: AnswerRecord {
                full_name: Some("Maria da Silva".into()),
                email: Some("maria@exemplo.com".into()),
                birth_date: chrono::NaiveDate::from_ymd_opt(1985, 6, 1),
                weight_kg: Some(90.0),
                height_m: Some(1.70),
                has_comorbidities: Some(YesNo::No),
                ..Default::default()
            },
            eligibility: None,
            consent: Default::default(),
        };
        record.save_json(template_path)?;
        println!("Created vialeve-triagem.json");
    }

    println!("\nNext steps:");
    println!("  1. Edit vialeve.toml with your scheduling link (or set VIALEVE_SCHED_URL)");
    println!("  2. Run: vialeve screen");
    println!("  3. Or batch: vialeve evaluate --answers vialeve-triagem.json");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# vialeve configuration

# External scheduling link offered to eligible patients.
# Leave commented to disable the scheduling affordance.
# scheduling_url = "https://agenda.exemplo.com"

[rules]
# How the excipient-allergy multi-select excludes:
#   "sentinel_aware": the "no allergy" option is offered; exclusion only
#                      when a concrete excipient is selected
#   "any_reported":   any non-empty selection excludes
excipient_policy = "sentinel_aware"
"#;
