//! The `vialeve validate` command.
//!
//! Reports identification problems in a saved record without failing it;
//! the record stays editable and re-checkable.

use std::path::PathBuf;

use anyhow::Result;

use vialeve_core::error::ValidationError;
use vialeve_report::ScreeningRecord;

pub fn execute(answers_path: PathBuf) -> Result<()> {
    let record = ScreeningRecord::load_json(&answers_path)?;
    let today = chrono::Local::now().date_naive();

    let mut warnings: Vec<ValidationError> = Vec::new();

    match record.answers.full_name.as_deref() {
        Some(name) if !name.trim().is_empty() => {}
        _ => warnings.push(ValidationError::MissingField("nome completo")),
    }
    match record.answers.email.as_deref() {
        Some(email) if email.trim().is_empty() => {
            warnings.push(ValidationError::MissingField("e-mail"))
        }
        Some(email) if !email.contains('@') => warnings.push(ValidationError::InvalidEmail),
        Some(_) => {}
        None => warnings.push(ValidationError::MissingField("e-mail")),
    }
    match record.answers.birth_date {
        Some(birth) if birth > today => warnings.push(ValidationError::FutureBirthDate),
        Some(_) => {}
        None => warnings.push(ValidationError::MissingField("data de nascimento")),
    }

    println!(
        "Registro {} ({})",
        record.id,
        record.created_at.format("%Y-%m-%d %H:%M UTC")
    );
    for w in &warnings {
        println!("  WARNING: {w}");
    }

    if warnings.is_empty() {
        println!("Registro válido.");
    } else {
        println!("\n{} problema(s) encontrado(s).", warnings.len());
    }

    Ok(())
}
