//! The `vialeve export` command.

use std::path::PathBuf;

use anyhow::Result;

use vialeve_report::{export_answers, ScreeningRecord};

pub fn execute(answers_path: PathBuf, output: PathBuf) -> Result<()> {
    let record = ScreeningRecord::load_json(&answers_path)?;

    if !record.consent.granted() {
        anyhow::bail!(
            "exportação indisponível: as quatro autorizações de consentimento são necessárias"
        );
    }

    export_answers(&record, &output)?;
    tracing::info!(record_id = %record.id, path = %output.display(), "answers exported");
    println!("Respostas exportadas para {}", output.display());
    Ok(())
}
