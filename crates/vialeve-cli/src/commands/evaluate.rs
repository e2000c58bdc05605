//! The `vialeve evaluate` command.

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;

use vialeve_core::rules::{evaluate, EligibilityResult};
use vialeve_report::{render_summary, ScreeningRecord};

use crate::config::load_config_from;

pub fn execute(
    answers_path: PathBuf,
    reference_date: Option<NaiveDate>,
    format: String,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let mut record = ScreeningRecord::load_json(&answers_path)?;

    let reference = reference_date.unwrap_or_else(|| chrono::Local::now().date_naive());
    tracing::info!(record_id = %record.id, %reference, "evaluating record");
    let result = evaluate(&mut record.answers, reference, &config.rules);
    record.eligibility = Some(result.clone());

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&result)?),
        "text" => {
            print_result_table(&record, &result);
            println!(
                "\n{}",
                render_summary(&result, config.scheduling_url.as_deref())
            );
        }
        other => anyhow::bail!("unknown format: {other}"),
    }

    if let Some(path) = output {
        record.save_json(&path)?;
        println!("Registro atualizado salvo em {}", path.display());
    }

    Ok(())
}

fn print_result_table(record: &ScreeningRecord, result: &EligibilityResult) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Status", "Idade", "IMC", "Motivos"]);

    let status = if result.is_excluded() {
        "excluído"
    } else {
        "potencialmente elegível"
    };
    table.add_row(vec![
        Cell::new(status),
        Cell::new(
            record
                .answers
                .age
                .map(|a| a.to_string())
                .unwrap_or_else(|| "—".into()),
        ),
        Cell::new(
            record
                .answers
                .bmi
                .map(|b| format!("{b:.1}"))
                .unwrap_or_else(|| "—".into()),
        ),
        Cell::new(result.reasons.len()),
    ]);

    println!("{table}");
}
