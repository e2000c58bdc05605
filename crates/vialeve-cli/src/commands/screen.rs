//! The `vialeve screen` command: the interactive wizard.
//!
//! Drives a [`WizardState`] through the six steps over any `BufRead`/`Write`
//! pair, so the whole session is scriptable in tests. Each step prints its
//! breadcrumb, collects the fields, and submits; a failed validation keeps
//! the wizard on the step and re-runs it.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};

use vialeve_core::forms::{
    ConditionsForm, ConsentForm, HistoryGoalForm, IdentificationForm, MeasurementsForm,
    MedicationsForm,
};
use vialeve_core::model::{Excipient, Goal, Identity, OrganFunction, PriorMedication, YesNo};
use vialeve_core::wizard::{Step, StepForm, WizardState};
use vialeve_report::{export_answers, render_summary, ScreeningRecord};

use crate::config::{load_config_from, VialeveConfig};

const EXCIPIENT_CHOICES: [Excipient; 7] = [
    Excipient::PolyethyleneGlycol,
    Excipient::MetacresolPhenol,
    Excipient::Phosphates,
    Excipient::Latex,
    Excipient::Carboxymethylcellulose,
    Excipient::Tromethamine,
    Excipient::NoKnownAllergy,
];

const MEDICATION_CHOICES: [(PriorMedication, &str); 6] = [
    (PriorMedication::Semaglutide, "Semaglutida"),
    (PriorMedication::Tirzepatide, "Tirzepatida"),
    (PriorMedication::Liraglutide, "Liraglutida"),
    (PriorMedication::Orlistat, "Orlistate"),
    (PriorMedication::BupropionNaltrexone, "Bupropiona/Naltrexona"),
    (PriorMedication::Other, "Outros"),
];

pub fn execute(config_path: Option<PathBuf>, output: PathBuf) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run_session(
        &mut stdin.lock(),
        &mut stdout.lock(),
        config,
        &output,
        chrono::Local::now().date_naive(),
    )
}

/// Run a full wizard session against the given streams.
pub fn run_session<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    config: VialeveConfig,
    output_path: &std::path::Path,
    reference_date: chrono::NaiveDate,
) -> Result<()> {
    let mut state = WizardState::new(config.rules.clone());
    writeln!(out, "ViaLeve — Sua Vida Mais Leve Começa Aqui\n")?;

    loop {
        print_breadcrumb(out, &state)?;

        // Steps after the first offer back/reset before their fields.
        if state.step() != Step::Identification && state.step() != Step::Review {
            writeln!(out, "(Enter para continuar, v para voltar, r para recomeçar)")?;
            match read_line(input, out, "> ")?.as_str() {
                "v" => {
                    state.retreat();
                    continue;
                }
                "r" => {
                    state.reset();
                    continue;
                }
                _ => {}
            }
        }

        let form = match state.step() {
            Step::Identification => StepForm::Identification(identification_step(input, out)?),
            Step::Measurements => StepForm::Measurements(measurements_step(input, out)?),
            Step::Conditions => StepForm::Conditions(conditions_step(input, out)?),
            Step::MedicationsAllergies => StepForm::Medications(medications_step(input, out)?),
            Step::HistoryGoal => StepForm::HistoryGoal(history_step(input, out)?),
            Step::Review => {
                if !review_step(input, out, &mut state, &config, output_path, reference_date)? {
                    return Ok(());
                }
                continue;
            }
        };

        if let Err(e) = state.submit(&form, reference_date) {
            writeln!(out, "\n{e}\n")?;
        }
    }
}

fn print_breadcrumb<W: Write>(out: &mut W, state: &WizardState) -> Result<()> {
    writeln!(
        out,
        "\n[{}/6] {}",
        state.step().index() + 1,
        state.step().title()
    )?;
    Ok(())
}

fn identification_step<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
) -> Result<IdentificationForm> {
    Ok(IdentificationForm {
        full_name: read_line(input, out, "Nome completo: ")?,
        email: read_line(input, out, "E-mail: ")?,
        birth_date: read_line(input, out, "Data de nascimento (AAAA-MM-DD): ")?,
        identity: read_identity(input, out)?,
    })
}

fn measurements_step<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
) -> Result<MeasurementsForm> {
    Ok(MeasurementsForm {
        weight_kg: read_line(input, out, "Peso (kg): ")?,
        height_m: read_line(input, out, "Altura (m): ")?,
        has_comorbidities: read_yes_no(
            input,
            out,
            "Tem diabetes tipo 2, pressão alta, apneia do sono ou colesterol alto? (s/n): ",
        )?,
        comorbidities: read_optional_text(input, out, "Se sim, quais? (opcional): ")?,
    })
}

fn conditions_step<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<ConditionsForm> {
    Ok(ConditionsForm {
        pregnancy: read_yes_no(input, out, "Está grávida? (s/n): ")?,
        breastfeeding: read_yes_no(input, out, "Está amamentando? (s/n): ")?,
        cancer_treatment: read_yes_no(input, out, "Tratamento oncológico ativo? (s/n): ")?,
        severe_gi_disease: read_yes_no(
            input,
            out,
            "Doença gastrointestinal grave ativa? (s/n): ",
        )?,
        gastroparesis: read_yes_no(input, out, "Diagnóstico de gastroparesia? (s/n): ")?,
        prior_pancreatitis: read_yes_no(input, out, "Já teve pancreatite? (s/n): ")?,
        mtc_men2_history: read_yes_no(
            input,
            out,
            "História pessoal/familiar de MTC ou MEN2? (s/n): ",
        )?,
        cholecystitis_12m: read_yes_no(
            input,
            out,
            "Cólica de vesícula/colecistite nos últimos 12 meses? (s/n): ",
        )?,
        other_conditions: read_optional_text(
            input,
            out,
            "Outras condições clínicas relevantes? (opcional): ",
        )?,
    })
}

fn medications_step<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<MedicationsForm> {
    Ok(MedicationsForm {
        renal_function: read_organ(input, out, "Como estão seus rins?")?,
        hepatic_function: read_organ(input, out, "E o fígado?")?,
        eating_disorder: read_yes_no(input, out, "Transtorno alimentar ativo? (s/n): ")?,
        chronic_corticosteroid: read_yes_no(
            input,
            out,
            "Usa corticoide diariamente há mais de 3 meses? (s/n): ",
        )?,
        antipsychotic_use: read_yes_no(input, out, "Usa antipsicóticos atualmente? (s/n): ")?,
        excipient_allergies: read_excipients(input, out)?,
        other_allergies: read_optional_text(
            input,
            out,
            "Alguma outra alergia importante? (opcional): ",
        )?,
        glp1_allergy: read_yes_no(
            input,
            out,
            "Alergia conhecida a medicamentos do tipo GLP-1? (s/n): ",
        )?,
    })
}

fn history_step<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<HistoryGoalForm> {
    let used = read_yes_no(input, out, "Já usou medicação para emagrecer? (s/n): ")?;
    writeln!(out, "Quais? (números separados por vírgula, opcional)")?;
    for (i, (_, label)) in MEDICATION_CHOICES.iter().enumerate() {
        writeln!(out, "  {}. {label}", i + 1)?;
    }
    let meds = read_numbered(input, out, "> ", MEDICATION_CHOICES.len())?
        .map(|idx| idx.into_iter().map(|i| MEDICATION_CHOICES[i].0).collect());

    Ok(HistoryGoalForm {
        used_weight_loss_medication: used,
        prior_medications: meds,
        side_effects: read_optional_text(
            input,
            out,
            "Teve algum efeito colateral? (opcional): ",
        )?,
        goal: read_goal(input, out)?,
        readiness: read_line(input, out, "Quão pronto(a) está para mudanças, 0-10: ")?
            .parse()
            .ok(),
    })
}

/// Render the result, collect consent, and offer export/reset. Returns
/// `false` when the session is over.
fn review_step<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    state: &mut WizardState,
    config: &VialeveConfig,
    output_path: &std::path::Path,
    reference_date: chrono::NaiveDate,
) -> Result<bool> {
    let result = state
        .eligibility
        .clone()
        .context("resultado ausente na etapa de revisão")?;
    writeln!(
        out,
        "\n{}",
        render_summary(&result, config.scheduling_url.as_deref())
    )?;

    writeln!(out, "Consentimento e autorização:")?;
    let consent = ConsentForm {
        terms_accepted: read_bool(input, out, "Li e aceito o Termo de Consentimento (s/n): ")?,
        telehealth_authorized: read_bool(
            input,
            out,
            "Autorizo a consulta on-line (telemedicina) (s/n): ",
        )?,
        data_use_authorized: read_bool(
            input,
            out,
            "Autorizo o uso dos meus dados (LGPD) (s/n): ",
        )?,
        truthfulness_confirmed: read_bool(
            input,
            out,
            "Confirmo que as informações são verdadeiras (s/n): ",
        )?,
    };
    state.submit(&StepForm::Consent(consent), reference_date)?;

    // The full record always persists; the answers document is a separate
    // consent-gated artifact next to it.
    let record = ScreeningRecord::from_state(state);
    record.save_json(output_path)?;
    writeln!(
        out,
        "Registro salvo em {} (id {}).",
        output_path.display(),
        record.id
    )?;

    if state.export_available() {
        let answers_path = answers_artifact_path(output_path);
        export_answers(&record, &answers_path)?;
        writeln!(out, "Respostas salvas em {}.", answers_path.display())?;
    } else {
        writeln!(
            out,
            "Download das respostas indisponível sem as quatro autorizações."
        )?;
    }

    writeln!(out, "(v para voltar, r para recomeçar, Enter para encerrar)")?;
    match read_line(input, out, "> ")?.as_str() {
        "v" => {
            state.retreat();
            Ok(true)
        }
        "r" => {
            state.reset();
            Ok(true)
        }
        _ => {
            writeln!(out, "Até logo!")?;
            Ok(false)
        }
    }
}

/// Sibling path for the downloadable answers document, derived from the
/// record path: `vialeve-triagem.json` -> `vialeve-triagem-respostas.json`.
fn answers_artifact_path(record_path: &std::path::Path) -> PathBuf {
    let stem = record_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("vialeve-triagem");
    record_path.with_file_name(format!("{stem}-respostas.json"))
}

fn read_line<R: BufRead, W: Write>(input: &mut R, out: &mut W, label: &str) -> Result<String> {
    write!(out, "{label}")?;
    out.flush()?;
    let mut line = String::new();
    let n = input.read_line(&mut line).context("falha ao ler entrada")?;
    anyhow::ensure!(n > 0, "entrada encerrada antes do fim da triagem");
    Ok(line.trim().to_string())
}

fn read_optional_text<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    label: &str,
) -> Result<Option<String>> {
    let text = read_line(input, out, label)?;
    Ok((!text.is_empty()).then_some(text))
}

/// Empty input leaves the question unanswered; anything unparseable does
/// the same rather than failing the step.
fn read_yes_no<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    label: &str,
) -> Result<Option<YesNo>> {
    Ok(read_line(input, out, label)?.parse::<YesNo>().ok())
}

fn read_bool<R: BufRead, W: Write>(input: &mut R, out: &mut W, label: &str) -> Result<bool> {
    Ok(read_yes_no(input, out, label)?.is_some_and(YesNo::is_yes))
}

fn read_identity<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<Option<Identity>> {
    let raw = read_line(
        input,
        out,
        "Como você se identifica? (f/m/Enter para não informar): ",
    )?;
    Ok(match raw.to_lowercase().as_str() {
        "f" | "feminino" => Some(Identity::Feminine),
        "m" | "masculino" => Some(Identity::Masculine),
        "" => None,
        _ => Some(Identity::Undisclosed),
    })
}

fn read_organ<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    label: &str,
) -> Result<Option<OrganFunction>> {
    let raw = read_line(
        input,
        out,
        &format!("{label} (normal/leve/moderada/grave/desconhecido): "),
    )?;
    Ok(raw.parse::<OrganFunction>().ok())
}

fn read_goal<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<Option<Goal>> {
    let raw = read_line(
        input,
        out,
        "Objetivo principal (1 perda de peso, 2 controle de comorbidades, 3 manutenção): ",
    )?;
    Ok(match raw.as_str() {
        "1" => Some(Goal::WeightLoss),
        "2" => Some(Goal::ComorbidityControl),
        "3" => Some(Goal::WeightMaintenance),
        _ => None,
    })
}

fn read_excipients<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
) -> Result<Option<Vec<Excipient>>> {
    writeln!(
        out,
        "É alérgico(a) a algum destes componentes? (números separados por vírgula)"
    )?;
    for (i, excipient) in EXCIPIENT_CHOICES.iter().enumerate() {
        writeln!(out, "  {}. {excipient}", i + 1)?;
    }
    Ok(read_numbered(input, out, "> ", EXCIPIENT_CHOICES.len())?
        .map(|idx| idx.into_iter().map(|i| EXCIPIENT_CHOICES[i]).collect()))
}

/// Parse a comma-separated list of 1-based choices; empty input means the
/// question was skipped, invalid tokens are ignored.
fn read_numbered<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    label: &str,
    count: usize,
) -> Result<Option<Vec<usize>>> {
    let raw = read_line(input, out, label)?;
    if raw.is_empty() {
        return Ok(None);
    }
    let indices: Vec<usize> = raw
        .split(',')
        .filter_map(|token| token.trim().parse::<usize>().ok())
        .filter(|n| (1..=count).contains(n))
        .map(|n| n - 1)
        .collect();
    Ok(Some(indices))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Cursor;

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 30).unwrap()
    }

    fn run_script(script: &str, config: VialeveConfig, output_path: &std::path::Path) -> String {
        let mut input = Cursor::new(script.to_string());
        let mut out = Vec::new();
        run_session(&mut input, &mut out, config, output_path, reference()).unwrap();
        String::from_utf8(out).unwrap()
    }

    /// Answers for a clear record from the measurements step onward,
    /// granting all four consents and then exiting.
    const CLEAR_TAIL: &str = "\n90\n1.70\nn\n\n\nn\nn\nn\nn\nn\nn\nn\nn\n\n\nnormal\nnormal\nn\nn\nn\n7\n\nn\n\nn\n\n\n1\n6\ns\ns\ns\ns\n\n";

    #[test]
    fn happy_path_saves_record_and_exports_answers() {
        let dir = tempfile::tempdir().unwrap();
        let output_path = dir.path().join("triagem.json");
        let script = format!(
            "Maria da Silva\nmaria@exemplo.com\n1985-06-01\nf\n{CLEAR_TAIL}"
        );
        let transcript = run_script(&script, VialeveConfig::default(), &output_path);

        assert!(transcript.contains("Parabéns"));
        assert!(transcript.contains("Registro salvo"));
        assert!(transcript.contains("Respostas salvas"));

        // The saved record is a full envelope the batch commands can load.
        let record = ScreeningRecord::load_json(&output_path).unwrap();
        assert_eq!(record.answers.full_name.as_deref(), Some("Maria da Silva"));
        assert!(record.eligibility.is_some());
        assert!(record.consent.granted());

        assert!(dir.path().join("triagem-respostas.json").exists());
    }

    #[test]
    fn scheduling_url_appears_when_configured() {
        let dir = tempfile::tempdir().unwrap();
        let output_path = dir.path().join("answers.json");
        let config = VialeveConfig {
            scheduling_url: Some("https://agenda.exemplo.com".into()),
            ..Default::default()
        };
        let script = format!(
            "Maria da Silva\nmaria@exemplo.com\n1985-06-01\n\n{CLEAR_TAIL}"
        );
        let transcript = run_script(&script, config, &output_path);
        assert!(transcript.contains("https://agenda.exemplo.com"));
    }

    #[test]
    fn invalid_name_reprompts_the_step() {
        let dir = tempfile::tempdir().unwrap();
        let output_path = dir.path().join("answers.json");
        // First identification attempt has a blank name; the step re-runs.
        let script = format!(
            "\nmaria@exemplo.com\n1985-06-01\n\nMaria da Silva\nmaria@exemplo.com\n1985-06-01\n\n{CLEAR_TAIL}"
        );
        let transcript = run_script(&script, VialeveConfig::default(), &output_path);
        assert!(transcript.contains("Por favor, preencha o campo: nome completo."));
        assert!(transcript.contains("Respostas salvas"));
    }

    #[test]
    fn denied_consent_disables_download_but_keeps_record() {
        let dir = tempfile::tempdir().unwrap();
        let output_path = dir.path().join("triagem.json");
        let tail = CLEAR_TAIL.replace("s\ns\ns\ns\n", "s\ns\ns\nn\n");
        let script = format!("Maria da Silva\nmaria@exemplo.com\n1985-06-01\n\n{tail}");
        let transcript = run_script(&script, VialeveConfig::default(), &output_path);
        assert!(transcript.contains("Download das respostas indisponível"));
        // The record still persists; only the answers artifact is gated.
        assert!(output_path.exists());
        assert!(!dir.path().join("triagem-respostas.json").exists());
    }

    #[test]
    fn answers_artifact_sits_next_to_the_record() {
        assert_eq!(
            answers_artifact_path(std::path::Path::new("out/vialeve-triagem.json")),
            std::path::Path::new("out/vialeve-triagem-respostas.json")
        );
    }

    #[test]
    fn back_navigation_returns_to_previous_step() {
        let dir = tempfile::tempdir().unwrap();
        let output_path = dir.path().join("answers.json");
        // Go back from measurements to identification, then forward again.
        let script = format!(
            "Maria da Silva\nmaria@exemplo.com\n1985-06-01\n\nv\nMaria da Silva\nmaria@exemplo.com\n1985-06-01\n\n{CLEAR_TAIL}"
        );
        let transcript = run_script(&script, VialeveConfig::default(), &output_path);
        let first = transcript.find("[1/6] Sobre você").unwrap();
        let second = transcript.rfind("[1/6] Sobre você").unwrap();
        assert!(second > first);
        assert!(transcript.contains("Respostas salvas"));
    }

    #[test]
    fn truncated_input_is_a_clean_error() {
        let mut input = Cursor::new("Maria\n".to_string());
        let mut out = Vec::new();
        let dir = tempfile::tempdir().unwrap();
        let err = run_session(
            &mut input,
            &mut out,
            VialeveConfig::default(),
            &dir.path().join("answers.json"),
            reference(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("entrada encerrada"));
    }
}
