//! End-to-end scripted runs of the interactive wizard.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn vialeve() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("vialeve").unwrap()
}

/// One line per prompt: identification, then every later step preceded by a
/// blank navigation line, consent granted, exit.
const FULL_SESSION: &str = concat!(
    "Maria da Silva\nmaria@exemplo.com\n1985-06-01\nf\n",
    "\n90\n1.70\nn\n\n",
    "\nn\nn\nn\nn\nn\nn\nn\nn\n\n",
    "\nnormal\nnormal\nn\nn\nn\n7\n\nn\n",
    "\nn\n\n\n1\n6\n",
    "s\ns\ns\ns\n\n",
);

#[test]
fn full_session_reaches_result_and_saves_record() {
    let dir = TempDir::new().unwrap();

    vialeve()
        .current_dir(dir.path())
        .arg("screen")
        .write_stdin(FULL_SESSION)
        .assert()
        .success()
        .stdout(predicate::str::contains("[1/6] Sobre você"))
        .stdout(predicate::str::contains("[6/6] Revisar & confirmar"))
        .stdout(predicate::str::contains("Parabéns"))
        .stdout(predicate::str::contains("Registro salvo"))
        .stdout(predicate::str::contains("Respostas salvas"));

    // Full record envelope plus the consent-gated answers document.
    let saved = dir.path().join("vialeve-triagem.json");
    assert!(saved.exists());
    let content = std::fs::read_to_string(&saved).unwrap();
    assert!(content.contains("\"id\""));
    assert!(content.contains("\"created_at\""));
    assert!(content.contains("Maria da Silva"));
    assert!(dir.path().join("vialeve-triagem-respostas.json").exists());
}

#[test]
fn saved_record_round_trips_through_evaluate() {
    let dir = TempDir::new().unwrap();

    vialeve()
        .current_dir(dir.path())
        .arg("screen")
        .write_stdin(FULL_SESSION)
        .assert()
        .success();

    vialeve()
        .current_dir(dir.path())
        .arg("evaluate")
        .arg("--answers")
        .arg("vialeve-triagem.json")
        .arg("--reference-date")
        .arg("2024-04-30")
        .assert()
        .success()
        .stdout(predicate::str::contains("potencialmente elegível"));
}

#[test]
fn session_with_exclusion_explains_reasons() {
    let dir = TempDir::new().unwrap();

    // Same walk, but reporting an active pregnancy on the conditions step.
    let script = FULL_SESSION.replacen("\nn\nn\nn\nn\nn\nn\nn\nn\n\n", "\ns\nn\nn\nn\nn\nn\nn\nn\n\n", 1);

    vialeve()
        .current_dir(dir.path())
        .arg("screen")
        .write_stdin(script)
        .assert()
        .success()
        .stdout(predicate::str::contains("Gestação em curso."))
        .stdout(predicate::str::contains("avaliação médica"));
}

#[test]
fn truncated_session_fails_cleanly() {
    let dir = TempDir::new().unwrap();

    vialeve()
        .current_dir(dir.path())
        .arg("screen")
        .write_stdin("Maria da Silva\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("entrada encerrada"));
}
