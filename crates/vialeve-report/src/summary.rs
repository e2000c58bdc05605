//! Patient-facing result summary rendering.

use vialeve_core::rules::EligibilityResult;

/// Render the outcome message shown on the review step.
///
/// `scheduling_url` comes from configuration; when absent the scheduling
/// affordance is mentioned as unavailable rather than failing.
pub fn render_summary(result: &EligibilityResult, scheduling_url: Option<&str>) -> String {
    let mut out = String::new();

    if result.is_excluded() {
        out.push_str(
            "Obrigado por responder! Neste momento, precisamos de uma avaliação médica \
             antes de seguir com a prescrição.\n",
        );
        if !result.reasons.is_empty() {
            out.push_str("\nEntenda o porquê:\n");
            for reason in &result.reasons {
                out.push_str(&format!("  - {reason}\n"));
            }
        }
        out.push_str(
            "\nIsso não significa que você não pode tratar. Nossa equipe pode orientar um \
             plano seguro e personalizado para você.\n",
        );
    } else {
        out.push_str(
            "Parabéns! Você pode se beneficiar do tratamento farmacológico. \
             Vamos seguir para o agendamento da sua consulta.\n",
        );
        match scheduling_url {
            Some(url) => out.push_str(&format!("\nAgende sua consulta: {url}\n")),
            None => out.push_str("\nAgendamento indisponível no momento (link não configurado).\n"),
        }
    }

    out
}
