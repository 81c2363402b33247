use chrono::Local;

use crate::prober::{ProbeFailure, ProbeResult};

/// Below this the server counts as fast.
pub const FAST_THRESHOLD_MS: f64 = 500.0;
/// At or above this the server counts as slow.
pub const SLOW_THRESHOLD_MS: f64 = 2000.0;

/// Coarse label for a finished check, used for metrics and log fields.
/// The user-facing contract is the report text, not this label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Fast,
    Acceptable,
    Slow,
    ServerError,
    ClientError,
    Unusual,
    Timeout,
    Connection,
    Unexpected,
}

impl Outcome {
    pub fn as_label(&self) -> &'static str {
        match self {
            Outcome::Fast => "fast",
            Outcome::Acceptable => "acceptable",
            Outcome::Slow => "slow",
            Outcome::ServerError => "server_error",
            Outcome::ClientError => "client_error",
            Outcome::Unusual => "unusual",
            Outcome::Timeout => "timeout",
            Outcome::Connection => "connection_error",
            Outcome::Unexpected => "unexpected",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Diagnosis {
    pub text: String,
    pub outcome: Outcome,
}

/// Flat decision table mapping (failure kind | status code, latency) to the
/// diagnostic report. Lines accumulate in order and join into one string.
pub fn build_report(url: &str, result: &ProbeResult) -> Diagnosis {
    let mut lines: Vec<String> = Vec::new();
    let now = Local::now().format("%Y-%m-%d %H:%M:%S");
    lines.push(format!("[{now}] Verificando: {url}\n"));

    let outcome = match &result.failure {
        Some(ProbeFailure::Timeout) => {
            lines.push(
                "Estado: 🚫 ¡Caído o muy lento! El servidor no respondió a tiempo (Timeout).\n"
                    .to_string(),
            );
            lines.push(
                "Conclusión: **¡CRÍTICO!** 🔴 Es muy probable que el servidor esté caído o inaccesible.\n"
                    .to_string(),
            );
            lines.push(
                "Absolutamente **NO se recomienda** intentar el examen en este momento.\n"
                    .to_string(),
            );
            Outcome::Timeout
        }
        Some(ProbeFailure::Connection) => {
            lines.push("Estado: 🔌 ¡Caído o inaccesible! Error de conexión.\n".to_string());
            lines.push(
                "Conclusión: **¡CRÍTICO!** 🔴 El servidor parece no estar disponible o no se pudo establecer una conexión.\n"
                    .to_string(),
            );
            lines.push(
                "Absolutamente **NO se recomienda** intentar el examen en este momento.\n"
                    .to_string(),
            );
            Outcome::Connection
        }
        Some(ProbeFailure::Unexpected(detail)) => {
            lines.push(format!("Ocurrió un error inesperado: {detail}\n"));
            lines.push(
                "Conclusión: ⚠️ No se pudo verificar el estado correctamente. Revisa el error o la URL.\n"
                    .to_string(),
            );
            Outcome::Unexpected
        }
        None => classify_response(result, &mut lines),
    };

    Diagnosis {
        text: lines.concat(),
        outcome,
    }
}

fn classify_response(result: &ProbeResult, lines: &mut Vec<String>) -> Outcome {
    let status = result.status.unwrap_or_default();
    let elapsed_ms = result.elapsed_ms.unwrap_or_default();
    lines.push(format!("Estado HTTP: {status}\n"));
    lines.push(format!("Tiempo de respuesta: {elapsed_ms:.2} ms\n"));

    match status {
        200 => {
            lines.push(
                "Estado: ✅ ¡Accesible! El servidor respondió correctamente.\n".to_string(),
            );
            let (speed_line, conclusion, outcome) = if elapsed_ms < FAST_THRESHOLD_MS {
                (
                    "Velocidad: ⚡️ ¡Rápida! El servidor responde muy bien.\n",
                    "¡Estupendo! Es muy probable que puedas realizar tu examen sin problemas de conexión por parte del servidor.",
                    Outcome::Fast,
                )
            } else if elapsed_ms < SLOW_THRESHOLD_MS {
                (
                    "Velocidad: 🐢 Aceptable. Podría estar un poco lento en horas pico.\n",
                    "Podrías realizar tu examen, pero la experiencia podría ser un poco lenta. Considera la hora.",
                    Outcome::Acceptable,
                )
            } else {
                (
                    "Velocidad: 🐌 ¡Lenta! El servidor está tardando mucho en responder.\n",
                    "¡Advertencia! El servidor está muy lento. No se recomienda intentar el examen en este momento, podrías tener interrupciones.",
                    Outcome::Slow,
                )
            };
            lines.push(speed_line.to_string());
            lines.push(format!("\nConclusión: {conclusion}\n"));
            outcome
        }
        500..=599 => {
            lines.push(format!(
                "Estado: ❌ ¡Problema en el servidor! Código de error {status}.\n"
            ));
            lines.push(
                "Conclusión: **¡ALERTA!** 🚨 Es muy probable que el servidor esté caído o tenga problemas graves.\n"
                    .to_string(),
            );
            lines.push(
                "Definitivamente **NO se recomienda** intentar el examen ahora mismo.\n"
                    .to_string(),
            );
            Outcome::ServerError
        }
        400..=499 => {
            lines.push(format!(
                "Estado: 🟠 Problema del cliente o recurso no encontrado. Código de error {status}.\n"
            ));
            lines.push(
                "Conclusión: El servidor respondió, pero con un error. Revisa la URL ingresada. Puede que la página específica no exista.\n"
                    .to_string(),
            );
            Outcome::ClientError
        }
        _ => {
            lines.push(format!(
                "Estado: ❓ Código de estado desconocido o inusual: {status}.\n"
            ));
            lines.push(
                "Conclusión: Podría haber un problema inesperado. Monitorea o contacta soporte técnico.\n"
                    .to_string(),
            );
            Outcome::Unusual
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prober::{ProbeFailure, ProbeResult};

    const URL: &str = "https://examenes.example.edu/login";

    #[test]
    fn fast_response_recommends_the_exam() {
        let d = build_report(URL, &ProbeResult::responded(200, 100.0));
        assert_eq!(d.outcome, Outcome::Fast);
        assert!(d.text.contains("Verificando: https://examenes.example.edu/login"));
        assert!(d.text.contains("Estado HTTP: 200"));
        assert!(d.text.contains("Tiempo de respuesta: 100.00 ms"));
        assert!(d.text.contains("¡Rápida!"));
        assert!(d.text.contains("¡Estupendo!"));
    }

    #[test]
    fn medium_latency_is_acceptable_with_caution() {
        let d = build_report(URL, &ProbeResult::responded(200, 1000.0));
        assert_eq!(d.outcome, Outcome::Acceptable);
        assert!(d.text.contains("Aceptable"));
        assert!(d.text.contains("podría ser un poco lenta"));
    }

    #[test]
    fn high_latency_warns_against_the_exam() {
        let d = build_report(URL, &ProbeResult::responded(200, 3000.0));
        assert_eq!(d.outcome, Outcome::Slow);
        assert!(d.text.contains("¡Lenta!"));
        assert!(d.text.contains("¡Advertencia!"));
        assert!(d.text.contains("No se recomienda"));
    }

    #[test]
    fn latency_thresholds_are_inclusive_on_the_slow_side() {
        let at_fast_edge = build_report(URL, &ProbeResult::responded(200, 500.0));
        assert_eq!(at_fast_edge.outcome, Outcome::Acceptable);
        let at_slow_edge = build_report(URL, &ProbeResult::responded(200, 2000.0));
        assert_eq!(at_slow_edge.outcome, Outcome::Slow);
    }

    #[test]
    fn server_errors_raise_an_alert() {
        let d = build_report(URL, &ProbeResult::responded(503, 80.0));
        assert_eq!(d.outcome, Outcome::ServerError);
        assert!(d.text.contains("Problema en el servidor"));
        assert!(d.text.contains("Código de error 503"));
        assert!(d.text.contains("¡ALERTA!"));
    }

    #[test]
    fn client_errors_suggest_checking_the_url() {
        let d = build_report(URL, &ProbeResult::responded(404, 80.0));
        assert_eq!(d.outcome, Outcome::ClientError);
        assert!(d.text.contains("Problema del cliente"));
        assert!(d.text.contains("Revisa la URL ingresada"));
    }

    #[test]
    fn unusual_status_codes_are_flagged() {
        let d = build_report(URL, &ProbeResult::responded(301, 80.0));
        assert_eq!(d.outcome, Outcome::Unusual);
        assert!(d.text.contains("desconocido o inusual: 301"));
    }

    #[test]
    fn timeout_is_critical() {
        let d = build_report(URL, &ProbeResult::failed(ProbeFailure::Timeout));
        assert_eq!(d.outcome, Outcome::Timeout);
        assert!(d.text.contains("(Timeout)"));
        assert!(d.text.contains("¡Caído o muy lento!"));
        assert!(d.text.contains("¡CRÍTICO!"));
        // No HTTP status line when nothing was received.
        assert!(!d.text.contains("Estado HTTP"));
    }

    #[test]
    fn connection_failure_is_critical() {
        let d = build_report(URL, &ProbeResult::failed(ProbeFailure::Connection));
        assert_eq!(d.outcome, Outcome::Connection);
        assert!(d.text.contains("¡Caído o inaccesible!"));
        assert!(d.text.contains("¡CRÍTICO!"));
    }

    #[test]
    fn unexpected_failures_carry_the_raw_error_text() {
        let d = build_report(
            URL,
            &ProbeResult::failed(ProbeFailure::Unexpected("relative URL without a base".into())),
        );
        assert_eq!(d.outcome, Outcome::Unexpected);
        assert!(d.text.contains("Ocurrió un error inesperado: relative URL without a base"));
        assert!(d.text.contains("No se pudo verificar el estado"));
    }
}
