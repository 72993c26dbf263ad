//! Plain-text analysis report.
//!
//! The report is meant for people: a summary of the primary comparison,
//! its risk level, every reported match, recommendations keyed on the risk
//! level and the parameters the analysis ran with.

use canonical::collapse_whitespace;
use matcher::{AnalysisStatus, DetectorConfig, MatchStrategy, OffsetSpace, PlagiarismResult};
use serde::{Deserialize, Serialize};

/// Longest excerpt of a match shown in the report, in characters.
const EXCERPT_CHARS: usize = 100;

/// Coarse reading of the similarity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

impl RiskLevel {
    /// `>= 70` high, `>= 40` medium, otherwise low.
    pub fn from_score(similarity: u8) -> Self {
        if similarity >= 70 {
            RiskLevel::High
        } else if similarity >= 40 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::High => "ALTO RIESGO",
            RiskLevel::Medium => "RIESGO MEDIO",
            RiskLevel::Low => "BAJO RIESGO",
        }
    }

    fn verdict(&self) -> &'static str {
        match self {
            RiskLevel::High => "Se detectó un nivel significativo de similitud que requiere revisión inmediata.",
            RiskLevel::Medium => "Se detectaron algunas similitudes que deben ser verificadas.",
            RiskLevel::Low => "Nivel de similitud dentro de parámetros normales.",
        }
    }

    fn recommendations(&self) -> &'static [&'static str] {
        match self {
            RiskLevel::High => &[
                "Revisar urgentemente las secciones marcadas como similares",
                "Verificar todas las citas y referencias bibliográficas",
                "Parafrasear o reescribir el contenido similar",
                "Consultar con un supervisor académico",
            ],
            RiskLevel::Medium => &[
                "Revisar las coincidencias encontradas",
                "Asegurar el uso adecuado de citas y referencias",
                "Verificar la originalidad del contenido marcado",
            ],
            RiskLevel::Low => &[
                "El documento presenta un nivel aceptable de originalidad",
                "Continuar con las buenas prácticas de citación",
            ],
        }
    }
}

/// Renders `result` assuming it was produced with the default configuration.
pub fn render_text(result: &PlagiarismResult) -> String {
    render_text_with(result, &DetectorConfig::default())
}

/// Renders `result`; `cfg` feeds the technical section.
pub fn render_text_with(result: &PlagiarismResult, cfg: &DetectorConfig) -> String {
    let risk = RiskLevel::from_score(result.similarity);
    let mut out = String::new();

    out.push_str("REPORTE DE ANÁLISIS DE PLAGIO\n");
    out.push_str("=============================\n\n");

    out.push_str("DOCUMENTOS ANALIZADOS\n");
    out.push_str(&format!("Documento A: {}\n", result.document_a));
    out.push_str(&format!("Documento B: {}\n", result.document_b));
    out.push_str(&format!(
        "Fecha de análisis: {}\n\n",
        result.date.format("%d/%m/%Y %H:%M:%S UTC")
    ));

    out.push_str("RESUMEN\n");
    out.push_str(&format!("Porcentaje de similitud: {}%\n", result.similarity));
    out.push_str(&format!("Coincidencias encontradas: {}\n", result.total_matches));
    out.push_str(&format!("Estado del análisis: {}\n", status_label(result.status)));
    if let Some(error) = &result.error {
        out.push_str(&format!("Detalle: {error}\n"));
    }
    if result.truncated {
        out.push_str("Aviso: algún documento superó el límite de tokens y se analizó parcialmente.\n");
    }
    out.push_str(&format!("\nNIVEL DE RIESGO: {}\n{}\n\n", risk.label(), risk.verdict()));

    out.push_str("COINCIDENCIAS DETECTADAS\n");
    if result.matches.is_empty() {
        out.push_str("No se encontraron coincidencias significativas.\n");
    }
    for (idx, m) in result.matches.iter().enumerate() {
        let unit = match m.offsets {
            OffsetSpace::Tokens => "palabras",
            OffsetSpace::Chars => "caracteres",
        };
        let kind = m.kind.map(|k| k.as_str()).unwrap_or("-");
        out.push_str(&format!(
            "\n{}. Similitud: {}% ({kind})\n",
            idx + 1,
            m.similarity.round()
        ));
        out.push_str(&format!("   Texto: \"{}\"\n", excerpt(&m.original_text)));
        out.push_str(&format!("   Posición en Doc A: {unit} {}-{}\n", m.start_a, m.end_a));
        out.push_str(&format!("   Posición en Doc B: {unit} {}-{}\n", m.start_b, m.end_b));
    }

    if result.pairs.len() > 1 {
        out.push_str("\nCOMPARACIONES\n");
        for pair in &result.pairs {
            match &pair.error {
                Some(error) => out.push_str(&format!(
                    "{} / {}: error ({error})\n",
                    pair.document_a, pair.document_b
                )),
                None => out.push_str(&format!(
                    "{} / {}: {}% en {} coincidencias\n",
                    pair.document_a, pair.document_b, pair.similarity, pair.total_matches
                )),
            }
        }
    }

    out.push_str("\nRECOMENDACIONES\n");
    for line in risk.recommendations() {
        out.push_str(&format!("- {line}\n"));
    }

    out.push_str("\nPARÁMETROS TÉCNICOS\n");
    match cfg.strategy {
        MatchStrategy::NGram => {
            out.push_str("Algoritmo: n-gramas de palabras con distancia de edición\n");
            out.push_str(&format!("Longitud de n-gramas: {} palabras\n", cfg.ngram.n));
            out.push_str(&format!(
                "Umbral de similitud: {}%\n",
                (cfg.matcher.threshold * 100.0).round()
            ));
        }
        MatchStrategy::Sentence => {
            out.push_str("Algoritmo: comparación de oraciones\n");
            out.push_str(&format!(
                "Umbral de similitud: {}%\n",
                (cfg.matcher.sentence_threshold * 100.0).round()
            ));
        }
    }
    out.push_str(&format!("Comparaciones realizadas: {}\n", result.pairs.len()));

    out
}

fn status_label(status: AnalysisStatus) -> &'static str {
    match status {
        AnalysisStatus::Completed => "completado",
        AnalysisStatus::Processing => "en proceso",
        AnalysisStatus::Error => "error",
    }
}

fn excerpt(text: &str) -> String {
    let text = collapse_whitespace(text);
    if text.chars().count() <= EXCERPT_CHARS {
        return text;
    }
    let head: String = text.chars().take(EXCERPT_CHARS).collect();
    format!("{head}...")
}
