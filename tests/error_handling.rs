use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;
use plagio::{
    AnalysisStatus, CancellationToken, ConfigLoadError, DetectError, Detector, DetectorConfig,
    Document, Engine, ExternalMatch, MatchSource, PlagioConfig, PlagioError, SourceError,
};
use tempfile::NamedTempFile;

const TEXTO: &str = "Las plantas verdes absorben dióxido de carbono y liberan oxígeno durante el proceso.";

struct Broken(SourceError);

#[async_trait]
impl MatchSource for Broken {
    fn name(&self) -> &str {
        "broken"
    }

    async fn propose_matches(&self, _documents: &[Document]) -> Result<Vec<ExternalMatch>, SourceError> {
        Err(self.0.clone())
    }
}

#[tokio::test]
async fn single_document_is_rejected() {
    let engine = Engine::with_defaults().expect("engine");
    let err = engine
        .analyze(&[Document::new("a.txt", TEXTO)], &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PlagioError::Detect(DetectError::InsufficientInput { got: 1 })
    ));
}

#[test]
fn punctuation_only_document_fails_its_pair() {
    let detector = Detector::new(DetectorConfig::default()).expect("detector");
    let result = detector
        .analyze_local(&[
            Document::new("a.txt", TEXTO),
            Document::new("b.txt", TEXTO),
            Document::new("signos.txt", "¡¿...?!"),
        ])
        .expect("analysis");

    assert_eq!(result.status, AnalysisStatus::Completed);
    assert_eq!(result.similarity, 100);

    let failed = &result.pairs[1];
    assert_eq!(failed.status, AnalysisStatus::Error);
    assert_eq!(failed.similarity, 0);
    assert_eq!(failed.total_matches, 0);
    assert_eq!(
        failed.error.as_deref(),
        Some("document 'signos.txt' has no comparable text")
    );
}

#[test]
fn unnamed_document_fails_its_pair() {
    let detector = Detector::new(DetectorConfig::default()).expect("detector");
    let result = detector
        .analyze_local(&[Document::new("a.txt", TEXTO), Document::new("  ", TEXTO)])
        .expect("analysis");
    assert_eq!(result.status, AnalysisStatus::Error);
    assert!(result.error.is_some());
}

#[tokio::test]
async fn source_errors_fall_back_to_local_matches() {
    for err in [
        SourceError::Transport("connection reset".into()),
        SourceError::Status {
            status: 429,
            body: "quota".into(),
        },
        SourceError::MalformedResponse("no JSON object in model output".into()),
    ] {
        let engine = Engine::with_defaults()
            .expect("engine")
            .with_source(Arc::new(Broken(err)));
        let result = engine
            .compare(
                Document::new("a.txt", TEXTO),
                Document::new("b.txt", TEXTO),
                &CancellationToken::new(),
            )
            .await
            .expect("local fallback");
        assert_eq!(result.similarity, 100);
        assert_eq!(result.status, AnalysisStatus::Completed);
    }
}

#[tokio::test]
async fn cancelled_analysis_returns_no_result() {
    let engine = Engine::with_defaults().expect("engine");
    let cancel = CancellationToken::new();
    cancel.cancel();
    let err = engine
        .compare(
            Document::new("a.txt", TEXTO),
            Document::new("b.txt", TEXTO),
            &cancel,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, PlagioError::Detect(DetectError::Cancelled)));
}

#[test]
fn invalid_yaml_values_are_reported() {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(
        br#"
version: "1.0"
detector:
  ngram:
    n: 0
"#,
    )
    .expect("write");

    let err = PlagioConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigLoadError::Validation(_)), "{err}");
}

#[test]
fn unknown_strategy_is_a_parse_error() {
    let err = PlagioConfig::from_yaml(
        r#"
version: "1.0"
detector:
  strategy: semantic
"#,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigLoadError::YamlParse(_)));
}

#[test]
fn detector_rejects_out_of_range_threshold() {
    for threshold in [0.0, -0.5, 1.01, f64::NAN] {
        let err = Detector::new(DetectorConfig::default().with_threshold(threshold)).unwrap_err();
        assert!(matches!(err, DetectError::InvalidConfig(_)), "threshold {threshold}");
    }
}
