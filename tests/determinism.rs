use plagio::{
    extract_ngrams, normalize, Detector, DetectorConfig, Document, NGramConfig, PlagiarismResult,
};

const SAMPLES: &[&str] = &[
    "El gato corre rápido por el jardín verde todos los días.",
    "  ¡ÉL   CORRIÓ, rápido!  ",
    "Ñandú, pingüino y cigüeña: aves de Sudamérica.",
    "tab\tseparated\nlines\r\nand    spaces",
    "números 123 y guiones-bajos_en_medio",
    "",
    "...!!!???",
];

fn analyze(cfg: DetectorConfig, docs: &[Document]) -> PlagiarismResult {
    Detector::new(cfg)
        .expect("valid config")
        .analyze_local(docs)
        .expect("analysis")
}

fn corpus() -> Vec<Document> {
    vec![
        Document::new(
            "tesis.txt",
            "La fotosíntesis convierte la energía luminosa en energía química. \
             Las plantas verdes absorben dióxido de carbono y liberan oxígeno durante el proceso. \
             Este mecanismo sostiene casi todas las cadenas alimenticias del planeta.",
        ),
        Document::new(
            "ensayo.txt",
            "Según varios autores, las plantas verdes absorben dióxido de carbono y liberan oxígeno \
             durante el proceso. Además la fotosíntesis convierte la energía luminosa en energia quimica.",
        ),
        Document::new(
            "apuntes.txt",
            "Este mecanismo sostiene casi todas las cadenas alimenticias del planeta según la biología moderna.",
        ),
    ]
}

#[test]
fn normalization_is_idempotent() {
    for sample in SAMPLES {
        let once = normalize(sample);
        assert_eq!(normalize(&once), once, "sample {sample:?}");
    }
}

#[test]
fn ngram_count_matches_window_formula() {
    let open = NGramConfig::default()
        .with_min_token_chars(0)
        .with_min_ngram_chars(0);

    for sample in SAMPLES {
        let normalized = normalize(sample);
        let tokens: Vec<&str> = normalized.split_whitespace().collect();
        for n in [1usize, 2, 3, 7] {
            let cfg = open.clone().with_n(n);
            let count = extract_ngrams(&tokens, &cfg).expect("valid config").count();
            assert_eq!(count, tokens.len().saturating_sub(n - 1), "n={n} sample {sample:?}");
        }
    }
}

#[test]
fn repeated_analyses_agree() {
    let docs = corpus();
    let first = analyze(DetectorConfig::default(), &docs);
    let second = analyze(DetectorConfig::default(), &docs);

    assert_eq!(first.similarity, second.similarity);
    assert_eq!(first.matches, second.matches);
    assert_eq!(first.pairs, second.pairs);
    assert_ne!(first.id, second.id);
}

#[test]
fn parallel_matching_agrees_with_serial() {
    let docs = corpus();
    let serial = analyze(DetectorConfig::default().with_parallel(false), &docs);
    let parallel = analyze(DetectorConfig::default().with_parallel(true), &docs);

    assert!(serial.similarity > 0);
    assert_eq!(serial.pairs, parallel.pairs);
}

#[test]
fn document_order_of_pairs_is_stable() {
    let docs = corpus();
    let cfg = DetectorConfig::default().with_policy(plagio::BatchPolicy::Exhaustive);
    let result = analyze(cfg, &docs);

    let names: Vec<(&str, &str)> = result
        .pairs
        .iter()
        .map(|p| (p.document_a.as_str(), p.document_b.as_str()))
        .collect();
    assert_eq!(
        names,
        vec![
            ("tesis.txt", "ensayo.txt"),
            ("tesis.txt", "apuntes.txt"),
            ("ensayo.txt", "apuntes.txt"),
        ]
    );
}

#[test]
fn matches_come_back_in_document_order() {
    let result = analyze(DetectorConfig::default(), &corpus());
    let starts: Vec<usize> = result.matches.iter().map(|m| m.start_a).collect();
    let mut sorted = starts.clone();
    sorted.sort_unstable();
    assert_eq!(starts, sorted);
}
