//! Concurrency and thread safety tests for plagio

use std::sync::Arc;
use std::thread;

use plagio::{
    canonicalize, CancellationToken, CanonicalizeConfig, Detector, DetectorConfig, Document,
    Engine,
};

fn pair(i: usize) -> Vec<Document> {
    vec![
        Document::new(
            format!("original-{i}.txt"),
            "La revolución industrial transformó la producción textil en Inglaterra durante el siglo dieciocho.",
        ),
        Document::new(
            format!("copia-{i}.txt"),
            "Como se sabe, la revolución industrial transformó la producción textil en Inglaterra durante el siglo dieciocho.",
        ),
    ]
}

#[test]
fn concurrent_canonicalize_same_config() {
    let config = Arc::new(CanonicalizeConfig::default());
    let text = "Texto de prueba para normalización concurrente, con acentos y SIGNOS!";

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let config = Arc::clone(&config);
            let text = text.to_string();
            thread::spawn(move || {
                canonicalize(format!("thread-{i}"), &text, &config)
                    .expect("canonicalize should succeed")
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let first = &results[0];
    for (i, result) in results.iter().enumerate().skip(1) {
        assert_eq!(
            first.canonical_text, result.canonical_text,
            "Thread {i} produced different canonical text",
        );
        assert_eq!(first.tokens, result.tokens, "Thread {i} produced different tokens");
    }
}

#[test]
fn shared_detector_across_threads() {
    let detector = Detector::new(DetectorConfig::default().with_parallel(true)).expect("detector");
    let expected = detector.analyze_local(&pair(0)).expect("baseline");

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let detector = detector.clone();
            thread::spawn(move || detector.analyze_local(&pair(i)).expect("analysis"))
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let result = handle.join().unwrap();
        assert_eq!(result.similarity, expected.similarity, "thread {i}");
        assert_eq!(result.matches.len(), expected.matches.len(), "thread {i}");
        assert_eq!(result.document_a, format!("original-{i}.txt"));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_async_analyses_share_one_engine() {
    let engine = Engine::with_defaults().expect("engine");

    let tasks: Vec<_> = (0..16)
        .map(|i| {
            let engine = engine.clone();
            tokio::spawn(async move {
                engine
                    .analyze(&pair(i), &CancellationToken::new())
                    .await
                    .expect("analysis")
            })
        })
        .collect();

    let mut scores = Vec::new();
    for task in tasks {
        scores.push(task.await.expect("join").similarity);
    }
    assert!(scores.iter().all(|&s| s == scores[0]));
    assert!(scores[0] >= 40, "score {}", scores[0]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn cancelling_one_analysis_leaves_others_alone() {
    let engine = Engine::with_defaults().expect("engine");
    let cancelled = CancellationToken::new();
    cancelled.cancel();
    let live = CancellationToken::new();
    let (first, second) = (pair(0), pair(1));

    let (stopped, finished) = tokio::join!(
        engine.analyze(&first, &cancelled),
        engine.analyze(&second, &live),
    );

    assert!(stopped.is_err());
    assert!(finished.expect("independent analysis").similarity > 0);
}
