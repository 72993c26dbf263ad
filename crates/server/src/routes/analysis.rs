use crate::error::ServerResult;
use crate::state::ServerState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use plagio::{BatchPolicy, CancellationToken, Document, Engine, MatchStrategy, PlagiarismResult};
use serde::Deserialize;
use std::sync::Arc;

/// Multi-document analysis request
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// Documents to compare; the first one is the primary document
    pub documents: Vec<Document>,

    /// Overrides the configured batch policy
    #[serde(default)]
    pub policy: Option<BatchPolicy>,

    /// Overrides the configured matching strategy
    #[serde(default)]
    pub strategy: Option<MatchStrategy>,
}

/// Two-document comparison request
#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub document_a: Document,
    pub document_b: Document,
}

/// Runs one analysis. Dropping the returned future (client gone, request
/// timeout) cancels the analysis.
async fn run(
    engine: &Engine,
    documents: &[Document],
    policy: Option<BatchPolicy>,
    strategy: Option<MatchStrategy>,
) -> ServerResult<(Engine, PlagiarismResult)> {
    let engine = engine.with_overrides(policy, strategy)?;
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let result = engine.analyze(documents, &cancel).await?;
    Ok((engine, result))
}

/// Analyze a set of documents
///
/// Returns the full `PlagiarismResult` for the primary pair plus every
/// other compared pair.
pub async fn analyze_documents(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> ServerResult<impl IntoResponse> {
    let Json(request) = payload?;
    let (_, result) = run(
        &state.engine,
        &request.documents,
        request.policy,
        request.strategy,
    )
    .await?;
    Ok(Json(result))
}

/// Compare exactly two documents
pub async fn compare_documents(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<CompareRequest>, JsonRejection>,
) -> ServerResult<impl IntoResponse> {
    let Json(request) = payload?;
    let documents = [request.document_a, request.document_b];
    let (_, result) = run(&state.engine, &documents, None, None).await?;
    Ok(Json(result))
}

/// Analyze a set of documents and render the plain-text report
pub async fn report(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> ServerResult<impl IntoResponse> {
    let Json(request) = payload?;
    let (engine, result) = run(
        &state.engine,
        &request.documents,
        request.policy,
        request.strategy,
    )
    .await?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        engine.report(&result),
    ))
}
