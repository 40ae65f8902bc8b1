use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Multipart, State};
use axum::Form;
use axum::Json;
use medrag::answer::NO_CONTEXT_RESPONSE;
use medrag::ingest::{extract_pages, UploadedFile, DEFAULT_DOC_TYPE};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn collect_files(multipart: &mut Multipart) -> Result<Vec<UploadedFile>, ApiError> {
    let mut files = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        let filename = field
            .file_name()
            .map_or_else(|| "upload.pdf".to_string(), ToString::to_string);
        let bytes = field.bytes().await?.to_vec();
        files.push(UploadedFile { filename, bytes });
    }
    Ok(files)
}

/// `POST /upload_pdfs` — index a batch of PDFs. Each file is reported
/// individually; a broken file never aborts the rest of the batch.
pub async fn upload_pdfs_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let files = collect_files(&mut multipart).await?;
    info!(count = files.len(), "Received uploaded files");
    let total = files.len();

    let reports = state.pipeline.ingest(files, DEFAULT_DOC_TYPE).await;

    let mut processed = 0usize;
    let mut summaries = Vec::with_capacity(reports.len());
    for report in reports {
        match report.outcome {
            Ok(chunks) => {
                state.report_log.append(&report.filename, chunks).await?;
                processed += 1;
                summaries.push(json!({ "filename": report.filename, "chunks": chunks }));
            }
            Err(e) => {
                summaries.push(json!({ "filename": report.filename, "error": e.to_string() }));
            }
        }
    }

    Ok(Json(json!({
        "message": format!("Processed {processed} of {total} files successfully."),
        "files": summaries,
    })))
}

#[derive(Deserialize)]
pub struct AskForm {
    pub question: String,
}

/// `POST /ask` — answer a question from hybrid-retrieved context. An empty
/// retrieval result short-circuits to the no-information message without
/// invoking the language model.
pub async fn ask_handler(
    State(state): State<AppState>,
    Form(form): Form<AskForm>,
) -> Result<Json<Value>, ApiError> {
    info!(question = %form.question, "User query");

    let summary = state.hybrid.retrieve(&form.question).await;
    if summary.documents.is_empty() {
        return Ok(Json(json!({ "response": NO_CONTEXT_RESPONSE })));
    }

    let response = state
        .answerer
        .answer(&summary.documents, &form.question)
        .await?;

    let mut sources: Vec<&str> = Vec::new();
    for doc in &summary.documents {
        if !sources.contains(&doc.source.as_str()) {
            sources.push(&doc.source);
        }
    }

    Ok(Json(json!({ "response": response, "sources": sources })))
}

/// `POST /upload_and_analyze_report` — structured analysis of a single lab
/// report, which is also indexed for later questions.
pub async fn upload_and_analyze_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let mut files = collect_files(&mut multipart).await?;
    let file = files
        .pop()
        .ok_or_else(|| anyhow::anyhow!("No file in upload"))?;
    let filename = file.filename.clone();

    let pages = extract_pages(file.bytes.clone()).await?;
    let report_text = pages.join("\n");
    info!(%filename, chars = report_text.len(), "Extracted report text");

    let analysis = state.analyzer.analyze(&report_text).await?;

    let reports = state.pipeline.ingest(vec![file], DEFAULT_DOC_TYPE).await;
    for report in reports {
        if let Ok(chunks) = report.outcome {
            state.report_log.append(&report.filename, chunks).await?;
        }
    }

    Ok(Json(json!({
        "filename": filename,
        "analysis": analysis,
        "message": "Report analyzed and stored in vector database.",
    })))
}

/// `GET /list_reports` — metadata of previously uploaded reports.
pub async fn list_reports_handler(
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    let reports = state.report_log.list().await?;
    if reports.is_empty() {
        return Ok(Json(json!({ "message": "No reports uploaded yet." })));
    }
    Ok(Json(json!({ "uploaded_reports": reports })))
}
