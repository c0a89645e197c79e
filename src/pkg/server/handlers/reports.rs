use std::path::Path as FsPath;
use std::sync::Arc;

use axum::{
    Extension,
    body::Bytes,
    extract::{Multipart, State},
    http::StatusCode,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::pkg::server::extract::{Json, Path, Query, Upload};
use crate::{
    pkg::{
        internal::{
            adaptors::{
                apply_jobs::selectors::ApplyJobSelector,
                evaluations::mutators::EvaluationMutator,
                reports::{
                    mutators::ReportMutator,
                    selectors::{ActivitySelector, ReportSelector},
                },
            },
            auth::CurrentUser,
        },
        server::{
            handlers::{Page, found, listing},
            state::{AppState, GetTxn},
        },
    },
    prelude::{AppError, Result},
};

#[derive(Debug, Default, Deserialize)]
pub struct ReportFilter {
    pub status: Option<String>,
}

#[derive(Debug, Default)]
struct ReportUpload {
    apply_job_id: Option<i64>,
    file: Option<(String, Bytes)>,
}

async fn read_upload(mut multipart: Multipart) -> Result<ReportUpload> {
    let mut upload = ReportUpload::default();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "apply_job_id" => {
                let raw = field.text().await?;
                upload.apply_job_id = Some(
                    raw.trim()
                        .parse()
                        .map_err(|_| AppError::invalid("apply_job_id", "must be a number"))?,
                );
            }
            "file" => {
                let file_name = field.file_name().unwrap_or("laporan").to_string();
                let bytes = field.bytes().await?;
                if !bytes.is_empty() {
                    upload.file = Some((file_name, bytes));
                }
            }
            _ => {}
        }
    }
    Ok(upload)
}

/// Strips any directory part a client put in the upload name.
pub fn stored_file_name(report_id: i64, original: &str) -> String {
    let base = FsPath::new(original)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .unwrap_or("laporan");
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("report_{}_{}", report_id, cleaned)
}

pub async fn index(
    State(state): State<AppState>,
    Query(page): Query<Page>,
    Query(filter): Query<ReportFilter>,
) -> Result<Json<Value>> {
    let mut conn = state.db_pool.acquire().await?;
    let mut reports = ReportSelector::new(&mut conn);
    let status = filter.status.as_deref();
    let data = reports.list(status, page.limit(), page.offset()).await?;
    let count = reports.count(status).await?;
    Ok(listing(data, count))
}

/// Removes a stored upload when the transaction it belongs to did not commit.
async fn discard_on_error<T>(result: Result<T>, stored: Option<&FsPath>) -> Result<T> {
    if let (Err(_), Some(path)) = (&result, stored) {
        if let Err(err) = tokio::fs::remove_file(path).await {
            tracing::warn!(path = %path.display(), error = %err, "could not remove orphaned upload");
        }
    }
    result
}

/// Opens the report of an application together with its ungraded evaluation.
/// The file is written after the rows and removed again if the commit fails.
pub async fn store(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<CurrentUser>>,
    Upload(multipart): Upload,
) -> Result<(StatusCode, Json<Value>)> {
    let upload = read_upload(multipart).await?;
    let apply_job_id = upload
        .apply_job_id
        .ok_or_else(|| AppError::invalid("apply_job_id", "apply_job_id is required"))?;

    let mut tx = state.db_pool.begin_txn().await?;
    let application = found(
        ApplyJobSelector::new(&mut tx).get_by_id(apply_job_id).await?,
        "Application",
    )?;
    if let Some(existing) = ReportSelector::new(&mut tx).get_by_apply_job(apply_job_id).await? {
        return Ok((
            StatusCode::OK,
            Json(json!({ "message": "Report already exists", "data": existing })),
        ));
    }

    let mut reports = ReportMutator::new(&mut tx);
    let mut report = reports
        .create(apply_job_id, application.job_user.as_deref(), Utc::now())
        .await?;
    let mut stored = None;
    if let Some((name, bytes)) = upload.file {
        let file_name = stored_file_name(report.id, &name);
        report = reports
            .set_file(report.id, &format!("/uploads/{}", file_name))
            .await?;
        stored = Some((state.upload_dir.join(&file_name), bytes));
    }
    EvaluationMutator::new(&mut tx).ensure_stub(apply_job_id).await?;
    if let Some((path, bytes)) = &stored {
        tokio::fs::write(path, bytes).await?;
    }
    let committed = tx.commit().await.map_err(AppError::from);
    discard_on_error(committed, stored.as_ref().map(|(path, _)| path.as_path())).await?;

    tracing::info!(report_id = report.id, apply_job_id, user_id = user.id(), "report created");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Report created", "data": report })),
    ))
}

pub async fn show(State(state): State<AppState>, Path(apply_job_id): Path<i64>) -> Result<Json<Value>> {
    let mut conn = state.db_pool.acquire().await?;
    let report = found(
        ReportSelector::new(&mut conn).get_by_apply_job(apply_job_id).await?,
        "Report",
    )?;
    let activities = ActivitySelector::new(&mut conn).for_report(report.id).await?;
    Ok(Json(json!({ "data": report, "activities": activities })))
}

pub async fn destroy(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Value>> {
    let mut conn = state.db_pool.acquire().await?;
    if !ReportMutator::new(&mut conn).delete(id).await? {
        return Err(AppError::not_found("Report"));
    }
    tracing::info!(report_id = id, "report deleted");
    Ok(Json(json!({ "message": "Report deleted" })))
}

/// Signs the report in the caller's slot. A lecturer signs as examiner only
/// when assigned as the application's examiner.
pub async fn check(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<CurrentUser>>,
    Path(apply_job_id): Path<i64>,
) -> Result<Json<Value>> {
    let mut tx = state.db_pool.begin_txn().await?;
    let application = found(
        ApplyJobSelector::new(&mut tx).get_by_id(apply_job_id).await?,
        "Application",
    )?;
    let report = found(
        ReportSelector::new(&mut tx).get_by_apply_job(apply_job_id).await?,
        "Report",
    )?;
    let as_examiner = application.examiner_lecturer_id == Some(user.id());
    let slots = user.slots(as_examiner);
    if slots.is_empty() {
        return Err(AppError::invalid("role", "your role cannot sign reports"));
    }

    let mut reports = ReportMutator::new(&mut tx);
    let signed = reports.sign(report.id, &slots, user.id()).await?;
    let signed = reports.set_status(signed.id, signed.sign_off_status()).await?;
    tx.commit().await?;
    tracing::info!(report_id = signed.id, status = %signed.status, slots = ?slots, "report signed");
    Ok(Json(json!({ "status": true, "data": signed })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_names_drop_directories_and_odd_characters() {
        assert_eq!(stored_file_name(4, "laporan akhir.pdf"), "report_4_laporan_akhir.pdf");
        assert_eq!(stored_file_name(4, "../../etc/passwd"), "report_4_passwd");
        assert_eq!(stored_file_name(9, ""), "report_9_laporan");
    }

    #[tokio::test]
    async fn failed_commit_removes_the_stored_file() {
        let path = std::env::temp_dir().join(format!("report_{}.pdf", uuid::Uuid::new_v4()));
        tokio::fs::write(&path, b"%PDF").await.unwrap();

        let kept = discard_on_error(Ok(()), Some(&path)).await;
        assert!(kept.is_ok());
        assert!(path.exists());

        let failed: Result<()> = Err(AppError::Internal("commit failed".into()));
        let result = discard_on_error(failed, Some(&path)).await;
        assert!(result.is_err());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn failure_without_a_file_is_passed_through() {
        let failed: Result<()> = Err(AppError::Internal("commit failed".into()));
        let result = discard_on_error(failed, None).await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }
}
