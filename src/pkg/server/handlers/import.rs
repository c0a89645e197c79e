use std::io::Cursor;

use axum::extract::State;
use serde_json::{Value, json};

use crate::pkg::server::extract::{Json, Upload};
use crate::{
    pkg::{
        internal::import::{import_students, parse_students},
        server::state::{AppState, GetTxn},
    },
    prelude::{AppError, Result},
};

/// Imports students from the uploaded `file` field.
pub async fn students(State(state): State<AppState>, Upload(mut multipart): Upload) -> Result<Json<Value>> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("file") {
            upload = Some(field.bytes().await?);
        }
    }
    let bytes = upload.ok_or_else(|| AppError::invalid("file", "a csv file is required"))?;

    let (rows, unparsed) = parse_students(Cursor::new(bytes))?;
    let mut tx = state.db_pool.begin_txn().await?;
    let mut summary = import_students(&mut tx, rows, &state.email_domain, state.bcrypt_cost).await?;
    tx.commit().await?;
    summary.skipped += unparsed;

    Ok(Json(json!({
        "status": true,
        "total_import": summary.total_import,
        "skipped": summary.skipped,
    })))
}
