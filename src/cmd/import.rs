use std::fs::File;
use std::path::Path;

use crate::{
    conf::settings,
    pkg::{
        internal::import::{import_students, parse_students},
        server::state::{GetTxn, db_pool},
    },
    prelude::Result,
};

pub async fn students(file: &Path) -> Result<()> {
    let (rows, unparsed) = parse_students(File::open(file)?)?;
    tracing::info!(rows = rows.len(), unparsed, file = %file.display(), "importing students");

    let pool = db_pool()?;
    let mut tx = pool.begin_txn().await?;
    let mut summary = import_students(
        &mut tx,
        rows,
        &settings.student_email_domain,
        settings.bcrypt_cost,
    )
    .await?;
    tx.commit().await?;
    summary.skipped += unparsed;

    println!(
        "imported {} students, skipped {}",
        summary.total_import, summary.skipped
    );
    Ok(())
}
