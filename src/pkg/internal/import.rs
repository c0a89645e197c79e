//! Bulk student import from the registrar's CSV export.
//!
//! The layout is fixed: `name, nim, birthdate, program, status`, with a header row.

use std::io::Read;

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::{Connection, PgConnection};

use crate::pkg::internal::{
    adaptors::users::{
        mutators::{NewUser, UserMutator},
        selectors::UserSelector,
    },
    auth::hash_password,
    policy::Role,
};
use crate::prelude::Result;

const COLUMNS: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct StudentRow {
    pub name: String,
    pub nim: String,
    pub birthdate: NaiveDate,
    pub program: String,
    pub status: String,
}

impl StudentRow {
    /// Initial password: the birthdate as `YYYYMMDD`.
    pub fn default_password(&self) -> String {
        self.birthdate.format("%Y%m%d").to_string()
    }

    pub fn email(&self, domain: &str) -> String {
        format!("{}@{}", self.nim, domain)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct ImportSummary {
    pub total_import: usize,
    pub skipped: usize,
}

pub fn parse_birthdate(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%m/%d/%Y")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .ok()
}

/// Parses the export. Short rows and rows with an unreadable birthdate are
/// counted as skipped rather than failing the whole file.
pub fn parse_students<R: Read>(reader: R) -> Result<(Vec<StudentRow>, usize)> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    let mut skipped = 0;
    for record in csv.records() {
        let record = record?;
        if record.len() < COLUMNS {
            skipped += 1;
            continue;
        }
        let Some(birthdate) = parse_birthdate(&record[2]) else {
            tracing::debug!(nim = &record[1], "skipping row with unreadable birthdate");
            skipped += 1;
            continue;
        };
        if record[1].is_empty() {
            skipped += 1;
            continue;
        }
        rows.push(StudentRow {
            name: record[0].to_string(),
            nim: record[1].to_string(),
            birthdate,
            program: record[3].to_string(),
            status: record[4].to_string(),
        });
    }
    Ok((rows, skipped))
}

/// Creates one student per row. Each row runs in its own savepoint so a
/// duplicate only skips that row.
pub async fn import_students(
    conn: &mut PgConnection,
    rows: Vec<StudentRow>,
    email_domain: &str,
    bcrypt_cost: u32,
) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();
    for row in rows {
        let email = row.email(email_domain);
        if UserSelector::new(conn)
            .find_conflict(&email, &row.nim)
            .await?
            .is_some()
        {
            summary.skipped += 1;
            continue;
        }

        let password = hash_password(row.default_password(), bcrypt_cost).await?;
        let user = NewUser {
            name: row.name.clone(),
            email,
            username: row.nim.clone(),
            password,
            role: Role::Student.name().to_string(),
            nim: Some(row.nim.clone()),
            program_study: Some(row.program.clone()),
            birthdate: Some(row.birthdate),
            status: Some(row.status.clone()),
            ..NewUser::default()
        };

        let mut savepoint = conn.begin().await?;
        let created = UserMutator::new(&mut savepoint).create(&user).await;
        let created = match created {
            Ok(created) => created,
            Err(err) => {
                tracing::warn!(nim = %row.nim, error = %err, "skipping student import row");
                savepoint.rollback().await?;
                summary.skipped += 1;
                continue;
            }
        };
        UserMutator::new(&mut savepoint)
            .attach_role(created.id, Role::Student.id())
            .await?;
        savepoint.commit().await?;
        summary.total_import += 1;
    }
    tracing::info!(
        imported = summary.total_import,
        skipped = summary.skipped,
        "student import finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
name,nim,birthdate,program,status
Siti Aminah,714220001,03/15/2002,D4 Teknik Informatika,Aktif
Budi,714220002,2001-12-01,D4 Logistik Bisnis,Aktif
Short,714220003
Bad Date,714220004,15-03-2002,D4 Teknik Informatika,Aktif
";

    #[test]
    fn parses_both_date_layouts() {
        assert_eq!(
            parse_birthdate("03/15/2002"),
            NaiveDate::from_ymd_opt(2002, 3, 15)
        );
        assert_eq!(
            parse_birthdate(" 2001-12-01 "),
            NaiveDate::from_ymd_opt(2001, 12, 1)
        );
        assert_eq!(parse_birthdate("15-03-2002"), None);
        assert_eq!(parse_birthdate(""), None);
    }

    #[test]
    fn short_and_undated_rows_are_skipped() {
        let (rows, skipped) = parse_students(SAMPLE.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(skipped, 2);
        assert_eq!(rows[0].nim, "714220001");
        assert_eq!(rows[1].program, "D4 Logistik Bisnis");
    }

    #[test]
    fn header_only_file_is_empty() {
        let (rows, skipped) = parse_students("name,nim,birthdate,program,status\n".as_bytes()).unwrap();
        assert!(rows.is_empty());
        assert_eq!(skipped, 0);
    }

    #[test]
    fn derived_credentials() {
        let (rows, _) = parse_students(SAMPLE.as_bytes()).unwrap();
        assert_eq!(rows[0].default_password(), "20020315");
        assert_eq!(rows[0].email("mbkm.ulbi.ac.id"), "714220001@mbkm.ulbi.ac.id");
    }
}
