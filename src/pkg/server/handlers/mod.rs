use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::pkg::server::extract::Json;
use crate::prelude::{AppError, Result};

pub mod activities;
pub mod apply_jobs;
pub mod articles;
pub mod auth;
pub mod companies;
pub mod dashboard;
pub mod evaluations;
pub mod import;
pub mod jobs;
pub mod konversi;
pub mod master;
pub mod probes;
pub mod reports;
pub mod roles;
pub mod settings;
pub mod users;

const DEFAULT_PER_PAGE: i64 = 10;
const MAX_PER_PAGE: i64 = 100;

/// `?page=&per_page=` query shared by every listing.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Page {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Page {
    pub fn limit(&self) -> i64 {
        self.per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE)
    }

    pub fn offset(&self) -> i64 {
        (self.page.unwrap_or(1).max(1) - 1) * self.limit()
    }
}

pub fn listing<T: Serialize>(data: Vec<T>, count: i64) -> Json<Value> {
    Json(json!({ "data": data, "count": count }))
}

/// Turns an empty mutator result into a 404 for `what`.
pub fn found<T>(row: Option<T>, what: &str) -> Result<T> {
    row.ok_or_else(|| AppError::not_found(what))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_defaults() {
        let page = Page::default();
        assert_eq!(page.limit(), 10);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn per_page_is_clamped() {
        let page = Page { page: Some(3), per_page: Some(500) };
        assert_eq!(page.limit(), 100);
        assert_eq!(page.offset(), 200);
        let page = Page { page: Some(0), per_page: Some(0) };
        assert_eq!(page.limit(), 1);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn missing_rows_become_not_found() {
        let err = found::<i64>(None, "Job").unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m == "Job not found"));
        assert_eq!(found(Some(4), "Job").unwrap(), 4);
    }
}
