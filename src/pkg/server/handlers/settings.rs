use axum::{extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::pkg::server::extract::{Json, Query};
use crate::{
    pkg::{
        internal::{
            adaptors::master::{mutators::BobotMutator, selectors::BobotSelector},
            grading::Weights,
        },
        server::state::AppState,
    },
    prelude::{AppError, Result},
};

#[derive(Debug, Default, Deserialize)]
pub struct BobotQuery {
    pub prodi_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct BobotInput {
    pub id_program_studi: Option<i64>,
    #[serde(default)]
    pub bobot_nilai_perusahaan: f64,
    #[serde(default)]
    pub bobot_nilai_pembimbing: f64,
    #[serde(default)]
    pub bobot_nilai_penguji: f64,
}

impl BobotInput {
    pub fn weights(&self) -> Result<Weights> {
        let weights = Weights::new(
            self.bobot_nilai_perusahaan,
            self.bobot_nilai_pembimbing,
            self.bobot_nilai_penguji,
        );
        if !weights.is_valid() {
            return Err(AppError::invalid("bobot_nilai", "weights must not be negative"));
        }
        Ok(weights)
    }
}

/// Weights of one program, or the first configured set without `prodi_id`.
pub async fn bobot_show(
    State(state): State<AppState>,
    Query(query): Query<BobotQuery>,
) -> Result<Json<Value>> {
    let mut conn = state.db_pool.acquire().await?;
    let mut bobot = BobotSelector::new(&mut conn);
    let row = match query.prodi_id {
        Some(prodi_id) => bobot.for_prodi(prodi_id).await?,
        None => bobot.first_configured().await?,
    };
    Ok(Json(json!({ "data": row })))
}

pub async fn bobot_store(
    State(state): State<AppState>,
    Json(input): Json<BobotInput>,
) -> Result<(StatusCode, Json<Value>)> {
    let prodi_id = input
        .id_program_studi
        .ok_or_else(|| AppError::invalid("id_program_studi", "id_program_studi is required"))?;
    let weights = input.weights()?;
    let mut conn = state.db_pool.acquire().await?;
    let saved = BobotMutator::new(&mut conn).upsert(prodi_id, &weights).await?;
    tracing::info!(prodi_id, inserted = saved.inserted, "grade weights saved");
    let status = if saved.inserted { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(json!({ "message": "Bobot nilai saved", "data": saved.entry }))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_weights_are_rejected() {
        let input: BobotInput = serde_json::from_str(
            r#"{"id_program_studi":1,"bobot_nilai_perusahaan":-5,"bobot_nilai_pembimbing":50,"bobot_nilai_penguji":55}"#,
        )
        .unwrap();
        assert!(matches!(input.weights(), Err(AppError::Validation(_))));
    }

    #[test]
    fn missing_weights_default_to_zero() {
        let input: BobotInput =
            serde_json::from_str(r#"{"id_program_studi":1,"bobot_nilai_penguji":40}"#).unwrap();
        let weights = input.weights().unwrap();
        assert_eq!(weights.total(), 40.0);
    }
}
