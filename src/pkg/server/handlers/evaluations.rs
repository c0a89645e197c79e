use std::sync::Arc;

use axum::{Extension, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use validator::Validate;

use crate::pkg::server::extract::{Json, Path, Query};
use crate::{
    pkg::{
        internal::{
            adaptors::{
                apply_jobs::selectors::ApplyJobSelector,
                evaluations::{
                    mutators::EvaluationMutator, selectors::EvaluationSelector,
                    spec::GradeSubmission,
                },
                master::selectors::BobotSelector,
            },
            auth::CurrentUser,
            grading::{self, GradeBreakdown},
        },
        server::{
            handlers::{Page, found, listing},
            state::{AppState, GetTxn},
        },
    },
    prelude::{AppError, Result},
};

#[derive(Debug, Default, Deserialize)]
pub struct EvaluationFilter {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct GradeInput {
    pub apply_job_id: i64,
    #[serde(alias = "score")]
    #[validate(range(min = 0.0, max = 100.0, message = "must be between 0 and 100"))]
    pub grade_score: f64,
    #[validate(length(max = 10, message = "must be a short letter grade"))]
    pub grade: Option<String>,
    #[serde(alias = "description")]
    pub grade_description: Option<String>,
    #[serde(default)]
    pub is_examiner: bool,
}

pub async fn index(
    State(state): State<AppState>,
    Query(page): Query<Page>,
    Query(filter): Query<EvaluationFilter>,
) -> Result<Json<Value>> {
    let mut conn = state.db_pool.acquire().await?;
    let mut evaluations = EvaluationSelector::new(&mut conn);
    let status = filter.status.as_deref();
    let data = evaluations.list(status, page.limit(), page.offset()).await?;
    let count = evaluations.count(status).await?;
    Ok(listing(data, count))
}

/// Records the caller's grade in the slot their role grades, then refreshes
/// the overall letter from the program's weights.
pub async fn store(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<CurrentUser>>,
    Json(input): Json<GradeInput>,
) -> Result<Json<Value>> {
    input.validate()?;
    let slots = user.slots(input.is_examiner);
    if slots.is_empty() {
        return Err(AppError::invalid("role", "your role cannot grade evaluations"));
    }

    let mut tx = state.db_pool.begin_txn().await?;
    found(
        ApplyJobSelector::new(&mut tx).get_by_id(input.apply_job_id).await?,
        "Application",
    )?;
    let submission = GradeSubmission {
        grader_id: user.id(),
        grade: input
            .grade
            .clone()
            .filter(|g| !g.trim().is_empty())
            .unwrap_or_else(|| grading::letter_for(input.grade_score).to_string()),
        score: input.grade_score,
        description: input.grade_description.clone(),
    };
    let mut evaluations = EvaluationMutator::new(&mut tx);
    evaluations.ensure_stub(input.apply_job_id).await?;
    let mut evaluation = evaluations
        .grade(input.apply_job_id, &slots, &submission)
        .await?;

    let weights = BobotSelector::new(&mut tx)
        .for_application(input.apply_job_id)
        .await?;
    if let Some(breakdown) = weights.and_then(|w| grading::calculate(&evaluation.scores(), &w.weights())) {
        evaluation = EvaluationMutator::new(&mut tx)
            .set_final_grade(evaluation.id, &breakdown.grade)
            .await?;
    }
    tx.commit().await?;

    tracing::info!(
        apply_job_id = input.apply_job_id,
        grader_id = user.id(),
        slots = ?slots,
        "evaluation graded"
    );
    Ok(Json(json!({ "message": "Evaluation saved", "data": evaluation })))
}

/// The evaluation of an application with its weighted breakdown in `meta`.
/// `meta` is null when no weights are configured or they sum to zero.
pub async fn show(State(state): State<AppState>, Path(apply_job_id): Path<i64>) -> Result<Json<Value>> {
    let mut conn = state.db_pool.acquire().await?;
    let evaluation = found(
        EvaluationSelector::new(&mut conn)
            .get_by_apply_job(apply_job_id)
            .await?,
        "Evaluation",
    )?;
    let weights = BobotSelector::new(&mut conn)
        .for_application(apply_job_id)
        .await?;
    let meta: Option<GradeBreakdown> =
        weights.and_then(|w| grading::calculate(&evaluation.scores(), &w.weights()));
    Ok(Json(json!({ "data": evaluation, "meta": meta })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scores_outside_the_scale_are_rejected() {
        for grade_score in [-1.0, 100.5] {
            let input = GradeInput {
                apply_job_id: 1,
                grade_score,
                grade: None,
                grade_description: None,
                is_examiner: false,
            };
            let err: AppError = input.validate().unwrap_err().into();
            assert!(matches!(err, AppError::Validation(ref v) if v.get("grade_score").is_some()));
        }
    }

    #[test]
    fn examiner_flag_defaults_off() {
        let input: GradeInput =
            serde_json::from_str(r#"{"apply_job_id":3,"grade_score":80}"#).unwrap();
        assert!(!input.is_examiner);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn grade_fields_use_their_wire_names() {
        let input: GradeInput = serde_json::from_str(
            r#"{"apply_job_id":3,"grade":"B","grade_score":77.5,"grade_description":"rapi","is_examiner":true}"#,
        )
        .unwrap();
        assert_eq!(input.grade_score, 77.5);
        assert_eq!(input.grade_description.as_deref(), Some("rapi"));
        assert!(input.is_examiner);
    }

    #[test]
    fn short_field_names_are_still_accepted() {
        let input: GradeInput =
            serde_json::from_str(r#"{"apply_job_id":3,"score":60,"description":"ok"}"#).unwrap();
        assert_eq!(input.grade_score, 60.0);
        assert_eq!(input.grade_description.as_deref(), Some("ok"));
    }
}
