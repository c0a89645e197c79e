//! Weighted final-grade computation for an internship evaluation.
//!
//! Three graders (company, supervising lecturer, examiner) each submit a score
//! independently. The final grade blends them with the weight set configured
//! for the student's program.

use serde::Serialize;

/// Letter shown while at least one grader has not submitted yet.
pub const NOT_GRADED: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub company: f64,
    pub lecturer: f64,
    pub examiner: f64,
}

impl Weights {
    pub fn new(company: f64, lecturer: f64, examiner: f64) -> Self {
        Weights {
            company,
            lecturer,
            examiner,
        }
    }

    pub fn total(&self) -> f64 {
        self.company + self.lecturer + self.examiner
    }

    pub fn is_valid(&self) -> bool {
        [self.company, self.lecturer, self.examiner]
            .iter()
            .all(|w| w.is_finite() && *w >= 0.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ComponentScores {
    pub company: Option<f64>,
    pub lecturer: Option<f64>,
    pub examiner: Option<f64>,
}

impl ComponentScores {
    pub fn is_complete(&self) -> bool {
        self.company.is_some() && self.lecturer.is_some() && self.examiner.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeBreakdown {
    pub company_score: f64,
    pub lecturer_score: f64,
    pub examiner_score: f64,
    pub total_score: f64,
    pub grade: String,
}

/// Blends the component scores. Returns `None` when the weights sum to zero,
/// since there is nothing to normalize against.
///
/// A component counts as graded once its score is present, so a submitted 0
/// still completes the set.
pub fn calculate(scores: &ComponentScores, weights: &Weights) -> Option<GradeBreakdown> {
    let total_weight = weights.total();
    if total_weight == 0.0 || !total_weight.is_finite() {
        return None;
    }

    let contribution = |score: Option<f64>, weight: f64| {
        score.map(|s| s * (weight / total_weight)).unwrap_or(0.0)
    };
    let company_score = contribution(scores.company, weights.company);
    let lecturer_score = contribution(scores.lecturer, weights.lecturer);
    let examiner_score = contribution(scores.examiner, weights.examiner);
    let total_score = company_score + lecturer_score + examiner_score;

    let grade = if scores.is_complete() {
        letter_for(total_score).to_string()
    } else {
        NOT_GRADED.to_string()
    };

    Some(GradeBreakdown {
        company_score,
        lecturer_score,
        examiner_score,
        total_score,
        grade,
    })
}

pub fn letter_for(total: f64) -> &'static str {
    if total >= 85.0 {
        "A"
    } else if total >= 70.0 {
        "B"
    } else if total >= 55.0 {
        "C"
    } else if total >= 40.0 {
        "D"
    } else {
        "E"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all(score: f64) -> ComponentScores {
        ComponentScores {
            company: Some(score),
            lecturer: Some(score),
            examiner: Some(score),
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn zero_weight_total_yields_nothing() {
        let weights = Weights::new(0.0, 0.0, 0.0);
        assert_eq!(calculate(&all(90.0), &weights), None);
        assert_eq!(calculate(&ComponentScores::default(), &weights), None);
    }

    #[test]
    fn equal_weights_high_scores_grade_a() {
        let result = calculate(&all(90.0), &Weights::new(1.0, 1.0, 1.0)).unwrap();
        assert!(approx(result.total_score, 90.0));
        assert_eq!(result.grade, "A");
    }

    #[test]
    fn equal_weights_sixty_grades_c() {
        let result = calculate(&all(60.0), &Weights::new(1.0, 1.0, 1.0)).unwrap();
        assert!(approx(result.total_score, 60.0));
        assert_eq!(result.grade, "C");
    }

    #[test]
    fn any_missing_component_is_not_graded() {
        let weights = Weights::new(30.0, 30.0, 40.0);
        let missing = [
            ComponentScores { company: None, ..all(95.0) },
            ComponentScores { lecturer: None, ..all(95.0) },
            ComponentScores { examiner: None, ..all(95.0) },
        ];
        for scores in missing {
            let result = calculate(&scores, &weights).unwrap();
            assert_eq!(result.grade, NOT_GRADED);
        }
    }

    #[test]
    fn missing_component_contributes_zero_to_total() {
        let scores = ComponentScores {
            company: Some(80.0),
            lecturer: Some(80.0),
            examiner: None,
        };
        let result = calculate(&scores, &Weights::new(1.0, 1.0, 2.0)).unwrap();
        assert!(approx(result.company_score, 20.0));
        assert!(approx(result.lecturer_score, 20.0));
        assert!(approx(result.examiner_score, 0.0));
        assert!(approx(result.total_score, 40.0));
    }

    #[test]
    fn weights_need_not_sum_to_hundred() {
        let scores = ComponentScores {
            company: Some(100.0),
            lecturer: Some(50.0),
            examiner: Some(50.0),
        };
        let result = calculate(&scores, &Weights::new(2.0, 1.0, 1.0)).unwrap();
        assert!(approx(result.company_score, 50.0));
        assert!(approx(result.total_score, 75.0));
        assert_eq!(result.grade, "B");
    }

    #[test]
    fn submitted_zero_counts_as_graded() {
        let scores = ComponentScores {
            company: Some(0.0),
            lecturer: Some(90.0),
            examiner: Some(90.0),
        };
        let result = calculate(&scores, &Weights::new(1.0, 1.0, 1.0)).unwrap();
        assert!(approx(result.total_score, 60.0));
        assert_eq!(result.grade, "C");
    }

    #[test]
    fn zero_weight_component_still_completes_when_scored() {
        let result = calculate(&all(88.0), &Weights::new(1.0, 1.0, 0.0)).unwrap();
        assert!(approx(result.examiner_score, 0.0));
        assert_eq!(result.grade, "A");
    }

    #[test]
    fn letter_boundaries() {
        assert_eq!(letter_for(85.0), "A");
        assert_eq!(letter_for(84.999), "B");
        assert_eq!(letter_for(70.0), "B");
        assert_eq!(letter_for(69.9), "C");
        assert_eq!(letter_for(55.0), "C");
        assert_eq!(letter_for(54.9), "D");
        assert_eq!(letter_for(40.0), "D");
        assert_eq!(letter_for(39.9), "E");
        assert_eq!(letter_for(0.0), "E");
    }

    #[test]
    fn negative_weights_are_invalid() {
        assert!(Weights::new(1.0, 0.0, 2.0).is_valid());
        assert!(!Weights::new(-1.0, 1.0, 1.0).is_valid());
        assert!(!Weights::new(f64::NAN, 1.0, 1.0).is_valid());
    }
}
