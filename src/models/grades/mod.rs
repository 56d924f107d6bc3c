pub mod scale;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::common::enums::define_string_enum;
use crate::models::common::pagination::deserialize_optional_i64;
use crate::models::common::{PaginatedResponse, PaginationQuery};

define_string_enum! {
    /// 成绩项类型
    pub enum GradeType {
        Assignment => "assignment",
        Quiz => "quiz",
        Midterm => "midterm",
        Final => "final",
        Project => "project",
        Participation => "participation",
    }
}

/// 一条成绩项
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grade {
    pub id: i64,
    pub enrollment_id: i64,
    pub grade_type: GradeType,
    pub title: String,
    pub points_earned: f64,
    pub points_possible: f64,
    pub weight: f64,
    pub percentage: f64,
    pub feedback: Option<String>,
    pub graded_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GradeListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub enrollment_id: Option<i64>,
    pub grade_type: Option<GradeType>,
}

#[derive(Debug, Deserialize)]
pub struct CreateGradeRequest {
    pub enrollment_id: i64,
    pub grade_type: GradeType,
    pub title: String,
    pub points_earned: f64,
    pub points_possible: f64,
    #[serde(default = "default_weight")]
    pub weight: f64,
    pub feedback: Option<String>,
}

fn default_weight() -> f64 {
    1.0
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateGradeRequest {
    pub grade_type: Option<GradeType>,
    pub title: Option<String>,
    pub points_earned: Option<f64>,
    pub points_possible: Option<f64>,
    pub weight: Option<f64>,
    pub feedback: Option<String>,
}

/// 选课下成绩汇总
#[derive(Debug, Clone, Serialize)]
pub struct GradeSummary {
    pub total_weight: f64,
    pub score: Option<f64>,
    pub letter: Option<String>,
    pub grade_points: Option<f64>,
    pub passing: Option<bool>,
}

impl GradeSummary {
    pub fn from_grades(grades: &[Grade]) -> Self {
        let items: Vec<(f64, f64, f64)> = grades
            .iter()
            .map(|g| (g.points_earned, g.points_possible, g.weight))
            .collect();
        let score = scale::weighted_score(&items).map(scale::round2);
        let letter = score.map(scale::LetterGrade::from_score);
        Self {
            total_weight: grades.iter().map(|g| g.weight).sum(),
            score,
            letter: letter.map(|l| l.to_string()),
            grade_points: letter.map(|l| l.points()),
            passing: letter.map(|l| l.is_passing()),
        }
    }
}

pub type GradeListResponse = PaginatedResponse<Grade>;

/// 校验成绩项数值
pub fn validate_grade_values(earned: f64, possible: f64, weight: f64) -> Result<(), &'static str> {
    if !earned.is_finite() || !possible.is_finite() || !weight.is_finite() {
        return Err("Grade values must be finite numbers");
    }
    if possible <= 0.0 {
        return Err("Points possible must be greater than zero");
    }
    if earned < 0.0 {
        return Err("Points earned must not be negative");
    }
    if earned > possible {
        return Err("Points earned must not exceed points possible");
    }
    if !(0.0..=1.0).contains(&weight) {
        return Err("Weight must be between 0 and 1");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grade(earned: f64, possible: f64, weight: f64) -> Grade {
        Grade {
            id: 0,
            enrollment_id: 1,
            grade_type: GradeType::Quiz,
            title: "q".into(),
            points_earned: earned,
            points_possible: possible,
            weight,
            percentage: scale::percentage(earned, possible),
            feedback: None,
            graded_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_validate_grade_values() {
        assert!(validate_grade_values(8.0, 10.0, 0.5).is_ok());
        assert!(validate_grade_values(11.0, 10.0, 0.5).is_err());
        assert!(validate_grade_values(-1.0, 10.0, 0.5).is_err());
        assert!(validate_grade_values(5.0, 0.0, 0.5).is_err());
        assert!(validate_grade_values(5.0, 10.0, 1.5).is_err());
        assert!(validate_grade_values(f64::NAN, 10.0, 0.5).is_err());
    }

    #[test]
    fn test_summary_uses_weighted_average() {
        // 0.3 * 80 + 0.7 * 95 = 90.5
        let summary = GradeSummary::from_grades(&[grade(8.0, 10.0, 0.3), grade(95.0, 100.0, 0.7)]);
        assert_eq!(summary.score, Some(90.5));
        assert_eq!(summary.letter.as_deref(), Some("A"));
        assert_eq!(summary.grade_points, Some(4.0));
        assert_eq!(summary.passing, Some(true));
    }

    #[test]
    fn test_summary_without_grades() {
        let summary = GradeSummary::from_grades(&[]);
        assert_eq!(summary.score, None);
        assert_eq!(summary.letter, None);
    }
}
