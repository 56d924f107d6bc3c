pub mod advisor;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::common::enums::define_string_enum;

define_string_enum! {
    /// 学业风险等级
    pub enum RiskLevel {
        Low => "low",
        Medium => "medium",
        High => "high",
        Critical => "critical",
    }
}

impl RiskLevel {
    /// 高风险及以上需要人工干预
    pub fn needs_intervention(&self) -> bool {
        matches!(self, RiskLevel::High | RiskLevel::Critical)
    }
}

/// 预测输入，gpa 为 4 分制，其余为 0..=1 的比率
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PerformanceMetrics {
    pub gpa: f64,
    pub attendance: f64,
    pub coursework: f64,
    pub participation: f64,
}

/// 单门在读课程的表现预测
#[derive(Debug, Clone, Serialize)]
pub struct CoursePrediction {
    pub enrollment_id: i64,
    pub course_id: i64,
    pub course_code: String,
    pub course_name: String,
    pub predicted_grade: &'static str,
    pub success_probability: f64,
    pub risk_level: RiskLevel,
    pub intervention_needed: bool,
    pub recommendations: Vec<String>,
    pub metrics: PerformanceMetrics,
}

/// 推荐选修的课程
#[derive(Debug, Clone, Serialize)]
pub struct CourseRecommendation {
    pub course_id: i64,
    pub course_code: String,
    pub course_name: String,
    pub credit_hours: i32,
    pub priority_score: f64,
    pub reasoning: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentInsights {
    pub student_id: i64,
    pub cumulative_gpa: Option<f64>,
    pub predictions: Vec<CoursePrediction>,
    pub recommendations: Vec<CourseRecommendation>,
    pub generated_at: DateTime<Utc>,
}
