//! 学业预警与选课推荐
//!
//! 加权规则模型：GPA、出勤率、作业完成度与课堂参与度按固定权重合成 4 分制得分，
//! 再映射为预测等级、通过概率与风险等级。缺少数据的指标取中性值。

use std::collections::HashSet;

use super::{CourseRecommendation, PerformanceMetrics, RiskLevel};
use crate::models::attendance::{AttendanceRecord, AttendanceStatus};
use crate::models::courses::Course;
use crate::models::grades::scale::round2;

pub const GPA_WEIGHT: f64 = 0.4;
pub const ATTENDANCE_WEIGHT: f64 = 0.3;
pub const COURSEWORK_WEIGHT: f64 = 0.2;
pub const PARTICIPATION_WEIGHT: f64 = 0.1;

/// 尚无已出分课程时使用的 GPA
pub const NEUTRAL_GPA: f64 = 2.0;
/// 尚无考勤或成绩项时使用的比率
pub const NEUTRAL_RATE: f64 = 0.8;
/// 出勤一次的满分积分
const FULL_ATTENDANCE_POINTS: f64 = 10.0;

pub const RECOMMENDATION_LIMIT: usize = 10;

/// 由成绩单 GPA、本课程考勤记录与成绩项得分构造指标
pub fn course_metrics(
    gpa: Option<f64>,
    records: &[AttendanceRecord],
    coursework_score: Option<f64>,
) -> PerformanceMetrics {
    let (attendance, participation) = if records.is_empty() {
        (NEUTRAL_RATE, NEUTRAL_RATE)
    } else {
        let total = records.len() as f64;
        let attended = records
            .iter()
            .filter(|r| matches!(r.status, AttendanceStatus::Present | AttendanceStatus::Late))
            .count() as f64;
        let points: f64 = records.iter().map(|r| r.points).sum();
        (
            attended / total,
            (points / (total * FULL_ATTENDANCE_POINTS)).clamp(0.0, 1.0),
        )
    };

    PerformanceMetrics {
        gpa: gpa.unwrap_or(NEUTRAL_GPA).clamp(0.0, 4.0),
        attendance,
        coursework: coursework_score
            .map(|score| (score / 100.0).clamp(0.0, 1.0))
            .unwrap_or(NEUTRAL_RATE),
        participation,
    }
}

/// 4 分制加权得分，比率类指标先放大到 4 分制
pub fn weighted_score(m: &PerformanceMetrics) -> f64 {
    m.gpa * GPA_WEIGHT
        + m.attendance * ATTENDANCE_WEIGHT * 4.0
        + m.coursework * COURSEWORK_WEIGHT * 4.0
        + m.participation * PARTICIPATION_WEIGHT * 4.0
}

pub fn predicted_grade(score: f64) -> &'static str {
    match score {
        s if s >= 3.7 => "A",
        s if s >= 3.3 => "B+",
        s if s >= 3.0 => "B",
        s if s >= 2.7 => "C+",
        s if s >= 2.3 => "C",
        s if s >= 2.0 => "D+",
        s if s >= 1.7 => "D",
        _ => "F",
    }
}

pub fn success_probability(score: f64) -> f64 {
    round2((score / 4.0).clamp(0.0, 1.0))
}

pub fn risk_level(probability: f64) -> RiskLevel {
    match probability {
        p if p < 0.5 => RiskLevel::Critical,
        p if p < 0.65 => RiskLevel::High,
        p if p < 0.8 => RiskLevel::Medium,
        _ => RiskLevel::Low,
    }
}

pub fn recommendations(m: &PerformanceMetrics, risk: RiskLevel) -> Vec<String> {
    let mut advice = Vec::new();
    if m.attendance < 0.8 {
        advice.push("Improve attendance: it is below 80%".to_string());
    }
    if m.coursework < 0.7 {
        advice.push("Catch up on coursework: graded work is below 70%".to_string());
    }
    if m.participation < 0.5 {
        advice.push("Participate more in class".to_string());
    }
    if risk.needs_intervention() {
        advice.extend(
            [
                "Ask the course teacher for help",
                "Join a study group",
                "Book extra sessions with an academic advisor",
            ]
            .map(String::from),
        );
    }
    advice
}

/// 选课优先级：基础分 0.3，本院系课程 +0.4，学分负担适合当前 GPA +0.3（否则 +0.1）
pub fn course_priority(course: &Course, department_id: i64, gpa: Option<f64>) -> f64 {
    let gpa = gpa.unwrap_or(NEUTRAL_GPA);
    let comfortable_credits = if gpa >= 3.0 {
        i32::MAX
    } else if gpa >= 2.0 {
        3
    } else {
        2
    };

    let mut score = 0.3;
    if course.department_id == department_id {
        score += 0.4;
    }
    score += if course.credit_hours <= comfortable_credits {
        0.3
    } else {
        0.1
    };
    round2(score)
}

pub fn reasoning(priority: f64) -> &'static str {
    if priority > 0.8 {
        "Strong fit for your department and current academic standing"
    } else if priority > 0.6 {
        "Good fit that complements your studies"
    } else {
        "Suitable elective to broaden your knowledge"
    }
}

/// 排除已修或在修课程，按优先级降序、课程代码升序取前 `limit` 门
pub fn recommend_courses(
    candidates: &[Course],
    taken: &HashSet<i64>,
    department_id: i64,
    gpa: Option<f64>,
    limit: usize,
) -> Vec<CourseRecommendation> {
    let mut ranked: Vec<CourseRecommendation> = candidates
        .iter()
        .filter(|course| !taken.contains(&course.id))
        .map(|course| {
            let priority = course_priority(course, department_id, gpa);
            CourseRecommendation {
                course_id: course.id,
                course_code: course.code.clone(),
                course_name: course.name.clone(),
                credit_hours: course.credit_hours,
                priority_score: priority,
                reasoning: reasoning(priority),
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.priority_score
            .total_cmp(&a.priority_score)
            .then_with(|| a.course_code.cmp(&b.course_code))
    });
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attendance::AttendanceMethod;
    use chrono::Utc;

    fn record(status: AttendanceStatus, points: f64) -> AttendanceRecord {
        AttendanceRecord {
            id: 1,
            session_id: 1,
            student_id: 1,
            status,
            method: AttendanceMethod::Manual,
            arrival_time: None,
            points,
            notes: None,
            qr_code_id: None,
            recorded_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn course(id: i64, code: &str, department_id: i64, credit_hours: i32) -> Course {
        Course {
            id,
            department_id,
            code: code.to_string(),
            name: format!("Course {code}"),
            description: None,
            credit_hours,
            teacher_id: None,
            max_students: 30,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_metrics_from_records() {
        let records = [
            record(AttendanceStatus::Present, 10.0),
            record(AttendanceStatus::Late, 6.0),
            record(AttendanceStatus::Absent, 0.0),
            record(AttendanceStatus::Present, 10.0),
        ];
        let m = course_metrics(Some(3.5), &records, Some(85.0));
        assert_eq!(m.gpa, 3.5);
        assert_eq!(m.attendance, 0.75);
        assert_eq!(m.coursework, 0.85);
        assert!((m.participation - 0.65).abs() < 1e-9);
    }

    #[test]
    fn test_missing_data_is_neutral() {
        let m = course_metrics(None, &[], None);
        assert_eq!(m.gpa, NEUTRAL_GPA);
        assert_eq!(m.attendance, NEUTRAL_RATE);
        assert_eq!(m.coursework, NEUTRAL_RATE);
        assert_eq!(m.participation, NEUTRAL_RATE);
        // 0.8 + 0.96 + 0.64 + 0.32
        assert!((weighted_score(&m) - 2.72).abs() < 1e-9);
        assert_eq!(predicted_grade(weighted_score(&m)), "C+");
        assert_eq!(risk_level(success_probability(weighted_score(&m))), RiskLevel::Medium);
        assert!(recommendations(&m, RiskLevel::Medium).is_empty());
    }

    #[test]
    fn test_strong_student_is_low_risk() {
        let m = PerformanceMetrics {
            gpa: 4.0,
            attendance: 1.0,
            coursework: 0.95,
            participation: 1.0,
        };
        let score = weighted_score(&m);
        assert_eq!(predicted_grade(score), "A");
        assert_eq!(success_probability(score), 0.99);
        assert_eq!(risk_level(success_probability(score)), RiskLevel::Low);
    }

    #[test]
    fn test_struggling_student_gets_intervention_advice() {
        let m = PerformanceMetrics {
            gpa: 1.2,
            attendance: 0.5,
            coursework: 0.4,
            participation: 0.3,
        };
        let score = weighted_score(&m);
        assert_eq!(predicted_grade(score), "F");
        let risk = risk_level(success_probability(score));
        assert_eq!(risk, RiskLevel::Critical);
        assert!(risk.needs_intervention());

        let advice = recommendations(&m, risk);
        assert_eq!(advice.len(), 6);
        assert!(advice[0].contains("attendance"));
        assert!(advice.iter().any(|a| a.contains("study group")));
    }

    #[test]
    fn test_grade_and_risk_boundaries() {
        assert_eq!(predicted_grade(3.7), "A");
        assert_eq!(predicted_grade(3.69), "B+");
        assert_eq!(predicted_grade(2.0), "D+");
        assert_eq!(predicted_grade(1.69), "F");
        assert_eq!(risk_level(0.49), RiskLevel::Critical);
        assert_eq!(risk_level(0.5), RiskLevel::High);
        assert_eq!(risk_level(0.65), RiskLevel::Medium);
        assert_eq!(risk_level(0.8), RiskLevel::Low);
    }

    #[test]
    fn test_recommendations_rank_department_and_load() {
        let candidates = [
            course(1, "CS101", 1, 3),
            course(2, "CS201", 1, 4),
            course(3, "MA101", 2, 3),
            course(4, "CS102", 1, 3),
        ];
        let taken: HashSet<i64> = [4].into_iter().collect();

        let ranked = recommend_courses(&candidates, &taken, 1, Some(2.5), RECOMMENDATION_LIMIT);
        let codes: Vec<&str> = ranked.iter().map(|r| r.course_code.as_str()).collect();
        assert_eq!(codes, vec!["CS101", "CS201", "MA101"]);
        assert_eq!(ranked[0].priority_score, 1.0);
        assert_eq!(ranked[1].priority_score, 0.8);
        assert_eq!(ranked[2].priority_score, 0.6);
        assert_eq!(ranked[2].reasoning, "Suitable elective to broaden your knowledge");

        // 高 GPA 不受学分负担限制
        let strong = recommend_courses(&candidates, &taken, 1, Some(3.6), 2);
        assert_eq!(strong.len(), 2);
        assert!(strong.iter().all(|r| r.priority_score == 1.0));
    }
}
