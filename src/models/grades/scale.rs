//! 4.0 绩点制
//!
//! 百分制分数到等级与绩点的换算、按权重计算课程分数、按学分计算 GPA。

use serde::Serialize;

/// 字母等级，D 及以上为通过
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LetterGrade {
    A,
    #[serde(rename = "B+")]
    BPlus,
    B,
    #[serde(rename = "C+")]
    CPlus,
    C,
    #[serde(rename = "D+")]
    DPlus,
    D,
    F,
}

/// (下限, 等级)，按下限降序
const SCALE: [(f64, LetterGrade); 7] = [
    (90.0, LetterGrade::A),
    (85.0, LetterGrade::BPlus),
    (80.0, LetterGrade::B),
    (75.0, LetterGrade::CPlus),
    (70.0, LetterGrade::C),
    (65.0, LetterGrade::DPlus),
    (60.0, LetterGrade::D),
];

impl LetterGrade {
    pub fn from_score(score: f64) -> Self {
        SCALE
            .iter()
            .find(|(min, _)| score >= *min)
            .map(|(_, letter)| *letter)
            .unwrap_or(LetterGrade::F)
    }

    pub fn points(&self) -> f64 {
        match self {
            LetterGrade::A => 4.0,
            LetterGrade::BPlus => 3.5,
            LetterGrade::B => 3.0,
            LetterGrade::CPlus => 2.5,
            LetterGrade::C => 2.0,
            LetterGrade::DPlus => 1.5,
            LetterGrade::D => 1.0,
            LetterGrade::F => 0.0,
        }
    }

    pub fn is_passing(&self) -> bool {
        *self != LetterGrade::F
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LetterGrade::A => "A",
            LetterGrade::BPlus => "B+",
            LetterGrade::B => "B",
            LetterGrade::CPlus => "C+",
            LetterGrade::C => "C",
            LetterGrade::DPlus => "D+",
            LetterGrade::D => "D",
            LetterGrade::F => "F",
        }
    }
}

impl std::fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 得分百分比，满分为 0 时记 0
pub fn percentage(earned: f64, possible: f64) -> f64 {
    if possible > 0.0 {
        earned / possible * 100.0
    } else {
        0.0
    }
}

/// 按权重归一化的课程分数，输入为 (得分, 满分, 权重)
///
/// 没有成绩项或权重和为 0 时返回 `None`
pub fn weighted_score(items: &[(f64, f64, f64)]) -> Option<f64> {
    let total_weight: f64 = items.iter().map(|(_, _, w)| *w).sum();
    if items.is_empty() || total_weight <= 0.0 {
        return None;
    }
    let weighted: f64 = items
        .iter()
        .map(|(earned, possible, weight)| weight * percentage(*earned, *possible))
        .sum();
    Some(weighted / total_weight)
}

/// 学分加权 GPA，输入为 (学分, 最终分数)，保留两位小数
pub fn gpa(courses: &[(i32, f64)]) -> f64 {
    let total_credits: i32 = courses.iter().map(|(credits, _)| *credits).sum();
    if total_credits <= 0 {
        return 0.0;
    }
    let quality_points: f64 = courses
        .iter()
        .map(|(credits, score)| *credits as f64 * LetterGrade::from_score(*score).points())
        .sum();
    round2(quality_points / total_credits as f64)
}

/// 通过课程的学分合计
pub fn earned_credits(courses: &[(i32, f64)]) -> i32 {
    courses
        .iter()
        .filter(|(_, score)| LetterGrade::from_score(*score).is_passing())
        .map(|(credits, _)| *credits)
        .sum()
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_boundaries() {
        assert_eq!(LetterGrade::from_score(100.0), LetterGrade::A);
        assert_eq!(LetterGrade::from_score(90.0), LetterGrade::A);
        assert_eq!(LetterGrade::from_score(89.99), LetterGrade::BPlus);
        assert_eq!(LetterGrade::from_score(85.0), LetterGrade::BPlus);
        assert_eq!(LetterGrade::from_score(80.0), LetterGrade::B);
        assert_eq!(LetterGrade::from_score(75.0), LetterGrade::CPlus);
        assert_eq!(LetterGrade::from_score(70.0), LetterGrade::C);
        assert_eq!(LetterGrade::from_score(65.0), LetterGrade::DPlus);
        assert_eq!(LetterGrade::from_score(60.0), LetterGrade::D);
        assert_eq!(LetterGrade::from_score(59.9), LetterGrade::F);
        assert_eq!(LetterGrade::from_score(0.0), LetterGrade::F);
    }

    #[test]
    fn test_points_and_passing() {
        assert_eq!(LetterGrade::BPlus.points(), 3.5);
        assert_eq!(LetterGrade::DPlus.points(), 1.5);
        assert!(LetterGrade::D.is_passing());
        assert!(!LetterGrade::F.is_passing());
        assert_eq!(LetterGrade::CPlus.to_string(), "C+");
    }

    #[test]
    fn test_percentage_handles_zero_possible() {
        assert_eq!(percentage(45.0, 50.0), 90.0);
        assert_eq!(percentage(5.0, 0.0), 0.0);
    }

    #[test]
    fn test_weighted_score_normalizes_weights() {
        // 权重不必和为 1
        let score = weighted_score(&[(40.0, 50.0, 0.2), (90.0, 100.0, 0.2)]).unwrap();
        assert!((score - 85.0).abs() < 1e-9);

        assert_eq!(weighted_score(&[]), None);
        assert_eq!(weighted_score(&[(10.0, 10.0, 0.0)]), None);
    }

    #[test]
    fn test_gpa_is_credit_weighted() {
        // (3*4.0 + 4*3.0 + 2*0.0) / 9 = 2.666.. -> 2.67
        let courses = [(3, 93.0), (4, 81.0), (2, 40.0)];
        assert_eq!(gpa(&courses), 2.67);
        assert_eq!(earned_credits(&courses), 7);
        assert_eq!(gpa(&[]), 0.0);
    }
}
