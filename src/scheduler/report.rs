use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::engine::{FailedRequest, ScheduledSession};

const NOON: u16 = 12 * 60;
const LATE_AFTERNOON: u16 = 15 * 60;
/// 周日到周四
const WORKING_DAYS: usize = 5;
const TEACHER_OVERLOAD_SESSIONS: usize = 20;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeDistribution {
    pub morning: usize,
    pub afternoon: usize,
    pub evening: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleStatistics {
    pub total_courses: usize,
    pub total_sessions: usize,
    pub day_distribution: [usize; 7],
    pub time_distribution: TimeDistribution,
    pub teacher_load: BTreeMap<i64, usize>,
    pub average_sessions_per_day: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleReport {
    pub schedule: Vec<ScheduledSession>,
    pub failed_requests: Vec<FailedRequest>,
    pub optimization_score: f64,
    pub statistics: ScheduleStatistics,
    pub recommendations: Vec<String>,
}

impl ScheduleReport {
    pub fn build(schedule: Vec<ScheduledSession>, failed_requests: Vec<FailedRequest>) -> Self {
        let statistics = statistics(&schedule);
        let optimization_score = optimization_score(&schedule);
        let recommendations = recommendations(&statistics, failed_requests.len());
        Self {
            schedule,
            failed_requests,
            optimization_score,
            statistics,
            recommendations,
        }
    }
}

pub fn statistics(schedule: &[ScheduledSession]) -> ScheduleStatistics {
    let mut stats = ScheduleStatistics::default();
    let mut courses: Vec<i64> = Vec::new();

    for session in schedule {
        if !courses.contains(&session.course_id) {
            courses.push(session.course_id);
        }
        stats.total_sessions += 1;
        if let Some(bucket) = stats.day_distribution.get_mut(session.slot.day as usize) {
            *bucket += 1;
        }
        *stats.teacher_load.entry(session.teacher_id).or_insert(0) += 1;

        if session.slot.start < NOON {
            stats.time_distribution.morning += 1;
        } else if session.slot.start < LATE_AFTERNOON {
            stats.time_distribution.afternoon += 1;
        } else {
            stats.time_distribution.evening += 1;
        }
    }

    stats.total_courses = courses.len();
    let working: usize = stats.day_distribution[..WORKING_DAYS].iter().sum();
    stats.average_sessions_per_day = working as f64 / WORKING_DAYS as f64;
    stats
}

/// 每次课上午 10 分、下午 7 分、傍晚 3 分，工作日负载偏离均值每单位扣 2 分，
/// 按课次平均后截断到 0..=100
pub fn optimization_score(schedule: &[ScheduledSession]) -> f64 {
    if schedule.is_empty() {
        return 0.0;
    }

    let mut total = 0.0;
    let mut per_day = [0usize; 7];
    for session in schedule {
        if let Some(bucket) = per_day.get_mut(session.slot.day as usize) {
            *bucket += 1;
        }
        total += if session.slot.start < NOON {
            10.0
        } else if session.slot.start < LATE_AFTERNOON {
            7.0
        } else {
            3.0
        };
    }

    let working = &per_day[..WORKING_DAYS];
    let mean = working.iter().sum::<usize>() as f64 / WORKING_DAYS as f64;
    for load in working {
        total -= (*load as f64 - mean).abs() * 2.0;
    }

    (total / schedule.len() as f64).clamp(0.0, 100.0)
}

pub fn recommendations(stats: &ScheduleStatistics, failed: usize) -> Vec<String> {
    let mut out = Vec::new();
    if stats.total_sessions == 0 {
        out.push(
            "No course could be scheduled; review the constraints and requirements".to_string(),
        );
        return out;
    }

    let total = stats.total_sessions as f64;
    if (stats.time_distribution.morning as f64 / total) < 0.4 {
        out.push("Schedule more courses in the morning to improve focus".to_string());
    }
    if (stats.time_distribution.evening as f64 / total) > 0.3 {
        out.push("Reduce late-afternoon courses and spread them over other periods".to_string());
    }

    let working = &stats.day_distribution[..WORKING_DAYS];
    let max_load = working.iter().copied().max().unwrap_or(0);
    let min_load = working.iter().copied().min().unwrap_or(0);
    if max_load > min_load * 2 {
        out.push("Course load is unbalanced across days; consider redistributing".to_string());
    }

    let overloaded = stats
        .teacher_load
        .values()
        .filter(|load| **load > TEACHER_OVERLOAD_SESSIONS)
        .count();
    if overloaded > 0 {
        out.push(format!(
            "{overloaded} teacher(s) exceed {TEACHER_OVERLOAD_SESSIONS} weekly sessions; consider redistributing"
        ));
    }

    if failed > 0 {
        out.push(format!(
            "{failed} course(s) could not be scheduled; relax constraints or add time slots"
        ));
    }

    if stats.total_sessions < 30 {
        out.push("The schedule is light; more courses or activities can be added".to_string());
    } else if stats.total_sessions > 100 {
        out.push("The schedule is dense; consider spreading or reducing the load".to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::TimeSlot;

    fn session(course_id: i64, teacher_id: i64, day: u8, hour: u16) -> ScheduledSession {
        ScheduledSession {
            course_id,
            course_name: format!("Course {course_id}"),
            teacher_id,
            slot: TimeSlot::new(day, hour * 60, hour * 60 + 60),
            duration_minutes: 60,
            room_type: None,
            room_id: None,
            student_groups: vec![],
        }
    }

    #[test]
    fn test_statistics() {
        let schedule = vec![
            session(1, 10, 0, 8),
            session(1, 10, 1, 13),
            session(2, 11, 1, 15),
            session(3, 11, 5, 9),
        ];
        let stats = statistics(&schedule);
        assert_eq!(stats.total_courses, 3);
        assert_eq!(stats.total_sessions, 4);
        assert_eq!(stats.day_distribution, [1, 2, 0, 0, 0, 1, 0]);
        assert_eq!(
            stats.time_distribution,
            TimeDistribution {
                morning: 2,
                afternoon: 1,
                evening: 1
            }
        );
        assert_eq!(stats.teacher_load.get(&11), Some(&2));
        // 周五不计入工作日平均
        assert!((stats.average_sessions_per_day - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_optimization_score() {
        assert_eq!(optimization_score(&[]), 0.0);

        // 每个工作日一节上午课，完全均衡
        let balanced: Vec<_> = (0..5).map(|d| session(1, 1, d, 9)).collect();
        assert_eq!(optimization_score(&balanced), 10.0);

        // 两节课都在周日下午：均值 0.4，偏差 1.6 + 4 * 0.4 = 3.2，扣 6.4
        let skewed = vec![session(1, 1, 0, 13), session(2, 1, 0, 14)];
        let expected = (14.0 - 6.4) / 2.0;
        assert!((optimization_score(&skewed) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_recommendations() {
        let empty = recommendations(&ScheduleStatistics::default(), 0);
        assert_eq!(empty.len(), 1);

        let schedule = vec![session(1, 1, 0, 15), session(1, 1, 0, 16)];
        let recs = recommendations(&statistics(&schedule), 2);
        assert!(recs.iter().any(|r| r.contains("morning")));
        assert!(recs.iter().any(|r| r.contains("late-afternoon")));
        assert!(recs.iter().any(|r| r.contains("unbalanced")));
        assert!(recs.iter().any(|r| r.contains("2 course(s)")));
        assert!(recs.iter().any(|r| r.contains("light")));
    }
}
