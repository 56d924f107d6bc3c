use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::report::ScheduleReport;
use super::request::SchedulingRequest;
use super::slots::{TimeSlot, WorkingHours, generate_time_slots};

/// 排入课表的一次课
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledSession {
    pub course_id: i64,
    pub course_name: String,
    pub teacher_id: i64,
    pub slot: TimeSlot,
    pub duration_minutes: u16,
    pub room_type: Option<String>,
    pub room_id: Option<i64>,
    pub student_groups: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedRequest {
    pub course_id: i64,
    pub course_name: String,
    pub reason: String,
}

/// 按星期的基础权重，周日到周四优先
const DAY_WEIGHTS: [i32; 7] = [5, 5, 5, 4, 3, 1, 0];
const NOON: u16 = 12 * 60;
const LATE_AFTERNOON: u16 = 15 * 60;

pub struct Scheduler {
    slots: Vec<TimeSlot>,
}

impl Scheduler {
    pub fn new(hours: &WorkingHours) -> Self {
        Self {
            slots: generate_time_slots(hours),
        }
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    /// 为所有请求排课并生成报告
    pub fn schedule(&self, requests: Vec<SchedulingRequest>) -> ScheduleReport {
        let mut failed = Vec::new();
        let mut valid = Vec::with_capacity(requests.len());
        for request in requests {
            match request.validate() {
                Ok(()) => valid.push(request),
                Err(reason) => {
                    warn!("Rejected scheduling request for {}: {}", request.course_name, reason);
                    failed.push(FailedRequest {
                        course_id: request.course_id,
                        course_name: request.course_name,
                        reason,
                    });
                }
            }
        }

        // 稳定排序，同分保持输入顺序
        valid.sort_by_key(|r| std::cmp::Reverse(r.priority_score()));

        let mut schedule: Vec<ScheduledSession> = Vec::new();
        for request in &valid {
            match self.schedule_one(request, &schedule) {
                Ok(slots) => {
                    debug!(
                        "Scheduled {} session(s) for {}",
                        slots.len(),
                        request.course_name
                    );
                    schedule.extend(slots.into_iter().map(|slot| ScheduledSession {
                        course_id: request.course_id,
                        course_name: request.course_name.clone(),
                        teacher_id: request.teacher_id,
                        slot,
                        duration_minutes: request.duration_per_session,
                        room_type: request.required_room_type.clone(),
                        room_id: request.constraints.room_id,
                        student_groups: request.student_groups.clone(),
                    }));
                }
                Err(reason) => {
                    warn!("Failed to schedule {}: {}", request.course_name, reason);
                    failed.push(FailedRequest {
                        course_id: request.course_id,
                        course_name: request.course_name.clone(),
                        reason,
                    });
                }
            }
        }

        ScheduleReport::build(schedule, failed)
    }

    /// 为单门课挑选时间格，数量不足时整体失败
    fn schedule_one(
        &self,
        request: &SchedulingRequest,
        existing: &[ScheduledSession],
    ) -> Result<Vec<TimeSlot>, String> {
        let needed = request.sessions_per_week as usize;
        let teacher_slots: Vec<TimeSlot> = existing
            .iter()
            .filter(|s| s.teacher_id == request.teacher_id)
            .map(|s| s.slot)
            .collect();

        let mut candidates: Vec<(TimeSlot, i32)> = self
            .slots
            .iter()
            .filter(|slot| passes_basic_constraints(slot, request))
            .filter(|slot| !has_conflict(slot, request, existing))
            .filter(|slot| passes_teacher_limits(slot, request, &teacher_slots, &[]))
            .map(|slot| (*slot, slot_score(slot, request)))
            .collect();

        if candidates.len() < needed {
            return Err(format!(
                "Only {} suitable slot(s) for {} session(s) per week",
                candidates.len(),
                needed
            ));
        }

        candidates.sort_by_key(|(_, score)| std::cmp::Reverse(*score));

        let mut selected: Vec<TimeSlot> = Vec::with_capacity(needed);
        for (slot, _) in candidates {
            if selected.len() >= needed {
                break;
            }
            if selected.iter().any(|s| s.overlaps(&slot)) {
                continue;
            }
            if !passes_teacher_limits(&slot, request, &teacher_slots, &selected) {
                continue;
            }
            selected.push(slot);
        }

        if selected.len() < needed {
            return Err(format!(
                "Only {} non-conflicting slot(s) could be selected for {} session(s) per week",
                selected.len(),
                needed
            ));
        }

        selected.sort_by_key(|s| (s.day, s.start));
        Ok(selected)
    }
}

/// 星期偏好与禁排时段
fn passes_basic_constraints(slot: &TimeSlot, request: &SchedulingRequest) -> bool {
    let c = &request.constraints;
    if c.avoid_days.contains(&slot.day) {
        return false;
    }
    if !c.preferred_days.is_empty() && !c.preferred_days.contains(&slot.day) {
        return false;
    }
    !c.blackout_time_slots.iter().any(|b| b.overlaps(slot))
}

/// 与已排课程在教师、学生组或教室上冲突
fn has_conflict(slot: &TimeSlot, request: &SchedulingRequest, existing: &[ScheduledSession]) -> bool {
    existing.iter().filter(|s| s.slot.overlaps(slot)).any(|s| {
        s.teacher_id == request.teacher_id
            || s.student_groups
                .iter()
                .any(|g| request.student_groups.contains(g))
            || (request.constraints.room_id.is_some() && s.room_id == request.constraints.room_id)
    })
}

/// 教师连续授课与课间休息限制
fn passes_teacher_limits(
    slot: &TimeSlot,
    request: &SchedulingRequest,
    teacher_slots: &[TimeSlot],
    chosen: &[TimeSlot],
) -> bool {
    let same_day: Vec<TimeSlot> = teacher_slots
        .iter()
        .chain(chosen)
        .filter(|s| s.day == slot.day)
        .copied()
        .collect();

    let max_minutes = request.constraints.max_consecutive_hours as u32 * 60;
    if consecutive_run_minutes(slot, &same_day) > max_minutes {
        return false;
    }

    let min_break = request.constraints.min_break_minutes;
    same_day.iter().all(|other| {
        let gap = if other.end <= slot.start {
            slot.start - other.end
        } else if slot.end <= other.start {
            other.start - slot.end
        } else {
            // 重叠由冲突检查处理
            return true;
        };
        gap == 0 || gap >= min_break
    })
}

/// 包含该时间格的首尾相接课程链总时长（分钟）
fn consecutive_run_minutes(slot: &TimeSlot, same_day: &[TimeSlot]) -> u32 {
    let mut start = slot.start;
    let mut end = slot.end;
    let mut total = slot.duration() as u32;

    while let Some(prev) = same_day.iter().find(|s| s.end == start) {
        total += prev.duration() as u32;
        start = prev.start;
    }
    while let Some(next) = same_day.iter().find(|s| s.start == end) {
        total += next.duration() as u32;
        end = next.end;
    }
    total
}

/// 时间格得分
pub fn slot_score(slot: &TimeSlot, request: &SchedulingRequest) -> i32 {
    let mut score = 0;
    for preferred in &request.constraints.preferred_time_slots {
        if preferred.day == slot.day {
            score += 10;
            if slot.start.abs_diff(preferred.start) < 60 {
                score += 5;
            }
        }
    }
    if slot.start <= NOON {
        score += 3;
    }
    if slot.start >= LATE_AFTERNOON {
        score -= 2;
    }
    score + DAY_WEIGHTS.get(slot.day as usize).copied().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::request::SchedulingConstraint;

    fn request(course_id: i64, teacher_id: i64, sessions: u16) -> SchedulingRequest {
        SchedulingRequest {
            course_id,
            course_name: format!("Course {course_id}"),
            teacher_id,
            credit_hours: 3,
            sessions_per_week: sessions,
            duration_per_session: 60,
            required_room_type: None,
            student_groups: vec![],
            constraints: SchedulingConstraint::default(),
            priority: 1,
        }
    }

    fn scheduler() -> Scheduler {
        Scheduler::new(&WorkingHours::default())
    }

    fn sessions_of(report: &ScheduleReport, course_id: i64) -> Vec<TimeSlot> {
        report
            .schedule
            .iter()
            .filter(|s| s.course_id == course_id)
            .map(|s| s.slot)
            .collect()
    }

    #[test]
    fn test_slot_score() {
        let mut r = request(1, 1, 1);
        r.constraints.preferred_time_slots = vec![TimeSlot::new(2, 10 * 60, 11 * 60)];

        // 偏好日 + 一小时内 + 上午 + 周二权重
        assert_eq!(slot_score(&TimeSlot::new(2, 10 * 60, 11 * 60), &r), 10 + 5 + 3 + 5);
        assert_eq!(slot_score(&TimeSlot::new(2, 11 * 60, 12 * 60), &r), 10 + 3 + 5);
        // 下午三点后扣分，周四权重 3
        assert_eq!(slot_score(&TimeSlot::new(4, 15 * 60, 16 * 60), &r), -2 + 3);
        assert_eq!(slot_score(&TimeSlot::new(6, 9 * 60, 10 * 60), &r), 3);
    }

    #[test]
    fn test_single_request_prefers_early_sunday() {
        let report = scheduler().schedule(vec![request(1, 1, 2)]);
        assert!(report.failed_requests.is_empty());
        let slots = sessions_of(&report, 1);
        assert_eq!(slots.len(), 2);
        assert!(slots.iter().all(|s| s.day == 0));
        assert_eq!(slots[0].start, 8 * 60);
    }

    #[test]
    fn test_teacher_never_double_booked() {
        let requests = (1..=6).map(|id| request(id, 42, 5)).collect();
        let report = scheduler().schedule(requests);
        let teacher: Vec<TimeSlot> = report.schedule.iter().map(|s| s.slot).collect();
        for (i, a) in teacher.iter().enumerate() {
            for b in &teacher[i + 1..] {
                assert!(!a.overlaps(b), "{a} overlaps {b}");
            }
        }
    }

    #[test]
    fn test_student_group_and_room_conflicts() {
        let mut a = request(1, 1, 3);
        a.student_groups = vec!["CS-1".into()];
        a.constraints.room_id = Some(100);
        let mut b = request(2, 2, 3);
        b.student_groups = vec!["CS-1".into(), "CS-2".into()];
        let mut c = request(3, 3, 3);
        c.constraints.room_id = Some(100);

        let report = scheduler().schedule(vec![a, b, c]);
        assert!(report.failed_requests.is_empty());

        let slots_a = sessions_of(&report, 1);
        for s in sessions_of(&report, 2).iter().chain(&sessions_of(&report, 3)) {
            assert!(slots_a.iter().all(|a| !a.overlaps(s)));
        }
    }

    #[test]
    fn test_consecutive_hours_limit() {
        let mut r = request(1, 1, 8);
        r.constraints.preferred_days = vec![1];
        r.constraints.max_consecutive_hours = 2;
        r.constraints.min_break_minutes = 0;

        // 周一两段各 4 小时，每段连续不超过 2 小时时贪心最多排 6 个
        let report = scheduler().schedule(vec![r]);
        assert_eq!(report.failed_requests.len(), 1);
        assert!(report.schedule.is_empty());

        let mut r = request(1, 1, 5);
        r.constraints.preferred_days = vec![1];
        r.constraints.max_consecutive_hours = 2;
        let report = scheduler().schedule(vec![r]);
        let mut slots = sessions_of(&report, 1);
        slots.sort_by_key(|s| s.start);
        assert_eq!(slots.len(), 5);

        let mut run = 1;
        for pair in slots.windows(2) {
            run = if pair[0].end == pair[1].start { run + 1 } else { 1 };
            assert!(run <= 2);
        }
    }

    #[test]
    fn test_minimum_break_with_custom_grid() {
        // 格子为 8:00、10:15、11:15，8:00 与 10:15 间隔 75 分钟，小于最小课间 90 分钟
        let hours = WorkingHours {
            day_start: 8 * 60,
            day_end: 12 * 60 + 15,
            working_days: vec![0],
            breaks: vec![(9 * 60 + 15, 10 * 60 + 15)],
        };
        let mut r = request(1, 1, 2);
        r.constraints.min_break_minutes = 90;
        let report = Scheduler::new(&hours).schedule(vec![r]);
        let slots = sessions_of(&report, 1);
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].start, 8 * 60);
        assert_eq!(slots[1].start, 11 * 60 + 15);
    }

    #[test]
    fn test_blackout_and_avoid_days() {
        let mut r = request(1, 1, 3);
        r.constraints.avoid_days = vec![0];
        r.constraints.blackout_time_slots = vec![TimeSlot::new(1, 8 * 60, 12 * 60)];
        let report = scheduler().schedule(vec![r]);
        for slot in sessions_of(&report, 1) {
            assert_ne!(slot.day, 0);
            assert!(!(slot.day == 1 && slot.start < 12 * 60));
        }
    }

    #[test]
    fn test_failed_request_books_nothing() {
        let mut r = request(1, 1, 3);
        r.constraints.preferred_days = vec![5];
        let report = scheduler().schedule(vec![r, request(2, 2, 1)]);
        assert_eq!(report.failed_requests.len(), 1);
        assert_eq!(report.failed_requests[0].course_id, 1);
        assert!(sessions_of(&report, 1).is_empty());
        assert_eq!(sessions_of(&report, 2).len(), 1);
    }

    #[test]
    fn test_higher_priority_scheduled_first() {
        // 同一教师，两门课都只能排在周日 8:00
        let mut low = request(1, 7, 1);
        low.constraints.preferred_days = vec![0];
        low.constraints.blackout_time_slots = vec![TimeSlot::new(0, 9 * 60, 17 * 60)];
        let mut high = low.clone();
        high.course_id = 2;
        high.priority = 3;

        let report = scheduler().schedule(vec![low, high]);
        assert_eq!(sessions_of(&report, 2).len(), 1);
        assert_eq!(report.failed_requests[0].course_id, 1);
    }

    #[test]
    fn test_invalid_request_rejected() {
        let mut r = request(1, 1, 1);
        r.sessions_per_week = 0;
        let report = scheduler().schedule(vec![r]);
        assert_eq!(report.failed_requests.len(), 1);
        assert!(report.schedule.is_empty());
    }
}
