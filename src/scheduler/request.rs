use serde::{Deserialize, Serialize};

use super::slots::{SLOT_MINUTES, TimeSlot};

/// 单门课的排课约束
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulingConstraint {
    /// 指定教室，参与教室冲突检查
    pub room_id: Option<i64>,
    pub preferred_time_slots: Vec<TimeSlot>,
    pub blackout_time_slots: Vec<TimeSlot>,
    pub max_consecutive_hours: u16,
    pub min_break_minutes: u16,
    pub preferred_days: Vec<u8>,
    pub avoid_days: Vec<u8>,
}

impl Default for SchedulingConstraint {
    fn default() -> Self {
        Self {
            room_id: None,
            preferred_time_slots: Vec::new(),
            blackout_time_slots: Vec::new(),
            max_consecutive_hours: 3,
            min_break_minutes: 15,
            preferred_days: Vec::new(),
            avoid_days: Vec::new(),
        }
    }
}

/// 排课请求，priority 取 1 普通、2 高、3 紧急
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulingRequest {
    pub course_id: i64,
    pub course_name: String,
    pub teacher_id: i64,
    pub credit_hours: u16,
    pub sessions_per_week: u16,
    #[serde(default = "default_duration")]
    pub duration_per_session: u16,
    #[serde(default)]
    pub required_room_type: Option<String>,
    #[serde(default)]
    pub student_groups: Vec<String>,
    #[serde(default)]
    pub constraints: SchedulingConstraint,
    #[serde(default = "default_priority")]
    pub priority: u8,
}

fn default_duration() -> u16 {
    SLOT_MINUTES
}

fn default_priority() -> u8 {
    1
}

impl SchedulingRequest {
    /// 排序得分，高者先排
    pub fn priority_score(&self) -> i64 {
        self.priority as i64 * 1000
            + self.credit_hours as i64 * 100
            + self.constraints.preferred_time_slots.len() as i64 * 10
            + self.constraints.blackout_time_slots.len() as i64 * 5
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.course_name.trim().is_empty() {
            return Err("Course name must not be empty".to_string());
        }
        if self.sessions_per_week == 0 {
            return Err("sessions_per_week must be at least 1".to_string());
        }
        if !(1..=3).contains(&self.priority) {
            return Err(format!("Priority {} is outside 1..=3", self.priority));
        }
        if self.duration_per_session == 0 || self.duration_per_session > SLOT_MINUTES {
            return Err(format!(
                "duration_per_session must be between 1 and {SLOT_MINUTES} minutes"
            ));
        }
        if self.constraints.max_consecutive_hours == 0 {
            return Err("max_consecutive_hours must be at least 1".to_string());
        }
        let constraint_slots = self
            .constraints
            .preferred_time_slots
            .iter()
            .chain(&self.constraints.blackout_time_slots);
        for slot in constraint_slots {
            if !slot.is_valid() {
                return Err(format!("Invalid constraint slot: {slot}"));
            }
        }
        let days = self
            .constraints
            .preferred_days
            .iter()
            .chain(&self.constraints.avoid_days);
        if let Some(day) = days.into_iter().find(|d| **d > 6) {
            return Err(format!("Invalid day {day}, expected 0..=6"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(course_id: i64, teacher_id: i64) -> SchedulingRequest {
        SchedulingRequest {
            course_id,
            course_name: format!("Course {course_id}"),
            teacher_id,
            credit_hours: 3,
            sessions_per_week: 2,
            duration_per_session: 60,
            required_room_type: None,
            student_groups: vec![],
            constraints: SchedulingConstraint::default(),
            priority: 1,
        }
    }

    #[test]
    fn test_priority_score() {
        let mut r = request(1, 1);
        r.priority = 2;
        r.credit_hours = 4;
        r.constraints.preferred_time_slots = vec![TimeSlot::new(0, 480, 540)];
        r.constraints.blackout_time_slots =
            vec![TimeSlot::new(1, 480, 540), TimeSlot::new(2, 480, 540)];
        assert_eq!(r.priority_score(), 2000 + 400 + 10 + 10);
    }

    #[test]
    fn test_validation() {
        assert!(request(1, 1).validate().is_ok());

        let mut r = request(1, 1);
        r.sessions_per_week = 0;
        assert!(r.validate().is_err());

        let mut r = request(1, 1);
        r.course_name = "  ".into();
        assert!(r.validate().is_err());

        let mut r = request(1, 1);
        r.priority = 4;
        assert!(r.validate().is_err());

        let mut r = request(1, 1);
        r.constraints.blackout_time_slots = vec![TimeSlot::new(1, 600, 540)];
        assert!(r.validate().is_err());
    }

    #[test]
    fn test_defaults_from_json() {
        let r: SchedulingRequest = serde_json::from_str(
            r#"{"course_id":7,"course_name":"Algorithms","teacher_id":3,
                "credit_hours":3,"sessions_per_week":2}"#,
        )
        .unwrap();
        assert_eq!(r.priority, 1);
        assert_eq!(r.duration_per_session, 60);
        assert_eq!(r.constraints.max_consecutive_hours, 3);
        assert_eq!(r.constraints.min_break_minutes, 15);
    }
}
