use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::common::enums::define_string_enum;
use crate::models::common::pagination::deserialize_optional_bool;
use crate::models::common::{PaginatedResponse, PaginationQuery};

define_string_enum! {
    /// 学期类型
    pub enum Term {
        Fall => "fall",
        Spring => "spring",
        Summer => "summer",
    }
}

/// 学期
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Semester {
    pub id: i64,
    pub name: String,
    pub term: Term,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub registration_start: DateTime<Utc>,
    pub registration_end: DateTime<Utc>,
    pub is_current: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Semester {
    /// 选课窗口（含边界）
    pub fn is_registration_open(&self, now: DateTime<Utc>) -> bool {
        self.registration_start <= now && now <= self.registration_end
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SemesterListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    pub term: Option<Term>,
    #[serde(default, deserialize_with = "deserialize_optional_bool")]
    pub is_current: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSemesterRequest {
    pub name: String,
    pub term: Term,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub registration_start: DateTime<Utc>,
    pub registration_end: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateSemesterRequest {
    pub name: Option<String>,
    pub term: Option<Term>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub registration_start: Option<DateTime<Utc>>,
    pub registration_end: Option<DateTime<Utc>>,
}

pub type SemesterListResponse = PaginatedResponse<Semester>;

/// 校验学期日期：开始早于结束，选课开始不晚于选课结束
pub fn validate_semester_dates(
    start_at: DateTime<Utc>,
    end_at: DateTime<Utc>,
    registration_start: DateTime<Utc>,
    registration_end: DateTime<Utc>,
) -> Result<(), &'static str> {
    if start_at >= end_at {
        return Err("Semester start must be before its end");
    }
    if registration_start > registration_end {
        return Err("Registration start must not be after registration end");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, day, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_date_validation() {
        assert!(validate_semester_dates(at(10), at(20), at(1), at(9)).is_ok());
        assert!(validate_semester_dates(at(20), at(20), at(1), at(9)).is_err());
        assert!(validate_semester_dates(at(10), at(20), at(9), at(1)).is_err());
        // 选课窗口可以是单日
        assert!(validate_semester_dates(at(10), at(20), at(5), at(5)).is_ok());
    }

    #[test]
    fn test_registration_window_is_inclusive() {
        let semester = Semester {
            id: 1,
            name: "Fall 2025".into(),
            term: Term::Fall,
            start_at: at(10),
            end_at: at(30),
            registration_start: at(1),
            registration_end: at(9),
            is_current: true,
            created_at: at(1),
            updated_at: at(1),
        };
        assert!(semester.is_registration_open(at(1)));
        assert!(semester.is_registration_open(at(9)));
        assert!(!semester.is_registration_open(at(10)));
    }
}
