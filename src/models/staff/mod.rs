//! 教职工档案

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::common::enums::define_string_enum;
use crate::models::common::pagination::deserialize_optional_i64;
use crate::models::common::{PaginatedResponse, PaginationQuery};

define_string_enum! {
    /// 用工类型
    pub enum EmploymentType {
        FullTime => "full_time",
        PartTime => "part_time",
        Contract => "contract",
        Temporary => "temporary",
    }
}

define_string_enum! {
    pub enum StaffStatus {
        Active => "active",
        OnLeave => "on_leave",
        Resigned => "resigned",
        Terminated => "terminated",
    }
}

define_string_enum! {
    /// 教师职称，仅教师账号可设置
    pub enum AcademicRank {
        Lecturer => "lecturer",
        AssistantProfessor => "assistant_professor",
        AssociateProfessor => "associate_professor",
        Professor => "professor",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: i64,
    pub user_id: i64,
    pub employee_number: String,
    pub department_id: Option<i64>,
    pub position: String,
    pub employment_type: EmploymentType,
    pub hire_date: NaiveDate,
    pub salary_cents: i64,
    pub status: StaffStatus,
    pub academic_rank: Option<AcademicRank>,
    pub specialization: Option<String>,
    pub office_hours: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StaffListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub department_id: Option<i64>,
    pub status: Option<StaffStatus>,
    pub employment_type: Option<EmploymentType>,
    /// 按工号或职位搜索
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateStaffRequest {
    pub user_id: i64,
    pub employee_number: String,
    pub department_id: Option<i64>,
    pub position: String,
    pub employment_type: EmploymentType,
    pub hire_date: NaiveDate,
    #[serde(default)]
    pub salary_cents: i64,
    pub academic_rank: Option<AcademicRank>,
    pub specialization: Option<String>,
    pub office_hours: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateStaffRequest {
    pub employee_number: Option<String>,
    pub department_id: Option<i64>,
    pub position: Option<String>,
    pub employment_type: Option<EmploymentType>,
    pub hire_date: Option<NaiveDate>,
    pub salary_cents: Option<i64>,
    pub status: Option<StaffStatus>,
    pub academic_rank: Option<AcademicRank>,
    pub specialization: Option<String>,
    pub office_hours: Option<String>,
}

pub type StaffListResponse = PaginatedResponse<StaffMember>;

/// 存储格式 `YYYY-MM-DD`
pub(crate) const HIRE_DATE_FORMAT: &str = "%Y-%m-%d";
