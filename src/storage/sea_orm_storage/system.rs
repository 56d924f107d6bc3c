//! 系统概览统计

use super::SeaOrmStorage;
use crate::entity::prelude::{Courses, Enrollments, SecurityEvents, Students, Users};
use crate::entity::{enrollments, security_events, users};
use crate::errors::{Result, UniSystemError};
use crate::models::enrollments::EnrollmentStatus;
use crate::models::system::SystemCounts;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect};

impl SeaOrmStorage {
    pub async fn system_counts_impl(&self) -> Result<SystemCounts> {
        let roles: Vec<(String, i64)> = Users::find()
            .select_only()
            .column(users::Column::Role)
            .column_as(users::Column::Id.count(), "count")
            .group_by(users::Column::Role)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("按角色统计用户失败", e))?;

        let total_students = Students::find()
            .count(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("统计学生失败", e))?;
        let total_courses = Courses::find()
            .count(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("统计课程失败", e))?;
        let active_enrollments = Enrollments::find()
            .filter(enrollments::Column::Status.eq(EnrollmentStatus::Enrolled.to_string()))
            .count(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("统计选课失败", e))?;
        let unresolved_security_events = SecurityEvents::find()
            .filter(security_events::Column::IsResolved.eq(false))
            .count(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("统计安全事件失败", e))?;

        Ok(SystemCounts {
            users_by_role: roles
                .into_iter()
                .map(|(role, count)| (role, count.max(0) as u64))
                .collect(),
            total_students,
            total_courses,
            active_enrollments,
            unresolved_security_events,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{seed_catalog, test_storage};

    #[tokio::test]
    async fn test_counts_reflect_seed() {
        let storage = test_storage().await;
        let seed = seed_catalog(&storage).await;
        storage
            .create_enrollment_impl(seed.student_id, seed.course_id, seed.semester_id)
            .await
            .unwrap();

        let counts = storage.system_counts_impl().await.unwrap();
        assert_eq!(counts.users_by_role.get("teacher"), Some(&1));
        assert_eq!(counts.users_by_role.get("student"), Some(&1));
        assert_eq!(counts.total_students, 1);
        assert_eq!(counts.total_courses, 1);
        assert_eq!(counts.active_enrollments, 1);
        assert_eq!(counts.unresolved_security_events, 0);
    }
}
