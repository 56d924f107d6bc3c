//! 选课存储操作

use chrono::{DateTime, Utc};

use super::SeaOrmStorage;
use super::semesters::semester_at;
use crate::entity::courses::Entity as Courses;
use crate::entity::enrollments::{ActiveModel, Column, Entity as Enrollments};
use crate::entity::students::{Column as StudentColumn, Entity as Students};
use crate::errors::{Result, UniSystemError};
use crate::models::PaginatedResponse;
use crate::models::enrollments::{
    Enrollment, EnrollmentListParams, EnrollmentListResponse, EnrollmentStatus,
    UpdateEnrollmentRequest,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建选课，名额检查与写入在同一事务内完成
    ///
    /// 课程已满返回 `Exhausted`，重复的 (学生, 课程, 学期) 由唯一索引拒绝。
    pub async fn create_enrollment_impl(
        &self,
        student_id: i64,
        course_id: i64,
        semester_id: i64,
    ) -> Result<Enrollment> {
        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| UniSystemError::from_db("开启事务失败", e))?;

        reserve_seat(&txn, course_id, semester_id).await?;

        let model = ActiveModel {
            student_id: Set(student_id),
            course_id: Set(course_id),
            semester_id: Set(semester_id),
            status: Set(EnrollmentStatus::Enrolled.to_string()),
            final_score: Set(None),
            enrolled_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&txn)
            .await
            .map_err(|e| UniSystemError::from_db("创建选课记录失败", e))?;

        txn.commit()
            .await
            .map_err(|e| UniSystemError::from_db("提交事务失败", e))?;

        Ok(result.into_enrollment())
    }

    pub async fn get_enrollment_by_id_impl(&self, id: i64) -> Result<Option<Enrollment>> {
        let result = Enrollments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("查询选课记录失败", e))?;

        Ok(result.map(|m| m.into_enrollment()))
    }

    pub async fn list_enrollments_with_pagination_impl(
        &self,
        query: EnrollmentListParams,
    ) -> Result<EnrollmentListResponse> {
        let (page, size) = query.pagination.normalized();
        let mut select = Enrollments::find();

        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(course_id) = query.course_id {
            select = select.filter(Column::CourseId.eq(course_id));
        }
        if let Some(semester_id) = query.semester_id {
            select = select.filter(Column::SemesterId.eq(semester_id));
        }
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        let paginator = select
            .order_by_desc(Column::EnrolledAt)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| UniSystemError::from_db("查询选课总数失败", e))?;
        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| UniSystemError::from_db("查询选课列表失败", e))?;

        Ok(PaginatedResponse::new(
            items.into_iter().map(|m| m.into_enrollment()).collect(),
            page,
            size,
            total,
        ))
    }

    /// 更新选课，已退课的记录恢复占座状态时重新检查名额
    pub async fn update_enrollment_impl(
        &self,
        id: i64,
        update: UpdateEnrollmentRequest,
    ) -> Result<Option<Enrollment>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| UniSystemError::from_db("开启事务失败", e))?;

        let Some(existing) = Enrollments::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| UniSystemError::from_db("查询选课记录失败", e))?
        else {
            return Ok(None);
        };

        if let Some(status) = update.status {
            let held = existing
                .status
                .parse::<EnrollmentStatus>()
                .map(|s| s.occupies_seat())
                .unwrap_or(false);
            if !held && status.occupies_seat() {
                reserve_seat(&txn, existing.course_id, existing.semester_id).await?;
            }
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }
        if let Some(final_score) = update.final_score {
            model.final_score = Set(Some(final_score));
        }

        let updated = model
            .update(&txn)
            .await
            .map_err(|e| UniSystemError::from_db("更新选课记录失败", e))?;

        txn.commit()
            .await
            .map_err(|e| UniSystemError::from_db("提交事务失败", e))?;

        Ok(Some(updated.into_enrollment()))
    }

    pub async fn delete_enrollment_impl(&self, id: i64) -> Result<bool> {
        let result = Enrollments::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("删除选课记录失败", e))?;

        Ok(result.rows_affected > 0)
    }

    /// 学生是否在 `at` 所在学期在读该课程
    pub async fn is_student_enrolled_impl(
        &self,
        student_id: i64,
        course_id: i64,
        at: DateTime<Utc>,
    ) -> Result<bool> {
        let Some(semester_id) = semester_at(&self.db, at.timestamp()).await? else {
            return Ok(false);
        };

        let count = Enrollments::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::CourseId.eq(course_id))
            .filter(Column::SemesterId.eq(semester_id))
            .filter(Column::Status.eq(EnrollmentStatus::Enrolled.to_string()))
            .count(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("查询选课状态失败", e))?;

        Ok(count > 0)
    }

    /// 选过该课程的学生（不论状态）
    pub async fn list_course_student_ids_impl(&self, course_id: i64) -> Result<Vec<i64>> {
        Enrollments::find()
            .select_only()
            .column(Column::StudentId)
            .filter(Column::CourseId.eq(course_id))
            .distinct()
            .order_by_asc(Column::StudentId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("查询课程学生失败", e))
    }

    /// 在读学生的 (学生档案ID, 用户ID)
    pub async fn list_enrolled_students_impl(&self, course_id: i64) -> Result<Vec<(i64, i64)>> {
        let rows: Vec<(i64, i64)> = Students::find()
            .select_only()
            .column(StudentColumn::Id)
            .column(StudentColumn::UserId)
            .filter(
                StudentColumn::Id.in_subquery(
                    sea_orm::sea_query::Query::select()
                        .column(Column::StudentId)
                        .from(Enrollments)
                        .and_where(Column::CourseId.eq(course_id))
                        .and_where(Column::Status.eq(EnrollmentStatus::Enrolled.to_string()))
                        .to_owned(),
                ),
            )
            .order_by_asc(StudentColumn::Id)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("查询在读学生失败", e))?;

        Ok(rows)
    }
}

/// 占用名额（未退课）的选课数
async fn seats_taken<C: ConnectionTrait>(conn: &C, course_id: i64, semester_id: i64) -> Result<u64> {
    Enrollments::find()
        .filter(Column::CourseId.eq(course_id))
        .filter(Column::SemesterId.eq(semester_id))
        .filter(Column::Status.ne(EnrollmentStatus::Dropped.to_string()))
        .count(conn)
        .await
        .map_err(|e| UniSystemError::from_db("统计选课人数失败", e))
}

/// 锁定课程行后确认本学期仍有空余名额
async fn reserve_seat<C: ConnectionTrait>(conn: &C, course_id: i64, semester_id: i64) -> Result<()> {
    let course = Courses::find_by_id(course_id)
        .lock_exclusive()
        .one(conn)
        .await
        .map_err(|e| UniSystemError::from_db("查询课程失败", e))?
        .ok_or_else(|| UniSystemError::not_found(format!("Course {course_id}")))?;

    let taken = seats_taken(conn, course_id, semester_id).await?;
    if taken >= course.max_students.max(0) as u64 {
        return Err(UniSystemError::exhausted(format!(
            "Course {course_id} is full for semester {semester_id}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::super::SeaOrmStorage;
    use super::super::test_support::{Seed, add_student, seed_catalog, test_storage};
    use super::seats_taken;
    use crate::models::courses::UpdateCourseRequest;
    use crate::models::enrollments::{EnrollmentStatus, UpdateEnrollmentRequest};

    async fn limit_seats(storage: &SeaOrmStorage, seed: &Seed, max_students: i32) {
        storage
            .update_course_impl(
                seed.course_id,
                UpdateCourseRequest {
                    max_students: Some(max_students),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
    }

    fn set_status(status: EnrollmentStatus) -> UpdateEnrollmentRequest {
        UpdateEnrollmentRequest {
            status: Some(status),
            final_score: None,
        }
    }

    #[tokio::test]
    async fn test_duplicate_enrollment_is_conflict() {
        let storage = test_storage().await;
        let seed = seed_catalog(&storage).await;

        storage
            .create_enrollment_impl(seed.student_id, seed.course_id, seed.semester_id)
            .await
            .unwrap();
        let err = storage
            .create_enrollment_impl(seed.student_id, seed.course_id, seed.semester_id)
            .await
            .unwrap_err();
        assert!(err.is_conflict(), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn test_dropped_enrollment_frees_seat() {
        let storage = test_storage().await;
        let seed = seed_catalog(&storage).await;

        let enrollment = storage
            .create_enrollment_impl(seed.student_id, seed.course_id, seed.semester_id)
            .await
            .unwrap();
        assert_eq!(
            seats_taken(&storage.db, seed.course_id, seed.semester_id)
                .await
                .unwrap(),
            1
        );
        assert!(
            storage
                .is_student_enrolled_impl(seed.student_id, seed.course_id, Utc::now())
                .await
                .unwrap()
        );
        assert_eq!(
            storage
                .list_enrolled_students_impl(seed.course_id)
                .await
                .unwrap(),
            vec![(seed.student_id, seed.student_user_id)]
        );

        storage
            .update_enrollment_impl(
                enrollment.id,
                UpdateEnrollmentRequest {
                    status: Some(EnrollmentStatus::Dropped),
                    final_score: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(
            seats_taken(&storage.db, seed.course_id, seed.semester_id)
                .await
                .unwrap(),
            0
        );
        assert!(
            !storage
                .is_student_enrolled_impl(seed.student_id, seed.course_id, Utc::now())
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_course_student_ids_include_graded_enrollments() {
        let storage = test_storage().await;
        let seed = seed_catalog(&storage).await;
        let bob = add_student(&storage, &seed, "bob").await;

        storage
            .create_enrollment_impl(seed.student_id, seed.course_id, seed.semester_id)
            .await
            .unwrap();
        let finished = storage
            .create_enrollment_impl(bob, seed.course_id, seed.semester_id)
            .await
            .unwrap();
        storage
            .update_enrollment_impl(finished.id, set_status(EnrollmentStatus::Completed))
            .await
            .unwrap();

        let mut ids = storage
            .list_course_student_ids_impl(seed.course_id)
            .await
            .unwrap();
        ids.sort();
        let mut expected = vec![seed.student_id, bob];
        expected.sort();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn test_full_course_rejects_next_enrollment() {
        let storage = test_storage().await;
        let seed = seed_catalog(&storage).await;
        limit_seats(&storage, &seed, 1).await;
        let bob = add_student(&storage, &seed, "bob").await;

        storage
            .create_enrollment_impl(seed.student_id, seed.course_id, seed.semester_id)
            .await
            .unwrap();
        let err = storage
            .create_enrollment_impl(bob, seed.course_id, seed.semester_id)
            .await
            .unwrap_err();
        assert!(err.is_exhausted(), "unexpected error: {err}");
        assert_eq!(
            seats_taken(&storage.db, seed.course_id, seed.semester_id)
                .await
                .unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_readmitting_dropped_enrollment_needs_a_seat() {
        let storage = test_storage().await;
        let seed = seed_catalog(&storage).await;
        limit_seats(&storage, &seed, 1).await;
        let bob = add_student(&storage, &seed, "bob").await;

        let first = storage
            .create_enrollment_impl(seed.student_id, seed.course_id, seed.semester_id)
            .await
            .unwrap();
        storage
            .update_enrollment_impl(first.id, set_status(EnrollmentStatus::Dropped))
            .await
            .unwrap();
        let taken_by_bob = storage
            .create_enrollment_impl(bob, seed.course_id, seed.semester_id)
            .await
            .unwrap();

        // 名额已被占用，不能恢复为在读
        let err = storage
            .update_enrollment_impl(first.id, set_status(EnrollmentStatus::Enrolled))
            .await
            .unwrap_err();
        assert!(err.is_exhausted(), "unexpected error: {err}");
        let still_dropped = storage.get_enrollment_by_id_impl(first.id).await.unwrap().unwrap();
        assert_eq!(still_dropped.status, EnrollmentStatus::Dropped);

        // 已占座的记录改状态不受名额限制
        let second = storage
            .update_enrollment_impl(
                taken_by_bob.id,
                UpdateEnrollmentRequest {
                    status: Some(EnrollmentStatus::Completed),
                    final_score: Some(88.0),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(second.student_id, bob);
        assert_eq!(second.status, EnrollmentStatus::Completed);
    }
}
