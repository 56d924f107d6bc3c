//! 成绩存储操作

use super::SeaOrmStorage;
use crate::entity::grades::{ActiveModel, Column, Entity as Grades};
use crate::errors::{Result, UniSystemError};
use crate::models::PaginatedResponse;
use crate::models::grades::{
    CreateGradeRequest, Grade, GradeListParams, GradeListResponse, UpdateGradeRequest,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    pub async fn create_grade_impl(&self, req: CreateGradeRequest, graded_by: i64) -> Result<Grade> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            enrollment_id: Set(req.enrollment_id),
            grade_type: Set(req.grade_type.to_string()),
            title: Set(req.title),
            points_earned: Set(req.points_earned),
            points_possible: Set(req.points_possible),
            weight: Set(req.weight),
            feedback: Set(req.feedback),
            graded_by: Set(Some(graded_by)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("创建成绩失败", e))?;

        Ok(result.into_grade())
    }

    pub async fn get_grade_by_id_impl(&self, id: i64) -> Result<Option<Grade>> {
        let result = Grades::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("查询成绩失败", e))?;

        Ok(result.map(|m| m.into_grade()))
    }

    pub async fn list_grades_with_pagination_impl(
        &self,
        query: GradeListParams,
    ) -> Result<GradeListResponse> {
        let (page, size) = query.pagination.normalized();
        let mut select = Grades::find();

        if let Some(enrollment_id) = query.enrollment_id {
            select = select.filter(Column::EnrollmentId.eq(enrollment_id));
        }
        if let Some(grade_type) = query.grade_type {
            select = select.filter(Column::GradeType.eq(grade_type.to_string()));
        }

        let paginator = select
            .order_by_desc(Column::CreatedAt)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| UniSystemError::from_db("查询成绩总数失败", e))?;
        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| UniSystemError::from_db("查询成绩列表失败", e))?;

        Ok(PaginatedResponse::new(
            items.into_iter().map(|m| m.into_grade()).collect(),
            page,
            size,
            total,
        ))
    }

    pub async fn list_grades_by_enrollment_impl(&self, enrollment_id: i64) -> Result<Vec<Grade>> {
        let items = Grades::find()
            .filter(Column::EnrollmentId.eq(enrollment_id))
            .order_by_asc(Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("查询选课成绩失败", e))?;

        Ok(items.into_iter().map(|m| m.into_grade()).collect())
    }

    pub async fn update_grade_impl(
        &self,
        id: i64,
        update: UpdateGradeRequest,
        graded_by: i64,
    ) -> Result<Option<Grade>> {
        if self.get_grade_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            graded_by: Set(Some(graded_by)),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(grade_type) = update.grade_type {
            model.grade_type = Set(grade_type.to_string());
        }
        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(points_earned) = update.points_earned {
            model.points_earned = Set(points_earned);
        }
        if let Some(points_possible) = update.points_possible {
            model.points_possible = Set(points_possible);
        }
        if let Some(weight) = update.weight {
            model.weight = Set(weight);
        }
        if let Some(feedback) = update.feedback {
            model.feedback = Set(Some(feedback));
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("更新成绩失败", e))?;

        Ok(Some(updated.into_grade()))
    }

    pub async fn delete_grade_impl(&self, id: i64) -> Result<bool> {
        let result = Grades::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("删除成绩失败", e))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{seed_catalog, test_storage};
    use crate::models::enrollments::{EnrollmentStatus, UpdateEnrollmentRequest};
    use crate::models::grades::{CreateGradeRequest, GradeSummary, GradeType};

    fn grade(enrollment_id: i64, earned: f64, possible: f64, weight: f64) -> CreateGradeRequest {
        CreateGradeRequest {
            enrollment_id,
            grade_type: GradeType::Assignment,
            title: "Homework".to_string(),
            points_earned: earned,
            points_possible: possible,
            weight,
            feedback: None,
        }
    }

    #[tokio::test]
    async fn test_weighted_summary_and_transcript_gpa() {
        let storage = test_storage().await;
        let seed = seed_catalog(&storage).await;

        let enrollment = storage
            .create_enrollment_impl(seed.student_id, seed.course_id, seed.semester_id)
            .await
            .unwrap();

        // 0.25 * 80 + 0.75 * 92 = 89
        storage
            .create_grade_impl(grade(enrollment.id, 40.0, 50.0, 0.25), seed.teacher_id)
            .await
            .unwrap();
        storage
            .create_grade_impl(grade(enrollment.id, 92.0, 100.0, 0.75), seed.teacher_id)
            .await
            .unwrap();

        let grades = storage
            .list_grades_by_enrollment_impl(enrollment.id)
            .await
            .unwrap();
        let summary = GradeSummary::from_grades(&grades);
        assert_eq!(summary.score, Some(89.0));
        assert_eq!(summary.letter.as_deref(), Some("B+"));

        storage
            .update_enrollment_impl(
                enrollment.id,
                UpdateEnrollmentRequest {
                    status: Some(EnrollmentStatus::Completed),
                    final_score: summary.score,
                },
            )
            .await
            .unwrap();

        let transcript = storage
            .get_transcript_impl(seed.student_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(transcript.semesters.len(), 1);
        assert_eq!(transcript.cumulative_gpa, 3.5);
        assert_eq!(transcript.earned_credits, 3);
        assert_eq!(transcript.semesters[0].courses[0].letter.as_deref(), Some("B+"));
    }

    #[tokio::test]
    async fn test_ungraded_enrollment_not_in_gpa() {
        let storage = test_storage().await;
        let seed = seed_catalog(&storage).await;
        storage
            .create_enrollment_impl(seed.student_id, seed.course_id, seed.semester_id)
            .await
            .unwrap();

        let transcript = storage
            .get_transcript_impl(seed.student_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(transcript.cumulative_gpa, 0.0);
        assert_eq!(transcript.earned_credits, 0);
        assert_eq!(transcript.semesters[0].courses[0].letter, None);
    }
}
