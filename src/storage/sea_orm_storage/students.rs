//! 学生档案与成绩单存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::courses::Entity as Courses;
use crate::entity::enrollments::{Column as EnrollmentColumn, Entity as Enrollments};
use crate::entity::semesters::{Column as SemesterColumn, Entity as Semesters};
use crate::entity::students::{ActiveModel, Column, Entity as Students};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{Result, UniSystemError};
use crate::models::PaginatedResponse;
use crate::models::grades::scale::{self, LetterGrade};
use crate::models::students::{
    CreateStudentRequest, Student, StudentListParams, StudentListResponse, StudentStatus,
    TranscriptCourse, TranscriptResponse, TranscriptSemester, UpdateStudentRequest,
};
use crate::utils::escape_like_pattern;
use sea_orm::sea_query::Query;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    pub async fn create_student_impl(&self, req: CreateStudentRequest) -> Result<Student> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            user_id: Set(req.user_id),
            student_number: Set(req.student_number),
            department_id: Set(req.department_id),
            enrollment_year: Set(req.enrollment_year),
            status: Set(StudentStatus::Active.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("创建学生档案失败", e))?;

        Ok(result.into_student())
    }

    pub async fn get_student_by_id_impl(&self, id: i64) -> Result<Option<Student>> {
        let result = Students::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("查询学生档案失败", e))?;

        Ok(result.map(|m| m.into_student()))
    }

    pub async fn get_student_by_user_id_impl(&self, user_id: i64) -> Result<Option<Student>> {
        let result = Students::find()
            .filter(Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("查询学生档案失败", e))?;

        Ok(result.map(|m| m.into_student()))
    }

    pub async fn list_students_with_pagination_impl(
        &self,
        query: StudentListParams,
    ) -> Result<StudentListResponse> {
        let (page, size) = query.pagination.normalized();
        let mut select = Students::find();

        if let Some(department_id) = query.department_id {
            select = select.filter(Column::DepartmentId.eq(department_id));
        }
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }
        if let Some(year) = query.enrollment_year {
            select = select.filter(Column::EnrollmentYear.eq(year));
        }
        // 按学号或关联用户的用户名、姓名搜索
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::StudentNumber.contains(&escaped))
                    .add(
                        Column::UserId.in_subquery(
                            Query::select()
                                .column(UserColumn::Id)
                                .from(Users)
                                .cond_where(
                                    Condition::any()
                                        .add(UserColumn::Username.contains(&escaped))
                                        .add(UserColumn::DisplayName.contains(&escaped)),
                                )
                                .to_owned(),
                        ),
                    ),
            );
        }

        let paginator = select
            .order_by_asc(Column::StudentNumber)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| UniSystemError::from_db("查询学生总数失败", e))?;
        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| UniSystemError::from_db("查询学生列表失败", e))?;

        Ok(PaginatedResponse::new(
            items.into_iter().map(|m| m.into_student()).collect(),
            page,
            size,
            total,
        ))
    }

    pub async fn update_student_impl(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        if self.get_student_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(student_number) = update.student_number {
            model.student_number = Set(student_number);
        }
        if let Some(department_id) = update.department_id {
            model.department_id = Set(department_id);
        }
        if let Some(enrollment_year) = update.enrollment_year {
            model.enrollment_year = Set(enrollment_year);
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("更新学生档案失败", e))?;

        Ok(Some(updated.into_student()))
    }

    pub async fn delete_student_impl(&self, id: i64) -> Result<bool> {
        let result = Students::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("删除学生档案失败", e))?;

        Ok(result.rows_affected > 0)
    }

    /// 成绩单：按学期分组，只有已出最终成绩的课程计入 GPA
    pub async fn get_transcript_impl(&self, student_id: i64) -> Result<Option<TranscriptResponse>> {
        let Some(student) = self.get_student_by_id_impl(student_id).await? else {
            return Ok(None);
        };

        let rows = Enrollments::find()
            .filter(EnrollmentColumn::StudentId.eq(student_id))
            .order_by_asc(EnrollmentColumn::EnrolledAt)
            .find_also_related(Courses)
            .all(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("查询选课记录失败", e))?;

        let semester_ids: Vec<i64> = rows.iter().map(|(e, _)| e.semester_id).collect();
        let semesters = Semesters::find()
            .filter(SemesterColumn::Id.is_in(semester_ids))
            .order_by_asc(SemesterColumn::StartAt)
            .all(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("查询学期失败", e))?;

        let mut by_semester: HashMap<i64, Vec<TranscriptCourse>> = HashMap::new();
        for (enrollment, course) in rows {
            let Some(course) = course else { continue };
            let enrollment = enrollment.into_enrollment();
            let letter = enrollment
                .final_score
                .filter(|_| enrollment.status.is_graded())
                .map(LetterGrade::from_score);
            by_semester
                .entry(enrollment.semester_id)
                .or_default()
                .push(TranscriptCourse {
                    enrollment_id: enrollment.id,
                    course_id: course.id,
                    course_code: course.code,
                    course_name: course.name,
                    credit_hours: course.credit_hours,
                    status: enrollment.status,
                    final_score: enrollment.final_score,
                    letter: letter.map(|l| l.to_string()),
                    grade_points: letter.map(|l| l.points()),
                });
        }

        let mut all_graded: Vec<(i32, f64)> = Vec::new();
        let mut transcript_semesters = Vec::new();
        for semester in semesters {
            let Some(courses) = by_semester.remove(&semester.id) else {
                continue;
            };
            let graded = graded_courses(&courses);
            all_graded.extend_from_slice(&graded);
            transcript_semesters.push(TranscriptSemester {
                semester_id: semester.id,
                semester_name: semester.name,
                gpa: scale::gpa(&graded),
                earned_credits: scale::earned_credits(&graded),
                courses,
            });
        }

        Ok(Some(TranscriptResponse {
            student,
            semesters: transcript_semesters,
            cumulative_gpa: scale::gpa(&all_graded),
            earned_credits: scale::earned_credits(&all_graded),
        }))
    }
}

/// 已出最终成绩的 (学分, 分数)
fn graded_courses(courses: &[TranscriptCourse]) -> Vec<(i32, f64)> {
    courses
        .iter()
        .filter(|c| c.status.is_graded())
        .filter_map(|c| c.final_score.map(|score| (c.credit_hours, score)))
        .collect()
}
