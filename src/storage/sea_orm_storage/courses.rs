//! 课程存储操作

use super::SeaOrmStorage;
use crate::entity::courses::{ActiveModel, Column, Entity as Courses};
use crate::entity::enrollments::{Column as EnrollmentColumn, Entity as Enrollments};
use crate::entity::students::Entity as Students;
use crate::errors::{Result, UniSystemError};
use crate::models::PaginatedResponse;
use crate::models::courses::{
    Course, CourseListParams, CourseListResponse, CourseStudent, CreateCourseRequest,
    UpdateCourseRequest,
};
use crate::models::enrollments::EnrollmentStatus;
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    pub async fn create_course_impl(&self, req: CreateCourseRequest) -> Result<Course> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            department_id: Set(req.department_id),
            code: Set(req.code),
            name: Set(req.name),
            description: Set(req.description),
            credit_hours: Set(req.credit_hours),
            teacher_id: Set(req.teacher_id),
            max_students: Set(req.max_students),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("创建课程失败", e))?;

        Ok(result.into_course())
    }

    pub async fn get_course_by_id_impl(&self, id: i64) -> Result<Option<Course>> {
        let result = Courses::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("查询课程失败", e))?;

        Ok(result.map(|m| m.into_course()))
    }

    pub async fn list_courses_with_pagination_impl(
        &self,
        query: CourseListParams,
    ) -> Result<CourseListResponse> {
        let (page, size) = query.pagination.normalized();
        let mut select = Courses::find();

        if let Some(department_id) = query.department_id {
            select = select.filter(Column::DepartmentId.eq(department_id));
        }
        if let Some(teacher_id) = query.teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Code.contains(&escaped))
                    .add(Column::Name.contains(&escaped)),
            );
        }

        let paginator = select.order_by_asc(Column::Code).paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| UniSystemError::from_db("查询课程总数失败", e))?;
        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| UniSystemError::from_db("查询课程列表失败", e))?;

        Ok(PaginatedResponse::new(
            items.into_iter().map(|m| m.into_course()).collect(),
            page,
            size,
            total,
        ))
    }

    pub async fn update_course_impl(
        &self,
        id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        if self.get_course_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(department_id) = update.department_id {
            model.department_id = Set(department_id);
        }
        if let Some(code) = update.code {
            model.code = Set(code);
        }
        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(credit_hours) = update.credit_hours {
            model.credit_hours = Set(credit_hours);
        }
        if let Some(teacher_id) = update.teacher_id {
            model.teacher_id = Set(Some(teacher_id));
        }
        if let Some(max_students) = update.max_students {
            model.max_students = Set(max_students);
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("更新课程失败", e))?;

        Ok(Some(updated.into_course()))
    }

    pub async fn delete_course_impl(&self, id: i64) -> Result<bool> {
        let result = Courses::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("删除课程失败", e))?;

        Ok(result.rows_affected > 0)
    }

    /// 课程花名册，排除已退课记录
    pub async fn list_course_students_impl(
        &self,
        course_id: i64,
        semester_id: Option<i64>,
    ) -> Result<Vec<CourseStudent>> {
        let mut select = Enrollments::find()
            .filter(EnrollmentColumn::CourseId.eq(course_id))
            .filter(EnrollmentColumn::Status.ne(EnrollmentStatus::Dropped.to_string()));
        if let Some(semester_id) = semester_id {
            select = select.filter(EnrollmentColumn::SemesterId.eq(semester_id));
        }

        let rows = select
            .order_by_asc(EnrollmentColumn::EnrolledAt)
            .find_also_related(Students)
            .all(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("查询课程学生失败", e))?;

        Ok(rows
            .into_iter()
            .filter_map(|(enrollment, student)| {
                let student = student?.into_student();
                let enrollment = enrollment.into_enrollment();
                Some(CourseStudent {
                    enrollment_id: enrollment.id,
                    semester_id: enrollment.semester_id,
                    status: enrollment.status,
                    student,
                })
            })
            .collect())
    }
}
