use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;

use super::{StudentService, visible_student};
use crate::errors::{Result, UniSystemError};
use crate::models::courses::CourseListParams;
use crate::models::enrollments::EnrollmentStatus;
use crate::models::grades::GradeSummary;
use crate::models::insights::advisor::{self, RECOMMENDATION_LIMIT};
use crate::models::insights::{CoursePrediction, StudentInsights};
use crate::models::students::Student;
use crate::models::{ApiResponse, ErrorCode, PaginationQuery};
use crate::services::{current_user, storage_failure};
use crate::storage::Storage;

/// 参与推荐排序的课程上限
const CANDIDATE_COURSES: i64 = 100;

pub async fn get_insights(
    service: &StudentService,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    let student = match visible_student(&storage, student_id, &user).await {
        Ok(student) => student,
        Err(response) => return Ok(response),
    };

    match build_insights(&storage, &student).await {
        Ok(insights) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            insights,
            "Student insights generated successfully",
        ))),
        Err(e) => Ok(storage_failure(
            e,
            ErrorCode::InternalServerError,
            "Failed to generate student insights",
        )),
    }
}

/// 为每门在读课程给出预测，并从未修过的课程中挑选推荐
pub(crate) async fn build_insights(
    storage: &Arc<dyn Storage>,
    student: &Student,
) -> Result<StudentInsights> {
    let transcript = storage
        .get_transcript(student.id)
        .await?
        .ok_or_else(|| UniSystemError::not_found(format!("Student {}", student.id)))?;

    let courses: Vec<_> = transcript
        .semesters
        .iter()
        .flat_map(|semester| semester.courses.iter())
        .collect();
    let gpa = courses
        .iter()
        .any(|course| course.grade_points.is_some())
        .then_some(transcript.cumulative_gpa);

    let mut predictions = Vec::new();
    for course in courses
        .iter()
        .filter(|course| course.status == EnrollmentStatus::Enrolled)
    {
        let grades = storage.list_grades_by_enrollment(course.enrollment_id).await?;
        let records = storage
            .list_student_attendance_records(student.id, Some(course.course_id))
            .await?;
        let metrics =
            advisor::course_metrics(gpa, &records, GradeSummary::from_grades(&grades).score);
        let score = advisor::weighted_score(&metrics);
        let probability = advisor::success_probability(score);
        let risk = advisor::risk_level(probability);

        predictions.push(CoursePrediction {
            enrollment_id: course.enrollment_id,
            course_id: course.course_id,
            course_code: course.course_code.clone(),
            course_name: course.course_name.clone(),
            predicted_grade: advisor::predicted_grade(score),
            success_probability: probability,
            risk_level: risk,
            intervention_needed: risk.needs_intervention(),
            recommendations: advisor::recommendations(&metrics, risk),
            metrics,
        });
    }

    let taken: HashSet<i64> = courses
        .iter()
        .filter(|course| course.status != EnrollmentStatus::Dropped)
        .map(|course| course.course_id)
        .collect();
    let candidates = storage
        .list_courses_with_pagination(CourseListParams {
            pagination: PaginationQuery {
                page: 1,
                size: CANDIDATE_COURSES,
            },
            ..Default::default()
        })
        .await?;
    let recommendations = advisor::recommend_courses(
        &candidates.items,
        &taken,
        student.department_id,
        gpa,
        RECOMMENDATION_LIMIT,
    );

    Ok(StudentInsights {
        student_id: student.id,
        cumulative_gpa: gpa,
        predictions,
        recommendations,
        generated_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attendance::{
        AttendanceMethod, AttendanceStatus, NewAttendanceRecord, NewAttendanceSession, SessionType,
    };
    use crate::models::courses::CreateCourseRequest;
    use crate::models::grades::{CreateGradeRequest, GradeType};
    use crate::models::insights::RiskLevel;
    use crate::storage::sea_orm_storage::test_support::{seed_catalog, test_storage};
    use chrono::Duration;

    #[tokio::test]
    async fn test_insights_cover_current_courses_and_suggest_new_ones() {
        let inner = test_storage().await;
        let seed = seed_catalog(&inner).await;
        let enrollment = inner
            .create_enrollment_impl(seed.student_id, seed.course_id, seed.semester_id)
            .await
            .unwrap();
        inner
            .create_grade_impl(
                CreateGradeRequest {
                    enrollment_id: enrollment.id,
                    grade_type: GradeType::Midterm,
                    title: "Midterm".to_string(),
                    points_earned: 45.0,
                    points_possible: 50.0,
                    weight: 1.0,
                    feedback: None,
                },
                seed.teacher_id,
            )
            .await
            .unwrap();
        let start = Utc::now();
        let session = inner
            .create_attendance_session_impl(NewAttendanceSession {
                course_id: seed.course_id,
                instructor_id: seed.teacher_id,
                title: "Week 1".to_string(),
                session_type: SessionType::Lecture,
                scheduled_start: start,
                scheduled_end: start + Duration::minutes(90),
                attendance_window_minutes: 15,
                late_threshold_minutes: 10,
                latitude: None,
                longitude: None,
                radius_meters: 100,
            })
            .await
            .unwrap();
        inner
            .upsert_attendance_record_impl(NewAttendanceRecord {
                session_id: session.id,
                student_id: seed.student_id,
                status: AttendanceStatus::Present,
                method: AttendanceMethod::Manual,
                arrival_time: Some(start),
                points: 10.0,
                notes: None,
                qr_code_id: None,
                recorded_by: Some(seed.teacher_id),
            })
            .await
            .unwrap();
        let next = inner
            .create_course_impl(CreateCourseRequest {
                department_id: seed.department_id,
                code: "CS102".to_string(),
                name: "Data Structures".to_string(),
                description: None,
                credit_hours: 3,
                teacher_id: Some(seed.teacher_id),
                max_students: 30,
            })
            .await
            .unwrap();

        let storage: Arc<dyn Storage> = Arc::new(inner);
        let student = storage
            .get_student_by_id(seed.student_id)
            .await
            .unwrap()
            .unwrap();
        let insights = build_insights(&storage, &student).await.unwrap();

        // 尚无已出分课程
        assert_eq!(insights.cumulative_gpa, None);
        assert_eq!(insights.predictions.len(), 1);
        let prediction = &insights.predictions[0];
        assert_eq!(prediction.course_id, seed.course_id);
        assert_eq!(prediction.metrics.attendance, 1.0);
        assert_eq!(prediction.metrics.coursework, 0.9);
        // 2.0 × 0.4 + 1.2 + 0.72 + 0.4 = 3.12
        assert_eq!(prediction.predicted_grade, "B");
        assert_eq!(prediction.success_probability, 0.78);
        assert_eq!(prediction.risk_level, RiskLevel::Medium);
        assert!(!prediction.intervention_needed);

        let suggested: Vec<i64> = insights
            .recommendations
            .iter()
            .map(|r| r.course_id)
            .collect();
        assert_eq!(suggested, vec![next.id]);
    }
}
