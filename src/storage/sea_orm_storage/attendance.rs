//! 考勤存储操作：场次、二维码、记录

use chrono::{DateTime, Utc};

use super::SeaOrmStorage;
use super::semesters::semester_at;
use crate::entity::attendance_qr_codes::{
    ActiveModel as QrActiveModel, Column as QrColumn, Entity as QrCodes,
};
use crate::entity::attendance_records::{
    ActiveModel as RecordActiveModel, Column as RecordColumn, Entity as Records,
};
use crate::entity::attendance_sessions::{ActiveModel, Column, Entity as Sessions};
use crate::entity::enrollments::{Column as EnrollmentColumn, Entity as Enrollments};
use crate::errors::{Result, UniSystemError};
use crate::models::PaginatedResponse;
use crate::models::attendance::{
    AttendanceMethod, AttendanceQrCode, AttendanceRecord, AttendanceSession, AttendanceStatus,
    NewAttendanceRecord, NewAttendanceSession, QrCodeStatus, RecordListParams,
    RecordListResponse, SessionListParams, SessionListResponse, SessionStatus, rules,
};
use crate::models::enrollments::EnrollmentStatus;
use sea_orm::sea_query::{Expr, ExprTrait, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

fn record_model(record: NewAttendanceRecord, now: i64) -> RecordActiveModel {
    RecordActiveModel {
        session_id: Set(record.session_id),
        student_id: Set(record.student_id),
        status: Set(record.status.to_string()),
        method: Set(record.method.to_string()),
        arrival_time: Set(record.arrival_time.map(|t| t.timestamp())),
        points: Set(record.points),
        notes: Set(record.notes),
        qr_code_id: Set(record.qr_code_id),
        recorded_by: Set(record.recorded_by),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
}

impl SeaOrmStorage {
    pub async fn create_attendance_session_impl(
        &self,
        session: NewAttendanceSession,
    ) -> Result<AttendanceSession> {
        let now = Utc::now().timestamp();

        let model = ActiveModel {
            course_id: Set(session.course_id),
            instructor_id: Set(session.instructor_id),
            title: Set(session.title),
            session_type: Set(session.session_type.to_string()),
            scheduled_start: Set(session.scheduled_start.timestamp()),
            scheduled_end: Set(session.scheduled_end.timestamp()),
            actual_start: Set(None),
            actual_end: Set(None),
            status: Set(SessionStatus::Scheduled.to_string()),
            attendance_window_minutes: Set(session.attendance_window_minutes),
            late_threshold_minutes: Set(session.late_threshold_minutes),
            latitude: Set(session.latitude),
            longitude: Set(session.longitude),
            radius_meters: Set(session.radius_meters),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("创建考勤场次失败", e))?;

        Ok(result.into_session())
    }

    pub async fn get_attendance_session_by_id_impl(
        &self,
        id: i64,
    ) -> Result<Option<AttendanceSession>> {
        let result = Sessions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("查询考勤场次失败", e))?;

        Ok(result.map(|m| m.into_session()))
    }

    pub async fn list_attendance_sessions_with_pagination_impl(
        &self,
        query: SessionListParams,
    ) -> Result<SessionListResponse> {
        let (page, size) = query.pagination.normalized();
        let mut select = Sessions::find();

        if let Some(course_id) = query.course_id {
            select = select.filter(Column::CourseId.eq(course_id));
        }
        if let Some(instructor_id) = query.instructor_id {
            select = select.filter(Column::InstructorId.eq(instructor_id));
        }
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        let paginator = select
            .order_by_desc(Column::ScheduledStart)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| UniSystemError::from_db("查询考勤场次总数失败", e))?;
        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| UniSystemError::from_db("查询考勤场次列表失败", e))?;

        Ok(PaginatedResponse::new(
            items.into_iter().map(|m| m.into_session()).collect(),
            page,
            size,
            total,
        ))
    }

    /// 切换场次状态，进入 active 时写入实际开始时间
    pub async fn update_attendance_session_status_impl(
        &self,
        id: i64,
        status: SessionStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<AttendanceSession>> {
        let Some(existing) = Sessions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("查询考勤场次失败", e))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.status = Set(status.to_string());
        model.updated_at = Set(at.timestamp());
        if status == SessionStatus::Active {
            model.actual_start = Set(Some(at.timestamp()));
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("更新考勤场次失败", e))?;

        Ok(Some(updated.into_session()))
    }

    /// 结束场次：标记完成、作废仍有效的二维码，并为未签到的在读学生写入缺勤
    ///
    /// 状态切换以 `status = active` 为条件，场次已不在进行中时返回 `InvalidState`。
    pub async fn end_attendance_session_impl(
        &self,
        id: i64,
        at: DateTime<Utc>,
    ) -> Result<Option<(AttendanceSession, u64)>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| UniSystemError::from_db("开启事务失败", e))?;

        let Some(existing) = Sessions::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| UniSystemError::from_db("查询考勤场次失败", e))?
        else {
            return Ok(None);
        };

        let now = at.timestamp();
        let course_id = existing.course_id;
        let scheduled_start = existing.scheduled_start;
        let ended = Sessions::update_many()
            .col_expr(Column::Status, Expr::value(SessionStatus::Completed.to_string()))
            .col_expr(Column::ActualEnd, Expr::value(Some(now)))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(SessionStatus::Active.to_string()))
            .exec(&txn)
            .await
            .map_err(|e| UniSystemError::from_db("结束考勤场次失败", e))?;
        if ended.rows_affected != 1 {
            return Err(UniSystemError::invalid_state(format!(
                "Attendance session {id} is not active"
            )));
        }

        let updated = Sessions::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| UniSystemError::from_db("查询考勤场次失败", e))?
            .ok_or_else(|| UniSystemError::not_found(format!("Attendance session {id}")))?;

        QrCodes::update_many()
            .col_expr(QrColumn::Status, Expr::value(QrCodeStatus::Expired.to_string()))
            .filter(QrColumn::SessionId.eq(id))
            .filter(QrColumn::Status.eq(QrCodeStatus::Active.to_string()))
            .exec(&txn)
            .await
            .map_err(|e| UniSystemError::from_db("作废签到二维码失败", e))?;

        let absent_students = absent_student_ids(&txn, id, course_id, scheduled_start).await?;
        let absent_count = absent_students.len() as u64;
        if !absent_students.is_empty() {
            let models = absent_students.into_iter().map(|student_id| {
                record_model(
                    NewAttendanceRecord {
                        session_id: id,
                        student_id,
                        status: AttendanceStatus::Absent,
                        method: AttendanceMethod::Manual,
                        arrival_time: None,
                        points: rules::points_for(AttendanceStatus::Absent, 0),
                        notes: None,
                        qr_code_id: None,
                        recorded_by: None,
                    },
                    now,
                )
            });
            Records::insert_many(models)
                .exec(&txn)
                .await
                .map_err(|e| UniSystemError::from_db("写入缺勤记录失败", e))?;
        }

        txn.commit()
            .await
            .map_err(|e| UniSystemError::from_db("提交事务失败", e))?;

        Ok(Some((updated.into_session(), absent_count)))
    }

    pub async fn create_qr_code_impl(
        &self,
        session_id: i64,
        code: &str,
        expires_at: DateTime<Utc>,
        max_usage: Option<i32>,
    ) -> Result<AttendanceQrCode> {
        let model = QrActiveModel {
            session_id: Set(session_id),
            code: Set(code.to_string()),
            expires_at: Set(expires_at.timestamp()),
            max_usage: Set(max_usage),
            usage_count: Set(0),
            status: Set(QrCodeStatus::Active.to_string()),
            created_at: Set(Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("创建签到二维码失败", e))?;

        Ok(result.into_qr_code())
    }

    pub async fn get_qr_code_by_code_impl(&self, code: &str) -> Result<Option<AttendanceQrCode>> {
        let result = QrCodes::find()
            .filter(QrColumn::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("查询签到二维码失败", e))?;

        Ok(result.map(|m| m.into_qr_code()))
    }

    /// 扫码签到，同一事务内占用一次二维码并写入记录
    ///
    /// 使用次数以条件更新累加，二维码不再可用时返回 `Exhausted`。
    pub async fn record_qr_check_in_impl(
        &self,
        record: NewAttendanceRecord,
        qr_code_id: i64,
    ) -> Result<AttendanceRecord> {
        let now = Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| UniSystemError::from_db("开启事务失败", e))?;

        let claimed = QrCodes::update_many()
            .col_expr(QrColumn::UsageCount, Expr::col(QrColumn::UsageCount).add(1))
            .filter(QrColumn::Id.eq(qr_code_id))
            .filter(QrColumn::Status.eq(QrCodeStatus::Active.to_string()))
            .filter(QrColumn::ExpiresAt.gte(now))
            .filter(
                Condition::any()
                    .add(QrColumn::MaxUsage.is_null())
                    .add(Expr::col(QrColumn::UsageCount).lt(Expr::col(QrColumn::MaxUsage))),
            )
            .exec(&txn)
            .await
            .map_err(|e| UniSystemError::from_db("更新二维码使用次数失败", e))?;

        // 未占用成功时丢弃事务即回滚
        if claimed.rows_affected != 1 {
            return Err(UniSystemError::exhausted(format!(
                "QR code {qr_code_id} is no longer usable"
            )));
        }

        let qr = QrCodes::find_by_id(qr_code_id)
            .one(&txn)
            .await
            .map_err(|e| UniSystemError::from_db("查询签到二维码失败", e))?
            .ok_or_else(|| UniSystemError::not_found(format!("QR code {qr_code_id}")))?;

        let status = rules::status_after_use(qr.max_usage, qr.usage_count);
        if status != QrCodeStatus::Active {
            QrCodes::update_many()
                .col_expr(QrColumn::Status, Expr::value(status.to_string()))
                .filter(QrColumn::Id.eq(qr_code_id))
                .exec(&txn)
                .await
                .map_err(|e| UniSystemError::from_db("更新二维码状态失败", e))?;
        }

        let inserted = record_model(record, now)
            .insert(&txn)
            .await
            .map_err(|e| UniSystemError::from_db("写入考勤记录失败", e))?;

        txn.commit()
            .await
            .map_err(|e| UniSystemError::from_db("提交事务失败", e))?;

        Ok(inserted.into_record())
    }

    /// 手动登记，已有记录时覆盖状态、积分与备注
    pub async fn upsert_attendance_record_impl(
        &self,
        record: NewAttendanceRecord,
    ) -> Result<AttendanceRecord> {
        let now = Utc::now().timestamp();
        let existing = Records::find()
            .filter(RecordColumn::SessionId.eq(record.session_id))
            .filter(RecordColumn::StudentId.eq(record.student_id))
            .one(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("查询考勤记录失败", e))?;

        let saved = match existing {
            Some(existing) => {
                let mut model: RecordActiveModel = existing.into();
                model.status = Set(record.status.to_string());
                model.method = Set(record.method.to_string());
                model.points = Set(record.points);
                model.notes = Set(record.notes);
                model.recorded_by = Set(record.recorded_by);
                if let Some(arrival) = record.arrival_time {
                    model.arrival_time = Set(Some(arrival.timestamp()));
                }
                model.updated_at = Set(now);
                model.update(&self.db).await
            }
            None => record_model(record, now).insert(&self.db).await,
        }
        .map_err(|e| UniSystemError::from_db("保存考勤记录失败", e))?;

        Ok(saved.into_record())
    }

    pub async fn get_attendance_record_impl(
        &self,
        session_id: i64,
        student_id: i64,
    ) -> Result<Option<AttendanceRecord>> {
        let result = Records::find()
            .filter(RecordColumn::SessionId.eq(session_id))
            .filter(RecordColumn::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("查询考勤记录失败", e))?;

        Ok(result.map(|m| m.into_record()))
    }

    pub async fn list_attendance_records_with_pagination_impl(
        &self,
        session_id: i64,
        query: RecordListParams,
    ) -> Result<RecordListResponse> {
        let (page, size) = query.pagination.normalized();
        let mut select = Records::find().filter(RecordColumn::SessionId.eq(session_id));
        if let Some(status) = query.status {
            select = select.filter(RecordColumn::Status.eq(status.to_string()));
        }

        let paginator = select
            .order_by_asc(RecordColumn::StudentId)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| UniSystemError::from_db("查询考勤记录总数失败", e))?;
        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| UniSystemError::from_db("查询考勤记录列表失败", e))?;

        Ok(PaginatedResponse::new(
            items.into_iter().map(|m| m.into_record()).collect(),
            page,
            size,
            total,
        ))
    }

    pub async fn list_session_records_impl(&self, session_id: i64) -> Result<Vec<AttendanceRecord>> {
        let items = Records::find()
            .filter(RecordColumn::SessionId.eq(session_id))
            .all(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("查询考勤记录失败", e))?;

        Ok(items.into_iter().map(|m| m.into_record()).collect())
    }

    pub async fn list_student_attendance_records_impl(
        &self,
        student_id: i64,
        course_id: Option<i64>,
    ) -> Result<Vec<AttendanceRecord>> {
        let mut select = Records::find().filter(RecordColumn::StudentId.eq(student_id));
        if let Some(course_id) = course_id {
            select = select.filter(
                RecordColumn::SessionId.in_subquery(
                    Query::select()
                        .column(Column::Id)
                        .from(Sessions)
                        .and_where(Column::CourseId.eq(course_id))
                        .to_owned(),
                ),
            );
        }

        let items = select
            .order_by_asc(RecordColumn::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("查询学生考勤记录失败", e))?;

        Ok(items.into_iter().map(|m| m.into_record()).collect())
    }
}

/// 场次所在学期在读、但尚无考勤记录的学生
async fn absent_student_ids<C: ConnectionTrait>(
    conn: &C,
    session_id: i64,
    course_id: i64,
    scheduled_start: i64,
) -> Result<Vec<i64>> {
    let Some(semester_id) = semester_at(conn, scheduled_start).await? else {
        return Ok(Vec::new());
    };

    let enrolled: Vec<i64> = Enrollments::find()
        .select_only()
        .column(EnrollmentColumn::StudentId)
        .filter(EnrollmentColumn::CourseId.eq(course_id))
        .filter(EnrollmentColumn::SemesterId.eq(semester_id))
        .filter(EnrollmentColumn::Status.eq(EnrollmentStatus::Enrolled.to_string()))
        .distinct()
        .into_tuple()
        .all(conn)
        .await
        .map_err(|e| UniSystemError::from_db("查询在读学生失败", e))?;

    let recorded: Vec<i64> = Records::find()
        .select_only()
        .column(RecordColumn::StudentId)
        .filter(RecordColumn::SessionId.eq(session_id))
        .into_tuple()
        .all(conn)
        .await
        .map_err(|e| UniSystemError::from_db("查询已有考勤记录失败", e))?;

    Ok(enrolled
        .into_iter()
        .filter(|id| !recorded.contains(id))
        .collect())
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::super::test_support::{add_student, seed_catalog, test_storage};
    use crate::models::attendance::{
        AttendanceMethod, AttendanceStatus, NewAttendanceRecord, NewAttendanceSession,
        QrCodeStatus, SessionStatus, SessionType,
    };
    use crate::models::semesters::{CreateSemesterRequest, Term};

    fn new_session(course_id: i64, instructor_id: i64) -> NewAttendanceSession {
        let start = Utc::now();
        NewAttendanceSession {
            course_id,
            instructor_id,
            title: "Week 1 lecture".to_string(),
            session_type: SessionType::Lecture,
            scheduled_start: start,
            scheduled_end: start + Duration::minutes(90),
            attendance_window_minutes: 15,
            late_threshold_minutes: 10,
            latitude: None,
            longitude: None,
            radius_meters: 100,
        }
    }

    fn qr_record(session_id: i64, student_id: i64, qr_code_id: i64) -> NewAttendanceRecord {
        NewAttendanceRecord {
            session_id,
            student_id,
            status: AttendanceStatus::Present,
            method: AttendanceMethod::QrCode,
            arrival_time: Some(Utc::now()),
            points: 10.0,
            notes: None,
            qr_code_id: Some(qr_code_id),
            recorded_by: None,
        }
    }

    #[tokio::test]
    async fn test_single_use_code_admits_only_one_student() {
        let storage = test_storage().await;
        let seed = seed_catalog(&storage).await;
        let bob = add_student(&storage, &seed, "bob").await;
        for student_id in [seed.student_id, bob] {
            storage
                .create_enrollment_impl(student_id, seed.course_id, seed.semester_id)
                .await
                .unwrap();
        }

        let session = storage
            .create_attendance_session_impl(new_session(seed.course_id, seed.teacher_id))
            .await
            .unwrap();
        let qr = storage
            .create_qr_code_impl(session.id, "abc123", Utc::now() + Duration::minutes(5), Some(1))
            .await
            .unwrap();

        storage
            .record_qr_check_in_impl(qr_record(session.id, seed.student_id, qr.id), qr.id)
            .await
            .unwrap();

        let qr = storage.get_qr_code_by_code_impl("abc123").await.unwrap().unwrap();
        assert_eq!(qr.usage_count, 1);
        assert_eq!(qr.status, QrCodeStatus::Used);

        // 第二名学生拿到的是已用完的码
        let err = storage
            .record_qr_check_in_impl(qr_record(session.id, bob, qr.id), qr.id)
            .await
            .unwrap_err();
        assert!(err.is_exhausted(), "unexpected error: {err}");

        let qr = storage.get_qr_code_by_code_impl("abc123").await.unwrap().unwrap();
        assert_eq!(qr.usage_count, 1);
        assert!(
            storage
                .get_attendance_record_impl(session.id, bob)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_duplicate_check_in_rolls_back_usage() {
        let storage = test_storage().await;
        let seed = seed_catalog(&storage).await;
        storage
            .create_enrollment_impl(seed.student_id, seed.course_id, seed.semester_id)
            .await
            .unwrap();

        let session = storage
            .create_attendance_session_impl(new_session(seed.course_id, seed.teacher_id))
            .await
            .unwrap();
        let qr = storage
            .create_qr_code_impl(session.id, "open-code", Utc::now() + Duration::minutes(5), None)
            .await
            .unwrap();

        let record = qr_record(session.id, seed.student_id, qr.id);
        storage
            .record_qr_check_in_impl(record.clone(), qr.id)
            .await
            .unwrap();

        // 重复签到被唯一索引拒绝，二维码计数回滚不变
        let err = storage.record_qr_check_in_impl(record, qr.id).await.unwrap_err();
        assert!(err.is_conflict());
        let qr = storage.get_qr_code_by_code_impl("open-code").await.unwrap().unwrap();
        assert_eq!(qr.usage_count, 1);
        assert_eq!(qr.status, QrCodeStatus::Active);
    }

    #[tokio::test]
    async fn test_expired_code_is_not_consumed() {
        let storage = test_storage().await;
        let seed = seed_catalog(&storage).await;
        let session = storage
            .create_attendance_session_impl(new_session(seed.course_id, seed.teacher_id))
            .await
            .unwrap();
        let qr = storage
            .create_qr_code_impl(session.id, "stale", Utc::now() - Duration::minutes(1), None)
            .await
            .unwrap();

        let err = storage
            .record_qr_check_in_impl(qr_record(session.id, seed.student_id, qr.id), qr.id)
            .await
            .unwrap_err();
        assert!(err.is_exhausted());
        let qr = storage.get_qr_code_by_code_impl("stale").await.unwrap().unwrap();
        assert_eq!(qr.usage_count, 0);
    }

    #[tokio::test]
    async fn test_only_active_session_can_be_ended() {
        let storage = test_storage().await;
        let seed = seed_catalog(&storage).await;
        let session = storage
            .create_attendance_session_impl(new_session(seed.course_id, seed.teacher_id))
            .await
            .unwrap();

        // 尚未开始
        let err = storage
            .end_attendance_session_impl(session.id, Utc::now())
            .await
            .unwrap_err();
        assert!(err.is_invalid_state());

        storage
            .update_attendance_session_status_impl(session.id, SessionStatus::Active, Utc::now())
            .await
            .unwrap();
        storage
            .end_attendance_session_impl(session.id, Utc::now())
            .await
            .unwrap()
            .unwrap();

        // 第二次结束不会再写缺勤
        let err = storage
            .end_attendance_session_impl(session.id, Utc::now())
            .await
            .unwrap_err();
        assert!(err.is_invalid_state());
        assert!(
            storage
                .end_attendance_session_impl(session.id + 100, Utc::now())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_roster_is_scoped_to_session_semester() {
        let storage = test_storage().await;
        let seed = seed_catalog(&storage).await;
        let now = Utc::now();
        let spring = storage
            .create_semester_impl(CreateSemesterRequest {
                name: "Spring 2025".to_string(),
                term: Term::Spring,
                start_at: now - Duration::days(200),
                end_at: now - Duration::days(80),
                registration_start: now - Duration::days(210),
                registration_end: now - Duration::days(190),
            })
            .await
            .unwrap();
        let bob = add_student(&storage, &seed, "bob").await;
        storage
            .create_enrollment_impl(seed.student_id, seed.course_id, seed.semester_id)
            .await
            .unwrap();
        storage
            .create_enrollment_impl(bob, seed.course_id, spring.id)
            .await
            .unwrap();

        let session = storage
            .create_attendance_session_impl(new_session(seed.course_id, seed.teacher_id))
            .await
            .unwrap();
        assert!(
            storage
                .is_student_enrolled_impl(seed.student_id, seed.course_id, session.scheduled_start)
                .await
                .unwrap()
        );
        assert!(
            !storage
                .is_student_enrolled_impl(bob, seed.course_id, session.scheduled_start)
                .await
                .unwrap()
        );

        storage
            .update_attendance_session_status_impl(session.id, SessionStatus::Active, Utc::now())
            .await
            .unwrap();
        let (_, absent) = storage
            .end_attendance_session_impl(session.id, Utc::now())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(absent, 1);
        assert!(
            storage
                .get_attendance_record_impl(session.id, bob)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_end_session_marks_missing_students_absent() {
        let storage = test_storage().await;
        let seed = seed_catalog(&storage).await;
        storage
            .create_enrollment_impl(seed.student_id, seed.course_id, seed.semester_id)
            .await
            .unwrap();

        let session = storage
            .create_attendance_session_impl(new_session(seed.course_id, seed.teacher_id))
            .await
            .unwrap();
        storage
            .update_attendance_session_status_impl(session.id, SessionStatus::Active, Utc::now())
            .await
            .unwrap();

        let (ended, absent) = storage
            .end_attendance_session_impl(session.id, Utc::now())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(ended.status, SessionStatus::Completed);
        assert!(ended.actual_end.is_some());
        assert_eq!(absent, 1);

        let record = storage
            .get_attendance_record_impl(session.id, seed.student_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.status, AttendanceStatus::Absent);
        assert_eq!(record.points, 0.0);

        // 手动改为请假会覆盖已有记录
        let excused = storage
            .upsert_attendance_record_impl(NewAttendanceRecord {
                session_id: session.id,
                student_id: seed.student_id,
                status: AttendanceStatus::Excused,
                method: AttendanceMethod::Manual,
                arrival_time: None,
                points: 5.0,
                notes: Some("medical".to_string()),
                qr_code_id: None,
                recorded_by: Some(seed.teacher_id),
            })
            .await
            .unwrap();
        assert_eq!(excused.id, record.id);
        assert_eq!(excused.status, AttendanceStatus::Excused);
        assert_eq!(
            storage.list_session_records_impl(session.id).await.unwrap().len(),
            1
        );
    }
}
