use sea_orm_migration::prelude::*;

use super::m20250301_000001_create_academic_tables::{Courses, Semesters, Students, Users};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建考勤课次表
        manager
            .create_table(
                Table::create()
                    .table(AttendanceSessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AttendanceSessions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AttendanceSessions::CourseId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceSessions::InstructorId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AttendanceSessions::Title).string().not_null())
                    .col(
                        ColumnDef::new(AttendanceSessions::SessionType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceSessions::ScheduledStart)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceSessions::ScheduledEnd)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceSessions::ActualStart)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceSessions::ActualEnd)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(AttendanceSessions::Status).string().not_null())
                    .col(
                        ColumnDef::new(AttendanceSessions::AttendanceWindowMinutes)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceSessions::LateThresholdMinutes)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AttendanceSessions::Latitude).double().null())
                    .col(ColumnDef::new(AttendanceSessions::Longitude).double().null())
                    .col(
                        ColumnDef::new(AttendanceSessions::RadiusMeters)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceSessions::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceSessions::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AttendanceSessions::Table, AttendanceSessions::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AttendanceSessions::Table, AttendanceSessions::InstructorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建考勤二维码表
        manager
            .create_table(
                Table::create()
                    .table(AttendanceQrCodes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AttendanceQrCodes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AttendanceQrCodes::SessionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceQrCodes::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(AttendanceQrCodes::ExpiresAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AttendanceQrCodes::MaxUsage).integer().null())
                    .col(
                        ColumnDef::new(AttendanceQrCodes::UsageCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(AttendanceQrCodes::Status).string().not_null())
                    .col(
                        ColumnDef::new(AttendanceQrCodes::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AttendanceQrCodes::Table, AttendanceQrCodes::SessionId)
                            .to(AttendanceSessions::Table, AttendanceSessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建考勤记录表
        manager
            .create_table(
                Table::create()
                    .table(AttendanceRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AttendanceRecords::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AttendanceRecords::SessionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceRecords::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AttendanceRecords::Status).string().not_null())
                    .col(ColumnDef::new(AttendanceRecords::Method).string().not_null())
                    .col(
                        ColumnDef::new(AttendanceRecords::ArrivalTime)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(AttendanceRecords::Points).double().not_null())
                    .col(ColumnDef::new(AttendanceRecords::Notes).text().null())
                    .col(
                        ColumnDef::new(AttendanceRecords::QrCodeId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceRecords::RecordedBy)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceRecords::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AttendanceRecords::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AttendanceRecords::Table, AttendanceRecords::SessionId)
                            .to(AttendanceSessions::Table, AttendanceSessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AttendanceRecords::Table, AttendanceRecords::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AttendanceRecords::Table, AttendanceRecords::QrCodeId)
                            .to(AttendanceQrCodes::Table, AttendanceQrCodes::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 每个学生在每个课次只有一条记录
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_attendance_records_session_student")
                    .table(AttendanceRecords::Table)
                    .col(AttendanceRecords::SessionId)
                    .col(AttendanceRecords::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 创建通知表
        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notifications::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notifications::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Notifications::NotificationType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Notifications::Priority).string().not_null())
                    .col(ColumnDef::new(Notifications::Title).string().not_null())
                    .col(ColumnDef::new(Notifications::Content).text().null())
                    .col(ColumnDef::new(Notifications::ReferenceType).string().null())
                    .col(
                        ColumnDef::new(Notifications::ReferenceId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Notifications::IsRead)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Notifications::ReadAt).big_integer().null())
                    .col(
                        ColumnDef::new(Notifications::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Notifications::Table, Notifications::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建安全事件表
        manager
            .create_table(
                Table::create()
                    .table(SecurityEvents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SecurityEvents::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SecurityEvents::EventType).string().not_null())
                    .col(ColumnDef::new(SecurityEvents::Severity).string().not_null())
                    .col(ColumnDef::new(SecurityEvents::UserId).big_integer().null())
                    .col(ColumnDef::new(SecurityEvents::IpAddress).string().null())
                    .col(ColumnDef::new(SecurityEvents::RequestPath).string().null())
                    .col(ColumnDef::new(SecurityEvents::Description).text().not_null())
                    .col(
                        ColumnDef::new(SecurityEvents::IsResolved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(SecurityEvents::ResolvedAt)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SecurityEvents::ResolvedBy)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SecurityEvents::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(SecurityEvents::Table, SecurityEvents::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建移动设备表
        manager
            .create_table(
                Table::create()
                    .table(MobileDevices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MobileDevices::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MobileDevices::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(MobileDevices::DeviceToken)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(MobileDevices::Platform).string().not_null())
                    .col(ColumnDef::new(MobileDevices::DeviceName).string().null())
                    .col(ColumnDef::new(MobileDevices::AppVersion).string().null())
                    .col(
                        ColumnDef::new(MobileDevices::NotificationsEnabled)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(MobileDevices::LastSeen)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MobileDevices::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(MobileDevices::Table, MobileDevices::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建课表条目表
        manager
            .create_table(
                Table::create()
                    .table(ScheduleEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScheduleEntries::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ScheduleEntries::SemesterId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleEntries::CourseId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleEntries::TeacherId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ScheduleEntries::Day).integer().not_null())
                    .col(
                        ColumnDef::new(ScheduleEntries::StartMinute)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScheduleEntries::EndMinute)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ScheduleEntries::RoomType).string().null())
                    .col(ColumnDef::new(ScheduleEntries::RoomId).big_integer().null())
                    .col(
                        ColumnDef::new(ScheduleEntries::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ScheduleEntries::Table, ScheduleEntries::SemesterId)
                            .to(Semesters::Table, Semesters::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ScheduleEntries::Table, ScheduleEntries::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_attendance_sessions_course_id")
                    .table(AttendanceSessions::Table)
                    .col(AttendanceSessions::CourseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_notifications_user_id_is_read")
                    .table(Notifications::Table)
                    .col(Notifications::UserId)
                    .col(Notifications::IsRead)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_security_events_created_at")
                    .table(SecurityEvents::Table)
                    .col(SecurityEvents::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_schedule_entries_semester_id")
                    .table(ScheduleEntries::Table)
                    .col(ScheduleEntries::SemesterId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ScheduleEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MobileDevices::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SecurityEvents::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AttendanceRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AttendanceQrCodes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AttendanceSessions::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum AttendanceSessions {
    #[sea_orm(iden = "attendance_sessions")]
    Table,
    Id,
    CourseId,
    InstructorId,
    Title,
    SessionType,
    ScheduledStart,
    ScheduledEnd,
    ActualStart,
    ActualEnd,
    Status,
    AttendanceWindowMinutes,
    LateThresholdMinutes,
    Latitude,
    Longitude,
    RadiusMeters,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum AttendanceQrCodes {
    #[sea_orm(iden = "attendance_qr_codes")]
    Table,
    Id,
    SessionId,
    Code,
    ExpiresAt,
    MaxUsage,
    UsageCount,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum AttendanceRecords {
    #[sea_orm(iden = "attendance_records")]
    Table,
    Id,
    SessionId,
    StudentId,
    Status,
    Method,
    ArrivalTime,
    Points,
    Notes,
    QrCodeId,
    RecordedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Notifications {
    #[sea_orm(iden = "notifications")]
    Table,
    Id,
    UserId,
    NotificationType,
    Priority,
    Title,
    Content,
    ReferenceType,
    ReferenceId,
    IsRead,
    ReadAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum SecurityEvents {
    #[sea_orm(iden = "security_events")]
    Table,
    Id,
    EventType,
    Severity,
    UserId,
    IpAddress,
    RequestPath,
    Description,
    IsResolved,
    ResolvedAt,
    ResolvedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum MobileDevices {
    #[sea_orm(iden = "mobile_devices")]
    Table,
    Id,
    UserId,
    DeviceToken,
    Platform,
    DeviceName,
    AppVersion,
    NotificationsEnabled,
    LastSeen,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ScheduleEntries {
    #[sea_orm(iden = "schedule_entries")]
    Table,
    Id,
    SemesterId,
    CourseId,
    TeacherId,
    Day,
    StartMinute,
    EndMinute,
    RoomType,
    RoomId,
    CreatedAt,
}
