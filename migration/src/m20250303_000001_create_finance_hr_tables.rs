use sea_orm_migration::prelude::*;

use super::m20250301_000001_create_academic_tables::{Departments, Semesters, Students, Users};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建学生账户表
        manager
            .create_table(
                Table::create()
                    .table(StudentAccounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StudentAccounts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(StudentAccounts::StudentId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(StudentAccounts::AccountNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(StudentAccounts::Status).string().not_null())
                    .col(
                        ColumnDef::new(StudentAccounts::CreditLimitCents)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(StudentAccounts::Notes).text().null())
                    .col(
                        ColumnDef::new(StudentAccounts::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentAccounts::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(StudentAccounts::Table, StudentAccounts::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建费用表
        manager
            .create_table(
                Table::create()
                    .table(StudentCharges::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StudentCharges::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(StudentCharges::AccountId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StudentCharges::Category).string().not_null())
                    .col(
                        ColumnDef::new(StudentCharges::Description)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentCharges::AmountCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentCharges::DiscountCents)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(StudentCharges::DueAt).big_integer().not_null())
                    .col(
                        ColumnDef::new(StudentCharges::SemesterId)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(StudentCharges::Status).string().not_null())
                    .col(
                        ColumnDef::new(StudentCharges::PostedBy)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(StudentCharges::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentCharges::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(StudentCharges::Table, StudentCharges::AccountId)
                            .to(StudentAccounts::Table, StudentAccounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(StudentCharges::Table, StudentCharges::SemesterId)
                            .to(Semesters::Table, Semesters::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(StudentCharges::Table, StudentCharges::PostedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_student_charges_account_due")
                    .table(StudentCharges::Table)
                    .col(StudentCharges::AccountId)
                    .col(StudentCharges::DueAt)
                    .to_owned(),
            )
            .await?;

        // 创建缴费表
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Payments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Payments::AccountId).big_integer().not_null())
                    .col(ColumnDef::new(Payments::AmountCents).big_integer().not_null())
                    .col(ColumnDef::new(Payments::Method).string().not_null())
                    .col(ColumnDef::new(Payments::Status).string().not_null())
                    .col(ColumnDef::new(Payments::Reference).string().null())
                    .col(ColumnDef::new(Payments::PaidAt).big_integer().not_null())
                    .col(ColumnDef::new(Payments::RecordedBy).big_integer().null())
                    .col(ColumnDef::new(Payments::RefundedAt).big_integer().null())
                    .col(ColumnDef::new(Payments::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Payments::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Payments::Table, Payments::AccountId)
                            .to(StudentAccounts::Table, StudentAccounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Payments::Table, Payments::RecordedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建教职工表
        manager
            .create_table(
                Table::create()
                    .table(StaffMembers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StaffMembers::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(StaffMembers::UserId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(StaffMembers::EmployeeNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(StaffMembers::DepartmentId)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(StaffMembers::Position).string().not_null())
                    .col(
                        ColumnDef::new(StaffMembers::EmploymentType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StaffMembers::HireDate).string().not_null())
                    .col(
                        ColumnDef::new(StaffMembers::SalaryCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StaffMembers::Status).string().not_null())
                    .col(ColumnDef::new(StaffMembers::AcademicRank).string().null())
                    .col(ColumnDef::new(StaffMembers::Specialization).string().null())
                    .col(ColumnDef::new(StaffMembers::OfficeHours).string().null())
                    .col(
                        ColumnDef::new(StaffMembers::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StaffMembers::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(StaffMembers::Table, StaffMembers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(StaffMembers::Table, StaffMembers::DepartmentId)
                            .to(Departments::Table, Departments::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StaffMembers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StudentCharges::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StudentAccounts::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum StudentAccounts {
    #[sea_orm(iden = "student_accounts")]
    Table,
    Id,
    StudentId,
    AccountNumber,
    Status,
    CreditLimitCents,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum StudentCharges {
    #[sea_orm(iden = "student_charges")]
    Table,
    Id,
    AccountId,
    Category,
    Description,
    AmountCents,
    DiscountCents,
    DueAt,
    SemesterId,
    Status,
    PostedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Payments {
    #[sea_orm(iden = "payments")]
    Table,
    Id,
    AccountId,
    AmountCents,
    Method,
    Status,
    Reference,
    PaidAt,
    RecordedBy,
    RefundedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum StaffMembers {
    #[sea_orm(iden = "staff_members")]
    Table,
    Id,
    UserId,
    EmployeeNumber,
    DepartmentId,
    Position,
    EmploymentType,
    HireDate,
    SalaryCents,
    Status,
    AcademicRank,
    Specialization,
    OfficeHours,
    CreatedAt,
    UpdatedAt,
}
