//! 教职工存储操作

use super::SeaOrmStorage;
use crate::entity::staff_members::{ActiveModel, Column, Entity as StaffMembers};
use crate::errors::{Result, UniSystemError};
use crate::models::PaginatedResponse;
use crate::models::staff::{
    CreateStaffRequest, HIRE_DATE_FORMAT, StaffListParams, StaffListResponse, StaffMember,
    StaffStatus, UpdateStaffRequest,
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    pub async fn create_staff_member_impl(&self, req: CreateStaffRequest) -> Result<StaffMember> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            user_id: Set(req.user_id),
            employee_number: Set(req.employee_number),
            department_id: Set(req.department_id),
            position: Set(req.position.trim().to_string()),
            employment_type: Set(req.employment_type.to_string()),
            hire_date: Set(req.hire_date.format(HIRE_DATE_FORMAT).to_string()),
            salary_cents: Set(req.salary_cents),
            status: Set(StaffStatus::Active.to_string()),
            academic_rank: Set(req.academic_rank.map(|rank| rank.to_string())),
            specialization: Set(req.specialization),
            office_hours: Set(req.office_hours),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("创建教职工档案失败", e))?;

        Ok(result.into_staff())
    }

    pub async fn get_staff_member_by_id_impl(&self, id: i64) -> Result<Option<StaffMember>> {
        let result = StaffMembers::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("查询教职工档案失败", e))?;

        Ok(result.map(|m| m.into_staff()))
    }

    pub async fn list_staff_members_with_pagination_impl(
        &self,
        query: StaffListParams,
    ) -> Result<StaffListResponse> {
        let (page, size) = query.pagination.normalized();
        let mut select = StaffMembers::find();

        if let Some(department_id) = query.department_id {
            select = select.filter(Column::DepartmentId.eq(department_id));
        }
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.as_str()));
        }
        if let Some(employment_type) = query.employment_type {
            select = select.filter(Column::EmploymentType.eq(employment_type.as_str()));
        }
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::EmployeeNumber.contains(&escaped))
                    .add(Column::Position.contains(&escaped)),
            );
        }

        let paginator = select
            .order_by_asc(Column::EmployeeNumber)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| UniSystemError::from_db("查询教职工总数失败", e))?;
        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| UniSystemError::from_db("查询教职工列表失败", e))?;

        Ok(PaginatedResponse::new(
            items.into_iter().map(|m| m.into_staff()).collect(),
            page,
            size,
            total,
        ))
    }

    pub async fn update_staff_member_impl(
        &self,
        id: i64,
        update: UpdateStaffRequest,
    ) -> Result<Option<StaffMember>> {
        if self.get_staff_member_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(number) = update.employee_number {
            model.employee_number = Set(number);
        }
        if let Some(department_id) = update.department_id {
            model.department_id = Set(Some(department_id));
        }
        if let Some(position) = update.position {
            model.position = Set(position.trim().to_string());
        }
        if let Some(employment_type) = update.employment_type {
            model.employment_type = Set(employment_type.to_string());
        }
        if let Some(hire_date) = update.hire_date {
            model.hire_date = Set(hire_date.format(HIRE_DATE_FORMAT).to_string());
        }
        if let Some(salary) = update.salary_cents {
            model.salary_cents = Set(salary);
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }
        if let Some(rank) = update.academic_rank {
            model.academic_rank = Set(Some(rank.to_string()));
        }
        if let Some(specialization) = update.specialization {
            model.specialization = Set(Some(specialization));
        }
        if let Some(office_hours) = update.office_hours {
            model.office_hours = Set(Some(office_hours));
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("更新教职工档案失败", e))?;

        Ok(Some(updated.into_staff()))
    }

    pub async fn delete_staff_member_impl(&self, id: i64) -> Result<bool> {
        let result = StaffMembers::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("删除教职工档案失败", e))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::super::test_support::{seed_catalog, test_storage};
    use crate::models::staff::{
        AcademicRank, CreateStaffRequest, EmploymentType, StaffListParams, StaffStatus,
        UpdateStaffRequest,
    };

    fn lecturer(user_id: i64, department_id: i64, number: &str) -> CreateStaffRequest {
        CreateStaffRequest {
            user_id,
            employee_number: number.to_string(),
            department_id: Some(department_id),
            position: "Lecturer".to_string(),
            employment_type: EmploymentType::FullTime,
            hire_date: NaiveDate::from_ymd_opt(2019, 9, 1).unwrap(),
            salary_cents: 820_000,
            academic_rank: Some(AcademicRank::Lecturer),
            specialization: Some("Compilers".to_string()),
            office_hours: Some("Tue 14:00-16:00".to_string()),
        }
    }

    #[tokio::test]
    async fn test_staff_lifecycle() {
        let storage = test_storage().await;
        let seed = seed_catalog(&storage).await;

        let staff = storage
            .create_staff_member_impl(lecturer(seed.teacher_id, seed.department_id, "E1001"))
            .await
            .unwrap();
        assert_eq!(staff.status, StaffStatus::Active);
        assert_eq!(staff.hire_date, NaiveDate::from_ymd_opt(2019, 9, 1).unwrap());
        assert_eq!(staff.academic_rank, Some(AcademicRank::Lecturer));

        // 同一用户只能有一份档案
        let err = storage
            .create_staff_member_impl(lecturer(seed.teacher_id, seed.department_id, "E1002"))
            .await
            .unwrap_err();
        assert!(err.is_conflict());

        let updated = storage
            .update_staff_member_impl(
                staff.id,
                UpdateStaffRequest {
                    status: Some(StaffStatus::OnLeave),
                    academic_rank: Some(AcademicRank::AssistantProfessor),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, StaffStatus::OnLeave);
        assert_eq!(updated.academic_rank, Some(AcademicRank::AssistantProfessor));
        assert_eq!(updated.position, "Lecturer");

        let on_leave = storage
            .list_staff_members_with_pagination_impl(StaffListParams {
                status: Some(StaffStatus::OnLeave),
                search: Some("E10".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(on_leave.items.len(), 1);

        assert!(storage.delete_staff_member_impl(staff.id).await.unwrap());
        assert!(
            storage
                .get_staff_member_by_id_impl(staff.id)
                .await
                .unwrap()
                .is_none()
        );
    }
}
