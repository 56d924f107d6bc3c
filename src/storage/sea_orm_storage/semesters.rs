//! 学期存储操作

use super::SeaOrmStorage;
use crate::entity::semesters::{ActiveModel, Column, Entity as Semesters};
use crate::errors::{Result, UniSystemError};
use crate::models::PaginatedResponse;
use crate::models::semesters::{
    CreateSemesterRequest, Semester, SemesterListParams, SemesterListResponse,
    UpdateSemesterRequest,
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

impl SeaOrmStorage {
    pub async fn create_semester_impl(&self, req: CreateSemesterRequest) -> Result<Semester> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name),
            term: Set(req.term.to_string()),
            start_at: Set(req.start_at.timestamp()),
            end_at: Set(req.end_at.timestamp()),
            registration_start: Set(req.registration_start.timestamp()),
            registration_end: Set(req.registration_end.timestamp()),
            is_current: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("创建学期失败", e))?;

        Ok(result.into_semester())
    }

    pub async fn get_semester_by_id_impl(&self, id: i64) -> Result<Option<Semester>> {
        let result = Semesters::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("查询学期失败", e))?;

        Ok(result.map(|m| m.into_semester()))
    }

    pub async fn list_semesters_with_pagination_impl(
        &self,
        query: SemesterListParams,
    ) -> Result<SemesterListResponse> {
        let (page, size) = query.pagination.normalized();
        let mut select = Semesters::find();

        if let Some(term) = query.term {
            select = select.filter(Column::Term.eq(term.to_string()));
        }
        if let Some(is_current) = query.is_current {
            select = select.filter(Column::IsCurrent.eq(is_current));
        }

        let paginator = select
            .order_by_desc(Column::StartAt)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| UniSystemError::from_db("查询学期总数失败", e))?;
        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| UniSystemError::from_db("查询学期列表失败", e))?;

        Ok(PaginatedResponse::new(
            items.into_iter().map(|m| m.into_semester()).collect(),
            page,
            size,
            total,
        ))
    }

    pub async fn update_semester_impl(
        &self,
        id: i64,
        update: UpdateSemesterRequest,
    ) -> Result<Option<Semester>> {
        if self.get_semester_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(term) = update.term {
            model.term = Set(term.to_string());
        }
        if let Some(start_at) = update.start_at {
            model.start_at = Set(start_at.timestamp());
        }
        if let Some(end_at) = update.end_at {
            model.end_at = Set(end_at.timestamp());
        }
        if let Some(registration_start) = update.registration_start {
            model.registration_start = Set(registration_start.timestamp());
        }
        if let Some(registration_end) = update.registration_end {
            model.registration_end = Set(registration_end.timestamp());
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("更新学期失败", e))?;

        Ok(Some(updated.into_semester()))
    }

    pub async fn delete_semester_impl(&self, id: i64) -> Result<bool> {
        let result = Semesters::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("删除学期失败", e))?;

        Ok(result.rows_affected > 0)
    }

    /// 设为当前学期，同一事务内清除其他学期的当前标记
    pub async fn activate_semester_impl(&self, id: i64) -> Result<Option<Semester>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| UniSystemError::from_db("开启事务失败", e))?;

        let Some(existing) = Semesters::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| UniSystemError::from_db("查询学期失败", e))?
        else {
            return Ok(None);
        };

        let now = chrono::Utc::now().timestamp();
        Semesters::update_many()
            .col_expr(Column::IsCurrent, Expr::value(false))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::IsCurrent.eq(true))
            .filter(Column::Id.ne(id))
            .exec(&txn)
            .await
            .map_err(|e| UniSystemError::from_db("清除当前学期失败", e))?;

        let mut model: ActiveModel = existing.into();
        model.is_current = Set(true);
        model.updated_at = Set(now);
        let updated = model
            .update(&txn)
            .await
            .map_err(|e| UniSystemError::from_db("设置当前学期失败", e))?;

        txn.commit()
            .await
            .map_err(|e| UniSystemError::from_db("提交事务失败", e))?;

        Ok(Some(updated.into_semester()))
    }
}

/// 时间点所在的学期，不在任何学期内时取当前学期
pub(super) async fn semester_at<C: ConnectionTrait>(conn: &C, at: i64) -> Result<Option<i64>> {
    let containing: Option<i64> = Semesters::find()
        .select_only()
        .column(Column::Id)
        .filter(Column::StartAt.lte(at))
        .filter(Column::EndAt.gte(at))
        .order_by_desc(Column::StartAt)
        .into_tuple()
        .one(conn)
        .await
        .map_err(|e| UniSystemError::from_db("查询所在学期失败", e))?;
    if containing.is_some() {
        return Ok(containing);
    }

    Semesters::find()
        .select_only()
        .column(Column::Id)
        .filter(Column::IsCurrent.eq(true))
        .into_tuple()
        .one(conn)
        .await
        .map_err(|e| UniSystemError::from_db("查询当前学期失败", e))
}
