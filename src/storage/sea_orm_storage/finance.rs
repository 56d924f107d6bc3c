//! 学生财务存储操作

use chrono::Utc;

use super::SeaOrmStorage;
use crate::entity::payments::{
    ActiveModel as PaymentActiveModel, Column as PaymentColumn, Entity as Payments,
};
use crate::entity::student_accounts::{ActiveModel, Column, Entity as StudentAccounts};
use crate::entity::student_charges::{
    ActiveModel as ChargeActiveModel, Column as ChargeColumn, Entity as StudentCharges,
};
use crate::errors::{Result, UniSystemError};
use crate::models::PaginatedResponse;
use crate::models::finance::{
    AccountListParams, AccountListResponse, AccountStatus, ChargeStatus, CreateAccountRequest,
    CreateChargeRequest, Payment, PaymentStatus, RecordPaymentRequest, StudentAccount,
    StudentCharge, UpdateAccountRequest, ledger,
};
use crate::utils::escape_like_pattern;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

impl SeaOrmStorage {
    pub async fn create_student_account_impl(
        &self,
        req: CreateAccountRequest,
    ) -> Result<StudentAccount> {
        let now = Utc::now();

        let model = ActiveModel {
            student_id: Set(req.student_id),
            account_number: Set(ledger::account_number_at(now, req.student_id)),
            status: Set(AccountStatus::Active.to_string()),
            credit_limit_cents: Set(req.credit_limit_cents),
            notes: Set(req.notes),
            created_at: Set(now.timestamp()),
            updated_at: Set(now.timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("创建财务账户失败", e))?;

        Ok(result.into_account())
    }

    pub async fn get_student_account_by_id_impl(&self, id: i64) -> Result<Option<StudentAccount>> {
        let result = StudentAccounts::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("查询财务账户失败", e))?;

        Ok(result.map(|m| m.into_account()))
    }

    pub async fn get_student_account_by_student_impl(
        &self,
        student_id: i64,
    ) -> Result<Option<StudentAccount>> {
        let result = StudentAccounts::find()
            .filter(Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("查询财务账户失败", e))?;

        Ok(result.map(|m| m.into_account()))
    }

    pub async fn list_student_accounts_with_pagination_impl(
        &self,
        query: AccountListParams,
    ) -> Result<AccountListResponse> {
        let (page, size) = query.pagination.normalized();
        let mut select = StudentAccounts::find();

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.as_str()));
        }
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(Column::AccountNumber.starts_with(&escaped));
        }

        let paginator = select
            .order_by_asc(Column::AccountNumber)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| UniSystemError::from_db("查询财务账户总数失败", e))?;
        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| UniSystemError::from_db("查询财务账户列表失败", e))?;

        Ok(PaginatedResponse::new(
            items.into_iter().map(|m| m.into_account()).collect(),
            page,
            size,
            total,
        ))
    }

    pub async fn update_student_account_impl(
        &self,
        id: i64,
        update: UpdateAccountRequest,
    ) -> Result<Option<StudentAccount>> {
        if self.get_student_account_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }
        if let Some(limit) = update.credit_limit_cents {
            model.credit_limit_cents = Set(limit);
        }
        if let Some(notes) = update.notes {
            model.notes = Set(Some(notes));
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("更新财务账户失败", e))?;

        Ok(Some(updated.into_account()))
    }

    /// 记一笔费用，账户不存在返回 `NotFound`，已关闭返回 `InvalidState`
    pub async fn create_charge_impl(
        &self,
        account_id: i64,
        req: CreateChargeRequest,
        posted_by: i64,
    ) -> Result<StudentCharge> {
        let now = Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| UniSystemError::from_db("开启事务失败", e))?;

        open_account(&txn, account_id).await?;

        let model = ChargeActiveModel {
            account_id: Set(account_id),
            category: Set(req.category.to_string()),
            description: Set(req.description.trim().to_string()),
            amount_cents: Set(req.amount_cents),
            discount_cents: Set(req.discount_cents),
            due_at: Set(req.due_at.timestamp()),
            semester_id: Set(req.semester_id),
            status: Set(ChargeStatus::Pending.to_string()),
            posted_by: Set(Some(posted_by)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let charge = model
            .insert(&txn)
            .await
            .map_err(|e| UniSystemError::from_db("创建费用失败", e))?;

        txn.commit()
            .await
            .map_err(|e| UniSystemError::from_db("提交事务失败", e))?;

        Ok(charge.into_charge())
    }

    pub async fn get_charge_by_id_impl(&self, id: i64) -> Result<Option<StudentCharge>> {
        let result = StudentCharges::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("查询费用失败", e))?;

        Ok(result.map(|m| m.into_charge()))
    }

    pub async fn list_account_charges_impl(&self, account_id: i64) -> Result<Vec<StudentCharge>> {
        let models = StudentCharges::find()
            .filter(ChargeColumn::AccountId.eq(account_id))
            .order_by_asc(ChargeColumn::DueAt)
            .order_by_asc(ChargeColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("查询费用列表失败", e))?;

        Ok(models.into_iter().map(|m| m.into_charge()).collect())
    }

    /// 作废待缴费用，只有 pending 状态能作废
    pub async fn cancel_charge_impl(&self, id: i64) -> Result<Option<StudentCharge>> {
        let result = StudentCharges::update_many()
            .col_expr(
                ChargeColumn::Status,
                Expr::value(ChargeStatus::Cancelled.to_string()),
            )
            .col_expr(ChargeColumn::UpdatedAt, Expr::value(Utc::now().timestamp()))
            .filter(ChargeColumn::Id.eq(id))
            .filter(ChargeColumn::Status.eq(ChargeStatus::Pending.to_string()))
            .exec(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("作废费用失败", e))?;

        let charge = self.get_charge_by_id_impl(id).await?;
        if result.rows_affected == 0 && charge.is_some() {
            return Err(UniSystemError::invalid_state(format!(
                "Charge {id} is already cancelled"
            )));
        }
        Ok(charge)
    }

    /// 入账一笔缴费，账户检查与写入在同一事务内
    pub async fn record_payment_impl(
        &self,
        account_id: i64,
        req: RecordPaymentRequest,
        recorded_by: i64,
    ) -> Result<Payment> {
        let now = Utc::now();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| UniSystemError::from_db("开启事务失败", e))?;

        open_account(&txn, account_id).await?;

        let model = PaymentActiveModel {
            account_id: Set(account_id),
            amount_cents: Set(req.amount_cents),
            method: Set(req.method.to_string()),
            status: Set(PaymentStatus::Completed.to_string()),
            reference: Set(req.reference),
            paid_at: Set(req.paid_at.unwrap_or(now).timestamp()),
            recorded_by: Set(Some(recorded_by)),
            refunded_at: Set(None),
            created_at: Set(now.timestamp()),
            updated_at: Set(now.timestamp()),
            ..Default::default()
        };

        let payment = model
            .insert(&txn)
            .await
            .map_err(|e| UniSystemError::from_db("创建缴费记录失败", e))?;

        txn.commit()
            .await
            .map_err(|e| UniSystemError::from_db("提交事务失败", e))?;

        Ok(payment.into_payment())
    }

    pub async fn get_payment_by_id_impl(&self, id: i64) -> Result<Option<Payment>> {
        let result = Payments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("查询缴费记录失败", e))?;

        Ok(result.map(|m| m.into_payment()))
    }

    pub async fn list_account_payments_impl(&self, account_id: i64) -> Result<Vec<Payment>> {
        let models = Payments::find()
            .filter(PaymentColumn::AccountId.eq(account_id))
            .order_by_asc(PaymentColumn::PaidAt)
            .order_by_asc(PaymentColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("查询缴费记录失败", e))?;

        Ok(models.into_iter().map(|m| m.into_payment()).collect())
    }

    /// 退款：completed -> refunded 条件更新，同一笔只能退一次
    pub async fn refund_payment_impl(&self, id: i64) -> Result<Option<Payment>> {
        let now = Utc::now().timestamp();
        let result = Payments::update_many()
            .col_expr(
                PaymentColumn::Status,
                Expr::value(PaymentStatus::Refunded.to_string()),
            )
            .col_expr(PaymentColumn::RefundedAt, Expr::value(Some(now)))
            .col_expr(PaymentColumn::UpdatedAt, Expr::value(now))
            .filter(PaymentColumn::Id.eq(id))
            .filter(PaymentColumn::Status.eq(PaymentStatus::Completed.to_string()))
            .exec(&self.db)
            .await
            .map_err(|e| UniSystemError::from_db("退款失败", e))?;

        let payment = self.get_payment_by_id_impl(id).await?;
        if result.rows_affected == 0 && payment.is_some() {
            return Err(UniSystemError::invalid_state(format!(
                "Payment {id} is already refunded"
            )));
        }
        Ok(payment)
    }
}

/// 读取可入账的账户
async fn open_account<C: ConnectionTrait>(conn: &C, account_id: i64) -> Result<StudentAccount> {
    let account = StudentAccounts::find_by_id(account_id)
        .one(conn)
        .await
        .map_err(|e| UniSystemError::from_db("查询财务账户失败", e))?
        .ok_or_else(|| UniSystemError::not_found(format!("Account {account_id}")))?
        .into_account();

    if !account.accepts_postings() {
        return Err(UniSystemError::invalid_state(format!(
            "Account {account_id} is closed"
        )));
    }
    Ok(account)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::super::SeaOrmStorage;
    use super::super::test_support::{Seed, seed_catalog, test_storage};
    use crate::models::finance::{
        AccountListParams, AccountStatus, ChargeCategory, ChargeStatus, CreateAccountRequest,
        CreateChargeRequest, PaymentMethod, PaymentStatus, RecordPaymentRequest,
        StudentAccount, UpdateAccountRequest, ledger,
    };

    async fn open(storage: &SeaOrmStorage, seed: &Seed) -> StudentAccount {
        storage
            .create_student_account_impl(CreateAccountRequest {
                student_id: seed.student_id,
                credit_limit_cents: 0,
                notes: None,
            })
            .await
            .unwrap()
    }

    fn tuition(amount_cents: i64) -> CreateChargeRequest {
        CreateChargeRequest {
            category: ChargeCategory::Tuition,
            description: "Fall tuition".to_string(),
            amount_cents,
            discount_cents: 0,
            due_at: Utc::now() + Duration::days(30),
            semester_id: None,
        }
    }

    fn cash(amount_cents: i64) -> RecordPaymentRequest {
        RecordPaymentRequest {
            amount_cents,
            method: PaymentMethod::Cash,
            reference: Some("R-1".to_string()),
            paid_at: None,
        }
    }

    #[tokio::test]
    async fn test_one_account_per_student() {
        let storage = test_storage().await;
        let seed = seed_catalog(&storage).await;

        let account = open(&storage, &seed).await;
        assert_eq!(account.status, AccountStatus::Active);
        assert_eq!(
            account.account_number,
            ledger::account_number_at(Utc::now(), seed.student_id)
        );
        assert_eq!(
            storage
                .get_student_account_by_student_impl(seed.student_id)
                .await
                .unwrap()
                .unwrap()
                .id,
            account.id
        );

        let err = storage
            .create_student_account_impl(CreateAccountRequest {
                student_id: seed.student_id,
                credit_limit_cents: 0,
                notes: None,
            })
            .await
            .unwrap_err();
        assert!(err.is_conflict());

        let listed = storage
            .list_student_accounts_with_pagination_impl(AccountListParams {
                status: Some(AccountStatus::Active),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(listed.items.len(), 1);
    }

    #[tokio::test]
    async fn test_charges_and_payments_feed_the_statement() {
        let storage = test_storage().await;
        let seed = seed_catalog(&storage).await;
        let account = open(&storage, &seed).await;

        let charge = storage
            .create_charge_impl(account.id, tuition(120_000), seed.teacher_id)
            .await
            .unwrap();
        assert_eq!(charge.status, ChargeStatus::Pending);
        storage
            .record_payment_impl(account.id, cash(50_000), seed.teacher_id)
            .await
            .unwrap();

        let statement = ledger::build_statement(
            account.clone(),
            storage.list_account_charges_impl(account.id).await.unwrap(),
            storage.list_account_payments_impl(account.id).await.unwrap(),
            Utc::now(),
        );
        assert_eq!(statement.balance_cents, 70_000);
        assert_eq!(statement.charges[0].paid_cents, 50_000);
    }

    #[tokio::test]
    async fn test_cancel_and_refund_happen_once() {
        let storage = test_storage().await;
        let seed = seed_catalog(&storage).await;
        let account = open(&storage, &seed).await;
        let charge = storage
            .create_charge_impl(account.id, tuition(10_000), seed.teacher_id)
            .await
            .unwrap();
        let payment = storage
            .record_payment_impl(account.id, cash(10_000), seed.teacher_id)
            .await
            .unwrap();

        let cancelled = storage.cancel_charge_impl(charge.id).await.unwrap().unwrap();
        assert_eq!(cancelled.status, ChargeStatus::Cancelled);
        assert!(
            storage
                .cancel_charge_impl(charge.id)
                .await
                .unwrap_err()
                .is_invalid_state()
        );

        let refunded = storage.refund_payment_impl(payment.id).await.unwrap().unwrap();
        assert_eq!(refunded.status, PaymentStatus::Refunded);
        assert!(refunded.refunded_at.is_some());
        assert!(
            storage
                .refund_payment_impl(payment.id)
                .await
                .unwrap_err()
                .is_invalid_state()
        );

        assert!(storage.cancel_charge_impl(9999).await.unwrap().is_none());
        assert!(storage.refund_payment_impl(9999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_closed_account_rejects_postings() {
        let storage = test_storage().await;
        let seed = seed_catalog(&storage).await;
        let account = open(&storage, &seed).await;
        storage
            .update_student_account_impl(
                account.id,
                UpdateAccountRequest {
                    status: Some(AccountStatus::Closed),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let err = storage
            .create_charge_impl(account.id, tuition(10_000), seed.teacher_id)
            .await
            .unwrap_err();
        assert!(err.is_invalid_state());
        let err = storage
            .record_payment_impl(account.id, cash(10_000), seed.teacher_id)
            .await
            .unwrap_err();
        assert!(err.is_invalid_state());
        assert!(
            storage
                .list_account_charges_impl(account.id)
                .await
                .unwrap()
                .is_empty()
        );

        let missing = storage
            .record_payment_impl(9999, cash(10_000), seed.teacher_id)
            .await
            .unwrap_err();
        assert!(matches!(missing, crate::errors::UniSystemError::NotFound(_)));
    }
}
