//! 学生财务：账户、费用与缴费
//!
//! 金额一律以分为单位的整数存储，余额由费用与缴费流水实时计算，不落库。

pub mod ledger;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::common::enums::define_string_enum;
use crate::models::common::{PaginatedResponse, PaginationQuery};

define_string_enum! {
    /// 账户状态
    pub enum AccountStatus {
        Active => "active",
        Suspended => "suspended",
        Closed => "closed",
        Hold => "hold",
    }
}

define_string_enum! {
    /// 费用类别
    pub enum ChargeCategory {
        Tuition => "tuition",
        Registration => "registration",
        Laboratory => "laboratory",
        Library => "library",
        Activity => "activity",
        Medical => "medical",
        Housing => "housing",
        Penalty => "penalty",
        Other => "other",
    }
}

define_string_enum! {
    pub enum ChargeStatus {
        Pending => "pending",
        Cancelled => "cancelled",
    }
}

define_string_enum! {
    /// 缴费方式
    pub enum PaymentMethod {
        Cash => "cash",
        CreditCard => "credit_card",
        DebitCard => "debit_card",
        BankTransfer => "bank_transfer",
        OnlinePayment => "online_payment",
        Check => "check",
        Other => "other",
    }
}

define_string_enum! {
    pub enum PaymentStatus {
        Completed => "completed",
        Refunded => "refunded",
    }
}

/// 学生财务账户，一个学生至多一个
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentAccount {
    pub id: i64,
    pub student_id: i64,
    pub account_number: String,
    pub status: AccountStatus,
    /// 允许的最大欠费
    pub credit_limit_cents: i64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StudentAccount {
    /// 已关闭的账户不再入账
    pub fn accepts_postings(&self) -> bool {
        self.status != AccountStatus::Closed
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentCharge {
    pub id: i64,
    pub account_id: i64,
    pub category: ChargeCategory,
    pub description: String,
    pub amount_cents: i64,
    pub discount_cents: i64,
    pub due_at: DateTime<Utc>,
    pub semester_id: Option<i64>,
    pub status: ChargeStatus,
    pub posted_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StudentCharge {
    /// 折后应付金额
    pub fn net_cents(&self) -> i64 {
        self.amount_cents - self.discount_cents
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub account_id: i64,
    pub amount_cents: i64,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub reference: Option<String>,
    pub paid_at: DateTime<Utc>,
    pub recorded_by: Option<i64>,
    pub refunded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<AccountStatus>,
    /// 按账号前缀搜索
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub student_id: i64,
    #[serde(default)]
    pub credit_limit_cents: i64,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateAccountRequest {
    pub status: Option<AccountStatus>,
    pub credit_limit_cents: Option<i64>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateChargeRequest {
    pub category: ChargeCategory,
    pub description: String,
    pub amount_cents: i64,
    #[serde(default)]
    pub discount_cents: i64,
    pub due_at: DateTime<Utc>,
    pub semester_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct RecordPaymentRequest {
    pub amount_cents: i64,
    pub method: PaymentMethod,
    pub reference: Option<String>,
    /// 缺省为入账时间
    pub paid_at: Option<DateTime<Utc>>,
}

/// 对账单中的一笔费用，已按到期顺序分摊缴费
#[derive(Debug, Clone, Serialize)]
pub struct ChargeLine {
    #[serde(flatten)]
    pub charge: StudentCharge,
    pub net_cents: i64,
    pub paid_cents: i64,
    pub remaining_cents: i64,
    pub is_overdue: bool,
    pub days_overdue: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountStatement {
    pub account: StudentAccount,
    pub total_charges_cents: i64,
    pub total_payments_cents: i64,
    /// 正数为欠费，负数为预存
    pub balance_cents: i64,
    pub outstanding_cents: i64,
    pub credit_balance_cents: i64,
    pub overdue_cents: i64,
    pub next_due_at: Option<DateTime<Utc>>,
    pub in_good_standing: bool,
    pub charges: Vec<ChargeLine>,
    pub payments: Vec<Payment>,
}

pub type AccountListResponse = PaginatedResponse<StudentAccount>;
