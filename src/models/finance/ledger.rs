//! 账户对账
//!
//! 余额 = 未作废费用的折后金额之和 - 已完成缴费之和。缴费不绑定具体费用，
//! 按到期时间（同时到期按 id）先到先还的顺序分摊。

use chrono::{DateTime, Datelike, Utc};

use super::{
    AccountStatement, AccountStatus, ChargeLine, ChargeStatus, Payment, PaymentStatus,
    StudentAccount, StudentCharge,
};

/// 账号：入账年份 + 6 位学生档案 id
pub fn account_number(year: i32, student_id: i64) -> String {
    format!("{year}{student_id:06}")
}

pub fn account_number_at(at: DateTime<Utc>, student_id: i64) -> String {
    account_number(at.year(), student_id)
}

/// 折扣不能为负，也不能超过原价
pub fn validate_charge_amounts(amount_cents: i64, discount_cents: i64) -> Result<(), String> {
    if amount_cents <= 0 {
        return Err("Charge amount must be positive".to_string());
    }
    if !(0..=amount_cents).contains(&discount_cents) {
        return Err("Discount must be between 0 and the charge amount".to_string());
    }
    Ok(())
}

pub fn build_statement(
    account: StudentAccount,
    mut charges: Vec<StudentCharge>,
    payments: Vec<Payment>,
    now: DateTime<Utc>,
) -> AccountStatement {
    charges.retain(|c| c.status != ChargeStatus::Cancelled);
    charges.sort_by(|a, b| a.due_at.cmp(&b.due_at).then(a.id.cmp(&b.id)));

    let total_charges: i64 = charges.iter().map(StudentCharge::net_cents).sum();
    let total_payments: i64 = payments
        .iter()
        .filter(|p| p.status == PaymentStatus::Completed)
        .map(|p| p.amount_cents)
        .sum();

    let mut pool = total_payments;
    let lines: Vec<ChargeLine> = charges
        .into_iter()
        .map(|charge| {
            let net = charge.net_cents();
            let paid = pool.min(net).max(0);
            pool -= paid;
            let remaining = net - paid;
            let is_overdue = remaining > 0 && now > charge.due_at;
            ChargeLine {
                net_cents: net,
                paid_cents: paid,
                remaining_cents: remaining,
                is_overdue,
                days_overdue: if is_overdue {
                    (now - charge.due_at).num_days()
                } else {
                    0
                },
                charge,
            }
        })
        .collect();

    let balance = total_charges - total_payments;
    let outstanding = balance.max(0);
    let overdue = lines
        .iter()
        .filter(|l| l.is_overdue)
        .map(|l| l.remaining_cents)
        .sum();
    let next_due_at = lines
        .iter()
        .filter(|l| l.remaining_cents > 0 && l.charge.due_at >= now)
        .map(|l| l.charge.due_at)
        .min();
    let in_good_standing =
        account.status == AccountStatus::Active && outstanding <= account.credit_limit_cents;

    AccountStatement {
        account,
        total_charges_cents: total_charges,
        total_payments_cents: total_payments,
        balance_cents: balance,
        outstanding_cents: outstanding,
        credit_balance_cents: (-balance).max(0),
        overdue_cents: overdue,
        next_due_at,
        in_good_standing,
        charges: lines,
        payments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::finance::{ChargeCategory, PaymentMethod};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 1, 12, 0, 0).unwrap()
    }

    fn account(status: AccountStatus, credit_limit_cents: i64) -> StudentAccount {
        StudentAccount {
            id: 1,
            student_id: 7,
            account_number: account_number(2025, 7),
            status,
            credit_limit_cents,
            notes: None,
            created_at: now(),
            updated_at: now(),
        }
    }

    fn charge(id: i64, amount: i64, discount: i64, due_in_days: i64) -> StudentCharge {
        StudentCharge {
            id,
            account_id: 1,
            category: ChargeCategory::Tuition,
            description: format!("Charge {id}"),
            amount_cents: amount,
            discount_cents: discount,
            due_at: now() + Duration::days(due_in_days),
            semester_id: None,
            status: ChargeStatus::Pending,
            posted_by: None,
            created_at: now(),
            updated_at: now(),
        }
    }

    fn payment(id: i64, amount: i64, status: PaymentStatus) -> Payment {
        Payment {
            id,
            account_id: 1,
            amount_cents: amount,
            method: PaymentMethod::BankTransfer,
            status,
            reference: None,
            paid_at: now(),
            recorded_by: None,
            refunded_at: None,
            created_at: now(),
            updated_at: now(),
        }
    }

    #[test]
    fn test_account_number_pads_student_id() {
        assert_eq!(account_number(2025, 42), "2025000042");
        assert_eq!(account_number_at(now(), 1234567), "20251234567");
    }

    #[test]
    fn test_charge_amount_rules() {
        assert!(validate_charge_amounts(10_000, 0).is_ok());
        assert!(validate_charge_amounts(10_000, 10_000).is_ok());
        assert!(validate_charge_amounts(0, 0).is_err());
        assert!(validate_charge_amounts(10_000, -1).is_err());
        assert!(validate_charge_amounts(10_000, 10_001).is_err());
    }

    #[test]
    fn test_payments_settle_earliest_due_first() {
        let charges = vec![
            charge(2, 30_000, 0, 20),
            charge(1, 50_000, 5_000, -10),
            charge(3, 10_000, 0, 40),
        ];
        let payments = vec![
            payment(1, 40_000, PaymentStatus::Completed),
            payment(2, 20_000, PaymentStatus::Completed),
            payment(3, 99_000, PaymentStatus::Refunded),
        ];

        let st = build_statement(account(AccountStatus::Active, 0), charges, payments, now());
        assert_eq!(st.total_charges_cents, 85_000);
        assert_eq!(st.total_payments_cents, 60_000);
        assert_eq!(st.balance_cents, 25_000);
        assert_eq!(st.outstanding_cents, 25_000);
        assert_eq!(st.credit_balance_cents, 0);

        let ids: Vec<i64> = st.charges.iter().map(|l| l.charge.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        // 过期的 1 号先结清
        assert_eq!(st.charges[0].paid_cents, 45_000);
        assert!(!st.charges[0].is_overdue);
        assert_eq!(st.charges[1].paid_cents, 15_000);
        assert_eq!(st.charges[1].remaining_cents, 15_000);
        assert_eq!(st.charges[2].paid_cents, 0);
        assert_eq!(st.overdue_cents, 0);
        assert_eq!(st.next_due_at, Some(now() + Duration::days(20)));
        assert!(!st.in_good_standing);
    }

    #[test]
    fn test_overdue_and_cancelled_charges() {
        let mut cancelled = charge(3, 70_000, 0, -30);
        cancelled.status = ChargeStatus::Cancelled;
        let charges = vec![charge(1, 20_000, 0, -5), charge(2, 10_000, 0, 5), cancelled];

        let st = build_statement(
            account(AccountStatus::Active, 0),
            charges,
            vec![payment(1, 5_000, PaymentStatus::Completed)],
            now(),
        );
        assert_eq!(st.charges.len(), 2);
        assert!(st.charges[0].is_overdue);
        assert_eq!(st.charges[0].days_overdue, 5);
        assert_eq!(st.overdue_cents, 15_000);
        assert_eq!(st.balance_cents, 25_000);
    }

    #[test]
    fn test_overpayment_becomes_credit() {
        let st = build_statement(
            account(AccountStatus::Active, 0),
            vec![charge(1, 10_000, 0, 10)],
            vec![payment(1, 12_500, PaymentStatus::Completed)],
            now(),
        );
        assert_eq!(st.balance_cents, -2_500);
        assert_eq!(st.outstanding_cents, 0);
        assert_eq!(st.credit_balance_cents, 2_500);
        assert_eq!(st.charges[0].remaining_cents, 0);
        assert_eq!(st.next_due_at, None);
        assert!(st.in_good_standing);
    }

    #[test]
    fn test_good_standing_respects_status_and_credit_limit() {
        let charges = || vec![charge(1, 10_000, 0, 10)];

        let within = build_statement(account(AccountStatus::Active, 10_000), charges(), vec![], now());
        assert!(within.in_good_standing);

        let over = build_statement(account(AccountStatus::Active, 9_999), charges(), vec![], now());
        assert!(!over.in_good_standing);

        let held = build_statement(account(AccountStatus::Hold, 0), vec![], vec![], now());
        assert!(!held.in_good_standing);
    }
}
