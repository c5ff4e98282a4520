use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::text_enum;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub credit: i32,
    pub valid_days: i32,
    pub class_type_id: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageInput {
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub credit: i32,
    pub valid_days: i32,
    pub class_type_id: i64,
    pub is_active: bool,
}

/// Credits a user owns from one purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPackage {
    pub id: i64,
    pub user_id: i64,
    pub package_id: i64,
    pub class_type_id: i64,
    pub credit: i32,
    pub credit_used: i32,
    pub expired_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl UserPackage {
    pub fn remaining(&self) -> i32 {
        (self.credit - self.credit_used).max(0)
    }

    pub fn is_expired(&self, at: DateTime<Utc>) -> bool {
        self.expired_at <= at
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPackageUpdate {
    pub credit: i32,
    pub expired_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

text_enum!(TransactionStatus, "transaction status", {
    Pending => "pending",
    Completed => "completed",
    Failed => "failed",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageTransaction {
    pub id: i64,
    pub user_id: i64,
    pub package_id: i64,
    pub voucher_id: Option<i64>,
    pub deposit_account_id: Option<i64>,
    pub amount: i64,
    pub discount: i64,
    pub total: i64,
    pub status: TransactionStatus,
    pub user_package_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRequest {
    pub user_id: i64,
    pub package_id: i64,
    pub voucher_code: Option<String>,
    pub deposit_account_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditKind {
    Credit,
    Debit,
}

text_enum!(CreditKind, "credit kind", {
    Credit => "credit",
    Debit => "debit",
});

/// Ledger entry of class credits. `amount` is always positive; `kind` gives
/// the direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditTransaction {
    pub id: i64,
    pub user_id: i64,
    pub class_type_id: i64,
    pub kind: CreditKind,
    pub amount: i32,
    pub note: Option<String>,
    pub agenda_booking_id: Option<i64>,
    pub user_package_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditBalance {
    pub class_type_id: i64,
    pub available: i32,
    /// Booked sessions not yet checked in.
    pub reserved: i32,
}
