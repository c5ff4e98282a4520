use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::text_enum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoucherKind {
    #[default]
    Fixed,
    Percentage,
}

text_enum!(VoucherKind, "voucher kind", {
    Fixed => "fixed",
    Percentage => "percentage",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voucher {
    pub id: i64,
    pub code: String,
    pub kind: VoucherKind,
    /// Currency amount for fixed vouchers, percent for percentage vouchers.
    pub amount: i64,
    /// Restricts the voucher to one user.
    pub user_id: Option<i64>,
    pub expired_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoucherInput {
    /// Generated when absent.
    pub code: Option<String>,
    pub kind: VoucherKind,
    pub amount: i64,
    pub user_id: Option<i64>,
    pub expired_at: Option<DateTime<Utc>>,
}
