//! Package price after vouchers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::voucher::{Voucher, VoucherKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub price: i64,
    pub discount: i64,
    pub total: i64,
}

impl PriceBreakdown {
    pub fn full_price(price: i64) -> Self {
        Self {
            price,
            discount: 0,
            total: price,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoucherRejection {
    #[error("Voucher is no longer active")]
    Inactive,
    #[error("Voucher has expired")]
    Expired,
    #[error("Voucher belongs to another user")]
    WrongUser,
}

/// Discount granted by `voucher` on `price`.
///
/// Fixed vouchers never discount more than the price; percentage vouchers
/// round the discount down.
pub fn discount_for(price: i64, voucher: &Voucher) -> i64 {
    let price = price.max(0);
    let discount = match voucher.kind {
        VoucherKind::Fixed => voucher.amount,
        VoucherKind::Percentage => price * voucher.amount.clamp(0, 100) / 100,
    };
    discount.clamp(0, price)
}

pub fn apply_voucher(
    price: i64,
    voucher: &Voucher,
    user_id: i64,
    now: DateTime<Utc>,
) -> Result<PriceBreakdown, VoucherRejection> {
    if !voucher.is_active {
        return Err(VoucherRejection::Inactive);
    }
    if voucher.expired_at.is_some_and(|expiry| expiry <= now) {
        return Err(VoucherRejection::Expired);
    }
    if voucher.user_id.is_some_and(|owner| owner != user_id) {
        return Err(VoucherRejection::WrongUser);
    }

    let discount = discount_for(price, voucher);
    Ok(PriceBreakdown {
        price,
        discount,
        total: price - discount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn voucher(kind: VoucherKind, amount: i64) -> Voucher {
        Voucher {
            id: 1,
            code: "HELLO".to_string(),
            kind,
            amount,
            user_id: None,
            expired_at: None,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[rstest]
    #[case(VoucherKind::Fixed, 50_000, 300_000, 50_000)]
    #[case(VoucherKind::Fixed, 500_000, 300_000, 300_000)]
    #[case(VoucherKind::Percentage, 10, 300_000, 30_000)]
    #[case(VoucherKind::Percentage, 15, 99_999, 14_999)]
    #[case(VoucherKind::Percentage, 100, 120_000, 120_000)]
    fn computes_discount(
        #[case] kind: VoucherKind,
        #[case] amount: i64,
        #[case] price: i64,
        #[case] expected: i64,
    ) {
        let breakdown = apply_voucher(price, &voucher(kind, amount), 7, Utc::now()).unwrap();
        assert_eq!(breakdown.discount, expected);
        assert_eq!(breakdown.total, price - expected);
        assert!(breakdown.total >= 0);
    }

    #[test]
    fn rejects_expired_voucher() {
        let now = Utc::now();
        let mut v = voucher(VoucherKind::Fixed, 10);
        v.expired_at = Some(now - Duration::minutes(1));
        assert_eq!(apply_voucher(100, &v, 1, now), Err(VoucherRejection::Expired));
    }

    #[test]
    fn rejects_voucher_of_another_user() {
        let mut v = voucher(VoucherKind::Fixed, 10);
        v.user_id = Some(2);
        assert_eq!(
            apply_voucher(100, &v, 1, Utc::now()),
            Err(VoucherRejection::WrongUser)
        );
        assert!(apply_voucher(100, &v, 2, Utc::now()).is_ok());
    }

    #[test]
    fn rejects_inactive_voucher() {
        let mut v = voucher(VoucherKind::Percentage, 10);
        v.is_active = false;
        assert_eq!(
            apply_voucher(100, &v, 1, Utc::now()),
            Err(VoucherRejection::Inactive)
        );
    }
}
