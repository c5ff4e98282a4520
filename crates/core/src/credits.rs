//! Class credit bookkeeping over a user's packages.

use chrono::{DateTime, Utc};

use crate::models::package::{CreditKind, UserPackage};

pub const CREDIT_EXCEEDED: &str = "Credit used must not exceed credit granted";

/// Remaining credit usable for `class_type_id` at `at`.
pub fn available_credit(packages: &[UserPackage], class_type_id: i64, at: DateTime<Utc>) -> i32 {
    packages
        .iter()
        .filter(|p| p.class_type_id == class_type_id && !p.is_expired(at))
        .map(UserPackage::remaining)
        .sum()
}

/// Package a check-in draws from: the one expiring soonest, ties broken by
/// purchase order.
pub fn pick_package(
    packages: &[UserPackage],
    class_type_id: i64,
    at: DateTime<Utc>,
) -> Option<&UserPackage> {
    packages
        .iter()
        .filter(|p| p.class_type_id == class_type_id && !p.is_expired(at) && p.remaining() > 0)
        .min_by_key(|p| (p.expired_at, p.id))
}

/// A new booking may only be made while every live booking can still be
/// paid for at check-in.
pub fn can_reserve(available: i32, outstanding: i64) -> bool {
    outstanding < i64::from(available)
}

/// Ledger entry for a staff change of a package's credit from `previous` to
/// `credit`; `None` when nothing changed.
pub fn adjustment(previous: i32, credit: i32) -> Option<(CreditKind, i32)> {
    let delta = credit - previous;
    match delta.signum() {
        1 => Some((CreditKind::Credit, delta)),
        -1 => Some((CreditKind::Debit, -delta)),
        _ => None,
    }
}

pub fn validate_usage(credit: i32, credit_used: i32) -> Result<(), &'static str> {
    if credit < 0 {
        return Err("Credit must not be negative");
    }
    if credit_used > credit {
        return Err(CREDIT_EXCEEDED);
    }
    Ok(())
}
