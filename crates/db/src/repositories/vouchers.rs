use crate::models::DbVoucher;
use chrono::{DateTime, Utc};
use eyre::Result;
use sqlx::PgExecutor;

const VOUCHER_COLUMNS: &str = "id, code, kind, amount, user_id, expired_at, is_active, created_at";

pub async fn create_voucher<'e, E: PgExecutor<'e>>(
    executor: E,
    code: &str,
    kind: &str,
    amount: i64,
    user_id: Option<i64>,
    expired_at: Option<DateTime<Utc>>,
) -> Result<DbVoucher> {
    let voucher = sqlx::query_as::<_, DbVoucher>(&format!(
        r#"
        INSERT INTO vouchers (code, kind, amount, user_id, expired_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {VOUCHER_COLUMNS}
        "#
    ))
    .bind(code)
    .bind(kind)
    .bind(amount)
    .bind(user_id)
    .bind(expired_at)
    .fetch_one(executor)
    .await?;

    Ok(voucher)
}

pub async fn get_voucher_by_code<'e, E: PgExecutor<'e>>(
    executor: E,
    code: &str,
) -> Result<Option<DbVoucher>> {
    let voucher = sqlx::query_as::<_, DbVoucher>(&format!(
        "SELECT {VOUCHER_COLUMNS} FROM vouchers WHERE code = $1"
    ))
    .bind(code)
    .fetch_optional(executor)
    .await?;

    Ok(voucher)
}

/// Locks the voucher while a purchase applies it.
pub async fn lock_voucher_by_code<'e, E: PgExecutor<'e>>(
    executor: E,
    code: &str,
) -> Result<Option<DbVoucher>> {
    let voucher = sqlx::query_as::<_, DbVoucher>(&format!(
        "SELECT {VOUCHER_COLUMNS} FROM vouchers WHERE code = $1 FOR UPDATE"
    ))
    .bind(code)
    .fetch_optional(executor)
    .await?;

    Ok(voucher)
}

pub async fn list_vouchers<'e, E: PgExecutor<'e>>(executor: E) -> Result<Vec<DbVoucher>> {
    let vouchers = sqlx::query_as::<_, DbVoucher>(&format!(
        "SELECT {VOUCHER_COLUMNS} FROM vouchers ORDER BY created_at DESC, id DESC"
    ))
    .fetch_all(executor)
    .await?;

    Ok(vouchers)
}

pub async fn delete_voucher<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM vouchers WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}
