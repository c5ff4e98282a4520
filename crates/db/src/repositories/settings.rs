use crate::models::{DbDepositAccount, DbWebSetting};
use eyre::Result;
use sqlx::PgExecutor;

pub async fn list_settings<'e, E: PgExecutor<'e>>(executor: E) -> Result<Vec<DbWebSetting>> {
    let settings =
        sqlx::query_as::<_, DbWebSetting>("SELECT key, value FROM web_settings ORDER BY key ASC")
            .fetch_all(executor)
            .await?;

    Ok(settings)
}

pub async fn upsert_setting<'e, E: PgExecutor<'e>>(executor: E, key: &str, value: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO web_settings (key, value)
        VALUES ($1, $2)
        ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value
        "#,
    )
    .bind(key)
    .bind(value)
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn delete_setting<'e, E: PgExecutor<'e>>(executor: E, key: &str) -> Result<()> {
    sqlx::query("DELETE FROM web_settings WHERE key = $1")
        .bind(key)
        .execute(executor)
        .await?;

    Ok(())
}

pub async fn create_deposit_account<'e, E: PgExecutor<'e>>(
    executor: E,
    bank_name: &str,
    account_name: &str,
    account_number: &str,
    is_active: bool,
) -> Result<DbDepositAccount> {
    let account = sqlx::query_as::<_, DbDepositAccount>(
        r#"
        INSERT INTO deposit_accounts (bank_name, account_name, account_number, is_active)
        VALUES ($1, $2, $3, $4)
        RETURNING id, bank_name, account_name, account_number, is_active
        "#,
    )
    .bind(bank_name)
    .bind(account_name)
    .bind(account_number)
    .bind(is_active)
    .fetch_one(executor)
    .await?;

    Ok(account)
}

pub async fn get_deposit_account_by_id<'e, E: PgExecutor<'e>>(
    executor: E,
    id: i64,
) -> Result<Option<DbDepositAccount>> {
    let account = sqlx::query_as::<_, DbDepositAccount>(
        "SELECT id, bank_name, account_name, account_number, is_active FROM deposit_accounts WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(account)
}

pub async fn list_deposit_accounts<'e, E: PgExecutor<'e>>(
    executor: E,
) -> Result<Vec<DbDepositAccount>> {
    let accounts = sqlx::query_as::<_, DbDepositAccount>(
        "SELECT id, bank_name, account_name, account_number, is_active FROM deposit_accounts ORDER BY bank_name ASC, id ASC",
    )
    .fetch_all(executor)
    .await?;

    Ok(accounts)
}

pub async fn delete_deposit_account<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM deposit_accounts WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}
