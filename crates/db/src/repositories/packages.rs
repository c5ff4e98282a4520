use crate::models::{DbCreditTransaction, DbPackage, DbPackageTransaction, DbUserPackage};
use chrono::{DateTime, Utc};
use eyre::Result;
use sqlx::PgExecutor;

const PACKAGE_COLUMNS: &str =
    "id, name, description, price, credit, valid_days, class_type_id, is_active, created_at";

const USER_PACKAGE_COLUMNS: &str =
    "id, user_id, package_id, class_type_id, credit, credit_used, expired_at, created_at";

const TRANSACTION_COLUMNS: &str = "id, user_id, package_id, voucher_id, deposit_account_id, \
     amount, discount, total, status, user_package_id, created_at, updated_at";

const CREDIT_COLUMNS: &str = "id, user_id, class_type_id, kind, amount, note, \
     agenda_booking_id, user_package_id, created_at";

pub struct PackageRow<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub price: i64,
    pub credit: i32,
    pub valid_days: i32,
    pub class_type_id: i64,
    pub is_active: bool,
}

pub async fn create_package<'e, E: PgExecutor<'e>>(
    executor: E,
    row: PackageRow<'_>,
) -> Result<DbPackage> {
    let package = sqlx::query_as::<_, DbPackage>(&format!(
        r#"
        INSERT INTO packages (name, description, price, credit, valid_days, class_type_id, is_active)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {PACKAGE_COLUMNS}
        "#
    ))
    .bind(row.name)
    .bind(row.description)
    .bind(row.price)
    .bind(row.credit)
    .bind(row.valid_days)
    .bind(row.class_type_id)
    .bind(row.is_active)
    .fetch_one(executor)
    .await?;

    Ok(package)
}

pub async fn update_package<'e, E: PgExecutor<'e>>(
    executor: E,
    id: i64,
    row: PackageRow<'_>,
) -> Result<Option<DbPackage>> {
    let package = sqlx::query_as::<_, DbPackage>(&format!(
        r#"
        UPDATE packages
        SET name = $2, description = $3, price = $4, credit = $5, valid_days = $6,
            class_type_id = $7, is_active = $8
        WHERE id = $1
        RETURNING {PACKAGE_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(row.name)
    .bind(row.description)
    .bind(row.price)
    .bind(row.credit)
    .bind(row.valid_days)
    .bind(row.class_type_id)
    .bind(row.is_active)
    .fetch_optional(executor)
    .await?;

    Ok(package)
}

pub async fn get_package_by_id<'e, E: PgExecutor<'e>>(
    executor: E,
    id: i64,
) -> Result<Option<DbPackage>> {
    let package = sqlx::query_as::<_, DbPackage>(&format!(
        "SELECT {PACKAGE_COLUMNS} FROM packages WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(package)
}

pub async fn list_packages<'e, E: PgExecutor<'e>>(executor: E) -> Result<Vec<DbPackage>> {
    let packages = sqlx::query_as::<_, DbPackage>(&format!(
        "SELECT {PACKAGE_COLUMNS} FROM packages ORDER BY price ASC, id ASC"
    ))
    .fetch_all(executor)
    .await?;

    Ok(packages)
}

pub async fn create_user_package<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: i64,
    package_id: i64,
    class_type_id: i64,
    credit: i32,
    expired_at: DateTime<Utc>,
) -> Result<DbUserPackage> {
    let user_package = sqlx::query_as::<_, DbUserPackage>(&format!(
        r#"
        INSERT INTO user_packages (user_id, package_id, class_type_id, credit, credit_used, expired_at)
        VALUES ($1, $2, $3, $4, 0, $5)
        RETURNING {USER_PACKAGE_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(package_id)
    .bind(class_type_id)
    .bind(credit)
    .bind(expired_at)
    .fetch_one(executor)
    .await?;

    Ok(user_package)
}

pub async fn lock_user_package<'e, E: PgExecutor<'e>>(
    executor: E,
    id: i64,
) -> Result<Option<DbUserPackage>> {
    let user_package = sqlx::query_as::<_, DbUserPackage>(&format!(
        "SELECT {USER_PACKAGE_COLUMNS} FROM user_packages WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(user_package)
}

pub async fn list_user_packages<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: i64,
) -> Result<Vec<DbUserPackage>> {
    let packages = sqlx::query_as::<_, DbUserPackage>(&format!(
        "SELECT {USER_PACKAGE_COLUMNS} FROM user_packages WHERE user_id = $1 ORDER BY expired_at ASC, id ASC"
    ))
    .bind(user_id)
    .fetch_all(executor)
    .await?;

    Ok(packages)
}

/// Same as [`list_user_packages`] restricted to one class type, with every
/// row locked until the transaction ends.
pub async fn lock_user_packages<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: i64,
    class_type_id: i64,
) -> Result<Vec<DbUserPackage>> {
    let packages = sqlx::query_as::<_, DbUserPackage>(&format!(
        r#"
        SELECT {USER_PACKAGE_COLUMNS} FROM user_packages
        WHERE user_id = $1 AND class_type_id = $2
        ORDER BY expired_at ASC, id ASC
        FOR UPDATE
        "#
    ))
    .bind(user_id)
    .bind(class_type_id)
    .fetch_all(executor)
    .await?;

    Ok(packages)
}

pub async fn set_credit_used<'e, E: PgExecutor<'e>>(
    executor: E,
    id: i64,
    credit_used: i32,
) -> Result<DbUserPackage> {
    let user_package = sqlx::query_as::<_, DbUserPackage>(&format!(
        "UPDATE user_packages SET credit_used = $2 WHERE id = $1 RETURNING {USER_PACKAGE_COLUMNS}"
    ))
    .bind(id)
    .bind(credit_used)
    .fetch_one(executor)
    .await?;

    Ok(user_package)
}

pub async fn update_user_package<'e, E: PgExecutor<'e>>(
    executor: E,
    id: i64,
    credit: i32,
    expired_at: DateTime<Utc>,
) -> Result<DbUserPackage> {
    let user_package = sqlx::query_as::<_, DbUserPackage>(&format!(
        r#"
        UPDATE user_packages
        SET credit = $2, expired_at = $3
        WHERE id = $1
        RETURNING {USER_PACKAGE_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(credit)
    .bind(expired_at)
    .fetch_one(executor)
    .await?;

    Ok(user_package)
}

pub struct TransactionRow {
    pub user_id: i64,
    pub package_id: i64,
    pub voucher_id: Option<i64>,
    pub deposit_account_id: Option<i64>,
    pub amount: i64,
    pub discount: i64,
    pub total: i64,
}

pub async fn create_transaction<'e, E: PgExecutor<'e>>(
    executor: E,
    row: TransactionRow,
) -> Result<DbPackageTransaction> {
    let transaction = sqlx::query_as::<_, DbPackageTransaction>(&format!(
        r#"
        INSERT INTO package_transactions
            (user_id, package_id, voucher_id, deposit_account_id, amount, discount, total, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, 'pending')
        RETURNING {TRANSACTION_COLUMNS}
        "#
    ))
    .bind(row.user_id)
    .bind(row.package_id)
    .bind(row.voucher_id)
    .bind(row.deposit_account_id)
    .bind(row.amount)
    .bind(row.discount)
    .bind(row.total)
    .fetch_one(executor)
    .await?;

    Ok(transaction)
}

pub async fn lock_transaction<'e, E: PgExecutor<'e>>(
    executor: E,
    id: i64,
) -> Result<Option<DbPackageTransaction>> {
    let transaction = sqlx::query_as::<_, DbPackageTransaction>(&format!(
        "SELECT {TRANSACTION_COLUMNS} FROM package_transactions WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(transaction)
}

pub async fn set_transaction_status<'e, E: PgExecutor<'e>>(
    executor: E,
    id: i64,
    status: &str,
    user_package_id: Option<i64>,
) -> Result<DbPackageTransaction> {
    let transaction = sqlx::query_as::<_, DbPackageTransaction>(&format!(
        r#"
        UPDATE package_transactions
        SET status = $2, user_package_id = COALESCE($3, user_package_id), updated_at = NOW()
        WHERE id = $1
        RETURNING {TRANSACTION_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(status)
    .bind(user_package_id)
    .fetch_one(executor)
    .await?;

    Ok(transaction)
}

pub async fn list_transactions<'e, E: PgExecutor<'e>>(
    executor: E,
) -> Result<Vec<DbPackageTransaction>> {
    let transactions = sqlx::query_as::<_, DbPackageTransaction>(&format!(
        "SELECT {TRANSACTION_COLUMNS} FROM package_transactions ORDER BY created_at DESC, id DESC"
    ))
    .fetch_all(executor)
    .await?;

    Ok(transactions)
}

pub struct CreditRow<'a> {
    pub user_id: i64,
    pub class_type_id: i64,
    pub kind: &'a str,
    pub amount: i32,
    pub note: Option<&'a str>,
    pub agenda_booking_id: Option<i64>,
    pub user_package_id: Option<i64>,
}

pub async fn insert_credit_transaction<'e, E: PgExecutor<'e>>(
    executor: E,
    row: CreditRow<'_>,
) -> Result<DbCreditTransaction> {
    let transaction = sqlx::query_as::<_, DbCreditTransaction>(&format!(
        r#"
        INSERT INTO credit_transactions
            (user_id, class_type_id, kind, amount, note, agenda_booking_id, user_package_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {CREDIT_COLUMNS}
        "#
    ))
    .bind(row.user_id)
    .bind(row.class_type_id)
    .bind(row.kind)
    .bind(row.amount)
    .bind(row.note)
    .bind(row.agenda_booking_id)
    .bind(row.user_package_id)
    .fetch_one(executor)
    .await?;

    Ok(transaction)
}

pub async fn list_credit_transactions<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: i64,
) -> Result<Vec<DbCreditTransaction>> {
    let transactions = sqlx::query_as::<_, DbCreditTransaction>(&format!(
        "SELECT {CREDIT_COLUMNS} FROM credit_transactions WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
    ))
    .bind(user_id)
    .fetch_all(executor)
    .await?;

    Ok(transactions)
}
