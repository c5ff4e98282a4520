use crate::models::{DbLoyaltyReward, DbLoyaltyShop, DbLoyaltyTransaction};
use eyre::Result;
use sqlx::PgExecutor;

const REWARD_COLUMNS: &str = "id, name, description, points, trigger, is_active";
const SHOP_COLUMNS: &str = "id, name, description, price, stock, is_active";
const TRANSACTION_COLUMNS: &str =
    "id, user_id, points, note, loyalty_reward_id, loyalty_shop_id, created_at";

pub async fn create_reward<'e, E: PgExecutor<'e>>(
    executor: E,
    name: &str,
    description: Option<&str>,
    points: i32,
    trigger: &str,
    is_active: bool,
) -> Result<DbLoyaltyReward> {
    let reward = sqlx::query_as::<_, DbLoyaltyReward>(&format!(
        r#"
        INSERT INTO loyalty_rewards (name, description, points, trigger, is_active)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {REWARD_COLUMNS}
        "#
    ))
    .bind(name)
    .bind(description)
    .bind(points)
    .bind(trigger)
    .bind(is_active)
    .fetch_one(executor)
    .await?;

    Ok(reward)
}

pub async fn list_rewards<'e, E: PgExecutor<'e>>(executor: E) -> Result<Vec<DbLoyaltyReward>> {
    let rewards = sqlx::query_as::<_, DbLoyaltyReward>(&format!(
        "SELECT {REWARD_COLUMNS} FROM loyalty_rewards ORDER BY name ASC"
    ))
    .fetch_all(executor)
    .await?;

    Ok(rewards)
}

pub async fn active_rewards_for<'e, E: PgExecutor<'e>>(
    executor: E,
    trigger: &str,
) -> Result<Vec<DbLoyaltyReward>> {
    let rewards = sqlx::query_as::<_, DbLoyaltyReward>(&format!(
        "SELECT {REWARD_COLUMNS} FROM loyalty_rewards WHERE trigger = $1 AND is_active ORDER BY id ASC"
    ))
    .bind(trigger)
    .fetch_all(executor)
    .await?;

    Ok(rewards)
}

pub async fn create_shop_item<'e, E: PgExecutor<'e>>(
    executor: E,
    name: &str,
    description: Option<&str>,
    price: i32,
    stock: Option<i32>,
    is_active: bool,
) -> Result<DbLoyaltyShop> {
    let item = sqlx::query_as::<_, DbLoyaltyShop>(&format!(
        r#"
        INSERT INTO loyalty_shops (name, description, price, stock, is_active)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {SHOP_COLUMNS}
        "#
    ))
    .bind(name)
    .bind(description)
    .bind(price)
    .bind(stock)
    .bind(is_active)
    .fetch_one(executor)
    .await?;

    Ok(item)
}

pub async fn list_shop_items<'e, E: PgExecutor<'e>>(executor: E) -> Result<Vec<DbLoyaltyShop>> {
    let items = sqlx::query_as::<_, DbLoyaltyShop>(&format!(
        "SELECT {SHOP_COLUMNS} FROM loyalty_shops ORDER BY price ASC, id ASC"
    ))
    .fetch_all(executor)
    .await?;

    Ok(items)
}

pub async fn lock_shop_item<'e, E: PgExecutor<'e>>(
    executor: E,
    id: i64,
) -> Result<Option<DbLoyaltyShop>> {
    let item = sqlx::query_as::<_, DbLoyaltyShop>(&format!(
        "SELECT {SHOP_COLUMNS} FROM loyalty_shops WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(item)
}

/// Takes one unit out of stock; unlimited items are left alone.
pub async fn decrement_stock<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<()> {
    sqlx::query("UPDATE loyalty_shops SET stock = stock - 1 WHERE id = $1 AND stock IS NOT NULL")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(())
}

pub async fn insert_transaction<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: i64,
    points: i32,
    note: Option<&str>,
    loyalty_reward_id: Option<i64>,
    loyalty_shop_id: Option<i64>,
) -> Result<DbLoyaltyTransaction> {
    let transaction = sqlx::query_as::<_, DbLoyaltyTransaction>(&format!(
        r#"
        INSERT INTO loyalty_transactions (user_id, points, note, loyalty_reward_id, loyalty_shop_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {TRANSACTION_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(points)
    .bind(note)
    .bind(loyalty_reward_id)
    .bind(loyalty_shop_id)
    .fetch_one(executor)
    .await?;

    Ok(transaction)
}

pub async fn list_transactions<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: i64,
) -> Result<Vec<DbLoyaltyTransaction>> {
    let transactions = sqlx::query_as::<_, DbLoyaltyTransaction>(&format!(
        "SELECT {TRANSACTION_COLUMNS} FROM loyalty_transactions WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
    ))
    .bind(user_id)
    .fetch_all(executor)
    .await?;

    Ok(transactions)
}

pub async fn points_balance<'e, E: PgExecutor<'e>>(executor: E, user_id: i64) -> Result<i64> {
    let points = sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(SUM(points), 0)::BIGINT FROM loyalty_transactions WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_one(executor)
    .await?;

    Ok(points)
}
