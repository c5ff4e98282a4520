use async_trait::async_trait;
use eyre::{Result, WrapErr};
use sqlx::PgConnection;
use studio_core::errors::{StudioError, StudioResult};
use studio_core::models::loyalty::{
    LoyaltyBalance, LoyaltyReward, LoyaltyRewardInput, LoyaltyShopInput, LoyaltyShopItem,
    LoyaltyTransaction, LoyaltyTrigger,
};
use studio_core::services::LoyaltyService;
use tracing::info;

use crate::models::{convert_all, DbLoyaltyReward};
use crate::repositories::{loyalty, users};
use crate::DbPool;

/// Credits the user with every active reward bound to `trigger`.
pub(crate) async fn award_points(
    conn: &mut PgConnection,
    user_id: i64,
    trigger: LoyaltyTrigger,
) -> Result<i64> {
    let rewards: Vec<DbLoyaltyReward> =
        loyalty::active_rewards_for(&mut *conn, trigger.as_str()).await?;

    let mut awarded = 0;
    for reward in &rewards {
        loyalty::insert_transaction(
            &mut *conn,
            user_id,
            reward.points,
            Some(&reward.name),
            Some(reward.id),
            None,
        )
        .await?;
        awarded += i64::from(reward.points);
    }

    if awarded > 0 {
        info!("Awarded {} points to user {} for {}", awarded, user_id, trigger);
    }
    Ok(awarded)
}

pub struct PgLoyaltyService {
    pool: DbPool,
}

impl PgLoyaltyService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn require_user(&self, user_id: i64) -> StudioResult<()> {
        users::get_user_by_id(&self.pool, user_id)
            .await?
            .ok_or_else(|| StudioError::not_found("User", user_id))?;
        Ok(())
    }
}

#[async_trait]
impl LoyaltyService for PgLoyaltyService {
    async fn create_reward(&self, input: LoyaltyRewardInput) -> StudioResult<LoyaltyReward> {
        let row = loyalty::create_reward(
            &self.pool,
            &input.name,
            input.description.as_deref(),
            input.points,
            input.trigger.as_str(),
            input.is_active,
        )
        .await?;
        Ok(LoyaltyReward::try_from(row)?)
    }

    async fn list_rewards(&self) -> StudioResult<Vec<LoyaltyReward>> {
        let rows = loyalty::list_rewards(&self.pool).await?;
        Ok(convert_all(rows)?)
    }

    async fn create_shop_item(&self, input: LoyaltyShopInput) -> StudioResult<LoyaltyShopItem> {
        let row = loyalty::create_shop_item(
            &self.pool,
            &input.name,
            input.description.as_deref(),
            input.price,
            input.stock,
            input.is_active,
        )
        .await?;
        Ok(row.into())
    }

    async fn list_shop_items(&self) -> StudioResult<Vec<LoyaltyShopItem>> {
        let rows = loyalty::list_shop_items(&self.pool).await?;
        Ok(rows.into_iter().map(LoyaltyShopItem::from).collect())
    }

    async fn redeem(&self, user_id: i64, shop_item_id: i64) -> StudioResult<LoyaltyTransaction> {
        let mut tx = self
            .pool
            .begin()
            .await
            .wrap_err("Failed to start transaction")?;

        users::lock_user(&mut *tx, user_id)
            .await?
            .ok_or_else(|| StudioError::not_found("User", user_id))?;
        let item = loyalty::lock_shop_item(&mut *tx, shop_item_id)
            .await?
            .ok_or_else(|| StudioError::not_found("Shop item", shop_item_id))?;

        let balance = loyalty::points_balance(&mut *tx, user_id).await?;
        let item = LoyaltyShopItem::from(item);
        item.check_redeem(balance)?;

        loyalty::decrement_stock(&mut *tx, item.id).await?;
        let note = format!("Redeemed {}", item.name);
        let row = loyalty::insert_transaction(
            &mut *tx,
            user_id,
            -item.price,
            Some(&note),
            None,
            Some(item.id),
        )
        .await?;

        tx.commit().await.wrap_err("Failed to commit transaction")?;

        info!("User {} redeemed shop item {}", user_id, item.id);
        Ok(row.into())
    }

    async fn balance(&self, user_id: i64) -> StudioResult<LoyaltyBalance> {
        self.require_user(user_id).await?;
        let points = loyalty::points_balance(&self.pool, user_id).await?;
        Ok(LoyaltyBalance { user_id, points })
    }

    async fn history(&self, user_id: i64) -> StudioResult<Vec<LoyaltyTransaction>> {
        self.require_user(user_id).await?;
        let rows = loyalty::list_transactions(&self.pool, user_id).await?;
        Ok(rows.into_iter().map(LoyaltyTransaction::from).collect())
    }
}
