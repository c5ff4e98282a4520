use async_trait::async_trait;
use eyre::WrapErr;
use studio_core::errors::{StudioError, StudioResult};
use studio_core::models::settings::{DepositAccount, DepositAccountInput, WebSettings};
use studio_core::services::SettingsService;

use crate::repositories::settings;
use crate::DbPool;

pub struct PgSettingsService {
    pool: DbPool,
}

impl PgSettingsService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsService for PgSettingsService {
    async fn get_settings(&self) -> StudioResult<WebSettings> {
        let rows = settings::list_settings(&self.pool).await?;
        Ok(rows.into_iter().map(|row| (row.key, row.value)).collect())
    }

    /// Blank values remove the key.
    async fn update_settings(&self, values: WebSettings) -> StudioResult<WebSettings> {
        let mut tx = self
            .pool
            .begin()
            .await
            .wrap_err("Failed to start transaction")?;

        for (key, value) in &values {
            if value.trim().is_empty() {
                settings::delete_setting(&mut *tx, key).await?;
            } else {
                settings::upsert_setting(&mut *tx, key, value.trim()).await?;
            }
        }

        tx.commit().await.wrap_err("Failed to commit transaction")?;
        self.get_settings().await
    }

    async fn list_deposit_accounts(&self) -> StudioResult<Vec<DepositAccount>> {
        let rows = settings::list_deposit_accounts(&self.pool).await?;
        Ok(rows.into_iter().map(DepositAccount::from).collect())
    }

    async fn create_deposit_account(
        &self,
        input: DepositAccountInput,
    ) -> StudioResult<DepositAccount> {
        let row = settings::create_deposit_account(
            &self.pool,
            &input.bank_name,
            &input.account_name,
            &input.account_number,
            input.is_active,
        )
        .await?;
        Ok(row.into())
    }

    async fn delete_deposit_account(&self, id: i64) -> StudioResult<()> {
        if !settings::delete_deposit_account(&self.pool, id).await? {
            return Err(StudioError::not_found("Deposit account", id));
        }
        Ok(())
    }
}
