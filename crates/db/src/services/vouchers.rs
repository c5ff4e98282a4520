use async_trait::async_trait;
use chrono::Utc;
use rand::{distributions::Alphanumeric, Rng};
use studio_core::errors::{StudioError, StudioResult};
use studio_core::models::voucher::{Voucher, VoucherInput};
use studio_core::pricing::{apply_voucher, PriceBreakdown};
use studio_core::services::VoucherService;
use tracing::info;

use crate::models::convert_all;
use crate::repositories::{packages, users, vouchers};
use crate::DbPool;

const GENERATED_CODE_LENGTH: usize = 8;

fn generate_code() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_CODE_LENGTH)
        .map(char::from)
        .collect::<String>()
        .to_uppercase()
}

pub struct PgVoucherService {
    pool: DbPool,
}

impl PgVoucherService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VoucherService for PgVoucherService {
    async fn create_voucher(&self, input: VoucherInput) -> StudioResult<Voucher> {
        if let Some(user_id) = input.user_id {
            users::get_user_by_id(&self.pool, user_id)
                .await?
                .ok_or_else(|| StudioError::not_found("User", user_id))?;
        }

        let code = match input.code {
            Some(code) => code.to_uppercase(),
            None => generate_code(),
        };
        if vouchers::get_voucher_by_code(&self.pool, &code)
            .await?
            .is_some()
        {
            return Err(StudioError::Conflict(format!(
                "Voucher code {} already exists",
                code
            )));
        }

        let row = vouchers::create_voucher(
            &self.pool,
            &code,
            input.kind.as_str(),
            input.amount,
            input.user_id,
            input.expired_at,
        )
        .await?;

        info!("Created voucher {}", row.code);
        Ok(Voucher::try_from(row)?)
    }

    async fn list_vouchers(&self) -> StudioResult<Vec<Voucher>> {
        let rows = vouchers::list_vouchers(&self.pool).await?;
        Ok(convert_all(rows)?)
    }

    async fn delete_voucher(&self, id: i64) -> StudioResult<()> {
        if !vouchers::delete_voucher(&self.pool, id).await? {
            return Err(StudioError::not_found("Voucher", id));
        }
        Ok(())
    }

    async fn preview_voucher(
        &self,
        code: &str,
        package_id: i64,
        user_id: i64,
    ) -> StudioResult<PriceBreakdown> {
        let code = code.to_uppercase();
        let voucher = vouchers::get_voucher_by_code(&self.pool, &code)
            .await?
            .ok_or_else(|| StudioError::NotFound(format!("Voucher {} not found", code)))?;
        let package = packages::get_package_by_id(&self.pool, package_id)
            .await?
            .ok_or_else(|| StudioError::not_found("Package", package_id))?;

        let voucher = Voucher::try_from(voucher)?;
        apply_voucher(package.price, &voucher, user_id, Utc::now())
            .map_err(|rejection| StudioError::Validation(rejection.to_string()))
    }
}
