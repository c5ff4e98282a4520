use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use eyre::WrapErr;
use sqlx::PgConnection;
use studio_core::credits::{adjustment, available_credit, validate_usage};
use studio_core::errors::{StudioError, StudioResult};
use studio_core::form::end_of_day;
use studio_core::models::loyalty::LoyaltyTrigger;
use studio_core::models::package::{
    CreditBalance, CreditKind, CreditTransaction, Package, PackageInput, PackageTransaction,
    PurchaseRequest, TransactionStatus, UserPackage, UserPackageUpdate,
};
use studio_core::models::voucher::Voucher;
use studio_core::pricing::{apply_voucher, PriceBreakdown};
use studio_core::services::PackageService;
use tracing::info;

use super::loyalty;
use crate::models::{convert_all, DbPackageTransaction};
use crate::repositories::packages::{self, CreditRow, PackageRow, TransactionRow};
use crate::repositories::{bookings, classes, settings, users, vouchers};
use crate::DbPool;

pub struct PgPackageService {
    pool: DbPool,
}

impl PgPackageService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn require_class_type(&self, id: i64) -> StudioResult<()> {
        classes::get_class_type_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| StudioError::not_found("Class type", id))?;
        Ok(())
    }

    async fn require_user(&self, id: i64) -> StudioResult<()> {
        users::get_user_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| StudioError::not_found("User", id))?;
        Ok(())
    }
}

fn package_row(input: &PackageInput) -> PackageRow<'_> {
    PackageRow {
        name: &input.name,
        description: input.description.as_deref(),
        price: input.price,
        credit: input.credit,
        valid_days: input.valid_days,
        class_type_id: input.class_type_id,
        is_active: input.is_active,
    }
}

/// Locks a pending transaction; any other status is a conflict.
async fn lock_pending(conn: &mut PgConnection, id: i64) -> StudioResult<DbPackageTransaction> {
    let row = packages::lock_transaction(&mut *conn, id)
        .await?
        .ok_or_else(|| StudioError::not_found("Transaction", id))?;
    if row.status != TransactionStatus::Pending.as_str() {
        return Err(StudioError::Conflict(format!(
            "Transaction {} is already {}",
            id, row.status
        )));
    }
    Ok(row)
}

/// Grants the purchased package and marks the transaction completed.
async fn complete(
    conn: &mut PgConnection,
    transaction: &DbPackageTransaction,
) -> StudioResult<DbPackageTransaction> {
    let package = packages::get_package_by_id(&mut *conn, transaction.package_id)
        .await?
        .ok_or_else(|| StudioError::not_found("Package", transaction.package_id))?;

    let now = Utc::now();
    let last_day = now + Duration::days(i64::from(package.valid_days));
    let expired_at = end_of_day(last_day.date_naive()).unwrap_or(last_day);

    let user_package = packages::create_user_package(
        &mut *conn,
        transaction.user_id,
        package.id,
        package.class_type_id,
        package.credit,
        expired_at,
    )
    .await?;

    let note = format!("Purchased {}", package.name);
    packages::insert_credit_transaction(
        &mut *conn,
        CreditRow {
            user_id: transaction.user_id,
            class_type_id: package.class_type_id,
            kind: CreditKind::Credit.as_str(),
            amount: package.credit,
            note: Some(&note),
            agenda_booking_id: None,
            user_package_id: Some(user_package.id),
        },
    )
    .await?;

    let completed = packages::set_transaction_status(
        &mut *conn,
        transaction.id,
        TransactionStatus::Completed.as_str(),
        Some(user_package.id),
    )
    .await?;

    loyalty::award_points(conn, transaction.user_id, LoyaltyTrigger::PackagePurchase).await?;

    info!(
        "Transaction {} completed, user package {} granted",
        transaction.id, user_package.id
    );
    Ok(completed)
}

#[async_trait]
impl PackageService for PgPackageService {
    async fn create_package(&self, input: PackageInput) -> StudioResult<Package> {
        self.require_class_type(input.class_type_id).await?;
        let row = packages::create_package(&self.pool, package_row(&input)).await?;
        Ok(row.into())
    }

    async fn update_package(&self, id: i64, input: PackageInput) -> StudioResult<Package> {
        self.require_class_type(input.class_type_id).await?;
        let row = packages::update_package(&self.pool, id, package_row(&input))
            .await?
            .ok_or_else(|| StudioError::not_found("Package", id))?;
        Ok(row.into())
    }

    async fn list_packages(&self) -> StudioResult<Vec<Package>> {
        let rows = packages::list_packages(&self.pool).await?;
        Ok(rows.into_iter().map(Package::from).collect())
    }

    async fn purchase_package(&self, request: PurchaseRequest) -> StudioResult<PackageTransaction> {
        let mut tx = self
            .pool
            .begin()
            .await
            .wrap_err("Failed to start transaction")?;

        users::get_user_by_id(&mut *tx, request.user_id)
            .await?
            .ok_or_else(|| StudioError::not_found("User", request.user_id))?;
        let package = packages::get_package_by_id(&mut *tx, request.package_id)
            .await?
            .ok_or_else(|| StudioError::not_found("Package", request.package_id))?;
        if !package.is_active {
            return Err(StudioError::Validation(format!(
                "{} is not available for purchase",
                package.name
            )));
        }

        if let Some(account_id) = request.deposit_account_id {
            let account = settings::get_deposit_account_by_id(&mut *tx, account_id)
                .await?
                .ok_or_else(|| StudioError::not_found("Deposit account", account_id))?;
            if !account.is_active {
                return Err(StudioError::Validation(
                    "Deposit account is not in use".to_string(),
                ));
            }
        }

        let (price, voucher_id) = match request.voucher_code.as_deref() {
            Some(code) => {
                let row = vouchers::lock_voucher_by_code(&mut *tx, &code.to_uppercase())
                    .await?
                    .ok_or_else(|| {
                        StudioError::Validation(format!("Voucher {} does not exist", code))
                    })?;
                let voucher = Voucher::try_from(row)?;
                let price = apply_voucher(package.price, &voucher, request.user_id, Utc::now())
                    .map_err(|rejection| StudioError::Validation(rejection.to_string()))?;
                (price, Some(voucher.id))
            }
            None => (PriceBreakdown::full_price(package.price), None),
        };

        let mut row = packages::create_transaction(
            &mut *tx,
            TransactionRow {
                user_id: request.user_id,
                package_id: package.id,
                voucher_id,
                deposit_account_id: request.deposit_account_id,
                amount: price.price,
                discount: price.discount,
                total: price.total,
            },
        )
        .await?;

        if price.total == 0 {
            row = complete(&mut tx, &row).await?;
        }

        tx.commit().await.wrap_err("Failed to commit transaction")?;

        info!(
            "User {} purchased package {} for {} (transaction {})",
            request.user_id, package.id, price.total, row.id
        );
        Ok(PackageTransaction::try_from(row)?)
    }

    async fn confirm_transaction(&self, id: i64) -> StudioResult<PackageTransaction> {
        let mut tx = self
            .pool
            .begin()
            .await
            .wrap_err("Failed to start transaction")?;

        let pending = lock_pending(&mut tx, id).await?;
        let row = complete(&mut tx, &pending).await?;

        tx.commit().await.wrap_err("Failed to commit transaction")?;
        Ok(PackageTransaction::try_from(row)?)
    }

    async fn reject_transaction(&self, id: i64) -> StudioResult<PackageTransaction> {
        let mut tx = self
            .pool
            .begin()
            .await
            .wrap_err("Failed to start transaction")?;

        lock_pending(&mut tx, id).await?;
        let row = packages::set_transaction_status(
            &mut *tx,
            id,
            TransactionStatus::Failed.as_str(),
            None,
        )
        .await?;

        tx.commit().await.wrap_err("Failed to commit transaction")?;

        info!("Transaction {} rejected", id);
        Ok(PackageTransaction::try_from(row)?)
    }

    async fn list_transactions(&self) -> StudioResult<Vec<PackageTransaction>> {
        let rows = packages::list_transactions(&self.pool).await?;
        Ok(convert_all(rows)?)
    }

    async fn list_user_packages(&self, user_id: i64) -> StudioResult<Vec<UserPackage>> {
        self.require_user(user_id).await?;
        let rows = packages::list_user_packages(&self.pool, user_id).await?;
        Ok(rows.into_iter().map(UserPackage::from).collect())
    }

    async fn update_user_package(
        &self,
        id: i64,
        update: UserPackageUpdate,
    ) -> StudioResult<UserPackage> {
        let mut tx = self
            .pool
            .begin()
            .await
            .wrap_err("Failed to start transaction")?;

        let current = packages::lock_user_package(&mut *tx, id)
            .await?
            .ok_or_else(|| StudioError::not_found("User package", id))?;
        validate_usage(update.credit, current.credit_used)
            .map_err(|message| StudioError::Validation(message.to_string()))?;

        let row =
            packages::update_user_package(&mut *tx, id, update.credit, update.expired_at).await?;

        if let Some((kind, amount)) = adjustment(current.credit, update.credit) {
            packages::insert_credit_transaction(
                &mut *tx,
                CreditRow {
                    user_id: current.user_id,
                    class_type_id: current.class_type_id,
                    kind: kind.as_str(),
                    amount,
                    note: Some("Adjusted by staff"),
                    agenda_booking_id: None,
                    user_package_id: Some(id),
                },
            )
            .await?;
        }

        tx.commit().await.wrap_err("Failed to commit transaction")?;

        info!(
            "User package {} credit set from {} to {}",
            id, current.credit, update.credit
        );
        Ok(row.into())
    }

    async fn credit_balance(&self, user_id: i64) -> StudioResult<Vec<CreditBalance>> {
        self.require_user(user_id).await?;
        let owned: Vec<UserPackage> = packages::list_user_packages(&self.pool, user_id)
            .await?
            .into_iter()
            .map(UserPackage::from)
            .collect();
        let reserved: BTreeMap<i64, i64> = bookings::outstanding_by_class_type(&self.pool, user_id)
            .await?
            .into_iter()
            .collect();

        Ok(balances(&owned, &reserved))
    }

    async fn credit_history(&self, user_id: i64) -> StudioResult<Vec<CreditTransaction>> {
        self.require_user(user_id).await?;
        let rows = packages::list_credit_transactions(&self.pool, user_id).await?;
        Ok(convert_all(rows)?)
    }
}

/// One balance per class type the user holds packages or bookings for.
fn balances(owned: &[UserPackage], reserved: &BTreeMap<i64, i64>) -> Vec<CreditBalance> {
    let now = Utc::now();
    let class_types: BTreeSet<i64> = owned
        .iter()
        .map(|p| p.class_type_id)
        .chain(reserved.keys().copied())
        .collect();

    class_types
        .into_iter()
        .map(|class_type_id| CreditBalance {
            class_type_id,
            available: available_credit(owned, class_type_id, now),
            reserved: reserved.get(&class_type_id).copied().unwrap_or(0) as i32,
        })
        .collect()
}
