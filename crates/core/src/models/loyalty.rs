use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::text_enum;
use crate::errors::StudioError;

/// Event that earns the points of a reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoyaltyTrigger {
    #[default]
    PackagePurchase,
    ClassCheckIn,
}

text_enum!(LoyaltyTrigger, "loyalty trigger", {
    PackagePurchase => "package_purchase",
    ClassCheckIn => "class_check_in",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoyaltyReward {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub points: i32,
    pub trigger: LoyaltyTrigger,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoyaltyRewardInput {
    pub name: String,
    pub description: Option<String>,
    pub points: i32,
    pub trigger: LoyaltyTrigger,
    pub is_active: bool,
}

/// Item that can be bought with points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoyaltyShopItem {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: i32,
    /// `None` means unlimited.
    pub stock: Option<i32>,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RedeemRejection {
    #[error("{0} is not available")]
    Unavailable(String),
    #[error("{0} is out of stock")]
    OutOfStock(String),
    #[error("Not enough points: {needed} needed, {available} available")]
    NotEnoughPoints { needed: i32, available: i64 },
}

impl From<RedeemRejection> for StudioError {
    fn from(rejection: RedeemRejection) -> Self {
        match rejection {
            RedeemRejection::Unavailable(_) => StudioError::Validation(rejection.to_string()),
            _ => StudioError::Conflict(rejection.to_string()),
        }
    }
}

impl LoyaltyShopItem {
    /// Whether a member holding `balance` points may take one of this item.
    pub fn check_redeem(&self, balance: i64) -> Result<(), RedeemRejection> {
        if !self.is_active {
            return Err(RedeemRejection::Unavailable(self.name.clone()));
        }
        if self.stock.is_some_and(|stock| stock <= 0) {
            return Err(RedeemRejection::OutOfStock(self.name.clone()));
        }
        if balance < i64::from(self.price) {
            return Err(RedeemRejection::NotEnoughPoints {
                needed: self.price,
                available: balance,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoyaltyShopInput {
    pub name: String,
    pub description: Option<String>,
    pub price: i32,
    pub stock: Option<i32>,
    pub is_active: bool,
}

/// Points ledger entry; positive when earned, negative when redeemed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoyaltyTransaction {
    pub id: i64,
    pub user_id: i64,
    pub points: i32,
    pub note: Option<String>,
    pub loyalty_reward_id: Option<i64>,
    pub loyalty_shop_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoyaltyBalance {
    pub user_id: i64,
    pub points: i64,
}
