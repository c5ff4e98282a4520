use axum::{
    extract::{Path, State},
    Form, Json,
};
use std::sync::Arc;
use studio_core::{
    form::FormData,
    models::loyalty::{
        LoyaltyBalance, LoyaltyReward, LoyaltyRewardInput, LoyaltyShopInput, LoyaltyShopItem,
        LoyaltyTransaction,
    },
};

use crate::{
    middleware::{
        auth::{AdminUser, AuthUser},
        error_handling::{form_action, AppError, FormReply},
    },
    ApiState,
};

#[axum::debug_handler]
pub async fn list_rewards(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<LoyaltyReward>>, AppError> {
    Ok(Json(state.services.loyalty.list_rewards().await?))
}

#[axum::debug_handler]
pub async fn create_reward(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Form(form): Form<FormData>,
) -> FormReply<LoyaltyReward> {
    form_action(form, "Reward created", |input: LoyaltyRewardInput| async move {
        state.services.loyalty.create_reward(input).await
    })
    .await
}

#[axum::debug_handler]
pub async fn list_shop_items(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<LoyaltyShopItem>>, AppError> {
    Ok(Json(state.services.loyalty.list_shop_items().await?))
}

#[axum::debug_handler]
pub async fn create_shop_item(
    State(state): State<Arc<ApiState>>,
    _admin: AdminUser,
    Form(form): Form<FormData>,
) -> FormReply<LoyaltyShopItem> {
    form_action(form, "Shop item created", |input: LoyaltyShopInput| async move {
        state.services.loyalty.create_shop_item(input).await
    })
    .await
}

#[axum::debug_handler]
pub async fn redeem(
    State(state): State<Arc<ApiState>>,
    auth: AuthUser,
    Path(item_id): Path<i64>,
) -> FormReply<LoyaltyTransaction> {
    let result = state.services.loyalty.redeem(auth.0.id, item_id).await;
    FormReply::from_result(&FormData::new(), result, "Reward redeemed")
}

#[axum::debug_handler]
pub async fn balance(
    State(state): State<Arc<ApiState>>,
    auth: AuthUser,
    Path(user_id): Path<i64>,
) -> Result<Json<LoyaltyBalance>, AppError> {
    auth.ensure_can_access(user_id)?;
    Ok(Json(state.services.loyalty.balance(user_id).await?))
}

#[axum::debug_handler]
pub async fn history(
    State(state): State<Arc<ApiState>>,
    auth: AuthUser,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<LoyaltyTransaction>>, AppError> {
    auth.ensure_can_access(user_id)?;
    Ok(Json(state.services.loyalty.history(user_id).await?))
}
