use axum::http::StatusCode;
use chrono::{TimeZone, Utc};
use mockall::predicate::eq;
use pretty_assertions::assert_eq;
use rstest::rstest;
use studio_core::models::loyalty::{
    LoyaltyBalance, LoyaltyShopInput, LoyaltyShopItem, LoyaltyTransaction, RedeemRejection,
};

use crate::test_utils::{form_request, get_request, send, TestContext, ADMIN_TOKEN, MEMBER_TOKEN};

fn redeemed(user_id: i64, item_id: i64, points: i32) -> LoyaltyTransaction {
    LoyaltyTransaction {
        id: 30,
        user_id,
        points: -points,
        note: Some("Redeemed Grip socks".to_string()),
        loyalty_reward_id: None,
        loyalty_shop_id: Some(item_id),
        created_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
    }
}

#[tokio::test]
async fn members_redeem_for_themselves() {
    let mut ctx = TestContext::new().with_sessions();
    ctx.loyalty
        .expect_redeem()
        .with(eq(7), eq(3))
        .times(1)
        .returning(|user_id, item_id| Ok(redeemed(user_id, item_id, 120)));
    let (app, _dir) = ctx.build();

    let request = form_request("POST", "/api/loyalty/shop/3/redeem", Some(MEMBER_TOKEN), "");
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Reward redeemed");
    assert_eq!(body["data"]["points"], -120);
    assert_eq!(body["data"]["loyalty_shop_id"], 3);
}

#[rstest]
#[case(RedeemRejection::OutOfStock("Grip socks".to_string()), StatusCode::CONFLICT)]
#[case(
    RedeemRejection::NotEnoughPoints { needed: 120, available: 40 },
    StatusCode::CONFLICT
)]
#[case(RedeemRejection::Unavailable("Grip socks".to_string()), StatusCode::BAD_REQUEST)]
#[tokio::test]
async fn redeem_rejections_are_reported(
    #[case] rejection: RedeemRejection,
    #[case] expected: StatusCode,
) {
    let message = rejection.to_string();
    let mut ctx = TestContext::new().with_sessions();
    ctx.loyalty
        .expect_redeem()
        .times(1)
        .returning(move |_, _| Err(rejection.clone().into()));
    let (app, _dir) = ctx.build();

    let request = form_request("POST", "/api/loyalty/shop/3/redeem", Some(MEMBER_TOKEN), "");
    let (status, body) = send(app, request).await;

    assert_eq!(status, expected);
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().ends_with(&message));
}

#[tokio::test]
async fn redeeming_needs_a_session() {
    let (app, _dir) = TestContext::new().with_sessions().build();

    let request = form_request("POST", "/api/loyalty/shop/3/redeem", None, "");
    let (status, _) = send(app, request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn members_read_their_own_balance() {
    let mut ctx = TestContext::new().with_sessions();
    ctx.loyalty
        .expect_balance()
        .with(eq(7))
        .returning(|user_id| Ok(LoyaltyBalance { user_id, points: 340 }));
    let (app, _dir) = ctx.build();

    let (status, body) = send(app, get_request("/api/users/7/loyalty", Some(MEMBER_TOKEN))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["points"], 340);
}

#[tokio::test]
async fn members_cannot_read_other_histories() {
    let (app, _dir) = TestContext::new().with_sessions().build();

    let request = get_request("/api/users/8/loyalty/history", Some(MEMBER_TOKEN));
    let (status, _) = send(app, request).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admins_read_any_history() {
    let mut ctx = TestContext::new().with_sessions();
    ctx.loyalty
        .expect_history()
        .with(eq(8))
        .times(1)
        .returning(|user_id| Ok(vec![redeemed(user_id, 3, 120)]));
    let (app, _dir) = ctx.build();

    let request = get_request("/api/users/8/loyalty/history", Some(ADMIN_TOKEN));
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["user_id"], 8);
}

#[tokio::test]
async fn admin_stocks_the_shop() {
    let mut ctx = TestContext::new().with_sessions();
    ctx.loyalty
        .expect_create_shop_item()
        .with(eq(LoyaltyShopInput {
            name: "Grip socks".to_string(),
            description: None,
            price: 120,
            stock: Some(25),
            is_active: true,
        }))
        .times(1)
        .returning(|input| {
            Ok(LoyaltyShopItem {
                id: 3,
                name: input.name,
                description: input.description,
                price: input.price,
                stock: input.stock,
                is_active: input.is_active,
            })
        });
    let (app, _dir) = ctx.build();

    let request = form_request(
        "POST",
        "/api/loyalty/shop",
        Some(ADMIN_TOKEN),
        "name=Grip+socks&price=120&stock=25&is_active=on",
    );
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Shop item created");
    assert_eq!(body["data"]["stock"], 25);
}

#[tokio::test]
async fn negative_stock_is_a_field_error() {
    let (app, _dir) = TestContext::new().with_sessions().build();

    let request = form_request(
        "POST",
        "/api/loyalty/shop",
        Some(ADMIN_TOKEN),
        "name=Grip+socks&price=120&stock=-1",
    );
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"]["stock"][0], "Must not be negative");
}
