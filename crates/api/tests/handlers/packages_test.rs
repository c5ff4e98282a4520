use axum::http::StatusCode;
use chrono::{TimeZone, Utc};
use mockall::predicate::eq;
use pretty_assertions::assert_eq;
use studio_core::{
    errors::StudioError,
    models::package::{
        CreditBalance, PackageTransaction, PurchaseRequest, TransactionStatus, UserPackage,
        UserPackageUpdate,
    },
    pricing::PriceBreakdown,
};

use crate::test_utils::{form_request, get_request, send, TestContext, ADMIN_TOKEN, MEMBER_TOKEN};

fn transaction(request: &PurchaseRequest, total: i64, status: TransactionStatus) -> PackageTransaction {
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
    PackageTransaction {
        id: 21,
        user_id: request.user_id,
        package_id: request.package_id,
        voucher_id: None,
        deposit_account_id: request.deposit_account_id,
        amount: total,
        discount: 0,
        total,
        status,
        user_package_id: None,
        created_at: at,
        updated_at: at,
    }
}

#[tokio::test]
async fn paid_purchase_waits_for_confirmation() {
    let mut ctx = TestContext::new().with_sessions();
    ctx.packages
        .expect_purchase_package()
        .with(eq(PurchaseRequest {
            user_id: 7,
            package_id: 3,
            voucher_code: Some("SPRING".to_string()),
            deposit_account_id: Some(2),
        }))
        .times(1)
        .returning(|request| Ok(transaction(&request, 450_000, TransactionStatus::Pending)));
    let (app, _dir) = ctx.build();

    let request = form_request(
        "POST",
        "/api/packages/purchase",
        Some(MEMBER_TOKEN),
        "package_id=3&voucher_code=spring&deposit_account_id=2",
    );
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(
        body["message"],
        "Purchase recorded, awaiting payment confirmation"
    );
}

#[tokio::test]
async fn free_purchase_is_active_right_away() {
    let mut ctx = TestContext::new().with_sessions();
    ctx.packages
        .expect_purchase_package()
        .returning(|request| Ok(transaction(&request, 0, TransactionStatus::Completed)));
    let (app, _dir) = ctx.build();

    let request = form_request("POST", "/api/packages/purchase", Some(MEMBER_TOKEN), "package_id=3");
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Package activated");
}

#[tokio::test]
async fn only_admins_confirm_payments() {
    let (app, _dir) = TestContext::new().with_sessions().build();

    let request = form_request(
        "POST",
        "/api/package-transactions/21/confirm",
        Some(MEMBER_TOKEN),
        "",
    );
    let (status, _) = send(app, request).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn confirming_twice_is_a_conflict() {
    let mut ctx = TestContext::new().with_sessions();
    ctx.packages
        .expect_confirm_transaction()
        .with(eq(21))
        .returning(|_| Err(StudioError::Conflict("Transaction is not pending".into())));
    let (app, _dir) = ctx.build();

    let request = form_request(
        "POST",
        "/api/package-transactions/21/confirm",
        Some(ADMIN_TOKEN),
        "",
    );
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn admin_rejects_a_pending_payment() {
    let mut ctx = TestContext::new().with_sessions();
    ctx.packages
        .expect_reject_transaction()
        .with(eq(21))
        .times(1)
        .returning(|_| {
            let request = PurchaseRequest {
                user_id: 7,
                package_id: 3,
                voucher_code: None,
                deposit_account_id: Some(2),
            };
            Ok(transaction(&request, 450_000, TransactionStatus::Failed))
        });
    let (app, _dir) = ctx.build();

    let request = form_request(
        "POST",
        "/api/package-transactions/21/reject",
        Some(ADMIN_TOKEN),
        "",
    );
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Payment rejected");
    assert_eq!(body["data"]["status"], "failed");
    assert!(body["data"]["user_package_id"].is_null());
}

#[tokio::test]
async fn staff_adjust_package_credit() {
    let expired_at = Utc.with_ymd_and_hms(2025, 1, 31, 23, 59, 59).unwrap();
    let mut ctx = TestContext::new().with_sessions();
    ctx.packages
        .expect_update_user_package()
        .with(eq(4), eq(UserPackageUpdate { credit: 12, expired_at }))
        .times(1)
        .returning(|id, update| {
            Ok(UserPackage {
                id,
                user_id: 7,
                package_id: 3,
                class_type_id: 1,
                credit: update.credit,
                credit_used: 5,
                expired_at: update.expired_at,
                created_at: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
            })
        });
    let (app, _dir) = ctx.build();

    let request = form_request(
        "PUT",
        "/api/user-packages/4",
        Some(ADMIN_TOKEN),
        "credit=12&credit_used=5&expired_at=2025-01-31",
    );
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Package updated");
    assert_eq!(body["data"]["credit"], 12);
}

#[tokio::test]
async fn staff_cannot_set_credit_below_usage() {
    let (app, _dir) = TestContext::new().with_sessions().build();

    let request = form_request(
        "PUT",
        "/api/user-packages/4",
        Some(ADMIN_TOKEN),
        "credit=2&credit_used=3&expired_at=2024-12-31",
    );
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["credit"].is_array());
}

#[tokio::test]
async fn members_read_their_own_credits() {
    let mut ctx = TestContext::new().with_sessions();
    ctx.packages
        .expect_credit_balance()
        .with(eq(7))
        .returning(|_| {
            Ok(vec![CreditBalance {
                class_type_id: 1,
                available: 4,
                reserved: 1,
            }])
        });
    let (app, _dir) = ctx.build();

    let (status, body) = send(app, get_request("/api/users/7/credits", Some(MEMBER_TOKEN))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["available"], 4);
}

#[tokio::test]
async fn members_cannot_read_other_credits() {
    let (app, _dir) = TestContext::new().with_sessions().build();

    let (status, _) = send(app, get_request("/api/users/8/credits", Some(MEMBER_TOKEN))).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn voucher_preview_prices_for_the_caller() {
    let mut ctx = TestContext::new().with_sessions();
    ctx.vouchers
        .expect_preview_voucher()
        .withf(|code, package_id, user_id| code == "SPRING" && *package_id == 3 && *user_id == 7)
        .times(1)
        .returning(|_, _, _| {
            Ok(PriceBreakdown {
                price: 500_000,
                discount: 50_000,
                total: 450_000,
            })
        });
    let (app, _dir) = ctx.build();

    let request = form_request(
        "POST",
        "/api/vouchers/preview",
        Some(MEMBER_TOKEN),
        "code=spring&package_id=3",
    );
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 450_000);
}
