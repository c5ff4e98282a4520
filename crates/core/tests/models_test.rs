use chrono::Utc;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{from_str, json, to_string, to_value};
use serde_test::{assert_tokens, Token};
use studio_core::errors::StudioError;
use studio_core::form::{FieldErrors, FormData, FormState, FormStatus};
use studio_core::models::{
    agenda::BookingStatus,
    loyalty::{LoyaltyShopItem, LoyaltyTrigger, RedeemRejection},
    package::{CreditKind, TransactionStatus, UserPackage},
    user::{User, UserRole},
    voucher::VoucherKind,
};

#[test]
fn test_form_status_wire_names() {
    assert_tokens(
        &FormStatus::FieldErrors,
        &[Token::UnitVariant {
            name: "FormStatus",
            variant: "field-errors",
        }],
    );
    assert_tokens(
        &FormStatus::Success,
        &[Token::UnitVariant {
            name: "FormStatus",
            variant: "success",
        }],
    );
}

#[test]
fn test_field_error_state_shape() {
    let form = FormData::from_pairs([("class_id", "abc"), ("password", "hidden")]);
    let state: FormState<()> =
        FormState::field_errors(&form, FieldErrors::single("class_id", "Must be a number"));

    let value = to_value(&state).expect("Failed to serialize form state");
    assert_eq!(
        value,
        json!({
            "status": "field-errors",
            "form": { "class_id": "abc" },
            "errors": { "class_id": ["Must be a number"] },
            "message": null,
            "data": null,
        })
    );
}

#[rstest]
#[case(BookingStatus::Booked, "booked")]
#[case(BookingStatus::CheckedIn, "checked_in")]
#[case(BookingStatus::Cancelled, "cancelled")]
fn test_booking_status_text(#[case] status: BookingStatus, #[case] label: &str) {
    assert_eq!(status.to_string(), label);
    assert_eq!(label.parse::<BookingStatus>().unwrap(), status);
    assert_eq!(to_string(&status).unwrap(), format!("\"{}\"", label));
}

#[test]
fn test_text_enums_round_trip_their_labels() {
    for role in UserRole::ALL {
        assert_eq!(role.as_str().parse::<UserRole>().unwrap(), *role);
    }
    for status in TransactionStatus::ALL {
        assert_eq!(status.as_str().parse::<TransactionStatus>().unwrap(), *status);
    }
    for kind in CreditKind::ALL {
        assert_eq!(kind.as_str().parse::<CreditKind>().unwrap(), *kind);
    }
    for kind in VoucherKind::ALL {
        assert_eq!(kind.as_str().parse::<VoucherKind>().unwrap(), *kind);
    }
    for trigger in LoyaltyTrigger::ALL {
        assert_eq!(trigger.as_str().parse::<LoyaltyTrigger>().unwrap(), *trigger);
    }
}

#[test]
fn test_unknown_label_is_an_error() {
    let err = "refunded".parse::<TransactionStatus>().unwrap_err();
    assert_eq!(err.to_string(), "unknown transaction status 'refunded'");
}

#[rstest]
#[case(BookingStatus::Booked, BookingStatus::CheckedIn, true)]
#[case(BookingStatus::Booked, BookingStatus::Cancelled, true)]
#[case(BookingStatus::CheckedIn, BookingStatus::Cancelled, false)]
#[case(BookingStatus::Cancelled, BookingStatus::Booked, false)]
#[case(BookingStatus::CheckedIn, BookingStatus::CheckedIn, false)]
fn test_booking_transitions(
    #[case] from: BookingStatus,
    #[case] to: BookingStatus,
    #[case] allowed: bool,
) {
    assert_eq!(from.can_transition_to(to), allowed);
}

#[test]
fn test_user_serialization() {
    let user = User {
        id: 7,
        name: "Ayu".to_string(),
        email: "ayu@example.com".to_string(),
        phone: None,
        role: UserRole::Admin,
        created_at: Utc::now(),
    };

    let json = to_string(&user).expect("Failed to serialize user");
    assert!(json.contains("\"role\":\"admin\""));
    let deserialized: User = from_str(&json).expect("Failed to deserialize user");
    assert_eq!(deserialized, user);
    assert!(deserialized.is_admin());
}

#[test]
fn test_user_package_remaining_never_negative() {
    let package = UserPackage {
        id: 1,
        user_id: 1,
        package_id: 1,
        class_type_id: 1,
        credit: 3,
        credit_used: 5,
        expired_at: Utc::now(),
        created_at: Utc::now(),
    };
    assert_eq!(package.remaining(), 0);
    assert!(package.is_expired(Utc::now()));
}

fn shop_item(stock: Option<i32>, is_active: bool) -> LoyaltyShopItem {
    LoyaltyShopItem {
        id: 3,
        name: "Grip socks".to_string(),
        description: None,
        price: 120,
        stock,
        is_active,
    }
}

#[rstest]
#[case(shop_item(Some(4), true), 120)]
#[case(shop_item(None, true), 500)]
fn test_redeem_allowed(#[case] item: LoyaltyShopItem, #[case] balance: i64) {
    assert_eq!(item.check_redeem(balance), Ok(()));
}

#[rstest]
#[case(shop_item(Some(4), false), 500, RedeemRejection::Unavailable("Grip socks".to_string()))]
#[case(shop_item(Some(0), true), 500, RedeemRejection::OutOfStock("Grip socks".to_string()))]
#[case(
    shop_item(None, true),
    119,
    RedeemRejection::NotEnoughPoints { needed: 120, available: 119 }
)]
fn test_redeem_rejected(
    #[case] item: LoyaltyShopItem,
    #[case] balance: i64,
    #[case] expected: RedeemRejection,
) {
    assert_eq!(item.check_redeem(balance), Err(expected));
}

#[test]
fn test_redeem_rejection_messages() {
    let err = StudioError::from(RedeemRejection::NotEnoughPoints {
        needed: 120,
        available: 40,
    });
    assert!(matches!(err, StudioError::Conflict(_)));
    assert_eq!(
        err.to_string(),
        "Conflict: Not enough points: 120 needed, 40 available"
    );
    assert!(matches!(
        StudioError::from(RedeemRejection::Unavailable("Mat".to_string())),
        StudioError::Validation(_)
    ));
}
