use serde::{Deserialize, Serialize};

use super::{ParseForm, INVALID_DATE, MUST_BE_POSITIVE, MUST_NOT_BE_NEGATIVE};
use crate::form::{end_of_day, parse_date, FieldErrors, FieldReader, FormData, MUST_BE_NUMBER};
use crate::models::package::{PackageInput, UserPackageUpdate};

impl ParseForm for PackageInput {
    fn parse(form: &FormData) -> Result<Self, FieldErrors> {
        let mut r = FieldReader::new(form);
        let name = r.required_text("name");
        let description = r.optional_text("description");
        let price: i64 = r.required("price", MUST_BE_NUMBER);
        r.check("price", price >= 0, MUST_NOT_BE_NEGATIVE);
        let credit: i32 = r.required("credit", MUST_BE_NUMBER);
        r.check("credit", credit > 0, MUST_BE_POSITIVE);
        let valid_days: i32 = r.required("valid_days", MUST_BE_NUMBER);
        r.check("valid_days", valid_days > 0, MUST_BE_POSITIVE);
        let class_type_id = r.required("class_type_id", MUST_BE_NUMBER);
        let is_active = r.flag("is_active");
        r.finish(PackageInput {
            name,
            description,
            price,
            credit,
            valid_days,
            class_type_id,
            is_active,
        })
    }
}

/// Checkout of a package. `user_id` is only read when staff record a sale
/// for a member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseForm {
    pub package_id: i64,
    pub voucher_code: Option<String>,
    pub deposit_account_id: Option<i64>,
    pub user_id: Option<i64>,
}

impl ParseForm for PurchaseForm {
    fn parse(form: &FormData) -> Result<Self, FieldErrors> {
        let mut r = FieldReader::new(form);
        let package_id = r.required("package_id", MUST_BE_NUMBER);
        let voucher_code = r.optional_text("voucher_code").map(|c| c.to_uppercase());
        let deposit_account_id = r.optional("deposit_account_id", MUST_BE_NUMBER);
        let user_id = r.optional("user_id", MUST_BE_NUMBER);
        r.finish(PurchaseForm {
            package_id,
            voucher_code,
            deposit_account_id,
            user_id,
        })
    }
}

/// Staff correction of a user's package. `credit_used` is sent along by the
/// edit dialog so the invariant can be reported on the field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPackageForm {
    pub update: UserPackageUpdate,
    pub credit_used: Option<i32>,
}

impl ParseForm for UserPackageForm {
    fn parse(form: &FormData) -> Result<Self, FieldErrors> {
        let mut r = FieldReader::new(form);
        let credit: i32 = r.required("credit", MUST_BE_NUMBER);
        r.check("credit", credit >= 0, MUST_NOT_BE_NEGATIVE);
        let credit_used: Option<i32> = r.optional("credit_used", MUST_BE_NUMBER);
        if let Some(used) = credit_used {
            r.check("credit", used <= credit, crate::credits::CREDIT_EXCEEDED);
        }
        let expired_at = r.required_with(
            "expired_at",
            |raw| parse_date(raw).and_then(end_of_day),
            INVALID_DATE,
        );
        r.finish(UserPackageForm {
            update: UserPackageUpdate { credit, expired_at },
            credit_used,
        })
    }
}
