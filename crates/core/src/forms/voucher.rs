use serde::{Deserialize, Serialize};

use super::{ParseForm, INVALID_DATE, MUST_BE_POSITIVE};
use crate::form::{end_of_day, parse_date, FieldErrors, FieldReader, FormData, MUST_BE_NUMBER};
use crate::models::voucher::{VoucherInput, VoucherKind};

fn valid_code(code: &str) -> bool {
    (3..=32).contains(&code.len()) && code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

impl ParseForm for VoucherInput {
    fn parse(form: &FormData) -> Result<Self, FieldErrors> {
        let mut r = FieldReader::new(form);
        let code = r.optional_text("code").map(|c| c.to_uppercase());
        if let Some(code) = &code {
            r.check("code", valid_code(code), "Use 3-32 letters, digits or dashes");
        }
        let kind: VoucherKind = r.required("kind", "Must be fixed or percentage");
        let amount: i64 = r.required("amount", MUST_BE_NUMBER);
        r.check("amount", amount > 0, MUST_BE_POSITIVE);
        if kind == VoucherKind::Percentage {
            r.check("amount", amount <= 100, "A percentage must not exceed 100");
        }
        let user_id = r.optional("user_id", MUST_BE_NUMBER);
        let expired_at = r.optional_with(
            "expired_at",
            |raw| parse_date(raw).and_then(end_of_day),
            INVALID_DATE,
        );
        r.finish(VoucherInput {
            code,
            kind,
            amount,
            user_id,
            expired_at,
        })
    }
}

/// Checks a code against a package before checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherPreviewForm {
    pub code: String,
    pub package_id: i64,
}

impl ParseForm for VoucherPreviewForm {
    fn parse(form: &FormData) -> Result<Self, FieldErrors> {
        let mut r = FieldReader::new(form);
        let code = r.required_text("code").to_uppercase();
        let package_id = r.required("package_id", MUST_BE_NUMBER);
        r.finish(VoucherPreviewForm { code, package_id })
    }
}
