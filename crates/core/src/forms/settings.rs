use super::ParseForm;
use crate::form::{FieldErrors, FieldReader, FormData};
use crate::models::settings::{DepositAccountInput, WebSettings, SETTING_KEYS};

impl ParseForm for DepositAccountInput {
    fn parse(form: &FormData) -> Result<Self, FieldErrors> {
        let mut r = FieldReader::new(form);
        let bank_name = r.required_text("bank_name");
        let account_name = r.required_text("account_name");
        let account_number = r.required_text("account_number");
        r.check(
            "account_number",
            account_number.chars().all(|c| c.is_ascii_digit() || c == '-' || c == ' '),
            "Must contain digits only",
        );
        let is_active = r.flag("is_active");
        r.finish(DepositAccountInput {
            bank_name,
            account_name,
            account_number,
            is_active,
        })
    }
}

/// Known settings keys present in the submission; unknown keys are ignored
/// and blank values clear the setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebSettingsForm(pub WebSettings);

impl ParseForm for WebSettingsForm {
    fn parse(form: &FormData) -> Result<Self, FieldErrors> {
        let mut r = FieldReader::new(form);
        let mut settings = WebSettings::new();
        for key in SETTING_KEYS {
            settings.insert(key.to_string(), r.optional_text(key).unwrap_or_default());
        }
        if let Some(hours) = settings.get("cancellation_hours").filter(|v| !v.is_empty()) {
            let ok = hours.parse::<u32>().is_ok();
            r.check("cancellation_hours", ok, crate::form::MUST_BE_NUMBER);
        }
        r.finish(WebSettingsForm(settings))
    }
}
