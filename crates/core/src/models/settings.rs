use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Bank account customers transfer package payments to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositAccount {
    pub id: i64,
    pub bank_name: String,
    pub account_name: String,
    pub account_number: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositAccountInput {
    pub bank_name: String,
    pub account_name: String,
    pub account_number: String,
    pub is_active: bool,
}

/// Site-wide key/value settings (contact details, policies, banners).
pub type WebSettings = BTreeMap<String, String>;

/// Keys the settings form accepts.
pub const SETTING_KEYS: &[&str] = &[
    "site_name",
    "contact_email",
    "contact_phone",
    "whatsapp",
    "instagram",
    "booking_policy",
    "cancellation_hours",
];
