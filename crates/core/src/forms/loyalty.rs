use super::{ParseForm, MUST_BE_POSITIVE, MUST_NOT_BE_NEGATIVE};
use crate::form::{FieldErrors, FieldReader, FormData, MUST_BE_NUMBER};
use crate::models::loyalty::{LoyaltyRewardInput, LoyaltyShopInput, LoyaltyTrigger};

impl ParseForm for LoyaltyRewardInput {
    fn parse(form: &FormData) -> Result<Self, FieldErrors> {
        let mut r = FieldReader::new(form);
        let name = r.required_text("name");
        let description = r.optional_text("description");
        let points: i32 = r.required("points", MUST_BE_NUMBER);
        r.check("points", points > 0, MUST_BE_POSITIVE);
        let trigger: LoyaltyTrigger = r.required("trigger", "Unknown trigger");
        let is_active = r.flag("is_active");
        r.finish(LoyaltyRewardInput {
            name,
            description,
            points,
            trigger,
            is_active,
        })
    }
}

impl ParseForm for LoyaltyShopInput {
    fn parse(form: &FormData) -> Result<Self, FieldErrors> {
        let mut r = FieldReader::new(form);
        let name = r.required_text("name");
        let description = r.optional_text("description");
        let price: i32 = r.required("price", MUST_BE_NUMBER);
        r.check("price", price > 0, MUST_BE_POSITIVE);
        let stock: Option<i32> = r.optional("stock", MUST_BE_NUMBER);
        if let Some(stock) = stock {
            r.check("stock", stock >= 0, MUST_NOT_BE_NEGATIVE);
        }
        let is_active = r.flag("is_active");
        r.finish(LoyaltyShopInput {
            name,
            description,
            price,
            stock,
            is_active,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reward_trigger_is_parsed() {
        let form = FormData::from_pairs([
            ("name", "Check-in bonus"),
            ("points", "5"),
            ("trigger", "class_check_in"),
            ("is_active", "on"),
        ]);
        let reward = LoyaltyRewardInput::parse(&form).unwrap();
        assert_eq!(reward.trigger, LoyaltyTrigger::ClassCheckIn);
        assert!(reward.is_active);
    }

    #[test]
    fn blank_stock_means_unlimited() {
        let form = FormData::from_pairs([("name", "Towel"), ("price", "50"), ("stock", "")]);
        assert_eq!(LoyaltyShopInput::parse(&form).unwrap().stock, None);
    }
}
