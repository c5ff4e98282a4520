//! Parsers turning submitted [`FormData`] into the inputs of the service
//! layer. Each parser reports every invalid field at once.

use crate::form::{FieldErrors, FormData};

pub mod agenda;
pub mod class;
pub mod location;
pub mod loyalty;
pub mod package;
pub mod settings;
pub mod user;
pub mod voucher;

pub use agenda::BookingForm;
pub use package::{PurchaseForm, UserPackageForm};
pub use user::{LoginForm, RegisterForm};
pub use voucher::VoucherPreviewForm;

pub const MUST_BE_POSITIVE: &str = "Must be greater than zero";
pub const MUST_NOT_BE_NEGATIVE: &str = "Must not be negative";
pub const INVALID_DATE: &str = "Must be a date (YYYY-MM-DD)";
pub const INVALID_TIME: &str = "Must be a time (HH:MM)";
pub const INVALID_DATETIME: &str = "Must be a date and time";

pub trait ParseForm: Sized {
    fn parse(form: &FormData) -> Result<Self, FieldErrors>;
}
