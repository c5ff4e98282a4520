use serde::{Deserialize, Serialize};

use super::ParseForm;
use crate::form::{FieldErrors, FieldReader, FormData};
use crate::models::user::{Credentials, NewUser, UserRole, UserUpdate};

pub const MIN_PASSWORD_LEN: usize = 8;

fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    }
}

/// Sign-up from the customer site; always creates a member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterForm(pub NewUser);

impl ParseForm for RegisterForm {
    fn parse(form: &FormData) -> Result<Self, FieldErrors> {
        let mut r = FieldReader::new(form);
        let name = r.required_text("name");
        let email = r.required_text("email").to_lowercase();
        r.check("email", looks_like_email(&email), "Must be a valid email");
        let phone = r.optional_text("phone");
        let password = r.required_text("password");
        r.check(
            "password",
            password.chars().count() >= MIN_PASSWORD_LEN,
            "Must be at least 8 characters",
        );
        let confirmation = r.optional_text("password_confirmation");
        r.check(
            "password_confirmation",
            confirmation.as_deref() == Some(password.as_str()),
            "Passwords do not match",
        );

        r.finish(RegisterForm(NewUser {
            name,
            email,
            phone,
            password,
            role: UserRole::Member,
        }))
    }
}

impl ParseForm for UserUpdate {
    fn parse(form: &FormData) -> Result<Self, FieldErrors> {
        let mut r = FieldReader::new(form);
        let name = r.required_text("name");
        let email = r.required_text("email").to_lowercase();
        r.check("email", looks_like_email(&email), "Must be a valid email");
        let phone = r.optional_text("phone");
        let password = r.optional_text("password");
        if let Some(password) = &password {
            r.check(
                "password",
                password.chars().count() >= MIN_PASSWORD_LEN,
                "Must be at least 8 characters",
            );
        }
        let role = r.optional::<UserRole>("role", "Unknown role");

        r.finish(UserUpdate {
            name,
            email,
            phone,
            password,
            role,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginForm(pub Credentials);

impl ParseForm for LoginForm {
    fn parse(form: &FormData) -> Result<Self, FieldErrors> {
        let mut r = FieldReader::new(form);
        let email = r.required_text("email").to_lowercase();
        let password = r.required_text("password");
        r.finish(LoginForm(Credentials { email, password }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_requires_matching_passwords() {
        let form = FormData::from_pairs([
            ("name", "Ayu"),
            ("email", "Ayu@Example.com"),
            ("password", "longenough"),
            ("password_confirmation", "different"),
        ]);
        let errors = RegisterForm::parse(&form).unwrap_err();
        assert!(errors.contains("password_confirmation"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn register_lowercases_email() {
        let form = FormData::from_pairs([
            ("name", "Ayu"),
            ("email", "Ayu@Example.com"),
            ("password", "longenough"),
            ("password_confirmation", "longenough"),
        ]);
        let RegisterForm(user) = RegisterForm::parse(&form).unwrap();
        assert_eq!(user.email, "ayu@example.com");
        assert_eq!(user.role, UserRole::Member);
    }

    #[test]
    fn edit_rejects_short_password_only_when_given() {
        let ok = FormData::from_pairs([("name", "Ayu"), ("email", "a@b.co")]);
        assert!(UserUpdate::parse(&ok).is_ok());

        let short = FormData::from_pairs([("name", "Ayu"), ("email", "a@b.co"), ("password", "abc")]);
        assert!(UserUpdate::parse(&short).unwrap_err().contains("password"));
    }

    #[test]
    fn email_shape() {
        assert!(looks_like_email("a@b.co"));
        assert!(!looks_like_email("a@b"));
        assert!(!looks_like_email("@b.co"));
        assert!(!looks_like_email("ab.co"));
    }
}
