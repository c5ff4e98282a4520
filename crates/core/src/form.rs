//! # Form Actions
//!
//! Every mutating endpoint of the studio works like a form submission: the
//! client posts a urlencoded body, the server validates it field by field and
//! answers with a [`FormState`] that the client renders (field messages, an
//! error toast, or a success toast with a cleared form).
//!
//! This module holds the three pieces those actions share:
//!
//! - [`FormData`]: the submitted `(name, value)` pairs, repeated names allowed
//! - [`FieldReader`]: typed reads that collect [`FieldErrors`] instead of failing fast
//! - [`FormState`]: the `{status, form, errors}` reply

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const REQUIRED: &str = "Required";
pub const MUST_BE_NUMBER: &str = "Must be a number";

/// Submitted form fields in the order the client sent them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormData(Vec<(String, String)>);

impl FormData {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    /// First non-blank value for `name`, trimmed.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.trim())
            .find(|v| !v.is_empty())
    }

    /// Every non-blank value for `name`. Accepts the `name[]` spelling used by
    /// multi-selects as well.
    pub fn all(&self, name: &str) -> Vec<&str> {
        let bracketed = format!("{}[]", name);
        self.0
            .iter()
            .filter(|(k, _)| k == name || *k == bracketed)
            .map(|(_, v)| v.trim())
            .filter(|v| !v.is_empty())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Values echoed back to the client so it can re-populate the form.
    /// Secrets are never echoed.
    pub fn echo(&self) -> BTreeMap<String, String> {
        let mut echoed = BTreeMap::new();
        for (name, value) in &self.0 {
            if name.contains("password") {
                continue;
            }
            echoed
                .entry(name.trim_end_matches("[]").to_string())
                .and_modify(|existing: &mut String| {
                    existing.push(',');
                    existing.push_str(value);
                })
                .or_insert_with(|| value.clone());
        }
        echoed
    }
}

/// Per-field validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(", ")))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Reads typed values out of a [`FormData`], recording a message for every
/// field that is missing or malformed.
///
/// Required reads return `T::default()` on failure so that parsers can build
/// their output unconditionally; [`FieldReader::finish`] discards it when any
/// error was recorded.
pub struct FieldReader<'a> {
    form: &'a FormData,
    errors: FieldErrors,
}

impl<'a> FieldReader<'a> {
    pub fn new(form: &'a FormData) -> Self {
        Self {
            form,
            errors: FieldErrors::new(),
        }
    }

    pub fn required_text(&mut self, field: &str) -> String {
        let form = self.form;
        match form.get(field) {
            Some(value) => value.to_string(),
            None => {
                self.errors.add(field, REQUIRED);
                String::new()
            }
        }
    }

    pub fn optional_text(&self, field: &str) -> Option<String> {
        self.form.get(field).map(str::to_string)
    }

    pub fn required<T: FromStr + Default>(&mut self, field: &str, invalid: &str) -> T {
        self.required_with(field, |s| s.parse().ok(), invalid)
    }

    pub fn optional<T: FromStr>(&mut self, field: &str, invalid: &str) -> Option<T> {
        self.optional_with(field, |s| s.parse().ok(), invalid)
    }

    pub fn required_with<T: Default>(
        &mut self,
        field: &str,
        parse: impl Fn(&str) -> Option<T>,
        invalid: &str,
    ) -> T {
        let form = self.form;
        match form.get(field) {
            None => {
                self.errors.add(field, REQUIRED);
                T::default()
            }
            Some(raw) => parse(raw).unwrap_or_else(|| {
                self.errors.add(field, invalid);
                T::default()
            }),
        }
    }

    pub fn optional_with<T>(
        &mut self,
        field: &str,
        parse: impl Fn(&str) -> Option<T>,
        invalid: &str,
    ) -> Option<T> {
        let form = self.form;
        let raw = form.get(field)?;
        let parsed = parse(raw);
        if parsed.is_none() {
            self.errors.add(field, invalid);
        }
        parsed
    }

    /// Every value submitted under `field`, each of which must parse.
    pub fn all<T: FromStr>(&mut self, field: &str, invalid: &str) -> Vec<T> {
        let mut values = Vec::new();
        let mut failed = false;
        let form = self.form;
        for raw in form.all(field) {
            match raw.parse() {
                Ok(value) => values.push(value),
                Err(_) => failed = true,
            }
        }
        if failed {
            self.errors.add(field, invalid);
        }
        values
    }

    /// Checkbox semantics: absent means false.
    pub fn flag(&self, field: &str) -> bool {
        matches!(
            self.form.get(field).map(str::to_ascii_lowercase).as_deref(),
            Some("on" | "true" | "1" | "yes")
        )
    }

    /// Records `message` on `field` unless `ok` holds. Skipped when the field
    /// already failed to parse.
    pub fn check(&mut self, field: &str, ok: bool, message: &str) {
        if !ok && !self.errors.contains(field) {
            self.errors.add(field, message);
        }
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains(field)
    }

    pub fn finish<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self.errors)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormStatus {
    Default,
    FieldErrors,
    Error,
    Success,
}

/// Reply of a form action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormState<T> {
    pub status: FormStatus,
    pub form: BTreeMap<String, String>,
    pub errors: FieldErrors,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> Default for FormState<T> {
    fn default() -> Self {
        Self {
            status: FormStatus::Default,
            form: BTreeMap::new(),
            errors: FieldErrors::new(),
            message: None,
            data: None,
        }
    }
}

impl<T> FormState<T> {
    pub fn field_errors(form: &FormData, errors: FieldErrors) -> Self {
        Self {
            status: FormStatus::FieldErrors,
            form: form.echo(),
            errors,
            message: None,
            data: None,
        }
    }

    pub fn error(form: &FormData, message: impl Into<String>) -> Self {
        Self {
            status: FormStatus::Error,
            form: form.echo(),
            errors: FieldErrors::new(),
            message: Some(message.into()),
            data: None,
        }
    }

    /// Success clears the submitted form.
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            status: FormStatus::Success,
            form: BTreeMap::new(),
            errors: FieldErrors::new(),
            message: Some(message.into()),
            data: Some(data),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == FormStatus::Success
    }
}

pub fn parse_date(raw: &str) -> Option<chrono::NaiveDate> {
    chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Accepts `HH:MM` as sent by time inputs, and `HH:MM:SS`.
pub fn parse_time(raw: &str) -> Option<chrono::NaiveTime> {
    chrono::NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| chrono::NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok()
}

/// Accepts the `datetime-local` input format with or without seconds, and a
/// space separator.
pub fn parse_datetime(raw: &str) -> Option<chrono::NaiveDateTime> {
    ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|format| chrono::NaiveDateTime::parse_from_str(raw, format).ok())
}

/// Last second of `date` in UTC; expiry dates entered as plain dates are
/// inclusive.
pub fn end_of_day(date: chrono::NaiveDate) -> Option<chrono::DateTime<chrono::Utc>> {
    date.and_hms_opt(23, 59, 59).map(|dt| dt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn get_skips_blank_values() {
        let form = FormData::from_pairs([("name", "  "), ("name", " Yoga ")]);
        assert_eq!(form.get("name"), Some("Yoga"));
        assert_eq!(form.get("missing"), None);
    }

    #[test]
    fn all_accepts_bracketed_names() {
        let form = FormData::from_pairs([("ids[]", "1"), ("ids", "2"), ("other", "3")]);
        assert_eq!(form.all("ids"), vec!["1", "2"]);
    }

    #[test]
    fn echo_drops_passwords_and_joins_repeats() {
        let form = FormData::from_pairs([
            ("email", "a@b.c"),
            ("password", "secret"),
            ("location_ids[]", "1"),
            ("location_ids[]", "2"),
        ]);
        let echoed = form.echo();
        assert_eq!(echoed.get("email").map(String::as_str), Some("a@b.c"));
        assert_eq!(echoed.get("location_ids").map(String::as_str), Some("1,2"));
        assert!(!echoed.contains_key("password"));
    }

    #[test]
    fn reader_collects_every_failure() {
        let form = FormData::from_pairs([("class_id", "abc"), ("capacity", "10")]);
        let mut reader = FieldReader::new(&form);
        let _name = reader.required_text("name");
        let _class: i64 = reader.required("class_id", MUST_BE_NUMBER);
        let capacity: i32 = reader.required("capacity", MUST_BE_NUMBER);
        reader.check("capacity", capacity > 20, "Too small");

        let errors = reader.finish(()).unwrap_err();
        assert_eq!(errors.get("name"), Some(&[REQUIRED.to_string()][..]));
        assert_eq!(errors.get("class_id"), Some(&[MUST_BE_NUMBER.to_string()][..]));
        assert!(errors.contains("capacity"));
    }

    #[test]
    fn check_does_not_pile_onto_parse_errors() {
        let form = FormData::from_pairs([("amount", "x")]);
        let mut reader = FieldReader::new(&form);
        let amount: i64 = reader.required("amount", MUST_BE_NUMBER);
        reader.check("amount", amount > 0, "Must be positive");
        let errors = reader.finish(()).unwrap_err();
        assert_eq!(errors.get("amount").map(<[String]>::len), Some(1));
    }

    #[test]
    fn time_formats() {
        assert!(parse_time("07:30").is_some());
        assert!(parse_time("07:30:15").is_some());
        assert!(parse_time("7.30").is_none());
        assert!(parse_datetime("2024-05-01T09:00").is_some());
        assert!(parse_datetime("2024-05-01 09:00:00").is_some());
    }

    #[test]
    fn success_clears_form() {
        let state = FormState::success(5, "Saved");
        assert_eq!(state.status, FormStatus::Success);
        assert!(state.form.is_empty());
        assert_eq!(state.data, Some(5));
    }
}
