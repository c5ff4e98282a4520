use super::{ParseForm, MUST_BE_POSITIVE};
use crate::form::{FieldErrors, FieldReader, FormData, MUST_BE_NUMBER};
use crate::models::class::{ClassDetailInput, ClassInput};

/// Name of a new class type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassTypeForm(pub String);

impl ParseForm for ClassTypeForm {
    fn parse(form: &FormData) -> Result<Self, FieldErrors> {
        let mut r = FieldReader::new(form);
        let name = r.required_text("name");
        r.finish(ClassTypeForm(name))
    }
}

impl ParseForm for ClassInput {
    fn parse(form: &FormData) -> Result<Self, FieldErrors> {
        let mut r = FieldReader::new(form);
        let name = r.required_text("name");
        let class_type_id = r.required("class_type_id", MUST_BE_NUMBER);
        let duration_minutes: i32 = r.required("duration_minutes", MUST_BE_NUMBER);
        r.check("duration_minutes", duration_minutes > 0, MUST_BE_POSITIVE);
        r.check(
            "duration_minutes",
            duration_minutes <= 24 * 60,
            "Must be shorter than a day",
        );
        let capacity: i32 = r.required("capacity", MUST_BE_NUMBER);
        r.check("capacity", capacity > 0, MUST_BE_POSITIVE);
        let is_active = r.flag("is_active");

        r.finish(ClassInput {
            name,
            class_type_id,
            duration_minutes,
            capacity,
            is_active,
        })
    }
}

impl ParseForm for ClassDetailInput {
    fn parse(form: &FormData) -> Result<Self, FieldErrors> {
        let mut r = FieldReader::new(form);
        let description = r.optional_text("description");
        let mut location_ids: Vec<i64> = r.all("location_ids", MUST_BE_NUMBER);
        location_ids.sort_unstable();
        location_ids.dedup();
        r.finish(ClassDetailInput {
            description,
            location_ids,
        })
    }
}
