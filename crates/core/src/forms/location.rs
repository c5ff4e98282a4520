use super::{ParseForm, INVALID_TIME, MUST_BE_POSITIVE};
use crate::form::{parse_time, FieldErrors, FieldReader, FormData, MUST_BE_NUMBER};
use crate::models::coach::CoachInput;
use crate::models::location::{FacilityInput, LocationInput, OperationalHour};

impl ParseForm for CoachInput {
    fn parse(form: &FormData) -> Result<Self, FieldErrors> {
        let mut r = FieldReader::new(form);
        let name = r.required_text("name");
        let bio = r.optional_text("bio");
        let image_url = r.optional_text("image_url");
        r.finish(CoachInput {
            name,
            bio,
            image_url,
        })
    }
}

impl ParseForm for LocationInput {
    fn parse(form: &FormData) -> Result<Self, FieldErrors> {
        let mut r = FieldReader::new(form);
        let name = r.required_text("name");
        let address = r.required_text("address");
        let phone = r.optional_text("phone");
        let link_maps = r.optional_text("link_maps");
        if let Some(link) = &link_maps {
            r.check(
                "link_maps",
                link.starts_with("https://") || link.starts_with("http://"),
                "Must be a link",
            );
        }
        r.finish(LocationInput {
            name,
            address,
            phone,
            link_maps,
        })
    }
}

impl ParseForm for FacilityInput {
    fn parse(form: &FormData) -> Result<Self, FieldErrors> {
        let mut r = FieldReader::new(form);
        let name = r.required_text("name");
        let capacity: i32 = r.required("capacity", MUST_BE_NUMBER);
        r.check("capacity", capacity > 0, MUST_BE_POSITIVE);
        r.finish(FacilityInput { name, capacity })
    }
}

/// Full weekly opening schedule of a location, submitted as parallel
/// `day_of_week[]`, `open_time[]` and `close_time[]` lists. Errors are keyed
/// `operational_hours.<row>`.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationalHoursForm(pub Vec<OperationalHour>);

impl ParseForm for OperationalHoursForm {
    fn parse(form: &FormData) -> Result<Self, FieldErrors> {
        let days = form.all("day_of_week");
        let opens = form.all("open_time");
        let closes = form.all("close_time");

        let mut errors = FieldErrors::new();
        if days.len() != opens.len() || days.len() != closes.len() {
            errors.add("operational_hours", "Every row needs a day, an opening and a closing time");
            return Err(errors);
        }

        let mut hours: Vec<OperationalHour> = Vec::with_capacity(days.len());
        for (row, ((day, open), close)) in days.iter().zip(&opens).zip(&closes).enumerate() {
            let field = format!("operational_hours.{}", row);
            let day = day.parse::<i16>().ok().filter(|d| (0..=6).contains(d));
            let open = parse_time(open);
            let close = parse_time(close);
            let (Some(day_of_week), Some(open_time), Some(close_time)) = (day, open, close) else {
                if day.is_none() {
                    errors.add(&field, "Day must be between 0 (Sunday) and 6 (Saturday)");
                }
                if open.is_none() || close.is_none() {
                    errors.add(&field, INVALID_TIME);
                }
                continue;
            };
            let hour = OperationalHour {
                day_of_week,
                open_time,
                close_time,
            };
            if !hour.is_valid() {
                errors.add(&field, "Opening time must be before closing time");
                continue;
            }
            let clashes = hours.iter().any(|other| {
                other.day_of_week == hour.day_of_week
                    && hour.open_time < other.close_time
                    && other.open_time < hour.close_time
            });
            if clashes {
                errors.add(&field, "Overlaps another opening on the same day");
                continue;
            }
            hours.push(hour);
        }

        if errors.is_empty() {
            hours.sort_by_key(|h| (h.day_of_week, h.open_time));
            Ok(OperationalHoursForm(hours))
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn opening_must_precede_closing() {
        let form = FormData::from_pairs([
            ("day_of_week[]", "1"),
            ("open_time[]", "07:00"),
            ("close_time[]", "21:00"),
            ("day_of_week[]", "2"),
            ("open_time[]", "21:00"),
            ("close_time[]", "07:00"),
        ]);
        let errors = OperationalHoursForm::parse(&form).unwrap_err();
        assert!(errors.contains("operational_hours.1"));
        assert!(!errors.contains("operational_hours.0"));
    }

    #[test]
    fn overlapping_rows_are_rejected() {
        let form = FormData::from_pairs([
            ("day_of_week", "1"),
            ("open_time", "07:00"),
            ("close_time", "12:00"),
            ("day_of_week", "1"),
            ("open_time", "11:00"),
            ("close_time", "13:00"),
        ]);
        assert!(OperationalHoursForm::parse(&form).unwrap_err().contains("operational_hours.1"));
    }

    #[test]
    fn rows_are_sorted() {
        let form = FormData::from_pairs([
            ("day_of_week", "3"),
            ("open_time", "07:00"),
            ("close_time", "12:00"),
            ("day_of_week", "0"),
            ("open_time", "08:00"),
            ("close_time", "10:00"),
        ]);
        let OperationalHoursForm(hours) = OperationalHoursForm::parse(&form).unwrap();
        assert_eq!(hours.iter().map(|h| h.day_of_week).collect::<Vec<_>>(), vec![0, 3]);
    }

    #[test]
    fn mismatched_lists_fail() {
        let form = FormData::from_pairs([("day_of_week", "3"), ("open_time", "07:00")]);
        assert!(OperationalHoursForm::parse(&form).unwrap_err().contains("operational_hours"));
    }

    #[test]
    fn facility_capacity_must_be_positive() {
        let form = FormData::from_pairs([("name", "Studio A"), ("capacity", "0")]);
        assert!(FacilityInput::parse(&form).unwrap_err().contains("capacity"));
    }
}
