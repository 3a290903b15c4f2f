use serde::{Deserialize, Serialize};
use time::{macros::format_description, Time};

use crate::domain::forms::FieldErrors;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AvailabilityType {
    Offline,
    Virtual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

/// How often a slot repeats. Stored and sent as-is, never expanded into dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RepeatType {
    #[serde(rename = "NONE")]
    None,
    #[serde(rename = "WEEKLY_2")]
    Weekly2,
    #[serde(rename = "WEEKLY_4")]
    Weekly4,
    #[serde(rename = "WEEKLY_6")]
    Weekly6,
    #[serde(rename = "WEEKLY_8")]
    Weekly8,
}

impl AvailabilityType {
    pub fn label(self) -> &'static str {
        match self {
            AvailabilityType::Offline => "In person",
            AvailabilityType::Virtual => "Virtual",
        }
    }
}

impl DayOfWeek {
    pub fn label(self) -> &'static str {
        match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
            DayOfWeek::Sunday => "Sunday",
        }
    }
}

impl RepeatType {
    pub fn label(self) -> &'static str {
        match self {
            RepeatType::None => "Does not repeat",
            RepeatType::Weekly2 => "Weekly for 2 weeks",
            RepeatType::Weekly4 => "Weekly for 4 weeks",
            RepeatType::Weekly6 => "Weekly for 6 weeks",
            RepeatType::Weekly8 => "Weekly for 8 weeks",
        }
    }
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySlot {
    pub id: i64,
    pub provider_id: i64,
    pub availability_type: AvailabilityType,
    pub day_of_week: DayOfWeek,
    pub start_time: String,
    pub end_time: String,
    pub repeat_type: RepeatType,
    #[serde(default)]
    pub location_id: Option<i64>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// Body of `POST /availability` and `PATCH /availability/:id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityInput {
    pub provider_id: i64,
    pub availability_type: AvailabilityType,
    pub day_of_week: DayOfWeek,
    pub start_time: String,
    pub end_time: String,
    pub repeat_type: RepeatType,
    pub location_id: Option<i64>,
    pub is_active: bool,
}

/// What the create/edit dialog holds while the user fills it in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AvailabilityForm {
    pub availability_type: Option<AvailabilityType>,
    pub day_of_week: Option<DayOfWeek>,
    pub start_time: String,
    pub end_time: String,
    pub repeat_type: Option<RepeatType>,
    pub location_id: Option<i64>,
    pub is_active: bool,
}

impl Default for AvailabilityForm {
    fn default() -> Self {
        Self {
            availability_type: None,
            day_of_week: None,
            start_time: String::new(),
            end_time: String::new(),
            repeat_type: Some(RepeatType::None),
            location_id: None,
            is_active: true,
        }
    }
}

impl From<&AvailabilitySlot> for AvailabilityForm {
    fn from(slot: &AvailabilitySlot) -> Self {
        Self {
            availability_type: Some(slot.availability_type),
            day_of_week: Some(slot.day_of_week),
            start_time: trim_seconds(&slot.start_time),
            end_time: trim_seconds(&slot.end_time),
            repeat_type: Some(slot.repeat_type),
            location_id: slot.location_id,
            is_active: slot.is_active,
        }
    }
}

impl AvailabilityForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();

        match self.availability_type {
            None => errors.add("availabilityType", "Availability type is required"),
            Some(AvailabilityType::Virtual) if self.location_id.is_some() => {
                errors.add("locationId", "Virtual availability cannot have a location")
            }
            Some(AvailabilityType::Offline) if self.location_id.is_none() => {
                errors.add("locationId", "Location is required for in-person availability")
            }
            Some(_) => {}
        }
        if self.day_of_week.is_none() {
            errors.add("dayOfWeek", "Day of week is required");
        }
        if self.repeat_type.is_none() {
            errors.add("repeatType", "Repeat type is required");
        }

        let start = parse_time(&mut errors, "startTime", "Start time", &self.start_time);
        let end = parse_time(&mut errors, "endTime", "End time", &self.end_time);
        if let (Some(start), Some(end)) = (start, end) {
            if end <= start {
                errors.add("endTime", "End time must be after start time");
            }
        }

        errors
    }

    /// Validates and builds the request body. Virtual slots never carry a
    /// location id, whatever the form held.
    pub fn into_input(self, provider_id: i64) -> Result<AvailabilityInput, FieldErrors> {
        self.validate().into_result()?;
        let (Some(availability_type), Some(day_of_week), Some(repeat_type)) =
            (self.availability_type, self.day_of_week, self.repeat_type)
        else {
            return Err(self.validate());
        };
        let location_id = match availability_type {
            AvailabilityType::Virtual => None,
            AvailabilityType::Offline => self.location_id,
        };
        Ok(AvailabilityInput {
            provider_id,
            availability_type,
            day_of_week,
            start_time: self.start_time.trim().to_string(),
            end_time: self.end_time.trim().to_string(),
            repeat_type,
            location_id,
            is_active: self.is_active,
        })
    }
}

fn parse_time(errors: &mut FieldErrors, field: &str, label: &str, raw: &str) -> Option<Time> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.add(field, format!("{label} is required"));
        return None;
    }
    match Time::parse(raw, format_description!("[hour]:[minute]")) {
        Ok(t) => Some(t),
        Err(_) => {
            errors.add(field, format!("{label} must be in HH:MM format"));
            None
        }
    }
}

// the API may answer "09:30:00"; the form edits "09:30"
fn trim_seconds(raw: &str) -> String {
    let raw = raw.trim();
    match raw.as_bytes() {
        [_, _, b':', _, _, b':', _, _] => raw[..5].to_string(),
        _ => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn virtual_form() -> AvailabilityForm {
        AvailabilityForm {
            availability_type: Some(AvailabilityType::Virtual),
            day_of_week: Some(DayOfWeek::Tuesday),
            start_time: "09:00".into(),
            end_time: "12:30".into(),
            repeat_type: Some(RepeatType::Weekly4),
            location_id: None,
            is_active: true,
        }
    }

    #[test]
    fn virtual_slot_with_location_is_rejected() {
        let form = AvailabilityForm {
            location_id: Some(3),
            ..virtual_form()
        };
        let errors = form.validate();
        assert_eq!(
            errors.get("locationId"),
            Some("Virtual availability cannot have a location")
        );
        assert!(form.into_input(9).is_err());
    }

    #[test]
    fn virtual_slot_without_location_passes() {
        let input = virtual_form().into_input(9).unwrap();
        assert_eq!(input.provider_id, 9);
        assert_eq!(input.location_id, None);
        assert_eq!(input.repeat_type, RepeatType::Weekly4);
    }

    #[test]
    fn offline_slot_needs_location() {
        let form = AvailabilityForm {
            availability_type: Some(AvailabilityType::Offline),
            ..virtual_form()
        };
        assert!(form.validate().contains("locationId"));

        let form = AvailabilityForm {
            location_id: Some(4),
            ..form
        };
        assert_eq!(form.into_input(1).unwrap().location_id, Some(4));
    }

    #[test]
    fn time_rules() {
        let form = AvailabilityForm {
            start_time: "14:00".into(),
            end_time: "13:00".into(),
            ..virtual_form()
        };
        assert_eq!(
            form.validate().get("endTime"),
            Some("End time must be after start time")
        );

        let form = AvailabilityForm {
            start_time: "9am".into(),
            end_time: String::new(),
            ..virtual_form()
        };
        let errors = form.validate();
        assert_eq!(errors.get("startTime"), Some("Start time must be in HH:MM format"));
        assert_eq!(errors.get("endTime"), Some("End time is required"));
    }

    #[test]
    fn empty_form_reports_required_fields() {
        let errors = AvailabilityForm::default().validate();
        assert!(errors.contains("availabilityType"));
        assert!(errors.contains("dayOfWeek"));
        assert!(errors.contains("startTime"));
        assert!(!errors.contains("repeatType"));
    }

    #[test]
    fn wire_names() {
        let json = serde_json::json!({
            "id": 5,
            "providerId": 2,
            "availabilityType": "VIRTUAL",
            "dayOfWeek": "FRIDAY",
            "startTime": "08:00:00",
            "endTime": "10:00:00",
            "repeatType": "WEEKLY_8"
        });
        let slot: AvailabilitySlot = serde_json::from_value(json).unwrap();
        assert_eq!(slot.repeat_type, RepeatType::Weekly8);
        assert!(slot.is_active);

        let form = AvailabilityForm::from(&slot);
        assert_eq!(form.start_time, "08:00");
        assert_eq!(form.end_time, "10:00");
        assert!(form.validate().is_empty());
    }
}
