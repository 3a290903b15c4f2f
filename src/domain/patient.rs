use serde::{Deserialize, Serialize};

use crate::domain::address::Address;
use crate::domain::forms::{check_email, check_password, check_phone, check_required, FieldErrors};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(flatten)]
    pub address: Address,
    /// Assigned provider, if any. Not an ownership link.
    #[serde(default)]
    pub provider_id: Option<i64>,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    /// Case-insensitive match on name, email or phone for the list filter.
    pub fn matches(&self, search: &str) -> bool {
        let needle = search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.full_name().to_lowercase().contains(&needle)
            || self.email.to_lowercase().contains(&needle)
            || self
                .phone_number
                .as_deref()
                .is_some_and(|p| p.contains(&needle))
    }
}

/// Registration form, sent to `POST /patients/onboard` minus the confirmation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatientOnboard {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing)]
    pub confirm_password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(flatten)]
    pub address: Address,
}

impl PatientOnboard {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        check_required(&mut errors, "firstName", "First name", &self.first_name);
        check_required(&mut errors, "lastName", "Last name", &self.last_name);
        check_email(&mut errors, &self.email);
        check_password(&mut errors, &self.password, &self.confirm_password);
        check_phone(&mut errors, "phoneNumber", self.phone_number.as_deref());
        errors
    }
}

/// Body of `PATCH /patients/me`; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatientUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
}

impl PatientUpdate {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        if let Some(first) = &self.first_name {
            check_required(&mut errors, "firstName", "First name", first);
        }
        if let Some(last) = &self.last_name {
            check_required(&mut errors, "lastName", "Last name", last);
        }
        if let Some(email) = &self.email {
            check_email(&mut errors, email);
        }
        check_phone(&mut errors, "phoneNumber", self.phone_number.as_deref());
        errors
    }
}

/// What the welcome screen shows after registration, kept under
/// `onboardedPatient`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardedPatient {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
}

impl From<&Patient> for OnboardedPatient {
    fn from(p: &Patient) -> Self {
        Self {
            id: p.id,
            name: p.full_name(),
            email: p.email.clone(),
            phone_number: p.phone_number.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient() -> Patient {
        Patient {
            id: 4,
            first_name: "Maya".into(),
            last_name: "Ortiz".into(),
            email: "maya@example.com".into(),
            phone_number: Some("555-0100".into()),
            date_of_birth: None,
            gender: None,
            address: Address::default(),
            provider_id: Some(2),
        }
    }

    #[test]
    fn search_matches_name_email_phone() {
        let p = patient();
        assert!(p.matches("ortiz"));
        assert!(p.matches("MAYA@"));
        assert!(p.matches("0100"));
        assert!(p.matches("  "));
        assert!(!p.matches("smith"));
    }

    #[test]
    fn onboard_payload_drops_confirmation() {
        let form = PatientOnboard {
            first_name: "Maya".into(),
            last_name: "Ortiz".into(),
            email: "maya@example.com".into(),
            password: "longenough".into(),
            confirm_password: "longenough".into(),
            ..Default::default()
        };
        assert!(form.validate().is_empty());
        let body = serde_json::to_value(&form).unwrap();
        assert!(body.get("confirmPassword").is_none());
        assert!(body.get("phoneNumber").is_none());
        assert_eq!(body["firstName"], "Maya");
    }

    #[test]
    fn onboarded_summary() {
        let summary = OnboardedPatient::from(&patient());
        assert_eq!(summary.name, "Maya Ortiz");
        assert_eq!(summary.id, 4);
    }

    #[test]
    fn update_only_checks_present_fields() {
        assert!(PatientUpdate::default().validate().is_empty());
        let update = PatientUpdate {
            email: Some("nope".into()),
            ..Default::default()
        };
        assert!(update.validate().contains("email"));
    }
}
