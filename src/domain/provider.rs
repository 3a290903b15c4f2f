use serde::{Deserialize, Serialize};

use crate::domain::address::Address;
use crate::domain::forms::{check_email, check_password, check_phone, check_required, FieldErrors};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub specialty: Option<String>,
    #[serde(default)]
    pub npi_number: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(flatten)]
    pub address: Address,
}

impl Provider {
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        match self.specialty.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(specialty) => format!("Dr. {} - {specialty}", name.trim()),
            None => format!("Dr. {}", name.trim()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderOnboard {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing)]
    pub confirm_password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub npi_number: Option<String>,
    #[serde(flatten)]
    pub address: Address,
}

impl ProviderOnboard {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        check_required(&mut errors, "firstName", "First name", &self.first_name);
        check_required(&mut errors, "lastName", "Last name", &self.last_name);
        check_email(&mut errors, &self.email);
        check_password(&mut errors, &self.password, &self.confirm_password);
        check_phone(&mut errors, "phoneNumber", self.phone_number.as_deref());
        if let Some(npi) = self.npi_number.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            if npi.len() != 10 || !npi.chars().all(|c| c.is_ascii_digit()) {
                errors.add("npiNumber", "NPI number must be 10 digits");
            }
        }
        errors
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
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

impl ProviderUpdate {
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

/// Kept under `onboardedProvider` between registration and the welcome screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardedProvider {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub specialty: Option<String>,
}

impl From<&Provider> for OnboardedProvider {
    fn from(p: &Provider) -> Self {
        Self {
            id: p.id,
            name: format!("{} {}", p.first_name.trim(), p.last_name.trim()),
            email: p.email.clone(),
            specialty: p.specialty.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_with_specialty() {
        let p: Provider = serde_json::from_value(serde_json::json!({
            "id": 2,
            "firstName": "Lena",
            "lastName": "Park",
            "email": "lena@clinic.org",
            "specialty": "Cardiology"
        }))
        .unwrap();
        assert_eq!(p.display_name(), "Dr. Lena Park - Cardiology");
        assert_eq!(OnboardedProvider::from(&p).name, "Lena Park");
    }

    #[test]
    fn npi_must_be_ten_digits() {
        let form = ProviderOnboard {
            first_name: "Lena".into(),
            last_name: "Park".into(),
            email: "lena@clinic.org".into(),
            password: "correct horse".into(),
            confirm_password: "correct horse".into(),
            npi_number: Some("12345".into()),
            ..Default::default()
        };
        assert_eq!(form.validate().get("npiNumber"), Some("NPI number must be 10 digits"));

        let form = ProviderOnboard {
            npi_number: Some("1234567890".into()),
            ..form
        };
        assert!(form.validate().is_empty());
    }
}
