//! Field-level form checks shared by the login, registration and profile
//! screens.

use std::collections::BTreeMap;

use serde::Serialize;

pub const MIN_PASSWORD_LEN: usize = 8;
const MAX_EMAIL_LEN: usize = 255;

/// First error per field, keyed by the camelCase field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
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

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

pub fn check_required(errors: &mut FieldErrors, field: &str, label: &str, value: &str) -> bool {
    if value.trim().is_empty() {
        errors.add(field, format!("{label} is required"));
        return false;
    }
    true
}

pub fn check_email(errors: &mut FieldErrors, value: &str) {
    if !check_required(errors, "email", "Email", value) {
        return;
    }
    let value = value.trim();
    let valid = value.len() <= MAX_EMAIL_LEN
        && value
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid {
        errors.add("email", "Enter a valid email address");
    }
}

pub fn check_password(errors: &mut FieldErrors, password: &str, confirmation: &str) {
    if password.is_empty() {
        errors.add("password", "Password is required");
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.add(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        );
    }
    if confirmation != password {
        errors.add("confirmPassword", "Passwords must match");
    }
}

/// Optional phone: digits with the usual separators, 7 to 15 digits.
pub fn check_phone(errors: &mut FieldErrors, field: &str, value: Option<&str>) {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return;
    };
    let allowed = value
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')' | '+' | '.'));
    let digits = value.chars().filter(char::is_ascii_digit).count();
    if !allowed || !(7..=15).contains(&digits) {
        errors.add(field, "Enter a valid phone number");
    }
}
