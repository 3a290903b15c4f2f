use serde::{Deserialize, Serialize};

use crate::domain::address::Address;

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub provider_id: Option<i64>,
    #[serde(flatten)]
    pub address: Address,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub is_archived: bool,
}

impl Location {
    pub fn label(&self) -> String {
        let address = self.address.one_line();
        match self.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) if address.is_empty() => name.to_string(),
            Some(name) => format!("{name} ({address})"),
            None if address.is_empty() => format!("Location #{}", self.id),
            None => address,
        }
    }

    /// Archived or inactive locations are shown but cannot take new slots.
    pub fn is_selectable(&self) -> bool {
        self.is_active && !self.is_archived
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_flat_address() {
        let loc: Location = serde_json::from_value(serde_json::json!({
            "id": 3,
            "name": "Downtown Clinic",
            "addressLine1": "1 Elm St",
            "city": "Austin",
            "state": "TX",
            "zipCode": "73301",
            "isArchived": true
        }))
        .unwrap();
        assert_eq!(loc.label(), "Downtown Clinic (1 Elm St, Austin, TX, 73301)");
        assert!(loc.is_active);
        assert!(!loc.is_selectable());
    }

    #[test]
    fn label_without_name_or_address() {
        let loc: Location = serde_json::from_value(serde_json::json!({ "id": 8 })).unwrap();
        assert_eq!(loc.label(), "Location #8");
    }
}
