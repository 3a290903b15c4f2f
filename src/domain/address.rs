use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

impl Address {
    /// One-line rendering that skips empty parts.
    pub fn one_line(&self) -> String {
        let city_state = [self.city.as_deref(), self.state.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        [
            self.address_line1.as_deref(),
            self.address_line2.as_deref(),
            Some(city_state.as_str()),
            self.zip_code.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_line_skips_blanks() {
        let addr = Address {
            address_line1: Some("12 Main St".into()),
            address_line2: Some(" ".into()),
            city: Some("Springfield".into()),
            state: Some("IL".into()),
            zip_code: Some("62701".into()),
        };
        assert_eq!(addr.one_line(), "12 Main St, Springfield, IL, 62701");
        assert_eq!(Address::default().one_line(), "");
    }
}
