//! The API wraps every payload as `{ success, data, meta?, message? }`.
//! Decoding happens once here; callers get typed values or `ApiError::Shape`.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::ApiError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            meta: PageMeta::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub meta: Option<PageMeta>,
    #[serde(default)]
    pub message: Option<String>,
}

fn default_success() -> bool {
    true
}

impl Envelope {
    /// Body of a response that carried no content (e.g. 204 on delete).
    pub fn empty() -> Self {
        Self {
            success: true,
            data: None,
            meta: None,
            message: None,
        }
    }

    pub fn parse(bytes: &[u8]) -> Result<Self, ApiError> {
        serde_json::from_slice(bytes)
            .map_err(|e| ApiError::Shape(format!("Unexpected response from server: {e}")))
    }

    /// Single record payload; a missing `data` is a shape error.
    pub fn data<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        let Some(data) = self.data else {
            return Err(ApiError::Shape("Unexpected response from server: missing data".into()));
        };
        decode(data)
    }

    /// List payload. Absent or null `data` means an empty list.
    pub fn list<T: DeserializeOwned>(self) -> Result<Page<T>, ApiError> {
        let meta = self.meta.unwrap_or_default();
        let items = match self.data {
            None => Vec::new(),
            Some(data) => decode(data)?,
        };
        Ok(Page { items, meta })
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value)
        .map_err(|e| ApiError::Shape(format!("Unexpected response from server: {e}")))
}
