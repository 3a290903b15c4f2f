//! One function per API operation. Each performs exactly one HTTP call and
//! returns unwrapped data or a single `ApiError`.

pub mod auth;
pub mod availability;
pub mod location;
pub mod patient;
pub mod provider;

/// Paging parameters shared by the list endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}
