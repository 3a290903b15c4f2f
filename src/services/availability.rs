use crate::domain::{AvailabilityInput, AvailabilitySlot};
use crate::infra::http::{ApiClient, Call};
use crate::ApiError;

const RESOURCE: &str = "Availability";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AvailabilityQuery {
    pub provider_id: Option<i64>,
}

impl AvailabilityQuery {
    pub fn for_provider(provider_id: i64) -> Self {
        Self {
            provider_id: Some(provider_id),
        }
    }
}

pub async fn list(
    api: &ApiClient,
    query: AvailabilityQuery,
) -> Result<Vec<AvailabilitySlot>, ApiError> {
    let call = Call::get("/availability")
        .query_opt("providerId", query.provider_id)
        .describe(RESOURCE, "fetch availability");
    Ok(api.send(call).await?.list()?.items)
}

pub async fn get(api: &ApiClient, id: i64) -> Result<AvailabilitySlot, ApiError> {
    let call = Call::get(format!("/availability/{id}")).describe(RESOURCE, "fetch availability");
    api.send(call).await?.data()
}

pub async fn create(
    api: &ApiClient,
    input: &AvailabilityInput,
) -> Result<AvailabilitySlot, ApiError> {
    let call = Call::post("/availability")
        .json(input)?
        .describe(RESOURCE, "create availability");
    api.send(call).await?.data()
}

pub async fn update(
    api: &ApiClient,
    id: i64,
    input: &AvailabilityInput,
) -> Result<AvailabilitySlot, ApiError> {
    let call = Call::patch(format!("/availability/{id}"))
        .json(input)?
        .describe(RESOURCE, "update availability");
    api.send(call).await?.data()
}

pub async fn delete(api: &ApiClient, id: i64) -> Result<(), ApiError> {
    let call = Call::delete(format!("/availability/{id}")).describe(RESOURCE, "delete availability");
    api.send(call).await.map(|_| ())
}
