use crate::domain::Location;
use crate::infra::http::{ApiClient, Call};
use crate::ApiError;

pub async fn list(api: &ApiClient, provider_id: Option<i64>) -> Result<Vec<Location>, ApiError> {
    let call = Call::get("/locations")
        .query_opt("providerId", provider_id)
        .describe("Location", "fetch locations");
    Ok(api.send(call).await?.list()?.items)
}
