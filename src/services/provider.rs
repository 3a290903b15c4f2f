use serde::Deserialize;

use crate::domain::provider::{ProviderOnboard, ProviderUpdate};
use crate::domain::Provider;
use crate::infra::envelope::Page;
use crate::infra::http::{ApiClient, Call};
use crate::services::PageQuery;
use crate::ApiError;

const RESOURCE: &str = "Provider";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OnboardedProviderResponse {
    pub provider: Provider,
}

pub async fn onboard(
    api: &ApiClient,
    form: &ProviderOnboard,
) -> Result<OnboardedProviderResponse, ApiError> {
    let call = Call::post("/providers/onboard")
        .json(form)?
        .describe(RESOURCE, "register provider");
    api.send(call).await?.data()
}

pub async fn me(api: &ApiClient) -> Result<Provider, ApiError> {
    let call = Call::get("/providers/me").describe(RESOURCE, "fetch your profile");
    api.send(call).await?.data()
}

pub async fn update_me(api: &ApiClient, update: &ProviderUpdate) -> Result<Provider, ApiError> {
    let call = Call::patch("/providers/me")
        .json(update)?
        .describe(RESOURCE, "update your profile");
    api.send(call).await?.data()
}

pub async fn list(api: &ApiClient, query: PageQuery) -> Result<Page<Provider>, ApiError> {
    let call = Call::get("/providers")
        .query_opt("page", query.page)
        .query_opt("limit", query.limit)
        .describe(RESOURCE, "fetch providers");
    api.send(call).await?.list()
}

pub async fn get(api: &ApiClient, id: i64) -> Result<Provider, ApiError> {
    let call = Call::get(format!("/providers/{id}")).describe(RESOURCE, "fetch provider");
    api.send(call).await?.data()
}

pub async fn delete(api: &ApiClient, id: i64) -> Result<(), ApiError> {
    let call = Call::delete(format!("/providers/{id}")).describe(RESOURCE, "delete provider");
    api.send(call).await.map(|_| ())
}
