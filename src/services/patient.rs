use serde::Deserialize;

use crate::domain::patient::{PatientOnboard, PatientUpdate};
use crate::domain::Patient;
use crate::infra::envelope::Page;
use crate::infra::http::{ApiClient, Call};
use crate::services::PageQuery;
use crate::ApiError;

const RESOURCE: &str = "Patient";

/// `data` of a successful `POST /patients/onboard`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OnboardedPatientResponse {
    pub patient: Patient,
}

pub async fn onboard(
    api: &ApiClient,
    form: &PatientOnboard,
) -> Result<OnboardedPatientResponse, ApiError> {
    let call = Call::post("/patients/onboard")
        .json(form)?
        .describe(RESOURCE, "register patient");
    api.send(call).await?.data()
}

pub async fn me(api: &ApiClient) -> Result<Patient, ApiError> {
    let call = Call::get("/patients/me").describe(RESOURCE, "fetch your profile");
    api.send(call).await?.data()
}

pub async fn update_me(api: &ApiClient, update: &PatientUpdate) -> Result<Patient, ApiError> {
    let call = Call::patch("/patients/me")
        .json(update)?
        .describe(RESOURCE, "update your profile");
    api.send(call).await?.data()
}

pub async fn list(api: &ApiClient, query: PageQuery) -> Result<Page<Patient>, ApiError> {
    let call = Call::get("/patients")
        .query_opt("page", query.page)
        .query_opt("limit", query.limit)
        .describe(RESOURCE, "fetch patients");
    api.send(call).await?.list()
}

pub async fn get(api: &ApiClient, id: i64) -> Result<Patient, ApiError> {
    let call = Call::get(format!("/patients/{id}")).describe(RESOURCE, "fetch patient");
    api.send(call).await?.data()
}

pub async fn delete(api: &ApiClient, id: i64) -> Result<(), ApiError> {
    let call = Call::delete(format!("/patients/{id}")).describe(RESOURCE, "delete patient");
    api.send(call).await.map(|_| ())
}
