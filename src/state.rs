use std::sync::Arc;

use crate::browser::{Browser, BrowserRegistry};
use crate::infra::config::PortalConfig;
use crate::infra::http::{build_http_client, ApiClient};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<PortalConfig>,
    pub http: reqwest::Client,
    pub browsers: BrowserRegistry,
}

impl AppState {
    pub fn new(config: PortalConfig) -> anyhow::Result<Self> {
        let http = build_http_client(config.api_timeout)?;
        Ok(Self {
            config: Arc::new(config),
            http,
            browsers: BrowserRegistry::new(),
        })
    }

    /// API client acting for `browser`.
    pub fn api(&self, browser: &Browser) -> ApiClient {
        ApiClient::new(
            self.http.clone(),
            self.config.api_base_url.clone(),
            browser.session().clone(),
        )
    }
}
