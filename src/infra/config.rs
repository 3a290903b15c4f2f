use std::net::SocketAddr;
use std::time::Duration;

use cookie::SameSite;
use tracing::warn;

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_COOKIE_NAME: &str = "portal_sid";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_BROWSER_IDLE_SECS: u64 = 24 * 60 * 60;

#[derive(Clone, Debug)]
pub struct PortalConfig {
    pub api_base_url: String,
    pub listen_addr: SocketAddr,
    pub session_cookie_name: String,
    pub secure_cookies: bool,
    pub same_site: SameSite,
    pub api_timeout: Duration,
    pub browser_idle: Duration,
}

impl PortalConfig {
    /// Defaults for everything except the API location.
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            session_cookie_name: DEFAULT_COOKIE_NAME.into(),
            secure_cookies: true,
            same_site: SameSite::Lax,
            api_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            browser_idle: Duration::from_secs(DEFAULT_BROWSER_IDLE_SECS),
        }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let api_base_url = first_env(&[
            "PORTAL_API_BASE_URL",
            "API_BASE_URL",
            "VITE_API_BASE_URL",
            "REACT_APP_API_BASE_URL",
        ])
        .ok_or_else(|| {
            anyhow::anyhow!("API base URL missing (set PORTAL_API_BASE_URL or API_BASE_URL)")
        })?;
        let mut cfg = Self::new(api_base_url);

        let listen = env_string("PORTAL_LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.into());
        cfg.listen_addr = listen
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid PORTAL_LISTEN_ADDR {listen:?}: {e}"))?;

        if let Some(name) = env_string("SESSION_COOKIE_NAME") {
            cfg.session_cookie_name = name;
        }
        cfg.secure_cookies = env_bool("COOKIE_SECURE").unwrap_or(true);
        cfg.same_site = env_same_site().unwrap_or(SameSite::Lax);
        if cfg.same_site == SameSite::None && !cfg.secure_cookies {
            warn!("SameSite=None requires secure cookies; forcing COOKIE_SECURE=true");
            cfg.secure_cookies = true;
        }

        if let Some(secs) = env_u64("API_TIMEOUT_SECS") {
            cfg.api_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = env_u64("BROWSER_IDLE_SECS") {
            cfg.browser_idle = Duration::from_secs(secs);
        }

        Ok(cfg)
    }
}

fn first_env(keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| env_string(key))
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_u64(key: &str) -> Option<u64> {
    let raw = env_string(key)?;
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("{key}={raw:?} is not a number; using the default");
            None
        }
    }
}

fn env_bool(key: &str) -> Option<bool> {
    env_string(key).and_then(|v| parse_bool(&v))
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn env_same_site() -> Option<SameSite> {
    env_string("COOKIE_SAMESITE").and_then(|v| parse_same_site(&v))
}

fn parse_same_site(raw: &str) -> Option<SameSite> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "none" => Some(SameSite::None),
        "lax" => Some(SameSite::Lax),
        "strict" => Some(SameSite::Strict),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_loses_trailing_slash() {
        let cfg = PortalConfig::new("http://api.local/v1/");
        assert_eq!(cfg.api_base_url, "http://api.local/v1");
        assert_eq!(cfg.session_cookie_name, "portal_sid");
    }

    #[test]
    fn bool_and_same_site_parsing() {
        assert_eq!(parse_bool("Yes"), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
        assert_eq!(parse_same_site("STRICT"), Some(SameSite::Strict));
        assert_eq!(parse_same_site("bogus"), None);
    }
}
