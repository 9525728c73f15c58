use crate::Theme;

#[derive(serde::Deserialize, Clone, Debug, PartialEq)]
pub struct ApplicationConfig {
    pub host: String,
    pub port: u16,
}

impl ApplicationConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(serde::Deserialize, Clone, Debug, PartialEq)]
pub struct BackendConfig {
    pub base_url: String,
    /// Unset means requests wait for the backend indefinitely.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

#[derive(serde::Deserialize, Clone, Copy, Debug, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionStoreKind {
    #[default]
    Cookie,
    Redis,
}

#[derive(serde::Deserialize, Clone, Debug, PartialEq)]
pub struct SessionConfig {
    #[serde(default)]
    pub store: SessionStoreKind,
    #[serde(default)]
    pub redis_url: Option<String>,
    /// Base64 encoded key of at least 64 bytes. A random key is generated
    /// when unset, which signs everybody out on restart.
    #[serde(default)]
    pub secret_key: Option<String>,
    #[serde(default = "default_ttl_minutes")]
    pub ttl_minutes: i64,
    #[serde(default = "default_cookie_secure")]
    pub cookie_secure: bool,
}

fn default_ttl_minutes() -> i64 {
    60 * 12
}

fn default_cookie_secure() -> bool {
    true
}

#[derive(serde::Deserialize, Clone, Debug, PartialEq, Default)]
pub struct ThemeConfig {
    #[serde(default)]
    pub default: Theme,
}
