use std::path::Path;

use config_loader::{ConfigType, get_configuration};
use models::{ApplicationConfig, BackendConfig, SessionConfig, ThemeConfig};

/// Reads `configuration/{APP_ENV}/portal.yaml`, overridden by
/// `PORTAL_<SECTION>__<KEY>` environment variables.
#[derive(serde::Deserialize, Clone, Debug, ConfigType)]
#[config(name = "portal", env_prefix = "PORTAL")]
pub struct PortalSettings {
    pub application: ApplicationConfig,
    pub backend: BackendConfig,
    pub session: SessionConfig,
    #[serde(default)]
    pub theme: ThemeConfig,
}

impl PortalSettings {
    pub fn get_configuration() -> Result<PortalSettings, config::ConfigError> {
        let base = Path::new("./configuration");
        get_configuration::<PortalSettings>(base)
    }
}
