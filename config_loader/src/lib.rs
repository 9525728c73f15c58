extern crate self as config_loader;

use std::{env, path::Path};

use config::ConfigError;

pub use config_loader_derive::ConfigType;

pub trait ConfigType {
    fn get_config_name() -> String;

    /// Prefix of the environment variables overriding the file, if any.
    fn env_prefix() -> Option<String> {
        None
    }
}

/// Loads `T` for the environment named by `APP_ENV` (defaults to `local`).
pub fn get_configuration<T: ConfigType + serde::de::DeserializeOwned>(
    base_path: &Path,
) -> Result<T, ConfigError> {
    let env = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
    get_configuration_for_env(base_path, &env)
}

/// Reads `{base_path}/{env}/{name}.yaml` when it exists, then applies
/// `{PREFIX}_{SECTION}__{KEY}` environment overrides.
pub fn get_configuration_for_env<T: ConfigType + serde::de::DeserializeOwned>(
    base_path: &Path,
    env: &str,
) -> Result<T, ConfigError> {
    let file = base_path
        .join(env)
        .join(format!("{}.yaml", T::get_config_name()));

    let mut builder = config::Config::builder().add_source(config::File::from(file).required(false));

    if let Some(prefix) = T::env_prefix() {
        builder = builder.add_source(
            config::Environment::with_prefix(&prefix)
                .prefix_separator("_")
                .separator("__"),
        );
    }

    builder.build()?.try_deserialize()
}

#[cfg(test)]
mod test {
    use std::{fs, io::Write, path::PathBuf};

    use super::*;

    #[derive(serde::Deserialize, PartialEq, Debug, ConfigType)]
    struct Listener {
        host: String,
        port: u16,
    }

    #[derive(serde::Deserialize, PartialEq, Debug, ConfigType)]
    #[config(name = "site", env_prefix = "CONFIG_LOADER_TEST")]
    struct SiteSettings {
        listener: Listener,
        banner: Option<String>,
    }

    fn scratch_dir() -> PathBuf {
        let dir = env::temp_dir().join(format!("config_loader-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(dir.join("local")).unwrap();
        dir
    }

    #[test]
    fn derived_names() {
        assert_eq!(Listener::get_config_name(), "listener");
        assert_eq!(Listener::env_prefix(), None);
        assert_eq!(SiteSettings::get_config_name(), "site");
        assert_eq!(
            SiteSettings::env_prefix().as_deref(),
            Some("CONFIG_LOADER_TEST")
        );
    }

    #[test]
    fn reads_file_for_environment() {
        let base = scratch_dir();
        let mut file = fs::File::create(base.join("local").join("site.yaml")).unwrap();
        file.write_all(
            b"
            listener:
                host: 127.0.0.1
                port: 8080
            banner: welcome
            ",
        )
        .unwrap();

        let settings = get_configuration_for_env::<SiteSettings>(&base, "local");
        fs::remove_dir_all(&base).unwrap();

        assert_eq!(
            settings.unwrap(),
            SiteSettings {
                listener: Listener {
                    host: "127.0.0.1".to_string(),
                    port: 8080,
                },
                banner: Some("welcome".to_string()),
            }
        );
    }

    #[test]
    fn missing_file_is_not_an_error_until_deserializing() {
        let base = scratch_dir();
        let settings = get_configuration_for_env::<SiteSettings>(&base, "production");
        fs::remove_dir_all(&base).unwrap();

        assert!(settings.is_err());
    }
}
