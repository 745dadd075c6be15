//! Service settings
//!
//! Layered configuration in the usual order: YAML file, then `YUCCA_*`
//! environment overrides. Recognized keys:
//!
//! | Key                                  | Default    |
//! |--------------------------------------|------------|
//! | service.port                         | 50101      |
//! | service.admin.port                   | 50102      |
//! | document.store.dataStoreType         | embedded   |
//! | document.store.maxPoolSize           | 16         |
//! | document.store.mongo.*               | (unset)    |
//! | publish.change.events                | false      |
//!
//! `service.port` is consumed by the config transport shell deployed next
//! to this binary; the binary itself only serves the admin surface.

use config::Config;
use serde::Deserialize;

pub const DEFAULT_SERVICE_PORT: u16 = 50101;
pub const DEFAULT_ADMIN_PORT: u16 = 50102;
pub const DEFAULT_DATA_STORE_TYPE: &str = "embedded";
pub const DEFAULT_MAX_POOL_SIZE: i64 = 16;

/// Connection settings of an external Mongo-backed document store.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct MongoSettings {
    pub database: String,
    pub user: String,
    pub password: String,
    pub endpoints: Vec<MongoEndpoint>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct MongoEndpoint {
    pub host: String,
    pub port: u16,
}

/// Loaded application settings with typed accessors.
#[derive(Clone, Debug, Default)]
pub struct Settings {
    config: Config,
}

impl Settings {
    /// Load from an optional YAML file plus `YUCCA_*` env overrides.
    ///
    /// A missing file is only an error when the caller named it
    /// explicitly.
    pub fn load(config_file: Option<&str>) -> anyhow::Result<Self> {
        let mut builder = Config::builder();

        let (path, required) = match config_file {
            Some(path) => (path, true),
            None => ("conf/application.yml", false),
        };
        builder = builder.add_source(
            config::File::new(path, config::FileFormat::Yaml).required(required),
        );

        for (key, value) in collect_env_overrides("YUCCA") {
            builder = builder.set_override(key, value)?;
        }

        let settings = Self {
            config: builder.build()?,
        };
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> anyhow::Result<()> {
        let max_pool_size = self.max_pool_size();
        if max_pool_size <= 0 {
            anyhow::bail!("document.store.maxPoolSize must be positive, got {max_pool_size}");
        }
        Ok(())
    }

    pub fn service_port(&self) -> u16 {
        self.config
            .get_int("service.port")
            .map(|port| port as u16)
            .unwrap_or(DEFAULT_SERVICE_PORT)
    }

    pub fn admin_port(&self) -> u16 {
        self.config
            .get_int("service.admin.port")
            .map(|port| port as u16)
            .unwrap_or(DEFAULT_ADMIN_PORT)
    }

    pub fn data_store_type(&self) -> String {
        self.config
            .get_string("document.store.dataStoreType")
            .unwrap_or_else(|_| DEFAULT_DATA_STORE_TYPE.to_string())
    }

    pub fn max_pool_size(&self) -> i64 {
        self.config
            .get_int("document.store.maxPoolSize")
            .unwrap_or(DEFAULT_MAX_POOL_SIZE)
    }

    pub fn mongo(&self) -> MongoSettings {
        self.config
            .get::<MongoSettings>("document.store.mongo")
            .unwrap_or_default()
    }

    pub fn publish_change_events(&self) -> bool {
        self.config
            .get_bool("publish.change.events")
            .unwrap_or(false)
    }
}

/// Map `YUCCA_SERVICE_ADMIN_PORT=9000` to `service.admin.port = 9000`,
/// coercing bool/int/float values. Sorted for deterministic override
/// order.
fn collect_env_overrides(prefix: &str) -> Vec<(String, config::Value)> {
    let prefix_with_sep = format!("{prefix}_");
    let mut overrides: Vec<(String, config::Value)> = std::env::vars()
        .filter_map(|(key, value)| {
            let rest = key.strip_prefix(&prefix_with_sep)?;
            let config_key = rest.to_lowercase().replace('_', ".");
            Some((config_key, try_parse_env_value(&value)))
        })
        .collect();
    overrides.sort_by(|a, b| a.0.cmp(&b.0));
    overrides
}

fn try_parse_env_value(s: &str) -> config::Value {
    if s.eq_ignore_ascii_case("true") {
        return true.into();
    }
    if s.eq_ignore_ascii_case("false") {
        return false.into();
    }
    if let Ok(i) = s.parse::<i64>() {
        return i.into();
    }
    if let Ok(f) = s.parse::<f64>() {
        return f.into();
    }
    s.into()
}
