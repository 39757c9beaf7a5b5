use crate::error::ConfigError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_OBJECT_KEY: &str = "SEN_soc.tif";

/// Options as they appear in a config file or on the command line.
/// Every field is optional so that layers can be merged before validation.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct ConfigFile {
    pub store_host: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub secure: Option<bool>,
    pub region: Option<String>,
    pub bucket_name: Option<String>,
    pub object_key: Option<String>,
}

/// Validated settings handed to the object store client and the fetcher.
#[derive(Clone, Debug, PartialEq)]
pub struct StoreConfig {
    pub store_host: String,
    pub access_key: String,
    pub secret_key: String,
    pub secure: bool,
    pub region: String,
    pub bucket_name: String,
    pub object_key: String,
}

impl ConfigFile {
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn write<P: AsRef<Path>>(self: &Self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn template() -> Self {
        let table = toml::toml! {
            store_host = "localhost:9000"
            access_key = "minioadmin"
            secret_key = "minioadmin"
            secure = false
            region = "us-east-1"
            bucket_name = "rasters"
            object_key = "SEN_soc.tif"
        };
        // The literal above always matches the struct fields
        toml::from_str(&table.to_string()).unwrap_or_default()
    }

    /// Layer `other` on top of `self`; values set in `other` win.
    pub fn merge(self, other: ConfigFile) -> Self {
        Self {
            store_host: other.store_host.or(self.store_host),
            access_key: other.access_key.or(self.access_key),
            secret_key: other.secret_key.or(self.secret_key),
            secure: other.secure.or(self.secure),
            region: other.region.or(self.region),
            bucket_name: other.bucket_name.or(self.bucket_name),
            object_key: other.object_key.or(self.object_key),
        }
    }

    pub fn validate(self) -> Result<StoreConfig, ConfigError> {
        Ok(StoreConfig {
            store_host: required(self.store_host, "store_host")?,
            access_key: required(self.access_key, "access_key")?,
            secret_key: required(self.secret_key, "secret_key")?,
            secure: self.secure.unwrap_or(false),
            region: self.region.unwrap_or_else(|| DEFAULT_REGION.to_string()),
            bucket_name: required(self.bucket_name, "bucket_name")?,
            object_key: self
                .object_key
                .unwrap_or_else(|| DEFAULT_OBJECT_KEY.to_string()),
        })
    }
}

fn required(value: Option<String>, name: &'static str) -> Result<String, ConfigError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(name))
}

impl StoreConfig {
    /// Endpoint url for the store. A host given with an explicit scheme is used as is.
    pub fn endpoint_url(self: &Self) -> String {
        if self.store_host.contains("://") {
            return self.store_host.clone();
        }
        let scheme = if self.secure { "https" } else { "http" };
        format!("{}://{}", scheme, self.store_host)
    }
}
