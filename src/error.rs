use thiserror::Error;

/// Failures reported by an object store while retrieving an object.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },
    #[error("Access denied to object: {bucket}/{key}")]
    AccessDenied { bucket: String, key: String },
    #[error("Object store rejected the request: {0}")]
    Service(String),
    #[error("Unable to reach object store: {0}")]
    Transport(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required option '{0}'")]
    Missing(&'static str),
    #[error("Unable to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unable to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Error, Debug)]
pub enum InspectError {
    #[error(transparent)]
    Gdal(#[from] gdal::errors::GdalError),
    #[error("No statistics available for band {band_number}")]
    MissingStatistics {
        band_number: usize,
        #[source]
        source: Option<gdal::errors::GdalError>,
    },
}
