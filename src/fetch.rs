use crate::config::StoreConfig;
use crate::s3::{ObjectStore, S3Store};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info, warn};

/// Copies one remote object to a local path.
///
/// A failure reported by the store is logged and turned into `Ok(false)`;
/// the caller decides whether to carry on. Failures writing the local file
/// are returned as errors. There is exactly one attempt per call and a
/// partially written destination is left for the caller to clean up.
pub struct RemoteFetcher<S: ObjectStore> {
    store: S,
}

impl RemoteFetcher<S3Store> {
    pub async fn from_config(config: &StoreConfig) -> Self {
        Self::new(S3Store::from_config(config).await)
    }
}

impl<S: ObjectStore> RemoteFetcher<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn fetch(self: &Self, bucket: &str, key: &str, destination: &Path) -> Result<bool> {
        debug!("Fetching {}/{} into {}", bucket, key, destination.display());

        let mut body = match self.store.get_object(bucket, key).await {
            Ok(body) => body,
            Err(err) => {
                warn!("Failed to download file: {}", err);
                return Ok(false);
            }
        };

        let mut file = File::create(destination)
            .with_context(|| format!("Unable to create {}", destination.display()))?;

        let mut byte_count = 0_u64;
        loop {
            let bytes = match body.try_next().await {
                Ok(Some(bytes)) => bytes,
                Ok(None) => break,
                Err(err) => {
                    warn!("Failed to download file: {}", err);
                    return Ok(false);
                }
            };
            file.write_all(&bytes)
                .with_context(|| format!("Unable to write {}", destination.display()))?;
            byte_count += bytes.len() as u64;
        }
        file.flush()?;

        info!(
            "File downloaded successfully: {} ({} bytes)",
            destination.display(),
            byte_count
        );
        Ok(true)
    }
}
