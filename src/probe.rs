use crate::document::RasterDocument;
use crate::fetch::RemoteFetcher;
use crate::raster;
use crate::s3::ObjectStore;
use anyhow::Result;
use tempfile::Builder;
use tracing::info;

const SCRATCH_PREFIX: &str = "raster-probe-";
const SCRATCH_FILE: &str = "object";

/// Fetch `bucket/key` into a scratch file and inspect it.
///
/// The scratch directory, including any sidecar files gdal writes next to
/// the raster, is removed when this returns, whatever the outcome.
/// `Ok(None)` means the object could not be fetched or opened as a raster.
pub async fn probe<S: ObjectStore>(
    fetcher: &RemoteFetcher<S>,
    bucket: &str,
    key: &str,
) -> Result<Option<RasterDocument>> {
    let scratch_dir = Builder::new().prefix(SCRATCH_PREFIX).tempdir()?;
    let scratch = scratch_dir.path().join(SCRATCH_FILE);

    if !fetcher.fetch(bucket, key, &scratch).await? {
        return Ok(None);
    }

    let document = raster::inspect(&scratch)?;
    if let Some(document) = &document {
        info!(
            "Inspected {}/{}: {} band(s), {}x{}",
            bucket, key, document.size.band_count, document.size.x_size, document.size.y_size
        );
    }
    Ok(document)
}
