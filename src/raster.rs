//! Raster inspection: structural metadata and per-band statistics of a local file.
use crate::document::{BandStats, Driver, GeoTransform, RasterDocument, Size, Statistics};
use crate::error::InspectError;
use gdal::raster::StatisticsAll;
use gdal::{Dataset, DatasetOptions, GdalOpenFlags};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Statistics computed from cached values when the file carries them.
const APPROX_OK: bool = true;
/// Scan the band when no cached statistics exist.
const FORCE: bool = true;

/// Opened dataset that is released when it goes out of scope,
/// on the success path as well as on every early return.
struct OpenRaster {
    path: PathBuf,
    dataset: Dataset,
}

impl OpenRaster {
    /// Raster drivers only; a vector-only file is not opened.
    fn open(path: &Path) -> gdal::errors::Result<Self> {
        let options = DatasetOptions {
            open_flags: GdalOpenFlags::GDAL_OF_RASTER | GdalOpenFlags::GDAL_OF_READONLY,
            ..Default::default()
        };
        let dataset = Dataset::open_ex(path, options)?;
        debug!("Opened raster: {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            dataset,
        })
    }
}

impl Deref for OpenRaster {
    type Target = Dataset;

    fn deref(&self) -> &Dataset {
        &self.dataset
    }
}

impl Drop for OpenRaster {
    fn drop(&mut self) {
        debug!("Released raster: {}", self.path.display());
    }
}

/// Open `path` and describe it.
///
/// Returns `Ok(None)` when the file can not be opened as a raster (missing,
/// corrupt or unsupported format). Errors raised after the file was opened
/// are propagated.
pub fn inspect<P: AsRef<Path>>(path: P) -> Result<Option<RasterDocument>, InspectError> {
    let path = path.as_ref();
    let raster = match OpenRaster::open(path) {
        Ok(raster) => raster,
        Err(err) => {
            warn!("Failed to open file: {} ({})", path.display(), err);
            return Ok(None);
        }
    };
    let document = describe(&raster)?;
    drop(raster);
    Ok(Some(document))
}

fn describe(raster: &OpenRaster) -> Result<RasterDocument, InspectError> {
    let driver = raster.driver();
    let (x_size, y_size) = raster.raster_size();
    let band_count = raster.raster_count();

    // No transform on the dataset is reported by gdal as an error
    let geotransform = raster
        .geo_transform()
        .ok()
        .map(GeoTransform::from_coefficients);

    let bands = (1..=band_count)
        .map(|band_number| band_stats(raster, band_number))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RasterDocument {
        source_path: raster.path.display().to_string(),
        driver: Driver {
            short_name: driver.short_name(),
            long_name: driver.long_name(),
        },
        size: Size {
            x_size,
            y_size,
            band_count,
        },
        projection: raster.projection(),
        geotransform,
        bands,
    })
}

fn band_stats(raster: &OpenRaster, band_number: usize) -> Result<BandStats, InspectError> {
    let band = raster.rasterband(band_number)?;
    // gdal reports a band without valid pixels either as a warning (no
    // statistics) or as a failure, depending on the driver and version
    let StatisticsAll {
        min,
        max,
        mean,
        std_dev,
    } = match band.get_statistics(FORCE, APPROX_OK) {
        Ok(Some(statistics)) => statistics,
        Ok(None) => {
            return Err(InspectError::MissingStatistics {
                band_number,
                source: None,
            })
        }
        Err(err) => {
            return Err(InspectError::MissingStatistics {
                band_number,
                source: Some(err),
            })
        }
    };

    Ok(BandStats {
        band_number,
        data_type: band.band_type().name(),
        statistics: Statistics {
            min,
            max,
            mean,
            std_dev,
        },
    })
}
