//! Metadata and statistics document produced for one raster.
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::path::Path;

const JSON_INDENT: &[u8] = b"    ";

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct RasterDocument {
    #[serde(alias = "raster_file")]
    pub source_path: String,
    pub driver: Driver,
    pub size: Size,
    pub projection: String,
    /// Only present when the raster exposes an affine transform.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geotransform: Option<GeoTransform>,
    pub bands: Vec<BandStats>,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Driver {
    pub short_name: String,
    pub long_name: String,
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Size {
    pub x_size: usize,
    pub y_size: usize,
    pub band_count: usize,
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq)]
pub struct GeoTransform {
    pub origin: Point,
    pub pixel_size: Point,
}

impl GeoTransform {
    /// Axis-aligned reading of a six coefficient affine transform.
    ///
    /// Coefficients 2 and 4 (row and column rotation) are not kept, so a
    /// rotated raster is reported as if it were north-up.
    pub fn from_coefficients(coefficients: [f64; 6]) -> Self {
        Self {
            origin: Point {
                x: coefficients[0],
                y: coefficients[3],
            },
            pixel_size: Point {
                x: coefficients[1],
                y: coefficients[5],
            },
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct BandStats {
    pub band_number: usize,
    pub data_type: String,
    pub statistics: Statistics,
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq)]
pub struct Statistics {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl RasterDocument {
    pub fn to_json(self: &Self) -> Result<String> {
        let mut buf = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(JSON_INDENT));
        self.serialize(&mut serializer)?;
        Ok(String::from_utf8(buf)?)
    }

    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let document: Self = serde_json::from_str(&content)?;
        Ok(document)
    }

    pub fn write<P: AsRef<Path>>(self: &Self, path: P) -> Result<()> {
        let content = self.to_json()?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn mock_document(geotransform: Option<GeoTransform>) -> RasterDocument {
        RasterDocument {
            source_path: "/tmp/SEN_soc.tif".to_string(),
            driver: Driver {
                short_name: "GTiff".to_string(),
                long_name: "GeoTIFF".to_string(),
            },
            size: Size {
                x_size: 10,
                y_size: 5,
                band_count: 1,
            },
            projection: String::new(),
            geotransform,
            bands: vec![BandStats {
                band_number: 1,
                data_type: "Byte".to_string(),
                statistics: Statistics {
                    min: 0.0,
                    max: 99.0,
                    mean: 49.5,
                    std_dev: 28.5,
                },
            }],
        }
    }

    #[test]
    fn test_geotransform_keeps_origin_and_pixel_size() {
        let transform = GeoTransform::from_coefficients([100.0, 1.0, 0.0, 200.0, 0.0, -1.0]);
        assert_eq!(transform.origin, Point { x: 100.0, y: 200.0 });
        assert_eq!(transform.pixel_size, Point { x: 1.0, y: -1.0 });
    }

    #[test]
    fn test_geotransform_drops_rotation() {
        let rotated = GeoTransform::from_coefficients([10.0, 2.0, 0.5, 20.0, 0.25, -2.0]);
        let north_up = GeoTransform::from_coefficients([10.0, 2.0, 0.0, 20.0, 0.0, -2.0]);
        assert_eq!(rotated, north_up);
    }

    #[test]
    fn test_json_field_names() {
        let transform = GeoTransform::from_coefficients([100.0, 1.0, 0.0, 200.0, 0.0, -1.0]);
        let value: Value = serde_json::from_str(&mock_document(Some(transform)).to_json().unwrap())
            .unwrap();
        assert_eq!(
            value,
            json!({
                "source_path": "/tmp/SEN_soc.tif",
                "driver": {"short_name": "GTiff", "long_name": "GeoTIFF"},
                "size": {"x_size": 10, "y_size": 5, "band_count": 1},
                "projection": "",
                "geotransform": {
                    "origin": {"x": 100.0, "y": 200.0},
                    "pixel_size": {"x": 1.0, "y": -1.0}
                },
                "bands": [{
                    "band_number": 1,
                    "data_type": "Byte",
                    "statistics": {"min": 0.0, "max": 99.0, "mean": 49.5, "std_dev": 28.5}
                }]
            })
        );
    }

    #[test]
    fn test_absent_geotransform_is_omitted() {
        let content = mock_document(None).to_json().unwrap();
        let value: Value = serde_json::from_str(&content).unwrap();
        assert!(value.get("geotransform").is_none());
    }

    #[test]
    fn test_json_is_indented() {
        let content = mock_document(None).to_json().unwrap();
        assert!(content.contains("\n    \"driver\": {\n        \"short_name\""));
    }

    #[test]
    fn test_write_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("document.json");
        let document = mock_document(None);
        document.write(&path).unwrap();

        let read = RasterDocument::read(&path).unwrap();
        assert_eq!(read, document);
    }

    #[test]
    fn test_read_accepts_raster_file_name() {
        let content = r#"{
            "raster_file": "a.tif",
            "driver": {"short_name": "GTiff", "long_name": "GeoTIFF"},
            "size": {"x_size": 1, "y_size": 1, "band_count": 0},
            "projection": "",
            "bands": []
        }"#;
        let document: RasterDocument = serde_json::from_str(content).unwrap();
        assert_eq!(document.source_path, "a.tif");
        assert_eq!(document.geotransform, None);
    }
}
