use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use log::debug;
use serde_json::{Value, json};
use thiserror::Error;

/// Top-level `type` values accepted as GeoJSON.
pub const GEOJSON_TYPES: [&str; 9] = [
	"FeatureCollection",
	"Feature",
	"Point",
	"MultiPoint",
	"LineString",
	"MultiLineString",
	"Polygon",
	"MultiPolygon",
	"GeometryCollection",
];

/// Failures of [`read_geojson`] and [`parse_geojson`].
#[derive(Debug, Error)]
pub enum GeoJsonError {
	/// No file at the given path.
	#[error("File not found: {0}")]
	NotFound(String),

	/// The content is not valid JSON.
	#[error("Invalid JSON: {0}")]
	InvalidJson(#[from] serde_json::Error),

	/// The JSON is not a GeoJSON object.
	#[error("Invalid GeoJSON type: {0}")]
	InvalidType(String),

	/// The file exists but could not be read.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
}

/// Parse GeoJSON text and check its top-level `type`.
pub fn parse_geojson(text: &str) -> Result<Value, GeoJsonError> {
	let value: Value = serde_json::from_str(text)?;
	match value.get("type").and_then(Value::as_str) {
		Some(kind) if GEOJSON_TYPES.contains(&kind) => Ok(value),
		Some(kind) => Err(GeoJsonError::InvalidType(kind.to_string())),
		None => Err(GeoJsonError::InvalidType("missing \"type\"".into())),
	}
}

/// Read a GeoJSON file, returning it wrapped as
/// `{"status": "success", "file_path": .., "data": ..}`.
pub fn read_geojson(path: impl AsRef<Path>) -> Result<Value, GeoJsonError> {
	let path = path.as_ref();
	let text = fs::read_to_string(path).map_err(|e| match e.kind() {
		ErrorKind::NotFound => GeoJsonError::NotFound(path.display().to_string()),
		_ => GeoJsonError::Io(e),
	})?;
	let data = parse_geojson(&text)?;
	debug!("Read GeoJSON {} from {}", data["type"], path.display());
	Ok(json!({
		"status": "success",
		"file_path": path.display().to_string(),
		"data": data,
	}))
}
