//! Spatial diagnostics over GeoJSON FeatureCollections.
//!
//! Unlike the mapping module, nothing here fails with an error: odd or
//! malformed input produces a [`SpatialReport`] whose `status` says what
//! happened.

use std::collections::BTreeSet;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

mod reader;
mod summary;

pub use reader::{GEOJSON_TYPES, GeoJsonError, parse_geojson, read_geojson};
pub use summary::{TextSummary, generate_text_summary};

/// A max/min population ratio above this is reported.
pub const DISPARITY_RATIO_THRESHOLD: f64 = 5.0;
/// A max/min population ratio above this is reported as high severity.
pub const HIGH_SEVERITY_RATIO: f64 = 10.0;

/// Outcome of a diagnostic call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
	/// The input was inspected (possibly with nothing to report).
	Success,
	/// The input could not be inspected at all.
	Error,
}

/// Kind of detected issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TensionKind {
	/// Feature populations differ by a large factor.
	PopulationDisparity,
	/// Features without usable properties.
	DataQuality,
}

/// How much attention a tension deserves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
	/// Worth a look.
	Low,
	/// Likely to skew analysis.
	Medium,
	/// Dominates the dataset.
	High,
}

impl TensionKind {
	/// Wire name of the kind.
	pub fn as_str(&self) -> &'static str {
		match self {
			TensionKind::PopulationDisparity => "population_disparity",
			TensionKind::DataQuality => "data_quality",
		}
	}
}

impl Severity {
	/// Wire name of the severity.
	pub fn as_str(&self) -> &'static str {
		match self {
			Severity::Low => "low",
			Severity::Medium => "medium",
			Severity::High => "high",
		}
	}
}

/// Supporting numbers of a tension.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TensionDetails {
	/// Extremes of the population values, kept as they appear in the
	/// input. `ratio` is infinite when the smallest population is not
	/// positive.
	Disparity {
		/// Largest population seen.
		max_population: Number,
		/// Smallest population seen.
		min_population: Number,
		/// `max_population / min_population`.
		ratio: f64,
	},
	/// Features lacking properties.
	Incomplete {
		/// How many features have no properties.
		incomplete_count: usize,
	},
}

/// A detected spatial or data-quality issue.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tension {
	/// Kind of issue.
	#[serde(rename = "type")]
	pub kind: TensionKind,
	/// Severity.
	pub severity: Severity,
	/// Human readable explanation.
	pub description: String,
	/// Supporting numbers.
	pub details: TensionDetails,
}

/// Result of [`analyze_spatial_distribution`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpatialReport {
	/// Whether the input could be inspected.
	pub status: ReportStatus,
	/// Short outcome message.
	pub message: String,
	/// Always `tensions.len()`.
	pub tensions_found: usize,
	/// Detected issues.
	pub tensions: Vec<Tension>,
	/// Number of features; only set when a FeatureCollection was analyzed.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub feature_count: Option<usize>,
	/// Sorted union of property keys; only set when a FeatureCollection
	/// was analyzed.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub analyzed_properties: Option<Vec<String>>,
}

impl SpatialReport {
	fn early(status: ReportStatus, message: &str) -> Self {
		Self {
			status,
			message: message.into(),
			tensions_found: 0,
			tensions: Vec::new(),
			feature_count: None,
			analyzed_properties: None,
		}
	}

	/// The report as a JSON value.
	pub fn to_value(&self) -> Value {
		serde_json::to_value(self).unwrap_or(Value::Null)
	}
}

fn properties(feature: &Value) -> Option<&Map<String, Value>> {
	feature.get("properties").and_then(Value::as_object)
}

fn population_tension(populations: &[(f64, &Number)]) -> Option<Tension> {
	if populations.len() < 2 {
		return None;
	}
	let &(max, max_population) = populations.iter().max_by(|a, b| a.0.total_cmp(&b.0))?;
	let &(min, min_population) = populations.iter().min_by(|a, b| a.0.total_cmp(&b.0))?;
	let ratio = if min > 0.0 { max / min } else { f64::INFINITY };
	if ratio <= DISPARITY_RATIO_THRESHOLD {
		return None;
	}
	Some(Tension {
		kind: TensionKind::PopulationDisparity,
		severity: if ratio > HIGH_SEVERITY_RATIO {
			Severity::High
		} else {
			Severity::Medium
		},
		description: format!("Significant population disparity detected (ratio: {ratio:.1}:1)"),
		details: TensionDetails::Disparity {
			max_population: max_population.clone(),
			min_population: min_population.clone(),
			ratio,
		},
	})
}

/// Look for population disparity and missing properties in a GeoJSON
/// FeatureCollection, optionally wrapped as `{"data": ...}` by
/// [`read_geojson`]. The input is never modified.
pub fn analyze_spatial_distribution(geojson: &Value) -> SpatialReport {
	let Some(root) = geojson.as_object() else {
		return SpatialReport::early(ReportStatus::Error, "Invalid input: expected dictionary");
	};
	let data = root.get("data").unwrap_or(geojson);
	if data.get("type").and_then(Value::as_str) != Some("FeatureCollection") {
		return SpatialReport::early(
			ReportStatus::Success,
			"Only FeatureCollection analysis is supported",
		);
	}

	let features: &[Value] = data
		.get("features")
		.and_then(Value::as_array)
		.map(Vec::as_slice)
		.unwrap_or_default();

	let mut populations = Vec::new();
	for props in features.iter().filter_map(properties) {
		let Some(value) = props.get("population") else {
			continue;
		};
		let name = props.get("name").and_then(Value::as_str).unwrap_or("Unknown");
		match value {
			Value::Number(n) => populations.push((n.as_f64().unwrap_or(f64::NAN), n)),
			_ => warn!("Skipping non-numeric population {value} of {name}"),
		}
	}

	let mut tensions: Vec<Tension> = population_tension(&populations).into_iter().collect();

	let incomplete = features
		.iter()
		.filter(|f| properties(f).is_none_or(Map::is_empty))
		.count();
	if incomplete > 0 {
		tensions.push(Tension {
			kind: TensionKind::DataQuality,
			severity: Severity::Low,
			description: format!("Incomplete data: {incomplete} features lack properties"),
			details: TensionDetails::Incomplete {
				incomplete_count: incomplete,
			},
		});
	}

	let analyzed_properties: Vec<String> = features
		.iter()
		.filter_map(properties)
		.flat_map(|props| props.keys().cloned())
		.collect::<BTreeSet<_>>()
		.into_iter()
		.collect();

	debug!(
		"Analyzed {} features, {} tensions",
		features.len(),
		tensions.len()
	);
	SpatialReport {
		status: ReportStatus::Success,
		message: "Spatial analysis completed".into(),
		tensions_found: tensions.len(),
		tensions,
		feature_count: Some(features.len()),
		analyzed_properties: Some(analyzed_properties),
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	fn city(name: &str, population: impl Serialize) -> Value {
		json!({
			"type": "Feature",
			"geometry": {"type": "Point", "coordinates": [0.0, 0.0]},
			"properties": {"name": name, "population": population}
		})
	}

	fn collection(features: Vec<Value>) -> Value {
		json!({"type": "FeatureCollection", "features": features})
	}

	#[test]
	fn test_high_disparity() {
		let report = analyze_spatial_distribution(&collection(vec![
			city("Metropolis", 9_000_000),
			city("Smallville", 100_000),
		]));
		assert_eq!(report.status, ReportStatus::Success);
		assert_eq!(report.tensions_found, 1);
		let tension = &report.tensions[0];
		assert_eq!(tension.kind, TensionKind::PopulationDisparity);
		assert_eq!(tension.severity, Severity::High);
		assert!(tension.description.contains("90.0:1"));
		assert_eq!(
			tension.details,
			TensionDetails::Disparity {
				max_population: Number::from(9_000_000),
				min_population: Number::from(100_000),
				ratio: 90.0,
			}
		);
	}

	#[test]
	fn test_disparity_details_keep_input_numbers() {
		let big: u64 = (1 << 53) + 1;
		let report = analyze_spatial_distribution(&collection(vec![
			city("Metropolis", big),
			city("Smallville", 100_000),
			city("Village", 2_500.5),
		]));
		let details = serde_json::to_value(&report.tensions[0].details).unwrap();
		assert_eq!(details["max_population"], json!(big));
		assert_eq!(details["min_population"], json!(2_500.5));
	}

	#[test]
	fn test_medium_disparity() {
		let report =
			analyze_spatial_distribution(&collection(vec![city("A", 800.0), city("B", 100.0)]));
		assert_eq!(report.tensions[0].severity, Severity::Medium);
	}

	#[test]
	fn test_ratio_at_threshold_is_not_reported() {
		let report =
			analyze_spatial_distribution(&collection(vec![city("A", 500.0), city("B", 100.0)]));
		assert_eq!(report.tensions_found, 0);
	}

	#[test]
	fn test_low_ratio_no_tension() {
		let report =
			analyze_spatial_distribution(&collection(vec![city("A", 100.0), city("B", 50.0)]));
		assert_eq!(report.tensions_found, 0);
		assert!(report.tensions.is_empty());
	}

	#[test]
	fn test_zero_population_is_infinite_ratio() {
		let report =
			analyze_spatial_distribution(&collection(vec![city("A", 10.0), city("B", 0.0)]));
		assert_eq!(report.tensions[0].severity, Severity::High);
		match report.tensions[0].details {
			TensionDetails::Disparity { ratio, .. } => assert!(ratio.is_infinite()),
			_ => panic!("expected disparity details"),
		}
	}

	#[test]
	fn test_single_population_no_tension() {
		let report = analyze_spatial_distribution(&collection(vec![city("A", 10.0)]));
		assert_eq!(report.tensions_found, 0);
	}

	#[test]
	fn test_empty_features() {
		let report = analyze_spatial_distribution(&collection(vec![]));
		assert_eq!(report.status, ReportStatus::Success);
		assert_eq!(report.tensions_found, 0);
		assert_eq!(report.feature_count, Some(0));
		assert_eq!(report.analyzed_properties, Some(vec![]));
	}

	#[test]
	fn test_missing_features_key_is_empty() {
		let report = analyze_spatial_distribution(&json!({"type": "FeatureCollection"}));
		assert_eq!(report.feature_count, Some(0));
	}

	#[test]
	fn test_incomplete_features() {
		let report = analyze_spatial_distribution(&collection(vec![
			json!({"type": "Feature", "geometry": null, "properties": {}}),
			json!({"type": "Feature", "geometry": null}),
			json!({"type": "Feature", "geometry": null, "properties": null}),
			city("A", 10.0),
		]));
		assert_eq!(report.tensions_found, 1);
		let tension = &report.tensions[0];
		assert_eq!(tension.kind, TensionKind::DataQuality);
		assert_eq!(tension.severity, Severity::Low);
		assert!(tension.description.contains('3'));
		assert_eq!(tension.details, TensionDetails::Incomplete { incomplete_count: 3 });
		assert_eq!(report.feature_count, Some(4));
	}

	#[test]
	fn test_analyzed_properties_sorted_union() {
		let report = analyze_spatial_distribution(&collection(vec![
			json!({"type": "Feature", "properties": {"zone": "z", "name": "n"}}),
			json!({"type": "Feature", "properties": {"area": 1, "name": "m"}}),
		]));
		assert_eq!(
			report.analyzed_properties,
			Some(vec!["area".to_string(), "name".into(), "zone".into()])
		);
	}

	#[test]
	fn test_wrapped_data_is_unwrapped() {
		let wrapped = json!({
			"status": "success",
			"data": collection(vec![city("A", 9_000_000.0), city("B", 100_000.0)])
		});
		assert_eq!(analyze_spatial_distribution(&wrapped).tensions_found, 1);
	}

	#[test]
	fn test_non_collection_is_skipped() {
		let report = analyze_spatial_distribution(&json!({"type": "Point", "coordinates": [0, 0]}));
		assert_eq!(report.status, ReportStatus::Success);
		assert_eq!(report.tensions_found, 0);
		assert!(report.message.contains("Only FeatureCollection"));
		assert!(report.feature_count.is_none());
	}

	#[test]
	fn test_non_object_is_error() {
		for input in [json!([1, 2]), json!("text"), json!(null)] {
			let report = analyze_spatial_distribution(&input);
			assert_eq!(report.status, ReportStatus::Error);
			assert_eq!(report.tensions_found, 0);
		}
	}

	#[test]
	fn test_non_numeric_population_skipped() {
		let report = analyze_spatial_distribution(&collection(vec![
			json!({"type": "Feature", "properties": {"name": "A", "population": "many"}}),
			city("B", 100.0),
		]));
		assert_eq!(report.tensions_found, 0);
	}

	#[test]
	fn test_report_serializes_wire_names() {
		let report = analyze_spatial_distribution(&collection(vec![
			city("A", 9_000_000),
			city("B", 100_000),
		]));
		let value = report.to_value();
		assert_eq!(value["status"], "success");
		assert_eq!(value["tensions"][0]["type"], "population_disparity");
		assert_eq!(value["tensions"][0]["severity"], "high");
		assert_eq!(value["tensions"][0]["details"]["ratio"], 90.0);
		assert_eq!(value["tensions"][0]["details"]["max_population"], json!(9000000));
		assert_eq!(value["tensions"][0]["details"]["min_population"], json!(100000));

		let error = analyze_spatial_distribution(&json!(3)).to_value();
		assert!(error.get("feature_count").is_none());
	}
}
