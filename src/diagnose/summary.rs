use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ReportStatus, SpatialReport};

const RULE_WIDTH: usize = 50;

/// Plain-text rendering of spatial data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextSummary {
	/// Whether the input could be summarized.
	pub status: ReportStatus,
	/// Short outcome message.
	pub message: String,
	/// Always `"text"`.
	pub format: String,
	/// The summary lines joined by newlines.
	pub content: String,
}

fn display_value(value: &Value) -> String {
	match value {
		Value::String(s) => s.clone(),
		other => other.to_string(),
	}
}

/// Describe a GeoJSON value (optionally wrapped as `{"data": ..}`) and, if
/// given, the tensions of an analysis report.
pub fn generate_text_summary(geojson: &Value, report: Option<&SpatialReport>) -> TextSummary {
	let Some(root) = geojson.as_object() else {
		return TextSummary {
			status: ReportStatus::Error,
			message: "Invalid input: expected dictionary".into(),
			format: "text".into(),
			content: String::new(),
		};
	};
	let data = root.get("data").unwrap_or(geojson);
	let heavy = "=".repeat(RULE_WIDTH);
	let light = "-".repeat(RULE_WIDTH);

	let mut lines = vec![heavy.clone(), "SPATIAL DATA SUMMARY".into(), heavy.clone()];
	let kind = data.get("type").and_then(Value::as_str).unwrap_or("Unknown");
	lines.push(format!("\nData Type: {kind}"));

	if kind == "FeatureCollection" {
		let features: &[Value] = data
			.get("features")
			.and_then(Value::as_array)
			.map(Vec::as_slice)
			.unwrap_or_default();
		lines.push(format!("Total Features: {}", features.len()));
		if !features.is_empty() {
			lines.push("\nFeatures:".into());
			lines.push(light);
		}
		for (i, feature) in features.iter().enumerate().map(|(i, f)| (i + 1, f)) {
			let props = feature.get("properties").and_then(Value::as_object);
			let name = props
				.and_then(|p| p.get("name"))
				.and_then(Value::as_str)
				.map(String::from)
				.unwrap_or_else(|| format!("Feature {i}"));
			lines.push(format!("\n{i}. {name}"));
			for (key, value) in props.into_iter().flatten() {
				if key != "name" {
					lines.push(format!("   - {key}: {}", display_value(value)));
				}
			}

			let geometry = feature.get("geometry");
			if geometry.and_then(|g| g.get("type")).and_then(Value::as_str) == Some("Point") {
				let coords: Vec<f64> = geometry
					.and_then(|g| g.get("coordinates"))
					.and_then(Value::as_array)
					.map(|c| c.iter().filter_map(Value::as_f64).collect())
					.unwrap_or_default();
				if let [x, y, ..] = coords.as_slice() {
					lines.push(format!("   - Coordinates: [{x:.4}, {y:.4}]"));
				}
			}
		}
	}

	if let Some(report) = report.filter(|r| !r.tensions.is_empty()) {
		lines.push(format!("\n{heavy}"));
		lines.push("SPATIAL TENSIONS DETECTED".into());
		lines.push(heavy.clone());
		for (i, tension) in report.tensions.iter().enumerate() {
			lines.push(format!("\n{}. {}", i + 1, tension.kind.as_str().to_uppercase()));
			lines.push(format!("   Severity: {}", tension.severity.as_str()));
			lines.push(format!("   Description: {}", tension.description));
		}
	}

	lines.push(format!("\n{heavy}"));
	TextSummary {
		status: ReportStatus::Success,
		message: "Text visualization generated".into(),
		format: "text".into(),
		content: lines.join("\n"),
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;
	use crate::diagnose::analyze_spatial_distribution;

	fn sample() -> Value {
		json!({
			"type": "FeatureCollection",
			"features": [
				{
					"type": "Feature",
					"geometry": {"type": "Point", "coordinates": [-73.985428, 40.748817]},
					"properties": {"name": "New York", "population": 8_336_817}
				},
				{
					"type": "Feature",
					"geometry": {"type": "Point", "coordinates": [-72.6851, 41.7637]},
					"properties": {"name": "Hartford", "population": 121_054}
				},
				{
					"type": "Feature",
					"geometry": {"type": "LineString", "coordinates": [[0, 0], [1, 1]]},
					"properties": {}
				}
			]
		})
	}

	#[test]
	fn test_summary_lists_features() {
		let summary = generate_text_summary(&sample(), None);
		assert_eq!(summary.status, ReportStatus::Success);
		assert_eq!(summary.format, "text");
		let content = &summary.content;
		assert!(content.starts_with(&"=".repeat(50)));
		assert!(content.contains("Data Type: FeatureCollection"));
		assert!(content.contains("Total Features: 3"));
		assert!(content.contains("1. New York"));
		assert!(content.contains("   - population: 8336817"));
		assert!(content.contains("   - Coordinates: [-73.9854, 40.7488]"));
		assert!(content.contains("3. Feature 3"));
		assert!(!content.contains("SPATIAL TENSIONS DETECTED"));
	}

	#[test]
	fn test_summary_includes_tensions() {
		let data = sample();
		let report = analyze_spatial_distribution(&data);
		let summary = generate_text_summary(&data, Some(&report));
		assert!(summary.content.contains("SPATIAL TENSIONS DETECTED"));
		assert!(summary.content.contains("1. POPULATION_DISPARITY"));
		assert!(summary.content.contains("   Severity: high"));
		assert!(summary.content.contains("2. DATA_QUALITY"));
	}

	#[test]
	fn test_summary_of_other_types() {
		let summary = generate_text_summary(&json!({"data": {"type": "Point"}}), None);
		assert!(summary.content.contains("Data Type: Point"));
		assert!(!summary.content.contains("Total Features"));
	}

	#[test]
	fn test_summary_rejects_non_object() {
		let summary = generate_text_summary(&json!(42), None);
		assert_eq!(summary.status, ReportStatus::Error);
		assert!(summary.content.is_empty());
	}
}
