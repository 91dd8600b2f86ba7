use serde::{Deserialize, Serialize};

use super::error::MapResult;

/// Display and export settings for an abstract map.
///
/// Every field has a default, so a JSON config only needs the keys it
/// overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapOptions {
	/// Marker area in points squared.
	pub node_size: f64,
	/// Draw node labels.
	pub with_labels: bool,
	/// Draw the relationship label of every edge.
	pub edge_labels: bool,
	/// File name of the exported PNG, if any.
	pub save_path: Option<String>,
	/// Canvas size in inches, `(width, height)`.
	pub figsize: (f64, f64),
	/// Pixels per inch on screen.
	pub dpi: f64,
	/// Pixels per inch of the exported image.
	pub save_dpi: f64,
	/// Seed for the random layout.
	pub seed: u64,
	/// Heading drawn above the map.
	pub title: String,
}

impl Default for MapOptions {
	fn default() -> Self {
		Self {
			node_size: 500.0,
			with_labels: true,
			edge_labels: true,
			save_path: None,
			figsize: (12.0, 8.0),
			dpi: 100.0,
			save_dpi: 300.0,
			seed: 42,
			title: "Abstract Relationship Map".into(),
		}
	}
}

impl MapOptions {
	/// Load options from a JSON object, defaulting absent keys.
	pub fn from_json(text: &str) -> MapResult<Self> {
		Ok(serde_json::from_str(text)?)
	}

	/// On-screen canvas size in pixels.
	pub fn canvas_size(&self) -> (f64, f64) {
		(self.figsize.0 * self.dpi, self.figsize.1 * self.dpi)
	}

	/// Exported image size in pixels.
	pub fn export_size(&self) -> (f64, f64) {
		(self.figsize.0 * self.save_dpi, self.figsize.1 * self.save_dpi)
	}

	/// Node radius in points: `node_size` is a marker area.
	pub fn node_radius(&self) -> f64 {
		self.node_size.max(0.0).sqrt() / 2.0
	}
}
