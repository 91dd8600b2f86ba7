//! Abstract relationship maps: tabular relationships to a laid-out,
//! drawable directed graph.
//!
//! ```no_run
//! use abstract_map_canvas::mapping::{MapOptions, MapSource, analyze_graph, generate_abstract_map};
//!
//! let map = generate_abstract_map(
//!     MapSource::CsvPath("data/abstract_sample.csv".into()),
//!     "spring",
//!     &MapOptions::default(),
//! )?;
//! let metrics = analyze_graph(map.graph());
//! println!("{} nodes, density {:.3}", metrics.num_nodes, metrics.density);
//! # Ok::<(), abstract_map_canvas::mapping::MapError>(())
//! ```

use std::path::PathBuf;

use log::{debug, info};

mod analysis;
mod error;
mod graph;
mod layout;
mod options;
mod records;
pub mod scene;

pub use analysis::{GraphMetrics, analyze_graph};
pub use error::{MapError, MapResult};
pub use graph::{AbstractGraph, RelationEdge};
pub use layout::{Layout, LayoutPositions, Point};
pub use options::MapOptions;
pub use records::{REQUIRED_COLUMNS, RelationshipRecord, RelationshipTable};
pub use scene::{MapScene, normalize_edge_widths};

/// Where relationship rows come from.
#[derive(Clone, Debug)]
pub enum MapSource {
	/// An already loaded table.
	Table(RelationshipTable),
	/// CSV text with a header line.
	CsvText(String),
	/// A CSV file on disk.
	CsvPath(PathBuf),
}

impl MapSource {
	fn load(self) -> MapResult<RelationshipTable> {
		match self {
			MapSource::Table(table) => Ok(table),
			MapSource::CsvText(text) => RelationshipTable::from_csv_str(&text),
			MapSource::CsvPath(path) => RelationshipTable::from_csv_path(path),
		}
	}
}

impl From<RelationshipTable> for MapSource {
	fn from(table: RelationshipTable) -> Self {
		MapSource::Table(table)
	}
}

impl From<Vec<RelationshipRecord>> for MapSource {
	fn from(records: Vec<RelationshipRecord>) -> Self {
		MapSource::Table(RelationshipTable::from_records(&records))
	}
}

/// A built relationship graph together with everything needed to draw it.
#[derive(Clone, Debug)]
pub struct AbstractMap {
	graph: AbstractGraph,
	layout: Layout,
	positions: LayoutPositions,
	edge_widths: Vec<f64>,
	options: MapOptions,
}

impl AbstractMap {
	/// The relationship graph.
	pub fn graph(&self) -> &AbstractGraph {
		&self.graph
	}

	/// Take the relationship graph, dropping the drawing data.
	pub fn into_graph(self) -> AbstractGraph {
		self.graph
	}

	/// The layout that placed the nodes.
	pub fn layout(&self) -> Layout {
		self.layout
	}

	/// Node positions, indexed like the graph's nodes.
	pub fn positions(&self) -> &LayoutPositions {
		&self.positions
	}

	/// Position of the node labelled `label`.
	pub fn position_of(&self, label: &str) -> Option<Point> {
		let idx = self.graph.nodes().position(|n| n == label)?;
		self.positions.get(idx)
	}

	/// Normalized stroke widths in edge order.
	pub fn edge_widths(&self) -> &[f64] {
		&self.edge_widths
	}

	/// Display and export settings.
	pub fn options(&self) -> &MapOptions {
		&self.options
	}

	/// Drawing list for the on-screen canvas.
	pub fn scene(&self) -> MapScene {
		let (w, h) = self.options.canvas_size();
		MapScene::build(self, w, h, self.options.dpi / 72.0)
	}

	/// Drawing list for the exported image.
	pub fn export_scene(&self) -> MapScene {
		let (w, h) = self.options.export_size();
		MapScene::build(self, w, h, self.options.save_dpi / 72.0)
	}
}

/// Build the graph described by `source` and lay it out with `layout`.
///
/// The schema is checked first, then the layout name, then each row's
/// weight; all fail loudly. A bad layout name is therefore reported even
/// when a row also carries a bad weight. Rows are applied in order, so a
/// repeated `(source, target)` pair keeps the last row's attributes.
///
/// Weights must parse as `f64` after trimming; an empty cell is not a
/// number and fails with [`MapError::InvalidWeight`].
pub fn generate_abstract_map(
	source: impl Into<MapSource>,
	layout: &str,
	options: &MapOptions,
) -> MapResult<AbstractMap> {
	let table = source.into().load()?;
	let index = table.column_index()?;
	let layout: Layout = layout.parse()?;

	let mut graph = AbstractGraph::new();
	for (row, rel) in table.relationships(index).enumerate() {
		let weight = rel
			.weight
			.trim()
			.parse::<f64>()
			.map_err(|_| MapError::InvalidWeight {
				row,
				value: rel.weight.to_string(),
			})?;
		graph.upsert_edge(
			rel.source,
			rel.target,
			RelationEdge {
				relationship: rel.relationship.to_string(),
				weight,
			},
		);
	}
	debug!(
		"Built relationship graph from {} rows: {} nodes, {} edges",
		table.len(),
		graph.node_count(),
		graph.edge_count()
	);

	let positions = layout.compute(&graph, options.seed);
	let edge_widths = normalize_edge_widths(&graph.weights());
	info!("Generated abstract map with {} layout", layout);

	Ok(AbstractMap {
		graph,
		layout,
		positions,
		edge_widths,
		options: options.clone(),
	})
}
