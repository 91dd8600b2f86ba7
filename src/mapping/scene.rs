//! Drawing preparation: normalized edge widths and the pixel-space
//! [`MapScene`] a canvas renderer consumes.

use serde::Serialize;

use super::AbstractMap;
use super::layout::Point;

/// Width assigned to every edge when the weights do not vary.
pub const UNIFORM_EDGE_WIDTH: f64 = 2.5;
/// Narrowest normalized edge width.
pub const MIN_EDGE_WIDTH: f64 = 1.0;
/// Widest normalized edge width.
pub const MAX_EDGE_WIDTH: f64 = 5.0;

const MARGIN: f64 = 0.08;
const TITLE_BAND: f64 = 0.07;

/// Rescale weights linearly into `[1, 5]`.
///
/// Empty input yields no widths; identical weights (a single edge included)
/// all get [`UNIFORM_EDGE_WIDTH`].
pub fn normalize_edge_widths(weights: &[f64]) -> Vec<f64> {
	let (min, max) = weights
		.iter()
		.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &w| (lo.min(w), hi.max(w)));
	if max > min {
		weights
			.iter()
			.map(|w| MIN_EDGE_WIDTH + (MAX_EDGE_WIDTH - MIN_EDGE_WIDTH) * (w - min) / (max - min))
			.collect()
	} else {
		vec![UNIFORM_EDGE_WIDTH; weights.len()]
	}
}

/// A node ready to draw, in pixels.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SceneNode {
	/// Node label.
	pub label: String,
	/// Center.
	pub at: Point,
}

/// An arrowed edge ready to draw, in pixels.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SceneEdge {
	/// Tail center.
	pub from: Point,
	/// Head center.
	pub to: Point,
	/// Stroke width.
	pub width: f64,
	/// Relationship label.
	pub label: String,
	/// Whether both ends are the same node.
	pub is_loop: bool,
}

/// Pixel-space drawing list for one canvas size.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MapScene {
	/// Canvas width.
	pub width: f64,
	/// Canvas height.
	pub height: f64,
	/// Node marker radius.
	pub node_radius: f64,
	/// Heading.
	pub title: String,
	/// Draw node labels.
	pub node_labels: bool,
	/// Draw edge labels.
	pub edge_labels: bool,
	/// Nodes in graph order.
	pub nodes: Vec<SceneNode>,
	/// Edges in graph order.
	pub edges: Vec<SceneEdge>,
}

impl MapScene {
	/// Project `map` onto a `width` x `height` canvas where one point is
	/// `px_per_point` pixels.
	pub fn build(map: &AbstractMap, width: f64, height: f64, px_per_point: f64) -> Self {
		let project = scale::fit(width, height, MARGIN, TITLE_BAND);
		let nodes: Vec<SceneNode> = map
			.graph()
			.nodes()
			.zip(map.positions().iter())
			.map(|(label, p)| SceneNode {
				label: label.to_string(),
				at: project(p),
			})
			.collect();
		let edges = map
			.graph()
			.edge_endpoints()
			.zip(map.graph().edges())
			.zip(map.edge_widths())
			.map(|(((src, tgt), (_, _, attrs)), &edge_width)| SceneEdge {
				from: nodes[src].at,
				to: nodes[tgt].at,
				width: edge_width * px_per_point,
				label: attrs.relationship.clone(),
				is_loop: src == tgt,
			})
			.collect();
		let options = map.options();
		Self {
			width,
			height,
			node_radius: options.node_radius() * px_per_point,
			title: options.title.clone(),
			node_labels: options.with_labels,
			edge_labels: options.edge_labels,
			nodes,
			edges,
		}
	}
}

/// Layout space to canvas space.
pub mod scale {
	use super::Point;

	/// Map the unit box `[-1, 1]²` into a canvas, keeping a margin on every
	/// side and a band at the top for the title. Layout `y` grows upwards.
	pub fn fit(width: f64, height: f64, margin: f64, title_band: f64) -> impl Fn(Point) -> Point {
		let (mx, my) = (width * margin, height * margin);
		let top = my + height * title_band;
		let half_w = ((width - 2.0 * mx) / 2.0).max(0.0);
		let half_h = ((height - my - top) / 2.0).max(0.0);
		let (cx, cy) = (mx + half_w, top + half_h);
		move |p| Point::new(cx + p.x * half_w, cy - p.y * half_h)
	}
}
