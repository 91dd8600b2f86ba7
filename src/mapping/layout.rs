use std::collections::VecDeque;
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use force_graph::{EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::{debug, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::error::MapError;
use super::graph::AbstractGraph;

const SPRING_TICKS: usize = 400;
const SPRING_DT: f32 = 0.016;
const SPRING_START_RADIUS: f64 = 100.0;
const STRESS_ITERATIONS: usize = 300;

/// A 2D coordinate in layout space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
	/// Horizontal coordinate.
	pub x: f64,
	/// Vertical coordinate.
	pub y: f64,
}

impl Point {
	/// Create a point.
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	fn is_finite(&self) -> bool {
		self.x.is_finite() && self.y.is_finite()
	}
}

/// Node placement strategies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
	/// Force-directed simulation.
	#[default]
	Spring,
	/// Even spacing on a circle.
	Circular,
	/// Stress minimization over graph distances.
	KamadaKawai,
	/// Uniform random placement.
	Random,
}

impl Layout {
	/// Every layout, in the order they are offered.
	pub const ALL: [Layout; 4] = [
		Layout::Spring,
		Layout::Circular,
		Layout::KamadaKawai,
		Layout::Random,
	];

	/// The selector name of this layout.
	pub fn as_str(&self) -> &'static str {
		match self {
			Layout::Spring => "spring",
			Layout::Circular => "circular",
			Layout::KamadaKawai => "kamada_kawai",
			Layout::Random => "random",
		}
	}

	/// Every accepted selector name.
	pub fn names() -> Vec<&'static str> {
		Self::ALL.iter().map(Layout::as_str).collect()
	}

	/// Place every node of `graph`, normalized to the unit box.
	///
	/// `seed` only affects [`Layout::Random`].
	pub fn compute(&self, graph: &AbstractGraph, seed: u64) -> LayoutPositions {
		let n = graph.node_count();
		let raw = match self {
			Layout::Circular => circular(n),
			Layout::Random => random(n, seed),
			Layout::Spring => spring(graph),
			Layout::KamadaKawai => kamada_kawai(graph),
		};
		debug!("Computed {} layout for {} nodes", self, n);
		LayoutPositions::rescaled(raw)
	}
}

impl fmt::Display for Layout {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Layout {
	type Err = MapError;

	fn from_str(name: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|l| l.as_str() == name)
			.ok_or_else(|| MapError::UnknownLayout {
				name: name.to_string(),
				valid: Self::names(),
			})
	}
}

/// One position per node, indexed like the graph's nodes.
///
/// Coordinates are centered on the origin and scaled so the largest
/// absolute coordinate is 1.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutPositions {
	points: Vec<Point>,
}

impl LayoutPositions {
	fn rescaled(mut points: Vec<Point>) -> Self {
		if points.is_empty() {
			return Self { points };
		}
		let n = points.len() as f64;
		let (cx, cy) = points
			.iter()
			.fold((0.0, 0.0), |(sx, sy), p| (sx + p.x / n, sy + p.y / n));
		let mut extent: f64 = 0.0;
		for p in points.iter_mut() {
			p.x -= cx;
			p.y -= cy;
			extent = extent.max(p.x.abs()).max(p.y.abs());
		}
		if extent > 0.0 {
			for p in points.iter_mut() {
				p.x /= extent;
				p.y /= extent;
			}
		}
		Self { points }
	}

	/// Number of placed nodes.
	pub fn len(&self) -> usize {
		self.points.len()
	}

	/// Whether no node was placed.
	pub fn is_empty(&self) -> bool {
		self.points.is_empty()
	}

	/// Position of the node with this index.
	pub fn get(&self, node: usize) -> Option<Point> {
		self.points.get(node).copied()
	}

	/// Positions in node index order.
	pub fn iter(&self) -> impl Iterator<Item = Point> + '_ {
		self.points.iter().copied()
	}
}

fn circular(n: usize) -> Vec<Point> {
	(0..n)
		.map(|i| {
			let angle = (i as f64) * 2.0 * PI / n as f64;
			Point::new(angle.cos(), angle.sin())
		})
		.collect()
}

fn random(n: usize, seed: u64) -> Vec<Point> {
	let mut rng = SmallRng::seed_from_u64(seed);
	(0..n).map(|_| Point::new(rng.r#gen::<f64>(), rng.r#gen::<f64>())).collect()
}

fn spring(graph: &AbstractGraph) -> Vec<Point> {
	let start = circular(graph.node_count());
	if start.len() < 2 {
		return start;
	}

	let mut sim = ForceGraph::<usize, ()>::new(SimulationParameters {
		force_charge: 150.0,
		force_spring: 0.05,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	});
	let indices: Vec<_> = start
		.iter()
		.enumerate()
		.map(|(i, p)| {
			sim.add_node(NodeData {
				x: (p.x * SPRING_START_RADIUS) as f32,
				y: (p.y * SPRING_START_RADIUS) as f32,
				mass: 10.0,
				is_anchor: false,
				user_data: i,
			})
		})
		.collect();
	for (src, tgt) in graph.edge_endpoints() {
		// self-loops carry no spring force
		if src != tgt {
			sim.add_edge(indices[src], indices[tgt], EdgeData::default());
		}
	}
	for _ in 0..SPRING_TICKS {
		sim.update(SPRING_DT);
	}

	let mut points = start.clone();
	sim.visit_nodes(|node| {
		points[node.data.user_data] = Point::new(node.x() as f64, node.y() as f64);
	});
	if points.iter().all(Point::is_finite) {
		points
	} else {
		warn!("Spring simulation diverged, falling back to circular placement");
		start
	}
}

/// All-pairs hop distances over the undirected view of `graph`.
/// Unreachable pairs get one more than the longest finite distance.
fn hop_distances(graph: &AbstractGraph) -> Vec<Vec<f64>> {
	let n = graph.node_count();
	let mut adjacency = vec![Vec::new(); n];
	for (src, tgt) in graph.edge_endpoints() {
		if src != tgt {
			adjacency[src].push(tgt);
			adjacency[tgt].push(src);
		}
	}

	let mut dist = vec![vec![None; n]; n];
	for (root, row) in dist.iter_mut().enumerate() {
		row[root] = Some(0usize);
		let mut queue = VecDeque::from([root]);
		while let Some(u) = queue.pop_front() {
			let next = row[u].unwrap_or_default() + 1;
			for &v in &adjacency[u] {
				if row[v].is_none() {
					row[v] = Some(next);
					queue.push_back(v);
				}
			}
		}
	}

	let longest = dist.iter().flatten().flatten().copied().max().unwrap_or(0);
	dist.into_iter()
		.map(|row| {
			row.into_iter()
				.map(|d| d.unwrap_or(longest + 1) as f64)
				.collect()
		})
		.collect()
}

fn kamada_kawai(graph: &AbstractGraph) -> Vec<Point> {
	let mut points = circular(graph.node_count());
	let n = points.len();
	if n < 2 {
		return points;
	}
	let dist = hop_distances(graph);

	// localized stress majorization: each node moves to the weighted mean
	// of where its neighbours would place it, weights 1/d^2
	for _ in 0..STRESS_ITERATIONS {
		for i in 0..n {
			let (mut sx, mut sy, mut sw) = (0.0, 0.0, 0.0);
			for j in 0..n {
				if i == j {
					continue;
				}
				let d = dist[i][j];
				let w = 1.0 / (d * d);
				let (dx, dy) = (points[i].x - points[j].x, points[i].y - points[j].y);
				let norm = (dx * dx + dy * dy).sqrt();
				let (tx, ty) = if norm > 1e-9 {
					(points[j].x + d * dx / norm, points[j].y + d * dy / norm)
				} else {
					(points[j].x + d, points[j].y)
				};
				sx += w * tx;
				sy += w * ty;
				sw += w;
			}
			points[i] = Point::new(sx / sw, sy / sw);
		}
	}
	points
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::mapping::graph::RelationEdge;

	fn sample_graph() -> AbstractGraph {
		let mut graph = AbstractGraph::new();
		for (s, t, w) in [("A", "B", 0.8), ("B", "C", 0.6), ("C", "D", 0.9), ("A", "D", 0.7)] {
			graph.upsert_edge(
				s,
				t,
				RelationEdge {
					relationship: "rel".into(),
					weight: w,
				},
			);
		}
		graph.upsert_edge(
			"E",
			"E",
			RelationEdge {
				relationship: "self".into(),
				weight: 1.0,
			},
		);
		graph
	}

	#[test]
	fn test_parse_known_names() {
		for layout in Layout::ALL {
			assert_eq!(layout.as_str().parse::<Layout>().unwrap(), layout);
		}
	}

	#[test]
	fn test_unknown_layout_lists_valid_set() {
		let err = "invalid_layout".parse::<Layout>().unwrap_err();
		let message = err.to_string();
		assert!(message.contains("Unknown layout: invalid_layout"));
		for name in ["spring", "circular", "kamada_kawai", "random"] {
			assert!(message.contains(name));
		}
	}

	#[test]
	fn test_every_layout_places_every_node_in_unit_box() {
		let graph = sample_graph();
		for layout in Layout::ALL {
			let positions = layout.compute(&graph, 7);
			assert_eq!(positions.len(), graph.node_count(), "{layout}");
			for p in positions.iter() {
				assert!(p.x.is_finite() && p.y.is_finite(), "{layout}");
				assert!(p.x.abs() <= 1.0 + 1e-9 && p.y.abs() <= 1.0 + 1e-9, "{layout}");
			}
		}
	}

	#[test]
	fn test_empty_and_single_node_graphs() {
		let empty = AbstractGraph::new();
		let mut single = AbstractGraph::new();
		single.ensure_node("only");
		for layout in Layout::ALL {
			assert!(layout.compute(&empty, 1).is_empty());
			assert_eq!(layout.compute(&single, 1).get(0), Some(Point::new(0.0, 0.0)));
		}
	}

	#[test]
	fn test_random_layout_is_seeded() {
		let graph = sample_graph();
		assert_eq!(Layout::Random.compute(&graph, 3), Layout::Random.compute(&graph, 3));
	}

	#[test]
	fn test_hop_distances_disconnected() {
		let dist = hop_distances(&sample_graph());
		assert_eq!(dist[0][2], 2.0);
		// E is unreachable from A; longest finite distance is 2
		assert_eq!(dist[0][4], 3.0);
	}
}
