use serde::{Deserialize, Serialize};

use super::graph::AbstractGraph;

/// Basic structural metrics of a relationship graph.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphMetrics {
	/// Distinct nodes.
	pub num_nodes: usize,
	/// Distinct directed edges.
	pub num_edges: usize,
	/// `E / (N (N - 1))`, or 0 with fewer than two nodes.
	pub density: f64,
	/// Mean of incoming plus outgoing degree, or 0 without nodes.
	pub avg_degree: f64,
}

/// Compute [`GraphMetrics`] for `graph`. Never divides by zero.
pub fn analyze_graph(graph: &AbstractGraph) -> GraphMetrics {
	let (num_nodes, num_edges) = (graph.node_count(), graph.edge_count());
	let density = if num_nodes < 2 {
		0.0
	} else {
		num_edges as f64 / (num_nodes * (num_nodes - 1)) as f64
	};
	let avg_degree = if num_nodes == 0 {
		0.0
	} else {
		graph.degrees().iter().sum::<usize>() as f64 / num_nodes as f64
	};
	GraphMetrics {
		num_nodes,
		num_edges,
		density,
		avg_degree,
	}
}
