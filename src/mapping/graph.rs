use std::collections::HashMap;

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

/// Attributes carried by every relationship edge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RelationEdge {
	/// Relationship kind, as given in the input.
	pub relationship: String,
	/// Relationship strength.
	pub weight: f64,
}

/// A directed relationship graph keyed by node label.
///
/// At most one edge exists per ordered `(source, target)` pair: inserting
/// the pair again overwrites the stored attributes.
#[derive(Clone, Debug, Default)]
pub struct AbstractGraph {
	graph: DiGraph<String, RelationEdge>,
	node_index: HashMap<String, NodeIndex>,
}

impl AbstractGraph {
	/// Create an empty graph.
	pub fn new() -> Self {
		Self::default()
	}

	/// Return the index of `label`, adding the node if needed.
	pub fn ensure_node(&mut self, label: &str) -> NodeIndex {
		if let Some(&idx) = self.node_index.get(label) {
			return idx;
		}
		let idx = self.graph.add_node(label.to_string());
		self.node_index.insert(label.to_string(), idx);
		idx
	}

	/// Insert `source -> target`, or overwrite its attributes if present.
	pub fn upsert_edge(&mut self, source: &str, target: &str, edge: RelationEdge) -> EdgeIndex {
		let (src, tgt) = (self.ensure_node(source), self.ensure_node(target));
		self.graph.update_edge(src, tgt, edge)
	}

	/// Number of distinct nodes.
	pub fn node_count(&self) -> usize {
		self.graph.node_count()
	}

	/// Number of distinct `(source, target)` edges.
	pub fn edge_count(&self) -> usize {
		self.graph.edge_count()
	}

	/// Whether a node with this label exists.
	pub fn contains_node(&self, label: &str) -> bool {
		self.node_index.contains_key(label)
	}

	/// Node labels in index order.
	pub fn nodes(&self) -> impl Iterator<Item = &str> + '_ {
		self.graph.node_weights().map(String::as_str)
	}

	/// Edges as `(source, target, attributes)` in index order.
	pub fn edges(&self) -> impl Iterator<Item = (&str, &str, &RelationEdge)> + '_ {
		self.graph.edge_references().map(|e| {
			(
				self.graph[e.source()].as_str(),
				self.graph[e.target()].as_str(),
				e.weight(),
			)
		})
	}

	/// Attributes of the edge `source -> target`, if present.
	pub fn edge(&self, source: &str, target: &str) -> Option<&RelationEdge> {
		let (src, tgt) = (self.node_index.get(source)?, self.node_index.get(target)?);
		self.graph
			.find_edge(*src, *tgt)
			.and_then(|e| self.graph.edge_weight(e))
	}

	/// Total degree (incoming plus outgoing) per node, in index order.
	pub fn degrees(&self) -> Vec<usize> {
		let mut degrees = vec![0; self.graph.node_count()];
		for e in self.graph.edge_references() {
			degrees[e.source().index()] += 1;
			degrees[e.target().index()] += 1;
		}
		degrees
	}

	/// Edge weights in edge index order.
	pub fn weights(&self) -> Vec<f64> {
		self.graph.edge_weights().map(|e| e.weight).collect()
	}

	/// Endpoint index pairs in edge index order.
	pub(crate) fn edge_endpoints(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
		self.graph
			.edge_references()
			.map(|e| (e.source().index(), e.target().index()))
	}

	/// The underlying petgraph graph.
	pub fn as_petgraph(&self) -> &DiGraph<String, RelationEdge> {
		&self.graph
	}
}
