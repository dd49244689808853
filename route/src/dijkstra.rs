use crate::{
	errors::{ok_or_broken, ok_or_unknown, RoutingError},
	graph::Graph,
	objects::{Cost, EdgeId, PathResult, VertexId},
	sortable::MinQueue,
	traits::Router,
};
use log::{debug, trace};
use std::collections::{HashMap, HashSet};

/// Vertex reached, and the edge taken to reach it.
pub type PredecessorMap = HashMap<VertexId, (VertexId, EdgeId)>;

pub struct DijkstraRouter<'a> {
	pub graph: &'a Graph
}

impl<'a> Router for DijkstraRouter<'a> {
	fn get_graph(&self) -> &Graph { self.graph }
	fn shortest_path(&self, source: &VertexId, target: &VertexId) -> Result<PathResult, RoutingError> {
		shortest_path(self.graph, *source, *target)
	}
}

/// Single-source Dijkstra with lazy deletion, stopping as soon as `target` is settled.
///
/// Weights are expected to be non-negative. Each vertex is settled at most once,
/// so the search terminates even when that does not hold, though the result is
/// then not guaranteed to be minimal.
pub fn shortest_path(graph: &Graph, source: VertexId, target: VertexId) -> Result<PathResult, RoutingError> {
	ok_or_unknown(graph.get(&source), source)?;
	ok_or_unknown(graph.get(&target), target)?;

	let mut dist: HashMap<VertexId, Cost> = HashMap::new();
	let mut prev = PredecessorMap::new();
	let mut settled: HashSet<VertexId> = HashSet::new();
	let mut queue: MinQueue<Cost, VertexId> = MinQueue::new();

	dist.insert(source, Cost::ZERO);
	queue.push(Cost::ZERO, source);

	while let Some((cost, vid)) = queue.pop() {
		let best = dist.get(&vid).copied().unwrap_or(Cost::INFINITY);
		if cost > best || !settled.insert(vid) {
			// superseded entry
			continue;
		}
		trace!("settled {} at {:?}", vid, cost);
		if vid == target {
			break;
		}

		for adj in graph.neighbours(&vid) {
			if settled.contains(&adj.neighbour) {
				continue;
			}
			let next_cost = cost + adj.weight;
			let known = dist.get(&adj.neighbour).copied().unwrap_or(Cost::INFINITY);
			if next_cost < known {
				dist.insert(adj.neighbour, next_cost);
				prev.insert(adj.neighbour, (vid, adj.edge));
				queue.push(next_cost, adj.neighbour);
			}
		}
	}
	debug!("dijkstra {} -> {}: {} vertice settled", source, target, settled.len());

	if source == target {
		return Ok(PathResult { vertices: vec![source], edges: vec![], cost: Cost::ZERO });
	}
	if !prev.contains_key(&target) {
		return Ok(PathResult::empty());
	}
	let cost = *ok_or_broken(dist.get(&target), "target has a predecessor but no distance")?;
	let (vertices, edges) = trace_back(&prev, source, target)?;
	Ok(PathResult { vertices, edges, cost })
}

/// Follows predecessors from `target` back to `source`, returns both sequences in travel order.
pub fn trace_back(prev: &PredecessorMap, source: VertexId, target: VertexId) -> Result<(Vec<VertexId>, Vec<EdgeId>), RoutingError> {
	let mut vertices = vec![target];
	let mut edges = vec![];
	let mut current = target;
	while current != source {
		let (from, eid) = *ok_or_broken(prev.get(&current), &format!("vertex {} has no predecessor", current))?;
		edges.push(eid);
		vertices.push(from);
		current = from;
		if edges.len() > prev.len() {
			return Err(RoutingError::BrokenPath { msg: format!("predecessor cycle through {}", current) });
		}
	}
	vertices.reverse();
	edges.reverse();
	Ok((vertices, edges))
}
