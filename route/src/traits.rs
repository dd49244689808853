use crate::{
	objects::{PathResult, VertexId},
	errors::RoutingError,
	graph::Graph,
};

pub trait Router {
	/// Least-cost path from `source` to `target`.
	/// `Ok` with an empty result means the target is unreachable;
	/// an id missing from the graph is an error.
	fn shortest_path(&self, source: &VertexId, target: &VertexId) -> Result<PathResult, RoutingError>;
	fn get_graph(&self) -> &Graph;
}
