//! Least-cost routing on a trail network.
//!
//! Flat edge/vertex records go through [`build_graph`], [`shortest_path`] and
//! [`assemble_route`] to become geodetic lines and waypoints ready for a map.

pub mod dijkstra;
pub mod errors;
pub mod export;
pub mod graph;
pub mod loading;
pub mod objects;
pub mod projection;
pub mod route;
pub mod serialize_wkt;
pub mod sortable;
pub mod traits;
pub mod transform;

pub use dijkstra::shortest_path;
pub use graph::build_graph;
pub use route::assemble_route;
