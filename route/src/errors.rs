use crate::objects::{EdgeId, VertexId};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RoutingError {
	/// Source or target id is not a vertex of the graph.
	#[error("unknown vertex {vid}")]
	UnknownVertex { vid: VertexId },
	/// A path refers to an edge the edge table does not hold.
	#[error("edge {eid} is not in the edge table")]
	MissingEdge { eid: EdgeId },
	#[error("broken path: {msg}")]
	BrokenPath { msg: String },
	#[error("coordinate conversion failed: {msg}")]
	Projection { msg: String },
}

#[derive(Debug, Error)]
pub enum LoadError {
	#[error("cannot read {path}: {source}")]
	Io { path: PathBuf, source: std::io::Error },
	#[error("cannot parse {path}: {source}")]
	Json { path: PathBuf, source: serde_json::Error },
}

pub fn ok_or_unknown<T>(data: Option<T>, vid: VertexId) -> Result<T, RoutingError> {
	data.ok_or(RoutingError::UnknownVertex { vid })
}

pub fn ok_or_broken<T>(data: Option<T>, msg: &str) -> Result<T, RoutingError> {
	data.ok_or_else(|| RoutingError::BrokenPath { msg: msg.into() })
}

#[derive(Debug, Error)]
pub enum ExportError {
	#[error(transparent)]
	Io(#[from] std::io::Error),
	#[error(transparent)]
	Json(#[from] serde_json::Error),
	#[error(transparent)]
	Csv(#[from] csv::Error),
}
