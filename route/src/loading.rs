use crate::{
	errors::LoadError,
	graph::{build_graph, EdgeTable, Graph},
	objects::{RawEdge, RawVertex},
};
use log::info;
use serde::de::DeserializeOwned;
use std::{
	fs::File,
	io::{BufReader, Read},
	path::{Path, PathBuf},
};

/// Edge and vertex collections of one trail network, as stored on disk.
#[derive(Clone, Debug, Default)]
pub struct TrailNetwork {
	pub edges: Vec<RawEdge>,
	pub vertices: Vec<RawVertex>,
}

fn read_json<T: DeserializeOwned, R: Read>(rd: R, path: &Path) -> Result<T, LoadError> {
	serde_json::from_reader(rd).map_err(|source| LoadError::Json { path: path.to_path_buf(), source })
}

fn open(path: &Path) -> Result<BufReader<File>, LoadError> {
	File::open(path).map(BufReader::new).map_err(|source| LoadError::Io { path: path.to_path_buf(), source })
}

impl TrailNetwork {
	pub fn from_paths<P: AsRef<Path>>(edges: P, vertices: P) -> Result<Self, LoadError> {
		let (ep, vp) = (edges.as_ref(), vertices.as_ref());
		let net = Self { edges: read_json(open(ep)?, ep)?, vertices: read_json(open(vp)?, vp)? };
		info!("loaded {} edges from {}, {} vertice from {}", net.edges.len(), ep.display(), net.vertices.len(), vp.display());
		Ok(net)
	}

	pub fn from_readers<E: Read, V: Read>(edges: E, vertices: V) -> Result<Self, LoadError> {
		Ok(Self {
			edges: read_json(edges, &PathBuf::from("<edges>"))?,
			vertices: read_json(vertices, &PathBuf::from("<vertices>"))?,
		})
	}

	pub fn build(&self) -> (Graph, EdgeTable) { build_graph(&self.edges, &self.vertices) }
}

#[cfg(test)]
mod loading_tests {
	use super::*;
	use crate::objects::{EdgeId, VertexId};
	use std::io::Write;

	const EDGES: &str = r#"[
		{"id": 1, "length": 10.0, "coordinates": [[0, 0], [10, 0]], "difficulty": 1},
		{"id": 2, "length": 5, "coordinates": [[[10, 0], [10, 5]]]}
	]"#;
	const VERTICES: &str = r#"[
		{"id": 100, "coordinates": [0, 0], "connected_edges": [1]},
		{"id": 200, "coordinates": [10, 0], "connected_edges": [1, 2]},
		{"id": 300, "coordinates": [10, 5], "connected_edges": [2]}
	]"#;

	#[test]
	fn reads_from_readers() {
		let net = TrailNetwork::from_readers(EDGES.as_bytes(), VERTICES.as_bytes()).unwrap();
		assert_eq!(net.edges.len(), 2);
		assert_eq!(net.vertices[1].connected_edges, vec![EdgeId(1), EdgeId(2)]);
		let (g, table) = net.build();
		assert_eq!(g.num_vertice(), 3);
		assert_eq!(table[&EdgeId(1)].difficulty, Some(1));
		assert_eq!(g.neighbours(&VertexId(200)).len(), 2);
	}

	#[test]
	fn reads_from_files() {
		let dir = tempfile::tempdir().unwrap();
		let (ep, vp) = (dir.path().join("edges.json"), dir.path().join("vertex.json"));
		File::create(&ep).unwrap().write_all(EDGES.as_bytes()).unwrap();
		File::create(&vp).unwrap().write_all(VERTICES.as_bytes()).unwrap();
		let net = TrailNetwork::from_paths(&ep, &vp).unwrap();
		assert_eq!(net.vertices.len(), 3);
	}

	#[test]
	fn reports_missing_and_broken_files() {
		let dir = tempfile::tempdir().unwrap();
		let missing = dir.path().join("nope.json");
		assert!(matches!(TrailNetwork::from_paths(&missing, &missing), Err(LoadError::Io { .. })));

		let broken = dir.path().join("broken.json");
		File::create(&broken).unwrap().write_all(b"[{\"id\": ").unwrap();
		match TrailNetwork::from_paths(&broken, &broken) {
			Err(LoadError::Json { path, .. }) => assert_eq!(path, broken),
			other => panic!("expected json error, got {:?}", other),
		}
	}
}
