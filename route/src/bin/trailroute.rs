use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;
use trail_route::{
	assemble_route,
	export::{write_route_csv, write_route_json, RouteDocument},
	loading::TrailNetwork,
	objects::VertexId,
	shortest_path,
	transform::GeodeticConverter,
};
use std::{fs::File, io::BufWriter, path::PathBuf, time::Instant};

/// Least-cost route between two trail junctions, written as JSON for the map view.
#[derive(Parser, Debug, Clone)]
#[command(name = "trailroute", version)]
struct Args {
	/// Start vertex id
	#[arg(default_value_t = 220)]
	start: i64,
	/// End vertex id
	#[arg(default_value_t = 1)]
	end: i64,
	/// Edge collection (JSON array)
	#[arg(long, env = "TRAIL_EDGES")]
	edges: PathBuf,
	/// Vertex collection (JSON array)
	#[arg(long, env = "TRAIL_VERTICES")]
	vertices: PathBuf,
	/// Directory receiving path_{start}_{end}.json
	#[arg(long, env = "TRAIL_ROUTE_DIR", default_value = "public/route")]
	out_dir: PathBuf,
	/// Also write one CSV row per traversed edge, geometry as WKT
	#[arg(long)]
	csv: Option<PathBuf>,
}

fn run(args: &Args) -> Result<()> {
	let (start, end) = (VertexId(args.start), VertexId(args.end));
	let t0 = Instant::now();

	let net = TrailNetwork::from_paths(&args.edges, &args.vertices)?;
	let (graph, table) = net.build();
	info!("graph: {} vertice, {} edges, built in {:.3} s", graph.num_vertice(), graph.num_edges(), t0.elapsed().as_secs_f32());

	let path = shortest_path(&graph, start, end).with_context(|| format!("routing {} -> {}", start, end))?;
	if path.is_empty() {
		bail!("no route between {} and {}", start, end);
	}

	let mut converter = GeodeticConverter::korea_unified();
	let route = assemble_route(&path, &graph, &table, &mut converter)?;
	info!("route: {} vertice, cost {:.1}, {} points converted", route.vertices.len(), route.cost.0, converter.len());

	let doc = RouteDocument::new(&route, start, end, chrono::Utc::now().to_rfc3339());
	let out = write_route_json(&doc, &args.out_dir)?;
	info!("route written to {}", out.display());

	if let Some(csv_path) = &args.csv {
		let f = File::create(csv_path).with_context(|| format!("creating {}", csv_path.display()))?;
		write_route_csv(&route, BufWriter::new(f))?;
		info!("route rows written to {}", csv_path.display());
	}
	info!("done in {:.3} s", t0.elapsed().as_secs_f32());
	Ok(())
}

fn main() -> Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
	let args = Args::parse();
	run(&args)
}

#[cfg(test)]
mod trailroute_tests {
	use super::*;

	#[test]
	fn parses_defaults() {
		let args = Args::try_parse_from(["trailroute", "--edges", "e.json", "--vertices", "v.json"]).unwrap();
		assert_eq!((args.start, args.end), (220, 1));
		assert_eq!(args.out_dir, PathBuf::from("public/route"));
		assert!(args.csv.is_none());
	}

	#[test]
	fn writes_route_file() {
		let dir = tempfile::tempdir().unwrap();
		let (ep, vp) = (dir.path().join("edges.json"), dir.path().join("vertex.json"));
		std::fs::write(&ep, r#"[
			{"id": 1, "length": 3, "coordinates": [[1000000, 2000000], [1000030, 2000000]]},
			{"id": 2, "length": 4, "coordinates": [[1000070, 2000000], [1000030, 2000000]]}
		]"#).unwrap();
		std::fs::write(&vp, r#"[
			{"id": 7, "coordinates": [1000000, 2000000], "connected_edges": [1]},
			{"id": 8, "coordinates": [1000030, 2000000], "connected_edges": [1, 2]},
			{"id": 9, "coordinates": [1000070, 2000000], "connected_edges": [2]}
		]"#).unwrap();
		let out_dir = dir.path().join("route");
		let csv = dir.path().join("route.csv");
		let args = Args {
			start: 7, end: 9, edges: ep.clone(), vertices: vp.clone(),
			out_dir: out_dir.clone(), csv: Some(csv.clone()),
		};
		run(&args).unwrap();

		let doc: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(out_dir.join("path_7_9.json")).unwrap()).unwrap();
		assert_eq!(doc["vertices"], serde_json::json!([7, 8, 9]));
		assert_eq!(doc["meta"]["cost"], 7.0);
		assert_eq!(std::fs::read_to_string(&csv).unwrap().lines().count(), 3);

		let single = Args { start: 7, end: 7, ..args.clone() };
		run(&single).unwrap();
		assert!(out_dir.join("path_7_7.json").exists());

		let unknown = Args { start: 7, end: 99, ..args };
		assert!(run(&unknown).is_err());
		assert!(!out_dir.join("path_7_99.json").exists());
	}

	#[test]
	fn unreachable_end_fails_once() {
		let dir = tempfile::tempdir().unwrap();
		let (ep, vp) = (dir.path().join("edges.json"), dir.path().join("vertex.json"));
		std::fs::write(&ep, r#"[{"id": 1, "length": 3, "coordinates": [[1000000, 2000000], [1000030, 2000000]]}]"#).unwrap();
		std::fs::write(&vp, r#"[
			{"id": 1, "coordinates": [1000000, 2000000], "connected_edges": [1]},
			{"id": 2, "coordinates": [1000030, 2000000], "connected_edges": [1]},
			{"id": 3, "coordinates": [1000900, 2000000]}
		]"#).unwrap();
		let out_dir = dir.path().join("route");
		let args = Args { start: 1, end: 3, edges: ep, vertices: vp, out_dir: out_dir.clone(), csv: None };
		let err = run(&args).unwrap_err();
		assert_eq!(format!("{:#}", err), "no route between 1 and 3");
		assert!(!out_dir.join("path_1_3.json").exists());
	}
}
