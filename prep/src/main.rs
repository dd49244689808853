use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;
use trailprep::{extract_network, read_collection, split_by_property, write_groups, write_network, ExtractOptions};
use std::{path::PathBuf, time::Instant};

/// Prepares trail GeoJSON for routing.
#[derive(Parser, Debug)]
#[command(name = "trailprep", version)]
struct Cli {
	#[command(subcommand)]
	cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Split a FeatureCollection into one file per property value
	Split {
		input: PathBuf,
		#[arg(long, default_value = "MNTN_NM")]
		property: String,
		#[arg(long, default_value = "data/mountains")]
		out_dir: PathBuf,
	},
	/// Turn trail lines into edge and vertex collections
	Extract {
		input: PathBuf,
		#[arg(long)]
		edges: PathBuf,
		#[arg(long)]
		vertices: PathBuf,
		#[arg(long, default_value = "difficulty")]
		difficulty_property: String,
		#[arg(long, default_value = "length")]
		length_property: String,
	},
}

fn run(cli: Cli) -> Result<()> {
	let t0 = Instant::now();
	match cli.cmd {
		Command::Split { input, property, out_dir } => {
			let fc = read_collection(&input)?;
			info!("{}: {} features", input.display(), fc.features.len());
			let groups = split_by_property(fc, &property);
			let written = write_groups(&groups, &out_dir)?;
			info!("{} files in {}", written.len(), out_dir.display());
		}
		Command::Extract { input, edges, vertices, difficulty_property, length_property } => {
			let fc = read_collection(&input)?;
			let net = extract_network(&fc, &ExtractOptions { length_property, difficulty_property });
			write_network(&net, &edges, &vertices)?;
			info!("edges -> {}, vertice -> {}", edges.display(), vertices.display());
		}
	}
	info!("{:.3} s", t0.elapsed().as_secs_f32());
	Ok(())
}

fn main() -> Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
	run(Cli::parse())
}

#[cfg(test)]
mod trailprep_tests {
	use super::*;

	#[test]
	fn parses_subcommands() {
		let cli = Cli::try_parse_from(["trailprep", "split", "all.geojson"]).unwrap();
		match cli.cmd {
			Command::Split { property, out_dir, .. } => {
				assert_eq!(property, "MNTN_NM");
				assert_eq!(out_dir, PathBuf::from("data/mountains"));
			}
			other => panic!("{:?}", other),
		}
		assert!(Cli::try_parse_from(["trailprep", "extract", "a.geojson"]).is_err());
	}

	#[test]
	fn extract_writes_both_collections() {
		let dir = tempfile::tempdir().unwrap();
		let input = dir.path().join("trails.geojson");
		std::fs::write(&input, r#"{"type": "FeatureCollection", "features": [
			{"type": "Feature", "properties": {"length": 3},
			 "geometry": {"type": "LineString", "coordinates": [[0, 0], [3, 0]]}}
		]}"#).unwrap();
		let (edges, vertices) = (dir.path().join("edges.json"), dir.path().join("vertex.json"));
		let cli = Cli::try_parse_from([
			"trailprep", "extract", input.to_str().unwrap(),
			"--edges", edges.to_str().unwrap(), "--vertices", vertices.to_str().unwrap(),
		]).unwrap();
		run(cli).unwrap();
		let net = trail_route::loading::TrailNetwork::from_paths(&edges, &vertices).unwrap();
		assert_eq!(net.edges.len(), 1);
		assert_eq!(net.vertices.len(), 2);
	}
}
