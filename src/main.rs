use std::error::Error;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use clap::Parser;
use stationgraph::osm::{self, FileFormat, RawElement};
use stationgraph::{IssueKind, Options, OutlierFilter, Point};

#[derive(Debug, thiserror::Error)]
#[error("{0}: {1}")]
struct FileError(PathBuf, #[source] stationgraph::Error);

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Paths to Overpass JSON files (optionally gzip or bzip2 compressed) with service
    /// station areas, motorways and all of their nodes
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Path to write the graph JSON to (compressed if ending with .gz or .bz2),
    /// defaults to the standard output
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to additionally write the graph as GeoJSON to
    #[arg(long)]
    geojson: Option<PathBuf>,

    /// Directory to write intermediate stations.json and reduced.json to
    #[arg(long)]
    dump_dir: Option<PathBuf>,

    /// Stations closer than this distance (in km) are merged
    #[arg(long, default_value_t = Options::default().merge_radius_km)]
    merge_radius: f64,

    /// Edges longer than this distance (in km) are dropped
    #[arg(long, default_value_t = Options::default().max_edge_length_km)]
    max_edge_length: f64,

    /// Number of nearest motorway nodes considered when snapping a station
    #[arg(long, default_value_t = Options::default().snap_search_depth)]
    snap_depth: usize,

    /// Data farther than this distance (in km) from the center is dropped
    #[arg(long, default_value_t = OutlierFilter::default().radius_km)]
    outlier_radius: f64,

    /// Latitude of the outlier filter center
    #[arg(long, allow_negative_numbers = true, default_value_t = OutlierFilter::default().center.lat)]
    center_lat: f64,

    /// Longitude of the outlier filter center
    #[arg(long, allow_negative_numbers = true, default_value_t = OutlierFilter::default().center.lon)]
    center_lon: f64,

    /// Disable the outlier filter
    #[arg(long)]
    no_outlier_filter: bool,

    /// Drop stations without any other station within this distance (in km)
    #[arg(long)]
    isolation_radius: Option<f64>,

    /// Don't keep motorway junctions in the graph
    #[arg(long)]
    no_junctions: bool,

    /// Junctions closer than this distance (in km) are merged
    #[arg(long, default_value_t = Options::default().junction_merge_radius_km)]
    junction_merge_radius: f64,
}

impl Cli {
    fn options(&self) -> Options {
        Options {
            merge_radius_km: self.merge_radius,
            max_edge_length_km: self.max_edge_length,
            snap_search_depth: self.snap_depth,
            outliers: if self.no_outlier_filter {
                None
            } else {
                Some(OutlierFilter {
                    center: Point::new(self.center_lat, self.center_lon),
                    radius_km: self.outlier_radius,
                })
            },
            isolation_radius_km: self.isolation_radius,
            keep_junctions: !self.no_junctions,
            junction_merge_radius_km: self.junction_merge_radius,
        }
    }
}

pub fn main() -> Result<(), Box<dyn Error>> {
    colog::init();
    let cli = Cli::parse();

    let mut elements = Vec::default();
    for path in &cli.inputs {
        let loaded = load_elements(path)?;
        log::info!("Loaded {} elements from {}", loaded.len(), path.display());
        elements.extend(loaded);
    }

    let build = stationgraph::build_graph(elements, &cli.options());

    for kind in [
        IssueKind::Classification,
        IssueKind::DanglingReference,
        IssueKind::DegenerateInput,
        IssueKind::SnapExhaustion,
        IssueKind::Filtered,
    ] {
        let count = build.report.count(kind);
        if count > 0 {
            log::info!("{:?} issues: {}", kind, count);
        }
    }

    if let Some(dir) = &cli.dump_dir {
        fs::create_dir_all(dir)?;
        dump_elements(&build.stations_elements(), &dir.join("stations.json"))?;
        dump_elements(&build.reduced_elements(), &dir.join("reduced.json"))?;
    }

    if let Some(path) = &cli.geojson {
        write_json(&build.graph.to_geojson(), path)?;
    }

    match &cli.output {
        Some(path) => write_json(&build.graph, path)?,
        None => osm::write_json_to_io(&build.graph, io::stdout().lock(), FileFormat::Json)?,
    }

    Ok(())
}

fn load_elements(path: &Path) -> Result<Vec<RawElement>, FileError> {
    osm::read_elements_from_file(path, FileFormat::Unknown)
        .map_err(|e| FileError(path.to_path_buf(), e))
}

fn dump_elements(elements: &[RawElement], path: &Path) -> Result<(), FileError> {
    osm::write_elements_to_file(elements, path, FileFormat::Json)
        .map_err(|e| FileError(path.to_path_buf(), e))
}

fn write_json<T: serde::Serialize>(value: &T, path: &Path) -> Result<(), FileError> {
    let result = File::create(path)
        .map_err(stationgraph::Error::from)
        .and_then(|f| osm::write_json_to_io(value, f, FileFormat::from_path(path)));
    result.map_err(|e| FileError(path.to_path_buf(), e))
}
