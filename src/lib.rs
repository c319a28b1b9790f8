// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Proximity graphs of highway service stations built from [OpenStreetMap](https://www.openstreetmap.org/) data.
//!
//! Service stations and rest areas (mapped as closed ways) are collapsed into
//! single points, snapped onto the nearest motorway node, and connected along
//! motorways with undirected edges weighted by the great-circle distance.
//! The resulting [Graph] is meant to be consumed by a path finder planning
//! trips over a limited-range network, e.g. electric vehicle charging stops.
//!
//! # Example
//!
//! ```no_run
//! let elements = stationgraph::osm::read_elements_from_file(
//!     "path/to/aquitaine.json",
//!     stationgraph::osm::FileFormat::Unknown,
//! ).expect("failed to load aquitaine.json");
//!
//! let build = stationgraph::build_graph(elements, &stationgraph::Options::default());
//! for issue in build.report.iter() {
//!     eprintln!("skipped: {}", issue);
//! }
//!
//! for edge in build.graph.edges() {
//!     println!("{} - {}: {:.1} km", edge.from, edge.to, edge.weight);
//! }
//! ```

mod edges;
mod error;
mod geometry;
mod graph;
mod kd;
pub mod osm;
mod pipeline;
mod reduce;
mod snap;
mod stations;

pub use edges::build_edges;
pub use error::{Error, Issue, IssueKind, Report};
pub use geometry::{centroid, earth_distance, Point, EARTH_RADIUS};
pub use graph::Graph;
pub use kd::{KDTree, Located};
pub use pipeline::{build_graph, Build, Options, OutlierFilter};
pub use reduce::reduce_ways;
pub use snap::{snap_stations, Snapped, DEFAULT_SEARCH_DEPTH};
pub use stations::{drop_isolated, drop_outliers, merge_near_duplicates, reduce_areas, Station};

use serde::{Deserialize, Serialize};

/// Role of a [Node] in the [Graph].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Motorway node closest to a service station or a rest area.
    Station,

    /// Motorway junction, kept to preserve connectivity between stations.
    Junction,
}

/// Represents an element of the [Graph], a retained OpenStreetMap node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: i64,
    pub lat: f64,
    pub lon: f64,
    pub kind: NodeKind,
}

impl Node {
    #[inline]
    pub fn position(&self) -> Point {
        Point::new(self.lat, self.lon)
    }
}

/// Represents an undirected connection between two [Nodes](Node).
///
/// `weight` is the great-circle distance between the nodes, in kilometers.
/// In a finished edge list `from != to`, and no two edges connect the same pair of nodes
/// (regardless of direction).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub from: i64,
    pub to: i64,
    #[serde(rename = "weightKm")]
    pub weight: f64,
}

impl Edge {
    /// Returns the node ids in ascending order, identifying the edge regardless of direction.
    #[inline]
    pub fn key(&self) -> (i64, i64) {
        if self.from <= self.to {
            (self.from, self.to)
        } else {
            (self.to, self.from)
        }
    }

    /// Returns the same edge, traversed in the opposite direction.
    #[inline]
    pub fn reversed(&self) -> Edge {
        Edge {
            from: self.to,
            to: self.from,
            weight: self.weight,
        }
    }

    /// Checks if the edge connects the given nodes, in any direction.
    #[inline]
    pub fn connects(&self, a: i64, b: i64) -> bool {
        (self.from == a && self.to == b) || (self.from == b && self.to == a)
    }
}
