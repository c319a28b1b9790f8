// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::{HashMap, HashSet};

use crate::kd::{KDTree, Located};
use crate::osm::{self, OsmNode, OsmWay, RawElement};
use crate::{
    build_edges, drop_isolated, drop_outliers, merge_near_duplicates, reduce_areas, reduce_ways,
    snap_stations, Graph, Issue, Node, NodeKind, Point, Report, Snapped, Station,
    DEFAULT_SEARCH_DEPTH,
};

/// Removes data farther than `radius_km` from `center`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlierFilter {
    pub center: Point,
    pub radius_km: f64,
}

impl Default for OutlierFilter {
    /// 900 km around Paris, which covers metropolitan France
    /// and excludes overseas territories.
    fn default() -> Self {
        Self {
            center: Point::new(48.8566, 2.3522),
            radius_km: 900.0,
        }
    }
}

/// Thresholds controlling how OSM data is turned into a [Graph].
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Stations closer than this distance (in km) to an earlier station are merged into it.
    pub merge_radius_km: f64,

    /// Edges longer than this distance (in km) are dropped.
    pub max_edge_length_km: f64,

    /// Number of nearest motorway nodes considered when snapping a station.
    pub snap_search_depth: usize,

    /// Drop stations and motorway nodes outside of a specific area. `None` disables the filter.
    pub outliers: Option<OutlierFilter>,

    /// Drop stations without any other station within this distance (in km).
    /// `None` disables the filter.
    pub isolation_radius_km: Option<f64>,

    /// Keep [motorway junctions](crate::osm::is_junction) in the graph,
    /// in addition to nodes snapped to stations.
    pub keep_junctions: bool,

    /// Junctions closer than this distance (in km) to an earlier junction are dropped.
    pub junction_merge_radius_km: f64,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            merge_radius_km: 0.1,
            max_edge_length_km: 60.0,
            snap_search_depth: DEFAULT_SEARCH_DEPTH,
            outliers: Some(OutlierFilter::default()),
            isolation_radius_km: None,
            keep_junctions: true,
            junction_merge_radius_km: 0.1,
        }
    }
}

/// Result of [build_graph]: the final [Graph], outputs of intermediate stages,
/// and all encountered [Issues](Issue).
#[derive(Debug, Clone)]
pub struct Build {
    pub graph: Graph,

    /// Stations after merging and filtering, before snapping.
    pub stations: Vec<Station>,

    /// Stations which were assigned to a motorway node.
    pub snapped: Vec<Snapped>,

    /// Motorway ways restricted to the graph nodes.
    pub reduced_ways: Vec<OsmWay>,

    pub report: Report,
}

impl Build {
    /// Returns [stations](Build::stations) as node elements.
    pub fn stations_elements(&self) -> Vec<RawElement> {
        self.stations.iter().map(|s| s.to_element()).collect()
    }

    /// Returns graph nodes and [reduced ways](Build::reduced_ways) as elements,
    /// in the same shape as the input data.
    pub fn reduced_elements(&self) -> Vec<RawElement> {
        let nodes = self.graph.iter().map(|n| {
            let e = RawElement::node(n.id, n.lat, n.lon);
            match n.kind {
                NodeKind::Junction => e.with_tag("highway", "motorway_junction"),
                NodeKind::Station => e,
            }
        });
        let ways = self.reduced_ways.iter().map(RawElement::from);
        nodes.chain(ways).collect()
    }
}

/// Builds a [Graph] of service stations from raw OSM elements.
///
/// The elements must contain service station areas (`highway=services` or
/// `highway=rest_area` ways), motorways (`highway=motorway` or `highway=trunk` ways),
/// and all nodes referenced by them.
///
/// Processing runs in the following stages:
/// 1. [classification](crate::osm::classify) of elements into nodes and ways,
/// 2. [reducing areas](reduce_areas) into stations (and [merging](merge_near_duplicates) them),
/// 3. [snapping](snap_stations) stations onto motorway nodes,
/// 4. [reducing motorways](reduce_ways) to snapped nodes (and junctions),
/// 5. [building edges](crate::build_edges).
///
/// Data problems never stop the processing - they're collected in [Build::report].
pub fn build_graph<I: IntoIterator<Item = RawElement>>(elements: I, options: &Options) -> Build {
    let mut report = Report::default();

    // 1. Classify
    let classified = osm::classify(elements, &mut report);
    let nodes = classified.node_index();
    let ways = osm::split_ways(classified.ways, &mut report);

    // 2. Reduce areas
    let stations = reduce_areas(&ways.areas, &nodes, &mut report);
    let mut stations = merge_near_duplicates(&stations, options.merge_radius_km);
    if let Some(f) = options.outliers {
        stations = drop_outliers(&stations, f.center, f.radius_km, &mut report);
    }
    if let Some(radius) = options.isolation_radius_km {
        stations = drop_isolated(&stations, radius, &mut report);
    }

    // 3. Snap
    let street_nodes = collect_street_nodes(&ways.streets, &nodes, options, &mut report);
    let tree = KDTree::from_iter(street_nodes.iter().map(|n| Located {
        id: n.id,
        position: n.position(),
    }));
    let snapped = snap_stations(
        &stations,
        tree.as_ref(),
        options.snap_search_depth,
        &mut report,
    );

    // 4. Reduce ways
    let junctions = if options.keep_junctions {
        collect_junctions(&street_nodes, &ways.junctions, options.junction_merge_radius_km)
    } else {
        Vec::default()
    };

    let retained: HashSet<i64> = snapped
        .iter()
        .map(|s| s.node.id)
        .chain(junctions.iter().map(|j| j.id))
        .collect();
    let reduced_ways = reduce_ways(&ways.streets, &retained);

    // 5. Build edges
    let positions: HashMap<i64, Point> = street_nodes
        .iter()
        .filter(|n| retained.contains(&n.id))
        .map(|n| (n.id, n.position()))
        .collect();
    let edges = build_edges(
        &reduced_ways,
        &positions,
        options.max_edge_length_km,
        &mut report,
    );

    let graph = Graph::new(
        graph_nodes(&snapped, &junctions, &reduced_ways),
        edges,
    );
    log::info!(
        "Built graph with {} nodes and {} edges ({} issues)",
        graph.len(),
        graph.edges().len(),
        report.len(),
    );

    Build {
        graph,
        stations,
        snapped,
        reduced_ways,
        report,
    }
}

/// Returns unique nodes referenced by the motorway ways, in order of appearance.
/// Unknown references are reported; nodes outside of the [OutlierFilter] are dropped.
fn collect_street_nodes<'a>(
    streets: &[OsmWay],
    nodes: &'a HashMap<i64, OsmNode>,
    options: &Options,
    report: &mut Report,
) -> Vec<&'a OsmNode> {
    let mut seen: HashSet<i64> = HashSet::default();
    let mut street_nodes: Vec<&'a OsmNode> = Vec::default();

    for w in streets {
        for &node_id in &w.nodes {
            if !seen.insert(node_id) {
                continue;
            }

            let Some(n) = nodes.get(&node_id) else {
                report.push(Issue::DanglingReference {
                    way: w.id,
                    node: node_id,
                });
                continue;
            };

            if let Some(f) = options.outliers {
                let distance = f.center.distance_to(&n.position());
                if distance > f.radius_km {
                    report.push(Issue::OutOfRange {
                        id: node_id,
                        distance,
                    });
                    continue;
                }
            }

            street_nodes.push(n);
        }
    }

    street_nodes
}

/// Returns motorway nodes which are junctions - either tagged as such,
/// or referenced by a junction way. Junctions closer than `merge_radius_km` to an earlier
/// junction are skipped.
fn collect_junctions(
    street_nodes: &[&OsmNode],
    junction_ways: &[OsmWay],
    merge_radius_km: f64,
) -> Vec<Located> {
    let marked: HashSet<i64> = junction_ways
        .iter()
        .flat_map(|w| w.nodes.iter().cloned())
        .collect();

    let mut junctions: Vec<Located> = Vec::default();
    for n in street_nodes {
        if !osm::is_junction(&n.tags) && !marked.contains(&n.id) {
            continue;
        }

        let position = n.position();
        if junctions
            .iter()
            .any(|j| j.position.distance_to(&position) < merge_radius_km)
        {
            log::debug!("Junction {} merged into a nearby junction", n.id);
            continue;
        }

        junctions.push(Located { id: n.id, position });
    }
    junctions
}

/// Returns all nodes snapped to stations, and junctions which are used by at least one way.
fn graph_nodes(snapped: &[Snapped], junctions: &[Located], reduced_ways: &[OsmWay]) -> Vec<Node> {
    let used: HashSet<i64> = reduced_ways
        .iter()
        .flat_map(|w| w.nodes.iter().cloned())
        .collect();
    let stations: HashSet<i64> = snapped.iter().map(|s| s.node.id).collect();

    let station_nodes = snapped.iter().map(|s| Node {
        id: s.node.id,
        lat: s.node.position.lat,
        lon: s.node.position.lon,
        kind: NodeKind::Station,
    });

    let junction_nodes = junctions
        .iter()
        .filter(|j| used.contains(&j.id) && !stations.contains(&j.id))
        .map(|j| Node {
            id: j.id,
            lat: j.position.lat,
            lon: j.position.lon,
            kind: NodeKind::Junction,
        });

    station_nodes.chain(junction_nodes).collect()
}
