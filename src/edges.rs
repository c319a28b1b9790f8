// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::{HashMap, HashSet};

use crate::osm::OsmWay;
use crate::{Edge, Issue, Point, Report};

/// Creates undirected edges between consecutive nodes of every way.
///
/// - `(a, b)` and `(b, a)` are the same edge - only the first encountered one is kept,
/// - pairs of a node with itself are skipped,
/// - references to nodes absent from `positions` are reported (once per way and node)
///   and the affected pairs skipped,
/// - edges longer than `max_length_km` are reported and dropped - those are jumps over
///   removed nodes, rather than actual road segments.
pub fn build_edges(
    ways: &[OsmWay],
    positions: &HashMap<i64, Point>,
    max_length_km: f64,
    report: &mut Report,
) -> Vec<Edge> {
    let mut seen: HashSet<(i64, i64)> = HashSet::default();
    let mut edges: Vec<Edge> = Vec::default();
    let mut dangling: HashSet<(i64, i64)> = HashSet::default();

    for w in ways {
        for pair in w.nodes.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            if from == to {
                continue;
            }

            let (Some(a), Some(b)) = (
                resolve(positions, w.id, from, &mut dangling, report),
                resolve(positions, w.id, to, &mut dangling, report),
            ) else {
                continue;
            };

            let edge = Edge {
                from,
                to,
                weight: a.distance_to(&b),
            };

            if !seen.insert(edge.key()) {
                continue;
            }

            if edge.weight > max_length_km {
                report.push(Issue::EdgeTooLong {
                    from,
                    to,
                    length: edge.weight,
                });
                continue;
            }

            edges.push(edge);
        }
    }

    log::info!("Built {} edges", edges.len());
    edges
}

fn resolve(
    positions: &HashMap<i64, Point>,
    way_id: i64,
    node_id: i64,
    dangling: &mut HashSet<(i64, i64)>,
    report: &mut Report,
) -> Option<Point> {
    let p = positions.get(&node_id).cloned();
    if p.is_none() && dangling.insert((way_id, node_id)) {
        report.push(Issue::DanglingReference {
            way: way_id,
            node: node_id,
        });
    }
    p
}
