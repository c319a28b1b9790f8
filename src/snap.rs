// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashSet;

use crate::kd::{KDTree, Located};
use crate::{Issue, Report, Station};

/// Recommended number of nearest nodes considered for every station
/// before [Issue::SnapExhausted] is reported.
pub const DEFAULT_SEARCH_DEPTH: usize = 3;

/// [Station] assigned to a motorway node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapped {
    pub station: Station,
    pub node: Located,

    /// Distance between the station and the node, in kilometers.
    pub distance: f64,
}

/// Assigns every station to the nearest node of `tree`, which hasn't been claimed by
/// an earlier station.
///
/// Only the `depth` nearest nodes are considered for every station. If all of them
/// are already claimed, [Issue::SnapExhausted] is reported and the station is dropped.
/// This prevents distinct stations from collapsing into a single graph node.
///
/// If `tree` is `None` (there are no nodes), every station is reported.
pub fn snap_stations(
    stations: &[Station],
    tree: Option<&KDTree>,
    depth: usize,
    report: &mut Report,
) -> Vec<Snapped> {
    let mut claimed: HashSet<i64> = HashSet::default();
    let mut snapped: Vec<Snapped> = Vec::with_capacity(stations.len());

    for &station in stations {
        let candidate = tree.and_then(|t| {
            t.find_nearest_nodes(station.point.lat, station.point.lon, depth)
                .into_iter()
                .find(|(node, _)| !claimed.contains(&node.id))
        });

        match candidate {
            Some((node, distance)) => {
                claimed.insert(node.id);
                snapped.push(Snapped {
                    station,
                    node,
                    distance,
                });
            }
            None => report.push(Issue::SnapExhausted {
                station: station.way_id,
                depth,
            }),
        }
    }

    log::info!("Snapped {} stations onto motorway nodes", snapped.len());
    snapped
}
