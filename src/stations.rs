// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use crate::osm::{OsmNode, OsmWay, RawElement};
use crate::{centroid, Issue, Point, Report};

/// Service station or rest area collapsed into a single point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Station {
    /// Id of the OSM way outlining the station.
    pub way_id: i64,

    /// Centroid of the station's outline.
    pub point: Point,
}

impl Station {
    /// Represents the station as a node element, re-using the id of its way.
    pub fn to_element(&self) -> RawElement {
        RawElement::node(self.way_id, self.point.lat, self.point.lon).with_tag("highway", "services")
    }
}

/// Collapses every area way into a [Station] located at the centroid of its nodes.
///
/// References to unknown nodes are reported and skipped. The closing reference of a ring
/// is not counted twice. Ways without any known node are reported and skipped.
pub fn reduce_areas(
    areas: &[OsmWay],
    nodes: &HashMap<i64, OsmNode>,
    report: &mut Report,
) -> Vec<Station> {
    let stations: Vec<Station> = areas
        .iter()
        .filter_map(|w| {
            let points: Vec<Point> = w
                .distinct_nodes()
                .iter()
                .filter_map(|node_id| match nodes.get(node_id) {
                    Some(n) => Some(n.position()),
                    None => {
                        report.push(Issue::DanglingReference {
                            way: w.id,
                            node: *node_id,
                        });
                        None
                    }
                })
                .collect();

            match centroid(&points) {
                Some(point) => Some(Station {
                    way_id: w.id,
                    point,
                }),
                None => {
                    report.push(Issue::DegenerateArea { way: w.id });
                    None
                }
            }
        })
        .collect();

    log::info!("Reduced {} areas into stations", stations.len());
    stations
}

/// Removes stations closer than `radius_km` to an earlier kept station.
///
/// A single service station is commonly mapped as multiple areas, one on each side
/// of a motorway; only the first area (in input order) is kept.
pub fn merge_near_duplicates(stations: &[Station], radius_km: f64) -> Vec<Station> {
    let mut kept: Vec<Station> = Vec::with_capacity(stations.len());

    for s in stations {
        match kept
            .iter()
            .find(|k| k.point.distance_to(&s.point) < radius_km)
        {
            Some(k) => log::debug!("Station {} merged into {}", s.way_id, k.way_id),
            None => kept.push(*s),
        }
    }

    log::info!(
        "Merged {} stations into {}",
        stations.len(),
        kept.len()
    );
    kept
}

/// Removes stations farther than `radius_km` from `center`, e.g. stations
/// from overseas territories.
pub fn drop_outliers(
    stations: &[Station],
    center: Point,
    radius_km: f64,
    report: &mut Report,
) -> Vec<Station> {
    stations
        .iter()
        .filter(|s| {
            let distance = center.distance_to(&s.point);
            if distance > radius_km {
                report.push(Issue::OutOfRange {
                    id: s.way_id,
                    distance,
                });
                false
            } else {
                true
            }
        })
        .cloned()
        .collect()
}

/// Removes stations without any other station within `radius_km`,
/// as they can't be reached from any other station.
pub fn drop_isolated(stations: &[Station], radius_km: f64, report: &mut Report) -> Vec<Station> {
    stations
        .iter()
        .enumerate()
        .filter(|&(i, s)| {
            let has_neighbor = stations
                .iter()
                .enumerate()
                .any(|(j, o)| i != j && s.point.distance_to(&o.point) <= radius_km);
            if !has_neighbor {
                report.push(Issue::Isolated(s.way_id));
            }
            has_neighbor
        })
        .map(|(_, s)| *s)
        .collect()
}
