// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use super::document::RawElement;
use super::highway::{Highway, WayKind};
use super::model::{ElementType, OsmNode, OsmWay};
use crate::{Issue, Report};

/// Elements partitioned by their type, in input order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Classified {
    pub nodes: Vec<OsmNode>,
    pub ways: Vec<OsmWay>,
}

impl Classified {
    /// Builds a lookup table of all [OsmNodes](OsmNode) by their id.
    /// In case of duplicate ids, the last node wins.
    pub fn node_index(&self) -> HashMap<i64, OsmNode> {
        self.nodes.iter().map(|n| (n.id, n.clone())).collect()
    }
}

/// [OsmWays](OsmWay) partitioned by their [WayKind], in input order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct WayBuckets {
    pub streets: Vec<OsmWay>,
    pub areas: Vec<OsmWay>,
    pub junctions: Vec<OsmWay>,
}

/// Splits raw elements into nodes and ways.
///
/// Elements of an unknown type and nodes without a valid position are
/// reported and skipped, thus `nodes.len() + ways.len() + skipped == elements.len()`,
/// where `skipped` is the number of issues added to the report.
pub fn classify<I: IntoIterator<Item = RawElement>>(elements: I, report: &mut Report) -> Classified {
    let mut c = Classified::default();

    for e in elements {
        match e.element_type() {
            Some(ElementType::Node) => match node_from_element(e) {
                Ok(n) => c.nodes.push(n),
                Err(issue) => report.push(issue),
            },

            Some(ElementType::Way) => c.ways.push(OsmWay {
                id: e.id,
                nodes: e.nodes,
                tags: e.tags.into_iter().collect(),
            }),

            None => report.push(Issue::UnknownElementType {
                id: e.id,
                type_: e.type_,
            }),
        }
    }

    log::info!("Classified {} nodes and {} ways", c.nodes.len(), c.ways.len());
    c
}

fn node_from_element(e: RawElement) -> Result<OsmNode, Issue> {
    match (e.lat, e.lon) {
        (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Ok(OsmNode {
            id: e.id,
            lat,
            lon,
            tags: e.tags.into_iter().collect(),
        }),
        _ => Err(Issue::InvalidNode(e.id)),
    }
}

/// Splits ways by their `highway` tag into streets, areas and junction markers.
/// Ways without a [recognized](Highway) `highway` tag are reported and skipped.
pub fn split_ways<I: IntoIterator<Item = OsmWay>>(ways: I, report: &mut Report) -> WayBuckets {
    let mut b = WayBuckets::default();

    for w in ways {
        match Highway::from_tags(&w.tags).map(|h| h.way_kind()) {
            Some(WayKind::Street) => b.streets.push(w),
            Some(WayKind::Area) => b.areas.push(w),
            Some(WayKind::Junction) => b.junctions.push(w),
            None => report.push(Issue::UnknownHighway {
                way: w.id,
                value: w.tags.get("highway").cloned(),
            }),
        }
    }

    log::info!(
        "Split ways into {} streets, {} areas and {} junctions",
        b.streets.len(),
        b.areas.len(),
        b.junctions.len(),
    );
    b
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IssueKind;

    fn elements() -> Vec<RawElement> {
        vec![
            RawElement::node(1, 44.0, -0.5),
            RawElement::way(10, vec![1, 2]).with_tag("highway", "motorway"),
            RawElement::node(2, 44.1, -0.6).with_tag("highway", "motorway_junction"),
            RawElement {
                type_: "relation".to_string(),
                ..RawElement::way(20, vec![])
            },
            RawElement::way(11, vec![3, 4, 5, 3]).with_tag("highway", "services"),
            RawElement {
                lat: None,
                ..RawElement::node(3, 0.0, 0.0)
            },
            RawElement::node(4, f64::NAN, 1.0),
            RawElement::way(12, vec![2]).with_tag("highway", "motorway_junction"),
            RawElement::way(13, vec![1, 2]).with_tag("highway", "primary"),
            RawElement::way(14, vec![1, 2]),
            RawElement::way(15, vec![1, 5]).with_tag("highway", "trunk"),
            RawElement::way(16, vec![4, 5, 6, 4]).with_tag("highway", "rest_area"),
        ]
    }

    #[test]
    fn classify_by_type() {
        let mut r = Report::default();
        let input = elements();
        let total = input.len();
        let c = classify(input, &mut r);

        assert_eq!(c.nodes.iter().map(|n| n.id).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(
            c.ways.iter().map(|w| w.id).collect::<Vec<_>>(),
            vec![10, 11, 12, 13, 14, 15, 16]
        );
        assert_eq!(c.nodes[1].tags.get("highway").unwrap(), "motorway_junction");

        assert_eq!(
            r.iter().cloned().collect::<Vec<_>>(),
            vec![
                Issue::UnknownElementType {
                    id: 20,
                    type_: "relation".to_string()
                },
                Issue::InvalidNode(3),
                Issue::InvalidNode(4),
            ]
        );
        assert_eq!(c.nodes.len() + c.ways.len() + r.len(), total);
    }

    #[test]
    fn classify_nothing() {
        let mut r = Report::default();
        let c = classify(vec![], &mut r);
        assert_eq!(c, Classified::default());
        assert!(r.is_empty());
    }

    #[test]
    fn split_by_highway() {
        let mut r = Report::default();
        let c = classify(elements(), &mut r);
        let mut r = Report::default();
        let b = split_ways(c.ways, &mut r);

        assert_eq!(b.streets.iter().map(|w| w.id).collect::<Vec<_>>(), vec![10, 15]);
        assert_eq!(b.areas.iter().map(|w| w.id).collect::<Vec<_>>(), vec![11, 16]);
        assert_eq!(b.junctions.iter().map(|w| w.id).collect::<Vec<_>>(), vec![12]);

        assert_eq!(r.len(), 2);
        assert_eq!(r.count(IssueKind::Classification), 2);
        assert_eq!(
            r.iter().cloned().collect::<Vec<_>>(),
            vec![
                Issue::UnknownHighway {
                    way: 13,
                    value: Some("primary".to_string())
                },
                Issue::UnknownHighway { way: 14, value: None },
            ]
        );
    }

    #[test]
    fn node_index() {
        let mut r = Report::default();
        let c = classify(elements(), &mut r);
        let idx = c.node_index();
        assert_eq!(idx.len(), 2);
        assert_eq!(idx[&2].position(), crate::Point::new(44.1, -0.6));
    }
}
