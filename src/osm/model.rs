// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use crate::Point;

/// Represents an [OSM node](https://wiki.openstreetmap.org/wiki/Node).
#[derive(Debug, Clone, PartialEq)]
pub struct OsmNode {
    pub id: i64,
    pub lat: f64,
    pub lon: f64,
    pub tags: HashMap<String, String>,
}

impl OsmNode {
    #[inline]
    pub fn position(&self) -> Point {
        Point::new(self.lat, self.lon)
    }
}

/// Represents an [OSM way](https://wiki.openstreetmap.org/wiki/Way).
///
/// `nodes` only hold references (ids) - they need to be resolved against
/// a set of [OsmNodes](OsmNode).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsmWay {
    pub id: i64,
    pub nodes: Vec<i64>,
    pub tags: HashMap<String, String>,
}

impl OsmWay {
    /// Returns true if the way forms a ring - the first and last references are equal.
    pub fn is_closed(&self) -> bool {
        self.nodes.len() >= 2 && self.nodes.first() == self.nodes.last()
    }

    /// Returns node references without the closing reference of a ring,
    /// so that every ring vertex appears once.
    pub fn distinct_nodes(&self) -> &[i64] {
        if self.is_closed() {
            &self.nodes[..self.nodes.len() - 1]
        } else {
            &self.nodes
        }
    }
}

/// Type of an [OSM element](https://wiki.openstreetmap.org/wiki/Elements).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    Node,
    Way,
}

impl ElementType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "node" => Some(Self::Node),
            "way" => Some(Self::Way),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Way => "way",
        }
    }
}
