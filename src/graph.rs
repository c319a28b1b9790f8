// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::{BTreeMap, HashSet};

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde::{Deserialize, Serialize};

use crate::{Edge, Node};

/// Represents a network of service stations as a set of [Nodes](Node)
/// and undirected [Edges](Edge) between them.
///
/// A Graph is an immutable snapshot - it's created once by
/// [build_graph](crate::build_graph) (or [Graph::new]) and never modified.
/// Every node keeps its incident edges, oriented away from it, so that
/// neighbor lookups don't require a scan over all edges.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "GraphDocument", into = "GraphDocument")]
pub struct Graph {
    nodes: BTreeMap<i64, (Node, Vec<Edge>)>,
    edges: Vec<Edge>,
}

/// Serialized form of a [Graph]: `{"nodes": [...], "edges": [...]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GraphDocument {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl From<GraphDocument> for Graph {
    fn from(d: GraphDocument) -> Self {
        Self::new(d.nodes, d.edges)
    }
}

impl From<Graph> for GraphDocument {
    fn from(g: Graph) -> Self {
        Self {
            nodes: g.nodes.into_values().map(|(node, _)| node).collect(),
            edges: g.edges,
        }
    }
}

impl Graph {
    /// Creates a graph from provided nodes and edges.
    ///
    /// Edges between unknown nodes, self-loops and duplicates
    /// (regardless of direction) are silently discarded.
    pub fn new<N, E>(nodes: N, edges: E) -> Self
    where
        N: IntoIterator<Item = Node>,
        E: IntoIterator<Item = Edge>,
    {
        let mut nodes: BTreeMap<i64, (Node, Vec<Edge>)> = nodes
            .into_iter()
            .map(|n| (n.id, (n, Vec::default())))
            .collect();

        let mut seen: HashSet<(i64, i64)> = HashSet::default();
        let mut kept: Vec<Edge> = Vec::default();

        for e in edges {
            if e.from == e.to
                || !nodes.contains_key(&e.from)
                || !nodes.contains_key(&e.to)
                || !seen.insert(e.key())
            {
                continue;
            }

            if let Some((_, incident)) = nodes.get_mut(&e.from) {
                incident.push(e);
            }
            if let Some((_, incident)) = nodes.get_mut(&e.to) {
                incident.push(e.reversed());
            }
            kept.push(e);
        }

        Self { nodes, edges: kept }
    }

    /// Returns the number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns an iterator over all [Nodes](Node) in the graph, ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values().map(|(node, _)| node)
    }

    /// Retrieves a [Node] with the provided id.
    pub fn get_node(&self, id: i64) -> Option<Node> {
        self.nodes.get(&id).map(|&(node, _)| node)
    }

    /// Returns all [Edges](Edge) of the graph.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Gets all [Edges](Edge) incident to a node with a given id,
    /// oriented so that `edge.from == id`.
    pub fn get_edges(&self, id: i64) -> &[Edge] {
        self.nodes
            .get(&id)
            .map(|(_, e)| e.as_slice())
            .unwrap_or_default()
    }

    /// Gets the weight of an [Edge] between two nodes, in any direction.
    /// If such an edge doesn't exist, returns [f64::INFINITY].
    pub fn get_edge(&self, a: i64, b: i64) -> f64 {
        self.get_edges(a)
            .iter()
            .find(|e| e.to == b)
            .map(|e| e.weight)
            .unwrap_or(f64::INFINITY)
    }

    /// Returns ids of all nodes directly connected to the given node, with edge weights.
    pub fn neighbors(&self, id: i64) -> impl Iterator<Item = (i64, f64)> + '_ {
        self.get_edges(id).iter().map(|e| (e.to, e.weight))
    }

    /// Maps node ids to a compact, sequential index (`0..len()`), in ascending order of ids.
    /// Useful for matrix-based consumers.
    pub fn sequential_ids(&self) -> BTreeMap<i64, usize> {
        self.nodes
            .keys()
            .enumerate()
            .map(|(idx, &id)| (id, idx))
            .collect()
    }

    /// Converts the graph into a GeoJSON [FeatureCollection], with a `Point` for every node
    /// and a `LineString` for every edge.
    pub fn to_geojson(&self) -> FeatureCollection {
        let nodes = self.iter().map(|n| {
            let mut properties = JsonObject::new();
            properties.insert("id".to_string(), n.id.into());
            properties.insert(
                "kind".to_string(),
                serde_json::to_value(n.kind).unwrap_or_default(),
            );
            feature(Value::Point(vec![n.lon, n.lat]), properties)
        });

        let edges = self.edges.iter().filter_map(|e| {
            let (a, _) = self.nodes.get(&e.from)?;
            let (b, _) = self.nodes.get(&e.to)?;

            let mut properties = JsonObject::new();
            properties.insert("from".to_string(), e.from.into());
            properties.insert("to".to_string(), e.to.into());
            properties.insert("weightKm".to_string(), e.weight.into());
            Some(feature(
                Value::LineString(vec![vec![a.lon, a.lat], vec![b.lon, b.lat]]),
                properties,
            ))
        });

        FeatureCollection {
            bbox: None,
            features: nodes.chain(edges).collect(),
            foreign_members: None,
        }
    }
}

fn feature(value: Value, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}
