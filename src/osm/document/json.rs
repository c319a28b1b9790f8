// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::osm::model::{ElementType, OsmWay};

/// Top-level object of an [Overpass JSON](https://wiki.openstreetmap.org/wiki/OSM_JSON)
/// document. Fields other than `elements` (`version`, `generator`, `osm3s`, ...) are ignored.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub elements: Vec<RawElement>,
}

/// Unvalidated element of a [Document].
///
/// `type_` is kept as a string, as unknown element types are not a parsing error -
/// they are reported and skipped by [classify](crate::osm::classify).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawElement {
    #[serde(rename = "type")]
    pub type_: String,

    pub id: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<i64>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
}

impl RawElement {
    pub fn element_type(&self) -> Option<ElementType> {
        ElementType::parse(&self.type_)
    }

    /// Creates a node element at the provided position.
    pub fn node(id: i64, lat: f64, lon: f64) -> Self {
        Self {
            type_: ElementType::Node.as_str().to_string(),
            id,
            lat: Some(lat),
            lon: Some(lon),
            nodes: Vec::default(),
            tags: BTreeMap::default(),
        }
    }

    /// Creates a way element with the provided node references.
    pub fn way(id: i64, nodes: Vec<i64>) -> Self {
        Self {
            type_: ElementType::Way.as_str().to_string(),
            id,
            lat: None,
            lon: None,
            nodes,
            tags: BTreeMap::default(),
        }
    }

    pub fn with_tag(mut self, key: &str, value: &str) -> Self {
        self.tags.insert(key.to_string(), value.to_string());
        self
    }
}

impl From<&OsmWay> for RawElement {
    fn from(w: &OsmWay) -> Self {
        Self {
            tags: w.tags.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            ..Self::way(w.id, w.nodes.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_overpass_document() {
        let d: Document = serde_json::from_str(
            r#"{
                "version": 0.6,
                "generator": "Overpass API",
                "elements": [
                    {"type": "node", "id": 304610017, "lat": 44.8883184, "lon": -0.5799906},
                    {
                        "type": "way",
                        "id": 1018761865,
                        "nodes": [9396560469, 9396560468, 9396560469],
                        "tags": {"highway": "services"}
                    },
                    {"type": "relation", "id": 5, "members": []}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(d.elements.len(), 3);

        assert_eq!(d.elements[0], RawElement::node(304610017, 44.8883184, -0.5799906));
        assert_eq!(d.elements[0].element_type(), Some(ElementType::Node));

        assert_eq!(
            d.elements[1],
            RawElement::way(1018761865, vec![9396560469, 9396560468, 9396560469])
                .with_tag("highway", "services")
        );

        assert_eq!(d.elements[2].type_, "relation");
        assert_eq!(d.elements[2].element_type(), None);
    }

    #[test]
    fn serialize_skips_empty_fields() {
        let s = serde_json::to_string(&RawElement::way(7, vec![1, 2])).unwrap();
        assert_eq!(s, r#"{"type":"way","id":7,"nodes":[1,2]}"#);

        let s = serde_json::to_string(&RawElement::node(8, 1.5, -2.0).with_tag("highway", "motorway_junction")).unwrap();
        assert_eq!(
            s,
            r#"{"type":"node","id":8,"lat":1.5,"lon":-2.0,"tags":{"highway":"motorway_junction"}}"#
        );
    }
}
