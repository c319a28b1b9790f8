// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

/// Recognized values of the [highway](https://wiki.openstreetmap.org/wiki/Key:highway) tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Highway {
    Motorway,
    Trunk,
    Services,
    RestArea,
    MotorwayJunction,
}

/// What a way with a specific [Highway] value represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WayKind {
    /// Routable road segment.
    Street,

    /// Closed ring outlining a service station or a rest area.
    Area,

    /// Marker of a motorway junction.
    Junction,
}

impl Highway {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "motorway" => Some(Self::Motorway),
            "trunk" => Some(Self::Trunk),
            "services" => Some(Self::Services),
            "rest_area" => Some(Self::RestArea),
            "motorway_junction" => Some(Self::MotorwayJunction),
            _ => None,
        }
    }

    /// Returns the recognized value of the `highway` tag, if any.
    pub fn from_tags(tags: &HashMap<String, String>) -> Option<Self> {
        tags.get("highway").and_then(|v| Self::parse(v))
    }

    pub fn way_kind(&self) -> WayKind {
        match self {
            Self::Motorway | Self::Trunk => WayKind::Street,
            Self::Services | Self::RestArea => WayKind::Area,
            Self::MotorwayJunction => WayKind::Junction,
        }
    }
}

/// Checks if a node is tagged as [highway=motorway_junction](https://wiki.openstreetmap.org/wiki/Tag:highway%3Dmotorway_junction).
pub fn is_junction(tags: &HashMap<String, String>) -> bool {
    Highway::from_tags(tags) == Some(Highway::MotorwayJunction)
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! tags {
        {} => { HashMap::default() };
        {$( $k:literal : $v:literal ),+} => {
            HashMap::from_iter([ $( ($k.to_string(), $v.to_string()) ),+ ])
        };
    }

    #[test]
    fn way_kinds() {
        assert_eq!(
            Highway::from_tags(&tags! {"highway": "motorway"}).map(|h| h.way_kind()),
            Some(WayKind::Street)
        );
        assert_eq!(
            Highway::from_tags(&tags! {"highway": "trunk", "ref": "N10"}).map(|h| h.way_kind()),
            Some(WayKind::Street)
        );
        assert_eq!(
            Highway::from_tags(&tags! {"highway": "rest_area"}).map(|h| h.way_kind()),
            Some(WayKind::Area)
        );
        assert_eq!(
            Highway::from_tags(&tags! {"highway": "motorway_junction"}).map(|h| h.way_kind()),
            Some(WayKind::Junction)
        );
    }

    #[test]
    fn unrecognized_highways() {
        assert_eq!(Highway::from_tags(&tags! {}), None);
        assert_eq!(Highway::from_tags(&tags! {"highway": "primary"}), None);
        assert_eq!(Highway::from_tags(&tags! {"railway": "rail"}), None);
    }

    #[test]
    fn junction_nodes() {
        assert!(is_junction(&tags! {"highway": "motorway_junction", "ref": "12"}));
        assert!(!is_junction(&tags! {"highway": "services"}));
        assert!(!is_junction(&tags! {}));
    }
}
