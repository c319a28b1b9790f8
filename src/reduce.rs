// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashSet;

use crate::osm::OsmWay;

/// Restricts node references of every way to the `retained` set, preserving their order.
///
/// Ways left with less than 2 references are dropped, as they can't contribute any edge.
/// Input ways are left untouched.
pub fn reduce_ways(ways: &[OsmWay], retained: &HashSet<i64>) -> Vec<OsmWay> {
    let reduced: Vec<OsmWay> = ways
        .iter()
        .filter_map(|w| {
            let nodes: Vec<i64> = w
                .nodes
                .iter()
                .cloned()
                .filter(|node_id| retained.contains(node_id))
                .collect();

            if nodes.len() < 2 {
                None
            } else {
                Some(OsmWay {
                    id: w.id,
                    nodes,
                    tags: w.tags.clone(),
                })
            }
        })
        .collect();

    log::info!("Reduced {} ways into {}", ways.len(), reduced.len());
    reduced
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn way(id: i64, nodes: &[i64]) -> OsmWay {
        OsmWay {
            id,
            nodes: nodes.to_vec(),
            tags: HashMap::from_iter([("highway".to_string(), "motorway".to_string())]),
        }
    }

    #[test]
    fn reduce_preserves_order() {
        let ways = [way(1, &[1, 2, 3, 4, 5, 6]), way(2, &[6, 5, 4, 3])];
        let retained = HashSet::from_iter([5, 2, 6]);

        let reduced = reduce_ways(&ways, &retained);

        assert_eq!(reduced, vec![way(1, &[2, 5, 6]), way(2, &[6, 5])]);
        // Input must not be modified
        assert_eq!(ways[0].nodes, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn reduce_drops_short_ways() {
        let ways = [way(1, &[1, 2, 3]), way(2, &[4, 5]), way(3, &[7, 3, 8, 9])];
        let retained = HashSet::from_iter([3, 4, 9]);

        let reduced = reduce_ways(&ways, &retained);

        assert_eq!(reduced, vec![way(3, &[3, 9])]);
    }

    #[test]
    fn reduce_with_nothing_retained() {
        let ways = [way(1, &[1, 2, 3])];
        assert!(reduce_ways(&ways, &HashSet::default()).is_empty());
    }
}
