// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::{earth_distance, Point, EARTH_RADIUS};

/// Identifier and position of an element stored in a [KDTree].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Located {
    pub id: i64,
    pub position: Point,
}

/// KDTree implements the [k-d tree data structure](https://en.wikipedia.org/wiki/K-d_tree),
/// used to speed up nearest-neighbor search when snapping many stations onto
/// a large set of motorway nodes.
///
/// Distances are computed with [earth_distance]. Searches are exact as long as
/// all elements fit in a band of less than 180° of longitude (true for any regional extract);
/// data crossing the ante meridian (180°/-180° longitude) may produce sub-optimal results.
#[derive(Debug, Clone)]
pub struct KDTree {
    pivot: Located,
    left: Option<Box<KDTree>>,
    right: Option<Box<KDTree>>,
}

impl KDTree {
    /// Finds the closest element to the given position.
    pub fn find_nearest_node(&self, lat: f64, lon: f64) -> Located {
        self.find_nearest_nodes(lat, lon, 1)
            .first()
            .map(|&(l, _)| l)
            .unwrap_or(self.pivot)
    }

    /// Finds up to `k` elements closest to the given position. Returns them alongside their
    /// distance (in kilometers), in order of increasing distance; ties are broken by id.
    pub fn find_nearest_nodes(&self, lat: f64, lon: f64, k: usize) -> Vec<(Located, f64)> {
        let mut best: Vec<(Located, f64)> = Vec::with_capacity(k + 1);
        if k > 0 {
            self.find_nearest_nodes_impl(lat, lon, false, k, &mut best);
        }
        best
    }

    fn find_nearest_nodes_impl(
        &self,
        lat: f64,
        lon: f64,
        lon_divides: bool,
        k: usize,
        best: &mut Vec<(Located, f64)>,
    ) {
        let pivot = self.pivot.position;
        insert_candidate(
            best,
            k,
            self.pivot,
            earth_distance(lat, lon, pivot.lat, pivot.lon),
        );

        // Select which branch to recurse into first
        let first_left = if lon_divides {
            lon < pivot.lon
        } else {
            lat < pivot.lat
        };
        let (first, second) = if first_left {
            (&self.left, &self.right)
        } else {
            (&self.right, &self.left)
        };

        // Recurse into the first branch
        if let Some(ref branch) = first {
            branch.find_nearest_nodes_impl(lat, lon, !lon_divides, k, best);
        }

        // (Optionally) recurse into the second branch
        if let Some(ref branch) = second {
            // A closer element is possible in the second branch if and only if
            // the splitting axis is closer than the current worst candidate.
            let dist_to_axis = if lon_divides {
                distance_to_meridian(lat, lon, pivot.lon)
            } else {
                earth_distance(lat, lon, pivot.lat, lon)
            };

            let worst = best.last().map(|&(_, d)| d).unwrap_or(f64::INFINITY);
            if best.len() < k || dist_to_axis <= worst {
                branch.find_nearest_nodes_impl(lat, lon, !lon_divides, k, best);
            }
        }
    }

    /// Builds a k-d tree from an iterable of [Located] elements.
    pub fn from_iter<I: IntoIterator<Item = Located>>(elements: I) -> Option<Self> {
        let mut elements = elements.into_iter().collect::<Vec<_>>();
        Self::build(elements.as_mut_slice())
    }

    /// Builds a k-d tree from a mutable slice of [Located] elements. Elements will be reordered
    /// in the slice to facilitate building the tree. Returns `None` for an empty slice.
    pub fn build(elements: &mut [Located]) -> Option<Self> {
        Self::build_impl(elements, false)
    }

    fn build_impl(elements: &mut [Located], lon_divides: bool) -> Option<Self> {
        match elements.len() {
            0 => None,
            1 => Some(Self {
                pivot: elements[0],
                left: None,
                right: None,
            }),
            _ => {
                if lon_divides {
                    elements.sort_by(|a, b| a.position.lon.total_cmp(&b.position.lon));
                } else {
                    elements.sort_by(|a, b| a.position.lat.total_cmp(&b.position.lat));
                }
                let median = elements.len() / 2;
                let pivot = elements[median];
                let (left, right_and_pivot) = elements.split_at_mut(median);
                let right = &mut right_and_pivot[1..];
                Some(Self {
                    pivot,
                    left: Self::build_impl(left, !lon_divides).map(Box::new),
                    right: Self::build_impl(right, !lon_divides).map(Box::new),
                })
            }
        }
    }
}

/// Inserts a candidate into a list sorted by (distance, id), keeping at most `k` best entries.
fn insert_candidate(best: &mut Vec<(Located, f64)>, k: usize, candidate: Located, dist: f64) {
    let idx = best.partition_point(|&(l, d)| match d.total_cmp(&dist) {
        std::cmp::Ordering::Less => true,
        std::cmp::Ordering::Equal => l.id < candidate.id,
        std::cmp::Ordering::Greater => false,
    });

    if idx < k {
        best.insert(idx, (candidate, dist));
        best.truncate(k);
    }
}

/// Lower bound of the distance from a position to any point on the other side of the
/// meridian at `meridian_lon`, in kilometers.
fn distance_to_meridian(lat: f64, lon: f64, meridian_lon: f64) -> f64 {
    let dlon = (lon - meridian_lon).abs();
    if dlon >= 90.0 {
        // Closest point on the meridian's great circle is across a pole
        // or on the opposite meridian - no useful bound.
        return 0.0;
    }

    let s = dlon.to_radians().sin() * lat.to_radians().cos();
    EARTH_RADIUS * s.abs().min(1.0).asin()
}
