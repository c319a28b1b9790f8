// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::io;

/// Fatal error conditions, which may only occur when reading or writing data.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Problem with the input data, which causes a part of it to be skipped.
///
/// None of the issues stop graph construction - they are collected in a [Report],
/// so that callers can audit what data was lost.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Issue {
    /// An element with a `type` other than "node" or "way".
    #[error("element {id}: unrecognized type {type_:?}")]
    UnknownElementType { id: i64, type_: String },

    /// A node without a finite position.
    #[error("node {0}: missing or invalid position")]
    InvalidNode(i64),

    /// A way without a recognized `highway` tag.
    #[error("way {way}: unrecognized highway={}", .value.as_deref().unwrap_or("<none>"))]
    UnknownHighway { way: i64, value: Option<String> },

    /// A way references a node which does not exist.
    #[error("way {way}: reference to unknown node {node}")]
    DanglingReference { way: i64, node: i64 },

    /// An area way without any resolvable node.
    #[error("way {way}: area has no nodes")]
    DegenerateArea { way: i64 },

    /// All candidate nodes for a station are already claimed by other stations.
    #[error("station {station}: no unclaimed node among {depth} nearest")]
    SnapExhausted { station: i64, depth: usize },

    /// An edge longer than the allowed maximum.
    #[error("edge {from}-{to}: length {length:.3} km exceeds the limit")]
    EdgeTooLong { from: i64, to: i64, length: f64 },

    /// A node or a station too far away from the reference point.
    #[error("{id}: {distance:.1} km away from the reference point")]
    OutOfRange { id: i64, distance: f64 },

    /// A station without any other station in range.
    #[error("station {0}: no other station in range")]
    Isolated(i64),
}

/// Broad category of an [Issue].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueKind {
    Classification,
    DanglingReference,
    SnapExhaustion,
    DegenerateInput,
    Filtered,
}

impl Issue {
    pub fn kind(&self) -> IssueKind {
        match self {
            Self::UnknownElementType { .. } | Self::InvalidNode(_) | Self::UnknownHighway { .. } => {
                IssueKind::Classification
            }
            Self::DanglingReference { .. } => IssueKind::DanglingReference,
            Self::DegenerateArea { .. } => IssueKind::DegenerateInput,
            Self::SnapExhausted { .. } => IssueKind::SnapExhaustion,
            Self::EdgeTooLong { .. } | Self::OutOfRange { .. } | Self::Isolated(_) => {
                IssueKind::Filtered
            }
        }
    }
}

/// Collection of [Issues](Issue) encountered while building a graph.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Report {
    issues: Vec<Issue>,
}

impl Report {
    /// Logs and stores an issue. Filtered-out data is logged at the debug level,
    /// everything else is a warning.
    pub fn push(&mut self, issue: Issue) {
        match issue.kind() {
            IssueKind::Filtered => log::debug!("{}", issue),
            _ => log::warn!("{}", issue),
        }
        self.issues.push(issue);
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter()
    }

    /// Returns the number of issues of the given kind.
    pub fn count(&self, kind: IssueKind) -> usize {
        self.issues.iter().filter(|i| i.kind() == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_counts_by_kind() {
        let mut r = Report::default();
        r.push(Issue::InvalidNode(1));
        r.push(Issue::DanglingReference { way: 2, node: 3 });
        r.push(Issue::UnknownHighway {
            way: 4,
            value: Some("primary".to_string()),
        });

        assert_eq!(r.len(), 3);
        assert_eq!(r.count(IssueKind::Classification), 2);
        assert_eq!(r.count(IssueKind::DanglingReference), 1);
        assert_eq!(r.count(IssueKind::SnapExhaustion), 0);
    }

    #[test]
    fn issue_messages() {
        assert_eq!(
            Issue::UnknownHighway { way: 7, value: None }.to_string(),
            "way 7: unrecognized highway=<none>"
        );
        assert_eq!(
            Issue::EdgeTooLong {
                from: 1,
                to: 2,
                length: 65.0
            }
            .to_string(),
            "edge 1-2: length 65.000 km exceeds the limit"
        );
    }
}
