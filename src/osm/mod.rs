// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Reading and interpreting [OpenStreetMap](https://www.openstreetmap.org/) elements
//! in the [Overpass JSON](https://wiki.openstreetmap.org/wiki/OSM_JSON) format.

mod classify;
mod document;
mod highway;
mod model;

pub use classify::{classify, split_ways, Classified, WayBuckets};
pub use document::{
    read_elements_from_buffer, read_elements_from_file, read_elements_from_io, read_json_from_io,
    write_elements_to_file, write_elements_to_io, write_json_to_io, Document, FileFormat,
    RawElement,
};
pub use highway::{is_junction, Highway, WayKind};
pub use model::{ElementType, OsmNode, OsmWay};
