// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::Error;

mod json;

pub use json::{Document, RawElement};

/// Format of an input or output JSON file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Unknown format - guess the format based on the content (when reading)
    /// or on the file extension (when writing)
    Unknown,

    /// Force uncompressed JSON
    Json,

    /// Force JSON with [gzip](https://en.wikipedia.org/wiki/Gzip) compression
    JsonGz,

    /// Force JSON with [bzip2](https://en.wikipedia.org/wiki/Bzip2) compression
    JsonBz2,
}

impl FileFormat {
    /// Guesses the format from the extension of a file.
    /// Returns [FileFormat::Unknown] if the extension is not recognized.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path.as_ref().extension().and_then(|e| e.to_str()) {
            Some("gz") => Self::JsonGz,
            Some("bz2") => Self::JsonBz2,
            Some("json") | Some("geojson") => Self::Json,
            _ => Self::Unknown,
        }
    }

    /// Guesses the format from the first bytes of a file.
    fn from_magic(prefix: &[u8]) -> Self {
        if prefix.starts_with(&[0x1f, 0x8b]) {
            Self::JsonGz
        } else if prefix.starts_with(b"BZh") {
            Self::JsonBz2
        } else {
            Self::Json
        }
    }
}

/// Parse any JSON value from a reader, decompressing it as per the provided [FileFormat].
///
/// The provided stream will be automatically wrapped in a buffered reader.
pub fn read_json_from_io<T: DeserializeOwned, R: io::Read>(
    reader: R,
    format: FileFormat,
) -> Result<T, Error> {
    let mut b = io::BufReader::new(reader);

    let format = if format == FileFormat::Unknown {
        FileFormat::from_magic(b.fill_buf()?)
    } else {
        format
    };

    let value = match format {
        FileFormat::Unknown | FileFormat::Json => serde_json::from_reader(b)?,

        FileFormat::JsonGz => {
            let d = flate2::read::MultiGzDecoder::new(b);
            serde_json::from_reader(io::BufReader::new(d))?
        }

        FileFormat::JsonBz2 => {
            let d = bzip2::read::MultiBzDecoder::new(b);
            serde_json::from_reader(io::BufReader::new(d))?
        }
    };
    Ok(value)
}

/// Serialize any value as JSON into a writer, compressing it as per the provided [FileFormat].
/// [FileFormat::Unknown] results in uncompressed output.
pub fn write_json_to_io<T: Serialize, W: io::Write>(
    value: &T,
    writer: W,
    format: FileFormat,
) -> Result<(), Error> {
    match format {
        FileFormat::Unknown | FileFormat::Json => {
            let mut b = io::BufWriter::new(writer);
            serde_json::to_writer(&mut b, value)?;
            io::Write::flush(&mut b)?;
        }

        FileFormat::JsonGz => {
            let mut e = flate2::write::GzEncoder::new(writer, flate2::Compression::default());
            serde_json::to_writer(&mut e, value)?;
            e.finish()?;
        }

        FileFormat::JsonBz2 => {
            let mut e = bzip2::write::BzEncoder::new(writer, bzip2::Compression::default());
            serde_json::to_writer(&mut e, value)?;
            e.finish()?;
        }
    }
    Ok(())
}

/// Parse OSM elements from a reader as per the provided [FileFormat].
pub fn read_elements_from_io<R: io::Read>(
    reader: R,
    format: FileFormat,
) -> Result<Vec<RawElement>, Error> {
    let d: Document = read_json_from_io(reader, format)?;
    Ok(d.elements)
}

/// Parse OSM elements from a file at the provided path.
pub fn read_elements_from_file<P: AsRef<Path>>(
    path: P,
    format: FileFormat,
) -> Result<Vec<RawElement>, Error> {
    let f = File::open(path)?;
    read_elements_from_io(f, format)
}

/// Parse OSM elements from an in-memory buffer.
pub fn read_elements_from_buffer(data: &[u8], format: FileFormat) -> Result<Vec<RawElement>, Error> {
    match format {
        // Fast path is available for uncompressed in-memory data
        FileFormat::Json => Ok(serde_json::from_slice::<Document>(data)?.elements),
        _ => read_elements_from_io(io::Cursor::new(data), format),
    }
}

/// Write OSM elements as a [Document] into a writer.
pub fn write_elements_to_io<W: io::Write>(
    elements: &[RawElement],
    writer: W,
    format: FileFormat,
) -> Result<(), Error> {
    #[derive(Serialize)]
    struct DocumentRef<'a> {
        elements: &'a [RawElement],
    }

    write_json_to_io(&DocumentRef { elements }, writer, format)
}

/// Write OSM elements as a [Document] into a file at the provided path.
/// [FileFormat::Unknown] is resolved with [FileFormat::from_path].
pub fn write_elements_to_file<P: AsRef<Path>>(
    elements: &[RawElement],
    path: P,
    format: FileFormat,
) -> Result<(), Error> {
    let format = if format == FileFormat::Unknown {
        FileFormat::from_path(&path)
    } else {
        format
    };
    let f = File::create(path)?;
    write_elements_to_io(elements, f, format)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE_JSON: &[u8] = include_bytes!("test_fixtures/simple.json");
    const SIMPLE_JSON_GZ: &[u8] = include_bytes!("test_fixtures/simple.json.gz");
    const SIMPLE_JSON_BZ2: &[u8] = include_bytes!("test_fixtures/simple.json.bz2");

    fn check_simple_elements(elements: &[RawElement]) {
        assert_eq!(elements.len(), 8);
        assert_eq!(elements[0], RawElement::node(-1, 44.0, -0.5));
        assert_eq!(
            elements[5],
            RawElement::way(-101, vec![-1, -2, -3, -1]).with_tag("highway", "services")
        );
        assert_eq!(elements[7].type_, "relation");
    }

    #[test]
    fn format_from_path() {
        assert_eq!(FileFormat::from_path("a/b.json"), FileFormat::Json);
        assert_eq!(FileFormat::from_path("a/b.json.gz"), FileFormat::JsonGz);
        assert_eq!(FileFormat::from_path("b.json.bz2"), FileFormat::JsonBz2);
        assert_eq!(FileFormat::from_path("graph.geojson"), FileFormat::Json);
        assert_eq!(FileFormat::from_path("b.osm"), FileFormat::Unknown);
    }

    #[test]
    fn read_plain() {
        check_simple_elements(&read_elements_from_buffer(SIMPLE_JSON, FileFormat::Json).unwrap());
        check_simple_elements(&read_elements_from_buffer(SIMPLE_JSON, FileFormat::Unknown).unwrap());
    }

    #[test]
    fn read_gz() {
        check_simple_elements(&read_elements_from_buffer(SIMPLE_JSON_GZ, FileFormat::JsonGz).unwrap());
        check_simple_elements(&read_elements_from_buffer(SIMPLE_JSON_GZ, FileFormat::Unknown).unwrap());
    }

    #[test]
    fn read_bz2() {
        check_simple_elements(&read_elements_from_buffer(SIMPLE_JSON_BZ2, FileFormat::JsonBz2).unwrap());
        check_simple_elements(&read_elements_from_buffer(SIMPLE_JSON_BZ2, FileFormat::Unknown).unwrap());
    }

    #[test]
    fn read_invalid() {
        assert!(matches!(
            read_elements_from_buffer(b"{\"elements\": 5}", FileFormat::Json),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn write_and_read_file() {
        let elements = read_elements_from_buffer(SIMPLE_JSON, FileFormat::Json).unwrap();
        let dir = tempfile::tempdir().unwrap();

        for name in ["out.json", "out.json.gz", "out.json.bz2"] {
            let path = dir.path().join(name);
            write_elements_to_file(&elements, &path, FileFormat::Unknown).unwrap();
            let read_back = read_elements_from_file(&path, FileFormat::Unknown).unwrap();
            assert_eq!(read_back, elements, "{}", name);
        }

        // Compressed output must actually be compressed
        let gz = std::fs::read(dir.path().join("out.json.gz")).unwrap();
        assert_eq!(&gz[..2], &[0x1f, 0x8b]);
    }
}
