//! Reading and writing collections on disk.

use crate::{FeatureCollection, InterchangeError};
use std::fs;
use std::path::Path;

/// Read a GeoJSON feature collection from a file.
pub fn read_collection(path: impl AsRef<Path>) -> Result<FeatureCollection, InterchangeError> {
    let path = path.as_ref();
    let input = fs::read_to_string(path).map_err(|source| InterchangeError::Io {
        path: path.display().to_string(),
        source,
    })?;
    FeatureCollection::from_json(&input)
}

/// Write a collection as pretty-printed GeoJSON.
pub fn write_collection(
    path: impl AsRef<Path>,
    collection: &FeatureCollection,
) -> Result<(), InterchangeError> {
    let path = path.as_ref();
    let output = collection.to_json_pretty()?;
    fs::write(path, output).map_err(|source| InterchangeError::Io {
        path: path.display().to_string(),
        source,
    })
}
