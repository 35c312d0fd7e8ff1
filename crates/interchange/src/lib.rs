//! GeoJSON interchange for the tagging workspace.
//!
//! Base layers arrive as GeoJSON feature collections and the classified
//! aggregate leaves as one. Only the parts of GeoJSON the workspace relies
//! on are modelled; geometry stays an opaque [`node::Geometry`].
//!
//! # Document Format
//!
//! ```json
//! {
//!   "type": "FeatureCollection",
//!   "features": [
//!     {
//!       "type": "Feature",
//!       "id": "6f1c2a9e-...",
//!       "geometry": { "type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]] },
//!       "properties": { "Class": 1, "Field": "North 12" }
//!     }
//!   ]
//! }
//! ```

mod file;

pub use file::{read_collection, write_collection};

use node::{Geometry, GeometryRecord};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

const COLLECTION_TYPE: &str = "FeatureCollection";
const FEATURE_TYPE: &str = "Feature";

/// Error type for interchange operations.
#[derive(Debug, Error)]
pub enum InterchangeError {
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid structure: {0}")]
    InvalidStructure(String),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// A GeoJSON feature.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type", default = "feature_type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
}

impl Feature {
    pub fn new(geometry: Option<Geometry>, properties: Map<String, Value>) -> Self {
        Self {
            kind: feature_type(),
            id: None,
            geometry,
            properties: Some(properties),
        }
    }

    pub fn with_id(mut self, id: impl Into<Value>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn into_record(self) -> GeometryRecord {
        GeometryRecord {
            geometry: self.geometry,
            properties: self.properties.unwrap_or_default(),
        }
    }
}

impl From<GeometryRecord> for Feature {
    fn from(record: GeometryRecord) -> Self {
        Self::new(record.geometry, record.properties)
    }
}

/// A GeoJSON feature collection. Feature order carries no meaning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type", default = "collection_type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

impl Default for FeatureCollection {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: collection_type(),
            features,
        }
    }

    /// Parse a collection, rejecting documents that are not feature collections.
    pub fn from_json(input: &str) -> Result<Self, InterchangeError> {
        let collection: FeatureCollection = serde_json::from_str(input)?;
        if collection.kind != COLLECTION_TYPE {
            return Err(InterchangeError::InvalidStructure(format!(
                "expected type \"{}\", found \"{}\"",
                COLLECTION_TYPE, collection.kind
            )));
        }
        if let Some(feature) = collection.features.iter().find(|f| f.kind != FEATURE_TYPE) {
            return Err(InterchangeError::InvalidStructure(format!(
                "expected feature of type \"{}\", found \"{}\"",
                FEATURE_TYPE, feature.kind
            )));
        }
        Ok(collection)
    }

    pub fn to_json_pretty(&self) -> Result<String, InterchangeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn into_records(self) -> Vec<GeometryRecord> {
        self.features.into_iter().map(Feature::into_record).collect()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl FromIterator<Feature> for FeatureCollection {
    fn from_iter<T: IntoIterator<Item = Feature>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

fn feature_type() -> String {
    FEATURE_TYPE.to_string()
}

fn collection_type() -> String {
    COLLECTION_TYPE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const LOTES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": { "type": "Polygon", "coordinates": [[[0, 0], [2, 0], [2, 2], [0, 0]]] },
                "properties": { "Class": 1, "Field": "A1", "Crop": "Soy" }
            },
            {
                "type": "Feature",
                "geometry": null,
                "properties": null
            }
        ]
    }"#;

    #[test]
    fn parses_base_layer_into_records() {
        let collection = FeatureCollection::from_json(LOTES).unwrap();
        assert_eq!(collection.len(), 2);

        let records = collection.into_records();
        assert_eq!(records[0].properties.get("Class"), Some(&json!(1)));
        assert!(records[0].extent().is_some());
        assert!(records[1].geometry.is_none());
        assert!(records[1].properties.is_empty());
    }

    #[test]
    fn rejects_non_collections() {
        let err = FeatureCollection::from_json(r#"{ "type": "Feature", "features": [] }"#)
            .unwrap_err();
        assert!(matches!(err, InterchangeError::InvalidStructure(_)));

        let err = FeatureCollection::from_json("not json").unwrap_err();
        assert!(matches!(err, InterchangeError::Parse(_)));
    }

    #[test]
    fn serializes_with_geojson_type_members() {
        let feature = Feature::new(
            Some(Geometry::polygon(&[[0.0, 0.0], [1.0, 1.0]])),
            Map::new(),
        )
        .with_id("abc");
        let json = serde_json::to_value(FeatureCollection::new(vec![feature])).unwrap();

        assert_eq!(json["type"], "FeatureCollection");
        assert_eq!(json["features"][0]["type"], "Feature");
        assert_eq!(json["features"][0]["id"], "abc");
        assert_eq!(json["features"][0]["geometry"]["type"], "Polygon");
    }
}
