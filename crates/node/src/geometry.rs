//! Geometry payloads and their planar extent.
//!
//! The engine never interprets geometry beyond its bounding box. A
//! [`Geometry`] is a GeoJSON geometry object kept as-is; [`Geometry::extent`]
//! walks its coordinate arrays to find the box the viewport should fit.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Axis-aligned bounding box in surface coordinates (lon/lat for maps).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub min: DVec2,
    pub max: DVec2,
}

impl Extent {
    pub fn new(min: DVec2, max: DVec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn from_point(point: DVec2) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Grow to include a point.
    pub fn include(&mut self, point: DVec2) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Smallest extent covering both.
    pub fn union(self, other: Extent) -> Extent {
        Extent {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Union of every extent in the iterator, `None` when it is empty.
    pub fn union_all(extents: impl IntoIterator<Item = Extent>) -> Option<Extent> {
        extents.into_iter().reduce(Extent::union)
    }

    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> DVec2 {
        self.max - self.min
    }
}

/// A GeoJSON geometry object, opaque to the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Geometry(Value);

impl Geometry {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Convenience constructor for a single-ring polygon.
    pub fn polygon(ring: &[[f64; 2]]) -> Self {
        Self(serde_json::json!({
            "type": "Polygon",
            "coordinates": [ring],
        }))
    }

    /// The GeoJSON `type` member, if present.
    pub fn kind(&self) -> Option<&str> {
        self.0.get("type").and_then(Value::as_str)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Bounding box of every position in the geometry.
    ///
    /// Returns `None` for geometries without positions (empty collections,
    /// null geometry).
    pub fn extent(&self) -> Option<Extent> {
        let mut extent = None;
        collect_extent(&self.0, &mut extent);
        extent
    }
}

fn collect_extent(value: &Value, extent: &mut Option<Extent>) {
    if let Some(geometries) = value.get("geometries").and_then(Value::as_array) {
        for geometry in geometries {
            collect_extent(geometry, extent);
        }
    }
    if let Some(coordinates) = value.get("coordinates") {
        collect_positions(coordinates, extent);
    }
}

fn collect_positions(value: &Value, extent: &mut Option<Extent>) {
    let Some(items) = value.as_array() else {
        return;
    };
    if let Some(point) = as_position(items) {
        match extent {
            Some(extent) => extent.include(point),
            None => *extent = Some(Extent::from_point(point)),
        }
        return;
    }
    for item in items {
        collect_positions(item, extent);
    }
}

fn as_position(items: &[Value]) -> Option<DVec2> {
    match items {
        [x, y, ..] => Some(DVec2::new(x.as_f64()?, y.as_f64()?)),
        _ => None,
    }
}

/// One entry of a geometry batch: a geometry plus its source properties.
///
/// This is what the surface receives when shapes are created, and what it
/// hands back when a shape is snapshotted.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GeometryRecord {
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl GeometryRecord {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry: Some(geometry),
            properties: Map::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn extent(&self) -> Option<Extent> {
        self.geometry.as_ref().and_then(Geometry::extent)
    }
}
