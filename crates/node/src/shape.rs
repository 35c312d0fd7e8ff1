use crate::{Extent, Geometry, GeometryRecord, ShapeId, Style};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A shape as rendered on a surface, captured at one point in time.
///
/// Snapshots are cheap to clone and never alias the surface's own storage,
/// so an edit on the surface after the snapshot was taken is not observed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub id: ShapeId,
    pub geometry: Option<Geometry>,
    /// Properties of the source feature the shape was built from.
    #[serde(default)]
    pub properties: Map<String, Value>,
    pub style: Style,
    /// Permanent label text, when the surface shows one for this shape.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Shape {
    /// Build a shape from a record with a freshly issued identity.
    pub fn from_record(record: GeometryRecord, style: Style) -> Self {
        Self {
            id: ShapeId::new(),
            geometry: record.geometry,
            properties: record.properties,
            style,
            label: None,
        }
    }

    pub fn identity(&self) -> ShapeId {
        self.id
    }

    /// Numeric class bucket stored under `key` in the source properties.
    ///
    /// Accepts integers, integral floats and numeric strings, since base
    /// layers exported by different tools disagree on the encoding.
    pub fn class_attribute(&self, key: &str) -> Option<i64> {
        match self.properties.get(key)? {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// String rendering of a property, for labels.
    pub fn property_text(&self, key: &str) -> Option<String> {
        match self.properties.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    pub fn extent(&self) -> Option<Extent> {
        self.geometry.as_ref().and_then(Geometry::extent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn shape_with(class: Value) -> Shape {
        let record = GeometryRecord::new(Geometry::polygon(&[[0.0, 0.0], [1.0, 1.0]]))
            .with_property("Class", class)
            .with_property("Field", "North 12");
        Shape::from_record(record, Style::default())
    }

    #[test]
    fn class_attribute_accepts_common_encodings() {
        assert_eq!(shape_with(json!(4)).class_attribute("Class"), Some(4));
        assert_eq!(shape_with(json!(6.0)).class_attribute("Class"), Some(6));
        assert_eq!(shape_with(json!(" 7 ")).class_attribute("Class"), Some(7));
        assert_eq!(shape_with(json!(2.5)).class_attribute("Class"), None);
        assert_eq!(shape_with(json!(null)).class_attribute("Class"), None);
        assert_eq!(shape_with(json!(1)).class_attribute("Missing"), None);
    }

    #[test]
    fn property_text_renders_strings_and_numbers() {
        let shape = shape_with(json!(1));
        assert_eq!(shape.property_text("Field").as_deref(), Some("North 12"));
        assert_eq!(shape.property_text("Class").as_deref(), Some("1"));
        assert_eq!(shape_with(json!(null)).property_text("Class"), None);
    }
}
