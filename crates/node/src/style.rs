use palette::Srgb;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error parsing a colour string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid hex color {input:?}: {reason}")]
pub struct ColorError {
    pub input: String,
    pub reason: String,
}

/// An opaque sRGB colour, written as `#rrggbb`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Color(Srgb<u8>);

impl Color {
    pub const BLACK: Color = Color(Srgb::new(0, 0, 0));

    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self(Srgb::new(red, green, blue))
    }

    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        hex.trim()
            .parse::<Srgb<u8>>()
            .map(Self)
            .map_err(|e| ColorError {
                input: hex.to_string(),
                reason: e.to_string(),
            })
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0.red, self.0.green, self.0.blue)
    }

    pub fn srgb(&self) -> Srgb<u8> {
        self.0
    }
}

impl From<Srgb<u8>> for Color {
    fn from(value: Srgb<u8>) -> Self {
        Self(value)
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color({})", self.to_hex())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Fill style for a shape.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub color: Color,
    pub opacity: f32,
}

/// Stroke style for a shape.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
    pub opacity: f32,
}

impl Default for Stroke {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 1.0,
            opacity: 1.0,
        }
    }
}

/// How a shape is painted. Purely visual; never part of the aggregate.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub fill: Fill,
    pub stroke: Stroke,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: Fill {
                color: Color::BLACK,
                opacity: 0.0,
            },
            stroke: Stroke::default(),
        }
    }
}

impl Style {
    /// Copy of this style with every `Some` field of the patch applied.
    pub fn patched(&self, patch: &StylePatch) -> Style {
        let mut style = *self;
        if let Some(color) = patch.fill_color {
            style.fill.color = color;
        }
        if let Some(opacity) = patch.fill_opacity {
            style.fill.opacity = opacity;
        }
        if let Some(color) = patch.stroke_color {
            style.stroke.color = color;
        }
        if let Some(width) = patch.stroke_width {
            style.stroke.width = width;
        }
        if let Some(opacity) = patch.stroke_opacity {
            style.stroke.opacity = opacity;
        }
        style
    }
}

/// Partial style update. Unset fields keep the shape's current value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StylePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_opacity: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_opacity: Option<f32>,
}

impl StylePatch {
    pub fn with_fill_color(mut self, color: Color) -> Self {
        self.fill_color = Some(color);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parses_with_or_without_hash() {
        let forest = Color::from_hex("#2e7d32").unwrap();
        assert_eq!(forest, Color::rgb(0x2e, 0x7d, 0x32));
        assert_eq!(Color::from_hex("1565c0").unwrap(), Color::rgb(0x15, 0x65, 0xc0));
        assert_eq!(forest.to_hex(), "#2e7d32");
    }

    #[test]
    fn bad_hex_is_an_error() {
        let err = Color::from_hex("#12").unwrap_err();
        assert_eq!(err.input, "#12");
    }

    #[test]
    fn color_serializes_as_hex_string() {
        let json = serde_json::to_value(Color::rgb(255, 128, 0)).unwrap();
        assert_eq!(json, "#ff8000");
        let parsed: Color = serde_json::from_value(serde_json::json!("#BD0026")).unwrap();
        assert_eq!(parsed, Color::rgb(0xbd, 0x00, 0x26));
    }

    #[test]
    fn patch_only_touches_set_fields() {
        let base = Style::default();
        let patch = StylePatch {
            stroke_width: Some(6.0),
            fill_opacity: Some(0.2),
            ..Default::default()
        };
        let patched = base.patched(&patch);
        assert_eq!(patched.stroke.width, 6.0);
        assert_eq!(patched.fill.opacity, 0.2);
        assert_eq!(patched.fill.color, base.fill.color);
        assert_eq!(patched.stroke.color, base.stroke.color);
    }
}
