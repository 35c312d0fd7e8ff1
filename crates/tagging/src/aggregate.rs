//! The deduplicated collection of classified features.

use interchange::{Feature, FeatureCollection};
use node::{Geometry, ShapeId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Classification metadata carried by an aggregate feature.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureProperties {
    pub classification_type_id: String,
    pub classification_type_name: String,
    pub option_id: String,
    pub option_display_value: String,
    pub note: String,
}

impl FeatureProperties {
    /// Flat GeoJSON properties object.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert(
            "classificationTypeId".into(),
            self.classification_type_id.clone().into(),
        );
        map.insert(
            "classificationTypeName".into(),
            self.classification_type_name.clone().into(),
        );
        map.insert("optionId".into(), self.option_id.clone().into());
        map.insert(
            "optionDisplayValue".into(),
            self.option_display_value.clone().into(),
        );
        map.insert("note".into(), self.note.clone().into());
        map
    }
}

/// One classified shape. Geometry is the snapshot taken when the shape was
/// first classified.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AggregateFeature {
    pub id: ShapeId,
    pub geometry: Option<Geometry>,
    pub properties: FeatureProperties,
}

impl AggregateFeature {
    pub fn to_feature(&self) -> Feature {
        Feature::new(self.geometry.clone(), self.properties.to_map())
            .with_id(self.id.to_uuid_string())
    }
}

/// Whether a merge added a feature or rewrote an existing one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergeOutcome {
    Inserted,
    Replaced,
}

/// Classified features keyed by shape identity.
///
/// Holds at most one feature per identity: merging an identity that is
/// already present rewrites its properties in place.
#[derive(Clone, Debug, Default)]
pub struct Aggregate {
    features: Vec<AggregateFeature>,
    index: HashMap<ShapeId, usize>,
}

impl Aggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the feature for `id`.
    ///
    /// `geometry` is only evaluated on insert; a replace keeps the snapshot
    /// taken the first time.
    pub fn merge(
        &mut self,
        id: ShapeId,
        geometry: impl FnOnce() -> Option<Geometry>,
        properties: FeatureProperties,
    ) -> MergeOutcome {
        match self.index.get(&id) {
            Some(&pos) => {
                self.features[pos].properties = properties;
                MergeOutcome::Replaced
            }
            None => {
                self.index.insert(id, self.features.len());
                self.features.push(AggregateFeature {
                    id,
                    geometry: geometry(),
                    properties,
                });
                MergeOutcome::Inserted
            }
        }
    }

    /// Keep only features whose identity is still rendered. Returns how many
    /// were dropped.
    pub fn retain_rendered(&mut self, mut is_rendered: impl FnMut(ShapeId) -> bool) -> usize {
        let before = self.features.len();
        self.features.retain(|f| is_rendered(f.id));
        if self.features.len() != before {
            self.reindex();
        }
        before - self.features.len()
    }

    fn reindex(&mut self) {
        self.index = self
            .features
            .iter()
            .enumerate()
            .map(|(pos, f)| (f.id, pos))
            .collect();
    }

    pub fn get(&self, id: ShapeId) -> Option<&AggregateFeature> {
        self.index.get(&id).map(|&pos| &self.features[pos])
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AggregateFeature> {
        self.features.iter()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Snapshot as a GeoJSON feature collection.
    pub fn to_collection(&self) -> FeatureCollection {
        self.features.iter().map(AggregateFeature::to_feature).collect()
    }
}
