//! Classification rows and the merge of chosen options into the aggregate.

use crate::{
    Aggregate, BucketRule, FeatureProperties, MergeOutcome, WorkspaceError,
};
use canvas::Surface;
use node::{Color, Shape, ShapeId, StylePatch};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Fixed set of classification buckets, from lowest to highest.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Bucket {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl Bucket {
    /// Class attribute value the bucket targets unless configured otherwise.
    pub fn default_match_class(self) -> i64 {
        match self {
            Bucket::VeryLow => 1,
            Bucket::Low => 2,
            Bucket::Medium => 4,
            Bucket::High => 6,
            Bucket::VeryHigh => 7,
        }
    }
}

/// One entry of a classification vocabulary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyOption {
    pub id: String,
    #[serde(alias = "value")]
    pub display_value: String,
    pub color: Color,
}

/// A classification vocabulary, e.g. the environment types of a field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassificationType {
    pub id: String,
    pub name: String,
    #[serde(default, alias = "properties")]
    pub options: Vec<VocabularyOption>,
}

impl ClassificationType {
    pub fn option(&self, id: &str) -> Option<&VocabularyOption> {
        self.options.iter().find(|o| o.id == id)
    }
}

/// One row of the assignment table. A bucket has exactly one row, which
/// may match several class values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRow {
    pub bucket: Bucket,
    pub match_classes: Vec<i64>,
    pub selected: Option<VocabularyOption>,
    /// Swatch colour; follows the selected option.
    pub color: Color,
}

impl ClassificationRow {
    pub fn new(bucket: Bucket, match_classes: Vec<i64>) -> Self {
        Self {
            bucket,
            match_classes,
            selected: None,
            color: Color::BLACK,
        }
    }

    /// One row per bucket, in first-seen order. Rules naming the same
    /// bucket fold their classes into its row.
    pub fn from_rules(rules: &[BucketRule]) -> Vec<ClassificationRow> {
        let mut rows: Vec<ClassificationRow> = Vec::new();
        for rule in rules {
            match rows.iter_mut().find(|r| r.bucket == rule.bucket) {
                Some(row) if row.match_classes.contains(&rule.match_class) => {}
                Some(row) => row.match_classes.push(rule.match_class),
                None => rows.push(ClassificationRow::new(rule.bucket, vec![rule.match_class])),
            }
        }
        rows
    }

    pub fn matches(&self, shape: &Shape, class_property: &str) -> bool {
        shape
            .class_attribute(class_property)
            .is_some_and(|class| self.match_classes.contains(&class))
    }
}

/// What one classification did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassificationOutcome {
    pub inserted: Vec<ShapeId>,
    pub replaced: Vec<ShapeId>,
}

impl ClassificationOutcome {
    pub fn affected(&self) -> impl Iterator<Item = ShapeId> + '_ {
        self.inserted.iter().chain(self.replaced.iter()).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.replaced.is_empty()
    }
}

/// An open classification over one vector layer group.
#[derive(Clone, Debug)]
pub struct ClassificationSession {
    classification: ClassificationType,
    group: String,
    rows: Vec<ClassificationRow>,
    aggregate: Aggregate,
}

impl ClassificationSession {
    pub fn new(
        classification: ClassificationType,
        group: impl Into<String>,
        rules: &[BucketRule],
    ) -> Self {
        Self {
            classification,
            group: group.into(),
            rows: ClassificationRow::from_rules(rules),
            aggregate: Aggregate::new(),
        }
    }

    pub fn classification(&self) -> &ClassificationType {
        &self.classification
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn rows(&self) -> &[ClassificationRow] {
        &self.rows
    }

    pub fn row(&self, bucket: Bucket) -> Option<&ClassificationRow> {
        self.rows.iter().find(|r| r.bucket == bucket)
    }

    pub fn aggregate(&self) -> &Aggregate {
        &self.aggregate
    }

    pub(crate) fn aggregate_mut(&mut self) -> &mut Aggregate {
        &mut self.aggregate
    }

    /// Look up a vocabulary option by id.
    pub fn option(&self, id: &str) -> Result<VocabularyOption, WorkspaceError> {
        self.classification
            .option(id)
            .cloned()
            .ok_or_else(|| WorkspaceError::UnknownOption(id.to_string()))
    }

    /// Assign `option` to `bucket` and merge every affected shape into the
    /// aggregate.
    ///
    /// `affected` must be the shapes whose class attribute matches the
    /// bucket. Shapes already in the aggregate keep their geometry snapshot
    /// and only have their properties rewritten. Every affected shape is
    /// restyled with `classified` and the option's colour.
    pub fn apply_classification(
        &mut self,
        bucket: Bucket,
        option: VocabularyOption,
        affected: &[Shape],
        surface: &mut dyn Surface,
        classified: &StylePatch,
    ) -> Result<ClassificationOutcome, WorkspaceError> {
        let row = self
            .rows
            .iter_mut()
            .find(|r| r.bucket == bucket)
            .ok_or(WorkspaceError::UnknownBucket(bucket))?;
        row.color = option.color;
        row.selected = Some(option.clone());

        if affected.is_empty() {
            log::debug!("bucket {} matched no shapes", bucket);
        }

        let style = classified.with_fill_color(option.color);
        let mut outcome = ClassificationOutcome::default();
        for shape in affected {
            let properties = FeatureProperties {
                classification_type_id: self.classification.id.clone(),
                classification_type_name: self.classification.name.clone(),
                option_id: option.id.clone(),
                option_display_value: option.display_value.clone(),
                note: String::new(),
            };
            match self
                .aggregate
                .merge(shape.id, || shape.geometry.clone(), properties)
            {
                MergeOutcome::Inserted => outcome.inserted.push(shape.id),
                MergeOutcome::Replaced => outcome.replaced.push(shape.id),
            }
            if !surface.patch_style(shape.id, &style) {
                log::warn!("classified shape {} is no longer on the surface", shape.id);
            }
        }

        log::info!(
            "bucket {} -> {:?}: {} inserted, {} replaced, {} total",
            bucket,
            option.id,
            outcome.inserted.len(),
            outcome.replaced.len(),
            self.aggregate.len()
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WorkspaceConfig;
    use canvas::MemorySurface;
    use node::{Geometry, GeometryRecord};
    use std::str::FromStr;

    fn soil() -> ClassificationType {
        ClassificationType {
            id: "t-1".into(),
            name: "Soil".into(),
            options: vec![
                VocabularyOption {
                    id: "opt-3".into(),
                    display_value: "Forest".into(),
                    color: Color::from_hex("#2e7d32").unwrap(),
                },
                VocabularyOption {
                    id: "opt-9".into(),
                    display_value: "Wetland".into(),
                    color: Color::from_hex("#1565c0").unwrap(),
                },
            ],
        }
    }

    fn add(surface: &mut MemorySurface, class: i64) -> Shape {
        let record = GeometryRecord::new(Geometry::polygon(&[[0.0, 0.0], [1.0, 1.0]]))
            .with_property("Class", class);
        let id = surface.add_shape(record, Default::default());
        surface.shape(id).unwrap()
    }

    #[test]
    fn bucket_names_are_kebab_case() {
        assert_eq!(Bucket::VeryLow.to_string(), "very-low");
        assert_eq!(Bucket::from_str("very-high").unwrap(), Bucket::VeryHigh);
        assert_eq!(serde_json::to_value(Bucket::Medium).unwrap(), "medium");
    }

    #[test]
    fn vocabulary_accepts_value_alias() {
        let option: VocabularyOption = serde_json::from_value(serde_json::json!({
            "id": "opt-1", "value": "Pasture", "color": "#aabbcc"
        }))
        .unwrap();
        assert_eq!(option.display_value, "Pasture");
    }

    #[test]
    fn reassigning_bucket_never_duplicates() {
        let config = WorkspaceConfig::default();
        let mut surface = MemorySurface::new();
        let shapes = vec![add(&mut surface, 1), add(&mut surface, 1)];
        let mut session = ClassificationSession::new(soil(), "base", &config.buckets);

        for _ in 0..3 {
            for id in ["opt-3", "opt-9"] {
                let option = session.option(id).unwrap();
                session
                    .apply_classification(Bucket::VeryLow, option, &shapes, &mut surface, &config.classified)
                    .unwrap();
            }
        }

        assert_eq!(session.aggregate().len(), 2);
        for shape in &shapes {
            let feature = session.aggregate().get(shape.id).unwrap();
            assert_eq!(feature.properties.option_id, "opt-9");
            let style = surface.shape(shape.id).unwrap().style;
            assert_eq!(style.fill.color, Color::from_hex("#1565c0").unwrap());
            assert_eq!(style.fill.opacity, 1.0);
            assert_eq!(style.stroke.color, Color::BLACK);
        }
    }

    #[test]
    fn empty_affected_set_only_updates_row() {
        let config = WorkspaceConfig::default();
        let mut surface = MemorySurface::new();
        let mut session = ClassificationSession::new(soil(), "base", &config.buckets);
        let option = session.option("opt-3").unwrap();

        let outcome = session
            .apply_classification(Bucket::High, option.clone(), &[], &mut surface, &config.classified)
            .unwrap();

        assert!(outcome.is_empty());
        assert!(session.aggregate().is_empty());
        let row = session.row(Bucket::High).unwrap();
        assert_eq!(row.selected.as_ref(), Some(&option));
        assert_eq!(row.color, option.color);
    }

    #[test]
    fn unknown_option_and_bucket_are_errors() {
        let mut surface = MemorySurface::new();
        let rules = [BucketRule {
            bucket: Bucket::Low,
            match_class: 2,
        }];
        let mut session = ClassificationSession::new(soil(), "base", &rules);

        assert!(matches!(
            session.option("nope"),
            Err(WorkspaceError::UnknownOption(id)) if id == "nope"
        ));

        let option = session.option("opt-3").unwrap();
        let err = session
            .apply_classification(Bucket::VeryHigh, option, &[], &mut surface, &StylePatch::default())
            .unwrap_err();
        assert!(matches!(err, WorkspaceError::UnknownBucket(Bucket::VeryHigh)));
    }

    #[test]
    fn rows_match_on_class_attribute() {
        let mut surface = MemorySurface::new();
        let shape = add(&mut surface, 4);
        let row = ClassificationRow::new(Bucket::Medium, vec![4]);
        assert!(row.matches(&shape, "Class"));
        assert!(!row.matches(&shape, "Other"));
    }

    #[test]
    fn rules_for_one_bucket_share_a_row() {
        let rules = [
            BucketRule {
                bucket: Bucket::VeryLow,
                match_class: 1,
            },
            BucketRule {
                bucket: Bucket::Low,
                match_class: 2,
            },
            BucketRule {
                bucket: Bucket::VeryLow,
                match_class: 3,
            },
            BucketRule {
                bucket: Bucket::VeryLow,
                match_class: 1,
            },
        ];
        let rows = ClassificationRow::from_rules(&rules);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].bucket, Bucket::VeryLow);
        assert_eq!(rows[0].match_classes, vec![1, 3]);
        assert_eq!(rows[1].match_classes, vec![2]);
    }
}
