use canvas::{MemorySurface, Surface};
use node::{Color, Geometry, GeometryRecord, ShapeId};
use serde_json::json;
use tagging::{
    Bucket, ClassificationType, EditOperation, EditToolState, SelectionChange, Workspace,
    WorkspaceConfig, WorkspaceError, WorkspaceEvent,
};

fn square(x: f64, class: i64) -> GeometryRecord {
    GeometryRecord::new(Geometry::polygon(&[
        [x, 0.0],
        [x + 1.0, 0.0],
        [x + 1.0, 1.0],
        [x, 1.0],
        [x, 0.0],
    ]))
    .with_property("Class", class)
}

fn environments() -> ClassificationType {
    serde_json::from_value(json!({
        "id": "env",
        "name": "Environment",
        "options": [
            { "id": "opt-3", "displayValue": "Forest", "color": "#2e7d32" },
            { "id": "opt-9", "displayValue": "Wetland", "color": "#1565c0" }
        ]
    }))
    .unwrap()
}

fn loaded() -> (Workspace<MemorySurface>, Vec<ShapeId>) {
    let mut ws = Workspace::new(MemorySurface::new(), WorkspaceConfig::default());
    let ids = ws
        .load_base_geometry("lotes", vec![square(0.0, 1), square(2.0, 1), square(4.0, 4)])
        .unwrap();
    (ws, ids)
}

fn option_ids(ws: &Workspace<MemorySurface>) -> Vec<String> {
    ws.export_aggregate()
        .features
        .iter()
        .map(|f| {
            f.properties.as_ref().unwrap()["optionId"]
                .as_str()
                .unwrap()
                .to_string()
        })
        .collect()
}

#[test]
fn reassigning_a_bucket_keeps_one_feature_per_shape() {
    let (mut ws, ids) = loaded();
    ws.begin_classification(environments(), "lotes").unwrap();

    let first = ws.assign(Bucket::VeryLow, "opt-3").unwrap();
    assert_eq!(first.inserted, vec![ids[0], ids[1]]);
    assert_eq!(option_ids(&ws), vec!["opt-3", "opt-3"]);

    for _ in 0..3 {
        let again = ws.assign(Bucket::VeryLow, "opt-9").unwrap();
        assert!(again.inserted.is_empty());
        assert_eq!(again.replaced.len(), 2);
    }

    assert_eq!(ws.export_aggregate().len(), 2);
    assert_eq!(option_ids(&ws), vec!["opt-9", "opt-9"]);
    let wetland = Color::from_hex("#1565c0").unwrap();
    for id in &ids[..2] {
        assert_eq!(ws.surface().shape(*id).unwrap().style.fill.color, wetland);
    }
    assert_ne!(ws.surface().shape(ids[2]).unwrap().style.fill.color, wetland);

    let row = ws.session().unwrap().row(Bucket::VeryLow).unwrap();
    assert_eq!(row.color, wetland);
}

#[test]
fn exported_features_carry_classification_properties() {
    let (mut ws, ids) = loaded();
    ws.begin_classification(environments(), "lotes").unwrap();
    ws.assign(Bucket::Medium, "opt-3").unwrap();

    let collection = ws.export_aggregate();
    assert_eq!(collection.len(), 1);
    let feature = &collection.features[0];
    assert_eq!(feature.id, Some(json!(ids[2].to_uuid_string())));
    assert_eq!(
        serde_json::Value::Object(feature.properties.clone().unwrap()),
        json!({
            "classificationTypeId": "env",
            "classificationTypeName": "Environment",
            "optionId": "opt-3",
            "optionDisplayValue": "Forest",
            "note": ""
        })
    );
}

#[test]
fn empty_bucket_still_records_the_choice() {
    let (mut ws, _) = loaded();
    ws.begin_classification(environments(), "lotes").unwrap();
    ws.drain_events();

    let outcome = ws.assign(Bucket::VeryHigh, "opt-9").unwrap();
    assert!(outcome.is_empty());
    assert!(ws.export_aggregate().is_empty());
    let row = ws.session().unwrap().row(Bucket::VeryHigh).unwrap();
    assert_eq!(row.selected.as_ref().map(|o| o.id.as_str()), Some("opt-9"));
    assert!(ws.drain_events().is_empty());
}

#[test]
fn classification_requires_a_session_and_known_option() {
    let (mut ws, _) = loaded();
    assert!(matches!(
        ws.assign(Bucket::Low, "opt-3"),
        Err(WorkspaceError::NoClassificationSession)
    ));

    ws.begin_classification(environments(), "lotes").unwrap();
    assert!(matches!(
        ws.begin_classification(environments(), "lotes"),
        Err(WorkspaceError::ClassificationInProgress)
    ));
    assert!(matches!(
        ws.assign(Bucket::Low, "opt-404"),
        Err(WorkspaceError::UnknownOption(_))
    ));
}

#[test]
fn update_issues_new_identity_and_stale_remove_is_absorbed() {
    let (mut ws, ids) = loaded();
    let i1 = ids[0];

    let outcome = ws
        .on_edit_commit(vec![EditOperation::Update {
            group: "lotes".into(),
            id: i1,
            features: vec![square(10.0, 1)],
        }])
        .unwrap();
    assert_eq!(outcome.removed, vec![i1]);
    let i2 = outcome.created[0];
    assert_ne!(i1, i2);

    let outcome = ws
        .on_edit_commit(vec![EditOperation::Remove {
            group: "lotes".into(),
            id: i1,
        }])
        .unwrap();
    assert!(outcome.removed.is_empty());
    assert!(ws.groups().members("lotes").unwrap().contains(&i2));
    assert_eq!(ws.surface().shape_count(), 3);
}

#[test]
fn created_shape_can_be_removed() {
    let (mut ws, _) = loaded();
    let created = ws
        .on_edit_commit(vec![EditOperation::Create {
            group: "lotes".into(),
            features: vec![square(20.0, 2)],
        }])
        .unwrap()
        .created;

    let removed = ws
        .on_edit_commit(vec![EditOperation::Remove {
            group: "lotes".into(),
            id: created[0],
        }])
        .unwrap()
        .removed;
    assert_eq!(removed, created);
    assert!(!ws.surface().contains(created[0]));
}

#[test]
fn commit_to_unknown_group_fails_and_resets_tool() {
    let (mut ws, ids) = loaded();
    ws.enable_edit_tool(ids[0], "lotes").unwrap();

    let err = ws
        .on_edit_commit(vec![EditOperation::Create {
            group: "nowhere".into(),
            features: vec![square(0.0, 1)],
        }])
        .unwrap_err();
    assert!(matches!(err, WorkspaceError::GroupNotFound(_)));
    assert_eq!(ws.edit_tool().state(), &EditToolState::Inactive);
}

#[test]
fn edited_shapes_leave_the_aggregate() {
    let (mut ws, ids) = loaded();
    ws.begin_classification(environments(), "lotes").unwrap();
    ws.assign(Bucket::VeryLow, "opt-3").unwrap();
    assert_eq!(ws.export_aggregate().len(), 2);

    ws.on_edit_commit(vec![EditOperation::Update {
        group: "lotes".into(),
        id: ids[0],
        features: vec![square(0.5, 1)],
    }])
    .unwrap();
    assert_eq!(ws.export_aggregate().len(), 1);

    // The replacement is picked up on the next assignment.
    ws.assign(Bucket::VeryLow, "opt-3").unwrap();
    assert_eq!(ws.export_aggregate().len(), 2);
}

#[test]
fn second_activation_is_rejected_and_state_kept() {
    let (mut ws, ids) = loaded();
    ws.enable_edit_tool(ids[0], "lotes").unwrap();
    assert!(matches!(
        ws.enable_edit_tool(ids[1], "lotes"),
        Err(WorkspaceError::DuplicateActivation)
    ));
    assert_eq!(ws.edit_tool().target().map(|s| s.id), Some(ids[0]));

    assert!(ws.disable_edit_tool());
    assert!(!ws.disable_edit_tool());
}

#[test]
fn commit_clears_selection_and_deactivates_tool() {
    let (mut ws, ids) = loaded();
    ws.on_shape_click(ids[1]).unwrap();
    ws.enable_edit_tool(ids[0], "lotes").unwrap();

    ws.on_edit_commit(vec![EditOperation::Update {
        group: "lotes".into(),
        id: ids[0],
        features: vec![square(0.0, 1)],
    }])
    .unwrap();

    assert_eq!(ws.selection().selected(), None);
    assert!(!ws.edit_tool().is_active());
    let base = ws.config().base_style;
    assert_eq!(ws.surface().shape(ids[1]).unwrap().style, base);
}

#[test]
fn click_toggles_and_switches_highlight() {
    let (mut ws, ids) = loaded();
    let highlight_width = ws.config().highlight.stroke_width.unwrap();

    assert_eq!(
        ws.on_shape_click(ids[0]).unwrap(),
        SelectionChange::Selected { id: ids[0] }
    );
    assert_eq!(
        ws.on_shape_click(ids[1]).unwrap(),
        SelectionChange::Switched { from: ids[0], to: ids[1] }
    );
    let highlighted = ws
        .surface()
        .registry()
        .iter()
        .filter(|s| s.style.stroke.width == highlight_width)
        .count();
    assert_eq!(highlighted, 1);

    assert_eq!(
        ws.on_shape_click(ids[1]).unwrap(),
        SelectionChange::Cleared { id: ids[1] }
    );
    assert_eq!(ws.surface().shape(ids[1]).unwrap().style, ws.config().base_style);
}

#[test]
fn classifying_the_selected_shape_survives_deselection() {
    let (mut ws, ids) = loaded();
    ws.begin_classification(environments(), "lotes").unwrap();
    ws.on_shape_click(ids[0]).unwrap();
    ws.assign(Bucket::VeryLow, "opt-3").unwrap();

    let forest = Color::from_hex("#2e7d32").unwrap();
    ws.on_shape_click(ids[0]).unwrap();
    let style = ws.surface().shape(ids[0]).unwrap().style;
    assert_eq!(style.fill.color, forest);
    assert_eq!(style.fill.opacity, 1.0);
    assert_eq!(style.stroke.width, 1.0);
}

#[test]
fn teardown_twice_is_an_error() {
    let (mut ws, ids) = loaded();
    ws.on_shape_click(ids[0]).unwrap();

    let detached = ws.teardown_group("lotes").unwrap();
    assert_eq!(detached, ids);
    assert_eq!(ws.surface().shape_count(), 0);
    assert_eq!(ws.selection().selected(), None);

    assert!(matches!(
        ws.teardown_group("lotes"),
        Err(WorkspaceError::GroupNotFound(name)) if name == "lotes"
    ));
}

#[test]
fn finish_returns_features_and_tears_down_group() {
    let (mut ws, _) = loaded();
    ws.begin_classification(environments(), "lotes").unwrap();
    ws.assign(Bucket::VeryLow, "opt-9").unwrap();

    let collection = ws.finish_classification().unwrap();
    assert_eq!(collection.len(), 2);
    assert!(ws.session().is_none());
    assert!(!ws.groups().contains_group("lotes"));
    assert!(ws.export_aggregate().is_empty());
    assert!(matches!(
        ws.finish_classification(),
        Err(WorkspaceError::NoClassificationSession)
    ));
}

#[test]
fn events_follow_the_interaction() {
    let (mut ws, ids) = loaded();
    ws.begin_classification(environments(), "lotes").unwrap();
    ws.on_shape_click(ids[2]).unwrap();
    ws.assign(Bucket::Medium, "opt-3").unwrap();

    let events = ws.drain_events();
    assert!(matches!(&events[0], WorkspaceEvent::GroupLoaded { group, shapes } if group == "lotes" && shapes.len() == 3));
    assert_eq!(
        events[1..],
        [
            WorkspaceEvent::SelectionChanged {
                change: SelectionChange::Selected { id: ids[2] }
            },
            WorkspaceEvent::AggregateChanged { features: 1 },
        ]
    );
    assert!(ws.drain_events().is_empty());
}

#[test]
fn bucket_with_several_classes_classifies_all_of_them() {
    let config = WorkspaceConfig::from_json(
        r#"{ "buckets": [
            { "bucket": "very-low", "match_class": 1 },
            { "bucket": "very-low", "match_class": 3 }
        ] }"#,
    )
    .unwrap();
    let mut ws = Workspace::new(MemorySurface::new(), config);
    ws.load_base_geometry("lotes", vec![square(0.0, 1), square(2.0, 3), square(4.0, 4)])
        .unwrap();
    ws.begin_classification(environments(), "lotes").unwrap();

    let outcome = ws.assign(Bucket::VeryLow, "opt-3").unwrap();
    assert_eq!(outcome.inserted.len(), 2);
    assert_eq!(ws.export_aggregate().len(), 2);

    let rows = ws.session().unwrap().rows();
    assert_eq!(rows.iter().filter(|r| r.bucket == Bucket::VeryLow).count(), 1);
}

#[test]
fn activation_guard_comes_before_lookups() {
    let (mut ws, ids) = loaded();
    ws.enable_edit_tool(ids[0], "lotes").unwrap();

    assert!(matches!(
        ws.enable_edit_tool(ids[1], "nowhere"),
        Err(WorkspaceError::DuplicateActivation)
    ));
    assert!(matches!(
        ws.enable_edit_tool(ShapeId::from_u128(5), "lotes"),
        Err(WorkspaceError::DuplicateActivation)
    ));
    assert_eq!(ws.edit_tool().group(), Some("lotes"));
}

#[test]
fn edit_target_must_belong_to_its_group() {
    let (mut ws, _) = loaded();
    let soils = ws
        .load_base_geometry("soils", vec![square(10.0, 2)])
        .unwrap();

    let err = ws.enable_edit_tool(soils[0], "lotes").unwrap_err();
    assert!(matches!(
        err,
        WorkspaceError::NotInGroup { id, ref group } if id == soils[0] && group == "lotes"
    ));
    assert!(!ws.edit_tool().is_active());

    ws.enable_edit_tool(soils[0], "soils").unwrap();
    assert_eq!(ws.edit_tool().target().map(|s| s.id), Some(soils[0]));
}
