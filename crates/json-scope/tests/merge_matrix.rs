use json_scope::{deep_clone, merge_fields_deep, merge_fields_super, parse_path, Warning};
use proptest::prelude::*;
use serde_json::{json, Value};

fn sample() -> Value {
    json!({
        "a": 1,
        "b": {"a": 2, "c": 3},
        "c": [
            {"a": 3, "d": "test1"},
            {"b": {"a": 4, "e": "test2"}, "f": 5}
        ],
        "d": {"e": {"f": {"a": 6, "g": "deep"}}}
    })
}

#[test]
fn include_merge_matrix() {
    let origin = json!({"a": 1, "b": {"a": 2, "c": 3}, "d": 4});
    let patch = json!({"a": 10, "b": {"a": 20, "c": 30}, "d": 40, "e": 50});
    let cases: Vec<(Vec<&str>, Value)> = vec![
        (vec!["a", "b.a"], json!({"a": 10, "b": {"a": 20, "c": 3}, "d": 4, "e": 50})),
        (vec!["b"], json!({"a": 1, "b": {"a": 20, "c": 30}, "d": 4, "e": 50})),
        (vec!["**c"], json!({"a": 1, "b": {"a": 2, "c": 30}, "d": 4, "e": 50})),
        (vec![], json!({"a": 1, "b": {"a": 2, "c": 3}, "d": 4, "e": 50})),
        (vec![""], json!({"a": 10, "b": {"a": 20, "c": 30}, "d": 40, "e": 50})),
    ];
    for (paths, expected) in cases {
        let merged = merge_fields_super(&origin, &patch, &paths, false);
        assert_eq!(merged.doc, expected, "paths={paths:?}");
    }
}

#[test]
fn include_recursive_merge_over_nested_document() {
    let origin = deep_clone(&sample());
    let patch = json!({
        "a": 10,
        "b": {"a": 20},
        "c": [{"a": 30}, {"b": {"a": 40}}],
        "d": {"e": {"f": {"a": 60}}},
        "newField": "added"
    });
    let merged = merge_fields_super(&origin, &patch, &["**a"], false);
    assert_eq!(
        merged.doc,
        json!({
            "a": 10,
            "b": {"a": 20, "c": 3},
            "c": [
                {"a": 30, "d": "test1"},
                {"b": {"a": 40, "e": "test2"}, "f": 5}
            ],
            "d": {"e": {"f": {"a": 60, "g": "deep"}}},
            "newField": "added"
        })
    );
    // the patch only omits fields, it never contradicts one
    assert!(merged.warnings.is_empty());
}

#[test]
fn include_merge_warnings_matrix() {
    let origin = json!({"list": [1, 2], "meta": {"v": 1}});
    let patch = json!({"list": [1, 3, 4], "meta": {"v": 2}});
    let merged = merge_fields_super(&origin, &patch, &["meta"], false);
    // an unselected container is kept whole, extra patch elements included
    assert_eq!(merged.doc, json!({"list": [1, 2], "meta": {"v": 2}}));
    assert_eq!(
        merged.warnings,
        vec![Warning::NotIncludedButModified { path: "list".into() }]
    );
}

#[test]
fn merge_fields_deep_takes_parsed_paths() {
    let origin = json!({"x": {"y": 1, "z": 1}});
    let patch = json!({"x": {"y": 2, "z": 2}});
    let merged = merge_fields_deep(&origin, &patch, &[parse_path("x.z")]);
    assert_eq!(merged.doc, json!({"x": {"y": 1, "z": 2}}));
    assert_eq!(merged.warnings.len(), 1);
    assert_eq!(merged.warnings[0].path(), "x.y");
}

#[test]
fn exclude_merge_matrix() {
    let origin = json!({"a": 1, "b": {"a": 2, "c": 3}, "d": [1, 2]});
    let patch = json!({"a": 10, "b": {"a": 20, "c": 30}, "d": [5, 6, 7], "e": {"a": 0, "k": 1}});
    let cases: Vec<(Vec<&str>, Value)> = vec![
        (
            vec!["a"],
            json!({"a": 1, "b": {"a": 20, "c": 30}, "d": [5, 6, 7], "e": {"a": 0, "k": 1}}),
        ),
        (
            vec!["**a"],
            json!({"a": 1, "b": {"a": 2, "c": 30}, "d": [5, 6, 7], "e": {"k": 1}}),
        ),
        (
            vec!["d[1]", "d[2]"],
            json!({"a": 10, "b": {"a": 20, "c": 30}, "d": [5, 2], "e": {"a": 0, "k": 1}}),
        ),
        (
            vec!["e"],
            json!({"a": 10, "b": {"a": 20, "c": 30}, "d": [5, 6, 7]}),
        ),
        (
            vec![],
            json!({"a": 10, "b": {"a": 20, "c": 30}, "d": [5, 6, 7], "e": {"a": 0, "k": 1}}),
        ),
    ];
    for (paths, expected) in cases {
        let merged = merge_fields_super(&origin, &patch, &paths, true);
        assert_eq!(merged.doc, expected, "paths={paths:?}");
    }
}

#[test]
fn exclude_merge_warnings_matrix() {
    let origin = json!({"id": 7, "name": "x", "nested": {"id": 8}});
    let patch = json!({"id": 9, "name": "y", "nested": {"id": 8}});
    let merged = merge_fields_super(&origin, &patch, &["**id"], true);
    assert_eq!(merged.doc, json!({"id": 7, "name": "y", "nested": {"id": 8}}));
    assert_eq!(
        merged.warnings,
        vec![Warning::ExcludedButModified { path: "id".into() }]
    );
}

#[test]
fn digit_keys_merge_matrix() {
    let origin = json!({"m": {"0": "zero", "1": "one"}});
    let patch = json!({"m": {"0": "ZERO", "1": "ONE"}});

    let merged = merge_fields_super(&origin, &patch, &["m.0"], true);
    assert_eq!(merged.doc, json!({"m": {"0": "zero", "1": "ONE"}}));
    assert_eq!(
        merged.warnings,
        vec![Warning::ExcludedButModified { path: "m.0".into() }]
    );

    let merged = merge_fields_super(&origin, &patch, &["**0"], true);
    assert_eq!(merged.doc, json!({"m": {"0": "zero", "1": "ONE"}}));

    for paths in [["**0"], ["m.**0"], ["m[0]"]] {
        let merged = merge_fields_super(&origin, &patch, &paths, false);
        assert_eq!(merged.doc, json!({"m": {"0": "ZERO", "1": "one"}}), "paths={paths:?}");
        assert_eq!(
            merged.warnings,
            vec![Warning::NotIncludedButModified { path: "m.1".into() }]
        );
    }
}

#[test]
fn non_container_inputs_matrix() {
    let doc = json!({"a": 1});
    for (origin, patch) in [
        (json!(1), doc.clone()),
        (json!(null), doc.clone()),
        (doc.clone(), json!("x")),
        (doc.clone(), json!(null)),
    ] {
        for exclude in [false, true] {
            let merged = merge_fields_super(&origin, &patch, &["a"], exclude);
            assert_eq!(merged.doc, origin);
            assert!(merged.warnings.is_empty());
        }
    }
}

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-100i64..100).prop_map(|n| json!(n)),
        "[a-z]{0,4}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-d]", inner, 0..4)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

fn arb_paths() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        "[a-d](\\.[a-d]){0,2}|[a-d]\\[[0-2]?\\](\\.[a-d])?|\\*\\*[a-d]|[a-d]\\.\\*\\*",
        0..4,
    )
}

proptest! {
    #[test]
    fn merge_with_itself_is_identity(doc in arb_json(), paths in arb_paths(), exclude in any::<bool>()) {
        let merged = merge_fields_super(&doc, &doc, &paths, exclude);
        prop_assert_eq!(merged.doc, doc);
        prop_assert!(merged.warnings.is_empty());
    }

    #[test]
    fn include_everything_matches_patch_keys(
        origin in prop::collection::btree_map("[a-d]", arb_json(), 0..4),
        patch in prop::collection::btree_map("[a-d]", arb_json(), 0..4),
    ) {
        let origin = Value::Object(origin.into_iter().collect());
        let patch = Value::Object(patch.into_iter().collect());
        let merged = merge_fields_super(&origin, &patch, &["**"], false);
        let merged = merged.doc.as_object().cloned().unwrap_or_default();
        for (key, value) in patch.as_object().into_iter().flatten() {
            prop_assert!(merged.contains_key(key));
            if !value.is_object() && !value.is_array() {
                prop_assert_eq!(&merged[key], value);
            }
        }
        for key in origin.as_object().into_iter().flatten().map(|(key, _)| key) {
            prop_assert!(merged.contains_key(key));
        }
    }
}
