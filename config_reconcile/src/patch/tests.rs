//! Tests for patch building, annotation parsing and patch application.

use anyhow::{Result, anyhow, ensure};
use proptest::prelude::*;
use rstest::rstest;
use serde_json::{Map, Value, json};

use super::annotation::parse;
use super::{apply_patch, build_patch, build_patch_for_environment, patch_from_diff};
use crate::diff::{DiffNode, diff};
use crate::error::ReconcileError;
use crate::{ReconcileOptions, TreePath};

#[rstest]
#[case::deleted_key(
    json!({"vars": {"MY_VAR__deleted": "ABC"}}),
    json!({"vars": {"MY_VAR": "ABC"}})
)]
#[case::rename(
    json!({"vars": {"MY_VAR__deleted": "ABC", "VAR__added": "ABC"}}),
    json!({"vars": {"MY_VAR": "ABC"}})
)]
#[case::changed_leaf(
    json!({"compatibility_date": {"__old": "2025-07-08", "__new": "2025-07-09"}}),
    json!({"compatibility_date": "2025-07-08"})
)]
#[case::addition_only(json!({"vars": {"NEW__added": "1"}}), json!({}))]
#[case::unmarked_branches_are_dropped(
    json!({"name": "svc", "limits": {"cpu_ms": 50}, "vars": {"A__deleted": 1}}),
    json!({"vars": {"A": 1}})
)]
#[case::list_positions(
    json!({"kv_namespaces": [
        [" "],
        ["-", {"binding": "GONE", "id": "1"}],
        ["+", {"binding": "NEW", "id": "2"}],
        [" ", {"binding": "KEPT", "id": "3"}],
        ["~", {"id": {"__old": "4", "__new": "5"}}]
    ]}),
    json!({"kv_namespaces": [{}, {}, {}, {"id": "4"}, {"binding": "GONE", "id": "1"}]})
)]
#[case::modified_without_restorable_fields(
    json!({"routes": [["~", {"zone__added": "z"}], ["-", "b"]]}),
    json!({"routes": [{}, "b"]})
)]
#[case::list_with_nothing_to_restore(json!({"routes": [[" "], ["+", "r"]]}), json!({}))]
fn builds_patches(#[case] annotated: Value, #[case] expected: Value) -> Result<()> {
    let patch = build_patch(&annotated).map_err(|err| anyhow!("{err}"))?;
    ensure!(patch == expected, "unexpected patch {patch}");
    Ok(())
}

#[rstest]
#[case::unknown_tag(
    json!({"kv": [[" "], ["?", 1]]}),
    TreePath::root().key("kv").index(1)
)]
#[case::not_a_tuple(json!({"kv": ["plain"]}), TreePath::root().key("kv").index(0))]
#[case::empty_tuple(json!({"kv": [[]]}), TreePath::root().key("kv").index(0))]
#[case::numeric_tag(json!({"kv": [[1, 2]]}), TreePath::root().key("kv").index(0))]
#[case::removed_without_value(json!({"kv": [["-"]]}), TreePath::root().key("kv").index(0))]
#[case::modified_scalar(json!({"kv": [["~", 3]]}), TreePath::root().key("kv").index(0))]
#[case::only_old(json!({"a": {"b": {"__old": 1}}}), TreePath::root().key("a").key("b"))]
#[case::extra_key(
    json!({"a": {"__old": 1, "__new": 2, "x": 3}}),
    TreePath::root().key("a")
)]
#[case::nested_old(
    json!({"a": {"__old": {"b__deleted": 1}, "__new": 2}}),
    TreePath::root().key("a")
)]
#[case::scalar_root(json!("text"), TreePath::root())]
#[case::marker_root(json!({"__old": 1, "__new": 2}), TreePath::root())]
fn rejects_invalid_annotations(#[case] annotated: Value, #[case] path: TreePath) -> Result<()> {
    let Err(err) = build_patch(&annotated) else {
        return Err(anyhow!("expected {annotated} to be rejected"));
    };
    ensure!(err.tree_path() == Some(&path), "unexpected path in {err}");
    Ok(())
}

#[test]
fn unknown_tags_are_named_in_the_error() -> Result<()> {
    let Err(err) = build_patch(&json!({"kv": [["*", 1]]})) else {
        return Err(anyhow!("expected an error"));
    };
    ensure!(matches!(&*err, ReconcileError::UnknownArrayTag { tag, .. } if tag == "*"));
    Ok(())
}

#[rstest]
#[case::named(Some("staging"), json!({"env": {"staging": {"vars": {"A": 1}}}}))]
#[case::top_level(None, json!({"vars": {"A": 1}}))]
fn scopes_patches_to_environments(
    #[case] environment: Option<&str>,
    #[case] expected: Value,
) -> Result<()> {
    let patch = build_patch_for_environment(&json!({"vars": {"A__deleted": 1}}), environment)
        .map_err(|err| anyhow!("{err}"))?;
    ensure!(patch == expected, "unexpected patch {patch}");
    Ok(())
}

#[test]
fn empty_patches_are_not_scoped() -> Result<()> {
    let patch = build_patch_for_environment(&json!({"vars": {"B__added": 1}}), Some("prod"))
        .map_err(|err| anyhow!("{err}"))?;
    ensure!(patch == json!({}));
    Ok(())
}

#[test]
fn live_and_annotated_patches_agree() -> Result<()> {
    let remote = json!({
        "compatibility_date": "2025-07-08",
        "vars": {"KEEP": "1", "GONE": "2"},
        "d1_databases": [
            {"binding": "DB", "database_id": "a"},
            {"binding": "OLD", "database_id": "b"}
        ]
    });
    let local = json!({
        "compatibility_date": "2025-07-09",
        "vars": {"KEEP": "1", "NEW": "3"},
        "d1_databases": [{"binding": "DB", "database_id": "c"}]
    });
    let tree = diff(&remote, &local, &ReconcileOptions::default());
    let annotated = tree.to_annotated();
    let reparsed = parse(&annotated).map_err(|err| anyhow!("{err}"))?;
    let live = patch_from_diff(&tree);
    ensure!(live == patch_from_diff(&reparsed), "patches differ for {annotated}");
    ensure!(
        live == json!({
            "compatibility_date": "2025-07-08",
            "vars": {"GONE": "2"},
            "d1_databases": [{"database_id": "a"}, {"binding": "OLD", "database_id": "b"}]
        }),
        "unexpected patch {live}"
    );

    let mut restored = local;
    apply_patch(&mut restored, live);
    ensure!(
        crate::tree::values_equal(
            &restored,
            &json!({
                "compatibility_date": "2025-07-08",
                "vars": {"KEEP": "1", "NEW": "3", "GONE": "2"},
                "d1_databases": [
                    {"binding": "DB", "database_id": "a"},
                    {"binding": "OLD", "database_id": "b"}
                ]
            })
        ),
        "unexpected merge result {restored}"
    );
    Ok(())
}

#[test]
fn unchanged_trees_annotate_as_nothing_to_restore() -> Result<()> {
    let value = json!({"routes": ["a", "b"], "kv": [{"binding": "A"}]});
    let tree = diff(&value, &value, &ReconcileOptions::default());
    ensure!(tree.to_annotated() == json!({}), "unexpected annotation {}", tree.to_annotated());
    let patch = build_patch(&tree.to_annotated()).map_err(|err| anyhow!("{err}"))?;
    ensure!(patch == json!({}));
    ensure!(DiffNode::Unchanged(json!([1, 2])).to_annotated() == json!([[" "], [" "]]));
    Ok(())
}

#[test]
fn annotated_form_marks_each_change_kind() {
    let tree = diff(
        &json!({"a": 1, "b": 2, "list": [1, 2]}),
        &json!({"a": 1, "b": 3, "c": 4, "list": [1, 5]}),
        &ReconcileOptions::default(),
    );
    assert_eq!(
        tree.to_annotated(),
        json!({
            "b": {"__old": 2, "__new": 3},
            "c__added": 4,
            "list": [[" "], ["-", 2], ["+", 5]]
        })
    );
}

#[rstest]
#[case::removed_between_kept_records(
    json!({"kv": [{"binding": "A"}, {"binding": "B"}, {"binding": "C"}]}),
    json!({"kv": [{"binding": "A"}, {"binding": "C"}]}),
    json!({"kv": [{"binding": "A"}, {"binding": "C"}, {"binding": "B"}]})
)]
#[case::modified_after_a_removal(
    json!({"kv": [{"binding": "A", "id": "1"}, {"binding": "B", "id": "2"}]}),
    json!({"kv": [{"binding": "B", "id": "3"}]}),
    json!({"kv": [{"binding": "B", "id": "2"}, {"binding": "A", "id": "1"}]})
)]
#[case::modified_after_an_addition(
    json!({"kv": [{"binding": "A", "id": "1"}]}),
    json!({"kv": [{"binding": "N", "id": "9"}, {"binding": "A", "id": "2"}]}),
    json!({"kv": [{"binding": "N", "id": "9"}, {"binding": "A", "id": "1"}]})
)]
#[case::scalar_removed_from_the_middle(
    json!({"routes": ["a", "b", "c"]}),
    json!({"routes": ["a", "c"]}),
    json!({"routes": ["a", "c", "b"]})
)]
fn list_patches_leave_local_elements_in_place(
    #[case] remote: Value,
    #[case] local: Value,
    #[case] expected: Value,
) -> Result<()> {
    let tree = diff(&remote, &local, &ReconcileOptions::default());
    let live = patch_from_diff(&tree);
    let annotated = build_patch(&tree.to_annotated()).map_err(|err| anyhow!("{err}"))?;
    ensure!(live == annotated, "live patch {live} differs from annotated patch {annotated}");

    let mut restored = local;
    apply_patch(&mut restored, live);
    ensure!(restored == expected, "unexpected merge result {restored}");
    Ok(())
}

#[test]
fn annotated_removal_is_appended_after_the_local_element() -> Result<()> {
    let patch = build_patch(&json!({"kv": [["-", {"binding": "A"}], [" "]]}))
        .map_err(|err| anyhow!("{err}"))?;
    ensure!(patch == json!({"kv": [{}, {"binding": "A"}]}), "unexpected patch {patch}");

    let mut restored = json!({"kv": [{"binding": "B"}]});
    apply_patch(&mut restored, patch);
    ensure!(restored == json!({"kv": [{"binding": "B"}, {"binding": "A"}]}));
    Ok(())
}

#[rstest]
#[case::placeholder_keeps_element(json!(["a", "b"]), json!([{}, "c"]), json!(["a", "c"]))]
#[case::appends_past_the_end(json!(["a"]), json!([{}, "b"]), json!(["a", "b"]))]
#[case::appends_empty_records_past_the_end(json!([]), json!([{}, 1]), json!([{}, 1]))]
#[case::merges_into_records(
    json!([{"binding": "KV", "id": "new"}]),
    json!([{"id": "old"}]),
    json!([{"binding": "KV", "id": "old"}])
)]
#[case::replaces_scalars(json!({"a": 1}), json!({"a": {"b": 2}}), json!({"a": {"b": 2}}))]
#[case::list_over_scalar(json!({"a": 1}), json!({"a": ["x"]}), json!({"a": ["x"]}))]
fn applies_patches(#[case] target: Value, #[case] patch: Value, #[case] expected: Value) {
    let mut merged = target;
    apply_patch(&mut merged, patch);
    assert_eq!(merged, expected);
}

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::from),
        (0_i64..4).prop_map(Value::from),
        "[a-c]{0,2}".prop_map(Value::from),
    ]
}

fn record(inner: BoxedStrategy<Value>) -> BoxedStrategy<Value> {
    prop::collection::btree_map("(binding|[a-c])", inner, 0..4)
        .prop_map(|entries| Value::Object(entries.into_iter().collect::<Map<_, _>>()))
        .boxed()
}

fn tree() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(3, 32, 4, |inner| {
        let records = record(inner.clone());
        prop_oneof![
            records.clone(),
            prop::collection::vec(inner, 0..4).prop_map(Value::Array),
            prop::collection::vec(records, 0..4).prop_map(Value::Array),
        ]
    })
}

fn mapping() -> impl Strategy<Value = Value> {
    prop::collection::btree_map("[a-d]", tree(), 0..5)
        .prop_map(|entries| Value::Object(entries.into_iter().collect()))
}

/// Whether every leaf of `expected` is present with an equal value in
/// `actual`. Extra keys in `actual` are allowed, and list elements of
/// `expected` may appear anywhere in the matching list of `actual`, each
/// matched by a distinct element.
fn covers(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Object(actual_map), Value::Object(expected_map)) => {
            expected_map.iter().all(|(key, value)| {
                actual_map.get(key).is_some_and(|found| covers(found, value))
            })
        }
        (Value::Array(actual_items), Value::Array(expected_items)) => {
            covers_each(actual_items, expected_items, &mut vec![false; actual_items.len()])
        }
        _ => crate::tree::values_equal(actual, expected),
    }
}

fn covers_each(actual: &[Value], expected: &[Value], used: &mut [bool]) -> bool {
    let Some((first, rest)) = expected.split_first() else {
        return true;
    };
    for (index, candidate) in actual.iter().enumerate() {
        if used.get(index).copied().unwrap_or(true) || !covers(candidate, first) {
            continue;
        }
        if let Some(slot) = used.get_mut(index) {
            *slot = true;
        }
        if covers_each(actual, rest, used) {
            return true;
        }
        if let Some(slot) = used.get_mut(index) {
            *slot = false;
        }
    }
    false
}

/// Whether every part of `local` that `patch` does not touch is still present,
/// unchanged and at the same list position, in `restored`.
fn untouched(local: &Value, restored: &Value, patch: &Value) -> bool {
    match (local, patch) {
        (Value::Object(local_map), Value::Object(patch_map)) => {
            local_map.iter().all(|(key, value)| match (restored.get(key), patch_map.get(key)) {
                (Some(found), Some(sub_patch)) => untouched(value, found, sub_patch),
                (Some(found), None) => crate::tree::values_equal(value, found),
                (None, _) => false,
            })
        }
        (Value::Array(local_items), Value::Array(patch_items)) => {
            local_items.iter().enumerate().all(|(index, value)| {
                match (restored.get(index), patch_items.get(index)) {
                    (Some(found), Some(sub_patch))
                        if !sub_patch.as_object().is_some_and(Map::is_empty) =>
                    {
                        untouched(value, found, sub_patch)
                    }
                    (Some(found), _) => crate::tree::values_equal(value, found),
                    (None, _) => false,
                }
            })
        }
        _ => true,
    }
}

proptest! {
    #[test]
    fn applied_patch_restores_remote_and_keeps_local(remote in mapping(), local in mapping()) {
        let tree = diff(&remote, &local, &ReconcileOptions::default());
        let built = build_patch(&tree.to_annotated());
        prop_assert!(built.is_ok());
        let patch = built.unwrap_or_default();
        prop_assert_eq!(&patch, &patch_from_diff(&tree));
        let mut restored = local.clone();
        apply_patch(&mut restored, patch.clone());
        prop_assert!(covers(&restored, &remote), "{} does not cover {}", restored, remote);
        prop_assert!(
            untouched(&local, &restored, &patch),
            "{} lost local values of {} outside {}",
            restored,
            local,
            patch
        );
    }

    #[test]
    fn identical_trees_need_no_patch(value in mapping()) {
        let tree = diff(&value, &value, &ReconcileOptions::default());
        prop_assert_eq!(patch_from_diff(&tree), Value::Object(Map::new()));
    }
}

#[test]
fn parse_keeps_plain_scalars_unchanged() -> Result<()> {
    let node = parse(&json!({"name": "svc"})).map_err(|err| anyhow!("{err}"))?;
    ensure!(node == DiffNode::Object(vec![("name".to_owned(), DiffNode::Unchanged(json!("svc")))]));
    Ok(())
}
