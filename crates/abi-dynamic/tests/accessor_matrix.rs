use std::collections::HashMap;
use std::ops::ControlFlow;

use abi_dynamic::{
    add, each, get, get_path, get_with_autocreate, is_empty, is_nil, set, set_path, split_path,
    Dynamic, Value,
};
use proptest::prelude::*;
use serde_json::json;

fn v(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => match (n.as_i64(), n.as_u64()) {
            (Some(i), _) => Value::Int(i),
            (None, Some(u)) => Value::UInt(u),
            _ => Value::Float(n.as_f64().unwrap_or_default()),
        },
        serde_json::Value::String(s) => Value::Str(s),
        serde_json::Value::Array(items) => items.into_iter().map(v).collect(),
        serde_json::Value::Object(map) => map.into_iter().map(|(k, x)| (k, v(x))).collect(),
    }
}

fn read(doc: &Value, path: &str) -> Option<Value> {
    get_path(doc, &split_path(path, ".")).map(|r| r.into_value())
}

#[test]
fn path_get_matrix() {
    let doc = v(json!({
        "user": {"name": "ada", "tags": ["x", "y", "z"]},
        "empty": [],
        "n": null
    }));

    let cases: [(&str, Option<Value>); 10] = [
        ("user.name", Some(Value::from("ada"))),
        ("user.tags.0", Some(Value::from("x"))),
        ("user.tags.@first", Some(Value::from("x"))),
        ("user.tags.@last", Some(Value::from("z"))),
        ("user.tags.@length", Some(Value::Int(3))),
        ("user.tags.3", None),
        ("user.missing", None),
        ("empty.@first", None),
        ("empty.@length", Some(Value::Int(0))),
        ("n", Some(Value::Null)),
    ];
    for (path, expected) in cases {
        assert_eq!(read(&doc, path), expected, "{path}");
    }
}

#[test]
fn set_path_creates_intermediate_maps() {
    let mut doc = Value::map();
    set_path(&mut doc, &["a", "b", "c"], Value::from(1));
    assert_eq!(doc, v(json!({"a": {"b": {"c": 1}}})));

    set_path(&mut doc, &["a", "b", "d"], Value::from("x"));
    assert_eq!(doc, v(json!({"a": {"b": {"c": 1, "d": "x"}}})));
}

#[test]
fn set_path_through_sequence_index() {
    let mut doc = v(json!({"list": [{"id": 1}, {"id": 2}]}));
    set_path(&mut doc, &["list", "@last", "id"], Value::from(20));
    set_path(&mut doc, &["list", "5", "id"], Value::from(50));
    assert_eq!(doc, v(json!({"list": [{"id": 1}, {"id": 20}]})));
}

#[test]
fn set_path_into_scalar_is_ignored() {
    let mut doc = v(json!({"a": 1}));
    set_path(&mut doc, &["a", "b"], Value::from(2));
    assert_eq!(doc, v(json!({"a": 1})));
}

#[test]
fn null_write_deletes_key() {
    let mut doc = v(json!({"a": 1, "b": 2}));
    set(&mut doc, "a", Value::Null);
    assert_eq!(doc, v(json!({"b": 2})));
    assert!(get(&doc, "a").is_none());
}

#[test]
fn autocreate_lookup() {
    let mut doc = Value::map();
    assert!(get_with_autocreate(&mut doc, "x", false).is_none());
    let child = get_with_autocreate(&mut doc, "x", true).expect("created");
    child.set("y", Value::from(true));
    assert_eq!(doc, v(json!({"x": {"y": true}})));
}

#[test]
fn each_over_shapes() {
    let doc: Value = [("b", 1), ("a", 2)].into_iter().collect();
    let mut keys = Vec::new();
    each(&doc, |key, _| {
        keys.push(key);
        ControlFlow::Continue(())
    });
    assert_eq!(keys, vec![Value::from("b"), Value::from("a")]);

    let list = v(json!(["p", "q"]));
    let mut seen = Vec::new();
    each(&list, |key, item| {
        seen.push((key, item.to_value()));
        ControlFlow::Continue(())
    });
    assert_eq!(
        seen,
        vec![(Value::Int(0), Value::from("p")), (Value::Int(1), Value::from("q"))]
    );

    let mut count = 0;
    each(&Value::from(5), |_, _| {
        count += 1;
        ControlFlow::Continue(())
    });
    assert_eq!(count, 0);
}

#[test]
fn nil_versus_empty_matrix() {
    let cases = [
        (json!(null), true, true),
        (json!(""), true, true),
        (json!(0), true, true),
        (json!(0.0), true, true),
        (json!(false), true, true),
        (json!([]), false, true),
        (json!({}), false, true),
        (json!("a"), false, false),
        (json!(1), false, false),
        (json!([0]), false, false),
    ];
    for (input, nil, empty) in cases {
        let value = v(input.clone());
        assert_eq!(is_nil(&value), nil, "is_nil {input}");
        assert_eq!(is_empty(&value), empty, "is_empty {input}");
    }
}

#[test]
fn add_appends() {
    let mut doc = v(json!({"list": [1]}));
    let list = get_with_autocreate(&mut doc, "list", false).expect("list");
    add(list, Value::from(2));
    assert_eq!(doc, v(json!({"list": [1, 2]})));

    let mut typed: Vec<String> = Vec::new();
    add(&mut typed, Value::from(3));
    assert_eq!(typed, vec!["3".to_string()]);
}

#[test]
fn typed_map_access() {
    let mut scores: HashMap<String, i64> = HashMap::new();
    set(&mut scores, "ada", Value::from("0x10"));
    assert_eq!(scores.get("ada"), Some(&16));
    assert_eq!(
        get(&scores, "ada").map(|r| r.into_value()),
        Some(Value::Int(16))
    );
    set(&mut scores, "ada", Value::Null);
    assert!(scores.is_empty());
}

proptest! {
    #[test]
    fn set_then_get_roundtrip(keys in proptest::collection::vec("[a-z]{1,6}", 1..5), n in any::<i64>()) {
        let mut doc = Value::Null;
        set_path(&mut doc, &keys, Value::from(n));
        prop_assert_eq!(get_path(&doc, &keys).map(|r| r.into_value()), Some(Value::Int(n)));
    }

    #[test]
    fn length_matches_sequence(len in 0usize..32) {
        let doc: Value = (0..len as i64).map(Value::from).collect();
        prop_assert_eq!(get(&doc, "@length").map(|r| r.into_value()), Some(Value::Int(len as i64)));
        prop_assert_eq!(get(&doc, &len.to_string()).is_none(), true);
    }
}
