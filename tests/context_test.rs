use nimata::context::{is_truthy, item_context, resolve, stringify};
use serde_json::json;

#[test]
fn test_resolve_top_level() {
    let context = json!({"name": "x"});
    assert_eq!(resolve(&context, "name"), Some(&json!("x")));
    assert_eq!(resolve(&context, "missing"), None);
}

#[test]
fn test_resolve_nested() {
    let context = json!({"user": {"address": {"city": "Oslo"}}});
    assert_eq!(resolve(&context, "user.address.city"), Some(&json!("Oslo")));
    assert_eq!(resolve(&context, "user.address.zip"), None);
    assert_eq!(resolve(&context, "user.missing.city"), None);
}

#[test]
fn test_resolve_stops_at_non_objects() {
    let context = json!({"n": 5, "list": [1, 2]});
    // Scalars and arrays cannot be descended into.
    assert_eq!(resolve(&context, "n.x"), None);
    assert_eq!(resolve(&context, "list.0"), None);
    assert_eq!(resolve(&json!([1, 2]), "anything"), None);
    assert_eq!(resolve(&json!(null), "anything"), None);
}

#[test]
fn test_resolve_empty_path() {
    let context = json!({"a": 1});
    assert_eq!(resolve(&context, ""), None);
    assert_eq!(resolve(&context, "a."), None);
}

#[test]
fn test_truthiness() {
    assert!(!is_truthy(None));
    assert!(!is_truthy(Some(&json!(null))));
    assert!(!is_truthy(Some(&json!(false))));
    assert!(!is_truthy(Some(&json!(0))));
    assert!(!is_truthy(Some(&json!(0.0))));
    assert!(!is_truthy(Some(&json!(""))));
    assert!(is_truthy(Some(&json!(true))));
    assert!(is_truthy(Some(&json!(1))));
    assert!(is_truthy(Some(&json!(-1))));
    assert!(is_truthy(Some(&json!("no"))));
    assert!(is_truthy(Some(&json!([]))));
    assert!(is_truthy(Some(&json!({}))));
}

#[test]
fn test_stringify() {
    assert_eq!(stringify(None), "");
    assert_eq!(stringify(Some(&json!(null))), "");
    assert_eq!(stringify(Some(&json!("verbatim text"))), "verbatim text");
    assert_eq!(stringify(Some(&json!(42))), "42");
    assert_eq!(stringify(Some(&json!(1.5))), "1.5");
    assert_eq!(stringify(Some(&json!(true))), "true");
    assert_eq!(stringify(Some(&json!([1, "a"]))), "[1,\"a\"]");
    assert_eq!(stringify(Some(&json!({"k": "v"}))), "{\"k\":\"v\"}");
}

#[test]
fn test_item_context_layers_iteration_values() {
    let parent = json!({"shared": "s", "items": [1]});
    let item = json!({"id": 7});
    let scope = item_context(&parent, &item, 0, 3, "");

    assert_eq!(scope["shared"], json!("s"));
    assert_eq!(scope["this"], item);
    assert_eq!(scope["@index"], json!("0"));
    assert_eq!(scope["@key"], json!(""));
    assert_eq!(scope["@first"], json!(true));
    assert_eq!(scope["@last"], json!(false));
}

#[test]
fn test_item_context_last_flag_and_key() {
    let parent = json!({});
    let scope = item_context(&parent, &json!(3), 2, 3, "third");
    assert_eq!(scope["@index"], json!("2"));
    assert_eq!(scope["@key"], json!("third"));
    assert_eq!(scope["@first"], json!(false));
    assert_eq!(scope["@last"], json!(true));
}

#[test]
fn test_item_context_copy_is_shallow_and_detached() {
    let parent = json!({"keep": 1});
    let scope = item_context(&parent, &json!("x"), 0, 1, "");
    // The parent never gains the iteration names.
    assert_eq!(parent, json!({"keep": 1}));
    assert_eq!(scope["keep"], json!(1));
    assert_eq!(scope["this"], json!("x"));
}

#[test]
fn test_item_context_from_non_object_parent() {
    let scope = item_context(&json!(null), &json!("v"), 0, 1, "");
    assert_eq!(scope["this"], json!("v"));
    assert_eq!(scope["@last"], json!(true));
}
