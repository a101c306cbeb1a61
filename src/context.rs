//! Context value lookup and scope derivation for template rendering.
//! All rendering reads go through [`resolve`], so path semantics and
//! truthiness live here in one place.

use serde_json::{Map, Value};

/// Resolves a dot-separated path against a JSON context.
///
/// Descends through nested objects one segment at a time. The walk only
/// follows plain objects: arrays are not indexable through paths, so any
/// non-object intermediate ends the lookup.
///
/// # Arguments
/// * `context` - Root JSON value to resolve against
/// * `path` - Dot-separated key path, e.g. `user.address.city`
///
/// # Returns
/// * `Option<&Value>` - The value at the path, or `None` for any miss
pub fn resolve<'a>(context: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = context;
    for segment in path.split('.') {
        match current {
            Value::Object(map) => current = map.get(segment)?,
            _ => return None,
        }
    }
    Some(current)
}

/// Reports whether a resolved value counts as truthy in conditions.
///
/// Falsy values are: missing, `null`, `false`, `0`, and the empty string.
/// Arrays and objects are always truthy, even when empty.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Converts a resolved value to its substitution text.
///
/// Missing values and `null` become the empty string, strings are inserted
/// verbatim, and arrays or objects serialize to compact JSON.
pub fn stringify(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => serde_json::to_string(other).unwrap_or_default(),
    }
}

/// Builds the per-iteration scope for one `{{#each}}` item.
///
/// The scope is a shallow copy of the enclosing context's top-level entries
/// with the iteration values layered on top:
/// * `this` - the current item
/// * `@index` - zero-based position, exposed as a string
/// * `@key` - property name for object iteration, empty for arrays
/// * `@first` / `@last` - boundary flags
///
/// Copying keeps iterations independent: writes into one scope can never
/// leak into the caller's context or a sibling iteration.
pub fn item_context(parent: &Value, item: &Value, index: usize, len: usize, key: &str) -> Value {
    let mut scope = match parent {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };
    scope.insert("this".to_string(), item.clone());
    scope.insert("@index".to_string(), Value::String(index.to_string()));
    scope.insert("@key".to_string(), Value::String(key.to_string()));
    scope.insert("@first".to_string(), Value::Bool(index == 0));
    scope.insert("@last".to_string(), Value::Bool(index + 1 == len));
    Value::Object(scope)
}
