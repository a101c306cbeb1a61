use nimata::renderer::{Engine, TemplateRenderer};
use serde_json::json;
use std::thread;

fn render(template: &str, context: &serde_json::Value) -> String {
    Engine::new().render(template, context).unwrap()
}

#[test]
fn test_variable_substitution() {
    let context = json!({"name": "world", "count": 3});
    assert_eq!(render("Hello {{name}}!", &context), "Hello world!");
    assert_eq!(render("{{count}} items", &context), "3 items");
    assert_eq!(render("{{name}}-{{name}}", &context), "world-world");
}

#[test]
fn test_nested_path_substitution() {
    let context = json!({"user": {"address": {"city": "Oslo"}}});
    assert_eq!(render("{{user.address.city}}", &context), "Oslo");
    assert_eq!(render("{{user.address.zip}}", &context), "");
    assert_eq!(render("{{user.address.city.deeper}}", &context), "");
}

#[test]
fn test_missing_variable_renders_empty() {
    assert_eq!(render("Hello {{missingVar}}!", &json!({})), "Hello !");
}

#[test]
fn test_null_renders_empty() {
    let context = json!({"gone": null});
    assert_eq!(render("[{{gone}}]", &context), "[]");
}

#[test]
fn test_value_stringification() {
    let context = json!({
        "num": 1.5,
        "flag": false,
        "list": [1, 2, 3],
        "obj": {"a": 1}
    });
    assert_eq!(render("{{num}}", &context), "1.5");
    assert_eq!(render("{{flag}}", &context), "false");
    assert_eq!(render("{{list}}", &context), "[1,2,3]");
    assert_eq!(render("{{obj}}", &context), "{\"a\":1}");
}

#[test]
fn test_helper_token() {
    let context = json!({"name": "my-service"});
    assert_eq!(render("{{helper:uppercase name}}", &context), "MY-SERVICE");
    assert_eq!(render("{{helper:pascalcase name}}", &context), "MyService");
}

#[test]
fn test_unknown_helper_renders_empty() {
    let context = json!({"value": "x"});
    assert_eq!(render("{{helper:nope value}}", &context), "");
}

#[test]
fn test_helper_with_missing_argument() {
    assert_eq!(render("{{helper:uppercase missing}}", &json!({})), "");
}

#[test]
fn test_malformed_token_passes_through() {
    let context = json!({"syntax": "x"});
    assert_eq!(render("Invalid {{ syntax", &context), "Invalid {{ syntax");
    assert_eq!(render("also invalid }}", &context), "also invalid }}");
}

#[test]
fn test_conditional_branches() {
    let template = "{{#if isActive}}Active{{else}}Inactive{{/if}}";
    assert_eq!(render(template, &json!({"isActive": true})), "Active");
    assert_eq!(render(template, &json!({"isActive": false})), "Inactive");
    assert_eq!(render(template, &json!({})), "Inactive");
}

#[test]
fn test_conditional_without_else() {
    let template = "A{{#if flag}}B{{/if}}C";
    assert_eq!(render(template, &json!({"flag": true})), "ABC");
    assert_eq!(render(template, &json!({"flag": 0})), "AC");
}

#[test]
fn test_conditional_truthiness() {
    let template = "{{#if value}}yes{{else}}no{{/if}}";
    assert_eq!(render(template, &json!({"value": ""})), "no");
    assert_eq!(render(template, &json!({"value": 0})), "no");
    assert_eq!(render(template, &json!({"value": null})), "no");
    // Empty containers count as truthy.
    assert_eq!(render(template, &json!({"value": []})), "yes");
    assert_eq!(render(template, &json!({"value": {}})), "yes");
}

#[test]
fn test_nested_conditionals_resolve_inner_first() {
    let template = "{{#if a}}{{#if b}}AB{{else}}A{{/if}}{{else}}N{{/if}}";
    assert_eq!(render(template, &json!({"a": true, "b": true})), "AB");
    assert_eq!(render(template, &json!({"a": true, "b": false})), "A");
    assert_eq!(render(template, &json!({"a": false, "b": true})), "N");
}

#[test]
fn test_conditional_with_expression() {
    let template = "{{#if user.age >= 18 && user.active}}adult{{else}}minor{{/if}}";
    assert_eq!(render(template, &json!({"user": {"age": 21, "active": true}})), "adult");
    assert_eq!(render(template, &json!({"user": {"age": 15, "active": true}})), "minor");
}

#[test]
fn test_unmatched_block_tags_do_not_fail() {
    // The opener stays unmatched, so the text around it survives.
    assert_eq!(render("Hello {{#if x}}World", &json!({"x": true})), "Hello World");
    assert_eq!(render("A{{/if}}B", &json!({})), "AB");
    assert_eq!(render("A{{else}}B", &json!({})), "AB");
}

#[test]
fn test_each_over_array() {
    let context = json!({"items": ["a", "b", "c"]});
    assert_eq!(render("{{#each items}}{{this}},{{/each}}", &context), "a,b,c,");
    // Body repeats exactly once per element.
    assert_eq!(render("{{#each items}}X{{/each}}", &context), "XXX");
}

#[test]
fn test_each_index_is_a_string() {
    let context = json!({"items": [10, 20, 30]});
    assert_eq!(render("{{#each items}}{{@index}}{{/each}}", &context), "012");
}

#[test]
fn test_each_over_object_keys_in_insertion_order() {
    let context = json!({"obj": {"x": 1, "y": 2}});
    assert_eq!(render("{{#each obj}}{{@key}}{{/each}}", &context), "xy");
    assert_eq!(render("{{#each obj}}{{@key}}={{this}};{{/each}}", &context), "x=1;y=2;");
}

#[test]
fn test_each_first_and_last_flags() {
    let context = json!({"items": [1, 2, 3]});
    let template = "{{#each items}}{{#if @first}}[{{/if}}{{this}}{{#if @last}}]{{/if}}{{/each}}";
    assert_eq!(render(template, &context), "[123]");
}

#[test]
fn test_each_scope_sees_enclosing_context() {
    let context = json!({"prefix": "p", "items": [1, 2]});
    assert_eq!(render("{{#each items}}{{prefix}}{{this}} {{/each}}", &context), "p1 p2 ");
}

#[test]
fn test_each_missing_or_scalar_renders_nothing() {
    assert_eq!(render("a{{#each items}}X{{/each}}b", &json!({})), "ab");
    assert_eq!(render("a{{#each items}}X{{/each}}b", &json!({"items": 42})), "ab");
    assert_eq!(render("a{{#each items}}X{{/each}}b", &json!({"items": []})), "ab");
}

#[test]
fn test_nested_each() {
    let context = json!({
        "groups": [
            {"members": ["a", "b"]},
            {"members": ["c"]}
        ]
    });
    let template = "{{#each groups}}{{#each this.members}}{{this}};{{/each}}|{{/each}}";
    assert_eq!(render(template, &context), "a;b;|c;|");
}

#[test]
fn test_each_with_helper_in_body() {
    let context = json!({"items": ["first-one", "second-one"]});
    let template = "{{#each items}}{{helper:pascalcase this}} {{/each}}";
    assert_eq!(render(template, &context), "FirstOne SecondOne ");
}

#[test]
fn test_rendering_is_idempotent_without_injected_tokens() {
    let context = json!({"name": "n", "items": [1, 2]});
    let template = "{{name}}: {{#each items}}{{this}}{{/each}}";
    let once = render(template, &context);
    let twice = render(&once, &context);
    assert_eq!(once, twice);
}

#[test]
fn test_pathological_input_terminates() {
    let context = json!({});
    // No closing braces at all.
    assert_eq!(render("{{#if {{#if {{#if", &context), "{{#if {{#if {{#if");
    // A long run of open blocks with no closers still finishes.
    let storm = "{{#if x}}".repeat(200);
    let rendered = render(&storm, &json!({"x": true}));
    assert_eq!(rendered, "");
}

#[test]
fn test_context_is_not_mutated() {
    let context = json!({"items": [1, 2], "name": "n"});
    let before = context.clone();
    let _ = render("{{#each items}}{{this}}{{name}}{{/each}}", &context);
    assert_eq!(context, before);
}

#[test]
fn test_concurrent_renders_are_isolated() {
    let engine = Engine::new();
    let template = r#"{"project":"{{project_name}}","id":"{{id}}"}"#;

    thread::scope(|scope| {
        let mut handles = Vec::new();
        for thread_id in 0..10 {
            let engine = &engine;
            handles.push(scope.spawn(move || {
                let context = json!({
                    "project_name": format!("project-{}", thread_id),
                    "id": thread_id.to_string(),
                });
                let rendered = engine.render(template, &context).unwrap();
                (thread_id, rendered)
            }));
        }
        for handle in handles {
            let (thread_id, rendered) = handle.join().unwrap();
            let expected = format!(
                "{{\"project\":\"project-{}\",\"id\":\"{}\"}}",
                thread_id, thread_id
            );
            assert_eq!(rendered, expected);
        }
    });
}

#[test]
fn test_with_validation_blocks_broken_templates() {
    let engine = Engine::with_validation();
    let err = engine.render("{{a}} {{b}} {{", &json!({})).unwrap_err();
    assert!(err.to_string().contains("UNBALANCED_BRACES"));

    // The lenient engine renders the same input without complaint.
    let lenient = Engine::new().render("{{a}} {{b}} {{", &json!({"a": 1, "b": 2}));
    assert_eq!(lenient.unwrap(), "1 2 {{");
}

#[test]
fn test_with_validation_allows_clean_templates() {
    let engine = Engine::with_validation();
    let rendered = engine.render("Hello {{name}}", &json!({"name": "ok"})).unwrap();
    assert_eq!(rendered, "Hello ok");
}
