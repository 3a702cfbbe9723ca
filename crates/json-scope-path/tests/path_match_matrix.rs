use json_scope_path::{
    collect_matching_paths, format_concrete_path, is_path_match, parse_concrete_path, parse_path,
};
use serde_json::json;

fn is_match(target: &str, pattern: &str) -> bool {
    is_path_match(&parse_concrete_path(target), &parse_path(pattern).steps)
}

#[test]
fn match_matrix() {
    assert!(is_match("a", "a"));
    assert!(is_match("b.a", "**a"));
    assert!(is_match("c[1].b.a", "**a"));
    assert!(is_match("c[1].b.a", "c[].**a"));
    assert!(is_match("c[1].b.a", "c.**.a"));
    assert!(is_match("c[1]", "c[]"));
    assert!(is_match("c[1]", "c.1"));
    assert!(!is_match("c[1]", "c[0]"));
    assert!(!is_match("c.x", "c[]"));
    assert!(!is_match("a.b", "a"));
    assert!(!is_match("a", "a.b"));
    assert!(is_match("a.b", "a.**"));
    assert!(is_match("a", "a.**"));
}

#[test]
fn deep_recursive_pattern_does_not_blow_up() {
    let target: String = (0..60).map(|_| "x").collect::<Vec<_>>().join(".");
    let pattern = "**x.**x.**x.**x.**y";
    assert!(!is_match(&target, pattern));
}

#[test]
fn expansion_matrix() {
    let doc = json!({
        "users": [
            {"id": 1, "profile": {"settings": {"theme": "dark"}}},
            {"id": 2, "profile": {"settings": {"theme": "light"}}}
        ],
        "config": {"app": {"settings": {"theme": "auto", "debug": true}}}
    });
    let found: Vec<String> = collect_matching_paths(&doc, &parse_path("**theme").steps)
        .iter()
        .map(|p| format_concrete_path(p))
        .collect();
    assert_eq!(
        found,
        vec![
            "users[0].profile.settings.theme",
            "users[1].profile.settings.theme",
            "config.app.settings.theme",
        ]
    );

    let ids: Vec<String> = collect_matching_paths(&doc, &parse_path("users[].id").steps)
        .iter()
        .map(|p| format_concrete_path(p))
        .collect();
    assert_eq!(ids, vec!["users[0].id", "users[1].id"]);
}
