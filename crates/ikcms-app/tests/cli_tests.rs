use ikcms_app::cli::{command, run};
use ikcms_test_utils::{invalid_article, temp_file, valid_article, ARTICLE_SCHEMA_YAML};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tempfile::NamedTempFile;

fn run_args(args: &[&str]) -> (anyhow::Result<bool>, String) {
    let matches = command()
        .try_get_matches_from(std::iter::once("ikcms").chain(args.iter().copied()))
        .unwrap();
    let mut out = Vec::new();
    let result = run(&matches, &mut out);
    (result, String::from_utf8(out).unwrap())
}

fn path(file: &NamedTempFile) -> &str {
    file.path().to_str().unwrap()
}

#[test]
fn validate_prints_canonical_document() {
    let schema = temp_file(".yaml", ARTICLE_SCHEMA_YAML);
    let input = temp_file(".json", &valid_article().to_string());

    let (result, out) = run_args(&["validate", "--schema", path(&schema), "--input", path(&input)]);

    assert!(result.unwrap());
    assert_eq!(serde_json::from_str::<Value>(&out).unwrap(), valid_article());
}

#[test]
fn validate_lists_failing_paths() {
    let schema = temp_file(".yaml", ARTICLE_SCHEMA_YAML);
    let input = temp_file(".json", &invalid_article().to_string());

    let (result, out) = run_args(&["validate", "--schema", path(&schema), "--input", path(&input)]);

    assert!(!result.unwrap());
    assert_eq!(
        out,
        "views: Not a valid integer\n\
         published: Not a valid date\n\
         authors[1].born: Not a valid date\n"
    );
}

#[test]
fn validate_json_prints_error_tree() {
    let schema = temp_file(".yaml", ARTICLE_SCHEMA_YAML);
    let input = temp_file(".json", &invalid_article().to_string());

    let (result, out) = run_args(&[
        "validate",
        "--schema",
        path(&schema),
        "--input",
        path(&input),
        "--json",
    ]);

    assert!(!result.unwrap());
    assert_eq!(
        serde_json::from_str::<Value>(&out).unwrap(),
        json!({
            "views": "Not a valid integer",
            "published": "Not a valid date",
            "authors": [null, {"born": "Not a valid date"}]
        })
    );
}

#[test]
fn validate_reports_wrong_document_shape_at_root() {
    let schema = temp_file(".yaml", ARTICLE_SCHEMA_YAML);
    let input = temp_file(".json", "[1, 2]");

    let (result, out) = run_args(&["validate", "--schema", path(&schema), "--input", path(&input)]);

    assert!(!result.unwrap());
    assert_eq!(out, "<root>: Not a valid dict\n");
}

#[test]
fn validate_json_reports_wrong_document_shape_as_json() {
    let schema = temp_file(".yaml", ARTICLE_SCHEMA_YAML);
    let input = temp_file(".json", "[1, 2]");

    let (result, out) = run_args(&[
        "validate",
        "--schema",
        path(&schema),
        "--input",
        path(&input),
        "--json",
    ]);

    assert!(!result.unwrap());
    assert_eq!(
        serde_json::from_str::<Value>(&out).unwrap(),
        json!("Not a valid dict")
    );
}

#[test]
fn validate_with_config_and_cache() {
    let schema = temp_file(".yaml", ARTICLE_SCHEMA_YAML);
    let input = temp_file(".json", &valid_article().to_string());
    let config = temp_file(".toml", "[cache]\nprefix = \"cli:\"\n\n[logging]\nlevel = \"warn\"\n");

    let (result, out) = run_args(&[
        "--config",
        path(&config),
        "validate",
        "--schema",
        path(&schema),
        "--input",
        path(&input),
        "--cached",
    ]);

    assert!(result.unwrap());
    assert_eq!(serde_json::from_str::<Value>(&out).unwrap(), valid_article());
}

#[test]
fn malformed_input_is_an_error() {
    let schema = temp_file(".yaml", ARTICLE_SCHEMA_YAML);
    let input = temp_file(".json", "{not json");

    let (result, out) = run_args(&["validate", "--schema", path(&schema), "--input", path(&input)]);

    assert!(result.is_err());
    assert!(out.is_empty());
}

#[test]
fn bad_config_is_an_error() {
    let schema = temp_file(".yaml", ARTICLE_SCHEMA_YAML);
    let config = temp_file(".toml", "[cache\n");

    let (result, _) = run_args(&["--config", path(&config), "check-schema", "--schema", path(&schema)]);

    assert!(result.is_err());
}

#[test]
fn check_schema_accepts_valid_schema() {
    let schema = temp_file(".yaml", ARTICLE_SCHEMA_YAML);

    let (result, out) = run_args(&["check-schema", "--schema", path(&schema)]);

    assert!(result.unwrap());
    assert_eq!(out, "schema 'article' ok (4 fields)\n");
}

#[test]
fn check_schema_rejects_list_without_item() {
    let schema = temp_file(".json", r#"{"name": "tags", "type": "list"}"#);

    let (result, out) = run_args(&["check-schema", "--schema", path(&schema)]);

    assert!(!result.unwrap());
    assert!(out.contains("tags"));
}

#[test]
fn check_schema_missing_file_is_an_error() {
    let (result, _) = run_args(&["check-schema", "--schema", "/definitely/not/here.yaml"]);
    assert!(result.is_err());
}
