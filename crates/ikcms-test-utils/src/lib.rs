//! Testing utilities for the ikcms workspace
//!
//! Shared schema fixtures and documents.

#![allow(missing_docs)]

use ikcms_forms::{Converter, Field, FieldSpec};
use serde_json::{json, Value};
use std::io::Write;
use tempfile::NamedTempFile;

/// Article schema as YAML, the way schema files are written
pub const ARTICLE_SCHEMA_YAML: &str = r#"
name: article
type: dict
fields:
  - name: title
    type: str
  - name: views
    type: int
  - name: published
    type: date
    format: "%Y-%m-%d"
  - name: authors
    type: list
    item:
      type: dict
      fields:
        - name: name
          type: str
        - name: born
          type: date
          format: "%d.%m.%Y"
"#;

pub fn article_spec() -> FieldSpec {
    FieldSpec::from_yaml_str(ARTICLE_SCHEMA_YAML).unwrap()
}

/// Same tree as [`ARTICLE_SCHEMA_YAML`], built by hand
pub fn article_field() -> Field {
    let author = Field::item(Converter::dict(vec![
        Field::str("name"),
        Field::date("born", "%d.%m.%Y").unwrap(),
    ]))
    .unwrap();

    Field::dict(
        "article",
        vec![
            Field::str("title"),
            Field::int("views"),
            Field::date("published", "%Y-%m-%d").unwrap(),
            Field::list("authors", vec![author]).unwrap(),
        ],
    )
    .unwrap()
}

pub fn valid_article() -> Value {
    json!({
        "title": "Hello",
        "views": 3,
        "published": "2021-06-30",
        "authors": [
            {"name": "Ann", "born": "01.02.1980"},
            {"name": "Bob", "born": "15.11.1975"}
        ]
    })
}

/// Fails on `views`, `published` and the second author's `born`
pub fn invalid_article() -> Value {
    json!({
        "title": "Hello",
        "views": "many",
        "published": "30/06/2021",
        "authors": [
            {"name": "Ann", "born": "01.02.1980"},
            {"name": "Bob", "born": "1975-11-15"}
        ]
    })
}

/// Write `contents` to a temp file with the given suffix
pub fn temp_file(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
