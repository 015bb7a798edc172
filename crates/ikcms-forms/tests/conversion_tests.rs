use chrono::NaiveDate;
use ikcms_forms::{ConvError, Converter, Field, RawKind, TypedValue};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{json, Value};

fn article_schema() -> Field {
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
            Field::bool("draft"),
            Field::date("published", "%Y-%m-%d").unwrap(),
            Field::list("tags", vec![Field::item(Converter::Str).unwrap()]).unwrap(),
            Field::list("authors", vec![author]).unwrap(),
            Field::raw_dict("meta"),
            Field::raw_list("history"),
        ],
    )
    .unwrap()
}

fn valid_article() -> Value {
    json!({
        "title": "Hello",
        "views": 10,
        "draft": false,
        "published": "2021-06-30",
        "tags": ["news", "rust"],
        "authors": [{"name": "Ann", "born": "01.02.1980"}],
        "meta": {"source": {"id": 4, "score": 0.5}},
        "history": [1, "two", null]
    })
}

#[test]
fn valid_document_converts_and_round_trips() {
    let schema = article_schema();
    let raw = valid_article();

    let typed = schema.to_typed(&raw).unwrap();
    assert_eq!(typed.get("title"), Some(&TypedValue::from("Hello")));
    assert_eq!(
        typed.get("published").and_then(TypedValue::as_date),
        NaiveDate::from_ymd_opt(2021, 6, 30)
    );
    assert_eq!(
        typed
            .get("authors")
            .and_then(TypedValue::as_list)
            .and_then(|authors| authors[0].get("born"))
            .and_then(TypedValue::as_date),
        NaiveDate::from_ymd_opt(1980, 2, 1)
    );
    assert_eq!(typed.get("meta").and_then(TypedValue::as_raw), Some(&raw["meta"]));

    assert_eq!(schema.to_raw(&typed).unwrap(), raw);
}

#[test]
fn typed_mapping_keeps_schema_order() {
    let typed = article_schema().to_typed(&valid_article()).unwrap();
    let keys: Vec<_> = typed.as_dict().unwrap().keys().cloned().collect();
    assert_eq!(
        keys,
        vec!["title", "views", "draft", "published", "tags", "authors", "meta", "history"]
    );
}

#[test]
fn every_failing_leaf_is_reported_at_once() {
    let mut raw = valid_article();
    raw["views"] = json!("10");
    raw["tags"] = json!(["ok", 3]);
    raw["authors"] = json!([{"name": "Ann", "born": "1980-02-01"}]);
    raw["meta"] = json!([]);

    let err = article_schema().to_typed(&raw).unwrap_err();
    let errors = err.validation().expect("aggregated error");

    assert_eq!(
        serde_json::to_value(errors).unwrap(),
        json!({
            "views": "Not a valid integer",
            "tags": [null, "Not a valid string"],
            "authors": [{"born": "Not a valid date"}],
            "meta": "Not a valid dict"
        })
    );

    let paths: Vec<_> = errors.leaves().into_iter().map(|(path, _)| path).collect();
    assert_eq!(paths, vec!["views", "tags[1]", "authors[0].born", "meta"]);
}

#[test]
fn malformed_and_valid_siblings() {
    let schema = Field::dict("doc", vec![Field::date("a", "%Y-%m-%d").unwrap(), Field::str("b")])
        .unwrap();

    let err = schema
        .to_typed(&json!({"a": "garbage", "b": "fine"}))
        .unwrap_err();

    match err {
        ConvError::Validation(errors) => {
            assert!(errors.field("a").is_some());
            assert!(errors.field("b").is_none());
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn top_level_type_error_is_not_folded() {
    let err = article_schema().to_typed(&json!("not an object")).unwrap_err();
    assert_eq!(
        err,
        ConvError::RawValueType {
            expected: RawKind::Dict,
            field: Some("article".to_string()),
        }
    );
}

#[test]
fn null_document_short_circuits() {
    let schema = article_schema();
    assert_eq!(schema.to_typed(&Value::Null).unwrap(), TypedValue::Null);
    assert_eq!(schema.to_raw(&TypedValue::Null).unwrap(), Value::Null);
}

#[test]
fn empty_list_field_fails_before_data() {
    assert!(Field::list("tags", vec![]).is_err());
}

fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (1i32..=9999, 1u32..=365).prop_filter_map("valid ordinal", |(year, day)| {
        NaiveDate::from_yo_opt(year, day)
    })
}

prop_compose! {
    fn arb_article()(
        title in ".*",
        views in any::<i64>(),
        draft in any::<bool>(),
        published in date_strategy(),
        tags in proptest::collection::vec("[a-z]{0,8}", 0..5),
        authors in proptest::collection::vec(("[A-Za-z ]{1,12}", date_strategy()), 0..4),
        meta_score in any::<i32>(),
    ) -> Value {
        json!({
            "title": title,
            "views": views,
            "draft": draft,
            "published": published.format("%Y-%m-%d").to_string(),
            "tags": tags,
            "authors": authors
                .into_iter()
                .map(|(name, born)| json!({"name": name, "born": born.format("%d.%m.%Y").to_string()}))
                .collect::<Vec<_>>(),
            "meta": {"score": meta_score},
            "history": [],
        })
    }
}

proptest! {
    #[test]
    fn prop_valid_documents_round_trip(raw in arb_article()) {
        let schema = article_schema();
        let typed = schema.to_typed(&raw).unwrap();
        prop_assert_eq!(schema.to_raw(&typed).unwrap(), raw);
    }

    #[test]
    fn prop_list_errors_align_with_input(
        items in proptest::collection::vec(prop_oneof![Just(true), Just(false)], 0..20)
    ) {
        let field = Field::list("ns", vec![Field::item(Converter::Int).unwrap()]).unwrap();
        let raw: Vec<Value> = items
            .iter()
            .enumerate()
            .map(|(i, ok)| if *ok { json!(i) } else { json!(i.to_string()) })
            .collect();

        match field.to_typed(&Value::Array(raw)) {
            Ok(typed) => {
                prop_assert!(items.iter().all(|ok| *ok));
                prop_assert_eq!(typed.as_list().unwrap().len(), items.len());
            }
            Err(err) => {
                let errors = serde_json::to_value(err.validation().unwrap()).unwrap();
                let errors = errors.as_array().unwrap();
                prop_assert_eq!(errors.len(), items.len());
                for (error, ok) in errors.iter().zip(&items) {
                    prop_assert_eq!(error.is_null(), *ok);
                }
            }
        }
    }
}
