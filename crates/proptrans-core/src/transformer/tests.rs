//! Tests for property transformers and the resolution entry point
//!
//! Copyright (c) 2025 Proptrans Team
//! Licensed under the Apache-2.0 license

#[cfg(test)]
mod tests {
    use crate::labels::{Direction, Format, ALL, EDIT, HTML, JSON, OUTPUT, READ, SAVE, SQL};
    use crate::reflection::{Reflection, SchemaReflection};
    use crate::registry::{ResolutionSource, TransformerRegistry};
    use crate::transformer::{
        built_in, transformer_fn, FnTransformer, Resolution, Slot, TransformInput, Transformer,
        TransformerEntry, TransformerRef,
    };
    use crate::types::{PrimitiveType, PropertyType, Record, Target, TypeRef};
    use crate::Error;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn input(value: Value) -> TransformInput {
        TransformInput {
            value,
            target: Target::from(TypeRef::named("Person")),
            property: "field".to_string(),
            data: None,
            format: JSON,
            direction: READ,
        }
    }

    fn person() -> Target {
        Target::from(Record::new("Person").with_field("age", json!(5)))
    }

    fn person_schema() -> SchemaReflection {
        SchemaReflection::new()
            .with_property("Person", "age", PrimitiveType::Number)
            .with_property("Person", "name", PrimitiveType::String)
            .with_property("Person", "address", TypeRef::named("Address"))
    }

    fn number() -> PropertyType {
        PropertyType::Primitive(PrimitiveType::Number)
    }

    fn constant(name: &str, value: Value) -> TransformerRef {
        Arc::new(FnTransformer::named(name, move |_| Ok(value.clone())))
    }

    /// Reflection that counts how often it is consulted
    struct CountingReflection {
        inner: SchemaReflection,
        calls: Arc<AtomicUsize>,
    }

    impl Reflection for CountingReflection {
        fn property_type(&self, target: &Target, property: &str) -> Option<PropertyType> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.property_type(target, property)
        }
    }

    fn counting_registry() -> (TransformerRegistry, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let registry = TransformerRegistry::new(CountingReflection {
            inner: person_schema(),
            calls: calls.clone(),
        });
        (registry, calls)
    }

    // ---- built-ins ----

    #[tokio::test]
    async fn test_multiply_keeps_integers_integral() {
        let doubled = built_in::multiply(2.0).transform(input(json!(5))).await.unwrap();
        assert_eq!(doubled, json!(10));

        let halved = built_in::multiply(0.5).transform(input(json!(3))).await.unwrap();
        assert_eq!(halved, json!(1.5));
    }

    #[tokio::test]
    async fn test_multiply_factor_beyond_i64_uses_floats() {
        let factor = 2f64.powi(63);
        let product = built_in::multiply(factor)
            .transform(input(json!(1)))
            .await
            .unwrap();
        assert_eq!(product.as_f64(), Some(factor));
        assert!(!product.is_i64());
    }

    #[tokio::test]
    async fn test_multiply_rejects_non_numbers() {
        let err = built_in::multiply(2.0)
            .transform(input(json!("five")))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Transformer { ref property, .. } if property == "field"));
    }

    #[tokio::test]
    async fn test_string_number_conversions() {
        let parsed = built_in::string_to_number()
            .transform(input(json!(" 0.7 ")))
            .await
            .unwrap();
        assert_eq!(parsed, json!(0.7));

        let integer = built_in::string_to_number()
            .transform(input(json!("42")))
            .await
            .unwrap();
        assert_eq!(integer, json!(42));

        assert!(built_in::string_to_number()
            .transform(input(json!("warm")))
            .await
            .is_err());

        let text = built_in::number_to_string()
            .transform(input(json!(42)))
            .await
            .unwrap();
        assert_eq!(text, json!("42"));
    }

    #[tokio::test]
    async fn test_text_built_ins() {
        let trimmed = built_in::trim().transform(input(json!("  Ada "))).await.unwrap();
        assert_eq!(trimmed, json!("Ada"));

        let escaped = built_in::html_escape()
            .transform(input(json!("<b>Tom & \"Jerry\"</b>")))
            .await
            .unwrap();
        assert_eq!(escaped, json!("&lt;b&gt;Tom &amp; &quot;Jerry&quot;&lt;/b&gt;"));

        let label = built_in::boolean_label("oui", "non")
            .transform(input(json!(false)))
            .await
            .unwrap();
        assert_eq!(label, json!("non"));

        // Non-matching values pass through
        let untouched = built_in::html_escape().transform(input(json!(3))).await.unwrap();
        assert_eq!(untouched, json!(3));
    }

    #[tokio::test]
    async fn test_date_format() {
        let format = built_in::date_format("%d/%m/%Y");
        let from_timestamp = format
            .transform(input(json!("2024-03-09T10:30:00Z")))
            .await
            .unwrap();
        assert_eq!(from_timestamp, json!("09/03/2024"));

        let from_date = format.transform(input(json!("2024-12-31"))).await.unwrap();
        assert_eq!(from_date, json!("31/12/2024"));

        assert!(format.transform(input(json!("yesterday"))).await.is_err());
    }

    #[test]
    fn test_sql_quote_post_processor() {
        let quote = built_in::sql_quote();
        let data = json!({});
        assert_eq!(quote(json!("abc"), &data).unwrap(), json!("'abc'"));
        assert_eq!(quote(json!("O'Hara"), &data).unwrap(), json!("'O''Hara'"));
        assert_eq!(quote(Value::Null, &data).unwrap(), json!("NULL"));
        assert_eq!(quote(json!(12), &data).unwrap(), json!(12));
    }

    #[test]
    fn test_json_string_post_processor() {
        let render = built_in::json_string();
        assert_eq!(render(json!({"a": 1}), &json!({})).unwrap(), json!("{\"a\":1}"));
    }

    #[test]
    fn test_named_built_ins() {
        assert_eq!(built_in::named("trim", &Value::Null).unwrap().name(), "trim");
        assert_eq!(
            built_in::named("multiply", &json!({"factor": 3})).unwrap().name(),
            "multiply"
        );
        assert!(matches!(
            built_in::named("multiply", &Value::Null),
            Err(Error::Configuration { .. })
        ));
        assert!(matches!(
            built_in::named("date_format", &json!({"pattern": "%Q"})),
            Err(Error::Configuration { .. })
        ));
        assert!(matches!(
            built_in::named("rot13", &Value::Null),
            Err(Error::UnknownBuiltIn { .. })
        ));
        assert!(built_in::named_format("sql_quote").is_ok());
        assert!(matches!(
            built_in::named_format("xml"),
            Err(Error::UnknownBuiltIn { .. })
        ));

        for name in built_in::TRANSFORMER_NAMES {
            let options = json!({"factor": 1});
            assert!(built_in::named(name, &options).is_ok(), "{} should build", name);
        }
    }

    // ---- resolution ----

    #[tokio::test]
    async fn test_number_json_any_direction_doubles() {
        let registry = TransformerRegistry::new(person_schema());
        registry.set_property_type_transformer(
            &number(),
            JSON,
            Direction::Any,
            transformer_fn(|input| Ok(json!(input.value.as_i64().unwrap_or(0) * 2))),
        );

        let value = registry
            .apply_transformer(json!(5), &person(), "age", &JSON, &READ, None)
            .await
            .unwrap();
        assert_eq!(value, json!(10));
    }

    #[tokio::test]
    async fn test_nothing_registered_passes_through() {
        let registry = TransformerRegistry::new(person_schema());
        let value = registry
            .apply_transformer(json!("x"), &person(), "name", &HTML, &EDIT, None)
            .await
            .unwrap();
        assert_eq!(value, json!("x"));
    }

    #[tokio::test]
    async fn test_sql_post_processor_needs_context_data() {
        let registry = TransformerRegistry::new(person_schema());
        registry.set_format_transformer(SQL, built_in::sql_quote());

        let with_data = registry
            .apply_transformer(json!("abc"), &person(), "name", &SQL, &SAVE, Some(&json!({})))
            .await
            .unwrap();
        assert_eq!(with_data, json!("'abc'"));

        let without_data = registry
            .apply_transformer(json!("abc"), &person(), "name", &SQL, &SAVE, None)
            .await
            .unwrap();
        assert_eq!(without_data, json!("abc"));
    }

    #[tokio::test]
    async fn test_empty_like_context_data_skips_post_processor() {
        let registry = TransformerRegistry::new(person_schema());
        registry.set_format_transformer(SQL, built_in::sql_quote());

        for data in [json!(null), json!(false), json!(0), json!(""), json!(0.0)] {
            let value = registry
                .apply_transformer(json!("abc"), &person(), "name", &SQL, &SAVE, Some(&data))
                .await
                .unwrap();
            assert_eq!(value, json!("abc"), "context data {}", data);
        }

        for data in [json!({}), json!([]), json!(true), json!(1), json!("x")] {
            let value = registry
                .apply_transformer(json!("abc"), &person(), "name", &SQL, &SAVE, Some(&data))
                .await
                .unwrap();
            assert_eq!(value, json!("'abc'"), "context data {}", data);
        }
    }

    #[tokio::test]
    async fn test_post_processor_applies_after_property_transformer() {
        let registry = TransformerRegistry::new(person_schema());
        registry.set_property_type_transformer(
            &PropertyType::Primitive(PrimitiveType::String),
            SQL,
            SAVE,
            built_in::trim(),
        );
        registry.set_format_transformer(SQL, built_in::sql_quote());

        let data = json!({"table": "person"});
        let with_data = registry
            .apply_transformer(json!(" Ada "), &person(), "name", &SQL, &SAVE, Some(&data))
            .await
            .unwrap();
        let without_data = registry
            .apply_transformer(json!(" Ada "), &person(), "name", &SQL, &SAVE, None)
            .await
            .unwrap();

        assert_eq!(without_data, json!("Ada"));
        let post = registry.format_transformer(&SQL).unwrap();
        assert_eq!(with_data, post(without_data, &data).unwrap());
    }

    #[tokio::test]
    async fn test_reflection_consulted_once_per_coordinate() {
        let (registry, calls) = counting_registry();
        registry.set_property_type_transformer(&number(), JSON, READ, built_in::multiply(3.0));

        for _ in 0..3 {
            let value = registry
                .apply_transformer(json!(2), &person(), "age", &JSON, &READ, None)
                .await
                .unwrap();
            assert_eq!(value, json!(6));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // A different coordinate is resolved on its own
        registry
            .apply_transformer(json!(2), &person(), "age", &HTML, &EDIT, None)
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_instances_share_the_memoized_slot() {
        let (registry, calls) = counting_registry();
        let first = person();
        let second = Target::from(Record::new("Person"));

        registry
            .apply_transformer(json!(1), &first, "age", &JSON, &READ, None)
            .await
            .unwrap();
        registry
            .apply_transformer(json!(1), &second, "age", &JSON, &READ, None)
            .await
            .unwrap();
        registry
            .apply_transformer(json!(1), &Target::from(TypeRef::named("Person")), "age", &JSON, &READ, None)
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_no_transformer_is_sticky() {
        let (registry, calls) = counting_registry();

        let first = registry
            .apply_transformer(json!(7), &person(), "age", &JSON, &READ, None)
            .await
            .unwrap();
        assert_eq!(first, json!(7));
        assert!(matches!(
            registry.property_transformer(&person(), "age", &JSON, &READ),
            Slot::NoTransformer
        ));

        // Registering a type transformer afterwards does not reopen the resolved slot
        registry.set_property_type_transformer(&number(), JSON, READ, built_in::multiply(2.0));
        let second = registry
            .apply_transformer(json!(7), &person(), "age", &JSON, &READ, None)
            .await
            .unwrap();
        assert_eq!(second, json!(7));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_undeclared_property_resolves_to_pass_through() {
        let (registry, calls) = counting_registry();
        registry.set_property_type_transformer(&ALL, Format::Any, Direction::Any, constant("everything", json!("!")));

        let value = registry
            .apply_transformer(json!("nick"), &person(), "nickname", &JSON, &READ, None)
            .await
            .unwrap();
        assert_eq!(value, json!("nick"));

        registry
            .apply_transformer(json!("nick"), &person(), "nickname", &JSON, &READ, None)
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_property_override_beats_type_entry() {
        let (registry, calls) = counting_registry();
        registry.set_property_type_transformer(&number(), JSON, READ, constant("type", json!("type")));
        registry.set_property_transformer(
            &person(),
            "age",
            JSON,
            READ,
            constant("override", json!("override")),
        );

        let value = registry
            .apply_transformer(json!(1), &person(), "age", &JSON, &READ, None)
            .await
            .unwrap();
        assert_eq!(value, json!("override"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_explicit_skip_override_disables_type_entry() {
        let registry = TransformerRegistry::new(person_schema());
        registry.set_property_type_transformer(&number(), Format::Any, Direction::Any, built_in::multiply(10.0));
        let stored = registry.set_property_transformer(&person(), "age", HTML, Direction::Any, Resolution::Skip);
        assert!(matches!(stored, Resolution::Skip));

        let html = registry
            .apply_transformer(json!(4), &person(), "age", &HTML, &EDIT, None)
            .await
            .unwrap();
        let json_value = registry
            .apply_transformer(json!(4), &person(), "age", &JSON, &EDIT, None)
            .await
            .unwrap();
        assert_eq!(html, json!(4));
        assert_eq!(json_value, json!(40));
    }

    #[tokio::test]
    async fn test_wildcard_type_is_the_fallback() {
        let registry = TransformerRegistry::new(person_schema());
        registry.set_property_type_transformer(&ALL, HTML, Direction::Any, built_in::html_escape());
        registry.set_property_type_transformer(
            &PropertyType::Primitive(PrimitiveType::String),
            JSON,
            Direction::Any,
            built_in::trim(),
        );

        // String has a table, but no html entry: the wildcard wins
        let html = registry
            .apply_transformer(json!("<i>"), &person(), "name", &HTML, &OUTPUT, None)
            .await
            .unwrap();
        assert_eq!(html, json!("&lt;i&gt;"));

        let json_value = registry
            .apply_transformer(json!(" <i> "), &person(), "name", &JSON, &OUTPUT, None)
            .await
            .unwrap();
        assert_eq!(json_value, json!("<i>"));
    }

    #[tokio::test]
    async fn test_property_declared_as_any_is_undeclared() {
        let schema = person_schema().with_property("Person", "extra", ALL);
        let registry = TransformerRegistry::new(schema);
        registry.set_property_type_transformer(&ALL, HTML, Direction::Any, built_in::html_escape());

        let value = registry
            .apply_transformer(json!("<i>"), &person(), "extra", &HTML, &OUTPUT, None)
            .await
            .unwrap();
        assert_eq!(value, json!("<i>"));
        assert!(matches!(
            registry.property_transformer(&person(), "extra", &HTML, &OUTPUT),
            Slot::NoTransformer
        ));

        let report = registry.explain(&person(), "extra", &HTML, &READ);
        assert_eq!(report.source, ResolutionSource::None);
        assert_eq!(report.declared_type, None);
    }

    #[tokio::test]
    async fn test_declared_class_type_uses_its_entry() {
        let registry = TransformerRegistry::new(person_schema());
        registry.set_property_type_transformers(
            &PropertyType::named("Address"),
            vec![TransformerEntry::new(constant("address", json!("1 Main St"))).format(HTML)],
        );

        let value = registry
            .apply_transformer(json!({"street": "Main"}), &person(), "address", &HTML, &READ, None)
            .await
            .unwrap();
        assert_eq!(value, json!("1 Main St"));
    }

    #[tokio::test]
    async fn test_decorated_declared_type_is_normalized() {
        let schema = SchemaReflection::new().with_property("Person", "tags", "collection(Tag)");
        let registry = TransformerRegistry::new(schema);
        registry.set_property_type_transformer(&PropertyType::named("Tag"), JSON, Direction::Any, constant("tags", json!([])));

        let value = registry
            .apply_transformer(json!(["a"]), &person(), "tags", &JSON, &READ, None)
            .await
            .unwrap();
        assert_eq!(value, json!([]));
    }

    #[tokio::test]
    async fn test_transformer_receives_full_context() {
        let registry = TransformerRegistry::new(person_schema());
        registry.set_property_transformer(
            &person(),
            "name",
            Format::Any,
            Direction::Any,
            transformer_fn(|input| {
                let age = input
                    .target
                    .as_record()
                    .and_then(|record| record.get("age"))
                    .cloned()
                    .unwrap_or(Value::Null);
                Ok(json!({
                    "value": input.value,
                    "property": input.property,
                    "format": input.format,
                    "direction": input.direction,
                    "data": input.data,
                    "age": age,
                }))
            }),
        );

        let value = registry
            .apply_transformer(json!("Ada"), &person(), "name", &SQL, &SAVE, Some(&json!({"id": 1})))
            .await
            .unwrap();
        assert_eq!(
            value,
            json!({
                "value": "Ada",
                "property": "name",
                "format": "sql",
                "direction": "save",
                "data": {"id": 1},
                "age": 5,
            })
        );
    }

    #[tokio::test]
    async fn test_async_transformer_is_awaited() {
        let registry = TransformerRegistry::new(person_schema());
        let transformer: TransformerRef = Arc::new(|input: TransformInput| async move {
            tokio::task::yield_now().await;
            Ok::<_, Error>(json!(format!("{}!", input.value.as_str().unwrap_or_default())))
        });
        registry.set_property_transformer(&person(), "name", Format::Any, Direction::Any, transformer);

        let value = registry
            .apply_transformer(json!("hey"), &person(), "name", &JSON, &READ, None)
            .await
            .unwrap();
        assert_eq!(value, json!("hey!"));
    }

    #[tokio::test]
    async fn test_transformer_errors_propagate_unchanged() {
        let registry = TransformerRegistry::new(person_schema());
        registry.set_property_type_transformer(
            &number(),
            Format::Any,
            Direction::Any,
            transformer_fn(|input| Err(Error::transformer(input.property, "refused"))),
        );
        registry.set_format_transformer(JSON, built_in::json_string());

        let err = registry
            .apply_transformer(json!(1), &person(), "age", &JSON, &READ, Some(&json!({})))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Transformer failed for property 'age': refused");
    }

    #[test]
    fn test_explain_reports_without_memoizing() {
        let (registry, calls) = counting_registry();
        registry.set_property_type_transformer(&ALL, JSON, Direction::Any, built_in::number_to_string());

        let report = registry.explain(&person(), "age", &JSON, &READ);
        assert_eq!(report.source, ResolutionSource::Wildcard);
        assert_eq!(report.declared_type, Some(number()));
        assert_eq!(report.transformer.as_deref(), Some("number_to_string"));
        assert!(registry
            .property_transformer(&person(), "age", &JSON, &READ)
            .is_unresolved());

        let undeclared = registry.explain(&person(), "nickname", &JSON, &READ);
        assert_eq!(undeclared.source, ResolutionSource::None);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_explain_reports_property_slot() {
        let registry = TransformerRegistry::new(person_schema());
        registry.set_property_transformer(&person(), "age", JSON, READ, built_in::trim());

        let report = registry.explain(&person(), "age", &JSON, &READ);
        assert_eq!(report.source, ResolutionSource::Property);
        assert_eq!(report.transformer.as_deref(), Some("trim"));
    }
}
