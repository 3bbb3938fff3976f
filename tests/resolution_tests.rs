// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for building configuration instances.
//!
//! These tests verify resolution end to end: defaults, coercion, deprecated aliases,
//! prefixes, nested and derived members, validators and error reporting.

mod common;

use common::{env, init_tracing, CountingSource, FailingSource};
use envspec::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

#[test]
fn test_default_used_when_unset() {
    init_tracing();
    let spec = Spec::builder()
        .var("foo", EnvVariable::new(ValueKind::Int, "FOO").default(42))
        .build()
        .unwrap();
    let config = spec.build(&env(&[])).unwrap();
    assert_eq!(config.get_int("foo").unwrap(), 42);
}

#[test]
fn test_value_read_from_source() {
    let spec = Spec::builder()
        .var("foo", EnvVariable::new(ValueKind::Int, "FOO").default(42))
        .build()
        .unwrap();
    let config = spec.build(&env(&[("FOO", "24")])).unwrap();
    assert_eq!(config.get_int("foo").unwrap(), 24);
}

#[test]
fn test_missing_mandatory_names_the_variable() {
    let spec = Spec::builder()
        .var("foo", EnvVariable::new(ValueKind::Int, "FOO"))
        .build()
        .unwrap();
    match spec.build(&env(&[])).unwrap_err() {
        ConfigError::MissingValue { name, key } => {
            assert_eq!(name, "FOO");
            assert_eq!(key, "FOO");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_deprecations_with_and_without_prefix() {
    let cases = [
        ("", Some("0.1"), Some("1.0"), "OLD_FOO has been deprecated in version 0.1 and will be removed in version 1.0. Use FOO instead"),
        ("", None, Some("1.0"), "OLD_FOO has been deprecated and will be removed in version 1.0. Use FOO instead"),
        ("", Some("0.1"), None, "OLD_FOO has been deprecated in version 0.1. Use FOO instead"),
        ("", None, None, "OLD_FOO has been deprecated. Use FOO instead"),
        ("myapp", Some("0.1"), Some("1.0"), "MYAPP_OLD_FOO has been deprecated in version 0.1 and will be removed in version 1.0. Use MYAPP_FOO instead"),
        ("myapp", None, None, "MYAPP_OLD_FOO has been deprecated. Use MYAPP_FOO instead"),
    ];

    for (prefix, since, removed, expected) in cases {
        let mut alias = Deprecation::new("old.foo");
        if let Some(version) = since {
            alias = alias.since(version);
        }
        if let Some(version) = removed {
            alias = alias.removed_in(version);
        }
        let spec = Spec::builder()
            .prefix(prefix)
            .var(
                "foo",
                EnvVariable::new(ValueKind::Int, "FOO")
                    .default(42)
                    .deprecation(alias),
            )
            .build()
            .unwrap();

        let key = if prefix.is_empty() {
            "OLD_FOO".to_string()
        } else {
            format!("{}_OLD_FOO", prefix.to_uppercase())
        };
        let source = env(&[(key.as_str(), "24")]);
        let sink = CollectingSink::new();
        let config = spec.build_with(&source, &sink).unwrap();

        assert_eq!(config.get_int("foo").unwrap(), 24);
        assert_eq!(sink.messages(), vec![expected.to_string()]);
    }
}

#[test]
fn test_first_matching_alias_wins() {
    let spec = Spec::builder()
        .var(
            "foo",
            EnvVariable::new(ValueKind::Str, "foo")
                .deprecated("a")
                .deprecated("b"),
        )
        .build()
        .unwrap();

    let sink = CollectingSink::new();
    let config = spec.build_with(&env(&[("B", "bee")]), &sink).unwrap();
    assert_eq!(config.get_str("foo").unwrap(), "bee");
    assert_eq!(sink.notices()[0].alias, "B");

    let sink = CollectingSink::new();
    let source = env(&[("A", "ay"), ("B", "bee")]);
    let config = spec.build_with(&source, &sink).unwrap();
    assert_eq!(config.get_str("foo").unwrap(), "ay");
    let notices = sink.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].alias, "A");
}

#[test]
fn test_canonical_key_takes_precedence_over_alias() {
    let spec = Spec::builder()
        .var("foo", EnvVariable::new(ValueKind::Str, "foo").deprecated("old"))
        .build()
        .unwrap();
    let sink = CollectingSink::new();
    let config = spec
        .build_with(&env(&[("FOO", "new"), ("OLD", "old")]), &sink)
        .unwrap();
    assert_eq!(config.get_str("foo").unwrap(), "new");
    assert!(sink.notices().is_empty());
}

#[test]
fn test_bool_coercion() {
    let spec = Spec::builder()
        .var("flag", EnvVariable::new(ValueKind::Bool, "flag"))
        .build()
        .unwrap();
    for raw in ["1", "True", "On", "yeS"] {
        let config = spec.build(&env(&[("FLAG", raw)])).unwrap();
        assert!(config.get_bool("flag").unwrap(), "{}", raw);
    }
    for raw in ["0", "faLse", "whatever"] {
        let config = spec.build(&env(&[("FLAG", raw)])).unwrap();
        assert!(!config.get_bool("flag").unwrap(), "{}", raw);
    }
}

#[test]
fn test_custom_parser() {
    let spec = Spec::builder()
        .var(
            "flag",
            EnvVariable::new(ValueKind::Bool, "FOO")
                .parser(|raw| Ok(Value::Bool(raw == "1" || raw.to_lowercase() == "on"))),
        )
        .build()
        .unwrap();
    for (raw, expected) in [("1", true), ("ON", true), ("yes", false), ("0", false)] {
        let config = spec.build(&env(&[("FOO", raw)])).unwrap();
        assert_eq!(config.get_bool("flag").unwrap(), expected, "{}", raw);
    }
}

#[test]
fn test_collections() {
    let kinds = [
        ValueKind::sequence(ValueKind::Str),
        ValueKind::set(ValueKind::Str),
    ];
    for kind in kinds {
        let spec = Spec::builder()
            .var("foo", EnvVariable::new(kind.clone(), "FOO"))
            .build()
            .unwrap();
        let config = spec.build(&env(&[("FOO", "1,2,3,4,5")])).unwrap();
        let value = config.value("foo").unwrap();
        match kind {
            ValueKind::Sequence(_) => {
                assert_eq!(
                    config.get::<Vec<String>>("foo").unwrap(),
                    vec!["1", "2", "3", "4", "5"]
                );
            }
            _ => {
                let expected: BTreeSet<&str> = ["1", "2", "3", "4", "5"].into_iter().collect();
                assert_eq!(value, &Value::from(expected));
            }
        }
    }
}

#[test]
fn test_collections_with_mapper() {
    let spec = Spec::builder()
        .var(
            "list",
            EnvVariable::new(ValueKind::sequence(ValueKind::Int), "FOO")
                .map(|item| Ok(Value::Int(item.parse::<i64>()?))),
        )
        .var(
            "set",
            EnvVariable::new(ValueKind::set(ValueKind::Int), "FOO")
                .map(|item| Ok(Value::Int(item.parse::<i64>()?))),
        )
        .build()
        .unwrap();
    let config = spec.build(&env(&[("FOO", "1,2,3,4,5")])).unwrap();
    assert_eq!(config.get::<Vec<i64>>("list").unwrap(), vec![1, 2, 3, 4, 5]);
    let expected: BTreeSet<i64> = (1..=5).collect();
    assert_eq!(config.get::<BTreeSet<i64>>("set").unwrap(), expected);
}

#[test]
fn test_dicts() {
    let spec = Spec::builder()
        .var(
            "plain",
            EnvVariable::new(ValueKind::mapping(ValueKind::Str, ValueKind::Str), "FOO"),
        )
        .var(
            "mapped",
            EnvVariable::new(ValueKind::mapping(ValueKind::Str, ValueKind::Int), "FOO")
                .map_pairs(|k, v| {
                    Ok((Value::from(k.to_uppercase()), Value::Int(v.parse::<i64>()?)))
                }),
        )
        .build()
        .unwrap();
    let config = spec.build(&env(&[("FOO", "a:1,b:2,c:3")])).unwrap();

    let plain: BTreeMap<String, String> = config.get("plain").unwrap();
    let expected: BTreeMap<String, String> = [("a", "1"), ("b", "2"), ("c", "3")]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    assert_eq!(plain, expected);

    let mapped: BTreeMap<String, i64> = config.get("mapped").unwrap();
    let expected: BTreeMap<String, i64> = [("A", 1), ("B", 2), ("C", 3)]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    assert_eq!(mapped, expected);
}

#[test]
fn test_optional_default_null() {
    let spec = Spec::builder()
        .var(
            "foo",
            EnvVariable::new(ValueKind::optional(ValueKind::Str), "foo").default(Value::Null),
        )
        .build()
        .unwrap();
    let config = spec.build(&env(&[])).unwrap();
    assert!(config.value("foo").unwrap().is_null());
    assert_eq!(config.get::<Option<String>>("foo").unwrap(), None);
}

#[test]
fn test_optional_set() {
    let spec = Spec::builder()
        .var(
            "int",
            EnvVariable::new(ValueKind::optional(ValueKind::Int), "foo").default(Value::Null),
        )
        .var(
            "str",
            EnvVariable::new(ValueKind::optional(ValueKind::Str), "foo").default(Value::Null),
        )
        .build()
        .unwrap();
    let config = spec.build(&env(&[("FOO", "1")])).unwrap();
    assert_eq!(config.get::<Option<i64>>("int").unwrap(), Some(1));
    assert_eq!(config.get::<Option<String>>("str").unwrap().as_deref(), Some("1"));
}

#[test]
fn test_parser_returning_null_for_optional() {
    let spec = Spec::builder()
        .var(
            "foo",
            EnvVariable::new(ValueKind::optional(ValueKind::Str), "foo")
                .parser(|_| Ok(Value::Null))
                .default(Value::Null),
        )
        .build()
        .unwrap();
    let config = spec.build(&env(&[("FOO", "1")])).unwrap();
    assert!(config.value("foo").unwrap().is_null());
}

#[test]
fn test_parser_wrong_kind_is_type_mismatch() {
    let spec = Spec::builder()
        .var(
            "foo",
            EnvVariable::new(ValueKind::Int, "foo").parser(|raw| Ok(Value::from(raw))),
        )
        .build()
        .unwrap();
    let err = spec.build(&env(&[("FOO", "1")])).unwrap_err();
    assert!(matches!(err, ConfigError::TypeMismatch { .. }));
}

#[test]
fn test_derived() {
    let spec = Spec::builder()
        .var("foo", EnvVariable::new(ValueKind::Int, "FOO").default(42))
        .derived(
            "bar",
            DerivedVariable::new(ValueKind::Str, |c| {
                Ok(Value::from((c.get_int("foo")? * 2).to_string()))
            }),
        )
        .build()
        .unwrap();
    let config = spec.build(&env(&[])).unwrap();
    assert_eq!(config.get_str("bar").unwrap(), "84");
}

#[test]
fn test_derived_optional() {
    for value in [Value::Int(1), Value::Null] {
        let produced = value.clone();
        let spec = Spec::builder()
            .derived(
                "foo",
                DerivedVariable::new(ValueKind::optional(ValueKind::Int), move |_| {
                    Ok(produced.clone())
                }),
            )
            .build()
            .unwrap();
        let config = spec.build(&env(&[("FOO", "1")])).unwrap();
        assert_eq!(config.value("foo").unwrap(), &value);
    }
}

#[test]
fn test_derived_wrong_kind_fails_build() {
    let spec = Spec::builder()
        .derived(
            "foo",
            DerivedVariable::new(ValueKind::Float, |_| Ok(Value::Int(1))),
        )
        .build()
        .unwrap();
    let err = spec.build(&env(&[])).unwrap_err();
    assert!(matches!(err, ConfigError::TypeMismatch { .. }));
}

#[test]
fn test_spec_self_inspection() {
    let spec = Spec::builder()
        .var("foo", EnvVariable::new(ValueKind::Int, "FOO").default(42))
        .derived(
            "bar",
            DerivedVariable::new(ValueKind::Bool, |c| {
                let declared = c
                    .spec()
                    .variable("foo")
                    .and_then(|v| v.default_value())
                    .cloned();
                Ok(Value::Bool(declared.as_ref() == Some(c.value("foo")?)))
            }),
        )
        .build()
        .unwrap();
    let config = spec.build(&env(&[])).unwrap();
    assert_eq!(config.get_int("foo").unwrap(), 42);
    assert!(config.get_bool("bar").unwrap());
}

#[test]
fn test_dotted_prefix() {
    let spec = Spec::builder()
        .prefix("test.me.")
        .var("foo", EnvVariable::new(ValueKind::Int, "FOO").default(42))
        .build()
        .unwrap();
    let config = spec.build(&env(&[("TEST_ME_FOO", "24")])).unwrap();
    assert_eq!(config.get_int("foo").unwrap(), 24);
}

fn service_spec() -> Spec {
    Spec::builder()
        .prefix("service")
        .var("host", EnvVariable::new(ValueKind::Str, "host").default("localhost"))
        .var("port", EnvVariable::new(ValueKind::Int, "port").default(3000))
        .build()
        .unwrap()
}

#[test]
fn test_nested_config() {
    let spec = Spec::builder()
        .prefix("myapp")
        .var("debug_mode", EnvVariable::new(ValueKind::Bool, "debug").default(false))
        .nested("service", service_spec())
        .build()
        .unwrap();
    let config = spec.build(&env(&[("MYAPP_SERVICE_PORT", "8080")])).unwrap();
    assert_eq!(config.keys().collect::<Vec<_>>(), vec!["debug_mode", "service"]);
    assert_eq!(config.section("service").unwrap().get_int("port").unwrap(), 8080);
}

#[test]
fn test_implicit_nested_config() {
    let spec = Spec::builder()
        .prefix("myapp")
        .var("debug_mode", EnvVariable::new(ValueKind::Bool, "debug").default(false))
        .section("service", |s| {
            s.var("host", EnvVariable::new(ValueKind::Str, "host").default("localhost"))
                .var("port", EnvVariable::new(ValueKind::Int, "port").default(3000))
        })
        .build()
        .unwrap();
    let config = spec.build(&env(&[("MYAPP_SERVICE_PORT", "8080")])).unwrap();
    assert_eq!(config.keys().collect::<Vec<_>>(), vec!["debug_mode", "service"]);
    assert_eq!(config.section("service").unwrap().get_int("port").unwrap(), 8080);
}

#[test]
fn test_nested_spec_without_prefix_adds_separator() {
    let inner = Spec::builder()
        .var("x", EnvVariable::new(ValueKind::Int, "x"))
        .build()
        .unwrap();
    let spec = Spec::builder()
        .prefix("myapp")
        .nested("inner", inner)
        .build()
        .unwrap();

    let config = spec.build(&env(&[("MYAPP__X", "1")])).unwrap();
    assert_eq!(config.section("inner").unwrap().get_int("x").unwrap(), 1);
    assert_eq!(config.section("inner").unwrap().prefix(), "MYAPP__");

    match spec.build(&env(&[("MYAPP_X", "1")])).unwrap_err() {
        ConfigError::MissingValue { key, .. } => assert_eq!(key, "MYAPP__X"),
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_each_build_owns_fresh_sections() {
    let spec = Spec::builder()
        .prefix("myapp")
        .nested("service", service_spec())
        .build()
        .unwrap();
    let first = spec.build(&env(&[("MYAPP_SERVICE_PORT", "1")])).unwrap();
    let second = spec.build(&env(&[("MYAPP_SERVICE_PORT", "2")])).unwrap();
    assert_eq!(first.section("service").unwrap().get_int("port").unwrap(), 1);
    assert_eq!(second.section("service").unwrap().get_int("port").unwrap(), 2);
}

#[test]
fn test_validator() {
    let spec = Spec::builder()
        .var(
            "foo",
            EnvVariable::new(ValueKind::Int, "FOO").validator(|value| match value.as_int() {
                Some(n) if (0..=512).contains(&n) => Ok(()),
                _ => Err("Value must be between 0 and 512".into()),
            }),
        )
        .build()
        .unwrap();
    for ok in [0, 512] {
        let config = spec.build(&env(&[("FOO", ok.to_string().as_str())])).unwrap();
        assert_eq!(config.get_int("foo").unwrap(), ok);
    }
    for bad in [-1, 513] {
        let err = spec.build(&env(&[("FOO", bad.to_string().as_str())])).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }
}

#[test]
fn test_builtin_validators() {
    let spec = Spec::builder()
        .var(
            "level",
            EnvVariable::new(ValueKind::Str, "level").validator(validators::choice(["a", "b", "c"])),
        )
        .var(
            "size",
            EnvVariable::new(ValueKind::Int, "size")
                .default(10)
                .validator(validators::range(0, 100)),
        )
        .build()
        .unwrap();

    let err = spec.build(&env(&[("LEVEL", "d")])).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid value for environment variable LEVEL: value must be one of ['a', 'b', 'c']"
    );

    let err = spec
        .build(&env(&[("LEVEL", "a"), ("SIZE", "101")]))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid value for environment variable SIZE: value must be in range [0, 100]"
    );

    let config = spec.build(&env(&[("LEVEL", "b")])).unwrap();
    assert_eq!(config.get_int("size").unwrap(), 10);
}

#[test]
fn test_range_on_float_variable() {
    let spec = Spec::builder()
        .var(
            "ratio",
            EnvVariable::new(ValueKind::Float, "ratio").validator(validators::range(0, 100)),
        )
        .build()
        .unwrap();

    let config = spec.build(&env(&[("RATIO", "50.0")])).unwrap();
    assert_eq!(config.get_float("ratio").unwrap(), 50.0);

    let err = spec.build(&env(&[("RATIO", "100.5")])).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid value for environment variable RATIO: value must be in range [0, 100]"
    );
}

#[test]
fn test_custom_kind_with_from_str() {
    use std::net::IpAddr;

    let spec = Spec::builder()
        .var(
            "bind",
            EnvVariable::new(ValueKind::Custom(CustomKind::parsed::<IpAddr>()), "bind"),
        )
        .build()
        .unwrap();
    let config = spec.build(&env(&[("BIND", "127.0.0.1")])).unwrap();
    let addr = config.value("bind").unwrap().downcast_ref::<IpAddr>().copied();
    assert_eq!(addr, Some(IpAddr::from([127, 0, 0, 1])));

    let err = spec.build(&env(&[("BIND", "not-an-ip")])).unwrap_err();
    assert!(matches!(err, ConfigError::TypeConversionError { .. }));
}

#[test]
fn test_truthy_override() {
    let spec = Spec::builder()
        .truthy(["enabled", "y"])
        .var("flag", EnvVariable::new(ValueKind::Bool, "flag"))
        .build()
        .unwrap();
    assert!(spec.build(&env(&[("FLAG", "Enabled")])).unwrap().get_bool("flag").unwrap());
    assert!(!spec.build(&env(&[("FLAG", "true")])).unwrap().get_bool("flag").unwrap());
}

#[test]
fn test_source_error_propagates() {
    let spec = Spec::builder()
        .var("foo", EnvVariable::new(ValueKind::Int, "foo").default(1))
        .build()
        .unwrap();
    let err = spec.build(&FailingSource).unwrap_err();
    assert!(matches!(err, ConfigError::SourceError { .. }));
}

#[test]
fn test_failure_stops_further_lookups() {
    let spec = Spec::builder()
        .var("a", EnvVariable::new(ValueKind::Int, "a"))
        .var("b", EnvVariable::new(ValueKind::Int, "b").default(1))
        .build()
        .unwrap();
    let source = CountingSource::new(env(&[]));
    assert!(spec.build(&source).is_err());
    assert_eq!(source.lookups(), 1);
}

#[test]
fn test_spec_shared_across_threads() {
    let spec = Spec::builder()
        .prefix("app")
        .var("n", EnvVariable::new(ValueKind::Int, "n"))
        .build()
        .unwrap();
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let spec = spec.clone();
            std::thread::spawn(move || {
                let source = env(&[("APP_N", i.to_string().as_str())]);
                spec.build(&source).unwrap().get_int("n").unwrap()
            })
        })
        .collect();
    let results: Vec<i64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, vec![0, 1, 2, 3]);
}

#[test]
fn test_config_serializes() {
    let spec = Spec::builder()
        .prefix("myapp")
        .var("debug_mode", EnvVariable::new(ValueKind::Bool, "debug").default(false))
        .nested("service", service_spec())
        .build()
        .unwrap();
    let config = spec.build(&env(&[])).unwrap();
    assert_eq!(
        serde_json::to_value(&config).unwrap(),
        serde_json::json!({
            "debug_mode": false,
            "service": {"host": "localhost", "port": 3000}
        })
    );
}
