//! # Binder Tests
//!
//! Extraction and invocation through the public API:
//! 1. Signature-driven extraction (attribute and mapping sources)
//! 2. `**kwargs` fallback and private names
//! 3. Merge precedence
//! 4. Error pass-through

use std::collections::HashMap;

use call_args::{
    bind_attr, bind_dict, kwargs, AttrAccess, BindError, Binder, BoundArguments, CallError,
    Callable, DictAccess, Function, Kwargs, LookupError, Param, Signature, BINDER_ATTR,
    BINDER_DICT,
};
use serde::Serialize;
use serde_json::{json, Value};

// ============================================================================
// TEST HELPERS
// ============================================================================

// "wally" callables do nothing but report what they were called with.

fn wally(params: Vec<Param>) -> impl Callable<Output = Value, Error = CallError> {
    Function::new(
        Signature::new(params).unwrap(),
        |args: &BoundArguments| -> Result<Value, CallError> {
            let mut seen: Vec<(String, Value)> = args
                .var_kwargs()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            seen.sort_by(|a, b| a.0.cmp(&b.0));
            Ok(json!(seen))
        },
    )
}

fn x_foo() -> impl Callable<Output = (Value, Value), Error = CallError> {
    Function::new(
        Signature::new([Param::new("x"), Param::new("foo")]).unwrap(),
        |args: &BoundArguments| -> Result<(Value, Value), CallError> {
            Ok((arg(args, "x"), arg(args, "foo")))
        },
    )
}

fn arg(args: &BoundArguments, name: &str) -> Value {
    args.get(name).cloned().unwrap_or_default()
}

fn pair(x: i64, foo: i64) -> (Value, Value) {
    (json!(x), json!(foo))
}

#[derive(Serialize)]
struct Abc {
    a: i32,
    b: &'static str,
    c: (i32, i32),
}

// ============================================================================
// EXTRACTION
// ============================================================================

#[test]
fn extract_from_object() {
    let f = wally(vec![
        Param::new("a"),
        Param::new("b").with_default(19),
        Param::new("d").with_default(23),
    ]);
    let source = Abc {
        a: 17,
        b: "foo",
        c: (11, 13),
    };

    let extracted = BINDER_ATTR
        .binder(&f, &source)
        .extract_for_signature()
        .unwrap();
    assert_eq!(extracted, kwargs([("a", json!(17)), ("b", json!("foo"))]));
}

#[test]
fn extract_from_dict() {
    let f = wally(vec![
        Param::new("a"),
        Param::new("b").with_default(19),
        Param::new("d").with_default(23),
    ]);
    let source = json!({"a": 17, "b": "foo", "c": [11, 13]});

    let extracted = BINDER_DICT
        .binder(&f, &source)
        .extract_for_signature()
        .unwrap();
    assert_eq!(extracted, kwargs([("a", json!(17)), ("b", json!("foo"))]));
}

#[test]
fn extract_exactly_declared_names() {
    let f = wally(vec![Param::new("a"), Param::keyword_only("k")]);
    let source: HashMap<String, Value> = [("a", 1), ("k", 2)]
        .into_iter()
        .map(|(k, v)| (k.to_string(), json!(v)))
        .collect();

    let extracted = BINDER_DICT
        .binder(&f, &source)
        .extract_for_signature()
        .unwrap();
    assert_eq!(extracted, kwargs([("a", 1), ("k", 2)]));
}

#[test]
fn var_kwargs_returns_whole_source_as_copy() {
    let f = wally(vec![
        Param::new("a"),
        Param::new("b").with_default(19),
        Param::new("d").with_default(23),
        Param::var_keyword("kwargs"),
    ]);
    let mut source: HashMap<String, Value> = [
        ("a", json!(17)),
        ("b", json!("foo")),
        ("c", json!([11, 13])),
        ("e", json!({"x": "y"})),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();
    let expected: Kwargs = source.clone().into_iter().collect();

    let mut result = BINDER_DICT
        .binder(&f, &source)
        .extract_for_signature()
        .unwrap();
    assert_eq!(result, expected);

    result.insert("a".into(), json!("changed"));
    assert_eq!(source["a"], json!(17));

    source.insert("_should_be".into(), json!("ignored"));
    let result = BINDER_DICT
        .binder(&f, &source)
        .extract_for_signature()
        .unwrap();
    assert_eq!(result, expected);
}

// ============================================================================
// INVOCATION
// ============================================================================

#[test]
fn attr_and_dict_modes_agree() {
    #[derive(Serialize)]
    struct Obj {
        x: i64,
        foo: i64,
    }
    let f = x_foo();
    let obj = Obj { x: 17, foo: 19 };
    let d = json!({"x": 17, "foo": 19});

    let from_attr = bind_attr(&f, &obj, vec![], Kwargs::default()).unwrap();
    let from_dict = bind_dict(&f, &d, vec![], Kwargs::default()).unwrap();
    assert_eq!(from_attr, pair(17, 19));
    assert_eq!(from_attr, from_dict);
}

#[test]
fn attr_mode_ignores_fields_it_does_not_need() {
    #[derive(Serialize)]
    struct Obj {
        x: i64,
        foo: i64,
        grid: HashMap<(i32, i32), i32>,
    }
    let f = x_foo();
    let obj = Obj {
        x: 17,
        foo: 19,
        grid: [((1, 2), 3)].into_iter().collect(),
    };

    let out = bind_attr(&f, &obj, vec![], Kwargs::default()).unwrap();
    assert_eq!(out, pair(17, 19));

    // **kwargs needs every visible value, including the one JSON cannot hold
    let spread = wally(vec![Param::var_keyword("kwargs")]);
    let err = bind_attr(&spread, &obj, vec![], Kwargs::default()).unwrap_err();
    assert!(matches!(err, CallError::Lookup(LookupError::Reflection(_))));
}

#[test]
fn explicit_kwargs_fill_gaps() {
    #[derive(Serialize)]
    struct Obj {
        x: i64,
    }
    let f = x_foo();
    let obj = Obj { x: 17 };
    let d = json!({"x": 17});

    let from_attr = bind_attr(&f, &obj, vec![], kwargs([("foo", 13)])).unwrap();
    let from_dict = bind_dict(&f, &d, vec![], kwargs([("foo", 13)])).unwrap();
    assert_eq!(from_attr, pair(17, 13));
    assert_eq!(from_dict, pair(17, 13));
}

#[test]
fn private_params_are_not_supplied() {
    #[derive(Serialize)]
    struct Obj {
        _a: i64,
        b: i64,
    }
    let private = Function::new(
        Signature::new([
            Param::new("_a").with_default(17),
            Param::new("b").with_default(19),
        ])
        .unwrap(),
        |args| -> Result<(Value, Value), CallError> { Ok((arg(args, "_a"), arg(args, "b"))) },
    );
    let kw_only = wally(vec![Param::var_keyword("kwargs")]);
    let obj = Obj { _a: 71, b: 91 };
    let d = json!({"_a": 71, "b": 91});

    let out = bind_attr(&private, &obj, vec![], Kwargs::default()).unwrap();
    assert_eq!(out, pair(17, 91));
    let out = bind_dict(&private, &d, vec![], Kwargs::default()).unwrap();
    assert_eq!(out, pair(17, 91));

    let out = bind_attr(&kw_only, &obj, vec![], Kwargs::default()).unwrap();
    assert_eq!(out, json!([["b", 91]]));
    let out = bind_dict(&kw_only, &d, vec![], Kwargs::default()).unwrap();
    assert_eq!(out, json!([["b", 91]]));
}

#[test]
fn private_params_supplied_when_not_skipped() {
    let f = Function::new(
        Signature::new([Param::new("_a").with_default(17)]).unwrap(),
        |args| -> Result<Value, CallError> { Ok(arg(args, "_a")) },
    );
    let d = json!({"_a": 71});

    let out = Binder::new(&f, &d, DictAccess)
        .skip_private(false)
        .invoke(vec![], Kwargs::default())
        .unwrap();
    assert_eq!(out, json!(71));
}

#[test]
fn extra_kwargs_fail_like_the_callable() {
    #[derive(Serialize)]
    struct Obj {
        a: i64,
    }
    let f = Function::new(
        Signature::new([Param::new("a").with_default(17)]).unwrap(),
        |args| -> Result<Value, CallError> { Ok(arg(args, "a")) },
    );
    let obj = Obj { a: 71 };
    let d = json!({"a": 71});
    let unexpected = |r: Result<Value, CallError>| {
        matches!(r, Err(CallError::Bind(BindError::UnexpectedKeyword { name })) if name == "b")
    };

    assert!(unexpected(bind_attr(&f, &obj, vec![], kwargs([("b", 17)]))));
    assert!(unexpected(bind_dict(&f, &d, vec![], kwargs([("b", 17)]))));
    let both = || kwargs([("a", 13), ("b", 17)]);
    assert!(unexpected(bind_attr(&f, &obj, vec![], both())));
    assert!(unexpected(bind_dict(&f, &d, vec![], both())));

    let out = bind_attr(&f, &obj, vec![], kwargs([("a", 13)])).unwrap();
    assert_eq!(out, json!(13));
    let out = bind_dict(&f, &d, vec![], kwargs([("a", 13)])).unwrap();
    assert_eq!(out, json!(13));
}

#[test]
fn positional_and_extracted_collide() {
    let f = x_foo();
    let d = json!({"x": 1, "foo": 2});
    let err = bind_dict(&f, &d, vec![json!(0)], Kwargs::default()).unwrap_err();
    assert!(matches!(err, CallError::Bind(BindError::MultipleValues { name }) if name == "x"));
}

#[test]
fn missing_argument_comes_from_the_callable() {
    let f = x_foo();
    let err = bind_dict(&f, &json!({"x": 1}), vec![], Kwargs::default()).unwrap_err();
    assert_eq!(err.to_string(), "missing a required argument: 'foo'");
}

#[test]
fn body_error_is_returned_unchanged() {
    let f = Function::new(Signature::default(), |_| -> Result<(), CallError> {
        Err(CallError::failed("division by zero"))
    });
    let err = bind_dict(&f, &json!({}), vec![], Kwargs::default()).unwrap_err();
    assert!(matches!(err, CallError::Failed(ref m) if m == "division by zero"));
}

#[test]
fn foreign_error_types_pass_through() {
    let f = Function::new(
        Signature::new([Param::new("path")]).unwrap(),
        |args| -> Result<(), anyhow::Error> {
            let path: String = args.value("path")?;
            anyhow::bail!("cannot open {path}")
        },
    );
    let err = bind_dict(&f, &json!({"path": "/nope"}), vec![], Kwargs::default()).unwrap_err();
    assert_eq!(err.to_string(), "cannot open /nope");
}

#[test]
fn binder_accepts_dyn_callables() {
    let f = x_foo();
    let dynamic: &dyn Callable<Output = (Value, Value), Error = CallError> = &f;
    let source = json!({"x": 3, "foo": 4});

    let out = Binder::new(dynamic, &source, DictAccess)
        .invoke(vec![], Kwargs::default())
        .unwrap();
    assert_eq!(out, pair(3, 4));

    let out = Binder::new(dynamic, &json!({"x": 3}), AttrAccess)
        .invoke(vec![], kwargs([("foo", 5)]))
        .unwrap();
    assert_eq!(out, pair(3, 5));
}
