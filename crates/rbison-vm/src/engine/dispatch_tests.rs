use rbison_core::{TreeNode, Value};

use super::{Dispatcher, HandlerError, ParseEvent};

fn event(target: &str, option: usize, terms: &[(&str, Value)]) -> ParseEvent {
    ParseEvent::new(
        target,
        option,
        terms.iter().map(|(n, _)| n.to_string()).collect(),
        terms.iter().map(|(_, v)| v.clone()).collect(),
    )
    .unwrap()
}

#[test]
fn unhandled_event_becomes_its_node() {
    let mut dispatcher = Dispatcher::new();
    let ev = event("sum", 1, &[("NUM", Value::from("1")), ("PLUS", Value::from("+"))]);
    let expected = ev.clone().into_node();

    let value = dispatcher.dispatch(ev).unwrap();

    assert_eq!(value.as_node(), Some(&expected));
    assert_eq!(
        expected,
        TreeNode::new(
            "sum",
            1,
            vec!["NUM".to_string(), "PLUS".to_string()],
            vec![Value::from("1"), Value::from("+")],
        )
        .unwrap()
    );
}

#[test]
fn handler_value_is_used() {
    let mut dispatcher = Dispatcher::new().handler("num", |ev: ParseEvent| {
        let text = ev.token(0).ok_or("missing token")?;
        text.parse::<i64>()
            .map(Value::Int)
            .map_err(|e| HandlerError::new(e.to_string()))
    });

    let value = dispatcher
        .dispatch(event("num", 0, &[("NUMBER", Value::from("17"))]))
        .unwrap();
    assert_eq!(value, Value::Int(17));

    let err = dispatcher
        .dispatch(event("num", 0, &[("NUMBER", Value::from("x"))]))
        .unwrap_err();
    assert_eq!(err.message(), "invalid digit found in string");
}

#[test]
fn register_replaces_handler() {
    let mut dispatcher = Dispatcher::new().handler("a", |_| Ok(Value::Int(1)));

    assert!(!dispatcher.register("b", |_| Ok(Value::Int(2))));
    assert!(dispatcher.register("a", |_| Ok(Value::Int(3))));

    assert_eq!(dispatcher.targets(), ["a", "b"]);
    assert!(dispatcher.has_handler("b"));
    assert!(!dispatcher.has_handler("c"));
    assert_eq!(dispatcher.dispatch(event("a", 0, &[])).unwrap(), Value::Int(3));
}

#[test]
fn hook_sees_unhandled_values_too() {
    let mut dispatcher = Dispatcher::new().on_reduce(|target, option, value| {
        let mut node = value.into_node().unwrap();
        node.set_attribute("seen", format!("{target}:{option}")).unwrap();
        Value::from(node)
    });

    let value = dispatcher.dispatch(event("unit", 2, &[])).unwrap();
    assert_eq!(value.as_node().unwrap().attribute("seen"), Some("unit:2"));
}

#[test]
fn event_accessors() {
    let ev = event(
        "exp",
        1,
        &[
            ("exp", Value::Int(1)),
            ("PLUS", Value::from("+")),
            ("exp", Value::Int(2)),
        ],
    );

    assert_eq!(ev.target(), "exp");
    assert_eq!(ev.option(), 1);
    assert_eq!(ev.len(), 3);
    assert!(!ev.is_empty());
    assert_eq!(ev.token(1), Some("+"));
    assert_eq!(ev.token(0), None);
    assert_eq!(ev.value(2), Some(&Value::Int(2)));
    assert_eq!(ev.value(3), None);
    assert_eq!(
        ev.into_values(),
        [Value::Int(1), Value::from("+"), Value::Int(2)]
    );
}

#[test]
fn mismatched_event_is_rejected() {
    assert!(ParseEvent::new("exp", 0, vec!["a".to_string()], Vec::new()).is_err());
}
