use std::io::Cursor;

use rbison_core::{TreeNode, Value};

use super::arena::{ValueArena, ValueHandle};
use super::session::SessionReport;
use super::{Dispatcher, ParseError, ReaderInput, Reduction, Session, StrInput};

fn finish(session: Session<'_>) -> SessionReport {
    session.finish()
}

#[test]
fn read_never_exceeds_max() {
    let mut input = ReaderInput::new(Cursor::new("a long first line\nb\n"));
    let mut dispatcher = Dispatcher::new();
    let mut session = Session::new(&mut input, &mut dispatcher, false, None);

    assert_eq!(session.read(4), b"a lo");
    assert_eq!(session.read(100), b"ng first line\n");
    assert_eq!(session.read(1), b"b");
    assert_eq!(session.read(1), b"\n");
    assert_eq!(session.read(8), b"");

    let report = finish(session);
    assert!(report.input_exhausted);
    assert_eq!(report.bytes_read, 20);
}

#[test]
fn zero_length_read_consumes_nothing() {
    let mut input = StrInput::from("abc");
    let mut dispatcher = Dispatcher::new();
    let mut session = Session::new(&mut input, &mut dispatcher, false, None);

    assert_eq!(session.read(0), b"");
    assert_eq!(session.read(3), b"abc");
}

#[test]
fn reduce_without_handler_builds_node() {
    let mut input = StrInput::from("");
    let mut dispatcher = Dispatcher::new();
    let mut session = Session::new(&mut input, &mut dispatcher, false, None);

    let number = session.token(b"42");
    let Reduction::Value(handle) =
        session.reduce("exp", 0, vec!["NUMBER".to_string()], &[Some(number)])
    else {
        panic!("reduction failed");
    };

    let expected = TreeNode::new(
        "exp",
        0,
        vec!["NUMBER".to_string()],
        vec![Value::from("42")],
    )
    .unwrap();
    assert_eq!(session.value(handle), Some(&Value::from(expected.clone())));
    // consumed by the reduction
    assert_eq!(session.value(number), None);

    let report = finish(session);
    assert_eq!(report.value, Value::from(expected));
    assert_eq!(report.reductions, 1);
}

#[test]
fn arity_mismatch_fails_the_reduction() {
    let mut input = StrInput::from("");
    let mut dispatcher = Dispatcher::new();
    let mut session = Session::new(&mut input, &mut dispatcher, false, None);

    let reduction = session.reduce("exp", 1, vec!["exp".to_string()], &[None, None]);
    assert_eq!(reduction, Reduction::Failed);

    let report = finish(session);
    assert!(matches!(report.error, Some(ParseError::Handler { .. })));
    assert!(report.fatal.is_none());
    assert_eq!(report.value, Value::Empty);
}

#[test]
fn halted_session_ends_input_and_aborts() {
    let mut input = StrInput::from("1 + 1\n");
    let mut dispatcher = Dispatcher::new();
    let mut session = Session::new(&mut input, &mut dispatcher, false, None);

    session.syntax_error(3, "syntax error", "+");
    assert!(session.is_halted());
    assert_eq!(session.read(8), b"");
    assert_eq!(session.reduce("exp", 0, Vec::new(), &[]), Reduction::Abort);

    let report = finish(session);
    assert_eq!(
        report.fatal,
        Some(ParseError::Syntax {
            line: 3,
            message: "syntax error".to_string(),
            near: "+".to_string(),
        })
    );
    assert_eq!(report.bytes_read, 0);
}

#[test]
fn interactive_syntax_error_is_recorded() {
    let mut input = StrInput::from("");
    let mut dispatcher = Dispatcher::new();
    let mut session = Session::new(&mut input, &mut dispatcher, true, None);

    session.syntax_error(1, "syntax error", ")");
    assert!(!session.is_halted());

    let report = finish(session);
    assert!(report.fatal.is_none());
    assert!(matches!(report.error, Some(ParseError::Syntax { line: 1, .. })));
}

#[test]
fn handles_are_never_zero() {
    let mut arena = ValueArena::new();
    let first = arena.push(Value::from("a"));
    let second = arena.push(Value::from("b"));

    assert_eq!(first.to_raw(), 1);
    assert_eq!(second.to_raw(), 2);
    assert_eq!(ValueHandle::from_raw(0), None);
    assert_eq!(ValueHandle::from_raw(2), Some(second));

    assert_eq!(arena.take(first), Value::from("a"));
    assert_eq!(arena.take(first), Value::Empty);
    assert_eq!(arena.live(), 1);
}
