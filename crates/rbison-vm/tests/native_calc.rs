//! Builds the demo calculator with the system toolchain and runs it.
//!
//! Needs bison, flex and a C compiler: `cargo test -- --ignored`.

use rbison_compiler::build::{ArtifactCache, BuildConfig, EngineBuilder};
use rbison_compiler::grammar::extract;
use rbison_core::Value;
use rbison_vm::{Dispatcher, HandlerError, ParseError, Parser, RunConfig, StrInput};

const GRAMMAR: &str = include_str!("../../../demos/calc/calc.y");
const LEXER: &str = include_str!("../../../demos/calc/calc.l");

fn evaluator() -> Dispatcher {
    Dispatcher::new()
        .handler("input", |ev| Ok(ev.into_values().pop().unwrap_or_default()))
        .handler("line", |ev| {
            Ok(match ev.option() {
                1 => ev.into_values().swap_remove(0),
                _ => Value::Empty,
            })
        })
        .handler("exp", |ev| {
            let n = |i: usize| {
                ev.value(i)
                    .and_then(Value::as_float)
                    .ok_or_else(|| HandlerError::new("not a number"))
            };
            Ok(Value::Float(match ev.option() {
                0 => ev
                    .token(0)
                    .unwrap_or_default()
                    .parse()
                    .map_err(|_| HandlerError::new("bad number"))?,
                1 => n(0)? + n(2)?,
                2 => n(0)? - n(2)?,
                3 => n(0)? * n(2)?,
                4 if n(2)? == 0.0 => return Err(HandlerError::new("division by zero")),
                4 => n(0)? / n(2)?,
                5 => -n(1)?,
                6 => n(0)?.powf(n(2)?),
                _ => n(1)?,
            }))
        })
}

#[test]
#[ignore = "needs bison, flex and a C compiler"]
fn native_calculator() {
    let dir = tempfile::tempdir().unwrap();
    let spec = extract(GRAMMAR, LEXER).unwrap();
    let config = BuildConfig::new().module_name("calc").build_dir(dir.path());
    let artifact = EngineBuilder::new(config)
        .cache(std::sync::Arc::new(ArtifactCache::new()))
        .build(&spec, LEXER)
        .unwrap();

    let mut parser = Parser::load(&artifact, evaluator())
        .unwrap()
        .with_config(RunConfig::new().interactive(true));

    let outcome = parser.run(&mut StrInput::from("2 + 3 * 4\n")).unwrap();
    assert_eq!(outcome.value, Value::Float(14.0));

    let outcome = parser.run(&mut StrInput::from("(2 + 3) * 4\n")).unwrap();
    assert_eq!(outcome.value, Value::Float(20.0));

    let outcome = parser.run(&mut StrInput::from("10 / 0\n1 + 1\n")).unwrap();
    assert_eq!(outcome.value, Value::Float(2.0));
    assert!(matches!(outcome.error, Some(ParseError::Handler { option: 4, .. })));

    let outcome = parser.run(&mut StrInput::from("5 * 5\nquit\n7\n")).unwrap();
    assert_eq!(outcome.value, Value::Float(25.0));
}

#[test]
#[ignore = "needs bison, flex and a C compiler"]
fn native_engine_without_handlers_builds_tree() {
    let dir = tempfile::tempdir().unwrap();
    let spec = extract(GRAMMAR, LEXER).unwrap();
    let config = BuildConfig::new().module_name("tree").build_dir(dir.path());
    let artifact = EngineBuilder::new(config).build(&spec, LEXER).unwrap();

    let mut parser = Parser::load(&artifact, Dispatcher::new()).unwrap();
    let outcome = parser.run(&mut StrInput::from("1 - 2\n")).unwrap();

    let root = outcome.value.as_node().unwrap();
    assert_eq!(root.target(), "input");
    let exp = root.get_path(&[1, 0]).and_then(Value::as_node).unwrap();
    assert_eq!(exp.names(), ["exp", "MINUS", "exp"]);
    assert_eq!(exp.get(1), Some(&Value::from("-")));
}
