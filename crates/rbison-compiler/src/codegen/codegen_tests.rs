use std::collections::HashSet;

use indoc::indoc;

use super::emitter::raw_string_hashes;
use super::{Config, generate};
use crate::grammar::extract;
use crate::test_utils::{CALC_LEXER, calc_spec};

const SUM_GRAMMAR: &str = "%token NUM PLUS\n%left PLUS\n%%\nsum : NUM | sum PLUS NUM ;\n%%\n";
const SUM_LEXER: &str = "%%\n[0-9]+ { RB_TOKEN(NUM); }\n%%\n";

#[test]
fn emits_complete_module() {
    let spec = extract(SUM_GRAMMAR, SUM_LEXER).unwrap();
    let config = Config::new().module_name("sum").sources("sum.y", "sum.l");
    insta::assert_snapshot!(generate(&spec, SUM_LEXER, config), @r##"
    //! Parser for `sum.y` and `sum.l`, generated by rbison.
    //!
    //! Each handler's doc comment lists the alternatives of its target in
    //! order; `ParseEvent::option` indexes that list. Keep the alternatives
    //! in `grammar()` unchanged: the engine is built from them.

    use rbison_compiler::grammar::{Associativity, GrammarError, GrammarSpec};
    use rbison_core::Value;
    use rbison_vm::{Dispatcher, HandlerResult, ParseEvent};

    /// Base name of the compiled engine (`sum-engine`).
    pub const MODULE_NAME: &str = "sum";

    pub const TOKENS: &[&str] = &[
        "NUM",
        "PLUS",
    ];

    /// Precedence levels, loosest first.
    pub const PRECEDENCES: &[(Associativity, &[&str])] = &[
        (Associativity::Left, &["PLUS"]),
    ];

    pub const START: &str = "sum";

    /// Lexer script, handed to flex verbatim.
    pub const LEXSCRIPT: &str = r#"%%
    [0-9]+ { RB_TOKEN(NUM); }
    %%
    "#;

    /// The grammar the engine is built from.
    ///
    /// The result also resolves symbols when reading tree markup back.
    pub fn grammar() -> Result<GrammarSpec, GrammarError> {
        let mut builder = GrammarSpec::builder().tokens(TOKENS);
        for (associativity, tokens) in PRECEDENCES {
            builder = builder.precedence(*associativity, tokens);
        }
        builder
            .production("sum", &["NUM", "sum PLUS NUM"])
            .start(START)
            .build()
    }

    /// Every handler below, keyed by target.
    pub fn dispatcher() -> Dispatcher {
        Dispatcher::new()
            .handler("sum", on_sum)
    }

    /// ```text
    /// sum
    ///     : NUM
    ///     | sum PLUS NUM
    /// ```
    pub fn on_sum(event: ParseEvent) -> HandlerResult {
        Ok(Value::from(event.into_node()))
    }
    "##);
}

#[test]
fn handler_docs_list_every_alternative_in_order() {
    let source = generate(&calc_spec(), CALC_LEXER, Config::new());
    assert!(source.contains(indoc! {"
        /// ```text
        /// exp
        ///     : NUMBER
        ///     | exp PLUS exp
        ///     | exp MINUS exp
        ///     | exp TIMES exp
        ///     | exp DIVIDE exp
        ///     | MINUS exp %prec NEG
        ///     | exp POW exp
        ///     | LPAREN exp RPAREN
        /// ```
        pub fn on_exp(event: ParseEvent) -> HandlerResult {
    "}));
    assert!(source.contains("///     : /* empty */\n///     | input line\n"));

    let input = source.find("pub fn on_input").unwrap();
    let line = source.find("pub fn on_line").unwrap();
    let exp = source.find("pub fn on_exp").unwrap();
    assert!(input < line && line < exp);
}

#[test]
fn grammar_fn_lists_alternatives_verbatim() {
    let source = generate(&calc_spec(), CALC_LEXER, Config::new());
    assert!(source.contains(r#"        .production("input", &["", "input line"])"#));
    assert!(source.contains(r#""MINUS exp %prec NEG""#));
    assert!(source.contains("    (Associativity::Right, &[\"POW\"]),\n"));
    assert!(source.contains("pub const MODULE_NAME: &str = \"parser\";"));
}

#[test]
fn per_target_types() {
    let source = generate(&calc_spec(), CALC_LEXER, Config::new().per_target_types(true));
    assert!(source.contains("use rbison_core::{TreeNode, Value};"));
    assert!(source.contains("pub struct ExpNode(pub TreeNode);"));
    assert!(source.contains("impl From<LineNode> for Value {"));
    assert!(source.contains("    Ok(InputNode(event.into_node()).into())\n"));
    assert!(!source.contains("Ok(Value::from(event.into_node()))"));
}

#[test]
fn colliding_targets_get_distinct_identifiers() {
    let grammar = "%token A B\n%%\nlist : list-item | listItem | tree ;\n\
                   list-item : A ;\nlistItem : B ;\ntree : A B ;\n%%\n";
    let spec = extract(grammar, SUM_LEXER).unwrap();
    let source = generate(&spec, SUM_LEXER, Config::new().per_target_types(true));

    let mut identifiers = Vec::new();
    for line in source.lines() {
        for prefix in ["pub fn ", "pub struct ", "pub const "] {
            if let Some(rest) = line.strip_prefix(prefix) {
                let end = rest.find(['(', ':']).unwrap();
                identifiers.push(&rest[..end]);
            }
        }
    }
    let unique: HashSet<&str> = identifiers.iter().copied().collect();
    assert_eq!(unique.len(), identifiers.len(), "{identifiers:?}");

    assert!(source.contains(r#"        .handler("list-item", on_list_item)"#));
    assert!(source.contains(r#"        .handler("listItem", on_list_item_2)"#));
    assert!(source.contains("pub struct ListItemNode(pub TreeNode);"));
    assert!(source.contains("pub struct ListItemNode2(pub TreeNode);"));
    assert!(source.contains("pub fn on_list_item_2(event: ParseEvent) -> HandlerResult {\n"));
    assert!(source.contains("    Ok(ListItemNode2(event.into_node()).into())\n"));
    // `tree` would shadow the imported `TreeNode`
    assert!(source.contains("pub struct TreeNode2(pub TreeNode);"));
    assert!(source.contains("    Ok(TreeNode2(event.into_node()).into())\n"));
}

#[test]
fn lexer_script_is_embedded_verbatim() {
    let lexer = "%%\n\"\\\"#\" { RB_TOKEN(QUOTE); }\n%%\n";
    let spec = extract(SUM_GRAMMAR, lexer).unwrap();
    let source = generate(&spec, lexer, Config::new());
    assert!(source.contains(&format!("r##\"{lexer}\"##;")));
}

#[test]
fn raw_string_hashes_outgrow_content() {
    assert_eq!(raw_string_hashes("plain"), 1);
    assert_eq!(raw_string_hashes(r#""quoted""#), 1);
    assert_eq!(raw_string_hashes(r###"a "## b"###), 3);
}
