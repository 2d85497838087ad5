//! C glue between the generated parser and the host session.
//!
//! Every alternative gets an action that hands its target, option, symbol
//! names and semantic values to the host's `reduce` callback. Semantic
//! values are opaque handles owned by the host.

use std::fmt::Write as _;

use rbison_core::Signature;

use crate::grammar::{self, Alternative, GrammarSpec};

/// File name the lexer script and the grammar prologue include.
pub const HOST_HEADER_NAME: &str = "rbison.h";

/// Host interface shared by the parser and the lexer script.
pub const HOST_HEADER: &str = r#"#ifndef RBISON_H
#define RBISON_H

typedef void *rb_value;
#define YYSTYPE rb_value

typedef struct rb_host {
    void *ctx;
    int (*read)(void *ctx, char *buf, int max_size);
    rb_value (*token)(void *ctx, const char *text, int len);
    int (*reduce)(void *ctx, const char *target, int option, int nargs,
                  const char *const *names, const rb_value *values,
                  rb_value *out);
    void (*error)(void *ctx, int line, const char *msg, const char *near);
} rb_host;

extern rb_host *rb_active_host;

#undef YY_INPUT
#define YY_INPUT(buf, result, max_size) \
    { (result) = rb_active_host->read(rb_active_host->ctx, (buf), (int)(max_size)); }

#define RB_TOKEN(tok) \
    do { \
        yylval = rb_active_host->token(rb_active_host->ctx, yytext, (int)yyleng); \
        return (tok); \
    } while (0)

#endif
"#;

const PROLOGUE: &str = r#"%{
#include <stdio.h>
#include <stdlib.h>
#include "rbison.h"

extern int yylineno;
extern char *yytext;
extern FILE *yyin;
int yylex(void);
void yyrestart(FILE *input_file);
void yyerror(const char *msg);

rb_host *rb_active_host = NULL;

#define RB_REDUCE(target, option, nargs, names, values, out) \
    switch (rb_active_host->reduce(rb_active_host->ctx, (target), (option), \
                                   (nargs), (names), (values), (out))) { \
    case 0: break; \
    case 1: YYERROR; \
    default: YYABORT; \
    }
%}
"#;

/// Declarations and rules with reduction actions.
///
/// This is the grammar half of the engine signature.
pub fn render_grammar(spec: &GrammarSpec) -> String {
    grammar::render(spec, |target, option, alternative| {
        Some(action(target, option, alternative))
    })
}

/// The complete bison input: prologue, `grammar`, and the epilogue that
/// exports the engine entry points.
pub fn grammar_file(grammar: &str, signature: &Signature) -> String {
    let mut out = String::with_capacity(PROLOGUE.len() + grammar.len() + 1024);
    out.push_str(PROLOGUE);
    out.push('\n');
    out.push_str(grammar);
    let _ = write!(
        out,
        r#"
const char *rb_engine_signature(void)
{{
    return {signature};
}}

void yyerror(const char *msg)
{{
    rb_active_host->error(rb_active_host->ctx, yylineno, msg, yytext ? yytext : "");
}}

int rb_parse(rb_host *host, int debug)
{{
    int status;
    rb_active_host = host;
#if YYDEBUG
    yydebug = debug;
#else
    (void)debug;
#endif
    yylineno = 1;
    yyrestart(yyin ? yyin : stdin);
    status = yyparse();
    rb_active_host = NULL;
    return status;
}}
"#,
        signature = c_string(signature.as_str())
    );
    out
}

fn action(target: &str, option: usize, alternative: &Alternative) -> String {
    let symbols = alternative.symbols();
    if symbols.is_empty() {
        return format!(
            "{{ RB_REDUCE({}, {option}, 0, NULL, NULL, &$$) }}",
            c_string(target)
        );
    }

    let names: Vec<String> = symbols.iter().map(|s| c_string(s)).collect();
    let values: Vec<String> = symbols
        .iter()
        .enumerate()
        .map(|(i, symbol)| {
            // `error` carries no semantic value
            if symbol == "error" {
                "NULL".to_string()
            } else {
                format!("${}", i + 1)
            }
        })
        .collect();

    format!(
        "{{ static const char *const names[] = {{ {} }}; rb_value values[] = {{ {} }}; \
         RB_REDUCE({}, {option}, {}, names, values, &$$) }}",
        names.join(", "),
        values.join(", "),
        c_string(target),
        symbols.len()
    )
}

/// Quote `text` as a C string literal.
pub(crate) fn c_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
