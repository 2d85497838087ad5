//! Shared grammar fixtures.

use indoc::indoc;

/// The classic desk calculator.
pub const CALC_GRAMMAR: &str = indoc! {r#"
    %{
    #include <stdio.h>
    %}

    %token NUMBER PLUS MINUS TIMES DIVIDE POW LPAREN RPAREN NEWLINE
    %left MINUS PLUS
    %left TIMES DIVIDE
    %left NEG /* unary minus */
    %right POW
    %start input

    %%

    input
        : /* empty */
        | input line
        ;

    line
        : NEWLINE
        | exp NEWLINE
        | error NEWLINE
        ;

    exp
        : NUMBER
        | exp PLUS exp
        | exp MINUS exp
        | exp TIMES exp
        | exp DIVIDE exp
        | MINUS exp %prec NEG
        | exp POW exp
        | LPAREN exp RPAREN
        ;

    %%
"#};

pub const CALC_LEXER: &str = indoc! {r#"
    %{
    #include "rbison.h"
    #include "tokens.h"
    %}

    %option noyywrap
    %option yylineno

    %%

    [0-9]+(\.[0-9]*)?   { RB_TOKEN(NUMBER); }
    "+"                 { RB_TOKEN(PLUS); }
    "-"                 { RB_TOKEN(MINUS); }
    "**"                { RB_TOKEN(POW); }
    "*"                 { RB_TOKEN(TIMES); }
    "/"                 { RB_TOKEN(DIVIDE); }
    "("                 { RB_TOKEN(LPAREN); }
    ")"                 { RB_TOKEN(RPAREN); }
    "\n"                { RB_TOKEN(NEWLINE); }
    "quit"              { yyterminate(); }
    [ \t]+              ;
    .                   { RB_TOKEN(yytext[0]); }

    %%
"#};

pub fn calc_spec() -> crate::grammar::GrammarSpec {
    crate::grammar::extract(CALC_GRAMMAR, CALC_LEXER).unwrap()
}
