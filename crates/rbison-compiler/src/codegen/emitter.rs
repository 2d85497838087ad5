//! Core emitter struct and main emit logic.

use std::collections::{BTreeSet, HashMap};
use std::fmt::Write as _;

use super::Config;
use super::naming::TargetNames;
use crate::grammar::{Alternative, GrammarSpec};

/// Rust host module emitter.
pub struct Emitter<'a> {
    pub(super) spec: &'a GrammarSpec,
    lexer: &'a str,
    config: Config,
    /// Generated identifiers, keyed by target
    pub(super) names: HashMap<String, TargetNames>,
    /// Names already used (for collision avoidance)
    pub(super) used_names: BTreeSet<String>,
    output: String,
}

impl<'a> Emitter<'a> {
    pub fn new(spec: &'a GrammarSpec, lexer: &'a str, config: Config) -> Self {
        Self {
            spec,
            lexer,
            config,
            names: HashMap::new(),
            used_names: BTreeSet::new(),
            output: String::new(),
        }
    }

    /// Emit the whole module.
    pub fn emit(mut self) -> String {
        self.assign_names();
        self.emit_header();
        self.emit_constants();
        self.emit_grammar_fn();
        self.emit_dispatcher_fn();
        let spec = self.spec;
        for (target, alternatives) in spec.productions() {
            self.emit_handler(target, alternatives);
        }
        self.output
    }

    fn line(&mut self, text: &str) {
        self.output.push_str(text);
        self.output.push('\n');
    }

    fn emit_header(&mut self) {
        match (&self.config.grammar_file, &self.config.lexer_file) {
            (Some(grammar), Some(lexer)) => {
                let _ = writeln!(
                    self.output,
                    "//! Parser for `{grammar}` and `{lexer}`, generated by rbison."
                );
            }
            _ => self.line("//! Parser generated by rbison."),
        }
        self.line("//!");
        self.line("//! Each handler's doc comment lists the alternatives of its target in");
        self.line("//! order; `ParseEvent::option` indexes that list. Keep the alternatives");
        self.line("//! in `grammar()` unchanged: the engine is built from them.");
        self.line("");

        self.line("use rbison_compiler::grammar::{Associativity, GrammarError, GrammarSpec};");
        if self.config.per_target_types {
            self.line("use rbison_core::{TreeNode, Value};");
        } else {
            self.line("use rbison_core::Value;");
        }
        self.line("use rbison_vm::{Dispatcher, HandlerResult, ParseEvent};");
        self.line("");
    }

    fn emit_constants(&mut self) {
        let _ = writeln!(
            self.output,
            "/// Base name of the compiled engine (`{}-engine`).",
            self.config.module_name
        );
        let _ = writeln!(
            self.output,
            "pub const MODULE_NAME: &str = {:?};\n",
            self.config.module_name
        );

        self.line("pub const TOKENS: &[&str] = &[");
        for token in self.spec.unique_tokens() {
            let _ = writeln!(self.output, "    {token:?},");
        }
        self.line("];\n");

        self.line("/// Precedence levels, loosest first.");
        self.line("pub const PRECEDENCES: &[(Associativity, &[&str])] = &[");
        for rule in self.spec.precedences() {
            let tokens: Vec<String> = rule.tokens.iter().map(|t| format!("{t:?}")).collect();
            let _ = writeln!(
                self.output,
                "    (Associativity::{}, &[{}]),",
                rule.associativity.variant_name(),
                tokens.join(", ")
            );
        }
        self.line("];\n");

        let _ = writeln!(self.output, "pub const START: &str = {:?};\n", self.spec.start());

        let hashes = "#".repeat(raw_string_hashes(self.lexer));
        self.line("/// Lexer script, handed to flex verbatim.");
        let _ = writeln!(
            self.output,
            "pub const LEXSCRIPT: &str = r{hashes}\"{}\"{hashes};\n",
            self.lexer
        );
    }

    fn emit_grammar_fn(&mut self) {
        self.line("/// The grammar the engine is built from.");
        self.line("///");
        self.line("/// The result also resolves symbols when reading tree markup back.");
        self.line("pub fn grammar() -> Result<GrammarSpec, GrammarError> {");
        self.line("    let mut builder = GrammarSpec::builder().tokens(TOKENS);");
        self.line("    for (associativity, tokens) in PRECEDENCES {");
        self.line("        builder = builder.precedence(*associativity, tokens);");
        self.line("    }");
        self.line("    builder");
        for (target, alternatives) in self.spec.productions() {
            let texts: Vec<String> = alternatives
                .iter()
                .map(|alt| format!("{:?}", alt.to_string()))
                .collect();
            let _ = writeln!(
                self.output,
                "        .production({target:?}, &[{}])",
                texts.join(", ")
            );
        }
        self.line("        .start(START)");
        self.line("        .build()");
        self.line("}\n");
    }

    fn emit_dispatcher_fn(&mut self) {
        self.line("/// Every handler below, keyed by target.");
        self.line("pub fn dispatcher() -> Dispatcher {");
        self.line("    Dispatcher::new()");
        for target in self.spec.targets() {
            let handler = self.names_of(target).handler;
            let _ = writeln!(self.output, "        .handler({target:?}, {handler})");
        }
        self.line("}");
    }

    fn emit_handler(&mut self, target: &str, alternatives: &[Alternative]) {
        let names = self.names_of(target);
        self.line("");
        if self.config.per_target_types {
            self.emit_node_type(target, &names.node_type);
        }

        self.line("/// ```text");
        let _ = writeln!(self.output, "/// {target}");
        for (option, alternative) in alternatives.iter().enumerate() {
            let lead = if option == 0 { ':' } else { '|' };
            let body = if alternative.is_empty() && alternative.prec().is_none() {
                "/* empty */".to_string()
            } else {
                alternative.to_string()
            };
            let _ = writeln!(self.output, "///     {lead} {body}");
        }
        self.line("/// ```");

        let _ = writeln!(
            self.output,
            "pub fn {}(event: ParseEvent) -> HandlerResult {{",
            names.handler
        );
        if self.config.per_target_types {
            let _ = writeln!(
                self.output,
                "    Ok({}(event.into_node()).into())",
                names.node_type
            );
        } else {
            self.line("    Ok(Value::from(event.into_node()))");
        }
        self.line("}");
    }

    fn emit_node_type(&mut self, target: &str, name: &str) {
        let _ = writeln!(self.output, "/// Reduction of `{target}`.");
        self.line("#[derive(Clone, Debug, PartialEq)]");
        let _ = writeln!(self.output, "pub struct {name}(pub TreeNode);\n");
        let _ = writeln!(self.output, "impl From<{name}> for Value {{");
        let _ = writeln!(self.output, "    fn from(node: {name}) -> Self {{");
        self.line("        Value::from(node.0)");
        self.line("    }");
        self.line("}\n");
    }
}

/// Number of `#` needed so a raw string can hold `text`.
pub(super) fn raw_string_hashes(text: &str) -> usize {
    let mut longest = 0;
    for (i, _) in text.match_indices('"') {
        let run = text[i + 1..].chars().take_while(|&c| c == '#').count();
        longest = longest.max(run);
    }
    longest + 1
}
