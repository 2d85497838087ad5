//! Rendering a grammar back to bison syntax.

use std::fmt::Write as _;

use super::types::{Alternative, GrammarSpec};

/// Render declarations and rules, ending with the second `%%` line.
///
/// `action` is asked for the action block of every alternative, given the
/// target, the option index and the alternative.
pub(crate) fn render<F>(spec: &GrammarSpec, mut action: F) -> String
where
    F: FnMut(&str, usize, &Alternative) -> Option<String>,
{
    let mut out = String::new();

    let tokens = spec.unique_tokens();
    if !tokens.is_empty() {
        let _ = writeln!(out, "%token {}", tokens.join(" "));
    }
    for rule in spec.precedences() {
        let _ = writeln!(
            out,
            "{} {}",
            rule.associativity.directive(),
            rule.tokens.join(" ")
        );
    }
    let _ = writeln!(out, "%start {}", spec.start());
    out.push_str("%%\n");

    for (target, alternatives) in spec.productions() {
        let _ = writeln!(out, "\n{target}");
        for (option, alternative) in alternatives.iter().enumerate() {
            let lead = if option == 0 { ':' } else { '|' };
            let body = if alternative.is_empty() && alternative.prec().is_none() {
                "/* empty */".to_string()
            } else {
                alternative.to_string()
            };
            let _ = write!(out, "    {lead} {body}");
            if let Some(code) = action(target, option, alternative) {
                let _ = write!(out, " {code}");
            }
            out.push('\n');
        }
        out.push_str("    ;\n");
    }

    out.push_str("\n%%\n");
    out
}
