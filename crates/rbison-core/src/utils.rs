//! Naming helpers for turning grammar symbols into host identifiers.
//!
//! Bison symbols may contain `.` and `-`, and quoted literals contain
//! arbitrary punctuation; Rust identifiers allow neither.

/// Split a symbol into lowercase words on `_`, `-`, `.` and any other
/// non-alphanumeric character, and on lower→upper case changes.
fn words(symbol: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;
    for c in symbol.chars() {
        if !c.is_ascii_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_ascii_uppercase() && prev_lower {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        current.push(c.to_ascii_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Convert a symbol to PascalCase.
///
/// # Examples
/// ```
/// use rbison_core::utils::to_pascal_case;
/// assert_eq!(to_pascal_case("exp_list"), "ExpList");
/// assert_eq!(to_pascal_case("NUMBER"), "Number");
/// assert_eq!(to_pascal_case("argList"), "ArgList");
/// ```
pub fn to_pascal_case(symbol: &str) -> String {
    words(symbol)
        .into_iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Convert a symbol to snake_case.
///
/// # Examples
/// ```
/// use rbison_core::utils::to_snake_case;
/// assert_eq!(to_snake_case("ExpList"), "exp_list");
/// assert_eq!(to_snake_case("if-stmt"), "if_stmt");
/// ```
pub fn to_snake_case(symbol: &str) -> String {
    words(symbol).join("_")
}

/// Name of the handler function generated for a target.
pub fn handler_name(target: &str) -> String {
    let snake = to_snake_case(target);
    if snake.is_empty() {
        "on_target".to_string()
    } else {
        format!("on_{snake}")
    }
}

/// Name of the node type generated for a target.
pub fn node_type_name(target: &str) -> String {
    let pascal = to_pascal_case(target);
    if pascal.starts_with(|c: char| c.is_ascii_digit()) || pascal.is_empty() {
        format!("Target{pascal}Node")
    } else {
        format!("{pascal}Node")
    }
}

/// Whether a symbol is a quoted character or string literal such as `'+'`.
pub fn is_literal_symbol(symbol: &str) -> bool {
    symbol.len() >= 2
        && ((symbol.starts_with('\'') && symbol.ends_with('\''))
            || (symbol.starts_with('"') && symbol.ends_with('"')))
}
