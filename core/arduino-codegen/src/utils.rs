const INDENT: &str = "    ";

/// Name of the constant holding the pin of one component port.
///
/// `+` becomes `PLUS`; any other character that cannot appear in a C
/// identifier becomes `_`.
pub(crate) fn pin_constant(component: &str, role: &str) -> String {
    let role: String = if role == "+" {
        "PLUS".to_string()
    } else {
        role.chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect()
    };
    format!("_{component}_{role}")
}

pub(crate) fn variable(name: &str) -> String {
    format!("___{name}")
}

pub(crate) fn string_literal(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    for c in value.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            c => escaped.push(c),
        }
    }
    format!("String(\"{escaped}\")")
}

/// Indents every line of `block` by one level.
pub(crate) fn indent(block: &str) -> String {
    block
        .lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{INDENT}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Wraps `body` in braces after `head`, e.g. `while (true) { ... }`.
pub(crate) fn braced(head: &str, body: &str) -> String {
    if body.is_empty() {
        format!("{head} {{\n}}")
    } else {
        format!("{head} {{\n{}\n}}", indent(body))
    }
}
