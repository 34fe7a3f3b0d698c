//! Identifier and literal quoting.
//!
//! - Identifiers: each `.`-separated segment is wrapped in double quotes (`*` is left
//!   alone), embedded `"` are doubled.
//! - Literals: see [`quote_literal`]. Text is dollar-quoted with a fixed tag so the
//!   payload never needs escaping.
//!
//! Both functions are total: every [`Value`] has exactly one rendering.

use crate::compile::compile_tree;
use crate::value::Value;
use std::borrow::Cow;

/// Tag used to dollar-quote text literals.
pub const DOLLAR_TAG: &str = "$Q$";

/// Double-quote a (possibly dotted) SQL identifier.
///
/// [`quote_source`](crate::quote_source) also accepts a finalized tree.
///
/// ```ignore
/// assert_eq!(qx::quote_ident("public.users"), r#""public"."users""#);
/// assert_eq!(qx::quote_ident("u.*"), r#""u".*"#);
/// ```
pub fn quote_ident(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    write_ident(&mut out, name);
    out
}

pub(crate) fn write_ident(out: &mut String, name: &str) {
    for (i, segment) in name.split('.').enumerate() {
        if i > 0 {
            out.push('.');
        }
        if segment == "*" {
            out.push('*');
            continue;
        }
        out.push('"');
        for ch in segment.chars() {
            if ch == '"' {
                out.push_str("\"\"");
            } else {
                out.push(ch);
            }
        }
        out.push('"');
    }
}

/// Render a value as a SQL literal.
///
/// | value | rendering |
/// |---|---|
/// | `Null` | `NULL` |
/// | `Bool` | `'t'` / `'f'` |
/// | `Int` | `42` |
/// | `Float` | `$Q$1.5$Q$` |
/// | `Text` | `$Q$text$Q$` |
/// | `Timestamp` | `'2024-01-02 03:04:05 UTC'` |
/// | `Query` | compiled sub-select text |
/// | `List` | elements joined with `, ` (`NULL` when empty) |
pub fn quote_literal(value: &Value) -> String {
    let mut out = String::new();
    write_literal(&mut out, value);
    out
}

pub(crate) fn write_literal(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("NULL"),
        Value::Bool(true) => out.push_str("'t'"),
        Value::Bool(false) => out.push_str("'f'"),
        Value::Int(n) => out.push_str(&n.to_string()),
        Value::Float(f) => write_dollar_quoted(out, &f.to_string()),
        Value::Text(s) => write_dollar_quoted(out, s),
        Value::Timestamp(t) => {
            out.push('\'');
            out.push_str(&t.format("%Y-%m-%d %H:%M:%S%.f UTC").to_string());
            out.push('\'');
        }
        Value::Query(tree) => out.push_str(&compile_tree(tree)),
        Value::List(items) => {
            if items.is_empty() {
                out.push_str("NULL");
                return;
            }
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_literal(out, item);
            }
        }
    }
}

fn write_dollar_quoted(out: &mut String, text: &str) {
    let tag = dollar_tag_for(text);
    out.push_str(&tag);
    out.push_str(text);
    out.push_str(&tag);
}

/// The fixed tag, unless the payload contains it; then the first `$Qn$` that does
/// not occur in the payload.
fn dollar_tag_for(text: &str) -> Cow<'static, str> {
    if !text.contains(DOLLAR_TAG) {
        return Cow::Borrowed(DOLLAR_TAG);
    }
    let mut n = 0usize;
    loop {
        let candidate = format!("$Q{n}$");
        if !text.contains(&candidate) {
            return Cow::Owned(candidate);
        }
        n += 1;
    }
}
