//! Named placeholder interpolation.
//!
//! Free-text fragments (WHERE/HAVING bodies, JOIN conditions) are trusted verbatim
//! except at `$name` tokens, which are replaced by the quoted literal bound to
//! `name`. This is the only place caller data enters free text.

use crate::quote::write_literal;
use crate::value::{Bindings, Value};
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::OnceLock;

fn token_regex() -> &'static Regex {
    static TOKEN_RE: OnceLock<Regex> = OnceLock::new();
    TOKEN_RE.get_or_init(|| Regex::new(r"\$(\w+)").expect("invalid built-in token regex"))
}

/// Replace every `$name` token in `template` with the quoted value bound to `name`.
///
/// - list values expand to `a, b, c` (for `IN ($ids)`)
/// - an unbound name renders as `NULL`
/// - a template without tokens is returned unchanged
///
/// ```ignore
/// let sql = qx::interpolate("id IN ($ids) AND name = $name", &qx::bindings! {
///     ids: vec![1, 2],
///     name: "bob",
/// });
/// assert_eq!(sql, "id IN (1, 2) AND name = $Q$bob$Q$");
/// ```
pub fn interpolate(template: &str, bindings: &Bindings) -> String {
    interpolate_cow(template, bindings).into_owned()
}

pub(crate) fn interpolate_cow<'a>(template: &'a str, bindings: &Bindings) -> Cow<'a, str> {
    token_regex().replace_all(template, |caps: &Captures<'_>| {
        let mut out = String::new();
        write_literal(&mut out, bindings.get(&caps[1]).unwrap_or(&Value::Null));
        out
    })
}
