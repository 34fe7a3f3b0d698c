//! Colorized SQL for terminals.

use crate::error::QxResult;
use crate::qb::Qx;
use crate::quote::DOLLAR_TAG;
use colored::Colorize;
use regex::{Captures, Regex};
use std::sync::OnceLock;

fn token_regex() -> &'static Regex {
    static TOKEN_RE: OnceLock<Regex> = OnceLock::new();
    TOKEN_RE.get_or_init(|| {
        Regex::new(r"\b(INSERT INTO|DELETE FROM|SELECT|UPDATE|FROM|WHERE|VALUES|SET)\b|([()])")
            .expect("invalid built-in keyword regex")
    })
}

/// Highlight statement keywords and parentheses, and show dollar-quoted text with
/// plain single quotes. For display only: the result is not valid SQL in general.
pub fn highlight(sql: &str) -> String {
    let sql = sql.replace(DOLLAR_TAG, "'");
    token_regex()
        .replace_all(&sql, |caps: &Captures<'_>| match caps.get(1) {
            Some(keyword) => keyword.as_str().blue().bold().to_string(),
            None => caps[2].cyan().to_string(),
        })
        .into_owned()
}

impl Qx {
    /// [`parse`](Qx::parse) and [`highlight`] the result.
    pub fn pretty(&self) -> QxResult<String> {
        Ok(highlight(&self.parse()?))
    }
}
