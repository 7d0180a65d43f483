//! # Validator
//!
//! Field-error accumulator shared by every form, plus the pure predicate
//! checks the forms feed into it.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Pattern recommended by the WHATWG for `<input type="email">`.
pub static EMAIL_RX: Lazy<FullMatch> = Lazy::new(|| {
    FullMatch::new(
        r"[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*",
    )
    .expect("email pattern compiles")
});

/// A regex anchored at both ends, so it only ever accepts a whole input.
#[derive(Debug, Clone)]
pub struct FullMatch(Regex);

impl FullMatch {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(&format!(r"\A(?:{pattern})\z")).map(Self)
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.0.is_match(value)
    }
}

/// Collected validation failures for one form submission.
///
/// The first message recorded for a field wins; later ones are dropped.
/// Non-field errors keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Validator {
    field_errors: BTreeMap<String, String>,
    non_field_errors: Vec<String>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff there are no field errors and no non-field errors.
    pub fn valid(&self) -> bool {
        self.field_errors.is_empty() && self.non_field_errors.is_empty()
    }

    pub fn add_field_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.field_errors
            .entry(field.into())
            .or_insert_with(|| message.into());
    }

    pub fn add_non_field_error(&mut self, message: impl Into<String>) {
        self.non_field_errors.push(message.into());
    }

    /// Records `message` under `field` when `ok` is false.
    pub fn check_field(&mut self, ok: bool, field: &str, message: &str) {
        if !ok {
            self.add_field_error(field, message);
        }
    }

    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.field_errors.get(field).map(String::as_str)
    }

    pub fn field_errors(&self) -> &BTreeMap<String, String> {
        &self.field_errors
    }

    pub fn non_field_errors(&self) -> &[String] {
        &self.non_field_errors
    }
}

/// True iff the value contains something other than whitespace.
pub fn not_blank(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Character count, not byte count, is at most `n`.
pub fn max_chars(value: &str, n: usize) -> bool {
    value.chars().count() <= n
}

/// Character count, not byte count, is at least `n`.
pub fn min_chars(value: &str, n: usize) -> bool {
    value.chars().count() >= n
}

/// Set membership; an empty `permitted` slice admits nothing.
pub fn permitted_value<T: PartialEq>(value: &T, permitted: &[T]) -> bool {
    permitted.contains(value)
}

/// True iff `rx` matches the whole of `value`.
pub fn matches(value: &str, rx: &FullMatch) -> bool {
    rx.is_match(value)
}
