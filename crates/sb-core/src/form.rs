//! # Form Decoder
//!
//! Turns an `application/x-www-form-urlencoded` body into a typed form.
//!
//! Each form type declares the fields it reads through [`FormSchema`] and
//! pulls them out of [`FormValues`] by name. Two failure classes come out of
//! [`decode`]:
//!
//! * client faults (bad content type, bad encoding, a number that does not
//!   parse): the request is rejected before validation runs;
//! * schema defects (a form reading a field it never declared, or declaring
//!   one twice): a bug in this program, reported via [`DecodeError::is_defect`].

use std::collections::HashMap;
use std::str::FromStr;

use thiserror::Error;

pub const URLENCODED: &str = "application/x-www-form-urlencoded";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unsupported content type `{0}`")]
    UnsupportedContentType(String),

    #[error("malformed form body: {0}")]
    Malformed(String),

    #[error("field `{field}` has an invalid value: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("form schema mismatch: {0}")]
    Schema(String),
}

impl DecodeError {
    /// Schema mismatches are programming errors, never the client's fault.
    pub fn is_defect(&self) -> bool {
        matches!(self, Self::Schema(_))
    }
}

/// Implemented by every form to declare and read its own fields.
pub trait FormSchema: Sized {
    /// Names of the fields `from_values` is allowed to read.
    const FIELDS: &'static [&'static str];

    fn from_values(values: &FormValues) -> Result<Self, DecodeError>;
}

/// Raw decoded pairs, restricted to the fields a schema declared.
///
/// Fields present in the body but absent from the schema are ignored.
#[derive(Debug)]
pub struct FormValues {
    declared: &'static [&'static str],
    values: HashMap<String, Vec<String>>,
}

impl FormValues {
    pub fn parse(body: &[u8], declared: &'static [&'static str]) -> Result<Self, DecodeError> {
        for (i, field) in declared.iter().enumerate() {
            if declared[..i].contains(field) {
                return Err(DecodeError::Schema(format!("field `{field}` declared twice")));
            }
        }

        let text = std::str::from_utf8(body)
            .map_err(|_| DecodeError::Malformed("body is not valid UTF-8".into()))?;
        check_percent_escapes(text)?;

        let mut values: HashMap<String, Vec<String>> = HashMap::new();
        for (key, value) in url::form_urlencoded::parse(text.as_bytes()) {
            if declared.contains(&key.as_ref()) {
                values.entry(key.into_owned()).or_default().push(value.into_owned());
            }
        }

        Ok(Self { declared, values })
    }

    fn first(&self, field: &str) -> Result<Option<&str>, DecodeError> {
        if !self.declared.contains(&field) {
            return Err(DecodeError::Schema(format!(
                "field `{field}` read but not declared in FIELDS"
            )));
        }
        Ok(self
            .values
            .get(field)
            .and_then(|v| v.first())
            .map(String::as_str))
    }

    /// First value of a text field, empty when absent.
    pub fn text(&self, field: &str) -> Result<String, DecodeError> {
        Ok(self.first(field)?.unwrap_or_default().to_owned())
    }

    /// First value of a numeric field. Absent or empty yields the zero value
    /// so validation can report it; anything unparsable, surrounding
    /// whitespace included, is a client fault.
    pub fn number<T>(&self, field: &str) -> Result<T, DecodeError>
    where
        T: FromStr + Default,
        T::Err: std::fmt::Display,
    {
        match self.first(field)? {
            None | Some("") => Ok(T::default()),
            Some(raw) => raw.parse().map_err(|e: T::Err| DecodeError::InvalidValue {
                field: field.to_owned(),
                reason: e.to_string(),
            }),
        }
    }
}

/// Decodes a request body into `F`, checking the content type first.
pub fn decode<F: FormSchema>(content_type: Option<&str>, body: &[u8]) -> Result<F, DecodeError> {
    let essence = content_type
        .and_then(|ct| ct.split(';').next())
        .map(str::trim)
        .unwrap_or_default();
    if !essence.eq_ignore_ascii_case(URLENCODED) {
        return Err(DecodeError::UnsupportedContentType(essence.to_owned()));
    }

    let values = FormValues::parse(body, F::FIELDS)?;
    F::from_values(&values)
}

fn check_percent_escapes(text: &str) -> Result<(), DecodeError> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let ok = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !ok {
                return Err(DecodeError::Malformed(format!("bad percent escape at byte {i}")));
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    Ok(())
}
