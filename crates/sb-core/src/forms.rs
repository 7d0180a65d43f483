//! Concrete forms submitted by the browser.
//!
//! Each form owns its `Validator` so a failed submission can be handed back
//! to the template with the user's input and the errors side by side.

use serde::Serialize;

use crate::form::{DecodeError, FormSchema, FormValues};
use crate::validator::{self, Validator, EMAIL_RX};

pub const BLANK: &str = "This field cannot be blank";

/// Expiry choices offered on the create page, in days.
pub const EXPIRY_DAYS: [i32; 3] = [1, 7, 365];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnippetCreateForm {
    pub title: String,
    pub content: String,
    pub expires: i32,
    #[serde(skip)]
    pub validator: Validator,
}

impl Default for SnippetCreateForm {
    /// A blank form with a one-year expiry pre-selected.
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            expires: 365,
            validator: Validator::new(),
        }
    }
}

impl SnippetCreateForm {
    pub fn validate(&mut self) -> bool {
        let v = &mut self.validator;
        v.check_field(validator::not_blank(&self.title), "title", BLANK);
        v.check_field(
            validator::max_chars(&self.title, 100),
            "title",
            "This field cannot be more than 100 characters long",
        );
        v.check_field(validator::not_blank(&self.content), "content", BLANK);
        v.check_field(
            validator::permitted_value(&self.expires, &EXPIRY_DAYS),
            "expires",
            "This field must equal 1, 7 or 365",
        );
        v.valid()
    }
}

impl FormSchema for SnippetCreateForm {
    const FIELDS: &'static [&'static str] = &["title", "content", "expires"];

    fn from_values(values: &FormValues) -> Result<Self, DecodeError> {
        Ok(Self {
            title: values.text("title")?,
            content: values.text("content")?,
            expires: values.number("expires")?,
            validator: Validator::new(),
        })
    }
}

#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserSignupForm {
    pub name: String,
    pub email: String,
    #[serde(skip)]
    pub password: String,
    #[serde(skip)]
    pub validator: Validator,
}

impl UserSignupForm {
    pub fn validate(&mut self) -> bool {
        let v = &mut self.validator;
        v.check_field(validator::not_blank(&self.name), "name", BLANK);
        v.check_field(validator::not_blank(&self.email), "email", BLANK);
        v.check_field(
            validator::matches(&self.email, &EMAIL_RX),
            "email",
            "This field must be a valid email address",
        );
        v.check_field(validator::not_blank(&self.password), "password", BLANK);
        v.check_field(
            validator::min_chars(&self.password, 8),
            "password",
            "This field must be at least 8 characters long",
        );
        v.valid()
    }
}

impl FormSchema for UserSignupForm {
    const FIELDS: &'static [&'static str] = &["name", "email", "password"];

    fn from_values(values: &FormValues) -> Result<Self, DecodeError> {
        Ok(Self {
            name: values.text("name")?,
            email: values.text("email")?,
            password: values.text("password")?,
            validator: Validator::new(),
        })
    }
}

impl std::fmt::Debug for UserSignupForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserSignupForm")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("validator", &self.validator)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserLoginForm {
    pub email: String,
    #[serde(skip)]
    pub password: String,
    #[serde(skip)]
    pub validator: Validator,
}

impl UserLoginForm {
    pub fn validate(&mut self) -> bool {
        let v = &mut self.validator;
        v.check_field(validator::not_blank(&self.email), "email", BLANK);
        v.check_field(
            validator::matches(&self.email, &EMAIL_RX),
            "email",
            "This field must be a valid email address",
        );
        v.check_field(validator::not_blank(&self.password), "password", BLANK);
        v.valid()
    }
}

impl FormSchema for UserLoginForm {
    const FIELDS: &'static [&'static str] = &["email", "password"];

    fn from_values(values: &FormValues) -> Result<Self, DecodeError> {
        Ok(Self {
            email: values.text("email")?,
            password: values.text("password")?,
            validator: Validator::new(),
        })
    }
}

impl std::fmt::Debug for UserLoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserLoginForm")
            .field("email", &self.email)
            .field("validator", &self.validator)
            .finish_non_exhaustive()
    }
}
