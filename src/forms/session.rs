//! Per-postback accumulator for raw values and validation errors.

use std::collections::BTreeMap;

use crate::request::Request;

/// Field-key to error-message mapping, first error wins per key.
///
/// A key being present means the field is invalid; there is no separate
/// validity flag.
#[derive(Debug, Default)]
pub struct ValidationErrors {
    messages: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn invalid(&mut self, key: &str, message: &str) {
        self.messages
            .entry(key.to_string())
            .or_insert_with(|| message.to_string());
    }

    pub fn is_valid(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn field_valid(&self, key: &str) -> bool {
        !self.messages.contains_key(key)
    }

    pub fn message(&self, key: &str) -> Option<&str> {
        self.messages.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.messages
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// State accumulated while binding one submitted request: recorded errors
/// plus every raw value read. Created per postback, kept on the form
/// afterwards, never persisted.
#[derive(Debug, Default)]
pub struct PostbackSession {
    errors: ValidationErrors,
    data: BTreeMap<String, String>,
}

impl PostbackSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_valid()
    }

    pub fn field_valid(&self, key: &str) -> bool {
        self.errors.field_valid(key)
    }

    pub fn message(&self, key: &str) -> Option<&str> {
        self.errors.message(key)
    }

    /// Raw value captured for `key` during postback, if it was read.
    pub fn raw_value(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }
}

/// Borrows the request for the duration of a postback and records into the
/// session. Validators and field binders only ever see this.
pub struct Postback<'a> {
    pub request: &'a dyn Request,
    pub session: &'a mut PostbackSession,
}

impl Postback<'_> {
    /// Reads the named parameter (absent means empty), records the raw
    /// value, returns it.
    pub fn get(&mut self, key: &str) -> String {
        let value = self.request.param(key).unwrap_or_default();
        self.session.data.insert(key.to_string(), value.clone());
        value
    }

    pub fn invalid(&mut self, key: &str, message: &str) {
        self.session.errors.invalid(key, message);
    }

    pub fn is_valid(&self) -> bool {
        self.session.is_valid()
    }

    pub fn field_valid(&self, key: &str) -> bool {
        self.session.field_valid(key)
    }
}
