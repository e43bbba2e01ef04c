//! In-memory doubles for the platform boundary, exposed for tests.

use std::collections::BTreeMap;

use http::{Method, StatusCode};

use crate::request::{Request, ResponseSink};

/// Scriptable request double.
pub struct FakeRequest {
    method: Method,
    uri: String,
    params: BTreeMap<String, String>,
    user: Option<String>,
    admin: bool,
}

impl FakeRequest {
    pub fn new(method: Method, uri: impl Into<String>) -> Self {
        Self {
            method,
            uri: uri.into(),
            params: BTreeMap::new(),
            user: None,
            admin: false,
        }
    }

    pub fn get(uri: impl Into<String>) -> Self {
        Self::new(Method::GET, uri)
    }

    pub fn post(uri: impl Into<String>) -> Self {
        Self::new(Method::POST, uri)
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn with_admin(mut self, admin: bool) -> Self {
        self.admin = admin;
        self
    }
}

impl Request for FakeRequest {
    fn method(&self) -> Method {
        self.method.clone()
    }

    fn uri(&self) -> &str {
        &self.uri
    }

    fn param(&self, key: &str) -> Option<String> {
        self.params.get(key).cloned()
    }

    fn current_user(&self) -> Option<String> {
        self.user.clone()
    }

    fn is_admin(&self) -> bool {
        self.admin
    }

    fn login_url(&self, destination: &str) -> String {
        format!("/login?continue={destination}")
    }
}

/// Captures everything a handler writes.
#[derive(Debug, Default)]
pub struct FakeResponse {
    pub status: Option<StatusCode>,
    pub body: Vec<u8>,
    pub redirected_to: Option<String>,
}

impl FakeResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body_str(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl ResponseSink for FakeResponse {
    fn set_status(&mut self, status: StatusCode) {
        self.status = Some(status);
    }

    fn write(&mut self, bytes: &[u8]) {
        self.body.extend_from_slice(bytes);
    }

    fn redirect(&mut self, location: &str) {
        self.status = Some(StatusCode::FOUND);
        self.redirected_to = Some(location.to_string());
    }
}
