use http::StatusCode;
use thiserror::Error;

/// Built-in error categories, each with a fixed HTTP status.
///
/// Custom error kinds do not extend this enum; they attach a slug to the
/// kind chain of a [`RequestError`] and fall back to one of these.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    AccessDenied,
    BadRequest,
    Unknown,
}

impl ErrorKind {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::AccessDenied => StatusCode::FORBIDDEN,
            ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKind::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Slug used for dispatch lookup, e.g. `AccessDenied` -> "access_denied".
    pub fn slug(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::AccessDenied => "access_denied",
            ErrorKind::BadRequest => "bad_request",
            ErrorKind::Unknown => "unknown_exception",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::AccessDenied => "ACCESS_DENIED",
            ErrorKind::BadRequest => "BAD_REQUEST",
            ErrorKind::Unknown => "INTERNAL_ERROR",
        }
    }
}

/// A failed request, classified for exception dispatch.
///
/// `kinds` is the dispatch chain, most specific slug first. A plain
/// `not_found` error carries `["not_found"]`; a specialized error carries
/// its own slug followed by the base slug, so handlers that do not claim
/// the custom slug fall through to the built-in one. Internal errors carry
/// an empty chain and always reach the unknown-exception fallback.
#[derive(Clone, Debug, Error)]
#[error("{message}")]
pub struct RequestError {
    kind: ErrorKind,
    kinds: Vec<String>,
    message: String,
}

impl RequestError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            kinds: vec![kind.slug().to_string()],
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn access_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AccessDenied, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    /// An unclassified failure; dispatches straight to the unknown-exception
    /// fallback (500).
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Unknown,
            kinds: Vec::new(),
            message: message.into(),
        }
    }

    /// Registers a custom kind in front of a built-in base kind. The name is
    /// converted at camel-case boundaries, so `"StaleLink"` dispatches as
    /// `stale_link` before falling back to the base slug.
    pub fn specialized(
        name: &str,
        base: ErrorKind,
        message: impl Into<String>,
    ) -> Self {
        let mut kinds = vec![kind_slug(name)];
        if base != ErrorKind::Unknown {
            kinds.push(base.slug().to_string());
        }
        Self {
            kind: base,
            kinds,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Dispatch chain, most specific slug first.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.kinds.iter().map(String::as_str)
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Inserts underscores at camel-case boundaries and lowercases the result.
pub fn kind_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len() + 4);
    let mut prev_boundary = false;
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            if prev_boundary {
                slug.push('_');
            }
            slug.push(ch.to_ascii_lowercase());
            prev_boundary = false;
        } else {
            slug.push(ch);
            prev_boundary = ch.is_ascii_lowercase() || ch.is_ascii_digit();
        }
    }
    slug
}

/// Control-flow escape from a dispatch chain.
///
/// `Stop` and `Redirect` are successful short-circuits; only `Failure`
/// reaches exception dispatch. All three are caught exactly once, at the
/// dispatcher's outermost guard.
#[derive(Debug, Error)]
pub enum Abort {
    #[error("request stopped")]
    Stop,
    #[error("redirect to {0}")]
    Redirect(String),
    #[error(transparent)]
    Failure(#[from] RequestError),
}

pub type Outcome = Result<(), Abort>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_slug_splits_camel_boundaries() {
        assert_eq!(kind_slug("AccessDenied"), "access_denied");
        assert_eq!(kind_slug("StaleLink"), "stale_link");
        assert_eq!(kind_slug("NotFound"), "not_found");
        assert_eq!(kind_slug("Error404Page"), "error404_page");
    }

    #[test]
    fn specialized_error_chains_to_base_slug() {
        let err = RequestError::specialized("StaleLink", ErrorKind::NotFound, "gone");
        let kinds: Vec<_> = err.kinds().collect();
        assert_eq!(kinds, vec!["stale_link", "not_found"]);
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn internal_error_has_empty_chain() {
        let err = RequestError::internal("boom");
        assert_eq!(err.kinds().count(), 0);
        assert_eq!(err.kind().status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn status_codes_match_taxonomy() {
        assert_eq!(ErrorKind::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorKind::AccessDenied.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ErrorKind::BadRequest.status_code(), StatusCode::BAD_REQUEST);
    }
}
