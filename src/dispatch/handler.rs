//! The handler base: per-verb entry points plus the exception-dispatch
//! machinery every handler inherits.
//!
//! All methods have defaults, so a concrete handler only overrides the
//! verbs it serves and, when needed, individual error or render slots.
//! The HTML/ajax-html slots write short literal bodies, the JSON slots
//! write a small `{code, message}` object, and the XML slots are still
//! empty extension points.

use serde::Serialize;

use crate::error::{Abort, ErrorKind, Outcome, RequestError};
use crate::request::RequestCtx;

use super::format::OutputFormat;

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    code: &'static str,
    message: &'a str,
}

fn write_json_body(ctx: &mut RequestCtx<'_>, kind: ErrorKind, error: &RequestError) -> Outcome {
    let body = ErrorBody {
        code: kind.code(),
        message: error.message(),
    };
    let bytes = serde_json::to_vec(&body)
        .map_err(|e| RequestError::internal(format!("error body serialization: {e}")))?;
    ctx.response.write(&bytes);
    Ok(())
}

fn format_not_recognized() -> Abort {
    Abort::Failure(RequestError::bad_request(
        "output format is not recognized",
    ))
}

/// A request handler with composable cross-cutting behaviors.
///
/// Verbs default to a bad-request refusal; exception dispatch walks the
/// error's kind chain through [`handle_error_kind`](Self::handle_error_kind)
/// and falls back to the unknown-exception handler (500).
pub trait WebHandler: Send + Sync {
    fn get(&self, ctx: &mut RequestCtx<'_>) -> Outcome {
        let _ = ctx;
        Err(Abort::Failure(RequestError::bad_request("GET is not supported")))
    }

    fn post(&self, ctx: &mut RequestCtx<'_>) -> Outcome {
        let _ = ctx;
        Err(Abort::Failure(RequestError::bad_request("POST is not supported")))
    }

    fn head(&self, ctx: &mut RequestCtx<'_>) -> Outcome {
        let _ = ctx;
        Err(Abort::Failure(RequestError::bad_request("HEAD is not supported")))
    }

    /// Walks the kind chain, most specific slug first, and invokes the first
    /// claimed handler; an exhausted chain means an unclassified failure.
    fn dispatch_error(
        &self,
        ctx: &mut RequestCtx<'_>,
        error: &RequestError,
        debug_mode: bool,
    ) -> Outcome {
        let kinds: Vec<String> = error.kinds().map(str::to_string).collect();
        for kind in &kinds {
            if let Some(outcome) = self.handle_error_kind(kind, ctx, error, debug_mode) {
                return outcome;
            }
        }
        self.handle_unknown_exception(ctx, error, debug_mode)
    }

    /// Claim point for error kinds. Override to claim custom slugs; return
    /// `None` to let the walk continue down the chain.
    fn handle_error_kind(
        &self,
        kind: &str,
        ctx: &mut RequestCtx<'_>,
        error: &RequestError,
        debug_mode: bool,
    ) -> Option<Outcome> {
        match kind {
            "not_found" => Some(self.handle_not_found(ctx, error, debug_mode)),
            "access_denied" => Some(self.handle_access_denied(ctx, error, debug_mode)),
            "bad_request" => Some(self.handle_bad_request(ctx, error, debug_mode)),
            _ => None,
        }
    }

    fn handle_not_found(
        &self,
        ctx: &mut RequestCtx<'_>,
        error: &RequestError,
        debug_mode: bool,
    ) -> Outcome {
        self.render_not_found_error(ctx, error, debug_mode)
    }

    fn render_not_found_error(
        &self,
        ctx: &mut RequestCtx<'_>,
        error: &RequestError,
        debug_mode: bool,
    ) -> Outcome {
        ctx.response.set_status(ErrorKind::NotFound.status_code());
        match ctx.format() {
            Some(OutputFormat::Html) => {
                self.render_not_found_error_html(ctx, error, debug_mode)
            }
            Some(OutputFormat::AjaxHtml) => {
                self.render_not_found_error_ajax_html(ctx, error, debug_mode)
            }
            Some(OutputFormat::Json) => {
                self.render_not_found_error_json(ctx, error, debug_mode)
            }
            Some(OutputFormat::Xml) => {
                self.render_not_found_error_xml(ctx, error, debug_mode)
            }
            None => Err(format_not_recognized()),
        }
    }

    fn render_not_found_error_html(
        &self,
        ctx: &mut RequestCtx<'_>,
        _error: &RequestError,
        _debug_mode: bool,
    ) -> Outcome {
        ctx.write_str("Page not found.");
        Ok(())
    }

    fn render_not_found_error_ajax_html(
        &self,
        ctx: &mut RequestCtx<'_>,
        _error: &RequestError,
        _debug_mode: bool,
    ) -> Outcome {
        ctx.write_str("Page not found.");
        Ok(())
    }

    fn render_not_found_error_json(
        &self,
        ctx: &mut RequestCtx<'_>,
        error: &RequestError,
        _debug_mode: bool,
    ) -> Outcome {
        write_json_body(ctx, ErrorKind::NotFound, error)
    }

    fn render_not_found_error_xml(
        &self,
        _ctx: &mut RequestCtx<'_>,
        _error: &RequestError,
        _debug_mode: bool,
    ) -> Outcome {
        Ok(())
    }

    fn handle_access_denied(
        &self,
        ctx: &mut RequestCtx<'_>,
        error: &RequestError,
        debug_mode: bool,
    ) -> Outcome {
        self.render_access_denied_error(ctx, error, debug_mode)
    }

    fn render_access_denied_error(
        &self,
        ctx: &mut RequestCtx<'_>,
        error: &RequestError,
        debug_mode: bool,
    ) -> Outcome {
        ctx.response.set_status(ErrorKind::AccessDenied.status_code());
        match ctx.format() {
            Some(OutputFormat::Html) => {
                self.render_access_denied_error_html(ctx, error, debug_mode)
            }
            Some(OutputFormat::AjaxHtml) => {
                self.render_access_denied_error_ajax_html(ctx, error, debug_mode)
            }
            Some(OutputFormat::Json) => {
                self.render_access_denied_error_json(ctx, error, debug_mode)
            }
            Some(OutputFormat::Xml) => {
                self.render_access_denied_error_xml(ctx, error, debug_mode)
            }
            None => Err(format_not_recognized()),
        }
    }

    fn render_access_denied_error_html(
        &self,
        ctx: &mut RequestCtx<'_>,
        _error: &RequestError,
        _debug_mode: bool,
    ) -> Outcome {
        ctx.write_str("Access denied.");
        Ok(())
    }

    fn render_access_denied_error_ajax_html(
        &self,
        ctx: &mut RequestCtx<'_>,
        _error: &RequestError,
        _debug_mode: bool,
    ) -> Outcome {
        ctx.write_str("Access denied.");
        Ok(())
    }

    fn render_access_denied_error_json(
        &self,
        ctx: &mut RequestCtx<'_>,
        error: &RequestError,
        _debug_mode: bool,
    ) -> Outcome {
        write_json_body(ctx, ErrorKind::AccessDenied, error)
    }

    fn render_access_denied_error_xml(
        &self,
        _ctx: &mut RequestCtx<'_>,
        _error: &RequestError,
        _debug_mode: bool,
    ) -> Outcome {
        Ok(())
    }

    fn handle_bad_request(
        &self,
        ctx: &mut RequestCtx<'_>,
        error: &RequestError,
        debug_mode: bool,
    ) -> Outcome {
        self.render_bad_request_error(ctx, error, debug_mode)
    }

    fn render_bad_request_error(
        &self,
        ctx: &mut RequestCtx<'_>,
        error: &RequestError,
        debug_mode: bool,
    ) -> Outcome {
        ctx.response.set_status(ErrorKind::BadRequest.status_code());
        match ctx.format() {
            Some(OutputFormat::Html) => {
                self.render_bad_request_error_html(ctx, error, debug_mode)
            }
            Some(OutputFormat::AjaxHtml) => {
                self.render_bad_request_error_ajax_html(ctx, error, debug_mode)
            }
            Some(OutputFormat::Json) => {
                self.render_bad_request_error_json(ctx, error, debug_mode)
            }
            Some(OutputFormat::Xml) => {
                self.render_bad_request_error_xml(ctx, error, debug_mode)
            }
            None => Err(format_not_recognized()),
        }
    }

    fn render_bad_request_error_html(
        &self,
        ctx: &mut RequestCtx<'_>,
        _error: &RequestError,
        _debug_mode: bool,
    ) -> Outcome {
        ctx.write_str("Bad request.");
        Ok(())
    }

    fn render_bad_request_error_ajax_html(
        &self,
        ctx: &mut RequestCtx<'_>,
        _error: &RequestError,
        _debug_mode: bool,
    ) -> Outcome {
        ctx.write_str("Bad request.");
        Ok(())
    }

    fn render_bad_request_error_json(
        &self,
        ctx: &mut RequestCtx<'_>,
        error: &RequestError,
        _debug_mode: bool,
    ) -> Outcome {
        write_json_body(ctx, ErrorKind::BadRequest, error)
    }

    fn render_bad_request_error_xml(
        &self,
        _ctx: &mut RequestCtx<'_>,
        _error: &RequestError,
        _debug_mode: bool,
    ) -> Outcome {
        Ok(())
    }

    fn handle_unknown_exception(
        &self,
        ctx: &mut RequestCtx<'_>,
        error: &RequestError,
        debug_mode: bool,
    ) -> Outcome {
        self.render_unknown_exception_error(ctx, error, debug_mode)
    }

    fn render_unknown_exception_error(
        &self,
        ctx: &mut RequestCtx<'_>,
        error: &RequestError,
        debug_mode: bool,
    ) -> Outcome {
        ctx.response.set_status(ErrorKind::Unknown.status_code());
        match ctx.format() {
            Some(OutputFormat::Html) => {
                self.render_unknown_exception_error_html(ctx, error, debug_mode)
            }
            Some(OutputFormat::AjaxHtml) => {
                self.render_unknown_exception_error_ajax_html(ctx, error, debug_mode)
            }
            Some(OutputFormat::Json) => {
                self.render_unknown_exception_error_json(ctx, error, debug_mode)
            }
            Some(OutputFormat::Xml) => {
                self.render_unknown_exception_error_xml(ctx, error, debug_mode)
            }
            None => Err(format_not_recognized()),
        }
    }

    fn render_unknown_exception_error_html(
        &self,
        ctx: &mut RequestCtx<'_>,
        error: &RequestError,
        debug_mode: bool,
    ) -> Outcome {
        if debug_mode {
            ctx.write_str(&format!("Internal server error: {}", error.message()));
        } else {
            ctx.write_str("Internal server error.");
        }
        Ok(())
    }

    fn render_unknown_exception_error_ajax_html(
        &self,
        ctx: &mut RequestCtx<'_>,
        _error: &RequestError,
        _debug_mode: bool,
    ) -> Outcome {
        ctx.write_str("Internal server error.");
        Ok(())
    }

    fn render_unknown_exception_error_json(
        &self,
        ctx: &mut RequestCtx<'_>,
        error: &RequestError,
        _debug_mode: bool,
    ) -> Outcome {
        write_json_body(ctx, ErrorKind::Unknown, error)
    }

    fn render_unknown_exception_error_xml(
        &self,
        _ctx: &mut RequestCtx<'_>,
        _error: &RequestError,
        _debug_mode: bool,
    ) -> Outcome {
        Ok(())
    }
}
