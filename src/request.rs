//! The platform boundary: opaque request/response collaborators and the
//! per-call dispatch context.
//!
//! The hosting runtime owns the real request and response objects; the
//! toolkit only ever sees them through these traits.

use http::{Extensions, Method, StatusCode};

use crate::dispatch::format::{FormatTable, OutputFormat};

/// Read side of the hosted platform's request object.
pub trait Request {
    fn method(&self) -> Method;

    /// Full request URI, used as the continue-target for login redirects.
    fn uri(&self) -> &str;

    /// Named query/form parameter, `None` when absent.
    fn param(&self, key: &str) -> Option<String>;

    /// Identity of the current caller; `None` means anonymous.
    fn current_user(&self) -> Option<String>;

    fn is_admin(&self) -> bool {
        false
    }

    /// Login URL that returns to `destination` after sign-in.
    fn login_url(&self, destination: &str) -> String;
}

/// Write side of the hosted platform's response object.
pub trait ResponseSink {
    fn set_status(&mut self, status: StatusCode);
    fn write(&mut self, bytes: &[u8]);
    fn redirect(&mut self, location: &str);
}

/// Per-call dispatch context threaded through the middleware chain.
///
/// Carries the positional path arguments consumed by fetcher middleware,
/// an extension map for entities fetched along the way, and the format
/// table used for content negotiation.
pub struct RequestCtx<'a> {
    pub request: &'a dyn Request,
    pub response: &'a mut dyn ResponseSink,
    pub extensions: Extensions,
    formats: FormatTable,
    path_args: Vec<String>,
    next_arg: usize,
}

impl<'a> RequestCtx<'a> {
    pub fn new(request: &'a dyn Request, response: &'a mut dyn ResponseSink) -> Self {
        Self {
            request,
            response,
            extensions: Extensions::new(),
            formats: FormatTable::default(),
            path_args: Vec::new(),
            next_arg: 0,
        }
    }

    pub fn with_path_args(mut self, args: Vec<String>) -> Self {
        self.path_args = args;
        self
    }

    pub fn with_formats(mut self, formats: FormatTable) -> Self {
        self.formats = formats;
        self
    }

    /// Consumes and returns the next positional path argument.
    pub fn next_path_arg(&mut self) -> Option<String> {
        let arg = self.path_args.get(self.next_arg).cloned();
        if arg.is_some() {
            self.next_arg += 1;
        }
        arg
    }

    /// Negotiated output format, first matching table entry wins.
    pub fn format(&self) -> Option<OutputFormat> {
        self.formats.recognize(self.request)
    }

    /// A denied request may be turned into a login redirect only for
    /// plain HTML GETs.
    pub fn can_redirect(&self) -> bool {
        self.request.method() == Method::GET && self.format() == Some(OutputFormat::Html)
    }

    pub fn write_str(&mut self, text: &str) {
        self.response.write(text.as_bytes());
    }
}
