//! formbox: a small internal web toolkit.
//!
//! Two halves: a request-dispatch mechanism that lets handlers declare
//! cross-cutting behaviors (access checks, path-segment fetchers,
//! before-hooks) as composable middleware with stop/redirect control
//! flow and status-code exception dispatch, and a declarative form
//! framework (field descriptors, multi-stage validation, HTML rendering,
//! template-tag boundary) for binding HTML forms to model objects.
//!
//! The hosted platform's request/response objects stay behind the
//! [`request::Request`] and [`request::ResponseSink`] traits; the
//! template engine calls in through [`forms::render_field_tag`].

pub mod config;
pub mod dispatch;
pub mod error;
pub mod forms;
pub mod observability;
pub mod request;
pub mod testing; // Expose for host-application tests (FakeRequest/FakeResponse)

pub use config::Settings;
pub use dispatch::{Dispatcher, WebHandler};
pub use error::{Abort, ErrorKind, Outcome, RequestError};
pub use request::{Request, RequestCtx, ResponseSink};
