//! Built-in middleware: access checks, path-segment fetchers and
//! before-request hooks.
//!
//! These are the auto-collected behaviors a handler registers through
//! [`DispatcherBuilder::auto`](super::middleware::DispatcherBuilder::auto).

use crate::error::{Abort, ErrorKind, Outcome, RequestError};
use crate::request::RequestCtx;

use super::middleware::{Middleware, Next};

/// Guards the chain behind a zero-argument access predicate.
///
/// A denied anonymous caller on a plain HTML GET is sent to the login URL
/// instead of a 403; everyone else gets the denial re-raised for exception
/// dispatch.
pub struct AccessCheck<H> {
    check: fn(&H, &RequestCtx<'_>) -> Result<(), RequestError>,
}

pub fn access_check<H>(
    check: fn(&H, &RequestCtx<'_>) -> Result<(), RequestError>,
) -> AccessCheck<H> {
    AccessCheck { check }
}

/// Access check requiring an administrator caller.
pub fn require_admin<H>() -> AccessCheck<H> {
    access_check(|_, ctx| {
        if ctx.request.is_admin() {
            Ok(())
        } else {
            Err(RequestError::access_denied("administrator access required"))
        }
    })
}

impl<H> Middleware<H> for AccessCheck<H>
where
    H: Send + Sync,
{
    fn call(&self, handler: &H, ctx: &mut RequestCtx<'_>, next: Next<'_, H>) -> Outcome {
        if let Err(error) = (self.check)(handler, ctx) {
            if error.kind() == ErrorKind::AccessDenied
                && ctx.request.current_user().is_none()
                && ctx.can_redirect()
            {
                let destination = ctx.request.uri().to_string();
                return Err(Abort::Redirect(ctx.request.login_url(&destination)));
            }
            return Err(error.into());
        }
        next.run(handler, ctx)
    }
}

/// Feeds the next positional path argument to a fetch function before the
/// chain continues. Supports "fetch entity by ID embedded in the URL path"
/// uniformly; fetched entities are parked in `ctx.extensions`.
pub struct Fetcher<H> {
    fetch: fn(&H, &mut RequestCtx<'_>, &str) -> Outcome,
}

pub fn fetcher<H>(fetch: fn(&H, &mut RequestCtx<'_>, &str) -> Outcome) -> Fetcher<H> {
    Fetcher { fetch }
}

impl<H> Middleware<H> for Fetcher<H>
where
    H: Send + Sync,
{
    fn call(&self, handler: &H, ctx: &mut RequestCtx<'_>, next: Next<'_, H>) -> Outcome {
        let Some(arg) = ctx.next_path_arg() else {
            return Err(Abort::Failure(RequestError::bad_request(
                "missing path segment for fetcher",
            )));
        };
        (self.fetch)(handler, ctx, &arg)?;
        next.run(handler, ctx)
    }
}

/// Invokes a hook before the chain continues; consumes no arguments.
pub struct BeforeRequest<H> {
    hook: fn(&H, &mut RequestCtx<'_>) -> Outcome,
}

pub fn before_request<H>(hook: fn(&H, &mut RequestCtx<'_>) -> Outcome) -> BeforeRequest<H> {
    BeforeRequest { hook }
}

impl<H> Middleware<H> for BeforeRequest<H>
where
    H: Send + Sync,
{
    fn call(&self, handler: &H, ctx: &mut RequestCtx<'_>, next: Next<'_, H>) -> Outcome {
        (self.hook)(handler, ctx)?;
        next.run(handler, ctx)
    }
}
