//! The middleware chain behind every handler method.
//!
//! A [`Dispatcher`] is assembled once per handler type and reused across
//! requests. Its chain holds the explicitly declared middleware first,
//! then the auto-collected ones; running the chain front-to-back makes the
//! first declared middleware the outermost wrapper, so declared middleware
//! can short-circuit the auto-collected ones.

use http::Method;

use crate::error::{Abort, Outcome, RequestError};
use crate::observability::Metrics;
use crate::request::RequestCtx;

use super::handler::WebHandler;

/// One cross-cutting behavior in a handler's dispatch chain.
pub trait Middleware<H>: Send + Sync {
    fn call(&self, handler: &H, ctx: &mut RequestCtx<'_>, next: Next<'_, H>) -> Outcome;
}

/// Cursor over the remainder of the chain.
pub struct Next<'a, H> {
    rest: &'a [Box<dyn Middleware<H>>],
    terminal: &'a dyn Fn(&H, &mut RequestCtx<'_>) -> Outcome,
}

impl<'a, H> Next<'a, H> {
    pub fn run(self, handler: &H, ctx: &mut RequestCtx<'_>) -> Outcome {
        match self.rest.split_first() {
            Some((head, rest)) => head.call(
                handler,
                ctx,
                Next {
                    rest,
                    terminal: self.terminal,
                },
            ),
            None => (self.terminal)(handler, ctx),
        }
    }
}

/// Assembles the chain for one handler type.
///
/// `wrap` adds declared middleware, `auto` adds auto-collected middleware
/// (access checks, fetchers, before-hooks). Declared middleware always end
/// up outer to auto-collected ones, each group keeping registration order.
pub struct DispatcherBuilder<H> {
    declared: Vec<Box<dyn Middleware<H>>>,
    auto: Vec<Box<dyn Middleware<H>>>,
}

impl<H: WebHandler> DispatcherBuilder<H> {
    pub fn wrap(mut self, middleware: impl Middleware<H> + 'static) -> Self {
        self.declared.push(Box::new(middleware));
        self
    }

    pub fn auto(mut self, middleware: impl Middleware<H> + 'static) -> Self {
        self.auto.push(Box::new(middleware));
        self
    }

    pub fn build(self) -> Dispatcher<H> {
        let mut chain = self.declared;
        chain.extend(self.auto);
        Dispatcher {
            chain,
            metrics: Metrics::new(),
        }
    }
}

/// Per-handler-type dispatch pipeline, shared across requests.
pub struct Dispatcher<H> {
    chain: Vec<Box<dyn Middleware<H>>>,
    metrics: Metrics,
}

impl<H: WebHandler> Dispatcher<H> {
    pub fn builder() -> DispatcherBuilder<H> {
        DispatcherBuilder {
            declared: Vec::new(),
            auto: Vec::new(),
        }
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Runs the chain down to the handler method for the request's verb.
    fn run(&self, handler: &H, ctx: &mut RequestCtx<'_>) -> Outcome {
        let next = Next {
            rest: &self.chain,
            terminal: &dispatch_by_method,
        };
        next.run(handler, ctx)
    }

    /// Full pipeline for one request: chain, stop/redirect guard, exception
    /// dispatch. Never panics back into the hosting runtime.
    pub fn handle(&self, handler: &H, ctx: &mut RequestCtx<'_>, debug_mode: bool) {
        self.metrics.request_dispatched();
        match self.run(handler, ctx) {
            Ok(()) | Err(Abort::Stop) => {}
            Err(Abort::Redirect(location)) => {
                self.metrics.redirect_issued();
                ctx.response.redirect(&location);
            }
            Err(Abort::Failure(error)) => {
                self.metrics.error_dispatched();
                // The exception-dispatch step is itself guarded, so a custom
                // handler may answer with a redirect of its own.
                match handler.dispatch_error(ctx, &error, debug_mode) {
                    Ok(()) | Err(Abort::Stop) => {}
                    Err(Abort::Redirect(location)) => {
                        self.metrics.redirect_issued();
                        ctx.response.redirect(&location);
                    }
                    Err(Abort::Failure(nested)) => {
                        tracing::error!(
                            message = %nested,
                            "error while rendering error response"
                        );
                    }
                }
                tracing::error!(
                    kind = ?error.kind(),
                    message = %error.message(),
                    "error processing request"
                );
            }
        }
    }
}

fn dispatch_by_method<H: WebHandler>(handler: &H, ctx: &mut RequestCtx<'_>) -> Outcome {
    let method = ctx.request.method();
    if method == Method::GET {
        handler.get(ctx)
    } else if method == Method::POST {
        handler.post(ctx)
    } else if method == Method::HEAD {
        handler.head(ctx)
    } else {
        Err(Abort::Failure(RequestError::bad_request(format!(
            "method {method} is not supported"
        ))))
    }
}
