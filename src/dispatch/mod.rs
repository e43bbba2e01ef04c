//! Request dispatch: the middleware chain every handler method runs
//! through, the built-in guard middleware, the handler base trait and
//! output-format negotiation.
//!
//! ## Key components
//!
//! - [`WebHandler`] - handler base with per-verb entry points and
//!   exception dispatch
//! - [`Dispatcher`] / [`DispatcherBuilder`] - per-handler-type middleware
//!   chain, declared middleware outermost
//! - [`access_check`] / [`fetcher`] / [`before_request`] - built-in guards
//! - [`FormatTable`] - ordered content-negotiation table

pub mod format;
mod guards;
mod handler;
mod middleware;

pub use format::{FormatTable, OutputFormat};
pub use guards::{
    AccessCheck, BeforeRequest, Fetcher, access_check, before_request, fetcher,
    require_admin,
};
pub use handler::WebHandler;
pub use middleware::{Dispatcher, DispatcherBuilder, Middleware, Next};
