//! Declarative form framework.
//!
//! A form is a shared, immutable schema of field descriptors plus a
//! per-request instance holding current values and, after a postback, the
//! validation session.
//!
//! ## Key components
//!
//! - [`FormSchema`] / [`Form`] - ordered field collection and per-request
//!   instance
//! - [`StringField`] / [`TextField`] / [`DateField`] - built-in field
//!   descriptors
//! - [`valid_string`] / [`valid_int`] / [`valid_bool`] - validators
//! - [`PostbackSession`] - per-postback error and raw-value accumulator
//! - [`render_field_tag`] - the template-tag entry point

mod date;
mod field;
mod form;
pub mod render;
mod session;
mod tags;
mod validators;

pub use date::{DateField, DatePart};
pub use field::{Accessor, FieldDefault, FormField, RenderParams, StringField, TextField};
pub use form::{Form, FormSchema, FormSchemaBuilder};
pub use session::{Postback, PostbackSession, ValidationErrors};
pub use tags::{CellBinding, CellTemplate, RenderContext, default_value, render_field_tag};
pub use validators::{IntRules, StringRules, valid_bool, valid_int, valid_string};
