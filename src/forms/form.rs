//! Form schema (shared, immutable) and per-request form instance.

use std::sync::Arc;

use crate::request::Request;

use super::field::{FormField, RenderParams};
use super::session::{Postback, PostbackSession};

/// Immutable ordered field list, built once at definition time and shared
/// across requests. Field order is ascending ordinal, which the builder
/// assigns in registration order.
pub struct FormSchema<V, M> {
    fields: Vec<Box<dyn FormField<V, M>>>,
}

impl<V, M> FormSchema<V, M> {
    pub fn builder() -> FormSchemaBuilder<V, M> {
        FormSchemaBuilder { fields: Vec::new() }
    }

    pub fn fields(&self) -> impl Iterator<Item = &dyn FormField<V, M>> {
        self.fields.iter().map(Box::as_ref)
    }

    pub fn field(&self, name: &str) -> Option<&dyn FormField<V, M>> {
        self.fields
            .iter()
            .find(|field| field.name() == name)
            .map(Box::as_ref)
    }
}

pub struct FormSchemaBuilder<V, M> {
    fields: Vec<Box<dyn FormField<V, M>>>,
}

impl<V, M> FormSchemaBuilder<V, M> {
    /// Registers a field, assigning the next ordinal.
    pub fn field(mut self, mut field: impl FormField<V, M> + 'static) -> Self {
        field.set_ordinal(self.fields.len());
        self.fields.push(Box::new(field));
        self
    }

    pub fn build(mut self) -> Arc<FormSchema<V, M>> {
        // Ordering is by ordinal, not by any name-keyed collection.
        self.fields.sort_by_key(|field| field.ordinal());
        Arc::new(FormSchema { fields: self.fields })
    }
}

/// Per-request form instance: current values plus the postback session
/// once one has happened.
pub struct Form<V, M> {
    schema: Arc<FormSchema<V, M>>,
    pub values: V,
    session: Option<PostbackSession>,
}

impl<V: Default, M> Form<V, M> {
    /// Fresh form with every field set to its default, in declaration
    /// order.
    pub fn new(schema: Arc<FormSchema<V, M>>) -> Self {
        let mut values = V::default();
        for field in schema.fields() {
            field.initialize(&mut values);
        }
        Self {
            schema,
            values,
            session: None,
        }
    }
}

impl<V, M> Form<V, M> {
    pub fn schema(&self) -> &FormSchema<V, M> {
        &self.schema
    }

    pub fn field(&self, name: &str) -> Option<&dyn FormField<V, M>> {
        self.schema.field(name)
    }

    pub fn session(&self) -> Option<&PostbackSession> {
        self.session.as_ref()
    }

    /// Binds and validates every field against the submitted request, in
    /// declaration order, replacing any previous session.
    pub fn postback(&mut self, request: &dyn Request) -> &PostbackSession {
        let mut session = PostbackSession::new();
        {
            let mut pb = Postback {
                request,
                session: &mut session,
            };
            for field in self.schema.fields() {
                field.postback(&mut self.values, &mut pb);
            }
        }
        self.session.insert(session)
    }

    /// True iff the last postback recorded no errors. A form that has not
    /// posted back yet is valid.
    pub fn is_valid(&self) -> bool {
        self.session.as_ref().is_none_or(PostbackSession::is_valid)
    }

    /// Error message for one field, checking the field's own error keys in
    /// order (a composite field reports through its first invalid
    /// sub-key).
    pub fn field_error(&self, name: &str) -> Option<&str> {
        let session = self.session.as_ref()?;
        let field = self.schema.field(name)?;
        field
            .error_keys()
            .iter()
            .find_map(|key| session.message(key))
    }

    /// First invalid field in declaration order as a (field name, message)
    /// pair. When errors exist only under keys no field claims, falls back
    /// to an arbitrary recorded entry.
    pub fn first_invalid(&self) -> Option<(String, String)> {
        let session = self.session.as_ref()?;
        if session.is_valid() {
            return None;
        }
        for field in self.schema.fields() {
            for key in field.error_keys() {
                if let Some(message) = session.message(&key) {
                    return Some((field.name().to_string(), message.to_string()));
                }
            }
        }
        session
            .errors()
            .iter()
            .next()
            .map(|(key, message)| (key.to_string(), message.to_string()))
    }

    /// Copies model attributes into the form, field by field, in
    /// declaration order.
    pub fn load(&mut self, model: &M) {
        for field in self.schema.fields() {
            field.load(&mut self.values, model);
        }
    }

    /// Copies form values onto the model, field by field, in declaration
    /// order.
    pub fn save(&self, model: &mut M) {
        for field in self.schema.fields() {
            field.save(&self.values, model);
        }
    }

    pub fn render_field(&self, name: &str, params: &RenderParams) -> Option<String> {
        self.schema
            .field(name)
            .map(|field| field.render(&self.values, params))
    }
}
